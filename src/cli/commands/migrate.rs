use anyhow::Context;

use crate::database::DatabaseManager;

pub async fn handle() -> anyhow::Result<()> {
    DatabaseManager::migrate()
        .await
        .context("failed to apply migrations")?;

    println!("Migrations applied");
    Ok(())
}
