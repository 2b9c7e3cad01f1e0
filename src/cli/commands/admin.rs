use anyhow::{bail, Context};

use crate::services::account_service::{AccountError, AccountService};
use crate::types::Role;

/// Bootstrap the first administrator. If the email is already taken the
/// existing account is promoted to admin instead; its password is left
/// alone in that case.
pub async fn handle(email: &str, name: &str, password: &str) -> anyhow::Result<()> {
    if password.len() < 8 {
        bail!("password must be at least 8 characters");
    }

    let service = AccountService::new()
        .await
        .context("failed to connect to the database")?;

    match service.register(email, name, password, Role::Admin).await {
        Ok(account) => {
            println!("Created administrator {} <{}>", account.name, account.email);
            Ok(())
        }
        Err(AccountError::DuplicateEmail) => {
            let existing = service
                .list()
                .await?
                .into_iter()
                .find(|account| account.email.eq_ignore_ascii_case(email))
                .context("account disappeared while promoting it")?;

            let account = service
                .update(existing.id, None, Some(Role::Admin), Some(true))
                .await?;

            println!("Promoted {} <{}> to administrator", account.name, account.email);
            Ok(())
        }
        Err(err) => Err(err.into()),
    }
}
