pub mod commands;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "sschool")]
#[command(about = "Sabbath School API - operational command line")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Run the API server")]
    Serve,

    #[command(about = "Apply pending database migrations")]
    Migrate,

    #[command(about = "Create the first administrator account, or promote an existing one")]
    CreateAdmin {
        #[arg(help = "Email address for the administrator")]
        email: String,

        #[arg(help = "Display name")]
        name: String,

        #[arg(long, env = "ADMIN_PASSWORD", help = "Password (or set ADMIN_PASSWORD)")]
        password: String,
    },
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Serve => crate::server::run().await,
        Commands::Migrate => commands::migrate::handle().await,
        Commands::CreateAdmin { email, name, password } => {
            commands::admin::handle(&email, &name, &password).await
        }
    }
}
