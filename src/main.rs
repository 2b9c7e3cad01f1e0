#[tokio::main]
async fn main() {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sabbath_school_api=info,tower_http=info".into()),
        )
        .init();

    if let Err(e) = sabbath_school_api::server::run().await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
