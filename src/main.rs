use dotenv::dotenv;
use tracing_subscriber::EnvFilter;

use hr_records::{app, AppState, Config, Database};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "hr_records=info,tower_http=info".into()),
        )
        .init();

    let config = Config::from_env()?;

    // Open (or create) the SQLite database and run migrations
    let db = Database::connect(&config.database_url).await?;

    let addr = config.bind_addr.clone();
    let app = app(AppState::new(&db, config));

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("🚀 Listening on http://{}", addr);

    axum::serve(listener, app).await?;
    Ok(())
}
