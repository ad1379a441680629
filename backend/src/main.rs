use anyhow::Result;
use budget_tracker_backend::{config::AppConfig, create_router, initialize_backend};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = AppConfig::load()?;
    info!(
        "Budget tracker starting (data in {}, day boundaries at {})",
        config.data_directory.display(),
        config.utc_offset
    );

    let app_state = initialize_backend(&config)?;
    let app = create_router(app_state, &config.cors_origin)?;

    let addr = config.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
