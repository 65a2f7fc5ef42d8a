use anyhow::Result;
use tracing::info;

mod app;
mod config;
mod error;
mod middleware;
mod routes;
mod services;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let config = config::Config::load()?;

    middleware::logging::init_logging(&config.logging);

    info!("Starting Raffle Platform API v{}", env!("CARGO_PKG_VERSION"));

    let app = app::create_app(config.clone());

    let addr = config.socket_addr();
    info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
