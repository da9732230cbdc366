use std::sync::Arc;

use flirt_api::app::create_app;
use flirt_api::config::Config;
use flirt_api::middleware::logging::init_logging;
use flirt_api::middleware::metrics::init_metrics;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = Config::load()?;
    init_logging(&config.logging);
    init_metrics();

    tracing::info!(
        host = %config.server.host,
        port = config.server.port,
        "Starting FLIRT lost-and-found API"
    );

    let pool = persistence::db::create_pool(&config.pool_config()).await?;
    persistence::db::run_migrations(&pool).await?;
    tracing::info!("Database migrations applied");

    let addr = config.socket_addr()?;
    let app = create_app(pool, Arc::new(config));

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "Listening");
    axum::serve(listener, app).await?;

    Ok(())
}
