use anyhow::Result;
use tracing::info;

use groombook_api::{app, config, middleware};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let config = config::Config::load()?;
    middleware::logging::init(&config.logging);
    middleware::metrics::init_metrics();

    info!(version = env!("CARGO_PKG_VERSION"), "groombook api starting");

    let pool = persistence::db::connect(&config.pool_config()).await?;

    sqlx::migrate!("../persistence/src/migrations").run(&pool).await?;
    info!("migrations applied");

    let addr = config.socket_addr();
    let router = app::create_app(config, pool);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "listening");
    axum::serve(listener, router).await?;

    Ok(())
}
