use std::net::SocketAddr;

use quizhub::config::Config;
use quizhub::database;
use quizhub::routes;
use quizhub::stores::Stores;
use quizhub::AppState;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env()?;

    let pool = database::pool::create_pool(&config).await?;
    sqlx::migrate!("./migrations").run(&pool).await?;
    info!("database ready");

    let redis = database::redis::create_redis(&config).await?;
    info!("redis connected");

    let state = AppState::new(config.clone(), Stores::postgres(pool, redis));
    let app = routes::create_router(state);

    let addr: SocketAddr = config.server_address.parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    info!("shutdown signal received");
}
