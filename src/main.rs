mod api;
mod config;
mod storage;

use crate::api::AppState;
use crate::config::AppConfig;
use anyhow::Context;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .with_thread_ids(false)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")?;

    info!("🥐 Starting Bakery API Server");

    // Load configuration
    let config = AppConfig::load()?;
    info!("📋 Configuration loaded");
    info!("   - Database: {}", config.storage.database_url);
    info!("   - Server: {}", config.bind_addr());

    // Open the store
    info!("💾 Connecting to database...");
    let pool = storage::db::create_pool(
        &config.storage.database_url,
        config.storage.max_connections,
    )
    .await
    .with_context(|| format!("Failed to open {}", config.storage.database_url))?;
    storage::db::migrate(&pool)
        .await
        .context("Failed to apply schema")?;

    if config.storage.seed_if_empty {
        let seeded = storage::seed::seed_if_empty(&pool)
            .await
            .context("Failed to seed database")?;
        if seeded > 0 {
            info!("🌱 Seeded {} bakeries", seeded);
        }
    }
    info!("✅ Database ready");

    let app = api::router(AppState { pool: pool.clone() });

    // Start server
    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!("🌐 Server listening on http://{}", addr);
    info!("");
    info!("📡 Available endpoints:");
    info!("   GET    /                            - Landing page");
    info!("   GET    /health                      - Health check");
    info!("   GET    /bakeries                    - All bakeries");
    info!("   GET    /bakeries/{{id}}               - One bakery");
    info!("   PATCH  /bakeries/{{id}}               - Rename a bakery");
    info!("   GET    /baked_goods/by_price        - Baked goods, cheapest first");
    info!("   GET    /baked_goods/most_expensive  - Priciest baked good");
    info!("   POST   /baked_goods                 - Add a baked good");
    info!("   DELETE /baked_goods/{{id}}            - Remove a baked good");
    info!("");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    pool.close().await;
    info!("👋 Server shutting down gracefully");

    Ok(())
}

/// Graceful shutdown handler
async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("🛑 Shutdown signal received");
}
