use tracing_subscriber::EnvFilter;

use hoa_admin::config;
use hoa_admin::database::{bootstrap, DatabaseManager};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, SESSION_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Initialize configuration (this loads the config singleton)
    let config = config::config();
    tracing::info!("Starting HOA admin console in {:?} mode", config.environment);

    if config.security.session_secret_generated {
        if hoa_admin::is_production!() {
            tracing::error!("SESSION_SECRET is not set; sessions will not survive a restart");
        } else {
            tracing::warn!("SESSION_SECRET is not set; using a random per-process secret");
        }
    }

    match DatabaseManager::main_pool().await {
        Ok(pool) => {
            let security = &config.security;
            match bootstrap(&pool, &security.bootstrap_admin_username, &security.bootstrap_admin_password).await {
                Ok(true) => tracing::warn!(
                    "Seeded administrator '{}'; rotate it from the Security page",
                    security.bootstrap_admin_username
                ),
                Ok(false) => tracing::info!("Registry schema ready"),
                Err(e) => tracing::error!("Registry bootstrap failed: {}", e),
            }
        }
        Err(e) => tracing::error!("Database unavailable at startup: {}", e),
    }

    let app = hoa_admin::create_app();

    let bind_addr = format!("{}:{}", config.server.bind, config.server.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!("HOA admin console listening on http://{}", bind_addr);

    axum::serve(listener, app).await?;

    DatabaseManager::close_all().await;
    Ok(())
}
