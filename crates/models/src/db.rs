use std::time::Duration;

use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use tracing::{info, warn};

/// Resolve database settings: `config.toml` first, environment second.
pub fn load_database_config() -> anyhow::Result<configs::DatabaseConfig> {
    // Load .env if present
    let _ = dotenvy::dotenv();
    let mut cfg = configs::load_default()
        .map(|c| c.database)
        .unwrap_or_default();
    cfg.normalize_from_env();
    cfg.validate()?;
    Ok(cfg)
}

pub async fn connect() -> anyhow::Result<DatabaseConnection> {
    let cfg = load_database_config()?;
    connect_with_config(&cfg).await
}

pub async fn connect_with_config(
    cfg: &configs::DatabaseConfig,
) -> anyhow::Result<DatabaseConnection> {
    let mut opts = ConnectOptions::new(cfg.url.clone());
    opts.max_connections(cfg.max_connections)
        .min_connections(cfg.min_connections)
        .connect_timeout(Duration::from_secs(cfg.connect_timeout_secs))
        .idle_timeout(Duration::from_secs(cfg.idle_timeout_secs))
        .max_lifetime(Duration::from_secs(cfg.max_lifetime_secs))
        .acquire_timeout(Duration::from_secs(cfg.acquire_timeout_secs))
        .sqlx_logging(cfg.sqlx_logging);
    let db = Database::connect(opts).await?;
    Ok(db)
}

/// Retry connection establishment with a fixed delay until the store is
/// reachable. Startup-only; per-request failures surface to the caller
/// without retry. Configuration errors fail fast rather than retry.
pub async fn connect_with_retry(delay: Duration) -> anyhow::Result<DatabaseConnection> {
    let cfg = load_database_config()?;
    loop {
        match connect_with_config(&cfg).await {
            Ok(db) => {
                info!("database connected");
                return Ok(db);
            }
            Err(e) => {
                warn!(error = %e, delay_secs = delay.as_secs(), "database connection failed; retrying");
                tokio::time::sleep(delay).await;
            }
        }
    }
}
