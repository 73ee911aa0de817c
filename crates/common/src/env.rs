//! Runtime environment helpers.
//!
//! Startup sanity checks and process-wide mode flags.

use tracing::info;

/// Ensure the artifact upload directory exists, creating it if missing.
pub async fn ensure_upload_dir(dir: &str) -> anyhow::Result<()> {
    let existed = tokio::fs::metadata(dir).await.is_ok();
    tokio::fs::create_dir_all(dir)
        .await
        .map_err(|e| anyhow::anyhow!("cannot create upload dir {dir}: {e}"))?;
    if !existed {
        info!(%dir, "created upload directory");
    }
    Ok(())
}

/// True when the process runs in development mode (`APP_ENV=development`).
/// Gates how much failure detail 5xx responses expose.
pub fn is_development() -> bool {
    std::env::var("APP_ENV")
        .map(|v| v.eq_ignore_ascii_case("development"))
        .unwrap_or(false)
}
