use std::{env, net::SocketAddr, sync::Arc, time::Duration};

use axum::Router;
use common::utils::logging::init_logging_default;
use dotenvy::dotenv;
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::routes::{self, ServerState};
use service::registration::{RegistrationService, SeaOrmRegistrationRepository};
use service::{runtime, storage::UploadStore};

/// Fixed delay between startup connection attempts.
const CONNECT_RETRY_DELAY: Duration = Duration::from_secs(5);

/// Initialize logging via shared common utils
fn init_logging() {
    init_logging_default();
}

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

/// Load configuration from `config.toml`, falling back to env vars with
/// sensible defaults when no file is present.
fn load_config() -> configs::AppConfig {
    match configs::load_default() {
        Ok(cfg) => cfg,
        Err(_) => {
            let mut cfg = configs::AppConfig::default();
            cfg.server.host = env::var("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
            cfg.server.port = env::var("SERVER_PORT")
                .ok()
                .and_then(|p| p.parse::<u16>().ok())
                .unwrap_or(5001);
            if let Ok(link) = env::var("WHATSAPP_GROUP_LINK") {
                cfg.server.whatsapp_group_link = link;
            }
            if let Ok(dir) = env::var("UPLOAD_DIR") {
                cfg.uploads.dir = dir;
            }
            cfg
        }
    }
}

/// Public entry: build the app and run the HTTP server
pub async fn run() -> anyhow::Result<()> {
    dotenv().ok();
    init_logging();

    let cfg = load_config();

    runtime::ensure_env(&cfg.uploads.dir).await?;

    // Store connectivity is retried with a fixed delay at startup only;
    // per-request failures surface to the caller unretried.
    let db = models::db::connect_with_retry(CONNECT_RETRY_DELAY).await?;

    let uploads = Arc::new(UploadStore::new(cfg.uploads.dir.clone()).await?);
    let repo = Arc::new(SeaOrmRegistrationRepository { db: db.clone() });
    let registrations = Arc::new(RegistrationService::new(
        repo,
        Arc::clone(&uploads),
        cfg.uploads.max_size_bytes(),
    ));

    let state = ServerState {
        db,
        registrations,
        uploads,
        max_upload_bytes: cfg.uploads.max_size_bytes(),
        whatsapp_group_link: cfg.server.whatsapp_group_link.clone(),
    };

    // Build router
    let cors = build_cors();
    let app: Router = routes::build_router(cors, state);

    // Bind and serve
    let addr: SocketAddr = format!("{}:{}", cfg.server.host, cfg.server.port).parse()?;
    info!(%addr, "starting registration server");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
