use std::sync::Arc;

use axum::{
    extract::{DefaultBodyLimit, State},
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use sea_orm::DatabaseConnection;
use tower_http::{
    cors::CorsLayer,
    services::ServeDir,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use common::types::Health;
use service::registration::{RegistrationService, SeaOrmRegistrationRepository};
use service::storage::UploadStore;

pub mod admin;
pub mod registrations;
pub mod uploads;

/// Headroom over the artifact cap so the size check runs in the service and
/// produces the structured 413 body instead of axum's bare limit rejection.
const MULTIPART_OVERHEAD: usize = 1024 * 1024;

/// Shared state injected into handlers.
#[derive(Clone)]
pub struct ServerState {
    pub db: DatabaseConnection,
    pub registrations: Arc<RegistrationService<SeaOrmRegistrationRepository>>,
    pub uploads: Arc<UploadStore>,
    pub max_upload_bytes: usize,
    pub whatsapp_group_link: String,
}

/// Liveness probe reporting store connectivity.
#[utoipa::path(get, path = "/health", tag = "health", responses((status = 200, description = "OK")))]
pub async fn health(State(state): State<ServerState>) -> Json<Health> {
    let database = if state.db.ping().await.is_ok() {
        "connected"
    } else {
        "disconnected"
    };
    Json(Health {
        status: "healthy",
        timestamp: Utc::now().to_rfc3339(),
        database,
    })
}

/// Build the full application router: the JSON API, the admin dump, health,
/// static artifact serving and the OpenAPI explorer.
pub fn build_router(cors: CorsLayer, state: ServerState) -> Router {
    let artifacts = ServeDir::new(state.uploads.root().to_path_buf());
    let upload_body_limit = state.max_upload_bytes + MULTIPART_OVERHEAD;

    let api = Router::new()
        .route("/api/registrations", post(registrations::create))
        .route("/api/registrations/all", get(registrations::list_all))
        .route(
            "/api/upload",
            post(uploads::attach_payment).layer(DefaultBodyLimit::max(upload_body_limit)),
        );

    let admin_routes = Router::new().route("/get-users", get(admin::get_users));

    Router::new()
        .route("/health", get(health))
        .nest_service("/uploads", artifacts)
        .merge(api)
        .merge(admin_routes)
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", crate::openapi::ApiDoc::openapi()))
        .with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(
                    DefaultMakeSpan::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(
                    DefaultOnResponse::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
