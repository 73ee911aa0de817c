use axum::{extract::State, Json};
use tracing::error;

use service::registration::RegistrationView;

use crate::errors::JsonApiError;
use crate::routes::ServerState;

/// Unauthenticated administrative dump of every registrant, as a raw array.
#[utoipa::path(get, path = "/get-users", tag = "admin", responses((status = 200, description = "OK")))]
pub async fn get_users(
    State(state): State<ServerState>,
) -> Result<Json<Vec<RegistrationView>>, JsonApiError> {
    state.registrations.list_all().await.map(Json).map_err(|e| {
        error!(error = %e, "failed to fetch users");
        JsonApiError::internal("Failed to fetch users", e.to_string())
    })
}
