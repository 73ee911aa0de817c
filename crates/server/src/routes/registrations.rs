use axum::{extract::State, http::StatusCode, Json};
use serde_json::json;
use tracing::error;

use service::errors::ServiceError;
use service::registration::NewRegistrationInput;

use crate::errors::JsonApiError;
use crate::routes::ServerState;

/// Create a new registration.
#[utoipa::path(
    post, path = "/api/registrations", tag = "registrations",
    request_body = crate::openapi::NewRegistrationDoc,
    responses(
        (status = 201, description = "Registered"),
        (status = 400, description = "Missing or invalid fields"),
        (status = 409, description = "Email already registered"),
        (status = 500, description = "Registration failed")
    )
)]
pub async fn create(
    State(state): State<ServerState>,
    Json(input): Json<NewRegistrationInput>,
) -> Result<(StatusCode, Json<serde_json::Value>), JsonApiError> {
    match state.registrations.register(input.clone()).await {
        Ok(view) => Ok((
            StatusCode::CREATED,
            Json(json!({
                "success": true,
                "message": "Registration successful",
                "data": {
                    "id": view.id,
                    "email": view.email,
                    "status": view.status,
                    "registeredAt": view.registered_at,
                }
            })),
        )),
        Err(ServiceError::MissingFields(fields)) => {
            let details: Vec<String> = fields.iter().map(|f| format!("{f} is required")).collect();
            Err(JsonApiError::new(
                StatusCode::BAD_REQUEST,
                "Validation failed",
                Some(json!(details)),
            )
            // Echo the payload so clients can see what actually arrived
            .with("received", serde_json::to_value(&input).unwrap_or_default()))
        }
        Err(e @ ServiceError::InvalidFormat { .. }) | Err(e @ ServiceError::Validation(_)) => {
            Err(JsonApiError::new(
                StatusCode::BAD_REQUEST,
                "Validation failed",
                Some(json!([e.to_string()])),
            ))
        }
        Err(ServiceError::DuplicateEmail(email)) => Err(JsonApiError::new(
            StatusCode::CONFLICT,
            "Email already registered",
            None,
        )
        .with("duplicateEmail", json!(email))),
        Err(e) => {
            error!(error = %e, "registration failed");
            Err(JsonApiError::internal("Registration failed", e.to_string()))
        }
    }
}

/// Fetch all registrations, most recent first.
#[utoipa::path(
    get, path = "/api/registrations/all", tag = "registrations",
    responses(
        (status = 200, description = "OK"),
        (status = 500, description = "Listing failed")
    )
)]
pub async fn list_all(
    State(state): State<ServerState>,
) -> Result<Json<serde_json::Value>, JsonApiError> {
    match state.registrations.list_all().await {
        Ok(views) => Ok(Json(json!({
            "success": true,
            "count": views.len(),
            "data": views,
        }))),
        Err(e) => {
            error!(error = %e, "failed to list registrations");
            Err(JsonApiError::internal(
                "Failed to fetch registrations",
                e.to_string(),
            ))
        }
    }
}
