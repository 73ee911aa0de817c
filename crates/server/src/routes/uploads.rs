use axum::extract::multipart::MultipartError;
use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::Json;
use serde_json::json;
use tracing::{error, info};

use service::errors::ServiceError;
use service::registration::UploadedArtifact;

use crate::errors::JsonApiError;
use crate::routes::ServerState;

const EMAIL_FIELD: &str = "email";
const SCREENSHOT_FIELD: &str = "screenshot";

/// Attach payment evidence to a registration.
///
/// Multipart form: `email` text field plus a `screenshot` image. The
/// artifact is validated before acceptance; an upload whose owner cannot be
/// found is deleted again so nothing orphaned stays on disk.
#[utoipa::path(
    post, path = "/api/upload", tag = "payment",
    responses(
        (status = 200, description = "Payment proof recorded"),
        (status = 400, description = "Missing or invalid email/screenshot"),
        (status = 404, description = "Email not registered"),
        (status = 413, description = "Screenshot exceeds the size limit"),
        (status = 500, description = "Upload failed")
    )
)]
pub async fn attach_payment(
    State(state): State<ServerState>,
    mut multipart: Multipart,
) -> Result<Json<serde_json::Value>, JsonApiError> {
    let mut email: Option<String> = None;
    let mut artifact: Option<UploadedArtifact> = None;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        // Capture metadata up front; reading the body consumes the field
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some(EMAIL_FIELD) => {
                email = Some(field.text().await.map_err(multipart_error)?);
            }
            Some(SCREENSHOT_FIELD) => {
                let content_type = field.content_type().unwrap_or_default().to_string();
                let file_name = field.file_name().map(str::to_string);
                let bytes = field.bytes().await.map_err(multipart_error)?;
                artifact = Some(UploadedArtifact {
                    content_type,
                    file_name,
                    bytes: bytes.to_vec(),
                });
            }
            _ => {}
        }
    }

    let Some(email) = email else {
        return Err(JsonApiError::new(
            StatusCode::BAD_REQUEST,
            "Missing required fields (email or screenshot)",
            None,
        ));
    };

    match state.registrations.attach_payment(&email, artifact).await {
        Ok(view) => {
            info!(email = %view.email, "payment proof uploaded");
            Ok(Json(json!({
                "success": true,
                "message": "Payment proof uploaded successfully.",
                "data": {
                    "email": view.email,
                    "status": view.status,
                    "screenshot": view.payment_screenshot,
                },
                "whatsappLink": state.whatsapp_group_link,
            })))
        }
        Err(ServiceError::MissingArtifact) => Err(JsonApiError::new(
            StatusCode::BAD_REQUEST,
            "Missing required fields (email or screenshot)",
            None,
        )),
        Err(ServiceError::UnsupportedArtifactType(ct)) => Err(JsonApiError::new(
            StatusCode::BAD_REQUEST,
            "Only .jpg, .jpeg, and .png files are allowed",
            Some(json!(ct)),
        )),
        Err(ServiceError::ArtifactTooLarge { size, limit }) => Err(JsonApiError::new(
            StatusCode::PAYLOAD_TOO_LARGE,
            "Screenshot exceeds the size limit",
            Some(json!(format!("{size} bytes (limit {limit})"))),
        )),
        Err(e @ ServiceError::InvalidFormat { .. }) | Err(e @ ServiceError::Validation(_)) => {
            Err(JsonApiError::new(
                StatusCode::BAD_REQUEST,
                "Validation failed",
                Some(json!([e.to_string()])),
            ))
        }
        Err(ServiceError::NotFound(_)) => {
            Err(JsonApiError::new(StatusCode::NOT_FOUND, "User not found", None))
        }
        Err(e) => {
            error!(error = %e, "payment upload failed");
            Err(JsonApiError::internal("Failed to process payment", e.to_string()))
        }
    }
}

fn multipart_error(e: MultipartError) -> JsonApiError {
    // An over-limit body surfaces here rather than in the service
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        JsonApiError::new(
            StatusCode::PAYLOAD_TOO_LARGE,
            "Screenshot exceeds the size limit",
            Some(json!(e.to_string())),
        )
    } else {
        JsonApiError::new(
            StatusCode::BAD_REQUEST,
            "Malformed multipart payload",
            Some(json!(e.to_string())),
        )
    }
}
