use serde::{Deserialize, Serialize};
use uuid::Uuid;

use models::registration::{Model, RegistrationStatus};

/// Raw intake payload. Every field is optional so missing-field reporting
/// can name each absent value instead of failing deserialization outright.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewRegistrationInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub qualification: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub school_or_college_name: Option<String>,
}

/// Payment screenshot as received from the client, prior to acceptance.
#[derive(Debug, Clone)]
pub struct UploadedArtifact {
    pub content_type: String,
    /// Client filename, logged only; storage keys are server-generated.
    pub file_name: Option<String>,
    pub bytes: Vec<u8>,
}

/// Sanitized registrant view returned by the HTTP surface; carries no
/// store-internal fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationView {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub qualification: String,
    pub school_or_college_name: String,
    pub payment_screenshot: String,
    pub status: RegistrationStatus,
    pub registered_at: chrono::DateTime<chrono::FixedOffset>,
}

impl From<Model> for RegistrationView {
    fn from(m: Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
            email: m.email,
            phone: m.phone,
            qualification: m.qualification,
            school_or_college_name: m.school_or_college_name,
            payment_screenshot: m.payment_screenshot,
            status: m.status,
            registered_at: m.registered_at,
        }
    }
}
