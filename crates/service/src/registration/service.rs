use std::sync::Arc;

use tracing::{info, instrument, warn};

use crate::errors::ServiceError;
use crate::registration::domain::{NewRegistrationInput, RegistrationView, UploadedArtifact};
use crate::registration::repository::RegistrationRepository;
use crate::storage::UploadStore;
use models::registration::{self, NewRegistration};

/// Content types accepted as payment evidence, with their storage extension.
const ACCEPTED_TYPES: &[(&str, &str)] = &[
    ("image/jpeg", "jpg"),
    ("image/jpg", "jpg"),
    ("image/png", "png"),
];

/// Application service encapsulating the registrant lifecycle: intake,
/// payment evidence, listing. Validation and normalization happen here;
/// atomicity is delegated to the repository.
pub struct RegistrationService<R: RegistrationRepository> {
    repo: Arc<R>,
    uploads: Arc<UploadStore>,
    max_artifact_bytes: usize,
}

impl<R: RegistrationRepository> RegistrationService<R> {
    pub fn new(repo: Arc<R>, uploads: Arc<UploadStore>, max_artifact_bytes: usize) -> Self {
        Self { repo, uploads, max_artifact_bytes }
    }

    /// Validate, normalize and persist a new registrant (`status = pending`,
    /// no payment evidence).
    #[instrument(skip(self, input))]
    pub async fn register(
        &self,
        input: NewRegistrationInput,
    ) -> Result<RegistrationView, ServiceError> {
        let mut missing = Vec::new();
        let name = required_field(&input.name, "name", &mut missing);
        let email = required_field(&input.email, "email", &mut missing);
        let phone = required_field(&input.phone, "phone", &mut missing);
        let qualification = required_field(&input.qualification, "qualification", &mut missing);
        let school_or_college_name =
            required_field(&input.school_or_college_name, "schoolOrCollegeName", &mut missing);
        if !missing.is_empty() {
            return Err(ServiceError::MissingFields(missing));
        }

        let email = registration::normalize_email(&email);
        if registration::validate_email(&email).is_err() {
            return Err(ServiceError::InvalidFormat { field: "email", value: email });
        }
        if registration::validate_phone(&phone).is_err() {
            return Err(ServiceError::InvalidFormat { field: "phone", value: phone });
        }

        let created = self
            .repo
            .insert(NewRegistration { name, email, phone, qualification, school_or_college_name })
            .await?;
        info!(id = %created.id, email = %created.email, "registration created");
        Ok(created.into())
    }

    /// Attach payment evidence to an existing registrant.
    ///
    /// The artifact is validated before any bytes land on disk, then
    /// accepted onto the store; if the owning registrant turns out not to
    /// exist, or the record update fails, the artifact is deleted again so
    /// no orphans remain.
    #[instrument(skip(self, email, artifact))]
    pub async fn attach_payment(
        &self,
        email: &str,
        artifact: Option<UploadedArtifact>,
    ) -> Result<RegistrationView, ServiceError> {
        let email = registration::normalize_email(email);
        if registration::validate_email(&email).is_err() {
            return Err(ServiceError::InvalidFormat { field: "email", value: email });
        }

        let artifact = artifact.ok_or(ServiceError::MissingArtifact)?;
        if artifact.bytes.is_empty() {
            return Err(ServiceError::MissingArtifact);
        }
        let extension = accepted_extension(&artifact.content_type)?;
        if artifact.bytes.len() > self.max_artifact_bytes {
            return Err(ServiceError::ArtifactTooLarge {
                size: artifact.bytes.len(),
                limit: self.max_artifact_bytes,
            });
        }

        let stored = self.uploads.save(&artifact.bytes, extension).await?;
        info!(
            email = %email,
            artifact = %stored.key,
            original = artifact.file_name.as_deref().unwrap_or("<unnamed>"),
            "payment artifact accepted"
        );

        match self.repo.set_payment_evidence(&email, &stored.public_path).await {
            Ok(Some(updated)) => {
                info!(email = %updated.email, status = updated.status.as_str(), "payment evidence attached");
                Ok(updated.into())
            }
            Ok(None) => {
                self.discard(&stored.key).await;
                Err(ServiceError::NotFound(format!("no registration for {email}")))
            }
            Err(e) => {
                self.discard(&stored.key).await;
                Err(e)
            }
        }
    }

    /// All registrants, most recently registered first, as sanitized views.
    pub async fn list_all(&self) -> Result<Vec<RegistrationView>, ServiceError> {
        Ok(self.repo.list_all().await?.into_iter().map(Into::into).collect())
    }

    /// Compensating delete; a cleanup failure is logged, never escalated.
    async fn discard(&self, key: &str) {
        if let Err(e) = self.uploads.remove(key).await {
            warn!(artifact = %key, error = %e, "failed to clean up orphaned artifact");
        }
    }
}

fn required_field(
    value: &Option<String>,
    field: &'static str,
    missing: &mut Vec<String>,
) -> String {
    match value.as_deref().map(str::trim) {
        Some(v) if !v.is_empty() => v.to_string(),
        _ => {
            missing.push(field.to_string());
            String::new()
        }
    }
}

fn accepted_extension(content_type: &str) -> Result<&'static str, ServiceError> {
    ACCEPTED_TYPES
        .iter()
        .find(|(mime, _)| content_type.eq_ignore_ascii_case(mime))
        .map(|(_, ext)| *ext)
        .ok_or_else(|| ServiceError::UnsupportedArtifactType(content_type.to_string()))
}
