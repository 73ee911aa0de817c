use async_trait::async_trait;
use sea_orm::DatabaseConnection;

use crate::errors::ServiceError;
use models::registration::{self, Model, NewRegistration};

#[async_trait]
pub trait RegistrationRepository: Send + Sync {
    /// Insert-if-absent; the store's unique-email constraint supplies the
    /// mutual exclusion between concurrent sign-ups.
    async fn insert(&self, input: NewRegistration) -> Result<Model, ServiceError>;
    /// Find-and-update scoped to a single row; `None` when the email has no
    /// matching registrant.
    async fn set_payment_evidence(
        &self,
        email: &str,
        screenshot_path: &str,
    ) -> Result<Option<Model>, ServiceError>;
    async fn list_all(&self) -> Result<Vec<Model>, ServiceError>;
}

/// SeaORM-backed repository implementation.
pub struct SeaOrmRegistrationRepository {
    pub db: DatabaseConnection,
}

#[async_trait]
impl RegistrationRepository for SeaOrmRegistrationRepository {
    async fn insert(&self, input: NewRegistration) -> Result<Model, ServiceError> {
        Ok(registration::create(&self.db, input).await?)
    }

    async fn set_payment_evidence(
        &self,
        email: &str,
        screenshot_path: &str,
    ) -> Result<Option<Model>, ServiceError> {
        Ok(registration::set_payment_evidence(&self.db, email, screenshot_path).await?)
    }

    async fn list_all(&self) -> Result<Vec<Model>, ServiceError> {
        Ok(registration::list_all(&self.db).await?)
    }
}
