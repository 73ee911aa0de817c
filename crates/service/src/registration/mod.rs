pub mod domain;
pub mod repository;
pub mod service;

pub use domain::{NewRegistrationInput, RegistrationView, UploadedArtifact};
pub use repository::{RegistrationRepository, SeaOrmRegistrationRepository};
pub use service::RegistrationService;
