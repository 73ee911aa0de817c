use chrono::Utc;
use once_cell::sync::Lazy;
use regex::Regex;
use sea_orm::{entity::prelude::*, DatabaseConnection, QueryOrder, Set, SqlErr};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::ModelError;

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern"));
static PHONE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{10}$").expect("phone pattern"));

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "registration")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub qualification: String,
    pub school_or_college_name: String,
    /// Public path of the payment-evidence artifact; empty until uploaded.
    pub payment_screenshot: String,
    pub status: RegistrationStatus,
    pub registered_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Registrant lifecycle. Transitions only move forward; nothing returns a
/// record to `Pending`.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
#[serde(rename_all = "lowercase")]
pub enum RegistrationStatus {
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "confirmed")]
    Confirmed,
    #[sea_orm(string_value = "cancelled")]
    Cancelled,
}

impl RegistrationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Cancelled => "cancelled",
        }
    }

    /// Terminal states cannot advance further.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Pending)
    }
}

/// Already-normalized fields for a new registrant row.
#[derive(Debug, Clone)]
pub struct NewRegistration {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub qualification: String,
    pub school_or_college_name: String,
}

/// Lowercase + trim, applied before any comparison or storage.
pub fn normalize_email(raw: &str) -> String {
    raw.trim().to_lowercase()
}

pub fn validate_email(email: &str) -> Result<(), ModelError> {
    if EMAIL_RE.is_match(email) {
        Ok(())
    } else {
        Err(ModelError::Validation(format!(
            "please provide a valid email address, got {email:?}"
        )))
    }
}

pub fn validate_phone(phone: &str) -> Result<(), ModelError> {
    if PHONE_RE.is_match(phone) {
        Ok(())
    } else {
        Err(ModelError::Validation(format!(
            "please provide a valid 10-digit phone number, got {phone:?}"
        )))
    }
}

/// Insert a new registrant with `status = pending` and no payment evidence.
/// Uniqueness rests on the store's unique index; a duplicate email surfaces
/// as `ModelError::Conflict`, never as a silent overwrite.
pub async fn create(db: &DatabaseConnection, input: NewRegistration) -> Result<Model, ModelError> {
    validate_email(&input.email)?;
    validate_phone(&input.phone)?;
    if input.name.trim().is_empty() {
        return Err(ModelError::Validation("name is required".into()));
    }

    let email = input.email.clone();
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(input.name),
        email: Set(input.email),
        phone: Set(input.phone),
        qualification: Set(input.qualification),
        school_or_college_name: Set(input.school_or_college_name),
        payment_screenshot: Set(String::new()),
        status: Set(RegistrationStatus::Pending),
        registered_at: Set(Utc::now().into()),
    };
    match am.insert(db).await {
        Ok(model) => Ok(model),
        Err(e) => match e.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => Err(ModelError::Conflict(email)),
            _ => Err(ModelError::Db(e.to_string())),
        },
    }
}

pub async fn find_by_email(
    db: &DatabaseConnection,
    email: &str,
) -> Result<Option<Model>, ModelError> {
    Entity::find()
        .filter(Column::Email.eq(email))
        .one(db)
        .await
        .map_err(|e| ModelError::Db(e.to_string()))
}

/// Find-and-update: attach the artifact reference and advance the status to
/// `confirmed`. Returns `None` when no registrant matches the email. A
/// cancelled registration is never revived.
pub async fn set_payment_evidence(
    db: &DatabaseConnection,
    email: &str,
    screenshot_path: &str,
) -> Result<Option<Model>, ModelError> {
    let Some(found) = find_by_email(db, email).await? else {
        return Ok(None);
    };
    if found.status == RegistrationStatus::Cancelled {
        return Err(ModelError::Validation(format!(
            "registration for {email} is cancelled"
        )));
    }
    let mut am: ActiveModel = found.into();
    am.payment_screenshot = Set(screenshot_path.to_string());
    am.status = Set(RegistrationStatus::Confirmed);
    let updated = am
        .update(db)
        .await
        .map_err(|e| ModelError::Db(e.to_string()))?;
    Ok(Some(updated))
}

/// All registrants, most recently registered first.
pub async fn list_all(db: &DatabaseConnection) -> Result<Vec<Model>, ModelError> {
    Entity::find()
        .order_by_desc(Column::RegisteredAt)
        .all(db)
        .await
        .map_err(|e| ModelError::Db(e.to_string()))
}
