use utoipa::OpenApi;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
    pub database: String,
}

#[derive(ToSchema)]
#[schema(rename_all = "camelCase")]
pub struct NewRegistrationDoc {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub qualification: String,
    pub school_or_college_name: String,
}

#[derive(ToSchema)]
#[schema(rename_all = "camelCase")]
pub struct RegistrationViewDoc {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub qualification: String,
    pub school_or_college_name: String,
    pub payment_screenshot: String,
    /// `pending`, `confirmed` or `cancelled`.
    pub status: String,
    pub registered_at: String,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::registrations::create,
        crate::routes::registrations::list_all,
        crate::routes::uploads::attach_payment,
        crate::routes::admin::get_users,
    ),
    components(
        schemas(
            HealthResponse,
            NewRegistrationDoc,
            RegistrationViewDoc,
        )
    ),
    tags(
        (name = "health"),
        (name = "registrations"),
        (name = "payment"),
        (name = "admin")
    )
)]
pub struct ApiDoc;
