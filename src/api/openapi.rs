//! OpenAPI documentation

use axum::Router;
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{auth, bookings, categories, fields, health, schedules, users};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "FieldReserve API",
        version = "1.0.0",
        description = "Sports field reservation REST API",
        license(name = "AGPL-3.0", url = "https://www.gnu.org/licenses/agpl-3.0.html")
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Auth
        auth::register,
        auth::login,
        auth::me,
        // Users
        users::list_users,
        users::get_user,
        users::update_user,
        users::delete_user,
        users::update_role,
        // Categories
        categories::list_categories,
        categories::get_category,
        categories::create_category,
        categories::update_category,
        categories::delete_category,
        // Fields
        fields::list_fields,
        fields::get_field,
        fields::create_field,
        fields::update_field,
        fields::delete_field,
        // Schedules
        schedules::list_schedules,
        schedules::list_field_schedules,
        schedules::get_schedule,
        schedules::create_schedule,
        schedules::update_schedule,
        schedules::delete_schedule,
        // Bookings
        bookings::create_booking,
        bookings::list_bookings,
        bookings::booking_history,
        bookings::get_booking,
        bookings::update_booking_status,
        bookings::cancel_booking,
    ),
    components(
        schemas(
            // Auth
            auth::LoginRequest,
            auth::LoginResponse,
            auth::UserInfo,
            // Users
            crate::models::user::Role,
            crate::models::user::User,
            crate::models::user::UserShort,
            crate::models::user::RegisterUser,
            crate::models::user::UpdateUser,
            crate::models::user::UpdateRole,
            // Categories
            crate::models::category::Category,
            crate::models::category::CreateCategory,
            crate::models::category::UpdateCategory,
            // Fields
            crate::models::field::Field,
            crate::models::field::FieldWithCategory,
            crate::models::field::CreateField,
            crate::models::field::UpdateField,
            // Schedules
            crate::models::schedule::Schedule,
            crate::models::schedule::ScheduleResponse,
            crate::models::schedule::CreateSchedule,
            crate::models::schedule::UpdateSchedule,
            // Bookings
            crate::models::booking::Booking,
            crate::models::booking::BookingStatus,
            crate::models::booking::BookingDetails,
            crate::models::booking::UpdateBookingStatus,
            bookings::CreateBookingForm,
            // Health
            health::StatusReport,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "auth", description = "Registration and login"),
        (name = "users", description = "User management"),
        (name = "categories", description = "Field categories"),
        (name = "fields", description = "Bookable fields"),
        (name = "schedules", description = "Weekly operating hours"),
        (name = "bookings", description = "Reservations and payment verification")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
