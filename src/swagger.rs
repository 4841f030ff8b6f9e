use actix_web::web;
use utoipa::OpenApi;
use utoipa::{
    Modify,
    openapi::security::{Http, HttpAuthScheme, SecurityScheme},
};
use utoipa_swagger_ui::SwaggerUi;

use crate::handlers;
use crate::models::*;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.as_mut().unwrap();
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
        )
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::auth::register,
        handlers::auth::login,
        handlers::auth::logout,
        handlers::auth::session,
        handlers::users::list_users,
        handlers::users::create_user,
        handlers::users::update_user,
        handlers::users::delete_user,
        handlers::santri::list_santri,
        handlers::santri::create_santri,
        handlers::santri::update_santri,
        handlers::santri::delete_santri,
        handlers::transaksi::list_transaksi,
        handlers::transaksi::create_transaksi,
        handlers::dashboard::dashboard,
    ),
    components(
        schemas(
            UserRole,
            UserResponse,
            CreateUserRequest,
            UpdateUserRequest,
            RegisterRequest,
            LoginRequest,
            AuthResponse,
            SantriStatus,
            SantriResponse,
            CreateSantriRequest,
            UpdateSantriRequest,
            ImportError,
            RejectedRow,
            ImportSummary,
            JenisTransaksi,
            StatusTransaksi,
            TransaksiResponse,
            CreateTransaksiRequest,
            DashboardStats,
            RecentTransaction,
            MonthlyIncome,
            TypeBreakdown,
            FinancialSummary,
            DashboardResponse,
            MessageResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "auth", description = "Session management"),
        (name = "users", description = "User administration"),
        (name = "santri", description = "Santri administration and bulk import"),
        (name = "transaksi", description = "Payment records"),
        (name = "dashboard", description = "Aggregated statistics"),
    )
)]
pub struct ApiDoc;

pub fn swagger_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()),
    );
}
