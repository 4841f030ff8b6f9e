use actix_web::{HttpResponse, ResponseError, Result, web};

use crate::middlewares::{MaybeSession, require_dashboard_access};
use crate::models::DashboardResponse;
use crate::services::DashboardService;

#[utoipa::path(
    get,
    path = "/api/dashboard",
    tag = "dashboard",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Aggregated dashboard data", body = DashboardResponse),
        (status = 401, description = "No session"),
        (status = 403, description = "Role not allowed on the admin surface")
    )
)]
pub async fn dashboard(
    dashboard_service: web::Data<DashboardService>,
    session: MaybeSession,
) -> Result<HttpResponse> {
    // Denials render in place; the client decides where to navigate.
    if let Err(e) = require_dashboard_access(&session) {
        return Ok(e.error_response());
    }

    match dashboard_service.overview().await {
        Ok(overview) => Ok(HttpResponse::Ok().json(overview)),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn dashboard_config(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/dashboard").route("", web::get().to(dashboard)));
}
