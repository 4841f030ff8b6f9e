use actix_web::{HttpRequest, HttpResponse, ResponseError, Result, web};
use serde_json::json;

use crate::error::AppError;
use crate::middlewares::{MaybeSession, session_token};
use crate::models::{AuthResponse, LoginRequest, MessageResponse, RegisterRequest, UserResponse};
use crate::services::AuthService;

fn client_info(req: &HttpRequest) -> (Option<String>, Option<String>) {
    let ip_address = req
        .connection_info()
        .realip_remote_addr()
        .map(str::to_string);
    let user_agent = req
        .headers()
        .get(actix_web::http::header::USER_AGENT)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);
    (ip_address, user_agent)
}

#[utoipa::path(
    post,
    path = "/api/auth/register",
    tag = "auth",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created and session opened", body = AuthResponse),
        (status = 400, description = "Invalid input or email already registered")
    )
)]
pub async fn register(
    auth_service: web::Data<AuthService>,
    req: HttpRequest,
    request: web::Json<RegisterRequest>,
) -> Result<HttpResponse> {
    let (ip_address, user_agent) = client_info(&req);
    match auth_service
        .register(request.into_inner(), ip_address, user_agent)
        .await
    {
        Ok(response) => Ok(HttpResponse::Created().json(response)),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Session opened", body = AuthResponse),
        (status = 401, description = "Unknown email or wrong password")
    )
)]
pub async fn login(
    auth_service: web::Data<AuthService>,
    req: HttpRequest,
    request: web::Json<LoginRequest>,
) -> Result<HttpResponse> {
    let (ip_address, user_agent) = client_info(&req);
    match auth_service
        .login(request.into_inner(), ip_address, user_agent)
        .await
    {
        Ok(response) => Ok(HttpResponse::Ok().json(response)),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/api/auth/logout",
    tag = "auth",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Session closed", body = MessageResponse),
        (status = 401, description = "No session token presented")
    )
)]
pub async fn logout(auth_service: web::Data<AuthService>, req: HttpRequest) -> Result<HttpResponse> {
    let Some(token) = session_token(&req) else {
        return Ok(
            AppError::Unauthenticated("Missing session token".to_string()).error_response(),
        );
    };

    match auth_service.logout(&token).await {
        Ok(()) => Ok(HttpResponse::Ok().json(MessageResponse::new("Logged out"))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/api/auth/session",
    tag = "auth",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Current session user", body = UserResponse),
        (status = 401, description = "No live session")
    )
)]
pub async fn session(session: MaybeSession) -> Result<HttpResponse> {
    match session.0 {
        Some(user) => Ok(HttpResponse::Ok().json(json!({ "user": UserResponse::from(user) }))),
        None => Ok(
            AppError::Unauthenticated("Unauthorized - Please login".to_string()).error_response(),
        ),
    }
}

pub fn auth_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/auth")
            .route("/register", web::post().to(register))
            .route("/login", web::post().to(login))
            .route("/logout", web::post().to(logout))
            .route("/session", web::get().to(session)),
    );
}
