use actix_web::{HttpResponse, ResponseError, Result, web};

use crate::error::AppError;
use crate::middlewares::{MaybeSession, require_dashboard_access};
use crate::models::{
    CreateUserRequest, IdQuery, MessageResponse, UpdateUserRequest, UserResponse,
};
use crate::services::UserService;

#[utoipa::path(
    get,
    path = "/api/users",
    tag = "users",
    responses(
        (status = 200, description = "All users, newest first", body = [UserResponse])
    )
)]
pub async fn list_users(user_service: web::Data<UserService>) -> Result<HttpResponse> {
    match user_service.list_users().await {
        Ok(users) => Ok(HttpResponse::Ok().json(users)),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/api/users",
    tag = "users",
    request_body = CreateUserRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 201, description = "Created user", body = UserResponse),
        (status = 400, description = "Missing fields or invalid role"),
        (status = 401, description = "No session"),
        (status = 403, description = "Role not allowed on the admin surface"),
        (status = 409, description = "Email already exists")
    )
)]
pub async fn create_user(
    user_service: web::Data<UserService>,
    session: MaybeSession,
    request: web::Json<CreateUserRequest>,
) -> Result<HttpResponse> {
    if let Err(e) = require_dashboard_access(&session) {
        return Ok(e.error_response());
    }

    match user_service.create_user(request.into_inner()).await {
        Ok(user) => Ok(HttpResponse::Created().json(user)),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    put,
    path = "/api/users",
    tag = "users",
    params(("id" = String, Query, description = "User id")),
    request_body = UpdateUserRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Updated user", body = UserResponse),
        (status = 401, description = "No session"),
        (status = 403, description = "Role not allowed on the admin surface"),
        (status = 404, description = "Unknown user id"),
        (status = 409, description = "Email already exists")
    )
)]
pub async fn update_user(
    user_service: web::Data<UserService>,
    session: MaybeSession,
    query: web::Query<IdQuery>,
    request: web::Json<UpdateUserRequest>,
) -> Result<HttpResponse> {
    if let Err(e) = require_dashboard_access(&session) {
        return Ok(e.error_response());
    }

    let Some(id) = query.into_inner().id.filter(|id| !id.is_empty()) else {
        return Ok(AppError::Validation("Missing user id".to_string()).error_response());
    };

    match user_service.update_user(&id, request.into_inner()).await {
        Ok(user) => Ok(HttpResponse::Ok().json(user)),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    delete,
    path = "/api/users",
    tag = "users",
    params(("id" = String, Query, description = "User id")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "User removed", body = MessageResponse),
        (status = 401, description = "No session"),
        (status = 403, description = "Role not allowed on the admin surface"),
        (status = 404, description = "Unknown user id")
    )
)]
pub async fn delete_user(
    user_service: web::Data<UserService>,
    session: MaybeSession,
    query: web::Query<IdQuery>,
) -> Result<HttpResponse> {
    if let Err(e) = require_dashboard_access(&session) {
        return Ok(e.error_response());
    }

    let Some(id) = query.into_inner().id.filter(|id| !id.is_empty()) else {
        return Ok(AppError::Validation("Missing user id".to_string()).error_response());
    };

    match user_service.delete_user(&id).await {
        Ok(()) => Ok(HttpResponse::Ok().json(MessageResponse::new("User deleted successfully"))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn users_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/users")
            .route("", web::get().to(list_users))
            .route("", web::post().to(create_user))
            .route("", web::put().to(update_user))
            .route("", web::delete().to(delete_user)),
    );
}
