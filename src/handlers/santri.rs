use actix_web::{HttpResponse, ResponseError, Result, web};

use crate::error::AppError;
use crate::models::{
    CreateSantriRequest, IdQuery, ImportSummary, MessageResponse, SantriResponse,
    UpdateSantriRequest,
};
use crate::services::SantriService;

#[utoipa::path(
    get,
    path = "/api/santri",
    tag = "santri",
    responses(
        (status = 200, description = "All santri, newest first", body = [SantriResponse])
    )
)]
pub async fn list_santri(santri_service: web::Data<SantriService>) -> Result<HttpResponse> {
    match santri_service.list_santri().await {
        Ok(santri) => Ok(HttpResponse::Ok().json(santri)),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/api/santri",
    tag = "santri",
    request_body = CreateSantriRequest,
    responses(
        (status = 201, description = "Created santri, or an import summary for bulk bodies", body = ImportSummary),
        (status = 400, description = "Missing fields or duplicate nis/email")
    )
)]
pub async fn create_santri(
    santri_service: web::Data<SantriService>,
    body: web::Json<serde_json::Value>,
) -> Result<HttpResponse> {
    let body = body.into_inner();

    // `{ "bulk": true, "santri": [...] }` routes to the spreadsheet import.
    if body.get("bulk").and_then(|v| v.as_bool()).unwrap_or(false) {
        let Some(rows) = body.get("santri").and_then(|v| v.as_array()) else {
            return Ok(AppError::Validation(
                "Bulk import requires a santri array".to_string(),
            )
            .error_response());
        };

        return match santri_service.import_santri(rows).await {
            Ok(summary) => Ok(HttpResponse::Created().json(summary)),
            Err(e) => Ok(e.error_response()),
        };
    }

    let request: CreateSantriRequest = match serde_json::from_value(body) {
        Ok(request) => request,
        Err(_) => {
            return Ok(AppError::Validation("Missing required fields".to_string()).error_response());
        }
    };

    match santri_service.create_santri(request).await {
        Ok(santri) => Ok(HttpResponse::Created().json(santri)),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    put,
    path = "/api/santri",
    tag = "santri",
    params(("id" = String, Query, description = "Santri id")),
    request_body = UpdateSantriRequest,
    responses(
        (status = 200, description = "Updated santri", body = SantriResponse),
        (status = 400, description = "Duplicate nis/email or invalid field"),
        (status = 404, description = "Unknown santri id")
    )
)]
pub async fn update_santri(
    santri_service: web::Data<SantriService>,
    query: web::Query<IdQuery>,
    request: web::Json<UpdateSantriRequest>,
) -> Result<HttpResponse> {
    let Some(id) = query.into_inner().id.filter(|id| !id.is_empty()) else {
        return Ok(AppError::Validation("Missing santri id".to_string()).error_response());
    };

    match santri_service.update_santri(&id, request.into_inner()).await {
        Ok(santri) => Ok(HttpResponse::Ok().json(santri)),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    delete,
    path = "/api/santri",
    tag = "santri",
    params(("id" = String, Query, description = "Santri id")),
    responses(
        (status = 200, description = "Santri removed", body = MessageResponse),
        (status = 404, description = "Unknown santri id"),
        (status = 409, description = "Owned transactions block the delete under the restrict policy")
    )
)]
pub async fn delete_santri(
    santri_service: web::Data<SantriService>,
    query: web::Query<IdQuery>,
) -> Result<HttpResponse> {
    let Some(id) = query.into_inner().id.filter(|id| !id.is_empty()) else {
        return Ok(AppError::Validation("Missing santri id".to_string()).error_response());
    };

    match santri_service.delete_santri(&id).await {
        Ok(()) => Ok(HttpResponse::Ok().json(MessageResponse::new("Santri deleted successfully"))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn santri_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/santri")
            .route("", web::get().to(list_santri))
            .route("", web::post().to(create_santri))
            .route("", web::put().to(update_santri))
            .route("", web::delete().to(delete_santri)),
    );
}
