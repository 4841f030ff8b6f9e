use actix_web::{HttpResponse, ResponseError, Result, web};

use crate::error::AppError;
use crate::models::{
    CreateTransaksiRequest, JenisTransaksi, TransaksiQuery, TransaksiResponse,
};
use crate::services::TransaksiService;

#[utoipa::path(
    get,
    path = "/api/transaksi",
    tag = "transaksi",
    params(("jenis" = Option<String>, Query, description = "Filter by type: SPP, SYAHRIAH, UANG_SAKU, LAUNDRY")),
    responses(
        (status = 200, description = "Transactions, newest first", body = [TransaksiResponse]),
        (status = 400, description = "Unknown jenis filter")
    )
)]
pub async fn list_transaksi(
    transaksi_service: web::Data<TransaksiService>,
    query: web::Query<TransaksiQuery>,
) -> Result<HttpResponse> {
    let jenis = match query.into_inner().jenis.filter(|j| !j.is_empty()) {
        Some(raw) => match JenisTransaksi::parse(&raw) {
            Some(jenis) => Some(jenis),
            None => {
                return Ok(AppError::Validation(
                    "Invalid jenis. Must be one of: SPP, SYAHRIAH, UANG_SAKU, LAUNDRY".to_string(),
                )
                .error_response());
            }
        },
        None => None,
    };

    match transaksi_service.list_transaksi(jenis).await {
        Ok(transaksi) => Ok(HttpResponse::Ok().json(transaksi)),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/api/transaksi",
    tag = "transaksi",
    request_body = CreateTransaksiRequest,
    responses(
        (status = 201, description = "Recorded payment", body = TransaksiResponse),
        (status = 400, description = "Missing or invalid fields"),
        (status = 404, description = "Unknown santri")
    )
)]
pub async fn create_transaksi(
    transaksi_service: web::Data<TransaksiService>,
    request: web::Json<CreateTransaksiRequest>,
) -> Result<HttpResponse> {
    match transaksi_service.create_transaksi(request.into_inner()).await {
        Ok(transaksi) => Ok(HttpResponse::Created().json(transaksi)),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn transaksi_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/transaksi")
            .route("", web::get().to(list_transaksi))
            .route("", web::post().to(create_transaksi)),
    );
}
