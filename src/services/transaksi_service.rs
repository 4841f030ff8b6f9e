use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use uuid::Uuid;

use crate::database::DbPool;
use crate::entities::{santri_entity as santri, transaksi_entity as transaksi};
use crate::error::{AppError, AppResult};
use crate::models::{
    CreateTransaksiRequest, JenisTransaksi, StatusTransaksi, TransaksiResponse,
};
use crate::utils::generate_transaction_code;

fn parse_tanggal(value: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| Utc.from_utc_datetime(&dt))
}

#[derive(Clone)]
pub struct TransaksiService {
    pool: DbPool,
}

impl TransaksiService {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub async fn list_transaksi(
        &self,
        jenis: Option<JenisTransaksi>,
    ) -> AppResult<Vec<TransaksiResponse>> {
        let mut query = transaksi::Entity::find()
            .find_also_related(santri::Entity)
            .order_by_desc(transaksi::Column::CreatedAt);

        if let Some(jenis) = jenis {
            query = query.filter(transaksi::Column::Jenis.eq(jenis));
        }

        let rows = query.all(self.pool.as_ref()).await?;

        Ok(rows
            .into_iter()
            .map(|(t, s)| TransaksiResponse::with_santri(t, s.as_ref()))
            .collect())
    }

    /// Records a payment. History is append-only; there is no update or
    /// delete surface for transactions.
    pub async fn create_transaksi(
        &self,
        request: CreateTransaksiRequest,
    ) -> AppResult<TransaksiResponse> {
        let santri_id = request.santri_id.as_deref().unwrap_or("").trim().to_string();
        let jenis_raw = request.jenis.as_deref().unwrap_or("").trim().to_string();

        if santri_id.is_empty() || jenis_raw.is_empty() || request.jumlah.is_none() {
            return Err(AppError::Validation(
                "Missing required fields: santriId, jenis, jumlah".to_string(),
            ));
        }

        let jenis = JenisTransaksi::parse(&jenis_raw).ok_or_else(|| {
            AppError::Validation(
                "Invalid jenis. Must be one of: SPP, SYAHRIAH, UANG_SAKU, LAUNDRY".to_string(),
            )
        })?;

        let jumlah = request.jumlah.unwrap_or(0);
        if jumlah < 0 {
            return Err(AppError::Validation(
                "jumlah must be a non-negative integer".to_string(),
            ));
        }

        let status = match request.status.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            Some(value) => StatusTransaksi::parse(value).ok_or_else(|| {
                AppError::Validation(
                    "Invalid status. Must be one of: LUNAS, PENDING, BELUM_BAYAR, DITOLAK"
                        .to_string(),
                )
            })?,
            None => StatusTransaksi::Lunas,
        };

        let owner = santri::Entity::find_by_id(&santri_id)
            .one(self.pool.as_ref())
            .await?
            .ok_or_else(|| AppError::NotFound("Santri not found".to_string()))?;

        let now = Utc::now();

        let tanggal_bayar = match request.tanggal_bayar.as_deref().filter(|v| !v.is_empty()) {
            Some(value) => Some(parse_tanggal(value).ok_or_else(|| {
                AppError::Validation(
                    "Invalid tanggalBayar. Expected RFC 3339 or YYYY-MM-DD".to_string(),
                )
            })?),
            // A settled payment without an explicit date is dated now.
            None if status == StatusTransaksi::Lunas => Some(now),
            None => None,
        };

        let kode = match request.kode.as_deref().map(str::trim).filter(|k| !k.is_empty()) {
            Some(kode) => kode.to_string(),
            None => generate_transaction_code(jenis.kode_prefix()),
        };

        let created = transaksi::ActiveModel {
            id: Set(Uuid::new_v4().to_string()),
            kode: Set(kode),
            santri_id: Set(santri_id),
            jenis: Set(jenis),
            bulan: Set(request.bulan.filter(|b| !b.is_empty())),
            jenis_laundry: Set(request.jenis_laundry.filter(|j| !j.is_empty())),
            jumlah: Set(jumlah),
            tanggal_bayar: Set(tanggal_bayar),
            status: Set(status),
            created_at: Set(now),
        }
        .insert(self.pool.as_ref())
        .await?;

        Ok(TransaksiResponse::with_santri(created, Some(&owner)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_tanggal_accepts_rfc3339() {
        let parsed = parse_tanggal("2026-01-15T08:30:00+07:00").unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2026, 1, 15, 1, 30, 0).unwrap());
    }

    #[test]
    fn test_parse_tanggal_accepts_bare_date() {
        let parsed = parse_tanggal("2026-01-15").unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2026, 1, 15, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_parse_tanggal_rejects_garbage() {
        assert!(parse_tanggal("15/01/2026").is_none());
        assert!(parse_tanggal("yesterday").is_none());
    }
}
