use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::entities::{santri_entity as santri, transaksi_entity as transaksi};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(None)")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JenisTransaksi {
    #[sea_orm(string_value = "SPP")]
    Spp,
    #[sea_orm(string_value = "SYAHRIAH")]
    Syahriah,
    #[sea_orm(string_value = "UANG_SAKU")]
    UangSaku,
    #[sea_orm(string_value = "LAUNDRY")]
    Laundry,
}

impl JenisTransaksi {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "SPP" => Some(JenisTransaksi::Spp),
            "SYAHRIAH" => Some(JenisTransaksi::Syahriah),
            "UANG_SAKU" => Some(JenisTransaksi::UangSaku),
            "LAUNDRY" => Some(JenisTransaksi::Laundry),
            _ => None,
        }
    }

    /// Prefix used when generating a human-readable transaction code.
    pub fn kode_prefix(&self) -> &'static str {
        match self {
            JenisTransaksi::Spp => "SPP",
            JenisTransaksi::Syahriah => "SYH",
            JenisTransaksi::UangSaku => "US",
            JenisTransaksi::Laundry => "LD",
        }
    }
}

impl std::fmt::Display for JenisTransaksi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JenisTransaksi::Spp => write!(f, "SPP"),
            JenisTransaksi::Syahriah => write!(f, "SYAHRIAH"),
            JenisTransaksi::UangSaku => write!(f, "UANG_SAKU"),
            JenisTransaksi::Laundry => write!(f, "LAUNDRY"),
        }
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(None)")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StatusTransaksi {
    #[sea_orm(string_value = "LUNAS")]
    Lunas,
    #[sea_orm(string_value = "PENDING")]
    Pending,
    #[sea_orm(string_value = "BELUM_BAYAR")]
    BelumBayar,
    #[sea_orm(string_value = "DITOLAK")]
    Ditolak,
}

impl StatusTransaksi {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "LUNAS" => Some(StatusTransaksi::Lunas),
            "PENDING" => Some(StatusTransaksi::Pending),
            "BELUM_BAYAR" => Some(StatusTransaksi::BelumBayar),
            "DITOLAK" => Some(StatusTransaksi::Ditolak),
            _ => None,
        }
    }
}

impl std::fmt::Display for StatusTransaksi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StatusTransaksi::Lunas => write!(f, "LUNAS"),
            StatusTransaksi::Pending => write!(f, "PENDING"),
            StatusTransaksi::BelumBayar => write!(f, "BELUM_BAYAR"),
            StatusTransaksi::Ditolak => write!(f, "DITOLAK"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TransaksiResponse {
    pub id: String,
    pub kode: String,
    pub santri_id: String,
    pub nama_santri: Option<String>,
    pub jenis: JenisTransaksi,
    pub bulan: Option<String>,
    pub jenis_laundry: Option<String>,
    pub jumlah: i64,
    pub tanggal_bayar: Option<DateTime<Utc>>,
    pub status: StatusTransaksi,
    pub created_at: DateTime<Utc>,
}

impl TransaksiResponse {
    pub fn with_santri(model: transaksi::Model, santri: Option<&santri::Model>) -> Self {
        Self {
            id: model.id,
            kode: model.kode,
            santri_id: model.santri_id,
            nama_santri: santri.map(|s| s.nama.clone()),
            jenis: model.jenis,
            bulan: model.bulan,
            jenis_laundry: model.jenis_laundry,
            jumlah: model.jumlah,
            tanggal_bayar: model.tanggal_bayar,
            status: model.status,
            created_at: model.created_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateTransaksiRequest {
    pub santri_id: Option<String>,
    #[schema(example = "SPP")]
    pub jenis: Option<String>,
    pub jumlah: Option<i64>,
    #[schema(example = "Januari 2026")]
    pub bulan: Option<String>,
    pub jenis_laundry: Option<String>,
    /// RFC 3339 timestamp or a bare `YYYY-MM-DD` date.
    pub tanggal_bayar: Option<String>,
    pub status: Option<String>,
    pub kode: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct TransaksiQuery {
    pub jenis: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_jenis() {
        assert_eq!(JenisTransaksi::parse("SPP"), Some(JenisTransaksi::Spp));
        assert_eq!(
            JenisTransaksi::parse("UANG_SAKU"),
            Some(JenisTransaksi::UangSaku)
        );
        assert_eq!(JenisTransaksi::parse("spp"), None);
        assert_eq!(JenisTransaksi::parse("INFAQ"), None);
    }

    #[test]
    fn test_parse_status() {
        assert_eq!(
            StatusTransaksi::parse("BELUM_BAYAR"),
            Some(StatusTransaksi::BelumBayar)
        );
        assert_eq!(StatusTransaksi::parse("LUNAS"), Some(StatusTransaksi::Lunas));
        // BELUM_BAYAR is its own state, not a pending one
        assert_ne!(
            StatusTransaksi::parse("BELUM_BAYAR"),
            Some(StatusTransaksi::Pending)
        );
    }

    #[test]
    fn test_kode_prefixes() {
        assert_eq!(JenisTransaksi::Spp.kode_prefix(), "SPP");
        assert_eq!(JenisTransaksi::Syahriah.kode_prefix(), "SYH");
        assert_eq!(JenisTransaksi::UangSaku.kode_prefix(), "US");
        assert_eq!(JenisTransaksi::Laundry.kode_prefix(), "LD");
    }
}
