use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::entities::santri_entity as santri;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(None)")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SantriStatus {
    #[sea_orm(string_value = "AKTIF")]
    Aktif,
    #[sea_orm(string_value = "NON_AKTIF")]
    NonAktif,
    #[sea_orm(string_value = "LULUS")]
    Lulus,
    #[sea_orm(string_value = "KELUAR")]
    Keluar,
}

impl SantriStatus {
    /// Parses the status as spreadsheets and forms deliver it; matching is
    /// case-insensitive because imported cells arrive upper-cased already.
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_uppercase().as_str() {
            "AKTIF" => Some(SantriStatus::Aktif),
            "NON_AKTIF" => Some(SantriStatus::NonAktif),
            "LULUS" => Some(SantriStatus::Lulus),
            "KELUAR" => Some(SantriStatus::Keluar),
            _ => None,
        }
    }
}

impl std::fmt::Display for SantriStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SantriStatus::Aktif => write!(f, "AKTIF"),
            SantriStatus::NonAktif => write!(f, "NON_AKTIF"),
            SantriStatus::Lulus => write!(f, "LULUS"),
            SantriStatus::Keluar => write!(f, "KELUAR"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SantriResponse {
    pub id: String,
    pub nis: String,
    pub nama: String,
    pub kelas: String,
    pub asrama: String,
    pub wali: String,
    pub status: SantriStatus,
    /// Email of the linked user account, when one exists.
    pub email: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl SantriResponse {
    pub fn with_email(model: santri::Model, email: Option<String>) -> Self {
        Self {
            id: model.id,
            nis: model.nis,
            nama: model.nama,
            kelas: model.kelas,
            asrama: model.asrama,
            wali: model.wali,
            status: model.status,
            email,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

impl From<santri::Model> for SantriResponse {
    fn from(model: santri::Model) -> Self {
        Self::with_email(model, None)
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateSantriRequest {
    pub nis: Option<String>,
    pub nama: Option<String>,
    pub kelas: Option<String>,
    pub asrama: Option<String>,
    pub wali: Option<String>,
    pub status: Option<String>,
    /// Link to an existing user instead of creating one.
    pub user_id: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UpdateSantriRequest {
    pub nis: Option<String>,
    pub nama: Option<String>,
    pub kelas: Option<String>,
    pub asrama: Option<String>,
    pub wali: Option<String>,
    pub status: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ImportError {
    /// NIS of the row that failed, as resolved by the normalizer.
    pub nis: String,
    pub error: String,
}

/// A row excluded before the create phase because required fields were empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct RejectedRow {
    /// 1-based position in the uploaded sheet.
    pub row: usize,
    pub missing: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ImportSummary {
    pub success: usize,
    pub failed: usize,
    pub results: Vec<SantriResponse>,
    pub errors: Vec<ImportError>,
    pub rejected: Vec<RejectedRow>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_status() {
        assert_eq!(SantriStatus::parse("AKTIF"), Some(SantriStatus::Aktif));
        assert_eq!(SantriStatus::parse("aktif"), Some(SantriStatus::Aktif));
        assert_eq!(
            SantriStatus::parse("NON_AKTIF"),
            Some(SantriStatus::NonAktif)
        );
        assert_eq!(SantriStatus::parse("LULUS"), Some(SantriStatus::Lulus));
        assert_eq!(SantriStatus::parse("KELUAR"), Some(SantriStatus::Keluar));
        assert_eq!(SantriStatus::parse("PINDAH"), None);
    }
}
