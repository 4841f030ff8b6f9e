use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::{JenisTransaksi, StatusTransaksi};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    /// Number of santri with status AKTIF.
    pub total_santri: u64,
    /// Sum of LUNAS transaction amounts since the first day of this month.
    pub income_this_month: i64,
    /// Always zero until an expense ledger exists.
    pub expenses_this_month: i64,
    pub pending_transactions: u64,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RecentTransaction {
    pub kode: String,
    pub nama_santri: String,
    pub jenis: JenisTransaksi,
    pub jumlah: i64,
    pub status: StatusTransaksi,
    /// Payment date, falling back to the record's creation time.
    pub tanggal: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyIncome {
    /// `YYYY-MM` bucket key.
    pub month: String,
    pub income: i64,
    pub expenses: i64,
    pub balance: i64,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TypeBreakdown {
    pub jenis: JenisTransaksi,
    pub count: u64,
    pub total: i64,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FinancialSummary {
    pub total_income: i64,
    pub total_expenses: i64,
    pub balance: i64,
    pub monthly_income: Vec<MonthlyIncome>,
    pub transaction_by_type: Vec<TypeBreakdown>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardResponse {
    pub stats: DashboardStats,
    pub recent_transactions: Vec<RecentTransaction>,
    pub financial_summary: FinancialSummary,
}
