use std::collections::BTreeMap;

use chrono::{DateTime, Datelike, TimeZone, Utc};
use sea_orm::{ColumnTrait, EntityTrait, Iterable, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect,
};

use crate::database::DbPool;
use crate::entities::{santri_entity as santri, transaksi_entity as transaksi};
use crate::error::AppResult;
use crate::models::{
    DashboardResponse, DashboardStats, FinancialSummary, JenisTransaksi, MonthlyIncome,
    RecentTransaction, SantriStatus, StatusTransaksi, TypeBreakdown,
};

fn month_start(now: DateTime<Utc>) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(now.year(), now.month(), 1, 0, 0, 0)
        .single()
        .unwrap_or(now)
}

fn year_start(now: DateTime<Utc>) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(now.year(), 1, 1, 0, 0, 0)
        .single()
        .unwrap_or(now)
}

/// Sum of settled amounts created at or after the cutoff. Amounts are i64
/// smallest-denomination units end to end; no floats.
fn income_since(rows: &[transaksi::Model], cutoff: DateTime<Utc>) -> i64 {
    rows.iter()
        .filter(|t| t.status == StatusTransaksi::Lunas && t.created_at >= cutoff)
        .map(|t| t.jumlah)
        .sum()
}

/// Buckets settled income by `YYYY-MM`; the BTreeMap keeps keys ascending.
fn monthly_breakdown(rows: &[transaksi::Model]) -> BTreeMap<String, i64> {
    let mut months = BTreeMap::new();
    for t in rows {
        let key = t.created_at.format("%Y-%m").to_string();
        *months.entry(key).or_insert(0) += t.jumlah;
    }
    months
}

/// Count and total per transaction type, in enum order; absent types are
/// omitted, matching what the dashboard renders.
fn breakdown_by_jenis(rows: &[transaksi::Model]) -> Vec<TypeBreakdown> {
    JenisTransaksi::iter()
        .filter_map(|jenis| {
            let matching: Vec<&transaksi::Model> =
                rows.iter().filter(|t| t.jenis == jenis).collect();
            if matching.is_empty() {
                return None;
            }
            Some(TypeBreakdown {
                jenis,
                count: matching.len() as u64,
                total: matching.iter().map(|t| t.jumlah).sum(),
            })
        })
        .collect()
}

#[derive(Clone)]
pub struct DashboardService {
    pool: DbPool,
}

impl DashboardService {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub async fn overview(&self) -> AppResult<DashboardResponse> {
        let stats = self.stats().await?;
        let recent_transactions = self.recent_transactions().await?;
        let financial_summary = self.financial_summary().await?;

        Ok(DashboardResponse {
            stats,
            recent_transactions,
            financial_summary,
        })
    }

    pub async fn stats(&self) -> AppResult<DashboardStats> {
        let now = Utc::now();
        let cutoff = month_start(now);

        let total_santri = santri::Entity::find()
            .filter(santri::Column::Status.eq(SantriStatus::Aktif))
            .count(self.pool.as_ref())
            .await?;

        let rows = transaksi::Entity::find()
            .filter(transaksi::Column::Status.eq(StatusTransaksi::Lunas))
            .filter(transaksi::Column::CreatedAt.gte(cutoff))
            .all(self.pool.as_ref())
            .await?;
        let income_this_month = income_since(&rows, cutoff);

        let pending_transactions = transaksi::Entity::find()
            .filter(transaksi::Column::Status.eq(StatusTransaksi::Pending))
            .count(self.pool.as_ref())
            .await?;

        Ok(DashboardStats {
            total_santri,
            income_this_month,
            // No expense ledger exists yet; stays zero until one does.
            expenses_this_month: 0,
            pending_transactions,
        })
    }

    pub async fn financial_summary(&self) -> AppResult<FinancialSummary> {
        let now = Utc::now();
        let cutoff = year_start(now);

        let rows = transaksi::Entity::find()
            .filter(transaksi::Column::Status.eq(StatusTransaksi::Lunas))
            .filter(transaksi::Column::CreatedAt.gte(cutoff))
            .all(self.pool.as_ref())
            .await?;

        let total_income = income_since(&rows, cutoff);
        let total_expenses = 0;

        let monthly_income = monthly_breakdown(&rows)
            .into_iter()
            .map(|(month, income)| MonthlyIncome {
                month,
                income,
                expenses: 0,
                balance: income,
            })
            .collect();

        Ok(FinancialSummary {
            total_income,
            total_expenses,
            balance: total_income - total_expenses,
            monthly_income,
            transaction_by_type: breakdown_by_jenis(&rows),
        })
    }

    async fn recent_transactions(&self) -> AppResult<Vec<RecentTransaction>> {
        let rows = transaksi::Entity::find()
            .find_also_related(santri::Entity)
            .order_by_desc(transaksi::Column::CreatedAt)
            .limit(5)
            .all(self.pool.as_ref())
            .await?;

        Ok(rows
            .into_iter()
            .map(|(t, s)| RecentTransaction {
                kode: t.kode,
                nama_santri: s.map(|s| s.nama).unwrap_or_default(),
                jenis: t.jenis,
                jumlah: t.jumlah,
                status: t.status,
                tanggal: t.tanggal_bayar.unwrap_or(t.created_at),
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn row(
        status: StatusTransaksi,
        jenis: JenisTransaksi,
        jumlah: i64,
        created_at: DateTime<Utc>,
    ) -> transaksi::Model {
        transaksi::Model {
            id: uuid::Uuid::new_v4().to_string(),
            kode: "SPP001".to_string(),
            santri_id: "santri-001".to_string(),
            jenis,
            bulan: None,
            jenis_laundry: None,
            jumlah,
            tanggal_bayar: None,
            status,
            created_at,
        }
    }

    #[test]
    fn test_income_counts_only_lunas() {
        let now = Utc::now();
        let cutoff = month_start(now);
        // Ahmad paid 500000 SPP today and still owes a 300000 syahriah.
        let rows = vec![
            row(StatusTransaksi::Lunas, JenisTransaksi::Spp, 500_000, now),
            row(
                StatusTransaksi::BelumBayar,
                JenisTransaksi::Syahriah,
                300_000,
                now,
            ),
        ];

        assert_eq!(income_since(&rows, cutoff), 500_000);
    }

    #[test]
    fn test_income_ignores_rows_before_cutoff() {
        let now = Utc::now();
        let cutoff = now - Duration::days(7);
        let rows = vec![
            row(StatusTransaksi::Lunas, JenisTransaksi::Spp, 500_000, now),
            row(
                StatusTransaksi::Lunas,
                JenisTransaksi::Spp,
                250_000,
                now - Duration::days(30),
            ),
        ];

        assert_eq!(income_since(&rows, cutoff), 500_000);
    }

    #[test]
    fn test_total_income_equals_sum_of_type_totals() {
        let now = Utc::now();
        let rows = vec![
            row(StatusTransaksi::Lunas, JenisTransaksi::Spp, 500_000, now),
            row(StatusTransaksi::Lunas, JenisTransaksi::Spp, 450_000, now),
            row(StatusTransaksi::Lunas, JenisTransaksi::Syahriah, 250_000, now),
            row(StatusTransaksi::Lunas, JenisTransaksi::Laundry, 15_000, now),
        ];

        let total = income_since(&rows, year_start(now));
        let by_type = breakdown_by_jenis(&rows);
        let type_sum: i64 = by_type.iter().map(|b| b.total).sum();

        assert_eq!(total, type_sum);
        assert_eq!(by_type.len(), 3); // UANG_SAKU absent, so omitted
    }

    #[test]
    fn test_monthly_breakdown_buckets_and_sorts() {
        let jan = Utc.with_ymd_and_hms(2026, 1, 10, 0, 0, 0).unwrap();
        let feb = Utc.with_ymd_and_hms(2026, 2, 5, 0, 0, 0).unwrap();
        let rows = vec![
            row(StatusTransaksi::Lunas, JenisTransaksi::Spp, 500_000, feb),
            row(StatusTransaksi::Lunas, JenisTransaksi::Spp, 400_000, jan),
            row(StatusTransaksi::Lunas, JenisTransaksi::Syahriah, 100_000, jan),
        ];

        let months: Vec<(String, i64)> = monthly_breakdown(&rows).into_iter().collect();
        assert_eq!(
            months,
            vec![
                ("2026-01".to_string(), 500_000),
                ("2026-02".to_string(), 500_000),
            ]
        );
    }

    #[test]
    fn test_month_and_year_start() {
        let now = Utc.with_ymd_and_hms(2026, 8, 7, 13, 45, 0).unwrap();
        assert_eq!(
            month_start(now),
            Utc.with_ymd_and_hms(2026, 8, 1, 0, 0, 0).unwrap()
        );
        assert_eq!(
            year_start(now),
            Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap()
        );
    }
}
