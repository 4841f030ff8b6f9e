use crate::models::{JenisTransaksi, StatusTransaksi};
use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "transaksi")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub kode: String,
    pub santri_id: String,
    pub jenis: JenisTransaksi,
    pub bulan: Option<String>,
    pub jenis_laundry: Option<String>,
    /// Amount in the smallest currency unit; never negative.
    pub jumlah: i64,
    pub tanggal_bayar: Option<DateTime<Utc>>,
    pub status: StatusTransaksi,
    pub created_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::santri::Entity",
        from = "Column::SantriId",
        to = "super::santri::Column::Id"
    )]
    Santri,
}

impl Related<super::santri::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Santri.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
