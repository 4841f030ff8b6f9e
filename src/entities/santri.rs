use crate::models::SantriStatus;
use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "santri")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    #[sea_orm(unique)]
    pub nis: String,
    pub nama: String,
    pub kelas: String,
    pub asrama: String,
    pub wali: String,
    pub status: SantriStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::transaksi::Entity")]
    Transaksi,
}

impl Related<super::transaksi::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Transaksi.def()
    }
}

// The user side holds the foreign key (users.santri_id).
impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        super::users::Relation::Santri.def().rev()
    }
}

impl ActiveModelBehavior for ActiveModel {}
