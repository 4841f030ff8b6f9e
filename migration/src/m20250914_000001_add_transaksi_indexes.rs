use sea_orm_migration::prelude::*;

#[derive(DeriveIden)]
enum Transaksi {
    Table,
    SantriId,
    Status,
    CreatedAt,
}

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // dashboard aggregation filters on status + created_at, listings on santri_id
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_transaksi_santri_id")
                    .table(Transaksi::Table)
                    .col(Transaksi::SantriId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_transaksi_status_created_at")
                    .table(Transaksi::Table)
                    .col(Transaksi::Status)
                    .col(Transaksi::CreatedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_transaksi_status_created_at")
                    .table(Transaksi::Table)
                    .to_owned(),
            )
            .await?;
        manager
            .drop_index(
                Index::drop()
                    .name("idx_transaksi_santri_id")
                    .table(Transaksi::Table)
                    .to_owned(),
            )
            .await?;
        Ok(())
    }
}
