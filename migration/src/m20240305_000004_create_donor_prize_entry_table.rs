use entity::donor_prize_entry;
use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(donor_prize_entry::Entity)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(donor_prize_entry::Column::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(donor_prize_entry::Column::DonorId)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(donor_prize_entry::Column::PrizeId)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(donor_prize_entry::Column::Weight)
                            .double()
                            .not_null()
                            .default(1.0),
                    )
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("uq_donor_prize_entry_prize_donor")
                    .col(donor_prize_entry::Column::PrizeId)
                    .col(donor_prize_entry::Column::DonorId)
                    .table(donor_prize_entry::Entity)
                    .unique()
                    .to_owned(),
            )
            .await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("uq_donor_prize_entry_prize_donor")
                    .to_owned(),
            )
            .await?;
        manager
            .drop_table(Table::drop().table(donor_prize_entry::Entity).to_owned())
            .await
    }
}
