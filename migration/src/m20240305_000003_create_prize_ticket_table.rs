use entity::prize_ticket;
use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(prize_ticket::Entity)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(prize_ticket::Column::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(prize_ticket::Column::PrizeId)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(prize_ticket::Column::DonationId)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(prize_ticket::Column::Amount)
                            .big_integer()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("uq_prize_ticket_prize_donation")
                    .col(prize_ticket::Column::PrizeId)
                    .col(prize_ticket::Column::DonationId)
                    .table(prize_ticket::Entity)
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
                    .name("uq_prize_ticket_prize_donation")
                    .to_owned(),
            )
            .await?;
        manager
            .drop_table(Table::drop().table(prize_ticket::Entity).to_owned())
            .await
    }
}
