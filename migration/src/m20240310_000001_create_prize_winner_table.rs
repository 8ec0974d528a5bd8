use entity::prize_winner;
use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(prize_winner::Entity)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(prize_winner::Column::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(prize_winner::Column::PrizeId)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(prize_winner::Column::DonorId)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(prize_winner::Column::AcceptState)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(prize_winner::Column::ShippingState)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(prize_winner::Column::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(prize_winner::Column::UpdatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;
        // last resort guard against racing draw commits
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("uq_prize_winner_prize_donor")
                    .col(prize_winner::Column::PrizeId)
                    .col(prize_winner::Column::DonorId)
                    .table(prize_winner::Entity)
                    .unique()
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_prize_winner_donor")
                    .col(prize_winner::Column::DonorId)
                    .table(prize_winner::Entity)
                    .to_owned(),
            )
            .await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_prize_winner_donor").to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("uq_prize_winner_prize_donor").to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(prize_winner::Entity).to_owned())
            .await
    }
}
