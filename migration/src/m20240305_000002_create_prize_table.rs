use entity::prize;
use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(prize::Entity)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(prize::Column::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(prize::Column::Name).string_len(64).not_null())
                    .col(ColumnDef::new(prize::Column::EventId).integer().not_null())
                    .col(ColumnDef::new(prize::Column::CategoryId).integer().null())
                    .col(
                        ColumnDef::new(prize::Column::MinimumBid)
                            .big_integer()
                            .not_null()
                            .default(500),
                    )
                    .col(
                        ColumnDef::new(prize::Column::MaximumBid)
                            .big_integer()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(prize::Column::SumDonations)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(prize::Column::RandomDraw)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(prize::Column::TicketDraw)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(prize::Column::MaxWinners)
                            .integer()
                            .not_null()
                            .default(1),
                    )
                    .col(ColumnDef::new(prize::Column::StartRunId).integer().null())
                    .col(ColumnDef::new(prize::Column::EndRunId).integer().null())
                    .col(ColumnDef::new(prize::Column::StartTime).big_integer().null())
                    .col(ColumnDef::new(prize::Column::EndTime).big_integer().null())
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("uq_prize_name_event")
                    .col(prize::Column::Name)
                    .col(prize::Column::EventId)
                    .table(prize::Entity)
                    .unique()
                    .to_owned(),
            )
            .await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("uq_prize_name_event").to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(prize::Entity).to_owned())
            .await
    }
}
