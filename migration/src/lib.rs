pub use sea_orm_migration::prelude::*;

mod m20240301_000001_create_event_table;
mod m20240301_000002_create_donor_table;
mod m20240301_000003_create_speed_run_table;
mod m20240302_000001_create_donation_table;
mod m20240305_000001_create_prize_category_table;
mod m20240305_000002_create_prize_table;
mod m20240305_000003_create_prize_ticket_table;
mod m20240305_000004_create_donor_prize_entry_table;
mod m20240310_000001_create_prize_winner_table;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240301_000001_create_event_table::Migration),
            Box::new(m20240301_000002_create_donor_table::Migration),
            Box::new(m20240301_000003_create_speed_run_table::Migration),
            Box::new(m20240302_000001_create_donation_table::Migration),
            Box::new(m20240305_000001_create_prize_category_table::Migration),
            Box::new(m20240305_000002_create_prize_table::Migration),
            Box::new(m20240305_000003_create_prize_ticket_table::Migration),
            Box::new(m20240305_000004_create_donor_prize_entry_table::Migration),
            Box::new(m20240310_000001_create_prize_winner_table::Migration),
        ]
    }
}
