use sea_orm::entity::prelude::*;

/// Tickets bought with a donation for a ticket draw prize

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Default)]
#[sea_orm(table_name = "prize_tickets")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub prize_id: i32,

    pub donation_id: i32,

    /// cents
    pub amount: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
