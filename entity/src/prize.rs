use sea_orm::entity::prelude::*;

/// Prizes, with their draw configuration.
///
/// A draw window is given either by a pair of runs or by a pair of explicit
/// timestamps, never both.

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Default)]
#[sea_orm(table_name = "prizes")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub name: String,

    pub event_id: i32,

    pub category_id: Option<i32>,

    /// cents
    pub minimum_bid: i64,
    /// cents, unbounded if not set
    pub maximum_bid: Option<i64>,

    pub sum_donations: bool,
    pub random_draw: bool,
    pub ticket_draw: bool,

    pub max_winners: i32,

    pub start_run_id: Option<i32>,
    pub end_run_id: Option<i32>,

    /// unix seconds
    pub start_time: Option<i64>,
    pub end_time: Option<i64>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
