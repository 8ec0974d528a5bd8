use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(EnumIter, DeriveActiveEnum, Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[sea_orm(rs_type = "i32", db_type = "Integer")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AcceptState {
    #[default]
    Pending = 0,
    Accepted = 1,
    Declined = 2,
}

impl AcceptState {
    /// Pending and accepted winners hold a winner slot.
    pub fn is_active(&self) -> bool {
        matches!(self, AcceptState::Pending | AcceptState::Accepted)
    }
}

#[derive(EnumIter, DeriveActiveEnum, Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[sea_orm(rs_type = "i32", db_type = "Integer")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ShippingState {
    #[default]
    Pending = 0,
    Shipped = 1,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Default)]
#[sea_orm(table_name = "prize_winners")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub prize_id: i32,

    pub donor_id: i32,

    pub accept_state: AcceptState,

    pub shipping_state: ShippingState,

    /// data create time
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
