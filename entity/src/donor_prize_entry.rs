use sea_orm::entity::prelude::*;

/// Manually granted entries, weight is a multiple of the prize minimum bid

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Default)]
#[sea_orm(table_name = "donor_prize_entries")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub donor_id: i32,

    pub prize_id: i32,

    pub weight: f64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
