use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "levels")]
pub struct Model {
  #[sea_orm(primary_key)]
  pub id: i32,
  #[sea_orm(unique)]
  pub level_number: i32,
  /// Minimum `xp_total` to enter this level
  pub xp_required: i64,
  pub title: String,
  pub emoji: String,
  pub badge: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
  #[sea_orm(has_many = "super::ledger::Entity")]
  Ledgers,
}

impl Related<super::ledger::Entity> for Entity {
  fn to() -> RelationDef {
    Relation::Ledgers.def()
  }
}

impl ActiveModelBehavior for ActiveModel {}
