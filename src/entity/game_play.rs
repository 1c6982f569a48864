use json::Value;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::ledger;

/// One finished game; rows are only ever inserted
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "game_plays")]
pub struct Model {
  #[sea_orm(primary_key, auto_increment = false)]
  pub id: Uuid,
  pub user_id: i64,
  pub game_id: String,
  pub score: i64,
  pub xp_earned: i64,
  /// game specific payload
  pub data: Option<Value>,
  pub played_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
  #[sea_orm(
    belongs_to = "ledger::Entity",
    from = "Column::UserId",
    to = "ledger::Column::UserId"
  )]
  Ledger,
}

impl Related<ledger::Entity> for Entity {
  fn to() -> RelationDef {
    Relation::Ledger.def()
  }
}

impl ActiveModelBehavior for ActiveModel {}
