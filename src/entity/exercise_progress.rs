use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::ledger;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "exercise_progress")]
pub struct Model {
  #[sea_orm(primary_key, auto_increment = false)]
  pub user_id: i64,
  #[sea_orm(primary_key, auto_increment = false)]
  pub exercise_id: i64,
  /// Best score seen so far
  pub score: i32,
  pub attempts: i32,
  pub updated_at: DateTime,
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
