use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::level;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "user_ledgers")]
pub struct Model {
  #[sea_orm(primary_key, auto_increment = false)]
  pub user_id: i64,
  pub xp_total: i64,
  pub current_level_id: i32,
  pub streak_days: i32,
  pub last_activity_date: Date,
  /// seconds
  pub total_study_time: i64,
  pub created_at: DateTime,
  pub updated_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
  #[sea_orm(
    belongs_to = "level::Entity",
    from = "Column::CurrentLevelId",
    to = "level::Column::Id"
  )]
  Level,
}

impl Related<level::Entity> for Entity {
  fn to() -> RelationDef {
    Relation::Level.def()
  }
}

impl ActiveModelBehavior for ActiveModel {}
