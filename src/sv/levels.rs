use crate::{
  entity::level,
  policy::{Level, LevelTable},
  prelude::*,
};

pub struct Levels<'a> {
  db: &'a DatabaseConnection,
}

impl<'a> Levels<'a> {
  pub fn new(db: &'a DatabaseConnection) -> Self {
    Self { db }
  }

  /// Reads and validates the whole table; an unusable table is a
  /// configuration error, never silently replaced with defaults.
  pub async fn load(&self) -> Result<LevelTable> {
    let rows = level::Entity::find()
      .order_by_asc(level::Column::LevelNumber)
      .all(self.db)
      .await?;

    LevelTable::new(rows.into_iter().map(Level::from).collect())
  }
}

#[cfg(test)]
mod tests {
  use sea_orm::sea_query::Expr;

  use super::*;
  use crate::state::tests::memory_db;

  #[tokio::test]
  async fn test_load_seeded_table() {
    let db = memory_db().await;
    let table = Levels::new(&db).load().await.unwrap();

    assert_eq!(table.all().len(), 8);
    assert_eq!(table.first().title, "Principiante");
  }

  #[tokio::test]
  async fn test_broken_table_is_configuration_error() {
    let db = memory_db().await;

    level::Entity::update_many()
      .col_expr(level::Column::XpRequired, Expr::value(10i64))
      .filter(level::Column::LevelNumber.eq(1))
      .exec(&db)
      .await
      .unwrap();

    assert!(matches!(
      Levels::new(&db).load().await,
      Err(Error::Configuration(_))
    ));
  }
}
