use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

/// (level_number, xp_required, title, emoji, badge)
const DEFAULT_LEVELS: [(i32, i64, &str, &str, &str); 8] = [
  (1, 0, "Principiante", "🌱", "semilla"),
  (2, 100, "Explorador", "🧭", "brujula"),
  (3, 250, "Aprendiz", "📘", "libro"),
  (4, 500, "Conversador", "💬", "bocadillo"),
  (5, 1000, "Intermedio", "🌟", "estrella"),
  (6, 2000, "Avanzado", "🚀", "cohete"),
  (7, 3500, "Experto", "🏆", "trofeo"),
  (8, 5000, "Maestro", "👑", "corona"),
];

#[async_trait::async_trait]
impl MigrationTrait for Migration {
  async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
    manager
      .create_table(
        Table::create()
          .table(Levels::Table)
          .if_not_exists()
          .col(
            ColumnDef::new(Levels::Id)
              .integer()
              .not_null()
              .auto_increment()
              .primary_key(),
          )
          .col(
            ColumnDef::new(Levels::LevelNumber)
              .integer()
              .not_null()
              .unique_key(),
          )
          .col(
            ColumnDef::new(Levels::XpRequired)
              .big_integer()
              .not_null()
              .default(0),
          )
          .col(ColumnDef::new(Levels::Title).string().not_null())
          .col(ColumnDef::new(Levels::Emoji).string().not_null())
          .col(ColumnDef::new(Levels::Badge).string().null())
          .to_owned(),
      )
      .await?;

    let mut seed = Query::insert()
      .into_table(Levels::Table)
      .columns([
        Levels::LevelNumber,
        Levels::XpRequired,
        Levels::Title,
        Levels::Emoji,
        Levels::Badge,
      ])
      .to_owned();

    for (number, xp, title, emoji, badge) in DEFAULT_LEVELS {
      seed.values_panic([
        number.into(),
        xp.into(),
        title.into(),
        emoji.into(),
        badge.into(),
      ]);
    }

    manager.exec_stmt(seed).await
  }

  async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
    manager.drop_table(Table::drop().table(Levels::Table).to_owned()).await
  }
}

#[derive(DeriveIden)]
pub enum Levels {
  Table,
  Id,
  LevelNumber,
  XpRequired,
  Title,
  Emoji,
  Badge,
}
