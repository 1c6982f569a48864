use sea_orm_migration::prelude::*;

use super::m20260301_000002_create_user_ledgers::UserLedgers;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
  async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
    manager
      .create_table(
        Table::create()
          .table(GamePlays::Table)
          .if_not_exists()
          .col(ColumnDef::new(GamePlays::Id).uuid().not_null().primary_key())
          .col(ColumnDef::new(GamePlays::UserId).big_integer().not_null())
          .col(ColumnDef::new(GamePlays::GameId).string().not_null())
          .col(ColumnDef::new(GamePlays::Score).big_integer().not_null())
          .col(
            ColumnDef::new(GamePlays::XpEarned)
              .big_integer()
              .not_null()
              .default(0),
          )
          .col(ColumnDef::new(GamePlays::Data).json().null())
          .col(ColumnDef::new(GamePlays::PlayedAt).date_time().not_null())
          .foreign_key(
            ForeignKey::create()
              .name("fk_game_plays_ledger")
              .from(GamePlays::Table, GamePlays::UserId)
              .to(UserLedgers::Table, UserLedgers::UserId)
              .on_delete(ForeignKeyAction::Cascade),
          )
          .to_owned(),
      )
      .await?;

    manager
      .create_index(
        Index::create()
          .name("idx_game_plays_user")
          .table(GamePlays::Table)
          .col(GamePlays::UserId)
          .col(GamePlays::PlayedAt)
          .to_owned(),
      )
      .await
  }

  async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
    manager.drop_table(Table::drop().table(GamePlays::Table).to_owned()).await
  }
}

#[derive(DeriveIden)]
pub enum GamePlays {
  Table,
  Id,
  UserId,
  GameId,
  Score,
  XpEarned,
  Data,
  PlayedAt,
}
