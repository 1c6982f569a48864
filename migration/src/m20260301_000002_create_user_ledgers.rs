use sea_orm_migration::prelude::*;

use super::m20260301_000001_create_levels::Levels;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
  async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
    manager
      .create_table(
        Table::create()
          .table(UserLedgers::Table)
          .if_not_exists()
          .col(
            ColumnDef::new(UserLedgers::UserId)
              .big_integer()
              .not_null()
              .primary_key(),
          )
          .col(
            ColumnDef::new(UserLedgers::XpTotal)
              .big_integer()
              .not_null()
              .default(0),
          )
          .col(
            ColumnDef::new(UserLedgers::CurrentLevelId).integer().not_null(),
          )
          .col(
            ColumnDef::new(UserLedgers::StreakDays)
              .integer()
              .not_null()
              .default(1),
          )
          .col(ColumnDef::new(UserLedgers::LastActivityDate).date().not_null())
          .col(
            ColumnDef::new(UserLedgers::TotalStudyTime)
              .big_integer()
              .not_null()
              .default(0),
          )
          .col(ColumnDef::new(UserLedgers::CreatedAt).date_time().not_null())
          .col(ColumnDef::new(UserLedgers::UpdatedAt).date_time().not_null())
          .foreign_key(
            ForeignKey::create()
              .name("fk_user_ledgers_level")
              .from(UserLedgers::Table, UserLedgers::CurrentLevelId)
              .to(Levels::Table, Levels::Id)
              .on_delete(ForeignKeyAction::Restrict),
          )
          .to_owned(),
      )
      .await
  }

  async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
    manager
      .drop_table(Table::drop().table(UserLedgers::Table).to_owned())
      .await
  }
}

#[derive(DeriveIden)]
pub enum UserLedgers {
  Table,
  UserId,
  XpTotal,
  CurrentLevelId,
  StreakDays,
  LastActivityDate,
  TotalStudyTime,
  CreatedAt,
  UpdatedAt,
}
