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
          .table(ExerciseProgress::Table)
          .if_not_exists()
          .col(
            ColumnDef::new(ExerciseProgress::UserId).big_integer().not_null(),
          )
          .col(
            ColumnDef::new(ExerciseProgress::ExerciseId)
              .big_integer()
              .not_null(),
          )
          .col(
            ColumnDef::new(ExerciseProgress::Score)
              .integer()
              .not_null()
              .default(0),
          )
          .col(
            ColumnDef::new(ExerciseProgress::Attempts)
              .integer()
              .not_null()
              .default(0),
          )
          .col(
            ColumnDef::new(ExerciseProgress::UpdatedAt).date_time().not_null(),
          )
          .primary_key(
            Index::create()
              .col(ExerciseProgress::UserId)
              .col(ExerciseProgress::ExerciseId),
          )
          .foreign_key(
            ForeignKey::create()
              .name("fk_exercise_progress_ledger")
              .from(ExerciseProgress::Table, ExerciseProgress::UserId)
              .to(UserLedgers::Table, UserLedgers::UserId)
              .on_delete(ForeignKeyAction::Cascade),
          )
          .to_owned(),
      )
      .await
  }

  async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
    manager
      .drop_table(Table::drop().table(ExerciseProgress::Table).to_owned())
      .await
  }
}

#[derive(DeriveIden)]
pub enum ExerciseProgress {
  Table,
  UserId,
  ExerciseId,
  Score,
  Attempts,
  UpdatedAt,
}
