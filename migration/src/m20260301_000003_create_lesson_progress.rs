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
          .table(LessonProgress::Table)
          .if_not_exists()
          .col(ColumnDef::new(LessonProgress::UserId).big_integer().not_null())
          .col(
            ColumnDef::new(LessonProgress::LessonId).big_integer().not_null(),
          )
          .col(
            ColumnDef::new(LessonProgress::ProgressPercentage)
              .integer()
              .not_null()
              .default(0),
          )
          .col(ColumnDef::new(LessonProgress::CompletedAt).date_time().null())
          .col(ColumnDef::new(LessonProgress::UpdatedAt).date_time().not_null())
          .primary_key(
            Index::create()
              .col(LessonProgress::UserId)
              .col(LessonProgress::LessonId),
          )
          .foreign_key(
            ForeignKey::create()
              .name("fk_lesson_progress_ledger")
              .from(LessonProgress::Table, LessonProgress::UserId)
              .to(UserLedgers::Table, UserLedgers::UserId)
              .on_delete(ForeignKeyAction::Cascade),
          )
          .to_owned(),
      )
      .await
  }

  async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
    manager
      .drop_table(Table::drop().table(LessonProgress::Table).to_owned())
      .await
  }
}

#[derive(DeriveIden)]
pub enum LessonProgress {
  Table,
  UserId,
  LessonId,
  ProgressPercentage,
  CompletedAt,
  UpdatedAt,
}
