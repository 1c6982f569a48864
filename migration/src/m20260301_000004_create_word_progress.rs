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
          .table(WordProgress::Table)
          .if_not_exists()
          .col(ColumnDef::new(WordProgress::UserId).big_integer().not_null())
          .col(ColumnDef::new(WordProgress::WordId).big_integer().not_null())
          .col(
            ColumnDef::new(WordProgress::TimesReviewed)
              .integer()
              .not_null()
              .default(0),
          )
          .col(
            ColumnDef::new(WordProgress::MasteryLevel)
              .integer()
              .not_null()
              .default(1),
          )
          .col(
            ColumnDef::new(WordProgress::LastReviewed).date_time().not_null(),
          )
          .primary_key(
            Index::create().col(WordProgress::UserId).col(WordProgress::WordId),
          )
          .foreign_key(
            ForeignKey::create()
              .name("fk_word_progress_ledger")
              .from(WordProgress::Table, WordProgress::UserId)
              .to(UserLedgers::Table, UserLedgers::UserId)
              .on_delete(ForeignKeyAction::Cascade),
          )
          .to_owned(),
      )
      .await
  }

  async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
    manager
      .drop_table(Table::drop().table(WordProgress::Table).to_owned())
      .await
  }
}

#[derive(DeriveIden)]
pub enum WordProgress {
  Table,
  UserId,
  WordId,
  TimesReviewed,
  MasteryLevel,
  LastReviewed,
}
