//! Schema migrations for the progress ledger

pub use sea_orm_migration::prelude::*;

mod m20260301_000001_create_levels;
mod m20260301_000002_create_user_ledgers;
mod m20260301_000003_create_lesson_progress;
mod m20260301_000004_create_word_progress;
mod m20260301_000005_create_exercise_progress;
mod m20260301_000006_create_game_plays;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
  fn migrations() -> Vec<Box<dyn MigrationTrait>> {
    vec![
      Box::new(m20260301_000001_create_levels::Migration),
      Box::new(m20260301_000002_create_user_ledgers::Migration),
      Box::new(m20260301_000003_create_lesson_progress::Migration),
      Box::new(m20260301_000004_create_word_progress::Migration),
      Box::new(m20260301_000005_create_exercise_progress::Migration),
      Box::new(m20260301_000006_create_game_plays::Migration),
    ]
  }
}
