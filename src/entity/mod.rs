//! sea-orm entities backing the progress ledger

pub mod exercise_progress;
pub mod game_play;
pub mod ledger;
pub mod lesson_progress;
pub mod level;
pub mod word_progress;
