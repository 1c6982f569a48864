pub mod ledger;
pub mod levels;
pub mod progress;

pub use ledger::Ledger;
pub use levels::Levels;
pub use progress::Progress;
