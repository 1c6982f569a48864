use sea_orm::{ConnectOptions, Database};
use tokio::sync::Mutex;

use crate::{
  clock::{Clock, SystemClock},
  policy::LevelTable,
  prelude::*,
  sv,
};
use migration::{Migrator, MigratorTrait};

#[derive(Debug, Clone)]
pub struct Config {
  /// Upper bound for one ledger update, lock wait included
  pub ledger_timeout: Duration,
  pub lock_gc_interval: Duration,
  /// First delay before a crashed plugin is restarted; doubles per restart
  pub restart_delay: Duration,
}

impl Default for Config {
  fn default() -> Self {
    Self {
      ledger_timeout: Duration::from_secs(5),
      lock_gc_interval: Duration::from_secs(60),
      restart_delay: Duration::from_secs(5),
    }
  }
}

impl Config {
  pub fn from_env() -> anyhow::Result<Self> {
    let default = Self::default();
    Ok(Self {
      ledger_timeout: utils::parse_duration_env(
        "LEDGER_TIMEOUT",
        default.ledger_timeout,
      )?,
      lock_gc_interval: utils::parse_duration_env(
        "LOCK_GC_INTERVAL",
        default.lock_gc_interval,
      )?,
      restart_delay: utils::parse_duration_env(
        "PLUGIN_RESTART_DELAY",
        default.restart_delay,
      )?,
    })
  }
}

/// One async mutex per user with an update in flight.
///
/// Writers for the same user queue up here before they open a database
/// transaction; different users never share a lock.
#[derive(Default)]
pub struct UserLocks(DashMap<i64, Arc<Mutex<()>>>);

impl UserLocks {
  pub fn handle(&self, user_id: i64) -> Arc<Mutex<()>> {
    self.0.entry(user_id).or_default().clone()
  }

  /// Drops locks nobody holds or waits on.
  pub fn gc(&self) {
    self.0.retain(|_, lock| Arc::strong_count(lock) > 1);
  }

  pub fn len(&self) -> usize {
    self.0.len()
  }
}

pub struct Services<'a> {
  pub ledger: sv::Ledger<'a>,
  pub progress: sv::Progress<'a>,
}

pub struct AppState {
  pub db: DatabaseConnection,
  /// Loaded once at startup; edits need a restart
  pub levels: LevelTable,
  pub clock: Arc<dyn Clock>,
  pub locks: UserLocks,
  pub config: Config,
}

impl AppState {
  pub async fn new(db_url: &str, config: Config) -> anyhow::Result<Self> {
    info!("Connecting to database...");
    let mut options = ConnectOptions::new(db_url);
    options.sqlx_logging(false);
    let db = Database::connect(options)
      .await
      .context("Failed to connect to database")?;

    info!("Running migrations...");
    Migrator::up(&db, None).await.context("Failed to run migrations")?;

    let state = Self::with_db(db, config, Arc::new(SystemClock)).await?;
    Ok(state)
  }

  pub async fn with_db(
    db: DatabaseConnection,
    config: Config,
    clock: Arc<dyn Clock>,
  ) -> Result<Self> {
    let levels = sv::Levels::new(&db).load().await?;
    info!("Loaded {} levels", levels.all().len());

    Ok(Self { db, levels, clock, locks: UserLocks::default(), config })
  }

  pub fn sv(&self) -> Services<'_> {
    Services {
      ledger: sv::Ledger::new(
        &self.db,
        &self.levels,
        self.clock.as_ref(),
        &self.locks,
        self.config.ledger_timeout,
      ),
      progress: sv::Progress::new(&self.db),
    }
  }

  pub fn gc_locks(&self) {
    let before = self.locks.len();
    self.locks.gc();
    let dropped = before.saturating_sub(self.locks.len());
    if dropped > 0 {
      debug!("Dropped {dropped} idle user locks");
    }
  }
}
