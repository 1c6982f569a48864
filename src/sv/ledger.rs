use sea_orm::{ConnectionTrait, sea_query::Expr};
use serde::Serialize;

use crate::{
  clock::Clock,
  entity::ledger,
  policy::{
    CalendarDay, Level, LevelTable, apply_leveling, apply_streak, streak,
    streak_calendar, xp_progress_percent,
  },
  prelude::*,
  report::ActivityReport,
  state::UserLocks,
  sv::progress,
};

/// Outcome of one recorded activity.
#[derive(Debug, Clone, Serialize)]
pub struct LedgerSnapshot {
  pub user_id: i64,
  pub xp_earned: i64,
  pub new_xp_total: i64,
  pub leveled_up: bool,
  pub new_level: Level,
  pub new_streak: i32,
  pub total_study_time: i64,
}

/// Read-only projection for dashboards; structured data only.
#[derive(Debug, Clone, Serialize)]
pub struct LedgerView {
  pub user_id: i64,
  pub xp_total: i64,
  pub level: Level,
  pub next_level: Option<Level>,
  pub xp_to_next_level: Option<i64>,
  pub xp_progress_percent: f64,
  pub streak_days: i32,
  pub streak_alive: bool,
  pub last_activity_date: Date,
  pub streak_calendar: [CalendarDay; 7],
  /// seconds
  pub total_study_time: i64,
  pub total_study_minutes: i64,
  pub study_time: String,
}

pub struct Ledger<'a> {
  db: &'a DatabaseConnection,
  levels: &'a LevelTable,
  clock: &'a dyn Clock,
  locks: &'a UserLocks,
  timeout: Duration,
}

impl<'a> Ledger<'a> {
  pub fn new(
    db: &'a DatabaseConnection,
    levels: &'a LevelTable,
    clock: &'a dyn Clock,
    locks: &'a UserLocks,
    timeout: Duration,
  ) -> Self {
    Self { db, levels, clock, locks, timeout }
  }

  /// Applies one activity report atomically.
  ///
  /// Not idempotent: the same report sent twice is credited twice, callers
  /// that retry must deduplicate themselves.
  pub async fn record(
    &self,
    report: &ActivityReport,
  ) -> Result<LedgerSnapshot> {
    report.validate()?;

    let lock = self.locks.handle(report.user_id);
    let update = async {
      let _guard = lock.lock().await;
      self.apply(report).await
    };

    match time::timeout(self.timeout, update).await {
      Ok(snapshot) => snapshot,
      Err(_) => {
        // dropping the future dropped the open transaction with it
        warn!(
          user_id = report.user_id,
          kind = report.activity.kind(),
          "Ledger update timed out, rolled back"
        );
        Err(Persistence::Timeout(self.timeout).into())
      }
    }
  }

  async fn apply(&self, report: &ActivityReport) -> Result<LedgerSnapshot> {
    let now = self.clock.now();
    let today = now.date();

    let txn = self.db.begin().await?;

    // write first so the store hands this transaction the row lock
    // before anything is read
    ledger::Entity::update_many()
      .col_expr(
        ledger::Column::UserId,
        Expr::col(ledger::Column::UserId).into(),
      )
      .filter(ledger::Column::UserId.eq(report.user_id))
      .exec(&txn)
      .await?;

    let ledger = match ledger::Entity::find_by_id(report.user_id)
      .one(&txn)
      .await?
    {
      Some(ledger) => ledger,
      None => open(&txn, self.levels, report.user_id, now).await?,
    };

    let new_streak =
      apply_streak(ledger.last_activity_date, today, ledger.streak_days);
    let new_xp_total =
      ledger.xp_total.checked_add(report.xp_earned).ok_or_else(|| {
        Error::validation(format!(
          "xp_earned {} overflows the ledger total",
          report.xp_earned
        ))
      })?;
    let (level_id, leveled_up) =
      apply_leveling(self.levels, ledger.current_level_id, new_xp_total)?;
    let total_study_time = ledger
      .total_study_time
      .checked_add(report.study_time_delta)
      .ok_or_else(|| {
        Error::validation(format!(
          "study_time_delta {} overflows the ledger total",
          report.study_time_delta
        ))
      })?;

    ledger::ActiveModel {
      xp_total: Set(new_xp_total),
      current_level_id: Set(level_id),
      streak_days: Set(new_streak),
      last_activity_date: Set(today),
      total_study_time: Set(total_study_time),
      updated_at: Set(now),
      ..ledger.into()
    }
    .update(&txn)
    .await?;

    progress::record_item(&txn, report, now).await?;

    txn.commit().await?;

    let new_level = self.level(level_id)?.clone();
    if leveled_up {
      info!(
        user_id = report.user_id,
        level = new_level.number,
        "Level up: {} {}",
        new_level.emoji,
        new_level.title
      );
    }
    debug!(
      user_id = report.user_id,
      kind = report.activity.kind(),
      xp = report.xp_earned,
      new_xp_total,
      new_streak,
      "Activity recorded"
    );

    Ok(LedgerSnapshot {
      user_id: report.user_id,
      xp_earned: report.xp_earned,
      new_xp_total,
      leveled_up,
      new_level,
      new_streak,
      total_study_time,
    })
  }

  /// Current ledger projection. Without `create` a user with no ledger is
  /// `Error::NotFound`, distinct from a real zero-XP ledger.
  pub async fn view(&self, user_id: i64, create: bool) -> Result<LedgerView> {
    let ledger = match ledger::Entity::find_by_id(user_id).one(self.db).await? {
      Some(ledger) => ledger,
      None if create => {
        let lock = self.locks.handle(user_id);
        let create = async {
          let _guard = lock.lock().await;

          // a writer may have opened it while we waited
          match ledger::Entity::find_by_id(user_id).one(self.db).await? {
            Some(ledger) => Ok::<_, Error>(ledger),
            None => open(self.db, self.levels, user_id, self.clock.now()).await,
          }
        };

        match time::timeout(self.timeout, create).await {
          Ok(ledger) => ledger?,
          Err(_) => {
            warn!(user_id, "Timed out opening ledger for view");
            return Err(Persistence::Timeout(self.timeout).into());
          }
        }
      }
      None => return Err(Error::NotFound),
    };

    self.project(ledger)
  }

  fn project(&self, ledger: ledger::Model) -> Result<LedgerView> {
    let today = self.clock.today();
    let level = self.level(ledger.current_level_id)?;
    let next_level = self.levels.next(level);

    Ok(LedgerView {
      user_id: ledger.user_id,
      xp_total: ledger.xp_total,
      level: level.clone(),
      next_level: next_level.cloned(),
      xp_to_next_level: next_level
        .map(|next| (next.xp_required - ledger.xp_total).max(0)),
      xp_progress_percent: xp_progress_percent(
        ledger.xp_total,
        level,
        next_level,
      ),
      streak_days: ledger.streak_days,
      streak_alive: streak::is_alive(ledger.last_activity_date, today),
      last_activity_date: ledger.last_activity_date,
      streak_calendar: streak_calendar(
        ledger.last_activity_date,
        ledger.streak_days,
        today,
      ),
      total_study_time: ledger.total_study_time,
      total_study_minutes: utils::study_minutes(ledger.total_study_time),
      study_time: utils::format_study_time(ledger.total_study_time),
    })
  }

  fn level(&self, id: i32) -> Result<&'a Level> {
    self.levels.by_id(id).ok_or_else(|| {
      Error::configuration(format!("ledger points at unknown level id {id}"))
    })
  }
}

/// Zero-state ledger for a user's first activity.
async fn open<C: ConnectionTrait>(
  conn: &C,
  levels: &LevelTable,
  user_id: i64,
  now: DateTime,
) -> Result<ledger::Model> {
  info!(user_id, "Opening progress ledger");

  let ledger = ledger::ActiveModel {
    user_id: Set(user_id),
    xp_total: Set(0),
    current_level_id: Set(levels.first().id),
    streak_days: Set(1),
    last_activity_date: Set(now.date()),
    total_study_time: Set(0),
    created_at: Set(now),
    updated_at: Set(now),
  };

  Ok(ledger.insert(conn).await?)
}
