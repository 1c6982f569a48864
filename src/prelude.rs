pub use std::{sync::Arc, time::Duration};

pub use anyhow::Context;
pub use chrono::{
  Datelike, NaiveDate as Date, NaiveDateTime as DateTime, TimeDelta, Utc,
};
pub use dashmap::DashMap;
pub use sea_orm::{
  ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter,
  QueryOrder, QuerySelect, Set, TransactionTrait,
};
pub use tokio::time;
pub use tracing::{debug, error, info, warn};

pub use crate::error::{Error, Persistence, Result};
pub(crate) use crate::utils;
