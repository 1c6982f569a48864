use std::sync::Arc;

use async_trait::async_trait;

use crate::{prelude::*, state::AppState};

/// Periodically forgets per-user locks that nobody holds.
pub struct Plugin;

#[async_trait]
impl super::Plugin for Plugin {
  fn name(&self) -> &'static str {
    "lock-gc"
  }

  async fn start(&self, app: Arc<AppState>) -> anyhow::Result<()> {
    let mut interval = time::interval(app.config.lock_gc_interval);
    loop {
      interval.tick().await;
      app.gc_locks();
    }
  }
}
