pub mod locks;
pub mod server;

use std::sync::Arc;

use tokio::task::{AbortHandle, JoinHandle};

use crate::{prelude::*, state::AppState};

/// Long-running service kept alive by the [`Runner`].
#[async_trait::async_trait]
pub trait Plugin: Send + Sync {
  fn name(&self) -> &'static str {
    std::any::type_name::<Self>()
  }

  async fn start(&self, app: Arc<AppState>) -> anyhow::Result<()>;
}

const MAX_BACKOFF_SHIFT: u32 = 6;

/// Delay before the `restarts`-th restart: doubles from `base`, capped
/// at 64 times `base`.
pub fn backoff(base: Duration, restarts: u32) -> Duration {
  base.saturating_mul(1 << restarts.min(MAX_BACKOFF_SHIFT))
}

/// Restarts registered plugins whenever they stop, until their task is
/// aborted through the returned handles.
#[derive(Default)]
pub struct Runner {
  plugins: Vec<Arc<dyn Plugin>>,
}

impl Runner {
  pub fn register<P: Plugin + 'static>(mut self, plugin: P) -> Self {
    self.plugins.push(Arc::new(plugin));
    self
  }

  pub fn run(self, app: Arc<AppState>) -> Vec<JoinHandle<()>> {
    self
      .plugins
      .into_iter()
      .map(|plugin| tokio::spawn(supervise(plugin, app.clone())))
      .collect()
  }
}

/// Aborts the running plugin when its supervisor is aborted.
struct AbortOnDrop(AbortHandle);

impl Drop for AbortOnDrop {
  fn drop(&mut self) {
    self.0.abort();
  }
}

async fn supervise(plugin: Arc<dyn Plugin>, app: Arc<AppState>) {
  let name = plugin.name();
  let base = app.config.restart_delay;
  let mut restarts = 0;

  info!(plugin = name, "Service initialized");

  loop {
    let task = {
      let (plugin, app) = (plugin.clone(), app.clone());
      tokio::spawn(async move { plugin.start(app).await })
    };
    let _abort = AbortOnDrop(task.abort_handle());

    match task.await {
      Ok(Ok(())) => warn!(plugin = name, "Service stopped unexpectedly"),
      Ok(Err(err)) => error!(plugin = name, "Service crashed: {err:#}"),
      Err(err) if err.is_cancelled() => {
        info!(plugin = name, "Service shutdown");
        return;
      }
      Err(_) => error!(plugin = name, "Service panicked"),
    }

    let delay = backoff(base, restarts);
    restarts = restarts.saturating_add(1);
    info!(
      plugin = name,
      restarts,
      "Restarting in {}",
      humantime::format_duration(delay)
    );
    time::sleep(delay).await;
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_backoff_doubles_then_caps() {
    let base = Duration::from_secs(2);

    assert_eq!(backoff(base, 0), Duration::from_secs(2));
    assert_eq!(backoff(base, 1), Duration::from_secs(4));
    assert_eq!(backoff(base, 3), Duration::from_secs(16));
    assert_eq!(backoff(base, 6), Duration::from_secs(128));
    assert_eq!(backoff(base, 40), Duration::from_secs(128));
  }
}
