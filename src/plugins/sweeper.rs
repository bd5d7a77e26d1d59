use async_trait::async_trait;

use crate::{prelude::*, state::AppState};

/// Periodically forgets per-user gate entries nobody holds.
pub struct Sweeper;

#[async_trait]
impl super::Plugin for Sweeper {
  async fn start(&self, app: Arc<AppState>) -> anyhow::Result<()> {
    let mut interval = time::interval(app.config.gate_sweep);
    loop {
      interval.tick().await;

      let removed = app.gate.sweep();
      if removed > 0 {
        debug!("Swept {removed} idle user gates, {} left", app.gate.len());
      }
    }
  }
}
