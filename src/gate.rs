//! Per-user single writer
//!
//! Skill counters are read, incremented and written back, and the rank is
//! recomputed from the levels just read. Both are only correct while a single
//! task works on a given user, so the evaluation pipeline holds the user's
//! permit for the whole run. Idle permits are pruned by `sweep`.

use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::prelude::*;

pub type Permit = OwnedMutexGuard<()>;

#[derive(Default)]
pub struct Gate {
  locks: dashmap::DashMap<Uuid, Arc<Mutex<()>>>,
}

impl Gate {
  pub fn new() -> Self {
    Self::default()
  }

  /// Waits until no other task holds `user`.
  pub async fn acquire(&self, user: Uuid) -> Permit {
    let lock = self.locks.entry(user).or_default().clone();
    lock.lock_owned().await
  }

  /// Drops permits nobody holds or waits for. Returns how many were removed.
  pub fn sweep(&self) -> usize {
    let before = self.locks.len();
    self.locks.retain(|_, lock| Arc::strong_count(lock) > 1);
    before - self.locks.len()
  }

  pub fn len(&self) -> usize {
    self.locks.len()
  }
}
