//! Skill level and user rank rules
//!
//! Both functions are pure: a skill level depends only on its pass counter and
//! a rank only on the multiset of a user's skill levels. Promotion requires
//! breadth (how many skills reached a level), so one deep skill never lets a
//! user skip ranks.

use serde::Serialize;

pub const MAX_LEVEL: i32 = 5;
pub const MIN_RANK: i32 = 1;
pub const MAX_RANK: i32 = 10;

/// `(minimum passes, level)`, highest first.
const LEVEL_STEPS: [(i32, i32); 5] = [(15, 5), (10, 4), (5, 3), (3, 2), (1, 1)];

/// `(level, minimum skills at or above it, rank)`, rarest achievement first.
const RANK_CASCADE: [(usize, u32, i32); 9] = [
  (5, 20, 10),
  (5, 10, 9),
  (4, 10, 8),
  (4, 5, 7),
  (3, 10, 6),
  (3, 5, 5),
  (2, 10, 4),
  (2, 5, 3),
  (1, 5, 2),
];

/// Level reached after `passed` verified passes. Non-positive counts are level 0.
pub fn level_of(passed: i32) -> i32 {
  LEVEL_STEPS
    .iter()
    .find(|&&(min, _)| passed >= min)
    .map_or(0, |&(_, level)| level)
}

/// Cumulative level histogram: `lN` counts skills with level `>= N`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LevelCounts {
  pub l1: u32,
  pub l2: u32,
  pub l3: u32,
  pub l4: u32,
  pub l5: u32,
}

impl LevelCounts {
  pub fn from_levels(levels: impl IntoIterator<Item = i32>) -> Self {
    let mut counts = Self::default();
    for level in levels {
      for n in 1..=level.min(MAX_LEVEL) {
        *counts.at_mut(n as usize) += 1;
      }
    }
    counts
  }

  pub fn at(&self, level: usize) -> u32 {
    match level {
      1 => self.l1,
      2 => self.l2,
      3 => self.l3,
      4 => self.l4,
      5 => self.l5,
      _ => 0,
    }
  }

  fn at_mut(&mut self, level: usize) -> &mut u32 {
    match level {
      1 => &mut self.l1,
      2 => &mut self.l2,
      3 => &mut self.l3,
      4 => &mut self.l4,
      _ => &mut self.l5,
    }
  }

  /// First matching rule of the cascade wins; nothing matched is rank 1.
  pub fn rank(&self) -> i32 {
    RANK_CASCADE
      .iter()
      .find(|&&(level, min, _)| self.at(level) >= min)
      .map_or(MIN_RANK, |&(_, _, rank)| rank)
  }
}

pub fn count_levels(levels: impl IntoIterator<Item = i32>) -> LevelCounts {
  LevelCounts::from_levels(levels)
}
