use rand::prelude::*;
use serde::{Deserialize, Serialize};

use crate::{GameError, Result};

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WhackConfig {
    pub targets: u8,
    pub max_misses: u8,
    pub duration_secs: u32,
}

impl WhackConfig {
    pub fn new(targets: u8, max_misses: u8, duration_secs: u32) -> Self {
        Self {
            targets: targets.max(1),
            max_misses: max_misses.max(1),
            duration_secs: duration_secs.max(1),
        }
    }
}

impl Default for WhackConfig {
    /// The lobby's fixed rules: a 3x3 grid, five allowed misses, thirty
    /// seconds on the clock.
    fn default() -> Self {
        Self {
            targets: 9,
            max_misses: 5,
            duration_secs: 30,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EndReason {
    TooManyMisses,
    TimeUp,
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum WhackState {
    Running,
    Ended(EndReason),
}

impl WhackState {
    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Ended(_))
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum TickOutcome {
    NoChange,
    TargetMoved,
    CountedDown,
    Ended(EndReason),
}

impl TickOutcome {
    pub const fn has_update(self) -> bool {
        !matches!(self, Self::NoChange)
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum HitOutcome {
    NoChange,
    Hit,
}

impl HitOutcome {
    pub const fn has_update(self) -> bool {
        matches!(self, Self::Hit)
    }
}

/// One whack round: targets pop up once a second, an unanswered target
/// counts as a miss, and a separate countdown caps the round length.
#[derive(Clone, Debug)]
pub struct WhackGame {
    config: WhackConfig,
    active_target: Option<u8>,
    score: u32,
    miss_count: u8,
    remaining_secs: u32,
    state: WhackState,
    rng: SmallRng,
}

impl WhackGame {
    pub fn new(config: WhackConfig, seed: u64) -> Self {
        Self {
            config,
            active_target: None,
            score: 0,
            miss_count: 0,
            remaining_secs: config.duration_secs,
            state: WhackState::Running,
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    pub fn config(&self) -> WhackConfig {
        self.config
    }

    pub fn state(&self) -> WhackState {
        self.state
    }

    pub fn is_finished(&self) -> bool {
        self.state.is_finished()
    }

    pub fn active_target(&self) -> Option<u8> {
        self.active_target
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn miss_count(&self) -> u8 {
        self.miss_count
    }

    pub fn remaining_secs(&self) -> u32 {
        self.remaining_secs
    }

    /// One target interval: a target still active from the previous
    /// interval was never hit and counts as a miss, then a new target is
    /// drawn (possibly the same index again).
    pub fn spawn_tick(&mut self) -> TickOutcome {
        if self.state.is_finished() {
            return TickOutcome::NoChange;
        }

        if self.active_target.is_some() {
            self.miss_count += 1;
            log::trace!("missed target, {}/{}", self.miss_count, self.config.max_misses);
            if self.miss_count >= self.config.max_misses {
                return self.end(EndReason::TooManyMisses);
            }
        }

        self.active_target = Some(self.rng.random_range(0..self.config.targets));
        TickOutcome::TargetMoved
    }

    /// One wall-clock second off the countdown; reaching zero ends the
    /// round.
    pub fn countdown_tick(&mut self) -> TickOutcome {
        if self.state.is_finished() {
            return TickOutcome::NoChange;
        }

        self.remaining_secs = self.remaining_secs.saturating_sub(1);
        if self.remaining_secs == 0 {
            self.end(EndReason::TimeUp)
        } else {
            TickOutcome::CountedDown
        }
    }

    /// Scores only an exact match on the active target and clears it, so a
    /// repeat click on the same index is a no-op until the next spawn.
    pub fn hit(&mut self, index: u8) -> Result<HitOutcome> {
        if index >= self.config.targets {
            return Err(GameError::InvalidTarget);
        }
        if self.state.is_finished() {
            return Err(GameError::AlreadyEnded);
        }

        Ok(if self.active_target == Some(index) {
            self.score += 1;
            self.active_target = None;
            HitOutcome::Hit
        } else {
            HitOutcome::NoChange
        })
    }

    fn end(&mut self, reason: EndReason) -> TickOutcome {
        self.state = WhackState::Ended(reason);
        self.active_target = None;
        TickOutcome::Ended(reason)
    }
}
