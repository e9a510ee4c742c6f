//! Cancellable periodic-tick primitive shared by every game session.
//!
//! The clock is driven, not driving: the owner feeds it elapsed wall-clock
//! time through [`GameClock::advance`] and dispatches the returned tags
//! itself. That keeps every session on a single logical thread, since a
//! tick handler always runs to completion before the next tick is looked
//! at, and makes cancellation exact: a cancelled timer can never fire
//! again.

/// Identifies one running periodic timer.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct TimerId(u64);

#[derive(Copy, Clone, Debug)]
struct Timer<T> {
    id: u64,
    interval_ms: u64,
    due_ms: u64,
    tag: T,
}

#[derive(Clone, Debug)]
pub struct GameClock<T> {
    now_ms: u64,
    next_id: u64,
    timers: Vec<Timer<T>>,
}

impl<T: Copy> GameClock<T> {
    pub fn new() -> Self {
        Self {
            now_ms: 0,
            next_id: 0,
            timers: Vec::new(),
        }
    }

    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    /// Schedules `tag` to fire every `interval_ms` (clamped to at least
    /// 1 ms), first at `now + interval_ms`.
    pub fn start(&mut self, interval_ms: u64, tag: T) -> TimerId {
        let interval_ms = interval_ms.max(1);
        let id = self.next_id;
        self.next_id += 1;
        self.timers.push(Timer {
            id,
            interval_ms,
            due_ms: self.now_ms + interval_ms,
            tag,
        });
        TimerId(id)
    }

    /// Stops all future ticks of the timer. Returns whether it was still
    /// running.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.timers.len();
        self.timers.retain(|timer| timer.id != id.0);
        self.timers.len() != before
    }

    pub fn cancel_all(&mut self) {
        self.timers.clear();
    }

    /// Moves the clock forward and returns the tags of every tick that came
    /// due, in chronological order (simultaneous ticks fire in start
    /// order). A timer may fire several times within one advance.
    pub fn advance(&mut self, elapsed_ms: u64) -> Vec<T> {
        let target_ms = self.now_ms.saturating_add(elapsed_ms);
        let mut fired = Vec::new();

        loop {
            let next = self
                .timers
                .iter_mut()
                .filter(|timer| timer.due_ms <= target_ms)
                .min_by_key(|timer| (timer.due_ms, timer.id));
            let Some(timer) = next else { break };

            fired.push(timer.tag);
            timer.due_ms += timer.interval_ms;
        }

        self.now_ms = target_ms;
        fired
    }
}

impl<T: Copy> Default for GameClock<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Seed helper for hosts that do not need reproducibility.
pub fn time_seed() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_nanos() as u64)
        .unwrap_or(0)
}
