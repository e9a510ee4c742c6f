//! Per-game session controllers.
//!
//! Every controller has the same shape: `Idle` until an explicit start,
//! `Running` while its engine plays out, `Terminal` once the engine ends
//! or the player exits. Entering `Terminal` cancels all timers, persists
//! the score, and fires the completion callback at most once per session,
//! guarded against duplicate firing from overlapping timers.

use std::sync::Arc;

use crate::clock::{GameClock, TimerId};
use crate::store::ScoreStore;
use crate::GameKind;

pub use mines::*;
pub use snake::*;
pub use whack::*;

mod mines;
mod snake;
mod whack;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SessionPhase {
    Idle,
    Running,
    Terminal,
}

impl SessionPhase {
    pub const fn is_idle(self) -> bool {
        matches!(self, Self::Idle)
    }

    pub const fn is_running(self) -> bool {
        matches!(self, Self::Running)
    }

    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Terminal)
    }
}

/// Payload of the completion callback: which game ended and with what
/// final score. The host routes this to the results view.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SessionEnd {
    pub game: GameKind,
    pub score: u32,
}

pub type CompletionCallback = Box<dyn FnMut(SessionEnd)>;

/// Tag carried by every scheduled tick. The generation pins the tick to
/// the session incarnation that started the timer.
#[derive(Copy, Clone, Debug)]
struct Tick<K> {
    kind: K,
    generation: u32,
}

/// Plumbing shared by the three controllers: phase, clock, generation
/// counter, and the single-shot terminal hand-off.
struct SessionCore<K> {
    game: GameKind,
    store: Arc<ScoreStore>,
    on_end: CompletionCallback,
    clock: GameClock<Tick<K>>,
    phase: SessionPhase,
    generation: u32,
    reported: bool,
}

impl<K: Copy> SessionCore<K> {
    fn new(game: GameKind, store: Arc<ScoreStore>, on_end: CompletionCallback) -> Self {
        Self {
            game,
            store,
            on_end,
            clock: GameClock::new(),
            phase: SessionPhase::Idle,
            generation: 0,
            reported: false,
        }
    }

    fn phase(&self) -> SessionPhase {
        self.phase
    }

    /// `Idle -> Running`; anything else ignores the start request.
    fn begin(&mut self) -> bool {
        if !self.phase.is_idle() {
            log::debug!("{}: start ignored while {:?}", self.game, self.phase);
            return false;
        }
        self.phase = SessionPhase::Running;
        self.reported = false;
        true
    }

    fn start_timer(&mut self, interval_ms: u64, kind: K) -> TimerId {
        self.clock.start(
            interval_ms,
            Tick {
                kind,
                generation: self.generation,
            },
        )
    }

    /// Back to `Idle`: cancels every timer and bumps the generation so
    /// anything already collected from the old incarnation is dropped.
    fn reset(&mut self) {
        self.clock.cancel_all();
        self.generation = self.generation.wrapping_add(1);
        self.phase = SessionPhase::Idle;
        self.reported = false;
    }

    /// Collects due ticks. Ticks from an older generation would mutate
    /// freshly reset state, so they are dropped here; the caller must
    /// still re-check the phase between ticks, since an early tick can
    /// turn the session terminal.
    fn drain(&mut self, elapsed_ms: u64) -> Vec<K> {
        let generation = self.generation;
        self.clock
            .advance(elapsed_ms)
            .into_iter()
            .filter_map(|tick| {
                if tick.generation == generation {
                    Some(tick.kind)
                } else {
                    log::warn!(
                        "{}: dropped stale tick from generation {}",
                        self.game,
                        tick.generation
                    );
                    None
                }
            })
            .collect()
    }

    /// The terminal hand-off: cancel timers, persist, notify. Persistence
    /// problems are logged and never block the callback, and the whole
    /// hand-off runs at most once per session.
    fn finish(&mut self, score: u32) {
        if self.reported {
            return;
        }
        self.reported = true;
        self.phase = SessionPhase::Terminal;
        self.clock.cancel_all();

        let player = self.store.player_name();
        if player.trim().is_empty() {
            log::warn!("{}: no player name set, not persisting score {}", self.game, score);
        } else if let Err(err) = self.store.save_high_score(self.game, &player, score) {
            log::warn!("{}: could not persist score: {err}", self.game);
        }

        (self.on_end)(SessionEnd {
            game: self.game,
            score,
        });
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Completion callback that records every delivery.
    pub(crate) fn recorder() -> (CompletionCallback, Rc<RefCell<Vec<SessionEnd>>>) {
        let ends = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&ends);
        let callback = Box::new(move |end| sink.borrow_mut().push(end));
        (callback, ends)
    }

    pub(crate) fn named_store(name: &str) -> Arc<ScoreStore> {
        let store = Arc::new(ScoreStore::in_memory());
        store.set_player_name(name).unwrap();
        store
    }
}
