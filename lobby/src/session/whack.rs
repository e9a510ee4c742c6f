//! Whack-a-mole session: two independent one-second timers, one moving
//! the target and one running the countdown. The engine ends the round on
//! either too many misses or time up; the score is the number of hits.

use std::sync::Arc;

use arcade_core::whack::{TickOutcome, WhackConfig, WhackGame};

use super::{CompletionCallback, SessionCore, SessionPhase};
use crate::store::ScoreStore;
use crate::GameKind;

pub const TARGET_TICK_MS: u64 = 1_000;
pub const COUNTDOWN_TICK_MS: u64 = 1_000;

#[derive(Copy, Clone, Debug)]
enum WhackTick {
    Target,
    Countdown,
}

pub struct WhackSession {
    core: SessionCore<WhackTick>,
    config: WhackConfig,
    game: Option<WhackGame>,
}

impl WhackSession {
    pub fn new(store: Arc<ScoreStore>, on_end: CompletionCallback) -> Self {
        Self::with_config(WhackConfig::default(), store, on_end)
    }

    pub fn with_config(
        config: WhackConfig,
        store: Arc<ScoreStore>,
        on_end: CompletionCallback,
    ) -> Self {
        Self {
            core: SessionCore::new(GameKind::WhacAMole, store, on_end),
            config,
            game: None,
        }
    }

    pub fn phase(&self) -> SessionPhase {
        self.core.phase()
    }

    pub fn game(&self) -> Option<&WhackGame> {
        self.game.as_ref()
    }

    /// Starts a round and both timers. Ignored unless idle.
    pub fn start(&mut self, seed: u64) {
        if !self.core.begin() {
            return;
        }
        self.game = Some(WhackGame::new(self.config, seed));
        self.core.start_timer(TARGET_TICK_MS, WhackTick::Target);
        self.core.start_timer(COUNTDOWN_TICK_MS, WhackTick::Countdown);
    }

    /// Back to idle, discarding the round and both timers.
    pub fn reset(&mut self) {
        self.core.reset();
        self.game = None;
    }

    /// Leaves for the lobby. An unfinished round ends with score zero;
    /// after a terminal hand-off this is navigation only.
    pub fn exit(&mut self) {
        if self.core.phase().is_terminal() {
            return;
        }
        self.core.finish(0);
    }

    pub fn hit(&mut self, index: u8) {
        if !self.core.phase().is_running() {
            return;
        }
        let Some(game) = self.game.as_mut() else {
            return;
        };
        if let Err(err) = game.hit(index) {
            log::debug!("whac-a-mole: hit on {index} ignored: {err}");
        }
    }

    /// Feeds elapsed wall time into both timers. Whichever tick ends the
    /// round wins; the other timer is cancelled by the hand-off.
    pub fn advance(&mut self, elapsed_ms: u64) {
        for tick in self.core.drain(elapsed_ms) {
            if !self.core.phase().is_running() {
                break;
            }
            let Some(game) = self.game.as_mut() else {
                break;
            };
            let outcome = match tick {
                WhackTick::Target => game.spawn_tick(),
                WhackTick::Countdown => game.countdown_tick(),
            };
            if let TickOutcome::Ended(_) = outcome {
                let score = game.score();
                self.core.finish(score);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::test_support::{named_store, recorder};
    use crate::session::SessionEnd;
    use arcade_core::whack::{EndReason, WhackState};

    fn session() -> (WhackSession, std::rc::Rc<std::cell::RefCell<Vec<SessionEnd>>>) {
        let (callback, ends) = recorder();
        (WhackSession::new(named_store("ada"), callback), ends)
    }

    #[test]
    fn starting_spawns_a_target_on_the_first_tick() {
        let (mut session, _ends) = session();
        session.start(3);
        assert_eq!(session.game().unwrap().active_target(), None);

        session.advance(1_000);
        assert!(session.game().unwrap().active_target().is_some());
    }

    #[test]
    fn both_timers_run_off_the_same_clock() {
        let (mut session, _ends) = session();
        session.start(3);

        session.advance(4_000);

        let game = session.game().unwrap();
        assert_eq!(game.remaining_secs(), 30 - 4);
        assert_eq!(game.miss_count(), 3);
    }

    #[test]
    fn hitting_the_active_target_scores() {
        let (mut session, _ends) = session();
        session.start(3);
        session.advance(1_000);
        let target = session.game().unwrap().active_target().unwrap();

        session.hit(target);

        assert_eq!(session.game().unwrap().score(), 1);
        assert_eq!(session.game().unwrap().active_target(), None);
    }

    #[test]
    fn too_many_misses_end_the_session_with_the_round_score() {
        let (mut session, ends) = session();
        session.start(3);

        // tick 1 spawns, ticks 2..=6 each count a miss
        session.advance(6_000);

        assert!(session.phase().is_terminal());
        assert_eq!(
            session.game().unwrap().state(),
            WhackState::Ended(EndReason::TooManyMisses)
        );
        assert_eq!(
            *ends.borrow(),
            [SessionEnd {
                game: GameKind::WhacAMole,
                score: 0
            }]
        );
    }

    #[test]
    fn time_up_ends_the_session() {
        let (callback, ends) = recorder();
        let mut session = WhackSession::with_config(
            WhackConfig::new(9, u8::MAX, 3),
            named_store("ada"),
            callback,
        );
        session.start(3);

        session.advance(3_000);

        assert!(session.phase().is_terminal());
        assert_eq!(
            session.game().unwrap().state(),
            WhackState::Ended(EndReason::TimeUp)
        );
        assert_eq!(ends.borrow().len(), 1);
    }

    #[test]
    fn the_ending_tick_cancels_the_other_timer() {
        let (callback, ends) = recorder();
        let mut session = WhackSession::with_config(
            WhackConfig::new(9, u8::MAX, 2),
            named_store("ada"),
            callback,
        );
        session.start(3);
        session.advance(2_000);
        assert!(session.phase().is_terminal());
        let misses = session.game().unwrap().miss_count();

        session.advance(10_000);

        assert_eq!(session.game().unwrap().miss_count(), misses);
        assert_eq!(ends.borrow().len(), 1);
    }

    #[test]
    fn hits_scored_before_the_end_survive_into_the_hand_off() {
        let (mut session, ends) = session();
        session.start(3);

        for _ in 0..6 {
            session.advance(1_000);
            if let Some(target) = session.game().and_then(|game| game.active_target()) {
                session.hit(target);
            }
        }

        // no target was ever left unanswered, so the round is still going
        assert!(session.phase().is_running());
        assert_eq!(session.game().unwrap().score(), 6);
        assert!(ends.borrow().is_empty());
    }

    #[test]
    fn input_is_ignored_outside_running() {
        let (mut session, ends) = session();
        session.hit(0);
        assert!(session.game().is_none());

        session.start(3);
        session.advance(1_000);
        session.exit();
        session.hit(0);

        assert_eq!(session.game().unwrap().score(), 0);
        assert_eq!(ends.borrow().len(), 1);
    }

    #[test]
    fn exit_mid_round_reports_score_zero_once() {
        let (mut session, ends) = session();
        session.start(3);
        session.advance(2_000);

        session.exit();
        session.exit();

        assert_eq!(
            *ends.borrow(),
            [SessionEnd {
                game: GameKind::WhacAMole,
                score: 0
            }]
        );
    }

    #[test]
    fn reset_allows_a_fresh_round() {
        let (mut session, ends) = session();
        session.start(3);
        session.advance(4_000);

        session.reset();
        assert!(session.phase().is_idle());
        assert!(session.game().is_none());
        assert!(ends.borrow().is_empty());

        session.start(4);
        session.advance(1_000);
        let game = session.game().unwrap();
        assert_eq!(game.miss_count(), 0);
        assert_eq!(game.remaining_secs(), 30 - 1);
    }
}
