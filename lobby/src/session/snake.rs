//! Snake session: a single step timer drives the engine, steering is the
//! only input. The score is the number of food items eaten when the snake
//! crashes.

use std::sync::Arc;

use arcade_core::snake::{Direction, SnakeConfig, SnakeGame, StepOutcome};

use super::{CompletionCallback, SessionCore, SessionPhase};
use crate::store::ScoreStore;
use crate::GameKind;

pub const STEP_TICK_MS: u64 = 150;

#[derive(Copy, Clone, Debug)]
enum SnakeTick {
    Step,
}

pub struct SnakeSession {
    core: SessionCore<SnakeTick>,
    config: SnakeConfig,
    game: Option<SnakeGame>,
}

impl SnakeSession {
    pub fn new(store: Arc<ScoreStore>, on_end: CompletionCallback) -> Self {
        Self::with_config(SnakeConfig::default(), store, on_end)
    }

    pub fn with_config(
        config: SnakeConfig,
        store: Arc<ScoreStore>,
        on_end: CompletionCallback,
    ) -> Self {
        Self {
            core: SessionCore::new(GameKind::Snake, store, on_end),
            config,
            game: None,
        }
    }

    pub fn phase(&self) -> SessionPhase {
        self.core.phase()
    }

    pub fn game(&self) -> Option<&SnakeGame> {
        self.game.as_ref()
    }

    /// Spawns the snake and starts the step timer. Ignored unless idle.
    pub fn start(&mut self, seed: u64) {
        if !self.core.begin() {
            return;
        }
        self.game = Some(SnakeGame::new(self.config, seed));
        self.core.start_timer(STEP_TICK_MS, SnakeTick::Step);
    }

    /// Back to idle, discarding the run and any pending steps.
    pub fn reset(&mut self) {
        self.core.reset();
        self.game = None;
    }

    /// Leaves for the lobby. An unfinished run ends with score zero; after
    /// a crash has been reported this is navigation only.
    pub fn exit(&mut self) {
        if self.core.phase().is_terminal() {
            return;
        }
        self.core.finish(0);
    }

    pub fn steer(&mut self, direction: Direction) {
        if !self.core.phase().is_running() {
            return;
        }
        if let Some(game) = self.game.as_mut() {
            game.steer(direction);
        }
    }

    /// Feeds elapsed wall time into the step timer; each due tick moves the
    /// snake one cell.
    pub fn advance(&mut self, elapsed_ms: u64) {
        for tick in self.core.drain(elapsed_ms) {
            if !self.core.phase().is_running() {
                break;
            }
            match tick {
                SnakeTick::Step => {
                    let Some(game) = self.game.as_mut() else {
                        break;
                    };
                    if game.step() == StepOutcome::Crashed {
                        let score = game.score();
                        self.core.finish(score);
                    }
                }
            }
        }
    }
}
