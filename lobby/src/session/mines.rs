//! Minesweeper session: one elapsed-seconds timer plus the reveal/flag
//! input surface. Winning scores `win_score(elapsed_secs)`, hitting a
//! mine scores zero.

use std::sync::Arc;

use arcade_core::mines::{
    win_score, FieldGenerator, MineField, MinesConfig, MinesGame, RandomFieldGenerator,
    RevealOutcome,
};
use arcade_core::Coord2;

use super::{CompletionCallback, SessionCore, SessionPhase};
use crate::store::ScoreStore;
use crate::GameKind;

pub const ELAPSED_TICK_MS: u64 = 1_000;

#[derive(Copy, Clone, Debug)]
enum MinesTick {
    ElapsedSecond,
}

pub struct MinesSession {
    core: SessionCore<MinesTick>,
    config: MinesConfig,
    game: Option<MinesGame>,
    elapsed_secs: u32,
}

impl MinesSession {
    pub fn new(store: Arc<ScoreStore>, on_end: CompletionCallback) -> Self {
        Self::with_config(MinesConfig::default(), store, on_end)
    }

    pub fn with_config(
        config: MinesConfig,
        store: Arc<ScoreStore>,
        on_end: CompletionCallback,
    ) -> Self {
        Self {
            core: SessionCore::new(GameKind::Minesweeper, store, on_end),
            config,
            game: None,
            elapsed_secs: 0,
        }
    }

    pub fn phase(&self) -> SessionPhase {
        self.core.phase()
    }

    pub fn game(&self) -> Option<&MinesGame> {
        self.game.as_ref()
    }

    /// Seconds the current attempt has been running. Frozen once the
    /// session turns terminal.
    pub fn elapsed_secs(&self) -> u32 {
        self.elapsed_secs
    }

    /// Starts a fresh board generated from `seed`. Ignored unless idle.
    pub fn start(&mut self, seed: u64) {
        let field = RandomFieldGenerator::new(seed).generate(self.config);
        self.start_with_field(field);
    }

    /// Starts on a prepared field. Ignored unless idle.
    pub fn start_with_field(&mut self, field: MineField) {
        if !self.core.begin() {
            return;
        }
        self.game = Some(MinesGame::new(field));
        self.elapsed_secs = 0;
        self.core.start_timer(ELAPSED_TICK_MS, MinesTick::ElapsedSecond);
    }

    /// Back to idle, discarding the board and any pending ticks.
    pub fn reset(&mut self) {
        self.core.reset();
        self.game = None;
        self.elapsed_secs = 0;
    }

    /// Leaves for the lobby. An unfinished attempt ends with score zero;
    /// after a terminal hand-off this is navigation only.
    pub fn exit(&mut self) {
        if self.core.phase().is_terminal() {
            return;
        }
        self.core.finish(0);
    }

    pub fn reveal(&mut self, coords: Coord2) {
        if !self.core.phase().is_running() {
            return;
        }
        let Some(game) = self.game.as_mut() else {
            return;
        };
        match game.reveal(coords) {
            Ok(RevealOutcome::HitMine) => self.core.finish(0),
            Ok(RevealOutcome::Won) => {
                let score = win_score(self.elapsed_secs);
                self.core.finish(score);
            }
            Ok(_) => {}
            Err(err) => log::debug!("minesweeper: reveal at {coords:?} ignored: {err}"),
        }
    }

    pub fn toggle_flag(&mut self, coords: Coord2) {
        if !self.core.phase().is_running() {
            return;
        }
        let Some(game) = self.game.as_mut() else {
            return;
        };
        if let Err(err) = game.toggle_flag(coords) {
            log::debug!("minesweeper: flag at {coords:?} ignored: {err}");
        }
    }

    /// Feeds elapsed wall time into the session's timers.
    pub fn advance(&mut self, elapsed_ms: u64) {
        for tick in self.core.drain(elapsed_ms) {
            if !self.core.phase().is_running() {
                break;
            }
            match tick {
                MinesTick::ElapsedSecond => self.elapsed_secs += 1,
            }
        }
    }
}
