//! The arcade lobby: game sessions, tick scheduling, and score
//! persistence around the pure engines in `arcade-core`.
//!
//! A host UI drives a session by forwarding input events, feeding elapsed
//! time into [`advance`](session::MinesSession::advance), and rendering
//! from the session's accessors. When a session reaches a terminal state
//! it persists the score and fires its completion callback exactly once.

use core::fmt;
use serde::{Deserialize, Serialize};

pub use clock::*;
pub use identity::*;
pub use results::*;
pub use session::*;
pub use store::*;

mod clock;
mod identity;
mod results;
mod store;

pub mod session;

/// The three games on the home screen.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameKind {
    Minesweeper,
    Snake,
    WhacAMole,
}

impl GameKind {
    pub const ALL: [GameKind; 3] = [
        GameKind::Minesweeper,
        GameKind::Snake,
        GameKind::WhacAMole,
    ];

    /// Stable identifier used as the leaderboard storage key.
    pub const fn key(self) -> &'static str {
        match self {
            GameKind::Minesweeper => "minesweeper",
            GameKind::Snake => "snake",
            GameKind::WhacAMole => "whac-a-mole",
        }
    }
}

impl fmt::Display for GameKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}
