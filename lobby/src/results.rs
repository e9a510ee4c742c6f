//! Data contract for the results screen.
//!
//! The completion callback carries `(game, score)` and the host looks up
//! the player name on its way to the results view. If any piece is
//! missing the view must show a "data missing, restart" fallback instead
//! of failing, so assembly returns an `Option`.

use crate::GameKind;

#[derive(Clone, Debug, PartialEq)]
pub struct GameResult {
    pub player_name: String,
    pub game: GameKind,
    pub score: u32,
}

impl GameResult {
    /// Assembles the results-view data, or `None` when a required field is
    /// absent (including a blank player name).
    pub fn from_parts(
        player_name: Option<String>,
        game: Option<GameKind>,
        score: Option<u32>,
    ) -> Option<Self> {
        let player_name = player_name.filter(|name| !name.trim().is_empty())?;
        Some(Self {
            player_name,
            game: game?,
            score: score?,
        })
    }
}
