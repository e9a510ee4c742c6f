//! Durable player identity and per-game leaderboards.
//!
//! The logical schema matches what the lobby has always persisted: a single
//! global `playerName` value and one `highScores_<game>` JSON array per
//! game, capped at ten entries and sorted by score.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};
use thiserror::Error;

use crate::GameKind;

const PLAYER_NAME_KEY: &str = "playerName";
const LEADERBOARD_CAP: usize = 10;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("storage backend unavailable: {0}")]
    Unavailable(String),
    #[error("failed to encode leaderboard: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Minimal string key-value persistence, the shape of web local storage.
/// Backends may fail; callers treat failures as non-fatal.
pub trait StorageBackend: Send {
    fn read(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn write(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// In-process backend, the default for tests and for hosts that wire up
/// their own persistence at a higher level.
#[derive(Clone, Debug, Default)]
pub struct MemoryBackend {
    values: HashMap<String, String>,
}

impl StorageBackend for MemoryBackend {
    fn read(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.values.get(key).cloned())
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.values.insert(key.to_owned(), value.to_owned());
        Ok(())
    }
}

/// One leaderboard row. Serialized camelCase to stay compatible with the
/// stored schema.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HighScoreEntry {
    pub name: String,
    pub score: u32,
    pub achieved_at: DateTime<Utc>,
}

/// Process-wide score persistence shared by every session.
///
/// All mutation happens inside [`ScoreStore::save_high_score`], which holds
/// the internal lock across its whole read-modify-write so concurrent saves
/// for the same game cannot lose updates.
pub struct ScoreStore {
    backend: Mutex<Box<dyn StorageBackend>>,
}

impl ScoreStore {
    pub fn new(backend: impl StorageBackend + 'static) -> Self {
        Self {
            backend: Mutex::new(Box::new(backend)),
        }
    }

    pub fn in_memory() -> Self {
        Self::new(MemoryBackend::default())
    }

    /// The persisted nickname, or an empty string when none was set.
    pub fn player_name(&self) -> String {
        match self.lock().read(PLAYER_NAME_KEY) {
            Ok(name) => name.unwrap_or_default(),
            Err(err) => {
                log::warn!("could not read player name: {err}");
                String::new()
            }
        }
    }

    /// Stores the nickname as passed; validating and trimming it is the
    /// caller's job (see [`crate::validate_nickname`]).
    pub fn set_player_name(&self, name: &str) -> Result<(), StoreError> {
        self.lock().write(PLAYER_NAME_KEY, name)
    }

    /// The leaderboard for `game`, sorted descending by score. Missing or
    /// unreadable data yields an empty board.
    pub fn high_scores(&self, game: GameKind) -> Vec<HighScoreEntry> {
        load_scores(&**self.lock(), game)
    }

    /// Records `score` for `player` on `game`'s leaderboard.
    ///
    /// A blank player name is a warned no-op. A returning player's entry is
    /// replaced only when the new score is strictly greater; a new player is
    /// appended with the current timestamp. The board is then re-sorted
    /// descending (stable, so ties keep insertion order) and truncated to
    /// the top ten.
    pub fn save_high_score(
        &self,
        game: GameKind,
        player: &str,
        score: u32,
    ) -> Result<(), StoreError> {
        let player = player.trim();
        if player.is_empty() {
            log::warn!("attempted to save a high score without a valid player name");
            return Ok(());
        }

        // single read-modify-write under the lock
        let mut backend = self.lock();
        let mut scores = load_scores(&**backend, game);

        match scores.iter_mut().find(|entry| entry.name == player) {
            Some(entry) if score > entry.score => {
                entry.score = score;
                entry.achieved_at = Utc::now();
            }
            Some(_) => {}
            None => scores.push(HighScoreEntry {
                name: player.to_owned(),
                score,
                achieved_at: Utc::now(),
            }),
        }

        scores.sort_by(|a, b| b.score.cmp(&a.score));
        scores.truncate(LEADERBOARD_CAP);

        let encoded = serde_json::to_string(&scores)?;
        backend.write(&leaderboard_key(game), &encoded)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Box<dyn StorageBackend>> {
        self.backend.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn leaderboard_key(game: GameKind) -> String {
    format!("highScores_{}", game.key())
}

fn load_scores(backend: &dyn StorageBackend, game: GameKind) -> Vec<HighScoreEntry> {
    let raw = match backend.read(&leaderboard_key(game)) {
        Ok(Some(raw)) => raw,
        Ok(None) => return Vec::new(),
        Err(err) => {
            log::warn!("could not read {} leaderboard: {err}", game.key());
            return Vec::new();
        }
    };

    let mut scores: Vec<HighScoreEntry> = match serde_json::from_str(&raw) {
        Ok(scores) => scores,
        Err(err) => {
            log::warn!("corrupt {} leaderboard, starting over: {err}", game.key());
            Vec::new()
        }
    };
    scores.sort_by(|a, b| b.score.cmp(&a.score));
    scores
}
