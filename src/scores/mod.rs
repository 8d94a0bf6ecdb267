//! High-Score Table
//!
//! The persistence collaborator the core hands `(name, score)` pairs to on
//! game over. Names merge case-insensitively keeping the best score per
//! player, and saves go through a temp file plus an atomic rename so a
//! crash mid-write never corrupts the table.

use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

/// Fallback display name for blank submissions.
const ANONYMOUS: &str = "player";

/// Errors from loading or saving the table.
#[derive(Debug, Error)]
pub enum ScoreError {
    /// Filesystem failure while reading or writing.
    #[error("score table io error: {0}")]
    Io(#[from] std::io::Error),

    /// The table file exists but does not parse.
    #[error("score table is not valid json: {0}")]
    Format(#[from] serde_json::Error),
}

/// One row of the table.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreEntry {
    /// Display name as first submitted.
    pub name: String,
    /// Best score recorded for this name.
    pub score: u32,
}

/// The best-score table, keyed case-insensitively by player name.
#[derive(Clone, Debug, Default)]
pub struct ScoreBoard {
    // normalized name -> entry; BTreeMap keeps iteration deterministic
    best: BTreeMap<String, ScoreEntry>,
}

/// Lower-cased, trimmed merge key for a display name.
fn normalize(name: &str) -> String {
    name.trim().to_lowercase()
}

impl ScoreBoard {
    /// An empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the table from disk.
    ///
    /// A missing file yields an empty table; rows merge by normalized
    /// name, keeping the maximum score, so duplicate rows in a
    /// hand-edited file collapse cleanly.
    pub fn load(path: &Path) -> Result<Self, ScoreError> {
        if !path.exists() {
            debug!(path = %path.display(), "no score table yet, starting empty");
            return Ok(Self::new());
        }

        let raw = fs::read_to_string(path)?;
        let entries: Vec<ScoreEntry> = serde_json::from_str(&raw)?;

        let mut board = Self::new();
        for entry in entries {
            if entry.name.trim().is_empty() {
                warn!("dropping score row with blank name");
                continue;
            }
            board.submit(&entry.name, entry.score);
        }
        Ok(board)
    }

    /// Record a score for a player.
    ///
    /// Returns true when the table changed (new player, or a personal
    /// best). Merging is case-insensitive; the display name of the first
    /// submission wins.
    pub fn submit(&mut self, name: &str, score: u32) -> bool {
        let trimmed = name.trim();
        let display = if trimmed.is_empty() { ANONYMOUS } else { trimmed };
        let key = normalize(display);

        match self.best.get_mut(&key) {
            Some(entry) if score > entry.score => {
                entry.score = score;
                true
            }
            Some(_) => false,
            None => {
                self.best.insert(
                    key,
                    ScoreEntry {
                        name: display.to_string(),
                        score,
                    },
                );
                true
            }
        }
    }

    /// Best score on record for a name, if any.
    pub fn best_for(&self, name: &str) -> Option<u32> {
        self.best.get(&normalize(name)).map(|e| e.score)
    }

    /// Top `n` entries, sorted by score descending.
    ///
    /// Ties sort by normalized name so the order is stable.
    pub fn top(&self, n: usize) -> Vec<ScoreEntry> {
        let mut rows: Vec<(&String, &ScoreEntry)> = self.best.iter().collect();
        rows.sort_by(|(ka, a), (kb, b)| b.score.cmp(&a.score).then(ka.cmp(kb)));
        rows.into_iter().take(n).map(|(_, e)| e.clone()).collect()
    }

    /// Number of players on record.
    pub fn len(&self) -> usize {
        self.best.len()
    }

    /// True when nothing has been recorded yet.
    pub fn is_empty(&self) -> bool {
        self.best.is_empty()
    }

    /// Persist the table.
    ///
    /// Serializes all rows sorted descending, writes them to a sibling
    /// temp file, and renames it over the target - readers never observe
    /// a half-written table.
    pub fn save(&self, path: &Path) -> Result<(), ScoreError> {
        let rows = self.top(self.best.len());
        let json = serde_json::to_string_pretty(&rows)?;

        let tmp = path.with_extension("tmp");
        {
            let mut file = fs::File::create(&tmp)?;
            file.write_all(json.as_bytes())?;
            file.sync_all()?;
        }
        fs::rename(&tmp, path)?;
        debug!(path = %path.display(), rows = rows.len(), "score table saved");
        Ok(())
    }
}

// =============================================================================
// TESTS
// =============================================================================
