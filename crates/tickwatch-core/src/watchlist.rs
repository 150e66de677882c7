//! The watchlist store: single source of truth for the tracked symbol list.
//!
//! Entries are kept in insertion order, unique by normalized symbol, and the
//! backing JSON file is rewritten wholesale after every mutation. Expected
//! concurrency is a single interactive session, so there is no locking and
//! no incremental diffing.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::{CalendarDate, Symbol, ValidationError};

/// One tracked symbol and the date it was added.
///
/// `added_date` is set at insertion and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WatchlistEntry {
    pub symbol: Symbol,
    pub added_date: CalendarDate,
}

/// Outcome of an add attempt. Both variants are non-fatal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddOutcome {
    Added(WatchlistEntry),
    Duplicate(Symbol),
}

/// Outcome of a remove attempt. Removing an absent symbol is an
/// idempotent success, not an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoveOutcome {
    Removed(Symbol),
    NotTracked(Symbol),
}

#[derive(Debug, thiserror::Error)]
pub enum WatchlistError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The file rewrite failed. The in-memory mutation has already been
    /// applied when this is returned; callers surface it as a warning and
    /// keep the session alive.
    #[error("failed to persist watchlist to {path}: {source}")]
    Persist {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Insertion-ordered, deduplicated set of tracked symbols with flat-file
/// persistence.
#[derive(Debug)]
pub struct WatchlistStore {
    path: PathBuf,
    entries: Vec<WatchlistEntry>,
}

impl WatchlistStore {
    /// Load the watchlist from `path`.
    ///
    /// An absent, unreadable, or corrupt file yields an empty store; this is
    /// the sole recovery path for bad storage, no partial-record repair is
    /// attempted.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = read_entries(&path).unwrap_or_default();
        Self { path, entries }
    }

    /// Add a symbol, dated today.
    pub fn add(&mut self, raw: &str) -> Result<AddOutcome, WatchlistError> {
        self.add_on(raw, CalendarDate::today_utc())
    }

    /// Add a symbol with an explicit insertion date.
    ///
    /// Duplicate symbols (case-insensitive) leave both memory and disk
    /// untouched.
    pub fn add_on(
        &mut self,
        raw: &str,
        added_date: CalendarDate,
    ) -> Result<AddOutcome, WatchlistError> {
        let symbol = Symbol::parse(raw)?;

        if self.contains(&symbol) {
            return Ok(AddOutcome::Duplicate(symbol));
        }

        let entry = WatchlistEntry { symbol, added_date };
        self.entries.push(entry.clone());
        self.persist()?;
        Ok(AddOutcome::Added(entry))
    }

    /// Remove every entry matching the normalized symbol (at most one, given
    /// the uniqueness invariant).
    pub fn remove(&mut self, raw: &str) -> Result<RemoveOutcome, WatchlistError> {
        let symbol = Symbol::parse(raw)?;

        let before = self.entries.len();
        self.entries.retain(|entry| entry.symbol != symbol);
        if self.entries.len() == before {
            return Ok(RemoveOutcome::NotTracked(symbol));
        }

        self.persist()?;
        Ok(RemoveOutcome::Removed(symbol))
    }

    /// Current entries, insertion order.
    pub fn entries(&self) -> &[WatchlistEntry] {
        &self.entries
    }

    pub fn contains(&self, symbol: &Symbol) -> bool {
        self.entries.iter().any(|entry| &entry.symbol == symbol)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Full-file rewrite of the persisted representation.
    fn persist(&self) -> Result<(), WatchlistError> {
        let payload = serde_json::to_string(&self.entries).map_err(|error| {
            WatchlistError::Persist {
                path: self.path.clone(),
                source: io::Error::other(error),
            }
        })?;

        fs::write(&self.path, payload).map_err(|source| WatchlistError::Persist {
            path: self.path.clone(),
            source,
        })
    }
}

fn read_entries(path: &Path) -> Option<Vec<WatchlistEntry>> {
    let raw = fs::read_to_string(path).ok()?;
    serde_json::from_str(&raw).ok()
}
