use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

/// Number of committed calculations kept.
pub const HISTORY_LIMIT: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub expression: String,
    pub result: String,
}

/// Committed calculations, newest first. Recording beyond
/// [`HISTORY_LIMIT`] evicts the oldest entry.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct History {
    entries: VecDeque<HistoryEntry>,
}

impl History {
    pub fn new() -> Self {
        History::default()
    }

    /// Builds a history from entries ordered newest first, keeping only the
    /// most recent ones.
    pub fn from_entries<I>(entries: I) -> Self
        where I: IntoIterator<Item = HistoryEntry>
    {
        History {
            entries: entries.into_iter().take(HISTORY_LIMIT).collect(),
        }
    }

    pub fn record<T, U>(&mut self, expression: T, result: U)
        where T: Into<String>, U: Into<String>
    {
        self.entries.push_front(HistoryEntry {
            expression: expression.into(),
            result: result.into(),
        });
        self.entries.truncate(HISTORY_LIMIT);
    }

    pub fn get(&self, index: usize) -> Option<&HistoryEntry> {
        self.entries.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
