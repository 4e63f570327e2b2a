//! "Last touched" timestamps for conversation selections.
//!
//! Writes are best effort: nothing in selection sync reads them back, they only
//! feed "recently used" displays.

use crate::core::constants::LAST_SELECTION_PREFIX;
use crate::core::selection::ConversationKey;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

#[derive(Debug)]
pub enum RecencyError {
    /// The backing storage refused the write.
    Unavailable(String),
}

impl fmt::Display for RecencyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecencyError::Unavailable(reason) => write!(f, "Recency storage unavailable: {reason}"),
        }
    }
}

impl std::error::Error for RecencyError {}

/// Write-only sink for recency stamps.
pub trait RecencyStore {
    fn record(&mut self, key: &str, at: DateTime<Utc>) -> Result<(), RecencyError>;
}

/// Record key for a conversation's selection, e.g. `last-selection:new`.
pub fn recency_key(key: &ConversationKey) -> String {
    format!("{LAST_SELECTION_PREFIX}{key}")
}

/// In-memory recency records; serialized as part of the session file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecencyLog {
    entries: BTreeMap<String, DateTime<Utc>>,
}

impl RecencyLog {
    pub fn get(&self, key: &str) -> Option<DateTime<Utc>> {
        self.entries.get(key).copied()
    }

    pub fn last_selection(&self, key: &ConversationKey) -> Option<DateTime<Utc>> {
        self.get(&recency_key(key))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl RecencyStore for RecencyLog {
    fn record(&mut self, key: &str, at: DateTime<Utc>) -> Result<(), RecencyError> {
        self.entries.insert(key.to_string(), at);
        Ok(())
    }
}
