//! Autosave document bookkeeping.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// What caused a save attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SaveTrigger {
    /// The debounce window elapsed after the last change.
    Debounce,
    /// The periodic interval fired.
    Interval,
    /// The caller asked for an immediate save.
    Manual,
}

impl fmt::Display for SaveTrigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SaveTrigger::Debounce => write!(f, "debounce"),
            SaveTrigger::Interval => write!(f, "interval"),
            SaveTrigger::Manual => write!(f, "manual"),
        }
    }
}

/// A single dispatched save. Not retained after it settles.
#[derive(Debug, Clone)]
pub struct SaveAttempt<T> {
    pub triggered_at: DateTime<Utc>,
    pub trigger: SaveTrigger,
    /// The document value as of dispatch time.
    pub value: T,
}

/// Successful outcome of a document save.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveReceipt {
    /// Identifier assigned by the backend, if it reports one.
    pub record_id: Option<String>,
}

/// Observable autosave state.
///
/// Updated in order for every attempt: `in_flight` goes up before dispatch,
/// then `error`/`last_saved` are settled, then `in_flight` goes down.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveStatus {
    /// When the last successful save settled.
    pub last_saved: Option<DateTime<Utc>>,
    /// Number of save attempts currently awaiting the gateway.
    pub in_flight: u32,
    /// Message of the most recent failure; cleared by the next success.
    pub error: Option<String>,
    /// Backend identifier reported by the most recent successful save.
    pub last_record_id: Option<String>,
}

impl SaveStatus {
    pub fn is_saving(&self) -> bool {
        self.in_flight > 0
    }

    pub fn begin_attempt(&mut self) {
        self.in_flight += 1;
    }

    /// Record a successful attempt and release its in-flight slot.
    pub fn record_success(&mut self, at: DateTime<Utc>, receipt: &SaveReceipt) {
        self.error = None;
        self.last_saved = Some(at);
        if receipt.record_id.is_some() {
            self.last_record_id = receipt.record_id.clone();
        }
        self.in_flight = self.in_flight.saturating_sub(1);
    }

    /// Record a failed attempt and release its in-flight slot.
    ///
    /// `last_saved` is left untouched.
    pub fn record_failure(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
        self.in_flight = self.in_flight.saturating_sub(1);
    }
}
