//! # Calculation History
//!
//! Newest-first, capped list of finished calculations. Each calculator owns
//! its own history; nothing is shared between calculators.
//!
//! ```rust
//! use calc_core::history::{CalculationHistory, CalculationHistoryEntry};
//!
//! let mut history = CalculationHistory::with_cap(2);
//! history.push(CalculationHistoryEntry::new("1 + 1", "2"));
//! history.push(CalculationHistoryEntry::new("2 + 2", "4"));
//! history.push(CalculationHistoryEntry::new("3 + 3", "6"));
//!
//! assert_eq!(history.len(), 2);
//! assert_eq!(history.latest().unwrap().result, "6");
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Default number of entries kept
pub const DEFAULT_HISTORY_CAP: usize = 20;

/// One finished calculation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationHistoryEntry {
    pub id: Uuid,
    /// What was computed (e.g., "5 + 3", "sin(30)")
    pub expression: String,
    /// Display form of the outcome
    pub result: String,
    pub timestamp: DateTime<Utc>,
}

impl CalculationHistoryEntry {
    pub fn new(expression: impl Into<String>, result: impl Into<String>) -> Self {
        CalculationHistoryEntry {
            id: Uuid::new_v4(),
            expression: expression.into(),
            result: result.into(),
            timestamp: Utc::now(),
        }
    }
}

/// Capped, newest-first history.
///
/// Insertion is always at index 0; once the cap is exceeded the oldest
/// entries fall off the end.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationHistory {
    cap: usize,
    entries: Vec<CalculationHistoryEntry>,
}

impl CalculationHistory {
    /// Create an empty history. A cap of 0 is raised to 1.
    pub fn with_cap(cap: usize) -> Self {
        CalculationHistory {
            cap: cap.max(1),
            entries: Vec::new(),
        }
    }

    pub fn cap(&self) -> usize {
        self.cap
    }

    /// Change the cap, evicting the oldest entries if needed
    pub fn set_cap(&mut self, cap: usize) {
        self.cap = cap.max(1);
        self.entries.truncate(self.cap);
    }

    pub fn push(&mut self, entry: CalculationHistoryEntry) {
        self.entries.insert(0, entry);
        self.entries.truncate(self.cap);
    }

    /// Remove one entry by id. Returns the removed entry if it existed.
    pub fn remove(&mut self, id: &Uuid) -> Option<CalculationHistoryEntry> {
        let index = self.entries.iter().position(|e| &e.id == id)?;
        Some(self.entries.remove(index))
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn latest(&self) -> Option<&CalculationHistoryEntry> {
        self.entries.first()
    }

    pub fn get(&self, index: usize) -> Option<&CalculationHistoryEntry> {
        self.entries.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &CalculationHistoryEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for CalculationHistory {
    fn default() -> Self {
        CalculationHistory::with_cap(DEFAULT_HISTORY_CAP)
    }
}
