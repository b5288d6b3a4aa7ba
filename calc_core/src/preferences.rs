//! # Favorites and Recent Calculators
//!
//! Two small lists of calculator ids, each persisted wholesale under its own
//! storage key. Ids are checked against the [`catalog`](crate::catalog) so a
//! typo never ends up stored.

use serde::{Deserialize, Serialize};

use crate::catalog;
use crate::errors::{CalcError, CalcResult};

/// Default number of recently opened calculators kept
pub const DEFAULT_RECENT_CAP: usize = 10;

fn ensure_known(id: &str) -> CalcResult<()> {
    if catalog::find(id).is_none() {
        return Err(CalcError::invalid_input("calculator_id", id, "Not a known calculator"));
    }
    Ok(())
}

/// User's favorite calculators, in the order they were added.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Favorites {
    ids: Vec<String>,
}

impl Favorites {
    pub fn contains(&self, id: &str) -> bool {
        self.ids.iter().any(|f| f == id)
    }

    /// Add a favorite. Returns false if it was already present.
    pub fn add(&mut self, id: &str) -> CalcResult<bool> {
        ensure_known(id)?;
        if self.contains(id) {
            return Ok(false);
        }
        self.ids.push(id.to_string());
        Ok(true)
    }

    /// Remove a favorite. Returns false if it was not present.
    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.ids.len();
        self.ids.retain(|f| f != id);
        self.ids.len() != before
    }

    /// Flip membership. Returns true if `id` is a favorite afterwards.
    pub fn toggle(&mut self, id: &str) -> CalcResult<bool> {
        if self.remove(id) {
            return Ok(false);
        }
        self.add(id)
    }

    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

/// Recently opened calculators, most recent first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecentCalculators {
    cap: usize,
    ids: Vec<String>,
}

impl Default for RecentCalculators {
    fn default() -> Self {
        RecentCalculators::with_cap(DEFAULT_RECENT_CAP)
    }
}

impl RecentCalculators {
    pub fn with_cap(cap: usize) -> Self {
        RecentCalculators {
            cap: cap.max(1),
            ids: Vec::new(),
        }
    }

    /// Record a visit: moves `id` to the front and drops the oldest past the cap
    pub fn record(&mut self, id: &str) -> CalcResult<()> {
        ensure_known(id)?;
        self.ids.retain(|r| r != id);
        self.ids.insert(0, id.to_string());
        self.ids.truncate(self.cap);
        Ok(())
    }

    pub fn set_cap(&mut self, cap: usize) {
        self.cap = cap.max(1);
        self.ids.truncate(self.cap);
    }

    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{MemoryRepository, Repository};

    #[test]
    fn test_toggle_favorite() {
        let mut favorites = Favorites::default();
        assert!(favorites.toggle("paint-calculator").unwrap());
        assert!(favorites.contains("paint-calculator"));
        assert!(!favorites.toggle("paint-calculator").unwrap());
        assert!(favorites.is_empty());
    }

    #[test]
    fn test_duplicate_and_unknown_favorites() {
        let mut favorites = Favorites::default();
        assert!(favorites.add("loan-calculator").unwrap());
        assert!(!favorites.add("loan-calculator").unwrap());
        assert_eq!(favorites.ids().len(), 1);

        let err = favorites.add("flux-capacitor").unwrap_err();
        assert_eq!(err.error_code(), "INVALID_INPUT");
    }

    #[test]
    fn test_recent_moves_to_front_and_caps() {
        let mut recent = RecentCalculators::with_cap(2);
        recent.record("length-converter").unwrap();
        recent.record("area-converter").unwrap();
        recent.record("length-converter").unwrap();
        assert_eq!(recent.ids(), &["length-converter", "area-converter"]);

        recent.record("loan-calculator").unwrap();
        assert_eq!(recent.ids(), &["loan-calculator", "length-converter"]);
    }

    #[test]
    fn test_favorites_serialize_as_plain_array() {
        let mut favorites = Favorites::default();
        favorites.add("basic-calculator").unwrap();
        assert_eq!(serde_json::to_string(&favorites).unwrap(), r#"["basic-calculator"]"#);
    }

    #[test]
    fn test_persist_through_repository() {
        let repo = MemoryRepository::<Favorites>::new();
        let mut favorites = repo.load().unwrap();
        favorites.add("currency-converter").unwrap();
        repo.save(&favorites).unwrap();

        assert!(repo.load().unwrap().contains("currency-converter"));
    }
}
