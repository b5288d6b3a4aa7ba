//! # Settings
//!
//! User-level configuration stored as `settings.json` in the data directory.
//! A missing file means defaults, and a file missing some fields gets the
//! defaults for those fields.
//!
//! ```rust
//! use calc_core::settings::Settings;
//! use calc_core::units::QuantityKind;
//!
//! let settings = Settings::default();
//! assert_eq!(settings.history_cap, 20);
//! assert_eq!(settings.default_units(QuantityKind::Length), ("m", "ft"));
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::calculator::AngleMode;
use crate::errors::{CalcError, CalcResult};
use crate::history::DEFAULT_HISTORY_CAP;
use crate::preferences::DEFAULT_RECENT_CAP;
use crate::storage::{validate_version, write_atomic, SCHEMA_VERSION};
use crate::units::QuantityKind;

/// Upper bound for the history cap
pub const MAX_HISTORY_CAP: usize = 100;

const SETTINGS_FILE: &str = "settings.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Schema version (for migration compatibility)
    pub version: String,

    /// Angle mode a new scientific calculator starts in
    pub angle_mode: AngleMode,

    /// Entries kept in each calculator's history (1..=100)
    pub history_cap: usize,

    /// Recently opened calculators kept
    pub recent_cap: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            version: SCHEMA_VERSION.to_string(),
            angle_mode: AngleMode::Degrees,
            history_cap: DEFAULT_HISTORY_CAP,
            recent_cap: DEFAULT_RECENT_CAP,
        }
    }
}

impl Settings {
    pub fn path_in(dir: &Path) -> PathBuf {
        dir.join(SETTINGS_FILE)
    }

    /// Load from `dir`, falling back to defaults when no file exists.
    pub fn load(dir: &Path) -> CalcResult<Self> {
        let path = Self::path_in(dir);
        if !path.exists() {
            return Ok(Settings::default());
        }

        let contents = std::fs::read_to_string(&path)
            .map_err(|e| CalcError::file_error("read", path.display().to_string(), e.to_string()))?;
        let settings: Settings = serde_json::from_str(&contents).map_err(|e| CalcError::SerializationError {
            reason: format!("Invalid JSON in {}: {}", path.display(), e),
        })?;

        validate_version(&settings.version)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn save(&self, dir: &Path) -> CalcResult<()> {
        self.validate()?;
        std::fs::create_dir_all(dir)
            .map_err(|e| CalcError::file_error("create directory", dir.display().to_string(), e.to_string()))?;
        let json = serde_json::to_string_pretty(self)?;
        write_atomic(&Self::path_in(dir), json.as_bytes())
    }

    pub fn validate(&self) -> CalcResult<()> {
        if self.history_cap == 0 || self.history_cap > MAX_HISTORY_CAP {
            return Err(CalcError::invalid_input(
                "history_cap",
                self.history_cap.to_string(),
                format!("History cap must be between 1 and {}", MAX_HISTORY_CAP),
            ));
        }
        if self.recent_cap == 0 {
            return Err(CalcError::invalid_input("recent_cap", "0", "Recent list cap must be at least 1"));
        }
        Ok(())
    }

    /// Default (from, to) unit pair a converter opens with
    pub fn default_units(&self, kind: QuantityKind) -> (&'static str, &'static str) {
        match kind {
            QuantityKind::Length => ("m", "ft"),
            QuantityKind::Weight => ("kg", "lb"),
            QuantityKind::Area => ("m²", "ft²"),
            QuantityKind::Currency => ("USD", "EUR"),
            QuantityKind::Temperature => ("°C", "°F"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::units::{TemperatureUnit, UnitTable};

    #[test]
    fn test_missing_file_gives_defaults() {
        let temp = tempfile::tempdir().unwrap();
        assert_eq!(Settings::load(temp.path()).unwrap(), Settings::default());
    }

    #[test]
    fn test_roundtrip() {
        let temp = tempfile::tempdir().unwrap();
        let settings = Settings {
            angle_mode: AngleMode::Radians,
            history_cap: 10,
            ..Default::default()
        };
        settings.save(temp.path()).unwrap();
        assert_eq!(Settings::load(temp.path()).unwrap(), settings);
    }

    #[test]
    fn test_partial_file_uses_field_defaults() {
        let temp = tempfile::tempdir().unwrap();
        std::fs::write(Settings::path_in(temp.path()), r#"{ "angle_mode": "Radians" }"#).unwrap();

        let settings = Settings::load(temp.path()).unwrap();
        assert_eq!(settings.angle_mode, AngleMode::Radians);
        assert_eq!(settings.history_cap, DEFAULT_HISTORY_CAP);
    }

    #[test]
    fn test_invalid_history_cap() {
        let settings = Settings {
            history_cap: 0,
            ..Default::default()
        };
        assert!(settings.validate().is_err());

        let temp = tempfile::tempdir().unwrap();
        std::fs::write(Settings::path_in(temp.path()), r#"{ "history_cap": 500 }"#).unwrap();
        assert!(Settings::load(temp.path()).is_err());
    }

    #[test]
    fn test_newer_schema_rejected() {
        let temp = tempfile::tempdir().unwrap();
        std::fs::write(Settings::path_in(temp.path()), r#"{ "version": "0.9.0" }"#).unwrap();
        let err = Settings::load(temp.path()).unwrap_err();
        assert_eq!(err.error_code(), "VERSION_MISMATCH");
    }

    #[test]
    fn test_default_units_exist() {
        let settings = Settings::default();
        for kind in QuantityKind::ALL {
            let (from, to) = settings.default_units(kind);
            match UnitTable::for_kind(kind) {
                Some(table) => assert!(table.contains(from) && table.contains(to)),
                None => {
                    assert!(from.parse::<TemperatureUnit>().is_ok());
                    assert!(to.parse::<TemperatureUnit>().is_ok());
                }
            }
        }
    }
}
