//! # Unit Conversion Engine
//!
//! Table-driven linear conversion. Every unit of a quantity kind carries one
//! scalar factor to that kind's canonical base unit, and a conversion between
//! any two units is a multiply into the base followed by a divide out of it.
//! Adding a unit therefore costs one table row, never a row per existing unit.
//!
//! Temperature is affine rather than scalar and lives in [`temperature`];
//! [`convert_quantity`] routes each kind to the right model.
//!
//! ## Base Units
//!
//! - Length: meters (m)
//! - Weight: grams (g)
//! - Area: square meters (m²)
//! - Currency: US dollars (USD), with static illustrative rates
//!
//! ## Example
//!
//! ```rust
//! use calc_core::units::{convert, UnitTable, QuantityKind};
//!
//! let table = UnitTable::for_kind(QuantityKind::Length).unwrap();
//! let inches = convert(1.0, "ft", "in", table).unwrap();
//! assert!((inches - 12.0).abs() < 1e-9);
//!
//! // Unknown symbols are refused, never defaulted
//! assert!(convert(1.0, "ft", "furlong", table).is_err());
//! ```

pub mod tables;
pub mod temperature;

use std::fmt;
use std::str::FromStr;

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};

pub use tables::{AREA, CURRENCY, LENGTH, WEIGHT};
pub use temperature::{convert_temperature, TemperatureUnit};

// ============================================================================
// Unit Records
// ============================================================================

/// Display grouping for a unit. Never used in conversion math.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnitCategory {
    Metric,
    Imperial,
    UsCustomary,
    Scientific,
    Astronomical,
    Nautical,
    Currency,
}

impl UnitCategory {
    pub fn display_name(&self) -> &'static str {
        match self {
            UnitCategory::Metric => "Metric",
            UnitCategory::Imperial => "Imperial",
            UnitCategory::UsCustomary => "US Customary",
            UnitCategory::Scientific => "Scientific",
            UnitCategory::Astronomical => "Astronomical",
            UnitCategory::Nautical => "Nautical",
            UnitCategory::Currency => "Currency",
        }
    }
}

/// A unit of one quantity kind.
///
/// `to_base` multiplies a quantity expressed in this unit into the kind's
/// base unit. Units are compile-time constants and never change.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Unit {
    /// Human-readable name (e.g., "Square Meters")
    pub name: &'static str,
    /// Lookup key and display suffix (e.g., "m²"), unique within a table
    pub symbol: &'static str,
    /// Factor into the base unit, finite and strictly positive
    pub to_base: f64,
    /// Display grouping
    pub category: Option<UnitCategory>,
}

impl Unit {
    pub const fn new(name: &'static str, symbol: &'static str, to_base: f64, category: UnitCategory) -> Self {
        Unit {
            name,
            symbol,
            to_base,
            category: Some(category),
        }
    }

    /// Whether this is the canonical base unit of its table
    pub fn is_base(&self) -> bool {
        self.to_base == 1.0
    }
}

// ============================================================================
// Quantity Kinds
// ============================================================================

/// A dimension of measurement whose units are mutually convertible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QuantityKind {
    Length,
    Weight,
    Area,
    Currency,
    /// Affine; handled by [`temperature`] instead of a scalar table
    Temperature,
}

impl QuantityKind {
    pub const ALL: [QuantityKind; 5] = [
        QuantityKind::Length,
        QuantityKind::Weight,
        QuantityKind::Area,
        QuantityKind::Currency,
        QuantityKind::Temperature,
    ];

    pub fn display_name(&self) -> &'static str {
        match self {
            QuantityKind::Length => "Length",
            QuantityKind::Weight => "Weight",
            QuantityKind::Area => "Area",
            QuantityKind::Currency => "Currency",
            QuantityKind::Temperature => "Temperature",
        }
    }

    /// Whether conversions go through a scalar [`UnitTable`]
    pub fn is_linear(&self) -> bool {
        !matches!(self, QuantityKind::Temperature)
    }
}

impl fmt::Display for QuantityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for QuantityKind {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "length" | "distance" => Ok(QuantityKind::Length),
            "weight" | "mass" => Ok(QuantityKind::Weight),
            "area" => Ok(QuantityKind::Area),
            "currency" | "money" => Ok(QuantityKind::Currency),
            "temperature" | "temp" => Ok(QuantityKind::Temperature),
            other => Err(CalcError::invalid_input(
                "kind",
                other,
                "Expected one of: length, weight, area, currency, temperature",
            )),
        }
    }
}

// ============================================================================
// Unit Tables
// ============================================================================

/// The full unit set of one linear quantity kind.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct UnitTable {
    pub kind: QuantityKind,
    pub units: &'static [Unit],
}

impl UnitTable {
    /// Table for a linear kind. Temperature has no table.
    pub fn for_kind(kind: QuantityKind) -> Option<&'static UnitTable> {
        match kind {
            QuantityKind::Length => Some(&LENGTH),
            QuantityKind::Weight => Some(&WEIGHT),
            QuantityKind::Area => Some(&AREA),
            QuantityKind::Currency => Some(&CURRENCY),
            QuantityKind::Temperature => None,
        }
    }

    /// All scalar tables
    pub fn all() -> [&'static UnitTable; 4] {
        [&LENGTH, &WEIGHT, &AREA, &CURRENCY]
    }

    /// Find a unit by its symbol.
    pub fn lookup(&self, symbol: &str) -> CalcResult<&'static Unit> {
        let units: &'static [Unit] = self.units;
        units.iter().find(|u| u.symbol == symbol).ok_or_else(|| {
            warn!("unknown {} unit symbol '{}'", self.kind, symbol);
            CalcError::unknown_unit(symbol, self.kind.display_name())
        })
    }

    pub fn contains(&self, symbol: &str) -> bool {
        self.units.iter().any(|u| u.symbol == symbol)
    }

    /// The canonical base unit (`to_base == 1`)
    pub fn base_unit(&self) -> Option<&'static Unit> {
        let units: &'static [Unit] = self.units;
        units.iter().find(|u| u.is_base())
    }

    /// Units in one display group, in table order
    pub fn in_category(&self, category: UnitCategory) -> impl Iterator<Item = &'static Unit> {
        let units: &'static [Unit] = self.units;
        units.iter().filter(move |u| u.category == Some(category))
    }

    /// Check the table invariants: exactly one base unit, every factor
    /// finite and positive, symbols unique.
    pub fn validate(&self) -> CalcResult<()> {
        let base_count = self.units.iter().filter(|u| u.is_base()).count();
        if base_count != 1 {
            return Err(CalcError::Internal {
                message: format!("{} table has {} base units, expected 1", self.kind, base_count),
            });
        }

        for (i, unit) in self.units.iter().enumerate() {
            if !unit.to_base.is_finite() || unit.to_base <= 0.0 {
                return Err(CalcError::Internal {
                    message: format!("{} unit '{}' has invalid factor {}", self.kind, unit.symbol, unit.to_base),
                });
            }
            if self.units[..i].iter().any(|u| u.symbol == unit.symbol) {
                return Err(CalcError::Internal {
                    message: format!("{} table repeats symbol '{}'", self.kind, unit.symbol),
                });
            }
        }

        Ok(())
    }
}

// ============================================================================
// Conversion
// ============================================================================

/// Convert `value` between two units of the same table.
///
/// The path is always `value * from.to_base / to.to_base`. Converting a unit
/// to itself returns `value` untouched.
pub fn convert(value: f64, from_symbol: &str, to_symbol: &str, table: &UnitTable) -> CalcResult<f64> {
    let from = table.lookup(from_symbol)?;
    let to = table.lookup(to_symbol)?;

    if from.symbol == to.symbol {
        return Ok(value);
    }

    let base = value * from.to_base;
    let result = base / to.to_base;
    debug!("convert {} {} -> {} {} ({})", value, from.symbol, result, to.symbol, table.kind);
    Ok(result)
}

/// Convert within any quantity kind, temperature included.
pub fn convert_quantity(kind: QuantityKind, value: f64, from_symbol: &str, to_symbol: &str) -> CalcResult<f64> {
    match UnitTable::for_kind(kind) {
        Some(table) => convert(value, from_symbol, to_symbol, table),
        None => {
            let from: TemperatureUnit = from_symbol.parse()?;
            let to: TemperatureUnit = to_symbol.parse()?;
            Ok(convert_temperature(value, from, to))
        }
    }
}

/// Parse a raw numeric field.
///
/// Whitespace is trimmed and `,` thousands separators are dropped. Anything
/// that does not produce a finite number yields `None`, which callers show as
/// "no result yet".
pub fn parse_input(raw: &str) -> Option<f64> {
    let cleaned: String = raw.trim().chars().filter(|c| *c != ',').collect();
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// One conversion built from the current form state and consumed immediately.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversionRequest {
    pub value: f64,
    pub from: String,
    pub to: String,
}

impl ConversionRequest {
    /// Build a request from raw field text. Malformed numbers give `None`.
    pub fn parse(raw_value: &str, from: impl Into<String>, to: impl Into<String>) -> Option<Self> {
        parse_input(raw_value).map(|value| ConversionRequest {
            value,
            from: from.into(),
            to: to.into(),
        })
    }

    pub fn evaluate(&self, kind: QuantityKind) -> CalcResult<f64> {
        convert_quantity(kind, self.value, &self.from, &self.to)
    }

    /// Request for the opposite direction, carrying `result` as its value
    pub fn swapped(&self, result: f64) -> Self {
        ConversionRequest {
            value: result,
            from: self.to.clone(),
            to: self.from.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLES: [f64; 5] = [0.0, 1.0, -1.0, 1e-3, 1e6];

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() <= 1e-9 * b.abs().max(1.0)
    }

    #[test]
    fn test_every_table_is_valid() {
        for table in UnitTable::all() {
            table.validate().unwrap();
            assert_eq!(table.units.iter().filter(|u| u.to_base == 1.0).count(), 1);
        }
    }

    #[test]
    fn test_round_trip_all_pairs() {
        for table in UnitTable::all() {
            for a in table.units {
                for b in table.units {
                    for v in SAMPLES {
                        let there = convert(v, a.symbol, b.symbol, table).unwrap();
                        let back = convert(there, b.symbol, a.symbol, table).unwrap();
                        assert!(close(back, v), "{} {} -> {} -> {}: got {}", v, a.symbol, b.symbol, a.symbol, back);
                    }
                }
            }
        }
    }

    #[test]
    fn test_identity_is_exact() {
        for table in UnitTable::all() {
            for unit in table.units {
                for v in [0.1, 1.0 / 3.0, -7.25, 123456.789] {
                    assert_eq!(convert(v, unit.symbol, unit.symbol, table).unwrap(), v);
                }
            }
        }
    }

    #[test]
    fn test_known_factors() {
        assert!(close(convert(1.0, "mi", "km", &LENGTH).unwrap(), 1.609344));
        assert!(close(convert(1.0, "kg", "lb", &WEIGHT).unwrap(), 2.2046226218));
        assert!(close(convert(1.0, "ac", "m²", &AREA).unwrap(), 4046.8564224));
        assert!(close(convert(1.0, "ha", "ac", &AREA).unwrap(), 2.4710538147));
    }

    #[test]
    fn test_unknown_symbol_is_refused() {
        let err = convert(1.0, "m", "parsec-ish", &LENGTH).unwrap_err();
        assert_eq!(err.error_code(), "UNKNOWN_UNIT");
        assert!(convert(1.0, "nope", "m", &LENGTH).is_err());
        // A symbol from another kind is just as unknown
        assert!(convert(1.0, "kg", "m", &LENGTH).is_err());
    }

    #[test]
    fn test_parse_input() {
        assert_eq!(parse_input(" 42 "), Some(42.0));
        assert_eq!(parse_input("1,234.5"), Some(1234.5));
        assert_eq!(parse_input("-0.25"), Some(-0.25));
        assert_eq!(parse_input(""), None);
        assert_eq!(parse_input("abc"), None);
        assert_eq!(parse_input("NaN"), None);
        assert_eq!(parse_input("inf"), None);
    }

    #[test]
    fn test_conversion_request() {
        assert!(ConversionRequest::parse("12x", "ft", "in").is_none());

        let req = ConversionRequest::parse("3", "ft", "in").unwrap();
        let result = req.evaluate(QuantityKind::Length).unwrap();
        assert!(close(result, 36.0));

        let back = req.swapped(result).evaluate(QuantityKind::Length).unwrap();
        assert!(close(back, 3.0));
    }

    #[test]
    fn test_convert_quantity_routes_temperature() {
        let f = convert_quantity(QuantityKind::Temperature, 100.0, "°C", "°F").unwrap();
        assert!(close(f, 212.0));
        assert!(convert_quantity(QuantityKind::Temperature, 1.0, "°C", "m").is_err());
    }

    #[test]
    fn test_kind_parsing() {
        assert_eq!("Mass".parse::<QuantityKind>().unwrap(), QuantityKind::Weight);
        assert_eq!("temp".parse::<QuantityKind>().unwrap(), QuantityKind::Temperature);
        assert!("volume".parse::<QuantityKind>().is_err());
        assert!(UnitTable::for_kind(QuantityKind::Temperature).is_none());
    }

    #[test]
    fn test_category_grouping() {
        let astro: Vec<_> = LENGTH.in_category(UnitCategory::Astronomical).map(|u| u.symbol).collect();
        assert!(astro.contains(&"ly"));
        assert!(!astro.contains(&"m"));
    }
}
