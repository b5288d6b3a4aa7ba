//! Temperature conversion.
//!
//! Celsius, Fahrenheit and Kelvin are related by offsets as well as scale, so
//! they cannot share the scalar `to_base` model. Each pair gets its own
//! closed-form formula:
//!
//! - °F = °C × 9/5 + 32
//! - K = °C + 273.15
//!
//! ```rust
//! use calc_core::units::{convert_temperature, TemperatureUnit};
//!
//! let f = convert_temperature(100.0, TemperatureUnit::Celsius, TemperatureUnit::Fahrenheit);
//! assert!((f - 212.0).abs() < 1e-9);
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::CalcError;

const KELVIN_OFFSET: f64 = 273.15;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TemperatureUnit {
    Celsius,
    Fahrenheit,
    Kelvin,
}

impl TemperatureUnit {
    pub const ALL: [TemperatureUnit; 3] = [
        TemperatureUnit::Celsius,
        TemperatureUnit::Fahrenheit,
        TemperatureUnit::Kelvin,
    ];

    pub fn symbol(&self) -> &'static str {
        match self {
            TemperatureUnit::Celsius => "°C",
            TemperatureUnit::Fahrenheit => "°F",
            TemperatureUnit::Kelvin => "K",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            TemperatureUnit::Celsius => "Celsius",
            TemperatureUnit::Fahrenheit => "Fahrenheit",
            TemperatureUnit::Kelvin => "Kelvin",
        }
    }
}

impl fmt::Display for TemperatureUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for TemperatureUnit {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "°C" | "C" | "c" => return Ok(TemperatureUnit::Celsius),
            "°F" | "F" | "f" => return Ok(TemperatureUnit::Fahrenheit),
            "K" | "k" => return Ok(TemperatureUnit::Kelvin),
            _ => {}
        }
        match s.trim().to_ascii_lowercase().as_str() {
            "celsius" => Ok(TemperatureUnit::Celsius),
            "fahrenheit" => Ok(TemperatureUnit::Fahrenheit),
            "kelvin" => Ok(TemperatureUnit::Kelvin),
            _ => Err(CalcError::unknown_unit(s, "Temperature")),
        }
    }
}

/// Convert a temperature reading between scales.
pub fn convert_temperature(value: f64, from: TemperatureUnit, to: TemperatureUnit) -> f64 {
    use TemperatureUnit::*;

    match (from, to) {
        (Celsius, Fahrenheit) => value * 9.0 / 5.0 + 32.0,
        (Celsius, Kelvin) => value + KELVIN_OFFSET,
        (Fahrenheit, Celsius) => (value - 32.0) * 5.0 / 9.0,
        (Fahrenheit, Kelvin) => (value - 32.0) * 5.0 / 9.0 + KELVIN_OFFSET,
        (Kelvin, Celsius) => value - KELVIN_OFFSET,
        (Kelvin, Fahrenheit) => (value - KELVIN_OFFSET) * 9.0 / 5.0 + 32.0,
        _ => value,
    }
}
