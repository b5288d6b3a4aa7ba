//! # calc_core - Calculator and Unit Conversion Engine
//!
//! `calc_core` is the engine behind Calcdeck, a collection of everyday
//! calculators. It holds the unit conversion tables, the keypad state machine,
//! calculation history, the calculator catalog and the small pieces of user
//! state (favorites, recents, settings) that the front ends persist.
//!
//! ## Design Philosophy
//!
//! - **Pure core**: conversions and keypad transitions are plain functions of their inputs
//! - **JSON-First**: state and results implement Serialize/Deserialize
//! - **Rich Errors**: Structured error types, not just strings
//! - **Injected storage**: persistence goes through the [`storage::Repository`] trait
//!
//! ## Quick Start
//!
//! ```rust
//! use calc_core::units::{convert, LENGTH};
//! use calc_core::Calculator;
//!
//! let km = convert(1.0, "mi", "km", &LENGTH).unwrap();
//! assert!((km - 1.609344).abs() < 1e-9);
//!
//! let mut calc = Calculator::default();
//! calc.press_keys("5 + 3 =").unwrap();
//! assert_eq!(calc.display(), "8");
//! assert_eq!(calc.history().latest().unwrap().expression, "5 + 3");
//! ```
//!
//! ## Modules
//!
//! - [`units`] - Unit tables and conversion (linear kinds plus temperature)
//! - [`calculator`] - Keypad state machine, scientific functions
//! - [`history`] - Bounded calculation history
//! - [`format`] - Result and operand display formatting
//! - [`catalog`] - Calculator registry and search
//! - [`preferences`] - Favorites and recently opened calculators
//! - [`settings`] - User configuration
//! - [`storage`] - Repositories, atomic saves and file locking
//! - [`share`] - Share text and deep links
//! - [`finance`] - Percentage, loan and compound-interest formulas
//! - [`estimate`] - Paint and roofing estimators
//! - [`errors`] - Structured error types

pub mod calculator;
pub mod catalog;
pub mod errors;
pub mod estimate;
pub mod finance;
pub mod format;
pub mod history;
pub mod preferences;
pub mod settings;
pub mod share;
pub mod storage;
pub mod units;

// Re-export commonly used types at crate root for convenience
pub use calculator::{Calculator, CalculatorState, Event};
pub use errors::{CalcError, CalcResult};
pub use history::{CalculationHistory, CalculationHistoryEntry};
pub use settings::Settings;
pub use storage::{FileLock, JsonFileRepository, MemoryRepository, Repository, Storage};
pub use units::{convert, convert_quantity, QuantityKind};
