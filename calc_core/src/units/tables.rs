//! Unit tables.
//!
//! One row per unit, factor into the kind's base unit. Exact definitions are
//! used where one exists (international inch, avoirdupois pound, acre).
//!
//! Currency rates are fixed illustrative constants in US dollars per unit of
//! each currency. They are not market data.

use super::{QuantityKind, Unit, UnitCategory, UnitTable};

use UnitCategory::*;

/// Length, base: meters
pub static LENGTH: UnitTable = UnitTable {
    kind: QuantityKind::Length,
    units: &[
        Unit::new("Nanometers", "nm", 1e-9, Scientific),
        Unit::new("Micrometers", "µm", 1e-6, Scientific),
        Unit::new("Millimeters", "mm", 0.001, Metric),
        Unit::new("Centimeters", "cm", 0.01, Metric),
        Unit::new("Meters", "m", 1.0, Metric),
        Unit::new("Kilometers", "km", 1000.0, Metric),
        Unit::new("Inches", "in", 0.0254, Imperial),
        Unit::new("Feet", "ft", 0.3048, Imperial),
        Unit::new("Yards", "yd", 0.9144, Imperial),
        Unit::new("Miles", "mi", 1609.344, Imperial),
        Unit::new("Nautical Miles", "nmi", 1852.0, Nautical),
        Unit::new("Astronomical Units", "au", 149_597_870_700.0, Astronomical),
        Unit::new("Light Years", "ly", 9_460_730_472_580_800.0, Astronomical),
        Unit::new("Parsecs", "pc", 3.085_677_581_491_367e16, Astronomical),
    ],
};

/// Weight, base: grams
pub static WEIGHT: UnitTable = UnitTable {
    kind: QuantityKind::Weight,
    units: &[
        Unit::new("Micrograms", "µg", 1e-6, Scientific),
        Unit::new("Milligrams", "mg", 0.001, Metric),
        Unit::new("Carats", "ct", 0.2, Metric),
        Unit::new("Grams", "g", 1.0, Metric),
        Unit::new("Kilograms", "kg", 1000.0, Metric),
        Unit::new("Metric Tons", "t", 1_000_000.0, Metric),
        Unit::new("Ounces", "oz", 28.349_523_125, Imperial),
        Unit::new("Pounds", "lb", 453.592_37, Imperial),
        Unit::new("Stones", "st", 6_350.293_18, Imperial),
        Unit::new("Long Tons", "LT", 1_016_046.908_8, Imperial),
        Unit::new("Short Tons", "ton", 907_184.74, UsCustomary),
    ],
};

/// Area, base: square meters
pub static AREA: UnitTable = UnitTable {
    kind: QuantityKind::Area,
    units: &[
        Unit::new("Square Millimeters", "mm²", 1e-6, Metric),
        Unit::new("Square Centimeters", "cm²", 1e-4, Metric),
        Unit::new("Square Meters", "m²", 1.0, Metric),
        Unit::new("Hectares", "ha", 10_000.0, Metric),
        Unit::new("Square Kilometers", "km²", 1_000_000.0, Metric),
        Unit::new("Square Inches", "in²", 0.000_645_16, Imperial),
        Unit::new("Square Feet", "ft²", 0.092_903_04, Imperial),
        Unit::new("Square Yards", "yd²", 0.836_127_36, Imperial),
        Unit::new("Acres", "ac", 4_046.856_422_4, Imperial),
        Unit::new("Square Miles", "mi²", 2_589_988.110_336, Imperial),
    ],
};

/// Currency, base: US dollars
pub static CURRENCY: UnitTable = UnitTable {
    kind: QuantityKind::Currency,
    units: &[
        Unit::new("US Dollar", "USD", 1.0, Currency),
        Unit::new("Euro", "EUR", 1.08, Currency),
        Unit::new("British Pound", "GBP", 1.27, Currency),
        Unit::new("Japanese Yen", "JPY", 0.0067, Currency),
        Unit::new("Indian Rupee", "INR", 0.012, Currency),
        Unit::new("Canadian Dollar", "CAD", 0.74, Currency),
        Unit::new("Australian Dollar", "AUD", 0.66, Currency),
        Unit::new("Swiss Franc", "CHF", 1.13, Currency),
        Unit::new("Chinese Yuan", "CNY", 0.14, Currency),
        Unit::new("Singapore Dollar", "SGD", 0.74, Currency),
        Unit::new("UAE Dirham", "AED", 0.2723, Currency),
    ],
};
