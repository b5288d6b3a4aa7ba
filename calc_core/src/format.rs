//! # Number Formatting
//!
//! Two presentation policies:
//!
//! - [`format_result`] for converter and estimator outputs, which are read by
//!   people and never parsed back.
//! - [`format_operand`] for the keypad display, which must always parse back
//!   to the same finite number because it doubles as the next operand.
//!
//! ```rust
//! use calc_core::format::{format_result, format_operand};
//!
//! assert_eq!(format_result(1234.5678), "1,234.57");
//! assert_eq!(format_result(0.5), "0.5000");
//! assert_eq!(format_result(2.5e7), "2.500000e7");
//! assert_eq!(format_operand(0.1 + 0.2), "0.3");
//! ```

/// Text shown in place of a number when a result is mathematically undefined
pub const UNDEFINED_DISPLAY: &str = "Undefined";

/// Fractional mantissa digits kept on the keypad display (13 significant)
const OPERAND_MANTISSA_DIGITS: usize = 12;

/// Format a converter/estimator result.
///
/// - zero renders as `0`
/// - magnitudes below 1e-6 or at/above 1e6 use exponential notation with 6
///   fractional digits
/// - magnitudes under 1 use 4 to 6 fixed decimals
/// - everything else gets thousands separators and at most 2 decimals
pub fn format_result(value: f64) -> String {
    if !value.is_finite() {
        return UNDEFINED_DISPLAY.to_string();
    }
    if value == 0.0 {
        return "0".to_string();
    }

    let magnitude = value.abs();
    if !(1e-6..1e6).contains(&magnitude) {
        return format!("{:.6e}", value);
    }

    let sign = if value < 0.0 { "-" } else { "" };

    if magnitude < 1.0 {
        let fixed = format!("{:.6}", magnitude);
        return format!("{}{}", sign, trim_decimals(&fixed, 4));
    }

    let fixed = format!("{:.2}", magnitude);
    let trimmed = trim_decimals(&fixed, 0);
    let (int_part, frac_part) = match trimmed.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (trimmed.as_str(), None),
    };

    let mut out = format!("{}{}", sign, group_thousands(int_part));
    if let Some(frac) = frac_part {
        out.push('.');
        out.push_str(frac);
    }
    out
}

/// Format a value for the keypad display.
///
/// Rounds to 13 significant digits, which removes binary noise (0.1 + 0.2
/// shows `0.3`) at any magnitude while keeping tiny non-zero values non-zero.
/// Drops trailing zeros and never produces `-0`. Non-finite values have no
/// display form; callers switch to [`UNDEFINED_DISPLAY`] before getting here.
pub fn format_operand(value: f64) -> String {
    let rounded = format!("{:.*e}", OPERAND_MANTISSA_DIGITS, value)
        .parse::<f64>()
        .ok()
        .filter(|r| r.is_finite())
        .unwrap_or(value);

    // -0.0 == 0.0, so this also clears the sign
    if rounded == 0.0 {
        return "0".to_string();
    }
    format!("{}", rounded)
}

/// Parse a keypad display. Anything that is not a finite number counts as 0.
pub fn parse_operand(display: &str) -> f64 {
    display
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}

fn trim_decimals(fixed: &str, min_decimals: usize) -> String {
    let Some((int_part, frac)) = fixed.split_once('.') else {
        return fixed.to_string();
    };

    let mut frac = frac.trim_end_matches('0').to_string();
    while frac.len() < min_decimals {
        frac.push('0');
    }

    if frac.is_empty() {
        int_part.to_string()
    } else {
        format!("{}.{}", int_part, frac)
    }
}

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero() {
        assert_eq!(format_result(0.0), "0");
        assert_eq!(format_result(-0.0), "0");
    }

    #[test]
    fn test_exponential_range() {
        assert_eq!(format_result(1e6), "1.000000e6");
        assert_eq!(format_result(9.4607304725808e15), "9.460730e15");
        assert_eq!(format_result(5e-7), "5.000000e-7");
        assert_eq!(format_result(-2e9), "-2.000000e9");
    }

    #[test]
    fn test_small_values() {
        assert_eq!(format_result(0.5), "0.5000");
        assert_eq!(format_result(0.123456789), "0.123457");
        assert_eq!(format_result(-0.0254), "-0.0254");
    }

    #[test]
    fn test_grouped_values() {
        assert_eq!(format_result(1.0), "1");
        assert_eq!(format_result(12.0), "12");
        assert_eq!(format_result(1234.0), "1,234");
        assert_eq!(format_result(999_999.5), "999,999.5");
        assert_eq!(format_result(-45_359.237), "-45,359.24");
    }

    #[test]
    fn test_non_finite_is_undefined() {
        assert_eq!(format_result(f64::NAN), UNDEFINED_DISPLAY);
        assert_eq!(format_result(f64::INFINITY), UNDEFINED_DISPLAY);
    }

    #[test]
    fn test_operand_formatting() {
        assert_eq!(format_operand(8.0), "8");
        assert_eq!(format_operand(2.5), "2.5");
        assert_eq!(format_operand(0.1 + 0.2), "0.3");
        assert_eq!(format_operand(-0.0), "0");
        assert_eq!(format_operand(-7.0), "-7");
        assert_eq!(format_operand(30f64.to_radians().sin()), "0.5");
    }

    #[test]
    fn test_operand_keeps_tiny_values() {
        let tiny = 1.0 / 3_000_000_000_000.0;
        let shown = format_operand(tiny);
        assert_ne!(shown, "0");
        assert!((parse_operand(&shown) - tiny).abs() <= 1e-12 * tiny);

        assert_eq!(format_operand(0.00001 * 0.000001), "0.00000000001");
        assert!(parse_operand(&format_operand(f64::MAX)) > 1e308);
    }

    #[test]
    fn test_operand_round_trips() {
        for v in [1.0 / 3.0, 123_456.789, -42.125, 1e20, 3.14159] {
            let shown = format_operand(v);
            let parsed = parse_operand(&shown);
            assert!((parsed - v).abs() <= 1e-9 * v.abs().max(1.0), "{} -> {}", v, shown);
        }
    }

    #[test]
    fn test_parse_operand_defaults_to_zero() {
        assert_eq!(parse_operand("12.5"), 12.5);
        assert_eq!(parse_operand("0."), 0.0);
        assert_eq!(parse_operand("-"), 0.0);
        assert_eq!(parse_operand("garbage"), 0.0);
    }
}
