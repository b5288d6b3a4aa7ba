//! Scientific keypad functions.
//!
//! Unary functions act on the current display value. Trig functions read the
//! angle mode and convert degrees to radians first. Any result that is not a
//! finite number comes back as `None` and the keypad shows `Undefined`.

use std::f64::consts;

use serde::{Deserialize, Serialize};

/// |cos| below which tan is treated as undefined
const TAN_POLE_TOLERANCE: f64 = 1e-12;

/// Largest n with a finite n! in f64
const MAX_FACTORIAL: f64 = 170.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum AngleMode {
    #[default]
    Degrees,
    Radians,
}

impl AngleMode {
    pub fn toggled(self) -> Self {
        match self {
            AngleMode::Degrees => AngleMode::Radians,
            AngleMode::Radians => AngleMode::Degrees,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AngleMode::Degrees => "DEG",
            AngleMode::Radians => "RAD",
        }
    }

    fn to_radians(self, angle: f64) -> f64 {
        match self {
            AngleMode::Degrees => angle.to_radians(),
            AngleMode::Radians => angle,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnaryFunction {
    Sin,
    Cos,
    Tan,
    Log10,
    Ln,
    Sqrt,
    Square,
    Cube,
    Reciprocal,
    Negate,
    Factorial,
}

impl UnaryFunction {
    pub const ALL: [UnaryFunction; 11] = [
        UnaryFunction::Sin,
        UnaryFunction::Cos,
        UnaryFunction::Tan,
        UnaryFunction::Log10,
        UnaryFunction::Ln,
        UnaryFunction::Sqrt,
        UnaryFunction::Square,
        UnaryFunction::Cube,
        UnaryFunction::Reciprocal,
        UnaryFunction::Negate,
        UnaryFunction::Factorial,
    ];

    /// Key label as it appears on the keypad
    pub fn label(&self) -> &'static str {
        match self {
            UnaryFunction::Sin => "sin",
            UnaryFunction::Cos => "cos",
            UnaryFunction::Tan => "tan",
            UnaryFunction::Log10 => "log",
            UnaryFunction::Ln => "ln",
            UnaryFunction::Sqrt => "√",
            UnaryFunction::Square => "x²",
            UnaryFunction::Cube => "x³",
            UnaryFunction::Reciprocal => "1/x",
            UnaryFunction::Negate => "±",
            UnaryFunction::Factorial => "n!",
        }
    }

    /// History text for applying this function to `operand`
    pub fn expression(&self, operand: &str) -> String {
        match self {
            UnaryFunction::Sin => format!("sin({})", operand),
            UnaryFunction::Cos => format!("cos({})", operand),
            UnaryFunction::Tan => format!("tan({})", operand),
            UnaryFunction::Log10 => format!("log({})", operand),
            UnaryFunction::Ln => format!("ln({})", operand),
            UnaryFunction::Sqrt => format!("√({})", operand),
            UnaryFunction::Square => format!("({})²", operand),
            UnaryFunction::Cube => format!("({})³", operand),
            UnaryFunction::Reciprocal => format!("1/({})", operand),
            UnaryFunction::Negate => format!("negate({})", operand),
            UnaryFunction::Factorial => format!("{}!", operand),
        }
    }

    /// Apply to `x`. `None` means the result is undefined.
    pub fn apply(&self, x: f64, mode: AngleMode) -> Option<f64> {
        let result = match self {
            UnaryFunction::Sin => mode.to_radians(x).sin(),
            UnaryFunction::Cos => mode.to_radians(x).cos(),
            UnaryFunction::Tan => {
                let angle = mode.to_radians(x);
                // Odd multiples of 90° land a few ulps off π/2, so cos is tiny, not 0
                if angle.cos().abs() < TAN_POLE_TOLERANCE {
                    return None;
                }
                angle.tan()
            }
            UnaryFunction::Log10 if x <= 0.0 => return None,
            UnaryFunction::Log10 => x.log10(),
            UnaryFunction::Ln if x <= 0.0 => return None,
            UnaryFunction::Ln => x.ln(),
            UnaryFunction::Sqrt if x < 0.0 => return None,
            UnaryFunction::Sqrt => x.sqrt(),
            UnaryFunction::Square => x * x,
            UnaryFunction::Cube => x * x * x,
            UnaryFunction::Reciprocal if x == 0.0 => return None,
            UnaryFunction::Reciprocal => 1.0 / x,
            UnaryFunction::Negate => -x,
            UnaryFunction::Factorial => factorial(x)?,
        };
        Some(result).filter(|r| r.is_finite())
    }
}

/// n! for non-negative integers. No gamma extension.
pub fn factorial(n: f64) -> Option<f64> {
    if n < 0.0 || n.fract() != 0.0 || n > MAX_FACTORIAL {
        return None;
    }
    Some((2..=n as u64).fold(1.0, |acc, k| acc * k as f64))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Constant {
    Pi,
    E,
}

impl Constant {
    pub fn value(&self) -> f64 {
        match self {
            Constant::Pi => consts::PI,
            Constant::E => consts::E,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Constant::Pi => "π",
            Constant::E => "e",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(actual: Option<f64>, expected: f64) {
        let actual = actual.expect("expected a defined result");
        assert!((actual - expected).abs() < 1e-9, "expected {}, got {}", expected, actual);
    }

    #[test]
    fn test_trig_respects_angle_mode() {
        approx(UnaryFunction::Sin.apply(30.0, AngleMode::Degrees), 0.5);
        approx(UnaryFunction::Cos.apply(consts::PI, AngleMode::Radians), -1.0);
        approx(UnaryFunction::Tan.apply(45.0, AngleMode::Degrees), 1.0);
    }

    #[test]
    fn test_tan_poles_are_undefined() {
        for deg in [90.0, 270.0, -90.0, 450.0] {
            assert_eq!(UnaryFunction::Tan.apply(deg, AngleMode::Degrees), None, "tan({})", deg);
        }
        assert_eq!(UnaryFunction::Tan.apply(consts::FRAC_PI_2, AngleMode::Radians), None);
        approx(UnaryFunction::Tan.apply(180.0, AngleMode::Degrees), 0.0);
        assert!(UnaryFunction::Tan.apply(89.9, AngleMode::Degrees).is_some());
    }

    #[test]
    fn test_logs_and_roots() {
        approx(UnaryFunction::Log10.apply(1000.0, AngleMode::Degrees), 3.0);
        approx(UnaryFunction::Ln.apply(consts::E, AngleMode::Degrees), 1.0);
        approx(UnaryFunction::Sqrt.apply(81.0, AngleMode::Degrees), 9.0);
        assert_eq!(UnaryFunction::Log10.apply(0.0, AngleMode::Degrees), None);
        assert_eq!(UnaryFunction::Ln.apply(-1.0, AngleMode::Degrees), None);
        assert_eq!(UnaryFunction::Sqrt.apply(-4.0, AngleMode::Degrees), None);
    }

    #[test]
    fn test_powers_and_reciprocal() {
        approx(UnaryFunction::Square.apply(-3.0, AngleMode::Degrees), 9.0);
        approx(UnaryFunction::Cube.apply(2.0, AngleMode::Degrees), 8.0);
        approx(UnaryFunction::Reciprocal.apply(4.0, AngleMode::Degrees), 0.25);
        assert_eq!(UnaryFunction::Reciprocal.apply(0.0, AngleMode::Degrees), None);
        approx(UnaryFunction::Negate.apply(5.0, AngleMode::Degrees), -5.0);
    }

    #[test]
    fn test_factorial_domain() {
        assert_eq!(factorial(0.0), Some(1.0));
        assert_eq!(factorial(5.0), Some(120.0));
        assert_eq!(factorial(-1.0), None);
        assert_eq!(factorial(2.5), None);
        assert!(factorial(170.0).unwrap().is_finite());
        assert_eq!(factorial(171.0), None);
    }

    #[test]
    fn test_overflow_is_undefined() {
        assert_eq!(UnaryFunction::Cube.apply(1e200, AngleMode::Degrees), None);
    }

    #[test]
    fn test_expression_text() {
        assert_eq!(UnaryFunction::Sin.expression("30"), "sin(30)");
        assert_eq!(UnaryFunction::Factorial.expression("5"), "5!");
        assert_eq!(UnaryFunction::Square.expression("3"), "(3)²");
    }
}
