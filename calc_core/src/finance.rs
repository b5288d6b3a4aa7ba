//! # Finance Calculators
//!
//! Closed-form percentage, loan and compound-interest formulas. Inputs and
//! results are plain serializable structs, following the
//! `*Input -> CalcResult<*Result>` shape used across the crate.
//!
//! ## Example
//!
//! ```rust
//! use calc_core::finance::{loan_payment, LoanInput};
//!
//! let loan = LoanInput { principal: 200_000.0, annual_rate_percent: 6.0, years: 30.0 };
//! let result = loan_payment(&loan).unwrap();
//! assert!((result.monthly_payment - 1199.10).abs() < 0.01);
//! ```

use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};

fn require_finite(field: &str, value: f64) -> CalcResult<()> {
    if !value.is_finite() {
        return Err(CalcError::invalid_input(field, value.to_string(), "Must be a finite number"));
    }
    Ok(())
}

fn require_positive(field: &str, value: f64) -> CalcResult<()> {
    require_finite(field, value)?;
    if value <= 0.0 {
        return Err(CalcError::invalid_input(field, value.to_string(), "Must be greater than zero"));
    }
    Ok(())
}

fn require_non_negative(field: &str, value: f64) -> CalcResult<()> {
    require_finite(field, value)?;
    if value < 0.0 {
        return Err(CalcError::invalid_input(field, value.to_string(), "Must not be negative"));
    }
    Ok(())
}

// ============================================================================
// Percentages
// ============================================================================

/// `percent`% of `value`
pub fn percentage_of(percent: f64, value: f64) -> f64 {
    percent / 100.0 * value
}

/// Change from `from` to `to` in percent. Undefined when `from` is zero.
pub fn percent_change(from: f64, to: f64) -> CalcResult<f64> {
    if from == 0.0 {
        return Err(CalcError::undefined("percent_change", "Starting value is zero"));
    }
    Ok((to - from) / from.abs() * 100.0)
}

// ============================================================================
// Loans
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LoanInput {
    pub principal: f64,
    /// Nominal annual interest rate in percent (6.5 = 6.5%)
    pub annual_rate_percent: f64,
    pub years: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LoanResult {
    pub monthly_payment: f64,
    pub total_payment: f64,
    pub total_interest: f64,
    pub months: u32,
}

/// Fixed monthly payment for an amortized loan.
///
/// `P·r·(1+r)^n / ((1+r)^n − 1)` with monthly rate `r`; straight division
/// when the rate is zero.
pub fn loan_payment(input: &LoanInput) -> CalcResult<LoanResult> {
    require_positive("principal", input.principal)?;
    require_non_negative("annual_rate_percent", input.annual_rate_percent)?;
    require_positive("years", input.years)?;

    let months = (input.years * 12.0).round();
    if months < 1.0 {
        return Err(CalcError::invalid_input("years", input.years.to_string(), "Term is shorter than one month"));
    }

    let r = input.annual_rate_percent / 100.0 / 12.0;
    let monthly_payment = if r == 0.0 {
        input.principal / months
    } else {
        let growth = (1.0 + r).powf(months);
        input.principal * r * growth / (growth - 1.0)
    };

    let total_payment = monthly_payment * months;
    Ok(LoanResult {
        monthly_payment,
        total_payment,
        total_interest: total_payment - input.principal,
        months: months as u32,
    })
}

// ============================================================================
// Compound interest
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CompoundInput {
    pub principal: f64,
    pub annual_rate_percent: f64,
    pub years: f64,
    /// 1 = yearly, 12 = monthly, 365 = daily
    pub compounds_per_year: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CompoundResult {
    pub final_amount: f64,
    pub interest_earned: f64,
}

/// `A = P(1 + r/n)^(n·t)`
pub fn compound_interest(input: &CompoundInput) -> CalcResult<CompoundResult> {
    require_non_negative("principal", input.principal)?;
    require_non_negative("annual_rate_percent", input.annual_rate_percent)?;
    require_non_negative("years", input.years)?;
    if input.compounds_per_year == 0 {
        return Err(CalcError::invalid_input("compounds_per_year", "0", "Must compound at least once a year"));
    }

    let n = input.compounds_per_year as f64;
    let r = input.annual_rate_percent / 100.0;
    let final_amount = input.principal * (1.0 + r / n).powf(n * input.years);

    if !final_amount.is_finite() {
        return Err(CalcError::undefined("compound_interest", "Result overflows"));
    }

    Ok(CompoundResult {
        final_amount,
        interest_earned: final_amount - input.principal,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percentages() {
        assert!((percentage_of(15.0, 80.0) - 12.0).abs() < 1e-12);
        assert!((percent_change(50.0, 75.0).unwrap() - 50.0).abs() < 1e-12);
        assert!((percent_change(-50.0, -25.0).unwrap() - 50.0).abs() < 1e-12);
        assert_eq!(percent_change(0.0, 5.0).unwrap_err().error_code(), "UNDEFINED");
    }

    #[test]
    fn test_standard_mortgage() {
        let result = loan_payment(&LoanInput {
            principal: 200_000.0,
            annual_rate_percent: 6.0,
            years: 30.0,
        })
        .unwrap();

        // 200k at 6% over 360 months = 1199.10/month
        assert!((result.monthly_payment - 1199.10).abs() < 0.01);
        assert_eq!(result.months, 360);
        assert!((result.total_interest - (result.total_payment - 200_000.0)).abs() < 1e-6);
    }

    #[test]
    fn test_zero_rate_loan() {
        let result = loan_payment(&LoanInput {
            principal: 1200.0,
            annual_rate_percent: 0.0,
            years: 1.0,
        })
        .unwrap();
        assert!((result.monthly_payment - 100.0).abs() < 1e-9);
        assert!(result.total_interest.abs() < 1e-9);
    }

    #[test]
    fn test_invalid_loans() {
        let base = LoanInput {
            principal: 1000.0,
            annual_rate_percent: 5.0,
            years: 2.0,
        };
        assert!(loan_payment(&LoanInput { principal: 0.0, ..base }).is_err());
        assert!(loan_payment(&LoanInput { annual_rate_percent: -1.0, ..base }).is_err());
        assert!(loan_payment(&LoanInput { years: f64::NAN, ..base }).is_err());
        assert!(loan_payment(&LoanInput { years: 0.01, ..base }).is_err());
    }

    #[test]
    fn test_compound_interest() {
        let result = compound_interest(&CompoundInput {
            principal: 1000.0,
            annual_rate_percent: 5.0,
            years: 10.0,
            compounds_per_year: 12,
        })
        .unwrap();
        // 1000 * (1 + 0.05/12)^120 = 1647.01
        assert!((result.final_amount - 1647.01).abs() < 0.01);
        assert!((result.interest_earned - 647.01).abs() < 0.01);
    }

    #[test]
    fn test_compound_requires_periods() {
        let input = CompoundInput {
            principal: 1000.0,
            annual_rate_percent: 5.0,
            years: 1.0,
            compounds_per_year: 0,
        };
        assert!(compound_interest(&input).is_err());
    }
}
