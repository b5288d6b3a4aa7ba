//! # Calculator Catalog
//!
//! Static directory of every calculator in the suite, used for navigation,
//! favorites validation and search.
//!
//! ```rust
//! use calc_core::catalog::{self, CalculatorCategory};
//!
//! let hits = catalog::search("temp");
//! assert!(hits.iter().any(|c| c.id == "temperature-converter"));
//!
//! assert!(catalog::find("loan-calculator").is_some());
//! assert!(catalog::by_category(CalculatorCategory::Construction).count() >= 2);
//! ```

use std::collections::HashMap;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CalculatorCategory {
    Math,
    Conversion,
    Finance,
    Construction,
    Business,
    Everyday,
}

impl CalculatorCategory {
    pub const ALL: [CalculatorCategory; 6] = [
        CalculatorCategory::Math,
        CalculatorCategory::Conversion,
        CalculatorCategory::Finance,
        CalculatorCategory::Construction,
        CalculatorCategory::Business,
        CalculatorCategory::Everyday,
    ];

    pub fn display_name(&self) -> &'static str {
        match self {
            CalculatorCategory::Math => "Math",
            CalculatorCategory::Conversion => "Unit Conversion",
            CalculatorCategory::Finance => "Finance",
            CalculatorCategory::Construction => "Construction",
            CalculatorCategory::Business => "Business",
            CalculatorCategory::Everyday => "Everyday",
        }
    }
}

/// One calculator listed on the site.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CalculatorInfo {
    /// Stable slug, also the key stored in favorites/recent lists
    pub id: &'static str,
    pub name: &'static str,
    pub category: CalculatorCategory,
    pub description: &'static str,
    pub keywords: &'static [&'static str],
}

impl CalculatorInfo {
    const fn new(
        id: &'static str,
        name: &'static str,
        category: CalculatorCategory,
        description: &'static str,
        keywords: &'static [&'static str],
    ) -> Self {
        CalculatorInfo {
            id,
            name,
            category,
            description,
            keywords,
        }
    }

    /// Case-insensitive match against name, description and keywords.
    /// `needle` must already be lowercase.
    fn matches(&self, needle: &str) -> bool {
        self.name.to_lowercase().contains(needle)
            || self.description.to_lowercase().contains(needle)
            || self.keywords.iter().any(|k| k.contains(needle))
    }
}

use CalculatorCategory::*;

/// Every calculator, in menu order
pub static CALCULATORS: &[CalculatorInfo] = &[
    CalculatorInfo::new("basic-calculator", "Basic Calculator", Math,
        "Four-function calculator with history", &["add", "subtract", "multiply", "divide", "arithmetic"]),
    CalculatorInfo::new("scientific-calculator", "Scientific Calculator", Math,
        "Trigonometry, logarithms, powers and factorials", &["sin", "cos", "tan", "log", "factorial", "trig"]),
    CalculatorInfo::new("percentage-calculator", "Percentage Calculator", Math,
        "Percent of a value and percent change", &["percent", "increase", "decrease", "ratio"]),
    CalculatorInfo::new("length-converter", "Length Converter", Conversion,
        "Convert between metric, imperial and astronomical lengths", &["meter", "feet", "inch", "mile", "distance"]),
    CalculatorInfo::new("weight-converter", "Weight Converter", Conversion,
        "Convert between grams, kilograms, pounds and more", &["mass", "kg", "pound", "ounce", "ton"]),
    CalculatorInfo::new("area-converter", "Area Converter", Conversion,
        "Convert square meters, acres, hectares and square feet", &["acre", "hectare", "square", "land"]),
    CalculatorInfo::new("temperature-converter", "Temperature Converter", Conversion,
        "Celsius, Fahrenheit and Kelvin", &["celsius", "fahrenheit", "kelvin", "temperature", "weather"]),
    CalculatorInfo::new("currency-converter", "Currency Converter", Conversion,
        "Convert between major currencies at illustrative rates", &["money", "exchange", "usd", "eur", "forex"]),
    CalculatorInfo::new("loan-calculator", "Loan Calculator", Finance,
        "Monthly payment, total payment and interest for a loan", &["emi", "mortgage", "interest", "payment"]),
    CalculatorInfo::new("compound-interest-calculator", "Compound Interest Calculator", Finance,
        "Growth of savings with periodic compounding", &["savings", "investment", "interest", "growth"]),
    CalculatorInfo::new("paint-calculator", "Paint Calculator", Construction,
        "Litres and cans of paint needed for a wall area", &["paint", "wall", "coats", "litre"]),
    CalculatorInfo::new("roofing-calculator", "Roofing Calculator", Construction,
        "Squares and bundles of roofing for a roof area", &["roof", "shingle", "bundle", "pitch"]),
    CalculatorInfo::new("invoice-generator", "Invoice Generator", Business,
        "Build, print and share a simple invoice", &["invoice", "bill", "tax", "receipt"]),
    CalculatorInfo::new("countdown-timer", "Countdown Timer", Everyday,
        "Count down to a date and time", &["timer", "countdown", "clock", "event"]),
];

static BY_ID: Lazy<HashMap<&'static str, &'static CalculatorInfo>> =
    Lazy::new(|| CALCULATORS.iter().map(|c| (c.id, c)).collect());

/// Look up a calculator by id
pub fn find(id: &str) -> Option<&'static CalculatorInfo> {
    BY_ID.get(id).copied()
}

pub fn all() -> &'static [CalculatorInfo] {
    CALCULATORS
}

/// Filter the catalog by a free-text query. A blank query returns everything.
pub fn search(query: &str) -> Vec<&'static CalculatorInfo> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return CALCULATORS.iter().collect();
    }
    CALCULATORS.iter().filter(|c| c.matches(&needle)).collect()
}

pub fn by_category(category: CalculatorCategory) -> impl Iterator<Item = &'static CalculatorInfo> {
    CALCULATORS.iter().filter(move |c| c.category == category)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_unique() {
        assert_eq!(BY_ID.len(), CALCULATORS.len());
    }

    #[test]
    fn test_find() {
        assert_eq!(find("paint-calculator").unwrap().category, Construction);
        assert!(find("does-not-exist").is_none());
    }

    #[test]
    fn test_search_is_case_insensitive() {
        let hits = search("CELSIUS");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, "temperature-converter");
    }

    #[test]
    fn test_search_matches_keywords_and_descriptions() {
        let hits: Vec<_> = search("interest").iter().map(|c| c.id).collect();
        assert!(hits.contains(&"loan-calculator"));
        assert!(hits.contains(&"compound-interest-calculator"));
        assert!(search("zzz-nothing").is_empty());
    }

    #[test]
    fn test_blank_query_returns_all() {
        assert_eq!(search("   ").len(), CALCULATORS.len());
    }

    #[test]
    fn test_every_category_is_populated() {
        for category in CalculatorCategory::ALL {
            assert!(by_category(category).next().is_some(), "{:?} is empty", category);
        }
    }
}
