//! Growth factors for aging input data between calendar years
//!
//! A factor is a multiplicative ratio keyed by (column, target year). The
//! table applies ratios to its dollar-amount input columns on each year
//! increment; absent entries mean no adjustment.

use std::collections::HashMap;

/// Input columns eligible for growth adjustment (dollar amounts only;
/// counts, ages and flags are never scaled).
pub const GROWABLE_COLUMNS: &[&str] = &[
    "wages",
    "wages_head",
    "wages_spouse",
    "taxable_interest",
    "exempt_interest",
    "dividends",
    "qualified_dividends",
    "business_income",
    "farm_income",
    "st_gains",
    "lt_gains",
    "other_gains",
    "ira_distributions",
    "pensions",
    "sched_e_income",
    "unemployment",
    "ss_benefits",
    "other_income",
    "adjustments",
    "medical_expenses",
    "state_income_tax",
    "real_estate_tax",
    "mortgage_interest",
    "charity_cash",
    "charity_noncash",
    "casualty_loss",
    "misc_deductions",
    "childcare_expenses",
    "education_expenses",
    "tuition_expenses",
];

/// Per-column, per-year multiplicative adjustment ratios.
#[derive(Debug, Clone, Default)]
pub struct GrowthFactors {
    ratios: HashMap<(String, u32), f64>,
}

impl GrowthFactors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the ratio applied to `column` when stepping into `year`.
    pub fn set_ratio(&mut self, column: &str, year: u32, ratio: f64) {
        self.ratios.insert((column.to_string(), year), ratio);
    }

    /// Apply one ratio to every growable column when stepping into `year`.
    pub fn set_uniform_ratio(&mut self, year: u32, ratio: f64) {
        for column in GROWABLE_COLUMNS {
            self.set_ratio(column, year, ratio);
        }
    }

    /// The ratio for `column` stepping into `year` (1.0 when unset).
    pub fn ratio(&self, column: &str, year: u32) -> f64 {
        self.ratios
            .get(&(column.to_string(), year))
            .copied()
            .unwrap_or(1.0)
    }
}
