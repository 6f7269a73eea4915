//! Progressive bracket schedule evaluation

use crate::policy::CurrentParams;
use crate::records::FilingStatus;

/// Tax a single income amount through the seven-rate schedule for one
/// filing status. Bracket `k` taxes the slice of income between threshold
/// `k - 1` and threshold `k`; the top rate applies above the last threshold.
pub fn schedule_tax(p: &CurrentParams, status: FilingStatus, income: f64) -> f64 {
    let s = status.index();
    let mut tax = 0.0;
    let mut lower = 0.0;
    for k in 0..6 {
        let upper = p.brk[k][s];
        let width = (upper - lower).max(0.0);
        tax += p.rt[k] * (income.min(upper) - lower).clamp(0.0, width);
        lower = upper;
    }
    tax + p.rt[6] * (income - lower).max(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::Policy;
    use approx::assert_relative_eq;

    #[test]
    fn test_zero_income_zero_tax() {
        let policy = Policy::new();
        let tax = schedule_tax(policy.current(), FilingStatus::Single, 0.0);
        assert_eq!(tax, 0.0);
    }

    #[test]
    fn test_negative_income_zero_tax() {
        let policy = Policy::new();
        let tax = schedule_tax(policy.current(), FilingStatus::Single, -5_000.0);
        assert_eq!(tax, 0.0);
    }

    #[test]
    fn test_income_inside_first_bracket() {
        let policy = Policy::new();
        let tax = schedule_tax(policy.current(), FilingStatus::Single, 5_000.0);
        assert_relative_eq!(tax, 500.0);
    }

    #[test]
    fn test_income_spanning_two_brackets() {
        // 2013 single: 10% to 8925, 15% above.
        let policy = Policy::new();
        let tax = schedule_tax(policy.current(), FilingStatus::Single, 20_000.0);
        assert_relative_eq!(tax, 0.10 * 8925.0 + 0.15 * (20_000.0 - 8925.0));
    }

    #[test]
    fn test_income_exactly_at_threshold() {
        let policy = Policy::new();
        let tax = schedule_tax(policy.current(), FilingStatus::Single, 8_925.0);
        assert_relative_eq!(tax, 892.5);
    }

    #[test]
    fn test_top_rate_applies_above_last_threshold() {
        let policy = Policy::new();
        let p = policy.current();
        let base = schedule_tax(p, FilingStatus::Single, 400_000.0);
        let tax = schedule_tax(p, FilingStatus::Single, 500_000.0);
        assert_relative_eq!(tax - base, 0.396 * 100_000.0, max_relative = 1e-12);
    }

    #[test]
    fn test_status_specific_thresholds() {
        let policy = Policy::new();
        let p = policy.current();
        // At 20k, joint filers are still entirely in the 10% bracket.
        assert_relative_eq!(schedule_tax(p, FilingStatus::Joint, 17_000.0), 1_700.0);
        assert!(
            schedule_tax(p, FilingStatus::Single, 17_000.0)
                > schedule_tax(p, FilingStatus::Joint, 17_000.0)
        );
    }

    #[test]
    fn test_monotonic_in_income() {
        let policy = Policy::new();
        let p = policy.current();
        let mut prev = 0.0;
        for income in (0..60).map(|i| i as f64 * 10_000.0) {
            let tax = schedule_tax(p, FilingStatus::HeadOfHousehold, income);
            assert!(tax >= prev);
            prev = tax;
        }
    }
}
