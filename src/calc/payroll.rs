//! Payroll tax, self-employment tax and earned income

use crate::policy::CurrentParams;
use crate::records::{FilingStatus, Records};

/// Separate-filer divisor and taxpayer-count columns.
pub fn filing_status(_p: &CurrentParams, r: &mut Records) {
    for i in 0..r.len() {
        let status = r.status[i];
        r.sep[i] = if status.is_separate() { 2.0 } else { 1.0 };
        r.txp[i] = if status.is_joint() || status == FilingStatus::Widow {
            2.0
        } else {
            1.0
        };
    }
}

/// Combined OASDI+HI payroll tax on wages and self-employment income,
/// the self-employment tax component, and the earned-income measure used
/// by the credits.
pub fn payroll_tax(p: &CurrentParams, r: &mut Records) {
    for i in 0..r.len() {
        let sey = r.business_income[i] + r.farm_income[i];
        let taxable_earnings = (r.wages[i] + sey.max(0.0) * 0.9235).min(p.ssmax);
        let fica = (p.fica_trt * taxable_earnings).max(0.0);
        let setax = (fica - p.fica_trt * r.wages[i]).max(0.0);
        // Deduction offset for the employer-equivalent half of SE tax.
        let seyoff = if setax <= 14_204.0 {
            0.5751 * setax
        } else {
            0.5 * setax + 10_067.0
        };
        r.sey[i] = sey;
        r.setax[i] = setax;
        r.payrolltax[i] = fica;
        r.earned[i] = (r.wages[i] + sey - seyoff).max(0.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::Policy;
    use crate::records::{RawRecord, Records};
    use approx::assert_relative_eq;

    fn table(recs: Vec<RawRecord>) -> Records {
        Records::from_raw(recs, 2013).unwrap()
    }

    #[test]
    fn test_wage_earner_below_cap() {
        let policy = Policy::new();
        let mut r = table(vec![RawRecord {
            wages: 50_000.0,
            wages_head: 50_000.0,
            ..RawRecord::default()
        }]);
        payroll_tax(policy.current(), &mut r);
        assert_relative_eq!(r.payrolltax[0], 0.153 * 50_000.0);
        assert_eq!(r.setax[0], 0.0);
        assert_relative_eq!(r.earned[0], 50_000.0);
    }

    #[test]
    fn test_wage_earner_above_cap() {
        let policy = Policy::new();
        let mut r = table(vec![RawRecord {
            wages: 200_000.0,
            ..RawRecord::default()
        }]);
        payroll_tax(policy.current(), &mut r);
        assert_relative_eq!(r.payrolltax[0], 0.153 * 113_700.0);
    }

    #[test]
    fn test_self_employed_pays_se_tax() {
        let policy = Policy::new();
        let mut r = table(vec![RawRecord {
            business_income: 40_000.0,
            ..RawRecord::default()
        }]);
        payroll_tax(policy.current(), &mut r);
        let fica = 0.153 * 40_000.0 * 0.9235;
        assert_relative_eq!(r.payrolltax[0], fica);
        assert_relative_eq!(r.setax[0], fica);
        assert_relative_eq!(r.earned[0], 40_000.0 - 0.5751 * fica);
    }

    #[test]
    fn test_se_losses_do_not_reduce_wage_fica() {
        let policy = Policy::new();
        let mut r = table(vec![RawRecord {
            wages: 30_000.0,
            business_income: -10_000.0,
            ..RawRecord::default()
        }]);
        payroll_tax(policy.current(), &mut r);
        assert_relative_eq!(r.payrolltax[0], 0.153 * 30_000.0);
        assert_eq!(r.setax[0], 0.0);
        // The loss still reduces earned income.
        assert_relative_eq!(r.earned[0], 20_000.0);
    }

    #[test]
    fn test_filing_status_columns() {
        let policy = Policy::new();
        let mut r = table(vec![
            RawRecord { mars: 1, ..RawRecord::default() },
            RawRecord { mars: 2, ..RawRecord::default() },
            RawRecord { mars: 3, ..RawRecord::default() },
            RawRecord { mars: 5, ..RawRecord::default() },
            RawRecord { mars: 6, ..RawRecord::default() },
        ]);
        filing_status(policy.current(), &mut r);
        assert_eq!(r.sep, vec![1.0, 1.0, 2.0, 1.0, 2.0]);
        assert_eq!(r.txp, vec![1.0, 2.0, 1.0, 2.0, 1.0]);
    }
}
