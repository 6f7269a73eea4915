//! Itemized and standard deductions

use crate::policy::CurrentParams;
use crate::records::Records;

/// Itemized deduction components, AGI-based floors, charity caps and the
/// high-income overall limitation.
pub fn itemized_deduction(p: &CurrentParams, r: &mut Records) {
    for i in 0..r.len() {
        let s = r.status[i].index();
        let posagi = r.posagi[i];

        let med = (r.medical_expenses[i] - 0.075 * posagi).max(0.0);
        let salt = r.state_income_tax[i] + r.real_estate_tax[i];
        let casualty = if r.casualty_loss[i] > 0.0 {
            (r.casualty_loss[i] - 0.10 * posagi).max(0.0)
        } else {
            0.0
        };
        let misc = (r.misc_deductions[i] - 0.02 * posagi).max(0.0);

        // Cash gifts capped at half of AGI, property gifts at 30%; small
        // combined totals under the 20% floor pass through uncapped.
        let cash = r.charity_cash[i];
        let noncash = r.charity_noncash[i];
        let charity = if cash + noncash <= 0.2 * posagi {
            cash + noncash
        } else {
            cash.min(0.5 * posagi) + noncash.min(0.3 * posagi)
        };

        let gross = med + salt + r.mortgage_interest[i] + charity + casualty + misc;

        // Overall limitation: the lesser of 80% of limitable deductions and
        // 3% of AGI above the threshold. Medical and casualty are exempt.
        let nonlimited = med + casualty;
        let phaseout = if gross > nonlimited && r.agi[i] > p.phase[s] {
            let floor80 = 0.8 * (gross - nonlimited);
            let agi3pct = 0.03 * (r.posagi[i] - p.phase[s]).max(0.0);
            floor80.min(agi3pct)
        } else {
            0.0
        };

        r.med_ded[i] = med;
        r.salt_ded[i] = salt;
        r.casualty_ded[i] = casualty;
        r.misc_ded[i] = misc;
        r.charity_ded[i] = charity;
        r.item_gross[i] = gross;
        r.item_phaseout[i] = phaseout;
        r.item_ded[i] = gross - phaseout;
    }
}

/// Standard deduction: base amount by status, dependent-filer floor, extra
/// amounts for aged/blind, and the zeroing rule for separate filers whose
/// spouse itemizes.
pub fn standard_deduction(p: &CurrentParams, r: &mut Records) {
    for i in 0..r.len() {
        let status = r.status[i];
        let s = status.index();

        let mut base = p.stded[s];
        if r.is_dependent_filer[i] > 0.0 {
            let dependent_cap = (300.0 + r.earned[i]).max(p.stded[6]);
            base = base.min(dependent_cap);
        }
        if status.is_separate() && r.spouse_itemizes[i] > 0.0 {
            base = 0.0;
        }

        let mut extra_count = 0.0;
        if r.age_head[i] >= 65.0 {
            extra_count += 1.0;
        }
        if r.blind_head[i] > 0.0 {
            extra_count += 1.0;
        }
        if status.is_joint() {
            if r.age_spouse[i] >= 65.0 {
                extra_count += 1.0;
            }
            if r.blind_spouse[i] > 0.0 {
                extra_count += 1.0;
            }
        }
        let aged_amount = if r.txp[i] >= 2.0 { p.aged[1] } else { p.aged[0] };

        let mut standard = base + extra_count * aged_amount;
        // Separate filers who itemize get no standard deduction at all.
        if status.is_separate() && r.item_ded[i] > 0.0 {
            standard = 0.0;
        }
        r.standard[i] = standard;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::Policy;
    use crate::records::{RawRecord, Records};
    use approx::assert_relative_eq;

    fn run(rec: RawRecord) -> Records {
        let policy = Policy::new();
        let p = policy.current();
        let mut r = Records::from_raw(vec![rec], 2013).unwrap();
        super::super::payroll::filing_status(p, &mut r);
        super::super::payroll::payroll_tax(p, &mut r);
        super::super::income::adjustments(p, &mut r);
        super::super::income::capital_gains(p, &mut r);
        super::super::income::ss_benefits(p, &mut r);
        super::super::income::agi(p, &mut r);
        itemized_deduction(p, &mut r);
        standard_deduction(p, &mut r);
        r
    }

    #[test]
    fn test_medical_floor() {
        let r = run(RawRecord {
            wages: 40_000.0,
            medical_expenses: 5_000.0,
            ..RawRecord::default()
        });
        assert_relative_eq!(r.med_ded[0], 5_000.0 - 0.075 * 40_000.0);
    }

    #[test]
    fn test_medical_below_floor_is_zero() {
        let r = run(RawRecord {
            wages: 100_000.0,
            medical_expenses: 5_000.0,
            ..RawRecord::default()
        });
        assert_eq!(r.med_ded[0], 0.0);
    }

    #[test]
    fn test_charity_caps() {
        let r = run(RawRecord {
            wages: 10_000.0,
            charity_cash: 8_000.0,
            charity_noncash: 4_000.0,
            ..RawRecord::default()
        });
        // Over the 20% floor: cash capped at 5000, property at 3000.
        assert_relative_eq!(r.charity_ded[0], 8_000.0);
    }

    #[test]
    fn test_small_charity_passes_through() {
        let r = run(RawRecord {
            wages: 100_000.0,
            charity_cash: 1_000.0,
            ..RawRecord::default()
        });
        assert_relative_eq!(r.charity_ded[0], 1_000.0);
    }

    #[test]
    fn test_overall_limitation_engages_above_threshold() {
        let r = run(RawRecord {
            wages: 400_000.0,
            state_income_tax: 30_000.0,
            mortgage_interest: 20_000.0,
            ..RawRecord::default()
        });
        // Single threshold 250000: 3% of 150000 = 4500 < 80% of 50000.
        assert_relative_eq!(r.item_phaseout[0], 4_500.0);
        assert_relative_eq!(r.item_ded[0], 45_500.0);
    }

    #[test]
    fn test_no_limitation_below_threshold() {
        let r = run(RawRecord {
            wages: 100_000.0,
            state_income_tax: 8_000.0,
            ..RawRecord::default()
        });
        assert_eq!(r.item_phaseout[0], 0.0);
        assert_relative_eq!(r.item_ded[0], 8_000.0);
    }

    #[test]
    fn test_standard_base_amounts() {
        let single = run(RawRecord { wages: 1.0, ..RawRecord::default() });
        assert_relative_eq!(single.standard[0], 6_100.0);
        let joint = run(RawRecord { mars: 2, wages: 1.0, ..RawRecord::default() });
        assert_relative_eq!(joint.standard[0], 12_200.0);
    }

    #[test]
    fn test_aged_extra() {
        let r = run(RawRecord {
            mars: 2,
            age_head: 66.0,
            age_spouse: 67.0,
            ..RawRecord::default()
        });
        assert_relative_eq!(r.standard[0], 12_200.0 + 2.0 * 1_200.0);
    }

    #[test]
    fn test_dependent_filer_floor() {
        let r = run(RawRecord {
            is_dependent_filer: 1.0,
            wages: 200.0,
            ..RawRecord::default()
        });
        // max(300 + 200, 1000) = 1000 floor applies.
        assert_relative_eq!(r.standard[0], 1_000.0);
    }

    #[test]
    fn test_separate_spouse_itemizes_zeroes_standard() {
        let r = run(RawRecord {
            mars: 3,
            wages: 30_000.0,
            spouse_itemizes: 1.0,
            ..RawRecord::default()
        });
        assert_eq!(r.standard[0], 0.0);
    }

    #[test]
    fn test_separate_itemizer_loses_standard() {
        let r = run(RawRecord {
            mars: 3,
            wages: 30_000.0,
            state_income_tax: 4_000.0,
            ..RawRecord::default()
        });
        assert_eq!(r.standard[0], 0.0);
        assert_relative_eq!(r.item_ded[0], 4_000.0);
    }
}
