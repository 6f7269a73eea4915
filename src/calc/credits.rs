//! Tax credits

use crate::policy::CurrentParams;
use crate::records::Records;

/// Child and dependent care credit: expenses capped per child and by the
/// lower earner's income, credited at an AGI-scaled rate.
pub fn dependent_care_credit(p: &CurrentParams, r: &mut Records) {
    for i in 0..r.len() {
        if r.n_care_children[i] <= 0.0 || r.childcare_expenses[i] <= 0.0 {
            r.care_credit[i] = 0.0;
            continue;
        }
        let cap = r.n_care_children[i].min(2.0) * p.dcmax;
        let lower_earner = if r.status[i].is_joint() {
            r.wages_head[i].min(r.wages_spouse[i])
        } else {
            r.earned[i]
        };
        let eligible = r.childcare_expenses[i].min(cap).min(lower_earner.max(0.0));
        // Credit percentage slides from pcmax down to 20% as AGI rises in
        // $2000 steps above the threshold.
        let steps = ((r.agi[i] - p.agcmax).max(0.0) / 2_000.0).ceil();
        let pct = (p.pcmax - steps).max(20.0);
        r.care_credit[i] = eligible * 0.01 * pct;
    }
}

/// Earned income credit: phase-in on earnings to the status maximum,
/// phase-out above the greater of earnings and modified AGI, disqualified
/// by excess investment income, with age gates for childless claimants.
pub fn eitc(p: &CurrentParams, r: &mut Records) {
    for i in 0..r.len() {
        let status = r.status[i];
        if status.is_separate() {
            r.eitc[i] = 0.0;
            continue;
        }
        let kids = (r.n_eitc_children[i].max(0.0) as usize).min(3);
        if kids == 0 && (r.age_head[i] < 25.0 || r.age_head[i] >= 65.0) {
            r.eitc[i] = 0.0;
            continue;
        }
        let investment = r.exempt_interest[i]
            + r.taxable_interest[i]
            + r.dividends[i]
            + r.sched_d_gains[i].max(0.0)
            + r.sched_e_income[i].max(0.0);
        if investment > p.dylim {
            r.eitc[i] = 0.0;
            continue;
        }
        let phase_out_start = p.ymax[kids] + if status.is_joint() { p.joint } else { 0.0 };
        let mut credit = (p.rtbase[kids] * r.earned[i]).min(p.crmax[kids]);
        let modagi = r.agi[i] + r.exempt_interest[i];
        let over = modagi.max(r.earned[i]) - phase_out_start;
        if over > 0.0 {
            credit = (credit - p.rtless[kids] * over).max(0.0);
        }
        r.eitc[i] = credit;
    }
}

/// Pre-credit child tax credit with the high-AGI phase-out ($50 per $1000,
/// rounded up).
pub fn child_tax_credit(p: &CurrentParams, r: &mut Records) {
    for i in 0..r.len() {
        let s = r.status[i].index();
        let mut credit = p.chmax * r.n_ctc_children[i].max(0.0);
        let over = r.agi[i] - p.cphase[s];
        if over > 0.0 {
            credit = (credit - 50.0 * (over / 1_000.0).ceil()).max(0.0);
        }
        r.ctc_base[i] = credit;
    }
}

/// American-Opportunity and lifetime-learning credits with the joint AGI
/// phase-out. Both are treated as nonrefundable here.
pub fn education_credits(p: &CurrentParams, r: &mut Records) {
    for i in 0..r.len() {
        let tuition = r.tuition_expenses[i].max(0.0);
        let aoc = if tuition <= 2_000.0 {
            tuition
        } else {
            2_000.0 + 0.25 * (tuition - 2_000.0).min(2_000.0)
        };
        let llc = 0.2 * r.education_expenses[i].max(0.0).min(p.learn);
        let (limit, span) = if r.status[i].is_joint() {
            (p.edphhm * 1_000.0, 20_000.0)
        } else {
            (p.edphhs * 1_000.0, 10_000.0)
        };
        let keep = ((limit - r.agi[i]) / span).clamp(0.0, 1.0);
        r.education_credit[i] = (aoc + llc) * keep;
    }
}

/// Credit for the elderly: a status-based amount reduced by Social Security
/// benefits and half of AGI above the threshold, credited at 15%.
pub fn elderly_credit(_p: &CurrentParams, r: &mut Records) {
    for i in 0..r.len() {
        if r.age_head[i] < 65.0 {
            r.elderly_credit[i] = 0.0;
            continue;
        }
        let joint = r.status[i].is_joint();
        let base = if joint && r.age_spouse[i] >= 65.0 {
            7_500.0
        } else {
            5_000.0
        };
        let threshold = if joint { 10_000.0 } else { 7_500.0 };
        let reduction = r.ss_benefits[i] + 0.5 * (r.agi[i] - threshold).max(0.0);
        r.elderly_credit[i] = 0.15 * (base - reduction).max(0.0);
    }
}

/// Cap the nonrefundable credits against remaining liability in statute
/// order: dependent care, elderly, education, then the child tax credit.
pub fn nonrefundable_credits(_p: &CurrentParams, r: &mut Records) {
    for i in 0..r.len() {
        let mut available = r.tax_before_credits[i].max(0.0);
        let care = r.care_credit[i].min(available);
        available -= care;
        let elderly = r.elderly_credit[i].min(available);
        available -= elderly;
        let education = r.education_credit[i].min(available);
        available -= education;
        let ctc = r.ctc_base[i].min(available);
        r.care_credit[i] = care;
        r.elderly_credit[i] = elderly;
        r.education_credit[i] = education;
        r.ctc[i] = ctc;
        r.nonref_credits[i] = care + elderly + education + ctc;
    }
}

/// Refundable additional child tax credit for the portion of the child tax
/// credit that liability could not absorb. Families with three or more
/// qualifying children may instead use the payroll-tax alternative.
pub fn additional_ctc(p: &CurrentParams, r: &mut Records) {
    for i in 0..r.len() {
        let unclaimed = (r.ctc_base[i] - r.ctc[i]).max(0.0);
        if r.n_ctc_children[i] <= 0.0 || unclaimed <= 0.0 {
            r.actc[i] = 0.0;
            continue;
        }
        let earnings_credit = p.adctcrt * (r.earned[i] - p.ealim).max(0.0);
        let actc = if r.n_ctc_children[i] > 2.0 && earnings_credit < unclaimed {
            let employee_share = 0.0765 * r.earned[i].min(p.ssmax) + 0.5 * r.setax[i];
            let alternative = (employee_share - r.eitc[i]).max(0.0);
            earnings_credit.max(alternative).min(unclaimed)
        } else {
            earnings_credit.min(unclaimed)
        };
        r.actc[i] = actc;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::Policy;
    use crate::records::{RawRecord, Records};
    use approx::assert_relative_eq;

    /// Run every stage up to but not including the liability capping, so
    /// pre-cap credit amounts stay inspectable.
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
        super::super::deductions::itemized_deduction(p, &mut r);
        super::super::deductions::standard_deduction(p, &mut r);
        super::super::tax::taxable_income(p, &mut r);
        super::super::tax::regular_tax(p, &mut r);
        super::super::tax::gains_tax(p, &mut r);
        super::super::tax::unearned_surtax(p, &mut r);
        super::super::tax::amt(p, &mut r);
        dependent_care_credit(p, &mut r);
        eitc(p, &mut r);
        child_tax_credit(p, &mut r);
        education_credits(p, &mut r);
        elderly_credit(p, &mut r);
        r
    }

    fn run_capped(rec: RawRecord) -> Records {
        let policy = Policy::new();
        let p = policy.current();
        let mut r = run(rec);
        nonrefundable_credits(p, &mut r);
        additional_ctc(p, &mut r);
        r
    }

    #[test]
    fn test_care_credit_capped_per_child() {
        let r = run(RawRecord {
            mars: 4,
            age_head: 35.0,
            wages: 14_000.0,
            wages_head: 14_000.0,
            n_care_children: 1.0,
            childcare_expenses: 5_000.0,
            num_exemptions: 2.0,
            ..RawRecord::default()
        });
        // Expenses capped at 3000; AGI below threshold keeps the 35% rate.
        assert_relative_eq!(r.care_credit[0], 3_000.0 * 0.35);
    }

    #[test]
    fn test_care_credit_rate_floor() {
        let r = run(RawRecord {
            mars: 2,
            wages: 200_000.0,
            wages_head: 100_000.0,
            wages_spouse: 100_000.0,
            n_care_children: 2.0,
            childcare_expenses: 10_000.0,
            ..RawRecord::default()
        });
        // High AGI slides the rate all the way down to 20%.
        assert_relative_eq!(r.care_credit[0], 6_000.0 * 0.20);
    }

    #[test]
    fn test_eitc_phase_in_region() {
        let r = run(RawRecord {
            mars: 4,
            age_head: 30.0,
            wages: 8_000.0,
            wages_head: 8_000.0,
            n_eitc_children: 1.0,
            ..RawRecord::default()
        });
        assert_relative_eq!(r.eitc[0], (0.34 * 8_000.0_f64).min(3_250.0));
    }

    #[test]
    fn test_eitc_phased_out_at_high_earnings() {
        let r = run(RawRecord {
            mars: 1,
            age_head: 30.0,
            wages: 50_000.0,
            n_eitc_children: 1.0,
            ..RawRecord::default()
        });
        assert_eq!(r.eitc[0], 0.0);
    }

    #[test]
    fn test_eitc_age_gate_for_childless() {
        let young = run(RawRecord {
            age_head: 22.0,
            wages: 6_000.0,
            ..RawRecord::default()
        });
        assert_eq!(young.eitc[0], 0.0);
        let eligible = run(RawRecord {
            age_head: 30.0,
            wages: 6_000.0,
            ..RawRecord::default()
        });
        assert!(eligible.eitc[0] > 0.0);
    }

    #[test]
    fn test_eitc_disqualified_by_investment_income() {
        let r = run(RawRecord {
            age_head: 30.0,
            wages: 6_000.0,
            taxable_interest: 4_000.0,
            ..RawRecord::default()
        });
        assert_eq!(r.eitc[0], 0.0);
    }

    #[test]
    fn test_eitc_denied_to_separate_filers() {
        let r = run(RawRecord {
            mars: 3,
            age_head: 30.0,
            wages: 6_000.0,
            n_eitc_children: 1.0,
            ..RawRecord::default()
        });
        assert_eq!(r.eitc[0], 0.0);
    }

    #[test]
    fn test_ctc_full_amount_under_phaseout() {
        let r = run(RawRecord {
            mars: 2,
            wages: 60_000.0,
            n_ctc_children: 2.0,
            num_exemptions: 4.0,
            ..RawRecord::default()
        });
        assert_relative_eq!(r.ctc_base[0], 2_000.0);
    }

    #[test]
    fn test_ctc_phaseout_rounds_up() {
        let r = run(RawRecord {
            mars: 2,
            wages: 110_100.0,
            n_ctc_children: 1.0,
            ..RawRecord::default()
        });
        // 100 over the joint threshold still costs a full $50 step.
        assert_relative_eq!(r.ctc_base[0], 950.0);
    }

    #[test]
    fn test_education_credit_amounts() {
        let r = run(RawRecord {
            wages: 30_000.0,
            tuition_expenses: 4_000.0,
            education_expenses: 5_000.0,
            ..RawRecord::default()
        });
        // AOC: 2000 + 25% of the next 2000; LLC: 20% of 5000.
        assert_relative_eq!(r.education_credit[0], 2_500.0 + 1_000.0);
    }

    #[test]
    fn test_education_credit_phases_out() {
        let r = run(RawRecord {
            wages: 85_000.0,
            tuition_expenses: 4_000.0,
            ..RawRecord::default()
        });
        // Single limit is 80000: AGI above it keeps nothing.
        assert_eq!(r.education_credit[0], 0.0);
    }

    #[test]
    fn test_elderly_credit_reduced_by_benefits() {
        let r = run(RawRecord {
            age_head: 70.0,
            wages: 6_000.0,
            ss_benefits: 2_000.0,
            ..RawRecord::default()
        });
        assert_relative_eq!(r.elderly_credit[0], 0.15 * (5_000.0 - 2_000.0));
    }

    #[test]
    fn test_nonrefundable_cap_in_statute_order() {
        let r = run_capped(RawRecord {
            mars: 4,
            age_head: 35.0,
            wages: 22_000.0,
            wages_head: 22_000.0,
            n_care_children: 1.0,
            n_ctc_children: 1.0,
            num_exemptions: 2.0,
            childcare_expenses: 3_000.0,
            ..RawRecord::default()
        });
        assert!(r.nonref_credits[0] <= r.tax_before_credits[0] + 1e-9);
        // Care credit is taken first, CTC absorbs what liability remains.
        assert!(r.care_credit[0] > 0.0);
        assert!(r.ctc[0] <= r.ctc_base[0]);
    }

    #[test]
    fn test_additional_ctc_refunds_unclaimed_credit() {
        let r = run_capped(RawRecord {
            mars: 4,
            age_head: 35.0,
            wages: 16_000.0,
            wages_head: 16_000.0,
            n_ctc_children: 2.0,
            num_exemptions: 3.0,
            ..RawRecord::default()
        });
        // No liability survives the standard deduction and exemptions, so
        // the full credit flows to the refundable side, limited by 15% of
        // earnings above the floor.
        let unclaimed = r.ctc_base[0] - r.ctc[0];
        let earnings_limit = 0.15 * (16_000.0 - 3_000.0);
        assert_relative_eq!(r.actc[0], unclaimed.min(earnings_limit));
    }

    #[test]
    fn test_additional_ctc_zero_without_children() {
        let r = run_capped(RawRecord {
            wages: 10_000.0,
            ..RawRecord::default()
        });
        assert_eq!(r.actc[0], 0.0);
    }
}
