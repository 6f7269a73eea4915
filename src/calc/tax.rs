//! Tax-before-credits: taxable income, the bracket schedule, the
//! capital-gains worksheet, the net-investment-income surtax and the
//! alternative minimum tax

use crate::policy::CurrentParams;
use crate::records::Records;

use super::brackets::schedule_tax;

/// Taxable income after the better of itemized and standard deductions and
/// the personal exemption.
pub fn taxable_income(_p: &CurrentParams, r: &mut Records) {
    for i in 0..r.len() {
        let deduction = r.item_ded[i].max(r.standard[i]);
        r.taxable_income[i] = (r.agi[i] - deduction - r.exemption[i]).max(0.0);
    }
}

/// Regular tax from the bracket schedule.
pub fn regular_tax(p: &CurrentParams, r: &mut Records) {
    for i in 0..r.len() {
        r.regular_tax[i] = schedule_tax(p, r.status[i], r.taxable_income[i]);
    }
}

/// Preferential-rate worksheet for long-term gains and qualified dividends.
/// Ordinary-rate tax on the non-gain remainder plus the preferential rate
/// on the gain slice, never more than the all-ordinary result.
pub fn gains_tax(p: &CurrentParams, r: &mut Records) {
    for i in 0..r.len() {
        let status = r.status[i];
        let s = status.index();
        let ti = r.taxable_income[i];
        let has_gain = r.net_cap_gains[i] > 0.0
            || r.lt_gains[i] > 0.0
            || r.other_gains[i] > 0.0
            || r.qualified_dividends[i] > 0.0;
        if !(ti > 0.0 && has_gain) {
            r.wksp_gains[i] = 0.0;
            r.taxbc[i] = r.regular_tax[i];
            continue;
        }

        let gains = r.net_cap_gains[i].min(r.lt_gains[i]).max(0.0)
            + r.other_gains[i]
            + r.qualified_dividends[i];
        let gains = gains.min(ti);
        let non_gain = (ti - gains).max(0.0);
        let brk2_cap = p.brk[1][s].min(ti);

        // The slice of gains filling out the bottom two brackets takes the
        // low rate; the rest takes the main preferential rate.
        let low_slice = (brk2_cap - non_gain.min(brk2_cap)).max(0.0).min(gains);
        let main_slice = gains - low_slice;
        let mut special = schedule_tax(p, status, non_gain)
            + p.cgrate1 * low_slice
            + p.cgrate2 * main_slice;

        // Emulate the higher top rate on gains above the last threshold.
        let brk6 = p.brk[5][s];
        if non_gain > brk6 {
            special += 0.05 * gains;
        } else if ti > brk6 {
            special += 0.05 * (ti - brk6).min(gains);
        }

        r.wksp_gains[i] = gains;
        r.taxbc[i] = special.min(r.regular_tax[i]);
    }
}

/// Net-investment-income surtax on unearned income above the status
/// threshold.
pub fn unearned_surtax(p: &CurrentParams, r: &mut Records) {
    for i in 0..r.len() {
        let s = r.status[i].index();
        let excess = r.agi[i] - p.thresx[s];
        r.niit[i] = if excess > 0.0 {
            let investment = r.taxable_interest[i]
                + r.dividends[i]
                + r.sched_d_gains[i].max(0.0)
                + r.sched_e_income[i].max(0.0);
            0.038 * investment.min(excess)
        } else {
            0.0
        };
    }
}

/// Alternative minimum tax: broadened income base, phased-out exemption,
/// two-rate tentative tax with preferential treatment of the worksheet
/// gains, owed to the extent it exceeds the regular tax. Also writes the
/// combined tax-before-credits column.
pub fn amt(p: &CurrentParams, r: &mut Records) {
    for i in 0..r.len() {
        let status = r.status[i];
        let s = status.index();

        // Itemizers add back the preference deductions; standard takers
        // start from AGI.
        let mut amti = if r.standard[i] > 0.0 || r.item_ded[i] <= 0.0 {
            r.agi[i]
        } else {
            r.agi[i] - r.item_ded[i]
                + r.med_ded[i].min(0.025 * r.posagi[i])
                + r.salt_ded[i]
                + r.misc_ded[i]
        };
        if status.is_separate() && amti > p.amtsep {
            amti += p.almsep.min(0.25 * (amti - p.amtsep)).max(0.0);
        }

        let mut exemption = (p.amtex[s] - 0.25 * (amti - p.amtys[s]).max(0.0)).max(0.0);
        // Earned-income cap on the exemption for young filers.
        if r.age_head[i] > 0.0 && r.age_head[i] < p.amtage {
            exemption = exemption.min(r.earned[i] + p.almdep);
        }

        let base = (amti - exemption).max(0.0);
        let step = p.almsp / r.sep[i];
        let two_rate = |amount: f64| 0.26 * amount + 0.02 * (amount - step).max(0.0);

        let gains = r.wksp_gains[i].min(base);
        let ordinary = base - gains;
        let tentative = two_rate(base).min(two_rate(ordinary) + p.cgrate2 * gains);

        r.amti[i] = amti;
        r.amt[i] = (tentative - r.taxbc[i].max(0.0)).max(0.0);
        r.tax_before_credits[i] = r.taxbc[i] + r.amt[i] + r.niit[i];
    }
}
