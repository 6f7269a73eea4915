//! Income aggregation: adjustments, capital gains, Social Security
//! taxability and adjusted gross income

use crate::policy::CurrentParams;
use crate::records::Records;

/// Above-the-line adjustment total.
pub fn adjustments(_p: &CurrentParams, r: &mut Records) {
    for i in 0..r.len() {
        r.above_line[i] = r.adjustments[i];
    }
}

/// Net capital gains with the per-return loss limitation, and the modified
/// income measures feeding the Social Security taxability test.
pub fn capital_gains(_p: &CurrentParams, r: &mut Records) {
    for i in 0..r.len() {
        let net = r.lt_gains[i] + r.st_gains[i];
        let loss_floor = -3_000.0 / r.sep[i];
        let sched_d = net.max(loss_floor);
        r.net_cap_gains[i] = net;
        r.sched_d_gains[i] = sched_d;
        r.ymod1[i] = r.wages[i]
            + r.taxable_interest[i]
            + r.dividends[i]
            + r.other_income[i]
            + r.business_income[i]
            + r.farm_income[i]
            + sched_d
            + r.other_gains[i]
            + r.ira_distributions[i]
            + r.pensions[i]
            + r.sched_e_income[i]
            + r.unemployment[i];
        let ymod2 = r.exempt_interest[i] + 0.5 * r.ss_benefits[i] - r.above_line[i];
        r.ymod[i] = r.ymod1[i] + ymod2;
    }
}

/// Taxable share of Social Security benefits under the 50%/85% tier rules.
/// Separate filers carry zero thresholds and fall straight into the 85%
/// tier.
pub fn ss_benefits(p: &CurrentParams, r: &mut Records) {
    for i in 0..r.len() {
        let s = r.status[i].index();
        let ssb = r.ss_benefits[i];
        let ymod = r.ymod[i];
        r.taxable_ss[i] = if ssb <= 0.0 || ymod < p.ssb50[s] {
            0.0
        } else if ymod < p.ssb85[s] {
            0.5 * (ymod - p.ssb50[s]).min(ssb)
        } else {
            let tier1 = 0.5 * (p.ssb85[s] - p.ssb50[s]).min(ssb);
            (0.85 * (ymod - p.ssb85[s]) + tier1).min(0.85 * ssb)
        };
    }
}

/// Gross income, adjusted gross income and the phased-out personal
/// exemption.
pub fn agi(p: &CurrentParams, r: &mut Records) {
    for i in 0..r.len() {
        let s = r.status[i].index();
        r.gross_income[i] = r.ymod1[i] + r.taxable_ss[i];
        r.agi[i] = r.gross_income[i] - r.above_line[i];
        r.posagi[i] = r.agi[i].max(0.0);
        let pre_phaseout = r.num_exemptions[i] * p.amex;
        let step = 2_500.0 / r.sep[i];
        let disposed = (0.02 * (r.posagi[i] - p.exmpb[s]).max(0.0) / step).clamp(0.0, 1.0);
        r.exemption[i] = pre_phaseout * (1.0 - disposed);
    }
}
