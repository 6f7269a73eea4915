//! Liability assembly: credits against tax, refundable reconciliation and
//! the final income/payroll/combined measures

use crate::policy::CurrentParams;
use crate::records::Records;

/// Tax after nonrefundable credits plus other taxes.
pub fn tax_1040(_p: &CurrentParams, r: &mut Records) {
    for i in 0..r.len() {
        r.tax_after_credits[i] = (r.tax_before_credits[i] - r.nonref_credits[i]).max(0.0);
        r.tax_liability[i] = r.tax_after_credits[i];
    }
}

/// Split the earned income credit into the part absorbed by liability and
/// the part paid out as a refund.
pub fn eitc_reconciliation(_p: &CurrentParams, r: &mut Records) {
    for i in 0..r.len() {
        let used = r.eitc[i].min(r.tax_liability[i]);
        r.eitc_used[i] = used;
        r.eitc_refund[i] = r.eitc[i] - used;
    }
}

/// Net income tax (negative when refundable credits exceed liability),
/// total refundable payout and the combined income-plus-payroll measure.
pub fn iitax(_p: &CurrentParams, r: &mut Records) {
    for i in 0..r.len() {
        r.refund[i] = r.eitc_refund[i] + r.actc[i];
        r.iitax[i] = r.tax_liability[i] - r.eitc[i] - r.actc[i];
        r.combined[i] = r.iitax[i] + r.payrolltax[i];
    }
}

/// Per-unit lump-sum tax (zero under current law).
pub fn lump_sum_tax(p: &CurrentParams, r: &mut Records) {
    for i in 0..r.len() {
        r.lumpsum_tax[i] = p.lumpsum;
        r.iitax[i] += p.lumpsum;
        r.combined[i] += p.lumpsum;
    }
}

/// Flat surtax on AGI above the status threshold (off under current law).
pub fn agi_surtax(p: &CurrentParams, r: &mut Records) {
    for i in 0..r.len() {
        if p.agi_surtax_rt <= 0.0 {
            r.agi_surtax[i] = 0.0;
            continue;
        }
        let s = r.status[i].index();
        let surtax = p.agi_surtax_rt * (r.agi[i] - p.agi_surtax_thd[s]).max(0.0);
        r.agi_surtax[i] = surtax;
        r.iitax[i] += surtax;
        r.combined[i] += surtax;
    }
}

/// A broader income measure than AGI: adds back exempt interest and the
/// untaxed share of Social Security benefits.
pub fn expanded_income(_p: &CurrentParams, r: &mut Records) {
    for i in 0..r.len() {
        r.expanded_income[i] =
            r.agi[i] + r.exempt_interest[i] + (r.ss_benefits[i] - r.taxable_ss[i]);
    }
}

/// Expanded income net of all modeled taxes.
pub fn after_tax_income(_p: &CurrentParams, r: &mut Records) {
    for i in 0..r.len() {
        r.aftertax_income[i] = r.expanded_income[i] - r.combined[i];
    }
}
