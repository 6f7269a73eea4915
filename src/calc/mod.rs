//! Calculator session: one parameter store, one filer table, and the
//! staged formula pipeline that connects them

pub mod brackets;
pub mod credits;
pub mod deductions;
pub mod finalize;
pub mod income;
pub mod payroll;
pub mod tax;

use log::{debug, info};

use crate::errors::StateError;
use crate::policy::{CurrentParams, Policy};
use crate::records::{growth::GrowthFactors, Records};

/// Declared data dependencies of one pipeline stage.
pub struct StageSpec {
    pub name: &'static str,
    pub reads: &'static [&'static str],
    pub writes: &'static [&'static str],
}

/// Columns present in the input data (stages may read these freely).
pub const INPUT_COLUMNS: &[&str] = &[
    "status",
    "weight",
    "age_head",
    "age_spouse",
    "blind_head",
    "blind_spouse",
    "is_dependent_filer",
    "spouse_itemizes",
    "num_exemptions",
    "n_care_children",
    "n_ctc_children",
    "n_eitc_children",
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

/// The full pipeline in execution order, with each stage's declared
/// read-set and write-set. The deduction optimizer re-runs the
/// `taxable_income` through `amt` sub-sequence; that loop preserves this
/// linear ordering.
pub const PIPELINE: &[StageSpec] = &[
    StageSpec {
        name: "filing_status",
        reads: &["status"],
        writes: &["sep", "txp"],
    },
    StageSpec {
        name: "payroll_tax",
        reads: &["wages", "business_income", "farm_income"],
        writes: &["sey", "setax", "payrolltax", "earned"],
    },
    StageSpec {
        name: "adjustments",
        reads: &["adjustments"],
        writes: &["above_line"],
    },
    StageSpec {
        name: "capital_gains",
        reads: &[
            "lt_gains",
            "st_gains",
            "sep",
            "wages",
            "taxable_interest",
            "dividends",
            "other_income",
            "business_income",
            "farm_income",
            "other_gains",
            "ira_distributions",
            "pensions",
            "sched_e_income",
            "unemployment",
            "exempt_interest",
            "ss_benefits",
            "above_line",
        ],
        writes: &["net_cap_gains", "sched_d_gains", "ymod1", "ymod"],
    },
    StageSpec {
        name: "ss_benefits",
        reads: &["status", "ss_benefits", "ymod"],
        writes: &["taxable_ss"],
    },
    StageSpec {
        name: "agi",
        reads: &["status", "ymod1", "taxable_ss", "above_line", "num_exemptions", "sep"],
        writes: &["gross_income", "agi", "posagi", "exemption"],
    },
    StageSpec {
        name: "itemized_deduction",
        reads: &[
            "status",
            "posagi",
            "agi",
            "medical_expenses",
            "state_income_tax",
            "real_estate_tax",
            "mortgage_interest",
            "charity_cash",
            "charity_noncash",
            "casualty_loss",
            "misc_deductions",
        ],
        writes: &[
            "med_ded",
            "salt_ded",
            "casualty_ded",
            "misc_ded",
            "charity_ded",
            "item_gross",
            "item_phaseout",
            "item_ded",
        ],
    },
    StageSpec {
        name: "standard_deduction",
        reads: &[
            "status",
            "is_dependent_filer",
            "earned",
            "spouse_itemizes",
            "age_head",
            "age_spouse",
            "blind_head",
            "blind_spouse",
            "txp",
            "item_ded",
        ],
        writes: &["standard"],
    },
    StageSpec {
        name: "taxable_income",
        reads: &["agi", "item_ded", "standard", "exemption"],
        writes: &["taxable_income"],
    },
    StageSpec {
        name: "regular_tax",
        reads: &["status", "taxable_income"],
        writes: &["regular_tax"],
    },
    StageSpec {
        name: "gains_tax",
        reads: &[
            "status",
            "taxable_income",
            "regular_tax",
            "net_cap_gains",
            "lt_gains",
            "other_gains",
            "qualified_dividends",
        ],
        writes: &["wksp_gains", "taxbc"],
    },
    StageSpec {
        name: "unearned_surtax",
        reads: &[
            "status",
            "agi",
            "taxable_interest",
            "dividends",
            "sched_d_gains",
            "sched_e_income",
        ],
        writes: &["niit"],
    },
    StageSpec {
        name: "amt",
        reads: &[
            "status",
            "agi",
            "posagi",
            "standard",
            "item_ded",
            "med_ded",
            "salt_ded",
            "misc_ded",
            "age_head",
            "earned",
            "sep",
            "wksp_gains",
            "taxbc",
            "niit",
        ],
        writes: &["amti", "amt", "tax_before_credits"],
    },
    StageSpec {
        name: "dependent_care_credit",
        reads: &[
            "status",
            "n_care_children",
            "childcare_expenses",
            "wages_head",
            "wages_spouse",
            "earned",
            "agi",
        ],
        writes: &["care_credit"],
    },
    StageSpec {
        name: "eitc",
        reads: &[
            "status",
            "n_eitc_children",
            "age_head",
            "earned",
            "agi",
            "exempt_interest",
            "taxable_interest",
            "dividends",
            "sched_d_gains",
            "sched_e_income",
        ],
        writes: &["eitc"],
    },
    StageSpec {
        name: "child_tax_credit",
        reads: &["status", "n_ctc_children", "agi"],
        writes: &["ctc_base"],
    },
    StageSpec {
        name: "education_credits",
        reads: &["status", "tuition_expenses", "education_expenses", "agi"],
        writes: &["education_credit"],
    },
    StageSpec {
        name: "elderly_credit",
        reads: &["status", "age_head", "age_spouse", "ss_benefits", "agi"],
        writes: &["elderly_credit"],
    },
    StageSpec {
        name: "nonrefundable_credits",
        reads: &[
            "tax_before_credits",
            "care_credit",
            "elderly_credit",
            "education_credit",
            "ctc_base",
        ],
        writes: &[
            "care_credit",
            "elderly_credit",
            "education_credit",
            "ctc",
            "nonref_credits",
        ],
    },
    StageSpec {
        name: "additional_ctc",
        reads: &["ctc_base", "ctc", "n_ctc_children", "earned", "setax", "eitc"],
        writes: &["actc"],
    },
    StageSpec {
        name: "tax_1040",
        reads: &["tax_before_credits", "nonref_credits"],
        writes: &["tax_after_credits", "tax_liability"],
    },
    StageSpec {
        name: "eitc_reconciliation",
        reads: &["eitc", "tax_liability"],
        writes: &["eitc_used", "eitc_refund"],
    },
    StageSpec {
        name: "iitax",
        reads: &["eitc_refund", "actc", "tax_liability", "eitc", "payrolltax"],
        writes: &["refund", "iitax", "combined"],
    },
    StageSpec {
        name: "lump_sum_tax",
        reads: &["iitax", "combined"],
        writes: &["lumpsum_tax", "iitax", "combined"],
    },
    StageSpec {
        name: "agi_surtax",
        reads: &["status", "agi", "iitax", "combined"],
        writes: &["agi_surtax", "iitax", "combined"],
    },
    StageSpec {
        name: "expanded_income",
        reads: &["agi", "exempt_interest", "ss_benefits", "taxable_ss"],
        writes: &["expanded_income"],
    },
    StageSpec {
        name: "after_tax_income",
        reads: &["expanded_income", "combined"],
        writes: &["aftertax_income"],
    },
];

/// Variables eligible for marginal-rate perturbation.
pub const MTR_VARIABLES: &[&str] = &[
    "wages_head",
    "wages_spouse",
    "business_income",
    "taxable_interest",
    "dividends",
    "qualified_dividends",
    "lt_gains",
    "st_gains",
    "ira_distributions",
    "pensions",
    "sched_e_income",
    "unemployment",
    "ss_benefits",
];

/// Marginal rates on one variable, per filing unit.
#[derive(Debug, Clone)]
pub struct MarginalRates {
    pub payroll: Vec<f64>,
    pub income: Vec<f64>,
    pub combined: Vec<f64>,
}

/// A calculation session binding one [`Policy`] to one [`Records`] table.
pub struct Calculator {
    policy: Policy,
    records: Records,
    growth: GrowthFactors,
}

impl Calculator {
    /// Bind a parameter store to a filer table, aligning their years: the
    /// store is moved up to the data year if behind, and the table is aged
    /// forward (without growth adjustment) if the store is ahead.
    pub fn new(policy: Policy, records: Records) -> Result<Self, StateError> {
        Self::with_growth(policy, records, GrowthFactors::new())
    }

    /// Like [`Calculator::new`] with explicit growth factors used for year
    /// alignment and later advancement.
    pub fn with_growth(
        mut policy: Policy,
        records: Records,
        growth: GrowthFactors,
    ) -> Result<Self, StateError> {
        if records.is_empty() {
            return Err(StateError::EmptyTable);
        }
        if policy.current_year() < records.current_year() {
            policy.set_year(records.current_year())?;
        }
        let mut calc = Calculator {
            policy,
            records,
            growth,
        };
        while calc.records.current_year() < calc.policy.current_year() {
            let growth = calc.growth.clone();
            calc.records.increment_year(&growth);
        }
        info!(
            "calculator ready: {} units, year {}",
            calc.records.len(),
            calc.current_year()
        );
        Ok(calc)
    }

    pub fn current_year(&self) -> u32 {
        self.policy.current_year()
    }

    pub fn records(&self) -> &Records {
        &self.records
    }

    pub fn policy(&self) -> &Policy {
        &self.policy
    }

    /// Advance both the parameter store and the table one year.
    pub fn increment_year(&mut self) -> Result<(), StateError> {
        self.policy.increment_year()?;
        self.records.increment_year(&self.growth);
        Ok(())
    }

    /// Advance to `year`, one year at a time. Moving backward is an error.
    pub fn advance_to_year(&mut self, year: u32) -> Result<(), StateError> {
        if year < self.current_year() {
            return Err(StateError::YearBackward {
                current: self.current_year(),
                target: year,
            });
        }
        while self.current_year() < year {
            self.increment_year()?;
        }
        Ok(())
    }

    /// A parallel session under current law: same data, un-reformed
    /// parameters.
    pub fn current_law_version(&self) -> Calculator {
        Calculator {
            policy: self.policy.current_law_version(),
            records: self.records.clone(),
            growth: self.growth.clone(),
        }
    }

    /// Run the whole pipeline for the current year, rewriting every derived
    /// column.
    pub fn calc_all(&mut self) {
        let p = self.policy.current().clone();
        let r = &mut self.records;
        r.reset_derived();

        payroll::filing_status(&p, r);
        payroll::payroll_tax(&p, r);
        income::adjustments(&p, r);
        income::capital_gains(&p, r);
        income::ss_benefits(&p, r);
        income::agi(&p, r);
        deductions::itemized_deduction(&p, r);
        deductions::standard_deduction(&p, r);
        optimize_deductions(&p, r);
        credits::dependent_care_credit(&p, r);
        credits::eitc(&p, r);
        credits::child_tax_credit(&p, r);
        credits::education_credits(&p, r);
        credits::elderly_credit(&p, r);
        credits::nonrefundable_credits(&p, r);
        credits::additional_ctc(&p, r);
        finalize::tax_1040(&p, r);
        finalize::eitc_reconciliation(&p, r);
        finalize::iitax(&p, r);
        finalize::lump_sum_tax(&p, r);
        finalize::agi_surtax(&p, r);
        finalize::expanded_income(&p, r);
        finalize::after_tax_income(&p, r);

        debug!("pipeline run complete for year {}", p.year);
    }

    /// Marginal tax rates with respect to `variable`, computed by a
    /// finite-difference perturbation of `finite_diff` (signed: negative
    /// perturbs downward) against a freshly recalculated baseline.
    /// Spouse-earnings rates are undefined (NaN) outside joint returns.
    /// With `wrt_full_compensation`, wage rates are restated against
    /// employer-cost compensation including the employer payroll share.
    pub fn mtr(
        &mut self,
        variable: &str,
        finite_diff: f64,
        wrt_full_compensation: bool,
    ) -> Result<MarginalRates, StateError> {
        if !MTR_VARIABLES.contains(&variable) {
            return Err(StateError::InvalidMtrVariable(variable.to_string()));
        }
        if finite_diff == 0.0 {
            return Err(StateError::ZeroFiniteDiff);
        }
        let baseline = self.records.clone();

        if let Some(col) = self.records.input_column_mut(variable) {
            col.iter_mut().for_each(|v| *v += finite_diff);
        }
        // Perturbing a component variable must move its aggregate too.
        match variable {
            "wages_head" | "wages_spouse" => {
                self.records.wages.iter_mut().for_each(|v| *v += finite_diff);
            }
            "qualified_dividends" => {
                self.records
                    .dividends
                    .iter_mut()
                    .for_each(|v| *v += finite_diff);
            }
            _ => {}
        }
        self.calc_all();
        let payroll_shifted = self.records.payrolltax.clone();
        let iitax_shifted = self.records.iitax.clone();

        self.records = baseline;
        self.calc_all();

        let n = self.records.len();
        let mut rates = MarginalRates {
            payroll: Vec::with_capacity(n),
            income: Vec::with_capacity(n),
            combined: Vec::with_capacity(n),
        };
        let p = self.policy.current();
        for i in 0..n {
            if variable == "wages_spouse" && !self.records.status[i].is_joint() {
                rates.payroll.push(f64::NAN);
                rates.income.push(f64::NAN);
                rates.combined.push(f64::NAN);
                continue;
            }
            let mut payroll = (payroll_shifted[i] - self.records.payrolltax[i]) / finite_diff;
            let mut income = (iitax_shifted[i] - self.records.iitax[i]) / finite_diff;
            if wrt_full_compensation && matches!(variable, "wages_head" | "wages_spouse") {
                let employer_share = if self.records.wages[i] < p.ssmax {
                    0.5 * (p.fica_ss_trt + p.fica_mc_trt)
                } else {
                    0.5 * p.fica_mc_trt
                };
                payroll = (payroll + employer_share) / (1.0 + employer_share);
                income /= 1.0 + employer_share;
            }
            rates.payroll.push(payroll);
            rates.income.push(income);
            rates.combined.push(payroll + income);
        }
        Ok(rates)
    }
}

/// Run the taxable-income through AMT sub-sequence once.
fn taxinc_to_amt(p: &CurrentParams, r: &mut Records) {
    tax::taxable_income(p, r);
    tax::regular_tax(p, r);
    tax::gains_tax(p, r);
    tax::unearned_surtax(p, r);
    tax::amt(p, r);
}

/// Choose, per filing unit, whichever of itemizing and the standard
/// deduction yields the lower tax before credits. Evaluates the
/// tax-before-credits sub-sequence once with itemizing suppressed, once
/// with the standard deduction suppressed, commits the elementwise winner
/// and re-runs to leave every column consistent with the choice.
fn optimize_deductions(p: &CurrentParams, r: &mut Records) {
    let item_ded = r.item_ded.clone();
    let item_gross = r.item_gross.clone();
    let item_phaseout = r.item_phaseout.clone();
    let standard = r.standard.clone();

    r.item_ded.iter_mut().for_each(|v| *v = 0.0);
    r.item_gross.iter_mut().for_each(|v| *v = 0.0);
    r.item_phaseout.iter_mut().for_each(|v| *v = 0.0);
    taxinc_to_amt(p, r);
    let std_taxes = r.tax_before_credits.clone();

    r.item_ded.copy_from_slice(&item_ded);
    r.item_gross.copy_from_slice(&item_gross);
    r.item_phaseout.copy_from_slice(&item_phaseout);
    r.standard.iter_mut().for_each(|v| *v = 0.0);
    taxinc_to_amt(p, r);
    let item_taxes = r.tax_before_credits.clone();

    for i in 0..r.len() {
        if item_taxes[i] < std_taxes[i] {
            r.standard[i] = 0.0;
        } else {
            r.standard[i] = standard[i];
            r.item_ded[i] = 0.0;
            r.item_gross[i] = 0.0;
            r.item_phaseout[i] = 0.0;
        }
    }
    taxinc_to_amt(p, r);
}
