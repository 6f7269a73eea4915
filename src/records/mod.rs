//! Filer table: one column per variable, one entry per filing unit
//!
//! Input columns come from the survey/administrative data and never change
//! during a pipeline run. Derived columns are fully rewritten by every run,
//! so no stale values survive a parameter change. Columns are reachable by
//! name for marginal-rate perturbation and growth-factor adjustment.

pub mod growth;
pub mod loader;

use serde::{Deserialize, Serialize};

use crate::errors::ConfigError;
use growth::GrowthFactors;

/// Filing status of a tax unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FilingStatus {
    /// Unmarried individual
    Single,
    /// Married filing jointly
    Joint,
    /// Married filing separately
    Separate,
    /// Head of household
    HeadOfHousehold,
    /// Qualifying widow(er)
    Widow,
    /// Married filing separately, living apart
    SeparateApart,
}

impl FilingStatus {
    /// Decode the conventional 1-through-6 status code.
    pub fn from_code(code: u8) -> Result<Self, ConfigError> {
        match code {
            1 => Ok(FilingStatus::Single),
            2 => Ok(FilingStatus::Joint),
            3 => Ok(FilingStatus::Separate),
            4 => Ok(FilingStatus::HeadOfHousehold),
            5 => Ok(FilingStatus::Widow),
            6 => Ok(FilingStatus::SeparateApart),
            other => Err(ConfigError::InvalidStatusCode(other)),
        }
    }

    /// Position into the six-wide parameter vectors.
    pub fn index(self) -> usize {
        match self {
            FilingStatus::Single => 0,
            FilingStatus::Joint => 1,
            FilingStatus::Separate => 2,
            FilingStatus::HeadOfHousehold => 3,
            FilingStatus::Widow => 4,
            FilingStatus::SeparateApart => 5,
        }
    }

    pub fn is_joint(self) -> bool {
        matches!(self, FilingStatus::Joint)
    }

    /// Married-filing-separately in either form.
    pub fn is_separate(self) -> bool {
        matches!(self, FilingStatus::Separate | FilingStatus::SeparateApart)
    }
}

/// One filing unit as read from the input data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawRecord {
    /// Filing-status code, 1 through 6.
    pub mars: u8,
    /// Sampling weight (1.0 for unweighted data).
    #[serde(default = "default_weight")]
    pub weight: f64,
    #[serde(default)]
    pub age_head: f64,
    #[serde(default)]
    pub age_spouse: f64,
    #[serde(default)]
    pub blind_head: f64,
    #[serde(default)]
    pub blind_spouse: f64,
    /// 1.0 when this filer can be claimed as a dependent elsewhere.
    #[serde(default)]
    pub is_dependent_filer: f64,
    /// 1.0 when a separately-filing spouse itemizes.
    #[serde(default)]
    pub spouse_itemizes: f64,
    /// Total exemptions claimed (filer, spouse, dependents).
    #[serde(default)]
    pub num_exemptions: f64,
    /// Children qualifying for the dependent-care credit.
    #[serde(default)]
    pub n_care_children: f64,
    /// Children qualifying for the child tax credit.
    #[serde(default)]
    pub n_ctc_children: f64,
    /// Children qualifying for the earned income credit.
    #[serde(default)]
    pub n_eitc_children: f64,
    #[serde(default)]
    pub wages: f64,
    #[serde(default)]
    pub wages_head: f64,
    #[serde(default)]
    pub wages_spouse: f64,
    #[serde(default)]
    pub taxable_interest: f64,
    #[serde(default)]
    pub exempt_interest: f64,
    #[serde(default)]
    pub dividends: f64,
    #[serde(default)]
    pub qualified_dividends: f64,
    #[serde(default)]
    pub business_income: f64,
    #[serde(default)]
    pub farm_income: f64,
    #[serde(default)]
    pub st_gains: f64,
    #[serde(default)]
    pub lt_gains: f64,
    #[serde(default)]
    pub other_gains: f64,
    #[serde(default)]
    pub ira_distributions: f64,
    #[serde(default)]
    pub pensions: f64,
    #[serde(default)]
    pub sched_e_income: f64,
    #[serde(default)]
    pub unemployment: f64,
    #[serde(default)]
    pub ss_benefits: f64,
    #[serde(default)]
    pub other_income: f64,
    /// Above-the-line adjustment total.
    #[serde(default)]
    pub adjustments: f64,
    #[serde(default)]
    pub medical_expenses: f64,
    #[serde(default)]
    pub state_income_tax: f64,
    #[serde(default)]
    pub real_estate_tax: f64,
    #[serde(default)]
    pub mortgage_interest: f64,
    #[serde(default)]
    pub charity_cash: f64,
    #[serde(default)]
    pub charity_noncash: f64,
    #[serde(default)]
    pub casualty_loss: f64,
    #[serde(default)]
    pub misc_deductions: f64,
    #[serde(default)]
    pub childcare_expenses: f64,
    /// Lifetime-learning qualified expenses.
    #[serde(default)]
    pub education_expenses: f64,
    /// American-Opportunity qualified expenses.
    #[serde(default)]
    pub tuition_expenses: f64,
}

fn default_weight() -> f64 {
    1.0
}

impl Default for RawRecord {
    fn default() -> Self {
        Self {
            mars: 1,
            weight: 1.0,
            age_head: 0.0,
            age_spouse: 0.0,
            blind_head: 0.0,
            blind_spouse: 0.0,
            is_dependent_filer: 0.0,
            spouse_itemizes: 0.0,
            num_exemptions: 1.0,
            n_care_children: 0.0,
            n_ctc_children: 0.0,
            n_eitc_children: 0.0,
            wages: 0.0,
            wages_head: 0.0,
            wages_spouse: 0.0,
            taxable_interest: 0.0,
            exempt_interest: 0.0,
            dividends: 0.0,
            qualified_dividends: 0.0,
            business_income: 0.0,
            farm_income: 0.0,
            st_gains: 0.0,
            lt_gains: 0.0,
            other_gains: 0.0,
            ira_distributions: 0.0,
            pensions: 0.0,
            sched_e_income: 0.0,
            unemployment: 0.0,
            ss_benefits: 0.0,
            other_income: 0.0,
            adjustments: 0.0,
            medical_expenses: 0.0,
            state_income_tax: 0.0,
            real_estate_tax: 0.0,
            mortgage_interest: 0.0,
            charity_cash: 0.0,
            charity_noncash: 0.0,
            casualty_loss: 0.0,
            misc_deductions: 0.0,
            childcare_expenses: 0.0,
            education_expenses: 0.0,
            tuition_expenses: 0.0,
        }
    }
}

macro_rules! records_columns {
    (
        inputs { $($input:ident),* $(,)? }
        derived { $($derived:ident),* $(,)? }
    ) => {
        /// The vectorized filer table.
        #[derive(Debug, Clone)]
        pub struct Records {
            data_year: u32,
            current_year: u32,
            n: usize,
            pub status: Vec<FilingStatus>,
            pub weight: Vec<f64>,
            $(pub $input: Vec<f64>,)*
            $(pub $derived: Vec<f64>,)*
        }

        impl Records {
            /// Mutable access to an input column by name.
            pub fn input_column_mut(&mut self, name: &str) -> Option<&mut Vec<f64>> {
                match name {
                    $(stringify!($input) => Some(&mut self.$input),)*
                    _ => None,
                }
            }

            /// Read access to any numeric column by name.
            pub fn column(&self, name: &str) -> Option<&Vec<f64>> {
                match name {
                    "weight" => Some(&self.weight),
                    $(stringify!($input) => Some(&self.$input),)*
                    $(stringify!($derived) => Some(&self.$derived),)*
                    _ => None,
                }
            }

            /// Zero every derived column ahead of a pipeline run.
            pub fn reset_derived(&mut self) {
                $(self.$derived.iter_mut().for_each(|v| *v = 0.0);)*
            }

            fn empty(data_year: u32, n: usize) -> Self {
                Self {
                    data_year,
                    current_year: data_year,
                    n,
                    status: Vec::with_capacity(n),
                    weight: Vec::with_capacity(n),
                    $($input: Vec::with_capacity(n),)*
                    $($derived: vec![0.0; n],)*
                }
            }
        }
    };
}

records_columns! {
    inputs {
        age_head, age_spouse, blind_head, blind_spouse,
        is_dependent_filer, spouse_itemizes,
        num_exemptions, n_care_children, n_ctc_children, n_eitc_children,
        wages, wages_head, wages_spouse,
        taxable_interest, exempt_interest,
        dividends, qualified_dividends,
        business_income, farm_income,
        st_gains, lt_gains, other_gains,
        ira_distributions, pensions, sched_e_income,
        unemployment, ss_benefits, other_income, adjustments,
        medical_expenses, state_income_tax, real_estate_tax, mortgage_interest,
        charity_cash, charity_noncash, casualty_loss, misc_deductions,
        childcare_expenses, education_expenses, tuition_expenses,
    }
    derived {
        sep, txp,
        sey, setax, payrolltax, earned,
        above_line,
        net_cap_gains, sched_d_gains, ymod1, ymod,
        taxable_ss,
        gross_income, agi, posagi, exemption,
        med_ded, salt_ded, casualty_ded, misc_ded, charity_ded,
        item_gross, item_phaseout, item_ded, standard,
        taxable_income, regular_tax, wksp_gains, taxbc, niit,
        amti, amt, tax_before_credits,
        care_credit, eitc, ctc_base, ctc,
        education_credit, elderly_credit, nonref_credits, actc,
        tax_after_credits, tax_liability,
        eitc_used, eitc_refund, refund,
        iitax, lumpsum_tax, agi_surtax, combined,
        expanded_income, aftertax_income,
    }
}

impl Records {
    /// Build the table from raw per-unit records tagged with the calendar
    /// year the data describes.
    pub fn from_raw(raw: Vec<RawRecord>, data_year: u32) -> Result<Self, ConfigError> {
        let mut table = Records::empty(data_year, raw.len());
        for rec in &raw {
            table.status.push(FilingStatus::from_code(rec.mars)?);
            table.weight.push(rec.weight);
            table.age_head.push(rec.age_head);
            table.age_spouse.push(rec.age_spouse);
            table.blind_head.push(rec.blind_head);
            table.blind_spouse.push(rec.blind_spouse);
            table.is_dependent_filer.push(rec.is_dependent_filer);
            table.spouse_itemizes.push(rec.spouse_itemizes);
            table.num_exemptions.push(rec.num_exemptions);
            table.n_care_children.push(rec.n_care_children);
            table.n_ctc_children.push(rec.n_ctc_children);
            table.n_eitc_children.push(rec.n_eitc_children);
            table.wages.push(rec.wages);
            table.wages_head.push(rec.wages_head);
            table.wages_spouse.push(rec.wages_spouse);
            table.taxable_interest.push(rec.taxable_interest);
            table.exempt_interest.push(rec.exempt_interest);
            table.dividends.push(rec.dividends);
            table.qualified_dividends.push(rec.qualified_dividends);
            table.business_income.push(rec.business_income);
            table.farm_income.push(rec.farm_income);
            table.st_gains.push(rec.st_gains);
            table.lt_gains.push(rec.lt_gains);
            table.other_gains.push(rec.other_gains);
            table.ira_distributions.push(rec.ira_distributions);
            table.pensions.push(rec.pensions);
            table.sched_e_income.push(rec.sched_e_income);
            table.unemployment.push(rec.unemployment);
            table.ss_benefits.push(rec.ss_benefits);
            table.other_income.push(rec.other_income);
            table.adjustments.push(rec.adjustments);
            table.medical_expenses.push(rec.medical_expenses);
            table.state_income_tax.push(rec.state_income_tax);
            table.real_estate_tax.push(rec.real_estate_tax);
            table.mortgage_interest.push(rec.mortgage_interest);
            table.charity_cash.push(rec.charity_cash);
            table.charity_noncash.push(rec.charity_noncash);
            table.casualty_loss.push(rec.casualty_loss);
            table.misc_deductions.push(rec.misc_deductions);
            table.childcare_expenses.push(rec.childcare_expenses);
            table.education_expenses.push(rec.education_expenses);
            table.tuition_expenses.push(rec.tuition_expenses);
        }
        Ok(table)
    }

    pub fn len(&self) -> usize {
        self.n
    }

    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    /// Calendar year the underlying data describes.
    pub fn data_year(&self) -> u32 {
        self.data_year
    }

    /// Calendar year the table currently represents after extrapolation.
    pub fn current_year(&self) -> u32 {
        self.current_year
    }

    /// Age dollar amounts one year forward using the supplied growth
    /// factors, then bump the table's year.
    pub fn increment_year(&mut self, factors: &GrowthFactors) {
        let target = self.current_year + 1;
        for name in growth::GROWABLE_COLUMNS {
            let ratio = factors.ratio(name, target);
            if ratio != 1.0 {
                if let Some(col) = self.input_column_mut(name) {
                    col.iter_mut().for_each(|v| *v *= ratio);
                }
            }
        }
        self.current_year = target;
    }
}
