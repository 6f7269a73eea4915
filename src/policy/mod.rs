//! Policy parameter store
//!
//! Holds every tax-law parameter as a per-year series spanning a fixed budget
//! window, expanded from base-year statutory values with chained inflation
//! indexing. Reforms splice recomputed series tails in from their start year.
//! [`Policy::set_year`] projects one year of every series into a flat
//! [`CurrentParams`] value that the formula pipeline reads.

pub mod defaults;
pub mod expand;
pub mod reform;

use std::collections::BTreeMap;

use log::info;

use crate::errors::{ConfigError, StateError};
use defaults::{ParamDef, DEFAULTS};
use expand::{expand_scalar, expand_vector};
pub use reform::{parse_assumptions, parse_reform, EconAssumptions, RawRow, Reform, YearMods};

/// First year of the default budget window.
pub const DEFAULT_START_YEAR: u32 = 2013;
/// Number of years in the default budget window.
pub const DEFAULT_BUDGET_YEARS: usize = 12;

/// Default inflation rates, entry `i` stepping year `2013 + i` to the next.
const DEFAULT_INFLATION_RATES: [f64; 12] = [
    0.015, 0.020, 0.022, 0.020, 0.021, 0.022, 0.023, 0.024, 0.024, 0.024, 0.024, 0.024,
];

fn default_rate_for(year: u32) -> f64 {
    let i = year.saturating_sub(DEFAULT_START_YEAR) as usize;
    DEFAULT_INFLATION_RATES[i.min(DEFAULT_INFLATION_RATES.len() - 1)]
}

#[derive(Debug, Clone)]
enum Series {
    Scalar(Vec<f64>),
    Vector(Vec<Vec<f64>>),
}

#[derive(Debug, Clone)]
struct Param {
    series: Series,
    width: usize,
    indexed: bool,
}

/// One projected year of every parameter, read-only for the pipeline.
///
/// Six-wide arrays are indexed by filing-status position; four-wide arrays
/// by count of EITC qualifying children.
#[derive(Debug, Clone, Default)]
pub struct CurrentParams {
    pub year: u32,
    /// Statutory marginal rates, lowest bracket first.
    pub rt: [f64; 7],
    /// Bracket upper thresholds: `brk[k][status]`.
    pub brk: [[f64; 6]; 6],
    /// Standard deduction by status, plus the dependent-filer floor at `[6]`.
    pub stded: [f64; 7],
    /// Extra standard deduction per aged/blind exemption: [single, joint].
    pub aged: [f64; 2],
    pub amex: f64,
    pub exmpb: [f64; 6],
    pub ssb50: [f64; 6],
    pub ssb85: [f64; 6],
    pub ssmax: f64,
    pub fica_trt: f64,
    pub fica_ss_trt: f64,
    pub fica_mc_trt: f64,
    pub amtex: [f64; 6],
    pub amtys: [f64; 6],
    pub amtsep: f64,
    pub almsep: f64,
    pub almsp: f64,
    pub amtage: f64,
    pub almdep: f64,
    pub cgrate1: f64,
    pub cgrate2: f64,
    pub thresx: [f64; 6],
    pub dcmax: f64,
    pub pcmax: f64,
    pub agcmax: f64,
    pub chmax: f64,
    pub cphase: [f64; 6],
    pub ealim: f64,
    pub adctcrt: f64,
    pub crmax: [f64; 4],
    pub rtbase: [f64; 4],
    pub rtless: [f64; 4],
    pub ymax: [f64; 4],
    pub joint: f64,
    pub dylim: f64,
    pub edphhs: f64,
    pub edphhm: f64,
    pub learn: f64,
    pub phase: [f64; 6],
    pub lumpsum: f64,
    pub agi_surtax_rt: f64,
    pub agi_surtax_thd: [f64; 6],
}

/// The reformable parameter store.
#[derive(Debug, Clone)]
pub struct Policy {
    start_year: u32,
    budget_years: usize,
    current_year: u32,
    /// `inflation_rates[i]` steps window year `i` to year `i + 1`.
    inflation_rates: Vec<f64>,
    params: BTreeMap<String, Param>,
    current: CurrentParams,
    reformed: bool,
}

impl Policy {
    /// Current-law store over the default budget window.
    pub fn new() -> Self {
        Self::from_parts(
            DEFAULT_START_YEAR,
            DEFAULT_BUDGET_YEARS,
            (0..DEFAULT_BUDGET_YEARS)
                .map(|i| default_rate_for(DEFAULT_START_YEAR + i as u32))
                .collect(),
        )
    }

    /// Current-law store over a custom window. At most one of
    /// `inflation_rate` (constant) and `inflation_rates` (per-year series)
    /// may be given; with neither, the default rate table applies.
    pub fn with_window(
        start_year: u32,
        budget_years: usize,
        inflation_rate: Option<f64>,
        inflation_rates: Option<Vec<f64>>,
    ) -> Result<Self, ConfigError> {
        let rates = match (inflation_rate, inflation_rates) {
            (Some(_), Some(_)) => return Err(ConfigError::ConflictingInflationRates),
            (Some(r), None) => vec![r; budget_years],
            (None, Some(rs)) => {
                if rs.len() < budget_years {
                    return Err(ConfigError::ShortInflationSeries {
                        got: rs.len(),
                        need: budget_years,
                    });
                }
                rs
            }
            (None, None) => (0..budget_years)
                .map(|i| default_rate_for(start_year + i as u32))
                .collect(),
        };
        Ok(Self::from_parts(start_year, budget_years, rates))
    }

    fn from_parts(start_year: u32, budget_years: usize, inflation_rates: Vec<f64>) -> Self {
        let mut params = BTreeMap::new();
        for def in DEFAULTS {
            params.insert(
                def.name.to_string(),
                Param {
                    series: expand_default(def, &inflation_rates, budget_years),
                    width: def.width,
                    indexed: def.indexed,
                },
            );
        }
        let mut policy = Policy {
            start_year,
            budget_years,
            current_year: start_year,
            inflation_rates,
            params,
            current: CurrentParams::default(),
            reformed: false,
        };
        policy.project(start_year);
        policy
    }

    pub fn start_year(&self) -> u32 {
        self.start_year
    }

    pub fn end_year(&self) -> u32 {
        self.start_year + self.budget_years as u32 - 1
    }

    pub fn current_year(&self) -> u32 {
        self.current_year
    }

    pub fn num_years(&self) -> usize {
        self.budget_years
    }

    /// Whether any reform has been applied since construction.
    pub fn is_reformed(&self) -> bool {
        self.reformed
    }

    /// The projected values for the store's current year.
    pub fn current(&self) -> &CurrentParams {
        &self.current
    }

    /// Full year-series of a scalar parameter, for inspection.
    pub fn scalar_values(&self, name: &str) -> Option<&[f64]> {
        match &self.params.get(name)?.series {
            Series::Scalar(v) => Some(v),
            Series::Vector(_) => None,
        }
    }

    /// Full year-series of a vector parameter, for inspection.
    pub fn vector_values(&self, name: &str) -> Option<&[Vec<f64>]> {
        match &self.params.get(name)?.series {
            Series::Vector(v) => Some(v),
            Series::Scalar(_) => None,
        }
    }

    /// Move the projection to `year` (any year inside the window).
    pub fn set_year(&mut self, year: u32) -> Result<(), StateError> {
        if year < self.start_year || year > self.end_year() {
            return Err(StateError::YearOutsideWindow {
                year,
                start: self.start_year,
                end: self.end_year(),
            });
        }
        self.current_year = year;
        self.project(year);
        Ok(())
    }

    /// Move the projection forward one year.
    pub fn increment_year(&mut self) -> Result<(), StateError> {
        self.set_year(self.current_year + 1)
    }

    /// An un-reformed copy of this store, projected to the same year.
    pub fn current_law_version(&self) -> Policy {
        let mut fresh = Policy::from_parts(
            self.start_year,
            self.budget_years,
            self.inflation_rates.clone(),
        );
        fresh.current_year = self.current_year;
        fresh.project(self.current_year);
        fresh
    }

    /// Apply a reform, splicing each named parameter's series from the
    /// reform year forward. Years before the reform year keep their prior
    /// values. Reform years after the store's current year are rejected
    /// because the intervening years would be left unspecified. The whole
    /// reform is validated before any series is touched.
    pub fn implement_reform(&mut self, reform: &Reform) -> Result<(), ConfigError> {
        for (&year, mods) in &reform.years {
            if year < self.start_year || year > self.end_year() {
                return Err(ConfigError::YearOutOfWindow {
                    year,
                    start: self.start_year,
                    end: self.end_year(),
                });
            }
            if year > self.current_year {
                return Err(ConfigError::ReformAfterCurrentYear {
                    year,
                    current: self.current_year,
                });
            }
            for name in mods.values.keys().chain(mods.indexing.keys()) {
                if defaults::lookup(name).is_none() {
                    return Err(ConfigError::UnknownParameter(name.clone()));
                }
            }
            // Consecutive-year rows must all land inside the window.
            let offset = (year - self.start_year) as usize;
            for rows in mods.values.values() {
                if offset + rows.len() > self.budget_years {
                    return Err(ConfigError::YearOutOfWindow {
                        year: year + rows.len() as u32 - 1,
                        start: self.start_year,
                        end: self.end_year(),
                    });
                }
            }
        }
        for (&year, mods) in &reform.years {
            self.apply_year_mods(year, mods)?;
        }
        self.reformed = true;
        self.project(self.current_year);
        info!(
            "reform applied across {} provision year(s)",
            reform.years.len()
        );
        Ok(())
    }

    fn apply_year_mods(&mut self, year: u32, mods: &YearMods) -> Result<(), ConfigError> {
        let offset = (year - self.start_year) as usize;
        let num_years = self.budget_years - offset;
        let rates = self.inflation_rates[offset..].to_vec();

        // Parameters touched only by an indexing flip still need their
        // tails recomputed from the value standing at the reform year.
        let mut touched: Vec<&str> = mods.values.keys().map(String::as_str).collect();
        for name in mods.indexing.keys() {
            if !mods.values.contains_key(name) {
                touched.push(name);
            }
        }

        for name in touched {
            let param = self
                .params
                .get_mut(name)
                .ok_or_else(|| ConfigError::UnknownParameter(name.to_string()))?;
            if let Some(&flag) = mods.indexing.get(name) {
                param.indexed = flag;
            }
            match (&mut param.series, mods.values.get(name)) {
                (Series::Scalar(series), rows) => {
                    let supplied = match rows {
                        Some(rows) => coerce_scalar_rows(name, rows)?,
                        None => vec![Some(series[offset])],
                    };
                    let tail =
                        expand_scalar(name, &supplied, param.indexed, &rates, num_years)?;
                    series.truncate(offset);
                    series.extend(tail);
                }
                (Series::Vector(series), rows) => {
                    let supplied = match rows {
                        Some(rows) => coerce_vector_rows(name, param.width, rows)?,
                        None => vec![Some(series[offset].clone())],
                    };
                    let tail = expand_vector(
                        name,
                        &supplied,
                        param.width,
                        param.indexed,
                        &rates,
                        num_years,
                    )?;
                    series.truncate(offset);
                    series.extend(tail);
                }
            }
        }
        Ok(())
    }

    fn scalar_at(&self, name: &str, i: usize) -> f64 {
        match &self.params[name].series {
            Series::Scalar(v) => v[i],
            Series::Vector(v) => v[i][0],
        }
    }

    fn array_at<const N: usize>(&self, name: &str, i: usize) -> [f64; N] {
        let mut out = [0.0; N];
        if let Series::Vector(rows) = &self.params[name].series {
            for (k, v) in rows[i].iter().take(N).enumerate() {
                out[k] = *v;
            }
        }
        out
    }

    fn project(&mut self, year: u32) {
        let i = (year - self.start_year) as usize;
        let current = CurrentParams {
            year,
            rt: [
                self.scalar_at("_rt1", i),
                self.scalar_at("_rt2", i),
                self.scalar_at("_rt3", i),
                self.scalar_at("_rt4", i),
                self.scalar_at("_rt5", i),
                self.scalar_at("_rt6", i),
                self.scalar_at("_rt7", i),
            ],
            brk: [
                self.array_at("_brk1", i),
                self.array_at("_brk2", i),
                self.array_at("_brk3", i),
                self.array_at("_brk4", i),
                self.array_at("_brk5", i),
                self.array_at("_brk6", i),
            ],
            stded: self.array_at("_stded", i),
            aged: self.array_at("_aged", i),
            amex: self.scalar_at("_amex", i),
            exmpb: self.array_at("_exmpb", i),
            ssb50: self.array_at("_ssb50", i),
            ssb85: self.array_at("_ssb85", i),
            ssmax: self.scalar_at("_ssmax", i),
            fica_trt: self.scalar_at("_fica_trt", i),
            fica_ss_trt: self.scalar_at("_fica_ss_trt", i),
            fica_mc_trt: self.scalar_at("_fica_mc_trt", i),
            amtex: self.array_at("_amtex", i),
            amtys: self.array_at("_amtys", i),
            amtsep: self.scalar_at("_amtsep", i),
            almsep: self.scalar_at("_almsep", i),
            almsp: self.scalar_at("_almsp", i),
            amtage: self.scalar_at("_amtage", i),
            almdep: self.scalar_at("_almdep", i),
            cgrate1: self.scalar_at("_cgrate1", i),
            cgrate2: self.scalar_at("_cgrate2", i),
            thresx: self.array_at("_thresx", i),
            dcmax: self.scalar_at("_dcmax", i),
            pcmax: self.scalar_at("_pcmax", i),
            agcmax: self.scalar_at("_agcmax", i),
            chmax: self.scalar_at("_chmax", i),
            cphase: self.array_at("_cphase", i),
            ealim: self.scalar_at("_ealim", i),
            adctcrt: self.scalar_at("_adctcrt", i),
            crmax: self.array_at("_crmax", i),
            rtbase: self.array_at("_rtbase", i),
            rtless: self.array_at("_rtless", i),
            ymax: self.array_at("_ymax", i),
            joint: self.scalar_at("_joint", i),
            dylim: self.scalar_at("_dylim", i),
            edphhs: self.scalar_at("_edphhs", i),
            edphhm: self.scalar_at("_edphhm", i),
            learn: self.scalar_at("_learn", i),
            phase: self.array_at("_phase", i),
            lumpsum: self.scalar_at("_lumpsum", i),
            agi_surtax_rt: self.scalar_at("_agi_surtax_rt", i),
            agi_surtax_thd: self.array_at("_agi_surtax_thd", i),
        };
        self.current = current;
    }
}

impl Default for Policy {
    fn default() -> Self {
        Self::new()
    }
}

/// Expand one schema entry. Default rows carry no null sentinel, so this
/// never fails.
fn expand_default(def: &ParamDef, rates: &[f64], num_years: usize) -> Series {
    if def.width == 1 {
        let mut out: Vec<f64> = Vec::with_capacity(num_years);
        for i in 0..num_years {
            let v = match def.rows.get(i) {
                Some(row) => row[0],
                None => {
                    let prev = out[i - 1];
                    if def.indexed {
                        prev * (1.0 + rates[i - 1])
                    } else {
                        prev
                    }
                }
            };
            out.push(v);
        }
        Series::Scalar(out)
    } else {
        let mut out: Vec<Vec<f64>> = Vec::with_capacity(num_years);
        for i in 0..num_years {
            let row = match def.rows.get(i) {
                Some(row) => row.to_vec(),
                None => {
                    let f = if def.indexed { 1.0 + rates[i - 1] } else { 1.0 };
                    out[i - 1].iter().map(|v| v * f).collect()
                }
            };
            out.push(row);
        }
        Series::Vector(out)
    }
}

fn coerce_scalar_rows(name: &str, rows: &[RawRow]) -> Result<Vec<Option<f64>>, ConfigError> {
    rows.iter()
        .map(|row| match row {
            RawRow::Scalar(v) => Ok(*v),
            RawRow::Vector(v) if v.len() == 1 => Ok(v[0]),
            RawRow::Vector(v) => Err(ConfigError::ShapeMismatch {
                name: name.to_string(),
                expected: 1,
                got: v.len(),
            }),
        })
        .collect()
}

fn coerce_vector_rows(
    name: &str,
    width: usize,
    rows: &[RawRow],
) -> Result<Vec<Option<Vec<f64>>>, ConfigError> {
    rows.iter()
        .map(|row| match row {
            RawRow::Scalar(None) => Ok(None),
            RawRow::Scalar(Some(_)) => Err(ConfigError::ShapeMismatch {
                name: name.to_string(),
                expected: width,
                got: 1,
            }),
            RawRow::Vector(v) => {
                let concrete: Option<Vec<f64>> = v.iter().copied().collect();
                match concrete {
                    Some(values) => Ok(Some(values)),
                    None => Err(ConfigError::ShapeMismatch {
                        name: name.to_string(),
                        expected: width,
                        got: v.len(),
                    }),
                }
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn reform_from_json(text: &str) -> Reform {
        parse_reform(text).unwrap()
    }

    #[test]
    fn test_default_window_and_base_values() {
        let policy = Policy::new();
        assert_eq!(policy.start_year(), 2013);
        assert_eq!(policy.end_year(), 2024);
        assert_eq!(policy.current_year(), 2013);
        let p = policy.current();
        assert_relative_eq!(p.rt[6], 0.396);
        assert_relative_eq!(p.stded[0], 6100.0);
        assert_relative_eq!(p.brk[5][1], 450_000.0);
    }

    #[test]
    fn test_indexed_projection_compounds() {
        let mut policy = Policy::new();
        policy.set_year(2014).unwrap();
        assert_relative_eq!(policy.current().stded[0], 6100.0 * 1.015);
        assert_relative_eq!(policy.current().rt[0], 0.10); // unindexed
        policy.set_year(2015).unwrap();
        assert_relative_eq!(
            policy.current().amex,
            3900.0 * 1.015 * 1.020,
            max_relative = 1e-12
        );
    }

    #[test]
    fn test_set_year_outside_window() {
        let mut policy = Policy::new();
        assert!(matches!(
            policy.set_year(2012),
            Err(StateError::YearOutsideWindow { .. })
        ));
        assert!(matches!(
            policy.set_year(2025),
            Err(StateError::YearOutsideWindow { .. })
        ));
    }

    #[test]
    fn test_reform_splices_from_reform_year() {
        let mut policy = Policy::new();
        policy.set_year(2016).unwrap();
        let before = policy.scalar_values("_amex").unwrap().to_vec();
        let reform = reform_from_json(r#"{"policy": {"_amex": {"2016": [5000.0]}}}"#);
        policy.implement_reform(&reform).unwrap();
        let after = policy.scalar_values("_amex").unwrap();
        // Years before the reform year are untouched.
        assert_eq!(&after[..3], &before[..3]);
        assert_relative_eq!(after[3], 5000.0);
        // The tail re-compounds from the reform value (rate for 2016 is 0.020).
        assert_relative_eq!(after[4], 5000.0 * 1.020);
        assert!(policy.is_reformed());
    }

    #[test]
    fn test_reform_after_current_year_rejected() {
        let mut policy = Policy::new();
        let reform = reform_from_json(r#"{"policy": {"_amex": {"2016": [5000.0]}}}"#);
        assert!(matches!(
            policy.implement_reform(&reform),
            Err(ConfigError::ReformAfterCurrentYear { .. })
        ));
    }

    #[test]
    fn test_reform_outside_window_rejected() {
        let mut policy = Policy::new();
        let reform = reform_from_json(r#"{"policy": {"_amex": {"2030": [5000.0]}}}"#);
        assert!(matches!(
            policy.implement_reform(&reform),
            Err(ConfigError::YearOutOfWindow { .. })
        ));
    }

    #[test]
    fn test_reform_rows_past_window_rejected() {
        // Three consecutive-year rows starting at the last window year
        // would map 2025 and 2026, which have no series slots.
        let mut policy = Policy::new();
        policy.set_year(2024).unwrap();
        let before = policy.scalar_values("_amex").unwrap().to_vec();
        let reform =
            reform_from_json(r#"{"policy": {"_amex": {"2024": [5000.0, 6000.0, 7000.0]}}}"#);
        assert!(matches!(
            policy.implement_reform(&reform),
            Err(ConfigError::YearOutOfWindow { year: 2026, .. })
        ));
        // The failed reform must leave every series untouched.
        assert_eq!(policy.scalar_values("_amex").unwrap(), &before[..]);
    }

    #[test]
    fn test_unknown_parameter_rejected() {
        let mut policy = Policy::new();
        let reform = reform_from_json(r#"{"policy": {"_bogus": {"2013": [1.0]}}}"#);
        assert!(matches!(
            policy.implement_reform(&reform),
            Err(ConfigError::UnknownParameter(_))
        ));
    }

    #[test]
    fn test_vector_shape_mismatch_rejected() {
        let mut policy = Policy::new();
        let reform = reform_from_json(r#"{"policy": {"_brk6": {"2013": [[1.0, 2.0]]}}}"#);
        assert!(matches!(
            policy.implement_reform(&reform),
            Err(ConfigError::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn test_cpi_flag_freezes_indexed_parameter() {
        let mut policy = Policy::new();
        policy.set_year(2015).unwrap();
        let at_2015 = policy.scalar_values("_amex").unwrap()[2];
        let reform = reform_from_json(r#"{"policy": {"_amex_cpi": {"2015": false}}}"#);
        policy.implement_reform(&reform).unwrap();
        let series = policy.scalar_values("_amex").unwrap();
        assert_relative_eq!(series[2], at_2015);
        assert_relative_eq!(series[5], at_2015); // frozen, no compounding
    }

    #[test]
    fn test_null_row_defers_to_indexing_in_reform() {
        let mut policy = Policy::new();
        policy.set_year(2014).unwrap();
        let reform =
            reform_from_json(r#"{"policy": {"_amex": {"2014": [4000.0, null, 4500.0]}}}"#);
        policy.implement_reform(&reform).unwrap();
        let series = policy.scalar_values("_amex").unwrap();
        assert_relative_eq!(series[1], 4000.0);
        assert_relative_eq!(series[2], 4000.0 * 1.020); // rate for 2014
        assert_relative_eq!(series[3], 4500.0);
    }

    #[test]
    fn test_current_law_version_discards_reforms() {
        let mut policy = Policy::new();
        let reform = reform_from_json(r#"{"policy": {"_rt7": {"2013": [0.50]}}}"#);
        policy.implement_reform(&reform).unwrap();
        assert_relative_eq!(policy.current().rt[6], 0.50);
        let baseline = policy.current_law_version();
        assert_relative_eq!(baseline.current().rt[6], 0.396);
        assert_eq!(baseline.current_year(), policy.current_year());
        assert!(!baseline.is_reformed());
    }

    #[test]
    fn test_custom_window_constant_rate() {
        let policy = Policy::with_window(2013, 5, Some(0.10), None).unwrap();
        assert_eq!(policy.end_year(), 2017);
        let amex = policy.scalar_values("_amex").unwrap();
        assert_relative_eq!(amex[2], 3900.0 * 1.21, max_relative = 1e-12);
    }

    #[test]
    fn test_conflicting_rate_arguments() {
        let err = Policy::with_window(2013, 5, Some(0.1), Some(vec![0.1; 5])).unwrap_err();
        assert!(matches!(err, ConfigError::ConflictingInflationRates));
        let err = Policy::with_window(2013, 5, None, Some(vec![0.1; 2])).unwrap_err();
        assert!(matches!(err, ConfigError::ShortInflationSeries { .. }));
    }
}
