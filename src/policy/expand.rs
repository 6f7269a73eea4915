//! Year-series expansion for policy parameters
//!
//! A parameter is supplied as values for one or more leading years of the
//! budget window. Expansion fills the remaining years: indexed parameters
//! compound the last concrete value by the chained inflation rates, unindexed
//! parameters repeat it. A `None` entry inside the supplied span defers to
//! the same rule, so reforms can pin a single future year and let the
//! surrounding years follow the default trajectory.

use crate::errors::ConfigError;

/// Expand a scalar parameter series to `num_years` values.
///
/// `rates[i]` is the inflation rate applied when stepping from year `i` to
/// year `i + 1` of the window being filled.
pub fn expand_scalar(
    name: &str,
    supplied: &[Option<f64>],
    indexed: bool,
    rates: &[f64],
    num_years: usize,
) -> Result<Vec<f64>, ConfigError> {
    let mut out = Vec::with_capacity(num_years);
    let mut last: Option<f64> = None;
    for i in 0..num_years {
        let v = match supplied.get(i).copied().flatten() {
            Some(v) => v,
            None => {
                let prev = last.ok_or_else(|| ConfigError::LeadingNull(name.to_string()))?;
                if indexed {
                    prev * (1.0 + rates[i - 1])
                } else {
                    prev
                }
            }
        };
        out.push(v);
        last = Some(v);
    }
    Ok(out)
}

/// Expand a vector parameter series (one vector per year, all the same
/// length) to `num_years` vectors. Each component compounds independently.
pub fn expand_vector(
    name: &str,
    supplied: &[Option<Vec<f64>>],
    width: usize,
    indexed: bool,
    rates: &[f64],
    num_years: usize,
) -> Result<Vec<Vec<f64>>, ConfigError> {
    for row in supplied.iter().flatten() {
        if row.len() != width {
            return Err(ConfigError::ShapeMismatch {
                name: name.to_string(),
                expected: width,
                got: row.len(),
            });
        }
    }
    let mut out: Vec<Vec<f64>> = Vec::with_capacity(num_years);
    for i in 0..num_years {
        let row = match supplied.get(i).and_then(|r| r.as_ref()) {
            Some(row) => row.clone(),
            None => {
                let prev = out
                    .last()
                    .ok_or_else(|| ConfigError::LeadingNull(name.to_string()))?;
                if indexed {
                    let f = 1.0 + rates[i - 1];
                    prev.iter().map(|v| v * f).collect()
                } else {
                    prev.clone()
                }
            }
        };
        out.push(row);
    }
    Ok(out)
}
