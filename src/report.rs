//! Weighted aggregation over output columns

use rayon::prelude::*;

use crate::errors::StateError;
use crate::records::Records;

/// Weighted total of a column.
pub fn weighted_total(records: &Records, column: &str) -> Result<f64, StateError> {
    let values = records
        .column(column)
        .ok_or_else(|| StateError::UnknownColumn(column.to_string()))?;
    Ok(values
        .par_iter()
        .zip(records.weight.par_iter())
        .map(|(v, w)| v * w)
        .sum())
}

/// Weighted mean of a column (zero for an all-zero-weight table).
pub fn weighted_mean(records: &Records, column: &str) -> Result<f64, StateError> {
    let total = weighted_total(records, column)?;
    let weight_sum: f64 = records.weight.par_iter().sum();
    if weight_sum > 0.0 {
        Ok(total / weight_sum)
    } else {
        Ok(0.0)
    }
}

/// Weighted count of units whose column value exceeds `threshold`.
pub fn weighted_count_above(
    records: &Records,
    column: &str,
    threshold: f64,
) -> Result<f64, StateError> {
    let values = records
        .column(column)
        .ok_or_else(|| StateError::UnknownColumn(column.to_string()))?;
    Ok(values
        .par_iter()
        .zip(records.weight.par_iter())
        .filter(|(v, _)| **v > threshold)
        .map(|(_, w)| w)
        .sum())
}
