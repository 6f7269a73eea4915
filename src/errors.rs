//! Error types for policy configuration and calculator state

use thiserror::Error;

/// Errors raised while building or reforming the policy parameter store.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Reform or assumption document is not valid JSON.
    #[error("malformed parameter document: {0}")]
    Json(#[from] serde_json::Error),

    /// A year key in a reform could not be parsed as an integer.
    #[error("reform year key '{0}' is not an integer")]
    BadYearKey(String),

    /// The reform names a parameter the schema does not define.
    #[error("unknown policy parameter '{0}'")]
    UnknownParameter(String),

    /// A supplied per-year value has the wrong number of components.
    #[error("parameter '{name}' expects {expected} value(s) per year, got {got}")]
    ShapeMismatch {
        name: String,
        expected: usize,
        got: usize,
    },

    /// A reform year falls outside the constructed parameter window.
    #[error("reform year {year} is outside the parameter window {start}..={end}")]
    YearOutOfWindow { year: u32, start: u32, end: u32 },

    /// Reforms may not start after the store's current year.
    #[error("reform year {year} is after the current year {current}")]
    ReformAfterCurrentYear { year: u32, current: u32 },

    /// Both a single inflation rate and a full rate series were supplied.
    #[error("cannot give both a constant inflation rate and a rate series")]
    ConflictingInflationRates,

    /// The supplied inflation-rate series is shorter than the budget window.
    #[error("inflation-rate series has {got} entries, budget window needs {need}")]
    ShortInflationSeries { got: usize, need: usize },

    /// The first supplied year of a parameter series is the null sentinel.
    #[error("parameter '{0}' has no concrete value in its first year")]
    LeadingNull(String),

    /// A reform file carries a key that belongs in an assumption file,
    /// or vice versa.
    #[error("key '{key}' does not belong in a {kind} file")]
    MisplacedKey { key: String, kind: &'static str },

    /// A required top-level key is missing from a parameter file.
    #[error("required key '{key}' missing from {kind} file")]
    MissingKey { key: String, kind: &'static str },

    /// A reform value entry is neither a number, a boolean, nor null.
    #[error("parameter '{0}' has a value entry that is not numeric")]
    BadValueType(String),

    /// An input record carries a filing-status code outside 1..=6.
    #[error("filing-status code {0} is not in 1..=6")]
    InvalidStatusCode(u8),
}

/// Errors raised by a calculator session at run time.
#[derive(Debug, Error)]
pub enum StateError {
    /// Year advancement only moves forward.
    #[error("cannot move from year {current} back to {target}")]
    YearBackward { current: u32, target: u32 },

    /// The requested projection year has no parameter values.
    #[error("year {year} is outside the parameter window {start}..={end}")]
    YearOutsideWindow { year: u32, start: u32, end: u32 },

    /// A named column is not part of the filer table.
    #[error("'{0}' is not a recognized column")]
    UnknownColumn(String),

    /// The named variable cannot be perturbed for marginal-rate analysis.
    #[error("'{0}' is not a valid marginal-rate variable")]
    InvalidMtrVariable(String),

    /// A zero finite-difference step cannot produce a rate.
    #[error("finite-difference step must be nonzero")]
    ZeroFiniteDiff,

    /// The filer table is empty.
    #[error("filer table holds no records")]
    EmptyTable,
}
