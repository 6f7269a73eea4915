//! Federal individual income and payroll tax microsimulation engine
//!
//! This library provides:
//! - A reformable, inflation-indexed policy parameter store
//! - A vectorized filer table built from CSV micro-data
//! - The staged formula pipeline from filing status through combined
//!   income-plus-payroll liability, with an itemize-or-standard optimizer
//! - Marginal tax rate computation by finite-difference perturbation
//! - Weighted aggregation over output columns

pub mod calc;
pub mod errors;
pub mod policy;
pub mod records;
pub mod report;

// Re-export commonly used types
pub use calc::{Calculator, MarginalRates};
pub use errors::{ConfigError, StateError};
pub use policy::{parse_assumptions, parse_reform, CurrentParams, Policy, Reform};
pub use records::{loader::load_records, FilingStatus, RawRecord, Records};
