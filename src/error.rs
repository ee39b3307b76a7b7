//! Error taxonomy for the mining engine

use thiserror::Error;

/// Structural and input errors that abort an analysis run.
///
/// Empty results (no frequent itemsets, no rules) are not errors; they flow
/// through to the report as empty tables.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MiningError {
    #[error("no transactions to analyze: the input is empty or every transaction has no items")]
    EmptyInput,

    #[error("invalid value for {name}: {value} (expected a value between {min} and {max})")]
    InvalidThreshold {
        name: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("missing required column '{column}' (expected columns: TransactionID, Items)")]
    MissingColumn { column: &'static str },
}
