//! BasketForge: A Rust CLI application for market basket analysis using Apriori
//!
//! This library mines frequent itemsets from transaction data and derives
//! association rules with support, confidence and lift.

pub mod apriori;
pub mod cli;
pub mod data;
pub mod error;
pub mod itemset;
pub mod report;
pub mod rules;
pub mod support;
pub mod viz;

// Re-export public items for easier access
pub use apriori::{
    analyze, find_frequent_itemsets, run, Analysis, FrequentItemset, FrequentItemsets, Thresholds,
};
pub use cli::Args;
pub use data::{load_store, load_transactions_csv, DatasetSummary, TransactionStore};
pub use error::MiningError;
pub use itemset::Itemset;
pub use report::{
    export_analysis, frequent_itemsets_table, rules_table, FrequentItemsetRow, RuleRow,
};
pub use rules::{generate_rules, AssociationRule};
pub use support::SupportCalculator;
pub use viz::generate_visualization_report;

/// Common result type used throughout the application
pub type Result<T> = anyhow::Result<T>;
