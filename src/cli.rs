//! Command-line interface definitions and argument parsing

use std::path::PathBuf;

use clap::Parser;

use crate::apriori::Thresholds;
use crate::error::MiningError;

/// Market basket analysis CLI: frequent itemsets and association rules with Apriori
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the input CSV file with TransactionID and Items columns
    #[arg(short, long, default_value = "transactions.csv")]
    pub input: PathBuf,

    /// Minimum support, in percent
    #[arg(short = 's', long, default_value = "20")]
    pub min_support: f64,

    /// Minimum confidence, in percent
    #[arg(short = 'c', long, default_value = "50")]
    pub min_confidence: f64,

    /// Directory for the CSV exports and charts
    #[arg(short, long, default_value = "output")]
    pub output_dir: PathBuf,

    /// Number of items shown in the item frequency chart
    #[arg(long, default_value = "10")]
    pub top_items: usize,

    /// Skip chart rendering
    #[arg(long)]
    pub no_charts: bool,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    /// Convert the percentage flags into validated thresholds
    pub fn thresholds(&self) -> Result<Thresholds, MiningError> {
        Thresholds::from_percentages(self.min_support, self.min_confidence)
    }

    /// Default tracing filter when `RUST_LOG` is not set
    pub fn log_level(&self) -> &'static str {
        if self.verbose {
            "debug"
        } else {
            "info"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_thresholds_from_args() {
        let mut args = Args::parse_from(["basketforge", "-i", "basket.csv", "-s", "40", "-c", "60"]);
        assert_eq!(args.input, PathBuf::from("basket.csv"));

        let thresholds = args.thresholds().unwrap();
        assert!((thresholds.min_support() - 0.4).abs() < 1e-12);
        assert!((thresholds.min_confidence() - 0.6).abs() < 1e-12);

        args.min_support = 120.0;
        assert!(matches!(
            args.thresholds(),
            Err(MiningError::InvalidThreshold { name: "min_support", .. })
        ));
    }

    #[test]
    fn test_defaults() {
        let args = Args::parse_from(["basketforge"]);
        assert_eq!(args.min_support, 20.0);
        assert_eq!(args.min_confidence, 50.0);
        assert_eq!(args.top_items, 10);
        assert!(!args.no_charts);
        assert_eq!(args.log_level(), "info");
    }
}
