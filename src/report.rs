//! Display/export tables for frequent itemsets and rules, and CSV export using Polars

use std::fs::File;
use std::path::Path;

use polars::prelude::*;

use crate::apriori::{Analysis, FrequentItemsets};
use crate::rules::AssociationRule;

/// File name of the frequent itemsets export
pub const FREQUENT_ITEMSETS_FILE: &str = "frequent_itemsets.csv";
/// File name of the association rules export
pub const ASSOCIATION_RULES_FILE: &str = "association_rules.csv";

/// One row of the frequent itemsets table
#[derive(Debug, Clone, PartialEq)]
pub struct FrequentItemsetRow {
    /// Members, alphabetically sorted and comma-joined
    pub itemset: String,
    pub size: usize,
    /// Raw support fraction, for charting
    pub support: f64,
    /// Support as a percentage string, e.g. "40.00%"
    pub support_pct: String,
}

/// One row of the association rules table
#[derive(Debug, Clone, PartialEq)]
pub struct RuleRow {
    pub antecedent: String,
    pub consequent: String,
    pub support: f64,
    pub confidence: f64,
    pub lift: f64,
    pub support_pct: String,
    pub confidence_pct: String,
    /// Lift with two decimals
    pub lift_display: String,
}

/// Format a fraction as a percentage with two decimals
pub fn format_percentage(fraction: f64) -> String {
    format!("{:.2}%", fraction * 100.0)
}

/// Parse a percentage string such as "66.67%" back into its percent value
pub fn parse_percentage(value: &str) -> Option<f64> {
    value.trim().trim_end_matches('%').trim().parse().ok()
}

pub fn format_lift(lift: f64) -> String {
    format!("{:.2}", lift)
}

/// Flatten frequent itemsets into rows ordered by size
pub fn frequent_itemsets_table(frequent: &FrequentItemsets) -> Vec<FrequentItemsetRow> {
    frequent
        .iter()
        .map(|record| FrequentItemsetRow {
            itemset: record.itemset.join(", "),
            size: record.itemset.len(),
            support: record.support,
            support_pct: format_percentage(record.support),
        })
        .collect()
}

/// Flatten rules into rows, preserving their order
pub fn rules_table(rules: &[AssociationRule]) -> Vec<RuleRow> {
    rules
        .iter()
        .map(|rule| RuleRow {
            antecedent: rule.antecedent.join(", "),
            consequent: rule.consequent.join(", "),
            support: rule.support,
            confidence: rule.confidence,
            lift: rule.lift,
            support_pct: format_percentage(rule.support),
            confidence_pct: format_percentage(rule.confidence),
            lift_display: format_lift(rule.lift),
        })
        .collect()
}

/// Build the frequent itemsets export frame
pub fn frequent_itemsets_frame(rows: &[FrequentItemsetRow]) -> crate::Result<DataFrame> {
    let df = DataFrame::new(vec![
        Series::new(
            "Itemset",
            rows.iter().map(|r| r.itemset.clone()).collect::<Vec<_>>(),
        ),
        Series::new(
            "Size",
            rows.iter().map(|r| r.size as u64).collect::<Vec<_>>(),
        ),
        Series::new(
            "Support",
            rows.iter().map(|r| r.support).collect::<Vec<_>>(),
        ),
        Series::new(
            "Support (%)",
            rows.iter().map(|r| r.support_pct.clone()).collect::<Vec<_>>(),
        ),
    ])?;
    Ok(df)
}

/// Build the association rules export frame; metric columns hold formatted strings
pub fn rules_frame(rows: &[RuleRow]) -> crate::Result<DataFrame> {
    let df = DataFrame::new(vec![
        Series::new(
            "Antecedent",
            rows.iter().map(|r| r.antecedent.clone()).collect::<Vec<_>>(),
        ),
        Series::new(
            "Consequent",
            rows.iter().map(|r| r.consequent.clone()).collect::<Vec<_>>(),
        ),
        Series::new(
            "Support",
            rows.iter().map(|r| r.support_pct.clone()).collect::<Vec<_>>(),
        ),
        Series::new(
            "Confidence",
            rows.iter().map(|r| r.confidence_pct.clone()).collect::<Vec<_>>(),
        ),
        Series::new(
            "Lift",
            rows.iter().map(|r| r.lift_display.clone()).collect::<Vec<_>>(),
        ),
    ])?;
    Ok(df)
}

fn write_csv(mut df: DataFrame, output_path: &Path) -> crate::Result<()> {
    let mut file = File::create(output_path)?;
    CsvWriter::new(&mut file)
        .include_header(true)
        .finish(&mut df)?;
    Ok(())
}

pub fn write_frequent_itemsets_csv(
    rows: &[FrequentItemsetRow],
    output_path: impl AsRef<Path>,
) -> crate::Result<()> {
    write_csv(frequent_itemsets_frame(rows)?, output_path.as_ref())
}

pub fn write_rules_csv(rows: &[RuleRow], output_path: impl AsRef<Path>) -> crate::Result<()> {
    write_csv(rules_frame(rows)?, output_path.as_ref())
}

/// Write both export files into `output_dir`, creating it if needed
///
/// # Returns
/// * Paths of the frequent itemsets and rules files, in that order
pub fn export_analysis(
    analysis: &Analysis,
    output_dir: impl AsRef<Path>,
) -> crate::Result<(std::path::PathBuf, std::path::PathBuf)> {
    let output_dir = output_dir.as_ref();
    std::fs::create_dir_all(output_dir)?;

    let itemsets_path = output_dir.join(FREQUENT_ITEMSETS_FILE);
    let rules_path = output_dir.join(ASSOCIATION_RULES_FILE);

    write_frequent_itemsets_csv(
        &frequent_itemsets_table(&analysis.frequent_itemsets),
        &itemsets_path,
    )?;
    write_rules_csv(&rules_table(&analysis.rules), &rules_path)?;

    Ok((itemsets_path, rules_path))
}

/// Print the frequent itemsets table to console
pub fn print_frequent_itemsets(rows: &[FrequentItemsetRow]) {
    println!("\n=== Frequent Itemsets ===");
    if rows.is_empty() {
        println!("No frequent itemsets found. Try lowering the minimum support.");
        return;
    }

    let width = rows.iter().map(|r| r.itemset.len()).max().unwrap_or(0).max(7);
    println!("  {:width$} | Size | Support", "Itemset", width = width);
    println!("  {}-|------|---------", "-".repeat(width));
    for row in rows {
        println!(
            "  {:width$} | {:4} | {:>7}",
            row.itemset,
            row.size,
            row.support_pct,
            width = width
        );
    }
}

/// Print the association rules table to console
pub fn print_rules(rows: &[RuleRow]) {
    println!("\n=== Association Rules ===");
    if rows.is_empty() {
        println!("No association rules found. Try lowering the minimum confidence.");
        return;
    }

    let width = rows
        .iter()
        .map(|r| r.antecedent.len() + r.consequent.len() + 4)
        .max()
        .unwrap_or(0)
        .max(4);
    println!("  {:width$} | Support | Confidence | Lift", "Rule", width = width);
    println!("  {}-|---------|------------|------", "-".repeat(width));
    for row in rows {
        let rule = format!("{} => {}", row.antecedent, row.consequent);
        println!(
            "  {:width$} | {:>7} | {:>10} | {:>4}",
            rule,
            row.support_pct,
            row.confidence_pct,
            row.lift_display,
            width = width
        );
    }
}
