//! Transaction loading using Polars and the in-memory transaction store

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use polars::prelude::*;

use crate::error::MiningError;
use crate::itemset::Itemset;

/// Column holding the transaction identifier
pub const TRANSACTION_ID_COLUMN: &str = "TransactionID";
/// Column holding the comma-delimited item labels of a transaction
pub const ITEMS_COLUMN: &str = "Items";

/// A single basket: a set of distinct item labels
pub type Transaction = Itemset;

/// Split a delimited items field into labels.
///
/// Items are separated by commas, surrounding whitespace is trimmed and case
/// is preserved. Empty labels (e.g. from a trailing comma) are dropped.
pub fn parse_items(field: &str) -> Vec<String> {
    field
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

/// Load transactions from a CSV file with `TransactionID` and `Items` columns
///
/// # Arguments
/// * `file_path` - Path to the CSV file
///
/// # Returns
/// * One list of item labels per row, in file order
pub fn load_transactions_csv(file_path: impl AsRef<Path>) -> crate::Result<Vec<Vec<String>>> {
    let df = CsvReadOptions::default()
        .with_has_header(true)
        .try_into_reader_with_file_path(Some(file_path.as_ref().to_path_buf()))?
        .finish()?;

    for column in [TRANSACTION_ID_COLUMN, ITEMS_COLUMN] {
        if df.column(column).is_err() {
            return Err(MiningError::MissingColumn { column }.into());
        }
    }

    // Force string dtype; a column of single numeric item codes would otherwise be inferred as ints
    let items = df.column(ITEMS_COLUMN)?.cast(&DataType::String)?;
    let transactions = items
        .str()?
        .into_iter()
        .map(|field| field.map(parse_items).unwrap_or_default())
        .collect();

    Ok(transactions)
}

/// Load a CSV file straight into a [`TransactionStore`]
pub fn load_store(file_path: impl AsRef<Path>) -> crate::Result<TransactionStore> {
    let transactions = load_transactions_csv(file_path)?;
    Ok(TransactionStore::load(transactions)?)
}

/// Basic statistics about a loaded dataset
#[derive(Debug, Clone, PartialEq)]
pub struct DatasetSummary {
    /// Number of transactions (the support denominator)
    pub transactions: usize,
    /// Number of distinct item labels across all transactions
    pub unique_items: usize,
    /// Mean number of distinct items per transaction
    pub avg_items_per_transaction: f64,
}

/// Ordered, immutable collection of transactions for one analysis run
#[derive(Debug, Clone)]
pub struct TransactionStore {
    transactions: Vec<Transaction>,
}

impl TransactionStore {
    /// Build a store from raw item lists, collapsing duplicates inside each transaction.
    ///
    /// Fails with [`MiningError::EmptyInput`] when there are no transactions or
    /// when every transaction is empty, since support would be undefined.
    pub fn load<T, I, S>(transactions: T) -> Result<Self, MiningError>
    where
        T: IntoIterator<Item = I>,
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let transactions: Vec<Transaction> = transactions.into_iter().map(Itemset::new).collect();

        if transactions.iter().all(Itemset::is_empty) {
            return Err(MiningError::EmptyInput);
        }

        Ok(Self { transactions })
    }

    /// Number of transactions, N
    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Transaction> {
        self.transactions.iter()
    }

    /// Every item label that appears in at least one transaction
    pub fn distinct_items(&self) -> BTreeSet<String> {
        self.transactions
            .iter()
            .flat_map(|t| t.iter().map(str::to_string))
            .collect()
    }

    /// Number of transactions containing each item
    pub fn item_counts(&self) -> BTreeMap<String, usize> {
        let mut counts = BTreeMap::new();
        for item in self.transactions.iter().flat_map(Itemset::iter) {
            *counts.entry(item.to_string()).or_insert(0) += 1;
        }
        counts
    }

    pub fn summary(&self) -> DatasetSummary {
        let total_items: usize = self.transactions.iter().map(Itemset::len).sum();
        DatasetSummary {
            transactions: self.len(),
            unique_items: self.distinct_items().len(),
            avg_items_per_transaction: total_items as f64 / self.len() as f64,
        }
    }
}

/// The `n` most frequent items, by count descending then label ascending
pub fn top_items(item_counts: &BTreeMap<String, usize>, n: usize) -> Vec<(String, usize)> {
    let mut ranked: Vec<(String, usize)> = item_counts
        .iter()
        .map(|(item, &count)| (item.clone(), count))
        .collect();
    // Stable sort over label-ordered input keeps ties alphabetical
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked.truncate(n);
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_test_csv() -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "TransactionID,Items").unwrap();
        writeln!(file, "1,\"Chips, Soda, Candy\"").unwrap();
        writeln!(file, "2,\"Chips,Soda\"").unwrap();
        writeln!(file, "3,\" Chips , Chips, Candy \"").unwrap();
        writeln!(file, "4,Wafer").unwrap();
        file
    }

    #[test]
    fn test_parse_items() {
        assert_eq!(parse_items(" Chips , Soda"), vec!["Chips", "Soda"]);
        assert_eq!(parse_items("Chips,,Soda,"), vec!["Chips", "Soda"]);
        assert_eq!(parse_items("chips,Chips"), vec!["chips", "Chips"]);
        assert!(parse_items("  ").is_empty());
    }

    #[test]
    fn test_load_transactions_csv() {
        let test_file = create_test_csv();

        let transactions = load_transactions_csv(test_file.path()).unwrap();
        assert_eq!(transactions.len(), 4);
        assert_eq!(transactions[0], vec!["Chips", "Soda", "Candy"]);
        assert_eq!(transactions[2], vec!["Chips", "Chips", "Candy"]);
        assert_eq!(transactions[3], vec!["Wafer"]);
    }

    #[test]
    fn test_missing_items_column() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "TransactionID,Products").unwrap();
        writeln!(file, "1,Chips").unwrap();

        let err = load_transactions_csv(file.path()).unwrap_err();
        assert_eq!(
            err.downcast_ref::<MiningError>(),
            Some(&MiningError::MissingColumn { column: ITEMS_COLUMN })
        );
    }

    #[test]
    fn test_store_collapses_duplicates() {
        let test_file = create_test_csv();
        let store = load_store(test_file.path()).unwrap();

        assert_eq!(store.len(), 4);
        let third = store.iter().nth(2).unwrap();
        assert_eq!(third, &Itemset::new(["Candy", "Chips"]));
    }

    #[test]
    fn test_empty_input_rejected() {
        let none: Vec<Vec<String>> = Vec::new();
        assert_eq!(TransactionStore::load(none).unwrap_err(), MiningError::EmptyInput);

        let all_empty = vec![Vec::<String>::new(), Vec::new()];
        assert_eq!(TransactionStore::load(all_empty).unwrap_err(), MiningError::EmptyInput);
    }

    #[test]
    fn test_empty_transactions_still_count() {
        let store = TransactionStore::load(vec![vec!["A"], vec![]]).unwrap();
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_distinct_items_and_counts() {
        let store = TransactionStore::load(vec![
            vec!["A", "B"],
            vec!["B", "C", "B"],
            vec!["B"],
        ])
        .unwrap();

        let items: Vec<String> = store.distinct_items().into_iter().collect();
        assert_eq!(items, vec!["A", "B", "C"]);

        let counts = store.item_counts();
        assert_eq!(counts["A"], 1);
        assert_eq!(counts["B"], 3);
        assert_eq!(counts["C"], 1);
    }

    #[test]
    fn test_summary() {
        let store = TransactionStore::load(vec![vec!["A", "B"], vec!["B", "B", "C", "D"]]).unwrap();
        let summary = store.summary();

        assert_eq!(summary.transactions, 2);
        assert_eq!(summary.unique_items, 4);
        assert!((summary.avg_items_per_transaction - 2.5).abs() < 1e-9);
    }

    #[test]
    fn test_top_items() {
        let counts = BTreeMap::from([
            ("Soda".to_string(), 3),
            ("Chips".to_string(), 5),
            ("Candy".to_string(), 3),
            ("Wafer".to_string(), 1),
        ]);

        let top = top_items(&counts, 3);
        assert_eq!(
            top,
            vec![
                ("Chips".to_string(), 5),
                ("Candy".to_string(), 3),
                ("Soda".to_string(), 3),
            ]
        );
        assert_eq!(top_items(&counts, 10).len(), 4);
    }
}
