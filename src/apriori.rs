//! Level-wise frequent itemset mining (Apriori) and the analysis entry point

use std::collections::{BTreeMap, BTreeSet, HashSet};

use tracing::{debug, info, warn};

use crate::data::{DatasetSummary, TransactionStore};
use crate::error::MiningError;
use crate::itemset::Itemset;
use crate::rules::{generate_rules, AssociationRule};
use crate::support::SupportCalculator;

/// Minimum support and confidence, both as fractions in [0, 1]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Thresholds {
    min_support: f64,
    min_confidence: f64,
}

impl Thresholds {
    pub fn new(min_support: f64, min_confidence: f64) -> Result<Self, MiningError> {
        check_range("min_support", min_support, 1.0)?;
        check_range("min_confidence", min_confidence, 1.0)?;
        Ok(Self {
            min_support,
            min_confidence,
        })
    }

    /// Build thresholds from percentages in [0, 100], as exposed on the command line
    pub fn from_percentages(min_support: f64, min_confidence: f64) -> Result<Self, MiningError> {
        check_range("min_support", min_support, 100.0)?;
        check_range("min_confidence", min_confidence, 100.0)?;
        Self::new(min_support / 100.0, min_confidence / 100.0)
    }

    pub fn min_support(&self) -> f64 {
        self.min_support
    }

    pub fn min_confidence(&self) -> f64 {
        self.min_confidence
    }
}

fn check_range(name: &'static str, value: f64, max: f64) -> Result<(), MiningError> {
    // NaN fails `contains` as well
    if !(0.0..=max).contains(&value) {
        return Err(MiningError::InvalidThreshold {
            name,
            value,
            min: 0.0,
            max,
        });
    }
    Ok(())
}

/// A frequent itemset together with its support
#[derive(Debug, Clone, PartialEq)]
pub struct FrequentItemset {
    pub itemset: Itemset,
    pub support: f64,
}

/// Frequent itemsets grouped by size
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrequentItemsets {
    levels: BTreeMap<usize, Vec<FrequentItemset>>,
}

impl FrequentItemsets {
    /// Records of size `k`; empty when no itemset of that size is frequent
    pub fn level(&self, k: usize) -> &[FrequentItemset] {
        self.levels.get(&k).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Non-empty levels in ascending size order
    pub fn levels(&self) -> impl Iterator<Item = (usize, &[FrequentItemset])> {
        self.levels.iter().map(|(&k, records)| (k, records.as_slice()))
    }

    /// All records, smallest itemsets first
    pub fn iter(&self) -> impl Iterator<Item = &FrequentItemset> {
        self.levels.values().flatten()
    }

    /// Total number of frequent itemsets across all sizes
    pub fn len(&self) -> usize {
        self.levels.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// Size of the largest frequent itemset
    pub fn max_size(&self) -> Option<usize> {
        self.levels.keys().next_back().copied()
    }

    pub fn get(&self, itemset: &Itemset) -> Option<&FrequentItemset> {
        self.level(itemset.len())
            .iter()
            .find(|record| &record.itemset == itemset)
    }

    pub fn contains(&self, itemset: &Itemset) -> bool {
        self.get(itemset).is_some()
    }

    /// Number of frequent itemsets for each size
    pub fn count_by_size(&self) -> BTreeMap<usize, usize> {
        self.levels
            .iter()
            .map(|(&k, records)| (k, records.len()))
            .collect()
    }

    fn insert_level(&mut self, k: usize, records: Vec<FrequentItemset>) {
        if !records.is_empty() {
            self.levels.insert(k, records);
        }
    }
}

/// Discover every itemset whose support is at least `min_support`
///
/// # Arguments
/// * `calc` - Support calculator bound to the transaction store
/// * `min_support` - Inclusive support threshold, as a fraction
///
/// # Returns
/// * Frequent itemsets keyed by size, from 1 up to the largest non-empty level
pub fn find_frequent_itemsets(calc: &SupportCalculator<'_>, min_support: f64) -> FrequentItemsets {
    let mut result = FrequentItemsets::default();

    let singletons: BTreeSet<Itemset> = calc
        .store()
        .distinct_items()
        .into_iter()
        .map(Itemset::singleton)
        .collect();

    let mut k = 1;
    let mut current = filter_frequent(calc, singletons, min_support);
    debug!(level = k, frequent = current.len(), "evaluated singletons");

    while !current.is_empty() {
        let candidates = generate_candidates(&current, k + 1);
        let candidate_count = candidates.len();
        let next = filter_frequent(calc, candidates, min_support);
        debug!(
            level = k + 1,
            candidates = candidate_count,
            frequent = next.len(),
            "evaluated candidates"
        );

        result.insert_level(k, current);
        current = next;
        k += 1;
    }

    result
}

fn filter_frequent(
    calc: &SupportCalculator<'_>,
    candidates: BTreeSet<Itemset>,
    min_support: f64,
) -> Vec<FrequentItemset> {
    candidates
        .into_iter()
        .filter_map(|itemset| {
            let support = calc.support(&itemset);
            (support >= min_support).then_some(FrequentItemset { itemset, support })
        })
        .collect()
}

/// Self-join the frequent itemsets of one level into candidates of size `k`.
///
/// Every pair whose union has exactly `k` members yields a candidate; the
/// ordered set collapses duplicates by member equality. Candidates with an
/// infrequent (k-1)-subset cannot be frequent and are pruned before counting.
fn generate_candidates(frequent: &[FrequentItemset], k: usize) -> BTreeSet<Itemset> {
    let known: HashSet<&Itemset> = frequent.iter().map(|record| &record.itemset).collect();
    let mut candidates = BTreeSet::new();

    for (i, left) in frequent.iter().enumerate() {
        for right in &frequent[i + 1..] {
            let union = left.itemset.union(&right.itemset);
            if union.len() == k {
                candidates.insert(union);
            }
        }
    }

    candidates.retain(|candidate: &Itemset| {
        candidate
            .iter()
            .all(|item| known.contains(&candidate.without(item)))
    });
    candidates
}

/// Immutable result of one analysis run
#[derive(Debug, Clone)]
pub struct Analysis {
    pub thresholds: Thresholds,
    pub summary: DatasetSummary,
    /// Raw number of transactions containing each item
    pub item_counts: BTreeMap<String, usize>,
    pub frequent_itemsets: FrequentItemsets,
    /// Rules sorted by confidence, highest first
    pub rules: Vec<AssociationRule>,
}

impl Analysis {
    pub fn has_frequent_itemsets(&self) -> bool {
        !self.frequent_itemsets.is_empty()
    }

    pub fn has_rules(&self) -> bool {
        !self.rules.is_empty()
    }
}

/// Mine frequent itemsets and derive association rules from a loaded store
pub fn run(store: &TransactionStore, thresholds: Thresholds) -> Analysis {
    let calc = SupportCalculator::new(store);

    let frequent_itemsets = find_frequent_itemsets(&calc, thresholds.min_support());
    let rules = generate_rules(&frequent_itemsets, &calc, thresholds.min_confidence());

    info!(
        transactions = store.len(),
        frequent_itemsets = frequent_itemsets.len(),
        rules = rules.len(),
        supports_evaluated = calc.evaluated(),
        "analysis complete"
    );
    if frequent_itemsets.is_empty() {
        warn!(min_support = thresholds.min_support(), "no frequent itemsets found");
    } else if rules.is_empty() {
        warn!(min_confidence = thresholds.min_confidence(), "no association rules found");
    }

    Analysis {
        thresholds,
        summary: store.summary(),
        item_counts: store.item_counts(),
        frequent_itemsets,
        rules,
    }
}

/// Load raw transactions and run a full analysis in one call
pub fn analyze<T, I, S>(transactions: T, thresholds: Thresholds) -> Result<Analysis, MiningError>
where
    T: IntoIterator<Item = I>,
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let store = TransactionStore::load(transactions)?;
    Ok(run(&store, thresholds))
}
