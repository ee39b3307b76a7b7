//! Support counting against a transaction store

use std::cell::RefCell;
use std::collections::HashMap;

use crate::data::TransactionStore;
use crate::itemset::Itemset;

/// Computes support of arbitrary itemsets over a fixed store.
///
/// Results are memoized for the lifetime of the calculator. Support is a pure
/// function of the itemset and the immutable store, so cached and recomputed
/// values are always identical.
#[derive(Debug)]
pub struct SupportCalculator<'a> {
    store: &'a TransactionStore,
    cache: RefCell<HashMap<Itemset, f64>>,
}

impl<'a> SupportCalculator<'a> {
    pub fn new(store: &'a TransactionStore) -> Self {
        Self {
            store,
            cache: RefCell::new(HashMap::new()),
        }
    }

    pub fn store(&self) -> &TransactionStore {
        self.store
    }

    /// Number of transactions that contain every member of `itemset`
    pub fn count(&self, itemset: &Itemset) -> usize {
        self.store
            .iter()
            .filter(|transaction| itemset.is_subset(transaction))
            .count()
    }

    /// Fraction of transactions containing `itemset`, in [0, 1]
    pub fn support(&self, itemset: &Itemset) -> f64 {
        if let Some(&cached) = self.cache.borrow().get(itemset) {
            return cached;
        }

        let support = self.count(itemset) as f64 / self.store.len() as f64;
        self.cache.borrow_mut().insert(itemset.clone(), support);
        support
    }

    /// Number of distinct itemsets evaluated so far
    pub fn evaluated(&self) -> usize {
        self.cache.borrow().len()
    }
}
