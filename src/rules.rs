//! Association rule derivation from frequent itemsets

use std::fmt;

use tracing::debug;

use crate::apriori::FrequentItemsets;
use crate::itemset::Itemset;
use crate::support::SupportCalculator;

/// An "if antecedent then consequent" rule with its strength metrics
#[derive(Debug, Clone, PartialEq)]
pub struct AssociationRule {
    pub antecedent: Itemset,
    pub consequent: Itemset,
    /// Support of antecedent ∪ consequent
    pub support: f64,
    /// support(antecedent ∪ consequent) / support(antecedent)
    pub confidence: f64,
    /// confidence / support(consequent), or 0 when the consequent never occurs
    pub lift: f64,
}

impl fmt::Display for AssociationRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} => {}", self.antecedent, self.consequent)
    }
}

/// Derive every rule meeting `min_confidence` from itemsets of size two or more
///
/// # Arguments
/// * `frequent` - Output of the frequent itemset miner
/// * `calc` - Support calculator over the same store
/// * `min_confidence` - Inclusive confidence threshold, as a fraction
///
/// # Returns
/// * Rules sorted by confidence descending; equal confidences keep generation order
pub fn generate_rules(
    frequent: &FrequentItemsets,
    calc: &SupportCalculator<'_>,
    min_confidence: f64,
) -> Vec<AssociationRule> {
    let mut rules = Vec::new();

    for (size, records) in frequent.levels().filter(|(size, _)| *size >= 2) {
        for record in records {
            for antecedent_size in 1..size {
                for antecedent in record.itemset.combinations(antecedent_size) {
                    let rule = derive_rule(
                        record.support,
                        &record.itemset,
                        antecedent,
                        calc,
                        min_confidence,
                    );
                    rules.extend(rule);
                }
            }
        }
    }

    debug!(rules = rules.len(), min_confidence, "derived association rules");

    // `sort_by` is stable, so ties stay in generation order
    rules.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));
    rules
}

fn derive_rule(
    support: f64,
    itemset: &Itemset,
    antecedent: Itemset,
    calc: &SupportCalculator<'_>,
    min_confidence: f64,
) -> Option<AssociationRule> {
    let antecedent_support = calc.support(&antecedent);
    if antecedent_support <= 0.0 {
        return None;
    }

    let confidence = support / antecedent_support;
    if confidence.is_nan() || confidence < min_confidence {
        return None;
    }

    let consequent = itemset.difference(&antecedent);
    let consequent_support = calc.support(&consequent);
    let lift = if consequent_support > 0.0 {
        confidence / consequent_support
    } else {
        0.0
    };

    Some(AssociationRule {
        antecedent,
        consequent,
        support,
        confidence,
        lift,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::apriori::{find_frequent_itemsets, run, Thresholds};
    use crate::data::TransactionStore;

    fn create_test_store() -> TransactionStore {
        TransactionStore::load(vec![
            vec!["A", "B", "C"],
            vec!["A", "B"],
            vec!["A", "C"],
            vec!["A"],
            vec!["B", "C"],
        ])
        .unwrap()
    }

    fn rule(antecedent: &[&str], consequent: &[&str]) -> (Itemset, Itemset) {
        (
            Itemset::new(antecedent.iter().copied()),
            Itemset::new(consequent.iter().copied()),
        )
    }

    #[test]
    fn test_reference_rules() {
        let store = create_test_store();
        let calc = SupportCalculator::new(&store);
        let frequent = find_frequent_itemsets(&calc, 0.4);
        let rules = generate_rules(&frequent, &calc, 0.6);

        let pairs: Vec<(Itemset, Itemset)> = rules
            .iter()
            .map(|r| (r.antecedent.clone(), r.consequent.clone()))
            .collect();
        assert_eq!(
            pairs,
            vec![
                rule(&["B"], &["A"]),
                rule(&["C"], &["A"]),
                rule(&["B"], &["C"]),
                rule(&["C"], &["B"]),
            ]
        );

        let b_to_a = &rules[0];
        assert!((b_to_a.support - 0.4).abs() < 1e-9);
        assert!((b_to_a.confidence - 0.4 / 0.6).abs() < 1e-9);
        assert!((b_to_a.lift - (0.4 / 0.6) / 0.8).abs() < 1e-9);

        let b_to_c = &rules[2];
        assert!((b_to_c.lift - (0.4 / 0.6) / 0.6).abs() < 1e-9);
    }

    #[test]
    fn test_rule_invariants() {
        let store = create_test_store();
        let calc = SupportCalculator::new(&store);
        let frequent = find_frequent_itemsets(&calc, 0.2);
        let rules = generate_rules(&frequent, &calc, 0.3);

        assert!(!rules.is_empty());
        for rule in &rules {
            assert!(!rule.antecedent.is_empty());
            assert!(!rule.consequent.is_empty());
            assert!(rule.antecedent.is_disjoint(&rule.consequent));
            assert!(frequent.contains(&rule.antecedent.union(&rule.consequent)));
            assert!(rule.confidence >= 0.3);
            assert!(rule.lift.is_finite() && rule.lift >= 0.0);
        }

        for pair in rules.windows(2) {
            assert!(pair[0].confidence >= pair[1].confidence);
        }
    }

    #[test]
    fn test_three_item_splits() {
        let store = TransactionStore::load(vec![vec!["A", "B", "C"], vec!["A", "B", "C"]]).unwrap();
        let calc = SupportCalculator::new(&store);
        let frequent = find_frequent_itemsets(&calc, 1.0);
        let rules = generate_rules(&frequent, &calc, 1.0);

        // 3 pairs x 2 directions + 1 triple x 6 splits
        assert_eq!(rules.len(), 12);
        assert!(rules.iter().all(|r| (r.lift - 1.0).abs() < 1e-9));
        assert_eq!(rules[0].to_string(), "{A} => {B}");
    }

    #[test]
    fn test_no_rules_without_pairs() {
        let store = TransactionStore::load(vec![vec!["A"], vec!["B"]]).unwrap();
        let calc = SupportCalculator::new(&store);
        let frequent = find_frequent_itemsets(&calc, 0.5);

        assert_eq!(frequent.max_size(), Some(1));
        assert!(generate_rules(&frequent, &calc, 0.0).is_empty());
    }

    #[test]
    fn test_zero_support_antecedents_are_skipped() {
        // At zero support, unseen combinations such as {A, C} are "frequent"
        let thresholds = Thresholds::new(0.0, 0.0).unwrap();
        let store = TransactionStore::load(vec![vec!["A", "B"], vec!["C", "D"], vec!["E"]]).unwrap();
        let analysis = run(&store, thresholds);
        let calc = SupportCalculator::new(&store);

        assert!(analysis.frequent_itemsets.contains(&Itemset::new(["A", "C", "E"])));
        assert!(analysis.has_rules());
        for rule in &analysis.rules {
            assert!(rule.confidence.is_finite(), "rule {}", rule);
            assert!(rule.lift.is_finite() && rule.lift >= 0.0, "rule {}", rule);
            assert!(calc.support(&rule.antecedent) > 0.0, "rule {}", rule);
        }
    }

    #[test]
    fn test_confidence_threshold_is_inclusive() {
        let store = create_test_store();
        let calc = SupportCalculator::new(&store);
        let frequent = find_frequent_itemsets(&calc, 0.4);

        // A => B has confidence exactly 0.4 / 0.8
        let at_boundary = generate_rules(&frequent, &calc, 0.4 / 0.8);
        let (a, b) = rule(&["A"], &["B"]);
        assert!(at_boundary
            .iter()
            .any(|r| r.antecedent == a && r.consequent == b));
    }
}
