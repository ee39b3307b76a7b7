//! Canonical itemset representation

use std::collections::BTreeSet;
use std::fmt;

/// A set of distinct item labels.
///
/// Labels are kept in sorted order, so two itemsets with the same members
/// compare, hash and display identically no matter how they were built.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Itemset(BTreeSet<String>);

impl Itemset {
    /// Build an itemset from any collection of labels, collapsing duplicates
    pub fn new<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(items.into_iter().map(Into::into).collect())
    }

    pub fn singleton(item: impl Into<String>) -> Self {
        Self(BTreeSet::from([item.into()]))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Labels in ascending order
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn is_subset(&self, other: &Itemset) -> bool {
        self.0.is_subset(&other.0)
    }

    pub fn is_disjoint(&self, other: &Itemset) -> bool {
        self.0.is_disjoint(&other.0)
    }

    pub fn union(&self, other: &Itemset) -> Itemset {
        Self(self.0.union(&other.0).cloned().collect())
    }

    pub fn difference(&self, other: &Itemset) -> Itemset {
        Self(self.0.difference(&other.0).cloned().collect())
    }

    /// Copy of this itemset with one label removed
    pub fn without(&self, item: &str) -> Itemset {
        Self(self.0.iter().filter(|i| i.as_str() != item).cloned().collect())
    }

    /// All subsets with exactly `size` members, in lexicographic order.
    ///
    /// Returns nothing when `size` is zero or larger than the itemset.
    pub fn combinations(&self, size: usize) -> Vec<Itemset> {
        let items: Vec<&String> = self.0.iter().collect();
        let n = items.len();
        if size == 0 || size > n {
            return Vec::new();
        }

        let mut result = Vec::new();
        let mut indices: Vec<usize> = (0..size).collect();

        loop {
            result.push(Self(indices.iter().map(|&i| items[i].clone()).collect()));

            // Rightmost position that has not reached its final value
            let mut pos = size;
            loop {
                if pos == 0 {
                    return result;
                }
                pos -= 1;
                if indices[pos] != pos + n - size {
                    break;
                }
            }

            indices[pos] += 1;
            for next in pos + 1..size {
                indices[next] = indices[next - 1] + 1;
            }
        }
    }

    /// Members joined with `separator`, alphabetically sorted
    pub fn join(&self, separator: &str) -> String {
        self.iter().collect::<Vec<_>>().join(separator)
    }
}

impl fmt::Display for Itemset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{}}}", self.join(", "))
    }
}

impl FromIterator<String> for Itemset {
    fn from_iter<T: IntoIterator<Item = String>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> FromIterator<&'a str> for Itemset {
    fn from_iter<T: IntoIterator<Item = &'a str>>(iter: T) -> Self {
        Self(iter.into_iter().map(str::to_string).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_is_set_based() {
        let a = Itemset::new(["Milk", "Bread", "Milk"]);
        let b = Itemset::new(["Bread", "Milk"]);

        assert_eq!(a, b);
        assert_eq!(a.len(), 2);
        assert_eq!(a.to_string(), "{Bread, Milk}");
    }

    #[test]
    fn test_set_operations() {
        let abc = Itemset::new(["A", "B", "C"]);
        let ab = Itemset::new(["A", "B"]);
        let c = Itemset::singleton("C");

        assert!(ab.is_subset(&abc));
        assert!(!abc.is_subset(&ab));
        assert!(ab.is_disjoint(&c));
        assert_eq!(abc.difference(&ab), c);
        assert_eq!(ab.union(&c), abc);
        assert_eq!(abc.without("C"), ab);
    }

    #[test]
    fn test_combinations() {
        let abcd = Itemset::new(["D", "C", "B", "A"]);

        let pairs = abcd.combinations(2);
        let joined: Vec<String> = pairs.iter().map(|s| s.join("")).collect();
        assert_eq!(joined, vec!["AB", "AC", "AD", "BC", "BD", "CD"]);

        assert_eq!(abcd.combinations(1).len(), 4);
        assert_eq!(abcd.combinations(3).len(), 4);
        assert_eq!(abcd.combinations(4), vec![abcd.clone()]);
        assert!(abcd.combinations(0).is_empty());
        assert!(abcd.combinations(5).is_empty());
    }

    #[test]
    fn test_case_is_preserved() {
        let set = Itemset::new(["milk", "Milk"]);
        assert_eq!(set.len(), 2);
        assert_eq!(set.iter().collect::<Vec<_>>(), vec!["Milk", "milk"]);
    }
}
