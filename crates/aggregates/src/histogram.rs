//! Run-length category histogram.
//!
//! A small ordered multiset of `(category, count)` pairs used as the cell
//! type when reducing categorical values. Cells rarely see more than a
//! handful of categories, so entries live in a vector and lookups are
//! linear scans.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

/// Per-category counts with unique keys.
///
/// In sorted mode entries are kept in descending count order (ties keep
/// first-seen order); otherwise they stay in insertion order. Equality
/// compares the counts per category and ignores entry order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryHistogram<C> {
    entries: Vec<(C, u64)>,
    sorted: bool,
}

impl<C> Default for CategoryHistogram<C> {
    fn default() -> Self {
        Self::new(false)
    }
}

impl<C> CategoryHistogram<C> {
    pub fn new(sorted: bool) -> Self {
        Self {
            entries: Vec::new(),
            sorted,
        }
    }

    pub fn is_sorted(&self) -> bool {
        self.sorted
    }

    /// Number of distinct categories.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of all counts.
    pub fn total(&self) -> u64 {
        self.entries.iter().map(|(_, n)| n).sum()
    }

    /// Entries in display order.
    pub fn iter(&self) -> impl Iterator<Item = (&C, u64)> {
        self.entries.iter().map(|(c, n)| (c, *n))
    }

    pub fn keys(&self) -> impl Iterator<Item = &C> {
        self.entries.iter().map(|(c, _)| c)
    }

    /// First entry in display order: the most frequent category in sorted
    /// mode, the first one seen otherwise.
    pub fn first(&self) -> Option<(&C, u64)> {
        self.entries.first().map(|(c, n)| (c, *n))
    }

    fn resort(&mut self) {
        if self.sorted {
            self.entries.sort_by(|a, b| b.1.cmp(&a.1));
        }
    }
}

impl<C: PartialEq> CategoryHistogram<C> {
    /// Increment `category` by `delta`, creating the entry if absent.
    /// Adding zero leaves the histogram unchanged.
    pub fn add(&mut self, category: C, delta: u64) {
        if delta == 0 {
            return;
        }
        match self.entries.iter_mut().find(|(c, _)| *c == category) {
            Some((_, n)) => *n += delta,
            None => self.entries.push((category, delta)),
        }
        self.resort();
    }

    /// Count for `category`, 0 when absent.
    pub fn value(&self, category: &C) -> u64 {
        self.entries
            .iter()
            .find(|(c, _)| c == category)
            .map(|(_, n)| *n)
            .unwrap_or(0)
    }
}

impl<C: PartialEq + Clone> CategoryHistogram<C> {
    /// Union of categories with counts summed per key.
    ///
    /// Keys appear in `self`'s order followed by keys only `other` has; in
    /// sorted mode (either side sorted) the result is re-sorted.
    pub fn merge(&self, other: &CategoryHistogram<C>) -> CategoryHistogram<C> {
        let mut merged = CategoryHistogram {
            entries: self.entries.iter().filter(|(_, n)| *n > 0).cloned().collect(),
            sorted: self.sorted || other.sorted,
        };
        for (category, count) in other.entries.iter().filter(|(_, n)| *n > 0) {
            match merged.entries.iter_mut().find(|(c, _)| c == category) {
                Some((_, n)) => *n += count,
                None => merged.entries.push((category.clone(), *count)),
            }
        }
        merged.resort();
        merged
    }
}

impl<C: PartialEq> PartialEq for CategoryHistogram<C> {
    fn eq(&self, other: &Self) -> bool {
        self.entries.iter().all(|(c, n)| other.value(c) == *n)
            && other.entries.iter().all(|(c, n)| self.value(c) == *n)
    }
}

/// Orders by total count, then by the descending pattern of non-zero
/// counts. Histograms with the same pattern over different categories are
/// unordered.
impl<C: PartialEq> PartialOrd for CategoryHistogram<C> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        if self == other {
            return Some(Ordering::Equal);
        }
        match self
            .total()
            .cmp(&other.total())
            .then_with(|| self.pattern().cmp(&other.pattern()))
        {
            Ordering::Equal => None,
            ordering => Some(ordering),
        }
    }
}

impl<C> CategoryHistogram<C> {
    fn pattern(&self) -> Vec<u64> {
        let mut counts: Vec<u64> = self.entries.iter().map(|(_, n)| *n).filter(|n| *n > 0).collect();
        counts.sort_unstable_by(|a, b| b.cmp(a));
        counts
    }
}

impl<C: PartialEq + Clone> FromIterator<C> for CategoryHistogram<C> {
    fn from_iter<I: IntoIterator<Item = C>>(iter: I) -> Self {
        let mut hist = CategoryHistogram::new(false);
        for c in iter {
            hist.add(c, 1);
        }
        hist
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_and_value() {
        let mut h = CategoryHistogram::new(false);
        h.add('a', 2);
        h.add('b', 1);
        h.add('a', 3);
        assert_eq!(h.value(&'a'), 5);
        assert_eq!(h.value(&'b'), 1);
        assert_eq!(h.value(&'z'), 0);
        assert_eq!(h.len(), 2);
        assert_eq!(h.total(), 6);
    }

    #[test]
    fn test_insertion_order_kept_unsorted() {
        let mut h = CategoryHistogram::new(false);
        h.add("x", 1);
        h.add("y", 5);
        let keys: Vec<_> = h.keys().copied().collect();
        assert_eq!(keys, vec!["x", "y"]);
    }

    #[test]
    fn test_sorted_descending() {
        let mut h = CategoryHistogram::new(true);
        h.add("x", 1);
        h.add("y", 5);
        h.add("z", 3);
        let keys: Vec<_> = h.keys().copied().collect();
        assert_eq!(keys, vec!["y", "z", "x"]);
        assert_eq!(h.first(), Some((&"y", 5)));
    }

    #[test]
    fn test_merge_sums_counts() {
        let a: CategoryHistogram<u8> = [1, 1, 2].into_iter().collect();
        let b: CategoryHistogram<u8> = [2, 3].into_iter().collect();
        let m = a.merge(&b);
        assert_eq!(m.value(&1), 2);
        assert_eq!(m.value(&2), 2);
        assert_eq!(m.value(&3), 1);
        assert_eq!(m, b.merge(&a));
    }

    #[test]
    fn test_equality_ignores_order() {
        let mut a = CategoryHistogram::new(false);
        a.add('p', 1);
        a.add('q', 2);
        let mut b = CategoryHistogram::new(false);
        b.add('q', 2);
        b.add('p', 1);
        assert_eq!(a, b);
        b.add('r', 1);
        assert_ne!(a, b);
    }

    #[test]
    fn test_zero_add_is_noop() {
        let mut a = CategoryHistogram::new(true);
        a.add('x', 0);
        assert!(a.is_empty());
        assert_eq!(a, CategoryHistogram::new(false));
    }

    #[test]
    fn test_equality_ignores_zero_entries() {
        // Zero counts can only arrive through deserialization.
        let a: CategoryHistogram<char> =
            serde_json::from_str(r#"{"entries":[["x",0],["y",2]],"sorted":false}"#).unwrap();
        let mut b = CategoryHistogram::new(false);
        b.add('y', 2);
        assert_eq!(a, b);
        assert_eq!(b, a);
        assert_eq!(a.merge(&b).len(), 1);
        assert_eq!(b.merge(&a).len(), 1);
    }

    #[test]
    fn test_ordering_by_total_then_pattern() {
        let small: CategoryHistogram<u8> = [1, 2].into_iter().collect();
        let large: CategoryHistogram<u8> = [1, 1, 3].into_iter().collect();
        assert!(small < large);

        let spread: CategoryHistogram<u8> = [1, 2, 3].into_iter().collect();
        let peaked: CategoryHistogram<u8> = [1, 1, 2].into_iter().collect();
        assert!(spread < peaked);

        let same_shape: CategoryHistogram<u8> = [4, 4, 5].into_iter().collect();
        assert_eq!(peaked.partial_cmp(&same_shape), None);
        assert_eq!(peaked.partial_cmp(&peaked.clone()), Some(Ordering::Equal));
    }
}
