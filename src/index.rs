//! The minimal contract shared by substring index implementations.
//!
//! Keeping the surface to an insert, two streaming reads and a statistics
//! string lets nested or composite indexes expose one interface and defer
//! to each other.

use std::collections::HashSet;
use std::hash::Hash;

use crate::tree::GeneralizedSuffixTree;

/// An index from string keys to values, queried by substring containment.
pub trait SubstringIndex<T> {
    /// Adds `value` under `key`.
    fn insert(&mut self, key: &str, value: T);

    /// Streams every value whose key contains `token`. The sink may be
    /// invoked any number of times and may see the same value more than
    /// once; the union of everything passed to it is the full result.
    fn search_into(&self, token: &str, sink: &mut dyn FnMut(&T));

    /// Streams every value in the index, with the same sink contract as
    /// [`search_into`](SubstringIndex::search_into).
    fn read_all_into(&self, sink: &mut dyn FnMut(&T));

    /// Debug statistics in an unspecified human-readable format.
    fn statistics(&self) -> String;

    /// Collected, deduplicated variant of [`search_into`](SubstringIndex::search_into).
    fn search(&self, token: &str) -> HashSet<T>
    where
        T: Clone + Eq + Hash,
    {
        let mut results = HashSet::new();
        self.search_into(token, &mut |value| {
            results.insert(value.clone());
        });
        results
    }

    /// Collected, deduplicated variant of [`read_all_into`](SubstringIndex::read_all_into).
    fn read_all(&self) -> HashSet<T>
    where
        T: Clone + Eq + Hash,
    {
        let mut results = HashSet::new();
        self.read_all_into(&mut |value| {
            results.insert(value.clone());
        });
        results
    }
}

impl<T: Clone + Eq + Hash> SubstringIndex<T> for GeneralizedSuffixTree<T> {
    fn insert(&mut self, key: &str, value: T) {
        GeneralizedSuffixTree::insert(self, key, value);
    }

    fn search_into(&self, token: &str, sink: &mut dyn FnMut(&T)) {
        GeneralizedSuffixTree::search_into(self, token, &mut |value| sink(value));
    }

    fn read_all_into(&self, sink: &mut dyn FnMut(&T)) {
        GeneralizedSuffixTree::read_all_into(self, &mut |value| sink(value));
    }

    fn statistics(&self) -> String {
        GeneralizedSuffixTree::statistics(self)
    }
}
