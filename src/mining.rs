//! Enumeration of substrings shared by several keys.

use std::collections::HashSet;
use std::hash::Hash;

use crate::node::NodeId;
use crate::tree::GeneralizedSuffixTree;

/// Argument errors for [`GeneralizedSuffixTree::common_substrings`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CommonSubstringsError {
    #[error("min_length must be greater than 0")]
    NonPositiveMinLength,
    #[error("min_keys must be greater than 0")]
    NonPositiveMinKeys,
}

impl<T: Clone + Eq + Hash> GeneralizedSuffixTree<T> {
    /// Finds every distinct substring of at least `min_length` bytes that
    /// occurs in at least `min_keys` different keys, and hands each one to
    /// the visitor together with the deduplicated set of values whose keys
    /// contain it. No ordering is guaranteed.
    ///
    /// Labels are reported as raw bytes: edge splits land on arbitrary byte
    /// offsets, so a path label need not end on a character boundary even
    /// when every key is valid UTF-8.
    ///
    /// Each label is reported at most once. With no two sibling edges
    /// sharing a first byte the traversal cannot reach the same label
    /// twice, so the dedup set is purely defensive; it stays because the
    /// visitor contract promises distinct labels.
    pub fn common_substrings<F>(
        &self,
        min_length: usize,
        min_keys: usize,
        visitor: F,
    ) -> Result<(), CommonSubstringsError>
    where
        F: FnMut(&[u8], &HashSet<T>),
    {
        if min_length == 0 {
            return Err(CommonSubstringsError::NonPositiveMinLength);
        }
        if min_keys == 0 {
            return Err(CommonSubstringsError::NonPositiveMinKeys);
        }

        let mut walk = Walk {
            tree: self,
            min_length,
            min_keys,
            seen: HashSet::new(),
            emitted: 0,
            visitor,
        };
        walk.dfs(self.root(), &mut Vec::new());

        log::debug!(
            "common_substrings(min_length={min_length}, min_keys={min_keys}): {} labels emitted",
            walk.emitted
        );
        Ok(())
    }
}

/// Depth-first traversal state for the miner.
struct Walk<'a, T, F> {
    tree: &'a GeneralizedSuffixTree<T>,
    min_length: usize,
    min_keys: usize,
    seen: HashSet<Vec<u8>>,
    emitted: usize,
    visitor: F,
}

impl<T: Clone + Eq + Hash, F: FnMut(&[u8], &HashSet<T>)> Walk<'_, T, F> {
    fn dfs(&mut self, node: NodeId, path: &mut Vec<u8>) {
        let keys = self.collect_keys(node);

        if keys.len() >= self.min_keys && path.len() >= self.min_length {
            if self.seen.insert(path.clone()) {
                self.emitted += 1;
                (self.visitor)(path, &keys);
            }
        }

        let tree = self.tree;
        for edge in tree.node(node).edges().iter() {
            let len_before = path.len();
            path.extend_from_slice(edge.label().as_bytes());
            self.dfs(edge.dest(), path);
            path.truncate(len_before);
        }
    }

    /// The set of values reachable from `node`.
    fn collect_keys(&self, node: NodeId) -> HashSet<T> {
        let mut acc: HashSet<T> = self.tree.node(node).values().iter().cloned().collect();
        for edge in self.tree.node(node).edges().iter() {
            acc.extend(self.collect_keys(edge.dest()));
        }
        acc
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_non_positive_arguments() {
        let mut tree = GeneralizedSuffixTree::new();
        tree.insert("ab", 0);
        assert_eq!(
            tree.common_substrings(0, 1, |_, _: &HashSet<i32>| {}),
            Err(CommonSubstringsError::NonPositiveMinLength)
        );
        assert_eq!(
            tree.common_substrings(1, 0, |_, _: &HashSet<i32>| {}),
            Err(CommonSubstringsError::NonPositiveMinKeys)
        );
    }

    #[test]
    fn reports_shared_substrings_once() {
        let mut tree = GeneralizedSuffixTree::new();
        tree.insert("banana", 0);
        tree.insert("bandana", 1);

        let mut found = Vec::new();
        tree.common_substrings(3, 2, |label, keys| {
            found.push((label.to_vec(), keys.clone()));
        })
        .unwrap();

        let labels: HashSet<Vec<u8>> = found.iter().map(|(l, _)| l.clone()).collect();
        assert_eq!(labels.len(), found.len(), "labels are distinct");
        // the two keys diverge after "ban" and after "ana", so both are nodes
        assert!(labels.contains(&b"ana".to_vec()));
        assert!(labels.contains(&b"ban".to_vec()));
        for (label, keys) in &found {
            assert!(label.len() >= 3);
            assert_eq!(keys.len(), 2, "every reported substring occurs in both keys");
            let label = std::str::from_utf8(label).unwrap();
            assert!("banana".contains(label));
            assert!("bandana".contains(label));
        }
    }

    #[test]
    fn short_and_rare_substrings_are_skipped() {
        let mut tree = GeneralizedSuffixTree::new();
        tree.insert("abcdef", 0);
        tree.insert("xyz", 1);

        let mut count = 0;
        tree.common_substrings(1, 2, |_, _| count += 1).unwrap();
        assert_eq!(count, 0);
    }
}
