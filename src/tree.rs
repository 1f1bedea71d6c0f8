//! On-line construction and substring search for the generalized suffix tree.

use std::collections::HashSet;
use std::hash::Hash;
use std::rc::Rc;

use crate::node::{Edge, Node, NodeId, ROOT};
use crate::stats::SummaryStats;
use crate::substring::SubString;

/// A generalized suffix tree, built with Ukkonen's on-line algorithm
/// ("On-line construction of suffix trees", Ukkonen 1995) extended to index
/// an arbitrary number of independent keys.
///
/// The tree maps string keys to opaque values. After `insert(k, v)`,
/// `search(q)` returns a set containing `v` for every non-empty `q` that is
/// a substring of `k`, in time proportional to the length of `q` rather
/// than the size of the index.
///
/// The tree is a graph of nodes and labeled edges. Labels can have any
/// non-zero length; the one structural constraint is that no two edges
/// leaving the same node start with the same byte. A `(start node, byte
/// string)` pair therefore denotes at most one path, namely the sequence of
/// edges whose concatenated labels spell the byte string. Paths may also
/// stop partway along a final edge; such positions spell the tree's
/// implicit substrings and drive the case analysis in `test_and_split`.
///
/// Values live in node payload bags. When a suffix of an inserted key ends
/// at a node, the value is recorded there and then carried along the chain
/// of suffix links until a node that already has it is reached, so that
/// every node whose path is a substring of the key can reach the value by
/// descending. The root terminates every chain: it reports containing all
/// values and stores none, since search never reads it.
///
/// `insert` is the only mutating operation. The tree provides no interior
/// locking; concurrent readers are safe only while no insert is running.
pub struct GeneralizedSuffixTree<T> {
    /// Node arena; the root lives at index 0 and nodes are never removed.
    nodes: Vec<Node<T>>,
    /// The last leaf reached during the current insertion.
    active_leaf: NodeId,
}

impl<T: Clone + Eq + Hash> Default for GeneralizedSuffixTree<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone + Eq + Hash> GeneralizedSuffixTree<T> {
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::new()],
            active_leaf: ROOT,
        }
    }

    /// Adds `value` to the index under `key`.
    ///
    /// The key is copied into a shared backing string; every label created
    /// during this insertion is a window into that one allocation.
    pub fn insert(&mut self, key: &str, value: T) {
        self.active_leaf = ROOT;

        let whole = SubString::new(Rc::from(key));
        let nodes_before = self.nodes.len();

        let mut s = ROOT;
        let mut text = whole.sub(0, 0);
        for i in 0..key.len() {
            let rest = whole.sub(i, key.len());
            let (next_s, next_text) = self.update(s, text, whole.byte_at(i), &rest, &value);
            s = next_s;
            text = next_text;
        }

        // add the leaf's suffix link, if necessary
        let leaf = self.active_leaf;
        if leaf != ROOT && leaf != s && self.node(leaf).suffix().is_none() {
            self.node_mut(leaf).set_suffix(s);
        }

        log::trace!(
            "insert: key of {} bytes added {} nodes ({} total)",
            key.len(),
            self.nodes.len() - nodes_before,
            self.nodes.len()
        );
    }

    /// Streams every value whose key contains `query`.
    ///
    /// The sink is called once per stored value along the matched subtree;
    /// a value reachable through several nodes is reported each time, so
    /// collecting callers should deduplicate (as [`search`] does).
    ///
    /// [`search`]: GeneralizedSuffixTree::search
    pub fn search_into<F: FnMut(&T)>(&self, query: &str, sink: &mut F) {
        let mut current = ROOT;
        let mut word = query.as_bytes();

        while !word.is_empty() {
            // follow the edge corresponding to the next byte
            let Some(edge) = self.node(current).edge(word[0]) else {
                return;
            };

            let len_to_match = word.len().min(edge.label().len());
            if edge.label().as_bytes()[..len_to_match] != word[..len_to_match] {
                // the edge label diverges from the query
                return;
            }

            current = edge.dest();
            if len_to_match == word.len() {
                // the whole query is spelled; everything below matches
                self.read_values(current, sink);
                return;
            }

            word = &word[len_to_match..];
        }
    }

    /// The deduplicated set of values whose key contains `query`.
    pub fn search(&self, query: &str) -> HashSet<T> {
        let mut results = HashSet::new();
        self.search_into(query, &mut |value: &T| {
            results.insert(value.clone());
        });
        results
    }

    /// Streams every value stored anywhere in the index.
    pub fn read_all_into<F: FnMut(&T)>(&self, sink: &mut F) {
        self.read_values(ROOT, sink);
    }

    /// The deduplicated set of all stored values.
    pub fn read_all(&self) -> HashSet<T> {
        let mut results = HashSet::new();
        self.read_all_into(&mut |value: &T| {
            results.insert(value.clone());
        });
        results
    }

    /// Pushes the values of `id` and of every descendant into the sink. The
    /// path to a node is a substring of the paths to all of its children.
    fn read_values<F: FnMut(&T)>(&self, id: NodeId, sink: &mut F) {
        for value in self.node(id).values().iter() {
            sink(value);
        }
        for edge in self.node(id).edges().iter() {
            self.read_values(edge.dest(), sink);
        }
    }

    /// Human-readable structure statistics.
    pub fn statistics(&self) -> String {
        let mut value_counts = SummaryStats::new();
        let mut edge_counts = SummaryStats::new();
        let mut edge_lengths = SummaryStats::new();
        for node in &self.nodes {
            value_counts.record(node.values().len() as u64);
            edge_counts.record(node.edges().len() as u64);
            for edge in node.edges().iter() {
                edge_lengths.record(edge.label().len() as u64);
            }
        }
        format!(
            "GeneralizedSuffixTree: {} nodes\n\
             Node value counts: {value_counts}\n\
             Node edge counts: {edge_counts}\n\
             Edge label lengths: {edge_lengths}",
            self.nodes.len()
        )
    }

    /// Number of nodes in the arena, including the root.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn root(&self) -> NodeId {
        ROOT
    }

    /// The node behind `id`.
    ///
    /// # Panics
    ///
    /// Panics if `id` did not come from this tree.
    pub fn node(&self, id: NodeId) -> &Node<T> {
        &self.nodes[id.0]
    }

    fn node_mut(&mut self, id: NodeId) -> &mut Node<T> {
        &mut self.nodes[id.0]
    }

    fn new_node(&mut self) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node::new());
        id
    }

    /// Whether `id` holds `value`. The root absorbs everything: suffix-link
    /// chains all terminate there and search never reads it.
    fn contains_value(&self, id: NodeId, value: &T) -> bool {
        id == ROOT || self.node(id).values().contains(value)
    }

    fn add_value(&mut self, id: NodeId, value: T) {
        if id != ROOT {
            self.node_mut(id).values_mut().add(value);
        }
    }

    /// Records `value` at `id`, then carries it to every shorter suffix
    /// along the suffix-link chain until a node that already has the value
    /// is reached.
    fn add_ref(&mut self, id: NodeId, value: &T) {
        if self.contains_value(id, value) {
            return;
        }
        self.add_value(id, value.clone());

        let mut link = self.node(id).suffix();
        while let Some(current) = link {
            if self.contains_value(current, value) {
                break;
            }
            self.add_value(current, value.clone());
            link = self.node(current).suffix();
        }
    }

    /// Extends the tree with the byte `b` for every suffix of the key seen
    /// so far, following Ukkonen's `update` procedure.
    ///
    /// `text` is the canonical active string (the longest path string that
    /// can be walked from `s` over whole edges), `rest` the unprocessed
    /// tail of the key starting at `b`. Returns the canonical active point
    /// after the extension.
    fn update(
        &mut self,
        mut s: NodeId,
        text: SubString,
        b: u8,
        rest: &SubString,
        value: &T,
    ) -> (NodeId, SubString) {
        assert!(!rest.is_empty());
        assert_eq!(rest.byte_at(0), b);

        let mut k = text
            .extend(b)
            .expect("active text ends immediately before the byte being added");

        let mut old_root = ROOT;
        let (mut endpoint, mut r) = self.test_and_split(s, text, b, rest, value);

        while !endpoint {
            let leaf = match self.node(r).edge(b) {
                // A deeper node can already sit here: earlier keys may have
                // built this subtree, which never happens with a single
                // string in Ukkonen's setting.
                Some(existing) => existing.dest(),
                None => {
                    let leaf = self.new_node();
                    self.add_ref(leaf, value);
                    self.node_mut(r).add_edge(Edge::new(rest.clone(), leaf));
                    leaf
                }
            };

            // chain the previous leaf of this insertion to the new one
            if self.active_leaf != ROOT {
                let previous = self.active_leaf;
                self.node_mut(previous).set_suffix(leaf);
            }
            self.active_leaf = leaf;

            if old_root != ROOT {
                self.node_mut(old_root).set_suffix(r);
            }
            old_root = r;

            match self.node(s).suffix() {
                None => {
                    // Only the root has no suffix link; dropping the first
                    // byte stands in for the auxiliary state the paper
                    // writes as the transition from root over any byte.
                    debug_assert_eq!(s, ROOT);
                    k = k.sub(1, k.len());
                }
                Some(suffix) => {
                    let last = k.byte_at(k.len() - 1);
                    let (canon_node, canon_rest) = self.canonize(suffix, k.shorten(1));
                    s = canon_node;
                    k = canon_rest
                        .extend(last)
                        .expect("canonized remainder ends immediately before the dropped byte");
                }
            }

            let (next_endpoint, next_r) = self.test_and_split(s, k.shorten(1), b, rest, value);
            endpoint = next_endpoint;
            r = next_r;
        }

        if old_root != ROOT {
            self.node_mut(old_root).set_suffix(r);
        }

        // keep the returned active point canonical
        self.canonize(s, k)
    }

    /// Tests whether the path `search + b` already exists below `s`
    /// (Ukkonen's endpoint test), splitting an edge when the position where
    /// `b` must branch off lies in the middle of a label.
    ///
    /// Returns the endpoint flag and the node from which the new leaf edge
    /// has to hang when the flag is false. When the remaining suffix `rest`
    /// is found to end exactly at an existing node or to require a split,
    /// the value is recorded there, which is what kicks off propagation
    /// along the suffix links for suffixes that already exist in the tree.
    fn test_and_split(
        &mut self,
        s: NodeId,
        search: SubString,
        b: u8,
        rest: &SubString,
        value: &T,
    ) -> (bool, NodeId) {
        assert!(!rest.is_empty());
        assert_eq!(rest.byte_at(0), b);

        // descend as far as whole edge labels allow
        let (node, search) = self.canonize(s, search);

        if !search.is_empty() {
            // the position lies inside the label of this edge
            let g = self
                .node(node)
                .edge(search.byte_at(0))
                .cloned()
                .expect("a non-empty canonical remainder always lies on an edge");

            if g.label().len() > search.len() && g.label().byte_at(search.len()) == b {
                return (true, node);
            }
            let split = self.split_edge(node, &g, &search);
            return (false, split);
        }

        let Some(e) = self.node(node).edge(b).cloned() else {
            // no b-transition from the node
            return (false, node);
        };

        if e.label().starts_with(rest) {
            if e.label().len() == rest.len() {
                // the whole remaining suffix already ends at e's destination
                self.add_ref(e.dest(), value);
                return (true, node);
            }
            let split = self.split_edge(node, &e, rest);
            self.add_ref(split, value);
            return (false, node);
        }

        (true, node)
    }

    /// Splits `edge` after `first_part`, inserting a fresh node between the
    /// two halves, and returns that node.
    fn split_edge(&mut self, parent: NodeId, edge: &Edge, first_part: &SubString) -> NodeId {
        debug_assert!(self
            .node(parent)
            .edge(first_part.byte_at(0))
            .is_some_and(|e| e.dest() == edge.dest()));
        assert!(edge.label().starts_with(first_part));
        assert!(edge.label().len() > first_part.len());

        let second_part = edge.label().sub(first_part.len(), edge.label().len());
        let split = self.new_node();
        // the replacement edge keeps the first byte, so this rewires in place
        self.node_mut(parent).add_edge(Edge::new(first_part.clone(), split));
        self.node_mut(split)
            .add_edge(Edge::new(second_part, edge.dest()));
        split
    }

    /// Walks `input` down from `s` as long as whole edge labels are
    /// consumed, returning the deepest node reached and the remainder that
    /// must still be appended to that node's path to spell `input`.
    fn canonize(&self, s: NodeId, input: SubString) -> (NodeId, SubString) {
        let mut node = s;
        let mut remainder = input;

        loop {
            if remainder.is_empty() {
                break;
            }
            let Some(next) = self.node(node).edge(remainder.byte_at(0)) else {
                break;
            };
            if !remainder.starts_with(next.label()) {
                break;
            }
            let consumed = next.label().len();
            let dest = next.dest();
            remainder = remainder.sub(consumed, remainder.len());
            node = dest;
        }

        (node, remainder)
    }
}
