//! A generalized suffix tree index over many keys.
//!
//! Unlike common suffix trees, which index one long string, a generalized
//! suffix tree builds an index over an arbitrary set of keys. Its two main
//! operations are insert and search: `insert(key, value)` adds the value
//! under the key, and `search(q)` retrieves every value whose key contains
//! `q` as a substring, in time proportional to the length of `q`.
//!
//! Construction is on-line, following Ukkonen's algorithm extended to
//! multiple keys; values attach to the nodes where suffixes end and flow
//! along suffix links so that search stays a plain descent. On top of the
//! tree, [`GeneralizedSuffixTree::common_substrings`] enumerates the
//! distinct substrings that several keys share.
//!
//! ```
//! use suffix_index::GeneralizedSuffixTree;
//!
//! let mut tree = GeneralizedSuffixTree::new();
//! tree.insert("apple tree", 0);
//! tree.insert("tree house", 1);
//!
//! assert_eq!(tree.search("tree"), [0, 1].into());
//! assert_eq!(tree.search("house"), [1].into());
//! assert!(tree.search("flat").is_empty());
//! ```

pub mod index;
pub mod node;
pub mod substring;
pub mod tree;

mod dot;
mod mining;
mod stats;

pub use index::SubstringIndex;
pub use mining::CommonSubstringsError;
pub use node::{Edge, EdgeMap, Node, NodeId, ValueBag};
pub use substring::{SubString, SubStringError};
pub use tree::GeneralizedSuffixTree;
