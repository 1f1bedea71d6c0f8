//! Graphviz export for debugging the tree structure.
//!
//! Render the output with `dot -Tpng -O <file>.dot`.

use std::fmt;
use std::hash::Hash;
use std::io::{self, Write};

use crate::node::NodeId;
use crate::tree::GeneralizedSuffixTree;

impl<T: Clone + Eq + Hash + fmt::Debug> GeneralizedSuffixTree<T> {
    /// Writes the tree as a Graphviz digraph. Suffix links are rendered as
    /// dotted arrows when `include_suffix_links` is set.
    pub fn write_dot<W: Write>(&self, out: &mut W, include_suffix_links: bool) -> io::Result<()> {
        writeln!(out, "digraph {{")?;
        writeln!(out, "\trankdir = LR;")?;
        writeln!(out, "\tordering = out;")?;
        writeln!(out, "\tedge [arrowsize=0.4,fontsize=10]")?;
        writeln!(
            out,
            "\t{} [label=\"\",style=filled,fillcolor=lightgrey,shape=circle,width=.1,height=.1];",
            node_name(self.root())
        )?;

        writeln!(out, "//------leaves------")?;
        for id in self.node_ids() {
            let node = self.node(id);
            if id != self.root() && node.edges().is_empty() {
                writeln!(
                    out,
                    "\t{} [label=\"{:?}\",style=filled,fillcolor=lightgrey,shape=circle,width=.07,height=.07]",
                    node_name(id),
                    node.values().iter().collect::<Vec<_>>()
                )?;
            }
        }

        writeln!(out, "//------internal nodes------")?;
        for id in self.node_ids() {
            let node = self.node(id);
            if id != self.root() && !node.edges().is_empty() {
                writeln!(
                    out,
                    "\t{} [label=\"{:?}\",style=filled,fillcolor=lightgrey,shape=circle,width=.07,height=.07]",
                    node_name(id),
                    node.values().iter().collect::<Vec<_>>()
                )?;
            }
        }

        writeln!(out, "//------edges------")?;
        for id in self.node_ids() {
            for edge in self.node(id).edges().iter() {
                writeln!(
                    out,
                    "\t{} -> {} [label=\"{}\",weight=10]",
                    node_name(id),
                    node_name(edge.dest()),
                    edge.label()
                )?;
            }
        }

        if include_suffix_links {
            writeln!(out, "//------suffix links------")?;
            for id in self.node_ids() {
                if let Some(suffix) = self.node(id).suffix() {
                    writeln!(
                        out,
                        "\t{} -> {} [label=\"\",weight=0,style=dotted]",
                        node_name(id),
                        node_name(suffix)
                    )?;
                }
            }
        }

        writeln!(out, "}}")
    }

    fn node_ids(&self) -> impl Iterator<Item = NodeId> {
        (0..self.node_count()).map(NodeId)
    }
}

fn node_name(id: NodeId) -> String {
    format!("node{}", id.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_a_digraph() {
        let mut tree = GeneralizedSuffixTree::new();
        tree.insert("cacao", 0);
        tree.insert("cab", 1);

        let mut out = Vec::new();
        tree.write_dot(&mut out, true).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.starts_with("digraph {"));
        assert!(text.trim_end().ends_with('}'));
        assert!(text.contains("//------leaves------"));
        assert!(text.contains("//------suffix links------"));
        assert!(text.contains("node0 -> "));
        assert!(text.contains("weight=10"));
    }

    #[test]
    fn suffix_links_can_be_left_out() {
        let mut tree = GeneralizedSuffixTree::new();
        tree.insert("banana", 0);

        let mut out = Vec::new();
        tree.write_dot(&mut out, false).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(!text.contains("suffix links"));
        assert!(!text.contains("style=dotted"));
    }
}
