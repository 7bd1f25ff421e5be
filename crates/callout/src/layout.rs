//! Host layout: turns a [`View`](crate::scene::View) tree into positioned
//! nodes.
//!
//! The layout pass visits every view once with a proposed size. Nodes store
//! their origin relative to their parent, so a node's final position in any
//! ancestor's space is known as soon as that ancestor has placed its
//! children. Legend roots rely on this: once their content is placed they
//! resolve the anchors collected below them and mount the legend rows.

mod engine;
mod tree;

pub use tree::{LayoutNode, LayoutTree, LegendBlock, NodeDrawing, RegionAnchor};

/// Identifier of a node in a [`LayoutTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    /// The root node of every tree.
    pub const ROOT: NodeId = NodeId(0);

    pub(crate) fn new(index: usize) -> Self {
        Self(index)
    }

    fn get(self) -> usize {
        self.0
    }
}
