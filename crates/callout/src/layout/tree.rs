use std::collections::BTreeSet;

use callout_core::{
    color::Color,
    draw::{StrokeDefinition, TextDefinition},
    geometry::{Bounds, Point, Size},
};

use super::{NodeId, engine::Engine};
use crate::{
    anchor::{AnchorIndex, BoundsRef},
    config::LegendConfig,
    highlight::Participant,
    legend::LegendRow,
    resolve::{GeometryProvider, ResolvedEntry},
    scene::View,
};

/// What a node paints.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeDrawing {
    /// Pure container
    None,
    /// Solid rectangle
    Fill(Color),
    /// Diagonal stripes inside a thin border of the same color
    Stripes(Color),
    /// Centered text
    Text(String),
    /// Rounded stroke along the node's bounds
    Border {
        radius: f32,
        stroke: StrokeDefinition,
    },
    /// A legend row mounted by a legend root
    LegendRow(LegendRow),
}

/// Legend annotation attached to a laid-out region.
#[derive(Debug, Clone, PartialEq)]
pub struct RegionAnchor {
    index: AnchorIndex,
    highlight: Option<StrokeDefinition>,
}

impl RegionAnchor {
    pub(crate) fn new(index: AnchorIndex, highlight: Option<StrokeDefinition>) -> Self {
        Self { index, highlight }
    }

    pub fn index(&self) -> AnchorIndex {
        self.index
    }

    /// Stroke drawn around the region while it is highlighted.
    pub fn highlight(&self) -> Option<&StrokeDefinition> {
        self.highlight.as_ref()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LayoutNode {
    parent: Option<NodeId>,
    /// Top-left corner in the parent's space
    origin: Point,
    size: Size,
    drawing: NodeDrawing,
    anchor: Option<RegionAnchor>,
}

impl LayoutNode {
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn origin(&self) -> Point {
        self.origin
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn drawing(&self) -> &NodeDrawing {
        &self.drawing
    }

    pub fn anchor(&self) -> Option<&RegionAnchor> {
        self.anchor.as_ref()
    }
}

/// Resolved entries of one legend root, kept for inspection.
#[derive(Debug, Clone, PartialEq)]
pub struct LegendBlock {
    root: NodeId,
    entries: Vec<ResolvedEntry>,
}

impl LegendBlock {
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Entries in index order.
    pub fn entries(&self) -> &[ResolvedEntry] {
        &self.entries
    }
}

/// Arena of laid-out nodes. The first node is the root.
#[derive(Debug, Clone, Default)]
pub struct LayoutTree {
    nodes: Vec<LayoutNode>,
    legends: Vec<LegendBlock>,
}

impl LayoutTree {
    /// Lays out `view` for the proposed size.
    pub fn build(view: &View, proposal: Size, legend: &LegendConfig, text: &TextDefinition) -> Self {
        Engine::new(legend, text).run(view, proposal)
    }

    pub(super) fn push(&mut self, parent: Option<NodeId>, drawing: NodeDrawing) -> NodeId {
        let id = NodeId::new(self.nodes.len());
        self.nodes.push(LayoutNode {
            parent,
            origin: Point::default(),
            size: Size::default(),
            drawing,
            anchor: None,
        });
        id
    }

    fn node_mut(&mut self, id: NodeId) -> &mut LayoutNode {
        let len = self.nodes.len();
        self.nodes
            .get_mut(id.get())
            .unwrap_or_else(|| panic!("Dangling node {id:?} in a tree of {len} nodes"))
    }

    pub(super) fn set_origin(&mut self, id: NodeId, origin: Point) {
        self.node_mut(id).origin = origin;
    }

    pub(super) fn set_size(&mut self, id: NodeId, size: Size) {
        self.node_mut(id).size = size;
    }

    pub(super) fn set_drawing(&mut self, id: NodeId, drawing: NodeDrawing) {
        self.node_mut(id).drawing = drawing;
    }

    pub(super) fn set_anchor(&mut self, id: NodeId, anchor: RegionAnchor) {
        self.node_mut(id).anchor = Some(anchor);
    }

    pub(super) fn add_legend(&mut self, root: NodeId, entries: Vec<ResolvedEntry>) {
        self.legends.push(LegendBlock { root, entries });
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, id: NodeId) -> Option<&LayoutNode> {
        self.nodes.get(id.get())
    }

    fn expect_node(&self, id: NodeId) -> &LayoutNode {
        self.node(id).unwrap_or_else(|| {
            panic!(
                "Dangling node {id:?} in a tree of {} nodes",
                self.nodes.len()
            )
        })
    }

    /// Nodes in creation order. Parents always come before their children.
    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &LayoutNode)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(i, node)| (NodeId::new(i), node))
    }

    /// Size of the root node.
    pub fn size(&self) -> Size {
        self.nodes.first().map(LayoutNode::size).unwrap_or_default()
    }

    /// Bounds of `id` in the local space of its ancestor `space`.
    ///
    /// # Panics
    ///
    /// Panics if `id` is not part of the tree or `space` is not `id` or one
    /// of its ancestors.
    pub fn bounds_in(&self, id: NodeId, space: NodeId) -> Bounds {
        let mut bounds = Bounds::new_from_top_left(Point::default(), self.expect_node(id).size);
        let mut current = id;

        while current != space {
            let node = self.expect_node(current);
            bounds = bounds.translate(node.origin);
            current = node
                .parent
                .unwrap_or_else(|| panic!("Node {id:?} is not a descendant of {space:?}"));
        }

        bounds
    }

    /// Bounds of `id` in root space.
    pub fn absolute_bounds(&self, id: NodeId) -> Bounds {
        self.bounds_in(id, NodeId::ROOT)
    }

    /// Number of ancestors of `id`.
    pub fn depth(&self, id: NodeId) -> usize {
        std::iter::successors(self.expect_node(id).parent, |&parent| {
            self.expect_node(parent).parent
        })
        .count()
    }

    pub fn legends(&self) -> &[LegendBlock] {
        &self.legends
    }

    /// Mounted legend rows with their node ids, top to bottom per legend.
    pub fn legend_rows(&self) -> impl Iterator<Item = (NodeId, &LegendRow)> {
        self.nodes().filter_map(|(id, node)| match &node.drawing {
            NodeDrawing::LegendRow(row) => Some((id, row)),
            _ => None,
        })
    }

    /// Every index that appears on an annotated region or a legend row.
    pub fn participants(&self) -> BTreeSet<AnchorIndex> {
        let regions = self
            .nodes
            .iter()
            .filter_map(|node| node.anchor.as_ref().map(RegionAnchor::index));
        let rows = self.legend_rows().map(|(_, row)| row.index());
        regions.chain(rows).collect()
    }

    /// Finds the participant under `point`, given in root space.
    ///
    /// Legend rows take precedence. Among annotated regions the innermost
    /// one wins.
    pub fn hit_test(&self, point: Point) -> Option<Participant> {
        let row = self
            .legend_rows()
            .find(|(id, _)| self.absolute_bounds(*id).contains(point))
            .map(|(_, row)| Participant::LegendRow(row.index()));
        if row.is_some() {
            return row;
        }

        self.nodes()
            .filter_map(|(id, node)| node.anchor.as_ref().map(|anchor| (id, anchor)))
            .filter(|(id, _)| self.absolute_bounds(*id).contains(point))
            .max_by_key(|(id, _)| self.depth(*id))
            .map(|(_, anchor)| Participant::Region(anchor.index()))
    }
}

impl GeometryProvider for LayoutTree {
    fn resolve(&self, bounds: BoundsRef, space: NodeId) -> Bounds {
        self.bounds_in(bounds.node(), space)
    }
}
