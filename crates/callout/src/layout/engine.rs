//! Single-pass layout of a view tree.
//!
//! Each view receives a proposed size and answers with its actual size.
//! Containers place their children before they know their own size, then set
//! the children's parent-relative origins. Annotated views register their
//! anchor after their children, so a subtree's records arrive children first.

use log::{debug, info, trace};

use callout_core::{
    draw::{Text, TextDefinition},
    geometry::{Point, Size},
};

use super::{
    NodeId,
    tree::{LayoutTree, NodeDrawing, RegionAnchor},
};
use crate::{
    anchor::{AggregationPass, AnchorRecord, AnchorSet, BoundsRef},
    config::LegendConfig,
    legend::LegendLayout,
    resolve::Resolver,
    scene::{View, ViewKind},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Axis {
    Horizontal,
    Vertical,
}

impl Axis {
    fn main(self, size: Size) -> f32 {
        match self {
            Self::Horizontal => size.width(),
            Self::Vertical => size.height(),
        }
    }

    fn cross(self, size: Size) -> f32 {
        match self {
            Self::Horizontal => size.height(),
            Self::Vertical => size.width(),
        }
    }

    fn size(self, main: f32, cross: f32) -> Size {
        match self {
            Self::Horizontal => Size::new(main, cross),
            Self::Vertical => Size::new(cross, main),
        }
    }

    fn point(self, main: f32, cross: f32) -> Point {
        match self {
            Self::Horizontal => Point::new(main, cross),
            Self::Vertical => Point::new(cross, main),
        }
    }
}

/// Result of placing one view.
struct Placed {
    node: NodeId,
    size: Size,
    anchors: AnchorSet,
}

pub(super) struct Engine<'a> {
    tree: LayoutTree,
    legend: &'a LegendConfig,
    text: &'a TextDefinition,
}

impl<'a> Engine<'a> {
    pub(super) fn new(legend: &'a LegendConfig, text: &'a TextDefinition) -> Self {
        Self {
            tree: LayoutTree::default(),
            legend,
            text,
        }
    }

    pub(super) fn run(mut self, view: &View, proposal: Size) -> LayoutTree {
        let root = self.place(view, None, proposal);

        if !root.anchors.is_empty() {
            debug!(
                anchors = root.anchors.len();
                "Annotations outside of a legend root are not drawn"
            );
        }
        info!(
            nodes = self.tree.len(),
            legends = self.tree.legends().len(),
            width = root.size.width(),
            height = root.size.height();
            "Layout complete"
        );

        self.tree
    }

    fn measure_text(&self, content: &str) -> Size {
        Text::new(self.text, content).calculate_size()
    }

    fn place(&mut self, view: &View, parent: Option<NodeId>, proposal: Size) -> Placed {
        let node = self.tree.push(parent, NodeDrawing::None);

        let (size, mut anchors) = match view.kind() {
            ViewKind::Fill { color } => {
                self.tree.set_drawing(node, NodeDrawing::Fill(*color));
                (proposal, AnchorSet::new())
            }
            ViewKind::Stripes { width, color } => {
                self.tree.set_drawing(node, NodeDrawing::Stripes(*color));
                (proposal.with_width(*width), AnchorSet::new())
            }
            ViewKind::Text { content } => {
                let size = self.measure_text(content);
                self.tree
                    .set_drawing(node, NodeDrawing::Text(content.clone()));
                (size, AnchorSet::new())
            }
            ViewKind::HStack { spacing, children } => {
                self.place_stack(node, Axis::Horizontal, *spacing, children, proposal)
            }
            ViewKind::VStack { spacing, children } => {
                self.place_stack(node, Axis::Vertical, *spacing, children, proposal)
            }
            ViewKind::Frame {
                width,
                height,
                child,
            } => {
                let inner = Size::new(
                    width.unwrap_or(proposal.width()),
                    height.unwrap_or(proposal.height()),
                );
                let placed = self.place(child, Some(node), inner);
                let size = Size::new(
                    width.unwrap_or(placed.size.width()),
                    height.unwrap_or(placed.size.height()),
                );
                let origin = Point::new(
                    (size.width() - placed.size.width()) / 2.0,
                    (size.height() - placed.size.height()) / 2.0,
                );
                self.tree.set_origin(placed.node, origin);
                (size, placed.anchors)
            }
            ViewKind::Padding { insets, child } => {
                let placed = self.place(child, Some(node), proposal.sub_padding(*insets));
                self.tree
                    .set_origin(placed.node, Point::new(insets.left(), insets.top()));
                (placed.size.add_padding(*insets), placed.anchors)
            }
            ViewKind::Border {
                radius,
                stroke,
                child,
            } => {
                let placed = self.place(child, Some(node), proposal);
                self.tree.set_drawing(
                    node,
                    NodeDrawing::Border {
                        radius: *radius,
                        stroke: stroke.clone(),
                    },
                );
                (placed.size, placed.anchors)
            }
            ViewKind::Legend { child } => self.place_legend(node, child, proposal),
        };

        self.tree.set_size(node, size);

        if let Some(spec) = view.legend_spec() {
            trace!(node:?, index = spec.index().get(); "Registering anchor");
            anchors.register(
                AnchorRecord::new(BoundsRef::new(node), spec.label(), spec.index())
                    .with_y_inset(spec.y_inset()),
            );
            self.tree.set_anchor(
                node,
                RegionAnchor::new(spec.index(), view.highlight_stroke().cloned()),
            );
        }

        Placed {
            node,
            size,
            anchors,
        }
    }

    /// Distributes the main axis of `proposal` among `children`.
    ///
    /// Children with a fixed extent keep it. The rest share what remains
    /// after fixed extents and spacing, in equal parts. Children are centered
    /// on the cross axis.
    fn place_stack(
        &mut self,
        node: NodeId,
        axis: Axis,
        spacing: f32,
        children: &[View],
        proposal: Size,
    ) -> (Size, AnchorSet) {
        if children.is_empty() {
            return (Size::default(), AnchorSet::new());
        }

        let fixed: Vec<Option<f32>> = children
            .iter()
            .map(|child| self.fixed_extent(child, axis))
            .collect();
        let fixed_total: f32 = fixed.iter().flatten().sum();
        let flexible = fixed.iter().filter(|extent| extent.is_none()).count();
        let gaps = spacing * (children.len() - 1) as f32;
        let share = if flexible == 0 {
            0.0
        } else {
            (axis.main(proposal) - fixed_total - gaps).max(0.0) / flexible as f32
        };

        let cross_proposal = axis.cross(proposal);
        let placed: Vec<Placed> = children
            .iter()
            .zip(&fixed)
            .map(|(child, extent)| {
                let main = extent.unwrap_or(share);
                self.place(child, Some(node), axis.size(main, cross_proposal))
            })
            .collect();

        let cross = placed
            .iter()
            .map(|p| axis.cross(p.size))
            .fold(0.0, f32::max);

        let mut offset = 0.0;
        for p in &placed {
            let origin = axis.point(offset, (cross - axis.cross(p.size)) / 2.0);
            self.tree.set_origin(p.node, origin);
            offset += axis.main(p.size) + spacing;
        }
        let main = offset - spacing;

        let anchors = AnchorSet::aggregate(placed.into_iter().map(|p| p.anchors));
        (axis.size(main, cross), anchors)
    }

    /// Extent of `view` along `axis` that does not depend on the proposal.
    fn fixed_extent(&self, view: &View, axis: Axis) -> Option<f32> {
        match view.kind() {
            ViewKind::Fill { .. } => None,
            ViewKind::Stripes { width, .. } => match axis {
                Axis::Horizontal => Some(*width),
                Axis::Vertical => None,
            },
            ViewKind::Text { content } => Some(axis.main(self.measure_text(content))),
            ViewKind::HStack { spacing, children } => {
                self.stack_extent(Axis::Horizontal, *spacing, children, axis)
            }
            ViewKind::VStack { spacing, children } => {
                self.stack_extent(Axis::Vertical, *spacing, children, axis)
            }
            ViewKind::Frame {
                width,
                height,
                child,
            } => {
                let own = match axis {
                    Axis::Horizontal => *width,
                    Axis::Vertical => *height,
                };
                own.or_else(|| self.fixed_extent(child, axis))
            }
            ViewKind::Padding { insets, child } => {
                let padding = match axis {
                    Axis::Horizontal => insets.horizontal_sum(),
                    Axis::Vertical => insets.vertical_sum(),
                };
                self.fixed_extent(child, axis)
                    .map(|extent| extent + padding)
            }
            ViewKind::Border { child, .. } => self.fixed_extent(child, axis),
            ViewKind::Legend { child } => {
                let content = self.fixed_extent(child, axis)?;
                match axis {
                    Axis::Horizontal => Some(content),
                    Axis::Vertical => {
                        let layout = LegendLayout::new(self.legend, self.text);
                        Some(content + layout.block_height(child.forwarded_labels()))
                    }
                }
            }
        }
    }

    fn stack_extent(
        &self,
        stack_axis: Axis,
        spacing: f32,
        children: &[View],
        axis: Axis,
    ) -> Option<f32> {
        let extents: Option<Vec<f32>> = children
            .iter()
            .map(|child| self.fixed_extent(child, axis))
            .collect();
        let extents = extents?;

        if stack_axis == axis {
            let gaps = spacing * children.len().saturating_sub(1) as f32;
            Some(extents.iter().sum::<f32>() + gaps)
        } else {
            Some(extents.into_iter().fold(0.0, f32::max))
        }
    }

    /// Lays out the content at the origin, closes the aggregation pass and
    /// mounts one row per collected anchor below the content.
    ///
    /// The collected records stay here; the legend root forwards nothing.
    fn place_legend(&mut self, node: NodeId, child: &View, proposal: Size) -> (Size, AnchorSet) {
        let layout = LegendLayout::new(self.legend, self.text);
        let reserved = layout.block_height(child.forwarded_labels());
        let content_proposal = proposal.with_height((proposal.height() - reserved).max(0.0));

        let content = self.place(child, Some(node), content_proposal);

        let mut pass = AggregationPass::new();
        pass.contribute(content.anchors);
        let aggregated = pass.finish();

        let entries = Resolver::new()
            .with_spacing(self.legend.spacing())
            .resolve(&aggregated, &self.tree, node);
        let rows = layout.layout_rows(&entries, &self.tree, node, content.size.height());

        let mut size = content.size;
        for (bounds, row) in rows {
            let row_node = self.tree.push(Some(node), NodeDrawing::LegendRow(row));
            self.tree.set_origin(row_node, bounds.min_point());
            self.tree.set_size(row_node, bounds.to_size());
            size = size.max(Size::new(bounds.max_x(), bounds.max_y()));
        }

        debug!(node:?, entries = entries.len(); "Mounted legend");
        self.tree.add_legend(node, entries);

        (size, AnchorSet::new())
    }
}
