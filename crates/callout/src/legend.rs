//! Legend rows below a legend root's content.
//!
//! Rows are stacked top to bottom in reverse index order, so the entry with
//! the highest index sits closest to the diagram. Each row is shifted right
//! to its resolved x-position and consists of a small marker, the label to
//! its right, and a vertical connector running from the marker up to the
//! annotated region:
//!
//! ```text
//!   +------------------+
//!   |  region          |
//!   +--|---------------+   <- anchor bottom, minus y_inset
//!      |
//!      o Label             <- marker centered on the resolved x
//! ```

use callout_core::{
    draw::{Text, TextDefinition},
    geometry::{Bounds, Point, Size},
};

use crate::{
    anchor::AnchorIndex,
    config::LegendConfig,
    layout::NodeId,
    resolve::{GeometryProvider, ResolvedEntry},
};

/// One laid-out legend row. Coordinates are local to the row.
#[derive(Debug, Clone, PartialEq)]
pub struct LegendRow {
    index: AnchorIndex,
    label: String,
    label_size: Size,
    marker_radius: f32,
    label_gap: f32,
    connector_length: f32,
}

impl LegendRow {
    pub fn index(&self) -> AnchorIndex {
        self.index
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn marker_radius(&self) -> f32 {
        self.marker_radius
    }

    /// Length of the connector above the marker center.
    pub fn connector_length(&self) -> f32 {
        self.connector_length
    }

    pub fn size(&self) -> Size {
        row_size(self.label_size, self.marker_radius, self.label_gap)
    }

    pub fn marker_center(&self) -> Point {
        Point::new(self.marker_radius, self.size().height() / 2.0)
    }

    pub fn label_center(&self) -> Point {
        let x = self.marker_radius * 2.0 + self.label_gap + self.label_size.width() / 2.0;
        Point::new(x, self.size().height() / 2.0)
    }

    /// Upper end of the connector. The lower end is the marker center.
    pub fn connector_top(&self) -> Point {
        self.marker_center()
            .sub_point(Point::new(0.0, self.connector_length))
    }
}

fn row_size(label_size: Size, marker_radius: f32, label_gap: f32) -> Size {
    let diameter = marker_radius * 2.0;
    Size::new(
        diameter + label_gap + label_size.width(),
        diameter.max(label_size.height()),
    )
}

/// Lays out legend rows from resolved entries.
#[derive(Debug, Clone, Copy)]
pub struct LegendLayout<'a> {
    config: &'a LegendConfig,
    text: &'a TextDefinition,
}

impl<'a> LegendLayout<'a> {
    pub fn new(config: &'a LegendConfig, text: &'a TextDefinition) -> Self {
        Self { config, text }
    }

    fn measure(&self, label: &str) -> Size {
        Text::new(self.text, label).calculate_size()
    }

    /// Height the rows for `labels` will take, including the gap above them.
    ///
    /// Zero when there are no labels.
    pub fn block_height<'l>(&self, labels: impl IntoIterator<Item = &'l str>) -> f32 {
        let heights: Vec<f32> = labels
            .into_iter()
            .map(|label| {
                row_size(
                    self.measure(label),
                    self.config.marker_radius(),
                    self.config.label_gap(),
                )
                .height()
            })
            .collect();

        if heights.is_empty() {
            return 0.0;
        }
        let gaps = (heights.len() - 1) as f32 * self.config.row_spacing();
        self.config.legend_gap() + heights.iter().sum::<f32>() + gaps
    }

    /// Lays out one row per entry, starting `legend_gap` below `content_bottom`.
    ///
    /// Entries must be sorted by index, as returned by the resolver. Row
    /// bounds and connector lengths are computed in the coordinate space of
    /// `space`, the legend root.
    pub fn layout_rows(
        &self,
        entries: &[ResolvedEntry],
        geometry: &impl GeometryProvider,
        space: NodeId,
        content_bottom: f32,
    ) -> Vec<(Bounds, LegendRow)> {
        let marker_radius = self.config.marker_radius();
        let label_gap = self.config.label_gap();

        let mut rows = Vec::with_capacity(entries.len());
        let mut top = content_bottom + self.config.legend_gap();

        for entry in entries.iter().rev() {
            let record = entry.record();
            let label_size = self.measure(record.label());
            let size = row_size(label_size, marker_radius, label_gap);

            let row_center_y = top + size.height() / 2.0;
            let anchor = geometry.resolve(record.bounds(), space);
            let connector_length = row_center_y - anchor.max_y() + record.y_inset();

            let bounds =
                Bounds::new_from_top_left(Point::new(entry.x() - marker_radius, top), size);
            rows.push((
                bounds,
                LegendRow {
                    index: record.index(),
                    label: record.label().to_string(),
                    label_size,
                    marker_radius,
                    label_gap,
                    connector_length,
                },
            ));

            top += size.height() + self.config.row_spacing();
        }

        rows
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use float_cmp::assert_approx_eq;

    use super::*;
    use crate::{
        anchor::{AggregationPass, AnchorRecord, AnchorSet, BoundsRef},
        resolve::Resolver,
    };

    struct FixedGeometry(HashMap<NodeId, Bounds>);

    impl GeometryProvider for FixedGeometry {
        fn resolve(&self, bounds: BoundsRef, _space: NodeId) -> Bounds {
            self.0[&bounds.node()]
        }
    }

    fn entries(specs: &[(f32, f32, &str, usize)]) -> (FixedGeometry, Vec<ResolvedEntry>) {
        let mut rects = HashMap::new();
        let mut pass = AggregationPass::new();
        let mut set = AnchorSet::new();
        for (node, &(center_x, y_inset, label, index)) in specs.iter().enumerate() {
            let node = NodeId::new(node + 1);
            rects.insert(
                node,
                Bounds::new_from_top_left(Point::new(center_x - 10.0, 0.0), Size::new(20.0, 80.0)),
            );
            set.register(
                AnchorRecord::new(BoundsRef::new(node), label, AnchorIndex::new(index))
                    .with_y_inset(y_inset),
            );
        }
        pass.contribute(set);

        let geometry = FixedGeometry(rects);
        let resolved = Resolver::new().resolve(&pass.finish(), &geometry, NodeId::ROOT);
        (geometry, resolved)
    }

    #[test]
    fn test_rows_are_reversed() {
        let config = LegendConfig::default();
        let text = TextDefinition::new();
        let (geometry, resolved) = entries(&[(10.0, 0.0, "a", 0), (40.0, 0.0, "b", 1)]);

        let rows = LegendLayout::new(&config, &text).layout_rows(&resolved, &geometry, NodeId::ROOT, 80.0);

        let order: Vec<_> = rows.iter().map(|(_, row)| row.index().get()).collect();
        assert_eq!(order, vec![1, 0]);
        assert!(rows[0].0.min_y() < rows[1].0.min_y());
        assert_approx_eq!(f32, rows[0].0.min_y(), 80.0 + config.legend_gap());
    }

    #[test]
    fn test_marker_sits_on_resolved_x() {
        let config = LegendConfig::default();
        let text = TextDefinition::new();
        let (geometry, resolved) = entries(&[(10.0, 0.0, "a", 0), (40.0, 0.0, "b", 1)]);

        let rows = LegendLayout::new(&config, &text).layout_rows(&resolved, &geometry, NodeId::ROOT, 80.0);

        for (bounds, row) in &rows {
            let x = resolved[row.index().get()].x();
            let marker = row.marker_center().add_point(bounds.min_point());
            assert_approx_eq!(f32, marker.x(), x);
        }
    }

    #[test]
    fn test_connector_reaches_anchor_bottom_minus_inset() {
        let config = LegendConfig::default();
        let text = TextDefinition::new();
        let (geometry, resolved) = entries(&[(10.0, 10.0, "Blue Rectangle", 0), (40.0, 0.0, "HStack", 2)]);

        let rows = LegendLayout::new(&config, &text).layout_rows(&resolved, &geometry, NodeId::ROOT, 80.0);

        for (bounds, row) in &rows {
            let record = resolved
                .iter()
                .find(|entry| entry.index() == row.index())
                .unwrap()
                .record();
            let top = row.connector_top().add_point(bounds.min_point());
            // Anchor bottom is at y = 80 for every fixture region
            assert_approx_eq!(f32, top.y(), 80.0 - record.y_inset(), epsilon = 0.001);
            assert_approx_eq!(
                f32,
                row.connector_length(),
                bounds.center_y() - 80.0 + record.y_inset(),
                epsilon = 0.001
            );
        }
    }

    #[test]
    fn test_block_height_matches_rows() {
        let config = LegendConfig::default();
        let text = TextDefinition::new();
        let layout = LegendLayout::new(&config, &text);
        let (geometry, resolved) = entries(&[(10.0, 0.0, "one", 0), (40.0, 0.0, "two", 1)]);

        let rows = layout.layout_rows(&resolved, &geometry, NodeId::ROOT, 0.0);
        let bottom = rows.iter().map(|(b, _)| b.max_y()).fold(0.0, f32::max);

        assert_approx_eq!(f32, layout.block_height(["one", "two"]), bottom, epsilon = 0.001);
        assert_approx_eq!(f32, layout.block_height([]), 0.0);
    }

    #[test]
    fn test_empty_entries_give_no_rows() {
        let config = LegendConfig::default();
        let text = TextDefinition::new();
        let geometry = FixedGeometry(HashMap::new());

        let rows = LegendLayout::new(&config, &text).layout_rows(&[], &geometry, NodeId::ROOT, 10.0);
        assert!(rows.is_empty());
    }
}
