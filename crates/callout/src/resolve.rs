//! Horizontal placement of legend labels.
//!
//! The resolver turns a closed [`Aggregated`] collection into one x-position
//! per record. Labels read left to right in [`AnchorIndex`] order. Each label
//! is placed [`DEFAULT_SPACING`] units after its predecessor when that spot
//! still falls inside its own region's horizontal span. Otherwise it snaps
//! back to the center of that span.
//!
//! ```text
//!   region:   [  0  ]      [  1  ]            [   2   ]
//!   label x:     *  *                             *
//!                |  └ previous + spacing, inside region 1
//!                └ center of region 0               └ snapped to center
//! ```
//!
//! [`AnchorIndex`]: crate::anchor::AnchorIndex

use log::{debug, trace};

use callout_core::geometry::Bounds;

use crate::{
    anchor::{Aggregated, AnchorIndex, AnchorRecord, BoundsRef},
    layout::NodeId,
};

/// Preferred horizontal distance between consecutive legend labels.
pub const DEFAULT_SPACING: f32 = 20.0;

/// Source of finalized geometry for previously issued [`BoundsRef`]s.
pub trait GeometryProvider {
    /// Returns the rectangle behind `bounds`, expressed in the local
    /// coordinate space of the ancestor node `space`.
    ///
    /// # Panics
    ///
    /// Implementations may panic when `bounds` does not refer to a
    /// descendant of `space`. Such a handle should never outlive its
    /// aggregation pass.
    fn resolve(&self, bounds: BoundsRef, space: NodeId) -> Bounds;
}

/// A record paired with the x-position of its legend label.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedEntry {
    record: AnchorRecord,
    x: f32,
}

impl ResolvedEntry {
    pub fn record(&self) -> &AnchorRecord {
        &self.record
    }

    pub fn index(&self) -> AnchorIndex {
        self.record.index()
    }

    pub fn x(&self) -> f32 {
        self.x
    }
}

/// Computes label positions for spans already sorted in legend order.
///
/// The first label sits at the center of its span. Every following label
/// tries `previous + spacing` and falls back to its span's center when that
/// candidate leaves the span. Span edges count as inside.
///
/// # Examples
///
/// ```
/// # use callout::resolve::place_labels;
/// # use callout_core::geometry::{Bounds, Point, Size};
/// let spans: Vec<Bounds> = [10.0, 40.0, 80.0]
///     .iter()
///     .map(|&cx| Bounds::new_from_center(Point::new(cx, 0.0), Size::new(20.0, 10.0)))
///     .collect();
///
/// assert_eq!(place_labels(&spans, 20.0), vec![10.0, 30.0, 80.0]);
/// ```
pub fn place_labels(spans: &[Bounds], spacing: f32) -> Vec<f32> {
    let mut positions: Vec<f32> = Vec::with_capacity(spans.len());

    for span in spans {
        let x = match positions.last() {
            None => span.center_x(),
            Some(previous) => {
                let candidate = previous + spacing;
                if span.contains_x(candidate) {
                    candidate
                } else {
                    span.center_x()
                }
            }
        };
        positions.push(x);
    }

    positions
}

/// Resolves aggregated records into legend label positions.
#[derive(Debug, Clone, Copy)]
pub struct Resolver {
    spacing: f32,
}

impl Default for Resolver {
    fn default() -> Self {
        Self {
            spacing: DEFAULT_SPACING,
        }
    }
}

impl Resolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the preferred spacing between consecutive labels.
    pub fn with_spacing(mut self, spacing: f32) -> Self {
        self.spacing = spacing;
        self
    }

    pub fn spacing(&self) -> f32 {
        self.spacing
    }

    /// Sorts the records by index, resolves their bounds in `space` and
    /// places one label per record.
    ///
    /// The output has exactly one entry per input record. Running it again on
    /// the same collection and geometry yields identical positions.
    pub fn resolve(
        &self,
        aggregated: &Aggregated,
        geometry: &impl GeometryProvider,
        space: NodeId,
    ) -> Vec<ResolvedEntry> {
        if aggregated.is_empty() {
            trace!("No anchors to resolve");
            return Vec::new();
        }

        let mut sorted: Vec<&AnchorRecord> = aggregated.records().iter().collect();
        sorted.sort_by_key(|record| record.index());

        let spans: Vec<Bounds> = sorted
            .iter()
            .map(|record| geometry.resolve(record.bounds(), space))
            .collect();

        let positions = place_labels(&spans, self.spacing);

        debug!(anchors = sorted.len(), spacing = self.spacing; "Resolved legend positions");

        sorted
            .into_iter()
            .zip(positions)
            .map(|(record, x)| ResolvedEntry {
                record: record.clone(),
                x,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use float_cmp::assert_approx_eq;

    use callout_core::geometry::{Point, Size};

    use super::*;
    use crate::anchor::{AggregationPass, AnchorSet};

    /// Geometry backed by a plain map from node to root-local bounds.
    #[derive(Default)]
    struct FixedGeometry {
        rects: HashMap<NodeId, Bounds>,
    }

    impl GeometryProvider for FixedGeometry {
        fn resolve(&self, bounds: BoundsRef, _space: NodeId) -> Bounds {
            self.rects[&bounds.node()]
        }
    }

    fn span(center_x: f32, width: f32) -> Bounds {
        Bounds::new_from_center(Point::new(center_x, 50.0), Size::new(width, 40.0))
    }

    /// Builds geometry and records where record `i` has index `indices[i]`
    /// and the span `spans[i]`.
    fn fixture(spans: &[Bounds], indices: &[usize]) -> (FixedGeometry, Vec<AnchorRecord>) {
        let mut geometry = FixedGeometry::default();
        let mut records = Vec::new();
        for (node, (span, index)) in spans.iter().zip(indices).enumerate() {
            let node = NodeId::new(node + 1);
            geometry.rects.insert(node, *span);
            records.push(AnchorRecord::new(
                BoundsRef::new(node),
                format!("item {index}"),
                AnchorIndex::new(*index),
            ));
        }
        (geometry, records)
    }

    fn aggregate(records: Vec<AnchorRecord>) -> Aggregated {
        let mut pass = AggregationPass::new();
        pass.contribute(records.into_iter().collect::<AnchorSet>());
        pass.finish()
    }

    fn positions(entries: &[ResolvedEntry]) -> Vec<f32> {
        entries.iter().map(ResolvedEntry::x).collect()
    }

    #[test]
    fn test_five_regions_mixed_spacing_and_snapping() {
        let spans: Vec<_> = [10.0, 40.0, 80.0, 150.0, 300.0]
            .iter()
            .map(|&cx| span(cx, 20.0))
            .collect();
        let (geometry, records) = fixture(&spans, &[0, 1, 2, 3, 4]);

        let entries = Resolver::new().resolve(&aggregate(records), &geometry, NodeId::ROOT);

        assert_eq!(positions(&entries), vec![10.0, 30.0, 80.0, 150.0, 300.0]);
    }

    #[test]
    fn test_empty_collection_resolves_to_nothing() {
        let geometry = FixedGeometry::default();
        let entries = Resolver::new().resolve(&aggregate(Vec::new()), &geometry, NodeId::ROOT);
        assert!(entries.is_empty());
    }

    #[test]
    fn test_single_record_uses_center() {
        let (geometry, records) = fixture(&[span(123.0, 7.0)], &[9]);
        let entries = Resolver::new().resolve(&aggregate(records), &geometry, NodeId::ROOT);

        assert_eq!(entries.len(), 1);
        assert_approx_eq!(f32, entries[0].x(), 123.0);
        assert_eq!(entries[0].index(), AnchorIndex::new(9));
    }

    #[test]
    fn test_sorts_by_index_not_arrival() {
        let spans = [span(300.0, 20.0), span(10.0, 20.0), span(40.0, 20.0)];
        let (geometry, records) = fixture(&spans, &[2, 0, 1]);

        let entries = Resolver::new().resolve(&aggregate(records), &geometry, NodeId::ROOT);

        let order: Vec<_> = entries.iter().map(|e| e.index().get()).collect();
        assert_eq!(order, vec![0, 1, 2]);
        assert_eq!(positions(&entries), vec![10.0, 30.0, 300.0]);
    }

    #[test]
    fn test_zero_width_regions_snap_to_center() {
        let spans = [span(0.0, 0.0), span(20.0, 0.0), span(35.0, 0.0)];
        assert_eq!(place_labels(&spans, 20.0), vec![0.0, 20.0, 35.0]);
    }

    #[test]
    fn test_upper_boundary_is_inclusive() {
        // 10 + 20 lands exactly on the max edge of [0, 30] and is kept.
        let spans = [span(10.0, 20.0), span(15.0, 30.0), span(30.0, 20.0)];
        assert_eq!(place_labels(&spans, 20.0), vec![10.0, 30.0, 30.0]);
    }

    #[test]
    fn test_custom_spacing() {
        let spans = [span(50.0, 100.0), span(50.0, 100.0)];
        let resolver = Resolver::new().with_spacing(5.0);
        assert_eq!(place_labels(&spans, resolver.spacing()), vec![50.0, 55.0]);
    }

    mod properties {
        use proptest::prelude::*;

        use super::*;

        fn spans_strategy() -> impl Strategy<Value = Vec<Bounds>> {
            prop::collection::vec((-500.0f32..500.0, 0.0f32..120.0), 0..24).prop_map(|raw| {
                raw.into_iter()
                    .map(|(min_x, width)| {
                        Bounds::new_from_top_left(Point::new(min_x, 0.0), Size::new(width, 10.0))
                    })
                    .collect()
            })
        }

        proptest! {
            #[test]
            fn resolves_one_entry_per_record(spans in spans_strategy()) {
                let indices: Vec<usize> = (0..spans.len()).collect();
                let (geometry, records) = fixture(&spans, &indices);
                let entries = Resolver::new().resolve(&aggregate(records), &geometry, NodeId::ROOT);
                prop_assert_eq!(entries.len(), spans.len());
            }

            #[test]
            fn resolution_is_idempotent(spans in spans_strategy()) {
                let indices: Vec<usize> = (0..spans.len()).collect();
                let (geometry, records) = fixture(&spans, &indices);
                let aggregated = aggregate(records);

                let first = Resolver::new().resolve(&aggregated, &geometry, NodeId::ROOT);
                let second = Resolver::new().resolve(&aggregated, &geometry, NodeId::ROOT);

                let first_bits: Vec<u32> = first.iter().map(|e| e.x().to_bits()).collect();
                let second_bits: Vec<u32> = second.iter().map(|e| e.x().to_bits()).collect();
                prop_assert_eq!(first_bits, second_bits);
            }

            #[test]
            fn each_label_is_spaced_or_centered(spans in spans_strategy()) {
                let xs = place_labels(&spans, DEFAULT_SPACING);

                if let Some(first) = xs.first() {
                    prop_assert_eq!(*first, spans[0].center_x());
                }
                for i in 1..xs.len() {
                    let spaced = xs[i - 1] + DEFAULT_SPACING;
                    let accepted = xs[i] == spaced && spans[i].contains_x(spaced);
                    let centered = xs[i] == spans[i].center_x();
                    prop_assert!(accepted || centered, "label {} at {} is neither", i, xs[i]);
                }
            }

            #[test]
            fn registration_order_does_not_matter(
                (spans, permutation) in spans_strategy().prop_flat_map(|spans| {
                    let n = spans.len();
                    (Just(spans), Just((0..n).collect::<Vec<usize>>()).prop_shuffle())
                })
            ) {
                let indices: Vec<usize> = (0..spans.len()).collect();
                let (geometry, records) = fixture(&spans, &indices);

                let shuffled: Vec<AnchorRecord> =
                    permutation.iter().map(|&i| records[i].clone()).collect();

                let ordered = Resolver::new().resolve(&aggregate(records), &geometry, NodeId::ROOT);
                let reordered = Resolver::new().resolve(&aggregate(shuffled), &geometry, NodeId::ROOT);
                prop_assert_eq!(ordered, reordered);
            }
        }
    }
}
