//! Anchor records and their order-independent aggregation.
//!
//! An annotated region declares an [`AnchorRecord`] while the layout pass
//! visits it. The record holds no geometry, only a [`BoundsRef`] handle that
//! is resolved once the legend root's geometry is final.
//!
//! Records bubble up the tree as [`AnchorSet`]s: each subtree contributes its
//! set and parents concatenate them. Concatenation order follows the host
//! layout's traversal and carries no meaning; consumers sort by
//! [`AnchorIndex`].
//!
//! The legend root closes the pass with [`AggregationPass::finish`]. Only the
//! resulting [`Aggregated`] collection is accepted by the resolver, so a
//! partially collected set can never be resolved.

use std::fmt;

use serde::Deserialize;

use crate::layout::NodeId;

/// Stable identity and left-to-right order of a legend entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
#[serde(transparent)]
pub struct AnchorIndex(usize);

impl AnchorIndex {
    pub fn new(index: usize) -> Self {
        Self(index)
    }

    pub fn get(self) -> usize {
        self.0
    }
}

impl From<usize> for AnchorIndex {
    fn from(index: usize) -> Self {
        Self(index)
    }
}

impl fmt::Display for AnchorIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Opaque handle to the bounds of a laid-out region.
///
/// Resolve it through a [`GeometryProvider`](crate::resolve::GeometryProvider)
/// in the coordinate space of an ancestor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BoundsRef(NodeId);

impl BoundsRef {
    pub(crate) fn new(node: NodeId) -> Self {
        Self(node)
    }

    pub(crate) fn node(self) -> NodeId {
        self.0
    }
}

/// One annotation request: "label this region".
#[derive(Debug, Clone, PartialEq)]
pub struct AnchorRecord {
    bounds: BoundsRef,
    y_inset: f32,
    label: String,
    index: AnchorIndex,
}

impl AnchorRecord {
    pub fn new(bounds: BoundsRef, label: impl Into<String>, index: AnchorIndex) -> Self {
        Self {
            bounds,
            y_inset: 0.0,
            label: label.into(),
            index,
        }
    }

    /// Moves the connector attachment point `y_inset` units up into the region.
    pub fn with_y_inset(mut self, y_inset: f32) -> Self {
        self.y_inset = y_inset;
        self
    }

    pub fn bounds(&self) -> BoundsRef {
        self.bounds
    }

    pub fn y_inset(&self) -> f32 {
        self.y_inset
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn index(&self) -> AnchorIndex {
        self.index
    }
}

/// Records contributed by one subtree during a layout pass.
///
/// Duplicate indices are a caller error and are not detected.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnchorSet {
    records: Vec<AnchorRecord>,
}

impl AnchorSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one record.
    pub fn register(&mut self, record: AnchorRecord) {
        self.records.push(record);
    }

    /// Concatenates `other` after `self`.
    pub fn merge(mut self, other: AnchorSet) -> Self {
        self.records.extend(other.records);
        self
    }

    /// Concatenates the sets of several subtrees.
    ///
    /// # Examples
    ///
    /// ```
    /// # use callout::anchor::AnchorSet;
    /// let merged = AnchorSet::aggregate([AnchorSet::new(), AnchorSet::new()]);
    /// assert!(merged.is_empty());
    /// ```
    pub fn aggregate(sets: impl IntoIterator<Item = AnchorSet>) -> Self {
        sets.into_iter().fold(Self::new(), Self::merge)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &AnchorRecord> {
        self.records.iter()
    }
}

impl FromIterator<AnchorRecord> for AnchorSet {
    fn from_iter<T: IntoIterator<Item = AnchorRecord>>(iter: T) -> Self {
        Self {
            records: iter.into_iter().collect(),
        }
    }
}

/// An open aggregation pass at a legend root.
#[derive(Debug, Default)]
pub struct AggregationPass {
    pending: AnchorSet,
}

impl AggregationPass {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a subtree's records to the pass.
    pub fn contribute(&mut self, set: AnchorSet) {
        let pending = std::mem::take(&mut self.pending);
        self.pending = pending.merge(set);
    }

    /// Closes the pass. No more records can be added afterwards.
    pub fn finish(self) -> Aggregated {
        Aggregated {
            records: self.pending.records,
        }
    }
}

/// The complete collection of records for one pass, in arrival order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Aggregated {
    records: Vec<AnchorRecord>,
}

impl Aggregated {
    pub fn records(&self) -> &[AnchorRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(node: usize, index: usize) -> AnchorRecord {
        AnchorRecord::new(
            BoundsRef::new(NodeId::new(node)),
            format!("label {index}"),
            AnchorIndex::new(index),
        )
    }

    fn indices(aggregated: &Aggregated) -> Vec<usize> {
        aggregated.records().iter().map(|r| r.index().get()).collect()
    }

    #[test]
    fn test_record_defaults() {
        let record = record(3, 1);
        assert_eq!(record.y_inset(), 0.0);
        assert_eq!(record.label(), "label 1");
        assert_eq!(record.bounds().node(), NodeId::new(3));

        let inset = record.with_y_inset(10.0);
        assert_eq!(inset.y_inset(), 10.0);
    }

    #[test]
    fn test_register_appends_in_order() {
        let mut set = AnchorSet::new();
        set.register(record(0, 4));
        set.register(record(1, 0));

        let indices: Vec<_> = set.iter().map(|r| r.index().get()).collect();
        assert_eq!(indices, vec![4, 0]);
    }

    #[test]
    fn test_aggregate_is_concatenation() {
        let left: AnchorSet = [record(0, 2), record(1, 0)].into_iter().collect();
        let middle = AnchorSet::new();
        let right: AnchorSet = [record(2, 1)].into_iter().collect();

        let mut pass = AggregationPass::new();
        pass.contribute(AnchorSet::aggregate([left, middle, right]));
        let aggregated = pass.finish();

        assert_eq!(indices(&aggregated), vec![2, 0, 1]);
    }

    #[test]
    fn test_merge_is_associative() {
        let a: AnchorSet = [record(0, 0)].into_iter().collect();
        let b: AnchorSet = [record(1, 1)].into_iter().collect();
        let c: AnchorSet = [record(2, 2)].into_iter().collect();

        let left = a.clone().merge(b.clone()).merge(c.clone());
        let right = a.merge(b.merge(c));
        assert_eq!(left, right);
    }

    #[test]
    fn test_empty_pass() {
        let aggregated = AggregationPass::new().finish();
        assert!(aggregated.is_empty());
        assert_eq!(aggregated.len(), 0);
    }
}
