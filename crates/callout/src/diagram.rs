//! Interactive diagram session.
//!
//! A [`Diagram`] owns one laid-out scene and its highlight state. Pointer
//! events are hit-tested against legend rows and annotated regions and
//! translated into hover enter/leave calls on the shared
//! [`HighlightCoordinator`]. The emphasis tracker listens to the coordinator
//! and retargets its opacity transitions, which the host advances with
//! [`Diagram::tick`].

use std::{cell::RefCell, io, rc::Rc, time::Duration};

use log::{debug, info};

use callout_core::geometry::{Point, Size};

use crate::{
    CalloutError,
    anchor::AnchorIndex,
    config::AppConfig,
    emphasis::EmphasisTracker,
    export::{Exporter, Snapshot, svg::SvgBuilder},
    highlight::{HighlightCoordinator, Participant},
    layout::LayoutTree,
    scene::{Scene, View},
};

/// A laid-out scene that reacts to pointer input.
#[derive(Debug)]
pub struct Diagram {
    root: View,
    config: AppConfig,
    tree: LayoutTree,
    highlight: HighlightCoordinator,
    emphasis: Rc<RefCell<EmphasisTracker>>,
    hovered: Option<Participant>,
}

impl Diagram {
    /// Lays out `scene` at its canvas size.
    ///
    /// # Errors
    ///
    /// Returns [`CalloutError::Config`] for an invalid style configuration and
    /// [`CalloutError::Layout`] for a canvas that is not a finite, positive
    /// size.
    pub fn new(scene: &Scene, config: AppConfig) -> Result<Self, CalloutError> {
        config
            .style()
            .background_color()
            .map_err(CalloutError::Config)?;

        let legend = config.legend();
        let emphasis = Rc::new(RefCell::new(EmphasisTracker::new(
            legend.secondary_opacity(),
            legend.transition(),
        )));

        let highlight = HighlightCoordinator::new();
        let observer = Rc::clone(&emphasis);
        highlight.subscribe(move |current| observer.borrow_mut().apply(current));

        let mut diagram = Self {
            root: scene.root().clone(),
            config,
            tree: LayoutTree::default(),
            highlight,
            emphasis,
            hovered: None,
        };
        diagram.relayout(Size::new(scene.width(), scene.height()))?;

        Ok(diagram)
    }

    /// Lays the scene out again for a new proposed size.
    ///
    /// Every relayout is a full aggregation pass. The highlight survives it.
    ///
    /// # Errors
    ///
    /// Returns [`CalloutError::Layout`] if `proposal` is not a finite,
    /// positive size.
    pub fn relayout(&mut self, proposal: Size) -> Result<(), CalloutError> {
        let valid = |v: f32| v.is_finite() && v > 0.0;
        if !valid(proposal.width()) || !valid(proposal.height()) {
            return Err(CalloutError::Layout(format!(
                "Canvas size must be finite and positive, got {}x{}",
                proposal.width(),
                proposal.height()
            )));
        }

        info!(width = proposal.width(), height = proposal.height(); "Laying out diagram");
        self.tree = LayoutTree::build(
            &self.root,
            proposal,
            self.config.legend(),
            &self.config.style().text_definition(),
        );
        self.emphasis.borrow_mut().track(self.tree.participants());

        Ok(())
    }

    pub fn tree(&self) -> &LayoutTree {
        &self.tree
    }

    /// The coordinator shared by all regions and legend rows.
    pub fn highlight(&self) -> &HighlightCoordinator {
        &self.highlight
    }

    /// Finds the participant under `point`.
    pub fn hit_test(&self, point: Point) -> Option<Participant> {
        self.tree.hit_test(point)
    }

    /// Feeds a pointer position, in root space.
    ///
    /// Moving from one participant straight to another replaces the highlight
    /// in a single write. Returns the participant now under the pointer.
    pub fn pointer_moved(&mut self, point: Point) -> Option<Participant> {
        let hit = self.hit_test(point);
        if hit == self.hovered {
            return hit;
        }

        debug!(previous:? = self.hovered, current:? = hit; "Hover changed");
        match (self.hovered, hit) {
            (_, Some(current)) => self.highlight.hover(current.index(), true),
            (Some(previous), None) => self.highlight.hover(previous.index(), false),
            (None, None) => {}
        }
        self.hovered = hit;

        hit
    }

    /// The pointer left the diagram.
    pub fn pointer_left(&mut self) {
        if let Some(previous) = self.hovered.take() {
            self.highlight.hover(previous.index(), false);
        }
    }

    /// Advances emphasis animations by `elapsed`.
    pub fn tick(&mut self, elapsed: Duration) {
        self.emphasis.borrow_mut().advance(elapsed);
    }

    /// Finishes all running emphasis animations.
    pub fn settle(&mut self) {
        self.emphasis.borrow_mut().settle();
    }

    pub fn is_animating(&self) -> bool {
        self.emphasis.borrow().is_animating()
    }

    /// Current opacity of the legend participant `index`.
    pub fn emphasis(&self, index: AnchorIndex) -> f32 {
        self.emphasis.borrow().opacity(index)
    }

    /// Returns true if `index` is drawn in the primary style.
    pub fn is_primary(&self, index: AnchorIndex) -> bool {
        self.highlight.is_primary(index)
    }

    /// Writes the current state as SVG.
    ///
    /// # Errors
    ///
    /// Returns [`CalloutError::Export`] if rendering or writing fails.
    pub fn write_svg(&self, out: &mut dyn io::Write) -> Result<(), CalloutError> {
        let mut exporter = SvgBuilder::new()
            .with_style(self.config.style())
            .with_transition(self.config.legend().transition())
            .build()?;

        let emphasis = self.emphasis.borrow();
        let snapshot = Snapshot::new(&self.tree, self.highlight.read(), &emphasis);
        exporter.export(&snapshot, out)?;

        Ok(())
    }

    /// Renders the current state to an SVG string.
    ///
    /// # Errors
    ///
    /// Returns [`CalloutError::Export`] if rendering fails.
    pub fn render_svg(&self) -> Result<String, CalloutError> {
        let mut buffer = Vec::new();
        self.write_svg(&mut buffer)?;
        String::from_utf8(buffer).map_err(|err| CalloutError::Export(Box::new(err)))
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use callout_core::color::Color;

    use super::*;

    fn idx(i: usize) -> AnchorIndex {
        AnchorIndex::new(i)
    }

    /// Three 100x100 regions side by side, with the legend below.
    fn diagram() -> Diagram {
        let region = |i: usize| View::fill(Color::default()).legend(format!("r{i}"), i);
        let root = View::h_stack(0.0, vec![region(0), region(1), region(2)])
            .frame(Some(300.0), Some(100.0))
            .draw_legend();
        Diagram::new(&Scene::new(root), AppConfig::default()).unwrap()
    }

    #[test]
    fn test_rejects_degenerate_canvas() {
        let scene = Scene::new(View::text("x")).with_size(0.0, 100.0);
        let result = Diagram::new(&scene, AppConfig::default());
        assert!(matches!(result, Err(CalloutError::Layout(_))));

        let mut diagram = diagram();
        assert!(diagram.relayout(Size::new(f32::NAN, 10.0)).is_err());
    }

    #[test]
    fn test_hover_region_highlights_its_row() {
        let mut diagram = diagram();

        let hit = diagram.pointer_moved(Point::new(250.0, 50.0));
        assert_eq!(hit, Some(Participant::Region(idx(2))));
        assert_eq!(diagram.highlight().read(), Some(idx(2)));

        diagram.settle();
        let primary: Vec<_> = (0..3).filter(|&i| diagram.is_primary(idx(i))).collect();
        assert_eq!(primary, vec![2]);
        assert_approx_eq!(f32, diagram.emphasis(idx(2)), 1.0);
        assert_approx_eq!(f32, diagram.emphasis(idx(0)), 0.45);

        diagram.pointer_left();
        diagram.settle();
        assert_eq!(diagram.highlight().read(), None);
        assert!((0..3).all(|i| diagram.is_primary(idx(i))));
        assert_approx_eq!(f32, diagram.emphasis(idx(0)), 1.0);
    }

    #[test]
    fn test_hover_legend_row() {
        let mut diagram = diagram();
        let (id, row) = diagram
            .tree()
            .legend_rows()
            .find(|(_, row)| row.index() == idx(1))
            .unwrap();
        let center = diagram.tree().absolute_bounds(id).center();
        assert_eq!(row.index(), idx(1));

        let hit = diagram.pointer_moved(center);
        assert_eq!(hit, Some(Participant::LegendRow(idx(1))));
        assert!(diagram.highlight().is_highlighted(idx(1)));
    }

    #[test]
    fn test_moving_between_regions_switches_highlight() {
        let mut diagram = diagram();
        diagram.pointer_moved(Point::new(50.0, 50.0));
        diagram.pointer_moved(Point::new(150.0, 50.0));
        assert_eq!(diagram.highlight().read(), Some(idx(1)));

        // Moving into empty space leaves the region
        diagram.pointer_moved(Point::new(-10.0, -10.0));
        assert_eq!(diagram.highlight().read(), None);
    }

    #[test]
    fn test_switching_regions_leaves_unrelated_rows_settled() {
        let mut diagram = diagram();
        diagram.pointer_moved(Point::new(50.0, 50.0));
        diagram.settle();

        diagram.pointer_moved(Point::new(150.0, 50.0));
        assert_eq!(diagram.highlight().read(), Some(idx(1)));
        assert_approx_eq!(f32, diagram.emphasis(idx(2)), 0.45);

        // Only rows 0 and 1 change style; row 2 stays secondary throughout.
        diagram.tick(Duration::from_millis(100));
        assert_approx_eq!(f32, diagram.emphasis(idx(2)), 0.45);
        diagram.settle();
        assert_approx_eq!(f32, diagram.emphasis(idx(0)), 0.45);
        assert_approx_eq!(f32, diagram.emphasis(idx(1)), 1.0);
    }

    #[test]
    fn test_switching_regions_notifies_once() {
        let mut diagram = diagram();
        let changes = Rc::new(RefCell::new(Vec::new()));
        let seen = Rc::clone(&changes);
        diagram
            .highlight()
            .subscribe(move |current| seen.borrow_mut().push(current));

        diagram.pointer_moved(Point::new(50.0, 50.0));
        diagram.pointer_moved(Point::new(150.0, 50.0));
        diagram.pointer_left();

        assert_eq!(*changes.borrow(), vec![Some(idx(0)), Some(idx(1)), None]);
    }

    #[test]
    fn test_emphasis_animates_on_tick() {
        let mut diagram = diagram();
        diagram.pointer_moved(Point::new(50.0, 50.0));
        assert!(diagram.is_animating());

        diagram.tick(Duration::from_millis(100));
        let midway = diagram.emphasis(idx(1));
        assert!(midway < 1.0 && midway > 0.45);

        diagram.tick(Duration::from_secs(1));
        assert!(!diagram.is_animating());
        assert_approx_eq!(f32, diagram.emphasis(idx(1)), 0.45);
    }

    #[test]
    fn test_highlight_survives_relayout() {
        let mut diagram = diagram();
        diagram.highlight().set_highlight(idx(0));
        diagram.relayout(Size::new(500.0, 400.0)).unwrap();
        diagram.settle();

        assert_eq!(diagram.highlight().read(), Some(idx(0)));
        assert_approx_eq!(f32, diagram.emphasis(idx(2)), 0.45);
    }

    #[test]
    fn test_render_svg_reflects_highlight() {
        let mut diagram = diagram();
        let plain = diagram.render_svg().unwrap();
        assert!(!plain.contains("opacity=\"0.45\""));

        diagram.highlight().set_highlight(idx(0));
        diagram.settle();
        let highlighted = diagram.render_svg().unwrap();
        assert!(highlighted.contains("opacity=\"0.45\""));
    }
}
