//! SVG rendering of laid-out diagrams.
//!
//! Every node is drawn at its absolute bounds into a [`LayeredOutput`], so
//! paint order follows [`RenderLayer`] rather than tree order: region fills,
//! texts, borders, highlight strokes, then connectors and legend rows.

use std::{io, time::Duration};

use log::{debug, error, info};
use svg::{Document, node::element as svg_element};

use callout_core::{
    apply_stroke,
    color::Color,
    draw::{Drawable, LayeredOutput, RenderLayer, StrokeDefinition, Text, TextDefinition},
    geometry::{Bounds, Point, Size},
};

use super::{Error, Exporter, Snapshot};
use crate::{
    config::StyleConfig,
    layout::{LayoutNode, NodeDrawing, NodeId},
    legend::LegendRow,
};

/// Distance between two stripes of a striped region.
const STRIPE_SPACING: f32 = 8.0;

/// Builder for [`Svg`] exporters.
#[derive(Debug, Default)]
pub struct SvgBuilder<'a> {
    style: Option<&'a StyleConfig>,
    transition: Duration,
}

impl<'a> SvgBuilder<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_style(mut self, style: &'a StyleConfig) -> Self {
        self.style = Some(style);
        self
    }

    /// Duration of the CSS opacity transition of legend participants.
    pub fn with_transition(mut self, transition: Duration) -> Self {
        self.transition = transition;
        self
    }

    /// # Errors
    ///
    /// Returns [`Error::Render`] if the configured background color is invalid.
    pub fn build(self) -> Result<Svg, Error> {
        let (background_color, text) = match self.style {
            Some(style) => (
                style.background_color().map_err(Error::Render)?,
                style.text_definition(),
            ),
            None => (None, TextDefinition::new()),
        };

        Ok(Svg {
            background_color,
            text,
            transition: self.transition,
        })
    }
}

/// SVG exporter.
#[derive(Debug)]
pub struct Svg {
    background_color: Option<Color>,
    text: TextDefinition,
    transition: Duration,
}

impl Svg {
    /// Renders `snapshot` to an SVG document sized to the layout root.
    pub fn render_document(&self, snapshot: &Snapshot<'_>) -> Document {
        let tree = snapshot.tree();
        let size = tree.size();

        let mut output = LayeredOutput::new();
        if let Some(color) = &self.background_color {
            output.add_to_layer(RenderLayer::Background, Box::new(self.background(color, size)));
        }

        let mut stripe_colors: Vec<Color> = Vec::new();
        for (id, node) in tree.nodes() {
            let bounds = tree.absolute_bounds(id);
            let highlight = self.active_highlight(snapshot, node);

            if let NodeDrawing::Stripes(color) = node.drawing() {
                let color = highlight.map_or(*color, StrokeDefinition::color);
                if !stripe_colors.contains(&color) {
                    stripe_colors.push(color);
                }
                output.merge(self.render_stripes(color, bounds));
            } else {
                output.merge(self.render_node(snapshot, id, node, bounds));
            }

            if let Some(anchor) = node.anchor() {
                let region = rect(bounds)
                    .set("fill", "none")
                    .set("class", "legend-region")
                    .set("data-legend-index", anchor.index().get());
                output.add_to_layer(RenderLayer::Region, Box::new(region));
            }
            if let Some(stroke) = highlight {
                output.add_to_layer(
                    RenderLayer::Highlight,
                    Box::new(self.render_highlight(stroke, bounds)),
                );
            }
        }

        let mut doc = Document::new()
            .set("viewBox", format!("0 0 {} {}", size.width(), size.height()))
            .set("width", size.width())
            .set("height", size.height());

        if !stripe_colors.is_empty() {
            let defs = stripe_colors
                .into_iter()
                .fold(svg_element::Definitions::new(), |defs, color| {
                    defs.add(stripe_pattern(color))
                });
            doc = doc.add(defs);
        }

        let nodes = output.render();
        debug!(groups = nodes.len(); "SVG layers rendered");
        nodes.into_iter().fold(doc, |doc, node| doc.add(node))
    }

    fn background(&self, color: &Color, size: Size) -> svg_element::Rectangle {
        svg_element::Rectangle::new()
            .set("x", 0)
            .set("y", 0)
            .set("width", size.width())
            .set("height", size.height())
            .set("fill", color)
            .set("fill-opacity", color.alpha())
    }

    /// Highlight stroke of `node`, if it is the highlighted region.
    fn active_highlight<'n>(
        &self,
        snapshot: &Snapshot<'_>,
        node: &'n LayoutNode,
    ) -> Option<&'n StrokeDefinition> {
        let anchor = node.anchor()?;
        if snapshot.highlight() == Some(anchor.index()) {
            anchor.highlight()
        } else {
            None
        }
    }

    fn render_node(
        &self,
        snapshot: &Snapshot<'_>,
        id: NodeId,
        node: &LayoutNode,
        bounds: Bounds,
    ) -> LayeredOutput {
        let mut output = LayeredOutput::new();
        match node.drawing() {
            NodeDrawing::None | NodeDrawing::Stripes(_) => {}
            NodeDrawing::Fill(color) => {
                let fill = rect(bounds)
                    .set("fill", color)
                    .set("fill-opacity", color.alpha());
                output.add_to_layer(RenderLayer::Region, Box::new(fill));
            }
            NodeDrawing::Text(content) => {
                output.merge(Text::new(&self.text, content).render_to_layers(bounds.center()));
            }
            NodeDrawing::Border { radius, stroke } => {
                let border = apply_stroke!(rect(bounds), stroke)
                    .set("rx", *radius)
                    .set("ry", *radius)
                    .set("fill", "none");
                output.add_to_layer(RenderLayer::Border, Box::new(border));
            }
            NodeDrawing::LegendRow(row) => {
                let drawable = LegendRowDrawable {
                    row,
                    text: &self.text,
                    opacity: snapshot.opacity(row.index()),
                    transition: self.transition,
                };
                debug!(node:? = id, index = row.index().get(); "Rendering legend row");
                output.merge(drawable.render_to_layers(bounds.center()));
            }
        }
        output
    }

    fn render_stripes(&self, color: Color, bounds: Bounds) -> LayeredOutput {
        let mut output = LayeredOutput::new();
        let fill = rect(bounds).set("fill", format!("url(#{})", stripe_pattern_id(color)));
        output.add_to_layer(RenderLayer::Region, Box::new(fill));

        let stroke = StrokeDefinition::solid(color, 1.0);
        let outline = apply_stroke!(rect(bounds), stroke).set("fill", "none");
        output.add_to_layer(RenderLayer::Region, Box::new(outline));
        output
    }

    /// Stroke drawn inside the region's bounds.
    fn render_highlight(&self, stroke: &StrokeDefinition, bounds: Bounds) -> svg_element::Rectangle {
        let half = stroke.width() / 2.0;
        let inset = Bounds::new_from_top_left(
            Point::new(bounds.min_x() + half, bounds.min_y() + half),
            Size::new(
                (bounds.width() - stroke.width()).max(0.0),
                (bounds.height() - stroke.width()).max(0.0),
            ),
        );
        apply_stroke!(rect(inset), stroke).set("fill", "none")
    }
}

impl Exporter for Svg {
    fn export(&mut self, snapshot: &Snapshot<'_>, out: &mut dyn io::Write) -> Result<(), Error> {
        let doc = self.render_document(snapshot);
        debug!("SVG document rendered");

        if let Err(err) = write!(out, "{doc}") {
            error!(err:err; "Failed to write SVG content");
            return Err(Error::Io(err));
        }

        info!("SVG exported");
        Ok(())
    }
}

/// A legend row in its current emphasis.
#[derive(Debug)]
struct LegendRowDrawable<'a> {
    row: &'a LegendRow,
    text: &'a TextDefinition,
    opacity: f32,
    transition: Duration,
}

impl LegendRowDrawable<'_> {
    fn transition_style(&self) -> String {
        format!(
            "transition: opacity {}ms ease-in-out",
            self.transition.as_millis()
        )
    }
}

impl Drawable for LegendRowDrawable<'_> {
    fn render_to_layers(&self, position: Point) -> LayeredOutput {
        let mut output = LayeredOutput::new();
        let size = self.size();
        let top_left = position.sub_point(Point::new(size.width() / 2.0, size.height() / 2.0));
        let index = self.row.index().get();

        let marker = top_left.add_point(self.row.marker_center());
        let connector_top = top_left.add_point(self.row.connector_top());
        let color = self.text.color().copied().unwrap_or_default();
        let stroke = StrokeDefinition::solid(color, 1.0);

        let connector = apply_stroke!(
            svg_element::Line::new()
                .set("x1", marker.x())
                .set("y1", marker.y())
                .set("x2", connector_top.x())
                .set("y2", connector_top.y()),
            stroke
        )
        .set("class", "legend-connector")
        .set("data-legend-index", index)
        .set("opacity", self.opacity)
        .set("style", self.transition_style());
        output.add_to_layer(RenderLayer::Connector, Box::new(connector));

        let circle = svg_element::Circle::new()
            .set("cx", marker.x())
            .set("cy", marker.y())
            .set("r", self.row.marker_radius())
            .set("fill", &color);
        let label = Text::new(self.text, self.row.label())
            .render_element(top_left.add_point(self.row.label_center()));

        let group = svg_element::Group::new()
            .set("class", "legend-row")
            .set("data-legend-index", index)
            .set("opacity", self.opacity)
            .set("style", self.transition_style())
            .add(circle)
            .add(label);
        output.add_to_layer(RenderLayer::Legend, Box::new(group));

        output
    }

    fn size(&self) -> Size {
        self.row.size()
    }
}

fn rect(bounds: Bounds) -> svg_element::Rectangle {
    svg_element::Rectangle::new()
        .set("x", bounds.min_x())
        .set("y", bounds.min_y())
        .set("width", bounds.width())
        .set("height", bounds.height())
}

fn stripe_pattern_id(color: Color) -> String {
    format!("stripes-{}", color.to_id_safe_string())
}

/// Diagonal lines at -45 degrees, repeated every [`STRIPE_SPACING`] units.
fn stripe_pattern(color: Color) -> svg_element::Pattern {
    let stroke = StrokeDefinition::solid(color, 1.0);
    let line = apply_stroke!(
        svg_element::Line::new()
            .set("x1", 0)
            .set("y1", STRIPE_SPACING / 2.0)
            .set("x2", STRIPE_SPACING)
            .set("y2", STRIPE_SPACING / 2.0),
        stroke
    );

    svg_element::Pattern::new()
        .set("id", stripe_pattern_id(color))
        .set("patternUnits", "userSpaceOnUse")
        .set("width", STRIPE_SPACING)
        .set("height", STRIPE_SPACING)
        .set("patternTransform", "rotate(-45)")
        .add(line)
}
