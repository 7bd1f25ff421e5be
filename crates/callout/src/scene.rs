//! Declarative scene description.
//!
//! A scene is a tree of [`View`]s. Every view has a [`ViewKind`] that decides
//! how it sizes itself and its children, plus two optional attributes shared
//! by all kinds:
//!
//! - `legend`: annotates the view's bounds with a legend entry.
//! - `highlight`: stroke drawn around the view while its legend entry is
//!   highlighted.
//!
//! Scenes are loaded from TOML, where the kind is selected by a `kind` key:
//!
//! ```
//! # use callout::scene::Scene;
//! let scene: Scene = toml::from_str(r#"
//!     width = 300
//!     height = 200
//!
//!     [root]
//!     kind = "legend"
//!
//!     [root.child]
//!     kind = "fill"
//!     color = "steelblue"
//!     legend = { label = "Area", index = 0 }
//! "#).unwrap();
//!
//! assert_eq!(scene.root().annotation_count(), 1);
//! ```
//!
//! The same tree can be built in code with modifier-style builders:
//!
//! ```
//! # use callout::scene::View;
//! # use callout_core::color::Color;
//! let view = View::fill(Color::new("green").unwrap())
//!     .legend("Green", 0)
//!     .frame(Some(40.0), Some(40.0))
//!     .draw_legend();
//! assert_eq!(view.annotation_count(), 1);
//! ```

use serde::Deserialize;

use callout_core::{color::Color, draw::StrokeDefinition, geometry::Insets};

use crate::anchor::AnchorIndex;

const DEFAULT_SCENE_WIDTH: f32 = 400.0;
const DEFAULT_SCENE_HEIGHT: f32 = 300.0;
const DEFAULT_STRIPES_WIDTH: f32 = 16.0;

/// A scene file: a root view and the canvas size proposed to it.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Scene {
    #[serde(default = "default_width")]
    width: f32,
    #[serde(default = "default_height")]
    height: f32,
    root: View,
}

fn default_width() -> f32 {
    DEFAULT_SCENE_WIDTH
}

fn default_height() -> f32 {
    DEFAULT_SCENE_HEIGHT
}

impl Scene {
    /// Creates a scene with the default 400x300 canvas.
    pub fn new(root: View) -> Self {
        Self {
            width: DEFAULT_SCENE_WIDTH,
            height: DEFAULT_SCENE_HEIGHT,
            root,
        }
    }

    pub fn with_size(mut self, width: f32, height: f32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    pub fn root(&self) -> &View {
        &self.root
    }
}

/// Legend annotation of a view.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LegendSpec {
    label: String,
    index: AnchorIndex,
    #[serde(default)]
    y_inset: f32,
}

impl LegendSpec {
    pub fn new(label: impl Into<String>, index: usize) -> Self {
        Self {
            label: label.into(),
            index: AnchorIndex::new(index),
            y_inset: 0.0,
        }
    }

    pub fn with_y_inset(mut self, y_inset: f32) -> Self {
        self.y_inset = y_inset;
        self
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn index(&self) -> AnchorIndex {
        self.index
    }

    pub fn y_inset(&self) -> f32 {
        self.y_inset
    }
}

/// How a view lays itself out.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ViewKind {
    /// Flexible rectangle filled with a color
    Fill { color: Color },
    /// Fixed-width spacer with diagonal stripes and a thin border
    Stripes {
        #[serde(default = "default_stripes_width")]
        width: f32,
        #[serde(default)]
        color: Color,
    },
    /// Text sized by its measured content
    Text { content: String },
    /// Children side by side
    HStack {
        #[serde(default)]
        spacing: f32,
        #[serde(default)]
        children: Vec<View>,
    },
    /// Children top to bottom
    VStack {
        #[serde(default)]
        spacing: f32,
        #[serde(default)]
        children: Vec<View>,
    },
    /// Fixes the width and/or height and centers the child
    Frame {
        #[serde(default)]
        width: Option<f32>,
        #[serde(default)]
        height: Option<f32>,
        child: Box<View>,
    },
    /// Insets the child
    Padding {
        #[serde(default = "default_padding")]
        insets: Insets,
        child: Box<View>,
    },
    /// Rounded stroke drawn over the child's bounds
    Border {
        #[serde(default)]
        radius: f32,
        #[serde(default)]
        stroke: StrokeDefinition,
        child: Box<View>,
    },
    /// Collects the annotations of its child and draws the legend below it
    Legend { child: Box<View> },
}

fn default_stripes_width() -> f32 {
    DEFAULT_STRIPES_WIDTH
}

fn default_padding() -> Insets {
    Insets::uniform(16.0)
}

/// A node of the scene tree.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct View {
    #[serde(flatten)]
    kind: ViewKind,
    #[serde(default)]
    legend: Option<LegendSpec>,
    #[serde(default)]
    highlight: Option<StrokeDefinition>,
}

impl From<ViewKind> for View {
    fn from(kind: ViewKind) -> Self {
        Self {
            kind,
            legend: None,
            highlight: None,
        }
    }
}

impl View {
    pub fn fill(color: Color) -> Self {
        ViewKind::Fill { color }.into()
    }

    /// A striped spacer of the default width.
    pub fn stripes(color: Color) -> Self {
        ViewKind::Stripes {
            width: DEFAULT_STRIPES_WIDTH,
            color,
        }
        .into()
    }

    pub fn text(content: impl Into<String>) -> Self {
        ViewKind::Text {
            content: content.into(),
        }
        .into()
    }

    pub fn h_stack(spacing: f32, children: Vec<View>) -> Self {
        ViewKind::HStack { spacing, children }.into()
    }

    pub fn v_stack(spacing: f32, children: Vec<View>) -> Self {
        ViewKind::VStack { spacing, children }.into()
    }

    /// Wraps `self` in a frame of fixed width and/or height.
    pub fn frame(self, width: Option<f32>, height: Option<f32>) -> Self {
        ViewKind::Frame {
            width,
            height,
            child: Box::new(self),
        }
        .into()
    }

    pub fn padding(self, insets: Insets) -> Self {
        ViewKind::Padding {
            insets,
            child: Box::new(self),
        }
        .into()
    }

    /// Draws a rounded stroke over `self`.
    pub fn border(self, radius: f32, stroke: StrokeDefinition) -> Self {
        ViewKind::Border {
            radius,
            stroke,
            child: Box::new(self),
        }
        .into()
    }

    /// Makes `self` the root of a legend.
    pub fn draw_legend(self) -> Self {
        ViewKind::Legend {
            child: Box::new(self),
        }
        .into()
    }

    /// Annotates `self` with a legend entry.
    pub fn legend(self, label: impl Into<String>, index: usize) -> Self {
        self.annotate(LegendSpec::new(label, index))
    }

    /// Annotates `self` with a fully specified legend entry.
    pub fn annotate(mut self, spec: LegendSpec) -> Self {
        self.legend = Some(spec);
        self
    }

    /// Stroke drawn around `self` while its legend entry is highlighted.
    pub fn highlight(mut self, stroke: StrokeDefinition) -> Self {
        self.highlight = Some(stroke);
        self
    }

    pub fn kind(&self) -> &ViewKind {
        &self.kind
    }

    pub fn legend_spec(&self) -> Option<&LegendSpec> {
        self.legend.as_ref()
    }

    pub fn highlight_stroke(&self) -> Option<&StrokeDefinition> {
        self.highlight.as_ref()
    }

    /// Direct children of this view.
    pub fn children(&self) -> &[View] {
        match &self.kind {
            ViewKind::Fill { .. } | ViewKind::Stripes { .. } | ViewKind::Text { .. } => &[],
            ViewKind::HStack { children, .. } | ViewKind::VStack { children, .. } => children,
            ViewKind::Frame { child, .. }
            | ViewKind::Padding { child, .. }
            | ViewKind::Border { child, .. }
            | ViewKind::Legend { child } => std::slice::from_ref(child.as_ref()),
        }
    }

    /// Labels of the annotations this subtree forwards to an enclosing
    /// legend root, in registration order.
    ///
    /// A legend root keeps the annotations below it, so only its own
    /// annotation is forwarded.
    pub fn forwarded_labels(&self) -> Vec<&str> {
        let mut labels = Vec::new();
        self.collect_labels(&mut labels);
        labels
    }

    fn collect_labels<'a>(&'a self, labels: &mut Vec<&'a str>) {
        if !matches!(self.kind, ViewKind::Legend { .. }) {
            for child in self.children() {
                child.collect_labels(labels);
            }
        }
        if let Some(spec) = &self.legend {
            labels.push(spec.label());
        }
    }

    /// Number of annotated views in this subtree, including nested legends.
    pub fn annotation_count(&self) -> usize {
        let own = usize::from(self.legend.is_some());
        own + self
            .children()
            .iter()
            .map(View::annotation_count)
            .sum::<usize>()
    }
}
