//! Callout - annotated diagrams with an automatically placed legend.
//!
//! Regions anywhere in a scene can be annotated with a label and an index.
//! A legend root collects those annotations during layout, places one label
//! per region left to right below its content, and connects every label to
//! its region. Hovering a region or a legend row highlights both.

pub mod anchor;
pub mod config;
pub mod diagram;
pub mod emphasis;
pub mod export;
pub mod highlight;
pub mod layout;
pub mod legend;
pub mod resolve;
pub mod scene;

mod error;

pub use callout_core::{color, draw, geometry};

pub use diagram::Diagram;
pub use error::CalloutError;

use log::{debug, info, trace};

use config::AppConfig;
use scene::Scene;

/// Builder for loading and rendering Callout scenes.
///
/// # Examples
///
/// ```rust
/// use callout::{DiagramBuilder, config::AppConfig};
///
/// let source = r#"
///     [root]
///     kind = "legend"
///     child = { kind = "fill", color = "teal", legend = { label = "Teal", index = 0 } }
/// "#;
///
/// let builder = DiagramBuilder::new(AppConfig::default());
///
/// let scene = builder.parse(source).expect("Failed to parse");
/// let svg = builder.render_svg(&scene).expect("Failed to render");
/// assert!(svg.contains("Teal"));
///
/// // Or use default config
/// let builder = DiagramBuilder::default();
/// ```
#[derive(Default)]
pub struct DiagramBuilder {
    config: AppConfig,
}

impl DiagramBuilder {
    /// Create a new diagram builder with the given configuration.
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    /// Parse a TOML scene description.
    ///
    /// # Errors
    ///
    /// Returns [`CalloutError::Scene`] with the source attached if the text is
    /// not valid TOML or does not describe a scene.
    pub fn parse(&self, source: &str) -> Result<Scene, CalloutError> {
        info!("Parsing scene");

        let scene: Scene =
            toml::from_str(source).map_err(|err| CalloutError::new_scene_error(err, source))?;

        debug!(
            annotations = scene.root().annotation_count(),
            width = scene.width(),
            height = scene.height();
            "Scene parsed successfully"
        );
        trace!(scene:?; "Parsed scene");

        Ok(scene)
    }

    /// Lay out `scene` into an interactive [`Diagram`].
    ///
    /// # Errors
    ///
    /// Returns [`CalloutError`] for invalid configuration or canvas size.
    pub fn diagram(&self, scene: &Scene) -> Result<Diagram, CalloutError> {
        Diagram::new(scene, self.config.clone())
    }

    /// Render `scene` to an SVG string, with nothing highlighted.
    ///
    /// # Errors
    ///
    /// Returns [`CalloutError`] for layout or rendering errors.
    pub fn render_svg(&self, scene: &Scene) -> Result<String, CalloutError> {
        let svg = self.diagram(scene)?.render_svg()?;
        info!("SVG rendered successfully");
        Ok(svg)
    }
}
