//! Configuration types for Callout diagram rendering.
//!
//! All types implement [`serde::Deserialize`] so they can be loaded from
//! TOML. Every field is optional and falls back to its default.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level configuration combining legend and style settings.
//! - [`LegendConfig`] - Spacing, marker and emphasis settings of the legend.
//! - [`StyleConfig`] - Background color and text style.
//!
//! # Example
//!
//! ```
//! # use callout::config::AppConfig;
//! let config: AppConfig = toml::from_str(r#"
//!     [legend]
//!     spacing = 24
//!
//!     [style]
//!     background_color = "white"
//! "#).unwrap();
//!
//! assert_eq!(config.legend().spacing(), 24.0);
//! assert!(config.style().background_color().unwrap().is_some());
//! ```

use std::time::Duration;

use serde::Deserialize;

use callout_core::{color::Color, draw::TextDefinition};

use crate::resolve::DEFAULT_SPACING;

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Legend configuration section.
    #[serde(default)]
    legend: LegendConfig,

    /// Style configuration section.
    #[serde(default)]
    style: StyleConfig,
}

impl AppConfig {
    pub fn new(legend: LegendConfig, style: StyleConfig) -> Self {
        Self { legend, style }
    }

    /// Returns the legend configuration.
    pub fn legend(&self) -> &LegendConfig {
        &self.legend
    }

    /// Returns the style configuration.
    pub fn style(&self) -> &StyleConfig {
        &self.style
    }
}

/// Geometry and emphasis of the legend.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LegendConfig {
    /// Preferred distance between consecutive labels.
    spacing: f32,
    /// Vertical gap between the annotated content and the first row.
    legend_gap: f32,
    /// Vertical gap between rows.
    row_spacing: f32,
    /// Radius of the row marker.
    marker_radius: f32,
    /// Horizontal gap between marker and label.
    label_gap: f32,
    /// Opacity of rows and connectors in secondary style.
    secondary_opacity: f32,
    /// Duration of the primary/secondary transition.
    transition_millis: u64,
}

impl Default for LegendConfig {
    fn default() -> Self {
        Self {
            spacing: DEFAULT_SPACING,
            legend_gap: 8.0,
            row_spacing: 8.0,
            marker_radius: 1.5,
            label_gap: 8.0,
            secondary_opacity: 0.45,
            transition_millis: 350,
        }
    }
}

impl LegendConfig {
    pub fn spacing(&self) -> f32 {
        self.spacing
    }

    pub fn legend_gap(&self) -> f32 {
        self.legend_gap
    }

    pub fn row_spacing(&self) -> f32 {
        self.row_spacing
    }

    pub fn marker_radius(&self) -> f32 {
        self.marker_radius
    }

    pub fn label_gap(&self) -> f32 {
        self.label_gap
    }

    pub fn secondary_opacity(&self) -> f32 {
        self.secondary_opacity
    }

    pub fn transition(&self) -> Duration {
        Duration::from_millis(self.transition_millis)
    }
}

/// Visual styling configuration for rendered diagrams.
///
/// Fields that are not set fall back to renderer defaults.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct StyleConfig {
    /// Background color, as a CSS color string.
    #[serde(default)]
    background_color: Option<String>,

    /// Font family of region texts and legend labels.
    #[serde(default)]
    font_family: Option<String>,

    /// Font size in points.
    #[serde(default)]
    font_size: Option<u16>,
}

impl StyleConfig {
    /// Returns the parsed background [`Color`], or `None` if no color is configured.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured color string cannot be parsed.
    pub fn background_color(&self) -> Result<Option<Color>, String> {
        self.background_color
            .as_ref()
            .map(|color| Color::new(color))
            .transpose()
            .map_err(|err| format!("Invalid background color in config: {err}"))
    }

    /// Builds the text definition used for all diagram text.
    pub fn text_definition(&self) -> TextDefinition {
        let mut text = TextDefinition::new();
        if let Some(family) = &self.font_family {
            text.set_font_family(family);
        }
        if let Some(size) = self.font_size {
            text.set_font_size(size);
        }
        text
    }
}
