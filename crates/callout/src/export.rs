//! Export functionality for Callout diagrams.
//!
//! This module provides the [`Exporter`] trait that defines the interface for
//! converting a laid-out diagram into an output format. It is the final stage
//! in the Callout pipeline.
//!
//! # Pipeline Position
//!
//! ```text
//! Scene (TOML or builders)
//!     ↓ layout, anchor aggregation, label placement
//! LayoutTree
//!     + highlight and emphasis state
//!     ↓ export (this module)
//! Output document
//! ```
//!
//! # Available Backends
//!
//! - [`svg`]: SVG output via [`svg::SvgBuilder`] and [`svg::Svg`]
//!
//! # Error Handling
//!
//! Export operations return [`Error`], covering rendering failures and I/O
//! errors. [`Error`] converts into [`CalloutError::Export`] at the crate
//! boundary.
//!
//! [`CalloutError::Export`]: crate::CalloutError::Export

/// SVG export backend.
pub mod svg;

use std::io;

use crate::{anchor::AnchorIndex, emphasis::EmphasisTracker, layout::LayoutTree};

/// Everything an exporter needs to draw one state of a diagram.
#[derive(Debug, Clone, Copy)]
pub struct Snapshot<'a> {
    tree: &'a LayoutTree,
    highlight: Option<AnchorIndex>,
    emphasis: &'a EmphasisTracker,
}

impl<'a> Snapshot<'a> {
    pub fn new(
        tree: &'a LayoutTree,
        highlight: Option<AnchorIndex>,
        emphasis: &'a EmphasisTracker,
    ) -> Self {
        Self {
            tree,
            highlight,
            emphasis,
        }
    }

    pub fn tree(&self) -> &'a LayoutTree {
        self.tree
    }

    pub fn highlight(&self) -> Option<AnchorIndex> {
        self.highlight
    }

    /// Current opacity of the legend participant `index`.
    pub fn opacity(&self, index: AnchorIndex) -> f32 {
        self.emphasis.opacity(index)
    }
}

/// Abstraction for diagram export backends.
pub trait Exporter {
    /// Writes `snapshot` in the backend's output format to `out`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Render`] if the snapshot cannot be converted to the
    /// target format, or [`Error::Io`] if writing the output fails.
    fn export(&mut self, snapshot: &Snapshot<'_>, out: &mut dyn io::Write) -> Result<(), Error>;
}

/// Errors that can occur during diagram export.
///
/// This type is converted into [`CalloutError::Export`] at the crate
/// boundary via the [`From`] implementation in [`crate::error`].
///
/// [`CalloutError::Export`]: crate::CalloutError::Export
#[derive(Debug)]
pub enum Error {
    /// A rendering or conversion failure described by `message`.
    Render(String),
    /// An I/O error encountered while writing output.
    Io(io::Error),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Render(msg) => write!(f, "Render error: {msg}"),
            Self::Io(err) => write!(f, "I/O error: {err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Render(_) => None,
            Self::Io(err) => Some(err),
        }
    }
}
