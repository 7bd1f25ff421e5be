//! Error types for Callout operations.
//!
//! This module provides the main error type [`CalloutError`] which wraps
//! the error conditions that can occur while loading, laying out and
//! rendering a scene.

use std::io;

use thiserror::Error;

/// The main error type for Callout operations.
///
/// # Diagnostic Variants
///
/// The `Scene` variant keeps the scene source next to the TOML error, so the
/// error span can be reported against the original text.
#[derive(Debug, Error)]
pub enum CalloutError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("{err}")]
    Scene { err: toml::de::Error, src: String },

    #[error("Config error: {0}")]
    Config(String),

    #[error("Layout error: {0}")]
    Layout(String),

    #[error("Export error: {0}")]
    Export(Box<dyn std::error::Error>),
}

impl From<crate::export::Error> for CalloutError {
    fn from(error: crate::export::Error) -> Self {
        Self::Export(Box::new(error))
    }
}

impl CalloutError {
    /// Create a new `Scene` error with the associated source text.
    pub fn new_scene_error(err: toml::de::Error, src: impl Into<String>) -> Self {
        Self::Scene {
            err,
            src: src.into(),
        }
    }
}
