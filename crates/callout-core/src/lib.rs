//! Callout Core Types and Definitions
//!
//! This crate provides the foundational types shared by the Callout crates:
//!
//! - **Geometry**: points, sizes, bounds and insets ([`geometry`] module)
//! - **Colors**: CSS color parsing ([`color::Color`])
//! - **Draw**: layered SVG output, strokes and measured text ([`draw`] module)

pub mod color;
pub mod draw;
pub mod geometry;
