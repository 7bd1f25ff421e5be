//! CLI logic for the Callout renderer.
//!
//! Loads a TOML scene, lays it out with its legend, optionally applies a
//! highlight, and writes the settled state as SVG.

pub mod error_adapter;

mod args;
mod config;

pub use args::Args;

use std::{
    fs::File,
    io::{BufWriter, Write},
};

use log::{info, warn};

use callout::{CalloutError, DiagramBuilder, anchor::AnchorIndex, geometry::Point};

/// Run the Callout CLI application
///
/// # Errors
///
/// Returns `CalloutError` for:
/// - File I/O errors
/// - Configuration loading errors
/// - Scene parsing errors
/// - Layout errors
/// - Rendering errors
pub fn run(args: &Args) -> Result<(), CalloutError> {
    info!(
        input_path = args.input,
        output_path = args.output;
        "Processing scene"
    );

    let app_config = config::load_config(args.config.as_ref())?;

    let source = std::fs::read_to_string(&args.input)?;

    let builder = DiagramBuilder::new(app_config);
    let scene = builder.parse(&source)?;
    let mut diagram = builder.diagram(&scene)?;

    if let Some(index) = args.highlight {
        let index = AnchorIndex::new(index);
        if !diagram.tree().participants().contains(&index) {
            warn!(index = index.get(); "Highlighted index is not annotated in this scene");
        }
        diagram.highlight().set_highlight(index);
    }

    if let Some((x, y)) = args.hover {
        let hit = diagram.pointer_moved(Point::new(x, y));
        info!(x = x, y = y, hit:?; "Simulated pointer");
    }

    // Render the end state of any transition the highlight started.
    diagram.settle();

    let mut out = BufWriter::new(File::create(&args.output)?);
    diagram.write_svg(&mut out)?;
    out.flush()?;

    info!(output_file = args.output; "SVG exported successfully");

    Ok(())
}
