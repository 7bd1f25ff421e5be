//! Command-line argument definitions for the Callout CLI.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`]. Arguments control input/output paths, configuration file
//! selection, logging verbosity, and the highlight baked into the output.

use clap::Parser;

/// Command-line arguments for the Callout renderer
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the input scene file (TOML)
    #[arg(help = "Path to the input scene")]
    pub input: String,

    /// Path to the output SVG file
    #[arg(short, long, default_value = "out.svg")]
    pub output: String,

    /// Path to configuration file (TOML)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,

    /// Legend index to render highlighted
    #[arg(long, value_name = "INDEX", conflicts_with = "hover")]
    pub highlight: Option<usize>,

    /// Simulate a pointer at `X,Y` and render the resulting highlight
    #[arg(long, value_name = "X,Y", value_parser = parse_point)]
    pub hover: Option<(f32, f32)>,
}

/// Parses `X,Y` into a pair of coordinates.
fn parse_point(value: &str) -> Result<(f32, f32), String> {
    let (x, y) = value
        .split_once(',')
        .ok_or_else(|| format!("expected X,Y but got `{value}`"))?;

    let coordinate = |s: &str| {
        s.trim()
            .parse::<f32>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(|| format!("`{}` is not a valid coordinate", s.trim()))
    };

    Ok((coordinate(x)?, coordinate(y)?))
}
