//! Error adapter for converting CalloutError to miette diagnostics.
//!
//! Scene errors keep the scene source and the span reported by the TOML
//! parser, so they are rendered as a source snippet with a label. All other
//! variants are rendered as plain reports with a `callout::*` code.

use std::{fmt, ops::Range};

use miette::{Diagnostic as MietteDiagnostic, LabeledSpan, SourceSpan};

use callout::CalloutError;

/// Adapter for a scene that failed to parse or deserialize.
pub struct SceneDiagnostic<'a> {
    err: &'a toml::de::Error,
    src: &'a str,
}

impl<'a> SceneDiagnostic<'a> {
    pub fn new(err: &'a toml::de::Error, src: &'a str) -> Self {
        Self { err, src }
    }
}

impl fmt::Debug for SceneDiagnostic<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SceneDiagnostic")
            .field("err", &self.err)
            .finish()
    }
}

impl fmt::Display for SceneDiagnostic<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.err.message().trim_end())
    }
}

impl std::error::Error for SceneDiagnostic<'_> {}

impl MietteDiagnostic for SceneDiagnostic<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        Some(Box::new("callout::scene"))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        Some(Box::new(
            "scene nodes are tables with a `kind` such as fill, stripes, text, h_stack, v_stack, frame, padding, border or legend",
        ))
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        Some(&self.src as &dyn miette::SourceCode)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        let span = self.err.span()?;
        let label =
            LabeledSpan::new_primary_with_span(Some("here".to_string()), span_to_miette(span));
        Some(Box::new(std::iter::once(label)))
    }
}

/// Adapter for non-diagnostic [`CalloutError`] variants.
pub struct ErrorAdapter<'a>(pub &'a CalloutError);

impl fmt::Debug for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl fmt::Display for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl std::error::Error for ErrorAdapter<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.0.source()
    }
}

impl MietteDiagnostic for ErrorAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let code = match &self.0 {
            CalloutError::Io(_) => "callout::io",
            CalloutError::Scene { .. } => "callout::scene",
            CalloutError::Config(_) => "callout::config",
            CalloutError::Layout(_) => "callout::layout",
            CalloutError::Export(_) => "callout::export",
        };
        Some(Box::new(code))
    }
}

/// A reportable error that can be rendered by miette.
#[derive(Debug)]
pub enum Reportable<'a> {
    /// A scene error with source location information.
    Scene(SceneDiagnostic<'a>),
    /// A simple error without source location.
    Error(ErrorAdapter<'a>),
}

impl fmt::Display for Reportable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reportable::Scene(d) => fmt::Display::fmt(d, f),
            Reportable::Error(e) => fmt::Display::fmt(e, f),
        }
    }
}

impl std::error::Error for Reportable<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Reportable::Scene(_) => None,
            Reportable::Error(e) => e.source(),
        }
    }
}

impl MietteDiagnostic for Reportable<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match self {
            Reportable::Scene(d) => d.code(),
            Reportable::Error(e) => e.code(),
        }
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match self {
            Reportable::Scene(d) => d.help(),
            Reportable::Error(e) => e.help(),
        }
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        match self {
            Reportable::Scene(d) => d.source_code(),
            Reportable::Error(e) => e.source_code(),
        }
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        match self {
            Reportable::Scene(d) => d.labels(),
            Reportable::Error(e) => e.labels(),
        }
    }
}

fn span_to_miette(span: Range<usize>) -> SourceSpan {
    SourceSpan::new(span.start.into(), span.len())
}

/// Convert a [`CalloutError`] into a reportable error.
pub fn to_reportable(err: &CalloutError) -> Reportable<'_> {
    match err {
        CalloutError::Scene { err, src } => Reportable::Scene(SceneDiagnostic::new(err, src)),
        _ => Reportable::Error(ErrorAdapter(err)),
    }
}

#[cfg(test)]
mod tests {
    use callout::DiagramBuilder;

    use super::*;

    fn scene_error(source: &str) -> CalloutError {
        DiagramBuilder::default().parse(source).unwrap_err()
    }

    #[test]
    fn test_scene_error_has_span() {
        let source = "[root]\nkind = \"fill\"\ncolor = \n";
        let err = scene_error(source);

        let reportable = to_reportable(&err);
        assert!(matches!(reportable, Reportable::Scene(_)));
        assert_eq!(reportable.code().unwrap().to_string(), "callout::scene");

        let labels: Vec<_> = reportable.labels().unwrap().collect();
        assert_eq!(labels.len(), 1);
        assert!(labels[0].primary());
        assert!(labels[0].offset() < source.len());
    }

    #[test]
    fn test_render_scene_report() {
        let err = scene_error("[root\n");
        let reportable = to_reportable(&err);

        let mut out = String::new();
        miette::GraphicalReportHandler::new()
            .render_report(&mut out, &reportable)
            .unwrap();
        assert!(out.contains("callout::scene"));
    }

    #[test]
    fn test_non_scene_error() {
        let err = CalloutError::Layout("bad canvas".to_string());

        let reportable = to_reportable(&err);
        match &reportable {
            Reportable::Error(e) => {
                assert_eq!(e.to_string(), "Layout error: bad canvas");
                assert_eq!(e.code().unwrap().to_string(), "callout::layout");
            }
            Reportable::Scene(_) => panic!("Expected Error"),
        }
        assert!(reportable.labels().is_none());
    }
}
