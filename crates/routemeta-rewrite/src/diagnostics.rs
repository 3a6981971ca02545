//! Ariadne rendering of rewrite failures.

use std::ops::Range;

use ariadne::{Color, Config, Label, Report, ReportKind, Source};
use routemeta_typeck::diagnostics::DiagnosticOptions;

use crate::error::RewriteError;

fn label_message(err: &RewriteError) -> String {
    match err {
        RewriteError::MultipleOrMissingExports { .. } => "another default export".to_string(),
        RewriteError::MalformedExport { .. } => "expected `export default <name>`".to_string(),
        RewriteError::UnresolvedExport { .. } => "no value declaration".to_string(),
        RewriteError::WrongExportType { found, .. } => format!("this has type `{}`", found),
        RewriteError::MissingRegistrationMethod { method, .. } => {
            format!("no `{}` on this value", method)
        }
        RewriteError::ArityError { expected, found, .. } => {
            format!("expected {}, found {}", expected, found)
        }
        RewriteError::AmbiguousSignature { .. } => "handler defined here".to_string(),
        RewriteError::UnsupportedHandlerShape { .. } => "not an inline function".to_string(),
        RewriteError::UnsupportedTypeShape { ty, .. } => format!("this has type `{}`", ty),
        RewriteError::MalformedNode { .. } => "unexpected shape".to_string(),
    }
}

/// Render one rewrite failure as an error report, or as one JSON line
/// with `json` set.
pub fn render_rewrite_error(
    error: &RewriteError,
    source: &str,
    filename: &str,
    options: &DiagnosticOptions,
) -> String {
    let range: Option<Range<usize>> = error.span().map(|span| {
        let start = usize::from(span.start()).min(source.len());
        let end = usize::from(span.end()).min(source.len()).max(start);
        start..end
    });
    let code = error.code();
    let message = error.to_string();

    if options.json {
        let spans: Vec<serde_json::Value> = range
            .iter()
            .map(|r| {
                serde_json::json!({
                    "start": r.start,
                    "end": r.end,
                    "label": label_message(error),
                })
            })
            .collect();
        let diag = serde_json::json!({
            "code": code,
            "severity": "error",
            "message": message,
            "file": filename,
            "spans": spans,
            "fix": null
        });
        return format!("{}\n", diag);
    }

    let config = Config::default().with_color(options.color);
    let mut report = Report::build(ReportKind::Error, range.clone().unwrap_or(0..0))
        .with_code(code)
        .with_message(&message)
        .with_config(config);
    if let Some(range) = range {
        report = report.with_label(
            Label::new(range)
                .with_message(label_message(error))
                .with_color(Color::Red),
        );
    }

    let mut buf = Vec::new();
    if report.finish().write(Source::from(source), &mut buf).is_err() {
        return format!("error[{}]: {}\n", code, message);
    }
    String::from_utf8_lossy(&buf).into_owned()
}
