//! Ariadne-based rendering of type errors.
//!
//! Each error becomes one labeled report. With `json` set the output is a
//! single JSON object per error instead, the shape the driver prints one
//! line at a time.

use std::ops::Range;

use ariadne::{Color, Config, Label, Report, ReportKind, Source};

use crate::error::TypeError;

/// How diagnostics are rendered.
#[derive(Clone, Copy, Debug)]
pub struct DiagnosticOptions {
    pub color: bool,
    pub json: bool,
}

impl DiagnosticOptions {
    /// Plain text without ANSI escapes, for tests and piped output.
    pub fn colorless() -> Self {
        DiagnosticOptions {
            color: false,
            json: false,
        }
    }
}

impl Default for DiagnosticOptions {
    fn default() -> Self {
        DiagnosticOptions {
            color: true,
            json: false,
        }
    }
}

pub fn error_code(err: &TypeError) -> &'static str {
    match err {
        TypeError::UnresolvedName { .. } => "T0001",
        TypeError::UnresolvedType { .. } => "T0002",
        TypeError::UnknownProperty { .. } => "T0003",
        TypeError::NotCallable { .. } => "T0004",
        TypeError::NotConstructable { .. } => "T0005",
        TypeError::TypeArgumentCount { .. } => "T0006",
    }
}

fn text_range_to_range(range: rowan::TextRange) -> Range<usize> {
    let start: usize = range.start().into();
    let end: usize = range.end().into();
    start..end
}

fn label_message(err: &TypeError) -> String {
    match err {
        TypeError::UnresolvedName { .. } => "not found in this scope".to_string(),
        TypeError::UnresolvedType { .. } => "no type with this name".to_string(),
        TypeError::UnknownProperty { ty, .. } => format!("not a member of `{}`", ty),
        TypeError::NotCallable { ty, .. } => format!("this has type `{}`", ty),
        TypeError::NotConstructable { ty, .. } => format!("this has type `{}`", ty),
        TypeError::TypeArgumentCount { expected, .. } => {
            format!("expected {} type arguments", expected)
        }
    }
}

/// Render one type error. Type errors never stop the rewrite, so they are
/// reported as warnings.
pub fn render_diagnostic(
    error: &TypeError,
    source: &str,
    filename: &str,
    options: &DiagnosticOptions,
) -> String {
    let clamp = |r: Range<usize>| -> Range<usize> {
        let start = r.start.min(source.len());
        let end = r.end.min(source.len()).max(start);
        start..end
    };
    let range = clamp(text_range_to_range(error.span()));
    let code = error_code(error);
    let message = error.to_string();

    if options.json {
        let diag = serde_json::json!({
            "code": code,
            "severity": "warning",
            "message": message,
            "file": filename,
            "spans": [{
                "start": range.start,
                "end": range.end,
                "label": label_message(error),
            }],
            "fix": null
        });
        return format!("{}\n", diag);
    }

    let config = Config::default().with_color(options.color);
    let report = Report::build(ReportKind::Warning, range.clone())
        .with_code(code)
        .with_message(&message)
        .with_config(config)
        .with_label(
            Label::new(range)
                .with_message(label_message(error))
                .with_color(Color::Yellow),
        )
        .finish();

    let mut buf = Vec::new();
    if report.write(Source::from(source), &mut buf).is_err() {
        return format!("warning[{}]: {}\n", code, message);
    }
    String::from_utf8_lossy(&buf).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unresolved() -> TypeError {
        TypeError::UnresolvedName {
            name: "nope".to_string(),
            span: rowan::TextRange::new(8.into(), 12.into()),
        }
    }

    #[test]
    fn renders_code_message_and_label() {
        let out = render_diagnostic(&unresolved(), "let x = nope;", "main.ts", &DiagnosticOptions::colorless());
        assert!(out.contains("T0001"), "{}", out);
        assert!(out.contains("cannot find name `nope`"), "{}", out);
        assert!(out.contains("not found in this scope"), "{}", out);
    }

    #[test]
    fn renders_json_line() {
        let opts = DiagnosticOptions {
            color: false,
            json: true,
        };
        let out = render_diagnostic(&unresolved(), "let x = nope;", "main.ts", &opts);
        let value: serde_json::Value = serde_json::from_str(out.trim()).unwrap();
        assert_eq!(value["code"], "T0001");
        assert_eq!(value["severity"], "warning");
        assert_eq!(value["file"], "main.ts");
        assert_eq!(value["spans"][0]["start"], 8);
        assert_eq!(value["spans"][0]["end"], 12);
    }

    #[test]
    fn clamps_spans_past_the_end() {
        let err = TypeError::UnresolvedType {
            name: "T".to_string(),
            span: rowan::TextRange::new(3.into(), 40.into()),
        };
        let opts = DiagnosticOptions {
            color: false,
            json: true,
        };
        let out = render_diagnostic(&err, "abcd", "f.ts", &opts);
        let value: serde_json::Value = serde_json::from_str(out.trim()).unwrap();
        assert_eq!(value["spans"][0]["end"], 4);
    }
}
