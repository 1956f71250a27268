//! Diagnostic model for lexical and syntax errors, rendered through miette.

use crate::ast::Span;
use miette::{Diagnostic, LabeledSpan, Report, Severity};
use std::fmt;

/// A span of the expression text with a short note attached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagLabel {
    pub span: Span,
    pub message: String,
}

impl DiagLabel {
    pub fn new(span: Span, message: impl Into<String>) -> Self {
        Self {
            span,
            message: message.into(),
        }
    }
}

/// A structured error diagnostic.
///
/// The lexer collects these while scanning; parse errors lower into one for rendering.
/// The first label marks the offending token, any further labels add context such as
/// the `CASE` or `(` an error belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diag {
    pub message: String,
    pub labels: Vec<DiagLabel>,
    /// Suggestion rendered below the source snippet.
    pub help: Option<String>,
    /// Stable code, `L…` for the lexer and `P…` for the parser.
    pub code: Option<String>,
}

impl Diag {
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            labels: Vec::new(),
            help: None,
            code: None,
        }
    }

    /// Marks the offending token. Replaces the front of the label list.
    pub fn with_primary_label(mut self, span: Span, message: impl Into<String>) -> Self {
        self.labels.insert(0, DiagLabel::new(span, message));
        self
    }

    /// Adds a context label after the primary one.
    pub fn with_context_label(mut self, span: Span, message: impl Into<String>) -> Self {
        self.labels.push(DiagLabel::new(span, message));
        self
    }

    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    pub fn primary_span(&self) -> Option<&Span> {
        self.labels.first().map(|label| &label.span)
    }
}

/// Restricts `span` to the bounds of `source`, keeping `start <= end`.
pub fn clamp_to_source(span: &Span, source: &str) -> Span {
    let start = span.start.min(source.len());
    let end = span.end.clamp(start, source.len());
    start..end
}

/// Renders a diagnostic against the expression text it was produced for.
///
/// Spans past the end of `source` are clamped, so a report can be built even against a
/// different string than the one that was parsed.
pub fn convert_diag_to_report(diag: &Diag, source: &str) -> Report {
    let labels = diag
        .labels
        .iter()
        .enumerate()
        .map(|(index, label)| {
            let span = clamp_to_source(&label.span, source);
            let offset_len = (span.start, span.len());
            let text = Some(label.message.clone());
            match index {
                0 => LabeledSpan::new_primary_with_span(text, offset_len),
                _ => LabeledSpan::new_with_span(text, offset_len),
            }
        })
        .collect();

    let rendered = ExpressionDiagnostic {
        message: diag.message.clone(),
        code: diag.code.clone(),
        help: diag.help.clone(),
        labels,
    };
    Report::new(rendered).with_source_code(source.to_owned())
}

#[derive(Debug)]
struct ExpressionDiagnostic {
    message: String,
    code: Option<String>,
    help: Option<String>,
    labels: Vec<LabeledSpan>,
}

impl fmt::Display for ExpressionDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for ExpressionDiagnostic {}

impl Diagnostic for ExpressionDiagnostic {
    fn severity(&self) -> Option<Severity> {
        Some(Severity::Error)
    }

    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let code = self.code.as_ref()?;
        Some(Box::new(code) as Box<dyn fmt::Display + 'a>)
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let help = self.help.as_ref()?;
        Some(Box::new(help) as Box<dyn fmt::Display + 'a>)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        (!self.labels.is_empty()).then(|| {
            Box::new(self.labels.iter().cloned()) as Box<dyn Iterator<Item = LabeledSpan> + '_>
        })
    }
}
