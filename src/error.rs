//! Parse error type shared by all entry points.

use miette::Report;
use thiserror::Error;

use crate::ast::Span;
use crate::diag::{Diag, DiagLabel, convert_diag_to_report};

/// A syntax error with the source offset of the offending token.
///
/// Parsing is one-shot: the first error aborts the parse and is returned to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ParseError {
    /// Human-readable description, e.g. `expected THEN after a = 1`.
    pub message: String,
    /// Source offset of the offending token (`span.start`).
    pub position: usize,
    /// Source span of the offending token; empty at end of input.
    pub span: Span,
    /// Optional suggestion shown with rendered reports.
    pub help: Option<String>,
    /// The construct the error belongs to, e.g. the `CASE` still waiting for its `END`.
    pub context: Option<DiagLabel>,
}

/// Result type for parse operations.
pub type ParseResult<T> = Result<T, ParseError>;

impl ParseError {
    /// Creates an error covering `span`.
    pub fn new(message: impl Into<String>, span: Span) -> Self {
        Self {
            message: message.into(),
            position: span.start,
            span,
            help: None,
            context: None,
        }
    }

    /// Creates a zero-width error at `position`.
    pub fn at(message: impl Into<String>, position: usize) -> Self {
        Self::new(message, position..position)
    }

    /// Attaches a help message.
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    /// Points at the construct the error belongs to.
    pub fn with_context(mut self, span: Span, message: impl Into<String>) -> Self {
        self.context = Some(DiagLabel::new(span, message));
        self
    }

    /// Converts a lexer diagnostic into a parse error at its primary label.
    pub fn from_diag(diag: &Diag) -> Self {
        let span = diag.primary_span().cloned().unwrap_or(0..0);
        let mut error = Self::new(diag.message.clone(), span);
        error.help = diag.help.clone();
        error
    }

    /// Lowers the error into a diagnostic.
    pub fn to_diag(&self) -> Diag {
        let mut diag = Diag::error(self.message.clone())
            .with_primary_label(self.span.clone(), "here")
            .with_code("P001");
        if let Some(help) = &self.help {
            diag = diag.with_help(help.clone());
        }
        if let Some(context) = &self.context {
            diag = diag.with_context_label(context.span.clone(), context.message.clone());
        }
        diag
    }

    /// Renders the error against the parsed source as a miette report.
    pub fn to_report(&self, source: &str) -> Report {
        convert_diag_to_report(&self.to_diag(), source)
    }
}
