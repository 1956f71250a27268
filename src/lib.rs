//! Parser and AST for SQL-like conditions and projection lists.
//!
//! This library turns the condition and projection fragments of a query builder into a
//! typed tree: AND/OR chains, comparisons, `IN` lists, arithmetic formulas, `CASE`
//! expressions and function calls. Trees render back to canonical text, can be cloned and
//! reused as templates, and carry bound parameter values for their variables.
//!
//! Syntax errors come back as a [`ParseError`] with the offending source offset; rich
//! reports are available through miette.
//!
//! # Example
//!
//! ```
//! use condition_parser::{ConditionalTerm, parse_container, parse_projection};
//!
//! let mut condition = parse_container("status = @status AND total > 100").unwrap();
//! assert_eq!(condition.len(), 2);
//!
//! condition.bind("status", "'open'").unwrap();
//! assert_eq!(condition.resolved().to_text(), "status = 'open' AND total > 100");
//!
//! let projection = parse_projection("id, price * qty AS amount, name label").unwrap();
//! assert_eq!(projection.len(), 3);
//! assert_eq!(projection.to_text(), "id, price * qty AS amount, name AS label");
//! assert!(matches!(projection.find("LABEL").map(|e| &e.term), Some(ConditionalTerm::Column(_))));
//! ```

pub mod ast;
pub mod config;
pub mod diag;
pub mod error;
pub mod lexer;
pub mod parser;

pub use ast::{
    ArithmeticOperator, CaseConditional, Column, Conditional, ConditionalContainer,
    ConditionalTerm, Constant, Formula, FunctionCall, LogicalOperator, Operator, ParameterError,
    Parameters, Projection, ProjectionEntry, Span, Subquery, ValuesArray, Variable,
};
pub use config::{ContainerDelimiter, DefaultClassifier, LeafKind, ParserConfig, TermClassifier};
pub use diag::{Diag, DiagLabel};
pub use error::{ParseError, ParseResult};
pub use lexer::token::{Token, TokenKind};
pub use lexer::{Lexer, LexerResult, tokenize};
pub use parser::ExpressionParser;

/// Parses condition text into an AND/OR chain with the default configuration.
pub fn parse_container(text: &str) -> ParseResult<ConditionalContainer> {
    ExpressionParser::shared().parse_container(text)
}

/// Parses text into a single term with the default configuration.
pub fn parse_term(text: &str) -> ParseResult<ConditionalTerm> {
    ExpressionParser::shared().parse_term(text)
}

/// Parses a projection list with the default configuration.
pub fn parse_projection(text: &str) -> ParseResult<Projection> {
    ExpressionParser::shared().parse_projection(text)
}

/// Parses a single projection entry with the default configuration.
pub fn parse_projection_entry(text: &str) -> ParseResult<ProjectionEntry> {
    ExpressionParser::shared().parse_projection_entry(text)
}
