//! Token types and representations for condition lexing.

use crate::ast::Span;
use smol_str::SmolStr;
use std::fmt;

/// The kind of a lexical token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // Keywords
    And,
    Or,
    Not,
    In,
    Is,
    Like,
    Null,
    True,
    False,
    Case,
    When,
    Then,
    Else,
    End,
    Exists,
    Distinct,
    As,
    Select,

    // Leaves
    Identifier,
    QuotedIdentifier,
    StringLiteral,
    NumberLiteral,
    Variable,

    // Comparison operators
    Eq,
    NotEq,
    NotEqBang,
    Lt,
    Gt,
    LtEq,
    GtEq,

    // Arithmetic operators
    Plus,
    Minus,
    Star,
    Slash,
    Percent,

    // Punctuation
    LParen,
    RParen,
    LBrace,
    RBrace,
    Comma,
    Dot,

    // Special
    Eof,
}

impl TokenKind {
    /// Returns true if this token kind is a keyword.
    pub fn is_keyword(&self) -> bool {
        matches!(
            self,
            TokenKind::And
                | TokenKind::Or
                | TokenKind::Not
                | TokenKind::In
                | TokenKind::Is
                | TokenKind::Like
                | TokenKind::Null
                | TokenKind::True
                | TokenKind::False
                | TokenKind::Case
                | TokenKind::When
                | TokenKind::Then
                | TokenKind::Else
                | TokenKind::End
                | TokenKind::Exists
                | TokenKind::Distinct
                | TokenKind::As
                | TokenKind::Select
        )
    }

    /// Returns true if this token kind is a literal value.
    pub fn is_literal(&self) -> bool {
        matches!(
            self,
            TokenKind::StringLiteral
                | TokenKind::NumberLiteral
                | TokenKind::Null
                | TokenKind::True
                | TokenKind::False
        )
    }

    /// Returns true for the arithmetic operators `+ - * / %`.
    pub fn is_arithmetic_operator(&self) -> bool {
        matches!(
            self,
            TokenKind::Plus
                | TokenKind::Minus
                | TokenKind::Star
                | TokenKind::Slash
                | TokenKind::Percent
        )
    }

    /// Returns true for operators that join two terms into a conditional.
    pub fn is_conditional_operator(&self) -> bool {
        matches!(
            self,
            TokenKind::Eq
                | TokenKind::NotEq
                | TokenKind::NotEqBang
                | TokenKind::Lt
                | TokenKind::Gt
                | TokenKind::LtEq
                | TokenKind::GtEq
                | TokenKind::In
                | TokenKind::Is
                | TokenKind::Like
        )
    }

    /// Returns true for `AND` / `OR`.
    pub fn is_logical_operator(&self) -> bool {
        matches!(self, TokenKind::And | TokenKind::Or)
    }

    /// Returns true if this token kind is any operator symbol.
    pub fn is_operator(&self) -> bool {
        self.is_arithmetic_operator()
            || matches!(
                self,
                TokenKind::Eq
                    | TokenKind::NotEq
                    | TokenKind::NotEqBang
                    | TokenKind::Lt
                    | TokenKind::Gt
                    | TokenKind::LtEq
                    | TokenKind::GtEq
            )
    }

    /// Returns true for tokens that can name a column.
    pub fn is_identifier(&self) -> bool {
        matches!(self, TokenKind::Identifier | TokenKind::QuotedIdentifier)
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::And => write!(f, "AND"),
            TokenKind::Or => write!(f, "OR"),
            TokenKind::Not => write!(f, "NOT"),
            TokenKind::In => write!(f, "IN"),
            TokenKind::Is => write!(f, "IS"),
            TokenKind::Like => write!(f, "LIKE"),
            TokenKind::Null => write!(f, "NULL"),
            TokenKind::True => write!(f, "TRUE"),
            TokenKind::False => write!(f, "FALSE"),
            TokenKind::Case => write!(f, "CASE"),
            TokenKind::When => write!(f, "WHEN"),
            TokenKind::Then => write!(f, "THEN"),
            TokenKind::Else => write!(f, "ELSE"),
            TokenKind::End => write!(f, "END"),
            TokenKind::Exists => write!(f, "EXISTS"),
            TokenKind::Distinct => write!(f, "DISTINCT"),
            TokenKind::As => write!(f, "AS"),
            TokenKind::Select => write!(f, "SELECT"),
            TokenKind::Identifier => write!(f, "identifier"),
            TokenKind::QuotedIdentifier => write!(f, "quoted identifier"),
            TokenKind::StringLiteral => write!(f, "string literal"),
            TokenKind::NumberLiteral => write!(f, "number"),
            TokenKind::Variable => write!(f, "variable"),
            TokenKind::Eq => write!(f, "="),
            TokenKind::NotEq => write!(f, "<>"),
            TokenKind::NotEqBang => write!(f, "!="),
            TokenKind::Lt => write!(f, "<"),
            TokenKind::Gt => write!(f, ">"),
            TokenKind::LtEq => write!(f, "<="),
            TokenKind::GtEq => write!(f, ">="),
            TokenKind::Plus => write!(f, "+"),
            TokenKind::Minus => write!(f, "-"),
            TokenKind::Star => write!(f, "*"),
            TokenKind::Slash => write!(f, "/"),
            TokenKind::Percent => write!(f, "%"),
            TokenKind::LParen => write!(f, "("),
            TokenKind::RParen => write!(f, ")"),
            TokenKind::LBrace => write!(f, "{{"),
            TokenKind::RBrace => write!(f, "}}"),
            TokenKind::Comma => write!(f, ","),
            TokenKind::Dot => write!(f, "."),
            TokenKind::Eof => write!(f, "<EOF>"),
        }
    }
}

/// Identifier of a bracket group, assigned by [`assign_containers`](super::assign_containers).
pub type ContainerId = u32;

/// A lexical token with its kind, raw text and source span.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// The kind of token.
    pub kind: TokenKind,
    /// The span in source text.
    pub span: Span,
    /// The raw source text of the token.
    pub text: SmolStr,
    /// Innermost bracket group enclosing this token; `None` at top level.
    pub container: Option<ContainerId>,
    /// Set for tokens that were inserted by a pre-pass rather than lexed.
    pub synthetic: bool,
}

impl Token {
    /// Creates a new top-level token.
    pub fn new(kind: TokenKind, span: Span, text: impl Into<SmolStr>) -> Self {
        Self {
            kind,
            span,
            text: text.into(),
            container: None,
            synthetic: false,
        }
    }

    /// Creates a zero-width token that does not come from the source.
    pub fn synthetic(kind: TokenKind, at: usize) -> Self {
        Self {
            kind,
            span: at..at,
            text: SmolStr::new(kind.to_string()),
            container: None,
            synthetic: true,
        }
    }

    /// Source offset of the token.
    pub fn offset(&self) -> usize {
        self.span.start
    }

    /// Length of the token in source bytes.
    pub fn len(&self) -> usize {
        self.span.len()
    }

    /// Returns true for zero-width tokens (EOF and synthetic tokens).
    pub fn is_empty(&self) -> bool {
        self.span.is_empty()
    }

    /// Returns the source slice covered by this token.
    pub fn slice<'a>(&self, source: &'a str) -> &'a str {
        &source[self.span.clone()]
    }

    /// Number of source bytes between the end of `self` and the start of `next`.
    pub fn gap_to(&self, next: &Token) -> usize {
        next.span.start.saturating_sub(self.span.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_creation() {
        let token = Token::new(TokenKind::Case, 0..4, "CASE");
        assert_eq!(token.kind, TokenKind::Case);
        assert_eq!(token.span, 0..4);
        assert_eq!(token.text, "CASE");
        assert_eq!(token.container, None);
        assert!(!token.synthetic);
    }

    #[test]
    fn synthetic_tokens_are_zero_width() {
        let token = Token::synthetic(TokenKind::LParen, 7);
        assert!(token.synthetic);
        assert!(token.is_empty());
        assert_eq!(token.text, "(");
        assert_eq!(token.offset(), 7);
    }

    #[test]
    fn token_kind_classes() {
        assert!(TokenKind::And.is_keyword());
        assert!(!TokenKind::Identifier.is_keyword());
        assert!(TokenKind::Percent.is_arithmetic_operator());
        assert!(!TokenKind::Eq.is_arithmetic_operator());
        assert!(TokenKind::In.is_conditional_operator());
        assert!(TokenKind::LtEq.is_conditional_operator());
        assert!(TokenKind::Null.is_literal());
        assert!(TokenKind::Or.is_logical_operator());
        assert!(TokenKind::QuotedIdentifier.is_identifier());
    }

    #[test]
    fn gap_measures_whitespace() {
        let price = Token::new(TokenKind::Identifier, 0..5, "price");
        let total = Token::new(TokenKind::Identifier, 6..11, "total");
        assert_eq!(price.gap_to(&total), 1);
        assert_eq!(total.gap_to(&price), 0);
    }

    #[test]
    fn token_kind_display() {
        assert_eq!(TokenKind::Case.to_string(), "CASE");
        assert_eq!(TokenKind::NotEq.to_string(), "<>");
        assert_eq!(TokenKind::Eof.to_string(), "<EOF>");
    }
}
