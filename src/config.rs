//! Parser configuration.

use std::fmt;
use std::sync::Arc;

use crate::lexer::keywords::is_niladic_date_function;
use crate::lexer::token::{Token, TokenKind};

/// Default recursion limit for nested groups, CASE expressions and calls.
pub const DEFAULT_MAX_DEPTH: usize = 128;

/// Pair of token kinds that open and close a parenthesised group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContainerDelimiter {
    pub open: TokenKind,
    pub close: TokenKind,
}

impl ContainerDelimiter {
    /// `(` ... `)`.
    pub const PARENTHESES: ContainerDelimiter = ContainerDelimiter {
        open: TokenKind::LParen,
        close: TokenKind::RParen,
    };

    /// `{` ... `}`.
    pub const BRACES: ContainerDelimiter = ContainerDelimiter {
        open: TokenKind::LBrace,
        close: TokenKind::RBrace,
    };
}

/// Kind of leaf node a token stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeafKind {
    Column,
    Variable,
    Constant,
}

/// Decides which leaf node a token becomes.
///
/// Qualified names reach the classifier already fused into one identifier token
/// (`t.price`). Returning `None` rejects the token as a term.
pub trait TermClassifier: fmt::Debug + Send + Sync {
    fn classify(&self, token: &Token) -> Option<LeafKind>;
}

/// Standard mapping of literal, variable and identifier tokens.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultClassifier;

impl TermClassifier for DefaultClassifier {
    fn classify(&self, token: &Token) -> Option<LeafKind> {
        match token.kind {
            TokenKind::Identifier if is_niladic_date_function(&token.text) => {
                Some(LeafKind::Constant)
            }
            TokenKind::Identifier | TokenKind::QuotedIdentifier => Some(LeafKind::Column),
            TokenKind::Variable => Some(LeafKind::Variable),
            TokenKind::StringLiteral
            | TokenKind::NumberLiteral
            | TokenKind::Null
            | TokenKind::True
            | TokenKind::False => Some(LeafKind::Constant),
            _ => None,
        }
    }
}

/// Configuration of an [`ExpressionParser`](crate::parser::ExpressionParser).
#[derive(Debug, Clone)]
pub struct ParserConfig {
    /// Registered group delimiters.
    pub delimiters: Vec<ContainerDelimiter>,
    /// Maximum nesting depth before parsing fails.
    pub max_depth: usize,
    /// Infer projection aliases written without `AS`.
    pub implicit_alias: bool,
    /// Leaf token classifier.
    pub classifier: Arc<dyn TermClassifier>,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            delimiters: vec![ContainerDelimiter::PARENTHESES],
            max_depth: DEFAULT_MAX_DEPTH,
            implicit_alias: true,
            classifier: Arc::new(DefaultClassifier),
        }
    }
}

impl ParserConfig {
    /// Creates the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an additional group delimiter.
    pub fn with_delimiter(mut self, delimiter: ContainerDelimiter) -> Self {
        if !self.delimiters.contains(&delimiter) {
            self.delimiters.push(delimiter);
        }
        self
    }

    /// Sets the nesting limit.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Enables or disables implicit projection aliases.
    pub fn with_implicit_alias(mut self, enabled: bool) -> Self {
        self.implicit_alias = enabled;
        self
    }

    /// Replaces the leaf classifier.
    pub fn with_classifier(mut self, classifier: impl TermClassifier + 'static) -> Self {
        self.classifier = Arc::new(classifier);
        self
    }

    /// Returns the delimiter opened by `kind`.
    pub fn delimiter_opened_by(&self, kind: TokenKind) -> Option<ContainerDelimiter> {
        self.delimiters
            .iter()
            .copied()
            .find(|delimiter| delimiter.open == kind)
    }
}
