//! Parser infrastructure for condition, term and projection text.
//!
//! The parser consumes the token stream produced by the lexer and builds the AST by
//! recursive descent. Parsing is one-shot: the first syntax error aborts and is returned.
//!
//! All grammar functions read tokens through [`TokenCursor`](base::TokenCursor), which
//! lets CASE clauses run the ordinary chain parser on a bounded view of the stream.

pub mod base;
mod case;
mod conditional;
mod formula;
mod function;
mod projection;
mod term;

use std::sync::LazyLock;

use tracing::debug;

use crate::ast::{ConditionalContainer, ConditionalTerm, Projection, ProjectionEntry};
use crate::config::ParserConfig;
use crate::error::{ParseError, ParseResult};
use crate::lexer::token::{Token, TokenKind};
use crate::lexer::{LexerResult, tokenize};
use base::{TokenCursor, TokenStream};
use projection::{EntryTokens, extract_alias, split_projection};
use term::unexpected_token;

/// Recursive-descent state for one parse.
pub(crate) struct TermParser<'c> {
    config: &'c ParserConfig,
    depth: usize,
}

impl<'c> TermParser<'c> {
    pub(crate) fn new(config: &'c ParserConfig) -> Self {
        Self { config, depth: 0 }
    }
}

static SHARED: LazyLock<ExpressionParser> = LazyLock::new(ExpressionParser::default);

/// Parses condition, term and projection text under one [`ParserConfig`].
///
/// The parser holds no per-parse state and can be shared between threads.
#[derive(Debug, Clone, Default)]
pub struct ExpressionParser {
    config: ParserConfig,
}

impl ExpressionParser {
    /// Creates a parser with the given configuration.
    pub fn new(config: ParserConfig) -> Self {
        Self { config }
    }

    /// Process-wide parser with the default configuration.
    pub fn shared() -> &'static ExpressionParser {
        &SHARED
    }

    /// The configuration this parser was built with.
    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    /// Parses condition text into a container.
    ///
    /// Empty text yields an empty container. A condition wrapped in one pair of
    /// delimiters yields the inner chain.
    pub fn parse_container(&self, text: &str) -> ParseResult<ConditionalContainer> {
        debug!(length = text.len(), "parsing condition");
        let tokens = lex(text)?;
        let container = self.parse_container_tokens(&tokens)?;
        debug!(terms = container.len(), "parsed condition");
        Ok(container)
    }

    /// Parses an already lexed condition.
    pub fn parse_container_tokens(&self, tokens: &[Token]) -> ParseResult<ConditionalContainer> {
        let mut cursor = TokenStream::new(tokens);
        if cursor.kind() == TokenKind::Eof {
            return Ok(ConditionalContainer::new());
        }

        let container = TermParser::new(&self.config).parse_chain(&mut cursor, true)?;
        expect_end(&cursor)?;
        Ok(ConditionalContainer::from(container.into_term()))
    }

    /// Parses text into a single term.
    ///
    /// A chain of several conditionals comes back as a container term.
    pub fn parse_term(&self, text: &str) -> ParseResult<ConditionalTerm> {
        debug!(length = text.len(), "parsing term");
        let tokens = lex(text)?;
        self.parse_term_tokens(&tokens)
    }

    /// Parses an already lexed term.
    pub fn parse_term_tokens(&self, tokens: &[Token]) -> ParseResult<ConditionalTerm> {
        let mut cursor = TokenStream::new(tokens);
        let container = TermParser::new(&self.config).parse_chain(&mut cursor, true)?;
        expect_end(&cursor)?;
        Ok(container.into_term())
    }

    /// Parses a comma-separated projection list.
    pub fn parse_projection(&self, text: &str) -> ParseResult<Projection> {
        debug!(length = text.len(), "parsing projection");
        let tokens = lex(text)?;
        let projection = self.parse_projection_tokens(&tokens)?;
        debug!(entries = projection.len(), "parsed projection");
        Ok(projection)
    }

    /// Parses an already lexed projection list.
    pub fn parse_projection_tokens(&self, tokens: &[Token]) -> ParseResult<Projection> {
        let end = source_end(tokens);
        let entries = split_projection(tokens)
            .into_iter()
            .map(|entry| self.parse_entry(entry, end))
            .collect::<ParseResult<Vec<_>>>()?;
        Ok(Projection::new(entries))
    }

    /// Parses exactly one projection entry.
    pub fn parse_projection_entry(&self, text: &str) -> ParseResult<ProjectionEntry> {
        debug!(length = text.len(), "parsing projection entry");
        let tokens = lex(text)?;
        self.parse_projection_entry_tokens(&tokens)
    }

    /// Parses one already lexed projection entry.
    pub fn parse_projection_entry_tokens(&self, tokens: &[Token]) -> ParseResult<ProjectionEntry> {
        let end = source_end(tokens);
        let mut entries = split_projection(tokens).into_iter();
        let Some(first) = entries.next() else {
            return Err(ParseError::at("expected projection entry", end));
        };
        if let Some(separator) = &first.separator {
            return Err(unexpected_token(separator));
        }
        self.parse_entry(first, end)
    }

    fn parse_entry(&self, entry: EntryTokens, end: usize) -> ParseResult<ProjectionEntry> {
        let Some(start) = entry.tokens.first().map(Token::offset) else {
            let position = entry.separator.as_ref().map_or(end, Token::offset);
            return Err(ParseError::at("expected projection entry", position));
        };

        let (tokens, alias) = extract_alias(entry.tokens, self.config.implicit_alias)?;
        if tokens.is_empty() {
            return Err(ParseError::at("expected expression", start));
        }

        let term = self.parse_term_tokens(&tokens)?;
        Ok(match alias {
            Some(alias) => ProjectionEntry::aliased(term, alias),
            None => ProjectionEntry::new(term),
        })
    }
}

/// Lexes `text`, failing on the first lexical error.
fn lex(text: &str) -> ParseResult<Vec<Token>> {
    let LexerResult {
        tokens,
        diagnostics,
    } = tokenize(text);
    match diagnostics.first() {
        Some(diag) => Err(ParseError::from_diag(diag)),
        None => Ok(tokens),
    }
}

fn source_end(tokens: &[Token]) -> usize {
    tokens.last().map_or(0, |token| token.span.end)
}

fn expect_end(cursor: &dyn TokenCursor) -> ParseResult<()> {
    if cursor.kind() == TokenKind::Eof {
        return Ok(());
    }
    let token = cursor.current();
    Err(ParseError::new(
        format!("unexpected trailing token '{}'", token.text),
        token.span.clone(),
    ))
}
