//! Lexical analysis for condition text.
//!
//! The lexer turns clause text into a stream of [`Token`]s for the parser. Raw scanning
//! is generated by logos; bare words are then mapped through the keyword table. Like the
//! parser it never stops at the first problem: lexical errors are collected as
//! diagnostics and scanning continues.

pub mod keywords;
pub mod token;

use crate::diag::Diag;
use logos::Logos;
use token::{ContainerId, Token, TokenKind};

/// Result of lexical analysis.
///
/// Contains both the tokens produced and any diagnostics encountered during scanning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexerResult {
    /// The tokens produced, including an EOF token at the end.
    pub tokens: Vec<Token>,
    /// Diagnostics (errors) encountered during lexing.
    pub diagnostics: Vec<Diag>,
}

/// Whether a quoted token found its closing quote.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Termination {
    Closed,
    Unclosed,
}

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(skip r"[ \t\r\n\f]+")]
#[logos(skip r"--[^\n]*")]
#[logos(skip r"/\*([^*]|\*+[^*/])*\*+/")]
enum RawToken {
    #[regex(r"[A-Za-z_][A-Za-z0-9_$#]*")]
    Word,

    #[token("\"", |lex| delimited(lex, b'"'))]
    #[token("`", |lex| delimited(lex, b'`'))]
    #[token("[", |lex| delimited(lex, b']'))]
    QuotedIdentifier(Termination),

    #[token("'", |lex| delimited(lex, b'\''))]
    StringLiteral(Termination),

    #[regex(r"[0-9]+(\.[0-9]+)?([eE][+-]?[0-9]+)?")]
    #[regex(r"\.[0-9]+([eE][+-]?[0-9]+)?")]
    Number,

    #[regex(r"[@:][A-Za-z_][A-Za-z0-9_]*")]
    Variable,

    #[token("=")]
    Eq,
    #[token("<>")]
    NotEq,
    #[token("!=")]
    NotEqBang,
    #[token("<")]
    Lt,
    #[token(">")]
    Gt,
    #[token("<=")]
    LtEq,
    #[token(">=")]
    GtEq,

    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("%")]
    Percent,

    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token(",")]
    Comma,
    #[token(".")]
    Dot,
}

/// Consumes a quoted region up to `close`. A doubled `close` is an escaped quote.
fn delimited(lex: &mut logos::Lexer<'_, RawToken>, close: u8) -> Termination {
    let bytes = lex.remainder().as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == close {
            if bytes.get(i + 1) == Some(&close) {
                i += 2;
                continue;
            }
            lex.bump(i + 1);
            return Termination::Closed;
        }
        i += 1;
    }
    lex.bump(bytes.len());
    Termination::Unclosed
}

/// A lexical analyzer for condition text.
pub struct Lexer<'a> {
    /// The source text being lexed.
    source: &'a str,
    /// Accumulated tokens.
    tokens: Vec<Token>,
    /// Accumulated diagnostics.
    diagnostics: Vec<Diag>,
}

impl<'a> Lexer<'a> {
    /// Creates a new lexer for the given source text.
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            tokens: Vec::new(),
            diagnostics: Vec::new(),
        }
    }

    /// Tokenizes the source text and returns the result.
    ///
    /// The returned tokens end with an EOF token and carry container markers.
    pub fn tokenize(mut self) -> LexerResult {
        let mut raw = RawToken::lexer(self.source);

        while let Some(next) = raw.next() {
            let span = raw.span();
            let text = raw.slice();

            let kind = match next {
                Ok(RawToken::Word) => {
                    keywords::lookup_keyword(text).unwrap_or(TokenKind::Identifier)
                }
                Ok(RawToken::QuotedIdentifier(termination)) => {
                    if termination == Termination::Unclosed {
                        self.error(span.clone(), "unclosed quoted identifier", "L003");
                    }
                    TokenKind::QuotedIdentifier
                }
                Ok(RawToken::StringLiteral(termination)) => {
                    if termination == Termination::Unclosed {
                        self.error(span.clone(), "unclosed string literal", "L002");
                    }
                    TokenKind::StringLiteral
                }
                Ok(RawToken::Number) => TokenKind::NumberLiteral,
                Ok(RawToken::Variable) => TokenKind::Variable,
                Ok(RawToken::Eq) => TokenKind::Eq,
                Ok(RawToken::NotEq) => TokenKind::NotEq,
                Ok(RawToken::NotEqBang) => TokenKind::NotEqBang,
                Ok(RawToken::Lt) => TokenKind::Lt,
                Ok(RawToken::Gt) => TokenKind::Gt,
                Ok(RawToken::LtEq) => TokenKind::LtEq,
                Ok(RawToken::GtEq) => TokenKind::GtEq,
                Ok(RawToken::Plus) => TokenKind::Plus,
                Ok(RawToken::Minus) => TokenKind::Minus,
                Ok(RawToken::Star) => TokenKind::Star,
                Ok(RawToken::Slash) => TokenKind::Slash,
                Ok(RawToken::Percent) => TokenKind::Percent,
                Ok(RawToken::LParen) => TokenKind::LParen,
                Ok(RawToken::RParen) => TokenKind::RParen,
                Ok(RawToken::LBrace) => TokenKind::LBrace,
                Ok(RawToken::RBrace) => TokenKind::RBrace,
                Ok(RawToken::Comma) => TokenKind::Comma,
                Ok(RawToken::Dot) => TokenKind::Dot,
                Err(()) => {
                    let message = format!("invalid character '{text}'");
                    self.error(span, &message, "L001");
                    // Error recovery: skip this character and continue
                    continue;
                }
            };

            self.tokens.push(Token::new(kind, span, text));
        }

        // Always add EOF token
        let eof_pos = self.source.len();
        self.tokens
            .push(Token::new(TokenKind::Eof, eof_pos..eof_pos, ""));

        assign_containers(&mut self.tokens);

        LexerResult {
            tokens: self.tokens,
            diagnostics: self.diagnostics,
        }
    }

    fn error(&mut self, span: std::ops::Range<usize>, message: &str, code: &str) {
        self.diagnostics.push(
            Diag::error(message)
                .with_primary_label(span, "here")
                .with_code(code),
        );
    }
}

/// Convenience function to tokenize a source string.
///
/// This is the default token-cursor factory used by the parser entry points.
pub fn tokenize(source: &str) -> LexerResult {
    Lexer::new(source).tokenize()
}

/// Recomputes the container marker of every token from bracket nesting.
///
/// Every bracket pair gets a fresh id. Opening and closing brackets carry the id of the
/// group they delimit, tokens between them carry the id of their innermost group, and
/// tokens outside every group are left at `None`. Unmatched closing brackets are top level.
pub fn assign_containers(tokens: &mut [Token]) {
    let mut open: Vec<ContainerId> = Vec::new();
    let mut next_id: ContainerId = 0;

    for token in tokens.iter_mut() {
        match token.kind {
            TokenKind::LParen | TokenKind::LBrace => {
                let id = next_id;
                next_id += 1;
                token.container = Some(id);
                open.push(id);
            }
            TokenKind::RParen | TokenKind::RBrace => {
                token.container = open.pop();
            }
            _ => {
                token.container = open.last().copied();
            }
        }
    }
}
