//! Shared parser infrastructure for token stream navigation.
//!
//! Every parsing routine takes the cursor as `&mut dyn TokenCursor`, so the same routine
//! runs on the plain [`TokenStream`] and on bounded sub-cursors such as the CASE scanner.

use crate::ast::{Span, merge_spans};
use crate::error::ParseError;
use crate::lexer::token::{Token, TokenKind};

/// Forward-only cursor with one token of lookahead.
pub trait TokenCursor {
    /// Returns the current token.
    ///
    /// At a sub-range boundary this is the raw stop token, while [`kind`](Self::kind)
    /// already reports [`TokenKind::Eof`].
    fn current(&self) -> &Token;

    /// Returns the kind of the current token; `Eof` at the end of the visible range.
    fn kind(&self) -> TokenKind {
        self.current().kind
    }

    /// Returns the token after the current one, ignoring range boundaries.
    fn peek(&self) -> Option<&Token>;

    /// Kind of [`peek`](Self::peek), `Eof` past the end.
    fn peek_kind(&self) -> TokenKind {
        self.peek().map_or(TokenKind::Eof, |token| token.kind)
    }

    /// Advances to the next token. Does nothing at the end of the visible range.
    fn advance(&mut self);

    /// Checks if the current token matches the given kind.
    fn check(&self, kind: TokenKind) -> bool {
        self.kind() == kind
    }

    /// Consumes the current token if it matches the given kind.
    fn consume(&mut self, kind: TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Creates an error at the current token position.
    fn error_here(&self, message: String) -> ParseError {
        ParseError::new(message, self.current().span.clone())
    }
}

/// Token stream navigator over a token slice.
pub struct TokenStream<'a> {
    tokens: &'a [Token],
    pos: usize,
    eof: Token,
}

impl<'a> TokenStream<'a> {
    /// Creates a new token stream from a token slice.
    ///
    /// The slice does not need a trailing EOF token; one is synthesised after the last token.
    pub fn new(tokens: &'a [Token]) -> Self {
        let end = tokens.last().map_or(0, |token| token.span.end);
        Self {
            tokens,
            pos: 0,
            eof: Token::new(TokenKind::Eof, end..end, ""),
        }
    }

    /// Returns the current position in the token stream.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Returns a reference to the underlying token slice.
    pub fn tokens(&self) -> &'a [Token] {
        self.tokens
    }
}

impl TokenCursor for TokenStream<'_> {
    fn current(&self) -> &Token {
        self.tokens.get(self.pos).unwrap_or(&self.eof)
    }

    fn peek(&self) -> Option<&Token> {
        if self.kind() == TokenKind::Eof {
            return None;
        }
        self.tokens.get(self.pos + 1).or(Some(&self.eof))
    }

    fn advance(&mut self) {
        if self
            .tokens
            .get(self.pos)
            .is_some_and(|token| token.kind != TokenKind::Eof)
        {
            self.pos += 1;
        }
    }
}

/// Returns true for tokens that may follow a dot in a qualified name.
pub(crate) fn is_name_part(kind: TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::Identifier | TokenKind::QuotedIdentifier | TokenKind::Star
    )
}

/// Fuses `owner` `.` `name` into one identifier token covering both.
pub(crate) fn fuse_qualified(owner: &Token, name: &Token) -> Token {
    let span: Span = merge_spans(&owner.span, &name.span);
    let mut fused = Token::new(
        TokenKind::Identifier,
        span,
        format!("{}.{}", owner.text, name.text),
    );
    fused.container = owner.container;
    fused
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::tokenize;

    #[test]
    fn stream_stops_at_eof() {
        let result = tokenize("a b");
        let mut stream = TokenStream::new(&result.tokens);

        assert_eq!(stream.kind(), TokenKind::Identifier);
        assert_eq!(stream.peek_kind(), TokenKind::Identifier);
        stream.advance();
        stream.advance();
        assert_eq!(stream.kind(), TokenKind::Eof);
        assert_eq!(stream.peek(), None);
        stream.advance();
        assert_eq!(stream.kind(), TokenKind::Eof);
        assert_eq!(stream.current().span, 3..3);
    }

    #[test]
    fn stream_without_trailing_eof() {
        let tokens = vec![Token::new(TokenKind::Identifier, 4..9, "price")];
        let mut stream = TokenStream::new(&tokens);

        assert_eq!(stream.peek_kind(), TokenKind::Eof);
        assert!(stream.consume(TokenKind::Identifier));
        assert_eq!(stream.kind(), TokenKind::Eof);
        assert_eq!(stream.current().span, 9..9);
        assert_eq!(stream.position(), 1);
    }

    #[test]
    fn empty_stream() {
        let stream = TokenStream::new(&[]);
        assert_eq!(stream.kind(), TokenKind::Eof);
        assert_eq!(stream.error_here("expected expression".into()).position, 0);
    }

    #[test]
    fn fuse_keeps_both_parts() {
        let owner = Token::new(TokenKind::Identifier, 0..1, "t");
        let name = Token::new(TokenKind::QuotedIdentifier, 2..9, "\"price\"");
        let fused = fuse_qualified(&owner, &name);

        assert_eq!(fused.kind, TokenKind::Identifier);
        assert_eq!(fused.text, "t.\"price\"");
        assert_eq!(fused.span, 0..9);
    }
}
