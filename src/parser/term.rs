//! Term parsing: negation, CASE, groups, sub-queries, calls and leaves.

use smol_str::SmolStr;

use crate::ast::{Column, ConditionalTerm, Constant, Span, Subquery, Variable};
use crate::config::{ContainerDelimiter, LeafKind};
use crate::error::{ParseError, ParseResult};
use crate::lexer::token::{Token, TokenKind};
use crate::parser::TermParser;
use crate::parser::base::{TokenCursor, fuse_qualified, is_name_part};

impl TermParser<'_> {
    /// Parses one term.
    pub(crate) fn parse_term(
        &mut self,
        cursor: &mut dyn TokenCursor,
    ) -> ParseResult<ConditionalTerm> {
        self.nested(cursor, |parser, cursor| parser.parse_term_inner(cursor))
    }

    fn parse_term_inner(&mut self, cursor: &mut dyn TokenCursor) -> ParseResult<ConditionalTerm> {
        let kind = cursor.kind();
        match kind {
            TokenKind::Minus => self.parse_negation(cursor),
            TokenKind::Case => self.parse_case(cursor),
            TokenKind::Star => {
                cursor.advance();
                Ok(ConditionalTerm::column("*"))
            }
            TokenKind::Eof => Err(cursor.error_here("expected expression".to_string())),
            _ => match self.config.delimiter_opened_by(kind) {
                Some(delimiter) => self.parse_group(cursor, delimiter),
                None => self.parse_leaf(cursor),
            },
        }
    }

    /// `-` term. A minus directly in front of a number becomes part of the literal.
    fn parse_negation(&mut self, cursor: &mut dyn TokenCursor) -> ParseResult<ConditionalTerm> {
        cursor.advance();
        match cursor.kind() {
            TokenKind::Eof => Err(cursor.error_here("expected expression after minus".to_string())),
            TokenKind::NumberLiteral => {
                let text = format!("-{}", cursor.current().text);
                cursor.advance();
                Ok(ConditionalTerm::Constant(Constant::new(text)))
            }
            _ => {
                let operand = self.parse_term(cursor)?;
                Ok(ConditionalTerm::Negated(Box::new(operand)))
            }
        }
    }

    /// A delimited group: a sub-query or a nested container.
    fn parse_group(
        &mut self,
        cursor: &mut dyn TokenCursor,
        delimiter: ContainerDelimiter,
    ) -> ParseResult<ConditionalTerm> {
        let opened = cursor.current().span.clone();
        cursor.advance();

        if cursor.check(TokenKind::Select) {
            return self.parse_subquery(cursor, delimiter, opened);
        }

        let container = self.parse_chain(cursor, true)?;
        if !cursor.consume(delimiter.close) {
            return Err(unclosed(cursor, delimiter, opened));
        }
        Ok(container.into_term())
    }

    /// Captures the tokens of a sub-query up to the matching close delimiter.
    fn parse_subquery(
        &mut self,
        cursor: &mut dyn TokenCursor,
        delimiter: ContainerDelimiter,
        opened: Span,
    ) -> ParseResult<ConditionalTerm> {
        let mut text = String::new();
        let mut previous: Option<Token> = None;
        let mut depth = 0usize;

        loop {
            let kind = cursor.kind();
            if kind == TokenKind::Eof {
                return Err(unclosed(cursor, delimiter, opened));
            }
            if kind == delimiter.close {
                if depth == 0 {
                    break;
                }
                depth -= 1;
            } else if kind == delimiter.open {
                depth += 1;
            }

            let token = cursor.current().clone();
            if let Some(previous) = &previous {
                if previous.gap_to(&token) > 0 {
                    text.push(' ');
                }
            }
            text.push_str(&token.text);
            previous = Some(token);
            cursor.advance();
        }
        cursor.advance();

        Ok(ConditionalTerm::Subquery(Subquery::new(text)))
    }

    /// Column, variable or constant; a name followed by `(` starts a function call.
    fn parse_leaf(&mut self, cursor: &mut dyn TokenCursor) -> ParseResult<ConditionalTerm> {
        let mut token = cursor.current().clone();
        cursor.advance();

        if token.kind.is_identifier() {
            while cursor.check(TokenKind::Dot) && is_name_part(cursor.peek_kind()) {
                cursor.advance();
                token = fuse_qualified(&token, cursor.current());
                cursor.advance();
            }

            if cursor.check(TokenKind::LParen) {
                let callee = Column::from_qualified_text(&token.text);
                return self.parse_function_call(cursor, callee);
            }
        }

        match self.config.classifier.classify(&token) {
            Some(LeafKind::Column) => Ok(ConditionalTerm::Column(Column::from_qualified_text(
                &token.text,
            ))),
            Some(LeafKind::Variable) => Ok(ConditionalTerm::Variable(Variable::new(
                token.text.clone(),
            ))),
            Some(LeafKind::Constant) => Ok(ConditionalTerm::Constant(Constant::new(
                token.text.clone(),
            ))),
            None => Err(unexpected_token(&token)),
        }
    }

    /// Runs `parse` one nesting level deeper, failing past the configured limit.
    pub(crate) fn nested<T>(
        &mut self,
        cursor: &mut dyn TokenCursor,
        parse: impl FnOnce(&mut Self, &mut dyn TokenCursor) -> ParseResult<T>,
    ) -> ParseResult<T> {
        if self.depth >= self.config.max_depth {
            return Err(cursor.error_here(format!(
                "expression nesting exceeds maximum depth of {}",
                self.config.max_depth
            )));
        }

        self.depth += 1;
        let result = parse(self, cursor);
        self.depth -= 1;
        result
    }
}

fn unclosed_message(delimiter: ContainerDelimiter) -> String {
    format!(
        "expected '{}' to close '{}'",
        delimiter.close, delimiter.open
    )
}

/// Error for a group whose close delimiter is missing, pointing back at its opener.
pub(crate) fn unclosed(
    cursor: &dyn TokenCursor,
    delimiter: ContainerDelimiter,
    opened: Span,
) -> ParseError {
    cursor
        .error_here(unclosed_message(delimiter))
        .with_context(opened, format!("'{}' opened here", delimiter.open))
}

pub(crate) fn unexpected_token(token: &Token) -> ParseError {
    let text: SmolStr = if token.text.is_empty() {
        SmolStr::new(token.kind.to_string())
    } else {
        token.text.clone()
    };
    ParseError::new(format!("unexpected token '{text}'"), token.span.clone())
}
