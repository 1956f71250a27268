//! CASE expression parsing.
//!
//! Each clause of a CASE expression is parsed through a [`CaseScanner`], a sub-cursor that
//! reports the clause's stop keywords as end of input. A nested `CASE` opened inside the
//! clause pushes a pending `END`; while anything is pending the stop keywords are ordinary
//! tokens, so the clause parser consumes the whole nested expression.

use crate::ast::{CaseConditional, ConditionalTerm};
use crate::error::ParseResult;
use crate::lexer::token::{Token, TokenKind};
use crate::parser::TermParser;
use crate::parser::base::TokenCursor;

const INPUT_STOPS: &[TokenKind] = &[TokenKind::When];
const CONDITION_STOPS: &[TokenKind] = &[TokenKind::Then];
const RESULT_STOPS: &[TokenKind] = &[
    TokenKind::When,
    TokenKind::Then,
    TokenKind::Else,
    TokenKind::End,
];
const ELSE_STOPS: &[TokenKind] = &[TokenKind::End];

/// Bounded view over another cursor for one CASE clause.
pub(crate) struct CaseScanner<'s> {
    inner: &'s mut dyn TokenCursor,
    stops: &'static [TokenKind],
    pending: Vec<TokenKind>,
}

impl<'s> CaseScanner<'s> {
    pub(crate) fn new(inner: &'s mut dyn TokenCursor, stops: &'static [TokenKind]) -> Self {
        Self {
            inner,
            stops,
            pending: Vec::new(),
        }
    }
}

impl TokenCursor for CaseScanner<'_> {
    fn current(&self) -> &Token {
        self.inner.current()
    }

    fn kind(&self) -> TokenKind {
        let kind = self.inner.kind();
        if self.pending.is_empty() && self.stops.contains(&kind) {
            TokenKind::Eof
        } else {
            kind
        }
    }

    fn peek(&self) -> Option<&Token> {
        self.inner.peek()
    }

    fn advance(&mut self) {
        match self.kind() {
            TokenKind::Eof => return,
            TokenKind::Case => self.pending.push(TokenKind::End),
            kind if self.pending.last() == Some(&kind) => {
                self.pending.pop();
            }
            _ => {}
        }
        self.inner.advance();
    }
}

impl TermParser<'_> {
    /// Parses `CASE [input] (WHEN cond THEN result)+ [ELSE result] END`.
    ///
    /// The cursor must be on the `CASE` keyword.
    pub(crate) fn parse_case(
        &mut self,
        cursor: &mut dyn TokenCursor,
    ) -> ParseResult<ConditionalTerm> {
        let opened = cursor.current().span.clone();
        cursor.advance();

        let input = if cursor.check(TokenKind::When) {
            None
        } else {
            Some(self.parse_clause(cursor, INPUT_STOPS)?)
        };

        let mut when_then = Vec::new();
        while cursor.consume(TokenKind::When) {
            let condition = self.parse_clause(cursor, CONDITION_STOPS)?;
            if !cursor.consume(TokenKind::Then) {
                return Err(cursor
                    .error_here(format!("expected THEN after {condition}"))
                    .with_context(opened, "CASE starts here"));
            }
            let result = self.parse_clause(cursor, RESULT_STOPS)?;
            when_then.push((condition, result));
        }

        if when_then.is_empty() {
            let after = input
                .as_ref()
                .map_or_else(|| "CASE".to_string(), ConditionalTerm::to_text);
            return Err(cursor
                .error_here(format!("expected WHEN after {after}"))
                .with_context(opened, "CASE starts here"));
        }

        let else_term = if cursor.consume(TokenKind::Else) {
            Some(self.parse_clause(cursor, ELSE_STOPS)?)
        } else {
            None
        };

        if !cursor.check(TokenKind::End) {
            let last = match &else_term {
                Some(term) => term.to_text(),
                None => when_then
                    .last()
                    .map(|(_, result)| result.to_text())
                    .unwrap_or_default(),
            };
            return Err(cursor
                .error_here(format!("expected END after {last}"))
                .with_context(opened, "CASE starts here")
                .with_help("close the CASE expression with END"));
        }
        cursor.advance();

        match CaseConditional::new(input, when_then, else_term) {
            Some(case) => Ok(ConditionalTerm::Case(case)),
            None => Err(cursor.error_here("expected WHEN after CASE".to_string())),
        }
    }

    /// Parses one clause bounded by `stops`.
    fn parse_clause(
        &mut self,
        cursor: &mut dyn TokenCursor,
        stops: &'static [TokenKind],
    ) -> ParseResult<ConditionalTerm> {
        let mut scanner = CaseScanner::new(cursor, stops);
        let clause = self.parse_chain(&mut scanner, false)?;
        Ok(clause.into_term())
    }
}
