//! AND/OR chains, conditionals and value lists.

use crate::ast::{
    ConditionalContainer, ConditionalTerm, Conditional, LogicalOperator, Operator, ValuesArray,
};
use crate::error::ParseResult;
use crate::lexer::token::TokenKind;
use crate::parser::TermParser;
use crate::parser::base::TokenCursor;

impl TermParser<'_> {
    /// Parses `conditional ((AND|OR) conditional | arith_op term)*`.
    ///
    /// An arithmetic operator after a complete conditional folds everything read so far
    /// into the first operand of a formula: the lone conditional when only one was read,
    /// otherwise the container built up to that point.
    ///
    /// `allow_list` enables comma-separated value lists; it is off where commas belong to
    /// the surrounding construct (function arguments, CASE clauses, list elements).
    pub(crate) fn parse_chain(
        &mut self,
        cursor: &mut dyn TokenCursor,
        allow_list: bool,
    ) -> ParseResult<ConditionalContainer> {
        let mut container = ConditionalContainer::new();
        let first = self.parse_conditional(cursor, allow_list)?;
        container.push(None, first);

        loop {
            let kind = cursor.kind();
            if let Some(operator) = LogicalOperator::from_token_kind(kind) {
                cursor.advance();
                let next = self.parse_conditional(cursor, allow_list)?;
                container.push(Some(operator), next);
            } else if kind.is_arithmetic_operator() {
                let accumulated = container.into_term();
                let formula = self.parse_formula_tail(cursor, accumulated)?;
                let folded = self.finish_conditional(cursor, formula.into(), allow_list)?;
                container = ConditionalContainer::from_term(folded);
            } else {
                break;
            }
        }

        Ok(container)
    }

    /// Parses one conditional: `EXISTS t`, `NOT EXISTS t`, `NOT cond` or `term [op term]`.
    pub(crate) fn parse_conditional(
        &mut self,
        cursor: &mut dyn TokenCursor,
        allow_list: bool,
    ) -> ParseResult<ConditionalTerm> {
        match cursor.kind() {
            TokenKind::Exists => {
                cursor.advance();
                let operand = self.parse_term(cursor)?;
                Ok(Conditional::unary(Operator::new("EXISTS"), operand).into())
            }
            TokenKind::Not if cursor.peek_kind() == TokenKind::Exists => {
                cursor.advance();
                cursor.advance();
                let operand = self.parse_term(cursor)?;
                Ok(Conditional::unary(Operator::new("NOT EXISTS"), operand).into())
            }
            TokenKind::Not => {
                cursor.advance();
                let operand = self.nested(cursor, |parser, cursor| {
                    parser.parse_conditional(cursor, false)
                })?;
                Ok(Conditional::unary(Operator::new("NOT"), operand).into())
            }
            _ => {
                let left = self.parse_term(cursor)?;
                self.finish_conditional(cursor, left, allow_list)
            }
        }
    }

    /// Completes a conditional whose left operand is already parsed.
    pub(crate) fn finish_conditional(
        &mut self,
        cursor: &mut dyn TokenCursor,
        left: ConditionalTerm,
        allow_list: bool,
    ) -> ParseResult<ConditionalTerm> {
        let left = if cursor.kind().is_arithmetic_operator() {
            self.parse_formula_tail(cursor, left)?.into()
        } else {
            left
        };

        let term = match parse_operator(cursor) {
            Some(operator) => {
                let right = self.parse_term(cursor)?;
                let right = if operator.is_membership() {
                    coerce_values(right)
                } else {
                    right
                };
                Conditional::binary(left, operator, right).into()
            }
            None => left,
        };

        if allow_list && cursor.check(TokenKind::Comma) {
            return self.parse_value_list(cursor, term);
        }
        Ok(term)
    }

    /// Parses `, element` repetitions after the first element of a value list.
    fn parse_value_list(
        &mut self,
        cursor: &mut dyn TokenCursor,
        first: ConditionalTerm,
    ) -> ParseResult<ConditionalTerm> {
        let mut values = vec![first];

        while cursor.consume(TokenKind::Comma) {
            let element = self.parse_chain(cursor, false)?;
            values.push(element.into_term());
        }

        if !self.at_list_end(cursor) {
            let previous = values.last().map(ConditionalTerm::to_text).unwrap_or_default();
            return Err(cursor.error_here(format!("expected ',' after {previous}")));
        }

        Ok(ConditionalTerm::Values(ValuesArray::new(values)))
    }

    fn at_list_end(&self, cursor: &dyn TokenCursor) -> bool {
        let kind = cursor.kind();
        kind == TokenKind::Eof
            || self
                .config
                .delimiters
                .iter()
                .any(|delimiter| delimiter.close == kind)
    }
}

/// Reads a conditional operator, including the compound forms
/// `NOT IN`, `NOT LIKE` and `IS NOT`.
fn parse_operator(cursor: &mut dyn TokenCursor) -> Option<Operator> {
    let kind = cursor.kind();
    let text = match kind {
        TokenKind::Eq
        | TokenKind::NotEq
        | TokenKind::NotEqBang
        | TokenKind::Lt
        | TokenKind::Gt
        | TokenKind::LtEq
        | TokenKind::GtEq
        | TokenKind::In
        | TokenKind::Like => {
            cursor.advance();
            kind.to_string()
        }
        TokenKind::Is => {
            cursor.advance();
            if cursor.consume(TokenKind::Not) {
                "IS NOT".to_string()
            } else {
                "IS".to_string()
            }
        }
        TokenKind::Not if matches!(cursor.peek_kind(), TokenKind::In | TokenKind::Like) => {
            cursor.advance();
            let negated = format!("NOT {}", cursor.kind());
            cursor.advance();
            negated
        }
        _ => return None,
    };
    Some(Operator::new(text))
}

/// Coerces the right side of `IN` into a value list.
fn coerce_values(term: ConditionalTerm) -> ConditionalTerm {
    match term {
        ConditionalTerm::Values(_) | ConditionalTerm::Subquery(_) => term,
        ConditionalTerm::Container(container) => {
            ConditionalTerm::Values(ValuesArray::new(container.terms().to_vec()))
        }
        other => ConditionalTerm::Values(ValuesArray::new(vec![other])),
    }
}
