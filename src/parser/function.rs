//! Function call parsing.

use crate::ast::{Column, ConditionalTerm, Constant, FunctionCall};
use crate::config::ContainerDelimiter;
use crate::error::ParseResult;
use crate::lexer::keywords::{is_date_part, takes_date_part_argument};
use crate::lexer::token::TokenKind;
use crate::parser::TermParser;
use crate::parser::base::{TokenCursor, fuse_qualified, is_name_part};
use crate::parser::term::unclosed;

impl TermParser<'_> {
    /// Parses the argument list of `callee(...)`.
    ///
    /// The cursor must be on the opening parenthesis.
    pub(crate) fn parse_function_call(
        &mut self,
        cursor: &mut dyn TokenCursor,
        callee: Column,
    ) -> ParseResult<ConditionalTerm> {
        let is_cast = callee.name.eq_ignore_ascii_case("CAST")
            || callee.name.eq_ignore_ascii_case("TRY_CAST");
        let date_part_first = takes_date_part_argument(&callee.name);
        let mut call = FunctionCall::new(ConditionalTerm::Column(callee));

        let opened = cursor.current().span.clone();
        cursor.advance();
        if cursor.consume(TokenKind::RParen) {
            return Ok(call.into());
        }

        loop {
            if cursor.consume(TokenKind::Distinct) {
                call.distinct = true;
            }

            let index = call.parameters.len();
            let ends_argument = matches!(cursor.peek_kind(), TokenKind::Comma | TokenKind::RParen);
            let parameter = if cursor.check(TokenKind::Null) && ends_argument {
                cursor.advance();
                None
            } else if date_part_first
                && index == 0
                && ends_argument
                && cursor.check(TokenKind::Identifier)
                && is_date_part(&cursor.current().text)
            {
                let part = Constant::new(cursor.current().text.clone());
                cursor.advance();
                Some(ConditionalTerm::Constant(part))
            } else if is_cast && index == 1 && cursor.kind().is_identifier() {
                Some(parse_type_name(cursor)?)
            } else {
                Some(self.parse_chain(cursor, false)?.into_term())
            };
            call.parameters.push(parameter);

            if is_cast && index == 0 && cursor.consume(TokenKind::As) {
                if !cursor.kind().is_identifier() {
                    return Err(cursor.error_here("expected type name after AS".to_string()));
                }
                call.parameters.push(Some(parse_type_name(cursor)?));
            }

            if cursor.consume(TokenKind::Comma) {
                continue;
            }
            if cursor.consume(TokenKind::RParen) {
                break;
            }
            return Err(unclosed(cursor, ContainerDelimiter::PARENTHESES, opened));
        }

        Ok(call.into())
    }
}

/// Reads a type name such as `int`, `dbo.money` or `decimal(10, 2)` as a constant.
fn parse_type_name(cursor: &mut dyn TokenCursor) -> ParseResult<ConditionalTerm> {
    let mut name = cursor.current().clone();
    cursor.advance();
    while cursor.check(TokenKind::Dot) && is_name_part(cursor.peek_kind()) {
        cursor.advance();
        name = fuse_qualified(&name, cursor.current());
        cursor.advance();
    }
    let mut text = name.text.to_string();

    if cursor.check(TokenKind::LParen) {
        let opened = cursor.current().span.clone();
        cursor.advance();
        let mut arguments = Vec::new();
        loop {
            match cursor.kind() {
                TokenKind::RParen => {
                    cursor.advance();
                    break;
                }
                TokenKind::Comma => cursor.advance(),
                TokenKind::Eof => {
                    return Err(unclosed(cursor, ContainerDelimiter::PARENTHESES, opened));
                }
                _ => {
                    arguments.push(cursor.current().text.to_string());
                    cursor.advance();
                }
            }
        }
        text.push('(');
        text.push_str(&arguments.join(", "));
        text.push(')');
    }

    Ok(ConditionalTerm::Constant(Constant::new(text)))
}

#[cfg(test)]
mod tests {
    use crate::ast::{ConditionalTerm, FunctionCall};
    use crate::parse_term;

    fn call(text: &str) -> FunctionCall {
        match parse_term(text).unwrap() {
            ConditionalTerm::FunctionCall(call) => call,
            other => panic!("expected function call, got {other:?}"),
        }
    }

    #[test]
    fn count_distinct() {
        let count = call("COUNT(DISTINCT id)");
        assert!(count.distinct);
        assert_eq!(count.name(), Some("COUNT"));
        assert_eq!(count.parameters, vec![Some(ConditionalTerm::column("id"))]);
        assert_eq!(count.to_string(), "COUNT(DISTINCT id)");
    }

    #[test]
    fn no_arguments_and_star() {
        assert!(call("NOW()").parameters.is_empty());
        assert_eq!(
            call("count(*)").parameters,
            vec![Some(ConditionalTerm::column("*"))]
        );
    }

    #[test]
    fn nested_calls_and_folded_arguments() {
        let outer = call("COALESCE(SUM(a + b), x > 1, NULL)");
        assert_eq!(outer.parameters.len(), 3);
        assert!(
            outer.parameters[0]
                .as_ref()
                .and_then(ConditionalTerm::as_function_call)
                .is_some()
        );
        assert!(
            outer.parameters[1]
                .as_ref()
                .and_then(ConditionalTerm::as_conditional)
                .is_some()
        );
        assert_eq!(outer.parameters[2], None);
        assert_eq!(outer.to_string(), "COALESCE(SUM(a + b), x > 1, NULL)");
    }

    #[test]
    fn cast_type_argument_is_a_constant() {
        let comma = call("CAST(amount, decimal(10,2))");
        let keyword = call("cast(amount AS decimal(10, 2))");

        assert_eq!(comma.parameters, keyword.parameters);
        assert_eq!(
            comma.parameters[1],
            Some(ConditionalTerm::constant("decimal(10, 2)"))
        );
        assert_eq!(keyword.to_string(), "cast(amount, decimal(10, 2))");
    }

    #[test]
    fn qualified_type_names() {
        let comma = call("CAST(x, t.y)");
        assert_eq!(comma.parameters[1], Some(ConditionalTerm::constant("t.y")));

        let keyword = call("CAST(x AS dbo.money)");
        assert_eq!(
            keyword.parameters[1],
            Some(ConditionalTerm::constant("dbo.money"))
        );
        assert_eq!(keyword.to_string(), "CAST(x, dbo.money)");

        let sized = call("CAST(x AS dbo.amount(10, 2))");
        assert_eq!(
            sized.parameters[1],
            Some(ConditionalTerm::constant("dbo.amount(10, 2)"))
        );

        let condition = crate::parse_container("CAST(x, t.y) = 1").unwrap();
        assert_eq!(condition.to_text(), "CAST(x, t.y) = 1");
    }

    #[test]
    fn date_part_argument_is_a_constant() {
        let add = call("DATEADD(day, 7, created_at)");
        assert_eq!(add.parameters[0], Some(ConditionalTerm::constant("day")));
        assert_eq!(
            add.parameters[2],
            Some(ConditionalTerm::column("created_at"))
        );

        let other = call("ISNULL(day, 0)");
        assert_eq!(other.parameters[0], Some(ConditionalTerm::column("day")));
    }

    #[test]
    fn unclosed_argument_list() {
        let error = parse_term("f(a, b").unwrap_err();
        assert_eq!(error.message, "expected ')' to close '('");
        assert_eq!(error.position, 6);
        assert_eq!(error.context.map(|label| label.span), Some(1..2));

        let error = parse_term("f(a b)").unwrap_err();
        assert_eq!(error.position, 4);
    }

    #[test]
    fn qualified_function_name() {
        let call = call("dbo.fn_total(id)");
        assert_eq!(call.to_string(), "dbo.fn_total(id)");
    }
}
