//! Arithmetic formula parsing.
//!
//! Formulas have no precedence tiers: `term (op term)*` is stored as two parallel
//! sequences and evaluated strictly left to right.

use crate::ast::{ArithmeticOperator, ConditionalTerm, Formula};
use crate::error::ParseResult;
use crate::parser::TermParser;
use crate::parser::base::TokenCursor;

impl TermParser<'_> {
    /// Parses `(op term)+` with `first` as the leading operand.
    ///
    /// The cursor must be on an arithmetic operator.
    pub(crate) fn parse_formula_tail(
        &mut self,
        cursor: &mut dyn TokenCursor,
        first: ConditionalTerm,
    ) -> ParseResult<Formula> {
        let mut formula = Formula::new(first);

        while let Some(operator) = ArithmeticOperator::from_token_kind(cursor.kind()) {
            cursor.advance();
            let part = self.parse_term(cursor)?;
            formula.push(operator, part);
        }

        Ok(formula)
    }
}

#[cfg(test)]
mod tests {
    use crate::ast::{ArithmeticOperator, ConditionalTerm, Constant};
    use crate::parse_term;

    #[test]
    fn left_to_right_without_precedence() {
        let term = parse_term("a + b * c").unwrap();
        let formula = term.as_formula().unwrap();

        assert_eq!(
            formula.operators(),
            &[ArithmeticOperator::Add, ArithmeticOperator::Multiply]
        );
        assert_eq!(formula.parts().len(), 3);
        assert_eq!(term.to_text(), "a + b * c");
    }

    #[test]
    fn operands_may_be_calls_and_groups() {
        let term = parse_term("ROUND(price, 2) * (qty - 1) % 7").unwrap();
        let formula = term.as_formula().unwrap();

        assert!(formula.parts()[0].as_function_call().is_some());
        assert!(formula.parts()[1].as_formula().is_some());
        assert_eq!(formula.parts()[2], ConditionalTerm::constant("7"));
        assert_eq!(term.to_text(), "ROUND(price, 2) * (qty - 1) % 7");
    }

    #[test]
    fn negative_operands() {
        let term = parse_term("a - -5 / b").unwrap();
        let formula = term.as_formula().unwrap();

        assert_eq!(
            formula.parts()[1],
            ConditionalTerm::Constant(Constant::new("-5"))
        );
        assert_eq!(term.to_text(), "a - -5 / b");
    }

    #[test]
    fn dangling_operator() {
        let error = parse_term("a +").unwrap_err();
        assert_eq!(error.message, "expected expression");
        assert_eq!(error.position, 3);
    }
}
