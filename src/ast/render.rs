//! Canonical text rendering.
//!
//! Rendering is the inverse of parsing up to normalisation: keywords come out upper-case,
//! operators are separated by single spaces and only the parentheses needed to keep the
//! tree shape on re-parse are emitted. Re-parsing rendered text and rendering again yields
//! the same text.

use std::fmt::{self, Display, Formatter, Write};

use crate::ast::container::ConditionalContainer;
use crate::ast::projection::{Projection, ProjectionEntry};
use crate::ast::term::{
    ArithmeticOperator, CaseConditional, Column, Conditional, ConditionalTerm, Constant, Formula,
    FunctionCall, LogicalOperator, Operator, Subquery, ValuesArray, Variable,
};

/// Where an operand is rendered; decides whether it needs parentheses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Position {
    /// Region bounded by keywords or delimiters (CASE slots, function arguments).
    Slot,
    /// Term of an AND/OR chain.
    ChainTerm,
    /// Element of a value list.
    ListElement,
    ConditionalLeft,
    ConditionalRight,
    /// Operand of a unary conditional (`NOT x`, `EXISTS x`).
    UnaryOperand,
    FormulaPart,
    NegationOperand,
}

fn needs_parens(term: &ConditionalTerm, position: Position) -> bool {
    match term {
        ConditionalTerm::Container(_) => position != Position::Slot,
        ConditionalTerm::Conditional(_) => matches!(
            position,
            Position::ConditionalLeft
                | Position::ConditionalRight
                | Position::UnaryOperand
                | Position::FormulaPart
                | Position::NegationOperand
        ),
        ConditionalTerm::Formula(_) => matches!(
            position,
            Position::ConditionalRight | Position::FormulaPart | Position::NegationOperand
        ),
        ConditionalTerm::Negated(_) => position == Position::NegationOperand,
        ConditionalTerm::Constant(constant) => {
            position == Position::NegationOperand && constant.text.starts_with('-')
        }
        ConditionalTerm::Column(_)
        | ConditionalTerm::Variable(_)
        | ConditionalTerm::Case(_)
        | ConditionalTerm::FunctionCall(_)
        | ConditionalTerm::Values(_)
        | ConditionalTerm::Subquery(_) => false,
    }
}

fn write_operand(f: &mut Formatter<'_>, term: &ConditionalTerm, position: Position) -> fmt::Result {
    if needs_parens(term, position) {
        write!(f, "({term})")
    } else {
        write!(f, "{term}")
    }
}

impl Display for ConditionalTerm {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            ConditionalTerm::Column(column) => column.fmt(f),
            ConditionalTerm::Constant(constant) => constant.fmt(f),
            ConditionalTerm::Variable(variable) => variable.fmt(f),
            ConditionalTerm::Conditional(conditional) => conditional.fmt(f),
            ConditionalTerm::Container(container) => container.fmt(f),
            ConditionalTerm::Case(case) => case.fmt(f),
            ConditionalTerm::Formula(formula) => formula.fmt(f),
            ConditionalTerm::FunctionCall(call) => call.fmt(f),
            ConditionalTerm::Values(values) => values.fmt(f),
            ConditionalTerm::Negated(inner) => {
                f.write_char('-')?;
                write_operand(f, inner, Position::NegationOperand)
            }
            ConditionalTerm::Subquery(subquery) => subquery.fmt(f),
        }
    }
}

impl Display for Column {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match &self.owner {
            Some(owner) => write!(f, "{owner}.{}", self.name),
            None => f.write_str(&self.name),
        }
    }
}

impl Display for Constant {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl Display for Variable {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "@{}", self.name)
    }
}

impl Display for Subquery {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "({})", self.text)
    }
}

impl Display for Operator {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl Display for LogicalOperator {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Display for ArithmeticOperator {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl Display for Conditional {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match &self.right {
            Some(right) => {
                write_operand(f, &self.left, Position::ConditionalLeft)?;
                write!(f, " {} ", self.operator)?;
                write_operand(f, right, Position::ConditionalRight)
            }
            None => {
                write!(f, "{} ", self.operator)?;
                write_operand(f, &self.left, Position::UnaryOperand)
            }
        }
    }
}

impl Display for ConditionalContainer {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for (index, term) in self.terms().iter().enumerate() {
            if index > 0 {
                let operator = self
                    .logical_operators()
                    .get(index - 1)
                    .copied()
                    .unwrap_or(LogicalOperator::And);
                write!(f, " {operator} ")?;
            }
            write_operand(f, term, Position::ChainTerm)?;
        }
        Ok(())
    }
}

impl Display for CaseConditional {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str("CASE ")?;
        if let Some(input) = &self.input {
            write_operand(f, input, Position::Slot)?;
            f.write_char(' ')?;
        }
        for (condition, result) in &self.when_then {
            f.write_str("WHEN ")?;
            write_operand(f, condition, Position::Slot)?;
            f.write_str(" THEN ")?;
            write_operand(f, result, Position::Slot)?;
            f.write_char(' ')?;
        }
        if let Some(else_term) = &self.else_term {
            f.write_str("ELSE ")?;
            write_operand(f, else_term, Position::Slot)?;
            f.write_char(' ')?;
        }
        f.write_str("END")
    }
}

impl Display for Formula {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for (index, part) in self.parts().iter().enumerate() {
            if index > 0 {
                if let Some(operator) = self.operators().get(index - 1) {
                    write!(f, " {operator} ")?;
                }
            }
            write_operand(f, part, Position::FormulaPart)?;
        }
        Ok(())
    }
}

impl Display for FunctionCall {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write_operand(f, &self.call, Position::Slot)?;
        f.write_char('(')?;
        if self.distinct {
            f.write_str("DISTINCT ")?;
        }
        for (index, parameter) in self.parameters.iter().enumerate() {
            if index > 0 {
                f.write_str(", ")?;
            }
            match parameter {
                Some(term) => write_operand(f, term, Position::Slot)?,
                None => f.write_str("NULL")?,
            }
        }
        f.write_char(')')
    }
}

impl Display for ValuesArray {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_char('(')?;
        for (index, value) in self.values.iter().enumerate() {
            if index > 0 {
                f.write_str(", ")?;
            }
            write_operand(f, value, Position::ListElement)?;
        }
        f.write_char(')')
    }
}

impl Display for ProjectionEntry {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write_operand(f, &self.term, Position::Slot)?;
        if let Some(alias) = &self.alias {
            write!(f, " AS {alias}")?;
        }
        Ok(())
    }
}

impl Display for Projection {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for (index, entry) in self.entries.iter().enumerate() {
            if index > 0 {
                f.write_str(", ")?;
            }
            entry.fmt(f)?;
        }
        Ok(())
    }
}
