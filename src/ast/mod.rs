//! AST foundation types and node structures.

pub mod container;
pub mod parameters;
pub mod projection;
mod render;
mod span;
pub mod term;
pub mod visitor;
pub mod visitors;

pub use container::ConditionalContainer;
pub use parameters::{ParameterError, ParameterScope, Parameters};
pub use projection::{Projection, ProjectionEntry};
pub use span::{Span, merge_spans};
pub use term::{
    ArithmeticOperator, CaseConditional, Column, Conditional, ConditionalTerm, Constant, Formula,
    FunctionCall, LogicalOperator, Operator, Subquery, ValuesArray, Variable,
};
pub use visitor::{AstVisitor, AstVisitorMut, VisitResult};
