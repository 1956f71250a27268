//! Ready-to-use AST visitors.

pub mod column;
pub mod variable;

pub use column::ColumnCollector;
pub use variable::{VariableBinder, VariableCollector};
