//! Column reference collection.

use std::ops::ControlFlow;

use crate::ast::term::{Column, ConditionalTerm};
use crate::ast::visitor::{AstVisitor, walk_term};

/// Collects column references in source order, skipping called function names.
#[derive(Debug, Clone, Default)]
pub struct ColumnCollector {
    columns: Vec<Column>,
}

impl ColumnCollector {
    /// Creates a new empty collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Collects the distinct columns referenced by a term.
    pub fn collect_from_term(term: &ConditionalTerm) -> Vec<Column> {
        let mut collector = Self::new();
        let _ = collector.visit_term(term);
        collector.columns
    }

    /// Adds the columns of `term` not seen yet.
    pub fn extend_from_term(&mut self, term: &ConditionalTerm) {
        let _ = self.visit_term(term);
    }

    /// Returns the columns collected so far.
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Returns the collected columns and consumes this collector.
    pub fn into_columns(self) -> Vec<Column> {
        self.columns
    }
}

impl AstVisitor for ColumnCollector {
    type Break = ();

    fn visit_term(&mut self, term: &ConditionalTerm) -> ControlFlow<Self::Break> {
        match term {
            ConditionalTerm::Column(column) => {
                if column.name != "*" && !self.columns.contains(column) {
                    self.columns.push(column.clone());
                }
                ControlFlow::Continue(())
            }
            ConditionalTerm::FunctionCall(call) => {
                for parameter in call.parameters.iter().flatten() {
                    self.visit_term(parameter)?;
                }
                ControlFlow::Continue(())
            }
            _ => walk_term(self, term),
        }
    }
}
