//! Variable collection and substitution visitors.

use std::collections::BTreeSet;
use std::ops::ControlFlow;

use smol_str::SmolStr;

use crate::ast::parameters::Parameters;
use crate::ast::term::{ConditionalTerm, Constant};
use crate::ast::visitor::{AstVisitor, AstVisitorMut, walk_term, walk_term_mut};

/// Collects the names of variables referenced by a tree.
#[derive(Debug, Clone, Default)]
pub struct VariableCollector {
    references: BTreeSet<SmolStr>,
}

impl VariableCollector {
    /// Creates a new empty collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Collects variable references from a single term.
    pub fn collect_from_term(term: &ConditionalTerm) -> BTreeSet<SmolStr> {
        let mut collector = Self::new();
        let _ = collector.visit_term(term);
        collector.references
    }

    /// Adds the variable references of `term` to this collector.
    pub fn extend_from_term(&mut self, term: &ConditionalTerm) {
        let _ = self.visit_term(term);
    }

    /// Returns collected variable references.
    pub fn references(&self) -> &BTreeSet<SmolStr> {
        &self.references
    }

    /// Returns collected variable references and consumes this collector.
    pub fn into_references(self) -> BTreeSet<SmolStr> {
        self.references
    }
}

impl AstVisitor for VariableCollector {
    type Break = ();

    fn visit_term(&mut self, term: &ConditionalTerm) -> ControlFlow<Self::Break> {
        if let ConditionalTerm::Variable(variable) = term {
            self.references.insert(variable.name.clone());
        }

        walk_term(self, term)
    }
}

/// Replaces bound variables with constants holding their values.
#[derive(Debug)]
pub struct VariableBinder<'a> {
    parameters: &'a Parameters,
    replaced: usize,
}

impl<'a> VariableBinder<'a> {
    /// Creates a binder over `parameters`.
    pub fn new(parameters: &'a Parameters) -> Self {
        Self {
            parameters,
            replaced: 0,
        }
    }

    /// Number of variables replaced so far.
    pub fn replaced(&self) -> usize {
        self.replaced
    }
}

impl AstVisitorMut for VariableBinder<'_> {
    type Break = ();

    fn visit_term_mut(&mut self, term: &mut ConditionalTerm) -> ControlFlow<Self::Break> {
        if let ConditionalTerm::Variable(variable) = term {
            if let Some(value) = self.parameters.get(&variable.name) {
                *term = ConditionalTerm::Constant(Constant::new(value.clone()));
                self.replaced += 1;
                return ControlFlow::Continue(());
            }
        }

        walk_term_mut(self, term)
    }
}
