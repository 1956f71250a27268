//! AST visitor infrastructure for condition trees.
//!
//! Visitors receive every node of a tree in source order. Traversal can stop early by
//! returning [`ControlFlow::Break`]; the default methods delegate to the matching `walk_*`
//! function, so an implementation only overrides the nodes it cares about.

use std::ops::ControlFlow;

use crate::ast::container::ConditionalContainer;
use crate::ast::projection::{Projection, ProjectionEntry};
use crate::ast::term::ConditionalTerm;

macro_rules! try_visit {
    ($expr:expr) => {
        match $expr {
            ControlFlow::Continue(()) => {}
            ControlFlow::Break(b) => return ControlFlow::Break(b),
        }
    };
}

/// Shared type alias for visitor traversal methods.
pub type VisitResult<B> = ControlFlow<B>;

/// Immutable AST visitor.
pub trait AstVisitor {
    /// Early-exit payload produced when traversal stops.
    type Break;

    fn visit_projection(&mut self, projection: &Projection) -> VisitResult<Self::Break> {
        walk_projection(self, projection)
    }

    fn visit_projection_entry(&mut self, entry: &ProjectionEntry) -> VisitResult<Self::Break> {
        walk_projection_entry(self, entry)
    }

    fn visit_container(&mut self, container: &ConditionalContainer) -> VisitResult<Self::Break> {
        walk_container(self, container)
    }

    fn visit_term(&mut self, term: &ConditionalTerm) -> VisitResult<Self::Break> {
        walk_term(self, term)
    }
}

/// Mutable AST visitor.
pub trait AstVisitorMut {
    /// Early-exit payload produced when traversal stops.
    type Break;

    fn visit_container_mut(
        &mut self,
        container: &mut ConditionalContainer,
    ) -> VisitResult<Self::Break> {
        walk_container_mut(self, container)
    }

    fn visit_term_mut(&mut self, term: &mut ConditionalTerm) -> VisitResult<Self::Break> {
        walk_term_mut(self, term)
    }
}

pub fn walk_projection<V: AstVisitor + ?Sized>(
    visitor: &mut V,
    projection: &Projection,
) -> VisitResult<V::Break> {
    for entry in &projection.entries {
        try_visit!(visitor.visit_projection_entry(entry));
    }
    ControlFlow::Continue(())
}

pub fn walk_projection_entry<V: AstVisitor + ?Sized>(
    visitor: &mut V,
    entry: &ProjectionEntry,
) -> VisitResult<V::Break> {
    visitor.visit_term(&entry.term)
}

pub fn walk_container<V: AstVisitor + ?Sized>(
    visitor: &mut V,
    container: &ConditionalContainer,
) -> VisitResult<V::Break> {
    for term in container.terms() {
        try_visit!(visitor.visit_term(term));
    }
    ControlFlow::Continue(())
}

pub fn walk_term<V: AstVisitor + ?Sized>(
    visitor: &mut V,
    term: &ConditionalTerm,
) -> VisitResult<V::Break> {
    match term {
        ConditionalTerm::Column(_)
        | ConditionalTerm::Constant(_)
        | ConditionalTerm::Variable(_)
        | ConditionalTerm::Subquery(_) => ControlFlow::Continue(()),
        ConditionalTerm::Conditional(conditional) => {
            try_visit!(visitor.visit_term(&conditional.left));
            if let Some(right) = &conditional.right {
                try_visit!(visitor.visit_term(right));
            }
            ControlFlow::Continue(())
        }
        ConditionalTerm::Container(container) => visitor.visit_container(container),
        ConditionalTerm::Case(case) => {
            if let Some(input) = &case.input {
                try_visit!(visitor.visit_term(input));
            }
            for (condition, result) in &case.when_then {
                try_visit!(visitor.visit_term(condition));
                try_visit!(visitor.visit_term(result));
            }
            if let Some(else_term) = &case.else_term {
                try_visit!(visitor.visit_term(else_term));
            }
            ControlFlow::Continue(())
        }
        ConditionalTerm::Formula(formula) => {
            for part in formula.parts() {
                try_visit!(visitor.visit_term(part));
            }
            ControlFlow::Continue(())
        }
        ConditionalTerm::FunctionCall(call) => {
            try_visit!(visitor.visit_term(&call.call));
            for parameter in call.parameters.iter().flatten() {
                try_visit!(visitor.visit_term(parameter));
            }
            ControlFlow::Continue(())
        }
        ConditionalTerm::Values(values) => {
            for value in &values.values {
                try_visit!(visitor.visit_term(value));
            }
            ControlFlow::Continue(())
        }
        ConditionalTerm::Negated(inner) => visitor.visit_term(inner),
    }
}

pub fn walk_container_mut<V: AstVisitorMut + ?Sized>(
    visitor: &mut V,
    container: &mut ConditionalContainer,
) -> VisitResult<V::Break> {
    for term in container.terms_mut() {
        try_visit!(visitor.visit_term_mut(term));
    }
    ControlFlow::Continue(())
}

pub fn walk_term_mut<V: AstVisitorMut + ?Sized>(
    visitor: &mut V,
    term: &mut ConditionalTerm,
) -> VisitResult<V::Break> {
    match term {
        ConditionalTerm::Column(_)
        | ConditionalTerm::Constant(_)
        | ConditionalTerm::Variable(_)
        | ConditionalTerm::Subquery(_) => ControlFlow::Continue(()),
        ConditionalTerm::Conditional(conditional) => {
            try_visit!(visitor.visit_term_mut(&mut conditional.left));
            if let Some(right) = &mut conditional.right {
                try_visit!(visitor.visit_term_mut(right));
            }
            ControlFlow::Continue(())
        }
        ConditionalTerm::Container(container) => visitor.visit_container_mut(container),
        ConditionalTerm::Case(case) => {
            if let Some(input) = &mut case.input {
                try_visit!(visitor.visit_term_mut(input));
            }
            for (condition, result) in &mut case.when_then {
                try_visit!(visitor.visit_term_mut(condition));
                try_visit!(visitor.visit_term_mut(result));
            }
            if let Some(else_term) = &mut case.else_term {
                try_visit!(visitor.visit_term_mut(else_term));
            }
            ControlFlow::Continue(())
        }
        ConditionalTerm::Formula(formula) => {
            for part in formula.parts_mut() {
                try_visit!(visitor.visit_term_mut(part));
            }
            ControlFlow::Continue(())
        }
        ConditionalTerm::FunctionCall(call) => {
            try_visit!(visitor.visit_term_mut(&mut call.call));
            for parameter in call.parameters.iter_mut().flatten() {
                try_visit!(visitor.visit_term_mut(parameter));
            }
            ControlFlow::Continue(())
        }
        ConditionalTerm::Values(values) => {
            for value in &mut values.values {
                try_visit!(visitor.visit_term_mut(value));
            }
            ControlFlow::Continue(())
        }
        ConditionalTerm::Negated(inner) => visitor.visit_term_mut(inner),
    }
}
