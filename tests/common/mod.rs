//! Common test utilities
//!
//! Shared helpers for the integration tests.
//!
//! # Parsing Helpers
//! - [`container`] - Parse a condition, panicking with a rendered report on error
//! - [`term`] - Parse a single term, panicking with a rendered report on error
//! - [`projection`] - Parse a projection list, panicking with a rendered report on error
//! - [`error_at`] - Parse a condition that must fail and return its error
//!
//! # Invariant Helpers
//! - [`assert_chain_invariants`] - Check operator counts of every container and formula

#![allow(dead_code)]

use condition_parser::ast::visitor::{AstVisitor, VisitResult, walk_container, walk_term};
use condition_parser::{
    ConditionalContainer, ConditionalTerm, ParseError, Projection, parse_container, parse_projection,
    parse_term,
};
use std::ops::ControlFlow;

/// Format a parse error as a miette report for assertion messages.
pub fn format_error(error: &ParseError, source: &str) -> String {
    format!("{:?}", error.to_report(source))
}

/// Parse a condition, panicking with the rendered error on failure.
pub fn container(source: &str) -> ConditionalContainer {
    parse_container(source).unwrap_or_else(|error| {
        panic!(
            "expected {source:?} to parse:\n{}",
            format_error(&error, source)
        )
    })
}

/// Parse a single term, panicking with the rendered error on failure.
pub fn term(source: &str) -> ConditionalTerm {
    parse_term(source).unwrap_or_else(|error| {
        panic!(
            "expected {source:?} to parse:\n{}",
            format_error(&error, source)
        )
    })
}

/// Parse a projection list, panicking with the rendered error on failure.
pub fn projection(source: &str) -> Projection {
    parse_projection(source).unwrap_or_else(|error| {
        panic!(
            "expected {source:?} to parse:\n{}",
            format_error(&error, source)
        )
    })
}

/// Parse a condition that must fail and return the error.
pub fn error_at(source: &str) -> ParseError {
    match parse_container(source) {
        Ok(container) => panic!("expected {source:?} to fail, got {container:?}"),
        Err(error) => error,
    }
}

struct ChainInvariants;

impl AstVisitor for ChainInvariants {
    type Break = String;

    fn visit_container(&mut self, container: &ConditionalContainer) -> VisitResult<String> {
        if !container.is_empty()
            && container.logical_operators().len() + 1 != container.terms().len()
        {
            return ControlFlow::Break(format!("container {container}"));
        }
        walk_container(self, container)
    }

    fn visit_term(&mut self, term: &ConditionalTerm) -> VisitResult<String> {
        if let ConditionalTerm::Formula(formula) = term {
            if formula.operators().len() + 1 != formula.parts().len() {
                return ControlFlow::Break(format!("formula {formula}"));
            }
        }
        walk_term(self, term)
    }
}

/// Assert that every container and formula holds one operator fewer than it holds terms.
pub fn assert_chain_invariants(container: &ConditionalContainer) {
    if let ControlFlow::Break(offender) = ChainInvariants.visit_container(container) {
        panic!("chain invariant violated by {offender}");
    }
}
