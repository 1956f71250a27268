//! AND/OR chains of conditional terms.

use std::collections::BTreeSet;

use smol_str::SmolStr;

use crate::ast::parameters::{ParameterError, ParameterScope, Parameters};
use crate::ast::term::{Column, ConditionalTerm, LogicalOperator, fingerprint_text};
use crate::ast::visitor::AstVisitorMut;
use crate::ast::visitors::{ColumnCollector, VariableBinder, VariableCollector};

/// Flat AND/OR chain `term (op term)*`.
///
/// Connectives apply left to right with no precedence between AND and OR; grouping is
/// expressed by nesting a container (or a conditional) as one of the terms. The chain
/// always holds exactly one logical operator fewer than it holds terms.
///
/// Besides its terms a container owns the values bound to its variables, see
/// [`bind`](Self::bind) and [`adopt_parameters`](Self::adopt_parameters).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ConditionalContainer {
    terms: Vec<ConditionalTerm>,
    logical_operators: Vec<LogicalOperator>,
    parameters: ParameterScope,
}

impl ConditionalContainer {
    /// Creates an empty container.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a container holding a single term.
    pub fn from_term(term: ConditionalTerm) -> Self {
        let mut container = Self::new();
        container.push(None, term);
        container
    }

    /// Terms in order.
    pub fn terms(&self) -> &[ConditionalTerm] {
        &self.terms
    }

    /// Connectives between consecutive terms.
    pub fn logical_operators(&self) -> &[LogicalOperator] {
        &self.logical_operators
    }

    pub(crate) fn terms_mut(&mut self) -> &mut [ConditionalTerm] {
        &mut self.terms
    }

    /// Number of terms.
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    /// Returns true when the container holds no terms.
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Appends `AND term`. On an empty container the term becomes the first one.
    ///
    /// A container term hands its bindings over to this container.
    pub fn and(&mut self, term: impl Into<ConditionalTerm>) -> &mut Self {
        self.append(LogicalOperator::And, term.into());
        self
    }

    /// Appends `OR term`. On an empty container the term becomes the first one.
    ///
    /// A container term hands its bindings over to this container.
    pub fn or(&mut self, term: impl Into<ConditionalTerm>) -> &mut Self {
        self.append(LogicalOperator::Or, term.into());
        self
    }

    fn append(&mut self, operator: LogicalOperator, mut term: ConditionalTerm) {
        if let ConditionalTerm::Container(inner) = &mut term {
            if let Some(parameters) = self.parameters.owned_mut() {
                if let Some(adopted) = inner.parameters.delegate() {
                    parameters.absorb(adopted);
                }
            }
        }
        self.push(Some(operator), term);
    }

    /// Appends a term without touching parameter ownership.
    pub(crate) fn push(&mut self, operator: Option<LogicalOperator>, term: ConditionalTerm) {
        if !self.terms.is_empty() {
            self.logical_operators
                .push(operator.unwrap_or(LogicalOperator::And));
        }
        self.terms.push(term);
    }

    /// Consumes the container, returning its only term if it holds exactly one.
    pub fn into_single(mut self) -> Result<ConditionalTerm, Self> {
        if self.terms.len() == 1 {
            if let Some(term) = self.terms.pop() {
                return Ok(term);
            }
        }
        Err(self)
    }

    /// Converts the container into a term, unwrapping a single-term chain.
    pub fn into_term(self) -> ConditionalTerm {
        match self.into_single() {
            Ok(term) => term,
            Err(container) => ConditionalTerm::Container(container),
        }
    }

    /// Bindings owned by this container, or `None` once they were adopted elsewhere.
    ///
    /// After adoption the view of the bindings is the enclosing container's: call
    /// `parameters` or [`resolved`](Self::resolved) on the container that holds this one
    /// as a term.
    pub fn parameters(&self) -> Option<&Parameters> {
        self.parameters.owned()
    }

    /// Returns true after another container adopted this one's bindings.
    pub fn is_delegated(&self) -> bool {
        self.parameters.is_delegated()
    }

    /// Binds `value` (literal text) to a variable that occurs in this container.
    pub fn bind(
        &mut self,
        name: impl Into<SmolStr>,
        value: impl Into<SmolStr>,
    ) -> Result<(), ParameterError> {
        let name: SmolStr = name.into();
        let name = match name.strip_prefix(['@', ':']) {
            Some(bare) => SmolStr::new(bare),
            None => name,
        };

        if self.parameters.is_delegated() {
            return Err(ParameterError::Delegated);
        }
        if !self.variables().contains(&name) {
            return Err(ParameterError::UnknownVariable(name));
        }

        if let Some(parameters) = self.parameters.owned_mut() {
            parameters.insert(name, value);
        }
        Ok(())
    }

    /// Moves the bindings of `source` into this container.
    ///
    /// Afterwards `source` is delegated: it reports no bindings of its own and refuses new
    /// ones. Bindings already present here take precedence over adopted ones.
    pub fn adopt_parameters(
        &mut self,
        source: &mut ConditionalContainer,
    ) -> Result<(), ParameterError> {
        let Some(parameters) = self.parameters.owned_mut() else {
            return Err(ParameterError::Delegated);
        };
        if let Some(adopted) = source.parameters.delegate() {
            parameters.absorb(adopted);
        }
        Ok(())
    }

    /// Returns a copy with every bound variable replaced by its value.
    pub fn resolved(&self) -> ConditionalContainer {
        let mut resolved = self.clone();
        if let Some(parameters) = self.parameters.owned() {
            let mut binder = VariableBinder::new(parameters);
            let _ = binder.visit_container_mut(&mut resolved);
        }
        resolved
    }

    /// Names of all variables referenced in the container.
    pub fn variables(&self) -> BTreeSet<SmolStr> {
        let mut collector = VariableCollector::new();
        for term in &self.terms {
            collector.extend_from_term(term);
        }
        collector.into_references()
    }

    /// Distinct columns referenced in the container, in source order.
    pub fn columns(&self) -> Vec<Column> {
        let mut collector = ColumnCollector::new();
        for term in &self.terms {
            collector.extend_from_term(term);
        }
        collector.into_columns()
    }

    /// Renders the canonical text of this container.
    pub fn to_text(&self) -> String {
        self.to_string()
    }

    /// Stable hash of the canonical text, suitable as a cache key.
    pub fn fingerprint(&self) -> u64 {
        fingerprint_text(&self.to_text())
    }
}

impl From<ConditionalTerm> for ConditionalContainer {
    fn from(term: ConditionalTerm) -> Self {
        match term {
            ConditionalTerm::Container(container) => container,
            other => ConditionalContainer::from_term(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::term::{Conditional, Operator};

    fn equals(column: &str, value: ConditionalTerm) -> ConditionalTerm {
        Conditional::binary(ConditionalTerm::column(column), Operator::new("="), value).into()
    }

    #[test]
    fn operators_track_terms() {
        let mut container = ConditionalContainer::new();
        assert!(container.logical_operators().is_empty());

        container.and(equals("a", ConditionalTerm::constant("1")));
        assert_eq!(container.len(), 1);
        assert!(container.logical_operators().is_empty());

        container
            .or(equals("b", ConditionalTerm::constant("2")))
            .and(ConditionalTerm::column("c"));
        assert_eq!(container.len(), 3);
        assert_eq!(
            container.logical_operators(),
            &[LogicalOperator::Or, LogicalOperator::And]
        );
    }

    #[test]
    fn clone_is_independent() {
        let original = ConditionalContainer::from_term(equals("a", ConditionalTerm::constant("1")));
        let mut copy = original.clone();
        copy.and(ConditionalTerm::column("b"));

        assert_eq!(original.len(), 1);
        assert_eq!(copy.len(), 2);
        assert_ne!(original.to_text(), copy.to_text());
    }

    #[test]
    fn delegated_bindings_are_read_through_the_owner() {
        let mut inner = ConditionalContainer::from_term(equals("a", ConditionalTerm::variable("id")));
        inner.bind("id", "7").unwrap();

        let mut outer = ConditionalContainer::from_term(ConditionalTerm::column("b"));
        outer.and(ConditionalTerm::Container(inner));

        let nested = outer.terms()[1].as_container().unwrap();
        assert!(nested.is_delegated());
        assert!(nested.parameters().is_none());
        assert_eq!(
            outer.parameters().and_then(|parameters| parameters.get("id")).map(|value| value.as_str()),
            Some("7")
        );
        let resolved = outer.resolved();
        assert!(resolved.variables().is_empty());
        assert!(resolved.to_text().contains("a = 7"));
    }

    #[test]
    fn into_single_unwraps_one_term() {
        let single = ConditionalContainer::from_term(ConditionalTerm::column("a"));
        assert_eq!(single.into_single(), Ok(ConditionalTerm::column("a")));

        let mut pair = ConditionalContainer::from_term(ConditionalTerm::column("a"));
        pair.and(ConditionalTerm::column("b"));
        assert!(pair.into_single().is_err());
    }

    #[test]
    fn bind_requires_a_known_variable() {
        let mut container = ConditionalContainer::from_term(equals("a", ConditionalTerm::variable("id")));

        assert_eq!(container.bind("@id", "5"), Ok(()));
        assert_eq!(
            container.bind("other", "1"),
            Err(ParameterError::UnknownVariable("other".into()))
        );
        assert_eq!(
            container.parameters().and_then(|p| p.get("id")).map(SmolStr::as_str),
            Some("5")
        );
    }

    #[test]
    fn adoption_moves_bindings() {
        let mut inner = ConditionalContainer::from_term(equals("a", ConditionalTerm::variable("x")));
        inner.bind("x", "1").unwrap();

        let mut outer = ConditionalContainer::from_term(equals("b", ConditionalTerm::variable("y")));
        outer.adopt_parameters(&mut inner).unwrap();

        assert!(inner.is_delegated());
        assert!(inner.parameters().is_none());
        assert_eq!(inner.bind("x", "2"), Err(ParameterError::Delegated));
        assert!(outer.parameters().is_some_and(|p| p.contains("x")));
    }

    #[test]
    fn and_with_container_adopts_its_bindings() {
        let mut inner = ConditionalContainer::from_term(equals("a", ConditionalTerm::variable("x")));
        inner.bind("x", "1").unwrap();

        let mut outer = ConditionalContainer::from_term(ConditionalTerm::column("flag"));
        outer.and(inner);

        assert!(outer.parameters().is_some_and(|p| p.contains("x")));
        match &outer.terms()[1] {
            ConditionalTerm::Container(nested) => assert!(nested.is_delegated()),
            other => panic!("expected nested container, got {other:?}"),
        }
    }

    #[test]
    fn resolved_substitutes_bound_values() {
        let mut container = ConditionalContainer::from_term(equals("a", ConditionalTerm::variable("x")));
        container.and(equals("b", ConditionalTerm::variable("y")));
        container.bind("x", "'abc'").unwrap();

        let resolved = container.resolved();
        assert_eq!(resolved.to_text(), "a = 'abc' AND b = @y");
        assert_eq!(container.to_text(), "a = @x AND b = @y");
    }

    #[test]
    fn collects_variables_and_columns() {
        let mut container = ConditionalContainer::from_term(equals("a", ConditionalTerm::variable("x")));
        container.or(equals("a", ConditionalTerm::column("b")));

        assert_eq!(container.variables().len(), 1);
        assert_eq!(container.columns(), vec![Column::new("a"), Column::new("b")]);
    }

    #[test]
    fn fingerprint_follows_text() {
        let a = ConditionalContainer::from_term(equals("a", ConditionalTerm::constant("1")));
        let b = a.clone();
        assert_eq!(a.fingerprint(), b.fingerprint());
    }
}
