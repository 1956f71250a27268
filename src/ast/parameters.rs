//! Parameter bindings owned by a condition container.
//!
//! A container owns the values bound to the variables it mentions. When one container is
//! folded into another, ownership of those bindings moves to the outer container and the
//! inner one is left [`Delegated`](ParameterScope::Delegated): it never keeps a second,
//! aliased copy of the registry.

use smol_str::SmolStr;
use std::collections::BTreeMap;
use thiserror::Error;

/// Ordered map from variable name (without sigil) to the bound value's literal text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Parameters {
    values: BTreeMap<SmolStr, SmolStr>,
}

impl Parameters {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds `value` to `name`, returning the previous value.
    pub fn insert(&mut self, name: impl Into<SmolStr>, value: impl Into<SmolStr>) -> Option<SmolStr> {
        self.values.insert(name.into(), value.into())
    }

    /// Returns the value bound to `name`.
    pub fn get(&self, name: &str) -> Option<&SmolStr> {
        self.values.get(name)
    }

    /// Returns true if `name` is bound.
    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Number of bindings.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true when nothing is bound.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterates bindings in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&SmolStr, &SmolStr)> {
        self.values.iter()
    }

    /// Moves every binding of `other` into `self`. Bindings already in `self` win.
    pub fn absorb(&mut self, other: Parameters) {
        for (name, value) in other.values {
            self.values.entry(name).or_insert(value);
        }
    }
}

/// Who owns the bindings of a container.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ParameterScope {
    /// The container owns its bindings.
    Owned(Parameters),
    /// The bindings were adopted by an enclosing container.
    ///
    /// The scope holds no back-pointer. Lookups for a delegated container go through the
    /// container that holds it as a term and owns the adopted bindings.
    Delegated,
}

impl Default for ParameterScope {
    fn default() -> Self {
        ParameterScope::Owned(Parameters::new())
    }
}

impl ParameterScope {
    /// Returns the owned bindings, or `None` when delegated.
    pub fn owned(&self) -> Option<&Parameters> {
        match self {
            ParameterScope::Owned(parameters) => Some(parameters),
            ParameterScope::Delegated => None,
        }
    }

    /// Mutable form of [`owned`](Self::owned).
    pub fn owned_mut(&mut self) -> Option<&mut Parameters> {
        match self {
            ParameterScope::Owned(parameters) => Some(parameters),
            ParameterScope::Delegated => None,
        }
    }

    /// Returns true after the bindings moved to another container.
    pub fn is_delegated(&self) -> bool {
        matches!(self, ParameterScope::Delegated)
    }

    /// Takes the owned bindings and leaves the scope delegated.
    pub fn delegate(&mut self) -> Option<Parameters> {
        match std::mem::replace(self, ParameterScope::Delegated) {
            ParameterScope::Owned(parameters) => Some(parameters),
            ParameterScope::Delegated => None,
        }
    }
}

/// Errors raised while binding parameters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParameterError {
    /// The container's bindings belong to an enclosing container.
    #[error("parameters of this container were adopted by an enclosing container")]
    Delegated,
    /// No variable of that name occurs in the container.
    #[error("unknown variable '@{0}'")]
    UnknownVariable(SmolStr),
}
