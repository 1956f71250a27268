//! Projection lists (`expr [AS alias], ...`).

use smol_str::SmolStr;

use crate::ast::term::ConditionalTerm;

/// One entry of a projection list.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ProjectionEntry {
    pub term: ConditionalTerm,
    pub alias: Option<SmolStr>,
}

impl ProjectionEntry {
    /// Creates an entry without alias.
    pub fn new(term: ConditionalTerm) -> Self {
        Self { term, alias: None }
    }

    /// Creates an aliased entry.
    pub fn aliased(term: ConditionalTerm, alias: impl Into<SmolStr>) -> Self {
        Self {
            term,
            alias: Some(alias.into()),
        }
    }

    /// Name under which the entry is exposed: its alias, or the name of a plain column.
    pub fn output_name(&self) -> Option<&str> {
        match &self.alias {
            Some(alias) => Some(alias.as_str()),
            None => self.term.as_column().map(|column| column.name.as_str()),
        }
    }

    /// Renders the canonical text of this entry.
    pub fn to_text(&self) -> String {
        self.to_string()
    }
}

/// Ordered sequence of projection entries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Projection {
    pub entries: Vec<ProjectionEntry>,
}

impl Projection {
    /// Creates a projection from its entries.
    pub fn new(entries: Vec<ProjectionEntry>) -> Self {
        Self { entries }
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true when there are no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates the entries.
    pub fn iter(&self) -> std::slice::Iter<'_, ProjectionEntry> {
        self.entries.iter()
    }

    /// Finds an entry by its output name, ignoring ASCII case.
    pub fn find(&self, name: &str) -> Option<&ProjectionEntry> {
        self.entries.iter().find(|entry| {
            entry
                .output_name()
                .is_some_and(|own| own.eq_ignore_ascii_case(name))
        })
    }

    /// Renders the canonical text of this projection.
    pub fn to_text(&self) -> String {
        self.to_string()
    }
}

impl<'a> IntoIterator for &'a Projection {
    type Item = &'a ProjectionEntry;
    type IntoIter = std::slice::Iter<'a, ProjectionEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
