//! Symbol domains.
//!
//! Each dimension of a symbol is either unconstrained (the universal set,
//! written `*` in GDX) or refers to a named set. The binding layer treats the
//! domain as descriptive metadata; whether the referenced sets exist is up to
//! the container (see `DomainCheck` in `gdx-file`).

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier GDX uses for the universal set.
pub const UNIVERSE: &str = "*";

/// Ordered per-dimension domain of a symbol. `None` is the universal set.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Domain(Vec<Option<String>>);

impl Domain {
    /// Create a domain from optional set names. `"*"` is read as universal.
    pub fn new<I, S>(sets: I) -> Self
    where
        I: IntoIterator<Item = Option<S>>,
        S: Into<String>,
    {
        Self(
            sets.into_iter()
                .map(|set| set.map(Into::into).filter(|name| name != UNIVERSE))
                .collect(),
        )
    }

    /// The all-universal domain of the given dimension.
    #[must_use]
    pub fn universal(dimension: usize) -> Self {
        Self(vec![None; dimension])
    }

    /// Build a domain from the identifiers the GDX library reports.
    pub fn from_native<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(ids.into_iter().map(|id| Some(id.into())))
    }

    /// Identifiers in the form the GDX library expects.
    #[must_use]
    pub fn to_native(&self) -> Vec<String> {
        self.0
            .iter()
            .map(|set| set.clone().unwrap_or_else(|| UNIVERSE.to_string()))
            .collect()
    }

    /// Number of dimensions covered.
    #[must_use]
    pub fn dimension(&self) -> usize {
        self.0.len()
    }

    /// True when no dimension refers to a named set.
    #[must_use]
    pub fn is_universal(&self) -> bool {
        self.0.iter().all(Option::is_none)
    }

    /// Domain entry of one dimension; `None` for universal or out of range.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&str> {
        self.0.get(index).and_then(|set| set.as_deref())
    }

    /// Iterate over the entries.
    pub fn iter(&self) -> impl Iterator<Item = Option<&str>> {
        self.0.iter().map(Option::as_deref)
    }

    /// Names of the referenced sets, in dimension order.
    pub fn named_sets(&self) -> impl Iterator<Item = &str> {
        self.0.iter().filter_map(Option::as_deref)
    }

    /// Entries as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[Option<String>] {
        &self.0
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({})", self.to_native().join(","))
    }
}

impl<S: Into<String>> From<Vec<Option<S>>> for Domain {
    fn from(sets: Vec<Option<S>>) -> Self {
        Self::new(sets)
    }
}

impl<S: Into<String>, const N: usize> From<[Option<S>; N]> for Domain {
    fn from(sets: [Option<S>; N]) -> Self {
        Self::new(sets)
    }
}

impl From<Vec<&str>> for Domain {
    fn from(ids: Vec<&str>) -> Self {
        Self::from_native(ids)
    }
}

impl From<&Domain> for Domain {
    fn from(domain: &Domain) -> Self {
        domain.clone()
    }
}
