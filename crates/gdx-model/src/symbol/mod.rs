//! GAMS symbol value types.
//!
//! GDX symbols come in three shapes that share little beyond "keyed records
//! with an optional domain", so [`Symbol`] is a tagged union over them.

mod parameter;
mod scalar;
mod set;

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::hash::BuildHasher;

use indexmap::IndexMap;
use serde::{Serialize, Serializer};

pub use parameter::GamsParameter;
pub use scalar::GamsScalar;
pub use set::GamsSet;

use crate::domain::Domain;
use crate::error::{Result, SymbolError};
use crate::key::{Key, MAX_DIMENSION};
use crate::value::GdxValue;

/// Kind of a symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum SymbolKind {
    Set,
    Parameter,
    Scalar,
}

impl SymbolKind {
    /// Lowercase name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Set => "set",
            Self::Parameter => "parameter",
            Self::Scalar => "scalar",
        }
    }
}

impl fmt::Display for SymbolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A set, parameter or scalar.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Symbol {
    Set(GamsSet),
    Parameter(GamsParameter),
    Scalar(GamsScalar),
}

impl Symbol {
    /// Kind of this symbol.
    #[must_use]
    pub fn kind(&self) -> SymbolKind {
        match self {
            Self::Set(_) => SymbolKind::Set,
            Self::Parameter(_) => SymbolKind::Parameter,
            Self::Scalar(_) => SymbolKind::Scalar,
        }
    }

    /// Number of dimensions; zero for scalars.
    #[must_use]
    pub fn dimension(&self) -> usize {
        match self {
            Self::Set(set) => set.dimension(),
            Self::Parameter(par) => par.dimension(),
            Self::Scalar(_) => 0,
        }
    }

    /// Domain of a set or parameter.
    #[must_use]
    pub fn domain(&self) -> Option<&Domain> {
        match self {
            Self::Set(set) => Some(set.domain()),
            Self::Parameter(par) => Some(par.domain()),
            Self::Scalar(_) => None,
        }
    }

    /// Explanatory text.
    #[must_use]
    pub fn expl_text(&self) -> Option<&str> {
        match self {
            Self::Set(set) => set.expl_text(),
            Self::Parameter(par) => par.expl_text(),
            Self::Scalar(scalar) => scalar.expl_text(),
        }
    }

    /// Number of records the symbol occupies in a container.
    #[must_use]
    pub fn record_count(&self) -> usize {
        match self {
            Self::Set(set) => set.len(),
            Self::Parameter(par) => par.len(),
            Self::Scalar(_) => 1,
        }
    }

    #[must_use]
    pub fn as_set(&self) -> Option<&GamsSet> {
        match self {
            Self::Set(set) => Some(set),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_parameter(&self) -> Option<&GamsParameter> {
        match self {
            Self::Parameter(par) => Some(par),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_scalar(&self) -> Option<&GamsScalar> {
        match self {
            Self::Scalar(scalar) => Some(scalar),
            _ => None,
        }
    }

    #[must_use]
    pub fn into_set(self) -> Option<GamsSet> {
        match self {
            Self::Set(set) => Some(set),
            _ => None,
        }
    }

    #[must_use]
    pub fn into_parameter(self) -> Option<GamsParameter> {
        match self {
            Self::Parameter(par) => Some(par),
            _ => None,
        }
    }

    #[must_use]
    pub fn into_scalar(self) -> Option<GamsScalar> {
        match self {
            Self::Scalar(scalar) => Some(scalar),
            _ => None,
        }
    }
}

impl From<GamsSet> for Symbol {
    fn from(set: GamsSet) -> Self {
        Self::Set(set)
    }
}

impl From<GamsParameter> for Symbol {
    fn from(par: GamsParameter) -> Self {
        Self::Parameter(par)
    }
}

impl From<GamsScalar> for Symbol {
    fn from(scalar: GamsScalar) -> Self {
        Self::Scalar(scalar)
    }
}

/// Values that can be stored as a symbol.
///
/// Plain sequences of keys become sets with a universal domain, maps become
/// parameters, and bare numbers become scalars.
pub trait IntoSymbol {
    fn into_symbol(self) -> Result<Symbol>;
}

impl IntoSymbol for Symbol {
    fn into_symbol(self) -> Result<Symbol> {
        Ok(self)
    }
}

impl IntoSymbol for GamsSet {
    fn into_symbol(self) -> Result<Symbol> {
        Ok(Symbol::Set(self))
    }
}

impl IntoSymbol for GamsParameter {
    fn into_symbol(self) -> Result<Symbol> {
        Ok(Symbol::Parameter(self))
    }
}

impl IntoSymbol for GamsScalar {
    fn into_symbol(self) -> Result<Symbol> {
        Ok(Symbol::Scalar(self))
    }
}

impl IntoSymbol for f64 {
    fn into_symbol(self) -> Result<Symbol> {
        Ok(Symbol::Scalar(GamsScalar::new(self)))
    }
}

impl IntoSymbol for i32 {
    fn into_symbol(self) -> Result<Symbol> {
        Ok(Symbol::Scalar(GamsScalar::new(self)))
    }
}

impl IntoSymbol for GdxValue {
    fn into_symbol(self) -> Result<Symbol> {
        Ok(Symbol::Scalar(GamsScalar::new(self)))
    }
}

impl<K: Into<Key>> IntoSymbol for Vec<K> {
    fn into_symbol(self) -> Result<Symbol> {
        GamsSet::new(self).map(Symbol::Set)
    }
}

impl<K: Into<Key>, const N: usize> IntoSymbol for [K; N] {
    fn into_symbol(self) -> Result<Symbol> {
        GamsSet::new(self).map(Symbol::Set)
    }
}

impl<K: Into<Key>, V: Into<GdxValue>, S> IntoSymbol for IndexMap<K, V, S> {
    fn into_symbol(self) -> Result<Symbol> {
        GamsParameter::new(self).map(Symbol::Parameter)
    }
}

impl<K: Into<Key>, V: Into<GdxValue>> IntoSymbol for BTreeMap<K, V> {
    fn into_symbol(self) -> Result<Symbol> {
        GamsParameter::new(self).map(Symbol::Parameter)
    }
}

/// Iteration order follows the `HashMap`, which is unspecified.
impl<K: Into<Key>, V: Into<GdxValue>, S: BuildHasher> IntoSymbol for HashMap<K, V, S> {
    fn into_symbol(self) -> Result<Symbol> {
        GamsParameter::new(self).map(Symbol::Parameter)
    }
}

/// Serialize keyed entries as a sequence of `[key, value]` pairs, since keys
/// are tuples and cannot be map keys in most formats.
pub(crate) fn serialize_entries<S, V>(
    entries: &IndexMap<Key, V>,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error>
where
    S: Serializer,
    V: Serialize,
{
    serializer.collect_seq(entries.iter())
}

/// Tracks the dimension shared by a symbol's keys while they are collected.
#[derive(Debug, Default)]
pub(crate) struct DimensionCheck {
    dimension: Option<usize>,
}

impl DimensionCheck {
    /// Record one key, failing if its dimension differs from earlier keys.
    pub(crate) fn check(&mut self, key: &Key) -> Result<()> {
        key.check_labels()?;
        match self.dimension {
            None => {
                check_dimension(key.dimension())?;
                self.dimension = Some(key.dimension());
                Ok(())
            }
            Some(expected) if expected != key.dimension() => {
                Err(SymbolError::key_dimension(key.clone(), expected))
            }
            Some(_) => Ok(()),
        }
    }

    /// Dimension seen so far; one when no key was recorded.
    pub(crate) fn finish(&self) -> usize {
        self.dimension.unwrap_or(1)
    }
}

/// A symbol dimension GDX can store.
pub(crate) fn check_dimension(dimension: usize) -> Result<()> {
    if dimension > MAX_DIMENSION {
        return Err(SymbolError::TooManyDimensions {
            dimension,
            limit: MAX_DIMENSION,
        });
    }
    Ok(())
}

/// Validate a domain for a symbol that has `dimension` dimensions.
///
/// A symbol with no records takes its dimension from the domain.
pub(crate) fn resolve_domain(
    domain: Domain,
    dimension: usize,
    has_records: bool,
) -> Result<(Domain, usize)> {
    if !has_records {
        check_dimension(domain.dimension())?;
        let dimension = domain.dimension();
        return Ok((domain, dimension));
    }
    if domain.dimension() != dimension {
        return Err(SymbolError::domain_dimension(domain, dimension));
    }
    Ok((domain, dimension))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_sequence_becomes_set() {
        let symbol = vec!["a", "b"].into_symbol().unwrap();
        assert_eq!(symbol.kind(), SymbolKind::Set);
        assert_eq!(symbol.dimension(), 1);
        assert!(symbol.domain().unwrap().is_universal());
    }

    #[test]
    fn test_map_becomes_parameter() {
        let mut map = BTreeMap::new();
        map.insert(("a", "x"), 1.0);
        let symbol = map.into_symbol().unwrap();
        assert_eq!(symbol.kind(), SymbolKind::Parameter);
        assert_eq!(symbol.dimension(), 2);
    }

    #[test]
    fn test_number_becomes_scalar() {
        let symbol = 10_i32.into_symbol().unwrap();
        assert_eq!(symbol.kind(), SymbolKind::Scalar);
        assert_eq!(symbol.dimension(), 0);
        assert_eq!(f64::from(symbol.as_scalar().unwrap()), 10.0);
    }

    #[test]
    fn test_mixed_keys_fail() {
        let err = vec![Key::from(("a", "b")), Key::from("c")]
            .into_symbol()
            .unwrap_err();
        assert!(matches!(
            err,
            SymbolError::KeyDimension {
                expected: 2,
                actual: 1,
                ..
            }
        ));
    }

    #[test]
    fn test_empty_constructors_check_dimension() {
        assert_eq!(GamsSet::empty(0).unwrap_err(), SymbolError::EmptySetKey);
        assert_eq!(GamsSet::empty(2).unwrap().dimension(), 2);
        assert!(matches!(
            GamsSet::empty(MAX_DIMENSION + 1).unwrap_err(),
            SymbolError::TooManyDimensions { limit: 20, .. }
        ));
        assert!(matches!(
            GamsParameter::empty(MAX_DIMENSION + 1).unwrap_err(),
            SymbolError::TooManyDimensions { .. }
        ));
        assert_eq!(GamsParameter::empty(0).unwrap().dimension(), 0);
    }

    #[test]
    fn test_kind_display() {
        assert_eq!(SymbolKind::Parameter.to_string(), "parameter");
    }
}
