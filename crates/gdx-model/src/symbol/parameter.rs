//! GAMS parameters.

use indexmap::IndexMap;
use serde::Serialize;

use super::{DimensionCheck, GamsScalar, check_dimension, resolve_domain};
use crate::domain::Domain;
use crate::error::{Result, SymbolError};
use crate::key::Key;
use crate::value::GdxValue;

/// An ordered mapping from keys to values.
///
/// ```
/// use gdx_model::{GamsParameter, GdxValue};
///
/// let par = GamsParameter::new([(("a", "foo"), 10.0), (("b", "bar"), 20.0)])
///     .unwrap()
///     .with_domain(vec![Some("set1"), None])
///     .unwrap();
///
/// assert_eq!(par.get(("b", "bar")), Some(GdxValue::Number(20.0)));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GamsParameter {
    #[serde(serialize_with = "super::serialize_entries")]
    records: IndexMap<Key, GdxValue>,
    dimension: usize,
    domain: Domain,
    expl_text: Option<String>,
}

impl GamsParameter {
    /// Create a parameter from key/value pairs. The domain is universal.
    ///
    /// Values are canonicalized: NaN becomes NA and IEEE infinities become
    /// the infinity markers.
    pub fn new<I, K, V>(records: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<Key>,
        V: Into<GdxValue>,
    {
        let mut check = DimensionCheck::default();
        let mut collected = IndexMap::new();
        for (key, value) in records {
            let key = key.into();
            check.check(&key)?;
            if collected.contains_key(&key) {
                return Err(SymbolError::DuplicateKey { key });
            }
            collected.insert(key, value.into().canonical());
        }
        let dimension = check.finish();
        Ok(Self {
            records: collected,
            dimension,
            domain: Domain::universal(dimension),
            expl_text: None,
        })
    }

    /// Empty parameter of the given dimension.
    pub fn empty(dimension: usize) -> Result<Self> {
        check_dimension(dimension)?;
        Ok(Self {
            records: IndexMap::new(),
            dimension,
            domain: Domain::universal(dimension),
            expl_text: None,
        })
    }

    /// Attach a domain. Its length must match the key dimension; an empty
    /// parameter takes its dimension from the domain instead.
    pub fn with_domain(mut self, domain: impl Into<Domain>) -> Result<Self> {
        let (domain, dimension) =
            resolve_domain(domain.into(), self.dimension, !self.records.is_empty())?;
        self.domain = domain;
        self.dimension = dimension;
        Ok(self)
    }

    /// Attach explanatory text.
    #[must_use]
    pub fn with_expl_text(mut self, text: impl Into<String>) -> Self {
        let text = text.into();
        self.expl_text = (!text.is_empty()).then_some(text);
        self
    }

    #[must_use]
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    #[must_use]
    pub fn domain(&self) -> &Domain {
        &self.domain
    }

    #[must_use]
    pub fn expl_text(&self) -> Option<&str> {
        self.expl_text.as_deref()
    }

    /// Number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Value stored under a key.
    pub fn get(&self, key: impl Into<Key>) -> Option<GdxValue> {
        self.records.get(&key.into()).copied()
    }

    pub fn contains_key(&self, key: impl Into<Key>) -> bool {
        self.records.contains_key(&key.into())
    }

    /// Keys in record order.
    pub fn keys(&self) -> impl Iterator<Item = &Key> {
        self.records.keys()
    }

    /// Values in record order.
    pub fn values(&self) -> impl Iterator<Item = GdxValue> + '_ {
        self.records.values().copied()
    }

    /// Key/value pairs in record order.
    pub fn iter(&self) -> impl Iterator<Item = (&Key, GdxValue)> {
        self.records.iter().map(|(k, v)| (k, *v))
    }

    /// Borrow the records as a map.
    #[must_use]
    pub fn as_map(&self) -> &IndexMap<Key, GdxValue> {
        &self.records
    }

    /// Consume the parameter and return its records.
    #[must_use]
    pub fn into_map(self) -> IndexMap<Key, GdxValue> {
        self.records
    }
}

impl IntoIterator for GamsParameter {
    type Item = (Key, GdxValue);
    type IntoIter = indexmap::map::IntoIter<Key, GdxValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.into_iter()
    }
}

impl<'a> IntoIterator for &'a GamsParameter {
    type Item = (&'a Key, &'a GdxValue);
    type IntoIter = indexmap::map::Iter<'a, Key, GdxValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

impl From<GamsParameter> for IndexMap<Key, GdxValue> {
    fn from(par: GamsParameter) -> Self {
        par.records
    }
}

/// A scalar is a zero-dimensional parameter with one record.
impl From<GamsScalar> for GamsParameter {
    fn from(scalar: GamsScalar) -> Self {
        let mut records = IndexMap::new();
        records.insert(Key::scalar(), scalar.value());
        Self {
            records,
            dimension: 0,
            domain: Domain::universal(0),
            expl_text: scalar.expl_text().map(str::to_string),
        }
    }
}
