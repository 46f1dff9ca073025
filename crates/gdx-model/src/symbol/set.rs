//! GAMS sets.

use indexmap::IndexMap;
use serde::Serialize;

use super::{DimensionCheck, check_dimension, resolve_domain};
use crate::domain::Domain;
use crate::error::{Result, SymbolError};
use crate::key::Key;

/// An ordered set of keys, each with an optional element text.
///
/// ```
/// use gdx_model::{Domain, GamsSet, Key};
///
/// let set = GamsSet::new([("a", "foo"), ("b", "bar")])
///     .unwrap()
///     .with_domain(vec![Some("set1"), None])
///     .unwrap()
///     .with_expl_text("A multidimensional set");
///
/// assert_eq!(set.dimension(), 2);
/// assert_eq!(set.domain(), &Domain::from(vec!["set1", "*"]));
/// assert!(set.contains(("a", "foo")));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GamsSet {
    #[serde(serialize_with = "super::serialize_entries")]
    elements: IndexMap<Key, Option<String>>,
    dimension: usize,
    domain: Domain,
    expl_text: Option<String>,
}

impl GamsSet {
    /// Create a set from its keys. The domain is universal.
    pub fn new<I, K>(keys: I) -> Result<Self>
    where
        I: IntoIterator<Item = K>,
        K: Into<Key>,
    {
        Self::with_texts(keys.into_iter().map(|key| (key, None::<String>)))
    }

    /// Create a set whose elements carry optional texts.
    pub fn with_texts<I, K, T>(elements: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, Option<T>)>,
        K: Into<Key>,
        T: Into<String>,
    {
        let mut check = DimensionCheck::default();
        let mut collected = IndexMap::new();
        for (key, text) in elements {
            let key = key.into();
            check.check(&key)?;
            if key.dimension() == 0 {
                return Err(SymbolError::EmptySetKey);
            }
            let text = text.map(Into::into).filter(|t: &String| !t.is_empty());
            if collected.contains_key(&key) {
                return Err(SymbolError::DuplicateKey { key });
            }
            collected.insert(key, text);
        }
        let dimension = check.finish();
        Ok(Self {
            elements: collected,
            dimension,
            domain: Domain::universal(dimension),
            expl_text: None,
        })
    }

    /// Empty set of the given dimension. Sets need at least one dimension.
    pub fn empty(dimension: usize) -> Result<Self> {
        if dimension == 0 {
            return Err(SymbolError::EmptySetKey);
        }
        check_dimension(dimension)?;
        Ok(Self {
            elements: IndexMap::new(),
            dimension,
            domain: Domain::universal(dimension),
            expl_text: None,
        })
    }

    /// Attach a domain. Its length must match the key dimension; an empty set
    /// takes its dimension from the domain instead.
    pub fn with_domain(mut self, domain: impl Into<Domain>) -> Result<Self> {
        let (domain, dimension) =
            resolve_domain(domain.into(), self.dimension, !self.elements.is_empty())?;
        if dimension == 0 {
            return Err(SymbolError::EmptySetKey);
        }
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

    /// Attach one associated text per element, in element order. Empty
    /// strings clear the text.
    pub fn with_assoc_texts<I, T>(mut self, texts: I) -> Result<Self>
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        let texts: Vec<String> = texts.into_iter().map(Into::into).collect();
        if texts.len() != self.elements.len() {
            return Err(SymbolError::TextCount {
                texts: texts.len(),
                elements: self.elements.len(),
            });
        }
        for (slot, text) in self.elements.values_mut().zip(texts) {
            *slot = (!text.is_empty()).then_some(text);
        }
        Ok(self)
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

    /// Number of elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// True if the key is an element.
    pub fn contains(&self, key: impl Into<Key>) -> bool {
        self.elements.contains_key(&key.into())
    }

    /// Text of an element, if it has one.
    pub fn text(&self, key: impl Into<Key>) -> Option<&str> {
        self.elements.get(&key.into()).and_then(|t| t.as_deref())
    }

    /// True if any element carries a text.
    #[must_use]
    pub fn has_texts(&self) -> bool {
        self.elements.values().any(Option::is_some)
    }

    /// Iterate over the keys in order.
    pub fn iter(&self) -> impl Iterator<Item = &Key> {
        self.elements.keys()
    }

    /// Iterate over keys and their texts.
    pub fn elements(&self) -> impl Iterator<Item = (&Key, Option<&str>)> {
        self.elements.iter().map(|(k, t)| (k, t.as_deref()))
    }

    /// Associated texts in element order; `None` where an element has none.
    #[must_use]
    pub fn assoc_texts(&self) -> Vec<Option<&str>> {
        self.elements.values().map(Option::as_deref).collect()
    }

    /// The keys, dropping element texts.
    #[must_use]
    pub fn into_keys(self) -> Vec<Key> {
        self.elements.into_keys().collect()
    }

    /// The keys together with their texts.
    #[must_use]
    pub fn into_elements(self) -> Vec<(Key, Option<String>)> {
        self.elements.into_iter().collect()
    }
}

impl IntoIterator for GamsSet {
    type Item = Key;
    type IntoIter = indexmap::map::IntoKeys<Key, Option<String>>;

    fn into_iter(self) -> Self::IntoIter {
        self.elements.into_keys()
    }
}

impl<'a> IntoIterator for &'a GamsSet {
    type Item = &'a Key;
    type IntoIter = indexmap::map::Keys<'a, Key, Option<String>>;

    fn into_iter(self) -> Self::IntoIter {
        self.elements.keys()
    }
}

impl From<GamsSet> for Vec<Key> {
    fn from(set: GamsSet) -> Self {
        set.into_keys()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_set() {
        let set = GamsSet::new(["a", "b"]).unwrap();
        assert_eq!(set.len(), 2);
        assert_eq!(set.dimension(), 1);
        assert!(set.domain().is_universal());
        assert_eq!(set.into_keys(), vec![Key::from("a"), Key::from("b")]);
    }

    #[test]
    fn test_multidim_set_fail() {
        let err = GamsSet::new(vec![Key::from(("a", "b")), Key::from("c")]).unwrap_err();
        assert!(matches!(err, SymbolError::KeyDimension { .. }));
    }

    #[test]
    fn test_domain_length_mismatch() {
        let err = GamsSet::new([("a", "b")])
            .unwrap()
            .with_domain(vec![Some("i")])
            .unwrap_err();
        assert!(matches!(
            err,
            SymbolError::DomainDimension {
                expected: 2,
                actual: 1,
                ..
            }
        ));
    }

    #[test]
    fn test_empty_set_takes_domain_dimension() {
        let set = GamsSet::new(Vec::<Key>::new())
            .unwrap()
            .with_domain(vec![Some("i"), Some("j")])
            .unwrap();
        assert_eq!(set.dimension(), 2);
        assert!(set.is_empty());
    }

    #[test]
    fn test_empty_set_defaults_to_one_dimension() {
        let set = GamsSet::new(Vec::<Key>::new()).unwrap();
        assert_eq!(set.dimension(), 1);
        assert_eq!(set.domain(), &Domain::universal(1));
    }

    #[test]
    fn test_assoc_texts() {
        let set = GamsSet::new(["a", "b"])
            .unwrap()
            .with_assoc_texts(["alpha", ""])
            .unwrap();
        assert_eq!(set.text("a"), Some("alpha"));
        assert_eq!(set.text("b"), None);
        assert!(set.has_texts());

        let err = GamsSet::new(["a", "b"])
            .unwrap()
            .with_assoc_texts(["alpha"])
            .unwrap_err();
        assert_eq!(
            err,
            SymbolError::TextCount {
                texts: 1,
                elements: 2
            }
        );
    }

    #[test]
    fn test_duplicate_after_normalization() {
        let err = GamsSet::new(vec![Key::from("a"), Key::from(("a",))]).unwrap_err();
        assert!(matches!(err, SymbolError::DuplicateKey { .. }));
    }

    #[test]
    fn test_zero_dimensional_set_rejected() {
        assert_eq!(
            GamsSet::new(vec![Key::scalar()]).unwrap_err(),
            SymbolError::EmptySetKey
        );
    }
}
