//! Record keys.
//!
//! A [`Key`] is the canonical tuple of unique-element labels that addresses a
//! record. One-dimensional keys can be written as a bare string or as a
//! one-element tuple; both produce the same `Key`.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SymbolError};

/// Maximum length of a unique element label, in bytes.
pub const MAX_LABEL_LEN: usize = 63;

/// Maximum number of dimensions of a GDX symbol.
pub const MAX_DIMENSION: usize = 20;

/// A tuple of labels, one per dimension.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Key(Vec<String>);

impl Key {
    /// Create a key from its labels.
    pub fn new<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(labels.into_iter().map(Into::into).collect())
    }

    /// The zero-dimensional key used by scalar records.
    #[must_use]
    pub fn scalar() -> Self {
        Self(Vec::new())
    }

    /// Number of labels.
    #[must_use]
    pub fn dimension(&self) -> usize {
        self.0.len()
    }

    /// Label at the given position.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&str> {
        self.0.get(index).map(String::as_str)
    }

    /// All labels.
    #[must_use]
    pub fn labels(&self) -> &[String] {
        &self.0
    }

    /// Iterate over the labels.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// Consume the key and return its labels.
    #[must_use]
    pub fn into_labels(self) -> Vec<String> {
        self.0
    }

    /// Check GDX label limits.
    pub(crate) fn check_labels(&self) -> Result<()> {
        for label in &self.0 {
            if label.len() > MAX_LABEL_LEN {
                return Err(SymbolError::LabelTooLong {
                    key: self.clone(),
                    label: label.clone(),
                    limit: MAX_LABEL_LEN,
                });
            }
            if label.contains('\0') {
                return Err(SymbolError::NulInLabel {
                    key: self.clone(),
                    label: label.clone(),
                });
            }
        }
        Ok(())
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return write!(f, "()");
        }
        write!(f, "{}", self.0.join("."))
    }
}

impl From<&str> for Key {
    fn from(label: &str) -> Self {
        Self(vec![label.to_string()])
    }
}

impl From<String> for Key {
    fn from(label: String) -> Self {
        Self(vec![label])
    }
}

impl From<&String> for Key {
    fn from(label: &String) -> Self {
        Self(vec![label.clone()])
    }
}

impl From<&Key> for Key {
    fn from(key: &Key) -> Self {
        key.clone()
    }
}

impl<S: Into<String>> From<Vec<S>> for Key {
    fn from(labels: Vec<S>) -> Self {
        Self::new(labels)
    }
}

impl<S: Into<String>, const N: usize> From<[S; N]> for Key {
    fn from(labels: [S; N]) -> Self {
        Self::new(labels)
    }
}

impl From<&[&str]> for Key {
    fn from(labels: &[&str]) -> Self {
        Self::new(labels.iter().copied())
    }
}

impl From<()> for Key {
    fn from((): ()) -> Self {
        Self::scalar()
    }
}

impl<A: Into<String>> From<(A,)> for Key {
    fn from((a,): (A,)) -> Self {
        Self(vec![a.into()])
    }
}

impl<A: Into<String>, B: Into<String>> From<(A, B)> for Key {
    fn from((a, b): (A, B)) -> Self {
        Self(vec![a.into(), b.into()])
    }
}

impl<A: Into<String>, B: Into<String>, C: Into<String>> From<(A, B, C)> for Key {
    fn from((a, b, c): (A, B, C)) -> Self {
        Self(vec![a.into(), b.into(), c.into()])
    }
}

impl<A: Into<String>, B: Into<String>, C: Into<String>, D: Into<String>> From<(A, B, C, D)>
    for Key
{
    fn from((a, b, c, d): (A, B, C, D)) -> Self {
        Self(vec![a.into(), b.into(), c.into(), d.into()])
    }
}

impl From<Key> for Vec<String> {
    fn from(key: Key) -> Self {
        key.0
    }
}

impl<'a> IntoIterator for &'a Key {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
