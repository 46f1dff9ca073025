//! Error types for symbol construction and special-value decoding.

use thiserror::Error;

use crate::domain::Domain;
use crate::key::Key;

/// Errors raised when a symbol's shape or values are inconsistent.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SymbolError {
    /// A key does not have the dimension shared by the other keys.
    #[error("key {key} has {actual} dimension(s), expected {expected}")]
    KeyDimension {
        key: Key,
        expected: usize,
        actual: usize,
    },

    /// The domain length disagrees with the symbol dimension.
    #[error("domain {domain} has {actual} entries but the symbol has {expected} dimension(s)")]
    DomainDimension {
        domain: Domain,
        expected: usize,
        actual: usize,
    },

    /// More dimensions than GDX can store.
    #[error("dimension {dimension} exceeds the GDX limit of {limit}")]
    TooManyDimensions { dimension: usize, limit: usize },

    /// A label is longer than a GDX unique element may be.
    #[error("label '{label}' in key {key} exceeds {limit} bytes")]
    LabelTooLong {
        key: Key,
        label: String,
        limit: usize,
    },

    /// GDX labels are C strings.
    #[error("label {label:?} in key {key} contains a NUL byte")]
    NulInLabel { key: Key, label: String },

    /// The same key appears twice.
    #[error("duplicate key {key}")]
    DuplicateKey { key: Key },

    /// Associated texts do not line up with the set elements.
    #[error("{texts} associated text(s) given for {elements} set element(s)")]
    TextCount { texts: usize, elements: usize },

    /// Sets need at least one dimension.
    #[error("set elements need at least one label")]
    EmptySetKey,

    /// The parameter cannot be viewed as a scalar.
    #[error("a {dimension}-dimensional parameter with {records} record(s) is not a scalar")]
    NotScalar { dimension: usize, records: usize },

    /// An ordinary number collides with the range GAMS reserves for special values.
    #[error("value {value} lies in the range reserved for GAMS special values")]
    ReservedValue { value: f64 },
}

/// Errors raised when a native value cannot be mapped to a [`GdxValue`](crate::GdxValue).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CodecError {
    /// The GAMS "undefined" sentinel.
    #[error("value is the GAMS undefined sentinel")]
    Undefined,

    /// A NaN that matches none of the configured sentinels.
    #[error("NaN does not match any GAMS special value")]
    UnmappedNan,

    /// An infinity that matches none of the configured sentinels.
    #[error("non-finite value {value} does not match any GAMS special value")]
    UnmappedInfinity { value: f64 },

    /// Acronym values are not supported.
    #[error("acronym value (index {index}) is not supported")]
    Acronym { index: u64 },

    /// Some other value in the reserved range.
    #[error("value {value} lies in the reserved special-value range")]
    Reserved { value: f64 },

    /// Two sentinels in the table share one encoding.
    #[error("special values {first} and {second} share the encoding {value}")]
    AmbiguousTable {
        first: &'static str,
        second: &'static str,
        value: f64,
    },
}

/// Result type for symbol construction.
pub type Result<T> = std::result::Result<T, SymbolError>;

impl SymbolError {
    /// Create a KeyDimension error.
    pub fn key_dimension(key: Key, expected: usize) -> Self {
        let actual = key.dimension();
        Self::KeyDimension {
            key,
            expected,
            actual,
        }
    }

    /// Create a DomainDimension error.
    pub fn domain_dimension(domain: Domain, expected: usize) -> Self {
        let actual = domain.dimension();
        Self::DomainDimension {
            domain,
            expected,
            actual,
        }
    }
}
