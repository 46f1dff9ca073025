//! Error types for container operations.

use std::path::PathBuf;

use gdx_model::{CodecError, Key, SymbolError};
use thiserror::Error;

use crate::api::{LibraryError, SymbolType};

/// A stored symbol that cannot be represented as a set, parameter or scalar.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DecodeError {
    /// A record value has no host counterpart.
    #[error("value of record {key} cannot be decoded")]
    Value {
        key: Key,
        #[source]
        source: CodecError,
    },

    /// A record has the wrong number of labels.
    #[error("record {key} has {actual} label(s), expected {expected}")]
    KeyDimension {
        key: Key,
        expected: usize,
        actual: usize,
    },

    /// The stored domain does not match the declared dimension.
    #[error("stored domain has {actual} entries, expected {expected}")]
    DomainDimension { expected: usize, actual: usize },

    /// A scalar with more than one record.
    #[error("scalar has {records} records")]
    ScalarRecords { records: usize },

    /// A set record whose text reference is not a text number.
    #[error("record {key} has invalid set text reference {value}")]
    TextIndex { key: Key, value: f64 },

    /// A set record refers to a text the container does not hold.
    #[error("record {key} refers to missing set text {index}")]
    MissingText { key: Key, index: i32 },

    /// Variables, equations and aliases cannot be read.
    #[error("symbols of type {symbol_type} are not supported")]
    UnsupportedType { symbol_type: SymbolType },

    /// The records do not form a consistent symbol.
    #[error(transparent)]
    Shape(#[from] SymbolError),
}

/// A symbol cannot be written.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum WriteError {
    /// The container was opened for reading.
    #[error("container is open for reading")]
    ReadOnly,

    /// GDX symbols cannot be replaced.
    #[error("symbol already exists and cannot be replaced")]
    DuplicateSymbol,

    /// GDX symbols cannot be deleted.
    #[error("symbols cannot be removed from a GDX container")]
    RemoveUnsupported,

    /// A domain names a symbol that does not exist.
    #[error("domain set '{set}' does not exist")]
    UnknownDomain { set: String },

    /// A domain names a symbol that is not a one-dimensional set.
    #[error("domain '{set}' is not a one-dimensional set")]
    DomainNotASet { set: String },

    /// The library rejected the write.
    #[error(transparent)]
    Rejected(#[from] LibraryError),
}

/// Errors that can occur when working with a GDX container.
#[derive(Debug, Error)]
pub enum GdxError {
    /// File not found.
    #[error("file not found: {path}")]
    FileNotFound { path: PathBuf },

    /// The library could not open the file.
    #[error("cannot open {path}")]
    FileAccess {
        path: PathBuf,
        #[source]
        source: LibraryError,
    },

    /// Unsupported open mode.
    #[error("unsupported mode '{mode}'")]
    InvalidMode { mode: String },

    /// The special-value table cannot be used.
    #[error("invalid special-value table")]
    InvalidSpecialValues(#[from] CodecError),

    /// No symbol with this name.
    #[error("symbol '{name}' not found")]
    SymbolNotFound { name: String },

    /// Not a GAMS identifier.
    #[error("'{name}' is not a valid GAMS identifier")]
    InvalidName { name: String },

    /// The value given for a symbol has an inconsistent shape.
    #[error("symbol '{symbol}' has an inconsistent shape")]
    Shape {
        symbol: String,
        #[source]
        source: SymbolError,
    },

    /// A record value cannot be stored.
    #[error("symbol '{symbol}' record {key} has an invalid value")]
    InvalidValue {
        symbol: String,
        key: Key,
        #[source]
        source: SymbolError,
    },

    /// A stored symbol cannot be read.
    #[error("symbol '{symbol}' cannot be read")]
    Decode {
        symbol: String,
        #[source]
        source: DecodeError,
    },

    /// A symbol cannot be written.
    #[error("symbol '{symbol}' cannot be written")]
    Write {
        symbol: String,
        #[source]
        source: WriteError,
    },

    /// A library call failed.
    #[error("GDX library call {operation} failed")]
    Library {
        operation: &'static str,
        #[source]
        source: LibraryError,
    },

    /// A symbol position past the end of the symbol table.
    #[error("symbol index {index} out of range for {len} symbol(s)")]
    IndexOutOfRange { index: usize, len: usize },
}

/// Result type alias for container operations.
pub type Result<T> = std::result::Result<T, GdxError>;

impl GdxError {
    /// Create a SymbolNotFound error.
    pub fn symbol_not_found(name: impl Into<String>) -> Self {
        Self::SymbolNotFound { name: name.into() }
    }

    /// Create an InvalidName error.
    pub fn invalid_name(name: impl Into<String>) -> Self {
        Self::InvalidName { name: name.into() }
    }

    /// Create a Decode error.
    pub fn decode(symbol: impl Into<String>, source: impl Into<DecodeError>) -> Self {
        Self::Decode {
            symbol: symbol.into(),
            source: source.into(),
        }
    }

    /// Create a Write error.
    pub fn write(symbol: impl Into<String>, source: impl Into<WriteError>) -> Self {
        Self::Write {
            symbol: symbol.into(),
            source: source.into(),
        }
    }

    /// Wrap a failed library call.
    pub fn library(operation: &'static str, source: LibraryError) -> Self {
        Self::Library { operation, source }
    }

    /// Create a Shape error.
    pub fn shape(symbol: impl Into<String>, source: SymbolError) -> Self {
        Self::Shape {
            symbol: symbol.into(),
            source,
        }
    }
}
