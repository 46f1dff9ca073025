//! The seam between container marshalling and the GDX library.
//!
//! [`GdxApi`] has one method per library call the marshalling layer needs.
//! An implementation owns exactly one library handle and is driven from a
//! single thread. Symbol numbers are 1-based, as in the library; number 0 is
//! the universe.

use std::fmt;
use std::path::Path;

use gdx_model::special::SV_COUNT;
use thiserror::Error;

/// Values per record (level, marginal, lower, upper, scale).
pub const GMS_VAL_MAX: usize = 5;

/// Index of the level value within a record.
pub const GMS_VAL_LEVEL: usize = 0;

/// Maximum symbol dimension.
pub const GMS_MAX_INDEX_DIM: usize = 20;

/// Size of the string buffers the library fills.
pub const GMS_SSSIZE: usize = 256;

/// Library error number for a missing file.
pub const ERR_FILE_NOT_FOUND: i32 = 2;

/// Library error number when appending to a file that does not exist.
pub const ERR_APPEND_MISSING: i32 = -100_041;

/// User info stored with sets and parameters.
pub const USER_INFO_DEFAULT: i32 = 0;

/// The values of one record.
pub type RecordValues = [f64; GMS_VAL_MAX];

/// GDX symbol type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SymbolType {
    Set,
    Parameter,
    Variable,
    Equation,
    Alias,
}

impl SymbolType {
    /// Map a library type code.
    #[must_use]
    pub const fn from_code(code: i32) -> Option<Self> {
        match code {
            0 => Some(Self::Set),
            1 => Some(Self::Parameter),
            2 => Some(Self::Variable),
            3 => Some(Self::Equation),
            4 => Some(Self::Alias),
            _ => None,
        }
    }

    /// Library type code.
    #[must_use]
    pub const fn code(self) -> i32 {
        match self {
            Self::Set => 0,
            Self::Parameter => 1,
            Self::Variable => 2,
            Self::Equation => 3,
            Self::Alias => 4,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Set => "set",
            Self::Parameter => "parameter",
            Self::Variable => "variable",
            Self::Equation => "equation",
            Self::Alias => "alias",
        }
    }
}

impl fmt::Display for SymbolType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Symbol table entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolInfo {
    pub name: String,
    pub dimension: usize,
    pub symbol_type: SymbolType,
    pub records: usize,
    pub user_info: i32,
    pub expl_text: String,
}

/// One record as returned by the library.
#[derive(Debug, Clone, PartialEq)]
pub struct RawRecord {
    pub keys: Vec<String>,
    pub values: RecordValues,
}

/// An error reported by the library, with its error number.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message} (error {code})")]
pub struct LibraryError {
    pub code: i32,
    pub message: String,
}

impl LibraryError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// True if the library reported a missing file.
    #[must_use]
    pub fn is_file_not_found(&self) -> bool {
        self.code == ERR_FILE_NOT_FOUND
    }

    /// True if an append failed because the file does not exist.
    #[must_use]
    pub fn is_append_missing(&self) -> bool {
        self.code == ERR_APPEND_MISSING
    }
}

/// Result type for library calls.
pub type ApiResult<T> = std::result::Result<T, LibraryError>;

/// Operations on one GDX library handle.
pub trait GdxApi {
    /// Open an existing container for reading.
    fn open_read(&mut self, path: &Path) -> ApiResult<()>;

    /// Create or truncate a container.
    fn open_write(&mut self, path: &Path, producer: &str) -> ApiResult<()>;

    /// Open an existing container to add symbols to it.
    fn open_append(&mut self, path: &Path, producer: &str) -> ApiResult<()>;

    /// Close the container. Written data is committed here.
    fn close(&mut self) -> ApiResult<()>;

    /// Install the native sentinels in order UNDEF, NA, +INF, -INF, EPS.
    fn set_special_values(&mut self, values: &[f64; SV_COUNT]) -> ApiResult<()>;

    /// Number of symbols in the container.
    fn symbol_count(&self) -> ApiResult<usize>;

    fn symbol_info(&self, number: usize) -> ApiResult<SymbolInfo>;

    /// Case-insensitive lookup of a symbol number. Numbers start at 1.
    fn find_symbol(&self, name: &str) -> ApiResult<Option<usize>>;

    /// Stored domain, one set name or `"*"` per dimension.
    fn symbol_domain(&self, number: usize) -> ApiResult<Vec<String>>;

    /// Start reading a symbol; returns its record count.
    fn read_start(&mut self, number: usize) -> ApiResult<usize>;

    /// Next record, or `None` when the symbol is exhausted.
    fn read_record(&mut self) -> ApiResult<Option<RawRecord>>;

    fn read_done(&mut self) -> ApiResult<()>;

    /// Text registered under a set-text number.
    fn element_text(&self, index: i32) -> ApiResult<Option<String>>;

    /// Declare a symbol and start writing its records.
    fn write_start(
        &mut self,
        name: &str,
        expl_text: &str,
        dimension: usize,
        symbol_type: SymbolType,
        user_info: i32,
    ) -> ApiResult<()>;

    /// Attach a domain to a declared symbol.
    fn set_symbol_domain(&mut self, number: usize, domain: &[String]) -> ApiResult<()>;

    fn write_record(&mut self, keys: &[String], values: &RecordValues) -> ApiResult<()>;

    /// Finish the symbol being written.
    fn write_done(&mut self) -> ApiResult<()>;

    /// End a symbol whose records could not all be written, so the handle
    /// can take the next symbol.
    ///
    /// Backends that can discard the symbol do so. The GDX library cannot,
    /// so the default finishes it with the records written so far.
    fn write_abort(&mut self) -> ApiResult<()> {
        self.write_done()
    }

    /// Register a set text and return its number.
    fn add_set_text(&mut self, text: &str) -> ApiResult<i32>;
}

impl<A: GdxApi + ?Sized> GdxApi for Box<A> {
    fn open_read(&mut self, path: &Path) -> ApiResult<()> {
        (**self).open_read(path)
    }

    fn open_write(&mut self, path: &Path, producer: &str) -> ApiResult<()> {
        (**self).open_write(path, producer)
    }

    fn open_append(&mut self, path: &Path, producer: &str) -> ApiResult<()> {
        (**self).open_append(path, producer)
    }

    fn close(&mut self) -> ApiResult<()> {
        (**self).close()
    }

    fn set_special_values(&mut self, values: &[f64; SV_COUNT]) -> ApiResult<()> {
        (**self).set_special_values(values)
    }

    fn symbol_count(&self) -> ApiResult<usize> {
        (**self).symbol_count()
    }

    fn symbol_info(&self, number: usize) -> ApiResult<SymbolInfo> {
        (**self).symbol_info(number)
    }

    fn find_symbol(&self, name: &str) -> ApiResult<Option<usize>> {
        (**self).find_symbol(name)
    }

    fn symbol_domain(&self, number: usize) -> ApiResult<Vec<String>> {
        (**self).symbol_domain(number)
    }

    fn read_start(&mut self, number: usize) -> ApiResult<usize> {
        (**self).read_start(number)
    }

    fn read_record(&mut self) -> ApiResult<Option<RawRecord>> {
        (**self).read_record()
    }

    fn read_done(&mut self) -> ApiResult<()> {
        (**self).read_done()
    }

    fn element_text(&self, index: i32) -> ApiResult<Option<String>> {
        (**self).element_text(index)
    }

    fn write_start(
        &mut self,
        name: &str,
        expl_text: &str,
        dimension: usize,
        symbol_type: SymbolType,
        user_info: i32,
    ) -> ApiResult<()> {
        (**self).write_start(name, expl_text, dimension, symbol_type, user_info)
    }

    fn set_symbol_domain(&mut self, number: usize, domain: &[String]) -> ApiResult<()> {
        (**self).set_symbol_domain(number, domain)
    }

    fn write_record(&mut self, keys: &[String], values: &RecordValues) -> ApiResult<()> {
        (**self).write_record(keys, values)
    }

    fn write_done(&mut self) -> ApiResult<()> {
        (**self).write_done()
    }

    fn write_abort(&mut self) -> ApiResult<()> {
        (**self).write_abort()
    }

    fn add_set_text(&mut self, text: &str) -> ApiResult<i32> {
        (**self).add_set_text(text)
    }
}
