//! Dictionary-style access to GAMS GDX containers.
//!
//! A [`GdxFile`] maps symbol names to [`Symbol`]s: sets, parameters and
//! scalars. Reading converts stored records into ordered host collections,
//! and writing goes the other way, including the GAMS special values NA,
//! EPS, +INF and -INF.
//!
//! The GDX library itself sits behind the [`GdxApi`] trait. Two backends are
//! provided:
//!
//! - [`MemoryLibrary`]: an in-process container store for tests and tools
//!   that do not need files on disk
//! - `native::NativeGdx`: bindings to the GAMS GDX C library (with `native`
//!   feature)
//!
//! # Example
//!
//! ```
//! use gdx_file::{GamsParameter, GdxValue, MemoryLibrary, OpenMode, SymbolMap};
//!
//! let lib = MemoryLibrary::new();
//! let mut gdx = lib.open("results.gdx", OpenMode::Write).unwrap();
//! gdx.set("set1", vec!["a", "b"]).unwrap();
//! let par = GamsParameter::new([("a", GdxValue::Number(1.0)), ("b", GdxValue::EPS)])
//!     .unwrap()
//!     .with_domain(vec!["set1"])
//!     .unwrap();
//! gdx.set("par1", par).unwrap();
//! gdx.close().unwrap();
//!
//! let mut gdx = lib.open("results.gdx", OpenMode::Read).unwrap();
//! let par = gdx.get("par1").unwrap().into_parameter().unwrap();
//! assert_eq!(par.get("b"), Some(GdxValue::EPS));
//! assert_eq!(par.domain().get(0), Some("set1"));
//! ```

pub mod api;
mod error;
mod file;
mod map;
pub mod memory;
mod options;
mod reader;
mod summary;
mod writer;

#[cfg(feature = "native")]
pub mod native;

pub use api::{GdxApi, LibraryError, RawRecord, SymbolInfo, SymbolType};
pub use error::{DecodeError, GdxError, Result, WriteError};
pub use file::GdxFile;
pub use map::SymbolMap;
pub use memory::{MemoryGdx, MemoryLibrary};
pub use options::{DEFAULT_PRODUCER, DomainCheck, GdxOptions, OpenMode};
pub use summary::{ContainerSummary, SummaryRow};
pub use writer::{MAX_IDENTIFIER_LEN, is_valid_identifier};

pub use gdx_model::{
    CodecError, Domain, GamsParameter, GamsScalar, GamsSet, GdxValue, IntoSymbol, Key,
    SpecialValue, SpecialValues, Symbol, SymbolError, SymbolKind,
};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
