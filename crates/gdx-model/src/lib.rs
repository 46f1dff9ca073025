//! GAMS symbol value types for GDX containers.
//!
//! This crate models the three symbol kinds a GDX container exchanges with
//! host code (sets, parameters and scalars) together with the codec for the
//! GAMS special values.
//!
//! # Features
//!
//! - Canonical record keys: `"a"`, `("a",)` and `["a"]` are the same [`Key`]
//! - Per-dimension [`Domain`]s with `None` for the universal set
//! - Exact mapping of NA, EPS, +INF and -INF to and from native sentinels
//! - Optional Polars DataFrame export (with `polars` feature)
//!
//! # Example
//!
//! ```
//! use gdx_model::{GamsParameter, GdxValue, SpecialValues};
//!
//! let par = GamsParameter::new([("na", GdxValue::NA), ("one", GdxValue::Number(1.0))])
//!     .unwrap()
//!     .with_expl_text("Values with a special value");
//!
//! let codec = SpecialValues::default();
//! let raw = codec.encode(par.get("na").unwrap()).unwrap();
//! assert_eq!(codec.decode(raw).unwrap(), GdxValue::NA);
//! ```

pub mod domain;
mod error;
pub mod key;
pub mod special;
mod symbol;
mod value;

#[cfg(feature = "polars")]
mod polars_ext;

pub use domain::{Domain, UNIVERSE};
pub use error::{CodecError, Result, SymbolError};
pub use key::{Key, MAX_DIMENSION, MAX_LABEL_LEN};
pub use special::SpecialValues;
pub use symbol::{GamsParameter, GamsScalar, GamsSet, IntoSymbol, Symbol, SymbolKind};
pub use value::{GdxValue, SpecialValue};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
