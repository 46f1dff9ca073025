//! Numeric record values.

use std::fmt;

use serde::{Deserialize, Serialize};

/// GAMS special values with no ordinary floating-point counterpart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpecialValue {
    /// Not available (`NA`).
    NotAvailable,
    /// Present but numerically zero (`EPS`).
    Epsilon,
    /// `+INF`.
    PositiveInfinity,
    /// `-INF`.
    NegativeInfinity,
}

impl SpecialValue {
    /// Every special value, in GDX index order.
    pub const ALL: [SpecialValue; 4] = [
        Self::NotAvailable,
        Self::PositiveInfinity,
        Self::NegativeInfinity,
        Self::Epsilon,
    ];

    /// GAMS spelling.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NotAvailable => "NA",
            Self::Epsilon => "EPS",
            Self::PositiveInfinity => "+INF",
            Self::NegativeInfinity => "-INF",
        }
    }

    /// Numeric coercion used when a plain float is required.
    #[must_use]
    pub const fn to_f64(self) -> f64 {
        match self {
            Self::NotAvailable => f64::NAN,
            Self::Epsilon => 0.0,
            Self::PositiveInfinity => f64::INFINITY,
            Self::NegativeInfinity => f64::NEG_INFINITY,
        }
    }
}

impl fmt::Display for SpecialValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A parameter or scalar value.
///
/// Values built through `From<f64>` are canonical: NaN becomes
/// [`GdxValue::NA`] and the IEEE infinities become the infinity markers, so
/// `Number` only ever holds finite values after construction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GdxValue {
    /// An ordinary number.
    Number(f64),
    /// One of the GAMS special values.
    Special(SpecialValue),
}

impl GdxValue {
    /// `NA`.
    pub const NA: GdxValue = GdxValue::Special(SpecialValue::NotAvailable);
    /// `EPS`.
    pub const EPS: GdxValue = GdxValue::Special(SpecialValue::Epsilon);
    /// `+INF`.
    pub const PINF: GdxValue = GdxValue::Special(SpecialValue::PositiveInfinity);
    /// `-INF`.
    pub const MINF: GdxValue = GdxValue::Special(SpecialValue::NegativeInfinity);

    /// Map non-finite numbers onto their special-value markers.
    #[must_use]
    pub fn canonical(self) -> Self {
        match self {
            Self::Number(x) if x.is_nan() => Self::NA,
            Self::Number(x) if x == f64::INFINITY => Self::PINF,
            Self::Number(x) if x == f64::NEG_INFINITY => Self::MINF,
            other => other,
        }
    }

    /// True for any special value.
    #[must_use]
    pub fn is_special(&self) -> bool {
        matches!(self.canonical(), Self::Special(_))
    }

    /// The special value, if any.
    #[must_use]
    pub fn special(&self) -> Option<SpecialValue> {
        match self.canonical() {
            Self::Special(sv) => Some(sv),
            Self::Number(_) => None,
        }
    }

    /// The ordinary number, if this is not a special value.
    #[must_use]
    pub fn as_number(&self) -> Option<f64> {
        match self.canonical() {
            Self::Number(x) => Some(x),
            Self::Special(_) => None,
        }
    }

    /// Numeric coercion: NA is NaN, EPS is zero, infinities are infinite.
    #[must_use]
    pub fn to_f64(self) -> f64 {
        match self {
            Self::Number(x) => x,
            Self::Special(sv) => sv.to_f64(),
        }
    }
}

impl Default for GdxValue {
    fn default() -> Self {
        Self::Number(0.0)
    }
}

impl From<f64> for GdxValue {
    fn from(value: f64) -> Self {
        Self::Number(value).canonical()
    }
}

impl From<f32> for GdxValue {
    fn from(value: f32) -> Self {
        Self::from(f64::from(value))
    }
}

impl From<i32> for GdxValue {
    fn from(value: i32) -> Self {
        Self::Number(f64::from(value))
    }
}

impl From<SpecialValue> for GdxValue {
    fn from(value: SpecialValue) -> Self {
        Self::Special(value)
    }
}

impl From<GdxValue> for f64 {
    fn from(value: GdxValue) -> Self {
        value.to_f64()
    }
}

impl fmt::Display for GdxValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.canonical() {
            Self::Number(x) => write!(f, "{x}"),
            Self::Special(sv) => write!(f, "{sv}"),
        }
    }
}
