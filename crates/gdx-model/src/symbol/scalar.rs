//! GAMS scalars.

use serde::Serialize;

use super::GamsParameter;
use crate::error::SymbolError;
use crate::key::Key;
use crate::value::GdxValue;

/// A single value with optional explanatory text.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GamsScalar {
    value: GdxValue,
    expl_text: Option<String>,
}

impl GamsScalar {
    pub fn new(value: impl Into<GdxValue>) -> Self {
        Self {
            value: value.into().canonical(),
            expl_text: None,
        }
    }

    /// Attach explanatory text.
    #[must_use]
    pub fn with_expl_text(mut self, text: impl Into<String>) -> Self {
        let text = text.into();
        self.expl_text = (!text.is_empty()).then_some(text);
        self
    }

    #[must_use]
    pub fn value(&self) -> GdxValue {
        self.value
    }

    #[must_use]
    pub fn expl_text(&self) -> Option<&str> {
        self.expl_text.as_deref()
    }
}

impl From<GamsScalar> for f64 {
    fn from(scalar: GamsScalar) -> Self {
        scalar.value.to_f64()
    }
}

impl From<&GamsScalar> for f64 {
    fn from(scalar: &GamsScalar) -> Self {
        scalar.value.to_f64()
    }
}

/// A zero-dimensional parameter with at most one record. No record means the
/// value is zero, which is how GAMS stores a zero scalar.
impl TryFrom<GamsParameter> for GamsScalar {
    type Error = SymbolError;

    fn try_from(par: GamsParameter) -> Result<Self, Self::Error> {
        if par.dimension() != 0 || par.len() > 1 {
            return Err(SymbolError::NotScalar {
                dimension: par.dimension(),
                records: par.len(),
            });
        }
        let value = par.get(Key::scalar()).unwrap_or_default();
        let scalar = Self::new(value);
        Ok(match par.expl_text() {
            Some(text) => scalar.with_expl_text(text),
            None => scalar,
        })
    }
}
