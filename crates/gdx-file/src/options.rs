//! Open modes and container options.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use gdx_model::SpecialValues;
use serde::{Deserialize, Serialize};

use crate::error::GdxError;

/// Producer string written into new containers unless configured otherwise.
pub const DEFAULT_PRODUCER: &str = concat!("gdx-file ", env!("CARGO_PKG_VERSION"));

/// How a container is opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OpenMode {
    /// Read an existing container (`"r"`).
    #[default]
    Read,
    /// Create or truncate a container (`"w"`).
    Write,
    /// Add symbols to an existing container, creating it if needed (`"a"` or `"w+"`).
    Append,
}

impl OpenMode {
    /// Short mode string.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Read => "r",
            Self::Write => "w",
            Self::Append => "a",
        }
    }

    /// Whether symbols may be written.
    #[must_use]
    pub const fn is_writable(self) -> bool {
        !matches!(self, Self::Read)
    }
}

impl fmt::Display for OpenMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OpenMode {
    type Err = GdxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "r" => Ok(Self::Read),
            "w" => Ok(Self::Write),
            "a" | "w+" => Ok(Self::Append),
            other => Err(GdxError::InvalidMode {
                mode: other.to_string(),
            }),
        }
    }
}

/// When domain references are validated on write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DomainCheck {
    /// Store domains as given and leave validation to the library.
    #[default]
    Deferred,
    /// Require every named domain to be a one-dimensional set already in
    /// the container.
    Eager,
}

/// Options for opening a container.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GdxOptions {
    /// Creator string recorded in new containers.
    pub producer: String,
    /// Domain validation on write (default: deferred).
    pub domain_check: DomainCheck,
    /// Native sentinels for the special values (default: the GAMS values).
    pub special_values: SpecialValues,
    /// GAMS system directory used to locate the native library.
    pub gams_dir: Option<PathBuf>,
}

impl Default for GdxOptions {
    fn default() -> Self {
        Self {
            producer: DEFAULT_PRODUCER.to_string(),
            domain_check: DomainCheck::Deferred,
            special_values: SpecialValues::default(),
            gams_dir: None,
        }
    }
}

impl GdxOptions {
    /// Create options with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the producer string.
    #[must_use]
    pub fn with_producer(mut self, producer: impl Into<String>) -> Self {
        self.producer = producer.into();
        self
    }

    /// Set the domain validation policy.
    #[must_use]
    pub fn with_domain_check(mut self, domain_check: DomainCheck) -> Self {
        self.domain_check = domain_check;
        self
    }

    /// Validate domains eagerly.
    #[must_use]
    pub fn eager_domains(mut self) -> Self {
        self.domain_check = DomainCheck::Eager;
        self
    }

    /// Set the special-value table.
    #[must_use]
    pub fn with_special_values(mut self, special_values: SpecialValues) -> Self {
        self.special_values = special_values;
        self
    }

    /// Set the GAMS system directory.
    #[must_use]
    pub fn with_gams_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.gams_dir = Some(dir.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_modes() {
        assert_eq!("r".parse::<OpenMode>().unwrap(), OpenMode::Read);
        assert_eq!("w".parse::<OpenMode>().unwrap(), OpenMode::Write);
        assert_eq!("a".parse::<OpenMode>().unwrap(), OpenMode::Append);
        assert_eq!("w+".parse::<OpenMode>().unwrap(), OpenMode::Append);
        let err = "x".parse::<OpenMode>().unwrap_err();
        assert!(matches!(err, GdxError::InvalidMode { mode } if mode == "x"));
    }

    #[test]
    fn test_options_builder() {
        let opts = GdxOptions::new()
            .with_producer("tests")
            .eager_domains()
            .with_gams_dir("/opt/gams");
        assert_eq!(opts.producer, "tests");
        assert_eq!(opts.domain_check, DomainCheck::Eager);
        assert_eq!(opts.gams_dir, Some(PathBuf::from("/opt/gams")));
        assert_eq!(opts.special_values, SpecialValues::default());
    }

    #[test]
    fn test_options_from_json() {
        let opts: GdxOptions =
            serde_json::from_str(r#"{ "domain_check": "eager" }"#).unwrap();
        assert_eq!(opts.domain_check, DomainCheck::Eager);
        assert_eq!(opts.producer, DEFAULT_PRODUCER);
    }
}
