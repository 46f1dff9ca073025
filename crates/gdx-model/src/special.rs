//! GDX special-value codec.
//!
//! The GDX library exchanges special values as reserved doubles. The defaults
//! are the GAMS constants below; a library can be told to use a different
//! table, so the codec carries the table it was configured with and matches
//! sentinels bit for bit.
//!
//! | Index | Meaning | Default    |
//! |-------|---------|------------|
//! | 0     | UNDEF   | `1.0e300`  |
//! | 1     | NA      | `2.0e300`  |
//! | 2     | +INF    | `3.0e300`  |
//! | 3     | -INF    | `4.0e300`  |
//! | 4     | EPS     | `5.0e300`  |
//!
//! Acronyms occupy the multiples of `1.0e301`.

use serde::{Deserialize, Serialize};

use crate::error::{CodecError, SymbolError};
use crate::value::{GdxValue, SpecialValue};

/// `GMS_SV_UNDEF`.
pub const SV_UNDEF: f64 = 1.0e300;
/// `GMS_SV_NA`.
pub const SV_NA: f64 = 2.0e300;
/// `GMS_SV_PINF`.
pub const SV_PINF: f64 = 3.0e300;
/// `GMS_SV_MINF`.
pub const SV_MINF: f64 = 4.0e300;
/// `GMS_SV_EPS`.
pub const SV_EPS: f64 = 5.0e300;
/// `GMS_SV_ACR`.
pub const SV_ACR: f64 = 10.0e300;

/// Number of entries in a GDX special-value array.
pub const SV_COUNT: usize = 5;

/// Native encodings of the special values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpecialValues {
    pub undefined: f64,
    pub not_available: f64,
    pub positive_infinity: f64,
    pub negative_infinity: f64,
    pub epsilon: f64,
}

impl Default for SpecialValues {
    fn default() -> Self {
        Self {
            undefined: SV_UNDEF,
            not_available: SV_NA,
            positive_infinity: SV_PINF,
            negative_infinity: SV_MINF,
            epsilon: SV_EPS,
        }
    }
}

impl SpecialValues {
    /// Create the default GAMS table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Table that exchanges infinities as IEEE infinities.
    #[must_use]
    pub fn ieee_infinities() -> Self {
        Self {
            positive_infinity: f64::INFINITY,
            negative_infinity: f64::NEG_INFINITY,
            ..Self::default()
        }
    }

    /// Build a table from a GDX special-value array.
    #[must_use]
    pub fn from_array(values: [f64; SV_COUNT]) -> Self {
        Self {
            undefined: values[0],
            not_available: values[1],
            positive_infinity: values[2],
            negative_infinity: values[3],
            epsilon: values[4],
        }
    }

    /// The table as a GDX special-value array.
    #[must_use]
    pub fn to_array(&self) -> [f64; SV_COUNT] {
        [
            self.undefined,
            self.not_available,
            self.positive_infinity,
            self.negative_infinity,
            self.epsilon,
        ]
    }

    /// Native encoding of a special value.
    #[must_use]
    pub fn sentinel(&self, value: SpecialValue) -> f64 {
        match value {
            SpecialValue::NotAvailable => self.not_available,
            SpecialValue::Epsilon => self.epsilon,
            SpecialValue::PositiveInfinity => self.positive_infinity,
            SpecialValue::NegativeInfinity => self.negative_infinity,
        }
    }

    /// The special value whose encoding matches `raw` exactly.
    #[must_use]
    pub fn classify(&self, raw: f64) -> Option<SpecialValue> {
        SpecialValue::ALL
            .into_iter()
            .find(|sv| self.sentinel(*sv).to_bits() == raw.to_bits())
    }

    /// Check that no two sentinels share an encoding.
    pub fn validate(&self) -> Result<(), CodecError> {
        const NAMES: [&str; SV_COUNT] = ["UNDEF", "NA", "+INF", "-INF", "EPS"];
        let values = self.to_array();
        for i in 0..SV_COUNT {
            for j in (i + 1)..SV_COUNT {
                if values[i].to_bits() == values[j].to_bits() {
                    return Err(CodecError::AmbiguousTable {
                        first: NAMES[i],
                        second: NAMES[j],
                        value: values[i],
                    });
                }
            }
        }
        Ok(())
    }

    /// Encode a value for the library.
    ///
    /// Ordinary numbers that would be read back as something else are
    /// rejected: anything equal to a sentinel or at or above `SV_UNDEF`.
    pub fn encode(&self, value: GdxValue) -> Result<f64, SymbolError> {
        match value.canonical() {
            GdxValue::Special(sv) => Ok(self.sentinel(sv)),
            GdxValue::Number(x) => {
                let collides = self
                    .to_array()
                    .iter()
                    .any(|sentinel| sentinel.to_bits() == x.to_bits());
                if collides || x >= SV_UNDEF {
                    Err(SymbolError::ReservedValue { value: x })
                } else {
                    Ok(x)
                }
            }
        }
    }

    /// Decode a value reported by the library.
    pub fn decode(&self, raw: f64) -> Result<GdxValue, CodecError> {
        if let Some(sv) = self.classify(raw) {
            return Ok(GdxValue::Special(sv));
        }
        if raw.to_bits() == self.undefined.to_bits() {
            return Err(CodecError::Undefined);
        }
        if raw.is_nan() {
            return Err(CodecError::UnmappedNan);
        }
        if raw.is_infinite() {
            return Err(CodecError::UnmappedInfinity { value: raw });
        }
        if raw >= SV_ACR {
            let ratio = raw / SV_ACR;
            if ratio.fract() == 0.0 {
                return Err(CodecError::Acronym {
                    index: ratio as u64,
                });
            }
        }
        if raw >= SV_UNDEF {
            return Err(CodecError::Reserved { value: raw });
        }
        Ok(GdxValue::Number(raw))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_sentinels_are_exact() {
        let table = SpecialValues::default();
        assert_eq!(table.encode(GdxValue::NA).unwrap(), SV_NA);
        assert_eq!(table.encode(GdxValue::EPS).unwrap(), SV_EPS);
        assert_eq!(table.encode(GdxValue::PINF).unwrap(), SV_PINF);
        assert_eq!(table.encode(GdxValue::MINF).unwrap(), SV_MINF);
    }

    #[test]
    fn test_decode_every_sentinel() {
        let table = SpecialValues::default();
        for sv in SpecialValue::ALL {
            let raw = table.sentinel(sv);
            assert_eq!(table.decode(raw).unwrap(), GdxValue::Special(sv));
        }
    }

    #[test]
    fn test_zero_and_eps_are_distinct() {
        let table = SpecialValues::default();
        assert_eq!(table.decode(0.0).unwrap(), GdxValue::Number(0.0));
        assert_eq!(table.decode(SV_EPS).unwrap(), GdxValue::EPS);
    }

    #[test]
    fn test_host_infinity_encodes_as_sentinel() {
        let table = SpecialValues::default();
        assert_eq!(table.encode(GdxValue::Number(f64::INFINITY)).unwrap(), SV_PINF);
        assert_eq!(table.encode(GdxValue::Number(f64::NAN)).unwrap(), SV_NA);
    }

    #[test]
    fn test_decode_rejects_unmapped() {
        let table = SpecialValues::default();
        assert_eq!(table.decode(f64::NAN), Err(CodecError::UnmappedNan));
        assert_eq!(table.decode(SV_UNDEF), Err(CodecError::Undefined));
        assert_eq!(
            table.decode(3.0 * SV_ACR),
            Err(CodecError::Acronym { index: 3 })
        );
        assert!(matches!(
            table.decode(f64::INFINITY),
            Err(CodecError::UnmappedInfinity { .. })
        ));
        assert!(matches!(
            table.decode(6.0e300),
            Err(CodecError::Reserved { .. })
        ));
    }

    #[test]
    fn test_encode_rejects_reserved_numbers() {
        let table = SpecialValues::default();
        assert!(matches!(
            table.encode(GdxValue::Number(SV_PINF)),
            Err(SymbolError::ReservedValue { .. })
        ));
        assert!(table.encode(GdxValue::Number(1.0e299)).is_ok());
        assert!(table.encode(GdxValue::Number(-SV_PINF)).is_ok());
    }

    #[test]
    fn test_ieee_table() {
        let table = SpecialValues::ieee_infinities();
        assert!(table.validate().is_ok());
        assert_eq!(table.decode(f64::INFINITY).unwrap(), GdxValue::PINF);
        assert_eq!(table.encode(GdxValue::MINF).unwrap(), f64::NEG_INFINITY);
    }

    #[test]
    fn test_validate_detects_shared_encoding() {
        let table = SpecialValues {
            epsilon: SV_NA,
            ..SpecialValues::default()
        };
        assert!(matches!(
            table.validate(),
            Err(CodecError::AmbiguousTable { first: "NA", second: "EPS", .. })
        ));
    }

    #[test]
    fn test_array_roundtrip() {
        let table = SpecialValues::default();
        assert_eq!(SpecialValues::from_array(table.to_array()), table);
    }
}
