//! Property tests for the special-value codec and key normalization.

use gdx_model::special::SV_UNDEF;
use gdx_model::{GamsScalar, GdxValue, Key, SpecialValue, SpecialValues};
use proptest::prelude::*;

fn special_value() -> impl Strategy<Value = SpecialValue> {
    prop_oneof![
        Just(SpecialValue::NotAvailable),
        Just(SpecialValue::Epsilon),
        Just(SpecialValue::PositiveInfinity),
        Just(SpecialValue::NegativeInfinity),
    ]
}

proptest! {
    #[test]
    fn ordinary_numbers_survive_the_codec(x in -1.0e299f64..1.0e299f64) {
        let codec = SpecialValues::default();
        let raw = codec.encode(GdxValue::Number(x)).unwrap();
        prop_assert_eq!(raw.to_bits(), x.to_bits());
        prop_assert_eq!(codec.decode(raw).unwrap(), GdxValue::Number(x));
    }

    #[test]
    fn special_values_survive_the_codec(sv in special_value()) {
        let codec = SpecialValues::default();
        let raw = codec.encode(GdxValue::Special(sv)).unwrap();
        prop_assert!(raw >= SV_UNDEF);
        prop_assert_eq!(codec.decode(raw).unwrap(), GdxValue::Special(sv));
    }

    #[test]
    fn scalar_float_conversion_is_identity(x in proptest::num::f64::NORMAL | proptest::num::f64::ZERO) {
        prop_assert_eq!(f64::from(GamsScalar::new(x)), x);
    }

    #[test]
    fn one_dimensional_key_forms_agree(label in "[a-z][a-z0-9_]{0,20}") {
        let bare = Key::from(label.as_str());
        prop_assert_eq!(&bare, &Key::from((label.clone(),)));
        prop_assert_eq!(&bare, &Key::from([label.clone()]));
        prop_assert_eq!(bare.dimension(), 1);
    }
}
