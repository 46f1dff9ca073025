//! Property tests for writing and reading back through the memory backend.

use std::collections::BTreeMap;

use gdx_file::{GdxValue, MemoryLibrary, OpenMode, SpecialValue, SymbolMap};
use proptest::prelude::*;

fn value() -> impl Strategy<Value = GdxValue> {
    prop_oneof![
        4 => (-1.0e12f64..1.0e12f64).prop_map(GdxValue::Number),
        1 => Just(GdxValue::Special(SpecialValue::NotAvailable)),
        1 => Just(GdxValue::Special(SpecialValue::Epsilon)),
        1 => Just(GdxValue::Special(SpecialValue::PositiveInfinity)),
        1 => Just(GdxValue::Special(SpecialValue::NegativeInfinity)),
    ]
}

proptest! {
    #[test]
    fn parameters_read_back_in_order(
        records in proptest::collection::btree_map("[a-z][a-z0-9]{0,7}", value(), 1..24)
    ) {
        let lib = MemoryLibrary::new();
        let mut gdx = lib.open("props.gdx", OpenMode::Write).unwrap();
        gdx.set("par", records.clone()).unwrap();
        gdx.close().unwrap();

        let mut gdx = lib.open("props.gdx", OpenMode::Read).unwrap();
        let par = gdx.get("par").unwrap().into_parameter().unwrap();
        let read: Vec<(String, GdxValue)> = par
            .iter()
            .map(|(key, value)| (key.labels()[0].clone(), value))
            .collect();
        let written: Vec<(String, GdxValue)> = records.into_iter().collect();
        prop_assert_eq!(read, written);
    }

    #[test]
    fn two_dimensional_sets_read_back(
        pairs in proptest::collection::btree_set(("[a-z]{1,4}", "[0-9]{1,3}"), 1..16)
    ) {
        let lib = MemoryLibrary::new();
        let keys: Vec<(String, String)> = pairs.into_iter().collect();
        let mut gdx = lib.open("sets.gdx", OpenMode::Write).unwrap();
        gdx.set("pairs", keys.clone()).unwrap();
        gdx.close().unwrap();

        let mut gdx = lib.open("sets.gdx", OpenMode::Read).unwrap();
        let set = gdx.get("pairs").unwrap().into_set().unwrap();
        prop_assert_eq!(set.len(), keys.len());
        prop_assert_eq!(set.dimension(), 2);
        for (a, b) in &keys {
            prop_assert!(set.contains((a.as_str(), b.as_str())));
        }
    }
}

#[test]
fn btree_map_writes_as_parameter() {
    let lib = MemoryLibrary::new();
    let mut records = BTreeMap::new();
    records.insert("x".to_string(), GdxValue::Number(1.0));
    let mut gdx = lib.open("one.gdx", OpenMode::Write).unwrap();
    gdx.set("par", records).unwrap();
    gdx.close().unwrap();

    let mut gdx = lib.open("one.gdx", OpenMode::Read).unwrap();
    let par = gdx.get("par").unwrap().into_parameter().unwrap();
    assert_eq!(par.get("x"), Some(GdxValue::Number(1.0)));
}
