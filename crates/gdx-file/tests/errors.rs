use std::panic::{AssertUnwindSafe, catch_unwind};
use std::path::Path;

use gdx_file::api::{ApiResult, RecordValues};
use gdx_file::{
    CodecError, DecodeError, GamsParameter, GamsSet, GdxApi, GdxError, GdxFile, GdxOptions,
    GdxValue, Key, LibraryError, MemoryGdx, MemoryLibrary, OpenMode, RawRecord, SpecialValues,
    SymbolError, SymbolInfo, SymbolMap, SymbolType, WriteError,
};

/// Store one 1-dimensional symbol straight through the library interface, bypassing the
/// encoding checks of the container.
fn write_raw(
    lib: &MemoryLibrary,
    path: &str,
    symbol_type: SymbolType,
    records: &[(&str, f64)],
    texts: &[&str],
) {
    let mut api = lib.handle();
    api.open_write(Path::new(path), "tests").expect("open raw");
    api.write_start("raw", "", 1, symbol_type, 0)
        .expect("write_start");
    for text in texts {
        api.add_set_text(text).expect("add_set_text");
    }
    for (label, level) in records {
        api.write_record(&[(*label).to_string()], &[*level, 0.0, 0.0, 0.0, 0.0])
            .expect("write_record");
    }
    api.write_done().expect("write_done");
    api.close().expect("close raw");
}

fn decode_error(lib: &MemoryLibrary, path: &str) -> DecodeError {
    let mut gdx = lib.open(path, OpenMode::Read).expect("open");
    match gdx.get("raw").expect_err("decoding should fail") {
        GdxError::Decode { symbol, source } => {
            assert_eq!(symbol, "raw");
            source
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn missing_file_is_not_found() {
    let lib = MemoryLibrary::new();
    let err = lib
        .open("missing.gdx", OpenMode::Read)
        .expect_err("missing file");
    match err {
        GdxError::FileNotFound { path } => assert!(path.ends_with("missing.gdx")),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn file_being_written_cannot_be_opened() {
    let lib = MemoryLibrary::new();
    let writer = lib.open("busy.gdx", OpenMode::Write).expect("open writer");

    let err = lib.open("busy.gdx", OpenMode::Read).expect_err("locked");
    assert!(matches!(err, GdxError::FileAccess { .. }));
    let err = lib.open("busy.gdx", OpenMode::Write).expect_err("locked");
    assert!(matches!(err, GdxError::FileAccess { .. }));

    drop(writer);
    assert_eq!(lib.open_handles(), 0);
    lib.open("busy.gdx", OpenMode::Read).expect("released");
}

#[test]
fn unknown_mode_is_rejected() {
    let err = "x".parse::<OpenMode>().expect_err("bad mode");
    assert!(matches!(err, GdxError::InvalidMode { mode } if mode == "x"));
}

#[test]
fn ambiguous_special_value_table_is_rejected() {
    let lib = MemoryLibrary::new();
    let table = SpecialValues::from_array([1.0e300, 2.0e300, 2.0e300, 4.0e300, 5.0e300]);
    let options = GdxOptions::new().with_special_values(table);
    let err = lib
        .open_with_options("table.gdx", OpenMode::Write, options)
        .expect_err("ambiguous table");
    assert!(matches!(
        err,
        GdxError::InvalidSpecialValues(CodecError::AmbiguousTable { .. })
    ));
    assert!(!lib.exists("table.gdx"));
    assert_eq!(lib.open_handles(), 0);
}

#[test]
fn unknown_symbol_is_not_found() {
    let lib = MemoryLibrary::new();
    let mut gdx = lib.open("empty.gdx", OpenMode::Write).expect("open");
    gdx.set("set1", vec!["a"]).expect("set1");

    let err = gdx.get("set9").expect_err("unknown");
    assert!(matches!(err, GdxError::SymbolNotFound { name } if name == "set9"));
}

#[test]
fn invalid_names_are_rejected() {
    let lib = MemoryLibrary::new();
    let mut gdx = lib.open("names.gdx", OpenMode::Write).expect("open");
    let long = "p".repeat(64);
    for name in ["", "1abc", "has space", "dash-ed", long.as_str()] {
        let err = gdx.set(name, vec!["a"]).expect_err("invalid name");
        assert!(matches!(err, GdxError::InvalidName { .. }), "{name:?}");
    }
    assert!(gdx.is_empty().expect("is_empty"));
}

#[test]
fn symbols_cannot_be_removed() {
    let lib = MemoryLibrary::new();
    let mut gdx = lib.open("remove.gdx", OpenMode::Write).expect("open");
    gdx.set("set1", vec!["a"]).expect("set1");

    let err = gdx.remove("set1").expect_err("remove");
    assert!(matches!(
        err,
        GdxError::Write {
            source: WriteError::RemoveUnsupported,
            ..
        }
    ));
    let err = gdx.remove("set9").expect_err("remove unknown");
    assert!(matches!(err, GdxError::SymbolNotFound { .. }));
    gdx.close().expect("close");

    let mut gdx = lib.open("remove.gdx", OpenMode::Read).expect("open");
    let err = gdx.remove("set1").expect_err("remove while reading");
    assert!(matches!(
        err,
        GdxError::Write {
            source: WriteError::ReadOnly,
            ..
        }
    ));
    assert!(gdx.contains("set1").expect("contains"));
}

#[test]
fn inconsistent_keys_are_a_shape_error() {
    let lib = MemoryLibrary::new();
    let mut gdx = lib.open("shape.gdx", OpenMode::Write).expect("open");
    let keys = vec![Key::from(("a", "b")), Key::from("c")];
    let err = gdx.set("set1", keys).expect_err("mixed dimensions");
    match err {
        GdxError::Shape { symbol, source } => {
            assert_eq!(symbol, "set1");
            assert!(matches!(source, SymbolError::KeyDimension { .. }));
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(!gdx.contains("set1").expect("contains"));
}

#[test]
fn reserved_numbers_cannot_be_written() {
    let lib = MemoryLibrary::new();
    let mut gdx = lib.open("reserved.gdx", OpenMode::Write).expect("open");
    let par = GamsParameter::new([("a", 1.0), ("b", 2.0e300)]).expect("par");
    let err = gdx.set("par1", par).expect_err("reserved value");
    match err {
        GdxError::InvalidValue { symbol, key, source } => {
            assert_eq!(symbol, "par1");
            assert_eq!(key, Key::from("b"));
            assert!(matches!(source, SymbolError::ReservedValue { .. }));
        }
        other => panic!("unexpected error: {other}"),
    }
    // Nothing was declared, so the name is still free.
    assert!(!gdx.contains("par1").expect("contains"));
    gdx.set("par1", GamsParameter::new([("a", 1.0)]).expect("par"))
        .expect("write after failure");
}

/// Memory handle that fails every record carrying `rejected`, and reports the
/// universe `*` as symbol 0 the way the GDX library does.
struct FailingLabel {
    inner: MemoryGdx,
    rejected: &'static str,
}

impl GdxApi for FailingLabel {
    fn open_read(&mut self, path: &Path) -> ApiResult<()> {
        self.inner.open_read(path)
    }

    fn open_write(&mut self, path: &Path, producer: &str) -> ApiResult<()> {
        self.inner.open_write(path, producer)
    }

    fn open_append(&mut self, path: &Path, producer: &str) -> ApiResult<()> {
        self.inner.open_append(path, producer)
    }

    fn close(&mut self) -> ApiResult<()> {
        self.inner.close()
    }

    fn set_special_values(&mut self, values: &[f64; 5]) -> ApiResult<()> {
        self.inner.set_special_values(values)
    }

    fn symbol_count(&self) -> ApiResult<usize> {
        self.inner.symbol_count()
    }

    fn symbol_info(&self, number: usize) -> ApiResult<SymbolInfo> {
        self.inner.symbol_info(number)
    }

    fn find_symbol(&self, name: &str) -> ApiResult<Option<usize>> {
        if name == "*" {
            return Ok(Some(0));
        }
        self.inner.find_symbol(name)
    }

    fn symbol_domain(&self, number: usize) -> ApiResult<Vec<String>> {
        self.inner.symbol_domain(number)
    }

    fn read_start(&mut self, number: usize) -> ApiResult<usize> {
        self.inner.read_start(number)
    }

    fn read_record(&mut self) -> ApiResult<Option<RawRecord>> {
        self.inner.read_record()
    }

    fn read_done(&mut self) -> ApiResult<()> {
        self.inner.read_done()
    }

    fn element_text(&self, index: i32) -> ApiResult<Option<String>> {
        self.inner.element_text(index)
    }

    fn write_start(
        &mut self,
        name: &str,
        expl_text: &str,
        dimension: usize,
        symbol_type: SymbolType,
        user_info: i32,
    ) -> ApiResult<()> {
        self.inner
            .write_start(name, expl_text, dimension, symbol_type, user_info)
    }

    fn set_symbol_domain(&mut self, number: usize, domain: &[String]) -> ApiResult<()> {
        self.inner.set_symbol_domain(number, domain)
    }

    fn write_record(&mut self, keys: &[String], values: &RecordValues) -> ApiResult<()> {
        if keys.iter().any(|label| label == self.rejected) {
            return Err(LibraryError::new(-1, format!("label {} rejected", self.rejected)));
        }
        self.inner.write_record(keys, values)
    }

    fn write_done(&mut self) -> ApiResult<()> {
        self.inner.write_done()
    }

    fn write_abort(&mut self) -> ApiResult<()> {
        self.inner.write_abort()
    }

    fn add_set_text(&mut self, text: &str) -> ApiResult<i32> {
        self.inner.add_set_text(text)
    }
}

fn failing_label(lib: &MemoryLibrary, path: &str, mode: OpenMode) -> GdxFile<FailingLabel> {
    let api = FailingLabel {
        inner: lib.handle(),
        rejected: "boom",
    };
    GdxFile::open(api, path, mode).expect("open")
}

#[test]
fn failed_record_discards_symbol() {
    let lib = MemoryLibrary::new();
    let mut gdx = failing_label(&lib, "partial.gdx", OpenMode::Write);

    let err = gdx
        .set("bad", vec!["a", "boom", "c"])
        .expect_err("rejected record");
    match err {
        GdxError::Write { symbol, source } => {
            assert_eq!(symbol, "bad");
            assert!(matches!(source, WriteError::Rejected(ref err) if err.code == -1));
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(!gdx.contains("bad").expect("contains"));

    // The handle takes the next symbol.
    gdx.set("good", vec!["a"]).expect("write after failure");
    gdx.close().expect("close");

    let gdx = lib.open("partial.gdx", OpenMode::Read).expect("reopen");
    assert_eq!(gdx.names().expect("names"), vec!["good"]);
}

#[test]
fn universe_is_not_a_symbol() {
    let lib = MemoryLibrary::new();
    let mut gdx = lib.open("universe.gdx", OpenMode::Write).expect("open");
    gdx.set("set1", vec!["a"]).expect("set1");
    gdx.close().expect("close");

    let mut gdx = failing_label(&lib, "universe.gdx", OpenMode::Read);
    assert!(!gdx.contains("*").expect("contains"));
    assert!(matches!(
        gdx.get("*"),
        Err(GdxError::SymbolNotFound { ref name }) if name == "*"
    ));
    assert!(gdx.contains("set1").expect("contains"));
}

#[test]
fn eager_domain_check() {
    let lib = MemoryLibrary::new();
    let options = GdxOptions::new().eager_domains();
    let mut gdx = lib
        .open_with_options("domains.gdx", OpenMode::Write, options)
        .expect("open");
    let par = GamsParameter::new([("a", 1.0)])
        .expect("par")
        .with_domain(vec!["set1"])
        .expect("domain");

    let err = gdx.set("par1", par.clone()).expect_err("unknown domain");
    assert!(matches!(
        err,
        GdxError::Write {
            source: WriteError::UnknownDomain { ref set },
            ..
        } if set == "set1"
    ));

    gdx.set("set1", vec!["a"]).expect("set1");
    gdx.set("par1", par).expect("known domain");

    let over_par = GamsParameter::new([("a", 2.0)])
        .expect("par")
        .with_domain(vec!["par1"])
        .expect("domain");
    let err = gdx.set("par2", over_par).expect_err("domain is a parameter");
    assert!(matches!(
        err,
        GdxError::Write {
            source: WriteError::DomainNotASet { .. },
            ..
        }
    ));
}

#[test]
fn deferred_domain_check_accepts_unknown_sets() {
    let lib = MemoryLibrary::new();
    let mut gdx = lib.open("deferred.gdx", OpenMode::Write).expect("open");
    let set = GamsSet::new(["a"])
        .expect("set")
        .with_domain(vec!["elsewhere"])
        .expect("domain");
    gdx.set("set2", set).expect("deferred");
    gdx.close().expect("close");

    let mut gdx = lib.open("deferred.gdx", OpenMode::Read).expect("open");
    let read = gdx.get("set2").expect("set2").into_set().expect("a set");
    assert_eq!(read.domain().get(0), Some("elsewhere"));
}

#[test]
fn nan_in_file_is_not_decoded() {
    let lib = MemoryLibrary::new();
    write_raw(&lib, "nan.gdx", SymbolType::Parameter, &[("a", f64::NAN)], &[]);
    let err = decode_error(&lib, "nan.gdx");
    assert!(matches!(
        err,
        DecodeError::Value {
            source: CodecError::UnmappedNan,
            ..
        }
    ));
}

#[test]
fn undefined_in_file_is_not_decoded() {
    let lib = MemoryLibrary::new();
    write_raw(&lib, "undef.gdx", SymbolType::Parameter, &[("a", 1.0e300)], &[]);
    let err = decode_error(&lib, "undef.gdx");
    match err {
        DecodeError::Value { key, source } => {
            assert_eq!(key, Key::from("a"));
            assert_eq!(source, CodecError::Undefined);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn acronym_in_file_is_not_decoded() {
    let lib = MemoryLibrary::new();
    write_raw(&lib, "acr.gdx", SymbolType::Parameter, &[("a", 2.0e301)], &[]);
    let err = decode_error(&lib, "acr.gdx");
    assert!(matches!(
        err,
        DecodeError::Value {
            source: CodecError::Acronym { index: 2 },
            ..
        }
    ));
}

#[test]
fn fractional_set_text_reference_is_rejected() {
    let lib = MemoryLibrary::new();
    write_raw(&lib, "frac.gdx", SymbolType::Set, &[("a", 0.5)], &[]);
    let err = decode_error(&lib, "frac.gdx");
    assert!(matches!(err, DecodeError::TextIndex { .. }));
}

#[test]
fn missing_set_text_is_rejected() {
    let lib = MemoryLibrary::new();
    write_raw(&lib, "text.gdx", SymbolType::Set, &[("a", 3.0)], &["only"]);
    let err = decode_error(&lib, "text.gdx");
    assert!(matches!(err, DecodeError::MissingText { index: 3, .. }));
}

#[test]
fn set_text_references_resolve() {
    let lib = MemoryLibrary::new();
    write_raw(
        &lib,
        "texts.gdx",
        SymbolType::Set,
        &[("a", 2.0), ("b", 0.0), ("c", 1.0)],
        &["first", "second"],
    );
    let mut gdx = lib.open("texts.gdx", OpenMode::Read).expect("open");
    let set = gdx.get("raw").expect("raw").into_set().expect("a set");
    assert_eq!(set.text("a"), Some("second"));
    assert_eq!(set.text("b"), None);
    assert_eq!(set.text("c"), Some("first"));
}

#[test]
fn variables_are_unsupported() {
    let lib = MemoryLibrary::new();
    write_raw(&lib, "var.gdx", SymbolType::Variable, &[("a", 1.0)], &[]);
    let err = decode_error(&lib, "var.gdx");
    assert_eq!(
        err,
        DecodeError::UnsupportedType {
            symbol_type: SymbolType::Variable
        }
    );

    // The rest of the container stays readable.
    let gdx = lib.open("var.gdx", OpenMode::Read).expect("open");
    assert_eq!(gdx.names().expect("names"), vec!["raw"]);
}

#[test]
fn scalar_without_records_is_zero() {
    let lib = MemoryLibrary::new();
    let mut api = lib.handle();
    api.open_write(Path::new("zero.gdx"), "tests").expect("open raw");
    api.write_start("zero", "", 0, SymbolType::Parameter, 0)
        .expect("write_start");
    api.write_done().expect("write_done");
    api.close().expect("close raw");

    let mut gdx = lib.open("zero.gdx", OpenMode::Read).expect("open");
    let scalar = gdx.get("zero").expect("zero").into_scalar().expect("a scalar");
    assert_eq!(scalar.value(), GdxValue::Number(0.0));
}

#[test]
fn handle_is_released_on_early_return() {
    fn write_then_fail(lib: &MemoryLibrary) -> gdx_file::Result<()> {
        let mut gdx = lib.open("early.gdx", OpenMode::Write)?;
        gdx.set("set1", vec!["a", "b"])?;
        gdx.set("1bad", vec!["c"])?;
        gdx.close()
    }

    let lib = MemoryLibrary::new();
    let err = write_then_fail(&lib).expect_err("invalid name");
    assert!(matches!(err, GdxError::InvalidName { .. }));
    assert_eq!(lib.open_handles(), 0);

    let mut gdx = lib.open("early.gdx", OpenMode::Read).expect("open");
    let set = gdx.get("set1").expect("set1").into_set().expect("a set");
    assert_eq!(set.len(), 2);
}

#[test]
fn handle_is_released_on_panic() {
    let lib = MemoryLibrary::new();
    let result = catch_unwind(AssertUnwindSafe(|| {
        let mut gdx = lib.open("panic.gdx", OpenMode::Write).expect("open");
        gdx.set("set1", vec!["a"]).expect("set1");
        panic!("interrupted");
    }));
    assert!(result.is_err());
    assert_eq!(lib.open_handles(), 0);

    let gdx = lib.open("panic.gdx", OpenMode::Read).expect("open");
    assert_eq!(gdx.names().expect("names"), vec!["set1"]);
}
