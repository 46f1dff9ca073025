//! Decoding stored symbols.

use gdx_model::{Domain, GamsParameter, GamsScalar, GamsSet, Key, SpecialValues, Symbol};

use crate::api::{ApiResult, GMS_VAL_LEVEL, GdxApi, RawRecord, SymbolInfo, SymbolType};
use crate::error::{DecodeError, GdxError, Result};

/// Read symbol `number` (1-based) and convert it to a host symbol.
pub(crate) fn read_symbol<A: GdxApi + ?Sized>(
    api: &mut A,
    number: usize,
    codec: &SpecialValues,
) -> Result<Symbol> {
    let info = api
        .symbol_info(number)
        .map_err(|err| GdxError::library("symbol_info", err))?;
    let name = info.name.clone();

    if !matches!(info.symbol_type, SymbolType::Set | SymbolType::Parameter) {
        return Err(GdxError::decode(
            name,
            DecodeError::UnsupportedType {
                symbol_type: info.symbol_type,
            },
        ));
    }

    let native_domain = api
        .symbol_domain(number)
        .map_err(|err| GdxError::library("symbol_domain", err))?;
    if native_domain.len() != info.dimension {
        return Err(GdxError::decode(
            name,
            DecodeError::DomainDimension {
                expected: info.dimension,
                actual: native_domain.len(),
            },
        ));
    }
    let domain = Domain::from_native(native_domain);

    let records =
        read_records(api, number).map_err(|err| GdxError::library("read_records", err))?;
    let symbol = decode_symbol(api, &info, domain, records, codec)
        .map_err(|err| GdxError::decode(name, err))?;

    tracing::debug!(
        symbol = %info.name,
        kind = %symbol.kind(),
        records = symbol.record_count(),
        "read symbol"
    );
    Ok(symbol)
}

/// Collect every record of a symbol. The read is always finished, also when
/// a record fails.
fn read_records<A: GdxApi + ?Sized>(api: &mut A, number: usize) -> ApiResult<Vec<RawRecord>> {
    let expected = api.read_start(number)?;
    let mut records = Vec::with_capacity(expected);
    let outcome = loop {
        match api.read_record() {
            Ok(Some(record)) => records.push(record),
            Ok(None) => break Ok(()),
            Err(err) => break Err(err),
        }
    };
    let done = api.read_done();
    outcome.and(done)?;
    Ok(records)
}

fn decode_symbol<A: GdxApi + ?Sized>(
    api: &A,
    info: &SymbolInfo,
    domain: Domain,
    records: Vec<RawRecord>,
    codec: &SpecialValues,
) -> std::result::Result<Symbol, DecodeError> {
    let mut keyed = Vec::with_capacity(records.len());
    for record in records {
        let key = Key::new(record.keys);
        if key.dimension() != info.dimension {
            return Err(DecodeError::KeyDimension {
                actual: key.dimension(),
                key,
                expected: info.dimension,
            });
        }
        keyed.push((key, record.values[GMS_VAL_LEVEL]));
    }

    match info.symbol_type {
        SymbolType::Set => decode_set(api, info, domain, keyed),
        _ if info.dimension == 0 => decode_scalar(info, keyed, codec),
        _ => decode_parameter(info, domain, keyed, codec),
    }
}

fn decode_set<A: GdxApi + ?Sized>(
    api: &A,
    info: &SymbolInfo,
    domain: Domain,
    records: Vec<(Key, f64)>,
) -> std::result::Result<Symbol, DecodeError> {
    let mut elements = Vec::with_capacity(records.len());
    for (key, level) in records {
        let text = set_text(api, &key, level)?;
        elements.push((key, text));
    }
    let set = if elements.is_empty() {
        GamsSet::empty(info.dimension)?
    } else {
        GamsSet::with_texts(elements)?
    };
    Ok(set.with_domain(domain)?.with_expl_text(&info.expl_text).into())
}

/// The level value of a set record is the number of its text, 0 for none.
fn set_text<A: GdxApi + ?Sized>(
    api: &A,
    key: &Key,
    level: f64,
) -> std::result::Result<Option<String>, DecodeError> {
    if level == 0.0 {
        return Ok(None);
    }
    let invalid = || DecodeError::TextIndex {
        key: key.clone(),
        value: level,
    };
    if level.fract() != 0.0 || level < 0.0 || level > f64::from(i32::MAX) {
        return Err(invalid());
    }
    #[allow(clippy::cast_possible_truncation)]
    let index = level as i32;
    match api.element_text(index) {
        Ok(Some(text)) => Ok(Some(text)),
        Ok(None) | Err(_) => Err(DecodeError::MissingText {
            key: key.clone(),
            index,
        }),
    }
}

fn decode_parameter(
    info: &SymbolInfo,
    domain: Domain,
    records: Vec<(Key, f64)>,
    codec: &SpecialValues,
) -> std::result::Result<Symbol, DecodeError> {
    let values = decode_values(records, codec)?;
    let par = if values.is_empty() {
        GamsParameter::empty(info.dimension)?
    } else {
        GamsParameter::new(values)?
    };
    Ok(par.with_domain(domain)?.with_expl_text(&info.expl_text).into())
}

fn decode_scalar(
    info: &SymbolInfo,
    records: Vec<(Key, f64)>,
    codec: &SpecialValues,
) -> std::result::Result<Symbol, DecodeError> {
    if records.len() > 1 {
        return Err(DecodeError::ScalarRecords {
            records: records.len(),
        });
    }
    let value = decode_values(records, codec)?
        .pop()
        .map(|(_, value)| value)
        .unwrap_or_default();
    Ok(GamsScalar::new(value).with_expl_text(&info.expl_text).into())
}

fn decode_values(
    records: Vec<(Key, f64)>,
    codec: &SpecialValues,
) -> std::result::Result<Vec<(Key, gdx_model::GdxValue)>, DecodeError> {
    records
        .into_iter()
        .map(|(key, raw)| match codec.decode(raw) {
            Ok(value) => Ok((key, value)),
            Err(source) => Err(DecodeError::Value { key, source }),
        })
        .collect()
}
