//! Encoding host symbols into a container.

use gdx_model::{Domain, GdxValue, Key, SpecialValues, Symbol, SymbolError};

use crate::api::{GMS_VAL_LEVEL, GMS_VAL_MAX, GdxApi, SymbolType, USER_INFO_DEFAULT};
use crate::error::{GdxError, Result, WriteError};
use crate::options::{DomainCheck, GdxOptions};

/// Longest GAMS identifier.
pub const MAX_IDENTIFIER_LEN: usize = 63;

/// True if `name` is a GAMS identifier: a letter followed by letters,
/// digits and underscores.
#[must_use]
pub fn is_valid_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    name.len() <= MAX_IDENTIFIER_LEN
        && first.is_ascii_alphabetic()
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// The level value of a record before it is handed to the library.
enum Level {
    Value(f64),
    Text(Option<String>),
}

struct Prepared {
    symbol_type: SymbolType,
    dimension: usize,
    domain: Option<Domain>,
    expl_text: String,
    records: Vec<(Vec<String>, Level)>,
}

/// Write `symbol` under `name`. Values are encoded before the symbol is
/// declared, so a bad value leaves the container untouched.
pub(crate) fn write_symbol<A: GdxApi + ?Sized>(
    api: &mut A,
    name: &str,
    symbol: &Symbol,
    options: &GdxOptions,
) -> Result<()> {
    if !is_valid_identifier(name) {
        return Err(GdxError::invalid_name(name));
    }
    let existing = api
        .find_symbol(name)
        .map_err(|err| GdxError::library("find_symbol", err))?;
    if existing.is_some() {
        return Err(GdxError::write(name, WriteError::DuplicateSymbol));
    }
    if options.domain_check == DomainCheck::Eager
        && let Some(domain) = symbol.domain()
    {
        check_domain(api, name, domain)?;
    }

    let prepared = prepare(name, symbol, &options.special_values)?;
    let records = prepared.records.len();
    emit(api, name, prepared).map_err(|err| GdxError::write(name, err))?;

    tracing::debug!(symbol = %name, kind = %symbol.kind(), records, "wrote symbol");
    Ok(())
}

fn prepare(name: &str, symbol: &Symbol, codec: &SpecialValues) -> Result<Prepared> {
    let encode = |key: &Key, value: GdxValue| {
        codec.encode(value).map_err(|source| match source {
            SymbolError::ReservedValue { .. } => GdxError::InvalidValue {
                symbol: name.to_string(),
                key: key.clone(),
                source,
            },
            other => GdxError::shape(name, other),
        })
    };

    let prepared = match symbol {
        Symbol::Set(set) => Prepared {
            symbol_type: SymbolType::Set,
            dimension: set.dimension(),
            domain: Some(set.domain().clone()),
            expl_text: set.expl_text().unwrap_or_default().to_string(),
            records: set
                .elements()
                .map(|(key, text)| {
                    (
                        key.labels().to_vec(),
                        Level::Text(text.map(str::to_string)),
                    )
                })
                .collect(),
        },
        Symbol::Parameter(par) => Prepared {
            symbol_type: SymbolType::Parameter,
            dimension: par.dimension(),
            domain: Some(par.domain().clone()),
            expl_text: par.expl_text().unwrap_or_default().to_string(),
            records: par
                .iter()
                .map(|(key, value)| -> Result<(Vec<String>, Level)> {
                    Ok((key.labels().to_vec(), Level::Value(encode(key, value)?)))
                })
                .collect::<Result<_>>()?,
        },
        Symbol::Scalar(scalar) => Prepared {
            symbol_type: SymbolType::Parameter,
            dimension: 0,
            domain: None,
            expl_text: scalar.expl_text().unwrap_or_default().to_string(),
            records: vec![(
                Vec::new(),
                Level::Value(encode(&Key::scalar(), scalar.value())?),
            )],
        },
    };
    Ok(prepared)
}

fn emit<A: GdxApi + ?Sized>(
    api: &mut A,
    name: &str,
    prepared: Prepared,
) -> std::result::Result<(), WriteError> {
    api.write_start(
        name,
        &prepared.expl_text,
        prepared.dimension,
        prepared.symbol_type,
        USER_INFO_DEFAULT,
    )?;

    if let Err(err) = emit_records(api, name, prepared) {
        if let Err(abort) = api.write_abort() {
            tracing::warn!(symbol = %name, error = %abort, "failed to abort partial symbol");
        }
        return Err(err);
    }
    api.write_done()?;
    Ok(())
}

/// Domain and records of a declared symbol. The caller ends the symbol.
fn emit_records<A: GdxApi + ?Sized>(
    api: &mut A,
    name: &str,
    prepared: Prepared,
) -> std::result::Result<(), WriteError> {
    if let Some(domain) = prepared.domain.filter(|_| prepared.dimension > 0)
        && let Some(number) = api.find_symbol(name)?
    {
        api.set_symbol_domain(number, &domain.to_native())?;
    }

    for (keys, level) in prepared.records {
        let mut values = [0.0; GMS_VAL_MAX];
        values[GMS_VAL_LEVEL] = match level {
            Level::Value(value) => value,
            Level::Text(None) => 0.0,
            Level::Text(Some(text)) => f64::from(api.add_set_text(&text)?),
        };
        api.write_record(&keys, &values)?;
    }
    Ok(())
}

/// Every named domain must be an existing one-dimensional set or alias.
fn check_domain<A: GdxApi + ?Sized>(api: &A, name: &str, domain: &Domain) -> Result<()> {
    for set in domain.named_sets() {
        let number = api
            .find_symbol(set)
            .map_err(|err| GdxError::library("find_symbol", err))?
            .ok_or_else(|| {
                GdxError::write(
                    name,
                    WriteError::UnknownDomain {
                        set: set.to_string(),
                    },
                )
            })?;
        let info = api
            .symbol_info(number)
            .map_err(|err| GdxError::library("symbol_info", err))?;
        let is_set = matches!(info.symbol_type, SymbolType::Set | SymbolType::Alias);
        if !is_set || info.dimension != 1 {
            return Err(GdxError::write(
                name,
                WriteError::DomainNotASet {
                    set: set.to_string(),
                },
            ));
        }
    }
    Ok(())
}
