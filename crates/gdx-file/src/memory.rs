//! In-process GDX backend.
//!
//! [`MemoryLibrary`] is a container store shared by any number of
//! [`MemoryGdx`] handles. It behaves like the GDX library where the
//! marshalling layer can observe it:
//!
//! - labels are registered as unique elements (UELs) in first-seen order,
//!   matched case-insensitively, and records come back sorted by UEL number;
//! - symbol lookup ignores case;
//! - written containers become visible when the writer closes;
//! - a path has at most one writer, and cannot be read while it is written;
//! - values are stored with the GAMS sentinels and translated through each
//!   handle's special-value table.
//!
//! Besides the library's own error numbers for a missing file and a failed
//! append, the backend reports its own small set of error numbers.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use gdx_model::SpecialValues;
use gdx_model::special::SV_COUNT;

use crate::api::{
    ApiResult, ERR_APPEND_MISSING, ERR_FILE_NOT_FOUND, GMS_MAX_INDEX_DIM, GdxApi, LibraryError,
    RawRecord, RecordValues, SymbolInfo, SymbolType,
};
use crate::error::Result;
use crate::file::GdxFile;
use crate::options::{GdxOptions, OpenMode};

/// The path is being written by another handle.
pub const ERR_LOCKED: i32 = 13;
/// The call is not valid in the handle's current mode.
pub const ERR_BAD_MODE: i32 = 101;
/// No symbol with this number.
pub const ERR_BAD_SYMBOL: i32 = 102;
/// A symbol with this name already exists.
pub const ERR_DUPLICATE_SYMBOL: i32 = 103;
/// Two records share a key.
pub const ERR_DUPLICATE_RECORD: i32 = 104;
/// Key or domain length differs from the symbol dimension.
pub const ERR_BAD_DIMENSION: i32 = 105;
/// Read or write calls out of sequence.
pub const ERR_BAD_SEQUENCE: i32 = 106;

type StoredRecord = (Vec<usize>, RecordValues);

#[derive(Debug, Clone)]
struct StoredSymbol {
    name: String,
    expl_text: String,
    dimension: usize,
    symbol_type: SymbolType,
    user_info: i32,
    domain: Option<Vec<String>>,
    records: Vec<StoredRecord>,
}

#[derive(Debug, Clone)]
struct StoredFile {
    producer: String,
    uels: Vec<String>,
    uel_lookup: HashMap<String, usize>,
    texts: Vec<String>,
    symbols: Vec<StoredSymbol>,
}

impl StoredFile {
    fn new(producer: &str) -> Self {
        Self {
            producer: producer.to_string(),
            uels: Vec::new(),
            uel_lookup: HashMap::new(),
            // Text number 0 is the empty text.
            texts: vec![String::new()],
            symbols: Vec::new(),
        }
    }

    fn symbol(&self, number: usize) -> ApiResult<&StoredSymbol> {
        number
            .checked_sub(1)
            .and_then(|idx| self.symbols.get(idx))
            .ok_or_else(|| bad_symbol(number))
    }

    fn find(&self, name: &str) -> Option<usize> {
        self.symbols
            .iter()
            .position(|sym| sym.name.eq_ignore_ascii_case(name))
            .map(|idx| idx + 1)
    }

    fn register_uel(&mut self, label: &str) -> usize {
        let folded = label.to_lowercase();
        if let Some(&idx) = self.uel_lookup.get(&folded) {
            return idx;
        }
        let idx = self.uels.len();
        self.uels.push(label.to_string());
        self.uel_lookup.insert(folded, idx);
        idx
    }
}

#[derive(Debug, Default)]
struct Store {
    files: HashMap<PathBuf, StoredFile>,
    writers: HashSet<PathBuf>,
    open_handles: usize,
}

/// A shared store of in-memory containers.
///
/// Cloning the library shares the store.
///
/// ```
/// use gdx_file::{MemoryLibrary, OpenMode, SymbolMap};
///
/// let lib = MemoryLibrary::new();
/// let mut gdx = lib.open("demo.gdx", OpenMode::Write).unwrap();
/// gdx.set("n", 10).unwrap();
/// gdx.close().unwrap();
///
/// let gdx = lib.open("demo.gdx", OpenMode::Read).unwrap();
/// assert_eq!(gdx.names().unwrap(), vec!["n"]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryLibrary {
    store: Arc<Mutex<Store>>,
}

impl MemoryLibrary {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A fresh handle on this store.
    #[must_use]
    pub fn handle(&self) -> MemoryGdx {
        MemoryGdx {
            store: Arc::clone(&self.store),
            state: HandleState::Closed,
            special_values: SpecialValues::default(),
        }
    }

    /// Open a container with default options.
    pub fn open(&self, path: impl AsRef<Path>, mode: OpenMode) -> Result<GdxFile<MemoryGdx>> {
        GdxFile::open(self.handle(), path, mode)
    }

    /// Open a container with the given options.
    pub fn open_with_options(
        &self,
        path: impl AsRef<Path>,
        mode: OpenMode,
        options: GdxOptions,
    ) -> Result<GdxFile<MemoryGdx>> {
        GdxFile::open_with(self.handle(), path, mode, options)
    }

    /// True if a committed container exists at `path`.
    #[must_use]
    pub fn exists(&self, path: impl AsRef<Path>) -> bool {
        let path = normalize(path.as_ref());
        lock(&self.store).files.contains_key(&path)
    }

    /// Producer recorded in the container at `path`.
    #[must_use]
    pub fn producer(&self, path: impl AsRef<Path>) -> Option<String> {
        let path = normalize(path.as_ref());
        lock(&self.store)
            .files
            .get(&path)
            .map(|file| file.producer.clone())
    }

    /// Number of handles with an open container.
    #[must_use]
    pub fn open_handles(&self) -> usize {
        lock(&self.store).open_handles
    }
}

#[derive(Debug)]
struct ReadCursor {
    symbol: usize,
    position: usize,
}

#[derive(Debug)]
struct PendingSymbol {
    symbol: usize,
    records: Vec<StoredRecord>,
}

#[derive(Debug)]
enum HandleState {
    Closed,
    Reading {
        file: StoredFile,
        cursor: Option<ReadCursor>,
    },
    Writing {
        path: PathBuf,
        file: StoredFile,
        pending: Option<PendingSymbol>,
    },
}

/// One handle on a [`MemoryLibrary`].
#[derive(Debug)]
pub struct MemoryGdx {
    store: Arc<Mutex<Store>>,
    state: HandleState,
    special_values: SpecialValues,
}

impl MemoryGdx {
    fn file(&self) -> ApiResult<&StoredFile> {
        match &self.state {
            HandleState::Reading { file, .. } | HandleState::Writing { file, .. } => Ok(file),
            HandleState::Closed => Err(not_open()),
        }
    }

    fn ensure_closed(&self) -> ApiResult<()> {
        match self.state {
            HandleState::Closed => Ok(()),
            _ => Err(LibraryError::new(
                ERR_BAD_MODE,
                "handle already has an open container",
            )),
        }
    }

    /// Take the write lock on `path`. Without a fresh file the existing
    /// container is appended to.
    fn begin_write(&mut self, path: &Path, fresh: Option<StoredFile>) -> ApiResult<()> {
        self.ensure_closed()?;
        let path = normalize(path);
        let mut store = lock(&self.store);
        if store.writers.contains(&path) {
            return Err(locked(&path));
        }
        let file = match fresh.or_else(|| store.files.get(&path).cloned()) {
            Some(file) => file,
            None => {
                return Err(LibraryError::new(
                    ERR_APPEND_MISSING,
                    format!("cannot append to missing file {}", path.display()),
                ));
            }
        };
        store.writers.insert(path.clone());
        store.open_handles += 1;
        drop(store);
        self.state = HandleState::Writing {
            path,
            file,
            pending: None,
        };
        Ok(())
    }
}

impl GdxApi for MemoryGdx {
    fn open_read(&mut self, path: &Path) -> ApiResult<()> {
        self.ensure_closed()?;
        let path = normalize(path);
        let mut store = lock(&self.store);
        if store.writers.contains(&path) {
            return Err(locked(&path));
        }
        let file = store.files.get(&path).cloned().ok_or_else(|| {
            LibraryError::new(
                ERR_FILE_NOT_FOUND,
                format!("file not found: {}", path.display()),
            )
        })?;
        store.open_handles += 1;
        drop(store);
        self.state = HandleState::Reading { file, cursor: None };
        Ok(())
    }

    fn open_write(&mut self, path: &Path, producer: &str) -> ApiResult<()> {
        self.begin_write(path, Some(StoredFile::new(producer)))
    }

    fn open_append(&mut self, path: &Path, _producer: &str) -> ApiResult<()> {
        self.begin_write(path, None)
    }

    fn close(&mut self) -> ApiResult<()> {
        let state = std::mem::replace(&mut self.state, HandleState::Closed);
        let mut store = lock(&self.store);
        match state {
            HandleState::Closed => Ok(()),
            HandleState::Reading { .. } => {
                store.open_handles = store.open_handles.saturating_sub(1);
                Ok(())
            }
            HandleState::Writing {
                path,
                mut file,
                pending,
            } => {
                let finished = match pending {
                    Some(pending) => finish_symbol(&mut file, pending),
                    None => Ok(()),
                };
                store.files.insert(path.clone(), file);
                store.writers.remove(&path);
                store.open_handles = store.open_handles.saturating_sub(1);
                finished
            }
        }
    }

    fn set_special_values(&mut self, values: &[f64; SV_COUNT]) -> ApiResult<()> {
        self.special_values = SpecialValues::from_array(*values);
        Ok(())
    }

    fn symbol_count(&self) -> ApiResult<usize> {
        Ok(self.file()?.symbols.len())
    }

    fn symbol_info(&self, number: usize) -> ApiResult<SymbolInfo> {
        let sym = self.file()?.symbol(number)?;
        Ok(SymbolInfo {
            name: sym.name.clone(),
            dimension: sym.dimension,
            symbol_type: sym.symbol_type,
            records: sym.records.len(),
            user_info: sym.user_info,
            expl_text: sym.expl_text.clone(),
        })
    }

    fn find_symbol(&self, name: &str) -> ApiResult<Option<usize>> {
        Ok(self.file()?.find(name))
    }

    fn symbol_domain(&self, number: usize) -> ApiResult<Vec<String>> {
        let sym = self.file()?.symbol(number)?;
        Ok(sym
            .domain
            .clone()
            .unwrap_or_else(|| vec!["*".to_string(); sym.dimension]))
    }

    fn read_start(&mut self, number: usize) -> ApiResult<usize> {
        let HandleState::Reading { file, cursor } = &mut self.state else {
            return Err(wrong_mode("read"));
        };
        let records = file.symbol(number)?.records.len();
        *cursor = Some(ReadCursor {
            symbol: number,
            position: 0,
        });
        Ok(records)
    }

    fn read_record(&mut self) -> ApiResult<Option<RawRecord>> {
        let HandleState::Reading { file, cursor } = &mut self.state else {
            return Err(wrong_mode("read"));
        };
        let cursor = cursor
            .as_mut()
            .ok_or_else(|| LibraryError::new(ERR_BAD_SEQUENCE, "no symbol is being read"))?;
        let sym = file.symbol(cursor.symbol)?;
        let Some((uels, values)) = sym.records.get(cursor.position) else {
            return Ok(None);
        };
        cursor.position += 1;
        let keys = uels.iter().map(|&idx| file.uels[idx].clone()).collect();
        let stored = SpecialValues::default();
        let values = values.map(|v| translate(v, &stored, &self.special_values));
        Ok(Some(RawRecord { keys, values }))
    }

    fn read_done(&mut self) -> ApiResult<()> {
        if let HandleState::Reading { cursor, .. } = &mut self.state {
            *cursor = None;
        }
        Ok(())
    }

    fn element_text(&self, index: i32) -> ApiResult<Option<String>> {
        let file = self.file()?;
        Ok(usize::try_from(index)
            .ok()
            .and_then(|idx| file.texts.get(idx))
            .cloned())
    }

    fn write_start(
        &mut self,
        name: &str,
        expl_text: &str,
        dimension: usize,
        symbol_type: SymbolType,
        user_info: i32,
    ) -> ApiResult<()> {
        let HandleState::Writing { file, pending, .. } = &mut self.state else {
            return Err(wrong_mode("write"));
        };
        if pending.is_some() {
            return Err(LibraryError::new(
                ERR_BAD_SEQUENCE,
                "another symbol is still being written",
            ));
        }
        if dimension > GMS_MAX_INDEX_DIM {
            return Err(LibraryError::new(
                ERR_BAD_DIMENSION,
                format!("dimension {dimension} exceeds {GMS_MAX_INDEX_DIM}"),
            ));
        }
        if file.find(name).is_some() {
            return Err(LibraryError::new(
                ERR_DUPLICATE_SYMBOL,
                format!("duplicate symbol {name}"),
            ));
        }
        file.symbols.push(StoredSymbol {
            name: name.to_string(),
            expl_text: expl_text.to_string(),
            dimension,
            symbol_type,
            user_info,
            domain: None,
            records: Vec::new(),
        });
        *pending = Some(PendingSymbol {
            symbol: file.symbols.len(),
            records: Vec::new(),
        });
        Ok(())
    }

    fn set_symbol_domain(&mut self, number: usize, domain: &[String]) -> ApiResult<()> {
        let HandleState::Writing { file, .. } = &mut self.state else {
            return Err(wrong_mode("write"));
        };
        let idx = number
            .checked_sub(1)
            .filter(|&idx| idx < file.symbols.len())
            .ok_or_else(|| bad_symbol(number))?;
        let sym = &mut file.symbols[idx];
        if domain.len() != sym.dimension {
            return Err(LibraryError::new(
                ERR_BAD_DIMENSION,
                format!(
                    "domain has {} entries for a {}-dimensional symbol",
                    domain.len(),
                    sym.dimension
                ),
            ));
        }
        sym.domain = Some(domain.to_vec());
        Ok(())
    }

    fn write_record(&mut self, keys: &[String], values: &RecordValues) -> ApiResult<()> {
        let HandleState::Writing { file, pending, .. } = &mut self.state else {
            return Err(wrong_mode("write"));
        };
        let pending = pending
            .as_mut()
            .ok_or_else(|| LibraryError::new(ERR_BAD_SEQUENCE, "no symbol is being written"))?;
        let dimension = file.symbol(pending.symbol)?.dimension;
        if keys.len() != dimension {
            return Err(LibraryError::new(
                ERR_BAD_DIMENSION,
                format!("{} label(s) for a {dimension}-dimensional symbol", keys.len()),
            ));
        }
        let uels = keys.iter().map(|label| file.register_uel(label)).collect();
        let stored = SpecialValues::default();
        let values = values.map(|v| translate(v, &self.special_values, &stored));
        pending.records.push((uels, values));
        Ok(())
    }

    fn write_done(&mut self) -> ApiResult<()> {
        let HandleState::Writing { file, pending, .. } = &mut self.state else {
            return Err(wrong_mode("write"));
        };
        let pending = pending
            .take()
            .ok_or_else(|| LibraryError::new(ERR_BAD_SEQUENCE, "no symbol is being written"))?;
        finish_symbol(file, pending)
    }

    /// Drops the symbol being written. Labels its records registered stay in
    /// the UEL table.
    fn write_abort(&mut self) -> ApiResult<()> {
        let HandleState::Writing { file, pending, .. } = &mut self.state else {
            return Err(wrong_mode("write"));
        };
        let pending = pending
            .take()
            .ok_or_else(|| LibraryError::new(ERR_BAD_SEQUENCE, "no symbol is being written"))?;
        file.symbols.truncate(pending.symbol - 1);
        Ok(())
    }

    fn add_set_text(&mut self, text: &str) -> ApiResult<i32> {
        let HandleState::Writing { file, .. } = &mut self.state else {
            return Err(wrong_mode("write"));
        };
        let idx = match file.texts.iter().position(|t| t == text) {
            Some(idx) => idx,
            None => {
                file.texts.push(text.to_string());
                file.texts.len() - 1
            }
        };
        i32::try_from(idx).map_err(|_| LibraryError::new(ERR_BAD_SEQUENCE, "too many set texts"))
    }
}

impl Drop for MemoryGdx {
    fn drop(&mut self) {
        if let Err(err) = self.close() {
            tracing::warn!(error = %err, "closing in-memory GDX handle failed");
        }
    }
}

/// Sort the pending records into UEL order and store them. A symbol with
/// duplicate keys is dropped.
fn finish_symbol(file: &mut StoredFile, pending: PendingSymbol) -> ApiResult<()> {
    let mut records = pending.records;
    records.sort_by(|a, b| a.0.cmp(&b.0));
    if let Some(pair) = records.windows(2).find(|pair| pair[0].0 == pair[1].0) {
        let labels: Vec<&str> = pair[0].0.iter().map(|&idx| file.uels[idx].as_str()).collect();
        let name = file
            .symbols
            .get(pending.symbol - 1)
            .map(|sym| sym.name.clone())
            .unwrap_or_default();
        file.symbols.truncate(pending.symbol - 1);
        return Err(LibraryError::new(
            ERR_DUPLICATE_RECORD,
            format!("duplicate record {} in symbol {name}", labels.join(".")),
        ));
    }
    let sym = file
        .symbols
        .get_mut(pending.symbol - 1)
        .ok_or_else(|| bad_symbol(pending.symbol))?;
    sym.records = records;
    Ok(())
}

/// Map a value between two sentinel tables, leaving ordinary values alone.
fn translate(value: f64, from: &SpecialValues, to: &SpecialValues) -> f64 {
    if value.to_bits() == from.undefined.to_bits() {
        return to.undefined;
    }
    from.classify(value).map_or(value, |sv| to.sentinel(sv))
}

fn normalize(path: &Path) -> PathBuf {
    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}

fn lock(store: &Mutex<Store>) -> MutexGuard<'_, Store> {
    store.lock().unwrap_or_else(PoisonError::into_inner)
}

fn not_open() -> LibraryError {
    LibraryError::new(ERR_BAD_MODE, "no container is open")
}

fn wrong_mode(operation: &str) -> LibraryError {
    LibraryError::new(
        ERR_BAD_MODE,
        format!("container is not open for {operation}ing"),
    )
}

fn bad_symbol(number: usize) -> LibraryError {
    LibraryError::new(ERR_BAD_SYMBOL, format!("bad symbol number {number}"))
}

fn locked(path: &Path) -> LibraryError {
    LibraryError::new(
        ERR_LOCKED,
        format!("{} is being written by another handle", path.display()),
    )
}
