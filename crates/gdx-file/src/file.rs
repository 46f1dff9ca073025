//! The container handle.

use std::path::{Path, PathBuf};

use gdx_model::{IntoSymbol, Symbol};
use indexmap::IndexMap;

use crate::api::GdxApi;
use crate::error::{GdxError, Result, WriteError};
use crate::map::SymbolMap;
use crate::options::{GdxOptions, OpenMode};
use crate::reader::read_symbol;
use crate::summary::{ContainerSummary, SummaryRow};
use crate::writer::write_symbol;

/// An open GDX container.
///
/// The handle owns its library handle and closes it exactly once: through
/// [`GdxFile::close`], or when dropped.
///
/// ```
/// use gdx_file::{GamsSet, MemoryLibrary, OpenMode, SymbolMap};
///
/// let lib = MemoryLibrary::new();
/// {
///     let mut gdx = lib.open("sets.gdx", OpenMode::Write).unwrap();
///     let set = GamsSet::new(["a", "b"]).unwrap().with_expl_text("Letters");
///     gdx.set("letters", set).unwrap();
/// } // closed here
///
/// let mut gdx = lib.open("sets.gdx", OpenMode::Read).unwrap();
/// let set = gdx.get("LETTERS").unwrap().into_set().unwrap();
/// assert_eq!(set.len(), 2);
/// ```
#[derive(Debug)]
pub struct GdxFile<A: GdxApi> {
    api: A,
    path: PathBuf,
    mode: OpenMode,
    options: GdxOptions,
    open: bool,
}

impl<A: GdxApi> GdxFile<A> {
    /// Open a container with default options.
    pub fn open(api: A, path: impl AsRef<Path>, mode: OpenMode) -> Result<Self> {
        Self::open_with(api, path, mode, GdxOptions::default())
    }

    /// Open a container.
    ///
    /// Appending to a container that does not exist creates it.
    pub fn open_with(
        mut api: A,
        path: impl AsRef<Path>,
        mode: OpenMode,
        options: GdxOptions,
    ) -> Result<Self> {
        options.special_values.validate()?;
        let path = path.as_ref();
        let path = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());

        let opened = match mode {
            OpenMode::Read => api.open_read(&path),
            OpenMode::Write => api.open_write(&path, &options.producer),
            OpenMode::Append => match api.open_append(&path, &options.producer) {
                Err(err) if err.is_append_missing() => {
                    tracing::warn!(
                        path = %path.display(),
                        "container does not exist, creating it"
                    );
                    api.open_write(&path, &options.producer)
                }
                other => other,
            },
        };
        if let Err(err) = opened {
            return Err(if err.is_file_not_found() {
                GdxError::FileNotFound { path }
            } else {
                GdxError::FileAccess { path, source: err }
            });
        }

        let mut file = Self {
            api,
            path,
            mode,
            options,
            open: true,
        };
        file.api
            .set_special_values(&file.options.special_values.to_array())
            .map_err(|err| GdxError::library("set_special_values", err))?;

        tracing::debug!(path = %file.path.display(), mode = %mode, "opened GDX container");
        Ok(file)
    }

    /// Absolute path of the container.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[must_use]
    pub fn mode(&self) -> OpenMode {
        self.mode
    }

    #[must_use]
    pub fn options(&self) -> &GdxOptions {
        &self.options
    }

    /// Read the symbol at a 0-based position in the symbol table.
    pub fn get_by_index(&mut self, index: usize) -> Result<Symbol> {
        let len = SymbolMap::len(self)?;
        if index >= len {
            return Err(GdxError::IndexOutOfRange { index, len });
        }
        read_symbol(&mut self.api, index + 1, &self.options.special_values)
    }

    /// Read every symbol, in container order.
    pub fn read_all(&mut self) -> Result<IndexMap<String, Symbol>> {
        let len = SymbolMap::len(self)?;
        let mut symbols = IndexMap::with_capacity(len);
        for number in 1..=len {
            let name = self.symbol_name(number)?;
            let symbol = read_symbol(&mut self.api, number, &self.options.special_values)?;
            symbols.insert(name, symbol);
        }
        Ok(symbols)
    }

    /// Symbol table overview.
    pub fn summary(&self) -> Result<ContainerSummary> {
        let len = SymbolMap::len(self)?;
        let rows = (1..=len)
            .map(|number| {
                let info = self
                    .api
                    .symbol_info(number)
                    .map_err(|err| GdxError::library("symbol_info", err))?;
                Ok(SummaryRow {
                    id: number,
                    name: info.name,
                    symbol_type: info.symbol_type,
                    dimension: info.dimension,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(ContainerSummary {
            path: self.path.clone(),
            rows,
        })
    }

    /// Close the container, committing anything written.
    pub fn close(mut self) -> Result<()> {
        self.close_api()
    }

    fn close_api(&mut self) -> Result<()> {
        if !self.open {
            return Ok(());
        }
        self.open = false;
        self.api
            .close()
            .map_err(|err| GdxError::library("close", err))?;
        tracing::debug!(path = %self.path.display(), "closed GDX container");
        Ok(())
    }

    fn symbol_name(&self, number: usize) -> Result<String> {
        self.api
            .symbol_info(number)
            .map(|info| info.name)
            .map_err(|err| GdxError::library("symbol_info", err))
    }

    /// Symbol number of `name`. The library reports the universe `*` as
    /// number 0, which is not a symbol.
    fn find(&self, name: &str) -> Result<Option<usize>> {
        self.api
            .find_symbol(name)
            .map(|number| number.filter(|&number| number > 0))
            .map_err(|err| GdxError::library("find_symbol", err))
    }

    fn lookup(&self, name: &str) -> Result<usize> {
        self.find(name)?
            .ok_or_else(|| GdxError::symbol_not_found(name))
    }
}

impl<A: GdxApi> SymbolMap for GdxFile<A> {
    fn get(&mut self, name: &str) -> Result<Symbol> {
        let number = self.lookup(name)?;
        read_symbol(&mut self.api, number, &self.options.special_values)
    }

    fn set<S: IntoSymbol>(&mut self, name: &str, value: S) -> Result<()> {
        if !self.mode.is_writable() {
            return Err(GdxError::write(name, WriteError::ReadOnly));
        }
        let symbol = value
            .into_symbol()
            .map_err(|err| GdxError::shape(name, err))?;
        write_symbol(&mut self.api, name, &symbol, &self.options)
    }

    fn remove(&mut self, name: &str) -> Result<()> {
        self.lookup(name)?;
        let reason = if self.mode.is_writable() {
            WriteError::RemoveUnsupported
        } else {
            WriteError::ReadOnly
        };
        Err(GdxError::write(name, reason))
    }

    fn names(&self) -> Result<Vec<String>> {
        (1..=SymbolMap::len(self)?)
            .map(|number| self.symbol_name(number))
            .collect()
    }

    fn len(&self) -> Result<usize> {
        self.api
            .symbol_count()
            .map_err(|err| GdxError::library("symbol_count", err))
    }

    fn contains(&self, name: &str) -> Result<bool> {
        self.find(name).map(|number| number.is_some())
    }
}

impl<A: GdxApi> Drop for GdxFile<A> {
    fn drop(&mut self) {
        if let Err(err) = self.close_api() {
            tracing::warn!(path = %self.path.display(), error = %err, "closing GDX container failed");
        }
    }
}
