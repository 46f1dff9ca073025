//! Dictionary-style access to a container's symbols.

use gdx_model::{IntoSymbol, Symbol};

use crate::error::Result;

/// A container viewed as a mapping from symbol names to symbols.
///
/// Names are matched without regard to case, as GDX does, and listed in
/// container order with their stored spelling.
pub trait SymbolMap {
    /// Read a symbol.
    fn get(&mut self, name: &str) -> Result<Symbol>;

    /// Write a new symbol. Existing symbols cannot be replaced.
    fn set<S: IntoSymbol>(&mut self, name: &str, value: S) -> Result<()>;

    /// GDX containers cannot drop symbols, so this always fails.
    fn remove(&mut self, name: &str) -> Result<()>;

    /// Symbol names in container order.
    fn names(&self) -> Result<Vec<String>>;

    /// Number of symbols.
    fn len(&self) -> Result<usize>;

    fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    fn contains(&self, name: &str) -> Result<bool>;
}
