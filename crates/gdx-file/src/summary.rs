//! Symbol table overview.

use std::fmt;
use std::path::PathBuf;

use crate::api::SymbolType;

/// One symbol table entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryRow {
    /// 1-based symbol number.
    pub id: usize,
    pub name: String,
    pub symbol_type: SymbolType,
    pub dimension: usize,
}

/// The symbol table of a container.
///
/// `Display` renders a fixed-width table:
///
/// ```text
/// GDX file at '/tmp/data.gdx'
///
/// id  name                type dim
/// --------------------------------
/// 1   set1                set    1
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerSummary {
    pub path: PathBuf,
    pub rows: Vec<SummaryRow>,
}

impl fmt::Display for ContainerSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "GDX file at '{}'", self.path.display())?;
        writeln!(f)?;
        writeln!(f, "{:<4}{:<20}{:<5}{:<3}", "id", "name", "type", "dim")?;
        writeln!(f, "{}", "-".repeat(4 + 20 + 5 + 3))?;
        for row in &self.rows {
            let kind = &row.symbol_type.as_str()[..3];
            writeln!(
                f,
                "{:<4}{:<20}{:<5}{:>3}",
                row.id, row.name, kind, row.dimension
            )?;
        }
        Ok(())
    }
}
