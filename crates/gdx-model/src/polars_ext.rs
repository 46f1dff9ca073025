//! Polars DataFrame export.
//!
//! Each key dimension becomes a string column named after its domain set, or
//! `dim_<n>` for universal dimensions. Parameters add a `value` column where
//! NA is null and EPS is zero; sets add a nullable `text` column.

use std::collections::HashSet;

use polars::prelude::*;

use crate::domain::Domain;
use crate::key::Key;
use crate::symbol::{GamsParameter, GamsSet};
use crate::value::{GdxValue, SpecialValue};

/// Column names for the key dimensions, made unique.
fn key_column_names(domain: &Domain) -> Vec<String> {
    let mut seen = HashSet::new();
    domain
        .iter()
        .enumerate()
        .map(|(idx, set)| {
            let base = set.map_or_else(|| format!("dim_{}", idx + 1), str::to_string);
            if seen.insert(base.clone()) {
                base
            } else {
                format!("{base}_{}", idx + 1)
            }
        })
        .collect()
}

fn key_columns(domain: &Domain, keys: &[&Key]) -> Vec<Column> {
    key_column_names(domain)
        .into_iter()
        .enumerate()
        .map(|(idx, name)| {
            let labels: Vec<String> = keys
                .iter()
                .map(|key| key.get(idx).unwrap_or_default().to_string())
                .collect();
            Column::new(name.into(), labels)
        })
        .collect()
}

fn value_to_cell(value: GdxValue) -> Option<f64> {
    match value {
        GdxValue::Special(SpecialValue::NotAvailable) => None,
        other => Some(other.to_f64()),
    }
}

impl GamsParameter {
    /// Export the records as a DataFrame.
    pub fn to_dataframe(&self) -> PolarsResult<DataFrame> {
        let keys: Vec<&Key> = self.keys().collect();
        let mut columns = key_columns(self.domain(), &keys);
        let values: Vec<Option<f64>> = self.values().map(value_to_cell).collect();
        columns.push(Column::new("value".into(), values));
        DataFrame::new(columns)
    }
}

impl GamsSet {
    /// Export the elements as a DataFrame.
    pub fn to_dataframe(&self) -> PolarsResult<DataFrame> {
        let keys: Vec<&Key> = self.iter().collect();
        let mut columns = key_columns(self.domain(), &keys);
        let texts: Vec<Option<String>> = self
            .elements()
            .map(|(_, text)| text.map(str::to_string))
            .collect();
        columns.push(Column::new("text".into(), texts));
        DataFrame::new(columns)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parameter_frame() {
        let par = GamsParameter::new([
            (("a", "x"), GdxValue::Number(1.0)),
            (("b", "y"), GdxValue::NA),
        ])
        .unwrap()
        .with_domain(vec![Some("i"), None])
        .unwrap();
        let df = par.to_dataframe().unwrap();
        assert_eq!(df.height(), 2);
        let names: Vec<String> = df
            .get_column_names()
            .into_iter()
            .map(|n| n.to_string())
            .collect();
        assert_eq!(names, vec!["i", "dim_2", "value"]);
        assert_eq!(df.column("value").unwrap().null_count(), 1);
    }

    #[test]
    fn test_repeated_domain_names() {
        let names = key_column_names(&Domain::from(vec!["i", "i"]));
        assert_eq!(names, vec!["i", "i_2"]);
    }

    #[test]
    fn test_set_frame() {
        let set = GamsSet::new(["a", "b"])
            .unwrap()
            .with_assoc_texts(["alpha", ""])
            .unwrap();
        let df = set.to_dataframe().unwrap();
        assert_eq!(df.width(), 2);
        assert_eq!(df.column("text").unwrap().null_count(), 1);
    }
}
