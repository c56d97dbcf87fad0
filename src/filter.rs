//! Row filters and column projection.
//!
//! Callers check that the columns exist; these functions surface a polars
//! `ColumnNotFound` otherwise.

use crate::error::Result;
use polars::prelude::*;

/// Rows whose `column` contains `keyword`, ignoring case. The keyword is
/// matched literally. Nulls never match, and a column that is not text
/// matches nothing.
pub fn contains_ci(frame: &DataFrame, column: &str, keyword: &str) -> Result<DataFrame> {
    if frame.column(column)?.dtype() != &DataType::String {
        return Ok(frame.clear());
    }
    let predicate = col(column)
        .str()
        .to_lowercase()
        .str()
        .contains_literal(lit(keyword.to_lowercase()))
        .fill_null(lit(false));
    Ok(frame.clone().lazy().filter(predicate).collect()?)
}

/// Rows whose numeric `column` equals `value` exactly.
pub fn equals(frame: &DataFrame, column: &str, value: f64) -> Result<DataFrame> {
    let predicate = col(column)
        .cast(DataType::Float64)
        .eq(lit(value))
        .fill_null(lit(false));
    Ok(frame.clone().lazy().filter(predicate).collect()?)
}

/// Only the named columns, every row. Repeated names are kept once.
pub fn project(frame: &DataFrame, columns: &[&str]) -> Result<DataFrame> {
    let mut seen: Vec<&str> = Vec::with_capacity(columns.len());
    for name in columns {
        if !seen.contains(name) {
            seen.push(name);
        }
    }
    Ok(frame.select(seen)?)
}
