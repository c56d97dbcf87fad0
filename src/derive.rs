//! Columns computed from other columns.

use crate::error::Result;
use crate::schema::{IS_MANAGER, JOB_TITLE};
use polars::prelude::*;

/// Terms that mark a job title as managerial.
pub const MANAGER_TERMS: [&str; 2] = ["manager", "chief"];

fn is_manager_expr() -> Expr {
    let title = col(JOB_TITLE).cast(DataType::String).str().to_lowercase();
    MANAGER_TERMS
        .iter()
        .map(|term| title.clone().str().contains_literal(lit(*term)))
        .reduce(|acc, e| acc.or(e))
        .unwrap_or_else(|| lit(false))
        .fill_null(lit(false))
        .alias(IS_MANAGER)
}

/// Append (or replace) the `Is_Manager` column, computed from `JobTitle`.
pub fn with_manager_flag(frame: DataFrame) -> Result<DataFrame> {
    Ok(frame.lazy().with_column(is_manager_expr()).collect()?)
}
