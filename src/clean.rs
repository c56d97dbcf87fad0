//! The cleaning pipeline that turns the raw payroll table into the cleaned table.

use crate::error::Result;
use crate::schema::{MISSING_TEXT, NOTES, NUMERIC_COLUMNS, SENTINEL, TEXT_COLUMNS, YEAR};
use crate::store::has_column;
use polars::prelude::*;
use tracing::debug;

/// True where the text form of `expr` contains the sentinel, ignoring case.
/// Nulls never match.
fn contains_sentinel(expr: Expr) -> Expr {
    expr.cast(DataType::String)
        .str()
        .to_lowercase()
        .str()
        .contains_literal(lit(SENTINEL))
        .fill_null(lit(false))
}

fn fill_numeric(name: &str) -> Expr {
    let amount = col(name).strict_cast(DataType::Float64);
    if name == YEAR {
        amount
            .strict_cast(DataType::Int64)
            .fill_null(lit(0i64))
    } else {
        amount.fill_null(lit(0.0f64))
    }
}

fn fill_text(name: &str) -> Expr {
    col(name)
        .cast(DataType::String)
        .fill_null(lit(MISSING_TEXT))
}

/// Run the cleaning steps in order:
///
/// 1. drop `Notes`
/// 2. drop every row with the sentinel in any column
/// 3. fill missing numeric values with 0 and missing text with `N/A`
/// 4. drop exact duplicate rows, keeping the first
///
/// Polars frames carry no index, so rows are always densely numbered from
/// zero and the index resets of the pipeline need no explicit step.
///
/// The raw table is expected to have every column of
/// [`crate::schema::raw_required_columns`]; `Notes` may be absent so that
/// the pipeline can be re-run on its own output.
pub fn clean_frame(raw: DataFrame) -> Result<DataFrame> {
    let raw_rows = raw.height();
    let frame = if has_column(&raw, NOTES) {
        raw.drop(NOTES)?
    } else {
        raw
    };

    let flagged = frame
        .get_column_names()
        .iter()
        .map(|name| contains_sentinel(col(name.as_str())))
        .reduce(|acc, e| acc.or(e));

    let mut lf = frame.lazy();
    if let Some(flagged) = flagged {
        lf = lf.filter(flagged.not());
    }

    let fills: Vec<Expr> = NUMERIC_COLUMNS
        .iter()
        .map(|name| fill_numeric(name))
        .chain(TEXT_COLUMNS.iter().map(|name| fill_text(name)))
        .collect();

    let cleaned = lf
        .with_columns(fills)
        .unique_stable(None, UniqueKeepStrategy::First)
        .collect()?;

    debug!(
        raw_rows,
        cleaned_rows = cleaned.height(),
        "cleaning pipeline finished"
    );
    Ok(cleaned)
}
