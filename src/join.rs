//! Left outer join of the payroll table against the agency lookup table.

use crate::error::Result;
use crate::schema::{AGENCY, AGENCY_CODE, DEPARTMENT_TYPE};
use polars::prelude::*;
use serde::Serialize;

const ROW_ORDER: &str = "__row_order";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct JoinReport {
    pub total: usize,
    pub matched: usize,
    pub unmatched: usize,
}

impl JoinReport {
    pub fn lines(&self) -> Vec<String> {
        vec![
            format!("Total rows: {}", self.total),
            format!("Matched rows: {}", self.matched),
            format!("Unmatched rows: {}", self.unmatched),
        ]
    }
}

/// One row per agency; when a key repeats, its first row wins.
fn first_per_agency(lookup: DataFrame) -> LazyFrame {
    lookup
        .lazy()
        .select([
            col(AGENCY).cast(DataType::String),
            col(AGENCY_CODE).cast(DataType::String),
            col(DEPARTMENT_TYPE).cast(DataType::String),
        ])
        .group_by_stable([col(AGENCY)])
        .agg([col(AGENCY_CODE).first(), col(DEPARTMENT_TYPE).first()])
}

/// Attach `Agency_Code` and `Department_Type` to every row of `payroll`.
/// Rows keep their order and count; agencies missing from `lookup` get
/// nulls.
pub fn join_agencies(payroll: DataFrame, lookup: DataFrame) -> Result<(DataFrame, JoinReport)> {
    let mut columns: Vec<Expr> = payroll
        .get_column_names()
        .iter()
        .map(|name| col(name.as_str()))
        .collect();
    columns.push(col(AGENCY_CODE));
    columns.push(col(DEPARTMENT_TYPE));

    let left = payroll
        .lazy()
        .with_row_index(ROW_ORDER, None)
        .with_column(col(AGENCY).cast(DataType::String));

    let joined = left
        .join(
            first_per_agency(lookup),
            [col(AGENCY)],
            [col(AGENCY)],
            JoinArgs::new(JoinType::Left),
        )
        .sort([ROW_ORDER], SortMultipleOptions::default())
        .select(columns)
        .collect()?;

    let report = count_matches(&joined)?;
    Ok((joined, report))
}

/// A row counts as matched when its `Agency_Code` is present and not empty.
pub fn count_matches(joined: &DataFrame) -> Result<JoinReport> {
    let codes = joined.column(AGENCY_CODE)?.cast(&DataType::String)?;
    let matched = codes
        .str()?
        .into_iter()
        .filter(|code| code.is_some_and(|c| !c.is_empty()))
        .count();
    Ok(JoinReport {
        total: joined.height(),
        matched,
        unmatched: joined.height() - matched,
    })
}
