//! The operations behind each button of the form.
//!
//! Every operation checks its preconditions (files, columns, parameters)
//! before doing any work, reads the tables it needs from disk and writes
//! its artifacts back before returning. A failed operation leaves files
//! from earlier operations untouched.

use crate::clean::clean_frame;
use crate::derive::with_manager_flag;
use crate::error::{PayscopeError, Result};
use crate::filter::{contains_ci, equals, project};
use crate::join::{join_agencies, JoinReport};
use crate::lookup::default_agency_codes;
use crate::schema::{
    raw_required_columns, AGENCY, EMPLOYEE_NAME, IS_MANAGER, JOB_TITLE, LOOKUP_COLUMNS,
    NUMERIC_COLUMNS, TOTAL_PAY, YEAR,
};
use crate::statistics::{
    above_mean, summarize, yearly_average_frame, yearly_average_pay, PayrollSummary,
    DEFAULT_TOP_N,
};
use crate::store::{ensure_exists, load_csv, require_columns, save_csv, DataPaths, ReadMode};
use polars::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    /// First rows of the raw file; the count is the text typed by the user.
    Preview { rows: String },
    /// Job title substring search on the raw file.
    SearchTitles { keyword: String },
    TwoColumns,
    Clean,
    HighEarners,
    FlagManagers,
    Statistics,
    YearlyAverages,
    FilterYear { year: String },
    Join,
}

impl Operation {
    pub fn label(&self) -> &'static str {
        match self {
            Operation::Preview { .. } => "Preview",
            Operation::SearchTitles { .. } => "Search",
            Operation::TwoColumns => "Two columns",
            Operation::Clean => "Clean",
            Operation::HighEarners => "High earners",
            Operation::FlagManagers => "Flag managers",
            Operation::Statistics => "Statistics",
            Operation::YearlyAverages => "By year",
            Operation::FilterYear { .. } => "Year filter",
            Operation::Join => "Join",
        }
    }
}

/// What a successful operation produced.
#[derive(Debug, Clone)]
pub enum Outcome {
    Table {
        frame: DataFrame,
        notice: Option<String>,
    },
    Summary {
        lines: Vec<String>,
    },
    Joined {
        frame: DataFrame,
        report: JoinReport,
    },
    /// The operation worked but selected no rows.
    Empty {
        message: String,
    },
}

impl Outcome {
    fn rows_or_empty(frame: DataFrame) -> Self {
        Self::table_or_empty(frame, None, "No matching rows")
    }

    /// A table outcome, or `Empty` with `empty` as its message when the
    /// frame has no rows. Files written along the way stay written.
    fn table_or_empty(frame: DataFrame, notice: Option<String>, empty: &str) -> Self {
        if frame.height() == 0 {
            Outcome::Empty {
                message: empty.to_string(),
            }
        } else {
            Outcome::Table { frame, notice }
        }
    }

    fn joined_or_empty(frame: DataFrame, report: JoinReport) -> Self {
        if frame.height() == 0 {
            Outcome::Empty {
                message: "Merged table written with no rows".to_string(),
            }
        } else {
            Outcome::Joined { frame, report }
        }
    }
}

/// Parse a row count typed by the user. It must be a positive integer no
/// larger than `available`.
pub fn parse_row_count(text: &str, available: usize) -> Result<usize> {
    within(parse_positive(text)?, available)
}

fn within(n: usize, available: usize) -> Result<usize> {
    if n > available {
        return Err(PayscopeError::invalid(format!(
            "Number exceeds dataset size ({available} rows)"
        )));
    }
    Ok(n)
}

fn parse_positive(text: &str) -> Result<usize> {
    match text.trim().parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(PayscopeError::invalid("Enter a valid positive number")),
    }
}

pub fn parse_year(text: &str) -> Result<i64> {
    text.trim()
        .parse::<i64>()
        .map_err(|_| PayscopeError::invalid(format!("'{}' is not a year", text.trim())))
}

/// The set of files the operations work on.
#[derive(Debug, Clone)]
pub struct Workspace {
    pub paths: DataPaths,
    pub top_n: usize,
}

impl Workspace {
    pub fn new(paths: DataPaths) -> Self {
        Self {
            paths,
            top_n: DEFAULT_TOP_N,
        }
    }

    pub fn with_top_n(mut self, top_n: usize) -> Self {
        self.top_n = top_n;
        self
    }

    pub fn run(&self, operation: &Operation) -> Result<Outcome> {
        info!(operation = operation.label(), "running operation");
        let result = match operation {
            Operation::Preview { rows } => self.preview(rows),
            Operation::SearchTitles { keyword } => self.search_titles(keyword),
            Operation::TwoColumns => self.two_columns(),
            Operation::Clean => self.clean(),
            Operation::HighEarners => self.high_earners(),
            Operation::FlagManagers => self.flag_managers(),
            Operation::Statistics => self.summary().map(|summary| Outcome::Summary {
                lines: summary.lines(),
            }),
            Operation::YearlyAverages => self.yearly_averages(),
            Operation::FilterYear { year } => self.filter_year(year),
            Operation::Join => self
                .join()
                .map(|(frame, report)| Outcome::joined_or_empty(frame, report)),
        };
        match &result {
            Err(e) if e.is_precondition() => {
                warn!(operation = operation.label(), error = %e, "operation refused")
            }
            Err(e) => error!(operation = operation.label(), error = %e, "operation failed"),
            Ok(_) => {}
        }
        result
    }

    fn load_checked<'a>(
        &self,
        path: &Path,
        mode: ReadMode,
        columns: impl IntoIterator<Item = &'a str>,
    ) -> Result<DataFrame> {
        let frame = load_csv(path, mode)?;
        require_columns(&frame, columns, path)?;
        Ok(frame)
    }

    /// The cleaned table, checked for `columns`.
    pub fn load_cleaned<'a>(
        &self,
        columns: impl IntoIterator<Item = &'a str>,
    ) -> Result<DataFrame> {
        self.load_checked(&self.paths.cleaned, ReadMode::Inferred, columns)
    }

    pub fn preview(&self, rows: &str) -> Result<Outcome> {
        ensure_exists(&self.paths.data)?;
        let requested = parse_positive(rows)?;
        let frame = load_csv(&self.paths.data, ReadMode::Inferred)?;
        let n = within(requested, frame.height())?;
        Ok(Outcome::Table {
            frame: frame.head(Some(n)),
            notice: None,
        })
    }

    pub fn search_titles(&self, keyword: &str) -> Result<Outcome> {
        let keyword = keyword.trim();
        if keyword.is_empty() {
            return Err(PayscopeError::invalid("Please enter a valid keyword"));
        }
        let frame = self.load_checked(&self.paths.data, ReadMode::Inferred, [JOB_TITLE])?;
        let matches = contains_ci(&frame, JOB_TITLE, keyword)?;
        info!(keyword, matches = matches.height(), "job title search");
        Ok(Outcome::rows_or_empty(matches))
    }

    pub fn two_columns(&self) -> Result<Outcome> {
        let frame = self.load_checked(
            &self.paths.data,
            ReadMode::Inferred,
            [EMPLOYEE_NAME, JOB_TITLE],
        )?;
        Ok(Outcome::rows_or_empty(project(
            &frame,
            &[EMPLOYEE_NAME, JOB_TITLE],
        )?))
    }

    pub fn clean(&self) -> Result<Outcome> {
        let raw = self.load_checked(&self.paths.data, ReadMode::Text, raw_required_columns())?;
        let raw_rows = raw.height();
        let mut cleaned = clean_frame(raw)?;
        save_csv(&mut cleaned, &self.paths.cleaned)?;
        info!(
            raw_rows,
            cleaned_rows = cleaned.height(),
            path = %self.paths.cleaned.display(),
            "cleaned table written"
        );
        Ok(Outcome::table_or_empty(
            cleaned,
            Some("Data cleaned successfully".to_string()),
            "Data cleaned, but no rows remain",
        ))
    }

    pub fn high_earners(&self) -> Result<Outcome> {
        let frame = self.load_cleaned([TOTAL_PAY])?;
        Ok(Outcome::rows_or_empty(above_mean(&frame)?))
    }

    pub fn flag_managers(&self) -> Result<Outcome> {
        let frame = self.load_cleaned([JOB_TITLE])?;
        let mut flagged = with_manager_flag(frame)?;
        save_csv(&mut flagged, &self.paths.cleaned)?;
        let managers = flagged
            .column(IS_MANAGER)?
            .bool()?
            .into_iter()
            .filter(|flag| *flag == Some(true))
            .count();
        info!(managers, "manager flag written");
        let notice = format!(
            "{IS_MANAGER} added to {} ({managers} managers)",
            self.paths.cleaned.display()
        );
        Ok(Outcome::table_or_empty(
            flagged,
            Some(notice),
            "Cleaned table has no rows to flag",
        ))
    }

    pub fn summary(&self) -> Result<PayrollSummary> {
        let frame = self.load_cleaned(NUMERIC_COLUMNS.into_iter().chain([JOB_TITLE]))?;
        summarize(&frame, self.top_n)
    }

    pub fn yearly_averages(&self) -> Result<Outcome> {
        let frame = self.load_cleaned([YEAR, TOTAL_PAY])?;
        let averages = yearly_average_pay(&frame)?;
        Ok(Outcome::rows_or_empty(yearly_average_frame(&averages)?))
    }

    pub fn filter_year(&self, year: &str) -> Result<Outcome> {
        let year = parse_year(year)?;
        let frame = self.load_cleaned([YEAR])?;
        Ok(Outcome::rows_or_empty(equals(&frame, YEAR, year as f64)?))
    }

    pub fn join(&self) -> Result<(DataFrame, JoinReport)> {
        let payroll = self.load_cleaned([AGENCY])?;
        let lookup = self.load_checked(&self.paths.lookup, ReadMode::Text, LOOKUP_COLUMNS)?;
        let (mut joined, report) = join_agencies(payroll, lookup)?;
        save_csv(&mut joined, &self.paths.merged)?;
        info!(
            total = report.total,
            matched = report.matched,
            unmatched = report.unmatched,
            path = %self.paths.merged.display(),
            "merged table written"
        );
        Ok((joined, report))
    }

    /// Write the bundled agency table to the lookup path.
    pub fn init_lookup(&self, force: bool) -> Result<PathBuf> {
        let path = &self.paths.lookup;
        if path.exists() && !force {
            return Err(PayscopeError::invalid(format!(
                "{} already exists. Use --force to overwrite.",
                path.display()
            )));
        }
        let mut lookup = default_agency_codes()?;
        save_csv(&mut lookup, path)?;
        info!(path = %path.display(), agencies = lookup.height(), "lookup table written");
        Ok(path.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_row_count() {
        assert_eq!(parse_row_count("3", 10).unwrap(), 3);
        assert_eq!(parse_row_count(" 10 ", 10).unwrap(), 10);
        for bad in ["0", "-3", "abc", "", "2.5"] {
            assert!(
                matches!(parse_row_count(bad, 10), Err(PayscopeError::InvalidParameter(_))),
                "{bad}"
            );
        }
        assert!(matches!(
            parse_row_count("11", 10),
            Err(PayscopeError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_parse_year() {
        assert_eq!(parse_year("2014").unwrap(), 2014);
        assert!(parse_year("twenty").is_err());
    }

    #[test]
    fn test_labels_are_distinct() {
        let ops = [
            Operation::Preview { rows: "1".into() },
            Operation::SearchTitles { keyword: "x".into() },
            Operation::TwoColumns,
            Operation::Clean,
            Operation::HighEarners,
            Operation::FlagManagers,
            Operation::Statistics,
            Operation::YearlyAverages,
            Operation::FilterYear { year: "2012".into() },
            Operation::Join,
        ];
        let mut labels: Vec<_> = ops.iter().map(|o| o.label()).collect();
        labels.sort();
        labels.dedup();
        assert_eq!(labels.len(), ops.len());
    }
}
