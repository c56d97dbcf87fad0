use crate::error::Result;
use crate::schema::{BASE_PAY, JOB_TITLE, TOTAL_PAY, YEAR};
use polars::prelude::*;
use serde::Serialize;

/// Number of job titles listed in a summary unless configured otherwise.
pub const DEFAULT_TOP_N: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TitleCount {
    pub title: String,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YearCount {
    pub year: i64,
    pub rows: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PayrollSummary {
    pub rows: usize,
    pub mean_base_pay: Option<f64>,
    pub mean_total_pay: Option<f64>,
    pub max_total_pay: Option<f64>,
    pub top_job_titles: Vec<TitleCount>,
    pub rows_per_year: Vec<YearCount>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YearAverage {
    pub year: i64,
    pub rows: u64,
    /// Mean `TotalPay`, rounded to cents.
    pub mean_total_pay: f64,
}

/// Figures reported after a job title search.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SearchStats {
    pub count: usize,
    pub avg_base_pay: f64,
    pub highest_total_pay: f64,
}

pub fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// `1234567.891` -> `$1,234,567.89`
pub fn format_money(value: f64) -> String {
    let cents = (value.abs() * 100.0).round() as u128;
    let digits = (cents / 100).to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    let sign = if value < 0.0 && cents > 0 { "-" } else { "" };
    format!("{sign}${grouped}.{:02}", cents % 100)
}

fn as_f64(value: AnyValue) -> Option<f64> {
    match value {
        AnyValue::Null => None,
        v => v.try_extract::<f64>().ok(),
    }
}

fn float_series(frame: &DataFrame, column: &str) -> Result<Series> {
    Ok(frame
        .column(column)?
        .cast(&DataType::Float64)?
        .as_materialized_series()
        .clone())
}

pub fn mean_of(frame: &DataFrame, column: &str) -> Result<Option<f64>> {
    Ok(float_series(frame, column)?.mean())
}

pub fn max_of(frame: &DataFrame, column: &str) -> Result<Option<f64>> {
    Ok(float_series(frame, column)?.max::<f64>()?)
}

/// Most frequent job titles, highest count first. Equal counts keep the
/// order in which the titles first appear.
pub fn top_job_titles(frame: &DataFrame, n: usize) -> Result<Vec<TitleCount>> {
    let counts = frame
        .clone()
        .lazy()
        .group_by_stable([col(JOB_TITLE)])
        .agg([len().alias("count")])
        .sort(
            ["count"],
            SortMultipleOptions::default()
                .with_order_descending(true)
                .with_maintain_order(true),
        )
        .limit(n as IdxSize)
        .collect()?;

    let titles = counts.column(JOB_TITLE)?;
    let totals = counts.column("count")?;
    let mut out = Vec::with_capacity(counts.height());
    for i in 0..counts.height() {
        out.push(TitleCount {
            title: titles.get(i)?.str_value().to_string(),
            count: totals.get(i)?.try_extract::<u64>()?,
        });
    }
    Ok(out)
}

pub fn rows_per_year(frame: &DataFrame) -> Result<Vec<YearCount>> {
    let counts = frame
        .clone()
        .lazy()
        .group_by([col(YEAR)])
        .agg([len().alias("rows")])
        .sort([YEAR], SortMultipleOptions::default())
        .collect()?;

    let years = counts.column(YEAR)?;
    let rows = counts.column("rows")?;
    let mut out = Vec::with_capacity(counts.height());
    for i in 0..counts.height() {
        out.push(YearCount {
            year: as_f64(years.get(i)?).map(|y| y as i64).unwrap_or(0),
            rows: rows.get(i)?.try_extract::<u64>()?,
        });
    }
    Ok(out)
}

pub fn summarize(frame: &DataFrame, top_n: usize) -> Result<PayrollSummary> {
    Ok(PayrollSummary {
        rows: frame.height(),
        mean_base_pay: mean_of(frame, BASE_PAY)?,
        mean_total_pay: mean_of(frame, TOTAL_PAY)?,
        max_total_pay: max_of(frame, TOTAL_PAY)?,
        top_job_titles: top_job_titles(frame, top_n)?,
        rows_per_year: rows_per_year(frame)?,
    })
}

impl PayrollSummary {
    pub fn lines(&self) -> Vec<String> {
        let money = |v: Option<f64>| v.map(format_money).unwrap_or_else(|| "-".to_string());
        let mut lines = vec![
            format!("Rows: {}", self.rows),
            format!("Average BasePay: {}", money(self.mean_base_pay)),
            format!("Average TotalPay: {}", money(self.mean_total_pay)),
            format!("Highest TotalPay: {}", money(self.max_total_pay)),
            format!("Top {} job titles:", self.top_job_titles.len()),
        ];
        lines.extend(
            self.top_job_titles
                .iter()
                .map(|t| format!("  {} ({})", t.title, t.count)),
        );
        lines.push("Rows per year:".to_string());
        lines.extend(
            self.rows_per_year
                .iter()
                .map(|y| format!("  {}: {}", y.year, y.rows)),
        );
        lines
    }
}

/// Row count and unrounded mean `TotalPay` per `Year`, ascending by year.
fn year_groups(frame: &DataFrame) -> Result<DataFrame> {
    Ok(frame
        .clone()
        .lazy()
        .group_by([col(YEAR)])
        .agg([
            len().alias("rows"),
            col(TOTAL_PAY).cast(DataType::Float64).mean().alias(TOTAL_PAY),
        ])
        .sort([YEAR], SortMultipleOptions::default())
        .collect()?)
}

/// Mean `TotalPay` for each `Year`, ascending by year.
pub fn yearly_average_pay(frame: &DataFrame) -> Result<Vec<YearAverage>> {
    let grouped = year_groups(frame)?;
    let years = grouped.column(YEAR)?;
    let rows = grouped.column("rows")?;
    let means = grouped.column(TOTAL_PAY)?;
    let mut out = Vec::with_capacity(grouped.height());
    for i in 0..grouped.height() {
        out.push(YearAverage {
            year: as_f64(years.get(i)?).map(|y| y as i64).unwrap_or(0),
            rows: rows.get(i)?.try_extract::<u64>()?,
            mean_total_pay: as_f64(means.get(i)?).map(round_cents).unwrap_or(0.0),
        });
    }
    Ok(out)
}

pub fn yearly_average_frame(averages: &[YearAverage]) -> Result<DataFrame> {
    Ok(df!(
        YEAR => averages.iter().map(|a| a.year).collect::<Vec<i64>>(),
        "AverageTotalPay" => averages.iter().map(|a| a.mean_total_pay).collect::<Vec<f64>>()
    )?)
}

/// Rows whose `TotalPay` is strictly above the mean of the whole table.
pub fn above_mean(frame: &DataFrame) -> Result<DataFrame> {
    let Some(mean) = mean_of(frame, TOTAL_PAY)? else {
        return Ok(frame.clear());
    };
    let predicate = col(TOTAL_PAY)
        .cast(DataType::Float64)
        .gt(lit(mean))
        .fill_null(lit(false));
    Ok(frame.clone().lazy().filter(predicate).collect()?)
}

pub fn search_stats(matches: &DataFrame) -> Result<SearchStats> {
    if matches.height() == 0 {
        return Ok(SearchStats::default());
    }
    Ok(SearchStats {
        count: matches.height(),
        avg_base_pay: mean_of(matches, BASE_PAY)?.unwrap_or(0.0),
        highest_total_pay: max_of(matches, TOTAL_PAY)?.unwrap_or(0.0),
    })
}

impl SearchStats {
    pub fn lines(&self, keyword: &str) -> Vec<String> {
        let mut lines = vec![
            format!("Search results for: '{keyword}'"),
            format!("Number of matches: {}", self.count),
        ];
        if self.count > 0 {
            lines.push(format!("Average BasePay: {}", format_money(self.avg_base_pay)));
            lines.push(format!(
                "Highest TotalPay: {}",
                format_money(self.highest_total_pay)
            ));
        } else {
            lines.push("No employees found matching your search.".to_string());
        }
        lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payroll() -> DataFrame {
        df!(
            "JobTitle" => &["Clerk", "Nurse", "Nurse", "Clerk", "Chief", "Analyst"],
            "BasePay" => &[10.0, 20.0, 30.0, 40.0, 50.0, 60.0],
            "TotalPay" => &[100.0, 200.0, 300.0, 50.0, 1000.0, 0.0],
            "Year" => &[2013i64, 2012, 2012, 2014, 2013, 2012]
        )
        .unwrap()
    }

    #[test]
    fn test_format_money() {
        assert_eq!(format_money(0.0), "$0.00");
        assert_eq!(format_money(1234567.891), "$1,234,567.89");
        assert_eq!(format_money(999.999), "$1,000.00");
        assert_eq!(format_money(-12.5), "-$12.50");
    }

    #[test]
    fn test_yearly_average_rounds_and_sorts() {
        let df = df!(
            "Year" => &[2013i64, 2012, 2012],
            "TotalPay" => &[300.0, 100.0, 200.0]
        )
        .unwrap();
        let averages = yearly_average_pay(&df).unwrap();
        assert_eq!(averages.len(), 2);
        assert_eq!(averages[0].year, 2012);
        assert_eq!(averages[0].mean_total_pay, 150.0);
        assert_eq!(averages[1].year, 2013);
        assert_eq!(averages[1].mean_total_pay, 300.0);

        let df = df!("Year" => &[2012i64, 2012, 2012], "TotalPay" => &[1.0, 1.0, 2.0]).unwrap();
        assert_eq!(yearly_average_pay(&df).unwrap()[0].mean_total_pay, 1.33);
    }

    #[test]
    fn test_group_means_account_for_every_row() {
        let df = df!(
            "Year" => &[2012i64, 2012, 2012, 2013, 2013, 2011],
            "TotalPay" => &[1.0, 1.0, 2.0, 10.1, 0.35, 12345.67]
        )
        .unwrap();
        let grouped = year_groups(&df).unwrap();
        let rows = grouped.column("rows").unwrap();
        let means = grouped.column(TOTAL_PAY).unwrap();

        let mut rebuilt = 0.0;
        let mut counted = 0;
        for i in 0..grouped.height() {
            let n = rows.get(i).unwrap().try_extract::<u64>().unwrap();
            let mean = as_f64(means.get(i).unwrap()).unwrap();
            rebuilt += n as f64 * mean;
            counted += n;
        }
        let total: f64 = df.column(TOTAL_PAY).unwrap().f64().unwrap().sum().unwrap();
        assert_eq!(counted as usize, df.height());
        assert!((rebuilt - total).abs() < 1e-6, "{rebuilt} != {total}");
    }

    #[test]
    fn test_top_titles_break_ties_by_first_appearance() {
        let top = top_job_titles(&payroll(), 3).unwrap();
        let names: Vec<_> = top.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(names, ["Clerk", "Nurse", "Chief"]);
        assert_eq!(top[0].count, 2);
        assert_eq!(top[2].count, 1);
    }

    #[test]
    fn test_summary() {
        let summary = summarize(&payroll(), DEFAULT_TOP_N).unwrap();
        assert_eq!(summary.rows, 6);
        assert_eq!(summary.mean_base_pay, Some(35.0));
        assert_eq!(summary.max_total_pay, Some(1000.0));
        assert_eq!(summary.top_job_titles.len(), 4);
        let years: Vec<_> = summary.rows_per_year.iter().map(|y| (y.year, y.rows)).collect();
        assert_eq!(years, [(2012, 3), (2013, 2), (2014, 1)]);
        assert!(summary.lines().iter().any(|l| l == "Rows: 6"));
    }

    #[test]
    fn test_above_mean_uses_unfiltered_mean() {
        // mean is 275, only 300 and 1000 are above it
        let high = above_mean(&payroll()).unwrap();
        assert_eq!(high.height(), 2);
        let empty = above_mean(&payroll().clear()).unwrap();
        assert_eq!(empty.height(), 0);
    }

    #[test]
    fn test_search_stats() {
        let stats = search_stats(&payroll()).unwrap();
        assert_eq!(stats.count, 6);
        assert_eq!(stats.highest_total_pay, 1000.0);
        assert_eq!(search_stats(&payroll().clear()).unwrap(), SearchStats::default());
    }
}
