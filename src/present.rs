//! Presentation adapter between operation outcomes and a display.

use crate::error::{PayscopeError, Result};
use crate::error_display::user_message;
use crate::operations::Outcome;
use polars::prelude::*;
use std::io::Write;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Error,
}

/// A surface that can show tables, summary lines and notifications.
/// Every call replaces what the surface showed before.
pub trait Presenter {
    fn show_table(&mut self, frame: &DataFrame) -> Result<()>;
    fn show_lines(&mut self, lines: &[String]) -> Result<()>;
    fn clear(&mut self) -> Result<()>;
    fn notify(&mut self, severity: Severity, title: &str, message: &str) -> Result<()>;
}

pub fn present<P: Presenter + ?Sized>(outcome: &Outcome, presenter: &mut P) -> Result<()> {
    presenter.clear()?;
    match outcome {
        Outcome::Table { frame, notice } => {
            presenter.show_table(frame)?;
            if let Some(notice) = notice {
                presenter.notify(Severity::Info, "Done", notice)?;
            }
        }
        Outcome::Summary { lines } => presenter.show_lines(lines)?,
        Outcome::Joined { frame, report } => {
            presenter.show_table(frame)?;
            presenter.show_lines(&report.lines())?;
        }
        Outcome::Empty { message } => presenter.notify(Severity::Info, "No results", message)?,
    }
    Ok(())
}

pub fn present_error<P: Presenter + ?Sized>(err: &PayscopeError, presenter: &mut P) -> Result<()> {
    presenter.notify(Severity::Error, "Error", &user_message(err))
}

/// Writes tables as CSV and summaries as plain lines to `out`;
/// notifications go to `diag`.
pub struct ConsolePresenter<W: Write, E: Write> {
    out: W,
    diag: E,
}

impl<W: Write, E: Write> ConsolePresenter<W, E> {
    pub fn new(out: W, diag: E) -> Self {
        Self { out, diag }
    }

    pub fn into_inner(self) -> (W, E) {
        (self.out, self.diag)
    }
}

impl<W: Write, E: Write> Presenter for ConsolePresenter<W, E> {
    fn show_table(&mut self, frame: &DataFrame) -> Result<()> {
        let mut frame = frame.clone();
        CsvWriter::new(&mut self.out)
            .include_header(true)
            .finish(&mut frame)?;
        Ok(())
    }

    fn show_lines(&mut self, lines: &[String]) -> Result<()> {
        for line in lines {
            writeln!(self.out, "{line}")?;
        }
        Ok(())
    }

    fn clear(&mut self) -> Result<()> {
        Ok(())
    }

    fn notify(&mut self, severity: Severity, title: &str, message: &str) -> Result<()> {
        match severity {
            Severity::Info => writeln!(self.diag, "{title}: {message}")?,
            Severity::Error => writeln!(self.diag, "error: {message}")?,
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::join::JoinReport;

    fn console() -> ConsolePresenter<Vec<u8>, Vec<u8>> {
        ConsolePresenter::new(Vec::new(), Vec::new())
    }

    fn text(bytes: Vec<u8>) -> String {
        String::from_utf8(bytes).unwrap()
    }

    #[test]
    fn test_table_is_written_as_csv() {
        let mut p = console();
        let frame = df!("Year" => &[2012i64, 2013], "AverageTotalPay" => &[150.0, 300.0]).unwrap();
        present(
            &Outcome::Table {
                frame,
                notice: Some("Data cleaned successfully".into()),
            },
            &mut p,
        )
        .unwrap();
        let (out, diag) = p.into_inner();
        let out = text(out);
        assert!(out.starts_with("Year,AverageTotalPay\n"));
        assert_eq!(out.lines().count(), 3);
        assert_eq!(text(diag), "Done: Data cleaned successfully\n");
    }

    #[test]
    fn test_joined_prints_report() {
        let mut p = console();
        let frame = df!("Agency" => &["x"]).unwrap();
        let report = JoinReport {
            total: 1,
            matched: 0,
            unmatched: 1,
        };
        present(&Outcome::Joined { frame, report }, &mut p).unwrap();
        let (out, _) = p.into_inner();
        assert!(text(out).ends_with("Unmatched rows: 1\n"));
    }

    #[test]
    fn test_empty_and_error_go_to_diag() {
        let mut p = console();
        present(
            &Outcome::Empty {
                message: "No matching rows".into(),
            },
            &mut p,
        )
        .unwrap();
        present_error(&PayscopeError::invalid("Enter a valid positive number"), &mut p).unwrap();
        let (out, diag) = p.into_inner();
        assert!(out.is_empty());
        assert_eq!(
            text(diag),
            "No results: No matching rows\nerror: Enter a valid positive number\n"
        );
    }
}
