//! Interactive keyword search over the cleaned table.

use crate::error::Result;
use crate::error_display::user_message;
use crate::filter::contains_ci;
use crate::operations::Workspace;
use crate::schema::JOB_TITLE;
use crate::statistics::search_stats;
use crate::store::save_csv;
use std::io::{BufRead, Write};
use tracing::{info, warn};

const RULE: &str = "--------------------------------------------------";

/// Read one trimmed line after showing `prompt`. `None` at end of input.
fn ask<R: BufRead, W: Write>(
    input: &mut R,
    out: &mut W,
    prompt: &str,
) -> Result<Option<String>> {
    write!(out, "{prompt}")?;
    out.flush()?;
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

fn yes(answer: &Option<String>) -> bool {
    answer
        .as_deref()
        .is_some_and(|a| a.eq_ignore_ascii_case("y"))
}

/// Run searches until the user answers anything but "y" to "again", or
/// input ends. Returns the number of searches performed.
pub fn run_session<R: BufRead, W: Write>(
    workspace: &Workspace,
    input: &mut R,
    out: &mut W,
) -> Result<usize> {
    let frame = workspace.load_cleaned([JOB_TITLE])?;
    writeln!(
        out,
        "Loaded {} employee records from {}",
        frame.height(),
        workspace.paths.cleaned.display()
    )?;

    let mut searches = 0;
    loop {
        let keyword = loop {
            match ask(input, out, "Enter a job title keyword to search for: ")? {
                None => return Ok(searches),
                Some(k) if k.is_empty() => writeln!(out, "Please enter a valid keyword.")?,
                Some(k) => break k,
            }
        };

        let mut matches = contains_ci(&frame, JOB_TITLE, &keyword)?;
        let stats = search_stats(&matches)?;
        searches += 1;
        info!(keyword, matches = stats.count, "investigation search");

        writeln!(out, "{RULE}")?;
        for line in stats.lines(&keyword) {
            writeln!(out, "{line}")?;
        }
        writeln!(out, "{RULE}")?;

        if stats.count > 0 {
            let answer = ask(input, out, "Do you want to save these results? (y/n): ")?;
            if yes(&answer) {
                let path = &workspace.paths.search_output;
                match save_csv(&mut matches, path) {
                    Ok(()) => writeln!(out, "Results saved to {}", path.display())?,
                    Err(e) => {
                        warn!(
                            path = %path.display(),
                            error = %e,
                            "saving search results failed"
                        );
                        writeln!(out, "Error saving results: {}", user_message(&e))?;
                    }
                }
            }
            if answer.is_none() {
                return Ok(searches);
            }
        }

        let again = ask(input, out, "Do you want to perform another search? (y/n): ")?;
        if !yes(&again) {
            writeln!(out, "Goodbye.")?;
            return Ok(searches);
        }
    }
}
