//! Shared CLI definitions for payscope.
//!
//! Used by the main application and by the build script (manpage) and
//! gen_docs binary (command-line-options markdown).

use clap::{CommandFactory, Parser, Subcommand};
use std::path::PathBuf;

/// Command-line arguments for payscope
#[derive(Clone, Parser, Debug)]
#[command(
    name = "payscope",
    version,
    about = "Payroll Data Exploration in the Terminal",
    long_about = "Explore, clean and join a payroll CSV.\n\n\
        Without a command, payscope opens a terminal form where every operation is bound to a key. \
        With a command, the same operation runs once and prints its result."
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Raw payroll CSV (default: data.csv)
    #[arg(long = "data", value_name = "PATH", global = true)]
    pub data: Option<PathBuf>,

    /// Cleaned table written by `clean` (default: cleaned_data.csv)
    #[arg(long = "cleaned", value_name = "PATH", global = true)]
    pub cleaned: Option<PathBuf>,

    /// Agency lookup table (default: agency_codes.csv)
    #[arg(long = "lookup", value_name = "PATH", global = true)]
    pub lookup: Option<PathBuf>,

    /// Joined table written by `join` (default: merged_data.csv)
    #[arg(long = "merged", value_name = "PATH", global = true)]
    pub merged: Option<PathBuf>,

    /// Where `investigate` saves matching rows (default: custom_search.csv)
    #[arg(long = "search-output", value_name = "PATH", global = true)]
    pub search_output: Option<PathBuf>,

    /// Enable debug mode to show operational information
    #[arg(long = "debug", action)]
    pub debug: bool,

    /// Clear all cache data and exit
    #[arg(long = "clear-cache", action)]
    pub clear_cache: bool,

    /// Generate default configuration file at ~/.config/payscope/config.toml
    #[arg(long = "generate-config", action)]
    pub generate_config: bool,

    /// Force overwrite existing config file when using --generate-config
    #[arg(long = "force", requires = "generate_config", action)]
    pub force: bool,
}

/// Operations that can run once from the command line instead of in the form
#[derive(Clone, Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    /// Show the first ROWS rows of the raw file
    Preview {
        /// Positive row count, at most the number of rows in the file
        rows: String,
    },
    /// Case-insensitive job title search on the raw file
    Search {
        /// Substring to look for in JobTitle
        #[arg(default_value = "chief")]
        keyword: String,
    },
    /// Show EmployeeName and JobTitle from the raw file
    Columns,
    /// Clean the raw file and write the cleaned table
    Clean,
    /// Rows of the cleaned table paid above the mean TotalPay
    HighEarners,
    /// Add the Is_Manager column to the cleaned table
    FlagManagers,
    /// Descriptive statistics of the cleaned table
    Stats {
        /// Print the summary as JSON
        #[arg(long = "json", action)]
        json: bool,
    },
    /// Mean TotalPay per year
    ByYear,
    /// Rows of the cleaned table for one year
    Year {
        /// Year to match exactly
        year: String,
    },
    /// Join the cleaned table with the agency lookup table
    Join,
    /// Interactive job title search over the cleaned table
    Investigate,
    /// Write the bundled agency lookup table
    InitLookup {
        /// Overwrite an existing lookup file
        #[arg(long = "force", action)]
        force: bool,
    },
}

/// Escape `|` and newlines for use in markdown table cells.
fn escape_table_cell(s: &str) -> String {
    s.replace('|', "\\|").replace(['\n', '\r'], " ")
}

fn option_cell(arg: &clap::Arg) -> String {
    let placeholder: String = arg
        .get_value_names()
        .map(|names| {
            names
                .iter()
                .map(|n: &clap::builder::Str| format!("<{}>", n.as_ref() as &str))
                .collect::<Vec<_>>()
                .join(" ")
        })
        .unwrap_or_default();

    if arg.is_positional() {
        return if arg.is_required_set() {
            placeholder
        } else {
            format!("[{placeholder}]")
        };
    }

    let mut parts = Vec::new();
    if let Some(s) = arg.get_short() {
        parts.push(format!("-{s}"));
    }
    if let Some(l) = arg.get_long() {
        parts.push(format!("--{l}"));
    }
    let op = parts.join(", ");
    if arg.get_action().takes_values() && !placeholder.is_empty() {
        format!("{op} {placeholder}")
    } else {
        op
    }
}

fn push_arguments(out: &mut String, cmd: &clap::Command) {
    out.push_str("| Option | Description |\n");
    out.push_str("|--------|-------------|\n");
    for arg in cmd.get_arguments() {
        let id = arg.get_id().as_ref().to_string();
        if id == "help" || id == "version" || arg.is_global_set() && cmd.get_name() != "payscope" {
            continue;
        }
        let help = arg
            .get_help()
            .map(|h| escape_table_cell(&h.to_string()))
            .unwrap_or_else(|| "-".to_string());
        out.push_str(&format!("| `{}` | {} |\n", option_cell(arg), help));
    }
}

/// Render command-line options as markdown.
///
/// Used by the gen_docs binary; output is written to stdout.
pub fn render_options_markdown() -> String {
    let mut cmd = Args::command();
    cmd.build();

    let mut out = String::from("# Command Line Options\n\n");

    out.push_str("## Usage\n\n```\n");
    let usage = cmd.render_usage();
    out.push_str(&usage.to_string());
    out.push_str("\n```\n\n");

    out.push_str("## Options\n\n");
    push_arguments(&mut out, &cmd);

    out.push_str("\n## Commands\n");
    for sub in cmd.get_subcommands() {
        if sub.get_name() == "help" {
            continue;
        }
        out.push_str(&format!("\n### `{}`\n\n", sub.get_name()));
        if let Some(about) = sub.get_about() {
            out.push_str(&format!("{}\n\n", about));
        }
        if sub.get_arguments().any(|a| a.get_id() != "help") {
            push_arguments(&mut out, sub);
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_command_opens_form() {
        let args = Args::try_parse_from(["payscope"]).unwrap();
        assert!(args.command.is_none());
        assert!(args.data.is_none());
    }

    #[test]
    fn test_search_default_keyword() {
        let args = Args::try_parse_from(["payscope", "search"]).unwrap();
        assert_eq!(
            args.command,
            Some(Command::Search {
                keyword: "chief".to_string()
            })
        );
    }

    #[test]
    fn test_global_paths_after_command() {
        let args =
            Args::try_parse_from(["payscope", "join", "--lookup", "codes.csv"]).unwrap();
        assert_eq!(args.command, Some(Command::Join));
        assert_eq!(args.lookup, Some(PathBuf::from("codes.csv")));
    }

    #[test]
    fn test_preview_keeps_raw_text() {
        // validation happens in the operation, not in clap
        let args = Args::try_parse_from(["payscope", "preview", "abc"]).unwrap();
        assert_eq!(
            args.command,
            Some(Command::Preview {
                rows: "abc".to_string()
            })
        );
    }

    #[test]
    fn test_force_requires_generate_config() {
        assert!(Args::try_parse_from(["payscope", "--force"]).is_err());
        assert!(Args::try_parse_from(["payscope", "--generate-config", "--force"]).is_ok());
    }

    #[test]
    fn test_markdown_lists_commands() {
        let md = render_options_markdown();
        assert!(md.contains("### `clean`"));
        assert!(md.contains("--generate-config"));
        assert!(md.contains("### `init-lookup`"));
    }
}
