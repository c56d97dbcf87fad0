//! User-facing error message formatting.
//!
//! Matches on typed errors (PolarsError variants, io::ErrorKind) rather than
//! parsing strings.

use crate::error::PayscopeError;
use polars::prelude::PolarsError;
use std::io;

/// Message shown for any error an operation returns.
pub fn user_message(err: &PayscopeError) -> String {
    match err {
        PayscopeError::Polars(pe) => user_message_from_polars(pe),
        PayscopeError::Io(io_err) => user_message_from_io(io_err, None),
        precondition => precondition.to_string(),
    }
}

pub fn user_message_from_polars(err: &PolarsError) -> String {
    use polars::prelude::PolarsError as PE;

    match err {
        PE::ColumnNotFound(msg) => format!("Column not found: {}", msg),
        PE::IO { error, msg } => {
            user_message_from_io(error.as_ref(), msg.as_ref().map(|m| m.as_ref()))
        }
        PE::NoData(msg) => format!("No data: {}", msg),
        PE::SchemaMismatch(msg) => format!("Schema mismatch: {}", msg),
        PE::ShapeMismatch(msg) => format!("Row shape mismatch: {}", msg),
        PE::InvalidOperation(msg) => format!("Operation not allowed: {}", msg),
        PE::ComputeError(msg) => simplify_compute_message(msg),
        PE::Context { error, msg } => {
            let inner = user_message_from_polars(error);
            format!("{}: {}", msg, inner)
        }
        #[allow(unreachable_patterns)]
        _ => err.to_string(),
    }
}

/// Cast failures are the usual compute error here: a numeric column holds
/// text that is neither a number nor the sentinel.
fn simplify_compute_message(msg: &str) -> String {
    if msg.contains("conversion from") && msg.contains("failed") {
        let first = msg.lines().next().unwrap_or(msg).trim();
        return format!("A numeric column holds a value that is not a number ({first})");
    }
    msg.lines().next().unwrap_or(msg).trim().to_string()
}

pub fn user_message_from_io(err: &io::Error, context: Option<&str>) -> String {
    use std::io::ErrorKind;

    let base: String = match err.kind() {
        ErrorKind::NotFound => "File or directory not found.".to_string(),
        ErrorKind::PermissionDenied => "Permission denied. Check file access.".to_string(),
        ErrorKind::InvalidData | ErrorKind::InvalidInput => {
            "Invalid or corrupted data.".to_string()
        }
        ErrorKind::UnexpectedEof => "Unexpected end of file.".to_string(),
        ErrorKind::Other => {
            let msg = err.to_string();
            if msg.contains("space left") {
                return "No space left on device. Free up disk space and try again.".to_string();
            }
            if msg.contains("Is a directory") {
                return "Path is a directory, not a file.".to_string();
            }
            return match context {
                Some(_) => format!("I/O error: {}", msg),
                None => msg,
            };
        }
        _ => err.to_string(),
    };

    match context {
        Some(ctx) if !ctx.is_empty() => format!("{} {}", base, ctx),
        _ => base,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_preconditions_keep_their_message() {
        let err = PayscopeError::MissingFile(PathBuf::from("agency_codes.csv"));
        assert_eq!(user_message(&err), "agency_codes.csv not found");
    }

    #[test]
    fn test_io_kinds() {
        let err = io::Error::new(io::ErrorKind::PermissionDenied, "nope");
        assert_eq!(
            user_message(&PayscopeError::Io(err)),
            "Permission denied. Check file access."
        );
        let err = io::Error::new(io::ErrorKind::NotFound, "gone");
        assert_eq!(
            user_message_from_io(&err, Some("(cleaned_data.csv)")),
            "File or directory not found. (cleaned_data.csv)"
        );
    }

    #[test]
    fn test_compute_error_first_line() {
        let err = PolarsError::ComputeError("first line\nsecond line".into());
        assert_eq!(user_message_from_polars(&err), "first line");
    }
}
