//! Fatal errors for indexing and harmonization runs.
//!
//! Anything here aborts the current phase. Per-record problems are not
//! errors; they are [`Warning`](crate::harmonize::log::Warning)s written to
//! the decision log.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Structural problems in the reference or input file layout
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormatError {
    #[error("The reference file '{path}' is empty")]
    EmptyFile { path: PathBuf },

    #[error("The mandatory file format line of '{path}' is incorrect")]
    MalformedHeader { path: PathBuf },

    #[error("The mandatory header line of '{path}' was not found before line {line}")]
    TruncatedHeader { path: PathBuf, line: u64 },

    #[error("The header line was not found in '{path}': line {line} does not start with '#'")]
    HeaderNotFound { path: PathBuf, line: u64 },

    #[error("The column '{name}' is missing on position {position} in the header of '{path}'")]
    MissingColumn {
        path: PathBuf,
        name: String,
        position: usize,
    },

    #[error("The header/meta-information on line {line} of '{path}' is incorrect")]
    InvalidHeaderLine { path: PathBuf, line: u64 },

    #[error("Line {line} in '{path}' is empty")]
    EmptyLine { path: PathBuf, line: u64 },

    #[error("The header is missing on line 1 in '{path}'")]
    MissingInputHeader { path: PathBuf },

    #[error("Column '{name}' is missing in the header of '{path}'")]
    MissingInputColumn { path: PathBuf, name: String },
}

#[derive(Error, Debug)]
pub enum HarmonizerError {
    #[error("Invalid argument: {0}")]
    Argument(String),

    #[error("Memory allocation error while growing the index of chromosome '{chromosome}' to {requested} entries")]
    Allocation { chromosome: String, requested: usize },

    #[error("IO error on '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Format(#[from] FormatError),

    #[error("Line {line} in '{path}' contains {found} columns, expected {expected}")]
    SchemaMismatch {
        path: PathBuf,
        line: u64,
        found: usize,
        expected: usize,
    },

    #[error("The value '{value}' on line {line} in '{path}' could not be parsed to an unsigned integer")]
    Parse {
        path: PathBuf,
        line: u64,
        value: String,
    },

    #[error("Failed to read configuration: {0}")]
    Config(#[from] serde_json::Error),
}

impl HarmonizerError {
    /// Wrap an IO error with the path it occurred on
    pub fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, HarmonizerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages_name_file_and_line() {
        let err = HarmonizerError::SchemaMismatch {
            path: PathBuf::from("ref.vcf"),
            line: 12,
            found: 8,
            expected: 10,
        };
        let msg = err.to_string();
        assert!(msg.contains("ref.vcf"));
        assert!(msg.contains("12"));

        let err: HarmonizerError = FormatError::MissingColumn {
            path: PathBuf::from("ref.vcf"),
            name: "POS".to_string(),
            position: 2,
        }
        .into();
        assert!(err.to_string().contains("'POS' is missing on position 2"));
    }

    #[test]
    fn test_io_error_carries_path() {
        let err = HarmonizerError::io(
            Path::new("/missing/file.txt"),
            std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
        );
        assert!(err.to_string().contains("/missing/file.txt"));
    }
}
