//! Field tokenizer shared by every line-oriented parser.

use serde::{Deserialize, Serialize};

/// Single-character field separator of an input file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Separator {
    #[default]
    Tab,
    Comma,
    Semicolon,
    /// A single space character
    Whitespace,
}

impl Separator {
    #[must_use]
    pub fn as_char(self) -> char {
        match self {
            Self::Tab => '\t',
            Self::Comma => ',',
            Self::Semicolon => ';',
            Self::Whitespace => ' ',
        }
    }
}

/// Split a line into fields on a single-character separator.
///
/// Empty fields are kept, so `"a\t\tb"` yields three fields. The returned
/// slices borrow from `line`.
#[must_use]
pub fn split_fields(line: &str, separator: char) -> Vec<&str> {
    line.split(separator).collect()
}

/// Count fields without collecting them
#[must_use]
pub fn count_fields(line: &str, separator: char) -> usize {
    line.matches(separator).count() + 1
}

/// Split into owned fields for records that may be rewritten
#[must_use]
pub fn split_owned(line: &str, separator: char) -> Vec<String> {
    line.split(separator).map(str::to_string).collect()
}
