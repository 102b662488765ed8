//! Input file header resolution and record streaming.
//!
//! The first line of an input file is its header. Configured column names are
//! looked up in it case-insensitively; when a name occurs more than once the
//! last occurrence is used. Every following line is one record and must have
//! exactly as many fields as the header.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::record::InputRecord;
use crate::error::{FormatError, HarmonizerError, Result};
use crate::parsing::reader::LineReader;
use crate::parsing::tokenizer::{count_fields, split_fields, split_owned};

/// Header names of the columns the harmonizer reads
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnNames {
    pub identifier: String,
    pub chromosome: String,
    /// Only read in position mode
    pub position: String,
    pub first_allele: String,
    pub second_allele: String,
}

impl Default for ColumnNames {
    fn default() -> Self {
        Self {
            identifier: "MARKER".to_string(),
            chromosome: "CHR".to_string(),
            position: "POS".to_string(),
            first_allele: "A1".to_string(),
            second_allele: "A2".to_string(),
        }
    }
}

/// 0-based positions of the columns the harmonizer reads
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnLayout {
    pub identifier: usize,
    pub chromosome: usize,
    pub position: Option<usize>,
    pub first_allele: usize,
    pub second_allele: usize,

    /// Width of the header; every record must match it
    pub column_count: usize,
}

impl ColumnLayout {
    /// Locate the configured columns in a header line.
    ///
    /// # Errors
    ///
    /// Returns `MissingInputColumn` naming the first configured column not
    /// found in the header.
    pub fn resolve(
        header: &str,
        separator: char,
        names: &ColumnNames,
        with_position: bool,
        path: &Path,
    ) -> Result<Self> {
        let fields = split_fields(header, separator);

        let find = |name: &str| -> Result<usize> {
            fields
                .iter()
                .rposition(|f| f.trim().eq_ignore_ascii_case(name.trim()))
                .ok_or_else(|| {
                    FormatError::MissingInputColumn {
                        path: path.to_path_buf(),
                        name: name.to_string(),
                    }
                    .into()
                })
        };

        let identifier = find(&names.identifier)?;
        let chromosome = find(&names.chromosome)?;
        let position = if with_position {
            Some(find(&names.position)?)
        } else {
            None
        };
        let first_allele = find(&names.first_allele)?;
        let second_allele = find(&names.second_allele)?;

        Ok(Self {
            identifier,
            chromosome,
            position,
            first_allele,
            second_allele,
            column_count: fields.len(),
        })
    }
}

/// Streams records from an input file after resolving its header
#[derive(Debug)]
pub struct InputReader {
    reader: LineReader,
    separator: char,
    header: String,
    layout: ColumnLayout,
    line: String,
}

impl InputReader {
    /// Open an input file and resolve its header.
    ///
    /// # Errors
    ///
    /// Returns an IO error, `MissingInputHeader` if the first line is absent
    /// or empty, or `MissingInputColumn`.
    pub fn open(
        path: &Path,
        separator: char,
        names: &ColumnNames,
        with_position: bool,
    ) -> Result<Self> {
        Self::from_line_reader(LineReader::open(path)?, separator, names, with_position)
    }

    /// Resolve the header of an already opened line source
    ///
    /// # Errors
    ///
    /// Same as [`InputReader::open`], minus the open itself.
    pub fn from_line_reader(
        mut reader: LineReader,
        separator: char,
        names: &ColumnNames,
        with_position: bool,
    ) -> Result<Self> {
        let mut header = String::new();
        if !reader.next_line(&mut header)? || header.is_empty() {
            return Err(FormatError::MissingInputHeader {
                path: reader.path().to_path_buf(),
            }
            .into());
        }

        let layout = ColumnLayout::resolve(&header, separator, names, with_position, reader.path())?;

        Ok(Self {
            reader,
            separator,
            header,
            layout,
            line: String::new(),
        })
    }

    /// Header line exactly as read
    #[must_use]
    pub fn header(&self) -> &str {
        &self.header
    }

    #[must_use]
    pub fn layout(&self) -> &ColumnLayout {
        &self.layout
    }

    #[must_use]
    pub fn separator(&self) -> char {
        self.separator
    }

    /// Read the next record, or `None` at end of file.
    ///
    /// # Errors
    ///
    /// Empty lines and lines whose width differs from the header are fatal.
    pub fn next_record(&mut self) -> Result<Option<InputRecord>> {
        if !self.reader.next_line(&mut self.line)? {
            return Ok(None);
        }
        let line_number = self.reader.line_number();

        if self.line.is_empty() {
            return Err(FormatError::EmptyLine {
                path: self.reader.path().to_path_buf(),
                line: line_number,
            }
            .into());
        }

        let found = count_fields(&self.line, self.separator);
        if found != self.layout.column_count {
            return Err(HarmonizerError::SchemaMismatch {
                path: self.reader.path().to_path_buf(),
                line: line_number,
                found,
                expected: self.layout.column_count,
            });
        }

        let fields = split_owned(&self.line, self.separator);
        Ok(Some(InputRecord::new(line_number, fields)))
    }
}
