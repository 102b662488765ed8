//! Reference VCF header validation and data-line access.
//!
//! A reference file must start with a `##fileformat=...` line, followed by any
//! number of `##` meta-information lines, followed by the `#CHROM` column
//! header:
//!
//! ```text
//! ##fileformat=VCFv4.2
//! ##INFO=<ID=VT,Number=1,Type=String,Description="Variant type">
//! #CHROM  POS  ID  REF  ALT  QUAL  FILTER  INFO  FORMAT  SAMPLE1 ...
//! ```
//!
//! Column names are compared case-insensitively and must appear in order.
//! `FORMAT` and sample columns are optional; they are counted but not read.

use crate::error::{FormatError, HarmonizerError, Result};
use crate::parsing::reader::LineReader;
use crate::parsing::tokenizer::split_fields;

/// First token of the mandatory first line
pub const FILE_FORMAT_MARKER: &str = "##fileformat";

/// Field separator of VCF files
pub const VCF_SEPARATOR: char = '\t';

/// Fixed columns, in order
pub const MANDATORY_COLUMNS: [&str; 9] = [
    "#CHROM", "POS", "ID", "REF", "ALT", "QUAL", "FILTER", "INFO", "FORMAT",
];

/// Columns that must be present; `FORMAT` is validated only when present
pub const REQUIRED_COLUMN_COUNT: usize = 8;

const CHROM: usize = 0;
const POS: usize = 1;
const ID: usize = 2;
const REF: usize = 3;
const ALT: usize = 4;
const FILTER: usize = 6;
const INFO: usize = 7;

/// Key of the INFO annotation carrying an explicit variant type
pub const VARIANT_TYPE_KEY: &str = "VT";

/// Result of header validation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VcfLayout {
    /// Number of columns every data line must have
    pub column_count: usize,

    /// Line number of the `#CHROM` header line
    pub header_line: u64,
}

/// Validate the file format line, meta-information and column header.
///
/// On success the reader is positioned on the first data line.
///
/// # Errors
///
/// Returns a [`FormatError`] describing the first structural problem, or an
/// IO error from the reader.
pub fn read_header(reader: &mut LineReader) -> Result<VcfLayout> {
    let path = reader.path().to_path_buf();
    let mut line = String::new();

    if !reader.next_line(&mut line)? || line.is_empty() {
        return Err(FormatError::EmptyFile { path }.into());
    }

    let marker = line.split('=').next().unwrap_or_default().trim_end();
    if !marker.eq_ignore_ascii_case(FILE_FORMAT_MARKER) {
        return Err(FormatError::MalformedHeader { path }.into());
    }

    loop {
        if !reader.next_line(&mut line)? {
            return Err(FormatError::TruncatedHeader {
                path,
                line: reader.line_number() + 1,
            }
            .into());
        }
        let number = reader.line_number();

        if line.len() <= 1 {
            return Err(FormatError::InvalidHeaderLine { path, line: number }.into());
        }
        if !line.starts_with('#') {
            return Err(FormatError::HeaderNotFound { path, line: number }.into());
        }
        if line.starts_with("##") {
            continue;
        }

        let fields = split_fields(&line, VCF_SEPARATOR);
        validate_columns(&fields).map_err(|(name, position)| FormatError::MissingColumn {
            path: path.clone(),
            name: name.to_string(),
            position,
        })?;

        tracing::debug!(
            columns = fields.len(),
            line = number,
            "Validated reference header"
        );

        return Ok(VcfLayout {
            column_count: fields.len(),
            header_line: number,
        });
    }
}

/// Check the fixed columns, returning the first missing name and its 1-based position
fn validate_columns(fields: &[&str]) -> std::result::Result<(), (&'static str, usize)> {
    for (i, expected) in MANDATORY_COLUMNS.iter().enumerate() {
        match fields.get(i) {
            Some(found) if found.trim().eq_ignore_ascii_case(expected) => {}
            None if i >= REQUIRED_COLUMN_COUNT => break,
            _ => return Err((expected, i + 1)),
        }
    }
    Ok(())
}

/// Borrowed view of the columns the indexer reads from one data line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VcfRow<'a> {
    pub chrom: &'a str,
    pub pos: &'a str,
    pub id: &'a str,
    pub ref_allele: &'a str,
    pub alt_allele: &'a str,
    pub filter: &'a str,
    pub info: &'a str,
}

impl<'a> VcfRow<'a> {
    /// Tokenize a data line and check its width against the header.
    ///
    /// # Errors
    ///
    /// Returns `SchemaMismatch` if the column count differs from the header.
    pub fn parse(
        line: &'a str,
        layout: &VcfLayout,
        reader: &LineReader,
    ) -> Result<Self> {
        let fields = split_fields(line, VCF_SEPARATOR);
        if fields.len() != layout.column_count {
            return Err(HarmonizerError::SchemaMismatch {
                path: reader.path().to_path_buf(),
                line: reader.line_number(),
                found: fields.len(),
                expected: layout.column_count,
            });
        }

        Ok(Self {
            chrom: fields[CHROM],
            pos: fields[POS],
            id: fields[ID],
            ref_allele: fields[REF],
            alt_allele: fields[ALT],
            filter: fields[FILTER],
            info: fields[INFO],
        })
    }

    /// Value of the `VT` INFO annotation, if present.
    ///
    /// The first key matching case-insensitively wins.
    #[must_use]
    pub fn variant_type_annotation(&self) -> Option<&'a str> {
        self.info.split(';').find_map(|entry| {
            let (key, value) = entry.split_once('=')?;
            key.trim()
                .eq_ignore_ascii_case(VARIANT_TYPE_KEY)
                .then(|| value.trim())
        })
    }
}
