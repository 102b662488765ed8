//! Run configuration for harmonization.
//!
//! A configuration can be assembled from command-line arguments or loaded
//! from JSON. Every field has a default except the three file paths:
//!
//! ```json
//! {
//!   "reference": "reference.vcf.gz",
//!   "input": "gwas.txt",
//!   "output": "gwas.harmonized.txt",
//!   "mode": "position",
//!   "separator": "tab",
//!   "columns": { "identifier": "SNP", "chromosome": "CHR", "position": "BP",
//!                "first_allele": "A1", "second_allele": "A2" },
//!   "drop_unresolved": false,
//!   "allow_flip": true
//! }
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{HarmonizerError, Result};
use crate::index::builder::ClassificationPolicy;
use crate::index::chromosome::IndexConfig;
use crate::parsing::input::ColumnNames;
use crate::parsing::tokenizer::Separator;

/// How input records are located in the reference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LookupMode {
    /// By identifier prefix: `rs...` and `merged_del...` by id, otherwise
    /// `CHR:POS[:TYPE]` parsed from the identifier
    Identifier,

    /// By the position column
    #[default]
    Position,
}

impl LookupMode {
    /// Reference classification used for this mode
    #[must_use]
    pub fn classification_policy(self) -> ClassificationPolicy {
        match self {
            Self::Identifier => ClassificationPolicy::Annotated,
            Self::Position => ClassificationPolicy::LengthBased,
        }
    }

    /// Whether input files must have a position column
    #[must_use]
    pub fn needs_position_column(self) -> bool {
        self == Self::Position
    }
}

/// How query alleles are reconciled with a reference entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AllelePolicy {
    /// Recode indels; a complementary SNP is a strand mismatch
    Recode,

    /// Recode indels; a complementary SNP is flipped
    RecodeOrFlip,

    /// Only the variant type is checked
    TypeOnly,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HarmonizeConfig {
    /// Reference VCF (plain or gzip)
    pub reference: PathBuf,

    /// File to harmonize (plain or gzip)
    pub input: PathBuf,

    /// Harmonized output file
    pub output: PathBuf,

    /// Decision log; defaults to the output path with `.log` appended
    pub log: Option<PathBuf>,

    pub separator: Separator,
    pub columns: ColumnNames,
    pub mode: LookupMode,

    /// Drop records that produce a warning instead of passing them through
    pub drop_unresolved: bool,

    /// Flip complementary SNPs (position mode only)
    pub allow_flip: bool,

    /// Check only variant types, not alleles
    pub skip_allele_check: bool,

    pub gzip_output: bool,
    pub gzip_log: bool,

    pub index: IndexConfig,
}

impl Default for HarmonizeConfig {
    fn default() -> Self {
        Self {
            reference: PathBuf::new(),
            input: PathBuf::new(),
            output: PathBuf::new(),
            log: None,
            separator: Separator::default(),
            columns: ColumnNames::default(),
            mode: LookupMode::default(),
            drop_unresolved: false,
            allow_flip: false,
            skip_allele_check: false,
            gzip_output: false,
            gzip_log: false,
            index: IndexConfig::default(),
        }
    }
}

impl HarmonizeConfig {
    #[must_use]
    pub fn new(
        reference: impl Into<PathBuf>,
        input: impl Into<PathBuf>,
        output: impl Into<PathBuf>,
    ) -> Self {
        Self {
            reference: reference.into(),
            input: input.into(),
            output: output.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_mode(mut self, mode: LookupMode) -> Self {
        self.mode = mode;
        self
    }

    #[must_use]
    pub fn with_separator(mut self, separator: Separator) -> Self {
        self.separator = separator;
        self
    }

    #[must_use]
    pub fn with_columns(mut self, columns: ColumnNames) -> Self {
        self.columns = columns;
        self
    }

    #[must_use]
    pub fn with_drop_unresolved(mut self, drop: bool) -> Self {
        self.drop_unresolved = drop;
        self
    }

    #[must_use]
    pub fn with_allow_flip(mut self, allow: bool) -> Self {
        self.allow_flip = allow;
        self
    }

    #[must_use]
    pub fn with_skip_allele_check(mut self, skip: bool) -> Self {
        self.skip_allele_check = skip;
        self
    }

    #[must_use]
    pub fn with_index_config(mut self, index: IndexConfig) -> Self {
        self.index = index;
        self
    }

    /// Load a configuration from a JSON file
    ///
    /// # Errors
    ///
    /// Returns an IO error if the file cannot be read, or `Config` if it is
    /// not valid JSON for this structure.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| HarmonizerError::io(path, e))?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Allele policy implied by the mode and flags
    #[must_use]
    pub fn allele_policy(&self) -> AllelePolicy {
        if self.skip_allele_check {
            AllelePolicy::TypeOnly
        } else if self.mode == LookupMode::Position && self.allow_flip {
            AllelePolicy::RecodeOrFlip
        } else {
            AllelePolicy::Recode
        }
    }

    /// Path of the decision log
    #[must_use]
    pub fn log_path(&self) -> PathBuf {
        if let Some(log) = &self.log {
            return log.clone();
        }
        let suffix = if self.gzip_log { ".log.gz" } else { ".log" };
        let mut path = self.output.clone().into_os_string();
        path.push(suffix);
        PathBuf::from(path)
    }

    /// Check that every required setting is present
    ///
    /// # Errors
    ///
    /// Returns `HarmonizerError::Argument` naming the first missing setting.
    pub fn validate(&self) -> Result<()> {
        let paths = [
            ("reference", &self.reference),
            ("input", &self.input),
            ("output", &self.output),
        ];
        for (name, path) in paths {
            if path.as_os_str().is_empty() {
                return Err(HarmonizerError::Argument(format!("{name} file path is empty")));
            }
        }
        if self.log.as_ref().is_some_and(|p| p.as_os_str().is_empty()) {
            return Err(HarmonizerError::Argument("log file path is empty".to_string()));
        }

        let mut columns = vec![
            ("identifier", &self.columns.identifier),
            ("chromosome", &self.columns.chromosome),
            ("first allele", &self.columns.first_allele),
            ("second allele", &self.columns.second_allele),
        ];
        if self.mode.needs_position_column() {
            columns.push(("position", &self.columns.position));
        }
        for (name, column) in columns {
            if column.trim().is_empty() {
                return Err(HarmonizerError::Argument(format!(
                    "{name} column name is empty"
                )));
            }
        }
        if self.index.initial_capacity == 0 || self.index.capacity_increment == 0 {
            return Err(HarmonizerError::Argument(
                "index capacities must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}
