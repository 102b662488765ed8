//! # variant-harmonizer
//!
//! A library for harmonizing variant identifiers and alleles in tabular files
//! (GWAS summary statistics, marker maps) against a reference VCF.
//!
//! Harmonization runs in two phases. The reference VCF is first read into an
//! in-memory, per-chromosome index sorted by position (and, for identifier
//! lookups, by id). The input file is then streamed record by record: each
//! record is located in the index, its alleles are reconciled with the
//! reference entry, and its identifier is rewritten to the canonical
//! `CHR:POS:TYPE` form. Indel alleles are recoded to the symbolic `R`/`I`/`D`
//! codes. Records that cannot be harmonized are logged and either passed
//! through unchanged or dropped.
//!
//! ## Example
//!
//! ```rust,no_run
//! use variant_harmonizer::{HarmonizeConfig, Harmonizer, LookupMode};
//!
//! let config = HarmonizeConfig::new("dbsnp.vcf.gz", "gwas.txt", "gwas.harmonized.txt")
//!     .with_mode(LookupMode::Position)
//!     .with_allow_flip(true);
//!
//! let summary = Harmonizer::new(config).run().unwrap();
//! println!(
//!     "{} of {} records rewritten",
//!     summary.records.rewritten, summary.records.read
//! );
//! ```
//!
//! ## Modules
//!
//! - [`core`]: Core data types for variants, alleles and records
//! - [`parsing`]: Line sources, tokenizing, reference and input headers
//! - [`index`]: Reference index construction and search
//! - [`harmonize`]: Query resolution, decisions, logging and output
//! - [`cli`]: Command-line interface implementation

pub mod cli;
pub mod core;
pub mod error;
pub mod harmonize;
pub mod index;
pub mod parsing;
pub mod utils;

// Re-export commonly used types for convenience
pub use core::types::*;
pub use error::{FormatError, HarmonizerError, Result};
pub use harmonize::config::{AllelePolicy, HarmonizeConfig, LookupMode};
pub use harmonize::run::{HarmonizationSummary, Harmonizer};
pub use index::builder::{ClassificationPolicy, ReferenceIndexer};
pub use index::store::ReferenceIndex;
