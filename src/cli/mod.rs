//! Command-line interface for variant-harmonizer.
//!
//! Available commands:
//!
//! - **harmonize**: Rewrite identifiers and alleles of a summary-statistics
//!   file to match a reference VCF
//! - **index**: Index a reference VCF and report what it contains
//!
//! ## Usage
//!
//! ```text
//! # Harmonize by position, flipping complementary SNPs
//! variant-harmonizer harmonize -r dbsnp.vcf.gz -i gwas.txt -o gwas.harmonized.txt --allow-flip
//!
//! # Legacy identifier mode on a comma-separated file
//! variant-harmonizer harmonize -r ref.vcf -i map.csv -o map.out.csv --mode identifier --separator comma
//!
//! # Inspect a reference as JSON
//! variant-harmonizer index ref.vcf.gz --format json
//! ```

use clap::{Parser, Subcommand};

pub mod harmonize;
pub mod index;

#[derive(Parser)]
#[command(name = "variant-harmonizer")]
#[command(author = "Fulcrum Genomics")]
#[command(version)]
#[command(about = "Harmonize variant identifiers and alleles against a reference VCF")]
#[command(
    long_about = "variant-harmonizer rewrites the identifier and allele columns of tabular variant files (GWAS summary statistics, marker maps) so they agree with a reference VCF.\n\nEach record is looked up by position or identifier and:\n- gets the canonical CHR:POS:TYPE identifier when it matches\n- has indel alleles recoded to R/I/D\n- has complementary SNP alleles flipped when requested\n\nEvery change and every unresolved record is written to a log file."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format
    #[arg(short, long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Harmonize a variant file against a reference VCF
    Harmonize(harmonize::HarmonizeArgs),

    /// Index a reference VCF and print per-chromosome counts
    Index(index::IndexArgs),
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Tsv,
}
