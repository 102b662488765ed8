//! Readers and parsers for the reference VCF and the input files.
//!
//! - **reader**: line source over plain or gzip-compressed files
//! - **tokenizer**: single-character field splitting
//! - **vcf**: reference header validation and data-line access
//! - **input**: input header resolution and record streaming
//!
//! ## Example
//!
//! ```rust,no_run
//! use variant_harmonizer::parsing::reader::LineReader;
//! use variant_harmonizer::parsing::vcf::read_header;
//! use std::path::Path;
//!
//! let mut reader = LineReader::open(Path::new("reference.vcf.gz")).unwrap();
//! let layout = read_header(&mut reader).unwrap();
//! println!("{} columns", layout.column_count);
//! ```

pub mod input;
pub mod reader;
pub mod tokenizer;
pub mod vcf;
