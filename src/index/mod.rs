//! In-memory reference index.
//!
//! - [`ReferenceIndexer`] reads the reference VCF once and produces a
//!   [`ReferenceIndex`]
//! - [`ReferenceIndex`] maps chromosome names (case-insensitive) to a
//!   [`ChromosomeIndex`]
//! - [`ChromosomeIndex`] holds entries sorted by position, plus an optional
//!   identifier-sorted array
//! - [`AllelePool`] shares allele strings between entries
//!
//! The index is immutable once built and is rebuilt from scratch on every run.
//!
//! [`ReferenceIndexer`]: builder::ReferenceIndexer
//! [`ReferenceIndex`]: store::ReferenceIndex
//! [`ChromosomeIndex`]: chromosome::ChromosomeIndex
//! [`AllelePool`]: alleles::AllelePool

pub mod alleles;
pub mod builder;
pub mod chromosome;
pub mod store;
