//! Harmonization of input records against a reference index.
//!
//! - [`query`]: turns a record into a search key and an expected variant shape
//! - [`alleles`]: allele classification, complements and recoding
//! - [`engine`]: the per-record decision
//! - [`log`]: warning and message taxonomy, log text and tallies
//! - [`emitter`]: output and log writers
//! - [`run`]: index-then-stream orchestration
//! - [`config`]: run configuration

pub mod alleles;
pub mod config;
pub mod emitter;
pub mod engine;
pub mod log;
pub mod query;
pub mod run;
