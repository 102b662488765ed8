//! Core data types for variant harmonization.
//!
//! This module provides the fundamental types used throughout the library:
//!
//! - [`ReferenceVariant`]: One filtered, classified row of the reference VCF
//! - [`InputRecord`]: One line of the file being harmonized
//! - [`VariantType`], [`VariantSubtype`], [`AlleleCode`]: Variant classification types
//! - [`CaseInsensitiveName`]: Map key for chromosome names
//!
//! ## Variant Classification
//!
//! | Alleles (REF/ALT) | Type | Subtype |
//! |-------------------|-------|-----------|
//! | `A/G`             | SNP   | SNP       |
//! | `AT/A`            | INDEL | DELETION  |
//! | `A/AT`            | INDEL | INSERTION |
//! | `ACGT/<DEL>`      | INDEL | DELETION  |
//!
//! Input files may encode indel alleles with the symbolic codes `R`
//! (reference-length allele), `I` (insertion) and `D` (deletion).
//!
//! [`ReferenceVariant`]: variant::ReferenceVariant
//! [`InputRecord`]: record::InputRecord
//! [`VariantType`]: types::VariantType
//! [`VariantSubtype`]: types::VariantSubtype
//! [`AlleleCode`]: types::AlleleCode
//! [`CaseInsensitiveName`]: types::CaseInsensitiveName

pub mod record;
pub mod types;
pub mod variant;
