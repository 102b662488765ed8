//! Builds a [`ReferenceIndex`] from a reference VCF.
//!
//! Data lines are filtered, classified and appended per chromosome; once the
//! whole file is read every chromosome is sorted. Lines are skipped (not
//! rejected) when:
//!
//! | Column | Requirement |
//! |--------|-------------|
//! | FILTER | `PASS` or `.` (any case) |
//! | REF    | non-empty run of `A`, `C`, `G`, `T` |
//! | ALT    | run of `A`, `C`, `G`, `T`, or `<DEL>` / `<INS>` |
//!
//! and, under [`ClassificationPolicy::LengthBased`], when REF and ALT have the
//! same length but are not single bases.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::core::types::{CaseInsensitiveName, VariantSubtype, VariantType};
use crate::core::variant::{ReferenceVariant, STRUCTURAL_DELETION, STRUCTURAL_INSERTION};
use crate::error::{FormatError, HarmonizerError, Result};
use crate::index::alleles::AllelePool;
use crate::index::chromosome::{ChromosomeIndex, IndexConfig};
use crate::index::store::ReferenceIndex;
use crate::parsing::reader::LineReader;
use crate::parsing::vcf::{read_header, VcfRow};
use crate::utils::validation::{is_nucleotide_run, normalize_bases, passes_filter};

/// How a surviving reference line is assigned a type and subtype
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassificationPolicy {
    /// Compare allele lengths; subtype is always set, ambiguous lines are skipped
    LengthBased,

    /// Use the `VT` INFO annotation when present, otherwise SNP only for two
    /// single bases; subtype is left unset
    Annotated,
}

impl ClassificationPolicy {
    /// Classify alleles that already passed the nucleotide filters
    #[must_use]
    pub fn classify(self, row: &VcfRow<'_>) -> Option<(VariantType, VariantSubtype)> {
        let (ref_allele, alt_allele) = (row.ref_allele, row.alt_allele);
        match self {
            Self::LengthBased => {
                if alt_allele.eq_ignore_ascii_case(STRUCTURAL_DELETION) {
                    Some((VariantType::Indel, VariantSubtype::Deletion))
                } else if alt_allele.eq_ignore_ascii_case(STRUCTURAL_INSERTION) {
                    Some((VariantType::Indel, VariantSubtype::Insertion))
                } else if ref_allele.len() == 1 && alt_allele.len() == 1 {
                    Some((VariantType::Snp, VariantSubtype::Snp))
                } else if ref_allele.len() > alt_allele.len() {
                    Some((VariantType::Indel, VariantSubtype::Deletion))
                } else if ref_allele.len() < alt_allele.len() {
                    Some((VariantType::Indel, VariantSubtype::Insertion))
                } else {
                    None
                }
            }
            Self::Annotated => {
                let variant_type = match row.variant_type_annotation() {
                    Some(vt) if vt.eq_ignore_ascii_case(VariantType::Snp.label()) => {
                        VariantType::Snp
                    }
                    Some(_) => VariantType::Indel,
                    None if ref_allele.len() == 1 && alt_allele.len() == 1 => VariantType::Snp,
                    None => VariantType::Indel,
                };
                Some((variant_type, VariantSubtype::Unset))
            }
        }
    }
}

/// Counts of what happened to the reference data lines
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct IndexingStats {
    pub lines: u64,
    pub indexed: u64,
    pub filtered: u64,
    pub invalid_alleles: u64,
    pub ambiguous: u64,
}

/// Reads a reference VCF into a [`ReferenceIndex`]
#[derive(Debug, Clone)]
pub struct ReferenceIndexer {
    policy: ClassificationPolicy,
    config: IndexConfig,
    build_id_index: bool,
    intern_alleles: bool,
}

impl ReferenceIndexer {
    /// An indexer with the defaults of `policy`.
    ///
    /// `Annotated` builds identifier arrays; `LengthBased` interns every
    /// allele through a shared pool.
    #[must_use]
    pub fn new(policy: ClassificationPolicy) -> Self {
        Self {
            policy,
            config: IndexConfig::default(),
            build_id_index: policy == ClassificationPolicy::Annotated,
            intern_alleles: policy == ClassificationPolicy::LengthBased,
        }
    }

    #[must_use]
    pub fn with_config(mut self, config: IndexConfig) -> Self {
        self.config = config;
        self
    }

    /// Build a fresh index from a (possibly gzipped) reference file.
    ///
    /// # Errors
    ///
    /// Any IO, header, schema, empty-line or position parse error aborts the
    /// build.
    pub fn index(&self, path: &Path) -> Result<(ReferenceIndex, IndexingStats)> {
        info!("Indexing reference {}", path.display());
        self.index_reader(LineReader::open(path)?)
    }

    /// Build a fresh index from an opened line source
    ///
    /// # Errors
    ///
    /// See [`ReferenceIndexer::index`].
    pub fn index_reader(&self, mut reader: LineReader) -> Result<(ReferenceIndex, IndexingStats)> {
        let layout = read_header(&mut reader)?;

        let mut chromosomes: HashMap<CaseInsensitiveName, ChromosomeIndex> = HashMap::new();
        let mut pool = AllelePool::new();
        let mut stats = IndexingStats::default();
        let mut line = String::new();

        while reader.next_line(&mut line)? {
            if line.is_empty() {
                return Err(FormatError::EmptyLine {
                    path: reader.path().to_path_buf(),
                    line: reader.line_number(),
                }
                .into());
            }
            stats.lines += 1;

            let row = VcfRow::parse(&line, &layout, &reader)?;

            if !passes_filter(row.filter) {
                stats.filtered += 1;
                continue;
            }
            if !is_nucleotide_run(row.ref_allele) || !is_valid_alt(row.alt_allele) {
                stats.invalid_alleles += 1;
                continue;
            }
            let Some((variant_type, subtype)) = self.policy.classify(&row) else {
                stats.ambiguous += 1;
                continue;
            };

            let chromosome = chromosomes
                .entry(CaseInsensitiveName::from(row.chrom))
                .or_insert_with(|| ChromosomeIndex::new(row.chrom, self.config));

            let position: u64 = row.pos.trim().parse().map_err(|_| HarmonizerError::Parse {
                path: reader.path().to_path_buf(),
                line: reader.line_number(),
                value: row.pos.to_string(),
            })?;

            let mut entry =
                ReferenceVariant::new(position, row.id, variant_type).with_subtype(subtype);

            let ref_allele = normalize_bases(row.ref_allele);
            let alt_allele = normalize_bases(row.alt_allele);
            if self.intern_alleles {
                entry = entry.with_alleles(pool.intern(&ref_allele), pool.intern(&alt_allele));
            } else if variant_type == VariantType::Indel {
                entry = entry.with_alleles(Arc::from(ref_allele), Arc::from(alt_allele));
            }

            chromosome.push(entry)?;
            stats.indexed += 1;
        }

        for chromosome in chromosomes.values_mut() {
            chromosome.finalize(self.build_id_index)?;
        }

        debug!(
            first_data_line = layout.header_line + 1,
            filtered = stats.filtered,
            invalid_alleles = stats.invalid_alleles,
            ambiguous = stats.ambiguous,
            "Skipped reference lines"
        );
        info!(
            "Indexed {} of {} variants on {} chromosomes ({} distinct alleles)",
            stats.indexed,
            stats.lines,
            chromosomes.len(),
            pool.len()
        );

        Ok((ReferenceIndex::new(chromosomes, pool), stats))
    }
}

fn is_valid_alt(alt: &str) -> bool {
    is_nucleotide_run(alt)
        || alt.eq_ignore_ascii_case(STRUCTURAL_DELETION)
        || alt.eq_ignore_ascii_case(STRUCTURAL_INSERTION)
}
