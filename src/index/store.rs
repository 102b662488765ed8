use std::collections::HashMap;

use serde::Serialize;

use crate::core::types::CaseInsensitiveName;
use crate::index::alleles::AllelePool;
use crate::index::chromosome::ChromosomeIndex;

/// Per-chromosome entry counts, for reporting
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChromosomeStats {
    pub chromosome: String,
    pub snps: usize,
    pub indels: usize,
}

/// The complete, read-only reference index
#[derive(Debug, Default)]
pub struct ReferenceIndex {
    /// Chromosome name (case-insensitive) -> sorted entries
    chromosomes: HashMap<CaseInsensitiveName, ChromosomeIndex>,

    /// Shared allele storage; empty unless alleles were interned
    alleles: AllelePool,
}

impl ReferenceIndex {
    pub(crate) fn new(
        chromosomes: HashMap<CaseInsensitiveName, ChromosomeIndex>,
        alleles: AllelePool,
    ) -> Self {
        Self {
            chromosomes,
            alleles,
        }
    }

    /// Look up a chromosome, ignoring case
    #[must_use]
    pub fn get(&self, chromosome: &str) -> Option<&ChromosomeIndex> {
        self.chromosomes.get(&CaseInsensitiveName::from(chromosome))
    }

    #[must_use]
    pub fn contains(&self, chromosome: &str) -> bool {
        self.get(chromosome).is_some()
    }

    /// Number of chromosomes
    #[must_use]
    pub fn len(&self) -> usize {
        self.chromosomes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.chromosomes.is_empty()
    }

    /// Total number of indexed entries over all chromosomes
    #[must_use]
    pub fn total_entries(&self) -> usize {
        self.chromosomes.values().map(ChromosomeIndex::len).sum()
    }

    /// Number of distinct interned alleles
    #[must_use]
    pub fn distinct_alleles(&self) -> usize {
        self.alleles.len()
    }

    /// Entry counts per chromosome, sorted by chromosome name
    #[must_use]
    pub fn stats(&self) -> Vec<ChromosomeStats> {
        let mut names: Vec<&CaseInsensitiveName> = self.chromosomes.keys().collect();
        names.sort();

        names
            .into_iter()
            .filter_map(|name| self.chromosomes.get(name))
            .map(|index| {
                let (snps, indels) = index.type_counts();
                ChromosomeStats {
                    chromosome: index.name().to_string(),
                    snps,
                    indels,
                }
            })
            .collect()
    }
}
