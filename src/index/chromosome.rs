//! Sorted per-chromosome variant arrays.
//!
//! Entries are appended in file order while the reference is read, then
//! sorted once by [`ChromosomeIndex::finalize`]. Entries sharing a key (a
//! position, or an identifier) end up in one contiguous run, but the order
//! inside a run is unspecified: lookups always hand back the whole run.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::core::types::{cmp_ignore_ascii_case, VariantType};
use crate::core::variant::ReferenceVariant;
use crate::error::{HarmonizerError, Result};

/// Array growth parameters, in entries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexConfig {
    /// Capacity reserved when a chromosome is first seen
    pub initial_capacity: usize,

    /// Capacity added each time the array is full
    pub capacity_increment: usize,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            initial_capacity: 65_536,
            capacity_increment: 65_536,
        }
    }
}

/// Identifier-sorted view of one entry in the position array
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdEntry {
    pub variant_type: VariantType,

    /// Index into the position-sorted entries
    pub index: usize,
}

/// All indexed variants of one chromosome
#[derive(Debug)]
pub struct ChromosomeIndex {
    name: String,
    entries: Vec<ReferenceVariant>,
    ids: Option<Vec<IdEntry>>,
    config: IndexConfig,
}

impl ChromosomeIndex {
    #[must_use]
    pub fn new(name: impl Into<String>, config: IndexConfig) -> Self {
        Self {
            name: name.into(),
            entries: Vec::new(),
            ids: None,
            config,
        }
    }

    /// Append an entry, growing the array by a fixed increment when full.
    ///
    /// # Errors
    ///
    /// Returns `HarmonizerError::Allocation` if the array cannot grow.
    pub fn push(&mut self, entry: ReferenceVariant) -> Result<()> {
        if self.entries.len() == self.entries.capacity() {
            let additional = if self.entries.capacity() == 0 {
                self.config.initial_capacity
            } else {
                self.config.capacity_increment
            }
            .max(1);

            self.entries
                .try_reserve_exact(additional)
                .map_err(|_| HarmonizerError::Allocation {
                    chromosome: self.name.clone(),
                    requested: self.entries.len().saturating_add(additional),
                })?;
        }
        self.entries.push(entry);
        Ok(())
    }

    /// Sort entries by position and, if requested, build the identifier array.
    ///
    /// # Errors
    ///
    /// Returns `HarmonizerError::Allocation` if the identifier array cannot
    /// be allocated.
    pub fn finalize(&mut self, with_ids: bool) -> Result<()> {
        self.entries.sort_unstable_by_key(|e| e.position);

        self.ids = if with_ids {
            let mut ids = Vec::new();
            ids.try_reserve_exact(self.entries.len())
                .map_err(|_| HarmonizerError::Allocation {
                    chromosome: self.name.clone(),
                    requested: self.entries.len(),
                })?;
            ids.extend(self.entries.iter().enumerate().map(|(index, e)| IdEntry {
                variant_type: e.variant_type,
                index,
            }));

            let entries = &self.entries;
            ids.sort_unstable_by(|a, b| cmp_ignore_ascii_case(&entries[a.index].id, &entries[b.index].id));
            Some(ids)
        } else {
            None
        };

        tracing::debug!(
            chromosome = %self.name,
            entries = self.entries.len(),
            with_ids,
            "Sorted chromosome index"
        );
        Ok(())
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Currently reserved capacity of the position array
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.entries.capacity()
    }

    /// Entries in position order
    #[must_use]
    pub fn entries(&self) -> &[ReferenceVariant] {
        &self.entries
    }

    #[must_use]
    pub fn has_ids(&self) -> bool {
        self.ids.is_some()
    }

    /// Number of SNP and INDEL entries
    #[must_use]
    pub fn type_counts(&self) -> (usize, usize) {
        let snps = self
            .entries
            .iter()
            .filter(|e| e.variant_type == VariantType::Snp)
            .count();
        (snps, self.entries.len() - snps)
    }

    /// All entries at `position`
    #[must_use]
    pub fn find_position(&self, position: u64) -> Option<Candidates<'_>> {
        let anchor = self
            .entries
            .binary_search_by_key(&position, |e| e.position)
            .ok()?;
        let run = scan_run(anchor, self.entries.len(), |i| {
            self.entries[i].position.cmp(&position)
        });
        Some(Candidates {
            entries: &self.entries[run.0..run.1],
            ids: None,
        })
    }

    /// All entries whose identifier equals `id`, ignoring case.
    ///
    /// Returns `None` when there is no match or no identifier array was built.
    #[must_use]
    pub fn find_id(&self, id: &str) -> Option<Candidates<'_>> {
        let ids = self.ids.as_deref()?;
        let entries = &self.entries;
        let key = |i: usize| cmp_ignore_ascii_case(&entries[ids[i].index].id, id);

        let anchor = ids
            .binary_search_by(|e| cmp_ignore_ascii_case(&entries[e.index].id, id))
            .ok()?;
        let run = scan_run(anchor, ids.len(), key);
        Some(Candidates {
            entries,
            ids: Some(&ids[run.0..run.1]),
        })
    }
}

/// Widen `[anchor, anchor + 1)` in both directions while `key(i)` is `Equal`
fn scan_run(anchor: usize, len: usize, key: impl Fn(usize) -> Ordering) -> (usize, usize) {
    let mut start = anchor;
    while start > 0 && key(start - 1) == Ordering::Equal {
        start -= 1;
    }
    let mut end = anchor + 1;
    while end < len && key(end) == Ordering::Equal {
        end += 1;
    }
    (start, end)
}

/// A duplicate-key run returned by a lookup
#[derive(Debug, Clone, Copy)]
pub struct Candidates<'a> {
    entries: &'a [ReferenceVariant],
    ids: Option<&'a [IdEntry]>,
}

impl<'a> Candidates<'a> {
    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.map_or(self.entries.len(), <[IdEntry]>::len)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[must_use]
    pub fn get(&self, i: usize) -> Option<&'a ReferenceVariant> {
        match self.ids {
            Some(ids) => ids.get(i).and_then(|e| self.entries.get(e.index)),
            None => self.entries.get(i),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a ReferenceVariant> + 'a {
        let run = *self;
        (0..run.len()).filter_map(move |i| run.get(i))
    }

    /// Entries of the run with the given type. Identifier runs are filtered
    /// on the identifier array before touching the entries.
    pub fn of_type(
        &self,
        variant_type: VariantType,
    ) -> impl Iterator<Item = &'a ReferenceVariant> + 'a {
        let run = *self;
        (0..run.len()).filter_map(move |i| match run.ids {
            Some(ids) => ids
                .get(i)
                .filter(|e| e.variant_type == variant_type)
                .and_then(|e| run.entries.get(e.index)),
            None => run.entries.get(i).filter(|e| e.variant_type == variant_type),
        })
    }
}
