use std::collections::HashSet;
use std::sync::Arc;

/// Deduplicating pool of allele strings.
///
/// Every entry that stores an allele holds an `Arc<str>` handed out by the
/// pool, so entries sharing a sequence share one allocation.
#[derive(Debug, Default)]
pub struct AllelePool {
    alleles: HashSet<Arc<str>>,
}

impl AllelePool {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the shared handle for `allele`, inserting it on first sight
    pub fn intern(&mut self, allele: &str) -> Arc<str> {
        if let Some(existing) = self.alleles.get(allele) {
            return Arc::clone(existing);
        }
        let handle: Arc<str> = Arc::from(allele);
        self.alleles.insert(Arc::clone(&handle));
        handle
    }

    /// Number of distinct alleles
    #[must_use]
    pub fn len(&self) -> usize {
        self.alleles.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.alleles.is_empty()
    }
}
