use std::sync::Arc;

use crate::core::types::{VariantSubtype, VariantType};

/// Structural-variant placeholder for a deletion in a reference ALT column
pub const STRUCTURAL_DELETION: &str = "<DEL>";

/// Structural-variant placeholder for an insertion in a reference ALT column
pub const STRUCTURAL_INSERTION: &str = "<INS>";

/// One reference variant that survived filtering
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceVariant {
    /// 1-based genomic coordinate
    pub position: u64,

    /// Original reference identifier
    pub id: String,

    pub variant_type: VariantType,

    pub subtype: VariantSubtype,

    /// Reference allele; shared through the allele pool when interned
    pub ref_allele: Option<Arc<str>>,

    /// Alternate allele; shared through the allele pool when interned
    pub alt_allele: Option<Arc<str>>,
}

impl ReferenceVariant {
    pub fn new(position: u64, id: impl Into<String>, variant_type: VariantType) -> Self {
        Self {
            position,
            id: id.into(),
            variant_type,
            subtype: VariantSubtype::Unset,
            ref_allele: None,
            alt_allele: None,
        }
    }

    #[must_use]
    pub fn with_subtype(mut self, subtype: VariantSubtype) -> Self {
        self.subtype = subtype;
        self
    }

    #[must_use]
    pub fn with_alleles(mut self, ref_allele: Arc<str>, alt_allele: Arc<str>) -> Self {
        self.ref_allele = Some(ref_allele);
        self.alt_allele = Some(alt_allele);
        self
    }

    /// Both alleles, if this entry stores them
    #[must_use]
    pub fn alleles(&self) -> Option<(&str, &str)> {
        match (&self.ref_allele, &self.alt_allele) {
            (Some(r), Some(a)) => Some((r, a)),
            _ => None,
        }
    }

    /// True if the ALT allele is the symbolic `<DEL>` structural placeholder
    #[must_use]
    pub fn is_structural_deletion(&self) -> bool {
        self.alt_allele
            .as_deref()
            .is_some_and(|alt| alt.eq_ignore_ascii_case(STRUCTURAL_DELETION))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_variant_builder() {
        let entry = ReferenceVariant::new(500, "rs42", VariantType::Indel)
            .with_subtype(VariantSubtype::Deletion)
            .with_alleles(Arc::from("AT"), Arc::from("A"));

        assert_eq!(entry.alleles(), Some(("AT", "A")));
        assert!(!entry.is_structural_deletion());
    }

    #[test]
    fn test_structural_deletion() {
        let entry = ReferenceVariant::new(1, "sv1", VariantType::Indel)
            .with_alleles(Arc::from("ACGT"), Arc::from("<del>"));
        assert!(entry.is_structural_deletion());

        let snp = ReferenceVariant::new(1, "rs1", VariantType::Snp);
        assert!(snp.alleles().is_none());
        assert!(!snp.is_structural_deletion());
    }
}
