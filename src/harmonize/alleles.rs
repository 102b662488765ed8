//! Allele classification and recoding for input records.
//!
//! Query alleles come in three shapes:
//!
//! | First / second | Classified as |
//! |----------------|---------------|
//! | `A` / `G` | SNP |
//! | `R` / `D`, `D` / `R` | symbolic deletion |
//! | `R` / `I`, `I` / `R` | symbolic insertion |
//! | `AT` / `A`, `-` / `ACG`, ... | raw indel, recoded against the reference |
//!
//! Anything else (equal-length runs, two placeholders, unknown tokens) is
//! unrecognized.

use crate::core::types::{AlleleCode, VariantSubtype, VariantType};
use crate::core::variant::ReferenceVariant;
use crate::utils::validation::{
    complement, is_nucleotide_run, is_placeholder, is_single_nucleotide,
};

/// Expected shape of a record's alleles
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryAlleles {
    /// Two single bases
    Snp,

    /// A canonical symbolic pair
    Symbolic(VariantSubtype),

    /// Raw bases that must be matched against a reference entry to be recoded
    Raw,

    /// Recoded without consulting reference alleles; only the type (and the
    /// subtype, when the reference knows it) is checked
    Recoded {
        codes: (AlleleCode, AlleleCode),
        subtype: VariantSubtype,
    },
}

impl QueryAlleles {
    #[must_use]
    pub fn variant_type(self) -> VariantType {
        match self {
            Self::Snp => VariantType::Snp,
            _ => VariantType::Indel,
        }
    }
}

/// Empty or a placeholder such as `-`, `.`, `NA`, `<DEL>`
#[must_use]
pub fn is_missing(allele: &str) -> bool {
    allele.is_empty() || is_placeholder(allele)
}

/// Subtype of a canonical symbolic pair
#[must_use]
pub fn symbolic_subtype(first: &str, second: &str) -> Option<VariantSubtype> {
    match (AlleleCode::parse(first)?, AlleleCode::parse(second)?) {
        (AlleleCode::R, AlleleCode::D) | (AlleleCode::D, AlleleCode::R) => {
            Some(VariantSubtype::Deletion)
        }
        (AlleleCode::R, AlleleCode::I) | (AlleleCode::I, AlleleCode::R) => {
            Some(VariantSubtype::Insertion)
        }
        _ => None,
    }
}

/// Classify trimmed alleles when nothing else dictates the type
#[must_use]
pub fn classify(first: &str, second: &str) -> Option<QueryAlleles> {
    if is_single_nucleotide(first) && is_single_nucleotide(second) {
        return Some(QueryAlleles::Snp);
    }
    if let Some(subtype) = symbolic_subtype(first, second) {
        return Some(QueryAlleles::Symbolic(subtype));
    }

    let first_missing = is_missing(first);
    let second_missing = is_missing(second);
    let valid = |allele: &str, missing: bool| missing || is_nucleotide_run(allele);

    if !valid(first, first_missing) || !valid(second, second_missing) {
        return None;
    }
    if first_missing && second_missing {
        return None;
    }
    if !first_missing && !second_missing && first.len() == second.len() {
        return None;
    }
    Some(QueryAlleles::Raw)
}

/// Recode two raw runs for an identifier tagged as a deletion or insertion.
///
/// Symbolic pairs of the same subtype are accepted unchanged.
#[must_use]
pub fn recode_tagged(first: &str, second: &str, subtype: VariantSubtype) -> Option<QueryAlleles> {
    if is_nucleotide_run(first) && is_nucleotide_run(second) {
        let first_longer = match first.len().cmp(&second.len()) {
            std::cmp::Ordering::Greater => true,
            std::cmp::Ordering::Less => false,
            std::cmp::Ordering::Equal => return None,
        };
        let codes = match (subtype, first_longer) {
            (VariantSubtype::Deletion, true) => (AlleleCode::R, AlleleCode::D),
            (VariantSubtype::Deletion, false) => (AlleleCode::D, AlleleCode::R),
            (VariantSubtype::Insertion, true) => (AlleleCode::I, AlleleCode::R),
            (VariantSubtype::Insertion, false) => (AlleleCode::R, AlleleCode::I),
            _ => return None,
        };
        return Some(QueryAlleles::Recoded { codes, subtype });
    }

    (symbolic_subtype(first, second) == Some(subtype))
        .then_some(QueryAlleles::Symbolic(subtype))
}

/// Recode the alleles of a merged deletion identifier
#[must_use]
pub fn recode_merged_deletion(first: &str, second: &str) -> Option<QueryAlleles> {
    let deletion = VariantSubtype::Deletion;
    if symbolic_subtype(first, second) == Some(deletion) {
        return Some(QueryAlleles::Symbolic(deletion));
    }

    let first_missing = is_missing(first);
    let second_missing = is_missing(second);
    if (!first_missing && !is_nucleotide_run(first))
        || (!second_missing && !is_nucleotide_run(second))
    {
        return None;
    }

    let codes = match (first_missing, second_missing) {
        (true, true) => return None,
        (true, false) => (AlleleCode::D, AlleleCode::R),
        (false, true) => (AlleleCode::R, AlleleCode::D),
        (false, false) => match first.len().cmp(&second.len()) {
            std::cmp::Ordering::Greater => (AlleleCode::R, AlleleCode::D),
            std::cmp::Ordering::Less => (AlleleCode::D, AlleleCode::R),
            std::cmp::Ordering::Equal => return None,
        },
    };
    Some(QueryAlleles::Recoded {
        codes,
        subtype: deletion,
    })
}

/// Match raw query alleles against one reference entry and recode them.
///
/// A match requires the raw pair to equal the reference pair in either order
/// (ignoring case), or a missing allele opposite the REF of a `<DEL>` entry.
#[must_use]
pub fn recode_against(
    entry: &ReferenceVariant,
    first: &str,
    second: &str,
) -> Option<(AlleleCode, AlleleCode)> {
    use AlleleCode::{D, I, R};

    let (ref_allele, alt_allele) = entry.alleles()?;

    if entry.is_structural_deletion() {
        return if is_missing(second) && ref_allele.eq_ignore_ascii_case(first) {
            Some((R, D))
        } else if is_missing(first) && ref_allele.eq_ignore_ascii_case(second) {
            Some((D, R))
        } else {
            None
        };
    }

    let first_longer = first.len() > second.len();
    if ref_allele.eq_ignore_ascii_case(first) && alt_allele.eq_ignore_ascii_case(second) {
        match entry.subtype {
            VariantSubtype::Deletion => Some((R, D)),
            VariantSubtype::Insertion => Some((R, I)),
            _ if first_longer => Some((R, D)),
            _ => Some((R, I)),
        }
    } else if ref_allele.eq_ignore_ascii_case(second) && alt_allele.eq_ignore_ascii_case(first) {
        match entry.subtype {
            VariantSubtype::Deletion => Some((D, R)),
            VariantSubtype::Insertion => Some((I, R)),
            _ if first_longer => Some((I, R)),
            _ => Some((D, R)),
        }
    } else {
        None
    }
}

/// True if `{first, second}` equals `{ref_allele, alt_allele}` in either order
#[must_use]
pub fn pair_matches(ref_allele: &str, alt_allele: &str, first: &str, second: &str) -> bool {
    (ref_allele.eq_ignore_ascii_case(first) && alt_allele.eq_ignore_ascii_case(second))
        || (ref_allele.eq_ignore_ascii_case(second) && alt_allele.eq_ignore_ascii_case(first))
}

/// Complement both alleles of a pair
#[must_use]
pub fn complement_pair(first: &str, second: &str) -> Option<(String, String)> {
    Some((complement(first)?, complement(second)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn entry(subtype: VariantSubtype, ref_allele: &str, alt_allele: &str) -> ReferenceVariant {
        ReferenceVariant::new(500, "rs1", VariantType::Indel)
            .with_subtype(subtype)
            .with_alleles(Arc::from(ref_allele), Arc::from(alt_allele))
    }

    #[test]
    fn test_classify() {
        assert_eq!(classify("A", "g"), Some(QueryAlleles::Snp));
        assert_eq!(
            classify("d", "R"),
            Some(QueryAlleles::Symbolic(VariantSubtype::Deletion))
        );
        assert_eq!(
            classify("R", "I"),
            Some(QueryAlleles::Symbolic(VariantSubtype::Insertion))
        );
        assert_eq!(classify("AT", "A"), Some(QueryAlleles::Raw));
        assert_eq!(classify("-", "ACG"), Some(QueryAlleles::Raw));
        assert_eq!(classify("ACG", ""), Some(QueryAlleles::Raw));
    }

    #[test]
    fn test_classify_unrecognized() {
        assert_eq!(classify("AT", "GC"), None);
        assert_eq!(classify("-", "NA"), None);
        assert_eq!(classify("R", "R"), None);
        assert_eq!(classify("I", "D"), None);
        assert_eq!(classify("A", "N"), None);
        assert_eq!(classify("A", "A,G"), None);
    }

    #[test]
    fn test_recode_tagged() {
        let deletion = VariantSubtype::Deletion;
        assert_eq!(
            recode_tagged("AT", "A", deletion),
            Some(QueryAlleles::Recoded {
                codes: (AlleleCode::R, AlleleCode::D),
                subtype: deletion
            })
        );
        assert_eq!(
            recode_tagged("A", "AT", deletion),
            Some(QueryAlleles::Recoded {
                codes: (AlleleCode::D, AlleleCode::R),
                subtype: deletion
            })
        );
        assert_eq!(
            recode_tagged("D", "R", deletion),
            Some(QueryAlleles::Symbolic(deletion))
        );
        assert_eq!(recode_tagged("R", "I", deletion), None);
        assert_eq!(recode_tagged("AC", "GT", deletion), None);

        let insertion = VariantSubtype::Insertion;
        assert_eq!(
            recode_tagged("AT", "A", insertion),
            Some(QueryAlleles::Recoded {
                codes: (AlleleCode::I, AlleleCode::R),
                subtype: insertion
            })
        );
        assert_eq!(
            recode_tagged("I", "R", insertion),
            Some(QueryAlleles::Symbolic(insertion))
        );
    }

    #[test]
    fn test_recode_merged_deletion() {
        let recoded = |a, b| match recode_merged_deletion(a, b) {
            Some(QueryAlleles::Recoded { codes, .. }) => Some(codes),
            _ => None,
        };
        assert_eq!(recoded("-", "ACG"), Some((AlleleCode::D, AlleleCode::R)));
        assert_eq!(recoded("ACG", "<DEL>"), Some((AlleleCode::R, AlleleCode::D)));
        assert_eq!(recoded("ACG", "A"), Some((AlleleCode::R, AlleleCode::D)));
        assert_eq!(recoded("A", "ACG"), Some((AlleleCode::D, AlleleCode::R)));
        assert_eq!(recode_merged_deletion(".", "NA"), None);
        assert_eq!(recode_merged_deletion("AC", "GT"), None);
        assert_eq!(
            recode_merged_deletion("R", "D"),
            Some(QueryAlleles::Symbolic(VariantSubtype::Deletion))
        );
    }

    #[test]
    fn test_recode_against_deletion() {
        let del = entry(VariantSubtype::Deletion, "AT", "A");
        assert_eq!(recode_against(&del, "AT", "A"), Some((AlleleCode::R, AlleleCode::D)));
        assert_eq!(recode_against(&del, "a", "at"), Some((AlleleCode::D, AlleleCode::R)));
        assert_eq!(recode_against(&del, "ATT", "A"), None);
        assert_eq!(recode_against(&del, "-", "AT"), None);
    }

    #[test]
    fn test_recode_against_insertion() {
        let ins = entry(VariantSubtype::Insertion, "A", "AT");
        assert_eq!(recode_against(&ins, "A", "AT"), Some((AlleleCode::R, AlleleCode::I)));
        assert_eq!(recode_against(&ins, "AT", "A"), Some((AlleleCode::I, AlleleCode::R)));
    }

    #[test]
    fn test_recode_against_unset_subtype_uses_lengths() {
        let del = entry(VariantSubtype::Unset, "AT", "A");
        assert_eq!(recode_against(&del, "AT", "A"), Some((AlleleCode::R, AlleleCode::D)));
        assert_eq!(recode_against(&del, "A", "AT"), Some((AlleleCode::D, AlleleCode::R)));

        let ins = entry(VariantSubtype::Unset, "A", "AT");
        assert_eq!(recode_against(&ins, "A", "AT"), Some((AlleleCode::R, AlleleCode::I)));
        assert_eq!(recode_against(&ins, "AT", "A"), Some((AlleleCode::I, AlleleCode::R)));
    }

    #[test]
    fn test_recode_against_structural_deletion() {
        let sv = entry(VariantSubtype::Deletion, "ACGT", "<DEL>");
        assert_eq!(recode_against(&sv, "ACGT", "-"), Some((AlleleCode::R, AlleleCode::D)));
        assert_eq!(recode_against(&sv, "NA", "acgt"), Some((AlleleCode::D, AlleleCode::R)));
        assert_eq!(recode_against(&sv, "ACG", "-"), None);
        assert_eq!(recode_against(&sv, "ACGT", "A"), None);
    }

    #[test]
    fn test_pair_matches_and_complement() {
        assert!(pair_matches("A", "G", "G", "A"));
        assert!(pair_matches("A", "G", "a", "g"));
        assert!(!pair_matches("A", "G", "A", "C"));
        assert_eq!(
            complement_pair("T", "C"),
            Some(("A".to_string(), "G".to_string()))
        );
        assert_eq!(complement_pair("T", "-"), None);
    }
}
