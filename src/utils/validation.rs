//! Centralized validation helpers for allele and filter fields.

/// Query-side allele placeholders meaning "no bases" (compared case-insensitively)
pub const QUERY_PLACEHOLDERS: [&str; 4] = [".", "-", "NA", "<DEL>"];

/// FILTER values that mean "all filters passed" or "no filters applied"
pub const PASSING_FILTERS: [&str; 2] = ["PASS", "."];

/// Check whether a byte is one of the four nucleotide letters (any case).
#[must_use]
pub fn is_nucleotide(b: u8) -> bool {
    matches!(b.to_ascii_uppercase(), b'A' | b'C' | b'G' | b'T')
}

/// Validate that a string is a non-empty run of nucleotide letters.
///
/// # Examples
///
/// ```
/// use variant_harmonizer::utils::validation::is_nucleotide_run;
///
/// assert!(is_nucleotide_run("ACGT"));
/// assert!(is_nucleotide_run("acgt"));
/// assert!(!is_nucleotide_run(""));
/// assert!(!is_nucleotide_run("ACNT"));
/// ```
#[must_use]
pub fn is_nucleotide_run(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(is_nucleotide)
}

/// A run of exactly one nucleotide
#[must_use]
pub fn is_single_nucleotide(s: &str) -> bool {
    s.len() == 1 && is_nucleotide_run(s)
}

/// Check whether an allele is a "no bases" placeholder.
///
/// # Examples
///
/// ```
/// use variant_harmonizer::utils::validation::is_placeholder;
///
/// assert!(is_placeholder("-"));
/// assert!(is_placeholder("na"));
/// assert!(is_placeholder("<del>"));
/// assert!(!is_placeholder("A"));
/// ```
#[must_use]
pub fn is_placeholder(s: &str) -> bool {
    QUERY_PLACEHOLDERS
        .iter()
        .any(|p| s.eq_ignore_ascii_case(p))
}

/// True if the FILTER column marks the variant as passing
#[must_use]
pub fn passes_filter(s: &str) -> bool {
    PASSING_FILTERS.iter().any(|p| s.eq_ignore_ascii_case(p))
}

/// Uppercase a nucleotide run for storage and comparison.
#[must_use]
pub fn normalize_bases(s: &str) -> String {
    s.to_ascii_uppercase()
}

/// Complement of one nucleotide (A<->T, C<->G), preserving nothing else
#[must_use]
pub fn complement_base(b: u8) -> Option<u8> {
    match b.to_ascii_uppercase() {
        b'A' => Some(b'T'),
        b'T' => Some(b'A'),
        b'C' => Some(b'G'),
        b'G' => Some(b'C'),
        _ => None,
    }
}

/// DNA complement of a nucleotide run, uppercased.
///
/// Returns `None` if the input contains anything but nucleotide letters.
#[must_use]
pub fn complement(s: &str) -> Option<String> {
    if s.is_empty() {
        return None;
    }
    s.bytes()
        .map(|b| complement_base(b).map(char::from))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_nucleotide_run() {
        assert!(is_nucleotide_run("A"));
        assert!(is_nucleotide_run("GATTACA"));
        assert!(is_nucleotide_run("gattaca"));
        assert!(!is_nucleotide_run("N"));
        assert!(!is_nucleotide_run("<DEL>"));
        assert!(!is_nucleotide_run("A T"));
    }

    #[test]
    fn test_is_single_nucleotide() {
        assert!(is_single_nucleotide("c"));
        assert!(!is_single_nucleotide("CC"));
        assert!(!is_single_nucleotide("R"));
        assert!(!is_single_nucleotide(""));
    }

    #[test]
    fn test_placeholders() {
        for p in [".", "-", "NA", "Na", "<DEL>", "<Del>"] {
            assert!(is_placeholder(p), "{p} should be a placeholder");
        }
        assert!(!is_placeholder(""));
        assert!(!is_placeholder("<INS>"));
        assert!(!is_placeholder("D"));
    }

    #[test]
    fn test_passes_filter() {
        assert!(passes_filter("PASS"));
        assert!(passes_filter("pass"));
        assert!(passes_filter("."));
        assert!(!passes_filter("LowQual"));
        assert!(!passes_filter(""));
    }

    #[test]
    fn test_complement() {
        assert_eq!(complement("A").as_deref(), Some("T"));
        assert_eq!(complement("acgt").as_deref(), Some("TGCA"));
        assert_eq!(complement("AN"), None);
        assert_eq!(complement(""), None);
    }
}
