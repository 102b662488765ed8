use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::hash::{Hash, Hasher};

/// Label written into canonical identifiers for SNPs
pub const SNP_LABEL: &str = "SNP";

/// Label written into canonical identifiers for insertions/deletions
pub const INDEL_LABEL: &str = "INDEL";

/// Variant type of a reference entry or of a query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VariantType {
    Snp,
    Indel,
}

impl VariantType {
    /// Label used in the `CHR:POS:TYPE` canonical identifier
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Snp => SNP_LABEL,
            Self::Indel => INDEL_LABEL,
        }
    }
}

impl std::fmt::Display for VariantType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Refinement of a variant type relative to the reference allele
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VariantSubtype {
    Snp,
    Insertion,
    Deletion,
    /// Subtype was not determined when the entry was indexed
    #[default]
    Unset,
}

impl VariantSubtype {
    #[must_use]
    pub fn is_known(self) -> bool {
        !matches!(self, Self::Unset)
    }
}

/// Symbolic allele codes used in place of raw indel bases
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AlleleCode {
    /// Reference-length allele
    R,
    /// Insertion allele
    I,
    /// Deletion allele
    D,
}

impl AlleleCode {
    /// Parse a single symbolic code (case-insensitive)
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "R" | "r" => Some(Self::R),
            "I" | "i" => Some(Self::I),
            "D" | "d" => Some(Self::D),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::R => "R",
            Self::I => "I",
            Self::D => "D",
        }
    }
}

impl std::fmt::Display for AlleleCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Compare two strings ignoring ASCII case, byte by byte.
///
/// This is the ordering used by the identifier index; it agrees with
/// `eq_ignore_ascii_case` on equality.
#[must_use]
pub fn cmp_ignore_ascii_case(a: &str, b: &str) -> Ordering {
    a.bytes()
        .map(|c| c.to_ascii_lowercase())
        .cmp(b.bytes().map(|c| c.to_ascii_lowercase()))
}

/// A name (chromosome or identifier) that hashes and compares case-insensitively
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CaseInsensitiveName(pub String);

impl CaseInsensitiveName {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl PartialEq for CaseInsensitiveName {
    fn eq(&self, other: &Self) -> bool {
        self.0.eq_ignore_ascii_case(&other.0)
    }
}

impl Eq for CaseInsensitiveName {}

impl Hash for CaseInsensitiveName {
    fn hash<H: Hasher>(&self, state: &mut H) {
        for byte in self.0.bytes() {
            state.write_u8(byte.to_ascii_lowercase());
        }
        state.write_u8(0xff);
    }
}

impl PartialOrd for CaseInsensitiveName {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CaseInsensitiveName {
    fn cmp(&self, other: &Self) -> Ordering {
        cmp_ignore_ascii_case(&self.0, &other.0)
    }
}

impl std::fmt::Display for CaseInsensitiveName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for CaseInsensitiveName {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}
