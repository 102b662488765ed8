//! Turns an input record into a reference lookup.

use crate::core::record::InputRecord;
use crate::core::types::{VariantSubtype, VariantType};
use crate::harmonize::alleles::{classify, recode_merged_deletion, recode_tagged, QueryAlleles};
use crate::harmonize::config::LookupMode;
use crate::harmonize::log::Warning;
use crate::parsing::input::ColumnLayout;

/// Identifier prefix looked up by id
pub const RSID_PREFIX: &str = "rs";

/// Identifier prefix of merged deletions, looked up by id as a deletion
pub const MERGED_DELETION_PREFIX: &str = "merged_del";

/// Separator of `CHR:POS[:TYPE]` identifiers
pub const IDENTIFIER_SEPARATOR: char = ':';

/// What to search for in a chromosome index
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchKey {
    Id(String),
    Position(u64),
}

/// A resolved lookup with the expected variant shape
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    pub key: SearchKey,
    pub alleles: QueryAlleles,
}

impl Query {
    #[must_use]
    pub fn variant_type(&self) -> VariantType {
        self.alleles.variant_type()
    }
}

/// Resolves records into queries for one lookup mode
#[derive(Debug, Clone, Copy)]
pub struct QueryResolver {
    mode: LookupMode,
    layout: ColumnLayout,
}

impl QueryResolver {
    #[must_use]
    pub fn new(mode: LookupMode, layout: ColumnLayout) -> Self {
        Self { mode, layout }
    }

    /// Position text of a record as used for lookups and log text
    #[must_use]
    pub fn position_text<'r>(&self, record: &'r InputRecord) -> Option<&'r str> {
        match self.mode {
            LookupMode::Position => self.layout.position.map(|i| record.trimmed(i)),
            LookupMode::Identifier => {
                let id = record.trimmed(self.layout.identifier);
                let mut tokens = id.split(IDENTIFIER_SEPARATOR);
                tokens.next();
                tokens.next()
            }
        }
    }

    /// Build the query for one record.
    ///
    /// # Errors
    ///
    /// Returns the warning that rejects the record: `BadIdentifier`,
    /// `BadPosition` or `UnrecognizedAlleles`.
    pub fn resolve(&self, record: &InputRecord) -> Result<Query, Warning> {
        let first = record.trimmed(self.layout.first_allele);
        let second = record.trimmed(self.layout.second_allele);

        match self.mode {
            LookupMode::Position => {
                let position = self
                    .layout
                    .position
                    .map(|i| record.trimmed(i))
                    .ok_or(Warning::BadPosition)?;
                Ok(Query {
                    key: SearchKey::Position(parse_position(position)?),
                    alleles: classify(first, second).ok_or(Warning::UnrecognizedAlleles)?,
                })
            }
            LookupMode::Identifier => {
                let id = record.trimmed(self.layout.identifier);
                resolve_identifier(id, first, second)
            }
        }
    }
}

fn resolve_identifier(id: &str, first: &str, second: &str) -> Result<Query, Warning> {
    if starts_with_ignore_case(id, MERGED_DELETION_PREFIX) {
        return Ok(Query {
            key: SearchKey::Id(id.to_string()),
            alleles: recode_merged_deletion(first, second).ok_or(Warning::UnrecognizedAlleles)?,
        });
    }
    if starts_with_ignore_case(id, RSID_PREFIX) {
        return Ok(Query {
            key: SearchKey::Id(id.to_string()),
            alleles: classify(first, second).ok_or(Warning::UnrecognizedAlleles)?,
        });
    }

    let tokens: Vec<&str> = id.split(IDENTIFIER_SEPARATOR).collect();
    if !(2..=3).contains(&tokens.len()) {
        return Err(Warning::BadIdentifier);
    }
    let position = parse_position(tokens[1])?;

    let alleles = match tokens.get(2).copied() {
        Some(tag) if tag.eq_ignore_ascii_case(VariantType::Snp.label()) => {
            match classify(first, second) {
                Some(QueryAlleles::Snp) => Some(QueryAlleles::Snp),
                _ => None,
            }
        }
        Some(tag) if tag.eq_ignore_ascii_case("D") => {
            recode_tagged(first, second, VariantSubtype::Deletion)
        }
        Some(tag) if tag.eq_ignore_ascii_case("I") => {
            recode_tagged(first, second, VariantSubtype::Insertion)
        }
        _ => classify(first, second),
    }
    .ok_or(Warning::UnrecognizedAlleles)?;

    Ok(Query {
        key: SearchKey::Position(position),
        alleles,
    })
}

fn parse_position(text: &str) -> Result<u64, Warning> {
    text.trim().parse().map_err(|_| Warning::BadPosition)
}

fn starts_with_ignore_case(s: &str, prefix: &str) -> bool {
    s.get(..prefix.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
}
