//! The per-record harmonization decision.
//!
//! For every record the engine:
//!
//! 1. looks up the chromosome,
//! 2. resolves the record into a [`Query`],
//! 3. searches the position or identifier array and takes the whole
//!    duplicate-key run,
//! 4. walks the run for the first entry of the expected type whose alleles
//!    reconcile with the record,
//! 5. rewrites alleles and the identifier.
//!
//! The record is only modified once a match is certain; every rejection
//! leaves it exactly as it was read.

use crate::core::record::InputRecord;
use crate::core::types::{AlleleCode, VariantSubtype};
use crate::core::variant::ReferenceVariant;
use crate::harmonize::alleles::{complement_pair, pair_matches, recode_against, QueryAlleles};
use crate::harmonize::config::{AllelePolicy, LookupMode};
use crate::harmonize::log::{LogEntry, Site, Warning};
use crate::harmonize::query::{Query, QueryResolver, SearchKey};
use crate::index::store::ReferenceIndex;
use crate::parsing::input::ColumnLayout;

/// Terminal state of one record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Matched; nothing needed changing
    Unchanged,

    /// Matched; identifier and/or alleles were rewritten
    Rewritten,

    /// Not harmonized; the record is untouched
    Rejected(Warning),
}

/// Decision plus the log entries it produced, in order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub decision: Decision,
    pub entries: Vec<LogEntry>,
}

/// How one reference entry reconciles with the query
#[derive(Debug, Clone, PartialEq, Eq)]
enum Reconciled {
    Keep,
    Recode((AlleleCode, AlleleCode)),
    Flip(String, String),
    StrandMismatch,
}

/// Harmonizes records against a built reference index
#[derive(Debug)]
pub struct DecisionEngine<'a> {
    index: &'a ReferenceIndex,
    layout: ColumnLayout,
    resolver: QueryResolver,
    policy: AllelePolicy,
}

impl<'a> DecisionEngine<'a> {
    #[must_use]
    pub fn new(
        index: &'a ReferenceIndex,
        layout: ColumnLayout,
        mode: LookupMode,
        policy: AllelePolicy,
    ) -> Self {
        Self {
            index,
            layout,
            resolver: QueryResolver::new(mode, layout),
            policy,
        }
    }

    #[must_use]
    pub fn policy(&self) -> AllelePolicy {
        self.policy
    }

    /// Harmonize one record in place
    pub fn harmonize(&self, record: &mut InputRecord) -> Outcome {
        let site = self.site(record);
        let line = record.line_number;
        let reject = |warning: Warning| Outcome {
            decision: Decision::Rejected(warning),
            entries: vec![LogEntry::warning(line, warning, &site)],
        };

        let Some(chromosome) = self.index.get(&site.chromosome) else {
            return reject(Warning::ChromosomeMissing);
        };

        let query = match self.resolver.resolve(record) {
            Ok(query) => query,
            Err(warning) => return reject(warning),
        };

        let candidates = match &query.key {
            SearchKey::Id(id) => chromosome.find_id(id),
            SearchKey::Position(position) => chromosome.find_position(*position),
        };
        let Some(candidates) = candidates else {
            return reject(Warning::NotInReference);
        };

        let (first, second) = (&site.alleles.0, &site.alleles.1);
        let mut type_seen = false;
        let mut found = None;
        for entry in candidates.of_type(query.variant_type()) {
            type_seen = true;
            if let Some(reconciled) = self.reconcile(entry, &query, first, second) {
                found = Some((entry, reconciled));
                break;
            }
        }

        let (entry, reconciled) = match found {
            Some(found) => found,
            None if !type_seen => return reject(Warning::TypeMismatch),
            None => return reject(Warning::AllelesMismatch),
        };

        let mut entries = Vec::new();
        match reconciled {
            Reconciled::StrandMismatch => return reject(Warning::StrandMismatch),
            Reconciled::Keep => {}
            Reconciled::Recode(codes) => {
                record.set_codes(&self.layout, codes);
                entries.push(LogEntry::alleles_changed(line, &site, codes));
            }
            Reconciled::Flip(flipped_first, flipped_second) => {
                record.set_field(self.layout.first_allele, flipped_first);
                record.set_field(self.layout.second_allele, flipped_second);
                entries.push(LogEntry::strand_flipped(line, &site));
            }
        }

        let canonical = canonical_id(&site.chromosome, entry);
        if canonical != site.id {
            entries.push(LogEntry::id_changed(line, &site.id, &canonical));
            record.set_field(self.layout.identifier, canonical);
        }

        let decision = if entries.is_empty() {
            Decision::Unchanged
        } else {
            Decision::Rewritten
        };
        Outcome { decision, entries }
    }

    fn site(&self, record: &InputRecord) -> Site {
        Site {
            id: record.trimmed(self.layout.identifier).to_string(),
            chromosome: record.trimmed(self.layout.chromosome).to_string(),
            position: self.resolver.position_text(record).map(str::to_string),
            alleles: (
                record.trimmed(self.layout.first_allele).to_string(),
                record.trimmed(self.layout.second_allele).to_string(),
            ),
        }
    }

    /// Check one type-matching entry; `None` means try the next one
    fn reconcile(
        &self,
        entry: &ReferenceVariant,
        query: &Query,
        first: &str,
        second: &str,
    ) -> Option<Reconciled> {
        match query.alleles {
            QueryAlleles::Snp => {
                if self.policy == AllelePolicy::TypeOnly {
                    return Some(Reconciled::Keep);
                }
                // Entries indexed without alleles can only be checked by type
                let Some((ref_allele, alt_allele)) = entry.alleles() else {
                    return Some(Reconciled::Keep);
                };
                if pair_matches(ref_allele, alt_allele, first, second) {
                    return Some(Reconciled::Keep);
                }
                let (flipped_first, flipped_second) = complement_pair(first, second)?;
                if !pair_matches(ref_allele, alt_allele, &flipped_first, &flipped_second) {
                    return None;
                }
                Some(if self.policy == AllelePolicy::RecodeOrFlip {
                    Reconciled::Flip(flipped_first, flipped_second)
                } else {
                    Reconciled::StrandMismatch
                })
            }
            QueryAlleles::Symbolic(subtype) => {
                subtype_matches(entry.subtype, subtype).then_some(Reconciled::Keep)
            }
            QueryAlleles::Recoded { codes, subtype } => {
                subtype_matches(entry.subtype, subtype).then_some(Reconciled::Recode(codes))
            }
            QueryAlleles::Raw => {
                if self.policy == AllelePolicy::TypeOnly {
                    return Some(Reconciled::Keep);
                }
                recode_against(entry, first, second).map(Reconciled::Recode)
            }
        }
    }
}

/// Reference subtypes that were never determined match any query subtype
fn subtype_matches(reference: VariantSubtype, query: VariantSubtype) -> bool {
    !reference.is_known() || reference == query
}

/// `CHR:POS:TYPE` for a matched entry
#[must_use]
pub fn canonical_id(chromosome: &str, entry: &ReferenceVariant) -> String {
    format!(
        "{}:{}:{}",
        chromosome,
        entry.position,
        entry.variant_type.label()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::harmonize::log::{EntryKind, Message};
    use crate::index::builder::{ClassificationPolicy, ReferenceIndexer};
    use crate::parsing::reader::LineReader;

    const HEADER: &str = "##fileformat=VCFv4.2\n#CHROM\tPOS\tID\tREF\tALT\tQUAL\tFILTER\tINFO\n";

    fn index(policy: ClassificationPolicy, body: &str) -> ReferenceIndex {
        let text = format!("{HEADER}{body}");
        ReferenceIndexer::new(policy)
            .index_reader(LineReader::from_reader("ref.vcf", std::io::Cursor::new(text)))
            .unwrap()
            .0
    }

    fn position_layout() -> ColumnLayout {
        ColumnLayout {
            identifier: 0,
            chromosome: 1,
            position: Some(2),
            first_allele: 3,
            second_allele: 4,
            column_count: 5,
        }
    }

    fn identifier_layout() -> ColumnLayout {
        ColumnLayout {
            identifier: 0,
            chromosome: 1,
            position: None,
            first_allele: 2,
            second_allele: 3,
            column_count: 4,
        }
    }

    fn record(fields: &[&str]) -> InputRecord {
        InputRecord::new(2, fields.iter().map(|f| f.to_string()).collect())
    }

    fn messages(outcome: &Outcome) -> Vec<EntryKind> {
        outcome.entries.iter().map(|e| e.kind).collect()
    }

    const POSITION_REFERENCE: &str = "\
chr1\t100\trs1\tA\tG\t.\tPASS\t.
chr2\t500\trs2\tAT\tA\t.\tPASS\t.
chr2\t600\trs3\tA\tATT\t.\tPASS\t.
chr2\t700\tsv1\tACGT\t<DEL>\t.\tPASS\t.
chr3\t50\trs4\tA\tAT\t.\tPASS\t.
chr3\t50\trs5\tC\tT\t.\tPASS\t.
";

    fn position_engine(index: &ReferenceIndex, policy: AllelePolicy) -> DecisionEngine<'_> {
        DecisionEngine::new(index, position_layout(), LookupMode::Position, policy)
    }

    #[test]
    fn test_snp_swapped_alleles_rewrites_id_only() {
        let index = index(ClassificationPolicy::LengthBased, POSITION_REFERENCE);
        let engine = position_engine(&index, AllelePolicy::Recode);

        let mut rec = record(&["rs1", "chr1", "100", "G", "A"]);
        let outcome = engine.harmonize(&mut rec);

        assert_eq!(outcome.decision, Decision::Rewritten);
        assert_eq!(messages(&outcome), vec![EntryKind::Message(Message::IdChanged)]);
        assert_eq!(rec.to_line('\t'), "chr1:100:SNP\tchr1\t100\tG\tA");
    }

    #[test]
    fn test_snp_strand_flip() {
        let index = index(ClassificationPolicy::LengthBased, POSITION_REFERENCE);
        let engine = position_engine(&index, AllelePolicy::RecodeOrFlip);

        let mut rec = record(&["rs1", "chr1", "100", "t", "C"]);
        let outcome = engine.harmonize(&mut rec);

        assert_eq!(outcome.decision, Decision::Rewritten);
        assert_eq!(
            messages(&outcome),
            vec![
                EntryKind::Message(Message::StrandFlipped),
                EntryKind::Message(Message::IdChanged)
            ]
        );
        assert_eq!(rec.field(3), "A");
        assert_eq!(rec.field(4), "G");
        assert_eq!(rec.field(0), "chr1:100:SNP");
    }

    #[test]
    fn test_snp_strand_mismatch_without_flip() {
        let index = index(ClassificationPolicy::LengthBased, POSITION_REFERENCE);
        let engine = position_engine(&index, AllelePolicy::Recode);

        let mut rec = record(&["rs1", "chr1", "100", "T", "C"]);
        let before = rec.clone();
        let outcome = engine.harmonize(&mut rec);

        assert_eq!(outcome.decision, Decision::Rejected(Warning::StrandMismatch));
        assert_eq!(rec, before);
    }

    #[test]
    fn test_snp_alleles_mismatch() {
        let index = index(ClassificationPolicy::LengthBased, POSITION_REFERENCE);
        let engine = position_engine(&index, AllelePolicy::RecodeOrFlip);

        let mut rec = record(&["rs1", "chr1", "100", "A", "C"]);
        let outcome = engine.harmonize(&mut rec);
        assert_eq!(outcome.decision, Decision::Rejected(Warning::AllelesMismatch));
    }

    #[test]
    fn test_indel_recoding() {
        let index = index(ClassificationPolicy::LengthBased, POSITION_REFERENCE);
        let engine = position_engine(&index, AllelePolicy::Recode);

        let mut rec = record(&["rs2", "chr2", "500", "AT", "A"]);
        let outcome = engine.harmonize(&mut rec);
        assert_eq!(outcome.decision, Decision::Rewritten);
        assert_eq!(rec.to_line(','), "chr2:500:INDEL,chr2,500,R,D");
        assert_eq!(
            outcome.entries[0].to_string(),
            "Line 2: Alleles AT/A of rs2 at chr2:500 changed to R/D."
        );

        let mut rec = record(&["x", "chr2", "600", "ATT", "A"]);
        engine.harmonize(&mut rec);
        assert_eq!((rec.field(3), rec.field(4)), ("I", "R"));
    }

    #[test]
    fn test_symbolic_alleles_match_subtype() {
        let index = index(ClassificationPolicy::LengthBased, POSITION_REFERENCE);
        let engine = position_engine(&index, AllelePolicy::Recode);

        let mut rec = record(&["chr2:500:INDEL", "chr2", "500", "R", "D"]);
        let outcome = engine.harmonize(&mut rec);
        assert_eq!(outcome.decision, Decision::Unchanged);
        assert!(outcome.entries.is_empty());

        let mut rec = record(&["chr2:500:INDEL", "chr2", "500", "R", "I"]);
        let outcome = engine.harmonize(&mut rec);
        assert_eq!(outcome.decision, Decision::Rejected(Warning::AllelesMismatch));
    }

    #[test]
    fn test_structural_deletion_placeholder() {
        let index = index(ClassificationPolicy::LengthBased, POSITION_REFERENCE);
        let engine = position_engine(&index, AllelePolicy::Recode);

        let mut rec = record(&["sv1", "chr2", "700", "-", "ACGT"]);
        let outcome = engine.harmonize(&mut rec);
        assert_eq!(outcome.decision, Decision::Rewritten);
        assert_eq!((rec.field(3), rec.field(4)), ("D", "R"));
    }

    #[test]
    fn test_duplicate_run_is_scanned_for_type() {
        let index = index(ClassificationPolicy::LengthBased, POSITION_REFERENCE);
        let engine = position_engine(&index, AllelePolicy::Recode);

        let mut snp = record(&["rs5", "chr3", "50", "C", "T"]);
        assert_eq!(engine.harmonize(&mut snp).decision, Decision::Rewritten);
        assert_eq!(snp.field(0), "chr3:50:SNP");

        let mut indel = record(&["rs4", "chr3", "50", "A", "AT"]);
        assert_eq!(engine.harmonize(&mut indel).decision, Decision::Rewritten);
        assert_eq!(indel.field(0), "chr3:50:INDEL");
    }

    #[test]
    fn test_rejections_leave_record_untouched() {
        let index = index(ClassificationPolicy::LengthBased, POSITION_REFERENCE);
        let engine = position_engine(&index, AllelePolicy::RecodeOrFlip);

        let cases = [
            (["rs9", "chr9", "100", "A", "G"], Warning::ChromosomeMissing),
            (["rs9", "chr1", "101", "A", "G"], Warning::NotInReference),
            (["rs9", "chr1", "abc", "A", "G"], Warning::BadPosition),
            (["rs9", "chr1", "100", "AT", "A"], Warning::TypeMismatch),
            (["rs9", "chr1", "100", "AC", "GT"], Warning::UnrecognizedAlleles),
        ];
        for (fields, warning) in cases {
            let mut rec = record(&fields);
            let before = rec.clone();
            let outcome = engine.harmonize(&mut rec);
            assert_eq!(outcome.decision, Decision::Rejected(warning), "{fields:?}");
            assert_eq!(outcome.entries.len(), 1);
            assert_eq!(rec, before);
        }
    }

    #[test]
    fn test_type_only_policy() {
        let index = index(ClassificationPolicy::LengthBased, POSITION_REFERENCE);
        let engine = position_engine(&index, AllelePolicy::TypeOnly);

        let mut rec = record(&["rs2", "chr2", "500", "ACG", "A"]);
        let outcome = engine.harmonize(&mut rec);
        assert_eq!(outcome.decision, Decision::Rewritten);
        assert_eq!((rec.field(3), rec.field(4)), ("ACG", "A"));
        assert_eq!(rec.field(0), "chr2:500:INDEL");
    }

    const IDENTIFIER_REFERENCE: &str = "\
1\t100\trs1\tA\tG\t.\tPASS\t.
1\t200\trs2\tAT\tA\t.\tPASS\t.
1\t300\tmerged_del_1\tACG\tA\t.\tPASS\tVT=INDEL
";

    #[test]
    fn test_identifier_mode_by_rsid() {
        let index = index(ClassificationPolicy::Annotated, IDENTIFIER_REFERENCE);
        let engine = DecisionEngine::new(
            &index,
            identifier_layout(),
            LookupMode::Identifier,
            AllelePolicy::Recode,
        );

        let mut rec = record(&["RS1", "1", "C", "T"]);
        let outcome = engine.harmonize(&mut rec);
        assert_eq!(outcome.decision, Decision::Rewritten);
        assert_eq!(rec.field(0), "1:100:SNP");

        let mut rec = record(&["rs2", "1", "A", "AT"]);
        engine.harmonize(&mut rec);
        assert_eq!(rec.to_line('\t'), "1:200:INDEL\t1\tD\tR");

        let mut rec = record(&["rs3", "1", "A", "G"]);
        assert_eq!(
            engine.harmonize(&mut rec).decision,
            Decision::Rejected(Warning::NotInReference)
        );
    }

    #[test]
    fn test_identifier_mode_merged_deletion() {
        let index = index(ClassificationPolicy::Annotated, IDENTIFIER_REFERENCE);
        let engine = DecisionEngine::new(
            &index,
            identifier_layout(),
            LookupMode::Identifier,
            AllelePolicy::Recode,
        );

        let mut rec = record(&["merged_del_1", "1", "-", "CG"]);
        let outcome = engine.harmonize(&mut rec);
        assert_eq!(outcome.decision, Decision::Rewritten);
        assert_eq!(rec.to_line('\t'), "1:300:INDEL\t1\tD\tR");
        assert_eq!(
            messages(&outcome),
            vec![
                EntryKind::Message(Message::AllelesChanged),
                EntryKind::Message(Message::IdChanged)
            ]
        );
    }

    #[test]
    fn test_identifier_mode_chr_pos_is_idempotent() {
        let index = index(ClassificationPolicy::Annotated, IDENTIFIER_REFERENCE);
        let engine = DecisionEngine::new(
            &index,
            identifier_layout(),
            LookupMode::Identifier,
            AllelePolicy::Recode,
        );

        let mut rec = record(&["1:100:SNP", "1", "A", "G"]);
        let outcome = engine.harmonize(&mut rec);
        assert_eq!(outcome.decision, Decision::Unchanged);
        assert_eq!(rec.to_line('\t'), "1:100:SNP\t1\tA\tG");

        let mut rec = record(&["1:200:INDEL", "1", "R", "D"]);
        assert_eq!(engine.harmonize(&mut rec).decision, Decision::Unchanged);

        let mut rec = record(&["1", "1", "A", "G"]);
        assert_eq!(
            engine.harmonize(&mut rec).decision,
            Decision::Rejected(Warning::BadIdentifier)
        );
    }

    #[test]
    fn test_canonical_id() {
        let entry = ReferenceVariant::new(42, "rs1", crate::core::types::VariantType::Indel);
        assert_eq!(canonical_id("chrX", &entry), "chrX:42:INDEL");
    }
}
