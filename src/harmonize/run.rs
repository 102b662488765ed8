//! Two-phase harmonization: index the reference, then stream the input.

use std::time::Instant;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::Result;
use crate::harmonize::config::HarmonizeConfig;
use crate::harmonize::emitter::{RecordEmitter, RecordSink};
use crate::harmonize::engine::{Decision, DecisionEngine};
use crate::harmonize::log::Tally;
use crate::index::builder::{IndexingStats, ReferenceIndexer};
use crate::index::store::ReferenceIndex;
use crate::parsing::input::InputReader;

/// Record counts of one harmonization run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RecordCounts {
    pub read: u64,
    pub written: u64,
    pub dropped: u64,
    pub rewritten: u64,
    pub unchanged: u64,
}

/// Everything a finished run reports
#[derive(Debug, Clone)]
pub struct HarmonizationSummary {
    pub records: RecordCounts,
    pub tally: Tally,
    pub indexing: IndexingStats,
    pub chromosomes: usize,
    pub reference_entries: usize,
    pub elapsed_secs: f64,
}

/// Runs one configured harmonization
#[derive(Debug)]
pub struct Harmonizer {
    config: HarmonizeConfig,
}

impl Harmonizer {
    #[must_use]
    pub fn new(config: HarmonizeConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn config(&self) -> &HarmonizeConfig {
        &self.config
    }

    /// Build the reference index for the configured mode
    ///
    /// # Errors
    ///
    /// Returns any fatal reference error: IO, header format, schema, position
    /// parse or allocation failure.
    pub fn build_index(&self) -> Result<(ReferenceIndex, IndexingStats)> {
        ReferenceIndexer::new(self.config.mode.classification_policy())
            .with_config(self.config.index)
            .index(&self.config.reference)
    }

    /// Validate the configuration, index the reference, then harmonize the
    /// input file into the output and log files.
    ///
    /// # Errors
    ///
    /// Returns the first fatal error. Per-record problems are never fatal;
    /// they are written to the log.
    pub fn run(&self) -> Result<HarmonizationSummary> {
        let start = Instant::now();
        self.config.validate()?;

        info!(
            "Indexing reference {} ({:?} mode)",
            self.config.reference.display(),
            self.config.mode
        );
        let (index, indexing) = self.build_index()?;
        if index.is_empty() {
            warn!("Reference {} has no indexed variants", self.config.reference.display());
        }

        let (records, tally) = self.harmonize_with(&index)?;

        let summary = HarmonizationSummary {
            records,
            tally,
            indexing,
            chromosomes: index.len(),
            reference_entries: index.total_entries(),
            elapsed_secs: start.elapsed().as_secs_f64(),
        };
        info!(
            read = records.read,
            written = records.written,
            dropped = records.dropped,
            rewritten = records.rewritten,
            "Harmonized {} in {:.2}s",
            self.config.input.display(),
            summary.elapsed_secs
        );
        Ok(summary)
    }

    /// Harmonize the input against an already built index
    ///
    /// # Errors
    ///
    /// Returns IO and input format errors.
    pub fn harmonize_with(&self, index: &ReferenceIndex) -> Result<(RecordCounts, Tally)> {
        let config = &self.config;
        let mut input = InputReader::open(
            &config.input,
            config.separator.as_char(),
            &config.columns,
            config.mode.needs_position_column(),
        )?;
        let separator = input.separator();
        let layout = *input.layout();
        debug!(?layout, "Resolved input columns");

        let log_path = config.log_path();
        let mut emitter = RecordEmitter::new(
            RecordSink::create(&config.output, config.gzip_output)?,
            RecordSink::create(&log_path, config.gzip_log)?,
            separator,
        );
        emitter.write_header(input.header())?;

        let engine = DecisionEngine::new(index, layout, config.mode, config.allele_policy());
        debug!(policy = ?engine.policy(), "Harmonizing {}", config.input.display());

        let mut counts = RecordCounts::default();
        while let Some(mut record) = input.next_record()? {
            counts.read += 1;
            let outcome = engine.harmonize(&mut record);
            emitter.write_entries(&outcome.entries)?;

            match outcome.decision {
                Decision::Rejected(_) if config.drop_unresolved => {
                    counts.dropped += 1;
                    continue;
                }
                Decision::Rejected(_) | Decision::Unchanged => counts.unchanged += 1,
                Decision::Rewritten => counts.rewritten += 1,
            }
            emitter.write_record(&record)?;
            counts.written += 1;
        }

        let tally = emitter.finish()?;
        if tally.total_warnings() > 0 {
            warn!(
                "{} records could not be harmonized; see {}",
                tally.total_warnings(),
                log_path.display()
            );
        }
        Ok((counts, tally))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::harmonize::log::{Message, Warning};
    use tempfile::TempDir;

    const REFERENCE: &str = "##fileformat=VCFv4.2
#CHROM\tPOS\tID\tREF\tALT\tQUAL\tFILTER\tINFO
1\t100\trs1\tA\tG\t.\tPASS\t.
1\t200\trs2\tAT\tA\t.\tPASS\t.
1\t300\trs3\tC\tT\t.\tLowQual\t.
";

    const INPUT: &str = "\
MARKER\tCHR\tPOS\tA1\tA2\tP
rs1\t1\t100\tA\tG\t0.5
rs2\t1\t200\tA\tAT\t0.1
rs3\t1\t300\tC\tT\t0.9
rs4\t2\t10\tA\tC\t0.2
";

    fn setup(dir: &TempDir) -> HarmonizeConfig {
        let reference = dir.path().join("ref.vcf");
        let input = dir.path().join("in.txt");
        std::fs::write(&reference, REFERENCE).unwrap();
        std::fs::write(&input, INPUT).unwrap();
        HarmonizeConfig::new(reference, input, dir.path().join("out.txt"))
    }

    #[test]
    fn test_run_passes_unresolved_through() {
        let dir = TempDir::new().unwrap();
        let config = setup(&dir);
        let output = config.output.clone();
        let log = config.log_path();

        let summary = Harmonizer::new(config).run().unwrap();

        assert_eq!(summary.records.read, 4);
        assert_eq!(summary.records.written, 4);
        assert_eq!(summary.records.dropped, 0);
        assert_eq!(summary.records.rewritten, 2);
        assert_eq!(summary.indexing.filtered, 1);
        assert_eq!(summary.tally.warning_count(Warning::NotInReference), 1);
        assert_eq!(summary.tally.warning_count(Warning::ChromosomeMissing), 1);
        assert_eq!(summary.tally.message_count(Message::AllelesChanged), 1);
        assert_eq!(summary.tally.message_count(Message::IdChanged), 2);

        let text = std::fs::read_to_string(output).unwrap();
        assert_eq!(
            text,
            "MARKER\tCHR\tPOS\tA1\tA2\tP
1:100:SNP\t1\t100\tA\tG\t0.5
1:200:INDEL\t1\t200\tD\tR\t0.1
rs3\t1\t300\tC\tT\t0.9
rs4\t2\t10\tA\tC\t0.2
"
        );

        let log = std::fs::read_to_string(log).unwrap();
        assert!(log.contains("Line 4: (WARNING) rs3 at 1:300 is not in reference."));
        assert!(log.contains("Line 5: (WARNING) Chromosome of rs4 at 2:10 is not in reference."));
    }

    #[test]
    fn test_run_drops_unresolved() {
        let dir = TempDir::new().unwrap();
        let config = setup(&dir).with_drop_unresolved(true);
        let output = config.output.clone();

        let summary = Harmonizer::new(config).run().unwrap();
        assert_eq!(summary.records.written, 2);
        assert_eq!(summary.records.dropped, 2);

        let text = std::fs::read_to_string(output).unwrap();
        assert_eq!(text.lines().count(), 3);
        assert!(!text.contains("rs4"));
    }

    #[test]
    fn test_run_rejects_invalid_config() {
        let config = HarmonizeConfig::new("", "in.txt", "out.txt");
        assert!(Harmonizer::new(config).run().is_err());
    }
}
