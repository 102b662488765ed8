use std::path::PathBuf;

use clap::Args;

use crate::cli::OutputFormat;
use crate::harmonize::config::{HarmonizeConfig, LookupMode};
use crate::harmonize::run::{HarmonizationSummary, Harmonizer};
use crate::parsing::tokenizer::Separator;

#[derive(Args)]
pub struct HarmonizeArgs {
    /// Reference VCF (plain or gzip)
    #[arg(short, long, required_unless_present = "config")]
    pub reference: Option<PathBuf>,

    /// File to harmonize (plain or gzip)
    #[arg(short, long, required_unless_present = "config")]
    pub input: Option<PathBuf>,

    /// Harmonized output file
    #[arg(short, long, required_unless_present = "config")]
    pub output: Option<PathBuf>,

    /// Decision log [default: <OUTPUT>.log]
    #[arg(long)]
    pub log: Option<PathBuf>,

    /// Load settings from a JSON file; command-line paths override it
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// How records are located in the reference
    #[arg(short, long, value_enum)]
    pub mode: Option<LookupMode>,

    /// Field separator of the input file
    #[arg(short, long, value_enum)]
    pub separator: Option<Separator>,

    /// Identifier column name
    #[arg(long)]
    pub id_column: Option<String>,

    /// Chromosome column name
    #[arg(long)]
    pub chr_column: Option<String>,

    /// Position column name (position mode)
    #[arg(long)]
    pub pos_column: Option<String>,

    /// First allele column name
    #[arg(long)]
    pub first_allele_column: Option<String>,

    /// Second allele column name
    #[arg(long)]
    pub second_allele_column: Option<String>,

    /// Drop records that could not be harmonized
    #[arg(long)]
    pub drop_unresolved: bool,

    /// Flip SNPs whose alleles match the reference on the opposite strand
    #[arg(long)]
    pub allow_flip: bool,

    /// Only check variant types, not alleles
    #[arg(long)]
    pub skip_allele_check: bool,

    /// Gzip-compress the output file
    #[arg(long)]
    pub gzip_output: bool,

    /// Gzip-compress the log file
    #[arg(long)]
    pub gzip_log: bool,
}

impl HarmonizeArgs {
    /// Merge the arguments over the JSON configuration, if any
    fn into_config(self) -> anyhow::Result<HarmonizeConfig> {
        let mut config = match &self.config {
            Some(path) => HarmonizeConfig::from_json_file(path)?,
            None => HarmonizeConfig::default(),
        };

        if let Some(reference) = self.reference {
            config.reference = reference;
        }
        if let Some(input) = self.input {
            config.input = input;
        }
        if let Some(output) = self.output {
            config.output = output;
        }
        if self.log.is_some() {
            config.log = self.log;
        }
        if let Some(mode) = self.mode {
            config.mode = mode;
        }
        if let Some(separator) = self.separator {
            config.separator = separator;
        }

        let columns = &mut config.columns;
        let overrides = [
            (&mut columns.identifier, self.id_column),
            (&mut columns.chromosome, self.chr_column),
            (&mut columns.position, self.pos_column),
            (&mut columns.first_allele, self.first_allele_column),
            (&mut columns.second_allele, self.second_allele_column),
        ];
        for (column, name) in overrides {
            if let Some(name) = name {
                *column = name;
            }
        }

        config.drop_unresolved |= self.drop_unresolved;
        config.allow_flip |= self.allow_flip;
        config.skip_allele_check |= self.skip_allele_check;
        config.gzip_output |= self.gzip_output;
        config.gzip_log |= self.gzip_log;

        Ok(config)
    }
}

pub fn run(args: HarmonizeArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let config = args.into_config()?;

    if verbose {
        eprintln!(
            "Harmonizing {} against {} ({:?} mode, {:?} alleles)",
            config.input.display(),
            config.reference.display(),
            config.mode,
            config.allele_policy()
        );
    }

    let harmonizer = Harmonizer::new(config);
    let summary = harmonizer.run()?;

    match format {
        OutputFormat::Text => print_text_summary(harmonizer.config(), &summary),
        OutputFormat::Json => print_json_summary(harmonizer.config(), &summary)?,
        OutputFormat::Tsv => print_tsv_summary(&summary),
    }

    Ok(())
}

fn print_text_summary(config: &HarmonizeConfig, summary: &HarmonizationSummary) {
    println!("Harmonization Summary");
    println!("{}", "=".repeat(60));

    println!("\nReference: {}", config.reference.display());
    println!("  Chromosomes: {}", summary.chromosomes);
    println!("  Indexed variants: {}", summary.reference_entries);
    println!("  Filtered lines: {}", summary.indexing.filtered);

    println!("\nInput: {}", config.input.display());
    println!("  Records read: {}", summary.records.read);
    println!("  Records written: {}", summary.records.written);
    println!("  Records dropped: {}", summary.records.dropped);
    println!("  Records rewritten: {}", summary.records.rewritten);

    println!("\nOutput: {}", config.output.display());
    println!("Log: {}", config.log_path().display());

    println!("\nWarnings:");
    for (warning, count) in summary.tally.warnings() {
        println!("  {}: {count}", warning.label());
    }

    println!("\nMessages:");
    for (message, count) in summary.tally.messages() {
        println!("  {}: {count}", message.label());
    }

    println!("\nCompleted in {:.2}s", summary.elapsed_secs);
}

fn print_json_summary(
    config: &HarmonizeConfig,
    summary: &HarmonizationSummary,
) -> anyhow::Result<()> {
    let warnings: serde_json::Map<String, serde_json::Value> = summary
        .tally
        .warnings()
        .map(|(w, count)| (w.label().to_string(), count.into()))
        .collect();
    let messages: serde_json::Map<String, serde_json::Value> = summary
        .tally
        .messages()
        .map(|(m, count)| (m.label().to_string(), count.into()))
        .collect();

    let output = serde_json::json!({
        "reference": {
            "path": config.reference.display().to_string(),
            "chromosomes": summary.chromosomes,
            "entries": summary.reference_entries,
            "indexing": summary.indexing,
        },
        "input": config.input.display().to_string(),
        "output": config.output.display().to_string(),
        "log": config.log_path().display().to_string(),
        "mode": config.mode,
        "allele_policy": config.allele_policy(),
        "records": summary.records,
        "warnings": warnings,
        "messages": messages,
        "elapsed_secs": summary.elapsed_secs,
        "completed_at": chrono::Utc::now().to_rfc3339(),
    });

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn print_tsv_summary(summary: &HarmonizationSummary) {
    println!("category\tlabel\tcount");
    let records = &summary.records;
    for (label, count) in [
        ("read", records.read),
        ("written", records.written),
        ("dropped", records.dropped),
        ("rewritten", records.rewritten),
    ] {
        println!("records\t{label}\t{count}");
    }
    for (warning, count) in summary.tally.warnings() {
        println!("warning\t{}\t{count}", warning.label());
    }
    for (message, count) in summary.tally.messages() {
        println!("message\t{}\t{count}", message.label());
    }
}
