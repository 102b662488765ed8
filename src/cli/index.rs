use std::path::PathBuf;
use std::time::Instant;

use clap::Args;

use crate::cli::OutputFormat;
use crate::harmonize::config::LookupMode;
use crate::index::builder::{IndexingStats, ReferenceIndexer};
use crate::index::chromosome::IndexConfig;
use crate::index::store::ReferenceIndex;

#[derive(Args)]
pub struct IndexArgs {
    /// Reference VCF (plain or gzip)
    #[arg(required = true)]
    pub reference: PathBuf,

    /// Index the way this harmonization mode would
    #[arg(short, long, value_enum, default_value = "position")]
    pub mode: LookupMode,

    /// Initial per-chromosome capacity, in entries
    #[arg(long)]
    pub initial_capacity: Option<usize>,

    /// Per-chromosome growth step, in entries
    #[arg(long)]
    pub capacity_increment: Option<usize>,
}

pub fn run(args: IndexArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let mut config = IndexConfig::default();
    if let Some(capacity) = args.initial_capacity {
        config.initial_capacity = capacity;
    }
    if let Some(increment) = args.capacity_increment {
        config.capacity_increment = increment;
    }
    if config.initial_capacity == 0 || config.capacity_increment == 0 {
        anyhow::bail!("Index capacities must be greater than zero");
    }

    let start = Instant::now();
    let (index, stats) = ReferenceIndexer::new(args.mode.classification_policy())
        .with_config(config)
        .index(&args.reference)?;

    if verbose {
        eprintln!(
            "Indexed {} in {:.2}s",
            args.reference.display(),
            start.elapsed().as_secs_f64()
        );
    }

    match format {
        OutputFormat::Text => print_text_index(&args, &index, &stats),
        OutputFormat::Json => print_json_index(&args, &index, &stats)?,
        OutputFormat::Tsv => print_tsv_index(&index),
    }

    Ok(())
}

fn print_text_index(args: &IndexArgs, index: &ReferenceIndex, stats: &IndexingStats) {
    println!("Reference Index");
    println!("{}", "=".repeat(60));

    println!("\nReference: {}", args.reference.display());
    println!("  Mode: {:?}", args.mode);
    println!("  Data lines: {}", stats.lines);
    println!("  Indexed: {}", stats.indexed);
    println!("  Filtered: {}", stats.filtered);
    println!("  Invalid alleles: {}", stats.invalid_alleles);
    println!("  Ambiguous: {}", stats.ambiguous);
    if index.distinct_alleles() > 0 {
        println!("  Distinct alleles: {}", index.distinct_alleles());
    }

    println!("\n{:<20} {:>12} {:>12}", "Chromosome", "SNPs", "INDELs");
    println!("{}", "-".repeat(46));
    for chromosome in index.stats() {
        println!(
            "{:<20} {:>12} {:>12}",
            chromosome.chromosome, chromosome.snps, chromosome.indels
        );
    }
}

fn print_json_index(
    args: &IndexArgs,
    index: &ReferenceIndex,
    stats: &IndexingStats,
) -> anyhow::Result<()> {
    let output = serde_json::json!({
        "reference": args.reference.display().to_string(),
        "mode": args.mode,
        "stats": stats,
        "distinct_alleles": index.distinct_alleles(),
        "chromosomes": index.stats(),
        "created_at": chrono::Utc::now().to_rfc3339(),
    });

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn print_tsv_index(index: &ReferenceIndex) {
    println!("chromosome\tsnps\tindels");
    for chromosome in index.stats() {
        println!(
            "{}\t{}\t{}",
            chromosome.chromosome, chromosome.snps, chromosome.indels
        );
    }
}
