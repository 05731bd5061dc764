use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use clap::Parser;
use log::info;
use serde::Serialize;

use gstree::{
    annotate_leaf_counts, match_many, read_lines, read_sequences, Alphabet, GeneralizedText,
    ScanConfig, UkkonenBuilder, LEAF_COUNT_ATTRIBUTE,
};

/// Generalized suffix tree pattern scanner
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// FASTA/FASTQ/line-delimited sequence file to index (.gz supported)
    input: String,

    /// Pattern to search for (repeatable)
    #[arg(long = "pattern", short = 'p')]
    patterns: Vec<String>,

    /// File with one pattern per line
    #[arg(long)]
    patterns_file: Option<String>,

    /// Explicit alphabet; enables input validation against it
    #[arg(long)]
    alphabet: Option<String>,

    /// Output JSON report path
    #[arg(long)]
    json: Option<String>,

    /// Compute and report per-subtree leaf counts
    #[arg(long)]
    stats: bool,

    /// Enable threaded pattern scanning (default: off)
    #[arg(long, default_value_t = false)]
    threads: bool,

    /// Number of worker threads for pattern scanning (default: max available - 1)
    #[arg(long, default_value_t = num_cpus::get().saturating_sub(1).max(1))]
    max_workers: usize,

    /// Verbose/info output (default: quiet)
    #[arg(long, short = 'v', alias = "info")]
    verbose: bool,

    /// Debug output
    #[arg(long)]
    debug: bool,

    /// Trace output
    #[arg(long)]
    trace: bool,
}

#[derive(Debug, Serialize)]
struct Hit {
    sequence: usize,
    name: String,
    offset: usize,
    position: usize,
}

#[derive(Debug, Serialize)]
struct PatternReport {
    pattern: String,
    occurrences: Vec<Hit>,
}

fn main() {
    let args = Args::parse();
    let log_level = if args.trace {
        "trace"
    } else if args.debug {
        "debug"
    } else if args.verbose {
        "info"
    } else {
        "error"
    };
    std::env::set_var("RUST_LOG", log_level);
    env_logger::init();

    if let Err(error) = run(&args) {
        eprintln!("Pattern scan failed: {error:?}");
        std::process::exit(1);
    }
}

fn run(args: &Args) -> Result<()> {
    let records = read_sequences(Path::new(&args.input))
        .with_context(|| format!("Failed to parse sequences from {}", args.input))?;
    if records.is_empty() {
        bail!("No sequences found in {}", args.input);
    }
    info!("Loaded {} sequences from {}", records.len(), args.input);

    let names: Vec<String> = records.iter().map(|r| r.name.clone()).collect();
    let sequences: Vec<String> = records.into_iter().map(|r| r.sequence).collect();

    let alphabet = args.alphabet.as_deref().map(Alphabet::from_text);
    let text = GeneralizedText::build(&sequences, alphabet.as_ref())
        .context("Input validation failed")?;
    info!(
        "Generalized text: {} symbols over {} sequences",
        text.len(),
        text.sequence_count()
    );

    let mut tree = UkkonenBuilder::build(text);
    info!("Suffix tree built: {} nodes", tree.node_count());

    if args.stats {
        annotate_leaf_counts(&mut tree);
        let counts = tree
            .int_attribute(LEAF_COUNT_ATTRIBUTE)
            .expect("leaf counts were just attached");
        info!("Leaves under the root: {}", counts[0]);
    }

    let mut patterns = args.patterns.clone();
    if let Some(path) = &args.patterns_file {
        let listed = read_lines(Path::new(path))
            .with_context(|| format!("Failed to read patterns from {}", path))?;
        patterns.extend(listed);
    }
    if patterns.is_empty() {
        bail!("No patterns provided; use --pattern or --patterns-file");
    }
    // Sequences are ingested uppercased, so queries are matched uppercased too.
    let patterns: Vec<String> = patterns
        .into_iter()
        .map(|p| p.to_ascii_uppercase())
        .collect();

    let config = ScanConfig {
        use_threads: args.threads,
        max_workers: args.max_workers,
    };
    let results = match_many(&tree, &patterns, config);

    let mut reports = Vec::with_capacity(patterns.len());
    for (pattern, positions) in patterns.iter().zip(results) {
        let occurrences: Vec<Hit> = positions
            .into_iter()
            .map(|position| {
                let at = tree.locate(position);
                Hit {
                    sequence: at.sequence,
                    name: names[at.sequence].clone(),
                    offset: at.offset,
                    position,
                }
            })
            .collect();

        println!("{}\t{} occurrence(s)", pattern, occurrences.len());
        for hit in &occurrences {
            println!(
                "  {} (sequence {}, offset {})",
                hit.name, hit.sequence, hit.offset
            );
        }
        reports.push(PatternReport {
            pattern: pattern.clone(),
            occurrences,
        });
    }

    if let Some(path) = &args.json {
        if let Some(parent) = Path::new(path).parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let file = fs::File::create(path)
            .with_context(|| format!("Failed to create JSON report at {}", path))?;
        serde_json::to_writer_pretty(file, &reports)?;
        info!("Wrote JSON report to {}", path);
    }

    Ok(())
}
