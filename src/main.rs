use anyhow::{anyhow, Context, Result};
use cdr_decoder_fast::config::{default_workers, DecodeConfig, FlagPolicy, Format, DEFAULT_MAX_DEPTH};
use cdr_decoder_fast::input::{expand_inputs, load_input, parse_extensions};
use cdr_decoder_fast::logging::init_tracing;
use cdr_decoder_fast::{decode_buffer, DecodeStats, Scheduler};
use clap::Parser;
use serde::Serialize;
use std::collections::HashSet;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{error, info, warn};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Telecom CDR decoder (Voz BER records, VoLTE Diameter accounting) -> JSONL",
    long_about = None
)]
struct Cli {
    #[arg(long = "format", value_enum)]
    format: Format,

    /// Decode workers per file. Defaults to the available parallelism.
    #[arg(long = "workers")]
    workers: Option<usize>,

    #[arg(long = "max-depth", default_value_t = DEFAULT_MAX_DEPTH)]
    max_depth: usize,

    /// Handling of AVPs whose flags miss the expected V/M/P bits.
    #[arg(long = "flag-policy", value_enum, default_value_t = FlagPolicy::SkipAvp)]
    flag_policy: FlagPolicy,

    #[arg(long = "output-dir")]
    output_dir: PathBuf,

    /// Comma separated extensions to pick up from directories, e.g. `gz,dat`.
    #[arg(long = "ext")]
    ext: Option<String>,

    /// Write a JSON run summary to this path.
    #[arg(long = "summary")]
    summary: Option<PathBuf>,

    #[arg(long = "log-level", default_value = "info")]
    log_level: String,

    #[arg(required = true)]
    inputs: Vec<PathBuf>,
}

#[derive(Debug, Serialize)]
struct FailureSummary {
    offset: usize,
    error: String,
}

#[derive(Debug, Serialize)]
struct FileSummary {
    input: PathBuf,
    output: Option<PathBuf>,
    stats: DecodeStats,
    failures: Vec<FailureSummary>,
    error: Option<String>,
}

#[derive(Debug, Serialize)]
struct RunSummary {
    format: Format,
    workers: usize,
    flag_policy: FlagPolicy,
    totals: DecodeStats,
    elapsed_secs: f64,
    files: Vec<FileSummary>,
}

fn process_file(in_path: &Path, out_dir: &Path, config: &DecodeConfig, scheduler: &Scheduler) -> Result<FileSummary> {
    let data = load_input(in_path)?;

    let file_name = in_path
        .file_name()
        .ok_or_else(|| anyhow!("Input path has no filename: {:?}", in_path))?
        .to_string_lossy()
        .to_string();
    let out_path = out_dir.join(format!("{}.jsonl", file_name));

    let started = Instant::now();
    let report = decode_buffer(&data, config, scheduler);

    let out_file = File::create(&out_path).with_context(|| format!("Failed to create output file {:?}", out_path))?;
    let mut writer = BufWriter::with_capacity(8 * 1024 * 1024, out_file);
    for record in &report.records {
        record.write_jsonl(&mut writer)?;
    }
    writer.flush()?;

    if !report.failures.is_empty() {
        warn!(
            file = %in_path.display(),
            failed = report.failures.len(),
            first_offset = report.failures[0].offset,
            "blocks failed to decode"
        );
    }
    info!(
        file = %in_path.display(),
        bytes = data.len(),
        records = report.stats.decoded,
        skipped = report.stats.skipped,
        failed = report.stats.failed,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "decoded"
    );

    Ok(FileSummary {
        input: in_path.to_path_buf(),
        output: Some(out_path),
        stats: report.stats,
        failures: report
            .failures
            .iter()
            .map(|f| FailureSummary {
                offset: f.offset,
                error: f.error.to_string(),
            })
            .collect(),
        error: None,
    })
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli.log_level);
    let overall_start = Instant::now();

    let allowed_exts: Option<HashSet<String>> = cli.ext.as_deref().map(parse_extensions);

    let config = DecodeConfig::new(cli.format)
        .with_max_depth(cli.max_depth)
        .with_flag_policy(cli.flag_policy);
    let scheduler = Scheduler::new(cli.workers.unwrap_or_else(default_workers))
        .context("Failed to build decode worker pool")?;

    std::fs::create_dir_all(&cli.output_dir)
        .with_context(|| format!("Failed to create output directory {:?}", cli.output_dir))?;

    let input_files = expand_inputs(&cli.inputs, allowed_exts.as_ref())
        .with_context(|| "Failed to expand input files/directories")?;

    if input_files.is_empty() {
        warn!("No input files found.");
        return Ok(());
    }

    info!(files = input_files.len(), format = %config.format, workers = scheduler.workers(), "starting");

    let mut totals = DecodeStats::default();
    let mut files = Vec::with_capacity(input_files.len());
    for path in &input_files {
        match process_file(path, &cli.output_dir, &config, &scheduler) {
            Ok(summary) => {
                totals += summary.stats;
                files.push(summary);
            }
            Err(e) => {
                error!(file = %path.display(), "Decoding failed: {:#}", e);
                files.push(FileSummary {
                    input: path.clone(),
                    output: None,
                    stats: DecodeStats::default(),
                    failures: Vec::new(),
                    error: Some(format!("{:#}", e)),
                });
            }
        }
    }

    let elapsed = overall_start.elapsed().as_secs_f64();
    println!(
        "Total: {} attempted, {} decoded, {} skipped, {} failed",
        totals.attempted, totals.decoded, totals.skipped, totals.failed
    );
    println!("Total elapsed wall time: {:.3} s", elapsed);

    if let Some(summary_path) = &cli.summary {
        let summary = RunSummary {
            format: config.format,
            workers: scheduler.workers(),
            flag_policy: config.flag_policy,
            totals,
            elapsed_secs: elapsed,
            files,
        };
        let file = File::create(summary_path)
            .with_context(|| format!("Failed to create summary file {:?}", summary_path))?;
        serde_json::to_writer_pretty(BufWriter::new(file), &summary)
            .with_context(|| "Failed to write run summary")?;
    }

    Ok(())
}
