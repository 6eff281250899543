use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use clap::Parser;
use data_sweeper::format::ExportFormat;
use data_sweeper::observability::{CompositeObserver, FileObserver, PipelineObserver, TracingObserver};
use data_sweeper::processing::{
    CleaningSpec, MissingValueStrategy, cleaning_specs_from_json, describe, numeric_columns,
};
use data_sweeper::session::{SessionOptions, sweep_file};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Clean CSV/Excel files and export them as CSV or XLSX.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Input files or glob patterns (`data/*.csv`).
    #[arg(required = true)]
    inputs: Vec<String>,

    /// Remove rows that exactly repeat an earlier row.
    #[arg(long)]
    remove_duplicates: bool,

    /// Missing value strategy: keep, drop_rows, fill_zero_or_placeholder, forward_fill,
    /// backward_fill, fill_mean.
    #[arg(long, default_value = "keep")]
    missing: String,

    /// JSON file mapping file names to cleaning specs; overrides the flags for listed files.
    #[arg(long)]
    spec: Option<PathBuf>,

    /// Comma-separated columns to keep (default: all).
    #[arg(long, value_delimiter = ',')]
    columns: Vec<String>,

    /// Output format: csv or xlsx.
    #[arg(long, default_value = "csv")]
    format: String,

    /// Extra CSV values to treat as missing.
    #[arg(long = "na-value")]
    na_values: Vec<String>,

    /// Directory for exported files.
    #[arg(long, default_value = ".")]
    out_dir: PathBuf,

    /// Print summary statistics of numeric columns after cleaning.
    #[arg(long)]
    describe: bool,

    /// Also append stage events to this file.
    #[arg(long)]
    event_log: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    let strategy: MissingValueStrategy = cli.missing.parse()?;
    let format: ExportFormat = cli.format.parse()?;
    let default_spec = CleaningSpec {
        remove_duplicates: cli.remove_duplicates,
        missing_value_strategy: strategy,
    };
    let specs = match &cli.spec {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read spec file {}", path.display()))?;
            cleaning_specs_from_json(&json)?
        }
        None => BTreeMap::new(),
    };

    let observer: Arc<dyn PipelineObserver> = match &cli.event_log {
        Some(path) => Arc::new(CompositeObserver::new(vec![
            Arc::new(TracingObserver),
            Arc::new(FileObserver::new(path)),
        ])),
        None => Arc::new(TracingObserver),
    };
    let mut options = SessionOptions {
        observer: Some(observer),
        ..SessionOptions::default()
    };
    options.load.na_values = cli.na_values.clone();

    let inputs = expand_inputs(&cli.inputs)?;
    for name in unmatched_spec_keys(&specs, &inputs) {
        warn!(file = %name, "cleaning spec matches no input file");
    }
    std::fs::create_dir_all(&cli.out_dir)
        .with_context(|| format!("failed to create {}", cli.out_dir.display()))?;

    let mut failed = 0usize;
    for path in &inputs {
        if let Err(err) = process(path, &cli, &specs, default_spec, format, &options) {
            warn!(path = %path.display(), "skipping file: {err:#}");
            failed += 1;
        }
    }

    if failed == inputs.len() {
        bail!("no input could be processed");
    }
    info!(processed = inputs.len() - failed, failed, "done");
    Ok(())
}

fn process(
    path: &Path,
    cli: &Cli,
    specs: &BTreeMap<String, CleaningSpec>,
    default_spec: CleaningSpec,
    format: ExportFormat,
    options: &SessionOptions,
) -> Result<()> {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .with_context(|| format!("not a file: {}", path.display()))?;
    let bytes = std::fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    let spec = specs.get(&name).copied().unwrap_or(default_spec);

    let out = sweep_file(&name, &bytes, &spec, cli.columns.as_slice(), format, options)?;

    let (rows_in, cols_in) = out.loaded.shape();
    info!(
        file = %name,
        rows_in,
        cols_in,
        rows_out = out.summary.rows_after,
        duplicates_removed = out.summary.duplicates_removed,
        missing_rows_dropped = out.summary.missing_rows_dropped,
        cells_filled = out.summary.total_cells_filled(),
        "cleaned"
    );

    if cli.describe {
        info!(file = %name, columns = ?numeric_columns(&out.cleaned), "numeric columns");
        for s in describe(&out.cleaned) {
            info!(
                file = %name,
                column = %s.column,
                count = s.count,
                mean = ?s.mean,
                std = ?s.std,
                min = ?s.min,
                median = ?s.median,
                max = ?s.max,
                "describe"
            );
        }
    }

    let target = cli.out_dir.join(&out.artifact.file_name);
    std::fs::write(&target, &out.artifact.bytes)
        .with_context(|| format!("failed to write {}", target.display()))?;
    info!(file = %name, output = %target.display(), mime = out.artifact.mime_type, "exported");
    Ok(())
}

/// Keys of `specs` that name none of the `inputs` (by file name).
fn unmatched_spec_keys<'a>(specs: &'a BTreeMap<String, CleaningSpec>, inputs: &[PathBuf]) -> Vec<&'a str> {
    specs
        .keys()
        .filter(|key| {
            !inputs
                .iter()
                .any(|p| p.file_name().is_some_and(|n| n.to_string_lossy() == key.as_str()))
        })
        .map(String::as_str)
        .collect()
}

/// Expand glob patterns; plain paths are kept as-is so missing files surface as read errors.
fn expand_inputs(inputs: &[String]) -> Result<Vec<PathBuf>> {
    let mut out = Vec::new();
    for input in inputs {
        if input.contains(['*', '?', '[']) {
            let matches = glob::glob(input).with_context(|| format!("invalid glob pattern '{input}'"))?;
            for entry in matches {
                out.push(entry?);
            }
        } else {
            out.push(PathBuf::from(input));
        }
    }
    if out.is_empty() {
        bail!("no input files matched");
    }
    Ok(out)
}
