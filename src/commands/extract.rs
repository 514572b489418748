//! The `extract` command: headers directory in, metadata document out.
//!
//! Units are analyzed independently. A unit that cannot be read is recorded
//! as a failure and skipped; the rest of the batch always completes. Records
//! come back in walker order and are then ordered by the configured key.

use crate::analyzers::{analyze_file, AnalyzedUnit, HeaderAnalyzer};
use crate::config::{load_config, load_config_from, ObjcmetaConfig, SortKey};
use crate::core::TypeRecord;
use crate::errors::ExtractError;
use crate::io::{write_document, FileWalker, MetadataDocument, OutputFormat};
use crate::observability::{enter_header, enter_stage, header_finished, start_batch, Stage};
use anyhow::{Context, Result};
use colored::*;
use indicatif::{ParallelProgressIterator, ProgressBar, ProgressIterator, ProgressStyle};
use rayon::prelude::*;
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use tracing::{debug, info, info_span, warn};

/// Fallback document name when the directory has no usable final component.
const FALLBACK_NAME: &str = "headers";

/// Arguments of the `extract` command after CLI parsing.
#[derive(Debug, Clone)]
pub struct ExtractConfig {
    pub headers_dir: PathBuf,
    pub name: Option<String>,
    pub output: Option<PathBuf>,
    /// Overrides `[output] format`
    pub format: Option<OutputFormat>,
    /// Overrides `[output] sort`
    pub sort: Option<SortKey>,
    /// Explicit config file; otherwise `.objcmeta.toml` is discovered
    pub config_path: Option<PathBuf>,
    pub parallel: bool,
    pub quiet: bool,
}

#[derive(Debug, Clone, Copy)]
pub struct BatchOptions {
    pub parallel: bool,
    pub show_progress: bool,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            parallel: true,
            show_progress: false,
        }
    }
}

/// Result of one batch: every record produced plus every unit skipped.
#[derive(Debug, Default)]
pub struct BatchOutcome {
    pub records: Vec<TypeRecord>,
    pub failures: Vec<ExtractError>,
    /// Prototypes dropped because they did not parse
    pub rejected_prototypes: usize,
}

impl BatchOutcome {
    pub fn method_count(&self) -> usize {
        self.records.iter().map(TypeRecord::method_count).sum()
    }
}

fn progress_bar(len: usize, show: bool) -> ProgressBar {
    if !show {
        return ProgressBar::hidden();
    }
    let bar = ProgressBar::new(len as u64);
    bar.set_style(
        ProgressStyle::default_bar()
            .template("{msg} [{bar:40}] {pos}/{len}")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );
    bar.set_message("Extracting headers");
    bar
}

fn process_unit(path: &Path, analyzer: &HeaderAnalyzer) -> Result<AnalyzedUnit, ExtractError> {
    let _header = enter_header(path);
    let result = analyze_file(path, analyzer);
    header_finished();
    result
}

/// Analyze `files` in order. Output order equals input order in both modes.
pub fn run_batch(files: &[PathBuf], analyzer: &HeaderAnalyzer, options: BatchOptions) -> BatchOutcome {
    start_batch(files.len());
    let bar = progress_bar(files.len(), options.show_progress);

    let results: Vec<Result<AnalyzedUnit, ExtractError>> = if options.parallel {
        files
            .par_iter()
            .progress_with(bar.clone())
            .map(|path| process_unit(path, analyzer))
            .collect()
    } else {
        files
            .iter()
            .progress_with(bar.clone())
            .map(|path| process_unit(path, analyzer))
            .collect()
    };
    bar.finish_and_clear();

    let mut outcome = BatchOutcome::default();
    for result in results {
        match result {
            Ok(unit) => {
                for rejected in &unit.analysis.rejected {
                    debug!(path = %unit.path.display(), error = %rejected, "Rejected prototype");
                }
                outcome.rejected_prototypes += unit.analysis.rejected.len();
                if let Some(record) = unit.analysis.record {
                    outcome.records.push(record);
                } else {
                    debug!(path = %unit.path.display(), "No methods declared");
                }
            }
            Err(err) => {
                warn!(code = %err.code(), "Skipping unit: {}", err);
                outcome.failures.push(err);
            }
        }
    }
    outcome
}

/// Reorder records. `Path` keeps walker order; `Name` is a stable sort.
pub fn sort_records(records: &mut [TypeRecord], key: SortKey) {
    match key {
        SortKey::Path => {}
        SortKey::Name => records.sort_by(|a, b| a.name.cmp(&b.name)),
    }
}

/// Walk `dir`, analyze every unit and order the records.
pub fn extract_directory(
    dir: &Path,
    config: &ObjcmetaConfig,
    options: BatchOptions,
) -> Result<BatchOutcome, ExtractError> {
    let _span = info_span!("extract_directory", dir = %dir.display()).entered();

    let files = {
        let _stage = enter_stage(Stage::Discover);
        FileWalker::new(dir.to_path_buf())
            .with_extensions(config.scan.extensions.clone())
            .with_ignore_patterns(config.scan.ignore.clone())?
            .walk()?
    };
    info!(units = files.len(), "Discovered header units");

    let analyzer = HeaderAnalyzer::new(config.encoding_tables()?);
    let mut outcome = run_batch(&files, &analyzer, options);
    sort_records(&mut outcome.records, config.output.sort);
    Ok(outcome)
}

/// Document name: the explicit one, else the directory's final component.
pub fn resolve_name(headers_dir: &Path, explicit: Option<&str>) -> String {
    if let Some(name) = explicit.map(str::trim).filter(|n| !n.is_empty()) {
        return name.to_string();
    }
    let absolute = headers_dir
        .canonicalize()
        .unwrap_or_else(|_| headers_dir.to_path_buf());
    absolute
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| FALLBACK_NAME.to_string())
}

/// `<name>.extracted` or `<name>.json` in the working directory.
pub fn default_output_path(name: &str, format: OutputFormat) -> PathBuf {
    PathBuf::from(format!("{}.{}", name, format.extension()))
}

fn load_effective_config(extract: &ExtractConfig) -> Result<ObjcmetaConfig> {
    let mut config = match &extract.config_path {
        Some(path) => load_config_from(path)?,
        None => {
            let cwd = std::env::current_dir().context("Failed to get current directory")?;
            load_config(&cwd)
        }
    };
    if let Some(format) = extract.format {
        config.output.format = format;
    }
    if let Some(sort) = extract.sort {
        config.output.sort = sort;
    }
    Ok(config)
}

fn write_output(path: &Path, format: OutputFormat, document: &MetadataDocument) -> Result<()> {
    let _stage = enter_stage(Stage::Write);
    let file = File::create(path).map_err(|e| ExtractError::output(path, e))?;
    write_document(format, BufWriter::new(file), document)
        .with_context(|| format!("Failed to write {}", path.display()))
}

pub fn handle_extract(extract: ExtractConfig) -> Result<()> {
    let config = load_effective_config(&extract)?;
    let options = BatchOptions {
        parallel: extract.parallel,
        show_progress: !extract.quiet,
    };

    let outcome = extract_directory(&extract.headers_dir, &config, options)
        .with_context(|| format!("Failed to extract {}", extract.headers_dir.display()))?;

    let name = resolve_name(&extract.headers_dir, extract.name.as_deref());
    let output_path = extract
        .output
        .clone()
        .unwrap_or_else(|| default_output_path(&name, config.output.format));

    let class_count = outcome.records.len();
    let method_count = outcome.method_count();
    let document = MetadataDocument::new(outcome.records).with_version(config.output.version.clone());
    write_output(&output_path, config.output.format, &document)?;

    if !outcome.failures.is_empty() {
        eprintln!(
            "{} skipped {} unreadable header(s)",
            "warning:".yellow().bold(),
            outcome.failures.len()
        );
        for failure in &outcome.failures {
            eprintln!("  {} {}", format!("[{}]", failure.code()).dimmed(), failure);
        }
    }

    if !extract.quiet {
        println!(
            "{} {} ({} classes, {} methods)",
            "Successfully created".green().bold(),
            output_path.display(),
            class_count,
            method_count
        );
    }

    Ok(())
}
