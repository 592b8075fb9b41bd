// SPDX-License-Identifier: Apache-2.0

//! Implements the `batch` driver subcommand: extract the instantiation
//! example from every Verilog source in a directory and write the results,
//! along with per-file failures, as one JSON document.

use crate::extract_config::{get_extract_options, get_jobs, ExtractConfig};
use crate::report_cli_error::{report_cli_error_and_exit, CliError};
use clap::ArgMatches;
use rayon::prelude::*;
use serde::Serialize;
use std::path::{Path, PathBuf};
use vinst::io::extract_instance_from_path;
use vinst::{ExtractOptions, InstanceRecord};

const SOURCE_SUFFIXES: &[&str] = &[".v", ".sv", ".v.gz", ".sv.gz"];

#[derive(Debug, Serialize)]
pub struct BatchEntry {
    pub path: String,
    pub instance: InstanceRecord,
}

#[derive(Debug, Serialize)]
pub struct BatchFailure {
    pub path: String,
    pub error: String,
}

#[derive(Debug, Serialize)]
pub struct BatchReport {
    pub sentinel: String,
    pub instances: Vec<BatchEntry>,
    pub failures: Vec<BatchFailure>,
}

fn is_source_path(path: &Path) -> bool {
    let name = match path.file_name().and_then(|n| n.to_str()) {
        Some(name) => name,
        None => return false,
    };
    SOURCE_SUFFIXES.iter().any(|suffix| name.ends_with(suffix))
}

/// Returns the Verilog sources directly inside `dir`, sorted by path.
fn collect_source_paths(dir: &Path) -> Result<Vec<PathBuf>, CliError> {
    let entries = std::fs::read_dir(dir).map_err(|e| {
        CliError::new(format!("failed to read input directory: {e}"))
            .with_detail("input_dir", dir.display().to_string())
    })?;
    let mut paths = Vec::new();
    for entry in entries {
        let path = entry
            .map_err(|e| CliError::new(format!("failed to list input directory: {e}")))?
            .path();
        if path.is_file() && is_source_path(&path) {
            paths.push(path);
        }
    }
    paths.sort();
    Ok(paths)
}

/// Extracts from each path; failures are logged and kept, never fatal.
fn run_batch(paths: &[PathBuf], options: &ExtractOptions) -> BatchReport {
    let outcomes: Vec<(&PathBuf, anyhow::Result<InstanceRecord>)> = paths
        .par_iter()
        .map(|path| (path, extract_instance_from_path(path, options)))
        .collect();
    let mut report = BatchReport {
        sentinel: options.sentinel.clone(),
        instances: Vec::new(),
        failures: Vec::new(),
    };
    for (path, outcome) in outcomes {
        let path = path.display().to_string();
        match outcome {
            Ok(instance) => report.instances.push(BatchEntry { path, instance }),
            Err(e) => {
                log::warn!("batch: skipping {}: {:#}", path, e);
                report.failures.push(BatchFailure {
                    path,
                    error: format!("{:#}", e),
                });
            }
        }
    }
    report
}

fn do_batch(matches: &ArgMatches, config: &Option<ExtractConfig>) -> Result<(), CliError> {
    let input_dir = matches
        .get_one::<String>("input_dir")
        .ok_or_else(|| CliError::new("--input_dir argument is required"))?;
    let output = matches
        .get_one::<String>("output")
        .ok_or_else(|| CliError::new("--output argument is required"))?;
    let options = get_extract_options(matches, config);

    let paths = collect_source_paths(Path::new(input_dir))?;
    log::info!("batch: {} source file(s) in {}", paths.len(), input_dir);

    let report = match get_jobs(matches, config) {
        Some(jobs) => rayon::ThreadPoolBuilder::new()
            .num_threads(jobs)
            .build()
            .map_err(|e| CliError::new(format!("failed to build thread pool: {e}")))?
            .install(|| run_batch(&paths, &options)),
        None => run_batch(&paths, &options),
    };
    log::info!(
        "batch: {} extracted, {} failed",
        report.instances.len(),
        report.failures.len()
    );

    let json = serde_json::to_string_pretty(&report)
        .map_err(|e| CliError::new(format!("failed to serialize report: {e}")))?;
    std::fs::write(output, json + "\n").map_err(|e| {
        CliError::new(format!("failed to write output: {e}")).with_detail("output", output.as_str())
    })?;
    Ok(())
}

pub fn handle_batch(matches: &ArgMatches, config: &Option<ExtractConfig>) {
    if let Err(e) = do_batch(matches, config) {
        report_cli_error_and_exit(Some("batch"), &e);
    }
}
