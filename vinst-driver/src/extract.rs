// SPDX-License-Identifier: Apache-2.0

//! Implements the `locate` and `extract` driver subcommands for a single
//! source file.

use crate::extract_config::{get_extract_options, ExtractConfig};
use crate::report_cli_error::{report_cli_error_and_exit, CliError};
use clap::ArgMatches;
use std::path::Path;
use vinst::io::{extract_instance_from_path, read_source_text};

fn get_input(matches: &ArgMatches) -> Result<&str, CliError> {
    matches
        .get_one::<String>("input")
        .map(|s| s.as_str())
        .ok_or_else(|| CliError::new("input argument is required"))
}

fn do_locate(matches: &ArgMatches, config: &Option<ExtractConfig>) -> Result<(), CliError> {
    let input = get_input(matches)?;
    let options = get_extract_options(matches, config);
    let text =
        read_source_text(Path::new(input)).map_err(|e| CliError::new(format!("{:#}", e)))?;
    let fragment = vinst::locate(&text, &options.sentinel).map_err(|e| {
        CliError::new(e.to_string())
            .with_detail("input", input)
            .with_detail("sentinel", format!("{:?}", options.sentinel))
    })?;
    println!("{}", fragment);
    Ok(())
}

fn do_extract(matches: &ArgMatches, config: &Option<ExtractConfig>) -> Result<(), CliError> {
    let input = get_input(matches)?;
    let options = get_extract_options(matches, config);
    let record = extract_instance_from_path(Path::new(input), &options).map_err(|e| {
        CliError::new(format!("{:#}", e)).with_detail("sentinel", format!("{:?}", options.sentinel))
    })?;
    let json = serde_json::to_string_pretty(&record)
        .map_err(|e| CliError::new(format!("failed to serialize record: {e}")))?;
    println!("{}", json);
    Ok(())
}

pub fn handle_locate(matches: &ArgMatches, config: &Option<ExtractConfig>) {
    if let Err(e) = do_locate(matches, config) {
        report_cli_error_and_exit(Some("locate"), &e);
    }
}

pub fn handle_extract(matches: &ArgMatches, config: &Option<ExtractConfig>) {
    if let Err(e) = do_extract(matches, config) {
        report_cli_error_and_exit(Some("extract"), &e);
    }
}
