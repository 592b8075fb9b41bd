// SPDX-License-Identifier: Apache-2.0

//! Command line driver for extracting module instantiation records from
//! Verilog instantiation examples.
//!
//! Commands are given like:
//!
//! ```text
//! vinst-driver <global-options> <command> <command-args-and-options>
//! ```
//!
//! Commands are:
//!
//! - locate: Prints the statement that follows the sentinel comment.
//! - extract: Prints the instance record of one file as JSON.
//! - batch: Extracts from every Verilog source in a directory into one JSON
//!   report.
//!
//! Sample usage:
//!
//! ```shell
//! $ cargo run -- extract DW01_add.v
//! $ cargo run -- --config=$HOME/vinst.toml \
//!     batch --input_dir instantiation_demo --output instances.json --jobs 8
//! ```

mod batch;
mod extract;
mod extract_config;
mod report_cli_error;

use crate::extract_config::ExtractConfig;
use clap::{Arg, ArgAction};
use report_cli_error::{report_cli_error_and_exit, CliError};
use serde::Deserialize;

const DEFAULT_CONFIG_FILENAME: &str = "vinst.toml";

#[derive(Deserialize)]
struct VinstConfigFile {
    #[serde(default)]
    extract: ExtractConfig,
}

trait AppExt {
    fn add_input_arg(self) -> Self;
    fn add_sentinel_arg(self) -> Self;
}

impl AppExt for clap::Command {
    fn add_input_arg(self) -> Self {
        (self as clap::Command).arg(
            Arg::new("input")
                .value_name("INPUT")
                .help("Verilog source holding the instantiation example (may be .gz)")
                .required(true)
                .index(1),
        )
    }

    fn add_sentinel_arg(self) -> Self {
        (self as clap::Command).arg(
            Arg::new("sentinel")
                .long("sentinel")
                .value_name("SENTINEL")
                .help("Comment marker that precedes the instantiation example")
                .action(ArgAction::Set),
        )
    }
}

/// Reads the config named by `--config`, else `./vinst.toml` if present.
fn load_config(matches: &clap::ArgMatches) -> Result<Option<ExtractConfig>, CliError> {
    let mut toml_path: Option<std::path::PathBuf> = matches
        .get_one::<String>("config")
        .map(std::path::PathBuf::from);

    if toml_path.is_none() {
        let cwd_toml_path = std::path::Path::new(DEFAULT_CONFIG_FILENAME);
        if cwd_toml_path.exists() {
            log::info!(
                "Using {} in current directory",
                DEFAULT_CONFIG_FILENAME
            );
            toml_path = Some(cwd_toml_path.to_path_buf());
        }
    }

    let path = match toml_path {
        Some(path) => path,
        None => return Ok(None),
    };
    let toml_str = std::fs::read_to_string(&path).map_err(|e| {
        CliError::new(format!("failed to read config file: {e}"))
            .with_detail("path", path.display().to_string())
    })?;
    let config: VinstConfigFile = toml::from_str(&toml_str).map_err(|e| {
        CliError::new(format!("failed to parse config file: {e}"))
            .with_detail("path", path.display().to_string())
    })?;
    Ok(Some(config.extract))
}

fn main() {
    let _ = env_logger::try_init();

    log::info!(
        "vinst-driver starting; version: {}",
        env!("CARGO_PKG_VERSION")
    );

    let matches = clap::Command::new("vinst-driver")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Extracts module instantiation records from Verilog instantiation examples")
        .arg(
            Arg::new("config")
                .long("config")
                .value_name("CONFIG")
                .help("Path to a vinst.toml file")
                .action(ArgAction::Set),
        )
        .subcommand(clap::Command::new("version").about("Prints the version of the driver"))
        .subcommand(
            clap::Command::new("locate")
                .about("Prints the statement that follows the sentinel comment")
                .add_input_arg()
                .add_sentinel_arg(),
        )
        .subcommand(
            clap::Command::new("extract")
                .about("Prints the instance record of a Verilog source as JSON")
                .add_input_arg()
                .add_sentinel_arg(),
        )
        .subcommand(
            clap::Command::new("batch")
                .about("Extracts instance records from every Verilog source in a directory")
                .arg(
                    Arg::new("input_dir")
                        .long("input_dir")
                        .value_name("INPUT_DIR")
                        .help("Directory of .v/.sv sources (optionally .gz)")
                        .required(true)
                        .action(ArgAction::Set),
                )
                .arg(
                    Arg::new("output")
                        .long("output")
                        .value_name("OUTPUT")
                        .help("Path of the JSON report to write")
                        .required(true)
                        .action(ArgAction::Set),
                )
                .arg(
                    Arg::new("jobs")
                        .long("jobs")
                        .value_name("JOBS")
                        .help("Number of worker threads")
                        .value_parser(clap::value_parser!(usize))
                        .action(ArgAction::Set),
                )
                .add_sentinel_arg(),
        )
        .get_matches();

    let config = match load_config(&matches) {
        Ok(config) => config,
        Err(e) => report_cli_error_and_exit(None, &e),
    };

    if let Some(matches) = matches.subcommand_matches("locate") {
        extract::handle_locate(matches, &config);
    } else if let Some(matches) = matches.subcommand_matches("extract") {
        extract::handle_extract(matches, &config);
    } else if let Some(matches) = matches.subcommand_matches("batch") {
        batch::handle_batch(matches, &config);
    } else if let Some(_matches) = matches.subcommand_matches("version") {
        println!("{}", env!("CARGO_PKG_VERSION"));
    } else {
        report_cli_error_and_exit(None, &CliError::new("No valid subcommand provided."));
    }
}
