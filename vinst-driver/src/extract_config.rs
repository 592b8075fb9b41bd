// SPDX-License-Identifier: Apache-2.0

use clap::ArgMatches;
use serde::Deserialize;
use vinst::{ExtractOptions, DEFAULT_SENTINEL};

#[derive(Debug, Default, Deserialize)]
pub struct ExtractConfig {
    /// Comment marker that introduces the instantiation example, matched
    /// ignoring ASCII case.
    pub sentinel: Option<String>,

    /// Worker threads for `batch`; defaults to one per core.
    pub jobs: Option<usize>,
}

/// Helper for picking the sentinel from the command line flag, if specified,
/// else from the config file, else the built-in default.
pub fn get_sentinel(matches: &ArgMatches, config: &Option<ExtractConfig>) -> String {
    if let Some(sentinel) = matches.get_one::<String>("sentinel") {
        sentinel.to_string()
    } else if let Some(sentinel) = config.as_ref().and_then(|c| c.sentinel.clone()) {
        sentinel
    } else {
        DEFAULT_SENTINEL.to_string()
    }
}

pub fn get_extract_options(matches: &ArgMatches, config: &Option<ExtractConfig>) -> ExtractOptions {
    ExtractOptions {
        sentinel: get_sentinel(matches, config),
    }
}

/// Only valid for subcommands that define `--jobs`.
pub fn get_jobs(matches: &ArgMatches, config: &Option<ExtractConfig>) -> Option<usize> {
    matches
        .get_one::<usize>("jobs")
        .copied()
        .or_else(|| config.as_ref().and_then(|c| c.jobs))
}
