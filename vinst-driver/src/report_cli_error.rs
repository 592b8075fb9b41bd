// SPDX-License-Identifier: Apache-2.0

use colored::Colorize;

/// Fatal driver error plus key/value context printed underneath it.
#[derive(Debug)]
pub struct CliError {
    pub message: String,
    pub details: Vec<(&'static str, String)>,
}

impl CliError {
    pub fn new(message: impl Into<String>) -> Self {
        CliError {
            message: message.into(),
            details: Vec::new(),
        }
    }

    pub fn with_detail(mut self, key: &'static str, value: impl Into<String>) -> Self {
        self.details.push((key, value.into()));
        self
    }
}

pub fn report_cli_error_and_exit(subcommand: Option<&str>, error: &CliError) -> ! {
    let subcommand_str = match subcommand {
        Some(subcommand) => format!("{}: ", subcommand),
        None => String::new(),
    };
    eprintln!(
        "vinst-driver: {}{}",
        subcommand_str,
        error.message.red().bold()
    );
    for (key, value) in &error.details {
        eprintln!("  {}: {}", key, value);
    }
    std::process::exit(1);
}
