// SPDX-License-Identifier: Apache-2.0

use crate::grammar::{parse_rule, Rule};
use crate::locate::{locate, RawFragment};
use crate::project::project;
use crate::vinst_error::Result;
use serde::{Deserialize, Serialize};

/// Marker that introduces an instantiation example in vendor sources.
pub const DEFAULT_SENTINEL: &str = "// instance of ";

/// Module instantiation extracted from a statement.
///
/// `port_names` holds the *connected* signal of each port binding, in source
/// order; the declared port names are not kept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstanceRecord {
    pub module_name: String,
    /// `None` when the statement has no `#(...)` list.
    pub parameters: Option<Vec<String>>,
    pub port_names: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractOptions {
    pub sentinel: String,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        ExtractOptions {
            sentinel: DEFAULT_SENTINEL.to_string(),
        }
    }
}

/// Parses `fragment` as a single instantiation statement.
pub fn extract(fragment: &RawFragment) -> Result<InstanceRecord> {
    let text = fragment.text();
    let tree = parse_rule(Rule::Instance, text)
        .map_err(|e| e.with_first_lineno(fragment.source_lineno()))?;
    let record = project(&tree, text)?;
    log::debug!(
        "extract: module {} with {} port(s)",
        record.module_name,
        record.port_names.len()
    );
    Ok(record)
}

/// Locates the statement following `options.sentinel` in `text` and extracts
/// it.
pub fn extract_instance(text: &str, options: &ExtractOptions) -> Result<InstanceRecord> {
    let fragment = locate(text, &options.sentinel)?;
    extract(&fragment)
}
