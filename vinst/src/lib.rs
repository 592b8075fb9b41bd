// SPDX-License-Identifier: Apache-2.0

//! Extracts module instantiation records from Verilog instantiation examples.
//!
//! An example is found by a sentinel comment (by default `// instance of `),
//! cut down to the single statement that follows it, parsed against a small
//! grammar and reduced to an [`InstanceRecord`]:
//!
//! ```
//! let text = "// instance of ...\nadder #(8, 1) u_adder (.a(sig_a), .b(sig_b), .sum(sig_sum));";
//! let record = vinst::extract_instance(text, &vinst::ExtractOptions::default()).unwrap();
//! assert_eq!(record.module_name, "adder");
//! assert_eq!(record.parameters, Some(vec!["8".to_string(), "1".to_string()]));
//! assert_eq!(record.port_names, vec!["sig_a", "sig_b", "sig_sum"]);
//! ```
//!
//! Parameters and connected signals are bare identifiers; expressions,
//! bit-selects and concatenations are not accepted.

pub mod grammar;
mod instance;
pub mod io;
pub mod locate;
pub mod project;
mod vinst_error;

pub use grammar::SyntaxError;
pub use instance::{extract, extract_instance, ExtractOptions, InstanceRecord, DEFAULT_SENTINEL};
pub use locate::{locate, RawFragment, TERMINATOR};
pub use vinst_error::{Missing, Result, VinstError};
