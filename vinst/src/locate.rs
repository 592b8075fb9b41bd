// SPDX-License-Identifier: Apache-2.0

//! Cuts the instantiation statement that follows a sentinel comment out of a
//! larger source text.

use crate::vinst_error::{Missing, Result, VinstError};
use std::fmt;

pub const TERMINATOR: char = ';';

/// Minimal statement text: everything after the sentinel's line up to and
/// including the first terminator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawFragment {
    text: String,
    source_lineno: u32,
}

impl RawFragment {
    /// Wraps text that is already a bare statement.
    pub fn new(text: impl Into<String>) -> Self {
        RawFragment {
            text: text.into(),
            source_lineno: 1,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// 1-based line of the source text on which the fragment begins.
    pub fn source_lineno(&self) -> u32 {
        self.source_lineno
    }
}

impl fmt::Display for RawFragment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.text)
    }
}

/// Lowercases `text` char by char, recording for every byte of the result the
/// byte offset in `text` of the char it came from.
fn lowercase_with_offsets(text: &str) -> (String, Vec<usize>) {
    let mut lowered = String::with_capacity(text.len());
    let mut offsets = Vec::with_capacity(text.len());
    for (i, c) in text.char_indices() {
        for lc in c.to_lowercase() {
            lowered.push(lc);
            offsets.extend(std::iter::repeat(i).take(lc.len_utf8()));
        }
    }
    (lowered, offsets)
}

/// Byte offset in `text` of the first case-insensitive match of `needle`.
fn find_ignoring_case(text: &str, needle: &str) -> Option<usize> {
    let (lowered, offsets) = lowercase_with_offsets(text);
    let (needle, _) = lowercase_with_offsets(needle);
    lowered.find(&needle).map(|at| offsets[at])
}

/// Locates the statement introduced by `sentinel` in `text`.
///
/// The sentinel is matched ignoring case, including non-ASCII letters. The
/// line holding the sentinel is treated as a comment header and dropped.
pub fn locate(text: &str, sentinel: &str) -> Result<RawFragment> {
    if sentinel.is_empty() {
        return Err(VinstError::MalformedInput(
            "sentinel must not be empty".to_string(),
        ));
    }
    let start = find_ignoring_case(text, sentinel).ok_or_else(|| VinstError::NotFound {
        what: Missing::Sentinel(sentinel.to_string()),
    })?;
    let tail = &text[start..];
    let end = tail.find(TERMINATOR).ok_or(VinstError::NotFound {
        what: Missing::Terminator(TERMINATOR),
    })?;
    let statement = &tail[..end + TERMINATOR.len_utf8()];
    let header_end = statement.find('\n').ok_or_else(|| {
        VinstError::MalformedInput(format!(
            "no line break between sentinel {:?} and '{}'",
            sentinel, TERMINATOR
        ))
    })?;
    let source_lineno = text[..start].matches('\n').count() as u32 + 2;
    log::debug!(
        "locate: sentinel @ byte {}; fragment starts on line {}",
        start,
        source_lineno
    );
    Ok(RawFragment {
        text: statement[header_end + 1..].to_string(),
        source_lineno,
    })
}
