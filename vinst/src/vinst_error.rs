// SPDX-License-Identifier: Apache-2.0

use crate::grammar::SyntaxError;

/// The element the locator was looking for and could not find.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Missing {
    Sentinel(String),
    Terminator(char),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VinstError {
    NotFound { what: Missing },
    /// The sentinel was found but the surrounding text is degenerate, e.g.
    /// there is no header line to strip.
    MalformedInput(String),
    Syntax(SyntaxError),
    /// The projection met a tree shape the grammar cannot produce.
    Invariant(String),
}

impl std::fmt::Display for VinstError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VinstError::NotFound {
                what: Missing::Sentinel(sentinel),
            } => write!(f, "sentinel {:?} not found in input", sentinel),
            VinstError::NotFound {
                what: Missing::Terminator(c),
            } => write!(f, "statement terminator '{}' not found after sentinel", c),
            VinstError::MalformedInput(msg) => write!(f, "malformed input: {}", msg),
            VinstError::Syntax(e) => write!(f, "syntax error: {}", e),
            VinstError::Invariant(msg) => write!(f, "projection invariant failed: {}", msg),
        }
    }
}

impl std::error::Error for VinstError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            VinstError::Syntax(e) => Some(e),
            _ => None,
        }
    }
}

impl From<SyntaxError> for VinstError {
    fn from(e: SyntaxError) -> Self {
        VinstError::Syntax(e)
    }
}

pub type Result<T> = std::result::Result<T, VinstError>;
