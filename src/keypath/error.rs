//! Error type for keypath tokenization.

use std::fmt;

/// Errors produced while tokenizing a path string.
///
/// Tokenization never panics; a malformed path yields one of these, and
/// every downstream operation treats it as "whole operation fails"
/// (`None` from get, `false` from set).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathError {
    /// The path ends in a bare escape character.
    DanglingEscape { position: usize },
    /// A container was opened but never closed.
    UnmatchedContainer { opener: char, position: usize },
    /// A prefix or wildcard had no word to attach to.
    OrphanModifier { position: usize },
    /// A placeholder or context token was not a decimal argument index.
    BadArgIndex { text: String, position: usize },
    /// The same prefix appeared twice on one token.
    RepeatedPrefix { ch: char, position: usize },
    /// Container nesting exceeded the supported depth.
    TooDeep { limit: usize },
}

impl fmt::Display for PathError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathError::DanglingEscape { position } => {
                write!(f, "dangling escape at position {}", position)
            }
            PathError::UnmatchedContainer { opener, position } => {
                write!(
                    f,
                    "container '{}' opened at position {} is never closed",
                    opener, position
                )
            }
            PathError::OrphanModifier { position } => {
                write!(
                    f,
                    "modifier at position {} has no property name to attach to",
                    position
                )
            }
            PathError::BadArgIndex { text, position } => {
                write!(
                    f,
                    "'{}' at position {} is not a valid argument index",
                    text, position
                )
            }
            PathError::RepeatedPrefix { ch, position } => {
                write!(f, "prefix '{}' repeated at position {}", ch, position)
            }
            PathError::TooDeep { limit } => {
                write!(f, "container nesting exceeds the supported depth of {}", limit)
            }
        }
    }
}

impl std::error::Error for PathError {}
