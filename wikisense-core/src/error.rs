//! Error types for wikisense.
//!
//! Structurally valid pages never fail: missing sections degrade to empty
//! collections. The variants here cover the cases that must fail fast.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ParseError {
    /// A section index from the page outline is not a dotted integer sequence.
    #[error("Malformed section index '{index}': {reason}")]
    MalformedIndex { index: String, reason: String },

    #[error("Markup error at byte {position}: {message}")]
    Markup { position: u64, message: String },

    #[error("Unknown language code: {0}")]
    UnknownLanguage(String),

    #[error("Failed to fetch page for '{word}': {message}")]
    Fetch { word: String, message: String },
}
