// All parsing lives in wikisense-core.
// This crate adds the network page source and the command-line front end.

pub mod http_source;

// Re-export core types for convenience
pub use wikisense_core::*;

pub use http_source::HttpPageSource;
