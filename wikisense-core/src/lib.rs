// Wikisense Core Library
//
// Parses rendered dictionary pages into word senses: etymology, pronunciation,
// and per-part-of-speech definition trees with their usage examples.
// Main interface is `WordParser` (fetch + parse) and `WordParser::pack`.

pub mod cache;
pub mod classifier;
pub mod config;
pub mod correlator;
pub mod error;
pub mod extractors;
pub mod index;
pub mod markup;
pub mod outline;
pub mod packer;
pub mod processor;
pub mod source;
pub mod storage;
pub mod types;

// Re-export main types and functions for easy use
pub use config::ParserConfig;
pub use correlator::correlate;
pub use error::ParseError;
pub use index::HierarchicalIndex;
pub use packer::pack_definitions_and_examples;
pub use processor::{PipelineStages, StepProfiler, WordParser};
pub use source::{FilePageSource, InMemoryPageSource, PageSource};
pub use storage::{FileStorage, NoOpStorage, PageStorage};
pub use types::*;
