//! Page sources
//!
//! A [`PageSource`] supplies the raw markup of one dictionary page. The core
//! crate ships file and in-memory sources; network sources live with the CLI.

use crate::error::ParseError;
use anyhow::Result;
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use tracing::debug;

pub trait PageSource: Send + Sync {
    /// Markup of the page for `word`, optionally at revision `old_id`.
    fn fetch_markup(&self, word: &str, language_code: &str, old_id: Option<u64>) -> Result<String>;

    /// Short name recorded with cached pages
    fn name(&self) -> &str;
}

/// Reads `<dir>/<word>.html`.
pub struct FilePageSource {
    dir: PathBuf,
}

impl FilePageSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl PageSource for FilePageSource {
    fn fetch_markup(&self, word: &str, _language_code: &str, _old_id: Option<u64>) -> Result<String> {
        let path = self.dir.join(format!("{word}.html"));
        debug!("Reading page for '{}' from {}", word, path.display());
        fs::read_to_string(&path).map_err(|e| {
            ParseError::Fetch {
                word: word.to_string(),
                message: format!("{}: {}", path.display(), e),
            }
            .into()
        })
    }

    fn name(&self) -> &str {
        "file"
    }
}

/// Pages held in memory, keyed by word.
#[derive(Default)]
pub struct InMemoryPageSource {
    pages: HashMap<String, String>,
}

impl InMemoryPageSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(mut self, word: &str, markup: &str) -> Self {
        self.insert(word, markup);
        self
    }

    pub fn insert(&mut self, word: &str, markup: &str) {
        self.pages.insert(word.to_string(), markup.to_string());
    }
}

impl PageSource for InMemoryPageSource {
    fn fetch_markup(&self, word: &str, _language_code: &str, _old_id: Option<u64>) -> Result<String> {
        self.pages.get(word).cloned().ok_or_else(|| {
            ParseError::Fetch {
                word: word.to_string(),
                message: "no page loaded for this word".to_string(),
            }
            .into()
        })
    }

    fn name(&self) -> &str {
        "memory"
    }
}
