//! Section Classifier
//!
//! Sorts outline entries into the four category buckets (etymologies,
//! pronunciation, definitions, related) by matching their normalized labels
//! against the translated checklist for the bucket.

use crate::config::ParserConfig;
use crate::error::ParseError;
use crate::index::HierarchicalIndex;
use crate::markup::Document;
use crate::outline::HEADING_TAGS;
use crate::types::{OutlineEntry, Section, SectionCategory};
use tracing::debug;

/// Index given to every section found without an outline.
const SINGLE_SENSE_INDEX: &str = "1";

/// Lower-case, trimmed label with trailing digits removed ("Etymology 2" → "etymology").
pub fn normalize_label(label: &str) -> String {
    label
        .trim()
        .trim_end_matches(|c: char| c.is_ascii_digit())
        .trim()
        .to_lowercase()
}

pub struct SectionClassifier<'a> {
    config: &'a ParserConfig,
    word: &'a str,
}

impl<'a> SectionClassifier<'a> {
    pub fn new(config: &'a ParserConfig, word: &'a str) -> Self {
        Self { config, word }
    }

    /// Sections of one category, in document order.
    ///
    /// With an empty outline the page is treated as single-sense and headings
    /// are matched directly by id.
    pub fn classify(
        &self,
        doc: &Document,
        outline: &[OutlineEntry],
        category: SectionCategory,
    ) -> Result<Vec<Section>, ParseError> {
        let checklist = self.config.checklist(category, self.word);

        let sections = if outline.is_empty() {
            self.classify_headings(doc, &checklist)?
        } else {
            let mut sections = Vec::new();
            for entry in outline {
                let label = normalize_label(&entry.label);
                if checklist.contains(&label) {
                    sections.push(Section {
                        index: HierarchicalIndex::parse(&entry.index)?,
                        id: entry.anchor.clone(),
                        category: label,
                    });
                }
            }
            sections
        };

        debug!("classified {} {:?} sections", sections.len(), category);
        Ok(sections)
    }

    fn classify_headings(
        &self,
        doc: &Document,
        checklist: &[String],
    ) -> Result<Vec<Section>, ParseError> {
        let index = HierarchicalIndex::parse(SINGLE_SENSE_INDEX)?;
        let headings = doc.find_all(doc.root(), |d, n| {
            d.is_tag(n, HEADING_TAGS) && d.attr(n, "id").is_some()
        });

        let mut sections = Vec::new();
        for heading in headings {
            let Some(id) = doc.attr(heading, "id") else {
                continue;
            };
            if let Some(label) = checklist
                .iter()
                .find(|label| title_case(label) == id || anchor_form(label) == id)
            {
                sections.push(Section {
                    index: index.clone(),
                    id: id.to_string(),
                    category: label.clone(),
                });
            }
        }
        Ok(sections)
    }
}

/// "proper noun" → "Proper Noun"
fn title_case(label: &str) -> String {
    label
        .split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// "proper noun" → "Proper_noun"
fn anchor_form(label: &str) -> String {
    let mut chars = label.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars)
            .collect::<String>()
            .replace(' ', "_"),
        None => String::new(),
    }
}
