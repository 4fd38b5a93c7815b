//! Content Extractors
//!
//! Each extractor walks from a classified heading to its content siblings and
//! pulls out one kind of content. The examples extractor mutates the document
//! (it empties quotation lists and example bodies), so extractors run in a
//! fixed order on one shared [`Document`]: examples, definitions, etymologies,
//! related words, pronunciations.

pub mod definitions;
pub mod etymology;
pub mod examples;
pub mod pronunciation;
pub mod related;

pub use definitions::extract_definitions;
pub use etymology::extract_etymologies;
pub use examples::extract_examples;
pub use pronunciation::extract_pronunciations;
pub use related::extract_related;

use crate::config::ParserConfig;
use crate::markup::{Document, NodeId};
use crate::outline::{find_heading, section_anchor, HEADING_TAGS};
use crate::types::Section;
use tracing::warn;

/// Heading block of `section`, or `None` (logged) when the page lacks it.
pub(crate) fn locate_section(doc: &Document, section: &Section) -> Option<NodeId> {
    match find_heading(doc, &section.id) {
        Some(heading) => Some(section_anchor(doc, heading)),
        None => {
            warn!(
                "heading '{}' ({}) listed in outline but missing from page, skipping",
                section.id, section.index
            );
            None
        }
    }
}

/// Siblings after `anchor` up to the next `div` or heading element.
pub(crate) fn definition_blocks(doc: &Document, anchor: NodeId) -> Vec<NodeId> {
    let mut blocks = Vec::new();
    let mut current = doc.next_sibling_element(anchor);
    while let Some(node) = current {
        if doc.is_tag(node, &["div"]) || doc.is_tag(node, HEADING_TAGS) {
            break;
        }
        blocks.push(node);
        current = doc.next_sibling_element(node);
    }
    blocks
}

/// Part of speech reported for a definitions label; the generic
/// "definitions" heading has none.
pub(crate) fn part_of_speech_name(label: &str, config: &ParserConfig) -> String {
    if label == config.translate("definitions") {
        String::new()
    } else {
        label.to_string()
    }
}

/// Cut run-on text glued onto a definition when inline markup was removed:
/// from a lower-to-upper case transition ("definitionRandom") to the end of
/// the line. A backslash two characters back suppresses the cut.
pub fn fix_uppercase(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());
    let mut i = 0;
    while i < chars.len() {
        let run_on = i >= 2
            && chars[i].is_ascii_uppercase()
            && chars[i - 1].is_ascii_lowercase()
            && chars[i - 2] != '\\';
        if run_on {
            while i < chars.len() && chars[i] != '\n' {
                i += 1;
            }
            continue;
        }
        out.push(chars[i]);
        i += 1;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fix_uppercase() {
        assert_eq!(fix_uppercase("My definitionRandom sentence"), "My definition");
        assert_eq!(fix_uppercase("A plain definition."), "A plain definition.");
        assert_eq!(fix_uppercase("Proper Noun"), "Proper Noun");
        assert_eq!(fix_uppercase("aB"), "aB");
        assert_eq!(fix_uppercase("x\\aB"), "x\\aB");
        assert_eq!(fix_uppercase("oneTwo\nthreeFour"), "one\nthree");
    }

    #[test]
    fn test_part_of_speech_name() {
        let config = ParserConfig::default();
        assert_eq!(part_of_speech_name("definitions", &config), "");
        assert_eq!(part_of_speech_name("noun", &config), "noun");
    }
}
