use super::locate_section;
use crate::markup::Document;
use crate::outline::is_heading_boundary;
use crate::types::{RelatedSection, Section};

/// Words listed under each relation heading (synonyms, antonyms, ...).
///
/// The first sibling holding list items is the word list; a heading reached
/// before it leaves the section empty.
pub fn extract_related(doc: &Document, sections: &[Section]) -> Vec<RelatedSection> {
    let mut related = Vec::new();

    for section in sections {
        let Some(anchor) = locate_section(doc, section) else {
            continue;
        };

        let mut current = doc.next_sibling_element(anchor);
        while let Some(node) = current {
            if is_heading_boundary(doc, node) {
                current = None;
                break;
            }
            if doc.contains_tag(node, &["li"]) {
                break;
            }
            current = doc.next_sibling_element(node);
        }

        let words = current
            .map(|list| {
                doc.find_tags(list, &["li"])
                    .into_iter()
                    .map(|item| doc.text(item))
                    .collect()
            })
            .unwrap_or_default();

        related.push(RelatedSection {
            index: section.index.clone(),
            relation_type: section.category.clone(),
            words,
        });
    }

    related
}
