use super::locate_section;
use crate::markup::Document;
use crate::outline::is_heading_boundary;
use crate::types::{Etymology, Section};

/// Etymology text per section: paragraph text, plus one line per list item,
/// up to the next heading.
pub fn extract_etymologies(doc: &Document, sections: &[Section]) -> Vec<Etymology> {
    let mut etymologies = Vec::new();

    for section in sections {
        let Some(anchor) = locate_section(doc, section) else {
            continue;
        };

        let mut text = String::new();
        let mut current = doc.next_sibling_element(anchor);
        while let Some(node) = current {
            if is_heading_boundary(doc, node) {
                break;
            }
            if doc.is_tag(node, &["p"]) {
                text.push_str(&doc.text(node));
            } else {
                for item in doc.find_tags(node, &["li"]) {
                    text.push_str(&doc.text(item));
                    text.push('\n');
                }
            }
            current = doc.next_sibling_element(node);
        }

        etymologies.push(Etymology {
            index: section.index.clone(),
            text: text.trim().to_string(),
        });
    }

    etymologies
}
