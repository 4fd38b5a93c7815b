use super::locate_section;
use crate::markup::{Document, NodeId};
use crate::types::{Pronunciation, Section};
use tracing::debug;

const PRONUNCIATION_BLOCKS: &[&str] = &["ul", "ol", "dl", "p"];

/// Pronunciation lines and audio references per section.
///
/// Walks the list and paragraph blocks after the heading. A paragraph is
/// taken as the last line. In lists, footnote markers are dropped, audio
/// players are replaced by their `source` URLs, and nested lists are split
/// off into lines of their own.
pub fn extract_pronunciations(doc: &mut Document, sections: &[Section]) -> Vec<Pronunciation> {
    let mut pronunciations = Vec::new();

    for section in sections {
        let Some(anchor) = locate_section(doc, section) else {
            continue;
        };

        let mut lines = Vec::new();
        let mut audio_links = Vec::new();
        let mut current = doc.next_sibling_element(anchor);
        while let Some(block) = current {
            if !doc.is_tag(block, PRONUNCIATION_BLOCKS) {
                break;
            }
            if doc.is_tag(block, &["p"]) {
                let text = doc.text(block).trim().to_string();
                if !text.is_empty() {
                    lines.push(text);
                }
                break;
            }
            read_list(doc, block, &mut lines, &mut audio_links);
            current = doc.next_sibling_element(block);
        }

        debug!(
            "section {}: {} pronunciation lines, {} audio links",
            section.index,
            lines.len(),
            audio_links.len()
        );
        pronunciations.push(Pronunciation {
            index: section.index.clone(),
            lines,
            audio_links,
        });
    }

    pronunciations
}

fn read_list(
    doc: &mut Document,
    list: NodeId,
    lines: &mut Vec<String>,
    audio_links: &mut Vec<String>,
) {
    for footnote in doc.find_tags(list, &["sup"]) {
        doc.clear(footnote);
    }

    for item in doc.find_tags(list, &["li"]) {
        let players = doc.find_all(item, |d, n| {
            d.is_tag(n, &["div"]) && d.has_class(n, "mediaContainer")
        });
        for player in players {
            audio_links.extend(source_links(doc, player));
            doc.detach(player);
        }
        for nested in doc.find_tags(item, &["ul"]) {
            doc.detach(nested);
        }

        let audio_tables =
            doc.find_all(item, |d, n| d.is_tag(n, &["table"]) && d.has_class(n, "audiotable"));
        if !audio_tables.is_empty() {
            for table in audio_tables {
                audio_links.extend(source_links(doc, table));
            }
            continue;
        }

        let text = doc.text(item).trim().to_string();
        if !text.is_empty() {
            lines.push(text);
        }
    }
}

fn source_links(doc: &Document, container: NodeId) -> Vec<String> {
    doc.find_tags(container, &["source"])
        .into_iter()
        .filter_map(|source| doc.attr(source, "src"))
        .map(str::to_string)
        .collect()
}
