use super::{definition_blocks, fix_uppercase, locate_section, part_of_speech_name};
use crate::config::ParserConfig;
use crate::markup::{Document, NodeId};
use crate::types::{DefinitionNode, DefinitionSection, Section};
use tracing::debug;

/// Build the definition tree of every part-of-speech section.
///
/// Paragraphs between lists become heading markers. Each top-level list item
/// becomes a leaf, or a group when it has nested items: its own text first,
/// then the text of every nested item in document order.
pub fn extract_definitions(
    doc: &Document,
    sections: &[Section],
    config: &ParserConfig,
) -> Vec<DefinitionSection> {
    let mut extracted = Vec::new();

    for section in sections {
        let Some(anchor) = locate_section(doc, section) else {
            continue;
        };

        let mut nodes = Vec::new();
        for block in definition_blocks(doc, anchor) {
            if doc.is_tag(block, &["p"]) {
                let text = doc.text(block).trim().to_string();
                if !text.is_empty() {
                    nodes.push(DefinitionNode::marker(text));
                }
            } else if doc.is_tag(block, &["ol", "ul"]) {
                nodes.extend(read_list(doc, block));
            }
        }

        debug!(
            "section {} ({}): {} definition entries",
            section.index,
            section.category,
            nodes.len()
        );
        extracted.push(DefinitionSection {
            index: section.index.clone(),
            part_of_speech: part_of_speech_name(&section.category, config),
            nodes,
        });
    }

    extracted
}

fn read_list(doc: &Document, list: NodeId) -> Vec<DefinitionNode> {
    let mut nodes = Vec::new();
    let items: Vec<NodeId> = doc
        .element_children(list)
        .filter(|&child| doc.is_tag(child, &["li"]))
        .collect();

    for item in items {
        if doc.text(item).is_empty() {
            continue;
        }
        let nested = doc.find_tags(item, &["li"]);
        if nested.is_empty() {
            nodes.push(DefinitionNode::leaf(fix_uppercase(doc.text(item).trim())));
            continue;
        }

        let own_text = doc.text_excluding(item, |d, n| d.is_tag(n, &["li"]));
        let mut group = vec![DefinitionNode::leaf(own_text.trim())];
        group.extend(
            nested
                .into_iter()
                .map(|sub| DefinitionNode::leaf(fix_uppercase(doc.text(sub).trim()))),
        );
        nodes.push(DefinitionNode::Group(group));
    }
    nodes
}
