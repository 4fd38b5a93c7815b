use super::{definition_blocks, locate_section, part_of_speech_name};
use crate::config::ParserConfig;
use crate::markup::{Document, NodeId};
use crate::types::{Example, ExampleSection, Section};
use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

static PARENTHETICAL_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\([^)]*\)").unwrap());

/// Pull usage examples out of every definitions section.
///
/// Quotation sub-lists are emptied first, and every example body is emptied
/// once read, so the definitions extractor that runs afterwards never sees
/// example text. An example's `sequence_index` is the position of its owning
/// list item among all list items of the section's definition lists, which is
/// the order the packer visits leaves in.
pub fn extract_examples(
    doc: &mut Document,
    sections: &[Section],
    config: &ParserConfig,
) -> Vec<ExampleSection> {
    let mut extracted = Vec::new();

    for section in sections {
        let Some(anchor) = locate_section(doc, section) else {
            continue;
        };

        let mut examples = Vec::new();
        let mut offset = 0;
        for list in definition_blocks(doc, anchor) {
            if doc.is_tag(list, &["ol"]) {
                examples.extend(read_list_examples(doc, list, offset));
            }
            if doc.is_tag(list, &["ol", "ul"]) {
                offset += doc.find_tags(list, &["li"]).len();
            }
        }

        debug!(
            "section {}: {} examples over {} list items",
            section.index,
            examples.len(),
            offset
        );
        extracted.push(ExampleSection {
            index: section.index.clone(),
            part_of_speech: part_of_speech_name(&section.category, config),
            examples,
        });
    }

    extracted
}

fn read_list_examples(doc: &mut Document, list: NodeId, offset: usize) -> Vec<Example> {
    for quotations in doc.find_tags(list, &["ul"]) {
        doc.clear(quotations);
    }

    let mut examples = Vec::new();
    for body in doc.find_tags(list, &["dd"]) {
        let is_nyms = doc
            .find_first(body, |d, n| d.is_tag(n, &["span"]) && d.has_class(n, "nyms"))
            .is_some();
        if !is_nyms {
            let raw = doc.text(body);
            let text = PARENTHETICAL_REGEX
                .replace_all(raw.trim(), "")
                .trim()
                .to_string();
            if !text.is_empty() && !text.contains('\n') {
                let items = doc.find_tags(list, &["li"]);
                let owner = doc.parent(body).and_then(|dl| doc.parent(dl));
                let position = owner
                    .and_then(|owner| items.iter().position(|&item| item == owner))
                    .unwrap_or(items.len());
                examples.push(Example::new(offset + position, text));
            }
        }
        doc.clear(body);
    }
    examples
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::HierarchicalIndex;
    use crate::markup::parse_html;

    fn noun_section() -> Section {
        Section {
            index: HierarchicalIndex::parse("1.2").unwrap(),
            id: "Noun".into(),
            category: "noun".into(),
        }
    }

    const NOUN: &str = r#"<h3 id="Noun">Noun</h3><p>cat (plural cats)</p>
<ol>
<li>A small domesticated carnivore.<dl><dd>The cat sat on the mat. (informal)</dd></dl>
<ul><li>1898, quotation text<dl><dd>quoted example</dd></dl></li></ul></li>
<li>A person.<dl><dd><span class="nyms">Synonyms: guy</span></dd></dl>
<ol><li>A jazz enthusiast.</li><li>A fellow.<dl><dd>He's a cool cat.</dd></dl></li></ol></li>
<li>A spiteful woman.<dl><dd>first line
second line</dd></dl></li>
</ol>
<h3 id="Verb">Verb</h3>"#;

    #[test]
    fn test_examples_are_indexed_by_raw_item_position() {
        let mut doc = parse_html(NOUN).unwrap();
        let sections = extract_examples(&mut doc, &[noun_section()], &ParserConfig::default());

        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].part_of_speech, "noun");
        assert_eq!(
            sections[0].examples,
            vec![
                Example::new(0, "The cat sat on the mat."),
                Example::new(3, "He's a cool cat."),
            ]
        );
    }

    #[test]
    fn test_extraction_empties_examples_and_quotations() {
        let mut doc = parse_html(NOUN).unwrap();
        extract_examples(&mut doc, &[noun_section()], &ParserConfig::default());

        let root = doc.root();
        let text = doc.text(root);
        assert!(!text.contains("sat on the mat"));
        assert!(!text.contains("quotation text"));
        assert!(!text.contains("Synonyms"));
        assert!(text.contains("A jazz enthusiast."));
    }

    #[test]
    fn test_later_lists_are_offset() {
        let mut doc = parse_html(
            r#"<h3 id="Noun">Noun</h3><ol><li>one</li><li>two</li></ol><p>Marker</p>
<ol><li>three<dl><dd>example for three</dd></dl></li></ol>"#,
        )
        .unwrap();
        let sections = extract_examples(&mut doc, &[noun_section()], &ParserConfig::default());
        assert_eq!(
            sections[0].examples,
            vec![Example::new(2, "example for three")]
        );
    }

    #[test]
    fn test_missing_heading_is_skipped() {
        let mut doc = parse_html("<p>nothing here</p>").unwrap();
        let sections = extract_examples(&mut doc, &[noun_section()], &ParserConfig::default());
        assert!(sections.is_empty());
    }
}
