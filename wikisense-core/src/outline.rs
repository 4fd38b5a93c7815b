//! Page outline and language scoping.
//!
//! The table of contents of a rendered page lists every heading as
//! `<a href="#Noun"><span class="tocnumber">1.2</span><span class="toctext">Noun</span></a>`.
//! This module reads those entries, narrows them to the requested language and
//! resolves section ids back to heading elements.

use crate::classifier::normalize_label;
use crate::markup::{Document, NodeId};
use crate::types::{NoEntry, OutlineEntry};
use tracing::debug;

pub const HEADING_TAGS: &[&str] = &["h1", "h2", "h3", "h4", "h5", "h6"];

const IGNORED_LANGUAGE_HEADINGS: &[&str] = &["Contents", "Navigation menu"];
const DISAMBIGUATION_CLASSES: &[&str] = &["disambig-see-also", "disambig-see-also-2"];

/// Where the requested language lives on a page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LanguageScope {
    /// Outline entries under the language, filtered to included labels.
    Outline(Vec<OutlineEntry>),
    /// The page has no outline but carries a headline for the language.
    Headline,
    Missing,
}

/// Every outline entry of the page, in document order.
pub fn read_outline(doc: &Document) -> Vec<OutlineEntry> {
    let root = doc.root();
    doc.find_all(root, |d, n| d.is_tag(n, &["span"]) && d.has_class(n, "toctext"))
        .into_iter()
        .map(|label_node| {
            let index = doc
                .previous_sibling_element(label_node)
                .filter(|&prev| doc.has_class(prev, "tocnumber"))
                .or_else(|| {
                    let parent = doc.parent(label_node)?;
                    doc.find_first(parent, |d, n| d.has_class(n, "tocnumber"))
                })
                .map(|number| doc.text(number).trim().to_string())
                .unwrap_or_default();
            let anchor = doc
                .parent(label_node)
                .filter(|&parent| doc.is_tag(parent, &["a"]))
                .and_then(|link| doc.attr(link, "href"))
                .map(|href| href.replace('#', ""))
                .unwrap_or_default();
            OutlineEntry {
                index,
                anchor,
                label: doc.text(label_node).trim().to_string(),
            }
        })
        .collect()
}

/// Narrow the outline to `language` (lower-case) and to labels in
/// `included_items`.
pub fn locate_language(
    doc: &Document,
    outline: &[OutlineEntry],
    language: &str,
    included_items: &[String],
) -> LanguageScope {
    if outline.is_empty() {
        return if has_language_headline(doc, language) {
            LanguageScope::Headline
        } else {
            LanguageScope::Missing
        };
    }

    // The last matching entry wins, as with repeated language names in nested outlines.
    let Some(prefix) = outline
        .iter()
        .filter(|entry| entry.label.to_lowercase() == language)
        .last()
        .map(|entry| format!("{}.", entry.index))
    else {
        return LanguageScope::Missing;
    };

    let entries: Vec<OutlineEntry> = outline
        .iter()
        .filter(|entry| {
            entry.index.starts_with(&prefix)
                && included_items.contains(&normalize_label(&entry.label))
        })
        .cloned()
        .collect();

    debug!(
        "language '{}' at outline prefix {}: {} of {} entries kept",
        language,
        prefix,
        entries.len(),
        outline.len()
    );
    LanguageScope::Outline(entries)
}

pub fn has_language_headline(doc: &Document, language: &str) -> bool {
    doc.find_tags(doc.root(), &["h2"])
        .into_iter()
        .any(|headline| doc.text(headline).trim().to_lowercase() == language)
}

/// Diagnostic payload for a page without the requested language.
pub fn no_entry(doc: &Document) -> NoEntry {
    let root = doc.root();
    let languages = doc
        .find_tags(root, &["h2"])
        .into_iter()
        .map(|headline| doc.text(headline).trim().to_string())
        .filter(|text| !IGNORED_LANGUAGE_HEADINGS.contains(&text.as_str()))
        .collect();

    let disambiguation = doc
        .find_all(root, |d, n| {
            d.is_tag(n, &["div"]) && DISAMBIGUATION_CLASSES.iter().any(|c| d.has_class(n, c))
        })
        .into_iter()
        .map(|notice| doc.text(notice).replace("See also: ", "").trim().to_string())
        .collect();

    NoEntry {
        languages,
        disambiguation,
    }
}

/// Heading element for a section id: an `h1`–`h6` with that id, or an
/// older-style `span.mw-headline`.
pub fn find_heading(doc: &Document, id: &str) -> Option<NodeId> {
    let root = doc.root();
    doc.find_first(root, |d, n| d.is_tag(n, HEADING_TAGS) && d.attr(n, "id") == Some(id))
        .or_else(|| {
            doc.find_first(root, |d, n| {
                d.is_tag(n, &["span"]) && d.has_class(n, "mw-headline") && d.attr(n, "id") == Some(id)
            })
        })
}

/// The block whose following siblings hold a heading's content.
pub fn section_anchor(doc: &Document, heading: NodeId) -> NodeId {
    let mut anchor = heading;
    if doc.is_tag(anchor, &["span"]) {
        if let Some(parent) = doc.parent(anchor) {
            anchor = parent;
        }
    }
    match doc.parent(anchor) {
        Some(wrapper) if doc.has_class(wrapper, "mw-heading") => wrapper,
        _ => anchor,
    }
}

/// True for elements that start a new section.
pub fn is_heading_boundary(doc: &Document, node: NodeId) -> bool {
    doc.is_tag(node, HEADING_TAGS) || doc.has_class(node, "mw-heading")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markup::parse_html;

    const TOC: &str = r##"<div id="toc"><ul>
<li><a href="#English"><span class="tocnumber">1</span><span class="toctext">English</span></a><ul>
<li><a href="#Etymology_1"><span class="tocnumber">1.1</span><span class="toctext">Etymology 1</span></a></li>
<li><a href="#Noun"><span class="tocnumber">1.1.1</span><span class="toctext">Noun</span></a></li>
<li><a href="#Anagrams"><span class="tocnumber">1.2</span><span class="toctext">Anagrams</span></a></li>
</ul></li>
<li><a href="#French"><span class="tocnumber">2</span><span class="toctext">French</span></a><ul>
<li><a href="#Noun_2"><span class="tocnumber">2.1</span><span class="toctext">Noun</span></a></li>
</ul></li>
</ul></div>"##;

    fn included() -> Vec<String> {
        crate::config::ParserConfig::default().included_items()
    }

    #[test]
    fn test_read_outline() {
        let doc = parse_html(TOC).unwrap();
        let outline = read_outline(&doc);
        assert_eq!(outline.len(), 6);
        assert_eq!(
            outline[1],
            OutlineEntry {
                index: "1.1".into(),
                anchor: "Etymology_1".into(),
                label: "Etymology 1".into(),
            }
        );
        assert_eq!(outline[5].anchor, "Noun_2");
    }

    #[test]
    fn test_locate_language_filters_prefix_and_labels() {
        let doc = parse_html(TOC).unwrap();
        let outline = read_outline(&doc);

        let LanguageScope::Outline(entries) = locate_language(&doc, &outline, "english", &included())
        else {
            panic!("expected outline scope");
        };
        let anchors: Vec<&str> = entries.iter().map(|e| e.anchor.as_str()).collect();
        assert_eq!(anchors, vec!["Etymology_1", "Noun"]);

        let LanguageScope::Outline(entries) = locate_language(&doc, &outline, "french", &included())
        else {
            panic!("expected outline scope");
        };
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].index, "2.1");
    }

    #[test]
    fn test_locate_language_missing() {
        let doc = parse_html(TOC).unwrap();
        let outline = read_outline(&doc);
        assert_eq!(
            locate_language(&doc, &outline, "german", &included()),
            LanguageScope::Missing
        );
    }

    #[test]
    fn test_locate_language_without_outline() {
        let doc = parse_html(r#"<h2 id="English">English</h2><h3 id="Noun">Noun</h3>"#).unwrap();
        assert_eq!(
            locate_language(&doc, &[], "english", &included()),
            LanguageScope::Headline
        );
        assert_eq!(
            locate_language(&doc, &[], "latin", &included()),
            LanguageScope::Missing
        );
    }

    #[test]
    fn test_no_entry_lists_languages_and_disambiguation() {
        let doc = parse_html(
            r#"<div class="disambig-see-also">See also: Cat and CAT</div>
<h2>Contents</h2><h2 id="Translingual">Translingual</h2><h2 id="French">French</h2><h2>Navigation menu</h2>"#,
        )
        .unwrap();
        let payload = no_entry(&doc);
        assert_eq!(payload.languages, vec!["Translingual", "French"]);
        assert_eq!(payload.disambiguation, vec!["Cat and CAT"]);
    }

    #[test]
    fn test_find_heading_and_anchor() {
        let doc = parse_html(
            r#"<div class="mw-heading mw-heading3"><h3 id="Noun">Noun</h3></div><p>a</p>
<h4><span class="mw-headline" id="Verb">Verb</span></h4><p>b</p>
<h4 id="Adverb">Adverb</h4><p>c</p>"#,
        )
        .unwrap();

        let noun = find_heading(&doc, "Noun").unwrap();
        let wrapper = section_anchor(&doc, noun);
        assert!(doc.has_class(wrapper, "mw-heading"));
        assert!(is_heading_boundary(&doc, wrapper));

        let verb = find_heading(&doc, "Verb").unwrap();
        let verb_anchor = section_anchor(&doc, verb);
        assert_eq!(doc.name(verb_anchor), Some("h4"));
        let next = doc.next_sibling_element(verb_anchor).unwrap();
        assert_eq!(doc.text(next), "b");

        let adverb = find_heading(&doc, "Adverb").unwrap();
        assert_eq!(section_anchor(&doc, adverb), adverb);
        assert!(find_heading(&doc, "Missing").is_none());
    }
}
