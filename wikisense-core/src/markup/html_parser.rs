//! Dictionary Page HTML Parser
//!
//! Builds a [`Document`] tree from the HTML of a rendered dictionary page.
//! quick-xml runs in a lenient mode so real-world HTML survives:
//! - void elements (`<br>`, `<img>`, `<source>`, ...) never open a scope
//! - mismatched or stray end tags close the nearest matching open element,
//!   or are ignored
//! - unquoted and valueless attributes are accepted
//! - common HTML named entities are resolved; unknown ones are kept verbatim

use super::dom::{Document, NodeId};
use crate::error::ParseError;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use regex::{Captures, Regex};
use std::sync::LazyLock;
use tracing::debug;

// Pre-compiled regexes for markup normalization
static SCRIPT_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<script\b[^>]*>.*?</script\s*>").unwrap());

static STYLE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<style\b[^>]*>.*?</style\s*>").unwrap());

static COMMENT_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)<!--.*?-->").unwrap());

static ENTITY_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"&(#[xX][0-9a-fA-F]+|#[0-9]+|[A-Za-z][A-Za-z0-9]*);").unwrap()
});

static NEWLINE_BETWEEN_TAGS_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r">\r?\n<").unwrap());

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param",
    "source", "track", "wbr",
];

/// Elements kept by [`clean_document`] even when they carry no text.
const KEEP_WHEN_EMPTY: &[&str] = &["br", "source"];

/// Parse page HTML into a navigable tree.
pub fn parse_html(markup: &str) -> Result<Document, ParseError> {
    let normalized = normalize_markup(markup);

    let mut reader = Reader::from_str(&normalized);
    {
        let config = reader.config_mut();
        config.check_end_names = false;
        config.allow_unmatched_ends = true;
        config.trim_text(false);
    }

    let mut doc = Document::new();
    let mut stack: Vec<NodeId> = vec![doc.root()];

    loop {
        let parent = *stack.last().unwrap_or(&doc.root());
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                let (name, attrs) = element_parts(&e);
                let id = doc.append_element(parent, &name, attrs);
                if !VOID_ELEMENTS.contains(&name.as_str()) {
                    stack.push(id);
                }
            }
            Ok(Event::Empty(e)) => {
                let (name, attrs) = element_parts(&e);
                doc.append_element(parent, &name, attrs);
            }
            Ok(Event::End(e)) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).to_ascii_lowercase();
                // Index 0 is the document root, which never closes.
                if let Some(position) = stack
                    .iter()
                    .rposition(|&open| doc.name(open) == Some(name.as_str()))
                {
                    if position > 0 {
                        stack.truncate(position);
                    }
                }
            }
            Ok(Event::Text(e)) => {
                let raw = String::from_utf8_lossy(&e);
                let text = unescape_html(&raw);
                if !text.is_empty() {
                    doc.append_text(parent, &text);
                }
            }
            Ok(Event::CData(e)) => {
                let text = String::from_utf8_lossy(&e).into_owned();
                if !text.is_empty() {
                    doc.append_text(parent, &text);
                }
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(err) => {
                return Err(ParseError::Markup {
                    position: reader.buffer_position() as u64,
                    message: err.to_string(),
                })
            }
        }
    }

    debug!(
        "parsed page markup: {} bytes, {} top-level nodes",
        normalized.len(),
        doc.children(doc.root()).len()
    );

    Ok(doc)
}

/// Strip decorative content and empty elements.
///
/// Elements carrying any of `unwanted_classes` are removed first, then every
/// element whose text is empty, unless it is (or contains) a line break or an
/// audio `source`.
pub fn clean_document(doc: &mut Document, unwanted_classes: &[String]) {
    let root = doc.root();

    let unwanted = doc.find_all(root, |d, node| d.has_any_class(node, unwanted_classes));
    for node in &unwanted {
        doc.detach(*node);
    }

    let elements = doc.find_all(root, |_, _| true);
    let mut removed = 0usize;
    for node in elements {
        if doc.is_tag(node, KEEP_WHEN_EMPTY) || doc.contains_tag(node, &["source"]) {
            continue;
        }
        if doc.children(node).is_empty() || doc.text(node).trim().is_empty() {
            doc.detach(node);
            removed += 1;
        }
    }

    debug!(
        "cleaned page: {} decorative and {} empty elements removed",
        unwanted.len(),
        removed
    );
}

fn normalize_markup(markup: &str) -> String {
    let without_scripts = SCRIPT_REGEX.replace_all(markup, "");
    let without_styles = STYLE_REGEX.replace_all(&without_scripts, "");
    let without_comments = COMMENT_REGEX.replace_all(&without_styles, "");
    NEWLINE_BETWEEN_TAGS_REGEX
        .replace_all(&without_comments, "><")
        .into_owned()
}

fn element_parts(e: &BytesStart<'_>) -> (String, Vec<(String, String)>) {
    let name = String::from_utf8_lossy(e.name().as_ref()).to_ascii_lowercase();
    let attrs = e
        .html_attributes()
        .flatten()
        .map(|attr| {
            let key = String::from_utf8_lossy(attr.key.as_ref()).to_ascii_lowercase();
            let raw = String::from_utf8_lossy(&attr.value);
            (key, unescape_html(&raw))
        })
        .collect();
    (name, attrs)
}

/// Resolve character references and common HTML entities.
fn unescape_html(raw: &str) -> String {
    if !raw.contains('&') {
        return raw.to_string();
    }
    ENTITY_REGEX
        .replace_all(raw, |caps: &Captures| {
            decode_entity(&caps[1]).unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

fn decode_entity(entity: &str) -> Option<String> {
    if let Some(hex) = entity
        .strip_prefix("#x")
        .or_else(|| entity.strip_prefix("#X"))
    {
        return u32::from_str_radix(hex, 16)
            .ok()
            .and_then(char::from_u32)
            .map(String::from);
    }
    if let Some(decimal) = entity.strip_prefix('#') {
        return decimal
            .parse::<u32>()
            .ok()
            .and_then(char::from_u32)
            .map(String::from);
    }
    resolve_entity(entity).map(str::to_string)
}

fn resolve_entity(entity: &str) -> Option<&'static str> {
    let resolved = match entity {
        "lt" => "<",
        "gt" => ">",
        "amp" => "&",
        "apos" => "'",
        "quot" => "\"",
        "nbsp" => "\u{a0}",
        "ndash" => "\u{2013}",
        "mdash" => "\u{2014}",
        "lsquo" => "\u{2018}",
        "rsquo" => "\u{2019}",
        "ldquo" => "\u{201c}",
        "rdquo" => "\u{201d}",
        "hellip" => "\u{2026}",
        "middot" => "\u{b7}",
        "thinsp" => "\u{2009}",
        "ensp" => "\u{2002}",
        "emsp" => "\u{2003}",
        "shy" => "\u{ad}",
        "zwj" => "\u{200d}",
        "zwnj" => "\u{200c}",
        "lrm" => "\u{200e}",
        "rlm" => "\u{200f}",
        _ => return None,
    };
    Some(resolved)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn void_elements_do_not_swallow_siblings() {
        let doc = parse_html("<div><p>one<br>two</p><p>three</p></div>").unwrap();
        let root = doc.root();
        let paragraphs = doc.find_tags(root, &["p"]);
        assert_eq!(paragraphs.len(), 2);
        assert_eq!(doc.text(paragraphs[0]), "onetwo");
        assert_eq!(doc.text(paragraphs[1]), "three");
    }

    #[test]
    fn stray_end_tags_are_tolerated() {
        let doc = parse_html("<div><span>a</b></span><i>b</i></div></section>").unwrap();
        let div = doc.find_tags(doc.root(), &["div"])[0];
        assert_eq!(doc.text(div), "ab");
        assert_eq!(doc.element_children(div).count(), 2);
    }

    #[test]
    fn unclosed_elements_close_with_their_parent() {
        let doc = parse_html("<ul><li>one<li>two</ul><p>after</p>").unwrap();
        let root = doc.root();
        let paragraph = doc.find_tags(root, &["p"])[0];
        assert_eq!(doc.parent(paragraph), Some(root));
    }

    #[test]
    fn entities_and_attributes_are_decoded() {
        let doc = parse_html(
            r##"<a href="#Noun" class=toc data-x>cat&nbsp;&amp;&#32;dog &madeup;</a>"##,
        )
        .unwrap();
        let anchor = doc.find_tags(doc.root(), &["a"])[0];
        assert_eq!(doc.attr(anchor, "href"), Some("#Noun"));
        assert!(doc.has_class(anchor, "toc"));
        assert_eq!(doc.text(anchor), "cat\u{a0}& dog &madeup;");
    }

    #[test]
    fn scripts_styles_and_comments_are_dropped() {
        let doc = parse_html(
            "<body><script>if (a < b) { x(); }</script><style>p{}</style><!-- <p>hidden</p> --><p>kept</p></body>",
        )
        .unwrap();
        assert_eq!(doc.text(doc.root()), "kept");
    }

    #[test]
    fn newlines_between_tags_are_removed() {
        let doc = parse_html("<ol>\n<li>a</li>\n<li>b</li>\n</ol>").unwrap();
        let list = doc.find_tags(doc.root(), &["ol"])[0];
        assert_eq!(doc.children(list).len(), 2);
    }

    #[test]
    fn clean_removes_decorative_and_empty_elements() {
        let mut doc = parse_html(
            r#"<div><p>text<sup class="reference">[1]</sup></p><span></span><p> </p>
<div class="mediaContainer"><audio><source src="a.ogg"></audio></div><p>x<br>y</p></div>"#,
        )
        .unwrap();
        clean_document(&mut doc, &["reference".to_string()]);

        let root = doc.root();
        assert_eq!(doc.find_tags(root, &["sup"]).len(), 0);
        assert_eq!(doc.find_tags(root, &["span"]).len(), 0);
        assert_eq!(doc.find_tags(root, &["p"]).len(), 2);
        assert_eq!(doc.find_tags(root, &["source"]).len(), 1);
        assert_eq!(doc.find_tags(root, &["br"]).len(), 1);
    }
}
