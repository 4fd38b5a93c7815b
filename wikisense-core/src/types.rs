use crate::index::HierarchicalIndex;
use serde::{Deserialize, Serialize, Serializer};
use std::borrow::Cow;

/// Reserved first character of a heading-marker definition entry.
pub const HEADING_MARKER: char = '#';

/// Prefix written before leaf text that would otherwise read back as a
/// marker (or as an escaped leaf).
pub const LEAF_ESCAPE: char = '\\';

/// JSON text of a leaf: leading `#` or `\` gets a [`LEAF_ESCAPE`] prefix.
fn escape_leaf(text: &str) -> Cow<'_, str> {
    if text.starts_with(HEADING_MARKER) || text.starts_with(LEAF_ESCAPE) {
        Cow::Owned(format!("{LEAF_ESCAPE}{text}"))
    } else {
        Cow::Borrowed(text)
    }
}

// ===== OUTLINE & SECTION TYPES =====

/// One entry of the page outline (table of contents) as found in the markup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutlineEntry {
    /// Raw dotted index text, e.g. "1.2"
    pub index: String,
    /// Anchor id of the heading the entry points at
    pub anchor: String,
    /// Visible label, e.g. "Etymology 2"
    pub label: String,
}

/// A classified section: ties an outline index to a heading id and category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub index: HierarchicalIndex,
    pub id: String,
    pub category: String,
}

/// Category buckets the Section Classifier sorts headings into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SectionCategory {
    Etymologies,
    Pronunciation,
    Definitions,
    Related,
}

// ===== EXTRACTED CONTENT =====

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Etymology {
    pub index: HierarchicalIndex,
    pub text: String,
}

impl Etymology {
    /// Stand-in used when a page has no etymology subdivisions.
    pub fn sentinel() -> Self {
        Self {
            index: HierarchicalIndex::root(),
            text: String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pronunciation {
    pub index: HierarchicalIndex,
    pub lines: Vec<String>,
    pub audio_links: Vec<String>,
}

/// One entry of a part-of-speech definition list.
///
/// The JSON form keeps the compact shape consumers expect: markers are
/// strings starting with [`HEADING_MARKER`], leaves are plain strings and
/// groups are arrays whose first element is the parent definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawDefinitionNode", into = "RawDefinitionNode")]
pub enum DefinitionNode {
    /// Heading-like paragraph between definitions. Stored without the marker.
    Marker(String),
    Leaf(String),
    /// A definition followed by its sub-definitions.
    Group(Vec<DefinitionNode>),
}

impl DefinitionNode {
    pub fn marker(text: impl Into<String>) -> Self {
        Self::Marker(text.into())
    }

    pub fn leaf(text: impl Into<String>) -> Self {
        Self::Leaf(text.into())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum RawDefinitionNode {
    Text(String),
    Group(Vec<RawDefinitionNode>),
}

impl From<RawDefinitionNode> for DefinitionNode {
    fn from(raw: RawDefinitionNode) -> Self {
        match raw {
            RawDefinitionNode::Text(text) => {
                if let Some(leaf) = text.strip_prefix(LEAF_ESCAPE) {
                    Self::Leaf(leaf.to_string())
                } else if let Some(heading) = text.strip_prefix(HEADING_MARKER) {
                    Self::Marker(heading.to_string())
                } else {
                    Self::Leaf(text)
                }
            }
            RawDefinitionNode::Group(items) => {
                Self::Group(items.into_iter().map(Self::from).collect())
            }
        }
    }
}

impl From<DefinitionNode> for RawDefinitionNode {
    fn from(node: DefinitionNode) -> Self {
        match node {
            DefinitionNode::Marker(text) => Self::Text(format!("{HEADING_MARKER}{text}")),
            DefinitionNode::Leaf(text) => Self::Text(escape_leaf(&text).into_owned()),
            DefinitionNode::Group(items) => Self::Group(items.into_iter().map(Self::from).collect()),
        }
    }
}

/// Usage example keyed by the raw list-item position of the definition it
/// illustrates within one part of speech.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Example {
    #[serde(rename = "index")]
    pub sequence_index: usize,
    pub text: String,
}

impl Example {
    pub fn new(sequence_index: usize, text: impl Into<String>) -> Self {
        Self {
            sequence_index,
            text: text.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelatedWord {
    #[serde(rename = "relationshipType")]
    pub relation_type: String,
    pub words: Vec<String>,
}

/// Definitions of one part-of-speech heading, before correlation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefinitionSection {
    pub index: HierarchicalIndex,
    pub part_of_speech: String,
    pub nodes: Vec<DefinitionNode>,
}

/// Examples of one part-of-speech heading, before correlation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExampleSection {
    pub index: HierarchicalIndex,
    pub part_of_speech: String,
    pub examples: Vec<Example>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelatedSection {
    pub index: HierarchicalIndex,
    pub relation_type: String,
    pub words: Vec<String>,
}

/// Everything the extractors pulled out of one page, per category.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordData {
    pub etymologies: Vec<Etymology>,
    pub pronunciations: Vec<Pronunciation>,
    pub definitions: Vec<DefinitionSection>,
    pub examples: Vec<ExampleSection>,
    pub related: Vec<RelatedSection>,
}

// ===== CORRELATED OUTPUT =====

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DefinitionGroup {
    pub part_of_speech: String,
    pub text: Vec<DefinitionNode>,
    #[serde(rename = "examples")]
    pub example_uses: Vec<Example>,
    pub related_words: Vec<RelatedWord>,
}

/// All content scoped to one etymological origin of a word.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WordSense {
    pub etymology: String,
    pub pronunciations: Vec<String>,
    pub audio_links: Vec<String>,
    pub definitions: Vec<DefinitionGroup>,
}

/// Diagnostic payload returned when the requested language is not on the page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoEntry {
    pub languages: Vec<String>,
    #[serde(rename = "disambig")]
    pub disambiguation: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FetchOutcome {
    Senses(Vec<WordSense>),
    NoEntry(NoEntry),
}

impl FetchOutcome {
    pub fn senses(&self) -> &[WordSense] {
        match self {
            Self::Senses(senses) => senses,
            Self::NoEntry(_) => &[],
        }
    }

    pub fn is_no_entry(&self) -> bool {
        matches!(self, Self::NoEntry(_))
    }
}

// ===== PACKED OUTPUT =====

/// Definition entry after examples have been interleaved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PackedNode {
    Marker(String),
    Leaf(String),
    Annotated { text: String, examples: Vec<String> },
    Group(Vec<PackedNode>),
}

#[derive(Serialize)]
struct AnnotatedRef<'a> {
    text: &'a str,
    examples: &'a [String],
}

impl Serialize for PackedNode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Marker(text) => serializer.serialize_str(&format!("{HEADING_MARKER}{text}")),
            Self::Leaf(text) => serializer.serialize_str(&escape_leaf(text)),
            Self::Annotated { text, examples } => AnnotatedRef { text, examples }.serialize(serializer),
            Self::Group(items) => items.serialize(serializer),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PackedPartOfSpeech {
    pub part_of_speech: String,
    pub text: Vec<PackedNode>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn definition_nodes_use_compact_json() {
        let nodes = vec![
            DefinitionNode::marker("Heading"),
            DefinitionNode::leaf("first sense"),
            DefinitionNode::Group(vec![
                DefinitionNode::leaf("second sense"),
                DefinitionNode::leaf("sub a"),
            ]),
        ];
        let value = serde_json::to_value(&nodes).unwrap();
        assert_eq!(
            value,
            json!(["#Heading", "first sense", ["second sense", "sub a"]])
        );

        let back: Vec<DefinitionNode> = serde_json::from_value(value).unwrap();
        assert_eq!(back, nodes);
    }

    #[test]
    fn hash_leading_leaves_stay_leaves() {
        let nodes = vec![
            DefinitionNode::marker("Heading"),
            DefinitionNode::leaf("#hashtag sense"),
            DefinitionNode::leaf("\\path"),
            DefinitionNode::Group(vec![
                DefinitionNode::leaf("parent"),
                DefinitionNode::leaf("#nested"),
            ]),
        ];
        let value = serde_json::to_value(&nodes).unwrap();
        assert_eq!(
            value,
            json!(["#Heading", "\\#hashtag sense", "\\\\path", ["parent", "\\#nested"]])
        );

        let back: Vec<DefinitionNode> = serde_json::from_value(value).unwrap();
        assert_eq!(back, nodes);
    }

    #[test]
    fn packed_leaves_are_escaped_like_definition_leaves() {
        let packed = vec![PackedNode::Marker("Heading".into()), PackedNode::Leaf("#tag".into())];
        assert_eq!(
            serde_json::to_value(&packed).unwrap(),
            json!(["#Heading", "\\#tag"])
        );
    }

    #[test]
    fn no_entry_serializes_with_disambig_key() {
        let outcome = FetchOutcome::NoEntry(NoEntry {
            languages: vec!["French".into()],
            disambiguation: vec!["Test".into()],
        });
        assert_eq!(
            serde_json::to_value(&outcome).unwrap(),
            json!({"languages": ["French"], "disambig": ["Test"]})
        );
        assert!(outcome.is_no_entry());
        assert!(outcome.senses().is_empty());
    }

    #[test]
    fn packed_nodes_serialize_like_definitions() {
        let packed = vec![
            PackedNode::Marker("Heading".into()),
            PackedNode::Annotated {
                text: "first".into(),
                examples: vec!["ex".into()],
            },
            PackedNode::Group(vec![PackedNode::Leaf("second".into())]),
        ];
        assert_eq!(
            serde_json::to_value(&packed).unwrap(),
            json!(["#Heading", {"text": "first", "examples": ["ex"]}, ["second"]])
        );
    }
}
