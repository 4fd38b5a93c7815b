//! Dotted hierarchical section indices ("1", "2.3", "2.3.1").
//!
//! Indices are ordered by zero-padding every component to two digits and
//! comparing the padded strings, so "1.9" sorts before "1.10" and "2" before
//! "10". The empty index is the document root and sorts below everything.

use crate::error::ParseError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;

/// Width every component is padded to before comparison.
const PAD_WIDTH: usize = 2;

/// Upper bound used after the last etymology of a page.
pub const SENTINEL_UPPER_BOUND: &str = "999";

#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct HierarchicalIndex {
    components: Vec<u32>,
}

impl HierarchicalIndex {
    /// Parse a dotted index. The empty string yields the root index.
    pub fn parse(raw: &str) -> Result<Self, ParseError> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Ok(Self::root());
        }

        let components = raw
            .split('.')
            .map(|part| {
                part.parse::<u32>().map_err(|_| ParseError::MalformedIndex {
                    index: raw.to_string(),
                    reason: format!("component '{part}' is not a non-negative integer"),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { components })
    }

    pub fn root() -> Self {
        Self::default()
    }

    /// The bound that sorts above every index a real page produces.
    pub fn sentinel_upper_bound() -> Self {
        Self {
            components: vec![999],
        }
    }

    pub fn components(&self) -> &[u32] {
        &self.components
    }

    pub fn count_numeric_components(&self) -> usize {
        self.components.len()
    }

    /// Comparison key: each component padded to [`PAD_WIDTH`] digits.
    pub fn padded(&self) -> String {
        self.components
            .iter()
            .map(|c| format!("{c:0width$}", width = PAD_WIDTH))
            .collect::<Vec<_>>()
            .join(".")
    }

    /// `lower <= self < upper`
    pub fn in_range(&self, lower: &Self, upper: &Self) -> bool {
        lower <= self && self < upper
    }

    /// True when `self` is a strict, component-wise extension of `parent`.
    pub fn is_subheading_of(&self, parent: &Self) -> bool {
        is_subheading(self, parent)
    }

    /// True when `self` equals `ancestor` or lies anywhere beneath it.
    pub fn is_within(&self, ancestor: &Self) -> bool {
        self.components.starts_with(&ancestor.components)
    }
}

pub fn compare(a: &HierarchicalIndex, b: &HierarchicalIndex) -> Ordering {
    a.padded().cmp(&b.padded())
}

pub fn in_range(x: &HierarchicalIndex, lower: &HierarchicalIndex, upper: &HierarchicalIndex) -> bool {
    x.in_range(lower, upper)
}

pub fn is_subheading(child: &HierarchicalIndex, parent: &HierarchicalIndex) -> bool {
    child.components.len() > parent.components.len()
        && child.components.starts_with(&parent.components)
}

impl Ord for HierarchicalIndex {
    fn cmp(&self, other: &Self) -> Ordering {
        compare(self, other)
    }
}

impl PartialOrd for HierarchicalIndex {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for HierarchicalIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered = self
            .components
            .iter()
            .map(u32::to_string)
            .collect::<Vec<_>>()
            .join(".");
        f.write_str(&rendered)
    }
}

impl std::str::FromStr for HierarchicalIndex {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for HierarchicalIndex {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for HierarchicalIndex {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn idx(raw: &str) -> HierarchicalIndex {
        HierarchicalIndex::parse(raw).unwrap()
    }

    #[test]
    fn numeric_not_lexicographic_ordering() {
        assert!(idx("1.9") < idx("1.10"));
        assert!(idx("2") < idx("10"));
        assert!(idx("1") < idx("1.1"));
        assert_eq!(compare(&idx("3.2"), &idx("3.2")), Ordering::Equal);
    }

    #[test]
    fn sorting_a_mixed_outline() {
        let mut indices: Vec<_> = ["2.10", "2.2", "10", "1", "2", "2.1.3"]
            .iter()
            .map(|raw| idx(raw))
            .collect();
        indices.sort();
        let rendered: Vec<String> = indices.iter().map(ToString::to_string).collect();
        assert_eq!(rendered, vec!["1", "2", "2.1.3", "2.2", "2.10", "10"]);
    }

    #[test]
    fn root_sorts_below_and_sentinel_above_everything() {
        let root = HierarchicalIndex::root();
        let upper = HierarchicalIndex::sentinel_upper_bound();
        for raw in ["1", "1.1", "42.7.3", "99.99"] {
            assert!(root < idx(raw), "root should sort below {raw}");
            assert!(idx(raw) < upper, "{raw} should sort below sentinel");
        }
        assert_eq!(upper.to_string(), SENTINEL_UPPER_BOUND);
    }

    #[test]
    fn range_is_half_open() {
        assert!(idx("2").in_range(&idx("2"), &idx("3")));
        assert!(idx("2.5").in_range(&idx("2"), &idx("3")));
        assert!(!idx("3").in_range(&idx("2"), &idx("3")));
        assert!(!idx("1.9").in_range(&idx("2"), &idx("3")));
        assert!(in_range(&idx("2.10"), &idx("2.9"), &idx("3")));
    }

    #[test]
    fn subheading_requires_strict_prefix_extension() {
        assert!(is_subheading(&idx("1.2.3"), &idx("1.2")));
        assert!(!is_subheading(&idx("1.3"), &idx("1.2")));
        assert!(!is_subheading(&idx("1"), &idx("1")));
        assert!(!is_subheading(&idx("1.2"), &idx("1.2.3")));
        assert!(!is_subheading(&idx("1.12"), &idx("1.1")));
        assert!(is_subheading(&idx("4"), &HierarchicalIndex::root()));
    }

    #[test]
    fn is_within_respects_component_boundaries() {
        assert!(idx("1.1").is_within(&idx("1.1")));
        assert!(idx("1.1.2").is_within(&idx("1.1")));
        assert!(!idx("1.10").is_within(&idx("1.1")));
    }

    #[test]
    fn counts_components_and_pads() {
        assert_eq!(idx("2.3.1").count_numeric_components(), 3);
        assert_eq!(HierarchicalIndex::root().count_numeric_components(), 0);
        assert_eq!(idx("2.3.10").padded(), "02.03.10");
        assert_eq!(idx("").padded(), "");
    }

    #[test]
    fn malformed_index_fails_fast() {
        let err = HierarchicalIndex::parse("1.a").unwrap_err();
        assert!(matches!(err, ParseError::MalformedIndex { .. }));
        assert!(HierarchicalIndex::parse("1..2").is_err());
        assert!(HierarchicalIndex::parse("-1").is_err());
    }

    #[test]
    fn serializes_as_dotted_string() {
        let json = serde_json::to_string(&idx("3.1")).unwrap();
        assert_eq!(json, "\"3.1\"");
        let back: HierarchicalIndex = serde_json::from_str(&json).unwrap();
        assert_eq!(back, idx("3.1"));
    }
}
