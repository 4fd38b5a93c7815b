//! Definition Packer
//!
//! Interleaves each part of speech's flat example list into its definition
//! tree. One counter per part of speech numbers the non-marker leaves in
//! depth-first order; an example with `sequence_index == n` attaches to the
//! n-th leaf. The counter lives on the stack of a single packing call.

use crate::types::{
    DefinitionGroup, DefinitionNode, Example, PackedNode, PackedPartOfSpeech, WordSense,
};

/// Pack every sense, dropping parts of speech that pack to nothing and senses
/// left without parts of speech.
///
/// Returns an empty result when the first sense has no definitions to anchor
/// examples against.
pub fn pack_definitions_and_examples(senses: &[WordSense]) -> Vec<Vec<PackedPartOfSpeech>> {
    let anchored = senses
        .first()
        .and_then(|sense| sense.definitions.first())
        .is_some_and(|group| !group.text.is_empty());
    if !anchored {
        return Vec::new();
    }

    senses
        .iter()
        .map(|sense| {
            sense
                .definitions
                .iter()
                .filter_map(pack_part_of_speech)
                .collect::<Vec<_>>()
        })
        .filter(|parts| !parts.is_empty())
        .collect()
}

/// Pack one part of speech with a fresh counter.
pub fn pack_part_of_speech(group: &DefinitionGroup) -> Option<PackedPartOfSpeech> {
    let mut counter = 0;
    let text = pack_nodes(&group.text, &group.example_uses, &mut counter);
    if text.is_empty() {
        return None;
    }
    Some(PackedPartOfSpeech {
        part_of_speech: group.part_of_speech.clone(),
        text,
    })
}

/// Pack `nodes`, advancing `counter` once per non-marker leaf.
pub fn pack_nodes(nodes: &[DefinitionNode], examples: &[Example], counter: &mut usize) -> Vec<PackedNode> {
    nodes
        .iter()
        .map(|node| match node {
            DefinitionNode::Marker(text) => PackedNode::Marker(text.clone()),
            DefinitionNode::Group(children) => {
                PackedNode::Group(pack_nodes(children, examples, counter))
            }
            DefinitionNode::Leaf(text) => {
                let matched: Vec<String> = examples
                    .iter()
                    .filter(|example| example.sequence_index == *counter)
                    .map(|example| example.text.clone())
                    .collect();
                *counter += 1;
                if matched.is_empty() {
                    PackedNode::Leaf(text.clone())
                } else {
                    PackedNode::Annotated {
                        text: text.clone(),
                        examples: matched,
                    }
                }
            }
        })
        .collect()
}
