//! Sense Correlator
//!
//! Partitions extracted content into one [`WordSense`] per etymology. The
//! etymology at index `e_i` owns every definition in `[e_i, e_{i+1})` as well
//! as every definition nested under `e_i`. Pages without etymology headings get
//! a single sense spanning the whole language section.

use crate::index::HierarchicalIndex;
use crate::types::{DefinitionGroup, Etymology, RelatedWord, WordData, WordSense};
use tracing::debug;

pub fn correlate(data: &WordData) -> Vec<WordSense> {
    let sentinel = [Etymology::sentinel()];
    let etymologies: &[Etymology] = if data.etymologies.is_empty() {
        &sentinel
    } else {
        &data.etymologies
    };
    let upper_sentinel = HierarchicalIndex::sentinel_upper_bound();

    let mut senses = Vec::with_capacity(etymologies.len());
    for (position, etymology) in etymologies.iter().enumerate() {
        let lower = &etymology.index;
        let upper = etymologies
            .get(position + 1)
            .map(|next| &next.index)
            .unwrap_or(&upper_sentinel);

        let mut sense = WordSense {
            etymology: etymology.text.clone(),
            ..Default::default()
        };

        for pronunciation in &data.pronunciations {
            let same_depth =
                pronunciation.index.count_numeric_components() == lower.count_numeric_components();
            if same_depth || pronunciation.index.in_range(lower, upper) {
                sense.pronunciations = pronunciation.lines.clone();
                sense.audio_links = pronunciation.audio_links.clone();
            }
        }

        for definition in &data.definitions {
            let owned = definition.index.in_range(lower, upper)
                || lower.is_subheading_of(&definition.index);
            if !owned {
                continue;
            }

            let mut group = DefinitionGroup {
                part_of_speech: definition.part_of_speech.clone(),
                text: definition.nodes.clone(),
                ..Default::default()
            };
            for examples in &data.examples {
                if examples.index.is_within(&definition.index) {
                    group.example_uses = examples.examples.clone();
                }
            }
            for related in &data.related {
                if related.index.is_within(&definition.index) {
                    group.related_words.push(RelatedWord {
                        relation_type: related.relation_type.clone(),
                        words: related.words.clone(),
                    });
                }
            }
            sense.definitions.push(group);
        }

        debug!(
            "etymology [{}, {}): {} definition groups",
            lower,
            upper,
            sense.definitions.len()
        );
        senses.push(sense);
    }

    senses
}
