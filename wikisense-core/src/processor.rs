use crate::cache::{CachedOutcome, CachedPage, OutcomeCacheKey, PageCacheKey};
use crate::classifier::SectionClassifier;
use crate::config::ParserConfig;
use crate::correlator::correlate;
use crate::error::ParseError;
use crate::extractors::{
    extract_definitions, extract_etymologies, extract_examples, extract_pronunciations,
    extract_related,
};
use crate::markup::{clean_document, parse_html};
use crate::outline::{locate_language, no_entry, read_outline, LanguageScope};
use crate::packer::pack_definitions_and_examples;
use crate::source::PageSource;
use crate::storage::{calculate_config_hash, calculate_markup_hash, NoOpStorage, PageStorage};
use crate::types::*;
use anyhow::Result;
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Captured intermediate outputs from each pipeline stage
/// Used for testing and diagnostics: lets you inspect/compare each boundary
#[derive(Debug, Clone, serde::Serialize)]
pub struct PipelineStages {
    pub outline: Vec<OutlineEntry>,
    pub sections: Vec<Section>,
    pub word_data: WordData,
    pub outcome: FetchOutcome,
}

/// Simple profiler that collects timings for pipeline steps
pub struct StepProfiler {
    enabled: bool,
    timings: Vec<(String, Duration)>,
}

impl StepProfiler {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            timings: Vec::new(),
        }
    }

    pub fn time_step<F, R>(&mut self, step_name: &str, f: F) -> R
    where
        F: FnOnce() -> R,
    {
        if !self.enabled {
            return f();
        }

        let start = Instant::now();
        let result = f();
        let elapsed = start.elapsed();

        self.timings.push((step_name.to_string(), elapsed));
        debug!("{}: {}µs", step_name, elapsed.as_micros());

        result
    }

    pub fn timings(&self) -> &[(String, Duration)] {
        &self.timings
    }

    pub fn print_summary(&self) {
        if !self.enabled || self.timings.is_empty() {
            return;
        }

        info!("Performance summary:");
        let total: Duration = self.timings.iter().map(|(_, d)| *d).sum();

        for (step, duration) in &self.timings {
            let percentage = if total.is_zero() {
                0.0
            } else {
                (duration.as_secs_f64() / total.as_secs_f64()) * 100.0
            };
            info!(
                "   {:.<35} {}µs ({:.1}%)",
                step,
                duration.as_micros(),
                percentage
            );
        }
        info!("   {:.<35} {}µs", "Total", total.as_micros());
    }
}

/// Everything one parse produced before correlation.
struct ParseRun {
    outline: Vec<OutlineEntry>,
    sections: Vec<Section>,
    word_data: WordData,
    outcome: FetchOutcome,
}

pub struct WordParser {
    config: ParserConfig,
    source: Box<dyn PageSource>,
    storage: Box<dyn PageStorage>,
}

impl WordParser {
    /// Create WordParser with full dependency injection
    pub fn new_with_dependencies(
        config: ParserConfig,
        source: Box<dyn PageSource>,
        storage: Box<dyn PageStorage>,
    ) -> Self {
        Self {
            config,
            source,
            storage,
        }
    }

    /// Default configuration, no caching
    pub fn new_with_source(source: Box<dyn PageSource>) -> Self {
        Self::new_with_dependencies(ParserConfig::default(), source, Box::new(NoOpStorage::new()))
    }

    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    pub fn set_language(&mut self, language_code: &str) -> Result<(), ParseError> {
        self.config.set_language(language_code)
    }

    pub fn include_part_of_speech(&mut self, part_of_speech: &str) {
        self.config.include_part_of_speech(part_of_speech);
    }

    pub fn exclude_part_of_speech(&mut self, part_of_speech: &str) {
        self.config.exclude_part_of_speech(part_of_speech);
    }

    pub fn include_relation(&mut self, relation: &str) {
        self.config.include_relation(relation);
    }

    pub fn exclude_relation(&mut self, relation: &str) {
        self.config.exclude_relation(relation);
    }

    /// Fetch and parse a word, using the cache.
    ///
    /// `language` defaults to the configured language.
    pub fn fetch(
        &self,
        word: &str,
        language: Option<&str>,
        old_id: Option<u64>,
    ) -> Result<FetchOutcome> {
        self.fetch_with_options(word, language, old_id, false, self.config.profile)
    }

    pub fn fetch_with_options(
        &self,
        word: &str,
        language: Option<&str>,
        old_id: Option<u64>,
        skip_cache: bool,
        enable_profiling: bool,
    ) -> Result<FetchOutcome> {
        let start_time = Instant::now();
        let mut profiler = StepProfiler::new(enable_profiling);
        let language = self.resolve_language(language);

        let page_key = PageCacheKey::new(word, &self.config.language_code, old_id);
        let cached_page = if skip_cache {
            debug!("Skipping cache lookup for '{}'", word);
            None
        } else {
            profiler.time_step("Page Cache Lookup", || self.storage.get_page(&page_key))?
        };

        let markup = match cached_page {
            Some(page) => {
                debug!("Cache hit: page for '{}' from {}", word, page.source);
                page.markup
            }
            None => {
                let markup = profiler.time_step("Fetch", || {
                    self.source
                        .fetch_markup(word, &self.config.language_code, old_id)
                })?;
                if !skip_cache {
                    let page = CachedPage::new(markup.clone(), self.source.name());
                    self.storage.store_page(&page_key, &page)?;
                }
                markup
            }
        };

        let outcome_key = profiler.time_step("Cache Key Generation", || {
            let markup_hash = calculate_markup_hash(&markup);
            let config_hash = calculate_config_hash(&(&self.config, &language))?;
            Ok::<OutcomeCacheKey, anyhow::Error>(OutcomeCacheKey::new(markup_hash, config_hash, word))
        })?;

        if !skip_cache {
            if let Some(cached) = self.storage.get_outcome(&outcome_key)? {
                debug!("Cache hit: parsed outcome for '{}'", word);
                profiler.print_summary();
                return Ok(cached.outcome);
            }
        }

        let run = self.run_pipeline(&markup, word, &language, &mut profiler)?;

        if !skip_cache {
            let processing_time = start_time.elapsed().as_millis() as u64;
            let cached = CachedOutcome::new(run.outcome.clone(), processing_time);
            self.storage.store_outcome(&outcome_key, &cached)?;
        }

        profiler.print_summary();
        debug!(
            "Total processing time for '{}': {}ms",
            word,
            start_time.elapsed().as_millis()
        );
        Ok(run.outcome)
    }

    /// Parse page markup directly, bypassing the source and the cache.
    pub fn parse_markup(
        &self,
        markup: &str,
        word: &str,
        language: Option<&str>,
    ) -> Result<FetchOutcome> {
        let language = self.resolve_language(language);
        let mut profiler = StepProfiler::new(self.config.profile);
        let run = self.run_pipeline(markup, word, &language, &mut profiler)?;
        profiler.print_summary();
        Ok(run.outcome)
    }

    /// Parse markup and keep every intermediate stage
    pub fn capture_stages(
        &self,
        markup: &str,
        word: &str,
        language: Option<&str>,
    ) -> Result<PipelineStages> {
        let language = self.resolve_language(language);
        let run = self.run_pipeline(markup, word, &language, &mut StepProfiler::new(false))?;
        Ok(PipelineStages {
            outline: run.outline,
            sections: run.sections,
            word_data: run.word_data,
            outcome: run.outcome,
        })
    }

    /// Interleave examples into the definition trees of a fetched word.
    pub fn pack(outcome: &FetchOutcome) -> Vec<Vec<PackedPartOfSpeech>> {
        pack_definitions_and_examples(outcome.senses())
    }

    fn resolve_language(&self, language: Option<&str>) -> String {
        language
            .unwrap_or(&self.config.language)
            .trim()
            .to_lowercase()
    }

    fn run_pipeline(
        &self,
        markup: &str,
        word: &str,
        language: &str,
        profiler: &mut StepProfiler,
    ) -> Result<ParseRun> {
        let config = &self.config;

        let mut doc = profiler.time_step("Markup Parsing", || parse_html(markup))?;
        profiler.time_step("Cleaning", || clean_document(&mut doc, &config.unwanted_classes));

        let outline = read_outline(&doc);
        let mut included = config.included_items();
        if config.language == "chinese" {
            included.push(word.to_lowercase());
        }

        let entries = match locate_language(&doc, &outline, language, &included) {
            LanguageScope::Outline(entries) => entries,
            LanguageScope::Headline => Vec::new(),
            LanguageScope::Missing => {
                info!("No '{}' entry on the page for '{}'", language, word);
                return Ok(ParseRun {
                    outline,
                    sections: Vec::new(),
                    word_data: WordData::default(),
                    outcome: FetchOutcome::NoEntry(no_entry(&doc)),
                });
            }
        };

        let classifier = SectionClassifier::new(config, word);
        let (etymology_sections, pronunciation_sections, definition_sections, related_sections) =
            profiler.time_step("Classification", || {
                Ok::<_, ParseError>((
                    classifier.classify(&doc, &entries, SectionCategory::Etymologies)?,
                    classifier.classify(&doc, &entries, SectionCategory::Pronunciation)?,
                    classifier.classify(&doc, &entries, SectionCategory::Definitions)?,
                    classifier.classify(&doc, &entries, SectionCategory::Related)?,
                ))
            })?;

        // Examples empty their bodies in the tree, so they are read first.
        let word_data = profiler.time_step("Extraction", || {
            let examples = extract_examples(&mut doc, &definition_sections, config);
            let definitions = extract_definitions(&doc, &definition_sections, config);
            let etymologies = extract_etymologies(&doc, &etymology_sections);
            let related = extract_related(&doc, &related_sections);
            let pronunciations = extract_pronunciations(&mut doc, &pronunciation_sections);
            WordData {
                etymologies,
                pronunciations,
                definitions,
                examples,
                related,
            }
        });

        let senses = profiler.time_step("Correlation", || correlate(&word_data));
        info!(
            "Parsed '{}' ({}): {} senses, {} definition sections, {} examples",
            word,
            language,
            senses.len(),
            word_data.definitions.len(),
            word_data.examples.iter().map(|e| e.examples.len()).sum::<usize>()
        );

        let sections = etymology_sections
            .into_iter()
            .chain(pronunciation_sections)
            .chain(definition_sections)
            .chain(related_sections)
            .collect();

        Ok(ParseRun {
            outline,
            sections,
            word_data,
            outcome: FetchOutcome::Senses(senses),
        })
    }
}
