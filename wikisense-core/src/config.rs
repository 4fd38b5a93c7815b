use crate::error::ParseError;
use crate::types::SectionCategory;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use tracing::{debug, warn};

/// Language code → (category name → localized label)
pub type TranslationTable = BTreeMap<String, BTreeMap<String, String>>;

// Default value functions for serde
fn default_language_code() -> String {
    "en".to_string()
}

fn default_language() -> String {
    "english".to_string()
}

fn default_parts_of_speech() -> Vec<String> {
    [
        "noun",
        "verb",
        "adjective",
        "adverb",
        "determiner",
        "article",
        "preposition",
        "conjunction",
        "proper noun",
        "letter",
        "character",
        "phrase",
        "proverb",
        "idiom",
        "symbol",
        "syllable",
        "numeral",
        "initialism",
        "interjection",
        "definitions",
        "pronoun",
        "particle",
        "predicative",
        "participle",
        "suffix",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_relations() -> Vec<String> {
    [
        "synonyms",
        "antonyms",
        "hypernyms",
        "hyponyms",
        "meronyms",
        "holonyms",
        "troponyms",
        "related terms",
        "coordinate terms",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_languages() -> BTreeMap<String, String> {
    [
        ("en", "english"),
        ("ro", "romanian"),
        ("fr", "french"),
        ("de", "german"),
        ("es", "spanish"),
        ("it", "italian"),
        ("pt", "portuguese"),
        ("nl", "dutch"),
        ("sv", "swedish"),
        ("pl", "polish"),
        ("ru", "russian"),
        ("el", "greek"),
        ("la", "latin"),
        ("ja", "japanese"),
        ("zh", "chinese"),
    ]
    .iter()
    .map(|(code, name)| (code.to_string(), name.to_string()))
    .collect()
}

fn default_unwanted_classes() -> Vec<String> {
    ["sister-wikipedia", "thumb", "reference", "cited-source"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_url_template() -> String {
    "https://{lang}.wiktionary.org/wiki/{word}?printable=yes".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParserConfig {
    /// Active language code, used for label translation and the page URL
    #[serde(default = "default_language_code")]
    pub language_code: String,
    /// Language whose section is read from the page (lower-case)
    #[serde(default = "default_language")]
    pub language: String,
    #[serde(default = "default_parts_of_speech")]
    pub parts_of_speech: Vec<String>,
    #[serde(default = "default_relations")]
    pub relations: Vec<String>,
    #[serde(default)]
    pub translations: TranslationTable,
    /// Language code → language name
    #[serde(default = "default_languages")]
    pub languages: BTreeMap<String, String>,
    /// CSS classes stripped before extraction
    #[serde(default = "default_unwanted_classes")]
    pub unwanted_classes: Vec<String>,
    /// Page URL with `{lang}` and `{word}` placeholders
    #[serde(default = "default_url_template")]
    pub url_template: String,
    /// Time pipeline steps and log a summary
    #[serde(default)]
    pub profile: bool,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            language_code: default_language_code(),
            language: default_language(),
            parts_of_speech: default_parts_of_speech(),
            relations: default_relations(),
            translations: TranslationTable::new(),
            languages: default_languages(),
            unwanted_classes: default_unwanted_classes(),
            url_template: default_url_template(),
            profile: false,
        }
    }
}

impl ParserConfig {
    /// Load configuration from a YAML file
    pub fn load_from_file(path: &str) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: ParserConfig = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    pub fn load_with_fallback(path: Option<&str>) -> Self {
        match path {
            Some(p) => Self::load_from_file(p).unwrap_or_else(|err| {
                warn!("Failed to load config from {}, using defaults: {}", p, err);
                Self::default()
            }),
            None => Self::default(),
        }
    }

    /// Merge a JSON translation table (`{"ro": {"noun": "substantiv"}}`)
    /// into the configured one.
    pub fn load_translations_from_file(&mut self, path: &str) -> Result<()> {
        let content = fs::read_to_string(path)?;
        let table: TranslationTable = serde_json::from_str(&content)?;
        debug!("Loaded translations for {} languages from {}", table.len(), path);
        for (code, labels) in table {
            self.translations.entry(code).or_default().extend(labels);
        }
        Ok(())
    }

    /// Switch the active language by code.
    pub fn set_language(&mut self, language_code: &str) -> Result<(), ParseError> {
        let code = language_code.to_lowercase();
        let language = self
            .languages
            .get(&code)
            .cloned()
            .ok_or_else(|| ParseError::UnknownLanguage(code.clone()))?;
        self.language_code = code;
        self.language = language;
        Ok(())
    }

    pub fn include_part_of_speech(&mut self, part_of_speech: &str) {
        include_item(&mut self.parts_of_speech, part_of_speech);
    }

    pub fn exclude_part_of_speech(&mut self, part_of_speech: &str) {
        exclude_item(&mut self.parts_of_speech, part_of_speech);
    }

    pub fn include_relation(&mut self, relation: &str) {
        include_item(&mut self.relations, relation);
    }

    pub fn exclude_relation(&mut self, relation: &str) {
        exclude_item(&mut self.relations, relation);
    }

    /// Localized label for a category name. English is the identity mapping,
    /// and labels missing from the table fall back to the name itself.
    pub fn translate(&self, label: &str) -> String {
        if self.language_code == "en" {
            return label.to_string();
        }
        self.translations
            .get(&self.language_code)
            .and_then(|labels| labels.get(label))
            .cloned()
            .unwrap_or_else(|| label.to_string())
    }

    /// Every outline label worth keeping, translated.
    pub fn included_items(&self) -> Vec<String> {
        self.relations
            .iter()
            .chain(self.parts_of_speech.iter())
            .map(String::as_str)
            .chain(["etymology", "pronunciation"])
            .map(|item| self.translate(item))
            .collect()
    }

    /// Translated labels that place a heading in `category`.
    ///
    /// For Chinese pages the word itself heads a definitions section.
    pub fn checklist(&self, category: SectionCategory, word: &str) -> Vec<String> {
        let mut items: Vec<String> = match category {
            SectionCategory::Etymologies => vec!["etymology".to_string()],
            SectionCategory::Pronunciation => vec!["pronunciation".to_string()],
            SectionCategory::Definitions => self.parts_of_speech.clone(),
            SectionCategory::Related => self.relations.clone(),
        };
        if category == SectionCategory::Definitions && self.language == "chinese" {
            items.push(word.to_lowercase());
        }
        items.iter().map(|item| self.translate(item)).collect()
    }

    /// Page URL for `word` on the active edition.
    pub fn page_url(&self, word: &str) -> String {
        expand_page_url(&self.url_template, &self.language_code, word)
    }
}

/// Fill the `{lang}` and `{word}` placeholders of a page URL template.
/// Spaces in the word become underscores, as in page titles.
pub fn expand_page_url(template: &str, language_code: &str, word: &str) -> String {
    template
        .replace("{lang}", language_code)
        .replace("{word}", &word.replace(' ', "_"))
}

fn include_item(items: &mut Vec<String>, item: &str) {
    let item = item.to_lowercase();
    if !items.contains(&item) {
        items.push(item);
    }
}

fn exclude_item(items: &mut Vec<String>, item: &str) {
    let item = item.to_lowercase();
    items.retain(|existing| *existing != item);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = ParserConfig::default();
        assert_eq!(config.language_code, "en");
        assert_eq!(config.language, "english");
        assert_eq!(config.parts_of_speech.len(), 25);
        assert_eq!(config.relations.len(), 9);
        assert!(config.unwanted_classes.contains(&"cited-source".to_string()));
        assert_eq!(
            config.page_url("cat"),
            "https://en.wiktionary.org/wiki/cat?printable=yes"
        );
    }

    #[test]
    fn test_include_and_exclude_are_case_insensitive_and_idempotent() {
        let mut config = ParserConfig::default();
        config.include_part_of_speech("Abbreviation");
        config.include_part_of_speech("abbreviation");
        assert_eq!(
            config
                .parts_of_speech
                .iter()
                .filter(|p| *p == "abbreviation")
                .count(),
            1
        );

        config.exclude_part_of_speech("NOUN");
        config.exclude_part_of_speech("noun");
        assert!(!config.parts_of_speech.contains(&"noun".to_string()));

        config.include_relation("Derived terms");
        assert!(config.included_items().contains(&"derived terms".to_string()));
        config.exclude_relation("derived terms");
        assert!(!config.included_items().contains(&"derived terms".to_string()));
    }

    #[test]
    fn test_set_language() {
        let mut config = ParserConfig::default();
        config.set_language("RO").unwrap();
        assert_eq!(config.language_code, "ro");
        assert_eq!(config.language, "romanian");
        assert_eq!(
            config.page_url("salut"),
            "https://ro.wiktionary.org/wiki/salut?printable=yes"
        );

        assert_eq!(
            config.page_url("ice cream"),
            "https://ro.wiktionary.org/wiki/ice_cream?printable=yes"
        );

        let err = config.set_language("xx").unwrap_err();
        assert!(matches!(err, ParseError::UnknownLanguage(code) if code == "xx"));
        assert_eq!(config.language_code, "ro");
    }

    #[test]
    fn test_translate() {
        let mut config = ParserConfig::default();
        config
            .translations
            .entry("ro".to_string())
            .or_default()
            .insert("noun".to_string(), "substantiv".to_string());

        assert_eq!(config.translate("noun"), "noun");
        config.set_language("ro").unwrap();
        assert_eq!(config.translate("noun"), "substantiv");
        assert_eq!(config.translate("verb"), "verb");
        assert!(config.included_items().contains(&"substantiv".to_string()));
    }

    #[test]
    fn test_checklist_per_category() {
        let mut config = ParserConfig::default();
        assert_eq!(
            config.checklist(SectionCategory::Etymologies, "cat"),
            vec!["etymology"]
        );
        assert_eq!(config.checklist(SectionCategory::Related, "cat").len(), 9);
        assert!(!config
            .checklist(SectionCategory::Definitions, "猫")
            .contains(&"猫".to_string()));

        config.set_language("zh").unwrap();
        assert!(config
            .checklist(SectionCategory::Definitions, "猫")
            .contains(&"猫".to_string()));
    }

    #[test]
    fn test_load_from_yaml_with_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "language: french\nlanguage_code: fr\nprofile: true").unwrap();
        let config = ParserConfig::load_from_file(file.path().to_str().unwrap()).unwrap();
        assert_eq!(config.language, "french");
        assert!(config.profile);
        assert_eq!(config.relations.len(), 9);
    }

    #[test]
    fn test_load_with_fallback_uses_defaults_on_error() {
        let config = ParserConfig::load_with_fallback(Some("/nonexistent/wikisense.yaml"));
        assert_eq!(config.language, "english");
    }

    #[test]
    fn test_load_translations_from_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"fr": {{"noun": "nom", "etymology": "étymologie"}}}}"#).unwrap();
        let mut config = ParserConfig::default();
        config
            .load_translations_from_file(file.path().to_str().unwrap())
            .unwrap();
        config.set_language("fr").unwrap();
        assert_eq!(config.translate("etymology"), "étymologie");
    }
}
