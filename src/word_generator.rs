use clap::ValueEnum;
use include_dir::{include_dir, Dir};
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use thiserror::Error;

static LANG_DIR: Dir = include_dir!("$CARGO_MANIFEST_DIR/src/lang");

#[derive(
    Debug, Copy, Clone, PartialEq, Eq, ValueEnum, Serialize, Deserialize, strum_macros::Display,
)]
#[serde(rename_all = "lowercase")]
pub enum SupportedLanguage {
    English,
    Programming,
}

impl SupportedLanguage {
    fn file_name(&self) -> String {
        format!("{}.json", self.to_string().to_lowercase())
    }
}

#[derive(Debug, Error)]
pub enum LanguageError {
    #[error("word list {0} not found")]
    NotFound(String),
    #[error("word list {0} is not utf-8")]
    Encoding(String),
    #[error("word list {file}: {source}")]
    Parse {
        file: String,
        source: serde_json::Error,
    },
}

#[allow(dead_code)]
#[derive(Deserialize, Clone, Debug)]
pub struct Language {
    pub name: String,
    pub size: u32,
    pub words: Vec<String>,
}

impl Language {
    pub fn load(language: SupportedLanguage) -> Result<Self, LanguageError> {
        let file_name = language.file_name();
        let file = LANG_DIR
            .get_file(&file_name)
            .ok_or_else(|| LanguageError::NotFound(file_name.clone()))?;
        let contents = file
            .contents_utf8()
            .ok_or_else(|| LanguageError::Encoding(file_name.clone()))?;
        serde_json::from_str(contents).map_err(|source| LanguageError::Parse {
            file: file_name,
            source,
        })
    }
}

/// Produces phrase candidates that are used exactly like pasted phrases
pub trait PhraseSupplier {
    fn phrases(&self, count: usize) -> Vec<String>;
}

/// One random word per phrase, drawn with repetition from an embedded word list
#[derive(Debug, Clone)]
pub struct WordGenerator {
    language: Language,
}

impl WordGenerator {
    pub fn new(language: Language) -> Self {
        Self { language }
    }

    pub fn for_language(language: SupportedLanguage) -> Result<Self, LanguageError> {
        Language::load(language).map(Self::new)
    }
}

impl PhraseSupplier for WordGenerator {
    fn phrases(&self, count: usize) -> Vec<String> {
        let mut rng = rand::thread_rng();
        (0..count)
            .filter_map(|_| self.language.words.choose(&mut rng))
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_languages() {
        let english = Language::load(SupportedLanguage::English).unwrap();
        assert_eq!(english.name, "english");
        assert_eq!(english.size as usize, english.words.len());

        let programming = Language::load(SupportedLanguage::Programming).unwrap();
        assert_eq!(programming.name, "programming");
        assert!(!programming.words.is_empty());
    }

    #[test]
    fn test_generates_single_word_phrases() {
        let generator = WordGenerator::for_language(SupportedLanguage::English).unwrap();
        let phrases = generator.phrases(30);
        assert_eq!(phrases.len(), 30);
        for phrase in &phrases {
            assert!(!phrase.is_empty());
            assert!(!phrase.contains(char::is_whitespace));
        }
    }

    #[test]
    fn test_more_words_than_list() {
        let generator = WordGenerator::new(Language {
            name: "tiny".into(),
            size: 2,
            words: vec!["cat".into(), "dog".into()],
        });
        let phrases = generator.phrases(10);
        assert_eq!(phrases.len(), 10);
        assert!(phrases.iter().all(|p| p == "cat" || p == "dog"));
    }

    #[test]
    fn test_empty_list_supplies_nothing() {
        let generator = WordGenerator::new(Language {
            name: "empty".into(),
            size: 0,
            words: vec![],
        });
        assert!(generator.phrases(5).is_empty());
    }

    #[test]
    fn test_language_display() {
        assert_eq!(SupportedLanguage::English.to_string(), "English");
        assert_eq!(SupportedLanguage::Programming.file_name(), "programming.json");
    }
}
