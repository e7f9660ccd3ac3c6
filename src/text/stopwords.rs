//! Stopword catalogs and stopword-based language detection

use std::collections::HashSet;
use std::fmt;

const SPANISH_STOPWORDS: &[&str] = &[
    "de", "la", "que", "el", "en", "y", "a", "los", "del", "se", "las", "por", "un", "para", "con",
    "no", "una", "su", "al", "lo", "como", "mas", "pero", "sus", "le", "ya", "o", "este", "ha",
    "me", "si", "sin", "sobre", "es", "son", "entre", "cuando", "muy", "nos", "hasta", "desde",
    "todo", "nosotros", "usted", "ellos", "ellas", "ser", "fue", "era", "tambien", "tan", "solo",
    "donde",
];

const ENGLISH_STOPWORDS: &[&str] = &[
    "the", "and", "is", "in", "to", "of", "a", "for", "on", "with", "as", "by", "that", "it",
    "this", "an", "be", "or", "are", "from", "at", "was", "were", "but", "not", "have", "has",
    "had", "you", "your", "their", "they", "we", "our", "will", "would", "can", "could", "there",
    "about", "which", "one", "all",
];

/// Languages the tokenizer can tell apart
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Language {
    Spanish,
    English,
}

impl Language {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Spanish => "es",
            Self::English => "en",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Immutable stopword lookup tables, built once and shared by reference
#[derive(Debug, Clone)]
pub struct StopwordCatalog {
    spanish: HashSet<&'static str>,
    english: HashSet<&'static str>,
}

impl StopwordCatalog {
    pub fn new() -> Self {
        Self {
            spanish: SPANISH_STOPWORDS.iter().copied().collect(),
            english: ENGLISH_STOPWORDS.iter().copied().collect(),
        }
    }

    pub fn words(&self, language: Language) -> &HashSet<&'static str> {
        match language {
            Language::Spanish => &self.spanish,
            Language::English => &self.english,
        }
    }

    pub fn is_stopword(&self, language: Language, token: &str) -> bool {
        self.words(language).contains(token)
    }

    /// Picks the language whose stopwords occur most often in `tokens`
    ///
    /// English wins only with a strictly higher count; ties (including no
    /// matches at all) fall back to Spanish.
    pub fn detect_language<S: AsRef<str>>(&self, tokens: &[S]) -> Language {
        let score = |language| {
            tokens
                .iter()
                .filter(|token| self.is_stopword(language, token.as_ref()))
                .count()
        };

        if score(Language::English) > score(Language::Spanish) {
            Language::English
        } else {
            Language::Spanish
        }
    }
}

impl Default for StopwordCatalog {
    fn default() -> Self {
        Self::new()
    }
}
