//! Text normalization and tokenization for the index
//!
//! This module turns a fetched HTML page into:
//! - a snippet: the first 240 characters of the page's visible text
//! - a token stream: lowercased, ASCII-folded, stopword-filtered and
//!   singularized words, in page order with duplicates kept
//!
//! Language (Spanish or English) is guessed from stopword frequency and
//! selects both the stopword list and the stemming rules.

mod clean;
mod stem;
mod stopwords;

pub use clean::{collapse_whitespace, html_to_text, truncate_chars};
pub use stem::stem;
pub use stopwords::{Language, StopwordCatalog};

/// Snippet length in Unicode code points
pub const SNIPPET_LENGTH: usize = 240;

/// Index-ready content derived from one page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessedContent {
    /// Normalized tokens in page order
    pub tokens: Vec<String>,

    /// Leading excerpt of the cleaned text
    pub snippet: String,

    /// Language the tokens were filtered and stemmed for
    pub language: Language,
}

impl ProcessedContent {
    /// Tokens joined with single spaces, as stored for full-text search
    pub fn token_text(&self) -> String {
        self.tokens.join(" ")
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

/// Tokenizer pipeline over an explicit stopword catalog
///
/// # Example
///
/// ```
/// use sumi_index::text::Tokenizer;
///
/// let tokenizer = Tokenizer::new();
/// let content = tokenizer.preprocess_html("<p>The Cats run.</p>");
/// assert_eq!(content.tokens, vec!["cat", "run"]);
/// assert_eq!(content.snippet, "The Cats run.");
/// ```
#[derive(Debug, Clone, Default)]
pub struct Tokenizer {
    stopwords: StopwordCatalog,
}

impl Tokenizer {
    pub fn new() -> Self {
        Self {
            stopwords: StopwordCatalog::new(),
        }
    }

    /// Runs the full pipeline over an HTML (or plain text) document
    pub fn preprocess_html(&self, html: &str) -> ProcessedContent {
        let text = html_to_text(html);
        let snippet = truncate_chars(&text, SNIPPET_LENGTH);
        let (tokens, language) = self.tokenize(&text);

        ProcessedContent {
            tokens,
            snippet,
            language,
        }
    }

    /// Tokenizes already-cleaned text
    ///
    /// Language detection scores the unfiltered tokens; filtering and
    /// stemming then use the detected language.
    pub fn tokenize(&self, text: &str) -> (Vec<String>, Language) {
        let lowered = text.to_lowercase();
        let folded = clean::transliterate(&lowered);
        let words_only = clean::strip_non_word_chars(&folded);
        let raw: Vec<&str> = words_only.split_whitespace().collect();

        let language = self.stopwords.detect_language(&raw);

        let tokens = raw
            .into_iter()
            .filter(|token| !self.stopwords.is_stopword(language, token))
            .map(|token| stem(token, language))
            .collect();

        (tokens, language)
    }
}
