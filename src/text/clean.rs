//! Markup removal and character-level cleanup

use regex::Regex;
use scraper::Html;
use std::borrow::Cow;
use std::sync::LazyLock;

static SCRIPT_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<script\b[^>]*>.*?</script>").unwrap());

static WHITESPACE_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

static NON_WORD_CHAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\p{L}\p{N}\s]").unwrap());

/// Reduces an HTML document to its visible text on a single line
///
/// Script blocks are cut out before parsing so their payload never reaches
/// the text. The parser then drops every tag and comment and decodes
/// entities; malformed markup is tolerated.
pub fn html_to_text(html: &str) -> String {
    let without_scripts = SCRIPT_BLOCK.replace_all(html, " ");
    let document = Html::parse_document(&without_scripts);
    let text: String = document.root_element().text().collect();
    collapse_whitespace(&text)
}

/// Collapses every whitespace run (newlines included) to one space and trims
pub fn collapse_whitespace(text: &str) -> String {
    WHITESPACE_RUN.replace_all(text, " ").trim().to_string()
}

/// Replaces everything that is not a letter, number or whitespace with a space
pub fn strip_non_word_chars(text: &str) -> Cow<'_, str> {
    NON_WORD_CHAR.replace_all(text, " ")
}

/// First `max_chars` Unicode scalar values of `text`
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => text[..idx].to_string(),
        None => text.to_string(),
    }
}

/// Folds text to its closest ASCII spelling
///
/// Output is lowercased again because some folds produce capitals
/// (`北京` becomes `Bei Jing`).
#[cfg(feature = "transliterate")]
pub fn transliterate(text: &str) -> Cow<'_, str> {
    if text.is_ascii() {
        return Cow::Borrowed(text);
    }
    Cow::Owned(deunicode::deunicode_with_tofu(text, " ").to_lowercase())
}

/// Without the `transliterate` feature text passes through unchanged
#[cfg(not(feature = "transliterate"))]
pub fn transliterate(text: &str) -> Cow<'_, str> {
    Cow::Borrowed(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_script_blocks_removed() {
        let html = "<p>before</p><SCRIPT type=\"text/javascript\">\nvar x = 'leak';\n</SCRIPT><p>after</p>";
        let text = html_to_text(html);
        assert!(!text.contains("leak"));
        assert!(text.contains("before"));
        assert!(text.contains("after"));
    }

    #[test]
    fn test_multiple_scripts_non_greedy() {
        let html = "<script>a()</script>keep<script>b()</script>";
        assert_eq!(html_to_text(html), "keep");
    }

    #[test]
    fn test_tags_stripped_and_entities_decoded() {
        let html = "<div><b>Fish &amp; Chips</b> &lt;tasty&gt; caf&eacute;</div>";
        assert_eq!(html_to_text(html), "Fish & Chips <tasty> café");
    }

    #[test]
    fn test_comments_dropped() {
        assert_eq!(html_to_text("<p>a<!-- hidden --> b</p>"), "a b");
    }

    #[test]
    fn test_malformed_markup_tolerated() {
        let text = html_to_text("<div><p>unclosed <b>bold <i>text</div>");
        assert_eq!(text, "unclosed bold text");
    }

    #[test]
    fn test_collapse_whitespace() {
        assert_eq!(collapse_whitespace("  a \n\n\t b  "), "a b");
        assert_eq!(collapse_whitespace(""), "");
    }

    #[test]
    fn test_strip_non_word_chars() {
        assert_eq!(strip_non_word_chars("año-2024, ¡sí!"), "año 2024   sí ");
    }

    #[test]
    fn test_truncate_chars_counts_code_points() {
        assert_eq!(truncate_chars("ñandú", 3), "ñan");
        assert_eq!(truncate_chars("short", 240), "short");
        assert_eq!(truncate_chars("", 10), "");
    }

    #[cfg(feature = "transliterate")]
    #[test]
    fn test_transliterate_folds_accents() {
        assert_eq!(transliterate("canción niño über"), "cancion nino uber");
        assert_eq!(transliterate("plain"), "plain");
    }
}
