//! Suffix-stripping singularization
//!
//! These are rough plural heuristics, not a linguistic stemmer. Rules are
//! tried in order; the first one whose suffix matches and whose guards pass
//! is applied, and at most one rule is applied per token.

use crate::text::stopwords::Language;

/// Tokens of this many characters or fewer are never stemmed
const MIN_STEM_LENGTH: usize = 3;

struct SuffixRule {
    suffix: &'static str,
    replacement: &'static str,
    /// Token must have at least this many characters
    min_length: usize,
    /// Rule is skipped when the token ends with any of these
    unless_ends_with: &'static [&'static str],
}

const fn rule(suffix: &'static str, replacement: &'static str) -> SuffixRule {
    SuffixRule {
        suffix,
        replacement,
        min_length: 0,
        unless_ends_with: &[],
    }
}

const ENGLISH_RULES: &[SuffixRule] = &[
    rule("ies", "y"),
    rule("ves", "f"),
    rule("ses", "s"),
    rule("xes", "x"),
    rule("zes", "z"),
    SuffixRule {
        suffix: "s",
        replacement: "",
        min_length: 0,
        unless_ends_with: &["ss"],
    },
];

const SPANISH_RULES: &[SuffixRule] = &[
    rule("ces", "z"),
    SuffixRule {
        suffix: "es",
        replacement: "",
        min_length: 5,
        unless_ends_with: &[],
    },
    SuffixRule {
        suffix: "s",
        replacement: "",
        min_length: 0,
        unless_ends_with: &["as", "es", "is", "os", "us"],
    },
];

fn rules_for(language: Language) -> &'static [SuffixRule] {
    match language {
        Language::English => ENGLISH_RULES,
        Language::Spanish => SPANISH_RULES,
    }
}

/// Strips a plural suffix from `token` according to `language`
pub fn stem(token: &str, language: Language) -> String {
    let length = token.chars().count();
    if length <= MIN_STEM_LENGTH {
        return token.to_string();
    }

    for rule in rules_for(language) {
        let Some(stem) = token.strip_suffix(rule.suffix) else {
            continue;
        };
        if length < rule.min_length {
            continue;
        }
        if rule.unless_ends_with.iter().any(|end| token.ends_with(end)) {
            continue;
        }
        return format!("{}{}", stem, rule.replacement);
    }

    token.to_string()
}
