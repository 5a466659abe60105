//! Name normalization
//!
//! Turns an untrusted company name coming out of document analysis into a
//! comparison key and a display name. The key is only ever compared, never
//! shown; the display name keeps the casing of the source.

use crate::folder::is_reserved_char;
use std::collections::BTreeSet;
use std::fmt;
use std::sync::OnceLock;

/// Leading articles dropped before comparison
pub const DEFAULT_PREFIXES: [&str; 3] = ["the", "a", "an"];

/// Trailing legal-entity tokens dropped before comparison
pub const DEFAULT_SUFFIXES: [&str; 9] = [
    "inc",
    "incorporated",
    "corp",
    "corporation",
    "llc",
    "ltd",
    "limited",
    "company",
    "co",
];

/// Short words kept lowercase when title-casing (except in first position)
const CONNECTOR_WORDS: [&str; 8] = ["of", "and", "the", "for", "in", "on", "at", "by"];

/// Comparison form of a company name
///
/// Lowercase, punctuation-free, single-spaced, with articles and legal
/// suffixes removed. Collisions between different raw names are expected.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct NormalizedKey(String);

impl NormalizedKey {
    /// Wrap a string that is used verbatim as a key
    ///
    /// Used when normalization is disabled and names are matched literally.
    pub fn literal(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Get the key as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the key is empty
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Whitespace-separated tokens of the key
    pub fn tokens(&self) -> impl Iterator<Item = &str> {
        self.0.split_whitespace()
    }
}

impl fmt::Display for NormalizedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for NormalizedKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Output of [`Normalizer::normalize`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedName {
    /// Comparison key
    pub key: NormalizedKey,
    /// Title-cased candidate display name
    pub display_name: String,
}

/// Affix vocabulary used by the [`Normalizer`]
#[derive(Debug, Clone)]
pub struct NormalizerRules {
    prefixes: BTreeSet<String>,
    suffixes: BTreeSet<String>,
}

impl Default for NormalizerRules {
    fn default() -> Self {
        Self {
            prefixes: DEFAULT_PREFIXES.iter().map(|s| s.to_string()).collect(),
            suffixes: DEFAULT_SUFFIXES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl NormalizerRules {
    /// Add a legal suffix (matched case-insensitively, punctuation ignored)
    pub fn with_suffix(mut self, suffix: &str) -> Self {
        let form = compare_form(suffix);
        if !form.is_empty() {
            self.suffixes.insert(form);
        }
        self
    }

    /// Add a leading article
    pub fn with_prefix(mut self, prefix: &str) -> Self {
        let form = compare_form(prefix);
        if !form.is_empty() {
            self.prefixes.insert(form);
        }
        self
    }

    /// Known legal suffixes
    pub fn suffixes(&self) -> impl Iterator<Item = &str> {
        self.suffixes.iter().map(String::as_str)
    }

    /// Known leading articles
    pub fn prefixes(&self) -> impl Iterator<Item = &str> {
        self.prefixes.iter().map(String::as_str)
    }
}

/// Strips noise from raw company names
///
/// # Examples
///
/// ```
/// use docsort_domain::normalize;
///
/// let a = normalize("BANK OF AMERICA");
/// let b = normalize("Bank of America Corporation");
/// assert_eq!(a.key, b.key);
/// assert_eq!(a.key.as_str(), "bank of america");
/// assert_eq!(b.display_name, "Bank of America");
/// ```
#[derive(Debug, Clone, Default)]
pub struct Normalizer {
    rules: NormalizerRules,
}

impl Normalizer {
    /// Create a normalizer with custom affix rules
    pub fn new(rules: NormalizerRules) -> Self {
        Self { rules }
    }

    /// The affix rules in use
    pub fn rules(&self) -> &NormalizerRules {
        &self.rules
    }

    /// Normalize a raw name into a comparison key and a display name
    ///
    /// Hyphens split words for affix stripping ("The-Home-Depot",
    /// "Acme-Corp") but stay in the display name.
    pub fn normalize(&self, raw: &str) -> NormalizedName {
        let trimmed = raw.trim();
        let mut tokens = tokenize(trimmed);

        trim_punctuation_tokens(&mut tokens);

        // Leading article, only when something would remain.
        if significant_count(&tokens) >= 2
            && self.rules.prefixes.contains(&compare_form(tokens[0].text))
            && !is_hyphenated_number(trimmed, &tokens)
        {
            tokens.remove(0);
            trim_punctuation_tokens(&mut tokens);
        }

        // Legal suffixes, repeatedly ("Corp LLC"), never the last real token.
        loop {
            trim_punctuation_tokens(&mut tokens);
            if significant_count(&tokens) < 2 {
                break;
            }
            let is_suffix = tokens
                .last()
                .is_some_and(|last| self.rules.suffixes.contains(&compare_form(last.text)));
            if !is_suffix {
                break;
            }
            tokens.pop();
        }

        let key = tokens
            .iter()
            .map(|t| compare_form(t.text))
            .filter(|form| !form.is_empty())
            .collect::<Vec<_>>()
            .join(" ");

        if key.is_empty() {
            return NormalizedName {
                key: NormalizedKey(trimmed.to_string()),
                display_name: trimmed.to_string(),
            };
        }

        NormalizedName {
            key: NormalizedKey(key),
            // "Acme, Inc." displays as "Acme"
            display_name: title_case(trimmed, &tokens)
                .trim_end_matches([',', ';'])
                .to_string(),
        }
    }
}

/// Normalize with the default affix rules
pub fn normalize(raw: &str) -> NormalizedName {
    static DEFAULT: OnceLock<Normalizer> = OnceLock::new();
    DEFAULT.get_or_init(Normalizer::default).normalize(raw)
}

/// Lowercase alphanumerics only, used for affix matching ("L.L.C." -> "llc")
fn compare_form(token: &str) -> String {
    token
        .chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}

/// A word of the raw name and its byte offset
#[derive(Debug, Clone, Copy)]
struct Token<'a> {
    start: usize,
    text: &'a str,
}

impl Token<'_> {
    fn end(&self) -> usize {
        self.start + self.text.len()
    }
}

fn is_word_separator(c: char) -> bool {
    c.is_whitespace() || c == '_' || c == '-' || is_reserved_char(c)
}

fn tokenize(s: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let mut start = None;

    for (i, c) in s.char_indices() {
        if is_word_separator(c) {
            if let Some(begin) = start.take() {
                tokens.push(Token { start: begin, text: &s[begin..i] });
            }
        } else if start.is_none() {
            start = Some(i);
        }
    }
    if let Some(begin) = start {
        tokens.push(Token { start: begin, text: &s[begin..] });
    }

    tokens
}

/// "A-1 Plumbing": an article hyphenated onto a number is part of the name
fn is_hyphenated_number(source: &str, tokens: &[Token<'_>]) -> bool {
    match tokens {
        [first, second, ..] => {
            let gap = &source[first.end()..second.start];
            gap.chars().all(|c| c == '-') && second.text.chars().all(|c| c.is_ascii_digit())
        }
        _ => false,
    }
}

/// Display form of the gap between two words: hyphens kept, everything else one space
fn display_separator(gap: &str) -> String {
    let mut out = String::new();
    for c in gap.chars() {
        if c == '-' {
            out.push('-');
        } else if !out.ends_with(' ') {
            out.push(' ');
        }
    }
    out
}

/// Drop punctuation-only tokens ("&", ".") from both ends, keeping at least one
fn trim_punctuation_tokens(tokens: &mut Vec<Token<'_>>) {
    while tokens.len() > 1 && tokens.last().is_some_and(|t| compare_form(t.text).is_empty()) {
        tokens.pop();
    }
    while tokens.len() > 1 && compare_form(tokens[0].text).is_empty() {
        tokens.remove(0);
    }
}

fn significant_count(tokens: &[Token<'_>]) -> usize {
    tokens.iter().filter(|t| !compare_form(t.text).is_empty()).count()
}

/// Capitalize all-lowercase words; never lowercases anything
fn title_case(source: &str, tokens: &[Token<'_>]) -> String {
    let mut out = String::with_capacity(source.len());

    for (i, token) in tokens.iter().enumerate() {
        if i > 0 {
            out.push_str(&display_separator(&source[tokens[i - 1].end()..token.start]));
        }

        let word = token.text;
        let is_connector = i > 0 && CONNECTOR_WORDS.contains(&word);
        if is_connector || word.chars().any(char::is_uppercase) {
            out.push_str(word);
            continue;
        }
        let mut chars = word.chars();
        match chars.next() {
            Some(first) if first.is_lowercase() => {
                out.extend(first.to_uppercase());
                out.push_str(chars.as_str());
            }
            _ => out.push_str(word),
        }
    }

    out
}
