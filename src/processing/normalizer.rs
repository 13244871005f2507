//! Text canonicalization shared by every matching stage

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;
use unicode_segmentation::UnicodeSegmentation;

/// Canonicalize text for comparison.
///
/// Lower-cases, decomposes to NFD and drops combining marks, turns anything
/// outside `[a-z0-9\s]` into a space, then collapses and trims whitespace.
/// Total: empty input gives an empty string.
pub fn normalize(text: &str) -> String {
    let folded: String = text
        .to_lowercase()
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .map(|c| {
            if c.is_ascii_lowercase() || c.is_ascii_digit() || c.is_whitespace() {
                c
            } else {
                ' '
            }
        })
        .collect();

    folded.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Word-bounded containment on already-normalized strings.
///
/// Normalized text only holds `[a-z0-9 ]` with single spaces, so padding both
/// sides with a space makes plain substring search equivalent to `\bneedle\b`.
pub fn contains_term(haystack: &str, needle: &str) -> bool {
    if needle.is_empty() {
        return false;
    }
    pad(haystack).contains(&pad(needle))
}

/// Pad a normalized string with one space on each side.
pub fn pad(text: &str) -> String {
    format!(" {} ", text)
}

/// True when `context` appears within `window` characters either side of
/// some occurrence of `term`. Both are matched as whole words. All three
/// inputs are normalized here.
pub fn term_in_context(term: &str, context: &str, text: &str, window: usize) -> bool {
    let text = normalize(text);
    let term = normalize(term);
    let context = normalize(context);
    if term.is_empty() || context.is_empty() {
        return false;
    }

    // Offsets into the padded text equal offsets into `text` of the word that
    // follows the leading space. Normalized text is ASCII, so bytes are chars.
    let padded = pad(&text);
    let contexts: Vec<usize> = padded.match_indices(&pad(&context)).map(|(i, _)| i).collect();
    padded.match_indices(&pad(&term)).any(|(start, _)| {
        let from = start.saturating_sub(window);
        let to = start + term.len() + window;
        contexts
            .iter()
            .any(|&c| c >= from && c + context.len() <= to)
    })
}

/// Résumé text plus its normalized form, computed once per pipeline run.
#[derive(Debug, Clone, PartialEq)]
pub struct ResumeDocument {
    pub raw: String,
    pub normalized: String,
}

impl ResumeDocument {
    pub fn new(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let normalized = normalize(&raw);
        Self { raw, normalized }
    }

    /// Word-bounded containment of an arbitrary (not yet normalized) term.
    pub fn contains(&self, term: &str) -> bool {
        contains_term(&self.normalized, &normalize(term))
    }

    /// Word-bounded containment of a term that is already normalized.
    pub fn contains_normalized(&self, term: &str) -> bool {
        contains_term(&self.normalized, term)
    }

    pub fn is_empty(&self) -> bool {
        self.normalized.is_empty()
    }

    pub fn word_count(&self) -> usize {
        self.raw.unicode_words().count()
    }
}
