//! Breaks compound requirement phrases into candidate sub-terms
//!
//! Requirement phrases are prose ("Experiência com análise de dados e
//! Power BI"), so decomposition favours recall: the original phrase, its
//! conjunction parts, every preposition split along the way, each single
//! word and any known technical term all end up in the set. Later stages
//! decide which of these count as evidence.

use crate::processing::normalizer::{contains_term, normalize};
use crate::processing::terms::{CONJUNCTIONS, PREPOSITIONS, TECHNICAL_TERMS};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

static PARENTHESES: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\(([^)]+)\)").expect("Invalid parentheses regex"));

static PARENTHESES_WITH_SPACING: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s*\([^)]+\)\s*").expect("Invalid parentheses regex"));

static CONJUNCTION: Lazy<Regex> =
    Lazy::new(|| Regex::new(&format!(r"(?i)\s+(?:{})\s+|/", CONJUNCTIONS.join("|"))).expect("Invalid conjunction regex"));

static PARENTHESIS_ITEM_SEPARATOR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s*,\s*|\s+").expect("Invalid separator regex"));

static PREPOSITION_SPLITTERS: Lazy<Vec<Regex>> = Lazy::new(|| {
    PREPOSITIONS
        .iter()
        .map(|p| Regex::new(&format!(r"(?i)\s+{}\s+", regex::escape(p))).expect("Invalid preposition regex"))
        .collect()
});

/// Minimum normalized length (exclusive) for a decomposed term.
const MIN_TERM_LENGTH: usize = 2;

/// Ordered set of sub-terms derived from one keyword.
///
/// Elements are unique by normalized form and every element normalizes to
/// more than two characters.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DecomposedTermSet {
    terms: Vec<String>,
    seen: HashSet<String>,
}

impl DecomposedTermSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a term, ignoring duplicates and terms that are too short.
    /// Returns true if the term was added.
    pub fn insert(&mut self, term: &str) -> bool {
        let cleaned = term.split_whitespace().collect::<Vec<_>>().join(" ");
        let normalized = normalize(&cleaned);
        if normalized.len() <= MIN_TERM_LENGTH || self.seen.contains(&normalized) {
            return false;
        }
        self.seen.insert(normalized);
        self.terms.push(cleaned);
        true
    }

    pub fn contains(&self, term: &str) -> bool {
        self.seen.contains(&normalize(term))
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.terms.iter().map(|s| s.as_str())
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn into_vec(self) -> Vec<String> {
        self.terms
    }
}

/// Decompose a requirement phrase into its candidate sub-terms.
pub fn decompose(phrase: &str) -> DecomposedTermSet {
    let mut result = DecomposedTermSet::new();
    let phrase = phrase.trim();
    if phrase.is_empty() {
        return result;
    }

    result.insert(phrase);

    // Parenthetical content is handled on its own; the rest of the pipeline
    // works on the phrase without it.
    let mut body = phrase.to_string();
    if let Some(caps) = PARENTHESES.captures(phrase) {
        let content = caps[1].trim();
        result.insert(content);
        for item in PARENTHESIS_ITEM_SEPARATOR.split(content).filter(|s| !s.is_empty()) {
            result.insert(item);
        }
        body = PARENTHESES_WITH_SPACING.replacen(phrase, 1, " ").trim().to_string();
        result.insert(&body);
    }

    let parts: Vec<String> = CONJUNCTION
        .replace_all(&body, ",")
        .split(',')
        .map(|p| p.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|p| !p.is_empty())
        .collect();

    let mut segments_seen: Vec<String> = Vec::new();
    for part in &parts {
        segments_seen.push(part.clone());
        segments_seen.extend(split_prepositions(part));
    }

    for segment in &segments_seen {
        result.insert(segment);
    }
    for segment in &segments_seen {
        for word in segment.split_whitespace() {
            result.insert(word);
        }
    }

    let normalized_phrase = normalize(phrase);
    for term in TECHNICAL_TERMS {
        if contains_term(&normalized_phrase, term) {
            result.insert(term);
            if term.contains(' ') {
                for word in term.split_whitespace() {
                    result.insert(word);
                }
            }
        }
    }

    result
}

/// Split a part on every preposition in turn, keeping each intermediate
/// generation of segments so "análise de dados" survives next to "análise"
/// and "dados".
fn split_prepositions(part: &str) -> Vec<String> {
    let mut accumulated = Vec::new();
    let mut segments = vec![part.to_string()];

    for splitter in PREPOSITION_SPLITTERS.iter() {
        if !segments.iter().any(|s| splitter.is_match(s)) {
            continue;
        }
        segments = segments
            .iter()
            .flat_map(|segment| {
                splitter
                    .split(segment)
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect::<Vec<_>>()
            })
            .collect();
        accumulated.extend(segments.iter().cloned());
    }

    accumulated
}
