//! Generic vs. specific requirement detection
//!
//! A résumé that says "Cloud" does not satisfy "Cloud AWS", and "Product
//! Owner" does not satisfy "Data Product Owner". This module finds such
//! pairs among the requirement terms and reports keywords that only matched
//! through their generic form.

use crate::processing::normalizer::{contains_term, normalize, ResumeDocument};
use crate::processing::terms::{SPECIFIC_FAMILIES, SPECIFIC_PATTERNS};

/// True if `candidate` is a qualified, more specific version of `baseline`.
pub fn is_specific_version_of(candidate: &str, baseline: &str) -> bool {
    let candidate = normalize(candidate);
    let baseline = normalize(baseline);

    if baseline.is_empty() || !candidate.contains(&baseline) || candidate == baseline {
        return false;
    }

    let candidate_words: Vec<&str> = candidate.split(' ').collect();
    let baseline_words: Vec<&str> = baseline.split(' ').collect();
    if candidate_words.len() <= baseline_words.len() {
        return false;
    }

    is_word_subsequence(&baseline_words, &candidate_words)
        || contains_term(&candidate, &baseline)
        || SPECIFIC_PATTERNS.iter().any(|p| p.is_match(&candidate))
}

/// Ordered, not necessarily contiguous, word containment.
fn is_word_subsequence(needle: &[&str], haystack: &[&str]) -> bool {
    let mut remaining = needle.iter().peekable();
    for word in haystack {
        if remaining.peek() == Some(&word) {
            remaining.next();
        }
    }
    remaining.peek().is_none()
}

/// The most generic term in `all_terms` that `term` specializes.
///
/// Candidates are tried shortest first (by normalized length); the term
/// itself is skipped.
pub fn find_generic_counterpart<'a, S: AsRef<str>>(term: &str, all_terms: &'a [S]) -> Option<&'a str> {
    let normalized_term = normalize(term);
    let mut candidates: Vec<(usize, &str)> = all_terms
        .iter()
        .map(|t| t.as_ref())
        .map(|t| (normalize(t).len(), t))
        .collect();
    candidates.sort_by_key(|(len, _)| *len);

    candidates
        .into_iter()
        .map(|(_, candidate)| candidate)
        .filter(|candidate| normalize(candidate) != normalized_term)
        .find(|candidate| is_specific_version_of(term, candidate))
}

/// Decide whether a keyword currently classified present is a false positive:
/// the résumé contains a generic form of it but not the keyword itself.
///
/// Returns the generic term responsible. Never flags a keyword whose own
/// normalized text appears in the résumé.
pub fn generic_only_match<S: AsRef<str>>(
    keyword: &str,
    all_terms: &[S],
    resume: &ResumeDocument,
) -> Option<String> {
    let normalized = normalize(keyword);
    if normalized.is_empty() || resume.contains_normalized(&normalized) {
        return None;
    }

    if let Some(generic) = find_generic_counterpart(keyword, all_terms) {
        if resume.contains(generic) {
            return Some(generic.to_string());
        }
    }

    SPECIFIC_FAMILIES
        .iter()
        .filter(|family| family.specific.iter().any(|s| contains_term(&normalized, s)))
        .find(|family| {
            resume.contains_normalized(family.generic)
                && !family.specific.iter().any(|s| resume.contains_normalized(s))
        })
        .map(|family| family.generic.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_qualified_role_is_specific() {
        assert!(is_specific_version_of("Data Product Owner", "product owner"));
        assert!(is_specific_version_of("Cloud AWS", "cloud"));
        assert!(is_specific_version_of("Gerente de Projetos Digitais", "gerente de projetos"));
        assert!(!is_specific_version_of("product owner", "Data Product Owner"));
    }

    #[test]
    fn test_equal_or_unrelated_terms_are_not_specific() {
        assert!(!is_specific_version_of("Product Owner", "product owner"));
        assert!(!is_specific_version_of("python", "java"));
        assert!(!is_specific_version_of("anything", ""));
    }

    #[test]
    fn test_partial_word_is_not_a_generic() {
        // "java" is a substring of "javascript developer" but not one of its words
        assert!(!is_specific_version_of("javascript developer", "java"));
    }

    #[test]
    fn test_non_contiguous_subsequence() {
        assert!(is_word_subsequence(&["gestao", "produtos"], &["gestao", "de", "produtos"]));
        assert!(!is_word_subsequence(&["produtos", "gestao"], &["gestao", "de", "produtos"]));
    }

    #[test]
    fn test_find_generic_prefers_shortest() {
        let terms = ["data product owner", "product owner", "owner", "python"];
        assert_eq!(find_generic_counterpart("data product owner", &terms), Some("owner"));
        assert_eq!(find_generic_counterpart("python", &terms), None);
        assert_eq!(find_generic_counterpart("owner", &terms), None);
    }

    #[test]
    fn test_generic_only_match() {
        let terms = ["product owner", "data product owner"];
        let resume = ResumeDocument::new("Atuei como Product Owner por 5 anos");
        assert_eq!(
            generic_only_match("data product owner", &terms, &resume),
            Some("product owner".to_string())
        );
        assert_eq!(generic_only_match("product owner", &terms, &resume), None);
    }

    #[test]
    fn test_exact_text_is_never_flagged() {
        let terms = ["product owner", "data product owner"];
        let resume = ResumeDocument::new("Data Product Owner e Product Owner");
        assert_eq!(generic_only_match("data product owner", &terms, &resume), None);
    }

    #[test]
    fn test_family_rule_without_generic_in_requirements() {
        let terms = ["Cloud AWS"];
        let resume = ResumeDocument::new("Experiência com cloud e containers");
        assert_eq!(generic_only_match("Cloud AWS", &terms, &resume), Some("cloud".to_string()));

        let resume = ResumeDocument::new("Experiência com cloud, Amazon Web Services");
        assert_eq!(generic_only_match("Cloud AWS", &terms, &resume), None);
    }
}
