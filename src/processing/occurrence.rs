//! Keyword relevance ranking across a job-posting corpus

use crate::processing::normalizer::normalize;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordOccurrence {
    pub keyword: String,
    pub count: usize,
}

/// Singular/plural forms of a normalized term using the suffix-`s` rule:
/// a trailing `s` is dropped, otherwise one is appended.
///
/// This is deliberately naive for Portuguese; irregular plurals
/// ("profissional"/"profissionais") are not related to each other.
pub fn morphological_forms(normalized: &str) -> Vec<String> {
    if normalized.is_empty() {
        return Vec::new();
    }
    let alternate = match normalized.strip_suffix('s') {
        Some(stem) if !stem.is_empty() => stem.to_string(),
        Some(_) => return vec![normalized.to_string()],
        None => format!("{}s", normalized),
    };
    vec![normalized.to_string(), alternate]
}

/// Count whole-word occurrences of each keyword (and its singular/plural
/// form) in the corpus.
///
/// Keywords are deduplicated by normalized form. When spellings of the same
/// keyword differ, the first one under [`collate`] is reported, so the output
/// does not depend on input order. Output is sorted by count descending, ties
/// by accent- and case-insensitive alphabetical order.
pub fn count_occurrences<S: AsRef<str>>(keywords: &[S], corpus: &str) -> Vec<KeywordOccurrence> {
    let corpus = normalize(corpus);
    let mut spellings: HashMap<String, &str> = HashMap::new();

    for keyword in keywords {
        let keyword = keyword.as_ref().trim();
        let normalized = normalize(keyword);
        if normalized.is_empty() {
            continue;
        }
        spellings
            .entry(normalized)
            .and_modify(|kept| {
                if collate(keyword, *kept) == Ordering::Less {
                    *kept = keyword;
                }
            })
            .or_insert(keyword);
    }

    let mut ranked: Vec<KeywordOccurrence> = spellings
        .into_iter()
        .map(|(normalized, keyword)| {
            let count = morphological_forms(&normalized)
                .iter()
                .map(|form| count_whole_word(&corpus, form))
                .sum();
            KeywordOccurrence {
                keyword: keyword.to_string(),
                count,
            }
        })
        .collect();

    ranked.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| collate(&a.keyword, &b.keyword)));
    ranked
}

fn count_whole_word(corpus: &str, form: &str) -> usize {
    match Regex::new(&format!(r"(?i)\b{}\b", regex::escape(form))) {
        Ok(re) => re.find_iter(corpus).count(),
        Err(e) => {
            log::warn!("Skipping unmatchable keyword form '{}': {}", form, e);
            0
        }
    }
}

/// Alphabetical order that ignores case and diacritics first, falling back to
/// the raw strings so the order stays total.
pub fn collate(a: &str, b: &str) -> Ordering {
    normalize(a).cmp(&normalize(b)).then_with(|| a.cmp(b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_keywords_are_counted_once() {
        let ranked = count_occurrences(&["python", "python"], "python python java");
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0], KeywordOccurrence { keyword: "python".to_string(), count: 2 });
    }

    #[test]
    fn test_ranking_order() {
        let ranked = count_occurrences(&["java", "python", "sql"], "python python java sql");
        let order: Vec<_> = ranked.iter().map(|o| o.keyword.as_str()).collect();
        assert_eq!(order, vec!["python", "java", "sql"]);
        assert_eq!(ranked[1].count, 1);
        assert_eq!(ranked[2].count, 1);
    }

    #[test]
    fn test_singular_and_plural_forms_are_summed() {
        let ranked = count_occurrences(&["Dashboards"], "Criação de dashboard. Vários dashboards!");
        assert_eq!(ranked[0].count, 2);

        let ranked = count_occurrences(&["relatório"], "Relatórios gerenciais e relatório mensal");
        assert_eq!(ranked[0].count, 2);
    }

    #[test]
    fn test_whole_word_matching() {
        let ranked = count_occurrences(&["java"], "javascript and typescript");
        assert_eq!(ranked[0].count, 0);
    }

    #[test]
    fn test_order_invariance() {
        let corpus = "scrum kanban scrum agile";
        let a = count_occurrences(&["agile", "kanban", "scrum"], corpus);
        let b = count_occurrences(&["scrum", "agile", "kanban"], corpus);
        assert_eq!(a, b);
        assert_eq!(a[0].keyword, "scrum");

        let a = count_occurrences(&["Python", "python"], "python");
        let b = count_occurrences(&["python", "Python"], "python");
        assert_eq!(a, b);
        assert_eq!(a, vec![KeywordOccurrence { keyword: "Python".to_string(), count: 1 }]);

        let a = count_occurrences(&["Comunicação", "comunicacao"], "comunicação");
        let b = count_occurrences(&["comunicacao", "Comunicação"], "comunicação");
        assert_eq!(a, b);
        assert_eq!(a[0].keyword, "Comunicação");
    }

    #[test]
    fn test_accent_insensitive_tie_break() {
        let ranked = count_occurrences(&["Ética", "comunicação", "agilidade"], "");
        let order: Vec<_> = ranked.iter().map(|o| o.keyword.as_str()).collect();
        assert_eq!(order, vec!["agilidade", "comunicação", "Ética"]);
    }

    #[test]
    fn test_irregular_plural_is_a_known_limitation() {
        // "profissionais" is not the suffix-s plural of "profissional".
        let ranked = count_occurrences(&["profissional"], "profissionais qualificados");
        assert_eq!(ranked[0].count, 0);
        assert_eq!(morphological_forms("profissional"), vec!["profissional", "profissionals"]);
    }
}
