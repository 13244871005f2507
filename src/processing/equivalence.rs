//! Table-driven synonym resolution
//!
//! The table maps a canonical requirement term to the alternate phrasings
//! that satisfy it. It is domain data: the default ships in
//! `assets/equivalences.toml` and can be replaced by a file at runtime.
//! Once built, a table is immutable and shared behind an `Arc`.

use crate::error::{Result, ResolverError};
use crate::input::file_detector::FileType;
use crate::processing::normalizer::{contains_term, normalize, pad};
use aho_corasick::{AhoCorasick, MatchKind};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::path::Path;
use std::sync::Arc;

const EMBEDDED_TABLE: &str = include_str!("../../assets/equivalences.toml");

static BUILTIN: Lazy<Arc<EquivalenceTable>> = Lazy::new(|| {
    Arc::new(EquivalenceTable::from_toml_str(EMBEDDED_TABLE).expect("Embedded equivalence table is invalid"))
});

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquivalenceEntry {
    pub canonical: String,
    pub equivalents: Vec<String>,
}

/// How an equivalence hit was reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EquivalenceDirection {
    /// A canonical term embedded in the keyword; one of its equivalents is in the résumé.
    Forward,
    /// The keyword is itself a listed equivalent; its canonical term is in the résumé.
    Reverse,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquivalenceHit {
    pub canonical: String,
    pub matched: String,
    pub direction: EquivalenceDirection,
}

#[derive(Deserialize)]
struct TableFile {
    equivalences: BTreeMap<String, Vec<String>>,
}

/// Equivalents found in one résumé, as `(entry, equivalent)` indexes.
#[derive(Debug, Clone, Default)]
pub struct PresentEquivalents(HashSet<(usize, usize)>);

impl PresentEquivalents {
    pub fn contains(&self, entry: usize, equivalent: usize) -> bool {
        self.0.contains(&(entry, equivalent))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Immutable canonical → equivalents map with a multi-pattern matcher over
/// every equivalent.
pub struct EquivalenceTable {
    entries: Vec<EquivalenceEntry>,
    matcher: AhoCorasick,
    pattern_owners: Vec<(usize, usize)>,
}

impl std::fmt::Debug for EquivalenceTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EquivalenceTable")
            .field("entries", &self.entries.len())
            .field("patterns", &self.pattern_owners.len())
            .finish()
    }
}

impl EquivalenceTable {
    /// The default table compiled into the binary.
    pub fn builtin() -> Arc<EquivalenceTable> {
        Arc::clone(&BUILTIN)
    }

    /// Build a table from raw (un-normalized) canonical terms and equivalents.
    /// Canonical terms that collapse to the same normalized form are merged.
    pub fn from_map(map: BTreeMap<String, Vec<String>>) -> Result<Self> {
        let mut merged: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for (canonical, equivalents) in map {
            let canonical = normalize(&canonical);
            if canonical.is_empty() {
                continue;
            }
            let slot = merged.entry(canonical).or_default();
            for equivalent in equivalents {
                let equivalent = normalize(&equivalent);
                if !equivalent.is_empty() && !slot.contains(&equivalent) {
                    slot.push(equivalent);
                }
            }
        }

        let entries: Vec<EquivalenceEntry> = merged
            .into_iter()
            .map(|(canonical, equivalents)| EquivalenceEntry { canonical, equivalents })
            .collect();

        let mut patterns = Vec::new();
        let mut pattern_owners = Vec::new();
        for (entry_idx, entry) in entries.iter().enumerate() {
            for (eq_idx, equivalent) in entry.equivalents.iter().enumerate() {
                patterns.push(pad(equivalent));
                pattern_owners.push((entry_idx, eq_idx));
            }
        }

        let matcher = AhoCorasick::builder()
            .match_kind(MatchKind::Standard)
            .build(&patterns)
            .map_err(|e| ResolverError::EquivalenceTable(format!("Failed to build equivalence matcher: {}", e)))?;

        Ok(Self {
            entries,
            matcher,
            pattern_owners,
        })
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let file: TableFile = toml::from_str(content)
            .map_err(|e| ResolverError::EquivalenceTable(format!("Failed to parse TOML table: {}", e)))?;
        Self::from_map(file.equivalences)
    }

    /// Accepts either `{"equivalences": {...}}` or a bare object of arrays.
    pub fn from_json_str(content: &str) -> Result<Self> {
        let value: serde_json::Value = serde_json::from_str(content)?;
        let object = value.get("equivalences").cloned().unwrap_or(value);
        let map: BTreeMap<String, Vec<String>> = serde_json::from_value(object)
            .map_err(|e| ResolverError::EquivalenceTable(format!("Invalid JSON table: {}", e)))?;
        Self::from_map(map)
    }

    /// Load a table from a `.toml` or `.json` file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let extension = path.extension().and_then(|e| e.to_str()).unwrap_or_default();
        match FileType::from_extension(extension) {
            FileType::Toml => Self::from_toml_str(&content),
            FileType::Json => Self::from_json_str(&content),
            _ => Err(ResolverError::UnsupportedFormat(format!(
                "Equivalence table must be .toml or .json: {}",
                path.display()
            ))),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Equivalents listed for a canonical term, if any.
    pub fn equivalents_of(&self, canonical: &str) -> Option<&[String]> {
        let canonical = normalize(canonical);
        self.entries
            .iter()
            .find(|e| e.canonical == canonical)
            .map(|e| e.equivalents.as_slice())
    }

    /// Find every equivalent present in a normalized résumé in one pass.
    pub fn scan(&self, resume_normalized: &str) -> PresentEquivalents {
        let haystack = pad(resume_normalized);
        let found = self
            .matcher
            .find_overlapping_iter(&haystack)
            .map(|m| self.pattern_owners[m.pattern().as_usize()])
            .collect();
        PresentEquivalents(found)
    }

    /// Resolve a normalized keyword against a résumé already scanned with
    /// [`scan`](Self::scan).
    ///
    /// Forward: any canonical term contained in the keyword whose equivalent
    /// is present, the keyword's own entry first. Reverse: the keyword equals
    /// a listed equivalent and that entry's canonical term is present.
    pub fn lookup(
        &self,
        keyword_normalized: &str,
        resume_normalized: &str,
        present: &PresentEquivalents,
    ) -> Option<EquivalenceHit> {
        self.lookup_filtered(keyword_normalized, resume_normalized, present, |_| true)
    }

    /// Like [`lookup`](Self::lookup), restricted to entries whose canonical
    /// term passes `accept`.
    pub fn lookup_filtered(
        &self,
        keyword_normalized: &str,
        resume_normalized: &str,
        present: &PresentEquivalents,
        accept: impl Fn(&str) -> bool,
    ) -> Option<EquivalenceHit> {
        if keyword_normalized.is_empty() {
            return None;
        }

        let own_entry = self
            .entries
            .iter()
            .enumerate()
            .filter(|(_, entry)| entry.canonical == keyword_normalized);
        let embedded = self.entries.iter().enumerate().filter(|(_, entry)| {
            entry.canonical != keyword_normalized && contains_term(keyword_normalized, &entry.canonical)
        });

        for (entry_idx, entry) in own_entry.chain(embedded) {
            if !accept(&entry.canonical) {
                continue;
            }
            let matched = entry
                .equivalents
                .iter()
                .enumerate()
                .find(|(eq_idx, _)| present.contains(entry_idx, *eq_idx));
            if let Some((_, equivalent)) = matched {
                return Some(EquivalenceHit {
                    canonical: entry.canonical.clone(),
                    matched: equivalent.clone(),
                    direction: EquivalenceDirection::Forward,
                });
            }
        }

        self.entries
            .iter()
            .find(|entry| {
                accept(&entry.canonical)
                    && entry.equivalents.iter().any(|e| e == keyword_normalized)
                    && contains_term(resume_normalized, &entry.canonical)
            })
            .map(|entry| EquivalenceHit {
                canonical: entry.canonical.clone(),
                matched: entry.canonical.clone(),
                direction: EquivalenceDirection::Reverse,
            })
    }
}

/// True if the keyword is satisfied through the table by the résumé text.
pub fn resolve_against_resume(keyword: &str, resume_normalized: &str, table: &EquivalenceTable) -> bool {
    let present = table.scan(resume_normalized);
    table
        .lookup(&normalize(keyword), resume_normalized, &present)
        .is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(entries: &[(&str, &[&str])]) -> EquivalenceTable {
        let map = entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.iter().map(|s| s.to_string()).collect()))
            .collect();
        EquivalenceTable::from_map(map).unwrap()
    }

    #[test]
    fn test_builtin_table_loads() {
        let builtin = EquivalenceTable::builtin();
        assert!(builtin.len() > 40);
        let po = builtin.equivalents_of("Product Owner").unwrap();
        assert!(po.contains(&"pspo".to_string()));
        // Keys are normalized on load
        assert!(builtin.equivalents_of("pos graduacao").is_some());
    }

    #[test]
    fn test_scrum_master_matches_psm() {
        let t = table(&[("scrum master", &["psm", "psm i"])]);
        assert!(resolve_against_resume("Scrum Master", &normalize("PSM I certified"), &t));
        assert!(!resolve_against_resume("Scrum Master", &normalize("Product owner"), &t));
    }

    #[test]
    fn test_embedded_canonical_term() {
        let t = EquivalenceTable::builtin();
        let resume = normalize("Certificação PSPO I (Scrum.org)");
        assert!(resolve_against_resume("Certificação em Product Owner", &resume, &t));
    }

    #[test]
    fn test_equivalents_respect_word_boundaries() {
        let t = table(&[("product owner", &["po"])]);
        assert!(!resolve_against_resume("Product Owner", &normalize("Power user, postgres"), &t));
        assert!(resolve_against_resume("Product Owner", &normalize("Atuei como PO"), &t));
    }

    #[test]
    fn test_reverse_lookup() {
        let t = table(&[("product owner", &["pspo"])]);
        let resume = normalize("Product Owner na empresa X");
        let present = t.scan(&resume);
        let hit = t.lookup("pspo", &resume, &present).unwrap();
        assert_eq!(hit.direction, EquivalenceDirection::Reverse);
        assert_eq!(hit.canonical, "product owner");
    }

    #[test]
    fn test_own_entry_is_tried_first() {
        let t = table(&[("product owner", &["pspo"]), ("data product owner", &["po de dados", "pspo"])]);
        let resume = normalize("PSPO I, PO de dados");
        let present = t.scan(&resume);
        let hit = t.lookup("data product owner", &resume, &present).unwrap();
        assert_eq!(hit.canonical, "data product owner");
        assert_eq!(hit.matched, "po de dados");

        let filtered = t.lookup_filtered("data product owner", &resume, &present, |c| c == "product owner");
        assert_eq!(filtered.unwrap().canonical, "product owner");
    }

    #[test]
    fn test_overlapping_equivalents_are_all_reported() {
        let t = table(&[("scrum master", &["psm", "psm i"])]);
        let present = t.scan(&normalize("psm i"));
        assert_eq!(present.len(), 2);
    }

    #[test]
    fn test_table_formats() {
        let toml = "[equivalences]\n\"Inglês Fluente\" = [\"English Fluent\"]\n";
        let t = EquivalenceTable::from_toml_str(toml).unwrap();
        assert_eq!(t.equivalents_of("ingles fluente").unwrap(), &["english fluent".to_string()]);

        let json = r#"{"equivalences": {"sql": ["MySQL", "PostgreSQL"]}}"#;
        let t = EquivalenceTable::from_json_str(json).unwrap();
        assert_eq!(t.equivalents_of("sql").unwrap().len(), 2);

        let bare = r#"{"sql": ["mysql"]}"#;
        assert_eq!(EquivalenceTable::from_json_str(bare).unwrap().len(), 1);

        assert!(EquivalenceTable::from_toml_str("equivalences = 3").is_err());
    }

    #[test]
    fn test_merges_canonicals_that_normalize_equal() {
        let t = table(&[("pós-graduação", &["mba"]), ("pos graduacao", &["especializacao", "MBA"])]);
        assert_eq!(t.len(), 1);
        assert_eq!(t.equivalents_of("pos graduacao").unwrap().len(), 2);
    }
}
