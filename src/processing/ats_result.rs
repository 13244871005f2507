//! The ATS result object exchanged with the upstream extraction step
//!
//! Deserialization is lenient: a field of the wrong type is treated as
//! absent or empty instead of failing the whole document, and fields this
//! crate does not model are carried through untouched.

use crate::processing::keyword::{Keyword, KeywordCategory};
use crate::processing::normalizer::normalize;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::HashSet;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HardSkills {
    #[serde(default, deserialize_with = "lenient_strings")]
    pub tecnicos: Vec<String>,
    #[serde(default, deserialize_with = "lenient_strings")]
    pub formacao: Vec<String>,
    #[serde(default, deserialize_with = "lenient_strings")]
    pub idiomas: Vec<String>,
    #[serde(default, deserialize_with = "lenient_strings")]
    pub experiencia: Vec<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SoftSkills {
    #[serde(default, deserialize_with = "lenient_strings")]
    pub comportamental: Vec<String>,
    #[serde(default, deserialize_with = "lenient_strings")]
    pub gestao: Vec<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

/// Which of the two upstream layouts a result uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResultShape {
    /// Flat `job_keywords` / `found_keywords` / `missing_keywords` lists.
    Legacy,
    /// Categorised requirement arrays (`hard_skills`, `soft_skills`, ...).
    Structured,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AtsResult {
    #[serde(default, deserialize_with = "lenient_strings")]
    pub job_keywords: Vec<String>,
    #[serde(default, deserialize_with = "lenient_strings")]
    pub found_keywords: Vec<String>,
    #[serde(default, deserialize_with = "lenient_strings")]
    pub missing_keywords: Vec<String>,
    #[serde(default, deserialize_with = "lenient_strings")]
    pub job_keywords_present: Vec<String>,
    #[serde(default, deserialize_with = "lenient_strings")]
    pub job_keywords_missing: Vec<String>,

    #[serde(default, deserialize_with = "lenient_optional_strings", skip_serializing_if = "Option::is_none")]
    pub resume_keywords_present: Option<Vec<String>>,
    #[serde(default, deserialize_with = "lenient_optional_strings", skip_serializing_if = "Option::is_none")]
    pub resume_keywords_missing: Option<Vec<String>>,

    #[serde(default, deserialize_with = "lenient_object", skip_serializing_if = "Option::is_none")]
    pub hard_skills: Option<HardSkills>,
    #[serde(default, deserialize_with = "lenient_object", skip_serializing_if = "Option::is_none")]
    pub soft_skills: Option<SoftSkills>,
    #[serde(default, deserialize_with = "lenient_optional_strings", skip_serializing_if = "Option::is_none")]
    pub responsabilidades: Option<Vec<String>>,
    #[serde(default, deserialize_with = "lenient_optional_strings", skip_serializing_if = "Option::is_none")]
    pub diferenciais: Option<Vec<String>>,
    #[serde(default, deserialize_with = "lenient_optional_strings", skip_serializing_if = "Option::is_none")]
    pub filtros_eliminatorios: Option<Vec<String>>,
    #[serde(default, deserialize_with = "lenient_optional_strings", skip_serializing_if = "Option::is_none")]
    pub filtros_classificatorios: Option<Vec<String>>,

    #[serde(default, deserialize_with = "lenient_recommendations")]
    pub recommendations: Vec<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub conclusion: String,

    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

impl AtsResult {
    /// Parse a result, tolerating wrong-typed fields.
    pub fn from_json_str(content: &str) -> crate::error::Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    pub fn to_json_pretty(&self) -> crate::error::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn legacy(job_keywords: Vec<String>, found_keywords: Vec<String>, missing_keywords: Vec<String>) -> Self {
        Self {
            job_keywords,
            found_keywords,
            missing_keywords,
            ..Self::default()
        }
    }

    pub fn shape(&self) -> ResultShape {
        let structured = self.hard_skills.is_some()
            || self.soft_skills.is_some()
            || self.responsabilidades.is_some()
            || self.diferenciais.is_some()
            || self.filtros_eliminatorios.is_some()
            || self.filtros_classificatorios.is_some();
        if structured {
            ResultShape::Structured
        } else {
            ResultShape::Legacy
        }
    }

    /// Every requirement keyword, unique by normalized form, first spelling
    /// kept.
    ///
    /// Legacy results draw from `job_keywords`, then `found_keywords`, then
    /// `missing_keywords`. Structured results draw from the category arrays.
    pub fn keyword_universe(&self) -> Vec<Keyword> {
        let mut seen = HashSet::new();
        let mut universe = Vec::new();
        for (raw, category) in self.raw_keywords() {
            let keyword = Keyword::new(raw, category);
            if !keyword.normalized.is_empty() && seen.insert(keyword.normalized.clone()) {
                universe.push(keyword);
            }
        }
        universe
    }

    fn raw_keywords(&self) -> Vec<(&str, Option<KeywordCategory>)> {
        fn tagged(list: &[String], category: Option<KeywordCategory>) -> impl Iterator<Item = (&str, Option<KeywordCategory>)> {
            list.iter().map(move |k| (k.as_str(), category))
        }

        match self.shape() {
            ResultShape::Legacy => tagged(&self.job_keywords, None)
                .chain(tagged(&self.found_keywords, None))
                .chain(tagged(&self.missing_keywords, None))
                .collect(),
            ResultShape::Structured => {
                let mut raw = Vec::new();
                if let Some(hard) = &self.hard_skills {
                    for list in [&hard.tecnicos, &hard.formacao, &hard.idiomas, &hard.experiencia] {
                        raw.extend(tagged(list, Some(KeywordCategory::HardSkill)));
                    }
                }
                if let Some(soft) = &self.soft_skills {
                    for list in [&soft.comportamental, &soft.gestao] {
                        raw.extend(tagged(list, Some(KeywordCategory::SoftSkill)));
                    }
                }
                let sections = [
                    (&self.responsabilidades, KeywordCategory::Responsibility),
                    (&self.diferenciais, KeywordCategory::Differential),
                    (&self.filtros_eliminatorios, KeywordCategory::Filter),
                    (&self.filtros_classificatorios, KeywordCategory::Filter),
                ];
                for (list, category) in sections {
                    if let Some(list) = list {
                        raw.extend(tagged(list, Some(category)));
                    }
                }
                raw
            }
        }
    }

    /// Normalized forms the upstream step already classified as present.
    /// Only the legacy shape carries a trusted classification.
    pub fn upstream_present(&self) -> HashSet<String> {
        match self.shape() {
            ResultShape::Legacy => self.found_keywords.iter().map(|k| normalize(k)).collect(),
            ResultShape::Structured => HashSet::new(),
        }
    }

    /// Fraction of the keyword universe classified present, in percent.
    pub fn match_percentage(&self) -> u32 {
        percentage(self.found_keywords.len(), self.found_keywords.len() + self.missing_keywords.len())
    }
}

/// `round(100 * found / total)`, zero when there is nothing to match.
pub fn percentage(found: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    ((found as f64 / total as f64) * 100.0).round() as u32
}

fn strings_from(value: Value) -> Vec<String> {
    match value {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    }
}

fn lenient_strings<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    Ok(strings_from(Value::deserialize(deserializer)?))
}

fn lenient_optional_strings<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Vec<String>>, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(None),
        value @ Value::Array(_) => Ok(Some(strings_from(value))),
        _ => Ok(Some(Vec::new())),
    }
}

fn lenient_object<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: serde::de::DeserializeOwned,
{
    match Value::deserialize(deserializer)? {
        value @ Value::Object(_) => Ok(serde_json::from_value(value).ok()),
        _ => Ok(None),
    }
}

/// Upstream sometimes sends a single recommendation as a bare string.
fn lenient_recommendations<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::String(s) if !s.trim().is_empty() => Ok(vec![s]),
        value => Ok(strings_from(value)),
    }
}

fn lenient_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        _ => Ok(String::new()),
    }
}
