//! Requirement keywords and their per-stage classification

use crate::processing::normalizer::normalize;
use log::debug;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeywordCategory {
    HardSkill,
    SoftSkill,
    Responsibility,
    Differential,
    Filter,
}

/// A requirement phrase as extracted from a job posting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Keyword {
    pub raw: String,
    pub normalized: String,
    pub category: Option<KeywordCategory>,
}

impl Keyword {
    pub fn new(raw: impl Into<String>, category: Option<KeywordCategory>) -> Self {
        let raw = raw.into().trim().to_string();
        let normalized = normalize(&raw);
        Self { raw, normalized, category }
    }
}

/// Where the evidence for a present keyword came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchSource {
    /// Trusted from the upstream classification, not re-verified.
    Upstream,
    Direct,
    Decomposition,
    Equivalence,
    Context,
    Exception,
}

impl fmt::Display for MatchSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MatchSource::Upstream => "upstream",
            MatchSource::Direct => "direct",
            MatchSource::Decomposition => "decomposition",
            MatchSource::Equivalence => "equivalence",
            MatchSource::Context => "context",
            MatchSource::Exception => "exception",
        };
        write!(f, "{}", name)
    }
}

/// Per-keyword outcome of a pipeline run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub keyword: Keyword,
    pub present: bool,
    pub source: Option<MatchSource>,
    /// The variant or equivalent that matched, for debugging.
    pub evidence: Option<String>,
    /// Set when a correction stage removed a match; names the generic term
    /// or rule responsible.
    pub demoted_by: Option<String>,
}

impl MatchResult {
    pub fn missing(keyword: Keyword) -> Self {
        Self {
            keyword,
            present: false,
            source: None,
            evidence: None,
            demoted_by: None,
        }
    }

    pub fn upstream(keyword: Keyword) -> Self {
        Self {
            present: true,
            source: Some(MatchSource::Upstream),
            ..Self::missing(keyword)
        }
    }

    /// True while the keyword has no evidence found by this engine.
    pub fn needs_evidence(&self) -> bool {
        !self.present || self.source == Some(MatchSource::Upstream)
    }

    pub fn promote(self, stage: &str, source: MatchSource, evidence: impl Into<String>) -> Self {
        let evidence = evidence.into();
        if !self.present {
            debug!("[{}] '{}' -> present ({} via '{}')", stage, self.keyword.raw, source, evidence);
        }
        Self {
            present: true,
            source: Some(source),
            evidence: Some(evidence),
            demoted_by: None,
            ..self
        }
    }

    pub fn demote(self, stage: &str, reason: impl Into<String>) -> Self {
        let reason = reason.into();
        if self.present {
            debug!("[{}] '{}' -> missing (only '{}' matched)", stage, self.keyword.raw, reason);
        }
        Self {
            present: false,
            source: None,
            evidence: None,
            demoted_by: Some(reason),
            ..self
        }
    }
}

/// The working state threaded through the pipeline stages.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    pub results: Vec<MatchResult>,
}

impl Classification {
    pub fn new(results: Vec<MatchResult>) -> Self {
        Self { results }
    }

    /// Apply `f` to every result, producing the next state.
    pub fn map(self, f: impl FnMut(MatchResult) -> MatchResult) -> Self {
        Self {
            results: self.results.into_iter().map(f).collect(),
        }
    }

    pub fn terms(&self) -> Vec<String> {
        self.results.iter().map(|r| r.keyword.raw.clone()).collect()
    }

    pub fn present(&self) -> Vec<String> {
        self.results
            .iter()
            .filter(|r| r.present)
            .map(|r| r.keyword.raw.clone())
            .collect()
    }

    pub fn missing(&self) -> Vec<String> {
        self.results
            .iter()
            .filter(|r| !r.present)
            .map(|r| r.keyword.raw.clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn get(&self, keyword: &str) -> Option<&MatchResult> {
        let normalized = normalize(keyword);
        self.results.iter().find(|r| r.keyword.normalized == normalized)
    }
}
