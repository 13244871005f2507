//! Report structures wrapping a resolution for presentation

use crate::processing::ats_result::{AtsResult, ResultShape};
use crate::processing::keyword::{MatchResult, MatchSource};
use crate::processing::occurrence::KeywordOccurrence;
use crate::processing::pipeline::Resolution;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One résumé resolved against one ATS result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolutionReport {
    pub summary: ResolutionSummary,

    /// Per-keyword outcome with the evidence that decided it
    pub evidence: Vec<MatchResult>,

    /// The corrected ATS result, in the shape it arrived in
    pub result: AtsResult,

    pub metadata: ReportMetadata,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolutionSummary {
    pub match_percentage: u32,
    pub found: usize,
    pub total: usize,
    pub shape: ResultShape,
    /// Keywords the résumé matched only through a generic form or failed guard
    pub demoted: Vec<String>,
    /// Keywords confirmed by an exception rule rather than literal text
    pub inferred: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMetadata {
    pub generated_at: DateTime<Utc>,
    pub resolver_version: String,
    pub resume_file: String,
    pub result_file: String,
    pub equivalence_entries: usize,
    pub processing_time_ms: u64,
}

impl ResolutionReport {
    pub fn new(resolution: Resolution, metadata: ReportMetadata) -> Self {
        let demoted = resolution
            .evidence
            .iter()
            .filter(|m| !m.present && m.demoted_by.is_some())
            .map(|m| m.keyword.raw.clone())
            .collect();
        let inferred = resolution
            .evidence
            .iter()
            .filter(|m| m.present && matches!(m.source, Some(MatchSource::Exception | MatchSource::Context)))
            .map(|m| m.keyword.raw.clone())
            .collect();

        let summary = ResolutionSummary {
            match_percentage: resolution.match_percentage(),
            found: resolution.present_count(),
            total: resolution.total(),
            shape: resolution.shape,
            demoted,
            inferred,
        };

        Self {
            summary,
            evidence: resolution.evidence,
            result: resolution.result,
            metadata,
        }
    }

    pub fn found_keywords(&self) -> &[String] {
        &self.result.found_keywords
    }

    pub fn missing_keywords(&self) -> &[String] {
        &self.result.missing_keywords
    }
}

impl ReportMetadata {
    pub fn new(resume_file: impl Into<String>, result_file: impl Into<String>) -> Self {
        Self {
            generated_at: Utc::now(),
            resolver_version: env!("CARGO_PKG_VERSION").to_string(),
            resume_file: resume_file.into(),
            result_file: result_file.into(),
            equivalence_entries: 0,
            processing_time_ms: 0,
        }
    }

    pub fn with_table_size(mut self, entries: usize) -> Self {
        self.equivalence_entries = entries;
        self
    }

    pub fn with_processing_time(mut self, millis: u64) -> Self {
        self.processing_time_ms = millis;
        self
    }
}

/// Keyword ranking over a set of job postings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankingReport {
    pub generated_at: DateTime<Utc>,
    pub corpus_files: Vec<String>,
    pub occurrences: Vec<KeywordOccurrence>,
}

impl RankingReport {
    pub fn new(corpus_files: Vec<String>, occurrences: Vec<KeywordOccurrence>) -> Self {
        Self {
            generated_at: Utc::now(),
            corpus_files,
            occurrences,
        }
    }
}
