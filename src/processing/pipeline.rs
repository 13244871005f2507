//! Post-processing pipeline over an upstream ATS result
//!
//! The pipeline is a fold over a [`Classification`]: every stage takes the
//! previous state by value and returns the next one. Later stages win when
//! two stages disagree about a keyword.

use crate::processing::ats_result::{percentage, AtsResult, ResultShape};
use crate::processing::decomposer::{decompose, DecomposedTermSet};
use crate::processing::equivalence::{EquivalenceHit, EquivalenceTable, PresentEquivalents};
use crate::processing::exceptions::ExceptionRuleSet;
use crate::processing::keyword::{Classification, MatchResult, MatchSource};
use crate::processing::normalizer::{contains_term, normalize, ResumeDocument};
use crate::processing::occurrence::morphological_forms;
use crate::processing::specificity::{generic_only_match, is_specific_version_of};
use crate::processing::terms::{is_connector, SOFT_SKILL_INDICATORS};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

pub const DEFAULT_CONTEXT_WINDOW: usize = 50;

pub const FALLBACK_RECOMMENDATIONS: [&str; 3] = [
    "Incluir palavras-chave relevantes da vaga no currículo",
    "Destacar experiências relacionadas às competências exigidas na vaga",
    "Personalizar o currículo para cada vaga específica",
];

/// Templated conclusion used when upstream did not provide one.
pub fn fallback_conclusion(found: usize, total: usize) -> String {
    format!(
        "O currículo apresenta {}% de aderência às palavras-chave da vaga. Foram encontradas {} de {} palavras-chave.",
        percentage(found, total),
        found,
        total
    )
}

/// Output of one pipeline run: the corrected result plus per-keyword evidence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resolution {
    pub result: AtsResult,
    pub shape: ResultShape,
    pub evidence: Vec<MatchResult>,
}

impl Resolution {
    pub fn present_count(&self) -> usize {
        self.evidence.iter().filter(|m| m.present).count()
    }

    pub fn total(&self) -> usize {
        self.evidence.len()
    }

    pub fn match_percentage(&self) -> u32 {
        percentage(self.present_count(), self.total())
    }
}

/// Per-run data shared by the stages.
struct StageContext {
    resume: ResumeDocument,
    variants: HashMap<String, DecomposedTermSet>,
    equivalents: PresentEquivalents,
    terms: Vec<String>,
}

pub struct ResolutionPipeline {
    table: Arc<EquivalenceTable>,
    rules: ExceptionRuleSet,
}

impl ResolutionPipeline {
    pub fn new(table: Arc<EquivalenceTable>, context_window: usize) -> Self {
        Self {
            table,
            rules: ExceptionRuleSet::standard(context_window),
        }
    }

    pub fn with_rules(table: Arc<EquivalenceTable>, rules: ExceptionRuleSet) -> Self {
        Self { table, rules }
    }

    pub fn table(&self) -> &EquivalenceTable {
        &self.table
    }

    /// Reclassify every requirement keyword of `result` against the résumé.
    ///
    /// Never fails: malformed input has already been reduced to empty lists
    /// by [`AtsResult`] deserialization.
    pub fn run(&self, result: AtsResult, resume_text: &str) -> Resolution {
        let shape = result.shape();
        let resume = ResumeDocument::new(resume_text);
        let universe = result.keyword_universe();
        info!(
            "Resolving {} keywords ({:?} shape) against a {}-word résumé",
            universe.len(),
            shape,
            resume.word_count()
        );

        // An empty résumé cannot confirm anything, upstream claims included.
        let upstream = if resume.is_empty() {
            Default::default()
        } else {
            result.upstream_present()
        };

        let seeded = Classification::new(
            universe
                .into_iter()
                .map(|keyword| {
                    if upstream.contains(&keyword.normalized) {
                        MatchResult::upstream(keyword)
                    } else {
                        MatchResult::missing(keyword)
                    }
                })
                .collect(),
        );

        let ctx = self.decompose_stage(&seeded, resume);
        let classification = self.direct_match(seeded, &ctx);
        let classification = self.equivalence_match(classification, &ctx);
        let classification = self.contextual_soft_skill_match(classification, &ctx);
        let classification = self.specificity_correction(classification, &ctx);
        let classification = self.rules.apply(classification, &ctx.resume);

        let result = self.finalize(result, &classification, shape);
        info!(
            "Resolved: {} of {} keywords present",
            result.found_keywords.len(),
            classification.len()
        );

        Resolution {
            result,
            shape,
            evidence: classification.results,
        }
    }

    fn decompose_stage(&self, classification: &Classification, resume: ResumeDocument) -> StageContext {
        let variants = classification
            .results
            .iter()
            .map(|r| (r.keyword.normalized.clone(), decompose(&r.keyword.raw)))
            .collect();
        let equivalents = self.table.scan(&resume.normalized);
        debug!("{} equivalence patterns present in résumé", equivalents.len());

        StageContext {
            resume,
            variants,
            equivalents,
            terms: classification.terms(),
        }
    }

    fn direct_match(&self, classification: Classification, ctx: &StageContext) -> Classification {
        classification.map(|result| {
            if !result.needs_evidence() {
                return result;
            }

            let form = morphological_forms(&result.keyword.normalized)
                .into_iter()
                .find(|form| ctx.resume.contains_normalized(form));
            if let Some(form) = form {
                return result.promote("direct", MatchSource::Direct, form);
            }

            let variant = ctx.variants.get(&result.keyword.normalized).and_then(|set| {
                set.iter()
                    .map(normalize)
                    .filter(|v| !v.split(' ').all(is_connector))
                    .find(|v| ctx.resume.contains_normalized(v))
            });
            match variant {
                Some(variant) => result.promote("direct", MatchSource::Decomposition, variant),
                None => result,
            }
        })
    }

    /// Also runs on decomposition matches so a specific equivalent can back
    /// them up before the specificity check.
    fn equivalence_match(&self, classification: Classification, ctx: &StageContext) -> Classification {
        classification.map(|result| {
            if !result.needs_evidence() && result.source != Some(MatchSource::Decomposition) {
                return result;
            }
            let hit = self
                .table
                .lookup(&result.keyword.normalized, &ctx.resume.normalized, &ctx.equivalents);
            match hit {
                Some(hit) => result.promote("equivalence", MatchSource::Equivalence, hit.matched),
                None => result,
            }
        })
    }

    /// Soft skills are hard to verify literally, so a looser indicator word
    /// anywhere in the résumé is enough.
    fn contextual_soft_skill_match(&self, classification: Classification, ctx: &StageContext) -> Classification {
        classification.map(|result| {
            if !result.needs_evidence() {
                return result;
            }
            let indicator = SOFT_SKILL_INDICATORS
                .iter()
                .filter(|(skill, _)| contains_term(&result.keyword.normalized, skill))
                .flat_map(|(_, indicators)| indicators.iter())
                .find(|indicator| ctx.resume.normalized.contains(*indicator));
            match indicator {
                Some(indicator) => result.promote("soft-skill", MatchSource::Context, *indicator),
                None => result,
            }
        })
    }

    fn specificity_correction(&self, classification: Classification, ctx: &StageContext) -> Classification {
        classification.map(|result| {
            if !result.present {
                return result;
            }
            let Some(generic) = generic_only_match(&result.keyword.raw, &ctx.terms, &ctx.resume) else {
                return result;
            };
            if self.specific_equivalent(&result.keyword.normalized, ctx).is_some() {
                debug!("[specificity] keeping '{}': specific equivalent present", result.keyword.raw);
                return result;
            }
            result.demote("specificity", generic)
        })
    }

    /// An equivalence hit that speaks for the keyword itself rather than for
    /// a generic term embedded in it.
    fn specific_equivalent(&self, keyword_normalized: &str, ctx: &StageContext) -> Option<EquivalenceHit> {
        self.table.lookup_filtered(
            keyword_normalized,
            &ctx.resume.normalized,
            &ctx.equivalents,
            |canonical| !is_specific_version_of(keyword_normalized, canonical),
        )
    }

    /// Write the partitions back, keep the legacy aliases in sync and fill in
    /// missing recommendations and conclusion.
    fn finalize(&self, mut result: AtsResult, classification: &Classification, shape: ResultShape) -> AtsResult {
        let found = classification.present();
        let missing = classification.missing();

        result.job_keywords = classification.terms();
        result.job_keywords_present = found.clone();
        result.job_keywords_missing = missing.clone();
        if shape == ResultShape::Structured || result.resume_keywords_present.is_some() {
            result.resume_keywords_present = Some(found.clone());
            result.resume_keywords_missing = Some(missing.clone());
        }

        result.recommendations.retain(|r| !r.trim().is_empty());
        if result.recommendations.is_empty() {
            debug!("No upstream recommendations, using fallback list");
            result.recommendations = FALLBACK_RECOMMENDATIONS.iter().map(|r| r.to_string()).collect();
        }
        if result.conclusion.trim().is_empty() {
            debug!("No upstream conclusion, using template");
            result.conclusion = fallback_conclusion(found.len(), classification.len());
        }

        result.found_keywords = found;
        result.missing_keywords = missing;
        result
    }
}

impl Default for ResolutionPipeline {
    fn default() -> Self {
        Self::new(EquivalenceTable::builtin(), DEFAULT_CONTEXT_WINDOW)
    }
}
