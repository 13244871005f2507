//! Domain exception rules applied after matching
//!
//! Each rule looks only at the résumé text and the keyword text, never at a
//! keyword's current status, so running the set twice changes nothing.

use crate::processing::keyword::{Classification, MatchSource};
use crate::processing::normalizer::{contains_term, term_in_context, ResumeDocument};
use crate::processing::terms::{
    ADVANCED_PROFICIENCY, CLOUD_PROVIDERS, DEGREE_GUARDS, ENGLISH_MARKERS, HIGHER_EDUCATION_INDICATORS,
    INTERMEDIATE_ENGLISH, UNDERGRADUATE_REQUIREMENTS,
};
use log::debug;

/// A correction that reclassifies keywords based on domain knowledge.
pub trait ExceptionRule: Send + Sync {
    fn name(&self) -> &'static str;
    fn apply(&self, classification: Classification, resume: &ResumeDocument) -> Classification;
}

/// Advanced or fluent English satisfies an intermediate English requirement.
pub struct LanguageProficiencyRule {
    window: usize,
}

impl LanguageProficiencyRule {
    pub fn new(window: usize) -> Self {
        Self { window }
    }

    fn advanced_evidence(&self, resume: &ResumeDocument) -> Option<String> {
        ENGLISH_MARKERS.iter().find_map(|marker| {
            ADVANCED_PROFICIENCY
                .iter()
                .find(|level| term_in_context(marker, level, &resume.normalized, self.window))
                .map(|level| format!("{} {}", marker, level))
        })
    }
}

impl ExceptionRule for LanguageProficiencyRule {
    fn name(&self) -> &'static str {
        "language-proficiency"
    }

    fn apply(&self, classification: Classification, resume: &ResumeDocument) -> Classification {
        let Some(evidence) = self.advanced_evidence(resume) else {
            return classification;
        };
        classification.map(|result| {
            let is_intermediate = INTERMEDIATE_ENGLISH
                .iter()
                .any(|term| contains_term(&result.keyword.normalized, term));
            if is_intermediate && result.needs_evidence() {
                result.promote(self.name(), MatchSource::Exception, evidence.clone())
            } else {
                result
            }
        })
    }
}

/// A completed bachelor's-level degree satisfies an undergraduate requirement,
/// but never a postgraduate one.
pub struct EducationHierarchyRule;

impl ExceptionRule for EducationHierarchyRule {
    fn name(&self) -> &'static str {
        "education-hierarchy"
    }

    fn apply(&self, classification: Classification, resume: &ResumeDocument) -> Classification {
        let Some(indicator) = HIGHER_EDUCATION_INDICATORS
            .iter()
            .find(|indicator| resume.contains_normalized(indicator))
        else {
            return classification;
        };

        classification.map(|result| {
            let normalized = &result.keyword.normalized;
            let undergraduate = UNDERGRADUATE_REQUIREMENTS.iter().any(|term| contains_term(normalized, term));
            let above_undergraduate = DEGREE_GUARDS
                .iter()
                .flat_map(|guard| guard.markers.iter())
                .any(|marker| contains_term(normalized, marker));
            if undergraduate && !above_undergraduate && result.needs_evidence() {
                result.promote(self.name(), MatchSource::Exception, *indicator)
            } else {
                result
            }
        })
    }
}

/// Master's, postgraduate and doctorate requirements need explicit evidence
/// of that level.
pub struct DegreeGuardRule;

impl ExceptionRule for DegreeGuardRule {
    fn name(&self) -> &'static str {
        "degree-guard"
    }

    fn apply(&self, classification: Classification, resume: &ResumeDocument) -> Classification {
        classification.map(|result| {
            if !result.present {
                return result;
            }
            let unmet = DEGREE_GUARDS.iter().find(|guard| {
                guard.markers.iter().any(|m| contains_term(&result.keyword.normalized, m))
                    && !guard.evidence.iter().any(|e| resume.contains_normalized(e))
            });
            match unmet {
                Some(guard) => result.demote(self.name(), guard.name),
                None => result,
            }
        })
    }
}

/// "Cloud <provider>" requires evidence of that provider, not just "cloud".
pub struct CloudProviderRule;

impl ExceptionRule for CloudProviderRule {
    fn name(&self) -> &'static str {
        "cloud-provider"
    }

    fn apply(&self, classification: Classification, resume: &ResumeDocument) -> Classification {
        classification.map(|result| {
            let normalized = &result.keyword.normalized;
            if !result.present || !contains_term(normalized, "cloud") {
                return result;
            }
            let unmet = CLOUD_PROVIDERS.iter().find(|(provider, evidence)| {
                contains_term(normalized, provider) && !evidence.iter().any(|e| resume.contains_normalized(e))
            });
            match unmet {
                Some(_) => result.demote(self.name(), "cloud"),
                None => result,
            }
        })
    }
}

/// The ordered rule set. Promotions run before guards so a guard always has
/// the last word.
pub struct ExceptionRuleSet {
    rules: Vec<Box<dyn ExceptionRule>>,
}

impl ExceptionRuleSet {
    pub fn standard(context_window: usize) -> Self {
        Self {
            rules: vec![
                Box::new(LanguageProficiencyRule::new(context_window)),
                Box::new(EducationHierarchyRule),
                Box::new(DegreeGuardRule),
                Box::new(CloudProviderRule),
            ],
        }
    }

    pub fn empty() -> Self {
        Self { rules: Vec::new() }
    }

    pub fn with_rule(mut self, rule: Box<dyn ExceptionRule>) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn rule_names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|r| r.name()).collect()
    }

    pub fn apply(&self, classification: Classification, resume: &ResumeDocument) -> Classification {
        self.rules.iter().fold(classification, |current, rule| {
            debug!("Applying exception rule '{}'", rule.name());
            rule.apply(current, resume)
        })
    }
}

impl Default for ExceptionRuleSet {
    fn default() -> Self {
        Self::standard(50)
    }
}
