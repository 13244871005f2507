//! Keyword resolution engine

pub mod normalizer;
pub mod terms;
pub mod decomposer;
pub mod occurrence;
pub mod equivalence;
pub mod specificity;
pub mod keyword;
pub mod exceptions;
pub mod ats_result;
pub mod pipeline;

pub use ats_result::AtsResult;
pub use equivalence::EquivalenceTable;
pub use pipeline::{Resolution, ResolutionPipeline};
