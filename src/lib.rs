//! ATS keyword resolver library
//!
//! Takes the keyword classification produced upstream for a job posting and
//! re-derives it against the résumé text with deterministic rules.

pub mod cli;
pub mod config;
pub mod error;
pub mod input;
pub mod processing;
pub mod output;

pub use config::Config;
pub use error::{ResolverError, Result};
pub use processing::{AtsResult, EquivalenceTable, Resolution, ResolutionPipeline};
