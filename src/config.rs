//! Configuration management for the keyword resolver

use crate::error::{Result, ResolverError};
use crate::processing::equivalence::EquivalenceTable;
use crate::processing::pipeline::{ResolutionPipeline, DEFAULT_CONTEXT_WINDOW};
use log::info;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub matching: MatchingConfig,
    pub tables: TablesConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchingConfig {
    /// Characters either side of a language name searched for a proficiency level.
    pub context_window: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TablesConfig {
    /// Replaces the built-in equivalence table when set (.toml or .json).
    pub equivalence_path: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    pub format: OutputFormat,
    pub detailed: bool,
    pub color_output: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputFormat {
    Console,
    Json,
    Markdown,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            matching: MatchingConfig {
                context_window: DEFAULT_CONTEXT_WINDOW,
            },
            tables: TablesConfig::default(),
            output: OutputConfig {
                format: OutputFormat::Console,
                detailed: false,
                color_output: true,
            },
        }
    }
}

impl Config {
    /// Load from the user config directory, writing defaults on first run.
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();

        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            let config = Self::default();
            config.save()?;
            Ok(config)
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content)
            .map_err(|e| ResolverError::Configuration(format!("Failed to parse config {}: {}", path.display(), e)))
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| ResolverError::Configuration(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
            .join("ats-keyword-resolver")
            .join("config.toml")
    }

    /// The configured equivalence table, or the built-in one.
    pub fn equivalence_table(&self) -> Result<Arc<EquivalenceTable>> {
        match &self.tables.equivalence_path {
            Some(path) => {
                info!("Loading equivalence table from {}", path.display());
                Ok(Arc::new(EquivalenceTable::load(path)?))
            }
            None => Ok(EquivalenceTable::builtin()),
        }
    }

    pub fn pipeline(&self) -> Result<ResolutionPipeline> {
        if self.matching.context_window == 0 {
            return Err(ResolverError::Configuration(
                "matching.context_window must be greater than zero".to_string(),
            ));
        }
        Ok(ResolutionPipeline::new(self.equivalence_table()?, self.matching.context_window))
    }
}
