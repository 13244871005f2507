//! CLI interface for the keyword resolver

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "ats-keyword-resolver")]
#[command(about = "Decide which job requirements a resume genuinely satisfies")]
#[command(long_about = "Post-process an ATS keyword classification against resume text: decompose compound requirements, resolve synonyms and certifications, and suppress generic-only matches")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Reclassify an ATS result against one or more resumes
    Resolve {
        /// Path to the upstream ATS result (JSON)
        #[arg(short = 'r', long)]
        result: PathBuf,

        /// Resume files (TXT, MD); each is resolved independently
        #[arg(short = 'R', long, num_args = 1.., required = true)]
        resume: Vec<PathBuf>,

        /// Show per-keyword evidence
        #[arg(short, long)]
        detailed: bool,

        /// Output format: console, json, markdown
        #[arg(short, long)]
        output: Option<String>,

        /// Save output to file
        #[arg(short, long)]
        save: Option<PathBuf>,

        /// Equivalence table overriding the configured one (TOML or JSON)
        #[arg(short, long)]
        table: Option<PathBuf>,
    },

    /// Show how a requirement phrase is decomposed
    Decompose {
        /// Requirement phrase, e.g. "Experiência com análise de dados e Power BI"
        phrase: String,
    },

    /// Rank keywords by how often they occur across job postings
    Rank {
        /// Job posting files (TXT, MD)
        #[arg(short = 'C', long, num_args = 1.., required = true)]
        corpus: Vec<PathBuf>,

        /// Keywords to rank
        #[arg(short, long, num_args = 1.., conflicts_with = "result", required_unless_present = "result")]
        keywords: Vec<String>,

        /// Take the keywords from an ATS result instead
        #[arg(short, long)]
        result: Option<PathBuf>,

        /// Only show the top N keywords
        #[arg(short = 'n', long)]
        top: Option<usize>,
    },

    /// Show configuration
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Reset configuration to defaults
    Reset,

    /// Print the configuration file path
    Path,
}

/// Parse and validate output format
pub fn parse_output_format(format: &str) -> Result<crate::config::OutputFormat, String> {
    match format.to_lowercase().as_str() {
        "console" => Ok(crate::config::OutputFormat::Console),
        "json" => Ok(crate::config::OutputFormat::Json),
        "markdown" | "md" => Ok(crate::config::OutputFormat::Markdown),
        _ => Err(format!("Invalid output format: {}. Supported: console, json, markdown", format)),
    }
}

/// Validate file extension
pub fn validate_file_extension(path: &Path, allowed_extensions: &[&str]) -> Result<(), String> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) => {
            if allowed_extensions.contains(&ext.to_lowercase().as_str()) {
                Ok(())
            } else {
                Err(format!(
                    "Unsupported file extension: .{}. Allowed: {}",
                    ext,
                    allowed_extensions.join(", ")
                ))
            }
        }
        None => Err("File has no extension".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_resolve_with_several_resumes() {
        let cli = Cli::try_parse_from([
            "ats-keyword-resolver",
            "resolve",
            "--result",
            "ats.json",
            "--resume",
            "a.txt",
            "b.md",
            "-o",
            "json",
        ])
        .unwrap();
        match cli.command {
            Commands::Resolve { resume, output, .. } => {
                assert_eq!(resume.len(), 2);
                assert_eq!(output.as_deref(), Some("json"));
            }
            _ => panic!("expected resolve"),
        }
    }

    #[test]
    fn test_rank_needs_keywords_or_result() {
        assert!(Cli::try_parse_from(["ats-keyword-resolver", "rank", "--corpus", "vaga.txt"]).is_err());
        assert!(Cli::try_parse_from(["ats-keyword-resolver", "rank", "-C", "vaga.txt", "-k", "sql", "python"]).is_ok());
    }

    #[test]
    fn test_parse_output_format() {
        assert_eq!(parse_output_format("MD"), Ok(crate::config::OutputFormat::Markdown));
        assert!(parse_output_format("pdf").is_err());
    }

    #[test]
    fn test_validate_file_extension() {
        assert!(validate_file_extension(Path::new("cv.TXT"), &["txt", "md"]).is_ok());
        assert!(validate_file_extension(Path::new("cv.pdf"), &["txt", "md"]).is_err());
        assert!(validate_file_extension(Path::new("cv"), &["txt"]).is_err());
    }
}
