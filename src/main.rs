//! ATS keyword resolver: deterministic post-processing of ATS keyword matches

use anyhow::{Context, Result};
use ats_keyword_resolver::cli::{self, Cli, Commands, ConfigAction};
use ats_keyword_resolver::config::{Config, OutputFormat};
use ats_keyword_resolver::input::InputManager;
use ats_keyword_resolver::output::{
    save_report_to_file, suggest_filename, RankingReport, ReportGenerator, ReportMetadata, ResolutionReport,
};
use ats_keyword_resolver::processing::decomposer::decompose;
use ats_keyword_resolver::processing::occurrence::count_occurrences;
use clap::Parser;
use log::{error, info};
use std::path::{Path, PathBuf};
use std::process;
use std::sync::Arc;
use std::time::Instant;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {:#}", e);
            process::exit(1);
        }
    };

    if let Err(e) = run_command(cli.command, config).await {
        error!("Command failed: {:#}", e);
        process::exit(1);
    }
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => Config::load_from(path).with_context(|| format!("Reading config {}", path.display())),
        None => Ok(Config::load()?),
    }
}

async fn run_command(command: Commands, mut config: Config) -> Result<()> {
    match command {
        Commands::Resolve {
            result,
            resume,
            detailed,
            output,
            save,
            table,
        } => {
            cli::validate_file_extension(&result, &["json"])
                .map_err(|e| anyhow::anyhow!("ATS result file: {}", e))?;
            for path in &resume {
                cli::validate_file_extension(path, &["txt", "md"])
                    .map_err(|e| anyhow::anyhow!("Resume file {}: {}", path.display(), e))?;
            }

            let format = match output {
                Some(output) => cli::parse_output_format(&output).map_err(anyhow::Error::msg)?,
                None => config.output.format,
            };
            if table.is_some() {
                config.tables.equivalence_path = table;
            }

            let pipeline = Arc::new(config.pipeline().context("Building resolution pipeline")?);
            info!("Equivalence table: {} entries", pipeline.table().len());

            let mut input_manager = InputManager::new();
            let ats_result = input_manager
                .load_ats_result(&result)
                .await
                .with_context(|| format!("Loading ATS result {}", result.display()))?;

            // Each résumé is independent; run them on blocking tasks.
            let mut handles = Vec::with_capacity(resume.len());
            for path in &resume {
                let text = input_manager
                    .extract_text(path)
                    .await
                    .with_context(|| format!("Reading resume {}", path.display()))?;
                let pipeline = Arc::clone(&pipeline);
                let input = ats_result.clone();
                let metadata = ReportMetadata::new(path.display().to_string(), result.display().to_string())
                    .with_table_size(pipeline.table().len());

                handles.push(tokio::task::spawn_blocking(move || {
                    let started = Instant::now();
                    let resolution = pipeline.run(input, &text);
                    let elapsed = started.elapsed().as_millis() as u64;
                    ResolutionReport::new(resolution, metadata.with_processing_time(elapsed))
                }));
            }

            let mut reports = Vec::with_capacity(handles.len());
            for handle in handles {
                reports.push(handle.await.context("Resolution task failed")?);
            }

            let generator = ReportGenerator::with_options(
                config.output.color_output && save.is_none(),
                detailed || config.output.detailed,
                true,
                true,
            );
            let rendered = generator.generate_reports(&reports, &format)?;

            match save {
                Some(path) => {
                    let path = output_path(path, &format, &resume);
                    save_report_to_file(&rendered, &path)
                        .with_context(|| format!("Saving report to {}", path.display()))?;
                    println!("Report saved to {}", path.display());
                }
                None => println!("{}", rendered),
            }
        }

        Commands::Decompose { phrase } => {
            let terms = decompose(&phrase);
            println!("{} terms from \"{}\":", terms.len(), phrase.trim());
            for term in terms.iter() {
                println!("  • {}", term);
            }
        }

        Commands::Rank {
            corpus,
            keywords,
            result,
            top,
        } => {
            let mut input_manager = InputManager::new();
            let keywords = match result {
                Some(path) => input_manager
                    .load_ats_result(&path)
                    .await
                    .with_context(|| format!("Loading ATS result {}", path.display()))?
                    .keyword_universe()
                    .into_iter()
                    .map(|k| k.raw)
                    .collect(),
                None => keywords,
            };

            let text = input_manager.load_corpus(&corpus).await.context("Reading corpus")?;
            let mut occurrences = count_occurrences(&keywords, &text);
            if let Some(top) = top {
                occurrences.truncate(top);
            }

            let files = corpus.iter().map(|p| p.display().to_string()).collect();
            let report = RankingReport::new(files, occurrences);
            let generator = ReportGenerator::with_options(config.output.color_output, false, true, true);
            println!("{}", generator.generate_ranking(&report, &config.output.format)?);
        }

        Commands::Config { action } => match action {
            Some(ConfigAction::Show) | None => {
                let content = toml::to_string_pretty(&config).context("Serializing configuration")?;
                println!("{}", content);
            }
            Some(ConfigAction::Reset) => {
                Config::default().save()?;
                println!("Configuration reset to defaults at {}", Config::config_path().display());
            }
            Some(ConfigAction::Path) => {
                println!("{}", Config::config_path().display());
            }
        },
    }

    Ok(())
}

/// A directory target gets a generated file name; a single résumé names it.
fn output_path(save: PathBuf, format: &OutputFormat, resumes: &[PathBuf]) -> PathBuf {
    if !save.is_dir() {
        return save;
    }
    let base = match resumes {
        [only] => only.to_string_lossy().to_string(),
        _ => "batch".to_string(),
    };
    save.join(suggest_filename(format, &base, true))
}
