//! Output formatters for resolution and ranking reports

use crate::config::OutputFormat;
use crate::error::Result;
use crate::output::report::{RankingReport, ResolutionReport};
use crate::processing::keyword::MatchResult;
use colored::{Color, Colorize};
use std::path::Path;

/// Trait for formatting resolution reports
pub trait OutputFormatter {
    fn format_report(&self, report: &ResolutionReport) -> Result<String>;
    fn format_ranking(&self, report: &RankingReport) -> Result<String>;
}

/// Console formatter with colors
pub struct ConsoleFormatter {
    use_colors: bool,
    detailed: bool,
}

/// JSON formatter for downstream consumers
pub struct JsonFormatter {
    pretty: bool,
}

/// Markdown formatter for sharing reports
pub struct MarkdownFormatter {
    include_metadata: bool,
}

/// Report generator that coordinates the formatters
pub struct ReportGenerator {
    console_formatter: ConsoleFormatter,
    json_formatter: JsonFormatter,
    markdown_formatter: MarkdownFormatter,
}

impl ConsoleFormatter {
    pub fn new(use_colors: bool, detailed: bool) -> Self {
        Self { use_colors, detailed }
    }

    fn colorize(&self, text: &str, color: Color) -> String {
        if self.use_colors {
            text.color(color).to_string()
        } else {
            text.to_string()
        }
    }

    fn format_header(&self, title: &str, level: u8) -> String {
        let prefix = match level {
            1 => "█",
            2 => "▓",
            _ => "▒",
        };
        let color = match level {
            1 => Color::Blue,
            2 => Color::Green,
            _ => Color::Yellow,
        };

        if self.use_colors {
            format!("\n{} {}\n", prefix.color(color).bold(), title.color(color).bold())
        } else {
            format!("\n{} {}\n", prefix, title)
        }
    }

    fn format_score_badge(&self, score: u32) -> String {
        let (badge, color) = match score {
            80..=100 => ("STRONG", Color::Green),
            60..=79 => ("GOOD", Color::Yellow),
            40..=59 => ("PARTIAL", Color::BrightYellow),
            _ => ("WEAK", Color::Red),
        };

        if self.use_colors {
            format!("[{}]", badge.color(color).bold())
        } else {
            format!("[{}]", badge)
        }
    }

    fn format_evidence(&self, m: &MatchResult) -> String {
        let status = if m.present {
            self.colorize("✓", Color::Green)
        } else {
            self.colorize("✗", Color::Red)
        };
        let detail = match (&m.source, &m.evidence, &m.demoted_by) {
            (Some(source), Some(evidence), _) => format!("{} via '{}'", source, evidence),
            (Some(source), None, _) => source.to_string(),
            (None, _, Some(generic)) => format!("only '{}' matched", generic),
            _ => "no evidence".to_string(),
        };
        format!("  {} {} {}\n", status, m.keyword.raw, self.colorize(&format!("({})", detail), Color::BrightBlack))
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format_report(&self, report: &ResolutionReport) -> Result<String> {
        let mut output = String::new();

        output.push_str(&self.format_header("ATS KEYWORD RESOLUTION", 1));
        output.push_str(&format!(
            "Resume: {} | Result: {} | Generated: {}\n",
            report.metadata.resume_file,
            report.metadata.result_file,
            report.metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
        ));

        output.push_str(&self.format_header("Summary", 2));
        output.push_str(&format!(
            "Match: {}% {} ({} of {} keywords)\n",
            report.summary.match_percentage,
            self.format_score_badge(report.summary.match_percentage),
            report.summary.found,
            report.summary.total
        ));
        output.push_str(&format!("{}\n", self.colorize(&report.result.conclusion, Color::Cyan)));

        if !report.found_keywords().is_empty() {
            output.push_str(&self.format_header("✅ Found", 3));
            for keyword in report.found_keywords() {
                output.push_str(&format!("  • {}\n", self.colorize(keyword, Color::Green)));
            }
        }

        if !report.missing_keywords().is_empty() {
            output.push_str(&self.format_header("⚠️  Missing", 3));
            for keyword in report.missing_keywords() {
                output.push_str(&format!("  • {}\n", self.colorize(keyword, Color::Yellow)));
            }
        }

        if !report.summary.demoted.is_empty() {
            output.push_str(&self.format_header("🔍 Generic-only matches removed", 3));
            for keyword in &report.summary.demoted {
                output.push_str(&format!("  • {}\n", keyword));
            }
        }

        if self.detailed {
            output.push_str(&self.format_header("Evidence", 2));
            for m in &report.evidence {
                output.push_str(&self.format_evidence(m));
            }
        }

        output.push_str(&self.format_header("📋 Recommendations", 2));
        for (i, rec) in report.result.recommendations.iter().enumerate() {
            output.push_str(&format!("{}. {}\n", i + 1, rec));
        }

        Ok(output)
    }

    fn format_ranking(&self, report: &RankingReport) -> Result<String> {
        let mut output = String::new();
        output.push_str(&self.format_header("KEYWORD RANKING", 1));
        output.push_str(&format!("Corpus: {}\n\n", report.corpus_files.join(", ")));
        for (i, occurrence) in report.occurrences.iter().enumerate() {
            let count = occurrence.count.to_string();
            let count = if occurrence.count == 0 {
                self.colorize(&count, Color::BrightBlack)
            } else {
                self.colorize(&count, Color::Cyan)
            };
            output.push_str(&format!("{:>3}. {} ({})\n", i + 1, occurrence.keyword, count));
        }
        Ok(output)
    }
}

impl JsonFormatter {
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }

    fn to_json<T: serde::Serialize>(&self, value: &T) -> Result<String> {
        if self.pretty {
            Ok(serde_json::to_string_pretty(value)?)
        } else {
            Ok(serde_json::to_string(value)?)
        }
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_report(&self, report: &ResolutionReport) -> Result<String> {
        self.to_json(report)
    }

    fn format_ranking(&self, report: &RankingReport) -> Result<String> {
        self.to_json(report)
    }
}

impl MarkdownFormatter {
    pub fn new(include_metadata: bool) -> Self {
        Self { include_metadata }
    }

    fn file_name(path: &str) -> String {
        Path::new(path)
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.to_string())
    }
}

impl OutputFormatter for MarkdownFormatter {
    fn format_report(&self, report: &ResolutionReport) -> Result<String> {
        let mut output = String::new();

        output.push_str("# ATS Keyword Resolution\n\n");

        if self.include_metadata {
            output.push_str(&format!(
                "**Generated:** {} | **Processing Time:** {}ms\n",
                report.metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC"),
                report.metadata.processing_time_ms
            ));
            output.push_str(&format!(
                "**Resume:** `{}` | **Result:** `{}`\n\n",
                Self::file_name(&report.metadata.resume_file),
                Self::file_name(&report.metadata.result_file)
            ));
        }

        output.push_str("## Summary\n\n");
        output.push_str(&format!(
            "**Match:** {}% ({} of {} keywords)\n\n",
            report.summary.match_percentage, report.summary.found, report.summary.total
        ));
        output.push_str(&format!("{}\n\n", report.result.conclusion));

        output.push_str("## Keywords\n\n");
        output.push_str("| Keyword | Status | Source | Evidence |\n");
        output.push_str("|---------|--------|--------|----------|\n");
        for m in &report.evidence {
            let status = if m.present { "✅ found" } else { "❌ missing" };
            let source = m.source.map(|s| s.to_string()).unwrap_or_default();
            let evidence = match (&m.evidence, &m.demoted_by) {
                (Some(evidence), _) => evidence.clone(),
                (None, Some(generic)) => format!("only '{}'", generic),
                _ => String::new(),
            };
            output.push_str(&format!("| {} | {} | {} | {} |\n", m.keyword.raw, status, source, evidence));
        }
        output.push('\n');

        output.push_str("## Recommendations\n\n");
        for rec in &report.result.recommendations {
            output.push_str(&format!("- {}\n", rec));
        }

        Ok(output)
    }

    fn format_ranking(&self, report: &RankingReport) -> Result<String> {
        let mut output = String::from("# Keyword Ranking\n\n");
        if self.include_metadata {
            output.push_str(&format!(
                "**Generated:** {} | **Corpus:** {}\n\n",
                report.generated_at.format("%Y-%m-%d %H:%M:%S UTC"),
                report.corpus_files.join(", ")
            ));
        }
        output.push_str("| # | Keyword | Occurrences |\n");
        output.push_str("|---|---------|-------------|\n");
        for (i, occurrence) in report.occurrences.iter().enumerate() {
            output.push_str(&format!("| {} | {} | {} |\n", i + 1, occurrence.keyword, occurrence.count));
        }
        Ok(output)
    }
}

impl ReportGenerator {
    pub fn new() -> Self {
        Self {
            console_formatter: ConsoleFormatter::new(true, false),
            json_formatter: JsonFormatter::new(true),
            markdown_formatter: MarkdownFormatter::new(true),
        }
    }

    pub fn with_options(use_colors: bool, detailed: bool, pretty_json: bool, include_metadata: bool) -> Self {
        Self {
            console_formatter: ConsoleFormatter::new(use_colors, detailed),
            json_formatter: JsonFormatter::new(pretty_json),
            markdown_formatter: MarkdownFormatter::new(include_metadata),
        }
    }

    fn formatter(&self, format: &OutputFormat) -> &dyn OutputFormatter {
        match format {
            OutputFormat::Console => &self.console_formatter,
            OutputFormat::Json => &self.json_formatter,
            OutputFormat::Markdown => &self.markdown_formatter,
        }
    }

    pub fn generate_report(&self, report: &ResolutionReport, format: &OutputFormat) -> Result<String> {
        self.formatter(format).format_report(report)
    }

    /// Several résumés against the same result. JSON output is an array.
    pub fn generate_reports(&self, reports: &[ResolutionReport], format: &OutputFormat) -> Result<String> {
        if let OutputFormat::Json = format {
            return self.json_formatter.to_json(&reports);
        }
        let rendered = reports
            .iter()
            .map(|r| self.generate_report(r, format))
            .collect::<Result<Vec<_>>>()?;
        Ok(rendered.join("\n"))
    }

    pub fn generate_ranking(&self, report: &RankingReport, format: &OutputFormat) -> Result<String> {
        self.formatter(format).format_ranking(report)
    }
}

impl Default for ReportGenerator {
    fn default() -> Self {
        Self::new()
    }
}

pub fn save_report_to_file(content: &str, file_path: &Path) -> Result<()> {
    use std::fs;
    if let Some(parent) = file_path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(file_path, content)?;
    Ok(())
}

pub fn suggest_filename(format: &OutputFormat, resume_name: &str, timestamp: bool) -> String {
    let base_name = Path::new(resume_name)
        .file_stem()
        .unwrap_or_default()
        .to_string_lossy();

    let timestamp_suffix = if timestamp {
        format!("_{}", chrono::Utc::now().format("%Y%m%d_%H%M%S"))
    } else {
        String::new()
    };

    match format {
        OutputFormat::Console => format!("{}_keywords{}.txt", base_name, timestamp_suffix),
        OutputFormat::Json => format!("{}_keywords{}.json", base_name, timestamp_suffix),
        OutputFormat::Markdown => format!("{}_keywords{}.md", base_name, timestamp_suffix),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::report::ReportMetadata;
    use crate::processing::ats_result::AtsResult;
    use crate::processing::occurrence::count_occurrences;
    use crate::processing::pipeline::ResolutionPipeline;

    fn sample_report() -> ResolutionReport {
        let input = AtsResult::legacy(vec!["SQL".into(), "Tableau".into()], vec![], vec![]);
        let resolution = ResolutionPipeline::default().run(input, "Consultas SQL e modelagem");
        ResolutionReport::new(resolution, ReportMetadata::new("cv/maria.txt", "ats.json"))
    }

    #[test]
    fn test_console_without_colors() {
        let output = ConsoleFormatter::new(false, true).format_report(&sample_report()).unwrap();
        assert!(output.contains("Match: 50% [PARTIAL] (1 of 2 keywords)"));
        assert!(output.contains("  • Tableau"));
        assert!(output.contains("✓ SQL (direct via 'sql')"));
    }

    #[test]
    fn test_json_contains_corrected_result() {
        let output = JsonFormatter::new(false).format_report(&sample_report()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["result"]["found_keywords"], serde_json::json!(["SQL"]));
        assert_eq!(value["summary"]["match_percentage"], 50);
    }

    #[test]
    fn test_markdown_table() {
        let output = MarkdownFormatter::new(true).format_report(&sample_report()).unwrap();
        assert!(output.contains("**Resume:** `maria.txt`"));
        assert!(output.contains("| Tableau | ❌ missing |  |  |"));
    }

    #[test]
    fn test_batch_json_is_an_array() {
        let generator = ReportGenerator::with_options(false, false, false, false);
        let reports = vec![sample_report(), sample_report()];
        let output = generator.generate_reports(&reports, &OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value.as_array().map(|a| a.len()), Some(2));
    }

    #[test]
    fn test_ranking_markdown() {
        let report = RankingReport::new(vec!["vaga.txt".into()], count_occurrences(&["sql", "python"], "sql sql python"));
        let output = MarkdownFormatter::new(false).format_ranking(&report).unwrap();
        assert!(output.contains("| 1 | sql | 2 |"));
        assert!(output.contains("| 2 | python | 1 |"));
    }

    #[test]
    fn test_suggest_filename() {
        assert_eq!(suggest_filename(&OutputFormat::Json, "cv/maria.txt", false), "maria_keywords.json");
    }
}
