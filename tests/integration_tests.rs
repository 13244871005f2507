//! Integration tests for the keyword resolver

use ats_keyword_resolver::config::Config;
use ats_keyword_resolver::input::manager::InputManager;
use ats_keyword_resolver::output::{ReportGenerator, ReportMetadata, ResolutionReport};
use ats_keyword_resolver::processing::ats_result::ResultShape;
use ats_keyword_resolver::processing::keyword::MatchSource;
use ats_keyword_resolver::processing::occurrence::count_occurrences;
use ats_keyword_resolver::{AtsResult, EquivalenceTable, ResolutionPipeline};
use std::path::Path;
use std::sync::Arc;

async fn load_fixture(result: &str, resume: &str) -> (AtsResult, String) {
    let mut manager = InputManager::new();
    let ats = manager
        .load_ats_result(&Path::new("tests/fixtures").join(result))
        .await
        .unwrap();
    let text = manager
        .extract_text(&Path::new("tests/fixtures").join(resume))
        .await
        .unwrap();
    (ats, text)
}

#[tokio::test]
async fn test_text_extraction_from_txt() {
    let mut manager = InputManager::new();
    let path = Path::new("tests/fixtures/resume_po.txt");

    let text = manager.extract_text(path).await.unwrap();
    assert!(text.contains("Maria Silva"));
    assert!(text.contains("PSPO I"));
}

#[tokio::test]
async fn test_text_extraction_from_markdown() {
    let mut manager = InputManager::new();
    let path = Path::new("tests/fixtures/resume_po.md");

    let text = manager.extract_text(path).await.unwrap();
    assert!(text.contains("Maria Silva"));
    assert!(text.contains("Product Owner"));
    assert!(text.contains("PSPO I"));
    // Should not contain markdown formatting
    assert!(!text.contains("**"));
    assert!(!text.contains("##"));
    assert!(!text.contains('`'));
}

#[tokio::test]
async fn test_caching_functionality() {
    let mut manager = InputManager::new();
    let path = Path::new("tests/fixtures/resume_po.txt");

    let text1 = manager.extract_text(path).await.unwrap();
    assert_eq!(manager.cache_size(), 1);

    let text2 = manager.extract_text(path).await.unwrap();
    assert_eq!(text1, text2);
    assert_eq!(manager.cache_size(), 1);

    manager.clear_cache();
    assert_eq!(manager.cache_size(), 0);

    let mut uncached = InputManager::new().with_cache(false);
    uncached.extract_text(path).await.unwrap();
    assert_eq!(uncached.cache_size(), 0);
}

#[tokio::test]
async fn test_unsupported_and_missing_files() {
    let mut manager = InputManager::new();
    assert!(manager.extract_text(Path::new("tests/fixtures/unsupported.xyz")).await.is_err());
    assert!(manager.extract_text(Path::new("tests/fixtures/nonexistent.txt")).await.is_err());
    assert!(manager.load_ats_result(Path::new("tests/fixtures/resume_po.txt")).await.is_err());
}

#[tokio::test]
async fn test_legacy_result_end_to_end() {
    let (ats, text) = load_fixture("ats_legacy.json", "resume_po.txt").await;
    let resolution = ResolutionPipeline::default().run(ats, &text);
    let result = &resolution.result;

    assert_eq!(resolution.shape, ResultShape::Legacy);
    assert_eq!(
        result.found_keywords,
        vec![
            "Product Owner",
            "Certificação em Product Owner",
            "Metodologias ágeis",
            "Power BI",
            "Inglês intermediário",
            "Graduação em Administração, Economia ou áreas correlatas",
        ]
    );
    assert_eq!(
        result.missing_keywords,
        vec!["Data Product Owner", "Python", "Mestrado", "Cloud AWS"]
    );
    assert_eq!(result.job_keywords_present, result.found_keywords);
    assert_eq!(result.job_keywords_missing, result.missing_keywords);
    assert_eq!(
        result.conclusion,
        "O currículo apresenta 60% de aderência às palavras-chave da vaga. Foram encontradas 6 de 10 palavras-chave."
    );
    assert_eq!(result.recommendations.len(), 3);
    assert_eq!(result.extra.get("compatibility_score"), Some(&serde_json::json!(61)));

    let certification = resolution
        .evidence
        .iter()
        .find(|m| m.keyword.raw == "Certificação em Product Owner")
        .unwrap();
    assert_eq!(certification.source, Some(MatchSource::Equivalence));
    assert_eq!(certification.evidence.as_deref(), Some("pspo"));

    let mestrado = resolution.evidence.iter().find(|m| m.keyword.raw == "Mestrado").unwrap();
    assert_eq!(mestrado.demoted_by.as_deref(), Some("mestrado"));
}

#[tokio::test]
async fn test_structured_result_end_to_end() {
    let (ats, text) = load_fixture("ats_structured.json", "resume_dev.txt").await;
    let resolution = ResolutionPipeline::default().run(ats, &text);
    let result = &resolution.result;

    assert_eq!(resolution.shape, ResultShape::Structured);
    let found = result.resume_keywords_present.clone().unwrap();
    let missing = result.resume_keywords_missing.clone().unwrap();
    assert_eq!(found, result.found_keywords);
    assert_eq!(missing, result.missing_keywords);

    for keyword in ["JavaScript", "TypeScript", "Docker", "Ensino superior completo", "Desenvolver interfaces em React"] {
        assert!(found.contains(&keyword.to_string()), "{} should be found", keyword);
    }
    for keyword in ["Java", "Cloud AWS", "Pós-graduação em Engenharia de Software", "Trabalho em equipe"] {
        assert!(missing.contains(&keyword.to_string()), "{} should be missing", keyword);
    }

    // Upstream text is kept; unknown fields survive the round trip
    assert_eq!(result.recommendations, vec!["Detalhar projetos com React"]);
    assert_eq!(result.conclusion, "Perfil com boa aderência técnica.");
    let json = result.to_json_pretty().unwrap();
    assert!(json.contains("Desenvolvedor Front-end"));
    assert!(json.contains("\"hard_skills\""));
}

#[tokio::test]
async fn test_pipeline_is_idempotent_through_json() {
    let (ats, text) = load_fixture("ats_legacy.json", "resume_po.txt").await;
    let pipeline = ResolutionPipeline::default();

    let once = pipeline.run(ats, &text);
    let json = once.result.to_json_pretty().unwrap();
    let reparsed = AtsResult::from_json_str(&json).unwrap();
    let twice = pipeline.run(reparsed, &text);

    assert_eq!(once.result, twice.result);
}

#[tokio::test]
async fn test_resumes_resolve_concurrently() {
    let (ats, po_text) = load_fixture("ats_legacy.json", "resume_po.txt").await;
    let mut manager = InputManager::new();
    let dev_text = manager
        .extract_text(Path::new("tests/fixtures/resume_dev.txt"))
        .await
        .unwrap();

    let pipeline = Arc::new(ResolutionPipeline::default());
    let handles: Vec<_> = [po_text.clone(), dev_text.clone()]
        .into_iter()
        .map(|text| {
            let pipeline = Arc::clone(&pipeline);
            let input = ats.clone();
            tokio::task::spawn_blocking(move || pipeline.run(input, &text))
        })
        .collect();

    let mut concurrent = Vec::new();
    for handle in handles {
        concurrent.push(handle.await.unwrap());
    }

    assert_eq!(concurrent[0], pipeline.run(ats.clone(), &po_text));
    assert_eq!(concurrent[1], pipeline.run(ats, &dev_text));
    assert!(concurrent[0].present_count() > concurrent[1].present_count());
}

#[tokio::test]
async fn test_equivalence_table_from_file() {
    let dir = tempfile::tempdir().unwrap();

    let toml_path = dir.path().join("equivalences.toml");
    std::fs::write(&toml_path, "[equivalences]\n\"python\" = [\"pandas\", \"django\"]\n").unwrap();
    let json_path = dir.path().join("equivalences.json");
    std::fs::write(&json_path, r#"{"python": ["pandas"]}"#).unwrap();
    let bad_path = dir.path().join("equivalences.yaml");
    std::fs::write(&bad_path, "python: [pandas]").unwrap();

    assert_eq!(EquivalenceTable::load(&toml_path).unwrap().len(), 1);
    assert_eq!(EquivalenceTable::load(&json_path).unwrap().len(), 1);
    assert!(EquivalenceTable::load(&bad_path).is_err());

    let mut config = Config::default();
    config.tables.equivalence_path = Some(toml_path);
    let pipeline = config.pipeline().unwrap();
    let input = AtsResult::legacy(vec!["Python".into()], vec![], vec![]);

    let resolution = pipeline.run(input, "Análises com Pandas");
    assert_eq!(resolution.result.found_keywords, vec!["Python"]);
}

#[tokio::test]
async fn test_config_file_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("config.toml");

    let mut config = Config::default();
    config.matching.context_window = 20;
    config.output.detailed = true;
    config.save_to(&path).unwrap();

    let loaded = Config::load_from(&path).unwrap();
    assert_eq!(loaded, config);

    std::fs::write(&path, "matching = 1").unwrap();
    assert!(Config::load_from(&path).is_err());
}

#[tokio::test]
async fn test_rank_corpus() {
    let mut manager = InputManager::new();
    let corpus = manager
        .load_corpus(&["tests/fixtures/vaga_po.txt", "tests/fixtures/vaga_analista.md"])
        .await
        .unwrap();

    let ranked = count_occurrences(
        &["SQL", "Power BI", "Product Owner", "dashboards", "Tableau", "Python", "sql"],
        &corpus,
    );
    let order: Vec<_> = ranked.iter().map(|o| (o.keyword.as_str(), o.count)).collect();
    assert_eq!(
        order,
        vec![
            ("dashboards", 2),
            ("Power BI", 2),
            ("Product Owner", 2),
            ("SQL", 2),
            ("Tableau", 1),
            ("Python", 0),
        ]
    );
}

#[tokio::test]
async fn test_report_generation_for_fixture() {
    let (ats, text) = load_fixture("ats_legacy.json", "resume_po.txt").await;
    let resolution = ResolutionPipeline::default().run(ats, &text);
    let report = ResolutionReport::new(resolution, ReportMetadata::new("resume_po.txt", "ats_legacy.json"));

    assert_eq!(report.summary.match_percentage, 60);
    assert!(report.summary.demoted.contains(&"Data Product Owner".to_string()));

    let generator = ReportGenerator::with_options(false, true, true, true);
    let markdown = generator
        .generate_report(&report, &ats_keyword_resolver::config::OutputFormat::Markdown)
        .unwrap();
    assert!(markdown.contains("| Data Product Owner | ❌ missing |"));
}
