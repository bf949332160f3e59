//! End-to-end runs of the analysis pipeline over the sample documents.

mod support;

use std::fs;

use kp_analyzer::config::AppConfig;
use kp_analyzer::consolidation::text_parser::consolidate_dir;
use kp_analyzer::consolidation::{format_report, ConsolidationMode};
use kp_analyzer::models::{Domain, ALL_DOMAINS, SUMMARY_FILENAME};
use kp_analyzer::services::{run_analysis, AnalysisRequest, RunStatus};
use kp_analyzer::KpError;

use support::{data_dir_with_fixtures, fixture_value, with_scoped_env};

fn summary_text(dir: &std::path::Path) -> String {
    fs::read_to_string(dir.join(SUMMARY_FILENAME)).expect("summary written")
}

#[test]
fn test_full_run_produces_summary_sections() {
    let dir = data_dir_with_fixtures();
    let result = run_analysis(&AnalysisRequest::new(dir.path(), ConsolidationMode::Structured));
    assert_eq!(result.status, RunStatus::Success, "{}", result.message);

    for domain in ALL_DOMAINS {
        assert!(dir.path().join(domain.output_filename()).exists(), "{} report", domain);
    }

    let summary = summary_text(dir.path());
    for header in [
        "1. DASA PERIODS",
        "2. PLANETARY POSITIONS",
        "3. SIGNIFICANT YOGAS",
        "4. HOUSE ANALYSIS",
    ] {
        assert!(summary.contains(header), "missing {}", header);
    }
    assert!(summary.contains("Budha Aditya Yoga: Sun, Mercury (Strength: 90.00%)"));

    let house_rows: Vec<&str> = summary
        .lines()
        .filter(|l| l.trim_start().starts_with("- House "))
        .collect();
    assert_eq!(house_rows, vec!["   - House 5: Sun"]);
}

#[test]
fn test_reparse_mode_matches_structured_mode() {
    let dir = data_dir_with_fixtures();

    let structured = run_analysis(&AnalysisRequest::new(dir.path(), ConsolidationMode::Structured));
    assert!(structured.is_success());
    let from_records = summary_text(dir.path());

    let reparsed = run_analysis(&AnalysisRequest::new(dir.path(), ConsolidationMode::Reparse));
    assert!(reparsed.is_success(), "{}", reparsed.message);
    assert_eq!(from_records, summary_text(dir.path()));
    assert_ne!(structured.run_id, reparsed.run_id);
}

#[test]
fn test_missing_input_aborts_and_names_domain() {
    let dir = data_dir_with_fixtures();
    fs::remove_file(dir.path().join(Domain::Yoga.input_filename())).unwrap();

    let result = run_analysis(&AnalysisRequest::new(dir.path(), ConsolidationMode::Structured));
    assert_eq!(result.status, RunStatus::Error);
    assert_eq!(result.failed_domain, Some(Domain::Yoga));
    assert!(result.message.contains("yoga"));
    assert_eq!(result.generated_files.len(), 6);
    assert!(result.output_file.is_none());
    assert!(!dir.path().join(SUMMARY_FILENAME).exists());
}

#[test]
fn test_invalid_house_count_aborts_before_later_domains() {
    let dir = data_dir_with_fixtures();
    let mut houses = fixture_value(Domain::House);
    houses["response"].as_array_mut().unwrap().truncate(11);
    fs::write(
        dir.path().join(Domain::House.input_filename()),
        serde_json::to_string(&houses).unwrap(),
    )
    .unwrap();

    let result = run_analysis(&AnalysisRequest::new(dir.path(), ConsolidationMode::Structured));
    assert_eq!(result.failed_domain, Some(Domain::House));
    assert!(result.message.contains("Expected 12 houses"));
    // Only the planet-position report precedes the house step
    assert_eq!(result.generated_files, vec![dir.path().join(Domain::PlanetPosition.output_filename())]);
    assert!(!dir.path().join(Domain::House.output_filename()).exists());
}

#[test]
fn test_empty_input_file_is_reported() {
    let dir = data_dir_with_fixtures();
    fs::write(dir.path().join(Domain::Antardasha.input_filename()), "").unwrap();

    let result = run_analysis(&AnalysisRequest::new(dir.path(), ConsolidationMode::Reparse));
    assert_eq!(result.failed_domain, Some(Domain::Antardasha));
    assert!(result.message.contains("Empty input file"));
}

#[test]
fn test_consolidate_existing_reports() {
    let dir = data_dir_with_fixtures();
    assert!(run_analysis(&AnalysisRequest::new(dir.path(), ConsolidationMode::Structured)).is_success());
    fs::remove_file(dir.path().join(Domain::Yoga.output_filename())).unwrap();

    // Lenient: the missing yoga report contributes nothing
    let report = consolidate_dir(dir.path(), false).unwrap();
    assert!(report.yogas.is_empty());
    assert!(format_report(&report).contains("   - House 5: Sun"));

    let err = consolidate_dir(dir.path(), true).unwrap_err();
    assert!(matches!(err, KpError::MissingInputFile { domain: Domain::Yoga, .. }));
}

#[test]
fn test_config_from_environment() {
    let config = with_scoped_env(
        &[
            ("KP_CONFIG", None),
            ("KP_DATA_DIR", Some("/tmp/kp-data")),
            ("KP_CONSOLIDATION_MODE", Some("reparse")),
            ("VEDIC_API_KEY", Some("abc")),
            ("PORT", Some("9090")),
        ],
        AppConfig::load,
    )
    .unwrap();
    assert_eq!(config.data_dir, std::path::PathBuf::from("/tmp/kp-data"));
    assert_eq!(config.consolidation_mode, ConsolidationMode::Reparse);
    assert_eq!(config.api.require_key().unwrap(), "abc");
    assert_eq!(config.server.port, 9090);
}

#[test]
fn test_config_rejects_unknown_mode() {
    let err = with_scoped_env(
        &[("KP_CONFIG", None), ("KP_CONSOLIDATION_MODE", Some("fastest"))],
        AppConfig::load,
    )
    .unwrap_err();
    assert!(matches!(err, KpError::Configuration(_)));
}
