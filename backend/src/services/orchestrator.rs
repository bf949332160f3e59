//! Full analysis run: seven domain reports, then the consolidated summary.
//!
//! The run is strictly sequential. Reports left by a previous run are removed
//! first. The first failing domain aborts the run, and files written by
//! earlier domains are left in place. Every failure is turned into an
//! [`AnalysisResult`]; nothing propagates to the caller.

use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use log::{debug, error, info};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::consolidation::text_parser::consolidate_dir;
use crate::consolidation::{format_report, ConsolidatedReport, ConsolidationMode, ReportRecords};
use crate::error::{KpError, KpResult};
use crate::models::{Domain, ALL_DOMAINS, SUMMARY_FILENAME};
use crate::parsing::InputSource;
use crate::render::{render_to_file, write_text, DomainRecords, RenderContext};

/// What to analyze and where to write it.
#[derive(Debug, Clone)]
pub struct AnalysisRequest {
    /// Holds the `input_kp_*.json` documents and receives every report
    pub data_dir: PathBuf,
    pub mode: ConsolidationMode,
    /// Per-domain sources replacing the files in `data_dir`
    pub inputs: BTreeMap<Domain, InputSource>,
}

impl AnalysisRequest {
    pub fn new(data_dir: impl Into<PathBuf>, mode: ConsolidationMode) -> Self {
        Self {
            data_dir: data_dir.into(),
            mode,
            inputs: BTreeMap::new(),
        }
    }

    pub fn with_input(mut self, domain: Domain, source: impl Into<InputSource>) -> Self {
        self.inputs.insert(domain, source.into());
        self
    }

    fn source_for(&self, domain: Domain) -> InputSource {
        self.inputs
            .get(&domain)
            .cloned()
            .unwrap_or_else(|| InputSource::Path(self.data_dir.join(domain.input_filename())))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunStatus {
    Success,
    Error,
}

/// Outcome of one run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub run_id: String,
    pub status: RunStatus,
    pub message: String,
    /// Consolidated summary, on success
    pub output_file: Option<PathBuf>,
    /// Every file written, in order, including those of a failed run
    pub generated_files: Vec<PathBuf>,
    /// Domain whose step failed, when the failure is attributable to one
    pub failed_domain: Option<Domain>,
    pub started_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
}

impl AnalysisResult {
    pub fn is_success(&self) -> bool {
        self.status == RunStatus::Success
    }
}

/// Step-local failure, before it is folded into the result.
struct StepFailure {
    domain: Option<Domain>,
    error: KpError,
}

/// Run the full pipeline for `request`.
pub fn run_analysis(request: &AnalysisRequest) -> AnalysisResult {
    let run_id = Uuid::new_v4().to_string();
    let started_at = Utc::now();
    info!(
        "[{}] Starting KP analysis in {} ({} consolidation)",
        run_id,
        request.data_dir.display(),
        request.mode
    );

    let mut generated_files = Vec::new();
    let outcome = run_pipeline(request, &mut generated_files);

    let completed_at = Utc::now();
    match outcome {
        Ok(summary) => {
            info!(
                "[{}] Analysis complete: {} files in {} ms",
                run_id,
                generated_files.len(),
                (completed_at - started_at).num_milliseconds()
            );
            AnalysisResult {
                run_id,
                status: RunStatus::Success,
                message: "Analysis completed successfully".to_string(),
                output_file: Some(summary),
                generated_files,
                failed_domain: None,
                started_at,
                completed_at,
            }
        }
        Err(StepFailure { domain, error }) => {
            let message = match domain {
                Some(d) => format!("Failed to process {}: {}", d, error),
                None => error.to_string(),
            };
            error!("[{}] {}", run_id, message);
            AnalysisResult {
                run_id,
                status: RunStatus::Error,
                message,
                output_file: None,
                generated_files,
                failed_domain: domain.or_else(|| error.domain()),
                started_at,
                completed_at,
            }
        }
    }
}

fn run_pipeline(
    request: &AnalysisRequest,
    generated: &mut Vec<PathBuf>,
) -> Result<PathBuf, StepFailure> {
    clear_outputs(&request.data_dir).map_err(|error| StepFailure {
        domain: None,
        error: error.in_stage("clear previous reports"),
    })?;

    let mut context = RenderContext::default();
    let mut records = ReportRecords::default();

    for domain in ALL_DOMAINS {
        let output = request.data_dir.join(domain.output_filename());
        let report = render_to_file(domain, request.source_for(domain), &output, &context)
            .map_err(|error| StepFailure {
                domain: Some(domain),
                error: error.in_stage(format!("render {}", domain)),
            })?;
        generated.push(output);

        if let DomainRecords::PlanetPositions(positions) = &report.records {
            context.positions = Some(positions.clone());
        }
        records.absorb(report.records);
    }

    let summary = consolidate(request, &records).map_err(|error| StepFailure {
        domain: None,
        error,
    })?;
    generated.push(summary.clone());
    Ok(summary)
}

/// Remove every report and the summary a previous run may have left in `dir`.
fn clear_outputs(dir: &Path) -> KpResult<()> {
    let outputs = ALL_DOMAINS
        .iter()
        .map(|d| dir.join(d.output_filename()))
        .chain(std::iter::once(dir.join(SUMMARY_FILENAME)));
    for path in outputs {
        match fs::remove_file(&path) {
            Ok(()) => debug!("Removed stale report {}", path.display()),
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => return Err(KpError::io(path, e)),
        }
    }
    Ok(())
}

fn consolidate(request: &AnalysisRequest, records: &ReportRecords) -> KpResult<PathBuf> {
    let report = match request.mode {
        ConsolidationMode::Structured => ConsolidatedReport::from_records(records),
        ConsolidationMode::Reparse => {
            consolidate_dir(&request.data_dir, true).map_err(|e| e.in_stage("consolidate"))?
        }
    };
    let path = request.data_dir.join(SUMMARY_FILENAME);
    write_text(&path, &format_report(&report)).map_err(|e| e.in_stage("write summary"))?;
    info!("Consolidated summary written to {}", path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_fixtures::{value, write_all};

    #[test]
    fn test_run_analysis_writes_eight_files() {
        let dir = tempfile::tempdir().unwrap();
        write_all(dir.path());

        let result = run_analysis(&AnalysisRequest::new(dir.path(), ConsolidationMode::Structured));
        assert!(result.is_success(), "{}", result.message);
        assert_eq!(result.generated_files.len(), 8);
        assert_eq!(result.output_file, Some(dir.path().join(SUMMARY_FILENAME)));
        assert!(result.generated_files.iter().all(|p| p.exists()));
        assert!(Uuid::parse_str(&result.run_id).is_ok());
    }

    #[test]
    fn test_modes_write_identical_summaries() {
        let dir = tempfile::tempdir().unwrap();
        write_all(dir.path());
        let summary = dir.path().join(SUMMARY_FILENAME);

        let structured = run_analysis(&AnalysisRequest::new(dir.path(), ConsolidationMode::Structured));
        assert!(structured.is_success());
        let first = std::fs::read_to_string(&summary).unwrap();

        let reparsed = run_analysis(&AnalysisRequest::new(dir.path(), ConsolidationMode::Reparse));
        assert!(reparsed.is_success(), "{}", reparsed.message);
        assert_eq!(first, std::fs::read_to_string(&summary).unwrap());
    }

    #[test]
    fn test_failure_names_domain_and_stops() {
        let dir = tempfile::tempdir().unwrap();
        write_all(dir.path());
        std::fs::remove_file(dir.path().join(Domain::Mahadasha.input_filename())).unwrap();

        let result = run_analysis(&AnalysisRequest::new(dir.path(), ConsolidationMode::Structured));
        assert_eq!(result.status, RunStatus::Error);
        assert_eq!(result.failed_domain, Some(Domain::Mahadasha));
        assert!(result.message.contains("mahadasha"));
        // Planet position, house and planet analysis ran before the failure
        assert_eq!(result.generated_files.len(), 3);
        assert!(!dir.path().join(Domain::Mahadasha.output_filename()).exists());
        assert!(!dir.path().join(Domain::Yoga.output_filename()).exists());
        assert!(!dir.path().join(SUMMARY_FILENAME).exists());
    }

    #[test]
    fn test_failed_rerun_removes_previous_reports() {
        let dir = tempfile::tempdir().unwrap();
        write_all(dir.path());
        let first = run_analysis(&AnalysisRequest::new(dir.path(), ConsolidationMode::Structured));
        assert!(first.is_success(), "{}", first.message);

        std::fs::remove_file(dir.path().join(Domain::Mahadasha.input_filename())).unwrap();
        let second = run_analysis(&AnalysisRequest::new(dir.path(), ConsolidationMode::Structured));
        assert_eq!(second.failed_domain, Some(Domain::Mahadasha));
        assert_eq!(second.generated_files.len(), 3);

        assert!(!dir.path().join(SUMMARY_FILENAME).exists());
        for domain in [Domain::Mahadasha, Domain::Antardasha, Domain::Paryantardasha, Domain::Yoga] {
            assert!(!dir.path().join(domain.output_filename()).exists(), "{}", domain);
        }
        assert!(second.generated_files.iter().all(|p| p.exists()));
    }

    #[test]
    fn test_in_memory_inputs_override_files() {
        let dir = tempfile::tempdir().unwrap();
        let mut request = AnalysisRequest::new(dir.path(), ConsolidationMode::Structured);
        for domain in ALL_DOMAINS {
            request = request.with_input(domain, value(domain));
        }
        let result = run_analysis(&request);
        assert!(result.is_success(), "{}", result.message);
    }
}
