//! Service layer: the analysis run and, with `http-server`, the upstream
//! download and time-zone steps that precede it.

pub mod orchestrator;

#[cfg(feature = "http-server")]
pub mod fetcher;

#[cfg(feature = "http-server")]
pub mod timezone;

pub use orchestrator::{run_analysis, AnalysisRequest, AnalysisResult, RunStatus};

#[cfg(feature = "http-server")]
pub use fetcher::{fetch_all, ChartParams, FetchOutcome, FetchStatus, UpstreamClient, VedicApiClient};

#[cfg(feature = "http-server")]
pub use timezone::{FixedOffset, TimezoneResolver, TzfResolver};
