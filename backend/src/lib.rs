//! # KP Analyzer
//!
//! Krishnamurti Paddhati (KP) astrology report pipeline.
//!
//! Seven upstream chart documents (planet positions, KP planets, house cusps,
//! mahadasha, antardasha, paryantardasha, yogas) are validated, projected into
//! typed records, rendered as text reports and merged into one consolidated
//! summary.
//!
//! ## Architecture
//!
//! - [`models`]: domain records and static lookup tables
//! - [`parsing`]: document validation and per-domain projection
//! - [`render`]: per-domain text reports
//! - [`consolidation`]: the cross-domain summary, from records or from report text
//! - [`services`]: the analysis run, plus upstream download and time-zone lookup
//! - [`http`]: Axum boundary service (feature `http-server`)
//! - [`config`]: TOML and environment configuration
//!
//! Data flows one way:
//!
//! ```text
//! upstream JSON → ChartDocument → records → text reports
//!                                      └──→ ConsolidatedReport → summary
//! ```

pub mod config;
pub mod consolidation;
pub mod error;
pub mod models;
pub mod parsing;
pub mod render;
pub mod services;

#[cfg(feature = "http-server")]
pub mod http;

#[cfg(test)]
mod test_fixtures;

pub use error::{KpError, KpResult};
