//! Ingestion of upstream astrology documents.
//!
//! - [`document`]: resolve an [`InputSource`] into a validated [`ChartDocument`]
//! - [`upstream`]: project each domain's payload into typed records
//!
//! # Example
//!
//! ```no_run
//! use kp_analyzer::models::Domain;
//! use kp_analyzer::parsing::{upstream, InputSource};
//! use std::path::PathBuf;
//!
//! let doc = InputSource::Path(PathBuf::from("user_data/input_kp_house_details.json"))
//!     .resolve(Domain::House)
//!     .expect("valid houses document");
//! let houses = upstream::houses_from(&doc).expect("twelve houses");
//! assert_eq!(houses.len(), 12);
//! ```

pub mod document;
pub mod upstream;

#[cfg(test)]
mod upstream_tests;

pub use document::{read_nonempty, ChartDocument, InputSource};
