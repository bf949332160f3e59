//! Data Transfer Objects for the HTTP API.

use std::path::PathBuf;

use serde::{Deserialize, Deserializer, Serialize};

/// Accepts coordinates sent either as JSON numbers or as numeric strings.
fn deserialize_coordinate<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumberOrString {
        Number(f64),
        String(String),
    }

    match Option::<NumberOrString>::deserialize(deserializer)? {
        None => Ok(None),
        Some(NumberOrString::Number(n)) => Ok(Some(n)),
        Some(NumberOrString::String(s)) => s
            .trim()
            .parse::<f64>()
            .map(Some)
            .map_err(|_| serde::de::Error::custom(format!("invalid coordinate: {}", s))),
    }
}

/// Request body for POST /generate-params.
///
/// Fields are optional at the serde level so that a missing field is
/// reported as a validation error naming it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GenerateParamsRequest {
    /// Date of birth, DD/MM/YYYY
    #[serde(default)]
    pub dob: Option<String>,
    /// Time of birth, HH:MM
    #[serde(default)]
    pub tob: Option<String>,
    #[serde(default, deserialize_with = "deserialize_coordinate")]
    pub lat: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_coordinate")]
    pub lon: Option<f64>,
    /// UTC offset in hours; resolved from the coordinates when absent
    #[serde(default, deserialize_with = "deserialize_coordinate")]
    pub tz: Option<f64>,
}

impl GenerateParamsRequest {
    /// Names of the required fields that are missing or blank.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let blank = |s: &Option<String>| s.as_deref().map_or(true, |v| v.trim().is_empty());
        let mut missing = Vec::new();
        if blank(&self.dob) {
            missing.push("dob");
        }
        if blank(&self.tob) {
            missing.push("tob");
        }
        if self.lat.is_none() {
            missing.push("lat");
        }
        if self.lon.is_none() {
            missing.push("lon");
        }
        missing
    }
}

/// Response body of a completed analysis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateParamsResponse {
    pub status: String,
    pub message: String,
    pub run_id: String,
    pub output_file: PathBuf,
    pub generated_files: Vec<PathBuf>,
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub data_dir: String,
}
