//! Upstream document loading and validation.

use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{KpError, KpResult};
use crate::models::Domain;

/// Status code the astrology service sets on successful answers.
pub const STATUS_OK: i64 = 200;

/// Where a document comes from; resolved exactly once into a [`ChartDocument`].
#[derive(Debug, Clone)]
pub enum InputSource {
    /// A payload already held in memory (e.g. straight from the fetcher)
    InMemory(Value),
    /// A persisted `input_kp_*.json` file
    Path(PathBuf),
}

impl InputSource {
    /// Load (if needed) and validate the document for `domain`.
    pub fn resolve(self, domain: Domain) -> KpResult<ChartDocument> {
        match self {
            InputSource::InMemory(value) => ChartDocument::from_value(domain, value),
            InputSource::Path(path) => ChartDocument::load(domain, &path),
        }
    }
}

impl From<PathBuf> for InputSource {
    fn from(path: PathBuf) -> Self {
        InputSource::Path(path)
    }
}

impl From<Value> for InputSource {
    fn from(value: Value) -> Self {
        InputSource::InMemory(value)
    }
}

/// A validated upstream answer: status 200 and a non-empty `response`.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartDocument {
    pub domain: Domain,
    pub status: i64,
    pub response: Value,
}

impl ChartDocument {
    /// Validate a raw JSON payload.
    pub fn from_value(domain: Domain, mut value: Value) -> KpResult<Self> {
        let object = value
            .as_object_mut()
            .ok_or_else(|| KpError::invalid_data(domain, "Document is not a JSON object"))?;

        let status = object
            .get("status")
            .and_then(Value::as_i64)
            .ok_or_else(|| KpError::invalid_data(domain, "Missing status marker"))?;
        if status != STATUS_OK {
            return Err(KpError::invalid_data(
                domain,
                format!("Invalid response status {}", status),
            ));
        }

        let response = match object.remove("response") {
            None | Some(Value::Null) => {
                return Err(KpError::invalid_data(domain, "Missing 'response' payload"));
            }
            Some(response) => response,
        };
        if is_empty_payload(&response) {
            return Err(KpError::invalid_data(domain, "Empty 'response' payload"));
        }

        Ok(Self {
            domain,
            status,
            response,
        })
    }

    /// Read and validate a persisted document.
    pub fn load(domain: Domain, path: &Path) -> KpResult<Self> {
        let content = read_nonempty(domain, path)?;
        let value: Value =
            serde_json::from_str(&content).map_err(|source| KpError::Json { domain, source })?;
        Self::from_value(domain, value)
    }

    /// Deserialize the `response` payload into a typed shape.
    pub fn parse<T: DeserializeOwned>(&self) -> KpResult<T> {
        T::deserialize(&self.response)
            .map_err(|e| KpError::invalid_data(self.domain, format!("Unexpected response shape: {}", e)))
    }
}

fn is_empty_payload(value: &Value) -> bool {
    match value {
        Value::Object(map) => map.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::String(s) => s.trim().is_empty(),
        _ => false,
    }
}

/// Read a pipeline file, distinguishing "absent" from "present but empty".
pub fn read_nonempty(domain: Domain, path: &Path) -> KpResult<String> {
    if !path.exists() {
        return Err(KpError::MissingInputFile {
            domain,
            path: path.to_path_buf(),
        });
    }
    let content = fs::read_to_string(path).map_err(|e| KpError::io(path, e))?;
    if content.trim().is_empty() {
        return Err(KpError::EmptyInputFile {
            domain,
            path: path.to_path_buf(),
        });
    }
    Ok(content)
}
