//! Yoga (planetary combination) records.

use serde::{Deserialize, Serialize};

/// A detected yoga with its computed strength.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YogaRecord {
    /// Always ends in "Yoga" or "Yogas"
    pub name: String,
    pub participating_planets: Vec<String>,
    /// 0..=100
    pub strength_percent: f64,
    pub involved_houses: Vec<u8>,
    pub meaning: String,
}

/// Yoga document: detected yogas plus the upstream category counts.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct YogaList {
    pub yogas: Vec<YogaRecord>,
    pub total_count: u32,
    pub raja_count: u32,
    pub dhana_count: u32,
    pub daridra_count: u32,
}

/// Append " Yoga" to names that do not already end in "Yoga"/"Yogas".
pub fn normalize_yoga_name(raw: &str) -> String {
    let name = raw.trim();
    let lower = name.to_lowercase();
    if lower.ends_with("yoga") || lower.ends_with("yogas") {
        name.to_string()
    } else {
        format!("{} Yoga", name)
    }
}
