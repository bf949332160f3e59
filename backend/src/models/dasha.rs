//! Vimshottari dasha periods.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Nesting level of a dasha period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DashaLevel {
    Mahadasha,
    Antardasha,
    Paryantardasha,
}

/// A labelled sub-period with its date string, kept verbatim from upstream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodEntry {
    pub label: String,
    pub date: String,
}

impl PeriodEntry {
    pub fn new(label: impl Into<String>, date: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            date: date.into(),
        }
    }
}

/// A period owned by one planet (or by a "Mahadasha>Antardasha" pair for
/// paryantardashas) together with its ordered child periods.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashaPeriod {
    pub level: DashaLevel,
    pub owner: String,
    pub periods: Vec<PeriodEntry>,
}

impl DashaPeriod {
    pub fn new(level: DashaLevel, owner: impl Into<String>) -> Self {
        Self {
            level,
            owner: owner.into(),
            periods: Vec::new(),
        }
    }
}

/// Key of the mahadasha / antardasha / start-date fields in a snapshot.
pub const KEY_MAHADASHA: &str = "mahadasha";
pub const KEY_ANTARDASHA: &str = "antardasha";
pub const KEY_PRATYANTARDASHA: &str = "pratyantaradasha";
pub const KEY_START_DATE: &str = "start date";

/// The running dasha chain at one instant (birth or now).
///
/// Stored as lower-cased `key -> value` pairs so the same shape comes out of
/// both the JSON and the rendered-text paths.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashaSnapshot {
    pub fields: BTreeMap<String, String>,
}

impl DashaSnapshot {
    /// Build from a `Ve>Mo>Ma` style chain and its start time.
    pub fn from_chain(chain: &[String], start_date: &str) -> Self {
        let level = |i: usize| chain.get(i).cloned().unwrap_or_else(|| "N/A".to_string());
        let mut fields = BTreeMap::new();
        fields.insert(KEY_MAHADASHA.to_string(), level(0));
        fields.insert(KEY_ANTARDASHA.to_string(), level(1));
        fields.insert(KEY_PRATYANTARDASHA.to_string(), level(2));
        fields.insert(KEY_START_DATE.to_string(), start_date.trim().to_string());
        Self { fields }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }

    pub fn mahadasha(&self) -> Option<&str> {
        self.get(KEY_MAHADASHA)
    }

    pub fn antardasha(&self) -> Option<&str> {
        self.get(KEY_ANTARDASHA)
    }

    pub fn pratyantardasha(&self) -> Option<&str> {
        self.get(KEY_PRATYANTARDASHA)
    }

    pub fn start_date(&self) -> Option<&str> {
        self.get(KEY_START_DATE)
    }
}

/// Mahadasha document: birth and current chains plus the full sequence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MahadashaSummary {
    pub birth: Option<DashaSnapshot>,
    pub current: Option<DashaSnapshot>,
    /// Mahadasha lords in order with their start dates
    pub sequence: Vec<PeriodEntry>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_from_short_chain_fills_na() {
        let snap = DashaSnapshot::from_chain(&["Venus".to_string()], " 2024-01-15 ");
        assert_eq!(snap.mahadasha(), Some("Venus"));
        assert_eq!(snap.antardasha(), Some("N/A"));
        assert_eq!(snap.pratyantardasha(), Some("N/A"));
        assert_eq!(snap.start_date(), Some("2024-01-15"));
    }
}
