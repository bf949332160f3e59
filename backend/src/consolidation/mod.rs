//! Cross-domain summary.
//!
//! A [`ConsolidatedReport`] can be assembled two ways:
//!
//! - [`ConsolidatedReport::from_records`]: straight from the records the
//!   renderers produced (the default, see [`ConsolidationMode::Structured`])
//! - [`text_parser::ReportParser`]: by reading the rendered text reports back
//!   line by line ([`ConsolidationMode::Reparse`])
//!
//! Both feed the same [`formatter::format_report`], and for the same inputs
//! both produce the same summary.

pub mod formatter;
pub mod text_parser;


use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::KpError;
use crate::models::{
    DashaPeriod, DashaSnapshot, HouseRecord, KpPlanets, MahadashaSummary, YogaList,
};
use crate::render::{yes_no, DomainRecords};

pub use formatter::format_report;
pub use text_parser::ReportParser;

/// Yogas strictly above this strength are listed in the summary.
pub const SIGNIFICANT_STRENGTH: f64 = 80.0;

/// How the summary is rebuilt once all domain reports are rendered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConsolidationMode {
    #[default]
    Structured,
    Reparse,
}

impl ConsolidationMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Structured => "structured",
            Self::Reparse => "reparse",
        }
    }
}

impl fmt::Display for ConsolidationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConsolidationMode {
    type Err = KpError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "structured" | "records" => Ok(Self::Structured),
            "reparse" | "text" => Ok(Self::Reparse),
            other => Err(KpError::Configuration(format!(
                "Unknown consolidation mode '{}'. Valid options: structured, reparse",
                other
            ))),
        }
    }
}

/// The six planet attributes carried into the summary, kept as display strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanetEntry {
    pub name: String,
    pub house: String,
    pub nakshatra: String,
    pub lord: String,
    pub retrograde: String,
    pub combust: String,
    pub sublord: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct YogaEntry {
    pub name: String,
    pub planets: Vec<String>,
    /// Strength as printed, e.g. "90.00%"
    pub strength: Option<String>,
}

impl YogaEntry {
    /// Numeric strength; missing, non-numeric or non-finite strengths count as zero.
    pub fn strength_percent(&self) -> f64 {
        self.strength
            .as_deref()
            .map(|s| s.trim().trim_end_matches('%').trim())
            .and_then(|s| s.parse::<f64>().ok())
            .filter(|v| v.is_finite())
            .unwrap_or(0.0)
    }

    pub fn is_significant(&self) -> bool {
        self.strength_percent() > SIGNIFICANT_STRENGTH
    }
}

/// Everything the summary needs, merged across domains.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConsolidatedReport {
    pub birth_dasha: Option<DashaSnapshot>,
    pub current_dasha: Option<DashaSnapshot>,
    pub antardashas: Vec<DashaPeriod>,
    pub paryantardashas: Vec<DashaPeriod>,
    pub planets: Vec<PlanetEntry>,
    /// House number to occupant names
    pub houses: BTreeMap<u8, Vec<String>>,
    pub yogas: Vec<YogaEntry>,
}

impl ConsolidatedReport {
    pub fn significant_yogas(&self) -> impl Iterator<Item = &YogaEntry> {
        self.yogas.iter().filter(|y| y.is_significant())
    }

    /// Antardashas listed under the current mahadasha, if both are known.
    pub fn current_antardashas(&self) -> Option<&DashaPeriod> {
        let current = self.current_dasha.as_ref()?.mahadasha()?;
        self.antardashas.iter().find(|p| p.owner == current)
    }

    /// Build directly from rendered records.
    pub fn from_records(records: &ReportRecords) -> Self {
        let mut report = Self::default();

        if let Some(MahadashaSummary { birth, current, .. }) = &records.mahadasha {
            report.birth_dasha = birth.clone();
            report.current_dasha = current.clone();
        }
        report.antardashas = records.antardashas.clone();
        report.paryantardashas = records.paryantardashas.clone();

        if let Some(kp) = &records.kp_planets {
            report.planets = kp
                .planets
                .iter()
                .map(|p| PlanetEntry {
                    name: p.full_name.clone(),
                    house: p.house.to_string(),
                    nakshatra: p.nakshatra.clone(),
                    lord: p.nakshatra_lord.clone(),
                    retrograde: yes_no(p.retrograde).to_string(),
                    combust: yes_no(p.combust).to_string(),
                    sublord: p.sub_lord_display(),
                })
                .collect();
        }

        report.houses = records
            .houses
            .iter()
            .map(|h| (h.house_number, h.occupant_names()))
            .collect();

        if let Some(list) = &records.yogas {
            report.yogas = list
                .yogas
                .iter()
                .map(|y| YogaEntry {
                    name: y.name.clone(),
                    planets: y.participating_planets.clone(),
                    strength: Some(format!("{:.2}%", y.strength_percent)),
                })
                .collect();
        }

        report
    }
}

/// Records collected from the renderers over one run.
#[derive(Debug, Clone, Default)]
pub struct ReportRecords {
    pub mahadasha: Option<MahadashaSummary>,
    pub antardashas: Vec<DashaPeriod>,
    pub paryantardashas: Vec<DashaPeriod>,
    pub kp_planets: Option<KpPlanets>,
    pub houses: Vec<HouseRecord>,
    pub yogas: Option<YogaList>,
}

impl ReportRecords {
    /// Keep the parts of a domain's records the summary uses.
    pub fn absorb(&mut self, records: DomainRecords) {
        match records {
            // Planet positions only feed the planet-analysis renderer
            DomainRecords::PlanetPositions(_) => {}
            DomainRecords::PlanetAnalysis(kp) => self.kp_planets = Some(kp),
            DomainRecords::Houses(h) => self.houses = h,
            DomainRecords::Mahadasha(m) => self.mahadasha = Some(m),
            DomainRecords::Antardasha(a) => self.antardashas = a,
            DomainRecords::Paryantardasha(p) => self.paryantardashas = p,
            DomainRecords::Yogas(y) => self.yogas = Some(y),
        }
    }
}
