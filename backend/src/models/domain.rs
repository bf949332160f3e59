//! The seven chart data domains and their file naming.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// One upstream endpoint and the report rendered from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Domain {
    PlanetPosition,
    House,
    PlanetAnalysis,
    Mahadasha,
    Antardasha,
    Paryantardasha,
    Yoga,
}

/// All domains in pipeline order.
pub const ALL_DOMAINS: [Domain; 7] = [
    Domain::PlanetPosition,
    Domain::House,
    Domain::PlanetAnalysis,
    Domain::Mahadasha,
    Domain::Antardasha,
    Domain::Paryantardasha,
    Domain::Yoga,
];

/// File name of the consolidated summary.
pub const SUMMARY_FILENAME: &str = "output_kp_comprehensive_analysis.txt";

impl Domain {
    /// Stable snake_case label used in logs, errors and CLI arguments.
    pub const fn label(self) -> &'static str {
        match self {
            Self::PlanetPosition => "planet_position",
            Self::House => "house",
            Self::PlanetAnalysis => "planet_analysis",
            Self::Mahadasha => "mahadasha",
            Self::Antardasha => "antardasha",
            Self::Paryantardasha => "paryantardasha",
            Self::Yoga => "yoga",
        }
    }

    /// Endpoint path relative to the astrology API base URL.
    pub const fn endpoint(self) -> &'static str {
        match self {
            Self::PlanetPosition => "horoscope/planet-details",
            Self::House => "extended-horoscope/kp-houses",
            Self::PlanetAnalysis => "extended-horoscope/kp-planets",
            Self::Mahadasha => "dashas/maha-dasha",
            Self::Antardasha => "dashas/antar-dasha",
            Self::Paryantardasha => "dashas/paryantar-dasha",
            Self::Yoga => "extended-horoscope/yoga-list",
        }
    }

    /// Name of the persisted upstream document.
    pub const fn input_filename(self) -> &'static str {
        match self {
            Self::PlanetPosition => "input_kp_planet_position_details.json",
            Self::House => "input_kp_house_details.json",
            Self::PlanetAnalysis => "input_kp_planet_details.json",
            Self::Mahadasha => "input_kp_mahadasha_details.json",
            Self::Antardasha => "input_kp_antardasha_details.json",
            Self::Paryantardasha => "input_kp_paryantardasha_details.json",
            Self::Yoga => "input_kp_list_of_yogas_details.json",
        }
    }

    /// Name of the rendered text report.
    pub const fn output_filename(self) -> &'static str {
        match self {
            Self::PlanetPosition => "output_kp_planet_position_analysis.txt",
            Self::House => "output_kp_house_analysis.txt",
            Self::PlanetAnalysis => "output_kp_planet_analysis.txt",
            Self::Mahadasha => "output_kp_mahadasha_details.txt",
            Self::Antardasha => "output_kp_antardasha_details.txt",
            Self::Paryantardasha => "output_kp_paryantardasha_details.txt",
            Self::Yoga => "output_kp_list_of_yogas_details.txt",
        }
    }

    /// Whether the consolidation parser re-reads this domain's report.
    ///
    /// The planet-position report only supplements planet data.
    pub const fn is_reparsed(self) -> bool {
        !matches!(self, Self::PlanetPosition)
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Domain {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace('-', "_");
        ALL_DOMAINS
            .iter()
            .copied()
            .find(|d| d.label() == normalized)
            .ok_or_else(|| format!("Unknown domain: {}", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_from_str() {
        assert_eq!("house".parse::<Domain>().unwrap(), Domain::House);
        assert_eq!("Planet-Position".parse::<Domain>().unwrap(), Domain::PlanetPosition);
        let err = "transit".parse::<Domain>().unwrap_err();
        assert!(err.contains("Unknown domain"));
    }

    #[test]
    fn test_file_names_are_unique() {
        let mut inputs: Vec<_> = ALL_DOMAINS.iter().map(|d| d.input_filename()).collect();
        let mut outputs: Vec<_> = ALL_DOMAINS.iter().map(|d| d.output_filename()).collect();
        inputs.sort();
        inputs.dedup();
        outputs.sort();
        outputs.dedup();
        assert_eq!(inputs.len(), 7);
        assert_eq!(outputs.len(), 7);
        assert!(!outputs.contains(&SUMMARY_FILENAME));
    }

    #[test]
    fn test_only_planet_position_is_not_reparsed() {
        let reparsed: Vec<_> = ALL_DOMAINS.iter().filter(|d| d.is_reparsed()).collect();
        assert_eq!(reparsed.len(), 6);
        assert!(!Domain::PlanetPosition.is_reparsed());
    }
}
