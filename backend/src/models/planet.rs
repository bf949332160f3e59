//! Planets (grahas) and per-planet chart records.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The nine planets of the KP system, lunar nodes included.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Planet {
    Sun,
    Moon,
    Mars,
    Mercury,
    Jupiter,
    Venus,
    Saturn,
    Rahu,
    Ketu,
}

/// All 9 planets in traditional order.
pub const ALL_PLANETS: [Planet; 9] = [
    Planet::Sun,
    Planet::Moon,
    Planet::Mars,
    Planet::Mercury,
    Planet::Jupiter,
    Planet::Venus,
    Planet::Saturn,
    Planet::Rahu,
    Planet::Ketu,
];

impl Planet {
    /// English name, as used by the upstream service.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Sun => "Sun",
            Self::Moon => "Moon",
            Self::Mars => "Mars",
            Self::Mercury => "Mercury",
            Self::Jupiter => "Jupiter",
            Self::Venus => "Venus",
            Self::Saturn => "Saturn",
            Self::Rahu => "Rahu",
            Self::Ketu => "Ketu",
        }
    }

    /// Two-letter abbreviation used in dasha strings ("Ve>Mo>Ma").
    pub const fn abbreviation(self) -> &'static str {
        match self {
            Self::Sun => "Su",
            Self::Moon => "Mo",
            Self::Mars => "Ma",
            Self::Mercury => "Me",
            Self::Jupiter => "Ju",
            Self::Venus => "Ve",
            Self::Saturn => "Sa",
            Self::Rahu => "Ra",
            Self::Ketu => "Ke",
        }
    }

    /// Keywords for the planet as a star lord.
    pub const fn significance(self) -> &'static str {
        match self {
            Self::Sun => "Soul, Vitality, Authority",
            Self::Moon => "Mind, Emotions, Public",
            Self::Mars => "Courage, Energy, Conflicts",
            Self::Mercury => "Intellect, Communication, Trade",
            Self::Jupiter => "Wisdom, Expansion, Fortune",
            Self::Venus => "Relationships, Luxury, Arts",
            Self::Saturn => "Discipline, Challenges, Longevity",
            Self::Rahu => "Unconventional, Obsessions, Modern Tech",
            Self::Ketu => "Spirituality, Detachment, Past Karma",
        }
    }

    /// Expand an abbreviation or name; anything unrecognized is returned trimmed.
    pub fn expand(token: &str) -> String {
        token
            .trim()
            .parse::<Planet>()
            .map(|p| p.name().to_string())
            .unwrap_or_else(|_| token.trim().to_string())
    }
}

impl fmt::Display for Planet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Planet {
    type Err = String;

    /// Accepts the English name or the two-letter abbreviation, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        ALL_PLANETS
            .iter()
            .copied()
            .find(|p| {
                p.name().eq_ignore_ascii_case(needle) || p.abbreviation().eq_ignore_ascii_case(needle)
            })
            .ok_or_else(|| format!("Unknown planet: {}", s))
    }
}

/// One planet's placement, as reported by either planet endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanetRecord {
    pub planet: Planet,
    /// Name as printed by the upstream service (usually the English name)
    pub name: String,
    /// Full name ("Sun"); the planet-position endpoint pairs it with an abbreviation
    pub full_name: String,
    pub zodiac: String,
    pub house: u8,
    pub nakshatra: String,
    pub nakshatra_pada: u8,
    pub nakshatra_lord: String,
    pub sign_lord: String,
    /// Sub lord followed by sub-sub lord
    pub sub_lord_chain: Vec<String>,
    pub global_degree: f64,
    pub local_degree: f64,
    pub retrograde: bool,
    pub combust: bool,
    /// Nakshatra-based sign, only reported by the KP planets endpoint
    pub pseudo_rasi: Option<String>,
}

impl PlanetRecord {
    /// Sublord chain joined with arrows, as printed in reports.
    pub fn sub_lord_display(&self) -> String {
        self.sub_lord_chain.join(" → ")
    }
}

/// Dasa strings attached to the planet-position document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DasaStamp {
    pub birth_dasa: Option<String>,
    pub current_dasa: Option<String>,
    pub birth_dasa_time: Option<String>,
    pub current_dasa_time: Option<String>,
}

/// Planet-position document: sidereal placements with combustion flags.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlanetPositions {
    pub planets: Vec<PlanetRecord>,
    pub dasa: DasaStamp,
}

/// KP planets document: nakshatra-based placements and sublord chains.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KpPlanets {
    pub planets: Vec<PlanetRecord>,
    pub midheaven: f64,
    pub ascendant: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_planet_from_name_and_abbreviation() {
        assert_eq!("Venus".parse::<Planet>().unwrap(), Planet::Venus);
        assert_eq!("ve".parse::<Planet>().unwrap(), Planet::Venus);
        assert_eq!(" KETU ".parse::<Planet>().unwrap(), Planet::Ketu);
        assert!("Ascendant".parse::<Planet>().is_err());
    }

    #[test]
    fn test_expand_keeps_unknown_tokens() {
        assert_eq!(Planet::expand("Me"), "Mercury");
        assert_eq!(Planet::expand(" Ra "), "Rahu");
        assert_eq!(Planet::expand("Pluto"), "Pluto");
    }

    #[test]
    fn test_abbreviations_are_unique() {
        let mut abbrs: Vec<_> = ALL_PLANETS.iter().map(|p| p.abbreviation()).collect();
        abbrs.sort();
        abbrs.dedup();
        assert_eq!(abbrs.len(), 9);
    }
}
