//! Typed shapes of the astrology service answers and their conversion into
//! domain records.
//!
//! Each `*_from` function takes a validated [`ChartDocument`] and projects
//! the fields the reports use; anything else in the payload is ignored.

use std::collections::BTreeSet;

use log::debug;
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

use super::document::ChartDocument;
use crate::error::{KpError, KpResult};
use crate::models::lookup::sign_lord;
use crate::models::{
    normalize_yoga_name, DasaStamp, DashaLevel, DashaPeriod, DashaSnapshot, Domain, HouseOccupant,
    HouseRecord, KpPlanets, MahadashaSummary, PeriodEntry, Planet, PlanetPositions, PlanetRecord,
    YogaList, YogaRecord,
};

/// Number of house cusps every houses document must carry.
pub const HOUSE_COUNT: usize = 12;

/// Accepts integers, integral floats or numeric strings for small counters
/// (house numbers, padas, nakshatra numbers).
#[derive(Deserialize)]
#[serde(untagged)]
enum SmallInt {
    Int(u64),
    Float(f64),
    Text(String),
}

impl SmallInt {
    fn into_u8(self) -> Result<u8, String> {
        let value = match self {
            SmallInt::Int(i) => i,
            SmallInt::Float(f) if f.fract() == 0.0 && f >= 0.0 => f as u64,
            SmallInt::Float(f) => return Err(format!("expected an integer, got {}", f)),
            SmallInt::Text(s) => s
                .trim()
                .parse::<u64>()
                .map_err(|e| format!("expected an integer, got '{}': {}", s, e))?,
        };
        u8::try_from(value).map_err(|_| format!("value {} out of range", value))
    }
}

fn deserialize_small_int<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;
    SmallInt::deserialize(deserializer)?
        .into_u8()
        .map_err(D::Error::custom)
}

fn deserialize_small_ints<'de, D>(deserializer: D) -> Result<Vec<u8>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;
    Vec::<SmallInt>::deserialize(deserializer)?
        .into_iter()
        .map(|v| v.into_u8().map_err(D::Error::custom))
        .collect()
}

// =============================================================================
// Planet position (horoscope/planet-details)
// =============================================================================

/// Raw JSON structure of one planet-details entry
#[derive(Debug, Deserialize)]
struct RawPositionPlanet {
    name: String,
    full_name: String,
    zodiac: String,
    #[serde(deserialize_with = "deserialize_small_int")]
    house: u8,
    nakshatra: String,
    #[serde(deserialize_with = "deserialize_small_int")]
    nakshatra_pada: u8,
    nakshatra_lord: String,
    #[serde(default)]
    zodiac_lord: Option<String>,
    #[serde(default)]
    sub_lord: Option<String>,
    #[serde(default)]
    sub_sub_lord: Option<String>,
    local_degree: f64,
    global_degree: f64,
    #[serde(default)]
    retro: bool,
    #[serde(default)]
    is_combust: bool,
}

/// Indexed planet entries ("0", "1", ...) in numeric order.
fn indexed_entries(map: &Map<String, Value>) -> Vec<(u32, &Value)> {
    let mut entries: Vec<(u32, &Value)> = map
        .iter()
        .filter_map(|(k, v)| k.parse::<u32>().ok().map(|i| (i, v)))
        .collect();
    entries.sort_by_key(|(i, _)| *i);
    entries
}

fn response_object(doc: &ChartDocument) -> KpResult<&Map<String, Value>> {
    doc.response
        .as_object()
        .ok_or_else(|| KpError::invalid_data(doc.domain, "Expected 'response' to be an object"))
}

fn optional_string(map: &Map<String, Value>, key: &str) -> Option<String> {
    map.get(key).and_then(Value::as_str).map(|s| s.trim().to_string())
}

fn lord_chain(sub_lord: Option<String>, sub_sub_lord: Option<String>) -> Vec<String> {
    [sub_lord, sub_sub_lord]
        .into_iter()
        .flatten()
        .filter(|s| !s.trim().is_empty())
        .collect()
}

/// Project the planet-details document.
pub fn planet_positions_from(doc: &ChartDocument) -> KpResult<PlanetPositions> {
    let map = response_object(doc)?;
    let mut planets = Vec::new();

    for (index, value) in indexed_entries(map) {
        let raw: RawPositionPlanet = serde_json::from_value(value.clone()).map_err(|e| {
            KpError::invalid_data(doc.domain, format!("Planet entry {}: {}", index, e))
        })?;
        let Ok(planet) = raw.full_name.parse::<Planet>() else {
            debug!("Skipping non-planet entry {} ({})", index, raw.full_name);
            continue;
        };
        let sign_lord = raw
            .zodiac_lord
            .clone()
            .or_else(|| sign_lord(&raw.zodiac).map(|p| p.name().to_string()))
            .unwrap_or_default();
        planets.push(PlanetRecord {
            planet,
            name: raw.name,
            full_name: raw.full_name,
            zodiac: raw.zodiac,
            house: raw.house,
            nakshatra: raw.nakshatra,
            nakshatra_pada: raw.nakshatra_pada,
            nakshatra_lord: raw.nakshatra_lord,
            sign_lord,
            sub_lord_chain: lord_chain(raw.sub_lord, raw.sub_sub_lord),
            global_degree: raw.global_degree,
            local_degree: raw.local_degree,
            retrograde: raw.retro,
            combust: raw.is_combust,
            pseudo_rasi: None,
        });
    }

    Ok(PlanetPositions {
        planets,
        dasa: DasaStamp {
            birth_dasa: optional_string(map, "birth_dasa"),
            current_dasa: optional_string(map, "current_dasa"),
            birth_dasa_time: optional_string(map, "birth_dasa_time"),
            current_dasa_time: optional_string(map, "current_dasa_time"),
        },
    })
}

// =============================================================================
// KP planets (extended-horoscope/kp-planets)
// =============================================================================

/// Raw JSON structure of one KP planet entry
#[derive(Debug, Deserialize)]
struct RawKpPlanet {
    name: String,
    #[serde(default)]
    full_name: Option<String>,
    zodiac: String,
    #[serde(deserialize_with = "deserialize_small_int")]
    house: u8,
    #[serde(default)]
    retro: bool,
    #[serde(default)]
    is_combust: bool,
    global_degree: f64,
    local_degree: f64,
    pseudo_nakshatra: String,
    #[serde(deserialize_with = "deserialize_small_int")]
    pseudo_nakshatra_pada: u8,
    pseudo_nakshatra_lord: String,
    sub_lord: String,
    sub_sub_lord: String,
    #[serde(default)]
    pseudo_rasi_lord: Option<String>,
    #[serde(default)]
    pseudo_rasi: Option<String>,
}

/// Project the KP planets document, skipping the angular points.
pub fn kp_planets_from(doc: &ChartDocument) -> KpResult<KpPlanets> {
    let map = response_object(doc)?;
    let mut planets = Vec::new();

    for (index, value) in indexed_entries(map) {
        let raw: RawKpPlanet = serde_json::from_value(value.clone()).map_err(|e| {
            KpError::invalid_data(doc.domain, format!("Planet entry {}: {}", index, e))
        })?;
        let Ok(planet) = raw.name.parse::<Planet>() else {
            debug!("Skipping non-planet entry {} ({})", index, raw.name);
            continue;
        };
        let pseudo_rasi = raw.pseudo_rasi.clone();
        let sign_lord = raw
            .pseudo_rasi_lord
            .clone()
            .or_else(|| {
                sign_lord(pseudo_rasi.as_deref().unwrap_or(&raw.zodiac)).map(|p| p.name().to_string())
            })
            .unwrap_or_default();
        planets.push(PlanetRecord {
            planet,
            full_name: raw.full_name.unwrap_or_else(|| planet.name().to_string()),
            name: raw.name,
            zodiac: raw.zodiac,
            house: raw.house,
            nakshatra: raw.pseudo_nakshatra,
            nakshatra_pada: raw.pseudo_nakshatra_pada,
            nakshatra_lord: raw.pseudo_nakshatra_lord,
            sign_lord,
            sub_lord_chain: lord_chain(Some(raw.sub_lord), Some(raw.sub_sub_lord)),
            global_degree: raw.global_degree,
            local_degree: raw.local_degree,
            retrograde: raw.retro,
            combust: raw.is_combust,
            pseudo_rasi,
        });
    }

    Ok(KpPlanets {
        planets,
        midheaven: map.get("midheaven").and_then(Value::as_f64).unwrap_or(0.0),
        ascendant: map.get("ascendant").and_then(Value::as_f64).unwrap_or(0.0),
    })
}

// =============================================================================
// KP houses (extended-horoscope/kp-houses)
// =============================================================================

/// Raw JSON structure of a planet listed inside a house
#[derive(Debug, Deserialize)]
struct RawHousePlanet {
    name: String,
    full_name: String,
    #[serde(default)]
    retro: bool,
    nakshatra: String,
    #[serde(deserialize_with = "deserialize_small_int")]
    nakshatra_pada: u8,
    #[serde(deserialize_with = "deserialize_small_int")]
    nakshatra_no: u8,
}

/// Raw JSON structure of one house cusp
#[derive(Debug, Deserialize)]
struct RawHouse {
    #[serde(deserialize_with = "deserialize_small_int")]
    house: u8,
    start_rasi: String,
    end_rasi: String,
    start_nakshatra_lord: String,
    end_nakshatra_lord: String,
    cusp_sub_lord: String,
    cusp_sub_sub_lord: String,
    bhavmadhya: f64,
    length: f64,
    local_start_degree: f64,
    local_end_degree: f64,
    global_start_degree: f64,
    global_end_degree: f64,
    #[serde(default)]
    planets: Vec<RawHousePlanet>,
}

/// Project the houses document; exactly twelve cusps numbered 1..=12.
pub fn houses_from(doc: &ChartDocument) -> KpResult<Vec<HouseRecord>> {
    let raw: Vec<RawHouse> = doc.parse()?;
    if raw.len() != HOUSE_COUNT {
        return Err(KpError::invalid_data(
            doc.domain,
            format!("Expected {} houses, found {}", HOUSE_COUNT, raw.len()),
        ));
    }

    let numbers: BTreeSet<u8> = raw.iter().map(|h| h.house).collect();
    if numbers != (1..=12).collect::<BTreeSet<u8>>() {
        return Err(KpError::invalid_data(
            doc.domain,
            format!("House numbers must be exactly 1..12, found {:?}", numbers),
        ));
    }

    Ok(raw.into_iter().map(house_record).collect())
}

fn house_record(raw: RawHouse) -> HouseRecord {
    let occupants = raw
        .planets
        .into_iter()
        .filter_map(|p| {
            let planet = p.full_name.parse::<Planet>().ok().or_else(|| p.name.parse().ok());
            match planet {
                Some(planet) => Some(HouseOccupant {
                    planet,
                    name: p.name,
                    full_name: p.full_name,
                    retrograde: p.retro,
                    nakshatra: p.nakshatra,
                    nakshatra_pada: p.nakshatra_pada,
                    nakshatra_no: p.nakshatra_no,
                }),
                None => {
                    debug!("Skipping non-planet occupant {} in house {}", p.full_name, raw.house);
                    None
                }
            }
        })
        .collect();

    HouseRecord {
        house_number: raw.house,
        start_rasi: raw.start_rasi,
        end_rasi: raw.end_rasi,
        start_nakshatra_lord: raw.start_nakshatra_lord,
        end_nakshatra_lord: raw.end_nakshatra_lord,
        cusp_sub_lord: raw.cusp_sub_lord,
        cusp_sub_sub_lord: raw.cusp_sub_sub_lord,
        bhavmadhya: raw.bhavmadhya,
        span_degrees: raw.length,
        local_start_degree: raw.local_start_degree,
        local_end_degree: raw.local_end_degree,
        global_start_degree: raw.global_start_degree,
        global_end_degree: raw.global_end_degree,
        occupants,
    }
}

// =============================================================================
// Dashas (dashas/maha-dasha, antar-dasha, paryantar-dasha)
// =============================================================================

/// Raw JSON structure of the mahadasha answer
#[derive(Debug, Deserialize)]
struct RawMahadasha {
    #[serde(default)]
    birth_dasa: String,
    #[serde(default)]
    birth_dasa_time: Option<String>,
    #[serde(default)]
    current_dasa: String,
    #[serde(default)]
    current_dasa_time: Option<String>,
    #[serde(default)]
    mahadasha: Vec<String>,
    #[serde(default)]
    mahadasha_order: Vec<String>,
}

/// Split a "Ve>Mo>Ma" chain into expanded planet names.
pub fn expand_chain(chain: &str) -> Vec<String> {
    chain
        .split('>')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(Planet::expand)
        .collect()
}

/// Project the mahadasha document.
pub fn mahadasha_from(doc: &ChartDocument) -> KpResult<MahadashaSummary> {
    let raw: RawMahadasha = doc.parse()?;

    let sequence = if raw.mahadasha.len() == raw.mahadasha_order.len() {
        raw.mahadasha
            .iter()
            .zip(&raw.mahadasha_order)
            .map(|(lord, date)| PeriodEntry::new(format!("{} Mahadasha", Planet::expand(lord)), date.trim()))
            .collect()
    } else {
        debug!(
            "Skipping mahadasha sequence: {} lords vs {} dates",
            raw.mahadasha.len(),
            raw.mahadasha_order.len()
        );
        Vec::new()
    };

    let na = || "N/A".to_string();
    Ok(MahadashaSummary {
        birth: Some(DashaSnapshot::from_chain(
            &expand_chain(&raw.birth_dasa),
            &raw.birth_dasa_time.unwrap_or_else(na),
        )),
        current: Some(DashaSnapshot::from_chain(
            &expand_chain(&raw.current_dasa),
            &raw.current_dasa_time.unwrap_or_else(na),
        )),
        sequence,
    })
}

/// Raw JSON structure of the antardasha answer
#[derive(Debug, Deserialize)]
struct RawAntardasha {
    #[serde(default)]
    antardashas: Vec<Vec<String>>,
    #[serde(default)]
    antardasha_order: Vec<Vec<String>>,
}

/// Project the antardasha document: one period per mahadasha.
pub fn antardashas_from(doc: &ChartDocument) -> KpResult<Vec<DashaPeriod>> {
    let raw: RawAntardasha = doc.parse()?;
    let mut periods = Vec::new();

    for (index, (names, dates)) in raw.antardashas.iter().zip(&raw.antardasha_order).enumerate() {
        if names.is_empty() || names.len() != dates.len() {
            debug!("Skipping mahadasha {}: {} periods vs {} dates", index, names.len(), dates.len());
            continue;
        }
        let owner = names[0].split('/').next().map(Planet::expand).unwrap_or_default();
        let mut period = DashaPeriod::new(DashaLevel::Antardasha, owner);
        for (name, date) in names.iter().zip(dates) {
            let sub = name.rsplit('/').next().unwrap_or(name);
            period
                .periods
                .push(PeriodEntry::new(format!("{} Antardasha", Planet::expand(sub)), date.trim()));
        }
        periods.push(period);
    }

    Ok(periods)
}

/// Raw JSON structure of the paryantardasha answer
#[derive(Debug, Deserialize)]
struct RawParyantardasha {
    #[serde(default)]
    paryantardasha: Vec<Vec<Vec<String>>>,
    #[serde(default)]
    paryantardasha_order: Vec<Vec<Vec<String>>>,
}

/// Compound owner key of a paryantardasha group.
pub fn compound_key(mahadasha: &str, antardasha: &str) -> String {
    format!("{}>{}", mahadasha.trim(), antardasha.trim())
}

/// Project the paryantardasha document: one period per (mahadasha, antardasha) pair.
pub fn paryantardashas_from(doc: &ChartDocument) -> KpResult<Vec<DashaPeriod>> {
    let raw: RawParyantardasha = doc.parse()?;
    let mut periods = Vec::new();

    for (md_index, (md_names, md_dates)) in raw
        .paryantardasha
        .iter()
        .zip(&raw.paryantardasha_order)
        .enumerate()
    {
        for (ad_index, (names, dates)) in md_names.iter().zip(md_dates).enumerate() {
            if names.is_empty() || names.len() != dates.len() {
                debug!(
                    "Skipping mahadasha {} antardasha {}: {} periods vs {} dates",
                    md_index,
                    ad_index,
                    names.len(),
                    dates.len()
                );
                continue;
            }
            let lords: Vec<String> = names[0].split('/').map(Planet::expand).collect();
            let (Some(md), Some(ad)) = (lords.first(), lords.get(1)) else {
                debug!("Skipping malformed paryantardasha label '{}'", names[0]);
                continue;
            };
            let mut period = DashaPeriod::new(DashaLevel::Paryantardasha, compound_key(md, ad));
            for (name, date) in names.iter().zip(dates) {
                let label = name.split('/').map(Planet::expand).collect::<Vec<_>>().join("/");
                period.periods.push(PeriodEntry::new(label, date.trim()));
            }
            periods.push(period);
        }
    }

    Ok(periods)
}

// =============================================================================
// Yogas (extended-horoscope/yoga-list)
// =============================================================================

/// Raw JSON structure of one yoga
#[derive(Debug, Deserialize)]
struct RawYoga {
    yoga: String,
    #[serde(default)]
    meaning: String,
    #[serde(default)]
    planets_involved: Vec<String>,
    #[serde(default, deserialize_with = "deserialize_small_ints")]
    houses_involved: Vec<u8>,
    strength_in_percentage: f64,
}

/// Raw JSON structure of the yoga answer
#[derive(Debug, Deserialize)]
struct RawYogaList {
    #[serde(default)]
    yogas_list: Vec<RawYoga>,
    #[serde(default)]
    yogas_count: u32,
    #[serde(default)]
    raja_yoga_count: u32,
    #[serde(default)]
    dhana_yoga_count: u32,
    #[serde(default)]
    daridra_yoga_count: u32,
}

/// Project the yoga document; names must be non-blank and strengths must lie in 0..=100.
pub fn yogas_from(doc: &ChartDocument) -> KpResult<YogaList> {
    let raw: RawYogaList = doc.parse()?;
    let mut yogas = Vec::with_capacity(raw.yogas_list.len());

    for yoga in raw.yogas_list {
        if yoga.yoga.trim().is_empty() {
            return Err(KpError::invalid_data(Domain::Yoga, "Yoga entry has a blank name"));
        }
        if !(0.0..=100.0).contains(&yoga.strength_in_percentage) {
            return Err(KpError::invalid_data(
                Domain::Yoga,
                format!(
                    "Strength {} of '{}' is outside 0..100",
                    yoga.strength_in_percentage, yoga.yoga
                ),
            ));
        }
        yogas.push(YogaRecord {
            name: normalize_yoga_name(&yoga.yoga),
            participating_planets: yoga
                .planets_involved
                .iter()
                .map(|p| p.trim().to_string())
                .filter(|p| !p.is_empty())
                .collect(),
            strength_percent: yoga.strength_in_percentage,
            involved_houses: yoga.houses_involved,
            meaning: yoga.meaning,
        });
    }

    Ok(YogaList {
        yogas,
        total_count: raw.yogas_count,
        raja_count: raw.raja_yoga_count,
        dhana_count: raw.dhana_yoga_count,
        daridra_count: raw.daridra_yoga_count,
    })
}
