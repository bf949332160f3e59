//! Line-oriented parser over the rendered domain reports.
//!
//! Every sub-parser works on trimmed lines and keeps a single piece of state
//! (current section, current owner, current planet, ...). Lines it cannot
//! decompose are recorded as [`KpError::UnparseableLine`] warnings and
//! skipped; parsing itself never fails.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use log::{debug, warn};
use once_cell::sync::Lazy;
use regex::Regex;

use super::{ConsolidatedReport, PlanetEntry, YogaEntry};
use crate::error::{KpError, KpResult};
use crate::models::{DashaLevel, DashaPeriod, DashaSnapshot, Domain, PeriodEntry, ALL_DOMAINS};
use crate::parsing::read_nonempty;
use crate::parsing::upstream::compound_key;
use crate::render::dasha::{BIRTH_SECTION, CURRENT_SECTION};
use crate::render::SENTINEL;

static MAHADASHA_OWNER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"✦\s*(\w+)\s+Mahadasha").expect("valid regex"));
static PARYANTARDASHA_OWNER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"✦\s*(\w+)\s*>\s*(\w+)").expect("valid regex"));
static PLANET_NAME: Lazy<Regex> = Lazy::new(|| Regex::new(r"✦\s*(\w+)").expect("valid regex"));
static BHAVA_NUMBER: Lazy<Regex> = Lazy::new(|| Regex::new(r"Bhava (\d+)").expect("valid regex"));
static YOGA_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)✦\s*(.*yogas?)\b").expect("valid regex"));

/// Planet attributes in match order; a normalized key takes the first
/// attribute whose pattern it contains.
const PLANET_KEYS: [(&str, PlanetField); 6] = [
    ("sublord", PlanetField::Sublord),
    ("nakshatra lord", PlanetField::Lord),
    ("house", PlanetField::House),
    ("nakshatra", PlanetField::Nakshatra),
    ("retrograde", PlanetField::Retrograde),
    ("combust", PlanetField::Combust),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PlanetField {
    Sublord,
    Lord,
    House,
    Nakshatra,
    Retrograde,
    Combust,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DashaSection {
    Birth,
    Current,
}

/// Trimmed lines with their 1-based line numbers.
fn lines(text: &str) -> impl Iterator<Item = (usize, &str)> {
    text.lines().map(str::trim).enumerate().map(|(i, l)| (i + 1, l))
}

fn strip_bullet(s: &str) -> &str {
    s.trim().trim_start_matches('-').trim()
}

/// Parses rendered reports back into a [`ConsolidatedReport`].
#[derive(Debug, Default)]
pub struct ReportParser {
    warnings: Vec<KpError>,
}

impl ReportParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lines skipped so far.
    pub fn warnings(&self) -> &[KpError] {
        &self.warnings
    }

    fn skip(&mut self, domain: Domain, line_number: usize, line: &str) {
        warn!(
            "Skipping unparseable {} line {}: '{}'",
            domain, line_number, line
        );
        self.warnings.push(KpError::UnparseableLine {
            domain,
            line_number,
            line: line.to_string(),
        });
    }

    /// Parse the six re-parsed domains. Missing domains contribute nothing.
    pub fn parse(&mut self, texts: &BTreeMap<Domain, String>) -> ConsolidatedReport {
        let text = |domain: Domain| texts.get(&domain).map(String::as_str).unwrap_or("");
        let (birth_dasha, current_dasha) = self.parse_mahadasha(text(Domain::Mahadasha));
        ConsolidatedReport {
            birth_dasha,
            current_dasha,
            antardashas: self.parse_antardashas(text(Domain::Antardasha)),
            paryantardashas: self.parse_paryantardashas(text(Domain::Paryantardasha)),
            planets: self.parse_planets(text(Domain::PlanetAnalysis)),
            houses: self.parse_houses(text(Domain::House)),
            yogas: self.parse_yogas(text(Domain::Yoga)),
        }
    }

    /// Birth and current dasha snapshots.
    pub fn parse_mahadasha(&mut self, text: &str) -> (Option<DashaSnapshot>, Option<DashaSnapshot>) {
        let mut birth: Option<DashaSnapshot> = None;
        let mut current: Option<DashaSnapshot> = None;
        let mut section: Option<DashaSection> = None;

        for (_, line) in lines(text) {
            if line.contains(BIRTH_SECTION) {
                section = Some(DashaSection::Birth);
                birth.get_or_insert_with(DashaSnapshot::default);
                continue;
            }
            if line.contains(CURRENT_SECTION) {
                section = Some(DashaSection::Current);
                current.get_or_insert_with(DashaSnapshot::default);
                continue;
            }
            let Some((key, value)) = line.split_once(':') else {
                continue;
            };
            let target = match section {
                Some(DashaSection::Birth) => birth.as_mut(),
                Some(DashaSection::Current) => current.as_mut(),
                None => None,
            };
            if let Some(snapshot) = target {
                snapshot
                    .fields
                    .insert(strip_bullet(key).to_lowercase(), value.trim().to_string());
            }
        }
        (birth, current)
    }

    pub fn parse_antardashas(&mut self, text: &str) -> Vec<DashaPeriod> {
        self.parse_periods(Domain::Antardasha, DashaLevel::Antardasha, text, |line| {
            MAHADASHA_OWNER
                .captures(line)
                .map(|caps| caps[1].to_string())
        })
    }

    pub fn parse_paryantardashas(&mut self, text: &str) -> Vec<DashaPeriod> {
        self.parse_periods(Domain::Paryantardasha, DashaLevel::Paryantardasha, text, |line| {
            PARYANTARDASHA_OWNER
                .captures(line)
                .map(|caps| compound_key(&caps[1], &caps[2]))
        })
    }

    /// Shared owner/period scan for the antardasha and paryantardasha texts.
    fn parse_periods(
        &mut self,
        domain: Domain,
        level: DashaLevel,
        text: &str,
        owner_of: impl Fn(&str) -> Option<String>,
    ) -> Vec<DashaPeriod> {
        let mut periods: Vec<DashaPeriod> = Vec::new();
        let mut current: Option<usize> = None;

        for (line_number, line) in lines(text) {
            if line.contains(SENTINEL) {
                current = match owner_of(line) {
                    Some(owner) => Some(
                        match periods.iter().position(|p| p.owner == owner) {
                            Some(index) => index,
                            None => {
                                periods.push(DashaPeriod::new(level, owner));
                                periods.len() - 1
                            }
                        },
                    ),
                    None => {
                        self.skip(domain, line_number, line);
                        None
                    }
                };
                continue;
            }

            if !line.contains('-') || line.matches(':').count() != 1 {
                continue;
            }
            let Some(index) = current else {
                debug!("Dropping {} line {} outside any period", domain, line_number);
                continue;
            };
            if let Some((label, date)) = line.split_once(':') {
                periods[index]
                    .periods
                    .push(PeriodEntry::new(strip_bullet(label), date.trim()));
            }
        }
        periods
    }

    /// Planet attributes from the KP planet analysis text.
    pub fn parse_planets(&mut self, text: &str) -> Vec<PlanetEntry> {
        let mut planets: Vec<PlanetEntry> = Vec::new();
        let mut current: Option<usize> = None;

        for (line_number, line) in lines(text) {
            if line.contains(SENTINEL) {
                current = match PLANET_NAME.captures(line) {
                    Some(caps) => {
                        planets.push(PlanetEntry {
                            name: caps[1].to_string(),
                            ..PlanetEntry::default()
                        });
                        Some(planets.len() - 1)
                    }
                    None => {
                        self.skip(Domain::PlanetAnalysis, line_number, line);
                        None
                    }
                };
                continue;
            }

            let (Some(index), Some((key, value))) = (current, line.split_once(':')) else {
                continue;
            };
            let key = strip_bullet(key).replace(['(', ')'], "").to_lowercase();
            let Some((_, field)) = PLANET_KEYS.iter().find(|(pattern, _)| key.contains(pattern))
            else {
                continue;
            };
            let value = value.trim();
            let entry = &mut planets[index];
            match field {
                PlanetField::Sublord => entry.sublord = value.to_string(),
                PlanetField::Lord => {
                    entry.lord = value.rsplit('-').next().unwrap_or(value).trim().to_string()
                }
                PlanetField::House => {
                    entry.house = value.split_whitespace().next().unwrap_or("").to_string()
                }
                PlanetField::Nakshatra => {
                    entry.nakshatra = value.split('(').next().unwrap_or(value).trim().to_string()
                }
                PlanetField::Retrograde => entry.retrograde = value.to_string(),
                PlanetField::Combust => entry.combust = value.to_string(),
            }
        }
        planets
    }

    /// House number to occupant names.
    pub fn parse_houses(&mut self, text: &str) -> BTreeMap<u8, Vec<String>> {
        let mut houses: BTreeMap<u8, Vec<String>> = BTreeMap::new();
        let mut current: Option<u8> = None;

        for (line_number, line) in lines(text) {
            if line.contains("Bhava ") {
                current = BHAVA_NUMBER
                    .captures(line)
                    .and_then(|caps| caps[1].parse::<u8>().ok());
                match current {
                    Some(n) => {
                        houses.entry(n).or_default();
                    }
                    None => self.skip(Domain::House, line_number, line),
                }
                continue;
            }
            if !line.contains(SENTINEL) {
                continue;
            }
            match (current, PLANET_NAME.captures(line)) {
                (Some(n), Some(caps)) => houses.entry(n).or_default().push(caps[1].to_string()),
                (_, None) => self.skip(Domain::House, line_number, line),
                (None, Some(_)) => debug!("Dropping occupant outside any Bhava at line {}", line_number),
            }
        }
        houses
    }

    pub fn parse_yogas(&mut self, text: &str) -> Vec<YogaEntry> {
        let mut yogas: Vec<YogaEntry> = Vec::new();
        let mut active = YogaEntry::default();

        for (line_number, line) in lines(text) {
            if line.contains(SENTINEL) {
                flush_yoga(&mut yogas, &mut active);
                match YOGA_NAME.captures(line) {
                    Some(caps) if !caps[1].trim().is_empty() => {
                        active.name = caps[1].trim().to_string();
                    }
                    _ => self.skip(Domain::Yoga, line_number, line),
                }
                continue;
            }
            if let Some(strength) = line.strip_prefix("Strength:") {
                active.strength = Some(strength.trim().to_string());
            } else if let Some(planets) = line.strip_prefix("Planets:") {
                active.planets = planets
                    .split(',')
                    .map(str::trim)
                    .filter(|p| !p.is_empty())
                    .map(str::to_string)
                    .collect();
            }
        }
        flush_yoga(&mut yogas, &mut active);
        yogas
    }
}

/// Move the active record into `yogas` when it carries a name; a nameless
/// record is dropped.
fn flush_yoga(yogas: &mut Vec<YogaEntry>, active: &mut YogaEntry) {
    let record = std::mem::take(active);
    if !record.name.is_empty() {
        yogas.push(record);
    }
}

/// Read the rendered reports under `dir`.
///
/// With `strict`, a missing or empty report is an error, the
/// planet-position report included even though it is not parsed. Otherwise
/// missing reports are logged and contribute nothing.
pub fn load_texts(dir: &Path, strict: bool) -> KpResult<BTreeMap<Domain, String>> {
    let mut texts = BTreeMap::new();
    for domain in ALL_DOMAINS {
        let path = dir.join(domain.output_filename());
        if strict {
            let text = read_nonempty(domain, &path)?;
            if domain.is_reparsed() {
                texts.insert(domain, text);
            }
        } else if domain.is_reparsed() {
            match fs::read_to_string(&path) {
                Ok(text) => {
                    texts.insert(domain, text);
                }
                Err(e) => warn!("Report {} not readable ({}), treating as empty", path.display(), e),
            }
        }
    }
    Ok(texts)
}

/// Parse every rendered report under `dir` into a consolidated report.
pub fn consolidate_dir(dir: &Path, strict: bool) -> KpResult<ConsolidatedReport> {
    let texts = load_texts(dir, strict)?;
    let mut parser = ReportParser::new();
    let report = parser.parse(&texts);
    if !parser.warnings().is_empty() {
        warn!("{} report lines skipped during consolidation", parser.warnings().len());
    }
    Ok(report)
}
