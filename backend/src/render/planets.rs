//! Planet-position and KP planet-analysis reports.

use std::fmt::Write as _;

use super::{yes_no, SENTINEL};
use crate::models::{KpPlanets, PlanetPositions};

pub const POSITIONS_TITLE: &str = "=== KP Planetary Details Analysis ===";
pub const ANALYSIS_TITLE: &str = "=== KP Planetary Positions Analysis ===";

/// Mark KP planets as combust when the planet-details data says so.
///
/// The KP planets endpoint leaves combustion unreported; the flag is only
/// ever raised here, never cleared.
pub fn supplement_combustion(kp: &mut KpPlanets, positions: &PlanetPositions) {
    for record in kp.planets.iter_mut().filter(|r| !r.combust) {
        record.combust = positions
            .planets
            .iter()
            .any(|p| p.planet == record.planet && p.combust);
    }
}

pub fn render_planet_positions(positions: &PlanetPositions) -> String {
    let mut out = String::new();
    out.push_str(POSITIONS_TITLE);
    out.push_str("\n\n");

    for p in &positions.planets {
        let _ = writeln!(out, "{} {} ({})", SENTINEL, p.full_name, p.name);
        let _ = writeln!(out, "  - Zodiac: {} (House {})", p.zodiac, p.house);
        let _ = writeln!(out, "  - Nakshatra: {} (Pada {})", p.nakshatra, p.nakshatra_pada);
        let _ = writeln!(
            out,
            "  - Lords: Nakshatra - {}, Zodiac - {}",
            p.nakshatra_lord, p.sign_lord
        );
        let _ = writeln!(
            out,
            "  - Degrees: Local {:.2}°, Global {:.2}°",
            p.local_degree, p.global_degree
        );
        let _ = writeln!(out, "  - Retrograde: {}", yes_no(p.retrograde));
        let _ = writeln!(out, "  - Combust: {}", yes_no(p.combust));
        out.push('\n');
    }

    let dasa = &positions.dasa;
    let na = |v: &Option<String>| v.clone().unwrap_or_else(|| "N/A".to_string());
    out.push_str("=== Dasa Periods ===\n");
    let _ = writeln!(out, "Birth Dasa: {}", na(&dasa.birth_dasa));
    let _ = writeln!(out, "Current Dasa: {}", na(&dasa.current_dasa));
    let _ = writeln!(out, "Birth Dasa Start: {}", na(&dasa.birth_dasa_time));
    let _ = writeln!(out, "Current Dasa Start: {}", na(&dasa.current_dasa_time));
    out
}

/// KP planet analysis. Attribute labels here are what the consolidation
/// parser keys on, so keep "Sublord Chain" and "Nakshatra Lord" spelled as-is.
pub fn render_kp_planets(kp: &KpPlanets) -> String {
    let mut out = String::new();
    out.push_str(ANALYSIS_TITLE);
    out.push_str("\n\n");

    for p in &kp.planets {
        let _ = writeln!(out, "{} {} ({})", SENTINEL, p.full_name, p.zodiac);
        let _ = writeln!(out, "  - House Position: {}", p.house);
        let _ = writeln!(out, "  - Retrograde: {}", yes_no(p.retrograde));
        let _ = writeln!(out, "  - Combust: {}", yes_no(p.combust));
        let _ = writeln!(
            out,
            "  - Degrees: {:.2}° (Global) / {:.2}° (Local)",
            p.global_degree, p.local_degree
        );
        let _ = writeln!(out, "  - Nakshatra: {} (Pada {})", p.nakshatra, p.nakshatra_pada);
        let _ = writeln!(out, "  - Nakshatra Lord: {}", p.nakshatra_lord);
        let _ = writeln!(out, "  - Sublord Chain: {}", p.sub_lord_display());
        let _ = writeln!(out, "  - Sign Lord: {}", p.sign_lord);
        if let Some(rasi) = &p.pseudo_rasi {
            let _ = writeln!(out, "  - Pseudo Sign: {} (Based on Nakshatra)", rasi);
        }
        out.push('\n');
    }

    out.push_str("=== Special Points ===\n");
    let _ = writeln!(out, "Midheaven (MC): {:.2}°", kp.midheaven);
    let _ = writeln!(out, "Ascendant (ASC): {:.2}°", kp.ascendant);
    out
}
