//! Bhava (house cusp) report.

use std::collections::BTreeSet;
use std::fmt::Write as _;

use super::SENTINEL;
use crate::models::lookup::{aspected_houses, house_significance, star_lord};
use crate::models::{house_of, HouseOccupant, HouseRecord};

pub const TITLE: &str = "=== KP Astrological Chart Analysis ===";

/// Render all houses in input order followed by the chart summary.
pub fn render_houses(houses: &[HouseRecord]) -> String {
    let mut blocks: Vec<String> = vec![TITLE.to_string()];
    blocks.extend(houses.iter().map(|h| render_house(h, houses)));
    blocks.push(render_summary(houses));
    let mut out = blocks.join("\n\n");
    out.push('\n');
    out
}

fn render_house(house: &HouseRecord, all: &[HouseRecord]) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "=== Bhava {} ({}) ===",
        house.house_number,
        house_significance(house.house_number)
    );
    let _ = writeln!(
        out,
        "Rasi Transition: {} ({}) → {} ({})",
        house.start_rasi, house.start_nakshatra_lord, house.end_rasi, house.end_nakshatra_lord
    );

    out.push_str("Cusp Details:\n");
    let sub_lord_house = match house_of(&house.cusp_sub_lord, all) {
        Some(n) => format!("in House {}", n),
        None => "Not found in chart".to_string(),
    };
    let _ = writeln!(out, "  - Sublord: {} {}", house.cusp_sub_lord, sub_lord_house);
    let _ = writeln!(out, "  - Sub-Sublord: {}", house.cusp_sub_sub_lord);

    out.push_str("Positional Data:\n");
    let _ = writeln!(out, "  - Bhavmadhya (Cusp Midpoint): {:.2}°", house.bhavmadhya);
    let _ = writeln!(
        out,
        "  - Span: {:.2}° ({:.2}° to {:.2}° local)",
        house.span_degrees, house.local_start_degree, house.local_end_degree
    );
    let _ = writeln!(
        out,
        "  - Galactic Longitude: {:.2}° to {:.2}°",
        house.global_start_degree, house.global_end_degree
    );

    if house.occupants.is_empty() {
        out.push_str("No planets in this celestial sector\n");
    } else {
        out.push_str("Planetary Influences:\n");
        for occupant in &house.occupants {
            render_occupant(&mut out, occupant, house);
        }
    }

    out.push_str("Significator Chain:\n");
    let _ = writeln!(out, "  {}", significator_chain(house).join(" → "));

    match aspected_houses(house.house_number) {
        Some(aspects) => {
            let _ = write!(out, "Aspect Analysis: Aspects houses {:?}", aspects);
        }
        None => out.push_str("Aspect Analysis: None"),
    }
    out
}

fn render_occupant(out: &mut String, occupant: &HouseOccupant, house: &HouseRecord) {
    let motion = if occupant.retrograde { "Retrograde" } else { "Direct" };
    let _ = writeln!(
        out,
        "  {} {} ({}) [{}]",
        SENTINEL, occupant.full_name, occupant.name, motion
    );
    let _ = writeln!(
        out,
        "    Nakshatra: {} (Pada {})",
        occupant.nakshatra, occupant.nakshatra_pada
    );
    match star_lord(occupant.nakshatra_no) {
        Some(lord) => {
            let _ = writeln!(out, "    Starlord: {} → {}", lord, lord.significance());
        }
        None => out.push_str("    Starlord: Unknown\n"),
    }
    let _ = writeln!(out, "    Position: {}", strength_note(occupant, house));
}

fn strength_note(occupant: &HouseOccupant, house: &HouseRecord) -> &'static str {
    if occupant.retrograde {
        "Retrograde - Modified Influence"
    } else if house.start_nakshatra_lord == occupant.full_name {
        "In Own Constellation - Strong"
    } else {
        "Neutral Position"
    }
}

/// Star lord of the cusp, then sub lord, then sub-sub lord, then the star
/// lords of the occupants, skipping repeats.
fn significator_chain(house: &HouseRecord) -> Vec<String> {
    let mut chain: Vec<String> = Vec::new();
    let occupant_lords = house
        .occupants
        .iter()
        .filter_map(|o| star_lord(o.nakshatra_no))
        .map(|p| p.name().to_string());
    let candidates = [
        house.start_nakshatra_lord.clone(),
        house.cusp_sub_lord.clone(),
        house.cusp_sub_sub_lord.clone(),
    ]
    .into_iter()
    .chain(occupant_lords);
    for name in candidates {
        if !name.is_empty() && !chain.contains(&name) {
            chain.push(name);
        }
    }
    chain
}

fn render_summary(houses: &[HouseRecord]) -> String {
    let mut out = String::new();
    out.push_str("=== KP Chart Summary ===\n");
    let _ = writeln!(out, "Total Cuspal Points: {}", houses.len());

    let significators: BTreeSet<&str> = houses
        .iter()
        .flat_map(|h| {
            [h.cusp_sub_lord.as_str(), h.cusp_sub_sub_lord.as_str()]
                .into_iter()
                .chain(h.occupants.iter().map(|o| o.full_name.as_str()))
        })
        .filter(|s| !s.is_empty())
        .collect();
    let _ = writeln!(
        out,
        "Key Significators: {}",
        significators.into_iter().collect::<Vec<_>>().join(", ")
    );

    out.push_str("Planetary Configurations:\n");
    let conjunctions: Vec<&HouseRecord> =
        houses.iter().filter(|h| h.occupants.len() > 1).collect();
    if conjunctions.is_empty() {
        out.push_str("  No major conjunctions");
    } else {
        let lines: Vec<String> = conjunctions
            .iter()
            .map(|h| {
                format!(
                    "  Conjunction in House {}: {}",
                    h.house_number,
                    h.occupant_names().join(", ")
                )
            })
            .collect();
        out.push_str(&lines.join("\n"));
    }
    out
}
