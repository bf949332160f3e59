//! Summary document layout.

use std::fmt::Write as _;

use super::{ConsolidatedReport, PlanetEntry};

pub const TITLE: &str = "=== Consolidated KP Astrology Analysis ===";
pub const DASA_HEADER: &str = "1. DASA PERIODS";
pub const PLANETS_HEADER: &str = "2. PLANETARY POSITIONS";
pub const YOGAS_HEADER: &str = "3. SIGNIFICANT YOGAS";
pub const HOUSES_HEADER: &str = "4. HOUSE ANALYSIS";

const PLACEHOLDER: &str = "N/A";

fn table_row(cells: [&str; 6]) -> String {
    format!(
        "| {:<7} | {:<5} | {:<15} | {:<10} | {:<10} | {:<7} |",
        cells[0], cells[1], cells[2], cells[3], cells[4], cells[5]
    )
}

fn planet_row(p: &PlanetEntry) -> String {
    table_row([
        p.name.as_str(),
        p.house.as_str(),
        p.nakshatra.as_str(),
        p.lord.as_str(),
        p.retrograde.as_str(),
        p.combust.as_str(),
    ])
}

/// Render the consolidated summary.
pub fn format_report(report: &ConsolidatedReport) -> String {
    let mut out = String::new();
    out.push_str(TITLE);
    out.push_str("\n\n");

    out.push_str(DASA_HEADER);
    out.push('\n');
    let current = report.current_dasha.as_ref();
    let field = |value: Option<&str>| {
        value
            .filter(|v| !v.is_empty())
            .unwrap_or(PLACEHOLDER)
            .to_string()
    };
    let _ = writeln!(
        out,
        "   - Current Mahadasha: {}",
        field(current.and_then(|c| c.mahadasha()))
    );
    let _ = writeln!(
        out,
        "   - Start Date: {}",
        field(current.and_then(|c| c.start_date()))
    );
    if let Some(period) = report.current_antardashas() {
        let _ = writeln!(out, "   - {} Antardashas:", period.owner);
        for entry in &period.periods {
            let _ = writeln!(out, "       * {}: {}", entry.label, entry.date);
        }
    }
    out.push('\n');

    out.push_str(PLANETS_HEADER);
    out.push('\n');
    out.push_str(&table_row([
        "Planet",
        "House",
        "Nakshatra",
        "Lord",
        "Retrograde",
        "Combust",
    ]));
    out.push('\n');
    for planet in &report.planets {
        out.push_str(&planet_row(planet));
        out.push('\n');
    }
    out.push('\n');

    out.push_str(YOGAS_HEADER);
    out.push('\n');
    for yoga in report.significant_yogas() {
        let _ = writeln!(
            out,
            "   - {}: {} (Strength: {})",
            yoga.name,
            yoga.planets.join(", "),
            yoga.strength.as_deref().unwrap_or(PLACEHOLDER)
        );
    }
    out.push('\n');

    out.push_str(HOUSES_HEADER);
    out.push('\n');
    for (house, occupants) in report.houses.iter().filter(|(_, o)| !o.is_empty()) {
        let _ = writeln!(out, "   - House {}: {}", house, occupants.join(", "));
    }
    out
}
