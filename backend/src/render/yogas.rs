//! Yoga report.

use std::fmt::Write as _;

use super::SENTINEL;
use crate::models::YogaList;

pub const TITLE: &str = "=== KP Yoga Analysis ===";

pub fn render_yogas(list: &YogaList) -> String {
    let mut out = String::new();
    out.push_str(TITLE);
    out.push_str("\n\n");

    for yoga in &list.yogas {
        let _ = writeln!(out, "{} {}", SENTINEL, yoga.name);
        let _ = writeln!(out, "   Strength: {:.2}%", yoga.strength_percent);
        let _ = writeln!(out, "   Planets: {}", yoga.participating_planets.join(", "));
        let houses: Vec<String> = yoga.involved_houses.iter().map(u8::to_string).collect();
        let _ = writeln!(out, "   Houses: {}", houses.join(", "));
        if !yoga.meaning.is_empty() {
            let _ = writeln!(out, "   Meaning: {}", yoga.meaning);
        }
        out.push('\n');
    }

    out.push_str("=== Yoga Summary ===\n");
    let _ = writeln!(out, "Total Yogas: {}", list.total_count);
    let _ = writeln!(out, "Raja Yogas: {}", list.raja_count);
    let _ = writeln!(out, "Dhana Yogas: {}", list.dhana_count);
    let _ = writeln!(out, "Daridra Yogas: {}", list.daridra_count);
    out
}
