//! Mahadasha, antardasha and paryantardasha reports.

use std::fmt::Write as _;

use super::SENTINEL;
use crate::models::dasha::{KEY_ANTARDASHA, KEY_MAHADASHA, KEY_PRATYANTARDASHA, KEY_START_DATE};
use crate::models::{DashaPeriod, DashaSnapshot, MahadashaSummary};

pub const MAHADASHA_TITLE: &str = "=== KP Mahadasha Analysis ===";
pub const ANTARDASHA_TITLE: &str = "=== KP Antardasha Analysis ===";
pub const PARYANTARDASHA_TITLE: &str = "=== KP Paryantardasha Analysis ===";

/// Section headers the consolidation parser switches on.
pub const BIRTH_SECTION: &str = "Birth Dasa Period:";
pub const CURRENT_SECTION: &str = "Current Dasa Period:";

const SNAPSHOT_LABELS: [(&str, &str); 4] = [
    ("Mahadasha", KEY_MAHADASHA),
    ("Antardasha", KEY_ANTARDASHA),
    ("Pratyantaradasha", KEY_PRATYANTARDASHA),
    ("Start Date", KEY_START_DATE),
];

pub fn render_mahadasha(summary: &MahadashaSummary) -> String {
    let mut out = String::new();
    out.push_str(MAHADASHA_TITLE);
    out.push_str("\n\n");

    if !summary.sequence.is_empty() {
        out.push_str("Mahadasha Sequence:\n");
        for entry in &summary.sequence {
            let _ = writeln!(out, "  - {}: {}", entry.label, entry.date);
        }
        out.push('\n');
    }

    if let Some(birth) = &summary.birth {
        render_snapshot(&mut out, BIRTH_SECTION, birth);
        out.push('\n');
    }
    if let Some(current) = &summary.current {
        render_snapshot(&mut out, CURRENT_SECTION, current);
    }
    out
}

fn render_snapshot(out: &mut String, header: &str, snapshot: &DashaSnapshot) {
    out.push_str(header);
    out.push('\n');
    for (label, key) in SNAPSHOT_LABELS {
        let _ = writeln!(out, "  - {}: {}", label, snapshot.get(key).unwrap_or("N/A"));
    }
}

/// One block per mahadasha, opened by `✦ <Planet> Mahadasha:`.
pub fn render_antardashas(periods: &[DashaPeriod]) -> String {
    let mut out = String::new();
    out.push_str(ANTARDASHA_TITLE);
    out.push_str("\n\n");
    for period in periods {
        let _ = writeln!(out, "{} {} Mahadasha:", SENTINEL, period.owner);
        render_entries(&mut out, period);
        out.push('\n');
    }
    out
}

/// One block per (mahadasha, antardasha) pair, opened by
/// `✦ <Mahadasha> > <Antardasha> Paryantardasha:`.
pub fn render_paryantardashas(periods: &[DashaPeriod]) -> String {
    let mut out = String::new();
    out.push_str(PARYANTARDASHA_TITLE);
    out.push_str("\n\n");
    for period in periods {
        let (md, ad) = period
            .owner
            .split_once('>')
            .unwrap_or((period.owner.as_str(), ""));
        let _ = writeln!(out, "{} {} > {} Paryantardasha:", SENTINEL, md, ad);
        render_entries(&mut out, period);
        out.push('\n');
    }
    out
}

fn render_entries(out: &mut String, period: &DashaPeriod) {
    for entry in &period.periods {
        let _ = writeln!(out, "  - {}: {}", entry.label, entry.date);
    }
}
