//! Sample upstream documents shared by the unit tests.
//!
//! The same files back the integration tests under `tests/fixtures/`.

use serde_json::Value;

use crate::models::Domain;
use crate::parsing::ChartDocument;

pub fn raw_json(domain: Domain) -> &'static str {
    match domain {
        Domain::PlanetPosition => include_str!("../tests/fixtures/input_kp_planet_position_details.json"),
        Domain::House => include_str!("../tests/fixtures/input_kp_house_details.json"),
        Domain::PlanetAnalysis => include_str!("../tests/fixtures/input_kp_planet_details.json"),
        Domain::Mahadasha => include_str!("../tests/fixtures/input_kp_mahadasha_details.json"),
        Domain::Antardasha => include_str!("../tests/fixtures/input_kp_antardasha_details.json"),
        Domain::Paryantardasha => include_str!("../tests/fixtures/input_kp_paryantardasha_details.json"),
        Domain::Yoga => include_str!("../tests/fixtures/input_kp_list_of_yogas_details.json"),
    }
}

pub fn value(domain: Domain) -> Value {
    serde_json::from_str(raw_json(domain)).expect("fixture is valid JSON")
}

pub fn document(domain: Domain) -> ChartDocument {
    ChartDocument::from_value(domain, value(domain)).expect("fixture is a valid document")
}

/// Write all seven fixtures into `dir` under their canonical input names.
pub fn write_all(dir: &std::path::Path) {
    for domain in crate::models::ALL_DOMAINS {
        std::fs::write(dir.join(domain.input_filename()), raw_json(domain)).expect("write fixture");
    }
}
