//! House (Bhava) cusp records.

use serde::{Deserialize, Serialize};

use super::planet::Planet;

/// A planet occupying a house, as listed in the KP houses document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HouseOccupant {
    pub planet: Planet,
    /// Short name as printed upstream ("Su")
    pub name: String,
    pub full_name: String,
    pub retrograde: bool,
    pub nakshatra: String,
    pub nakshatra_pada: u8,
    /// 1-based nakshatra number, drives the star-lord lookup
    pub nakshatra_no: u8,
}

/// One of the twelve house cusps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HouseRecord {
    /// 1..=12
    pub house_number: u8,
    pub start_rasi: String,
    pub end_rasi: String,
    pub start_nakshatra_lord: String,
    pub end_nakshatra_lord: String,
    pub cusp_sub_lord: String,
    pub cusp_sub_sub_lord: String,
    pub bhavmadhya: f64,
    pub span_degrees: f64,
    pub local_start_degree: f64,
    pub local_end_degree: f64,
    pub global_start_degree: f64,
    pub global_end_degree: f64,
    pub occupants: Vec<HouseOccupant>,
}

impl HouseRecord {
    /// Occupant names in listing order.
    pub fn occupant_names(&self) -> Vec<String> {
        self.occupants.iter().map(|o| o.full_name.clone()).collect()
    }

    pub fn contains(&self, planet_name: &str) -> bool {
        self.occupants
            .iter()
            .any(|o| o.full_name == planet_name || o.name == planet_name)
    }
}

/// House number holding `planet_name`, found by scanning all houses.
pub fn house_of<'a>(planet_name: &str, houses: impl IntoIterator<Item = &'a HouseRecord>) -> Option<u8> {
    houses
        .into_iter()
        .find(|h| h.contains(planet_name))
        .map(|h| h.house_number)
}
