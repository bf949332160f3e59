//! Domain models for KP chart data.
//!
//! Records are rebuilt from scratch on every run; nothing here is persisted
//! except through the rendered report files.

pub mod dasha;
pub mod domain;
pub mod house;
pub mod lookup;
pub mod planet;
pub mod yoga;

pub use dasha::{DashaLevel, DashaPeriod, DashaSnapshot, MahadashaSummary, PeriodEntry};
pub use domain::{Domain, ALL_DOMAINS, SUMMARY_FILENAME};
pub use house::{house_of, HouseOccupant, HouseRecord};
pub use planet::{DasaStamp, KpPlanets, Planet, PlanetPositions, PlanetRecord, ALL_PLANETS};
pub use yoga::{normalize_yoga_name, YogaList, YogaRecord};
