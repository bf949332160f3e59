//! UTC offset lookup from coordinates.

use chrono::{Offset, TimeZone, Utc};
use chrono_tz::Tz;
use tzf_rs::DefaultFinder;

use crate::error::{KpError, KpResult};

/// Resolves the current UTC offset, in hours, at a location.
pub trait TimezoneResolver: Send + Sync {
    fn utc_offset_hours(&self, lat: f64, lon: f64) -> KpResult<f64>;
}

/// Offline lookup against the bundled time-zone boundaries.
pub struct TzfResolver {
    finder: DefaultFinder,
}

impl TzfResolver {
    /// Loads the boundary data; do this once and share the resolver.
    pub fn new() -> Self {
        Self {
            finder: DefaultFinder::new(),
        }
    }

    /// IANA zone name at the location.
    pub fn zone_name(&self, lat: f64, lon: f64) -> KpResult<String> {
        if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lon) {
            return Err(KpError::Configuration(format!(
                "Coordinates out of range: lat {}, lon {}",
                lat, lon
            )));
        }
        let name = self.finder.get_tz_name(lon, lat);
        if name.is_empty() {
            return Err(KpError::Configuration(format!(
                "No time zone found for lat {}, lon {}",
                lat, lon
            )));
        }
        Ok(name.to_string())
    }
}

impl Default for TzfResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl TimezoneResolver for TzfResolver {
    fn utc_offset_hours(&self, lat: f64, lon: f64) -> KpResult<f64> {
        let name = self.zone_name(lat, lon)?;
        let tz: Tz = name
            .parse()
            .map_err(|e| KpError::Configuration(format!("Unknown time zone '{}': {}", name, e)))?;
        let seconds = tz
            .offset_from_utc_datetime(&Utc::now().naive_utc())
            .fix()
            .local_minus_utc();
        Ok(f64::from(seconds) / 3600.0)
    }
}

/// Always answers the same offset.
#[derive(Debug, Clone, Copy)]
pub struct FixedOffset(pub f64);

impl TimezoneResolver for FixedOffset {
    fn utc_offset_hours(&self, _lat: f64, _lon: f64) -> KpResult<f64> {
        Ok(self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kolkata_offset_has_no_dst() {
        let resolver = TzfResolver::new();
        assert_eq!(resolver.zone_name(22.57, 88.36).unwrap(), "Asia/Kolkata");
        assert_eq!(resolver.utc_offset_hours(22.57, 88.36).unwrap(), 5.5);
    }

    #[test]
    fn test_out_of_range_coordinates() {
        assert!(TzfResolver::new().utc_offset_hours(120.0, 0.0).is_err());
        assert_eq!(FixedOffset(-3.0).utc_offset_hours(0.0, 0.0).unwrap(), -3.0);
    }
}
