//! Search and source configuration

use geo::geometry::Point;
use serde::Deserialize;

use crate::ranking::distance::{is_valid_location, lat_lng, DEFAULT_AVERAGE_SPEED_KMH};
use crate::{Error, FieldsBuilder, Result};

/// Latitude/longitude pair as written in the config file
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    pub fn to_point(self) -> Point {
        lat_lng(self.lat, self.lng)
    }
}

impl Default for Coordinates {
    /// Riyadh city center
    fn default() -> Self {
        Self {
            lat: 24.7136,
            lng: 46.6753,
        }
    }
}

/// Search session options
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct SearchOptions {
    /// Radius of a fresh session, in km
    pub default_radius_km: f64,
    /// Added to the radius on each expansion, in km
    pub expand_step_km: f64,
    pub average_speed_kmh: f64,
    /// Used when the caller has no valid pickup location
    pub fallback_pickup: Coordinates,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            default_radius_km: 5.0,
            expand_step_km: 5.0,
            average_speed_kmh: DEFAULT_AVERAGE_SPEED_KMH,
            fallback_pickup: Coordinates::default(),
        }
    }
}

impl SearchOptions {
    pub fn validate(&self) -> Result<()> {
        let positive = |v: f64| v.is_finite() && v > 0.0;

        if !positive(self.default_radius_km) {
            return Err(Error::InvalidQuery(format!(
                "Default radius must be positive, got {}",
                self.default_radius_km
            )));
        }
        if !positive(self.expand_step_km) {
            return Err(Error::InvalidQuery(format!(
                "Expand step must be positive, got {}",
                self.expand_step_km
            )));
        }
        if !positive(self.average_speed_kmh) {
            return Err(Error::InvalidQuery(format!(
                "Average speed must be positive, got {}",
                self.average_speed_kmh
            )));
        }
        if !is_valid_location(&self.fallback_pickup.to_point()) {
            return Err(Error::InvalidQuery(format!(
                "Fallback pickup out of range: {:?}",
                self.fallback_pickup
            )));
        }

        Ok(())
    }
}

/// Full configuration file
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct DiscoveryConfig {
    pub search: SearchOptions,
    pub fields: FieldsBuilder,
}

impl DiscoveryConfig {
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }

        let conf: Self = serde_yaml::from_str(yaml)
            .map_err(|e| Error::InvalidQuery(format!("Failed on parse the config: {}", e)))?;

        conf.search.validate()?;

        Ok(conf)
    }
}
