//! Driver definition

use std::fmt;
use std::str::FromStr;

use geo::geometry::Point;
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Transport category of a driver
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VehicleType {
    /// Also spelled `track` by older clients
    #[serde(alias = "track")]
    Truck,
    #[serde(alias = "motorcycle", alias = "bike")]
    Motorbike,
}

impl FromStr for VehicleType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "truck" | "track" => Ok(VehicleType::Truck),
            "motorbike" | "motorcycle" | "bike" => Ok(VehicleType::Motorbike),
            other => Err(Error::InvalidQuery(format!("Unknown vehicle type `{}`", other))),
        }
    }
}

impl fmt::Display for VehicleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VehicleType::Truck => write!(f, "truck"),
            VehicleType::Motorbike => write!(f, "motorbike"),
        }
    }
}

/// Ordering applied to the discovered drivers
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortCriterion {
    /// Closest first, same as `Distance`
    #[default]
    None,
    /// Cheapest per km first
    Price,
    /// Best rated first
    Rating,
    /// Closest first
    Distance,
}

impl FromStr for SortCriterion {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "" | "none" => Ok(SortCriterion::None),
            "price" => Ok(SortCriterion::Price),
            "rating" => Ok(SortCriterion::Rating),
            "distance" => Ok(SortCriterion::Distance),
            other => Err(Error::InvalidQuery(format!("Unknown sort criterion `{}`", other))),
        }
    }
}

/// Display language of the driver names
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Locale {
    #[default]
    En,
    Ar,
}

/// Candidate transport provider
#[derive(Clone, Debug, PartialEq)]
pub struct Driver {
    pub id: String,
    /// Default language name
    pub name: String,
    pub name_ar: String,
    pub position: Point,
    pub vehicle: VehicleType,
    /// Currency per kilometer
    pub price_per_km: f64,
    /// From 0 to 5
    pub rating: f64,
    pub review_count: u32,
    pub vehicle_model: Option<String>,
    pub license_plate: Option<String>,
    pub phone: Option<String>,
}

impl Driver {
    pub fn basic(id: String, name: String, position: Point, vehicle: VehicleType) -> Self {
        Self {
            id,
            name,
            name_ar: String::new(),
            position,
            vehicle,
            price_per_km: 0.0,
            rating: 0.0,
            review_count: 0,
            vehicle_model: None,
            license_plate: None,
            phone: None,
        }
    }

    /// Name in the requested language, the default one when there is no translation
    pub fn display_name(&self, locale: Locale) -> &str {
        match locale {
            Locale::Ar if !self.name_ar.trim().is_empty() => &self.name_ar,
            _ => &self.name,
        }
    }

    /// Check the numeric invariants of the record
    pub fn validate(&self) -> Result<()> {
        if self.id.trim().is_empty() {
            return Err(Error::InvalidRecord("Driver id is empty".to_string()));
        }
        if !self.price_per_km.is_finite() || self.price_per_km < 0.0 {
            return Err(Error::InvalidRecord(format!(
                "Driver {} has an invalid price per km: {}",
                self.id, self.price_per_km
            )));
        }
        if !(0.0..=5.0).contains(&self.rating) {
            return Err(Error::InvalidRecord(format!(
                "Driver {} has a rating out of 0..5: {}",
                self.id, self.rating
            )));
        }

        Ok(())
    }
}

/// Driver annotated with the values computed for one search
#[derive(Clone, Debug, PartialEq)]
pub struct RankedDriver {
    pub driver: Driver,
    pub distance_km: f64,
    pub eta_minutes: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lat_lng;

    fn driver() -> Driver {
        let mut d = Driver::basic(
            "drv-1".to_string(),
            "Ahmed Ali".to_string(),
            lat_lng(24.7136, 46.6753),
            VehicleType::Truck,
        );
        d.name_ar = "أحمد علي".to_string();
        d.price_per_km = 2.5;
        d.rating = 4.6;
        d
    }

    #[test]
    fn vehicle_aliases() -> Result<()> {
        assert_eq!(VehicleType::Truck, "truck".parse()?);
        assert_eq!(VehicleType::Truck, " Track ".parse()?);
        assert_eq!(VehicleType::Motorbike, "MOTORBIKE".parse()?);
        assert_eq!(VehicleType::Motorbike, "bike".parse()?);
        assert!("van".parse::<VehicleType>().is_err());

        let v: VehicleType = serde_yaml::from_str("track").map_err(|e| Error::Source(e.to_string()))?;
        assert_eq!(VehicleType::Truck, v);

        Ok(())
    }

    #[test]
    fn sort_criterion_parse() -> Result<()> {
        assert_eq!(SortCriterion::None, "".parse()?);
        assert_eq!(SortCriterion::Price, "price".parse()?);
        assert_eq!(SortCriterion::Rating, "Rating".parse()?);
        assert_eq!(SortCriterion::Distance, "distance".parse()?);
        assert!("fastest".parse::<SortCriterion>().is_err());

        Ok(())
    }

    #[test]
    fn localized_name() {
        let mut d = driver();
        assert_eq!("Ahmed Ali", d.display_name(Locale::En));
        assert_eq!("أحمد علي", d.display_name(Locale::Ar));

        d.name_ar = " ".to_string();
        assert_eq!("Ahmed Ali", d.display_name(Locale::Ar));
    }

    #[test]
    fn validate_ranges() {
        assert!(driver().validate().is_ok());

        let mut d = driver();
        d.rating = 5.1;
        assert!(d.validate().is_err());

        let mut d = driver();
        d.price_per_km = -0.5;
        assert!(d.validate().is_err());

        let mut d = driver();
        d.id = "".to_string();
        assert!(d.validate().is_err());
    }
}
