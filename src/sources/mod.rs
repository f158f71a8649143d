//! Driver sources API

use geo::geometry::Point;
use serde::Deserialize;

use crate::{Driver, Result, VehicleType};

/// Driver source, eg.: a fleet location service
pub trait DriverSource {
    /// Fetch the candidate drivers around the pickup.
    ///
    /// The radius and vehicle are hints, the ranking filters again anyway.
    fn fetch(&mut self, pickup: Point, radius_km: f64, vehicle: VehicleType) -> Result<Vec<Driver>>;
}

impl<S> DriverSource for Box<S>
where
    S: DriverSource + ?Sized,
{
    fn fetch(&mut self, pickup: Point, radius_km: f64, vehicle: VehicleType) -> Result<Vec<Driver>> {
        (**self).fetch(pickup, radius_km, vehicle)
    }
}

/// Names of the fields on the source records
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct FieldsBuilder {
    pub id: String,
    pub name: String,
    pub name_ar: String,
    pub coordinates: String,
    pub vehicle: String,
    pub price: String,
    pub rating: String,
    pub reviews: String,
    pub vehicle_model: String,
    pub license_plate: String,
    pub phone: String,
    /// Coordinates written as `lat lng` instead of `lng lat`
    pub flip_coordinates: bool,
}

impl Default for FieldsBuilder {
    fn default() -> Self {
        Self {
            id: "id".to_string(),
            name: "name".to_string(),
            name_ar: "name_ar".to_string(),
            coordinates: "coordinates".to_string(),
            vehicle: "vehicle".to_string(),
            price: "price".to_string(),
            rating: "rating".to_string(),
            reviews: "reviews".to_string(),
            vehicle_model: "vehicle_model".to_string(),
            license_plate: "license_plate".to_string(),
            phone: "phone".to_string(),
            flip_coordinates: false,
        }
    }
}

mod memory;
mod synthetic;

pub use memory::MemorySource;
pub use synthetic::SyntheticSource;

#[cfg(feature = "csv")]
mod csv_file;

#[cfg(feature = "csv")]
pub use csv_file::CsvSource;
