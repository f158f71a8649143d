//! Static in memory source

use geo::geometry::Point;

use super::DriverSource;
use crate::{Driver, Result, VehicleType};

/// Fixed pool of drivers, returned as is on every fetch
#[derive(Clone, Debug, Default)]
pub struct MemorySource {
    drivers: Vec<Driver>,
}

impl MemorySource {
    pub fn new(drivers: Vec<Driver>) -> Self {
        Self { drivers }
    }

    pub fn drivers(&self) -> &[Driver] {
        &self.drivers
    }
}

impl DriverSource for MemorySource {
    fn fetch(&mut self, _pickup: Point, _radius_km: f64, _vehicle: VehicleType) -> Result<Vec<Driver>> {
        Ok(self.drivers.clone())
    }
}
