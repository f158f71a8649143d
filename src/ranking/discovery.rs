//! Discovery pipeline: annotate, filter and rank the candidates

use geo::geometry::Point;
use tracing::debug;

use super::distance::{distance_km, estimated_minutes, DEFAULT_AVERAGE_SPEED_KMH};
use super::driver::{Driver, RankedDriver, SortCriterion, VehicleType};
use crate::{DriverSource, Error, Result};

/// Parameters of one discovery run
#[derive(Clone, Debug, PartialEq)]
pub struct DiscoveryQuery {
    pub pickup: Point,
    pub radius_km: f64,
    pub vehicle: VehicleType,
    pub sort: SortCriterion,
    /// Used for the ETA of each driver
    pub average_speed_kmh: f64,
}

impl DiscoveryQuery {
    pub fn new(pickup: Point, radius_km: f64, vehicle: VehicleType) -> Self {
        Self {
            pickup,
            radius_km,
            vehicle,
            sort: SortCriterion::None,
            average_speed_kmh: DEFAULT_AVERAGE_SPEED_KMH,
        }
    }

    pub fn sort(&mut self, sort: SortCriterion) -> &mut Self {
        self.sort = sort;

        self
    }

    pub fn average_speed(&mut self, speed_kmh: f64) -> &mut Self {
        self.average_speed_kmh = speed_kmh;

        self
    }

    pub fn validate(&self) -> Result<()> {
        if !self.radius_km.is_finite() || self.radius_km <= 0.0 {
            return Err(Error::InvalidQuery(format!(
                "Radius must be positive, got {}",
                self.radius_km
            )));
        }
        if !self.average_speed_kmh.is_finite() || self.average_speed_kmh <= 0.0 {
            return Err(Error::InvalidQuery(format!(
                "Average speed must be positive, got {}",
                self.average_speed_kmh
            )));
        }

        Ok(())
    }

    /// Annotate the candidates, keep the ones inside the radius with the
    /// requested vehicle and order them by the criterion.
    ///
    /// Ties keep the candidates order.
    pub fn rank(&self, candidates: Vec<Driver>) -> Vec<RankedDriver> {
        let total = candidates.len();

        let mut ranked: Vec<RankedDriver> = candidates
            .into_iter()
            .map(|driver| {
                let distance = distance_km(&self.pickup, &driver.position);
                RankedDriver {
                    eta_minutes: estimated_minutes(distance, self.average_speed_kmh),
                    distance_km: distance,
                    driver,
                }
            })
            .filter(|rd| rd.distance_km <= self.radius_km)
            .filter(|rd| rd.driver.vehicle == self.vehicle)
            .collect();

        sort_ranked(&mut ranked, self.sort);

        debug!(
            candidates = total,
            matched = ranked.len(),
            radius_km = self.radius_km,
            vehicle = %self.vehicle,
            "Ranked drivers"
        );

        ranked
    }
}

/// Reorder an already ranked list, eg. after the user picks another criterion
pub fn sort_ranked(drivers: &mut [RankedDriver], sort: SortCriterion) {
    let by_distance = |a: &RankedDriver, b: &RankedDriver| a.distance_km.total_cmp(&b.distance_km);

    match sort {
        SortCriterion::Price => {
            drivers.sort_by(|a, b| a.driver.price_per_km.total_cmp(&b.driver.price_per_km))
        }
        SortCriterion::Rating => drivers.sort_by(|a, b| b.driver.rating.total_cmp(&a.driver.rating)),
        SortCriterion::Distance | SortCriterion::None => drivers.sort_by(by_distance),
    }
}

/// Default discovery from a driver source
pub struct DriverDiscovery {}

impl DriverDiscovery {
    /// Fetch the candidates and rank them with the query params
    pub fn build<SU>(source: &mut SU, query: &DiscoveryQuery) -> Result<Vec<RankedDriver>>
    where
        SU: DriverSource + ?Sized,
    {
        query.validate()?;

        let candidates = source.fetch(query.pickup, query.radius_km, query.vehicle)?;

        Ok(query.rank(candidates))
    }
}
