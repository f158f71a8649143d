//! Search session: pickup, growing radius and request sequencing

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard};

use geo::geometry::Point;
use tracing::{debug, info, warn};

use super::discovery::{DiscoveryQuery, DriverDiscovery};
use super::distance::is_valid_location;
use super::driver::{RankedDriver, SortCriterion, VehicleType};
use crate::{DriverSource, Result, SearchOptions};

/// State of one driver search, from the first query to the last expansion.
///
/// The radius only grows. Each query takes a sequence number and only the
/// results of the latest issued one are accepted.
#[derive(Debug)]
pub struct SearchSession {
    pickup: Point,
    vehicle: VehicleType,
    sort: SortCriterion,
    radius_km: Mutex<f64>,
    expand_step_km: f64,
    average_speed_kmh: f64,
    expanding: AtomicBool,
    sequence: AtomicU64,
}

/// A query issued by the session, to be handed back to [`SearchSession::accept`]
#[derive(Clone, Debug, PartialEq)]
pub struct SearchRequest {
    pub sequence: u64,
    pub query: DiscoveryQuery,
}

/// Marks an expansion as in flight until dropped
#[derive(Debug)]
pub struct ExpandGuard<'a> {
    flag: &'a AtomicBool,
}

impl Drop for ExpandGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

impl SearchSession {
    /// Start a new session. A missing or out of range pickup falls back to
    /// the configured location.
    pub fn new(pickup: Option<Point>, vehicle: VehicleType, options: &SearchOptions) -> Result<Self> {
        options.validate()?;

        let pickup = match pickup {
            Some(p) if is_valid_location(&p) => p,
            other => {
                let fallback = options.fallback_pickup.to_point();
                warn!(
                    provided = ?other.map(|p| p.x_y()),
                    fallback = ?fallback.x_y(),
                    "Pickup location missing or invalid, using the fallback"
                );
                fallback
            }
        };

        Ok(Self {
            pickup,
            vehicle,
            sort: SortCriterion::None,
            radius_km: Mutex::new(options.default_radius_km),
            expand_step_km: options.expand_step_km,
            average_speed_kmh: options.average_speed_kmh,
            expanding: AtomicBool::new(false),
            sequence: AtomicU64::new(0),
        })
    }

    pub fn pickup(&self) -> Point {
        self.pickup
    }

    pub fn vehicle(&self) -> VehicleType {
        self.vehicle
    }

    pub fn radius_km(&self) -> f64 {
        *self.radius()
    }

    pub fn sort(&self) -> SortCriterion {
        self.sort
    }

    pub fn set_sort(&mut self, sort: SortCriterion) -> &mut Self {
        self.sort = sort;

        self
    }

    /// Issue a new query with the current params. Any older request
    /// becomes stale.
    pub fn begin_request(&self) -> SearchRequest {
        let sequence = self.sequence.fetch_add(1, Ordering::AcqRel) + 1;

        let mut query = DiscoveryQuery::new(self.pickup, self.radius_km(), self.vehicle);
        query.sort(self.sort).average_speed(self.average_speed_kmh);

        SearchRequest { sequence, query }
    }

    /// Hand back the results of a request. Stale results are discarded.
    pub fn accept(
        &self,
        request: &SearchRequest,
        drivers: Vec<RankedDriver>,
    ) -> Option<Vec<RankedDriver>> {
        let latest = self.sequence.load(Ordering::Acquire);
        if request.sequence != latest {
            warn!(
                sequence = request.sequence,
                latest, "Discarding results of a stale driver search"
            );
            return None;
        }

        Some(drivers)
    }

    /// Run the discovery with the current radius.
    ///
    /// `None` when a newer request was issued while this one ran.
    pub fn search<SU>(&self, source: &mut SU) -> Result<Option<Vec<RankedDriver>>>
    where
        SU: DriverSource + ?Sized,
    {
        let request = self.begin_request();
        let drivers = DriverDiscovery::build(source, &request.query)?;

        Ok(self.accept(&request, drivers))
    }

    /// Mark an expansion as in flight, `None` if one already is
    pub fn try_begin_expand(&self) -> Option<ExpandGuard<'_>> {
        self.expanding
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| ExpandGuard {
                flag: &self.expanding,
            })
    }

    /// Widen the radius by one step and run the full discovery again.
    ///
    /// Ignored, with `None`, while another expansion is in flight.
    pub fn expand<SU>(&self, source: &mut SU) -> Result<Option<Vec<RankedDriver>>>
    where
        SU: DriverSource + ?Sized,
    {
        let Some(_guard) = self.try_begin_expand() else {
            debug!("Radius expansion already in flight, ignoring");
            return Ok(None);
        };

        let radius = self.grow_radius();
        info!(radius_km = radius, vehicle = %self.vehicle, "Expanding driver search");

        self.search(source)
    }

    fn grow_radius(&self) -> f64 {
        let mut radius = self.radius();
        *radius += self.expand_step_km;

        *radius
    }

    /// The radius is a plain value, a poisoned lock still holds a usable one
    fn radius(&self) -> MutexGuard<'_, f64> {
        self.radius_km
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
