//! driver-radar - Nearby driver discovery and ranking for point to point deliveries

mod cart;
mod config;
mod error;
mod ranking;
pub mod sources;

pub use cart::{Cart, CartItem};
pub use config::{Coordinates, DiscoveryConfig, SearchOptions};
pub use error::{Error, Result};
pub use ranking::discovery::{sort_ranked, DiscoveryQuery, DriverDiscovery};
pub use ranking::distance::{
    distance_km, estimated_minutes, is_valid_location, lat_lng, DEFAULT_AVERAGE_SPEED_KMH,
    EARTH_RADIUS_KM,
};
pub use ranking::driver::{Driver, Locale, RankedDriver, SortCriterion, VehicleType};
pub use ranking::selection::payment_path;
pub use ranking::session::{ExpandGuard, SearchRequest, SearchSession};
pub use sources::{DriverSource, FieldsBuilder};
