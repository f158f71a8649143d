//! driver-radar cli - Nearby driver discovery for point to point deliveries

use std::fs::{self, File};

use argopt::{cmd_group, subcmd};
use csv::ReaderBuilder;
use tracing_subscriber::EnvFilter;

use driver_radar::sources::{CsvSource, SyntheticSource};
use driver_radar::{
    lat_lng, payment_path, DiscoveryConfig, DriverSource, Locale, RankedDriver, SearchSession,
    SortCriterion, VehicleType,
};

/// CLI of driver-radar - Find and rank the drivers around a pickup location
#[cmd_group(commands = [csv, synthetic])]
fn main() -> Result<(), String> {}

/// Rank the drivers listed on a CSV file
#[subcmd]
fn csv(
    /// CSV file source
    csv_path: String,
    /// Requested vehicle: truck or motorbike
    vehicle: String,
    /// Pickup latitude. Default: configured fallback pickup
    #[opt(long)]
    lat: Option<f64>,
    /// Pickup longitude. Default: configured fallback pickup
    #[opt(long)]
    lng: Option<f64>,
    /// Sort by: price, rating or distance
    #[opt(long)]
    sort: Option<String>,
    /// Radius expansions to run after the first search
    #[opt(long)]
    expand: Option<u8>,
    /// Show the Arabic names
    #[opt(long)]
    arabic: bool,
    /// Search and fields configuration. Default: .driver-radar.yaml, ~/.driver-radar.yaml
    #[opt(long)]
    config: Option<String>,
) -> Result<(), String> {
    init_logging();

    let conf = load_configs(config)?;

    let csv = File::open(csv_path)
        .map_err(|e| format!("Failed on open the CSV file: {}", e.to_string()))?;
    let rdr = ReaderBuilder::new().flexible(true).from_reader(csv);

    let source: Box<dyn DriverSource> = Box::new(CsvSource::new(rdr, Some(conf.fields.clone())));

    run(source, &conf, &vehicle, lat, lng, sort, expand, arabic)
}

/// Rank a generated pool of drivers around the pickup
#[subcmd]
fn synthetic(
    /// Requested vehicle: truck or motorbike
    vehicle: String,
    /// Number of generated drivers
    #[opt(long)]
    count: Option<usize>,
    /// Generator seed
    #[opt(long)]
    seed: Option<u64>,
    /// Pickup latitude. Default: configured fallback pickup
    #[opt(long)]
    lat: Option<f64>,
    /// Pickup longitude. Default: configured fallback pickup
    #[opt(long)]
    lng: Option<f64>,
    /// Sort by: price, rating or distance
    #[opt(long)]
    sort: Option<String>,
    /// Radius expansions to run after the first search
    #[opt(long)]
    expand: Option<u8>,
    /// Show the Arabic names
    #[opt(long)]
    arabic: bool,
    /// Search configuration. Default: .driver-radar.yaml, ~/.driver-radar.yaml
    #[opt(long)]
    config: Option<String>,
) -> Result<(), String> {
    init_logging();

    let conf = load_configs(config)?;

    let source: Box<dyn DriverSource> =
        Box::new(SyntheticSource::new(count.unwrap_or(20), seed.unwrap_or(1)));

    run(source, &conf, &vehicle, lat, lng, sort, expand, arabic)
}

#[allow(clippy::too_many_arguments)]
fn run(
    mut source: Box<dyn DriverSource>,
    conf: &DiscoveryConfig,
    vehicle: &str,
    lat: Option<f64>,
    lng: Option<f64>,
    sort: Option<String>,
    expand: Option<u8>,
    arabic: bool,
) -> Result<(), String> {
    let vehicle = vehicle.parse::<VehicleType>().map_err(|e| e.to_string())?;
    let sort = match sort {
        Some(s) => s.parse::<SortCriterion>().map_err(|e| e.to_string())?,
        None => SortCriterion::None,
    };
    let pickup = match (lat, lng) {
        (Some(lat), Some(lng)) => Some(lat_lng(lat, lng)),
        _ => None,
    };
    let locale = if arabic { Locale::Ar } else { Locale::En };

    let mut session =
        SearchSession::new(pickup, vehicle, &conf.search).map_err(|e| e.to_string())?;
    session.set_sort(sort);

    let mut drivers = session
        .search(&mut source)
        .map_err(|e| e.to_string())?
        .unwrap_or_default();

    for _ in 0..expand.unwrap_or(0) {
        if let Some(wider) = session.expand(&mut source).map_err(|e| e.to_string())? {
            drivers = wider;
        }
    }

    print_drivers(&drivers, session.radius_km(), locale);

    Ok(())
}

fn print_drivers(drivers: &[RankedDriver], radius_km: f64, locale: Locale) {
    if drivers.is_empty() {
        println!(
            "No drivers found within {:.1} km, try expanding the search radius",
            radius_km
        );
        return;
    }

    println!("{} drivers within {:.1} km", drivers.len(), radius_km);
    for rd in drivers {
        println!(
            "{:<10} {:<24} {:>6.2} km {:>4} min {:>6.2}/km {:.1} ({})",
            rd.driver.id,
            rd.driver.display_name(locale),
            rd.distance_km,
            rd.eta_minutes,
            rd.driver.price_per_km,
            rd.driver.rating,
            rd.driver.review_count
        );
    }

    println!("Pick: {}", payment_path(&drivers[0].driver.id));
}

fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .try_init();
}

/// Load the current config
fn load_configs(provided: Option<String>) -> Result<DiscoveryConfig, String> {
    let mut options = vec![];

    if let Some(sprovided) = provided {
        options.push(sprovided);
    }

    options.push(".driver-radar.yaml".to_string());

    if let Some(home) = dirs::home_dir() {
        if let Some(shome) = home.to_str() {
            options.push(format!("{}/.driver-radar.yaml", shome));
        }
    }

    for fi in options {
        if let Ok(s) = fs::read_to_string(&fi) {
            tracing::debug!(path = %fi, "Loaded configuration");
            return DiscoveryConfig::from_yaml(&s).map_err(|e| e.to_string());
        }
    }

    Ok(DiscoveryConfig::default())
}

#[test]
fn parse_configs() -> Result<(), String> {
    let yaml = "\nsearch:\nfields:";

    let conf = DiscoveryConfig::from_yaml(yaml).map_err(|e| e.to_string())?;
    assert_eq!(DiscoveryConfig::default(), conf);

    let yaml = "\nsearch:\n  default_radius_km: 8\nfields:\n  id: driver_id";

    let conf = DiscoveryConfig::from_yaml(yaml).map_err(|e| e.to_string())?;
    assert_eq!(8.0, conf.search.default_radius_km);
    assert_eq!(5.0, conf.search.expand_step_km);
    assert_eq!("driver_id", conf.fields.id);
    assert_eq!("coordinates", conf.fields.coordinates);

    Ok(())
}
