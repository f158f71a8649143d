//! Great circle distance and travel time estimates

use geo::geometry::Point;

/// Earth radius used by the haversine formula
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Assumed average driver speed for the ETA
pub const DEFAULT_AVERAGE_SPEED_KMH: f64 = 50.0;

/// Build a point from latitude/longitude decimal degrees
pub fn lat_lng(lat: f64, lng: f64) -> Point {
    Point::new(lng, lat)
}

/// Check the WGS84 ranges of a point
pub fn is_valid_location(point: &Point) -> bool {
    let (lng, lat) = point.x_y();

    lat.is_finite() && lng.is_finite() && (-90.0..=90.0).contains(&lat) && (-180.0..=180.0).contains(&lng)
}

/// Haversine distance between two points, in kilometers.
///
/// Coordinates are not validated, out of range input produces a meaningless
/// (possibly NaN) result.
pub fn distance_km(a: &Point, b: &Point) -> f64 {
    let (lat1, lat2) = (a.y().to_radians(), b.y().to_radians());
    let dlat = (b.y() - a.y()).to_radians();
    let dlng = (b.x() - a.x()).to_radians();

    let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlng / 2.0).sin().powi(2);

    2.0 * EARTH_RADIUS_KM * h.sqrt().min(1.0).asin()
}

/// Rough ETA in whole minutes, rounded up
pub fn estimated_minutes(distance_km: f64, speed_kmh: f64) -> u32 {
    if !distance_km.is_finite() || distance_km <= 0.0 || speed_kmh <= 0.0 {
        return 0;
    }

    (distance_km / speed_kmh * 60.0).ceil() as u32
}

#[cfg(test)]
mod tests {
    use geo::{HaversineDestination, HaversineDistance};

    use super::*;

    #[test]
    fn zero_distance() {
        let p = lat_lng(24.7136, 46.6753);
        assert_eq!(0.0, distance_km(&p, &p));
    }

    #[test]
    fn symmetric() {
        let pairs = [
            (lat_lng(24.7136, 46.6753), lat_lng(21.4858, 39.1925)),
            (lat_lng(-26.31832, -48.8702222), lat_lng(-26.3185919, -48.8619776)),
            (lat_lng(89.9, 179.9), lat_lng(-89.9, -179.9)),
        ];

        for (a, b) in pairs {
            assert!((distance_km(&a, &b) - distance_km(&b, &a)).abs() < 1e-9);
        }
    }

    #[test]
    fn known_distance_along_bearing() {
        let pickup = lat_lng(24.7136, 46.6753);
        let target = pickup.haversine_destination(45.0, 1_500.0);

        let d = distance_km(&pickup, &target);
        assert!((d - 1.5).abs() < 0.05, "expected ~1.5km, got {}", d);
    }

    #[test]
    fn close_to_geo_haversine() {
        // Riyadh to Jeddah, geo uses a slightly different mean radius
        let a = lat_lng(24.7136, 46.6753);
        let b = lat_lng(21.4858, 39.1925);

        let ours = distance_km(&a, &b);
        let theirs = a.haversine_distance(&b) / 1000.0;
        assert!((ours - theirs).abs() < 0.1, "{} vs {}", ours, theirs);
        assert!(ours > 840.0 && ours < 860.0);
    }

    #[test]
    fn antipodal_points_do_not_overflow_asin() {
        let d = distance_km(&lat_lng(0.0, 0.0), &lat_lng(0.0, 180.0));
        assert!((d - std::f64::consts::PI * EARTH_RADIUS_KM).abs() < 1e-6);
    }

    #[test]
    fn minutes_round_up() {
        assert_eq!(0, estimated_minutes(0.0, DEFAULT_AVERAGE_SPEED_KMH));
        assert_eq!(2, estimated_minutes(1.2, DEFAULT_AVERAGE_SPEED_KMH));
        assert_eq!(6, estimated_minutes(4.8, DEFAULT_AVERAGE_SPEED_KMH));
        assert_eq!(60, estimated_minutes(50.0, DEFAULT_AVERAGE_SPEED_KMH));
        assert_eq!(1, estimated_minutes(0.01, DEFAULT_AVERAGE_SPEED_KMH));
    }

    #[test]
    fn minutes_clamp_bad_input() {
        assert_eq!(0, estimated_minutes(-3.0, DEFAULT_AVERAGE_SPEED_KMH));
        assert_eq!(0, estimated_minutes(f64::NAN, DEFAULT_AVERAGE_SPEED_KMH));
        assert_eq!(0, estimated_minutes(3.0, 0.0));
    }

    #[test]
    fn location_ranges() {
        assert!(is_valid_location(&lat_lng(24.7136, 46.6753)));
        assert!(is_valid_location(&lat_lng(-90.0, 180.0)));
        assert!(!is_valid_location(&lat_lng(91.0, 0.0)));
        assert!(!is_valid_location(&lat_lng(0.0, -180.5)));
        assert!(!is_valid_location(&lat_lng(f64::NAN, 0.0)));
    }
}
