//! Synthetic driver generator, stands in for a fleet service on demos and tests

use geo::geometry::Point;
use geo::HaversineDestination;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use super::DriverSource;
use crate::{Driver, Error, Result, VehicleType};

const NAMES: [(&str, &str); 10] = [
    ("Ahmed Al-Harbi", "أحمد الحربي"),
    ("Mohammed Al-Otaibi", "محمد العتيبي"),
    ("Khalid Al-Qahtani", "خالد القحطاني"),
    ("Saad Al-Dosari", "سعد الدوسري"),
    ("Fahad Al-Shehri", "فهد الشهري"),
    ("Omar Al-Zahrani", "عمر الزهراني"),
    ("Yousef Al-Ghamdi", "يوسف الغامدي"),
    ("Abdullah Al-Mutairi", "عبدالله المطيري"),
    ("Faisal Al-Anazi", "فيصل العنزي"),
    ("Nasser Al-Subaie", "ناصر السبيعي"),
];

const TRUCK_MODELS: [&str; 4] = ["Isuzu NPR", "Hyundai HD72", "Mitsubishi Canter", "Toyota Dyna"];
const MOTORBIKE_MODELS: [&str; 4] = ["Honda CG125", "Yamaha YBR125", "Suzuki GN125", "Bajaj Boxer"];
const PLATE_LETTERS: &[u8] = b"ABDEGHJKLNRSTUVXZ";

/// Random drivers scattered around the pickup.
///
/// Seeded, the same pickup always gives the same drivers.
#[derive(Clone, Debug)]
pub struct SyntheticSource {
    count: usize,
    spread_km: f64,
    seed: u64,
}

impl SyntheticSource {
    pub fn new(count: usize, seed: u64) -> Self {
        Self {
            count,
            spread_km: 10.0,
            seed,
        }
    }

    /// Max distance of a generated driver from the pickup
    pub fn spread(&mut self, spread_km: f64) -> &mut Self {
        self.spread_km = spread_km;

        self
    }

    fn driver(&self, rng: &mut StdRng, index: usize, pickup: Point) -> Driver {
        let vehicle = if index % 2 == 0 {
            VehicleType::Truck
        } else {
            VehicleType::Motorbike
        };

        // sqrt keeps the drivers uniform over the disk area
        let distance_m = self.spread_km * rng.gen::<f64>().sqrt() * 1000.0;
        let bearing = rng.gen_range(0.0..360.0);
        let position = pickup.haversine_destination(bearing, distance_m);

        let (name, name_ar) = NAMES[rng.gen_range(0..NAMES.len())];

        let mut driver = Driver::basic(format!("drv-{:04}", index + 1), name.to_string(), position, vehicle);
        driver.name_ar = name_ar.to_string();
        driver.price_per_km = match vehicle {
            VehicleType::Truck => round2(rng.gen_range(2.0..5.0)),
            VehicleType::Motorbike => round2(rng.gen_range(0.8..2.0)),
        };
        driver.rating = (rng.gen_range(3.5..=5.0) * 10.0_f64).round() / 10.0;
        driver.review_count = rng.gen_range(5..=500);

        let models = match vehicle {
            VehicleType::Truck => &TRUCK_MODELS,
            VehicleType::Motorbike => &MOTORBIKE_MODELS,
        };
        driver.vehicle_model = Some(models[rng.gen_range(0..models.len())].to_string());

        let letters: String = (0..3)
            .map(|_| PLATE_LETTERS[rng.gen_range(0..PLATE_LETTERS.len())] as char)
            .collect();
        driver.license_plate = Some(format!("{} {:04}", letters, rng.gen_range(0..10_000)));
        driver.phone = Some(format!("+9665{:08}", rng.gen_range(0..100_000_000)));

        driver
    }
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

impl DriverSource for SyntheticSource {
    fn fetch(&mut self, pickup: Point, _radius_km: f64, _vehicle: VehicleType) -> Result<Vec<Driver>> {
        if !self.spread_km.is_finite() || self.spread_km <= 0.0 {
            return Err(Error::Source(format!(
                "Synthetic spread must be positive, got {}",
                self.spread_km
            )));
        }

        let mut rng = StdRng::seed_from_u64(self.seed);
        let drivers: Vec<Driver> = (0..self.count)
            .map(|i| self.driver(&mut rng, i, pickup))
            .collect();

        debug!(count = drivers.len(), seed = self.seed, "Generated synthetic drivers");

        Ok(drivers)
    }
}

#[cfg(test)]
mod tests {
    use super::SyntheticSource;
    use crate::{distance_km, lat_lng, DriverSource, Result, VehicleType};

    #[test]
    fn same_seed_same_drivers() -> Result<()> {
        let pickup = lat_lng(24.7136, 46.6753);

        let a = SyntheticSource::new(12, 7).fetch(pickup, 5.0, VehicleType::Truck)?;
        let b = SyntheticSource::new(12, 7).fetch(pickup, 5.0, VehicleType::Truck)?;
        assert_eq!(a, b);

        let c = SyntheticSource::new(12, 8).fetch(pickup, 5.0, VehicleType::Truck)?;
        assert_ne!(a, c);

        Ok(())
    }

    #[test]
    fn drivers_are_valid_and_near() -> Result<()> {
        let pickup = lat_lng(24.7136, 46.6753);

        let mut source = SyntheticSource::new(40, 3);
        source.spread(4.0);
        let drivers = source.fetch(pickup, 5.0, VehicleType::Motorbike)?;
        assert_eq!(40, drivers.len());

        for d in &drivers {
            d.validate()?;
            assert!(distance_km(&pickup, &d.position) <= 4.01);
            assert!(!d.name_ar.is_empty());
            assert!(d.vehicle_model.is_some());
        }

        let trucks = drivers.iter().filter(|d| d.vehicle == VehicleType::Truck).count();
        assert_eq!(20, trucks);

        Ok(())
    }

    #[test]
    fn reject_bad_spread() {
        let mut source = SyntheticSource::new(3, 1);
        source.spread(0.0);
        assert!(source
            .fetch(lat_lng(0.0, 0.0), 5.0, VehicleType::Truck)
            .is_err());
    }
}
