//! CSV file source integration

use std::io::Read;

use csv::{Reader, StringRecord};
use geo::geometry::Point;
use tracing::debug;

use super::{DriverSource, FieldsBuilder};
use crate::{Driver, Error, Result, VehicleType};

/// CSV drivers source
pub struct CsvSource<T>
where
    T: Read,
{
    rdr: Reader<T>,
    fields: FieldsBuilder,
    /// Rows already parsed, a reader can be consumed only once
    cache: Option<Vec<Driver>>,
}

impl<T> CsvSource<T>
where
    T: Read,
{
    pub fn new(rdr: Reader<T>, fields: Option<FieldsBuilder>) -> Self {
        Self {
            rdr,
            fields: fields.unwrap_or_default(),
            cache: None,
        }
    }

    fn read_all(&mut self) -> Result<Vec<Driver>> {
        let mut drivers = vec![];

        let mut header = self
            .rdr
            .headers()
            .map_err(|e| Error::Csv(format!("Failed on read the header: {}", e)))?
            .clone();
        let header_idx = parse_header(&self.fields, &mut header)?;

        let mut skipped = 0;
        for row in self.rdr.records() {
            let mut rec = row.map_err(|e| Error::Csv(format!("Failed on read some row: {}", e)))?;

            if rec.len() < 3 {
                continue;
            }

            let driver = parse_row(&header_idx, &self.fields, &mut rec)
                .map_err(|e| Error::InvalidRecord(format!("Error with row {:?}: {}", rec, e)))?;

            match driver {
                Some(d) => drivers.push(d),
                None => skipped += 1,
            }
        }

        debug!(drivers = drivers.len(), skipped, "Loaded drivers from CSV");

        Ok(drivers)
    }
}

impl<T> DriverSource for CsvSource<T>
where
    T: Read,
{
    fn fetch(&mut self, _pickup: Point, _radius_km: f64, _vehicle: VehicleType) -> Result<Vec<Driver>> {
        if self.cache.is_none() {
            self.cache = Some(self.read_all()?);
        }

        Ok(self.cache.clone().unwrap_or_default())
    }
}

/// Field to index map
#[derive(Debug)]
struct FieldsIndex {
    id: usize,
    coordinates: usize,
    vehicle: usize,
    name: Option<usize>,
    name_ar: Option<usize>,
    price: Option<usize>,
    rating: Option<usize>,
    reviews: Option<usize>,
    vehicle_model: Option<usize>,
    license_plate: Option<usize>,
    phone: Option<usize>,
}

fn parse_header(fields: &FieldsBuilder, header: &mut StringRecord) -> Result<FieldsIndex> {
    header.trim();

    let find = |name: &str| {
        let name = name.trim().to_lowercase();
        header.iter().position(|h| h.to_lowercase() == name)
    };
    let required = |name: &str, label: &str| {
        find(name).ok_or_else(|| Error::InvalidRecord(format!("{} header not found", label)))
    };

    Ok(FieldsIndex {
        id: required(&fields.id, "Id")?,
        coordinates: required(&fields.coordinates, "Coordinates")?,
        vehicle: required(&fields.vehicle, "Vehicle")?,
        name: find(&fields.name),
        name_ar: find(&fields.name_ar),
        price: find(&fields.price),
        rating: find(&fields.rating),
        reviews: find(&fields.reviews),
        vehicle_model: find(&fields.vehicle_model),
        license_plate: find(&fields.license_plate),
        phone: find(&fields.phone),
    })
}

/// Non empty text of an optional column
fn optional(row: &StringRecord, idx: Option<usize>) -> Option<String> {
    idx.and_then(|i| row.get(i))
        .map(|d| d.trim())
        .filter(|d| !d.is_empty())
        .map(|d| d.to_string())
}

fn parse_row(
    header: &FieldsIndex,
    fields: &FieldsBuilder,
    row: &mut StringRecord,
) -> Result<Option<Driver>> {
    row.trim();

    let id = row
        .get(header.id)
        .ok_or_else(|| Error::InvalidRecord("Id field not found".to_string()))?
        .to_string();

    let raw_coordinates = row
        .get(header.coordinates)
        .ok_or_else(|| Error::InvalidRecord("Coordinates field not found".to_string()))?;
    let separator = match raw_coordinates {
        s if s.contains(',') => ',',
        s if s.contains(';') => ';',
        _ => ' ',
    };
    let scoordinates: Vec<&str> = raw_coordinates
        .split(separator)
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .collect();
    if scoordinates.len() != 2 {
        return Ok(None);
    }

    let (ilat, ilng) = if fields.flip_coordinates { (0, 1) } else { (1, 0) };

    let lat = scoordinates[ilat]
        .parse::<f64>()
        .map_err(|e| Error::InvalidRecord(format!("Invalid latitude format: {}", e)))?;
    let lng = scoordinates[ilng]
        .parse::<f64>()
        .map_err(|e| Error::InvalidRecord(format!("Invalid longitude format: {}", e)))?;

    let vehicle = row
        .get(header.vehicle)
        .ok_or_else(|| Error::InvalidRecord("Vehicle field not found".to_string()))?
        .parse::<VehicleType>()
        .map_err(|e| Error::InvalidRecord(e.to_string()))?;

    let name = optional(row, header.name).unwrap_or_else(|| id.clone());
    let mut driver = Driver::basic(id, name, Point::new(lng, lat), vehicle);

    driver.name_ar = optional(row, header.name_ar).unwrap_or_default();

    if let Some(price) = optional(row, header.price) {
        driver.price_per_km = price
            .parse::<f64>()
            .map_err(|e| Error::InvalidRecord(format!("Invalid price format: {}", e)))?;
    }

    if let Some(rating) = optional(row, header.rating) {
        driver.rating = rating
            .parse::<f64>()
            .map_err(|e| Error::InvalidRecord(format!("Invalid rating format: {}", e)))?;
    }

    if let Some(reviews) = optional(row, header.reviews) {
        driver.review_count = reviews
            .parse::<u32>()
            .map_err(|e| Error::InvalidRecord(format!("Invalid reviews format: {}", e)))?;
    }

    driver.vehicle_model = optional(row, header.vehicle_model);
    driver.license_plate = optional(row, header.license_plate);
    driver.phone = optional(row, header.phone);

    driver.validate()?;

    Ok(Some(driver))
}
