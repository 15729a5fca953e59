//! # Geospatial Lookup
//!
//! Zipcode geocoding behind a trait, plus great-circle distance math for the
//! radius search endpoint. The built-in geocoder is table-backed; a hosted
//! provider can be swapped in behind the same trait.

use std::collections::HashMap;
use std::sync::RwLock;

use serde_json::Value;
use thiserror::Error;

use crate::models::Location;

/// Earth radius used to express search distances in miles
pub const EARTH_RADIUS_MILES: f64 = 3963.0;

/// Result type for geocoding
pub type GeoResult<T> = Result<T, GeoError>;

/// Geocoding errors
#[derive(Debug, Clone, Error)]
pub enum GeoError {
    /// The zipcode is not in the geocoder's table
    #[error("Unknown zipcode: {0}")]
    UnknownZipcode(String),

    /// Provider-level failure
    #[error("Geocoder error: {0}")]
    Provider(String),
}

impl GeoError {
    pub fn status_code(&self) -> u16 {
        match self {
            GeoError::UnknownZipcode(_) => 404,
            GeoError::Provider(_) => 500,
        }
    }
}

/// Zipcode-to-coordinates lookup
pub trait Geocoder: Send + Sync {
    fn geocode(&self, zipcode: &str) -> GeoResult<Location>;
}

/// Table-backed geocoder for self-hosted deployments and tests
#[derive(Debug, Default)]
pub struct StaticGeocoder {
    table: RwLock<HashMap<String, Location>>,
}

impl StaticGeocoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// A geocoder preloaded with the zipcodes the sample data uses
    pub fn with_builtin_table() -> Self {
        let geocoder = Self::new();
        for (zipcode, longitude, latitude, address) in [
            ("02215", -71.104081, 42.350190, "Boston, MA"),
            ("01850", -71.302307, 42.646557, "Lowell, MA"),
            ("02881", -71.526795, 41.474618, "Kingston, RI"),
            ("05401", -73.212074, 44.475883, "Burlington, VT"),
        ] {
            geocoder.register(
                zipcode,
                Location {
                    longitude,
                    latitude,
                    formatted_address: Some(address.to_string()),
                },
            );
        }
        geocoder
    }

    /// Add or replace a zipcode entry
    pub fn register(&self, zipcode: impl Into<String>, location: Location) {
        self.table.write().unwrap().insert(zipcode.into(), location);
    }
}

impl Geocoder for StaticGeocoder {
    fn geocode(&self, zipcode: &str) -> GeoResult<Location> {
        self.table
            .read()
            .map_err(|_| GeoError::Provider("Lock poisoned".to_string()))?
            .get(zipcode)
            .cloned()
            .ok_or_else(|| GeoError::UnknownZipcode(zipcode.to_string()))
    }
}

/// Great-circle distance between two points, in miles
pub fn haversine_miles(a: &Location, b: &Location) -> f64 {
    let lat_a = a.latitude.to_radians();
    let lat_b = b.latitude.to_radians();
    let d_lat = (b.latitude - a.latitude).to_radians();
    let d_lon = (b.longitude - a.longitude).to_radians();

    let h = (d_lat / 2.0).sin().powi(2) + lat_a.cos() * lat_b.cos() * (d_lon / 2.0).sin().powi(2);

    2.0 * EARTH_RADIUS_MILES * h.sqrt().asin()
}

/// Keep only documents whose `location` lies within `radius_miles` of the
/// center. Documents without a location never match.
pub fn filter_within_radius(docs: Vec<Value>, center: &Location, radius_miles: f64) -> Vec<Value> {
    docs.into_iter()
        .filter(|doc| {
            doc.get("location")
                .and_then(|loc| serde_json::from_value::<Location>(loc.clone()).ok())
                .map(|loc| haversine_miles(center, &loc) <= radius_miles)
                .unwrap_or(false)
        })
        .collect()
}
