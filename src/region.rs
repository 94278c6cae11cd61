//! Region classification
//!
//! Coarse reverse-geocoding stand-in: an ordered list of latitude/longitude boxes,
//! each carrying a pool of display addresses. The first box containing a coordinate
//! wins and one address is drawn from its pool. Randomness is injected so callers
//! (and tests) can seed it.

use rand::RngExt;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::Coordinate;

/// Inclusive range of degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min: f64,
    pub max: f64,
}

impl Bounds {
    #[must_use]
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    #[must_use]
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

/// A named bounding box with its address pool
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionBox {
    pub name: String,
    pub latitude: Bounds,
    pub longitude: Bounds,
    pub addresses: Vec<String>,
}

impl RegionBox {
    #[must_use]
    pub fn contains(&self, coordinate: &Coordinate) -> bool {
        self.latitude.contains(coordinate.latitude) && self.longitude.contains(coordinate.longitude)
    }
}

fn region(name: &str, latitude: Bounds, longitude: Bounds, addresses: &[&str]) -> RegionBox {
    RegionBox {
        name: name.to_string(),
        latitude,
        longitude,
        addresses: addresses.iter().map(|a| (*a).to_string()).collect(),
    }
}

/// Built-in region table, in lookup order.
///
/// The district box encloses the Chennai box, so with this order Chennai coordinates
/// resolve to district addresses.
#[must_use]
pub fn default_regions() -> Vec<RegionBox> {
    vec![
        region(
            "Kanchipuram District",
            Bounds::new(12.0, 14.0),
            Bounds::new(79.0, 81.0),
            &[
                "Sriperumbudur, Kanchipuram, Tamil Nadu, 603202, India",
                "Kanchipuram, Tamil Nadu, 631502, India",
                "Chengalpattu, Tamil Nadu, 603001, India",
                "Tambaram, Chennai, Tamil Nadu, 600045, India",
            ],
        ),
        region(
            "Chennai",
            Bounds::new(12.8, 13.2),
            Bounds::new(80.1, 80.3),
            &[
                "T. Nagar, Chennai, Tamil Nadu, 600017, India",
                "Anna Nagar, Chennai, Tamil Nadu, 600040, India",
                "Velachery, Chennai, Tamil Nadu, 600042, India",
                "Adyar, Chennai, Tamil Nadu, 600020, India",
            ],
        ),
        region(
            "New Delhi",
            Bounds::new(28.4, 28.8),
            Bounds::new(77.0, 77.4),
            &[
                "Connaught Place, New Delhi, Delhi, 110001, India",
                "Karol Bagh, New Delhi, Delhi, 110005, India",
                "Lajpat Nagar, New Delhi, Delhi, 110024, India",
                "Dwarka, New Delhi, Delhi, 110078, India",
            ],
        ),
    ]
}

/// First region in `regions` that contains the coordinate
#[must_use]
pub fn matching_region<'a>(coordinate: &Coordinate, regions: &'a [RegionBox]) -> Option<&'a RegionBox> {
    regions.iter().find(|r| r.contains(coordinate))
}

/// Address from the matching region's pool, drawn with the thread RNG
#[must_use]
pub fn classify_region(coordinate: &Coordinate, regions: &[RegionBox]) -> Option<String> {
    classify_region_with_rng(coordinate, regions, &mut rand::rng())
}

/// Address from the matching region's pool, drawn with `rng`.
///
/// Returns `None` when no region contains the coordinate or the matching pool is empty.
pub fn classify_region_with_rng<R: RngExt>(
    coordinate: &Coordinate,
    regions: &[RegionBox],
    rng: &mut R,
) -> Option<String> {
    let region = matching_region(coordinate, regions)?;
    debug!("Coordinate {} falls in {}", coordinate.format_coordinates(), region.name);
    pick(&region.addresses, rng).map(str::to_string)
}

const AREAS: [&str; 6] = [
    "Gandhi Nagar",
    "Nehru Colony",
    "Indira Nagar",
    "Rajiv Chowk",
    "MG Road",
    "Station Road",
];

const STREETS: [&str; 5] = [
    "Main Street",
    "Temple Street",
    "Market Road",
    "Church Street",
    "Lake View Road",
];

const CITIES: [&str; 6] = [
    "Vijayawada",
    "Coimbatore",
    "Madurai",
    "Tiruchirappalli",
    "Vellore",
    "Erode",
];

const STATES: [&str; 5] = [
    "Tamil Nadu",
    "Karnataka",
    "Andhra Pradesh",
    "Telangana",
    "Kerala",
];

/// Display address for a coordinate: a region address when one matches, otherwise a
/// synthetic "locality, city, state, pincode, India" line.
pub fn describe_location_with_rng<R: RngExt>(
    coordinate: &Coordinate,
    regions: &[RegionBox],
    rng: &mut R,
) -> String {
    if let Some(address) = classify_region_with_rng(coordinate, regions, rng) {
        return address;
    }

    let locality = if rng.random_bool(0.5) {
        pick(&AREAS, rng)
    } else {
        pick(&STREETS, rng)
    };
    let city = pick(&CITIES, rng);
    let state = pick(&STATES, rng);
    let pincode: u32 = rng.random_range(100_000..1_000_000);

    format!(
        "{}, {}, {}, {pincode}, India",
        locality.unwrap_or_default(),
        city.unwrap_or_default(),
        state.unwrap_or_default()
    )
}

/// Display address using the thread RNG
#[must_use]
pub fn describe_location(coordinate: &Coordinate, regions: &[RegionBox]) -> String {
    describe_location_with_rng(coordinate, regions, &mut rand::rng())
}

fn pick<'a, S: AsRef<str>, R: RngExt>(pool: &'a [S], rng: &mut R) -> Option<&'a str> {
    if pool.is_empty() {
        return None;
    }
    let index = rng.random_range(0..pool.len());
    Some(pool[index].as_ref())
}
