use serde::{Deserialize, Serialize};

const EARTH_RADIUS_KM: f64 = 6371.0;

/// Radius used when deciding whether two points share a locality.
pub const DEFAULT_LOCALITY_RADIUS_KM: f64 = 5.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// Structured address produced by reverse geocoding.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressDetails {
    pub formatted_address: String,
    pub city: String,
    pub state: String,
    pub pincode: String,
    pub locality: String,
    pub country: String,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LocationError {
    #[error("location access denied")]
    PermissionDenied,
    #[error("location unavailable: {0}")]
    Unavailable(String),
    #[error("geocoding failed: {0}")]
    Geocoding(String),
}

/// Where the current user is, e.g. a device position fix.
pub trait LocationProvider: Send + Sync {
    fn current(&self) -> Result<Coordinates, LocationError>;
}

/// Coordinates to address lookup backed by an external geocoding service.
pub trait Geocoder: Send + Sync {
    fn reverse(&self, coordinates: Coordinates) -> Result<AddressDetails, LocationError>;
}

/// Great-circle distance in kilometres, rounded to two decimals.
pub fn distance_km(from: Coordinates, to: Coordinates) -> f64 {
    let d_lat = (to.latitude - from.latitude).to_radians();
    let d_lon = (to.longitude - from.longitude).to_radians();

    let a = (d_lat / 2.0).sin().powi(2)
        + from.latitude.to_radians().cos()
            * to.latitude.to_radians().cos()
            * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    (EARTH_RADIUS_KM * c * 100.0).round() / 100.0
}

pub fn within_radius(from: Coordinates, to: Coordinates, max_km: f64) -> bool {
    distance_km(from, to) <= max_km
}

/// Case-insensitive comparison that ignores blank values on either side.
pub(crate) fn same_place(left: Option<&str>, right: Option<&str>) -> bool {
    match (
        left.map(str::trim).filter(|value| !value.is_empty()),
        right.map(str::trim).filter(|value| !value.is_empty()),
    ) {
        (Some(left), Some(right)) => left.to_lowercase() == right.to_lowercase(),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BANGALORE: Coordinates = Coordinates {
        latitude: 12.9716,
        longitude: 77.5946,
    };
    const MYSORE: Coordinates = Coordinates {
        latitude: 12.2958,
        longitude: 76.6394,
    };

    #[test]
    fn distance_to_self_is_zero() {
        assert_eq!(distance_km(BANGALORE, BANGALORE), 0.0);
    }

    #[test]
    fn distance_between_cities_is_plausible() {
        let distance = distance_km(BANGALORE, MYSORE);
        assert!((125.0..135.0).contains(&distance), "got {distance}");
        assert_eq!(distance, distance_km(MYSORE, BANGALORE));
    }

    #[test]
    fn radius_check_uses_rounded_distance() {
        let nearby = Coordinates {
            latitude: 12.9916,
            longitude: 77.5946,
        };
        assert!(within_radius(BANGALORE, nearby, DEFAULT_LOCALITY_RADIUS_KM));
        assert!(!within_radius(BANGALORE, MYSORE, DEFAULT_LOCALITY_RADIUS_KM));
    }

    #[test]
    fn same_place_ignores_case_and_blanks() {
        assert!(same_place(Some("Bengaluru"), Some("  bengaluru ")));
        assert!(!same_place(Some(""), Some("")));
        assert!(!same_place(None, Some("Bengaluru")));
        assert!(!same_place(Some("Pune"), Some("Mumbai")));
    }
}
