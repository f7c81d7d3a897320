//! Great-circle distance between two points on the Earth's surface.

/// Mean Earth radius used when no override is configured.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// A geographic position in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    #[must_use]
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Builds a coordinate only when both halves are present.
    #[must_use]
    pub fn from_parts(latitude: Option<f64>, longitude: Option<f64>) -> Option<Self> {
        match (latitude, longitude) {
            (Some(lat), Some(lng)) => Some(Self::new(lat, lng)),
            _ => None,
        }
    }
}

/// Haversine distance in kilometers between `from` and `to`.
///
/// The result is unrounded. Sorting uses it as is so that close distances
/// keep their order.
#[must_use]
pub fn haversine_km(from: Coordinate, to: Coordinate, earth_radius_km: f64) -> f64 {
    let delta_lat = (to.latitude - from.latitude).to_radians();
    let delta_lng = (to.longitude - from.longitude).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + from.latitude.to_radians().cos()
            * to.latitude.to_radians().cos()
            * (delta_lng / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    earth_radius_km * c
}

/// Rounds a kilometer value to two decimal places, as surfaced to callers.
#[must_use]
pub fn round_km(km: f64) -> f64 {
    (km * 100.0).round() / 100.0
}
