//! Proximity ranking of pharmacies around a requester.
//!
//! The data store hands over every pharmacy with its in-stock rows; this
//! module computes distances, shapes display records, and applies the radius
//! filter and distance sort.

use serde::Serialize;

use crate::app_config::AppConfig;
use crate::geo::{haversine_km, round_km, Coordinate, EARTH_RADIUS_KM};
use crate::records::{Pharmacy, PharmacyWithStock, StockedMedicine};

pub const DEFAULT_RADIUS_KM: f64 = 5.0;
pub const DEFAULT_IMAGE_URL: &str = "/pharmacies/default.jpg";
const MAPS_SEARCH_URL: &str = "https://www.google.com/maps/search/?api=1&query=";

/// Tunables for [`rank_nearby`].
#[derive(Debug, Clone, PartialEq)]
pub struct RankingPolicy {
    pub radius_km: f64,
    pub earth_radius_km: f64,
    pub default_image_url: String,
}

impl Default for RankingPolicy {
    fn default() -> Self {
        Self {
            radius_km: DEFAULT_RADIUS_KM,
            earth_radius_km: EARTH_RADIUS_KM,
            default_image_url: DEFAULT_IMAGE_URL.to_string(),
        }
    }
}

impl RankingPolicy {
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            radius_km: config.nearby_radius_km,
            earth_radius_km: config.earth_radius_km,
            default_image_url: config.default_image_url.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedMedicine {
    pub id: i64,
    pub name: String,
    pub salt: Option<String>,
    pub company: Option<String>,
    /// Quantity still on hand.
    pub left: i32,
    pub price: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedPharmacy {
    pub id: i64,
    pub name: String,
    pub address: Option<String>,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub distance_km: Option<f64>,
    pub google_maps_url: Option<String>,
    pub image_url: String,
    pub medicines: Vec<RankedMedicine>,
}

/// Where the requester says they are.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RequesterPosition {
    /// `lat` or `lng` was not supplied.
    Unknown,
    /// Both were supplied but at least one is not a finite number.
    Invalid,
    At(Coordinate),
}

impl RequesterPosition {
    /// Reads raw `lat`/`lng` query-string values.
    ///
    /// A missing or empty value means "not supplied". Once both are
    /// supplied, anything that does not parse to a finite number makes the
    /// position invalid.
    #[must_use]
    pub fn from_query(lat: Option<&str>, lng: Option<&str>) -> Self {
        let lat = lat.filter(|s| !s.is_empty());
        let lng = lng.filter(|s| !s.is_empty());
        let (Some(lat), Some(lng)) = (lat, lng) else {
            return Self::Unknown;
        };

        let parse = |s: &str| s.trim().parse::<f64>().ok();
        match (parse(lat), parse(lng)) {
            (Some(lat), Some(lng)) => Self::from_values(Some(lat), Some(lng)),
            _ => Self::Invalid,
        }
    }

    /// Classifies already-parsed values.
    #[must_use]
    pub fn from_values(lat: Option<f64>, lng: Option<f64>) -> Self {
        match Coordinate::from_parts(lat, lng) {
            None => Self::Unknown,
            Some(c) if c.latitude.is_finite() && c.longitude.is_finite() => Self::At(c),
            Some(_) => Self::Invalid,
        }
    }
}

/// Ranks pharmacies by straight-line distance from the requester.
///
/// With a position, pharmacies without coordinates or whose rounded
/// distance exceeds `policy.radius_km` are dropped and the rest are sorted
/// nearest first by unrounded distance; ties keep their input order. With an
/// unknown position every pharmacy is returned in input order with a `None`
/// distance. An invalid position matches nothing.
#[must_use]
pub fn rank_nearby(
    policy: &RankingPolicy,
    position: RequesterPosition,
    pharmacies: Vec<PharmacyWithStock>,
) -> Vec<RankedPharmacy> {
    let total = pharmacies.len();

    let origin = match position {
        RequesterPosition::At(origin) => origin,
        RequesterPosition::Unknown => {
            tracing::debug!(total, "no requester position; returning unranked pharmacies");
            return pharmacies
                .into_iter()
                .map(|entry| shape(policy, entry, None))
                .collect();
        }
        RequesterPosition::Invalid => {
            tracing::debug!(total, "requester position is not a usable coordinate");
            return Vec::new();
        }
    };

    let mut within: Vec<(f64, RankedPharmacy)> = pharmacies
        .into_iter()
        .filter_map(|entry| {
            let km = entry
                .pharmacy
                .position()
                .map(|pos| haversine_km(origin, pos, policy.earth_radius_km))?;
            (round_km(km) <= policy.radius_km).then(|| (km, shape(policy, entry, Some(km))))
        })
        .collect();

    // `sort_by` is stable, so equal distances keep fetch order.
    within.sort_by(|a, b| a.0.total_cmp(&b.0));

    tracing::debug!(
        total,
        within_radius = within.len(),
        radius_km = policy.radius_km,
        "ranked nearby pharmacies"
    );

    within.into_iter().map(|(_, ranked)| ranked).collect()
}

fn shape(policy: &RankingPolicy, entry: PharmacyWithStock, km: Option<f64>) -> RankedPharmacy {
    let PharmacyWithStock { pharmacy, stock } = entry;
    let google_maps_url = maps_url(&pharmacy);
    let image_url = display_image(pharmacy.image_url.as_deref(), &policy.default_image_url);

    let medicines = stock
        .into_iter()
        .filter(|row| row.quantity > 0)
        .map(|StockedMedicine { medicine, quantity, price }| RankedMedicine {
            id: medicine.id,
            name: medicine.name,
            salt: medicine.salt,
            company: medicine.company,
            left: quantity,
            price,
        })
        .collect();

    RankedPharmacy {
        id: pharmacy.id,
        name: pharmacy.name,
        address: pharmacy.address,
        lat: pharmacy.lat,
        lng: pharmacy.lng,
        distance_km: km.map(round_km),
        google_maps_url,
        image_url,
        medicines,
    }
}

fn maps_url(pharmacy: &Pharmacy) -> Option<String> {
    pharmacy
        .position()
        .map(|pos| format!("{MAPS_SEARCH_URL}{},{}", pos.latitude, pos.longitude))
}

fn display_image(stored: Option<&str>, fallback: &str) -> String {
    match stored {
        Some(url) if !url.trim().is_empty() => url.to_string(),
        _ => fallback.to_string(),
    }
}

#[cfg(test)]
#[path = "ranking_test.rs"]
mod tests;
