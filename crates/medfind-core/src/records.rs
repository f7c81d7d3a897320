//! Records handed from the data store to the ranking and search pipelines.

use serde::Serialize;

use crate::geo::Coordinate;

#[derive(Debug, Clone, PartialEq)]
pub struct Pharmacy {
    pub id: i64,
    pub name: String,
    pub address: Option<String>,
    /// `None` until the pharmacy has been geocoded.
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub image_url: Option<String>,
    pub is_open_24x7: bool,
}

impl Pharmacy {
    #[must_use]
    pub fn position(&self) -> Option<Coordinate> {
        Coordinate::from_parts(self.lat, self.lng)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Medicine {
    pub id: i64,
    pub name: String,
    pub salt: Option<String>,
    pub company: Option<String>,
}

/// One stock row of a pharmacy, joined with the medicine it refers to.
#[derive(Debug, Clone, PartialEq)]
pub struct StockedMedicine {
    pub medicine: Medicine,
    pub quantity: i32,
    pub price: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PharmacyWithStock {
    pub pharmacy: Pharmacy,
    pub stock: Vec<StockedMedicine>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PharmacySummary {
    pub id: i64,
    pub name: String,
    pub address: Option<String>,
}

/// A stock row seen from the medicine side, carrying its owning pharmacy.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StockListing {
    pub id: i64,
    pub quantity: i32,
    pub price: Option<f64>,
    pub pharmacy: PharmacySummary,
}

/// A medicine matched by name search, with every pharmacy that lists it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MedicineWithStock {
    #[serde(flatten)]
    pub medicine: Medicine,
    pub stocks: Vec<StockListing>,
}
