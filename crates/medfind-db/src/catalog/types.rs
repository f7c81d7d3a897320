//! Row types for the `pharmacies`, `medicines`, and `pharmacy_stock` tables.

use chrono::{DateTime, Utc};
use medfind_core::{Medicine, Pharmacy, PharmacySummary, StockListing, StockedMedicine};

/// A row from the `pharmacies` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PharmacyRow {
    pub id: i64,
    pub name: String,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub image_url: Option<String>,
    pub is_open_24x7: bool,
    pub created_at: DateTime<Utc>,
}

impl From<PharmacyRow> for Pharmacy {
    fn from(row: PharmacyRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            address: row.address,
            lat: row.lat,
            lng: row.lng,
            image_url: row.image_url,
            is_open_24x7: row.is_open_24x7,
        }
    }
}

/// A row from the `medicines` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct MedicineRow {
    pub id: i64,
    pub name: String,
    pub salt: Option<String>,
    pub company: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<MedicineRow> for Medicine {
    fn from(row: MedicineRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            salt: row.salt,
            company: row.company,
        }
    }
}

/// Input record for inserting a stock row.
#[derive(Debug, Clone, PartialEq)]
pub struct NewStock {
    pub pharmacy_id: i64,
    pub medicine_id: i64,
    pub quantity: i32,
    pub price: Option<f64>,
}

/// An in-stock row joined with its medicine, keyed by pharmacy.
#[derive(Debug, Clone, sqlx::FromRow)]
pub(crate) struct InStockRow {
    pub pharmacy_id: i64,
    pub quantity: i32,
    pub price: Option<f64>,
    pub medicine_id: i64,
    pub medicine_name: String,
    pub salt: Option<String>,
    pub company: Option<String>,
}

impl From<InStockRow> for StockedMedicine {
    fn from(row: InStockRow) -> Self {
        Self {
            medicine: Medicine {
                id: row.medicine_id,
                name: row.medicine_name,
                salt: row.salt,
                company: row.company,
            },
            quantity: row.quantity,
            price: row.price,
        }
    }
}

/// A stock row joined with its owning pharmacy, keyed by medicine.
#[derive(Debug, Clone, sqlx::FromRow)]
pub(crate) struct StockListingRow {
    pub stock_id: i64,
    pub medicine_id: i64,
    pub quantity: i32,
    pub price: Option<f64>,
    pub pharmacy_id: i64,
    pub pharmacy_name: String,
    pub pharmacy_address: Option<String>,
}

impl From<StockListingRow> for StockListing {
    fn from(row: StockListingRow) -> Self {
        Self {
            id: row.stock_id,
            quantity: row.quantity,
            price: row.price,
            pharmacy: PharmacySummary {
                id: row.pharmacy_id,
                name: row.pharmacy_name,
                address: row.pharmacy_address,
            },
        }
    }
}
