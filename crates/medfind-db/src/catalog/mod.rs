//! Database operations for pharmacies, medicines, and their stock rows.

mod read;
mod types;
mod write;

pub use read::{
    count_pharmacies, list_pharmacies, list_pharmacies_with_stock, search_medicines_by_name,
};
pub use types::{MedicineRow, NewStock, PharmacyRow};
pub use write::{insert_stock, replace_medicines, replace_pharmacies};
