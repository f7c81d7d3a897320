//! Read operations backing the nearby and search pipelines.

use std::collections::HashMap;

use medfind_core::{
    like_pattern, MedicineWithStock, PharmacyWithStock, StockListing, StockedMedicine,
};
use sqlx::PgPool;

use super::types::{InStockRow, MedicineRow, PharmacyRow, StockListingRow};

/// List all pharmacies ordered by `id`.
///
/// # Errors
///
/// Returns [`sqlx::Error`] if the query fails.
pub async fn list_pharmacies(pool: &PgPool) -> Result<Vec<PharmacyRow>, sqlx::Error> {
    sqlx::query_as::<_, PharmacyRow>(
        "SELECT id, name, address, phone, lat, lng, image_url, is_open_24x7, created_at \
         FROM pharmacies \
         ORDER BY id ASC",
    )
    .fetch_all(pool)
    .await
}

/// Count rows in the `pharmacies` table.
///
/// # Errors
///
/// Returns [`sqlx::Error`] if the query fails.
pub async fn count_pharmacies(pool: &PgPool) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM pharmacies")
        .fetch_one(pool)
        .await
}

/// Return every pharmacy with its in-stock medicines.
///
/// Only stock rows with `quantity > 0` are attached. Pharmacies with nothing
/// in stock are still returned, with an empty list. Pharmacies come back in
/// `id` order and each stock list in stock-row `id` order.
///
/// # Errors
///
/// Returns [`sqlx::Error`] if either query fails.
pub async fn list_pharmacies_with_stock(
    pool: &PgPool,
) -> Result<Vec<PharmacyWithStock>, sqlx::Error> {
    let pharmacies = list_pharmacies(pool).await?;

    let stock_rows = sqlx::query_as::<_, InStockRow>(
        "SELECT s.pharmacy_id, s.quantity, s.price, \
                m.id AS medicine_id, m.name AS medicine_name, m.salt, m.company \
         FROM pharmacy_stock s \
         JOIN medicines m ON m.id = s.medicine_id \
         WHERE s.quantity > 0 \
         ORDER BY s.id ASC",
    )
    .fetch_all(pool)
    .await?;

    let mut by_pharmacy: HashMap<i64, Vec<StockedMedicine>> = HashMap::new();
    for row in stock_rows {
        by_pharmacy
            .entry(row.pharmacy_id)
            .or_default()
            .push(row.into());
    }

    Ok(pharmacies
        .into_iter()
        .map(|row| {
            let stock = by_pharmacy.remove(&row.id).unwrap_or_default();
            PharmacyWithStock {
                pharmacy: row.into(),
                stock,
            }
        })
        .collect())
}

/// Find medicines whose name contains `term`, ignoring case.
///
/// `term` is matched literally: `%` and `_` are not wildcards. Each match
/// carries all of its stock rows regardless of quantity, each with the
/// owning pharmacy. Medicines are ordered by `id`, stock rows by their `id`.
///
/// # Errors
///
/// Returns [`sqlx::Error`] if either query fails.
pub async fn search_medicines_by_name(
    pool: &PgPool,
    term: &str,
) -> Result<Vec<MedicineWithStock>, sqlx::Error> {
    let medicines = sqlx::query_as::<_, MedicineRow>(
        "SELECT id, name, salt, company, created_at \
         FROM medicines \
         WHERE name ILIKE $1 ESCAPE '\\' \
         ORDER BY id ASC",
    )
    .bind(like_pattern(term))
    .fetch_all(pool)
    .await?;

    if medicines.is_empty() {
        return Ok(Vec::new());
    }

    let ids: Vec<i64> = medicines.iter().map(|m| m.id).collect();
    let listing_rows = sqlx::query_as::<_, StockListingRow>(
        "SELECT s.id AS stock_id, s.medicine_id, s.quantity, s.price, \
                p.id AS pharmacy_id, p.name AS pharmacy_name, p.address AS pharmacy_address \
         FROM pharmacy_stock s \
         JOIN pharmacies p ON p.id = s.pharmacy_id \
         WHERE s.medicine_id = ANY($1) \
         ORDER BY s.id ASC",
    )
    .bind(&ids)
    .fetch_all(pool)
    .await?;

    let mut by_medicine: HashMap<i64, Vec<StockListing>> = HashMap::new();
    for row in listing_rows {
        by_medicine
            .entry(row.medicine_id)
            .or_default()
            .push(row.into());
    }

    Ok(medicines
        .into_iter()
        .map(|row| {
            let stocks = by_medicine.remove(&row.id).unwrap_or_default();
            MedicineWithStock {
                medicine: row.into(),
                stocks,
            }
        })
        .collect())
}
