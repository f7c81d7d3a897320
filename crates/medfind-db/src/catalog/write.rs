//! Bulk-load writes used by the offline seeding commands.

use medfind_core::{MedicineEntry, PharmacySeed};
use sqlx::PgPool;

use super::types::{MedicineRow, NewStock};
use crate::DbError;

/// Replace the whole `pharmacies` table with `seeds`.
///
/// Runs in one transaction: existing pharmacies (and, by cascade, their
/// stock rows) are deleted, then every seed is inserted. Returns the number
/// of rows inserted.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if any statement fails; nothing is changed then.
pub async fn replace_pharmacies(pool: &PgPool, seeds: &[PharmacySeed]) -> Result<u64, DbError> {
    let mut tx = pool.begin().await?;

    sqlx::query("DELETE FROM pharmacies")
        .execute(&mut *tx)
        .await?;

    let mut inserted = 0u64;
    for seed in seeds {
        inserted += sqlx::query(
            "INSERT INTO pharmacies (name, address, phone, lat, lng, image_url, is_open_24x7) \
             VALUES ($1, $2, $3, $4, $5, $6, $7)",
        )
        .bind(&seed.name)
        .bind(&seed.address)
        .bind(&seed.phone)
        .bind(seed.lat)
        .bind(seed.lng)
        .bind(&seed.image_url)
        .bind(seed.is_open_24x7)
        .execute(&mut *tx)
        .await?
        .rows_affected();
    }

    tx.commit().await?;
    Ok(inserted)
}

/// Replace the medicine master list, clearing all stock rows first.
///
/// Entries whose name already appeared earlier in `entries` are skipped.
/// Returns the inserted rows in insertion order.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if any statement fails; nothing is changed then.
pub async fn replace_medicines(
    pool: &PgPool,
    entries: &[MedicineEntry],
) -> Result<Vec<MedicineRow>, DbError> {
    let mut tx = pool.begin().await?;

    sqlx::query("DELETE FROM pharmacy_stock")
        .execute(&mut *tx)
        .await?;
    sqlx::query("DELETE FROM medicines")
        .execute(&mut *tx)
        .await?;

    let mut rows = Vec::with_capacity(entries.len());
    for entry in entries {
        let row = sqlx::query_as::<_, MedicineRow>(
            "INSERT INTO medicines (name, salt, company) \
             VALUES ($1, $2, $3) \
             ON CONFLICT (name) DO NOTHING \
             RETURNING id, name, salt, company, created_at",
        )
        .bind(&entry.name)
        .bind(&entry.salt)
        .bind(&entry.company)
        .fetch_optional(&mut *tx)
        .await?;
        rows.extend(row);
    }

    tx.commit().await?;
    Ok(rows)
}

/// Insert stock rows, updating quantity and price when the
/// `(pharmacy_id, medicine_id)` pair already exists.
///
/// Returns the number of rows written.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if any statement fails; nothing is changed then.
pub async fn insert_stock(pool: &PgPool, stock: &[NewStock]) -> Result<u64, DbError> {
    let mut tx = pool.begin().await?;
    let mut written = 0u64;

    for row in stock {
        written += sqlx::query(
            "INSERT INTO pharmacy_stock (pharmacy_id, medicine_id, quantity, price) \
             VALUES ($1, $2, $3, $4) \
             ON CONFLICT (pharmacy_id, medicine_id) DO UPDATE SET \
                 quantity   = EXCLUDED.quantity, \
                 price      = EXCLUDED.price, \
                 updated_at = NOW()",
        )
        .bind(row.pharmacy_id)
        .bind(row.medicine_id)
        .bind(row.quantity)
        .bind(row.price)
        .execute(&mut *tx)
        .await?
        .rows_affected();
    }

    tx.commit().await?;
    Ok(written)
}
