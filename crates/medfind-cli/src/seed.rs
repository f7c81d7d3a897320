//! Bulk loaders behind `db seed pharmacies` and `db seed stock`.
//!
//! Both loaders replace table contents wholesale. They are meant to run
//! offline, never while the server is answering requests.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use medfind_core::catalog::{STOCK_PRICE_RANGE, STOCK_QUANTITY_RANGE};
use medfind_core::dataset::missing_images;
use medfind_core::{
    load_catalog, load_image_overrides, load_pharmacy_rows, prepare_pharmacies, CatalogFile,
    Pharmacy,
};
use medfind_db::NewStock;
use rand::{rngs::StdRng, Rng, SeedableRng};

#[derive(Debug)]
pub(crate) struct PharmacySeedPaths {
    pub file: PathBuf,
    pub overrides: PathBuf,
    pub public_dir: Option<PathBuf>,
}

/// One generated stock row, keyed by names until medicine ids exist.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct PlannedStock {
    pub pharmacy_id: i64,
    pub pharmacy_name: String,
    pub medicine_name: String,
    pub quantity: i32,
    pub price: f64,
}

/// Load the pharmacy dataset and replace the `pharmacies` table with it.
///
/// Invalid rows are reported and skipped. With no pool the dataset is only
/// validated and printed.
///
/// # Errors
///
/// Returns an error if a file cannot be read, no row survives validation,
/// or the database write fails.
pub(crate) async fn run_seed_pharmacies(
    pool: Option<&sqlx::PgPool>,
    paths: &PharmacySeedPaths,
) -> anyhow::Result<()> {
    let rows = load_pharmacy_rows(&paths.file)?;
    let overrides = load_image_overrides(&paths.overrides)?;
    let total = rows.len();
    let prepared = prepare_pharmacies(rows, &overrides);

    tracing::info!(
        file = %paths.file.display(),
        total,
        accepted = prepared.accepted.len(),
        rejected = prepared.rejected.len(),
        overrides = overrides.len(),
        "pharmacy dataset prepared"
    );
    for rejection in &prepared.rejected {
        println!("skipped row {}: {}", rejection.row, rejection.reason);
    }

    if prepared.accepted.is_empty() {
        anyhow::bail!(
            "no valid pharmacy rows in {}; refusing to replace the table",
            paths.file.display()
        );
    }

    let Some(pool) = pool else {
        println!("{:<40}{:<12}{:<12}IMAGE", "NAME", "LAT", "LNG");
        for seed in &prepared.accepted {
            println!(
                "{:<40}{:<12.5}{:<12.5}{}",
                seed.name,
                seed.lat,
                seed.lng,
                seed.image_url.as_deref().unwrap_or("\u{2014}")
            );
        }
        println!(
            "dry run: {} of {total} pharmacies would be loaded",
            prepared.accepted.len()
        );
        report_missing_images(&prepared.accepted, paths.public_dir.as_deref());
        return Ok(());
    };

    let before = medfind_db::count_pharmacies(pool).await?;
    let inserted = medfind_db::replace_pharmacies(pool, &prepared.accepted).await?;
    let after = medfind_db::count_pharmacies(pool).await?;
    tracing::info!(before, inserted, after, "pharmacy table replaced");
    println!(
        "replaced {before} pharmacies with {inserted} ({} skipped)",
        prepared.rejected.len()
    );

    report_missing_images(&prepared.accepted, paths.public_dir.as_deref());
    Ok(())
}

fn report_missing_images(seeds: &[medfind_core::PharmacySeed], public_dir: Option<&Path>) {
    let Some(public_dir) = public_dir else {
        return;
    };

    let missing = missing_images(seeds, public_dir);
    for seed in &missing {
        tracing::warn!(
            pharmacy = %seed.name,
            image = seed.image_url.as_deref().unwrap_or_default(),
            "image file not found under public dir"
        );
    }
    if missing.is_empty() {
        println!("all image paths resolve under {}", public_dir.display());
    } else {
        println!(
            "{} image path(s) missing under {}",
            missing.len(),
            public_dir.display()
        );
    }
}

/// Generate stock rows for `pharmacies` from their catalog assignments.
///
/// Quantity and price are drawn from the generation ranges; pharmacies
/// without an assignment of their own get the `default` list.
pub(crate) fn plan_stock<R: Rng>(
    catalog: &CatalogFile,
    pharmacies: &[Pharmacy],
    rng: &mut R,
) -> Vec<PlannedStock> {
    let mut planned = Vec::new();
    for pharmacy in pharmacies {
        for medicine_name in catalog.assignment_for(&pharmacy.name) {
            planned.push(PlannedStock {
                pharmacy_id: pharmacy.id,
                pharmacy_name: pharmacy.name.clone(),
                medicine_name: medicine_name.clone(),
                quantity: rng.random_range(STOCK_QUANTITY_RANGE),
                price: f64::from(rng.random_range(STOCK_PRICE_RANGE)),
            });
        }
    }
    planned
}

/// Replace the medicine list from the catalog and stock every loaded pharmacy.
///
/// # Errors
///
/// Returns an error if the catalog is invalid, no pharmacies are loaded, or
/// a database operation fails.
pub(crate) async fn run_seed_stock(
    pool: &sqlx::PgPool,
    catalog_path: &Path,
    seed: Option<u64>,
    dry_run: bool,
) -> anyhow::Result<()> {
    let catalog = load_catalog(catalog_path)?;
    let pharmacies: Vec<Pharmacy> = medfind_db::list_pharmacies(pool)
        .await?
        .into_iter()
        .map(Into::into)
        .collect();

    if pharmacies.is_empty() {
        anyhow::bail!("no pharmacies loaded; run `db seed pharmacies` first");
    }

    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    let planned = plan_stock(&catalog, &pharmacies, &mut rng);

    if dry_run {
        println!("{:<36}{:<24}{:<6}PRICE", "PHARMACY", "MEDICINE", "QTY");
        for row in &planned {
            println!(
                "{:<36}{:<24}{:<6}{:.2}",
                row.pharmacy_name, row.medicine_name, row.quantity, row.price
            );
        }
        println!(
            "dry run: {} medicines, {} stock rows across {} pharmacies",
            catalog.medicines.len(),
            planned.len(),
            pharmacies.len()
        );
        return Ok(());
    }

    let medicines = medfind_db::replace_medicines(pool, &catalog.medicines).await?;
    let ids: HashMap<&str, i64> = medicines
        .iter()
        .map(|row| (row.name.as_str(), row.id))
        .collect();

    let stock: Vec<NewStock> = planned
        .iter()
        .filter_map(|row| {
            let Some(&medicine_id) = ids.get(row.medicine_name.as_str()) else {
                tracing::warn!(medicine = %row.medicine_name, "assigned medicine was not inserted");
                return None;
            };
            Some(NewStock {
                pharmacy_id: row.pharmacy_id,
                medicine_id,
                quantity: row.quantity,
                price: Some(row.price),
            })
        })
        .collect();

    let written = medfind_db::insert_stock(pool, &stock).await?;
    tracing::info!(
        medicines = medicines.len(),
        stock_rows = written,
        pharmacies = pharmacies.len(),
        "stock seeded"
    );
    println!(
        "seeded {} medicines and {written} stock rows across {} pharmacies",
        medicines.len(),
        pharmacies.len()
    );
    Ok(())
}
