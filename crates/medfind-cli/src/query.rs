//! Read-only `nearby` and `search` commands.
//!
//! These call the same core pipelines as the HTTP server and print the
//! results as plain tables.

use medfind_core::{
    rank_nearby, search_term, AppConfig, MedicineWithStock, RankedPharmacy, RankingPolicy,
    RequesterPosition,
};

/// Print pharmacies ranked by distance from (`lat`, `lng`).
///
/// Without a full position every pharmacy is listed unranked; a non-finite
/// value lists nothing.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub(crate) async fn run_nearby(
    pool: &sqlx::PgPool,
    config: &AppConfig,
    lat: Option<f64>,
    lng: Option<f64>,
) -> anyhow::Result<()> {
    let policy = RankingPolicy::from_app_config(config);
    let position = RequesterPosition::from_values(lat, lng);
    let pharmacies = medfind_db::list_pharmacies_with_stock(pool).await?;
    let ranked = rank_nearby(&policy, position, pharmacies);

    if ranked.is_empty() {
        match position {
            RequesterPosition::At(_) => println!("no pharmacies within {} km", policy.radius_km),
            RequesterPosition::Invalid => println!("position is not a finite coordinate"),
            RequesterPosition::Unknown => {
                println!("no pharmacies loaded; run `db seed pharmacies` first");
            }
        }
        return Ok(());
    }

    if position == RequesterPosition::Unknown {
        println!("no position given; listing all pharmacies unranked");
    }

    println!("{:<10}{:<36}{:<10}ADDRESS", "DISTANCE", "NAME", "IN STOCK");
    for pharmacy in &ranked {
        println!(
            "{:<10}{:<36}{:<10}{}",
            fmt_distance(pharmacy),
            pharmacy.name,
            pharmacy.medicines.len(),
            pharmacy.address.as_deref().unwrap_or("\u{2014}")
        );
    }

    Ok(())
}

/// Print every medicine whose name contains `query`, with its stock rows.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub(crate) async fn run_search(pool: &sqlx::PgPool, query: &str) -> anyhow::Result<()> {
    let Some(term) = search_term(Some(query)) else {
        println!("empty query; nothing to search");
        return Ok(());
    };

    let matches = medfind_db::search_medicines_by_name(pool, term).await?;
    if matches.is_empty() {
        println!("no medicines match '{term}'");
        return Ok(());
    }

    for (idx, found) in matches.iter().enumerate() {
        if idx > 0 {
            println!();
        }
        print_match(found);
    }

    Ok(())
}

fn print_match(found: &MedicineWithStock) {
    let medicine = &found.medicine;
    println!(
        "{} ({}, {})",
        medicine.name,
        medicine.salt.as_deref().unwrap_or("\u{2014}"),
        medicine.company.as_deref().unwrap_or("\u{2014}")
    );

    if found.stocks.is_empty() {
        println!("  not listed by any pharmacy");
        return;
    }

    println!("  {:<36}{:<6}PRICE", "PHARMACY", "QTY");
    for stock in &found.stocks {
        let price = stock
            .price
            .map_or_else(|| "\u{2014}".to_string(), |p| format!("{p:.2}"));
        println!(
            "  {:<36}{:<6}{}",
            stock.pharmacy.name, stock.quantity, price
        );
    }
}

pub(crate) fn fmt_distance(pharmacy: &RankedPharmacy) -> String {
    pharmacy
        .distance_km
        .map_or_else(|| "\u{2014}".to_string(), |km| format!("{km:.2} km"))
}
