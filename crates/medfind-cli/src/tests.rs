use super::*;
use medfind_core::catalog::{STOCK_PRICE_RANGE, STOCK_QUANTITY_RANGE};
use medfind_core::{parse_catalog, Pharmacy, RankedPharmacy};
use rand::{rngs::StdRng, SeedableRng};

use crate::query::fmt_distance;
use crate::seed::plan_stock;

const CATALOG: &str = r"
medicines:
  - { name: Paracetamol 650, salt: Paracetamol, company: Cipla }
  - { name: Dolo 650, salt: Paracetamol, company: Micro Labs }
  - { name: ORS Sachet, salt: Glucose + Electrolytes, company: Dr. Reddy }
  - { name: Azithromycin 500, salt: Azithromycin, company: Zydus }
assignments:
  Shri Sai Medicals: [Dolo 650, Azithromycin 500, ORS Sachet]
  default: [Paracetamol 650, ORS Sachet]
";

fn pharmacy(id: i64, name: &str) -> Pharmacy {
    Pharmacy {
        id,
        name: name.to_string(),
        address: None,
        lat: Some(21.1458),
        lng: Some(79.0882),
        image_url: None,
        is_open_24x7: false,
    }
}

#[test]
fn parses_db_ping_command() {
    let cli = Cli::try_parse_from(["medfind-cli", "db", "ping"]).expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Some(Commands::Db {
            command: DbCommands::Ping
        })
    ));
}

#[test]
fn parses_db_migrate_command() {
    let cli =
        Cli::try_parse_from(["medfind-cli", "db", "migrate"]).expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Some(Commands::Db {
            command: DbCommands::Migrate
        })
    ));
}

#[test]
fn no_command_is_none() {
    let cli = Cli::try_parse_from(["medfind-cli"]).expect("expected valid cli args");
    assert!(cli.command.is_none());
}

#[test]
fn seed_pharmacies_defaults_to_configured_paths() {
    let cli = Cli::try_parse_from(["medfind-cli", "db", "seed", "pharmacies"])
        .expect("expected valid cli args");
    assert!(matches!(
        cli.command,
        Some(Commands::Db {
            command: DbCommands::Seed {
                command: SeedCommands::Pharmacies {
                    file: None,
                    overrides: None,
                    public_dir: None,
                    dry_run: false,
                }
            }
        })
    ));
}

#[test]
fn seed_pharmacies_accepts_paths_and_dry_run() {
    let cli = Cli::try_parse_from([
        "medfind-cli",
        "db",
        "seed",
        "pharmacies",
        "--file",
        "data/nagpur.json",
        "--public-dir",
        "public",
        "--dry-run",
    ])
    .expect("expected valid cli args");
    assert!(matches!(
        cli.command,
        Some(Commands::Db {
            command: DbCommands::Seed {
                command: SeedCommands::Pharmacies {
                    file: Some(ref f),
                    overrides: None,
                    public_dir: Some(ref p),
                    dry_run: true,
                }
            }
        }) if f.as_os_str() == "data/nagpur.json" && p.as_os_str() == "public"
    ));
}

#[test]
fn seed_stock_accepts_rng_seed() {
    let cli = Cli::try_parse_from(["medfind-cli", "db", "seed", "stock", "--seed", "42"])
        .expect("expected valid cli args");
    assert!(matches!(
        cli.command,
        Some(Commands::Db {
            command: DbCommands::Seed {
                command: SeedCommands::Stock {
                    catalog: None,
                    seed: Some(42),
                    dry_run: false,
                }
            }
        })
    ));
}

#[test]
fn seed_stock_rejects_non_numeric_seed() {
    let result = Cli::try_parse_from(["medfind-cli", "db", "seed", "stock", "--seed", "abc"]);
    assert!(result.is_err());
}

#[test]
fn nearby_accepts_negative_coordinates() {
    let cli = Cli::try_parse_from(["medfind-cli", "nearby", "--lat", "-33.86", "--lng", "151.2"])
        .expect("expected valid cli args");
    assert!(matches!(
        cli.command,
        Some(Commands::Nearby {
            lat: Some(lat),
            lng: Some(lng),
        }) if (lat + 33.86).abs() < f64::EPSILON && (lng - 151.2).abs() < f64::EPSILON
    ));
}

#[test]
fn nearby_without_position_is_allowed() {
    let cli = Cli::try_parse_from(["medfind-cli", "nearby"]).expect("expected valid cli args");
    assert!(matches!(
        cli.command,
        Some(Commands::Nearby {
            lat: None,
            lng: None
        })
    ));
}

#[test]
fn search_requires_a_query() {
    assert!(Cli::try_parse_from(["medfind-cli", "search"]).is_err());

    let cli = Cli::try_parse_from(["medfind-cli", "search", "dolo"]).expect("valid args");
    assert!(matches!(
        cli.command,
        Some(Commands::Search { ref query }) if query == "dolo"
    ));
}

#[test]
fn plan_stock_uses_named_assignment_or_default() {
    let catalog = parse_catalog(CATALOG).expect("valid catalog");
    let pharmacies = [pharmacy(1, "Shri Sai Medicals"), pharmacy(2, "Unlisted Chemist")];
    let mut rng = StdRng::seed_from_u64(7);

    let planned = plan_stock(&catalog, &pharmacies, &mut rng);

    let pairs: Vec<(i64, &str)> = planned
        .iter()
        .map(|row| (row.pharmacy_id, row.medicine_name.as_str()))
        .collect();
    assert_eq!(
        pairs,
        vec![
            (1, "Dolo 650"),
            (1, "Azithromycin 500"),
            (1, "ORS Sachet"),
            (2, "Paracetamol 650"),
            (2, "ORS Sachet"),
        ]
    );
}

#[test]
fn plan_stock_draws_from_generation_ranges() {
    let catalog = parse_catalog(CATALOG).expect("valid catalog");
    let pharmacies: Vec<Pharmacy> = (1..=20).map(|id| pharmacy(id, "Chemist")).collect();
    let mut rng = StdRng::seed_from_u64(99);

    let planned = plan_stock(&catalog, &pharmacies, &mut rng);

    assert_eq!(planned.len(), 40);
    for row in &planned {
        assert!(STOCK_QUANTITY_RANGE.contains(&row.quantity));
        assert!(row.price >= f64::from(*STOCK_PRICE_RANGE.start()));
        assert!(row.price <= f64::from(*STOCK_PRICE_RANGE.end()));
        assert!(row.quantity > 0, "generated stock is always in stock");
    }
}

#[test]
fn plan_stock_is_repeatable_with_the_same_seed() {
    let catalog = parse_catalog(CATALOG).expect("valid catalog");
    let pharmacies = [pharmacy(1, "Shri Sai Medicals")];

    let first = plan_stock(&catalog, &pharmacies, &mut StdRng::seed_from_u64(3));
    let second = plan_stock(&catalog, &pharmacies, &mut StdRng::seed_from_u64(3));
    assert_eq!(first, second);
}

#[test]
fn plan_stock_without_matching_assignment_is_empty() {
    let catalog = parse_catalog(
        "medicines:\n  - { name: Dolo 650 }\nassignments:\n  MedPlus Pharmacy: [Dolo 650]\n",
    )
    .expect("valid catalog");
    let planned = plan_stock(
        &catalog,
        &[pharmacy(5, "Other Store")],
        &mut StdRng::seed_from_u64(1),
    );
    assert!(planned.is_empty());
}

#[test]
fn fmt_distance_renders_two_decimals_or_dash() {
    let mut ranked = RankedPharmacy {
        id: 1,
        name: "Shri Sai Medicals".to_string(),
        address: None,
        lat: None,
        lng: None,
        distance_km: Some(1.5),
        google_maps_url: None,
        image_url: "/pharmacies/default.jpg".to_string(),
        medicines: Vec::new(),
    };
    assert_eq!(fmt_distance(&ranked), "1.50 km");

    ranked.distance_km = None;
    assert_eq!(fmt_distance(&ranked), "\u{2014}");
}
