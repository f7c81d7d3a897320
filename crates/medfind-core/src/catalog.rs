//! Medicine master list and per-pharmacy stock assignments for seeding.

use std::collections::{HashMap, HashSet};
use std::ops::RangeInclusive;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::DatasetError;

/// Assignment key used for pharmacies that have no list of their own.
pub const DEFAULT_ASSIGNMENT: &str = "default";

/// Quantity-on-hand range for generated stock rows.
pub const STOCK_QUANTITY_RANGE: RangeInclusive<i32> = 5..=40;

/// Price range for generated stock rows.
pub const STOCK_PRICE_RANGE: RangeInclusive<i32> = 50..=300;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MedicineEntry {
    pub name: String,
    pub salt: Option<String>,
    pub company: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CatalogFile {
    pub medicines: Vec<MedicineEntry>,
    /// Pharmacy name to the medicine names it stocks.
    #[serde(default)]
    pub assignments: HashMap<String, Vec<String>>,
}

impl CatalogFile {
    /// Medicine names stocked by `pharmacy_name`, falling back to the
    /// `default` assignment and then to nothing.
    #[must_use]
    pub fn assignment_for(&self, pharmacy_name: &str) -> &[String] {
        self.assignments
            .get(pharmacy_name)
            .or_else(|| self.assignments.get(DEFAULT_ASSIGNMENT))
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}

/// Load and validate the catalog from a YAML file.
///
/// # Errors
///
/// Returns `DatasetError` if the file cannot be read, parsed, or fails validation.
pub fn load_catalog(path: &Path) -> Result<CatalogFile, DatasetError> {
    let content = std::fs::read_to_string(path).map_err(|e| DatasetError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    parse_catalog(&content)
}

/// Parse and validate the catalog from a YAML string.
///
/// # Errors
///
/// Returns `DatasetError` if the content cannot be parsed or fails validation.
pub fn parse_catalog(content: &str) -> Result<CatalogFile, DatasetError> {
    let catalog: CatalogFile = serde_yaml::from_str(content)?;
    validate_catalog(&catalog)?;
    Ok(catalog)
}

fn validate_catalog(catalog: &CatalogFile) -> Result<(), DatasetError> {
    let mut seen = HashSet::new();

    for medicine in &catalog.medicines {
        if medicine.name.trim().is_empty() {
            return Err(DatasetError::Validation(
                "medicine name must be non-empty".to_string(),
            ));
        }
        if !seen.insert(medicine.name.to_lowercase()) {
            return Err(DatasetError::Validation(format!(
                "duplicate medicine name: '{}'",
                medicine.name
            )));
        }
    }

    let known: HashSet<&str> = catalog.medicines.iter().map(|m| m.name.as_str()).collect();
    for (pharmacy, names) in &catalog.assignments {
        if let Some(unknown) = names.iter().find(|n| !known.contains(n.as_str())) {
            return Err(DatasetError::Validation(format!(
                "assignment '{pharmacy}' references unknown medicine '{unknown}'"
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
medicines:
  - name: Dolo 650
    salt: Paracetamol
    company: Micro Labs
  - name: ORS Sachet
    salt: Glucose + Electrolytes
    company: Dr. Reddy
  - name: Metformin 500
    salt: Metformin
    company: Sun Pharma
assignments:
  MedPlus Pharmacy: [Dolo 650, Metformin 500]
  default: [ORS Sachet]
"#;

    #[test]
    fn parses_sample_catalog() {
        let catalog = parse_catalog(SAMPLE).expect("valid catalog");
        assert_eq!(catalog.medicines.len(), 3);
        assert_eq!(catalog.medicines[0].salt.as_deref(), Some("Paracetamol"));
    }

    #[test]
    fn named_assignment_is_used() {
        let catalog = parse_catalog(SAMPLE).unwrap();
        assert_eq!(
            catalog.assignment_for("MedPlus Pharmacy"),
            ["Dolo 650".to_string(), "Metformin 500".to_string()]
        );
    }

    #[test]
    fn unlisted_pharmacy_falls_back_to_default() {
        let catalog = parse_catalog(SAMPLE).unwrap();
        assert_eq!(catalog.assignment_for("Corner Chemist"), ["ORS Sachet".to_string()]);
    }

    #[test]
    fn no_default_means_no_stock() {
        let catalog = parse_catalog("medicines:\n  - name: Dolo 650\n").unwrap();
        assert!(catalog.assignment_for("Anyone").is_empty());
    }

    #[test]
    fn rejects_duplicate_names_case_insensitively() {
        let err = parse_catalog("medicines:\n  - name: Dolo 650\n  - name: DOLO 650\n").unwrap_err();
        assert!(err.to_string().contains("duplicate medicine name"));
    }

    #[test]
    fn rejects_empty_name() {
        let err = parse_catalog("medicines:\n  - name: '  '\n").unwrap_err();
        assert!(err.to_string().contains("non-empty"));
    }

    #[test]
    fn rejects_assignment_to_unknown_medicine() {
        let err = parse_catalog(
            "medicines:\n  - name: Dolo 650\nassignments:\n  default: [Crocin]\n",
        )
        .unwrap_err();
        assert!(err.to_string().contains("unknown medicine 'Crocin'"));
    }

    #[test]
    fn load_catalog_from_real_file() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("..")
            .join("..")
            .join("config")
            .join("catalog.yaml");
        assert!(path.exists(), "catalog.yaml missing at {path:?}");

        let catalog = load_catalog(&path).expect("failed to load catalog.yaml");
        assert_eq!(catalog.medicines.len(), 15);
        assert_eq!(
            catalog.assignment_for("Shri Sai Medicals"),
            ["Dolo 650", "Azithromycin 500", "ORS Sachet"]
        );
        assert_eq!(
            catalog.assignment_for("Some New Chemist"),
            ["Paracetamol 650", "ORS Sachet"]
        );
    }
}
