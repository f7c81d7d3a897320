//! Pharmacy dataset parsing and validation for the offline bulk loader.

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;
use serde_json::Value;

use crate::DatasetError;

/// One row of the pharmacy JSON dataset, as found on disk.
///
/// Coordinates may be JSON numbers or numeric strings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawPharmacyRow {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub lat: Option<Value>,
    #[serde(default)]
    pub lng: Option<Value>,
    #[serde(default, rename = "isOpen24x7")]
    pub is_open_24x7: Option<bool>,
    #[serde(default)]
    pub image_url: Option<String>,
}

/// A validated pharmacy ready to be written to the store.
#[derive(Debug, Clone, PartialEq)]
pub struct PharmacySeed {
    pub name: String,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub lat: f64,
    pub lng: f64,
    pub is_open_24x7: bool,
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    MissingName,
    InvalidLatitude,
    InvalidLongitude,
}

impl std::fmt::Display for RejectReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RejectReason::MissingName => write!(f, "missing name"),
            RejectReason::InvalidLatitude => write!(f, "missing or non-numeric lat"),
            RejectReason::InvalidLongitude => write!(f, "missing or non-numeric lng"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowRejection {
    /// 1-based position in the dataset.
    pub row: usize,
    pub reason: RejectReason,
}

#[derive(Debug, Default)]
pub struct PreparedPharmacies {
    pub accepted: Vec<PharmacySeed>,
    pub rejected: Vec<RowRejection>,
}

/// Name-keyed image paths that take precedence over the dataset's own.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct ImageOverrides(HashMap<String, String>);

impl ImageOverrides {
    #[must_use]
    pub fn new(map: HashMap<String, String>) -> Self {
        Self(map)
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Read the pharmacy dataset from a JSON file.
///
/// # Errors
///
/// Returns `DatasetError` if the file cannot be read or is not a JSON array of rows.
pub fn load_pharmacy_rows(path: &Path) -> Result<Vec<RawPharmacyRow>, DatasetError> {
    let content = std::fs::read_to_string(path).map_err(|e| DatasetError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    parse_pharmacy_rows(&content)
}

/// Parse the pharmacy dataset from a JSON string.
///
/// # Errors
///
/// Returns `DatasetError::Json` if the content is not a JSON array of rows.
pub fn parse_pharmacy_rows(content: &str) -> Result<Vec<RawPharmacyRow>, DatasetError> {
    Ok(serde_json::from_str(content)?)
}

/// Load the image override table from a YAML mapping of name to path.
///
/// An empty file yields an empty table.
///
/// # Errors
///
/// Returns `DatasetError` if the file cannot be read or parsed.
pub fn load_image_overrides(path: &Path) -> Result<ImageOverrides, DatasetError> {
    let content = std::fs::read_to_string(path).map_err(|e| DatasetError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    if content.trim().is_empty() {
        return Ok(ImageOverrides::default());
    }
    Ok(serde_yaml::from_str(&content)?)
}

/// Validate raw rows and normalize their image paths.
///
/// Rows without a name or with unusable coordinates are rejected and
/// reported; they never abort the batch.
#[must_use]
pub fn prepare_pharmacies(
    rows: Vec<RawPharmacyRow>,
    overrides: &ImageOverrides,
) -> PreparedPharmacies {
    let mut prepared = PreparedPharmacies::default();

    for (idx, row) in rows.into_iter().enumerate() {
        match prepare_row(row, overrides) {
            Ok(seed) => prepared.accepted.push(seed),
            Err(reason) => {
                tracing::warn!(row = idx + 1, %reason, "skipping invalid pharmacy row");
                prepared.rejected.push(RowRejection {
                    row: idx + 1,
                    reason,
                });
            }
        }
    }

    prepared
}

fn prepare_row(
    row: RawPharmacyRow,
    overrides: &ImageOverrides,
) -> Result<PharmacySeed, RejectReason> {
    let name = row
        .name
        .as_deref()
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .ok_or(RejectReason::MissingName)?
        .to_string();
    let lat = coordinate_value(row.lat.as_ref()).ok_or(RejectReason::InvalidLatitude)?;
    let lng = coordinate_value(row.lng.as_ref()).ok_or(RejectReason::InvalidLongitude)?;

    let image_url = overrides
        .get(&name)
        .map(ToOwned::to_owned)
        .or_else(|| row.image_url.as_deref().and_then(normalize_image_path));

    Ok(PharmacySeed {
        name,
        address: non_empty(row.address),
        phone: non_empty(row.phone),
        lat,
        lng,
        is_open_24x7: row.is_open_24x7.unwrap_or(false),
        image_url,
    })
}

fn coordinate_value(value: Option<&Value>) -> Option<f64> {
    let parsed = match value? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|v| v.is_finite())
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Normalize a dataset image path to a web-root path.
///
/// A leading `public` directory is stripped and a leading `/` ensured, so
/// `public/pharmacies/a.png` and `/public/pharmacies/a.png` both become
/// `/pharmacies/a.png`.
#[must_use]
pub fn normalize_image_path(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    let stripped = trimmed
        .strip_prefix("/public/")
        .or_else(|| trimmed.strip_prefix("public/"))
        .unwrap_or(trimmed);

    if stripped.starts_with('/') {
        Some(stripped.to_string())
    } else {
        Some(format!("/{stripped}"))
    }
}

/// Pharmacies whose image path does not resolve to a file under `public_dir`.
#[must_use]
pub fn missing_images<'a>(seeds: &'a [PharmacySeed], public_dir: &Path) -> Vec<&'a PharmacySeed> {
    seeds
        .iter()
        .filter(|seed| {
            seed.image_url
                .as_deref()
                .is_some_and(|url| !public_dir.join(url.trim_start_matches('/')).exists())
        })
        .collect()
}
