pub mod app_config;
pub mod catalog;
pub mod config;
pub mod dataset;
pub mod geo;
pub mod ranking;
pub mod records;
pub mod search;

pub use app_config::{AppConfig, Environment};
pub use catalog::{load_catalog, parse_catalog, CatalogFile, MedicineEntry};
pub use config::{load_app_config, load_app_config_from_env};
pub use dataset::{
    load_image_overrides, load_pharmacy_rows, parse_pharmacy_rows, prepare_pharmacies,
    ImageOverrides, PharmacySeed, PreparedPharmacies, RawPharmacyRow, RejectReason, RowRejection,
};
pub use geo::{haversine_km, Coordinate, EARTH_RADIUS_KM};
pub use ranking::{
    rank_nearby, RankedMedicine, RankedPharmacy, RankingPolicy, RequesterPosition,
};
pub use records::{
    Medicine, MedicineWithStock, Pharmacy, PharmacySummary, PharmacyWithStock, StockListing,
    StockedMedicine,
};
pub use search::{like_pattern, search_term};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse JSON dataset: {0}")]
    Json(#[from] serde_json::Error),
    #[error("failed to parse YAML file: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("validation error: {0}")]
    Validation(String),
}
