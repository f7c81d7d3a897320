use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    pub db_max_connections: u32,
    pub db_min_connections: u32,
    pub db_acquire_timeout_secs: u64,
    /// Pharmacies farther than this from the requester are dropped from nearby results.
    pub nearby_radius_km: f64,
    pub earth_radius_km: f64,
    /// Served when a pharmacy has no image of its own.
    pub default_image_url: String,
    pub pharmacies_path: PathBuf,
    pub image_overrides_path: PathBuf,
    pub catalog_path: PathBuf,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field("database_url", &"[redacted]")
            .field("db_max_connections", &self.db_max_connections)
            .field("db_min_connections", &self.db_min_connections)
            .field("db_acquire_timeout_secs", &self.db_acquire_timeout_secs)
            .field("nearby_radius_km", &self.nearby_radius_km)
            .field("earth_radius_km", &self.earth_radius_km)
            .field("default_image_url", &self.default_image_url)
            .field("pharmacies_path", &self.pharmacies_path)
            .field("image_overrides_path", &self.image_overrides_path)
            .field("catalog_path", &self.catalog_path)
            .finish()
    }
}
