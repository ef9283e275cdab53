use config::{Config, ConfigError};
use serde::Deserialize;

use crate::domain::booking::{Currency, PricingPolicy};

pub mod domain;
pub mod infrastructure;

#[derive(Clone, Debug, Deserialize)]
pub struct RentalConfig {
    #[serde(default)]
    pub server: Server,
    #[serde(default)]
    pub logger: Logger,
    #[serde(default)]
    pub pricing: PricingPolicy,
    #[serde(default)]
    pub currency: Currency,
    #[serde(default)]
    pub catalog: Vec<CatalogEntry>,
}

impl RentalConfig {
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from("rental.toml")
    }

    pub fn load_from(path: &str) -> Result<Self, ConfigError> {
        let config = Config::builder()
            .add_source(config::File::with_name(path).required(false))
            .add_source(
                config::Environment::with_prefix("RENTAL")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize::<RentalConfig>()?;
        config
            .pricing
            .validate()
            .map_err(|e| ConfigError::Message(e.to_string()))?;
        Ok(config)
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct Server {
    pub addr: String,
    pub tls: Option<Tls>,
}

impl Default for Server {
    fn default() -> Self {
        Self {
            addr: "0.0.0.0:8080".to_owned(),
            tls: None,
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct Tls {
    pub cert: String,
    pub key: String,
}

/// カタログに登録するバイク
#[derive(Clone, Debug, Deserialize)]
pub struct CatalogEntry {
    pub id: u64,
    pub name: String,
    pub price_per_day_mon_thu: f64,
    pub price_per_day_fri_sun: f64,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct Logger {
    #[serde(default)]
    pub level: Level,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub enum Level {
    TRACE,
    DEBUG,
    #[default]
    INFO,
    WARN,
    ERROR,
}

impl From<&Level> for tracing::Level {
    fn from(value: &Level) -> Self {
        match value {
            Level::TRACE => tracing::Level::TRACE,
            Level::DEBUG => tracing::Level::DEBUG,
            Level::INFO => tracing::Level::INFO,
            Level::WARN => tracing::Level::WARN,
            Level::ERROR => tracing::Level::ERROR,
        }
    }
}
