//! Configuration for Products API

use core_config::{AppInfo, ConfigError, FromEnv, app_info, env_or_default, server::ServerConfig};
use database::mongodb::MongoConfig;
use strum::{Display, EnumString};

pub use core_config::Environment;

/// Which [`ProductRepository`](domain_products::ProductRepository) backs the API.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum StoreKind {
    #[default]
    #[strum(to_string = "mongodb", serialize = "mongo")]
    MongoDb,
    Memory,
}

impl FromEnv for StoreKind {
    fn from_env() -> Result<Self, ConfigError> {
        let raw = env_or_default("PRODUCTS_STORE", "mongodb");
        raw.parse().map_err(|_| ConfigError::ParseError {
            key: "PRODUCTS_STORE".to_string(),
            details: format!("expected 'mongodb' or 'memory', got '{raw}'"),
        })
    }
}

/// Application configuration
#[derive(Clone, Debug)]
pub struct Config {
    pub app: AppInfo,
    pub server: ServerConfig,
    pub environment: Environment,
    pub store: StoreKind,
    /// Present exactly when `store` is [`StoreKind::MongoDb`]
    pub mongodb: Option<MongoConfig>,
}

impl Config {
    pub fn from_env() -> eyre::Result<Self> {
        let environment = Environment::from_env();
        let server = ServerConfig::from_env()?;
        let store = StoreKind::from_env()?;

        let mongodb = match store {
            StoreKind::MongoDb => Some(
                MongoConfig::from_env()?.with_app_name(app_info!().name),
            ),
            StoreKind::Memory => None,
        };

        Ok(Self {
            app: app_info!(),
            server,
            environment,
            store,
            mongodb,
        })
    }
}
