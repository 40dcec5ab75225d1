//! # wl-config
//!
//! Settings are loaded from (in order of precedence):
//! 1. Environment variables (`WANDERLUST__SERVER__PORT=9000`)
//! 2. Config file (`config/wanderlust.toml`, optional)
//! 3. Default values
//!
//! A `.env` file in the working directory is read first, so its entries
//! count as environment variables. A missing `.env` is fine; one that cannot
//! be parsed fails the load.

use std::path::PathBuf;

use config::{Config, Environment, File};
use secrecy::SecretString;
use serde::Deserialize;
use thiserror::Error;

const ENV_PREFIX: &str = "WANDERLUST";
const CONFIG_FILE: &str = "config/wanderlust";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to load settings: {0}")]
    Load(#[from] config::ConfigError),
    #[error("failed to read .env: {0}")]
    Dotenv(#[from] dotenvy::Error),
}

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub database: DatabaseSettings,
    pub log: LogSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    /// Directory served for requests that match no route
    pub public_dir: PathBuf,
}

#[derive(Debug, Deserialize)]
pub struct DatabaseSettings {
    /// Connection string; redacted in `Debug` output
    pub url: SecretString,
    pub max_connections: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LogSettings {
    /// `tracing` filter directive, overridden by `RUST_LOG`
    pub level: String,
    /// Emit JSON lines instead of human-readable output
    pub json: bool,
}

fn accept_dotenv(outcome: Result<PathBuf, dotenvy::Error>) -> Result<(), ConfigError> {
    match outcome {
        Ok(_) => Ok(()),
        Err(e) if e.not_found() => Ok(()),
        Err(e) => Err(e.into()),
    }
}

impl Settings {
    /// Loads settings from `.env`, the optional config file, and `WANDERLUST__*` variables.
    pub fn load() -> Result<Self, ConfigError> {
        accept_dotenv(dotenvy::dotenv())?;
        Self::from_sources(Some(CONFIG_FILE))
    }

    /// Builds settings from defaults, an optional file, and the environment.
    pub fn from_sources(file: Option<&str>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder()
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8080)?
            .set_default("server.public_dir", "public")?
            .set_default("database.url", "sqlite://wanderlust.db")?
            .set_default("database.max_connections", 5)?
            .set_default("log.level", "info")?
            .set_default("log.json", false)?;

        if let Some(file) = file {
            builder = builder.add_source(File::with_name(file).required(false));
        }

        let settings = builder
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        Ok(settings)
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
