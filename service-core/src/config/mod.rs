use crate::error::AppError;
use config::{Config as Cfg, File};
use serde::Deserialize;

/// Port the quiz front-end expects the service on.
pub const DEFAULT_PORT: u16 = 1337;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

impl Config {
    /// Reads `.env`, an optional `configuration.{toml,yaml,json}` file and
    /// `APP__*` environment variables, in increasing precedence.
    pub fn load() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();

        let config = Cfg::builder()
            .add_source(File::with_name("configuration").required(false))
            .add_source(config::Environment::with_prefix("APP").separator("__"))
            .build()?;

        Ok(config.try_deserialize()?)
    }
}
