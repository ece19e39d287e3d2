//! Runtime configuration for the library service.
//!
//! Values are layered: `config/default.yaml`, then an optional
//! `config/{APP_ENV}.yaml`, then `APP_*` environment variables (use `__` to
//! reach nested keys, e.g. `APP_JWT__SECRET`). A `.env` file is read first if
//! present.

use serde::Deserialize;
use thiserror::Error;

const CONFIG_DIR: &str = "config";
const ENV_VAR_NAME: &str = "APP_ENV";
const MIN_SECRET_LEN: usize = 32;

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error(transparent)]
    Source(#[from] config::ConfigError),
    #[error("jwt.secret must be at least {MIN_SECRET_LEN} bytes long")]
    WeakSecret,
}

/// Token signing parameters.
#[derive(Clone, Debug, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
}

/// Credentials of the administrator seeded at startup.
#[derive(Clone, Debug, Deserialize)]
pub struct BootstrapAdminConfig {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Warn about a `.env` file that exists but could not be loaded. A missing
/// file is not an error. Returns whether a warning was emitted.
fn report_dotenv<T>(result: Result<T, dotenvy::Error>) -> bool {
    match result {
        Err(err) if !err.not_found() => {
            log::warn!("Ignoring .env file: {err}");
            true
        }
        _ => false,
    }
}

/// Configuration options for the library service.
#[derive(Clone, Debug, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "ServerConfig::default_address")]
    pub address: String,
    #[serde(default = "ServerConfig::default_port")]
    pub port: u16,
    pub database_url: String,
    pub jwt: JwtConfig,
    #[serde(default)]
    pub bootstrap_admin: Option<BootstrapAdminConfig>,
}

impl ServerConfig {
    fn default_address() -> String {
        "127.0.0.1".to_string()
    }

    fn default_port() -> u16 {
        8080
    }

    /// Load configuration from files and the environment.
    pub fn load() -> Result<Self, ConfigError> {
        report_dotenv(dotenvy::dotenv());

        let environment = std::env::var(ENV_VAR_NAME).unwrap_or_else(|_| "local".to_string());

        let settings = config::Config::builder()
            .add_source(config::File::with_name(&format!("{CONFIG_DIR}/default")).required(false))
            .add_source(
                config::File::with_name(&format!("{CONFIG_DIR}/{environment}")).required(false),
            )
            .add_source(
                config::Environment::with_prefix("APP")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?;

        let server_config: ServerConfig = settings.try_deserialize()?;
        server_config.validate()?;
        Ok(server_config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.jwt.secret.len() < MIN_SECRET_LEN {
            return Err(ConfigError::WeakSecret);
        }
        Ok(())
    }
}
