//! The configuration structs used to build the AppConfig, and their impls.
use std::{path::Path, str::FromStr, time::Duration};

use axum::http::HeaderValue;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use lazy_regex::regex_is_match;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use sqlx::{
    sqlite::{SqliteConnectOptions, SqliteJournalMode},
    ConnectOptions,
};
use strum_macros::AsRefStr;

use crate::config::{ConfigError, ConfigResult};

/// Name of the environment variable holding the admin api key.
pub const ADMIN_API_KEY_ENV: &str = "ADMIN_API_KEY";

// ###################################
// ->   STRUCTS
// ###################################
#[derive(AsRefStr, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Local,
    Production,
}

#[derive(Deserialize, Clone, Debug)]
pub struct AppConfig {
    pub net_config: NetConfig,
    pub db_config: DbConfig,
    pub cors_config: CorsConfig,
    pub auth_config: AuthConfig,
    #[serde(default)]
    pub subscription_config: SubscriptionConfig,
}

#[derive(Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct NetConfig {
    pub host: [u8; 4],
    pub app_port: u16,
}

#[derive(Deserialize, Clone, Debug)]
pub struct DbConfig {
    pub url: String,
    pub max_connections: u32,
    pub acquire_timeout_millis: u64,
}

#[derive(Deserialize, Clone, Debug)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
}

#[derive(Deserialize, Clone, Debug)]
pub struct AuthConfig {
    pub api_key: SecretString,
}

#[derive(Deserialize, Clone, Copy, Debug, Default)]
pub struct SubscriptionConfig {
    #[serde(default)]
    pub validate_email_format: bool,
}

// ###################################
// ->   IMPLs
// ###################################
impl AppConfig {
    /// Loads `base.toml` and `{environment}.toml` from `config_dir`, then applies the
    /// `APP_` prefixed environment variables and the admin api key on top.
    pub fn load(config_dir: &Path, environment: Environment) -> ConfigResult<Self> {
        let mut figment =
            Self::file_figment(config_dir, environment)?.merge(Env::prefixed("APP_").split("__"));

        // Read as a plain string so numeric-looking keys don't get parsed into integers.
        if let Ok(api_key) = std::env::var(ADMIN_API_KEY_ENV) {
            figment = figment.merge(Serialized::default("auth_config.api_key", api_key));
        }

        Self::from_figment(figment)
    }

    /// A `Figment` containing only the TOML sources. Both files have to exist.
    pub fn file_figment(config_dir: &Path, environment: Environment) -> ConfigResult<Figment> {
        let base_file = config_dir.join("base.toml");
        let env_file = config_dir.join(format!("{}.toml", environment.as_ref().to_lowercase()));

        for file in [&base_file, &env_file] {
            if !file.is_file() {
                return Err(ConfigError::MissingFile(file.display().to_string()));
            }
        }

        Ok(Figment::new()
            .merge(Toml::file(base_file))
            .merge(Toml::file(env_file)))
    }

    pub fn from_figment(figment: Figment) -> ConfigResult<Self> {
        let config: AppConfig = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Checks the values serde can't check for us.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.auth_config.api_key.expose_secret().trim().is_empty() {
            return Err(ConfigError::EmptyApiKey);
        }
        self.cors_config.origins()?;
        self.db_config.connection_options()?;
        Ok(())
    }
}

impl DbConfig {
    pub fn is_in_memory(&self) -> bool {
        self.url.contains(":memory:") || self.url.contains("mode=memory")
    }

    pub fn acquire_timeout(&self) -> Duration {
        Duration::from_millis(self.acquire_timeout_millis)
    }

    pub fn connection_options(&self) -> ConfigResult<SqliteConnectOptions> {
        let opts = SqliteConnectOptions::from_str(&self.url)
            .map_err(|er| ConfigError::InvalidDbUrl(er.to_string()))?
            .create_if_missing(true)
            .log_statements(tracing::log::LevelFilter::Trace);

        // WAL needs a file on disk.
        if self.is_in_memory() {
            Ok(opts)
        } else {
            Ok(opts.journal_mode(SqliteJournalMode::Wal))
        }
    }
}

impl CorsConfig {
    /// Parses every allowed origin into a `HeaderValue`.
    /// An origin is `scheme://host[:port]` without a path or trailing slash.
    pub fn origins(&self) -> ConfigResult<Vec<HeaderValue>> {
        self.allowed_origins
            .iter()
            .map(|origin| {
                if !regex_is_match!(r"^https?://[A-Za-z0-9.-]+(:\d{1,5})?$", origin) {
                    return Err(ConfigError::InvalidOrigin(origin.clone()));
                }
                HeaderValue::from_str(origin).map_err(|_| ConfigError::InvalidOrigin(origin.clone()))
            })
            .collect()
    }
}

// ###################################
// ->   TRY FROMs
// ###################################

impl TryFrom<String> for Environment {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.to_ascii_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "production" => Ok(Self::Production),
            _ => Err(Self::Error::StringToEnvironmentFail(value)),
        }
    }
}

// ###################################
// ->   TESTS
// ###################################
