use std::{collections::HashMap, path::PathBuf, time::Duration};

use serde::Deserialize;

use crate::server::{error::config::ConfigError, model::api_key::ApiKeyRegistry};

/// Config file read when `TURTLE_CONFIG` is unset.
pub const DEFAULT_CONFIG_PATH: &str = "./ginconfig.json";

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    #[serde(default = "default_protocol")]
    pub protocol: String,
    #[serde(default = "default_host")]
    pub host: String,
    /// Kept as text so existing config files with `"port": "8080"` load unchanged.
    #[serde(default = "default_port", deserialize_with = "port_from_text_or_number")]
    pub port: String,

    /// Connection string of the document store, e.g. `sqlite://turtle.db?mode=rwc`.
    #[serde(rename = "mongo", alias = "storeUrl")]
    pub store_url: String,
    /// Namespace all collections live in.
    #[serde(rename = "mongoDbName", alias = "storeName")]
    pub store_name: String,

    /// API key to subject id.
    #[serde(default)]
    pub api_keys: HashMap<String, String>,

    #[serde(default = "default_store_timeout_secs")]
    pub store_timeout_secs: u64,
    #[serde(default)]
    pub cookie_secure: bool,
    #[serde(default = "default_static_dir")]
    pub static_dir: PathBuf,
    #[serde(default)]
    pub log_folder: Option<PathBuf>,
    #[serde(default = "default_app_name")]
    pub app_name: String,

    /// Account created or updated at startup.
    #[serde(default)]
    pub admin: Option<AdminAccount>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AdminAccount {
    pub email: String,
    pub password: String,
}

fn default_protocol() -> String {
    "http".to_string()
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> String {
    "8080".to_string()
}

fn default_store_timeout_secs() -> u64 {
    10
}

fn default_static_dir() -> PathBuf {
    PathBuf::from("./static")
}

fn default_app_name() -> String {
    "TurtleNetes".to_string()
}

fn port_from_text_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Port {
        Text(String),
        Number(u16),
    }

    Ok(match Port::deserialize(deserializer)? {
        Port::Text(text) => text,
        Port::Number(number) => number.to_string(),
    })
}

impl Config {
    /// Loads the config file named by `TURTLE_CONFIG`, or `./ginconfig.json`.
    pub fn from_env() -> Result<Self, ConfigError> {
        let path = std::env::var("TURTLE_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        Self::from_file(&path)
    }

    /// Reads and validates a JSON config file.
    ///
    /// # Arguments
    /// - `path` - Location of the JSON config file
    ///
    /// # Returns
    /// - `Ok(Config)` - Parsed configuration with defaults applied
    /// - `Err(ConfigError::Read)` - File could not be read
    /// - `Err(ConfigError::Parse)` - File is not valid JSON for this structure
    /// - `Err(ConfigError::MissingField)` - A required field is empty
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let data = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_string(),
            source,
        })?;

        Self::from_json(path, &data)
    }

    pub fn from_json(path: &str, data: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_json::from_str(data).map_err(|source| ConfigError::Parse {
            path: path.to_string(),
            source,
        })?;

        for (name, value) in [
            ("mongo", &config.store_url),
            ("mongoDbName", &config.store_name),
            ("host", &config.host),
            ("port", &config.port),
        ] {
            if value.trim().is_empty() {
                return Err(ConfigError::MissingField(name.to_string()));
            }
        }

        Ok(config)
    }

    /// `host:port`, the address the listener binds.
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// `protocol://host:port`, the public base URL.
    pub fn url(&self) -> String {
        format!("{}://{}:{}", self.protocol, self.host, self.port)
    }

    pub fn store_timeout(&self) -> Duration {
        Duration::from_secs(self.store_timeout_secs)
    }

    pub fn api_key_registry(&self) -> ApiKeyRegistry {
        ApiKeyRegistry::new(self.api_keys.clone())
    }
}
