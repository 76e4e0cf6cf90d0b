//! Configuration loading for the dish store connection
//!
//! Settings are resolved once at startup: a YAML file provides the base
//! values, then `DISHES_MONGO_*` environment variables override individual
//! fields. Deployment-specific hosts (e.g. a container service name) are set
//! through those variables.
//!
//! ```yaml
//! mongo:
//!   host: localhost
//!   port: 27017
//!   database: mts
//!   username: admin
//!   password: secret
//!   collection: Dish
//! ```

use crate::core::ConfigError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Prefix of the environment variables overriding [`MongoSettings`]
pub const ENV_PREFIX: &str = "DISHES_MONGO_";

/// Connection settings for the MongoDB dish collection
#[derive(Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct MongoSettings {
    pub host: String,
    pub port: u16,
    pub database: String,
    pub username: String,
    pub password: String,

    /// Collection holding the dishes
    pub collection: String,

    /// Server selection and connect timeout, in milliseconds
    pub timeout_ms: u64,
}

impl Default for MongoSettings {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 27017,
            database: "mts".to_string(),
            username: String::new(),
            password: String::new(),
            collection: "Dish".to_string(),
            timeout_ms: 3000,
        }
    }
}

impl MongoSettings {
    /// Build the connection URI
    ///
    /// Credentials are included only when a username is set, and are
    /// percent-encoded so reserved characters (`@`, `:`, `/`) survive.
    pub fn connection_string(&self) -> String {
        if self.username.is_empty() {
            format!("mongodb://{}:{}", self.host, self.port)
        } else {
            format!(
                "mongodb://{}:{}@{}:{}",
                urlencoding::encode(&self.username),
                urlencoding::encode(&self.password),
                self.host,
                self.port
            )
        }
    }

    /// Connection URI with driver timeouts, as handed to the client
    ///
    /// Bounds server selection so an unreachable server fails the connect
    /// instead of hanging.
    pub fn client_uri(&self) -> String {
        format!(
            "{}/?serverSelectionTimeoutMS={}&connectTimeoutMS={}",
            self.connection_string(),
            self.timeout_ms,
            self.timeout_ms
        )
    }

    /// Connection URI with the password masked, for logs
    pub fn redacted_connection_string(&self) -> String {
        if self.username.is_empty() {
            self.connection_string()
        } else {
            format!(
                "mongodb://{}:***@{}:{}",
                urlencoding::encode(&self.username),
                self.host,
                self.port
            )
        }
    }

    /// Apply overrides looked up by variable name (without [`ENV_PREFIX`]).
    ///
    /// Recognized names: `HOST`, `PORT`, `DATABASE`, `USERNAME`, `PASSWORD`,
    /// `COLLECTION`, `TIMEOUT_MS`.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("HOST") {
            self.host = host;
        }
        if let Some(port) = lookup("PORT") {
            self.port = port.trim().parse().map_err(|_| ConfigError::InvalidNumber {
                value: port.clone(),
                origin: format!("{}PORT", ENV_PREFIX),
            })?;
        }
        if let Some(database) = lookup("DATABASE") {
            self.database = database;
        }
        if let Some(username) = lookup("USERNAME") {
            self.username = username;
        }
        if let Some(password) = lookup("PASSWORD") {
            self.password = password;
        }
        if let Some(collection) = lookup("COLLECTION") {
            self.collection = collection;
        }
        if let Some(timeout) = lookup("TIMEOUT_MS") {
            self.timeout_ms = timeout.trim().parse().map_err(|_| ConfigError::InvalidNumber {
                value: timeout.clone(),
                origin: format!("{}TIMEOUT_MS", ENV_PREFIX),
            })?;
        }
        Ok(())
    }

    /// Apply `DISHES_MONGO_*` overrides from the process environment
    pub fn with_env_overrides(mut self) -> Result<Self, ConfigError> {
        self.apply_overrides(|name| std::env::var(format!("{}{}", ENV_PREFIX, name)).ok())?;
        Ok(self)
    }
}

impl fmt::Debug for MongoSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MongoSettings")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("database", &self.database)
            .field("username", &self.username)
            .field("password", &"***")
            .field("collection", &self.collection)
            .field("timeout_ms", &self.timeout_ms)
            .finish()
    }
}

/// Top-level configuration file
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DishesConfig {
    pub mongo: MongoSettings,
}

impl DishesConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_string(),
            source,
        })?;
        Self::from_yaml_str(&content)
    }

    /// Load configuration from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(yaml)?;
        Ok(config)
    }

    /// Resolve the startup configuration: optional file, then environment
    pub fn resolve(path: Option<&str>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_yaml_file(path)?,
            None => Self::default(),
        };
        config.mongo = config.mongo.with_env_overrides()?;
        tracing::debug!(mongo = ?config.mongo, "configuration resolved");
        Ok(config)
    }
}
