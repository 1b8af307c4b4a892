use crate::collection::CollectionBindings;
use crate::core::{Result, StoreError};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

const SCHEME: &str = "docstore://";
const DEFAULT_PORT: u16 = 27017;

/// Store connection configuration
///
/// Carries where the store lives and which collection backs each entity kind.
/// Built once at startup, then handed to the store client and to
/// `CollectionBindings`.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Store host
    pub host: String,

    /// Store port
    pub port: u16,

    /// Database name
    pub database: String,

    /// Entity kind -> collection name
    pub collections: HashMap<String, String>,

    /// Per-operation timeout enforced by the store client, if any
    pub operation_timeout: Option<Duration>,
}

/// On-disk layout of a configuration file.
#[derive(Debug, Deserialize)]
struct ConfigFile {
    #[serde(rename = "StoreSettings")]
    store_settings: StoreSettings,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoreSettings {
    default_connection: String,
    database_name: Option<String>,
    #[serde(default)]
    collections: HashMap<String, String>,
    operation_timeout_ms: Option<u64>,
}

impl StoreConfig {
    pub fn new(database: &str) -> Self {
        Self {
            host: "localhost".to_string(),
            port: DEFAULT_PORT,
            database: database.to_string(),
            collections: HashMap::new(),
            operation_timeout: None,
        }
    }

    /// Set the host
    pub fn host(mut self, host: &str) -> Self {
        self.host = host.to_string();
        self
    }

    /// Set the port
    pub fn port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn database(mut self, database: &str) -> Self {
        self.database = database.to_string();
        self
    }

    /// Bind an entity kind to a collection
    pub fn collection(mut self, kind: &str, collection: &str) -> Self {
        self.collections
            .insert(kind.to_string(), collection.to_string());
        self
    }

    pub fn operation_timeout(mut self, timeout: Duration) -> Self {
        self.operation_timeout = Some(timeout);
        self
    }

    /// Parse from connection string
    ///
    /// Format: "docstore://host:port/database"
    pub fn from_url(url: &str) -> Result<Self> {
        let rest = url
            .strip_prefix(SCHEME)
            .ok_or_else(|| StoreError::Config(format!("URL must start with '{}'", SCHEME)))?;

        let (host_port, database) = rest
            .split_once('/')
            .ok_or_else(|| StoreError::Config("Invalid host/database format".to_string()))?;

        if database.is_empty() || database.contains('/') {
            return Err(StoreError::Config("Invalid database name".to_string()));
        }

        let (host, port) = match host_port.split_once(':') {
            Some((host, port)) => (
                host,
                port.parse()
                    .map_err(|_| StoreError::Config(format!("Invalid port '{}'", port)))?,
            ),
            None => (host_port, DEFAULT_PORT),
        };

        if host.is_empty() {
            return Err(StoreError::Config("Host cannot be empty".to_string()));
        }

        Ok(Self::new(database).host(host).port(port))
    }

    /// Convert to connection string
    pub fn to_url(&self) -> String {
        format!("{}{}:{}/{}", SCHEME, self.host, self.port, self.database)
    }

    /// Parse a JSON configuration document:
    ///
    /// ```json
    /// { "StoreSettings": {
    ///     "defaultConnection": "docstore://localhost:27017/shop",
    ///     "databaseName": "shop",
    ///     "collections": { "User": "users", "Product": "products" } } }
    /// ```
    pub fn from_json_str(json: &str) -> Result<Self> {
        let file: ConfigFile = serde_json::from_str(json)
            .map_err(|e| StoreError::Config(format!("invalid configuration: {}", e)))?;
        let settings = file.store_settings;

        let mut config = Self::from_url(&settings.default_connection)?;
        if let Some(database) = settings.database_name {
            config.database = database;
        }
        config.collections = settings.collections;
        config.operation_timeout = settings.operation_timeout_ms.map(Duration::from_millis);

        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.host.is_empty() {
            return Err(StoreError::Config("Host cannot be empty".to_string()));
        }

        if self.database.is_empty() {
            return Err(StoreError::Config("Database name cannot be empty".to_string()));
        }

        if self.operation_timeout == Some(Duration::ZERO) {
            return Err(StoreError::Config("operation_timeout must be > 0".to_string()));
        }

        Ok(())
    }

    /// Collection table as injectable bindings.
    pub fn bindings(&self) -> Result<CollectionBindings> {
        CollectionBindings::from_map(self.collections.clone())
    }
}
