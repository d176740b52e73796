//! Gateway configuration.
//!
//! Loaded from `<config_dir>/imgate/config.toml`:
//!
//! ```toml
//! [gateway]
//! domain = "gateway.example.org"
//! enabled_transports = ["facebook"]
//!
//! [logging]
//! level = "info"
//!
//! [properties]
//! "gateway.facebook.update_status" = false
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{ImgateError, Result};
use crate::settings::SettingsService;
use crate::transport::{TransportRegistry, TransportType};

const CONFIG_DIR_NAME: &str = "imgate";
const CONFIG_FILE_NAME: &str = "config.toml";

#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
pub struct GatewayConfig {
    #[serde(default)]
    pub gateway: GatewaySettings,
    #[serde(default)]
    pub logging: LoggingSettings,
    /// Free-form operator properties, looked up by dotted key
    #[serde(default)]
    pub properties: BTreeMap<String, toml::Value>,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct GatewaySettings {
    /// Domain the gateway's contact addresses live on
    pub domain: String,
    /// Symbolic names of the transports to serve
    #[serde(default)]
    pub enabled_transports: Vec<String>,
}

impl Default for GatewaySettings {
    fn default() -> Self {
        Self {
            domain: "localhost".to_string(),
            enabled_transports: Vec::new(),
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct LoggingSettings {
    /// Default tracing filter, overridden by `RUST_LOG`
    pub level: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl GatewayConfig {
    /// Default config file location, if the platform has a config directory.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
    }

    /// Parses a configuration document. Blank input yields the defaults.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(toml::from_str(content)?)
    }

    /// Loads configuration from `path`.
    ///
    /// A missing file yields the defaults; a file that exists but cannot be
    /// read or parsed is an error.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!("No config file at {:?}, using defaults", path);
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Loads from [`default_path`](Self::default_path), or defaults.
    pub fn load_default() -> Result<Self> {
        match Self::default_path() {
            Some(path) => Self::load_from_path(&path),
            None => Ok(Self::default()),
        }
    }

    /// Writes the configuration to `path`, creating parent directories.
    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Resolves `enabled_transports` against the registry.
    ///
    /// # Errors
    ///
    /// Fails with `UnknownTransport` on the first name outside the registry.
    pub fn enabled_transports(&self) -> Result<Vec<TransportType>> {
        let registry = TransportRegistry::global();
        self.gateway
            .enabled_transports
            .iter()
            .map(|name| registry.lookup(name).map(|d| d.transport))
            .collect()
    }

    /// Checks the whole document for mistakes that would only show at runtime.
    pub fn validate(&self) -> Result<()> {
        if self.gateway.domain.trim().is_empty() {
            return Err(ImgateError::config("gateway.domain must not be empty"));
        }
        self.enabled_transports()?;
        Ok(())
    }
}

impl SettingsService for GatewayConfig {
    fn bool_property(&self, key: &str, default: bool) -> bool {
        match self.properties.get(key) {
            None => default,
            Some(toml::Value::Boolean(value)) => *value,
            Some(toml::Value::String(value)) => match value.trim() {
                v if v.eq_ignore_ascii_case("true") => true,
                v if v.eq_ignore_ascii_case("false") => false,
                _ => {
                    tracing::warn!("Property '{}' is not a boolean: {:?}", key, value);
                    default
                }
            },
            Some(other) => {
                tracing::warn!("Property '{}' is not a boolean: {}", key, other);
                default
            }
        }
    }
}
