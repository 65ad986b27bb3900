//! TOML-based explorer configuration.

use std::fmt;
use std::fs;
use std::net::IpAddr;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::Deserialize;

use crate::loader::SampleNetwork;
use crate::shape::color::{BrightnessBand, CarrierPalette, Rgb};

/// Top-level configuration parsed from TOML.
///
/// Every section is optional and falls back to its defaults. Load with
/// [`ExplorerConfig::from_toml_file`] or start from
/// [`ExplorerConfig::default`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExplorerConfig {
    /// Default network source.
    #[serde(default)]
    pub load: LoadConfig,
    /// Text report settings.
    #[serde(default)]
    pub display: DisplayConfig,
    /// Carrier palette settings.
    #[serde(default)]
    pub colors: ColorConfig,
    /// HTTP API settings.
    #[serde(default)]
    pub api: ApiConfig,
    /// Log filter.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Network loaded when the command line names none.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoadConfig {
    /// Sample identifier, e.g. `"scigrid_de"`.
    pub sample: String,
    /// A csv folder or JSON archive; wins over `sample` when set.
    pub path: Option<PathBuf>,
}

impl Default for LoadConfig {
    fn default() -> Self {
        Self {
            sample: SampleNetwork::AcDcMeshed.name().to_string(),
            path: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DisplayConfig {
    /// Rows printed per table or series (must be > 0).
    pub max_rows: usize,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self { max_rows: 20 }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColorConfig {
    /// Lowest channel value of generated colors.
    pub min_channel: u8,
    /// Highest channel value of generated colors.
    pub max_channel: u8,
    /// Carrier → `#rrggbb` overrides.
    pub palette: IndexMap<String, String>,
}

impl Default for ColorConfig {
    fn default() -> Self {
        let band = BrightnessBand::default();
        Self {
            min_channel: band.min,
            max_channel: band.max,
            palette: IndexMap::new(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ApiConfig {
    /// Address to bind.
    pub bind: String,
    /// TCP port.
    pub port: u16,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1".to_string(),
            port: 8501,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    /// `tracing-subscriber` filter directive; `RUST_LOG` overrides it.
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
        }
    }
}

/// Configuration error with field path and constraint description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError {
    /// Dotted field path (e.g., `"display.max_rows"`).
    pub field: String,
    /// Human-readable constraint description.
    pub message: String,
}

impl ConfigError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "config error: {}: {}", self.field, self.message)
    }
}

impl std::error::Error for ConfigError {}

impl ExplorerConfig {
    /// Parses a configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read or the TOML is invalid.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| {
            ConfigError::new("config", format!("cannot read \"{}\": {e}", path.display()))
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses a configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the TOML is invalid or contains unknown fields.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError::new("toml", e.to_string()))
    }

    /// Validates all fields and returns a list of errors.
    ///
    /// Returns an empty vector if configuration is valid.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        if self.load.path.is_none() {
            if let Err(e) = self.sample() {
                errors.push(e);
            }
        }
        if self.display.max_rows == 0 {
            errors.push(ConfigError::new("display.max_rows", "must be > 0"));
        }

        let colors = &self.colors;
        if colors.min_channel > colors.max_channel {
            errors.push(ConfigError::new(
                "colors.min_channel",
                "must be <= colors.max_channel",
            ));
        }
        for (carrier, hex) in &colors.palette {
            if let Err(message) = hex.parse::<Rgb>() {
                errors.push(ConfigError::new(format!("colors.palette.{carrier}"), message));
            }
        }

        if self.api.bind.parse::<IpAddr>().is_err() {
            errors.push(ConfigError::new(
                "api.bind",
                format!("must be an IP address, got \"{}\"", self.api.bind),
            ));
        }
        if self.api.port == 0 {
            errors.push(ConfigError::new("api.port", "must be > 0"));
        }
        if self.logging.filter.trim().is_empty() {
            errors.push(ConfigError::new("logging.filter", "must not be empty"));
        }

        errors
    }

    /// The configured default sample.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` naming the available samples when unknown.
    pub fn sample(&self) -> Result<SampleNetwork, ConfigError> {
        self.load
            .sample
            .parse()
            .map_err(|e: crate::loader::LoadError| ConfigError::new("load.sample", e.to_string()))
    }

    /// Builds the carrier palette: brightness band plus overrides.
    ///
    /// Overrides that do not parse are skipped; [`ExplorerConfig::validate`]
    /// reports them.
    pub fn palette(&self) -> CarrierPalette {
        let band = BrightnessBand {
            min: self.colors.min_channel,
            max: self.colors.max_channel,
        };
        self.colors
            .palette
            .iter()
            .filter_map(|(carrier, hex)| Some((carrier, hex.parse::<Rgb>().ok()?)))
            .fold(CarrierPalette::new(band), |palette, (carrier, color)| {
                palette.with_override(carrier, color)
            })
    }
}
