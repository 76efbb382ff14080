//! INI configuration file.
//!
//! Configuration lives in `~/.geofix/config.ini`. Missing files and missing
//! keys fall back to defaults; present-but-malformed values are errors.
//!
//! ```ini
//! [location]
//! high_accuracy = true
//! timeout_ms = 15000
//! maximum_age_ms = 300000
//!
//! [fixed_position]
//! latitude = 51.5074
//! longitude = -0.1278
//! accuracy = 25
//! latency_ms = 0
//! ```

use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use ini::{Ini, Properties};
use thiserror::Error;

use crate::location::{
    FixedPositionProvider, PositionOptions, PositionProvider, DEFAULT_MAXIMUM_AGE,
    DEFAULT_TIMEOUT,
};

const LOCATION_SECTION: &str = "location";
const FIXED_SECTION: &str = "fixed_position";

/// Errors that can occur while loading or saving configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O error reading or writing the file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The file is not valid INI.
    #[error("Failed to parse config: {0}")]
    Parse(String),

    /// A key holds a value of the wrong shape.
    #[error("Invalid value for {section}.{key}: '{value}'")]
    InvalidValue {
        section: String,
        key: String,
        value: String,
    },

    /// The home directory could not be determined.
    #[error("Could not determine home directory")]
    NoHomeDir,
}

/// Settings for platform position requests.
#[derive(Debug, Clone, PartialEq)]
pub struct LocationSettings {
    pub high_accuracy: bool,
    pub timeout_ms: u64,
    pub maximum_age_ms: u64,
}

impl Default for LocationSettings {
    fn default() -> Self {
        Self {
            high_accuracy: true,
            timeout_ms: DEFAULT_TIMEOUT.as_millis() as u64,
            maximum_age_ms: DEFAULT_MAXIMUM_AGE.as_millis() as u64,
        }
    }
}

/// A configured stand-in position for hosts without positioning hardware.
#[derive(Debug, Clone, PartialEq)]
pub struct FixedPositionSettings {
    pub latitude: f64,
    pub longitude: f64,
    pub accuracy: Option<f64>,
    pub latency_ms: u64,
}

/// Contents of the configuration file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigFile {
    pub location: LocationSettings,
    pub fixed_position: Option<FixedPositionSettings>,
}

/// Default configuration file path (`~/.geofix/config.ini`).
pub fn config_file_path() -> Result<PathBuf, ConfigError> {
    dirs::home_dir()
        .map(|home| home.join(".geofix").join("config.ini"))
        .ok_or(ConfigError::NoHomeDir)
}

impl ConfigFile {
    /// Load from the default path, or defaults if the file does not exist.
    pub fn load() -> Result<Self, ConfigError> {
        let path = config_file_path()?;
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::load_from(&path)
    }

    /// Load from a specific file.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse INI text.
    pub fn parse(contents: &str) -> Result<Self, ConfigError> {
        let ini = Ini::load_from_str(contents).map_err(|e| ConfigError::Parse(e.to_string()))?;

        let mut config = Self::default();

        if let Some(section) = ini.section(Some(LOCATION_SECTION)) {
            let location = &mut config.location;
            if let Some(v) = parse_key(section, LOCATION_SECTION, "high_accuracy")? {
                location.high_accuracy = v;
            }
            if let Some(v) = parse_key(section, LOCATION_SECTION, "timeout_ms")? {
                location.timeout_ms = v;
            }
            if let Some(v) = parse_key(section, LOCATION_SECTION, "maximum_age_ms")? {
                location.maximum_age_ms = v;
            }
        }

        if let Some(section) = ini.section(Some(FIXED_SECTION)) {
            let latitude: Option<f64> = parse_key(section, FIXED_SECTION, "latitude")?;
            let longitude: Option<f64> = parse_key(section, FIXED_SECTION, "longitude")?;

            // Both coordinates or nothing; a half-configured position is ignored.
            if let (Some(latitude), Some(longitude)) = (latitude, longitude) {
                check_range(latitude, -90.0, 90.0, "latitude")?;
                check_range(longitude, -180.0, 180.0, "longitude")?;

                config.fixed_position = Some(FixedPositionSettings {
                    latitude,
                    longitude,
                    accuracy: parse_key(section, FIXED_SECTION, "accuracy")?,
                    latency_ms: parse_key(section, FIXED_SECTION, "latency_ms")?.unwrap_or(0),
                });
            }
        }

        Ok(config)
    }

    /// Write to a specific file, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        self.to_ini().write_to_file(path)?;
        Ok(())
    }

    /// Render as INI text.
    pub fn to_ini_string(&self) -> String {
        let mut buf = Vec::new();
        // Writing to a Vec cannot fail.
        let _ = self.to_ini().write_to(&mut buf);
        String::from_utf8_lossy(&buf).into_owned()
    }

    fn to_ini(&self) -> Ini {
        let mut ini = Ini::new();
        ini.with_section(Some(LOCATION_SECTION))
            .set("high_accuracy", self.location.high_accuracy.to_string())
            .set("timeout_ms", self.location.timeout_ms.to_string())
            .set("maximum_age_ms", self.location.maximum_age_ms.to_string());

        if let Some(fixed) = &self.fixed_position {
            ini.with_section(Some(FIXED_SECTION))
                .set("latitude", fixed.latitude.to_string())
                .set("longitude", fixed.longitude.to_string())
                .set("latency_ms", fixed.latency_ms.to_string());
            if let Some(accuracy) = fixed.accuracy {
                ini.with_section(Some(FIXED_SECTION))
                    .set("accuracy", accuracy.to_string());
            }
        }
        ini
    }

    /// Request options derived from the `[location]` section.
    pub fn position_options(&self) -> PositionOptions {
        PositionOptions {
            high_accuracy: self.location.high_accuracy,
            timeout: Duration::from_millis(self.location.timeout_ms),
            maximum_age: Duration::from_millis(self.location.maximum_age_ms),
        }
    }

    /// Positioning capability described by the `[fixed_position]` section.
    ///
    /// `None` means the host has no positioning capability.
    pub fn position_provider(&self) -> Option<Arc<dyn PositionProvider>> {
        self.fixed_position.as_ref().map(|fixed| {
            let mut provider = FixedPositionProvider::new(fixed.latitude, fixed.longitude)
                .with_latency(Duration::from_millis(fixed.latency_ms));
            if let Some(accuracy) = fixed.accuracy {
                provider = provider.with_accuracy(accuracy);
            }
            Arc::new(provider) as Arc<dyn PositionProvider>
        })
    }
}

fn parse_key<T: FromStr>(
    section: &Properties,
    section_name: &str,
    key: &str,
) -> Result<Option<T>, ConfigError> {
    match section.get(key).map(str::trim) {
        None | Some("") => Ok(None),
        Some(raw) => raw
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidValue {
                section: section_name.to_string(),
                key: key.to_string(),
                value: raw.to_string(),
            }),
    }
}

fn check_range(value: f64, min: f64, max: f64, key: &str) -> Result<(), ConfigError> {
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::InvalidValue {
            section: FIXED_SECTION.to_string(),
            key: key.to_string(),
            value: value.to_string(),
        })
    }
}
