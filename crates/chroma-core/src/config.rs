use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("could not parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("downscale_factor must be a power of two, got {0}")]
    Downscale(u32),

    #[error("min_contour_area_fraction must lie in [0, 1], got {0}")]
    AreaFraction(f64),
}

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub detection: DetectionConfig,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            detection: DetectionConfig::default(),
        }
    }
}

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct DetectionConfig {
    // Per-channel HSV tolerance around the sampled color.
    pub color_radius: [u8; 3],
    // Contours below this fraction of the largest contour's area are dropped.
    pub min_contour_area_fraction: f64,
    // Combined resolution reduction before masking; power of two.
    pub downscale_factor: u32,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        DetectionConfig {
            color_radius: [25, 50, 50],
            min_contour_area_fraction: 0.1,
            downscale_factor: 4,
        }
    }
}

impl DetectionConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.downscale_factor == 0 || !self.downscale_factor.is_power_of_two() {
            return Err(ConfigError::Downscale(self.downscale_factor));
        }
        if !(0.0..=1.0).contains(&self.min_contour_area_fraction) {
            return Err(ConfigError::AreaFraction(self.min_contour_area_fraction));
        }
        Ok(())
    }
}

impl Config {
    // Load config from file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.detection.validate()?;
        Ok(config)
    }

    // Load default config
    pub fn load_default() -> Result<Self, ConfigError> {
        Self::from_file("config/default.toml")
    }
}
