//! Categorical feature tags

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::PlanetError;

/// Planet size tag; selects the quantile band of the reference dataset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Size {
    Small,
    Medium,
    Large,
}

impl Size {
    pub const ALL: [Size; 3] = [Size::Small, Size::Medium, Size::Large];

    pub fn as_str(&self) -> &'static str {
        match self {
            Size::Small => "small",
            Size::Medium => "medium",
            Size::Large => "large",
        }
    }

    /// Fractional [lo, hi] band of the dataset distribution for this size
    pub fn quantile_band(&self) -> (f64, f64) {
        match self {
            Size::Small => (0.0, 0.25),
            Size::Medium => (0.25, 0.75),
            Size::Large => (0.75, 1.0),
        }
    }
}

impl FromStr for Size {
    type Err = PlanetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "small" => Ok(Size::Small),
            "medium" => Ok(Size::Medium),
            "large" => Ok(Size::Large),
            _ => {
                debug!(%s, "Size::from_str: unknown tag");
                Err(PlanetError::UnknownSizeTag(s.to_string()))
            }
        }
    }
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Temperature tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Temperature {
    Cold,
    #[default]
    Temperate,
    Hot,
}

impl Temperature {
    pub const ALL: [Temperature; 3] = [Temperature::Cold, Temperature::Temperate, Temperature::Hot];

    pub fn as_str(&self) -> &'static str {
        match self {
            Temperature::Cold => "cold",
            Temperature::Temperate => "temperate",
            Temperature::Hot => "hot",
        }
    }

    /// Approximate surface temperature range shown to the user
    pub fn band(&self) -> &'static str {
        match self {
            Temperature::Cold => "<250K",
            Temperature::Temperate => "250K-350K",
            Temperature::Hot => ">350K",
        }
    }
}

impl FromStr for Temperature {
    type Err = PlanetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "cold" => Ok(Temperature::Cold),
            "temperate" => Ok(Temperature::Temperate),
            "hot" => Ok(Temperature::Hot),
            _ => {
                debug!(%s, "Temperature::from_str: unknown tag");
                Err(PlanetError::UnknownTemperatureTag(s.to_string()))
            }
        }
    }
}

impl fmt::Display for Temperature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Planet composition tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlanetType {
    Rocky,
    Gassy,
    Icy,
}

impl PlanetType {
    pub const ALL: [PlanetType; 3] = [PlanetType::Rocky, PlanetType::Gassy, PlanetType::Icy];

    pub fn as_str(&self) -> &'static str {
        match self {
            PlanetType::Rocky => "rocky",
            PlanetType::Gassy => "gassy",
            PlanetType::Icy => "icy",
        }
    }
}

impl FromStr for PlanetType {
    type Err = PlanetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "rocky" => Ok(PlanetType::Rocky),
            "gassy" => Ok(PlanetType::Gassy),
            "icy" => Ok(PlanetType::Icy),
            _ => {
                debug!(%s, "PlanetType::from_str: unknown tag");
                Err(PlanetError::UnknownTypeTag(s.to_string()))
            }
        }
    }
}

impl fmt::Display for PlanetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The four tags describing a requested planet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureTags {
    pub size: Size,
    pub temperature: Temperature,
    #[serde(rename = "type")]
    pub planet_type: PlanetType,
    pub color: String,
}

impl FeatureTags {
    pub fn new(size: Size, temperature: Temperature, planet_type: PlanetType, color: impl Into<String>) -> Self {
        Self {
            size,
            temperature,
            planet_type,
            color: normalize_color(color.into()),
        }
    }
}

/// Classifier output before tag validation
///
/// Field names follow the structured-output schema sent to the model.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawFeatureTags {
    pub planet_size: String,
    #[serde(default)]
    pub temperature: Option<String>,
    #[serde(rename = "type")]
    pub planet_type: String,
    #[serde(default)]
    pub color: String,
}

impl TryFrom<RawFeatureTags> for FeatureTags {
    type Error = PlanetError;

    fn try_from(raw: RawFeatureTags) -> Result<Self, Self::Error> {
        debug!(?raw, "FeatureTags::try_from: called");
        let temperature = match raw.temperature.as_deref() {
            Some(t) => t.parse()?,
            None => Temperature::default(),
        };
        Ok(Self {
            size: raw.planet_size.parse()?,
            temperature,
            planet_type: raw.planet_type.parse()?,
            color: normalize_color(raw.color),
        })
    }
}

fn normalize_color(color: String) -> String {
    let trimmed = color.trim();
    if trimmed.is_empty() {
        "unknown".to_string()
    } else {
        trimmed.to_string()
    }
}
