//! Derived planetary parameters

use serde::{Deserialize, Serialize};

use super::{PlanetType, Size};

/// Physical parameters of a generated planet
///
/// All numeric fields come from a single sampled mass and a single sampled
/// period and are rounded to two decimals. `additional_features` only grows
/// while a conversation is active.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanetParameters {
    pub size: Size,
    #[serde(rename = "type")]
    pub planet_type: PlanetType,
    pub color: String,
    /// Display string such as `<250K`
    pub temperature_band: String,
    pub mass_earth_masses: f64,
    pub gravity_g: f64,
    pub orbital_period_years: f64,
    pub orbital_distance_au: f64,
    pub habitable: bool,
    #[serde(default)]
    pub additional_features: Vec<String>,
}
