//! Qualitative descriptions of planet parameters
//!
//! Image models tend to paint digits when a prompt contains them, so the
//! prompt only ever sees these bands, never the raw values.

use std::fmt;

use serde::Serialize;

use crate::domain::PlanetParameters;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum MassBand {
    SmallerThanEarth,
    EarthLike,
    MuchLarger,
}

impl MassBand {
    pub fn from_earth_masses(mass: f64) -> Self {
        if mass < 1.0 {
            MassBand::SmallerThanEarth
        } else if mass <= 5.0 {
            MassBand::EarthLike
        } else {
            MassBand::MuchLarger
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            MassBand::SmallerThanEarth => "smaller than Earth",
            MassBand::EarthLike => "similar in mass to Earth",
            MassBand::MuchLarger => "much larger than Earth",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum GravityBand {
    Weaker,
    EarthLike,
    Stronger,
}

impl GravityBand {
    pub fn from_g(gravity: f64) -> Self {
        if gravity < 1.0 {
            GravityBand::Weaker
        } else if gravity <= 1.5 {
            GravityBand::EarthLike
        } else {
            GravityBand::Stronger
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            GravityBand::Weaker => "weaker gravity than Earth",
            GravityBand::EarthLike => "similar to Earth's gravity",
            GravityBand::Stronger => "stronger gravity than Earth",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum OrbitBand {
    Quick,
    Moderate,
    Long,
}

impl OrbitBand {
    pub fn from_years(period_years: f64) -> Self {
        if period_years < 1.0 {
            OrbitBand::Quick
        } else if period_years <= 5.0 {
            OrbitBand::Moderate
        } else {
            OrbitBand::Long
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            OrbitBand::Quick => "a quick orbit",
            OrbitBand::Moderate => "a moderate orbit",
            OrbitBand::Long => "a long orbit",
        }
    }

    /// Label as it reads inside the image prompt
    pub fn prompt_phrase(&self) -> String {
        format!("{} around its star", self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum DistanceBand {
    VeryClose,
    ModeratelyDistant,
    Far,
}

impl DistanceBand {
    pub fn from_au(distance_au: f64) -> Self {
        if distance_au < 1.0 {
            DistanceBand::VeryClose
        } else if distance_au <= 2.0 {
            DistanceBand::ModeratelyDistant
        } else {
            DistanceBand::Far
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            DistanceBand::VeryClose => "very close to its star",
            DistanceBand::ModeratelyDistant => "moderately distant",
            DistanceBand::Far => "far from its star",
        }
    }

    /// Label as it reads inside the image prompt
    pub fn prompt_phrase(&self) -> &'static str {
        match self {
            DistanceBand::ModeratelyDistant => "moderately distant from its star",
            other => other.label(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum HabitabilityBand {
    Habitable,
    Uninhabitable,
}

impl HabitabilityBand {
    pub fn from_habitable(habitable: bool) -> Self {
        if habitable {
            HabitabilityBand::Habitable
        } else {
            HabitabilityBand::Uninhabitable
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            HabitabilityBand::Habitable => "in the habitable zone",
            HabitabilityBand::Uninhabitable => "outside the habitable zone",
        }
    }
}

macro_rules! display_label {
    ($($band:ty),*) => {
        $(impl fmt::Display for $band {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.label())
            }
        })*
    };
}

display_label!(MassBand, GravityBand, OrbitBand, DistanceBand, HabitabilityBand);

/// The five qualitative bands of a planet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DescriptiveBands {
    pub mass: MassBand,
    pub gravity: GravityBand,
    pub orbital_period: OrbitBand,
    pub distance: DistanceBand,
    pub habitability: HabitabilityBand,
}

/// Map numeric parameters to qualitative bands
pub fn describe(params: &PlanetParameters) -> DescriptiveBands {
    DescriptiveBands {
        mass: MassBand::from_earth_masses(params.mass_earth_masses),
        gravity: GravityBand::from_g(params.gravity_g),
        orbital_period: OrbitBand::from_years(params.orbital_period_years),
        distance: DistanceBand::from_au(params.orbital_distance_au),
        habitability: HabitabilityBand::from_habitable(params.habitable),
    }
}
