//! Domain types for planet generation
//!
//! - [`FeatureTags`] - categorical tags extracted from a user's description
//! - [`PlanetParameters`] - physical parameters derived from the tags

mod params;
mod tags;

pub use params::PlanetParameters;
pub use tags::{FeatureTags, PlanetType, RawFeatureTags, Size, Temperature};
