//! Parameter estimation
//!
//! Turns categorical [`FeatureTags`](crate::domain::FeatureTags) into physical
//! parameters by sampling quantile bands of the reference dataset and applying
//! simple Newtonian relations.

pub mod constants;
mod estimator;
mod sampler;

pub use estimator::{
    Estimator, HabitableZone, orbital_distance_au, planet_radius_m, round2, solar_luminosity, surface_gravity_g,
};
pub use sampler::{MidpointSampler, RngSampler, SamplerSource, UniformSampler};
