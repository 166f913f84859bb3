//! Image prompt composition

use serde::Serialize;
use tracing::debug;

use super::PromptLoader;
use crate::describe::DescriptiveBands;
use crate::domain::PlanetParameters;
use crate::error::PlanetError;

/// Variables shared by the `image` and `narrate` templates
#[derive(Debug, Clone, Serialize)]
pub struct ImagePromptContext {
    pub size: String,
    pub planet_type: String,
    pub color: String,
    pub temperature_band: String,
    pub mass: String,
    pub gravity: String,
    pub orbit: String,
    pub distance: String,
    pub habitability: String,
    /// Additions joined with ", ", absent when there are none
    pub additions: Option<String>,
    /// Cleaned additions, one entry each
    pub addition_list: Vec<String>,
}

impl ImagePromptContext {
    pub fn new(params: &PlanetParameters, bands: &DescriptiveBands) -> Self {
        let addition_list: Vec<String> = params
            .additional_features
            .iter()
            .map(|a| clean_addition(a))
            .filter(|a| !a.is_empty())
            .collect();
        let additions = (!addition_list.is_empty()).then(|| addition_list.join(", "));

        Self {
            size: params.size.to_string(),
            planet_type: params.planet_type.to_string(),
            color: params.color.clone(),
            temperature_band: params.temperature_band.clone(),
            mass: bands.mass.to_string(),
            gravity: bands.gravity.to_string(),
            orbit: bands.orbital_period.prompt_phrase(),
            distance: bands.distance.prompt_phrase().to_string(),
            habitability: bands.habitability.to_string(),
            additions,
            addition_list,
        }
    }
}

/// Strip whitespace and trailing periods so joined additions form one sentence
fn clean_addition(addition: &str) -> String {
    addition.trim().trim_end_matches('.').trim_end().to_string()
}

impl PromptLoader {
    /// Render the image prompt for `params`
    pub fn compose(&self, params: &PlanetParameters, bands: &DescriptiveBands) -> Result<String, PlanetError> {
        debug!(additions = params.additional_features.len(), "PromptLoader::compose: called");
        let context = ImagePromptContext::new(params, bands);
        self.render("image", &context)
            .map_err(|e| PlanetError::Prompt(e.to_string()))
    }
}

/// Render the image prompt with the built-in template
pub fn compose(params: &PlanetParameters, bands: &DescriptiveBands) -> Result<String, PlanetError> {
    PromptLoader::embedded_only().compose(params, bands)
}
