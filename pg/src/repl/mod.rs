//! Interactive REPL for planet design
//!
//! Plain input drives the conversation; slash commands render prompts and
//! images.

mod session;

pub use session::{ChatSession, SlashCommand};

use std::fmt::Write;
use std::sync::Arc;

use colored::Colorize;
use eyre::Result;

use crate::describe::describe;
use crate::domain::PlanetParameters;
use crate::image::ImageGenerator;
use crate::llm::LlmClient;
use crate::session::SessionManager;

/// Run the interactive REPL
///
/// This is the main entry point for `pg chat`.
pub async fn run_interactive(
    manager: SessionManager,
    llm: Option<Arc<dyn LlmClient>>,
    images: Option<Arc<dyn ImageGenerator>>,
) -> Result<()> {
    let mut session = ChatSession::new(manager, llm, images).await?;
    session.run().await
}

/// Human-readable parameter table with the matching qualitative bands
pub fn format_parameters(params: &PlanetParameters) -> String {
    let bands = describe(params);
    let habitable = if params.habitable {
        "yes".bright_green()
    } else {
        "no".red()
    };

    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} {} {} planet, {}",
        "Planet:".bright_cyan(),
        params.size,
        params.planet_type,
        params.color
    );
    let _ = writeln!(out, "  {:12} {}", "temperature", params.temperature_band);
    let _ = writeln!(
        out,
        "  {:12} {:.2} Earth masses ({})",
        "mass", params.mass_earth_masses, bands.mass
    );
    let _ = writeln!(out, "  {:12} {:.2} g ({})", "gravity", params.gravity_g, bands.gravity);
    let _ = writeln!(
        out,
        "  {:12} {:.2} years ({})",
        "period", params.orbital_period_years, bands.orbital_period
    );
    let _ = writeln!(
        out,
        "  {:12} {:.2} AU ({})",
        "distance", params.orbital_distance_au, bands.distance
    );
    let _ = write!(out, "  {:12} {}", "habitable", habitable);
    for addition in &params.additional_features {
        let _ = write!(out, "\n  {:12} {}", "includes", addition);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{PlanetType, Size};

    #[test]
    fn test_format_parameters() {
        colored::control::set_override(false);
        let params = PlanetParameters {
            size: Size::Large,
            planet_type: PlanetType::Icy,
            color: "blue".to_string(),
            temperature_band: "<250K".to_string(),
            mass_earth_masses: 10.0,
            gravity_g: 2.16,
            orbital_period_years: 1.64,
            orbital_distance_au: 3481.9,
            habitable: false,
            additional_features: vec!["a moon".to_string()],
        };

        let text = format_parameters(&params);
        assert!(text.starts_with("Planet: large icy planet, blue"));
        assert!(text.contains("10.00 Earth masses (much larger than Earth)"));
        assert!(text.contains("3481.90 AU (far from its star)"));
        assert!(text.contains("habitable    no"));
        assert!(text.ends_with("includes     a moon"));
    }
}
