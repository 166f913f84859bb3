//! Tag-to-physics derivation

use std::f64::consts::PI;

use exodata::{MASS_COLUMN, PERIOD_COLUMN, QuantileBand, ReferenceDataset};
use tracing::{debug, info};

use super::constants::*;
use super::sampler::UniformSampler;
use crate::domain::{FeatureTags, PlanetParameters};
use crate::error::PlanetError;

/// Habitable zone boundaries (AU)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HabitableZone {
    pub inner_edge: f64,
    pub outer_edge: f64,
}

impl HabitableZone {
    pub fn from_luminosity(luminosity: f64) -> Self {
        Self {
            inner_edge: (luminosity / HZ_INNER_FLUX).sqrt(),
            outer_edge: (luminosity / HZ_OUTER_FLUX).sqrt(),
        }
    }

    /// Zone around the fixed solar-like host star
    pub fn solar() -> Self {
        Self::from_luminosity(solar_luminosity())
    }

    /// Whether `distance_au` lies inside the zone, edges included
    pub fn contains(&self, distance_au: f64) -> bool {
        (self.inner_edge..=self.outer_edge).contains(&distance_au)
    }
}

/// Luminosity of the host star in solar units, L = R²·(T/T☉)⁴
pub fn solar_luminosity() -> f64 {
    STAR_RADIUS_SOLAR.powi(2) * (STAR_TEMPERATURE_K / SUN_TEMPERATURE_K).powi(4)
}

/// Radius in meters, scaling Earth's radius with the cube root of the mass
pub fn planet_radius_m(mass_earth_masses: f64) -> f64 {
    EARTH_RADIUS_M * mass_earth_masses.cbrt()
}

/// Surface gravity in units of Earth gravity
pub fn surface_gravity_g(mass_earth_masses: f64) -> f64 {
    let mass_kg = mass_earth_masses * EARTH_MASS_KG;
    let radius = planet_radius_m(mass_earth_masses);
    G * mass_kg / radius.powi(2) / EARTH_GRAVITY
}

/// Orbital distance in AU from the sampled period
///
/// Uses the planet's own mass as the central-body mass and takes the square
/// root of `G·M·T²/(4π²)`, the relation the reference model was built with.
pub fn orbital_distance_au(mass_earth_masses: f64, period_days: f64) -> f64 {
    let mass_kg = mass_earth_masses * EARTH_MASS_KG;
    let period_s = period_days * SECONDS_PER_DAY;
    let distance_m = (G * mass_kg * period_s.powi(2) / (4.0 * PI.powi(2))).sqrt();
    distance_m / AU_M
}

/// Round to two decimal places
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Derives [`PlanetParameters`] from tags and a reference dataset
#[derive(Debug, Clone)]
pub struct Estimator {
    mass_column: String,
    period_column: String,
}

impl Default for Estimator {
    fn default() -> Self {
        Self::new(MASS_COLUMN, PERIOD_COLUMN)
    }
}

impl Estimator {
    /// Create an estimator reading the given mass (Earth masses) and period (days) columns
    pub fn new(mass_column: impl Into<String>, period_column: impl Into<String>) -> Self {
        Self {
            mass_column: mass_column.into(),
            period_column: period_column.into(),
        }
    }

    pub fn mass_column(&self) -> &str {
        &self.mass_column
    }

    pub fn period_column(&self) -> &str {
        &self.period_column
    }

    /// Sample a mass and a period inside the size's quantile band and derive the rest
    ///
    /// The two `sampler` draws are the only randomness. Quantiles are computed
    /// on every call.
    pub fn estimate(
        &self,
        tags: &FeatureTags,
        dataset: &dyn ReferenceDataset,
        sampler: &mut dyn UniformSampler,
    ) -> Result<PlanetParameters, PlanetError> {
        debug!(?tags, "Estimator::estimate: called");
        let (lo, hi) = tags.size.quantile_band();
        let band = QuantileBand::new(lo, hi)?;

        let (mass_lo, mass_hi) = dataset.quantile_range(&self.mass_column, band)?;
        let (period_lo, period_hi) = dataset.quantile_range(&self.period_column, band)?;
        debug!(
            %mass_lo, %mass_hi, %period_lo, %period_hi,
            "Estimator::estimate: quantile ranges"
        );

        let mass_earth_masses = sampler.uniform(mass_lo, mass_hi);
        let period_days = sampler.uniform(period_lo, period_hi);

        // Zero or negative cells cannot give a physical planet
        if mass_earth_masses <= 0.0 {
            debug!(%mass_earth_masses, "Estimator::estimate: non-positive mass sample");
            return Err(PlanetError::EmptyDataset(self.mass_column.clone()));
        }
        if period_days <= 0.0 {
            debug!(%period_days, "Estimator::estimate: non-positive period sample");
            return Err(PlanetError::EmptyDataset(self.period_column.clone()));
        }

        let gravity_g = surface_gravity_g(mass_earth_masses);
        let orbital_period_years = period_days / DAYS_PER_YEAR;
        let orbital_distance_au = orbital_distance_au(mass_earth_masses, period_days);
        let habitable = HabitableZone::solar().contains(orbital_distance_au);

        info!(
            size = %tags.size,
            mass_earth_masses,
            period_days,
            orbital_distance_au,
            habitable,
            "Estimated planet parameters"
        );

        Ok(PlanetParameters {
            size: tags.size,
            planet_type: tags.planet_type,
            color: tags.color.clone(),
            temperature_band: tags.temperature.band().to_string(),
            mass_earth_masses: round2(mass_earth_masses),
            gravity_g: round2(gravity_g),
            orbital_period_years: round2(orbital_period_years),
            orbital_distance_au: round2(orbital_distance_au),
            habitable,
            additional_features: Vec::new(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{PlanetType, Size, Temperature};
    use crate::physics::{MidpointSampler, RngSampler};
    use approx::assert_abs_diff_eq;
    use exodata::ExoplanetTable;
    use proptest::prelude::*;

    /// Quantile [0.75, 1.0] gives mass [8, 12] and period [400, 800]
    fn reference_table() -> ExoplanetTable {
        ExoplanetTable::from_columns([
            (MASS_COLUMN, vec![0.5, 2.0, 4.0, 8.0, 12.0]),
            (PERIOD_COLUMN, vec![3.0, 50.0, 200.0, 400.0, 800.0]),
        ])
    }

    fn tags(size: Size) -> FeatureTags {
        FeatureTags::new(size, Temperature::Cold, PlanetType::Icy, "blue")
    }

    #[test]
    fn test_habitable_zone_edges() {
        let zone = HabitableZone::solar();
        assert_abs_diff_eq!(zone.inner_edge, 0.954, epsilon = 1e-3);
        assert_abs_diff_eq!(zone.outer_edge, 1.375, epsilon = 1e-3);
        assert!(zone.contains(1.0));
        assert!(zone.contains(zone.inner_edge));
        assert!(zone.contains(zone.outer_edge));
        assert!(!zone.contains(0.9));
        assert!(!zone.contains(1.4));
    }

    #[test]
    fn test_earth_gravity_is_about_one() {
        assert_abs_diff_eq!(surface_gravity_g(1.0), 1.0, epsilon = 0.01);
        assert_abs_diff_eq!(planet_radius_m(1.0), EARTH_RADIUS_M, epsilon = 1e-6);
        assert_abs_diff_eq!(planet_radius_m(8.0), 2.0 * EARTH_RADIUS_M, epsilon = 1e-3);
    }

    #[test]
    fn test_round2() {
        assert_eq!(round2(1.234), 1.23);
        assert_eq!(round2(1.235_1), 1.24);
        assert_eq!(round2(10.0), 10.0);
    }

    #[test]
    fn test_large_cold_icy_with_midpoint_sampler() {
        let params = Estimator::default()
            .estimate(&tags(Size::Large), &reference_table(), &mut MidpointSampler)
            .unwrap();

        assert_eq!(params.mass_earth_masses, 10.0);
        assert_eq!(params.orbital_period_years, 1.64);
        assert_abs_diff_eq!(params.gravity_g, 2.15, epsilon = 0.02);
        assert_abs_diff_eq!(params.orbital_distance_au, round2(orbital_distance_au(10.0, 600.0)), epsilon = 1e-9);
        assert!(!params.habitable);
        assert_eq!(params.temperature_band, "<250K");
        assert_eq!(params.color, "blue");
        assert!(params.additional_features.is_empty());
    }

    #[test]
    fn test_zero_width_band_is_constant() {
        let table = ExoplanetTable::from_columns([(MASS_COLUMN, vec![3.0]), (PERIOD_COLUMN, vec![365.25])]);
        let params = Estimator::default()
            .estimate(&tags(Size::Small), &table, &mut RngSampler::seeded(1))
            .unwrap();
        assert_eq!(params.mass_earth_masses, 3.0);
        assert_eq!(params.orbital_period_years, 1.0);
    }

    #[test]
    fn test_empty_column_is_empty_dataset() {
        let table = ExoplanetTable::from_columns([(MASS_COLUMN, vec![1.0, 2.0]), (PERIOD_COLUMN, vec![f64::NAN])]);
        let result = Estimator::default().estimate(&tags(Size::Medium), &table, &mut MidpointSampler);
        assert!(matches!(result, Err(PlanetError::EmptyDataset(ref c)) if c == PERIOD_COLUMN));
    }

    #[test]
    fn test_zero_mass_band_is_empty_dataset() {
        let table = ExoplanetTable::from_columns([
            (MASS_COLUMN, vec![0.0, 0.0, 0.0, 0.0, 5.0]),
            (PERIOD_COLUMN, vec![10.0, 20.0, 30.0, 40.0, 50.0]),
        ]);
        let result = Estimator::default().estimate(&tags(Size::Small), &table, &mut MidpointSampler);
        assert!(matches!(result, Err(PlanetError::EmptyDataset(ref c)) if c == MASS_COLUMN));
    }

    #[test]
    fn test_negative_period_band_is_empty_dataset() {
        let table = ExoplanetTable::from_columns([
            (MASS_COLUMN, vec![1.0, 2.0, 3.0, 4.0, 5.0]),
            (PERIOD_COLUMN, vec![-40.0, -30.0, -20.0, -10.0, 50.0]),
        ]);
        let result = Estimator::default().estimate(&tags(Size::Small), &table, &mut MidpointSampler);
        assert!(matches!(result, Err(PlanetError::EmptyDataset(ref c)) if c == PERIOD_COLUMN));
    }

    #[test]
    fn test_missing_column_is_dataset_error() {
        let table = ExoplanetTable::from_columns([(MASS_COLUMN, vec![1.0])]);
        let result = Estimator::default().estimate(&tags(Size::Medium), &table, &mut MidpointSampler);
        assert!(matches!(result, Err(PlanetError::Dataset(_))));
    }

    #[test]
    fn test_custom_columns() {
        let table = ExoplanetTable::from_columns([("mass", vec![2.0]), ("period", vec![100.0])]);
        let params = Estimator::new("mass", "period")
            .estimate(&tags(Size::Large), &table, &mut MidpointSampler)
            .unwrap();
        assert_eq!(params.mass_earth_masses, 2.0);
    }

    proptest! {
        #[test]
        fn prop_samples_fall_inside_quantile_band(seed in any::<u64>(), size_idx in 0usize..3) {
            let size = Size::ALL[size_idx];
            let table = reference_table();
            let (lo, hi) = size.quantile_band();
            let band = QuantileBand::new(lo, hi).unwrap();
            let (mass_lo, mass_hi) = table.quantile_range(MASS_COLUMN, band).unwrap();
            let (period_lo, period_hi) = table.quantile_range(PERIOD_COLUMN, band).unwrap();

            let params = Estimator::default()
                .estimate(&tags(size), &table, &mut RngSampler::seeded(seed))
                .unwrap();

            prop_assert!(params.mass_earth_masses >= round2(mass_lo) - 0.005);
            prop_assert!(params.mass_earth_masses <= round2(mass_hi) + 0.005);

            let period_days = params.orbital_period_years * DAYS_PER_YEAR;
            prop_assert!(period_days >= period_lo - 0.005 * DAYS_PER_YEAR);
            prop_assert!(period_days <= period_hi + 0.005 * DAYS_PER_YEAR);
        }

        #[test]
        fn prop_gravity_matches_stored_mass(seed in any::<u64>(), size_idx in 0usize..3) {
            let params = Estimator::default()
                .estimate(&tags(Size::ALL[size_idx]), &reference_table(), &mut RngSampler::seeded(seed))
                .unwrap();
            // Mass is rounded before re-deriving; gravity ∝ m^(1/3) keeps the drift tiny
            let rederived = round2(surface_gravity_g(params.mass_earth_masses));
            prop_assert!((rederived - params.gravity_g).abs() <= 0.011);
        }
    }
}
