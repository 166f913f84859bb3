/// Gravitational constant (m³/(kg·s²))
pub const G: f64 = 6.67430e-11;

/// Earth mass (kg)
pub const EARTH_MASS_KG: f64 = 5.972e24;

/// Earth radius (m)
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Earth surface gravity (m/s²)
pub const EARTH_GRAVITY: f64 = 9.807;

/// Astronomical unit (m)
pub const AU_M: f64 = 149.6e9;

/// Days per Julian year
pub const DAYS_PER_YEAR: f64 = 365.25;

/// Seconds per day
pub const SECONDS_PER_DAY: f64 = 86_400.0;

/// Host star radius (solar radii)
pub const STAR_RADIUS_SOLAR: f64 = 1.0;

/// Host star effective temperature (K)
pub const STAR_TEMPERATURE_K: f64 = 5780.0;

/// Solar effective temperature used as the luminosity reference (K)
pub const SUN_TEMPERATURE_K: f64 = 5778.0;

/// Stellar flux at the inner habitable-zone edge (solar units)
pub const HZ_INNER_FLUX: f64 = 1.1;

/// Stellar flux at the outer habitable-zone edge (solar units)
pub const HZ_OUTER_FLUX: f64 = 0.53;
