//! Synthetic reading generator for seeding dashboards and tests.
//!
//! Simulation parameters are an explicit, immutable [`GeneratorConfig`]
//! passed into [`generate_readings`] together with the caller's RNG. There
//! is no process-wide state, and a seeded RNG makes runs reproducible.

use crate::analysis::gdd::DEFAULT_BASE_TEMP;
use crate::store::readings_db::ClimateRow;
use chrono::{Duration, NaiveDate, NaiveTime, Utc};
use rand::Rng;
use rand_distr::{Distribution, Normal, NormalError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GeneratorError {
    #[error("invalid climate profile for '{city}'")]
    InvalidProfile {
        city: String,
        #[source]
        source: NormalError,
    },
}

/// Climate statistics of one simulated city.
#[derive(Debug, Clone)]
pub struct ClimateProfile {
    pub city: String,
    /// Seasonal mean temperature in °C.
    pub temp_mean: f64,
    pub temp_std: f64,
    /// Mean relative humidity in percent.
    pub humidity_mean: f64,
    pub humidity_std: f64,
}

impl ClimateProfile {
    pub fn new(city: &str, temp_mean: f64, temp_std: f64, humidity_mean: f64, humidity_std: f64) -> Self {
        Self {
            city: city.to_string(),
            temp_mean,
            temp_std,
            humidity_mean,
            humidity_std,
        }
    }
}

/// Immutable configuration of one generation run.
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    pub profiles: Vec<ClimateProfile>,
    /// First simulated day.
    pub start: NaiveDate,
    pub days: u32,
    pub readings_per_day: u32,
    /// Base temperature used for the per-day GDD attached to each row.
    pub base_temp: f64,
}

impl Default for GeneratorConfig {
    /// Thirty days of hourly readings for a handful of French cities,
    /// ending today.
    fn default() -> Self {
        Self {
            profiles: default_profiles(),
            start: Utc::now().date_naive() - Duration::days(30),
            days: 30,
            readings_per_day: 24,
            base_temp: DEFAULT_BASE_TEMP,
        }
    }
}

fn default_profiles() -> Vec<ClimateProfile> {
    ["Paris", "Lyon", "Marseille", "Bordeaux", "Lille", "Strasbourg"]
        .iter()
        .map(|city| ClimateProfile::new(city, 20.0, 5.0, 65.0, 15.0))
        .collect()
}

/// Generates simulated readings, one batch of rows per city and day.
///
/// Temperatures follow a diurnal curve (cool nights, warm afternoons)
/// around a per-run city baseline, with gaussian noise on top; humidity is
/// gaussian, clamped to 0–100 %. Each row carries the day's GDD computed
/// from the simulated extremes, so the output can be stored directly.
pub fn generate_readings(
    config: &GeneratorConfig,
    rng: &mut impl Rng,
) -> Result<Vec<ClimateRow>, GeneratorError> {
    let mut rows = Vec::new();
    for profile in &config.profiles {
        let noise = Normal::new(0.0, profile.temp_std.max(0.0) * 0.3).map_err(|source| {
            GeneratorError::InvalidProfile {
                city: profile.city.clone(),
                source,
            }
        })?;
        let humidity = Normal::new(profile.humidity_mean, profile.humidity_std.max(0.0)).map_err(
            |source| GeneratorError::InvalidProfile {
                city: profile.city.clone(),
                source,
            },
        )?;
        let city_baseline = profile.temp_mean + rng.gen_range(-3.0..3.0);

        for day_index in 0..config.days {
            let date = config.start + Duration::days(i64::from(day_index));
            let mut day_rows = Vec::new();
            let mut temp_min = f64::INFINITY;
            let mut temp_max = f64::NEG_INFINITY;

            for slot in 0..config.readings_per_day {
                let hour = slot * 24 / config.readings_per_day;
                let Some(time) = NaiveTime::from_hms_opt(hour, 0, 0) else {
                    continue;
                };
                let temperature = round1(city_baseline + diurnal_offset(hour) + noise.sample(rng));
                let humidity_pct = round1(humidity.sample(rng).clamp(0.0, 100.0));
                temp_min = temp_min.min(temperature);
                temp_max = temp_max.max(temperature);
                day_rows.push((time, temperature, humidity_pct));
            }
            if day_rows.is_empty() {
                continue;
            }

            let gdd_day = ((temp_min + temp_max) / 2.0 - config.base_temp).max(0.0);
            for (time, temperature, humidity_pct) in day_rows {
                rows.push(ClimateRow {
                    date,
                    time,
                    temperature: Some(temperature),
                    humidity: Some(humidity_pct),
                    gdd: Some(gdd_day),
                    city: profile.city.clone(),
                });
            }
        }
    }
    Ok(rows)
}

/// Diurnal temperature offset: coolest before dawn, warmest in the early
/// afternoon, cooling through the evening.
fn diurnal_offset(hour: u32) -> f64 {
    match hour {
        0..=5 => -2.0,
        6..=9 => -1.0 + f64::from(hour - 6) * 0.5,
        10..=15 => 2.0,
        16..=20 => 2.0 - f64::from(hour - 16) * 0.5,
        _ => -f64::from(hour.saturating_sub(21)) * 0.4,
    }
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
