//! Rain process.
//!
//! Each step draws one roll against the rain probability. A dry plot that
//! rolls under it starts raining: the caller receives a one-time water pulse
//! and the end of the shower is scheduled. Showers end either after a number
//! of steps or, opt-in, after a wall-clock delay.

use canopy_common::{SimError, SimResult};
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tracing::debug;

/// How long a shower lasts once it starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum RainDuration {
    /// End after this many steps.
    Ticks {
        /// Steps the shower lasts
        count: u32,
    },
    /// End once this much real time has passed.
    WallClock {
        /// Milliseconds the shower lasts
        millis: u64,
    },
}

impl Default for RainDuration {
    fn default() -> Self {
        Self::Ticks { count: 10 }
    }
}

/// Parameters of the rain process.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeatherConfig {
    /// Chance per step that a dry plot starts raining.
    pub rain_probability: f64,
    /// Smallest water pulse added when rain starts.
    pub pulse_min: f64,
    /// Largest water pulse added when rain starts.
    pub pulse_max: f64,
    /// Shower length.
    pub duration: RainDuration,
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            rain_probability: 0.15,
            pulse_min: 20.0,
            pulse_max: 40.0,
            duration: RainDuration::default(),
        }
    }
}

impl WeatherConfig {
    /// Check the parameters against their accepted ranges.
    pub fn validate(&self) -> SimResult<()> {
        if !(0.0..=1.0).contains(&self.rain_probability) {
            return Err(SimError::invalid(
                "weather.rain_probability",
                format!("{} is outside [0, 1]", self.rain_probability),
            ));
        }
        if !((0.0..=self.pulse_max).contains(&self.pulse_min) && self.pulse_max.is_finite()) {
            return Err(SimError::invalid(
                "weather.pulse",
                format!("[{}, {}] is not a valid range", self.pulse_min, self.pulse_max),
            ));
        }
        if self.duration == (RainDuration::Ticks { count: 0 }) {
            return Err(SimError::invalid(
                "weather.duration",
                "a shower must last at least one step",
            ));
        }
        Ok(())
    }
}

/// Scheduled end of the current shower.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RainEnd {
    AtStep(u64),
    At(Instant),
}

/// Rain state of the plot.
#[derive(Debug, Clone)]
pub struct Weather {
    config: WeatherConfig,
    raining: bool,
    rain_end: Option<RainEnd>,
    shower_count: u32,
}

impl Weather {
    /// Create a dry plot.
    #[must_use]
    pub fn new(config: WeatherConfig) -> Self {
        Self {
            config,
            raining: false,
            rain_end: None,
            shower_count: 0,
        }
    }

    /// Whether it is raining.
    #[must_use]
    pub fn is_raining(&self) -> bool {
        self.raining
    }

    /// Number of showers started so far.
    #[must_use]
    pub fn shower_count(&self) -> u32 {
        self.shower_count
    }

    /// Update for step number `step`. Returns the water pulse to add to
    /// every cell when a shower starts.
    ///
    /// Exactly one roll is drawn from `rng` per call whether or not it is
    /// raining, plus one more for the pulse size when a shower starts. A
    /// shower may start and end in the same call; the pulse still applies.
    pub fn update(&mut self, step: u64, rng: &mut fastrand::Rng) -> Option<f64> {
        let roll = rng.f64();
        let mut pulse = None;

        if roll < self.config.rain_probability && !self.raining {
            let amount =
                self.config.pulse_min + rng.f64() * (self.config.pulse_max - self.config.pulse_min);
            self.raining = true;
            self.shower_count += 1;
            self.rain_end = Some(match self.config.duration {
                RainDuration::Ticks { count } => RainEnd::AtStep(step + u64::from(count)),
                RainDuration::WallClock { millis } => {
                    RainEnd::At(Instant::now() + Duration::from_millis(millis))
                },
            });
            debug!(step, pulse = amount, "Rain started");
            pulse = Some(amount);
        }

        if self.raining && self.rain_end.is_some_and(|end| end_passed(end, step)) {
            self.raining = false;
            self.rain_end = None;
            debug!(step, "Rain stopped");
        }

        pulse
    }
}

fn end_passed(end: RainEnd, step: u64) -> bool {
    match end {
        RainEnd::AtStep(end_step) => step >= end_step,
        RainEnd::At(deadline) => Instant::now() > deadline,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn always_rain(count: u32) -> WeatherConfig {
        WeatherConfig {
            rain_probability: 1.0,
            duration: RainDuration::Ticks { count },
            ..WeatherConfig::default()
        }
    }

    #[test]
    fn test_default_config_valid() {
        assert!(WeatherConfig::default().validate().is_ok());
    }

    #[test]
    fn test_invalid_configs_rejected() {
        let bad_probability = WeatherConfig {
            rain_probability: 1.5,
            ..WeatherConfig::default()
        };
        assert!(bad_probability.validate().is_err());

        let inverted = WeatherConfig {
            pulse_min: 50.0,
            pulse_max: 10.0,
            ..WeatherConfig::default()
        };
        assert!(inverted.validate().is_err());

        assert!(always_rain(0).validate().is_err());
    }

    #[test]
    fn test_nan_pulse_bounds_rejected() {
        let nan_min = WeatherConfig {
            pulse_min: f64::NAN,
            ..always_rain(10)
        };
        assert!(matches!(
            nan_min.validate(),
            Err(SimError::InvalidParameter { ref name, .. }) if name == "weather.pulse"
        ));

        let nan_max = WeatherConfig {
            pulse_max: f64::NAN,
            ..always_rain(10)
        };
        assert!(nan_max.validate().is_err());

        let endless = WeatherConfig {
            pulse_max: f64::INFINITY,
            ..always_rain(10)
        };
        assert!(endless.validate().is_err());
    }

    #[test]
    fn test_nan_probability_rejected() {
        let config = WeatherConfig {
            rain_probability: f64::NAN,
            ..WeatherConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_never_rains_at_zero_probability() {
        let mut weather = Weather::new(WeatherConfig {
            rain_probability: 0.0,
            ..WeatherConfig::default()
        });
        let mut rng = fastrand::Rng::with_seed(7);
        for step in 1..=500 {
            assert_eq!(weather.update(step, &mut rng), None);
        }
        assert!(!weather.is_raining());
    }

    #[test]
    fn test_pulse_within_range() {
        let mut weather = Weather::new(always_rain(10));
        let mut rng = fastrand::Rng::with_seed(3);
        let pulse = weather.update(1, &mut rng).expect("rain should start");
        assert!((20.0..40.0).contains(&pulse));
        assert!(weather.is_raining());
        assert_eq!(weather.shower_count(), 1);
    }

    #[test]
    fn test_tick_duration_ends_shower() {
        let mut weather = Weather::new(always_rain(3));
        let mut rng = fastrand::Rng::with_seed(11);

        assert!(weather.update(5, &mut rng).is_some());
        // Raining suppresses new showers
        assert_eq!(weather.update(6, &mut rng), None);
        assert_eq!(weather.update(7, &mut rng), None);
        assert!(weather.is_raining());
        assert_eq!(weather.update(8, &mut rng), None);
        assert!(!weather.is_raining());

        // Dry again, so the next roll starts a new shower
        assert!(weather.update(9, &mut rng).is_some());
        assert_eq!(weather.shower_count(), 2);
    }

    #[test]
    fn test_wall_clock_duration_zero_ends_next_step() {
        let mut weather = Weather::new(WeatherConfig {
            rain_probability: 1.0,
            duration: RainDuration::WallClock { millis: 0 },
            ..WeatherConfig::default()
        });
        let mut rng = fastrand::Rng::with_seed(1);
        assert!(weather.update(1, &mut rng).is_some());
        std::thread::sleep(Duration::from_millis(2));
        assert_eq!(weather.update(2, &mut rng), None);
        assert!(!weather.is_raining());
    }

    #[test]
    fn test_roll_drawn_every_step() {
        let config = WeatherConfig {
            rain_probability: 0.0,
            ..WeatherConfig::default()
        };
        let mut weather = Weather::new(config);
        let mut rng = fastrand::Rng::with_seed(99);
        let mut reference = fastrand::Rng::with_seed(99);

        for step in 1..=4 {
            weather.update(step, &mut rng);
            reference.f64();
        }
        assert_eq!(rng.u64(..), reference.u64(..));
    }

    #[test]
    fn test_duration_serde_tagged() {
        let toml_like = serde_json::json!({ "mode": "wall_clock", "millis": 3000 });
        let duration: RainDuration = serde_json::from_value(toml_like).expect("parse");
        assert_eq!(duration, RainDuration::WallClock { millis: 3000 });
    }
}
