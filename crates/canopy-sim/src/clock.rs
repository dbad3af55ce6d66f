//! Hour-of-day clock and daylight schedule.
//!
//! The clock advances one hour per step and wraps at midnight. Light is a
//! step function of the hour: full daylight from `day_start` to `day_end`
//! inclusive, a dim night level otherwise.

use serde::{Deserialize, Serialize};

/// Hours in a day.
pub const HOURS_PER_DAY: u8 = 24;

/// Hours and light levels of the daylight cycle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DaylightSchedule {
    /// First daylight hour.
    pub day_start: u8,
    /// Last daylight hour (inclusive).
    pub day_end: u8,
    /// Light level during the day.
    pub day_light: f64,
    /// Light level at night.
    pub night_light: f64,
}

impl Default for DaylightSchedule {
    fn default() -> Self {
        Self {
            day_start: 6,
            day_end: 20,
            day_light: 100.0,
            night_light: 10.0,
        }
    }
}

impl DaylightSchedule {
    /// Whether `hour` falls in daylight.
    #[must_use]
    pub fn is_day(&self, hour: u8) -> bool {
        (self.day_start..=self.day_end).contains(&hour)
    }

    /// Base light level at `hour`.
    #[must_use]
    pub fn light_at(&self, hour: u8) -> f64 {
        if self.is_day(hour) {
            self.day_light
        } else {
            self.night_light
        }
    }
}

/// Event emitted when the clock crosses a boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClockEvent {
    /// Midnight passed; carries the new day count.
    NewDay(u32),
    /// Daylight began.
    DayStarted,
    /// Night began.
    NightStarted,
}

/// Hour-of-day counter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DayClock {
    hour: u8,
    day_count: u32,
    schedule: DaylightSchedule,
}

impl Default for DayClock {
    fn default() -> Self {
        Self::new(0, DaylightSchedule::default())
    }
}

impl DayClock {
    /// Create a clock at `start_hour` (wrapped into a day).
    #[must_use]
    pub fn new(start_hour: u8, schedule: DaylightSchedule) -> Self {
        Self {
            hour: start_hour % HOURS_PER_DAY,
            day_count: 0,
            schedule,
        }
    }

    /// Current hour, 0-23.
    #[must_use]
    pub fn hour(&self) -> u8 {
        self.hour
    }

    /// Number of midnights passed.
    #[must_use]
    pub fn day_count(&self) -> u32 {
        self.day_count
    }

    /// Whether the current hour is in daylight.
    #[must_use]
    pub fn is_day(&self) -> bool {
        self.schedule.is_day(self.hour)
    }

    /// Base light level for the current hour.
    #[must_use]
    pub fn light_level(&self) -> f64 {
        self.schedule.light_at(self.hour)
    }

    /// Formatted time (HH:00).
    #[must_use]
    pub fn format_time(&self) -> String {
        format!("{:02}:00", self.hour)
    }

    /// Advance one hour.
    ///
    /// Returns `Some(event)` if a boundary was crossed. A new day takes
    /// precedence over a light change.
    pub fn advance(&mut self) -> Option<ClockEvent> {
        let was_day = self.is_day();
        self.hour = (self.hour + 1) % HOURS_PER_DAY;

        if self.hour == 0 {
            self.day_count += 1;
            return Some(ClockEvent::NewDay(self.day_count));
        }

        match (was_day, self.is_day()) {
            (false, true) => Some(ClockEvent::DayStarted),
            (true, false) => Some(ClockEvent::NightStarted),
            _ => None,
        }
    }
}
