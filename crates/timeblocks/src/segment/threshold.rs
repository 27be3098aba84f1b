//! Gap threshold between consecutive measurements.

use std::fmt;

use chrono::Duration;

use crate::error::{Result, TimeblocksError};

/// A non-negative idle-gap threshold.
///
/// Construction is the only place a threshold is validated, so a negative
/// value is rejected before any segmentation runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Threshold(Duration);

impl Threshold {
    /// A zero threshold: only touching or overlapping measurements share a block.
    pub fn zero() -> Self {
        Threshold(Duration::zero())
    }

    /// Wrap an existing duration.
    pub fn from_duration(duration: Duration) -> Result<Self> {
        if duration < Duration::zero() {
            return Err(TimeblocksError::InvalidThreshold(format!(
                "threshold must not be negative, got {} seconds",
                duration.num_seconds()
            )));
        }
        Ok(Threshold(duration))
    }

    pub fn from_seconds(seconds: i64) -> Result<Self> {
        let duration = Duration::try_seconds(seconds).ok_or_else(|| out_of_range(seconds, "seconds"))?;
        Self::from_duration(duration)
    }

    pub fn from_minutes(minutes: i64) -> Result<Self> {
        let duration = Duration::try_minutes(minutes).ok_or_else(|| out_of_range(minutes, "minutes"))?;
        Self::from_duration(duration)
    }

    pub fn from_hours(hours: i64) -> Result<Self> {
        let duration = Duration::try_hours(hours).ok_or_else(|| out_of_range(hours, "hours"))?;
        Self::from_duration(duration)
    }

    /// Fractional minutes, as entered on a slider. Rounded to the millisecond.
    pub fn from_minutes_f64(minutes: f64) -> Result<Self> {
        if !minutes.is_finite() {
            return Err(TimeblocksError::InvalidThreshold(format!(
                "threshold must be a finite number of minutes, got {}",
                minutes
            )));
        }
        if minutes < 0.0 {
            return Err(TimeblocksError::InvalidThreshold(format!(
                "threshold must not be negative, got {} minutes",
                minutes
            )));
        }

        let millis = (minutes * 60_000.0).round();
        if millis > i64::MAX as f64 {
            return Err(out_of_range(minutes, "minutes"));
        }
        let duration =
            Duration::try_milliseconds(millis as i64).ok_or_else(|| out_of_range(minutes, "minutes"))?;
        Self::from_duration(duration)
    }

    pub fn as_duration(&self) -> Duration {
        self.0
    }

    /// Threshold in (possibly fractional) minutes.
    pub fn as_minutes_f64(&self) -> f64 {
        self.0.num_milliseconds() as f64 / 60_000.0
    }
}

impl Default for Threshold {
    fn default() -> Self {
        Self::zero()
    }
}

impl fmt::Display for Threshold {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let minutes = self.as_minutes_f64();
        if minutes.fract() == 0.0 {
            write!(f, "{} min", minutes as i64)
        } else {
            write!(f, "{:.2} min", minutes)
        }
    }
}

fn out_of_range(value: impl fmt::Display, unit: &str) -> TimeblocksError {
    TimeblocksError::InvalidThreshold(format!("{} {} is out of range", value, unit))
}
