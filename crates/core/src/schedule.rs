// SPDX-License-Identifier: MIT

//! Schedule configuration and next-fire math
//!
//! Two schema generations exist upstream of this design; this is the
//! superset: interval scheduling is the canonical mode, daily/weekly
//! time-of-day scheduling the extension. All computation is pure over a
//! caller-supplied wall time so the timer loop and tests share one code
//! path.

use chrono::{Datelike, NaiveDateTime, NaiveTime, Weekday};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScheduleError {
    #[error("hour out of range: {0} (expected 0-23)")]
    InvalidHour(u32),
}

/// When scheduled runs fire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "kebab-case")]
pub enum ScheduleMode {
    /// Every `seconds` seconds, measured from the previous fire time.
    /// Zero seconds disarms the schedule.
    Interval { seconds: u64 },
    /// Every day at `hour`:00 local wall time.
    DailyAtHour { hour: u32 },
    /// Every week on `weekday` at `hour`:00 local wall time.
    WeeklyAtHour { weekday: Weekday, hour: u32 },
}

/// Persistent schedule configuration.
///
/// Any mutation must be pushed through the scheduler's reconfigure path
/// so the underlying timer is atomically replaced.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScheduleConfig {
    pub enabled: bool,
    #[serde(flatten)]
    pub mode: ScheduleMode,
    /// Run even when nothing changed; passed through to the run task,
    /// never interpreted by the scheduler itself.
    #[serde(default)]
    pub forced: bool,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            mode: ScheduleMode::Interval { seconds: 86_400 },
            forced: false,
        }
    }
}

impl ScheduleConfig {
    pub fn interval(seconds: u64) -> Self {
        Self {
            enabled: true,
            mode: ScheduleMode::Interval { seconds },
            forced: false,
        }
    }

    pub fn validate(&self) -> Result<(), ScheduleError> {
        match self.mode {
            ScheduleMode::Interval { .. } => Ok(()),
            ScheduleMode::DailyAtHour { hour } | ScheduleMode::WeeklyAtHour { hour, .. } => {
                if hour > 23 {
                    Err(ScheduleError::InvalidHour(hour))
                } else {
                    Ok(())
                }
            }
        }
    }

    /// Whether this configuration keeps a timer armed at all.
    pub fn is_armed(&self) -> bool {
        self.enabled && !matches!(self.mode, ScheduleMode::Interval { seconds: 0 })
    }

    /// The next wall-clock fire strictly after `now`, or `None` when the
    /// schedule is disarmed.
    pub fn next_fire_after(&self, now: NaiveDateTime) -> Option<NaiveDateTime> {
        if !self.is_armed() {
            return None;
        }
        match self.mode {
            ScheduleMode::Interval { seconds } => {
                now.checked_add_signed(chrono::Duration::seconds(seconds as i64))
            }
            ScheduleMode::DailyAtHour { hour } => {
                let time = NaiveTime::from_hms_opt(hour, 0, 0)?;
                let mut target = now.date().and_time(time);
                if target <= now {
                    target += chrono::Duration::days(1);
                }
                Some(target)
            }
            ScheduleMode::WeeklyAtHour { weekday, hour } => {
                let time = NaiveTime::from_hms_opt(hour, 0, 0)?;
                let days_ahead = i64::from(weekday.num_days_from_monday())
                    - i64::from(now.weekday().num_days_from_monday());
                let mut target =
                    now.date().and_time(time) + chrono::Duration::days(days_ahead.rem_euclid(7));
                if target <= now {
                    target += chrono::Duration::days(7);
                }
                Some(target)
            }
        }
    }

    /// Sleep duration until the next fire, measured from `now`.
    pub fn delay_from(&self, now: NaiveDateTime) -> Option<Duration> {
        let target = self.next_fire_after(now)?;
        (target - now).to_std().ok()
    }
}

#[cfg(test)]
#[path = "schedule_tests.rs"]
mod tests;
