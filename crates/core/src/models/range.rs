use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::errors::{DeskError, DeskResult};

/// Longest stretch of skipped local time searched when a wall-clock time
/// falls into a DST gap.
const MAX_GAP_MINUTES: i64 = 180;

/// First real instant at or after `naive`. Inside a DST gap this is the
/// moment the clocks jump to.
fn first_instant_from(tz: Tz, naive: NaiveDateTime) -> Option<DateTime<Tz>> {
    (0..=MAX_GAP_MINUTES)
        .find_map(|minutes| tz.from_local_datetime(&(naive + Duration::minutes(minutes))).earliest())
}

/// Last real instant at or before `naive`.
fn last_instant_until(tz: Tz, naive: NaiveDateTime) -> Option<DateTime<Tz>> {
    (0..=MAX_GAP_MINUTES)
        .find_map(|minutes| tz.from_local_datetime(&(naive - Duration::minutes(minutes))).latest())
}

/// Inclusive window over booking start times.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl DateRange {
    /// From local midnight to 23:59:59.999 of `date` in `tz`. On days whose
    /// midnight is skipped by a DST change the window opens when the
    /// clocks jump.
    pub fn for_day(date: NaiveDate, tz: Tz) -> DeskResult<Self> {
        Self::for_days(date, date, tz)
    }

    /// Whole local days `first..=last`.
    pub fn for_days(first: NaiveDate, last: NaiveDate, tz: Tz) -> DeskResult<Self> {
        if last < first {
            return Err(DeskError::Validation(format!(
                "Date range ends before it starts: {} > {}",
                first, last
            )));
        }

        let start = first
            .and_hms_opt(0, 0, 0)
            .and_then(|naive| first_instant_from(tz, naive))
            .ok_or_else(|| DeskError::Validation(format!("No local midnight on {}", first)))?;
        let end = last
            .and_hms_milli_opt(23, 59, 59, 999)
            .and_then(|naive| last_instant_until(tz, naive))
            .ok_or_else(|| DeskError::Validation(format!("No end of day on {}", last)))?;

        Ok(Self {
            start: start.with_timezone(&Utc),
            end: end.with_timezone(&Utc),
        })
    }

    /// The `days` local days ending with `today`.
    pub fn trailing_days(today: NaiveDate, days: u32, tz: Tz) -> DeskResult<Self> {
        let first = today - Duration::days(i64::from(days.saturating_sub(1)));
        Self::for_days(first, today, tz)
    }

    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        self.start <= at && at <= self.end
    }

    /// Local calendar days covered by the window.
    pub fn local_days(&self, tz: Tz) -> Vec<NaiveDate> {
        let first = self.start.with_timezone(&tz).date_naive();
        let last = self.end.with_timezone(&tz).date_naive();
        first.iter_days().take_while(|day| *day <= last).collect()
    }
}
