// src/heatmap/range.rs

use chrono::{Datelike, Days, Months, NaiveDate, NaiveDateTime, NaiveTime};

use crate::error::HeatmapError;

/// How far back the calendar reaches when nothing else is configured.
pub const DEFAULT_MONTHS_BACK: u32 = 12;

/// The trailing window shown by the calendar, padded back to a Sunday so the
/// grid always starts on the first row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    start: NaiveDateTime,
    end: NaiveDateTime,
    week_aligned_start: NaiveDate,
}

impl DateRange {
    /// Window covering `months_back` calendar months before `now`.
    ///
    /// `start` is truncated to midnight; `end` keeps the time of day. A start
    /// date that does not exist in the target month (e.g. the 31st) is clamped
    /// to that month's last day.
    pub fn trailing(months_back: u32, now: NaiveDateTime) -> Result<Self, HeatmapError> {
        let today = now.date();
        let start = today
            .checked_sub_months(Months::new(months_back))
            .ok_or(HeatmapError::DateOutOfRange(months_back, today))?;
        let pad = u64::from(start.weekday().num_days_from_sunday());
        let week_aligned_start = start
            .checked_sub_days(Days::new(pad))
            .ok_or(HeatmapError::DateOutOfRange(months_back, today))?;

        Ok(DateRange {
            start: start.and_time(NaiveTime::MIN),
            end: now,
            week_aligned_start,
        })
    }

    pub fn start(&self) -> NaiveDateTime {
        self.start
    }

    pub fn end(&self) -> NaiveDateTime {
        self.end
    }

    pub fn week_aligned_start(&self) -> NaiveDate {
        self.week_aligned_start
    }

    /// Number of generated days: aligned start through the end date, rounded up
    /// to whole weeks.
    pub fn total_days(&self) -> usize {
        let span = (self.end.date() - self.week_aligned_start).num_days() + 1;
        let span = span.max(1) as usize;
        span.div_ceil(7) * 7
    }

    pub fn weeks(&self) -> usize {
        self.total_days() / 7
    }

    /// Whether `date` lies in the unaligned `[start, end]` window.
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start.date() <= date && date <= self.end.date()
    }

    /// Every generated date in ascending order, padding included.
    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> {
        self.week_aligned_start.iter_days().take(self.total_days())
    }
}
