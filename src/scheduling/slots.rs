//! The fixed daily slot grid and conflict filtering against busy
//! intervals reported by the calendar.

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use super::parse::format_display_time;
use super::time::localize;

pub const MEETING_MINUTES: i64 = 60;

pub fn meeting_duration() -> Duration {
    Duration::minutes(MEETING_MINUTES)
}

/// Daily start times on offer, 9:00 AM through 4:00 PM on the hour.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotGrid {
    starts: Vec<NaiveTime>,
}

impl SlotGrid {
    pub fn new(mut starts: Vec<NaiveTime>) -> Self {
        starts.sort();
        starts.dedup();
        Self { starts }
    }

    pub fn starts(&self) -> &[NaiveTime] {
        &self.starts
    }

    /// Display strings for every slot, in grid order.
    pub fn display_times(&self) -> Vec<String> {
        self.starts.iter().copied().map(format_display_time).collect()
    }

    pub fn contains(&self, time: NaiveTime) -> bool {
        self.starts.contains(&time)
    }

    /// Place every grid entry on `date` in the business timezone.
    /// Entries that don't exist on that day (DST gap) are skipped.
    pub fn candidates(&self, date: NaiveDate, tz: Tz) -> Vec<SlotCandidate> {
        self.starts
            .iter()
            .filter_map(|time| {
                let start = localize(date.and_time(*time), tz)?;
                Some(SlotCandidate::new(
                    start.with_timezone(&Utc),
                    format_display_time(*time),
                ))
            })
            .collect()
    }
}

impl Default for SlotGrid {
    fn default() -> Self {
        Self::new(
            (9..=16)
                .filter_map(|hour| NaiveTime::from_hms_opt(hour, 0, 0))
                .collect(),
        )
    }
}

/// Opaque busy range from a free/busy query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusyInterval {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl BusyInterval {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotCandidate {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub display: String,
}

impl SlotCandidate {
    pub fn new(start: DateTime<Utc>, display: String) -> Self {
        Self {
            start,
            end: start + meeting_duration(),
            display,
        }
    }

    /// Half-open overlap. Back to back meetings don't conflict.
    pub fn overlaps(&self, busy: &BusyInterval) -> bool {
        self.start < busy.end && self.end > busy.start
    }
}

/// Drop every candidate that overlaps any busy interval, keeping grid
/// order.
pub fn filter_available(
    candidates: Vec<SlotCandidate>,
    busy: &[BusyInterval],
) -> Vec<SlotCandidate> {
    candidates
        .into_iter()
        .filter(|slot| !busy.iter().any(|b| slot.overlaps(b)))
        .collect()
}
