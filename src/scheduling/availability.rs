//! Resolve which slots on a given day can still be booked.
//!
//! Calendar problems never reach the caller here. If the calendar is
//! unconfigured or the free/busy query fails, every slot on the grid is
//! offered and the booking step is left to catch real conflicts.

use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;

use super::calendar::{CalendarError, CalendarService};
use super::parse::DateParseError;
use super::slots::{SlotCandidate, SlotGrid, filter_available};
use super::time::{day_window, local_today, resolve_display_date};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AvailabilityResult {
    pub date: NaiveDate,
    pub slots: Vec<SlotCandidate>,
    /// True when the busy list could not be consulted
    pub degraded: bool,
}

impl AvailabilityResult {
    pub fn display_times(&self) -> Vec<String> {
        self.slots.iter().map(|s| s.display.clone()).collect()
    }
}

pub async fn resolve_availability(
    calendar: &dyn CalendarService,
    grid: &SlotGrid,
    tz: Tz,
    now: DateTime<Utc>,
    date: &str,
) -> Result<AvailabilityResult, DateParseError> {
    let resolved = resolve_display_date(date, local_today(now, tz))?;
    let candidates = grid.candidates(resolved, tz);

    if !calendar.is_configured() {
        tracing::warn!("Calendar not configured, offering all slots for {}", resolved);
        return Ok(AvailabilityResult {
            date: resolved,
            slots: candidates,
            degraded: true,
        });
    }

    let (time_min, time_max) = day_window(resolved, tz);
    match calendar.free_busy(time_min, time_max).await {
        Ok(busy) => {
            tracing::debug!("{} busy intervals on {}", busy.len(), resolved);
            Ok(AvailabilityResult {
                date: resolved,
                slots: filter_available(candidates, &busy),
                degraded: false,
            })
        }
        Err(err) => {
            match &err {
                CalendarError::NotConfigured => {
                    tracing::warn!("Calendar not configured, offering all slots for {}", resolved)
                }
                CalendarError::Upstream(_) => tracing::warn!(
                    "Free/busy query failed, offering all slots for {}: {}",
                    resolved,
                    err
                ),
            }
            Ok(AvailabilityResult {
                date: resolved,
                slots: candidates,
                degraded: true,
            })
        }
    }
}
