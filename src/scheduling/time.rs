//! Year inference and timezone helpers shared by availability and
//! booking.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;

use super::parse::{DateParseError, DisplayDate, parse_display_date};

/// Today's date on the business' wall calendar.
pub fn local_today(now: DateTime<Utc>, tz: Tz) -> NaiveDate {
    now.with_timezone(&tz).date_naive()
}

fn candidate_years(reference_year: i32) -> [i32; 2] {
    [reference_year, reference_year + 1]
}

/// Resolve a yearless date to the current year, or the next one when
/// the date has already passed. Dates that only exist in leap years
/// land on whichever of the two years has them.
pub fn resolve_date(
    input: &str,
    date: DisplayDate,
    today: NaiveDate,
) -> Result<NaiveDate, DateParseError> {
    candidate_years(today.year())
        .into_iter()
        .filter_map(|year| NaiveDate::from_ymd_opt(year, date.month, date.day))
        .find(|resolved| *resolved >= today)
        .ok_or_else(|| DateParseError::InvalidDateFormat(input.to_string()))
}

/// Parse and resolve a display date in one step.
pub fn resolve_display_date(input: &str, today: NaiveDate) -> Result<NaiveDate, DateParseError> {
    let date = parse_display_date(input)?;
    resolve_date(input, date, today)
}

/// Map a wall clock time on the business' calendar to an instant.
/// Times that fall into a DST gap or overlap are rejected.
pub fn localize(naive: NaiveDateTime, tz: Tz) -> Option<DateTime<Tz>> {
    tz.from_local_datetime(&naive).single()
}

/// Resolve a yearless date and a wall clock time to a future instant.
/// The year advances by one when the naive datetime is already in the
/// past.
pub fn resolve_start(
    input: &str,
    date: DisplayDate,
    time: NaiveTime,
    tz: Tz,
    now: DateTime<Utc>,
) -> Result<DateTime<Tz>, DateParseError> {
    let reference_year = now.with_timezone(&tz).year();
    let mut saw_local_gap = false;

    for year in candidate_years(reference_year) {
        let Some(day) = NaiveDate::from_ymd_opt(year, date.month, date.day) else {
            continue;
        };
        let Some(start) = localize(day.and_time(time), tz) else {
            saw_local_gap = true;
            continue;
        };
        if start.with_timezone(&Utc) >= now {
            return Ok(start);
        }
    }

    if saw_local_gap {
        Err(DateParseError::NonexistentLocalTime(input.to_string()))
    } else {
        Err(DateParseError::InvalidDateFormat(input.to_string()))
    }
}

/// The `[00:00:00, 23:59:59]` window of a local date, as UTC instants.
pub fn day_window(date: NaiveDate, tz: Tz) -> (DateTime<Utc>, DateTime<Utc>) {
    let start_naive = date.and_time(NaiveTime::MIN);
    let end_naive = date
        .and_hms_opt(23, 59, 59)
        .unwrap_or(start_naive);

    // Midnight can fall inside a DST gap in a handful of zones, so take
    // the nearest valid instant on either side.
    let start = tz
        .from_local_datetime(&start_naive)
        .earliest()
        .unwrap_or_else(|| tz.from_utc_datetime(&start_naive));
    let end = tz
        .from_local_datetime(&end_naive)
        .latest()
        .unwrap_or_else(|| tz.from_utc_datetime(&end_naive));

    (start.with_timezone(&Utc), end.with_timezone(&Utc))
}
