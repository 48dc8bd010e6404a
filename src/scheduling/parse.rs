//! Grammar for the display strings the booking UI sends back to the
//! server.
//!
//! Dates look like `Thursday, February 19` (no year) and times look
//! like `9:00 AM`. Both are produced by the UI so the grammar is
//! strict about shape but forgiving about letter case and surrounding
//! whitespace.

use chrono::{NaiveTime, Weekday};
use thiserror::Error;
use winnow::ascii::{Caseless, alpha1, digit1, space0, space1};
use winnow::combinator::alt;
use winnow::prelude::*;
use winnow::token::{literal, take_while};

const MONTHS: [&str; 12] = [
    "january",
    "february",
    "march",
    "april",
    "may",
    "june",
    "july",
    "august",
    "september",
    "october",
    "november",
    "december",
];

const WEEKDAYS: [(&str, Weekday); 7] = [
    ("monday", Weekday::Mon),
    ("tuesday", Weekday::Tue),
    ("wednesday", Weekday::Wed),
    ("thursday", Weekday::Thu),
    ("friday", Weekday::Fri),
    ("saturday", Weekday::Sat),
    ("sunday", Weekday::Sun),
];

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DateParseError {
    #[error("Invalid date format '{0}', expected a date like \"Thursday, February 19\"")]
    InvalidDateFormat(String),
    #[error("Invalid time format '{0}', expected a time like \"9:00 AM\"")]
    InvalidTimeFormat(String),
    #[error("'{0}' does not exist as a local time in the business timezone")]
    NonexistentLocalTime(String),
}

/// A yearless calendar date as shown in the UI. The weekday is kept
/// for display only and is never checked against the resolved year.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayDate {
    pub weekday: Weekday,
    pub month: u32,
    pub day: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Meridiem {
    Am,
    Pm,
}

fn month_number(name: &str) -> Option<u32> {
    let name = name.to_lowercase();
    MONTHS
        .iter()
        .position(|m| *m == name)
        .map(|idx| idx as u32 + 1)
}

fn weekday_from_name(name: &str) -> Option<Weekday> {
    let name = name.to_lowercase();
    WEEKDAYS
        .iter()
        .find(|(n, _)| *n == name)
        .map(|(_, weekday)| *weekday)
}

fn weekday(input: &mut &str) -> ModalResult<Weekday> {
    alpha1.verify_map(weekday_from_name).parse_next(input)
}

fn month(input: &mut &str) -> ModalResult<u32> {
    alpha1.verify_map(month_number).parse_next(input)
}

fn day_of_month(input: &mut &str) -> ModalResult<u32> {
    digit1
        .try_map(str::parse::<u32>)
        .verify(|day: &u32| (1..=31).contains(day))
        .parse_next(input)
}

fn display_date(input: &mut &str) -> ModalResult<DisplayDate> {
    let weekday = weekday.parse_next(input)?;
    (space0, ',', space0).parse_next(input)?;
    let month = month.parse_next(input)?;
    space1.parse_next(input)?;
    let day = day_of_month.parse_next(input)?;
    Ok(DisplayDate {
        weekday,
        month,
        day,
    })
}

fn hour(input: &mut &str) -> ModalResult<u32> {
    take_while(1..=2, |c: char| c.is_ascii_digit())
        .try_map(str::parse::<u32>)
        .verify(|h: &u32| (1..=12).contains(h))
        .parse_next(input)
}

fn minute(input: &mut &str) -> ModalResult<u32> {
    take_while(2, |c: char| c.is_ascii_digit())
        .try_map(str::parse::<u32>)
        .verify(|m: &u32| *m < 60)
        .parse_next(input)
}

fn meridiem(input: &mut &str) -> ModalResult<Meridiem> {
    alt((
        literal(Caseless("AM")).value(Meridiem::Am),
        literal(Caseless("PM")).value(Meridiem::Pm),
    ))
    .parse_next(input)
}

fn display_time(input: &mut &str) -> ModalResult<(u32, u32)> {
    let h = hour.parse_next(input)?;
    ':'.parse_next(input)?;
    let m = minute.parse_next(input)?;
    space1.parse_next(input)?;
    let period = meridiem.parse_next(input)?;

    // 12 AM is midnight, 12 PM is noon
    let h24 = match (period, h) {
        (Meridiem::Am, 12) => 0,
        (Meridiem::Am, h) => h,
        (Meridiem::Pm, 12) => 12,
        (Meridiem::Pm, h) => h + 12,
    };
    Ok((h24, m))
}

/// Parse `"<Weekday>, <Month> <Day>"`.
pub fn parse_display_date(input: &str) -> Result<DisplayDate, DateParseError> {
    display_date
        .parse(input.trim())
        .map_err(|_| DateParseError::InvalidDateFormat(input.to_string()))
}

/// Parse `"<H>:<MM> <AM|PM>"` into a 24 hour wall clock time.
pub fn parse_display_time(input: &str) -> Result<NaiveTime, DateParseError> {
    let invalid = || DateParseError::InvalidTimeFormat(input.to_string());
    let (h, m) = display_time.parse(input.trim()).map_err(|_| invalid())?;
    NaiveTime::from_hms_opt(h, m, 0).ok_or_else(invalid)
}

/// Render a wall clock time the way the UI shows it, e.g. `4:00 PM`.
pub fn format_display_time(time: NaiveTime) -> String {
    time.format("%-I:%M %p").to_string()
}
