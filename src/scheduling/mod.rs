//! Appointment availability and booking.

pub mod availability;
pub mod booking;
pub mod calendar;
pub mod flow;
pub mod ledger;
pub mod parse;
pub mod slots;
pub mod time;

pub use availability::{AvailabilityResult, resolve_availability};
pub use booking::{
    BookingConfirmation, BookingContext, BookingError, BookingRequest, commit_booking,
    commit_booking_once,
};
pub use calendar::{CalendarError, CalendarService, CreatedEvent, NewEvent, NullCalendar};
pub use ledger::BookingLedger;
pub use parse::DateParseError;
pub use slots::{BusyInterval, SlotCandidate, SlotGrid};
