pub mod gcal;
pub mod oauth;
pub mod sheets;

pub use gcal::GoogleCalendar;
pub use oauth::{GoogleAuth, refresh_access_token};
