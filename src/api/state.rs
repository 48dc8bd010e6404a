use std::sync::Arc;

use anyhow::Result;

use crate::core::{AppConfig, Clock};
use crate::google::GoogleCalendar;
use crate::notify::Notifier;
use crate::scheduling::{BookingLedger, CalendarService, NullCalendar, SlotGrid};

pub struct AppState {
    pub config: AppConfig,
    pub calendar: Arc<dyn CalendarService>,
    pub notifier: Notifier,
    // Remembers request tokens of recent bookings
    pub ledger: Arc<BookingLedger>,
    pub grid: SlotGrid,
    pub clock: Clock,
}

impl AppState {
    pub fn new(config: AppConfig, calendar: Arc<dyn CalendarService>, notifier: Notifier) -> Self {
        Self {
            config,
            calendar,
            notifier,
            ledger: Arc::new(BookingLedger::default()),
            grid: SlotGrid::default(),
            clock: Clock::System,
        }
    }

    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    /// Wire up the real collaborators. Missing calendar settings are
    /// not fatal, availability degrades and booking reports a
    /// configuration error.
    pub fn from_config(config: AppConfig) -> Result<Self> {
        let calendar: Arc<dyn CalendarService> = match GoogleCalendar::from_config(&config)? {
            Some(calendar) => Arc::new(calendar),
            None => {
                tracing::warn!("Calendar credentials or ID missing, running without a calendar");
                Arc::new(NullCalendar)
            }
        };
        let notifier = Notifier::from_config(&config)?;
        Ok(Self::new(config, calendar, notifier))
    }
}
