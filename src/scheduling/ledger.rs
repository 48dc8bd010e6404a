//! In-memory record of booking request tokens so a double click or a
//! client retry after a timeout doesn't create two events.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use super::booking::BookingConfirmation;

const DEFAULT_TTL: Duration = Duration::from_secs(60 * 60 * 24);

#[derive(Debug, Clone)]
enum Entry {
    InFlight,
    Done {
        confirmation: BookingConfirmation,
        recorded_at: Instant,
    },
}

#[derive(Debug)]
pub struct BookingLedger {
    ttl: Duration,
    entries: Mutex<HashMap<String, Entry>>,
}

pub enum Claim<'a> {
    /// First time this token is seen. Dropping the guard without
    /// completing it frees the token again.
    Fresh(ClaimGuard<'a>),
    InFlight,
    Done(BookingConfirmation),
}

pub struct ClaimGuard<'a> {
    ledger: &'a BookingLedger,
    token: String,
    completed: bool,
}

impl ClaimGuard<'_> {
    pub fn complete(mut self, confirmation: BookingConfirmation) {
        self.ledger.record(&self.token, confirmation);
        self.completed = true;
    }
}

impl Drop for ClaimGuard<'_> {
    fn drop(&mut self) {
        if !self.completed {
            self.ledger.release(&self.token);
        }
    }
}

impl Default for BookingLedger {
    fn default() -> Self {
        Self::with_ttl(DEFAULT_TTL)
    }
}

impl BookingLedger {
    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    fn entries(&self) -> std::sync::MutexGuard<'_, HashMap<String, Entry>> {
        // A panic while holding the lock can't leave a half written
        // entry behind, so a poisoned map is still usable.
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn claim(&self, token: &str) -> Claim<'_> {
        let mut entries = self.entries();
        let ttl = self.ttl;
        entries.retain(|_, entry| match entry {
            Entry::InFlight => true,
            Entry::Done { recorded_at, .. } => recorded_at.elapsed() < ttl,
        });

        match entries.get(token) {
            Some(Entry::InFlight) => Claim::InFlight,
            Some(Entry::Done { confirmation, .. }) => Claim::Done(confirmation.clone()),
            None => {
                entries.insert(token.to_string(), Entry::InFlight);
                Claim::Fresh(ClaimGuard {
                    ledger: self,
                    token: token.to_string(),
                    completed: false,
                })
            }
        }
    }

    fn record(&self, token: &str, confirmation: BookingConfirmation) {
        self.entries().insert(
            token.to_string(),
            Entry::Done {
                confirmation,
                recorded_at: Instant::now(),
            },
        );
    }

    fn release(&self, token: &str) {
        self.entries().remove(token);
    }

    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
