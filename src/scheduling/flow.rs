//! The booking flow as a client sees it: contact details, then a slot,
//! then the commit. A failed commit can always be retried or abandoned
//! for direct email, it is never a dead end.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactDetails {
    pub name: String,
    pub email: String,
    pub company: Option<String>,
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChosenSlot {
    pub date: String,
    pub time: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Confirmed {
    pub event_id: String,
    pub meet_link: Option<String>,
    pub html_link: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlowState {
    CollectingContact,
    CollectingSlot {
        contact: ContactDetails,
    },
    Confirming {
        contact: ContactDetails,
        slot: ChosenSlot,
    },
    Confirmed {
        contact: ContactDetails,
        slot: ChosenSlot,
        confirmation: Confirmed,
    },
    Failed {
        contact: ContactDetails,
        slot: ChosenSlot,
        error: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlowEvent {
    ContactSubmitted(ContactDetails),
    SlotSelected {
        slot: ChosenSlot,
        offered: Vec<String>,
    },
    BookingSucceeded(Confirmed),
    BookingFailed(String),
    Retry,
    PickAnotherSlot,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FlowError {
    #[error("Name and email are required")]
    IncompleteContact,
    #[error("{0} is not one of the offered times")]
    SlotNotOffered(String),
    #[error("Can't handle {event} while {state}")]
    InvalidTransition {
        state: &'static str,
        event: &'static str,
    },
}

impl FlowState {
    pub fn name(&self) -> &'static str {
        match self {
            FlowState::CollectingContact => "collecting contact",
            FlowState::CollectingSlot { .. } => "collecting slot",
            FlowState::Confirming { .. } => "confirming",
            FlowState::Confirmed { .. } => "confirmed",
            FlowState::Failed { .. } => "failed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, FlowState::Confirmed { .. })
    }

    /// Message pointing at the manual channel once a commit has failed.
    pub fn fallback_hint(&self, contact_email: &str) -> Option<String> {
        match self {
            FlowState::Failed { error, .. } => Some(format!(
                "{} You can retry, pick another time, or email {} directly.",
                error, contact_email
            )),
            _ => None,
        }
    }

    pub fn next(self, event: FlowEvent) -> Result<FlowState, FlowError> {
        match (self, event) {
            (FlowState::CollectingContact, FlowEvent::ContactSubmitted(contact)) => {
                if contact.name.trim().is_empty() || contact.email.trim().is_empty() {
                    return Err(FlowError::IncompleteContact);
                }
                Ok(FlowState::CollectingSlot { contact })
            }
            (FlowState::CollectingSlot { contact }, FlowEvent::SlotSelected { slot, offered }) => {
                if !offered.contains(&slot.time) {
                    return Err(FlowError::SlotNotOffered(slot.time));
                }
                Ok(FlowState::Confirming { contact, slot })
            }
            (FlowState::Confirming { contact, slot }, FlowEvent::BookingSucceeded(confirmation)) => {
                Ok(FlowState::Confirmed {
                    contact,
                    slot,
                    confirmation,
                })
            }
            (FlowState::Confirming { contact, slot }, FlowEvent::BookingFailed(error)) => {
                Ok(FlowState::Failed {
                    contact,
                    slot,
                    error,
                })
            }
            (FlowState::Failed { contact, slot, .. }, FlowEvent::Retry) => {
                Ok(FlowState::Confirming { contact, slot })
            }
            (FlowState::Failed { contact, .. }, FlowEvent::PickAnotherSlot) => {
                Ok(FlowState::CollectingSlot { contact })
            }
            (state, event) => Err(FlowError::InvalidTransition {
                state: state.name(),
                event: event.name(),
            }),
        }
    }
}

impl FlowEvent {
    fn name(&self) -> &'static str {
        match self {
            FlowEvent::ContactSubmitted(_) => "contact submitted",
            FlowEvent::SlotSelected { .. } => "slot selected",
            FlowEvent::BookingSucceeded(_) => "booking succeeded",
            FlowEvent::BookingFailed(_) => "booking failed",
            FlowEvent::Retry => "retry",
            FlowEvent::PickAnotherSlot => "pick another slot",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contact() -> ContactDetails {
        ContactDetails {
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            company: None,
            message: None,
        }
    }

    fn slot() -> ChosenSlot {
        ChosenSlot {
            date: "Thursday, February 19".to_string(),
            time: "11:00 AM".to_string(),
        }
    }

    fn offered() -> Vec<String> {
        vec!["10:00 AM".to_string(), "11:00 AM".to_string()]
    }

    fn confirming() -> FlowState {
        FlowState::CollectingContact
            .next(FlowEvent::ContactSubmitted(contact()))
            .unwrap()
            .next(FlowEvent::SlotSelected {
                slot: slot(),
                offered: offered(),
            })
            .unwrap()
    }

    #[test]
    fn test_happy_path() {
        let state = confirming()
            .next(FlowEvent::BookingSucceeded(Confirmed {
                event_id: "evt_1".to_string(),
                meet_link: None,
                html_link: None,
            }))
            .unwrap();
        assert!(state.is_terminal());
        assert_eq!(state.name(), "confirmed");
    }

    #[test]
    fn test_failure_can_be_retried() {
        let failed = confirming()
            .next(FlowEvent::BookingFailed("Calendar down.".to_string()))
            .unwrap();
        assert!(!failed.is_terminal());

        let hint = failed.fallback_hint("hello@example.com").unwrap();
        assert!(hint.contains("hello@example.com"));

        let retried = failed.next(FlowEvent::Retry).unwrap();
        assert_eq!(
            retried,
            FlowState::Confirming {
                contact: contact(),
                slot: slot()
            }
        );
    }

    #[test]
    fn test_failure_can_go_back_to_slots() {
        let state = confirming()
            .next(FlowEvent::BookingFailed("nope".to_string()))
            .unwrap()
            .next(FlowEvent::PickAnotherSlot)
            .unwrap();
        assert_eq!(state, FlowState::CollectingSlot { contact: contact() });
    }

    #[test]
    fn test_incomplete_contact_is_rejected() {
        let mut c = contact();
        c.email = " ".to_string();
        assert_eq!(
            FlowState::CollectingContact.next(FlowEvent::ContactSubmitted(c)),
            Err(FlowError::IncompleteContact)
        );
    }

    #[test]
    fn test_slot_must_be_offered() {
        let state = FlowState::CollectingSlot { contact: contact() };
        let mut s = slot();
        s.time = "4:00 PM".to_string();
        assert_eq!(
            state.next(FlowEvent::SlotSelected {
                slot: s,
                offered: offered()
            }),
            Err(FlowError::SlotNotOffered("4:00 PM".to_string()))
        );
    }

    #[test]
    fn test_confirmed_is_final() {
        let confirmed = confirming()
            .next(FlowEvent::BookingSucceeded(Confirmed {
                event_id: "evt_1".to_string(),
                meet_link: None,
                html_link: None,
            }))
            .unwrap();
        assert_eq!(
            confirmed.next(FlowEvent::Retry),
            Err(FlowError::InvalidTransition {
                state: "confirmed",
                event: "retry"
            })
        );
    }
}
