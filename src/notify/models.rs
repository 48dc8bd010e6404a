use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct ContactSubmission {
    pub name: String,
    pub email: String,
    pub company: Option<String>,
    pub message: Option<String>,
    pub submitted_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TestimonialSubmission {
    pub name: String,
    pub quote: String,
    pub role: Option<String>,
    pub company: Option<String>,
    pub rating: Option<u8>,
    pub submitted_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BookingNotice {
    pub name: String,
    pub email: String,
    pub company: Option<String>,
    pub message: Option<String>,
    /// Human readable start, e.g. "Friday, February 19, 2027 at 11:00 AM EST"
    pub starts: String,
    pub event_id: String,
    pub meeting_link: Option<String>,
    pub submitted_at: DateTime<Utc>,
}

/// Anything the site records on the side. Sinks receive every kind and
/// decide how to render it.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Submission {
    Contact(ContactSubmission),
    Testimonial(TestimonialSubmission),
    Booking(BookingNotice),
}

fn or_blank(value: &Option<String>) -> String {
    value.clone().unwrap_or_default()
}

impl Submission {
    pub fn kind(&self) -> &'static str {
        match self {
            Submission::Contact(_) => "contact",
            Submission::Testimonial(_) => "testimonial",
            Submission::Booking(_) => "booking",
        }
    }

    pub fn submitter(&self) -> &str {
        match self {
            Submission::Contact(c) => &c.name,
            Submission::Testimonial(t) => &t.name,
            Submission::Booking(b) => &b.name,
        }
    }

    pub fn subject(&self) -> String {
        match self {
            Submission::Contact(c) => format!("New inquiry from {}", c.name),
            Submission::Testimonial(t) => format!("New testimonial from {}", t.name),
            Submission::Booking(b) => format!("New booking: {} on {}", b.name, b.starts),
        }
    }

    /// Flat spreadsheet row: kind, timestamp, name, email, company,
    /// detail, extra, reference.
    pub fn row(&self) -> Vec<String> {
        match self {
            Submission::Contact(c) => vec![
                self.kind().to_string(),
                c.submitted_at.to_rfc3339(),
                c.name.clone(),
                c.email.clone(),
                or_blank(&c.company),
                or_blank(&c.message),
                String::new(),
                String::new(),
            ],
            Submission::Testimonial(t) => vec![
                self.kind().to_string(),
                t.submitted_at.to_rfc3339(),
                t.name.clone(),
                String::new(),
                or_blank(&t.company),
                t.quote.clone(),
                or_blank(&t.role),
                t.rating.map(|r| r.to_string()).unwrap_or_default(),
            ],
            Submission::Booking(b) => vec![
                self.kind().to_string(),
                b.submitted_at.to_rfc3339(),
                b.name.clone(),
                b.email.clone(),
                or_blank(&b.company),
                or_blank(&b.message),
                b.starts.clone(),
                b.event_id.clone(),
            ],
        }
    }
}
