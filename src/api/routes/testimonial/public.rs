//! Public types for the testimonial API
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
pub struct TestimonialBody {
    pub name: Option<String>,
    pub quote: Option<String>,
    pub role: Option<String>,
    pub company: Option<String>,
    pub rating: Option<i64>,
}
