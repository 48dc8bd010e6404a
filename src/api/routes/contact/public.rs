//! Public types for the contact form API
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
pub struct ContactBody {
    pub name: Option<String>,
    pub email: Option<String>,
    pub company: Option<String>,
    pub message: Option<String>,
}
