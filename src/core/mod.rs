pub mod clock;
pub mod config;
pub use clock::Clock;
pub use config::{AppConfig, GoogleCredentials};
