pub mod public;
mod router;
pub use router::router;
pub(crate) use router::{blank_to_none, required};
