//! Lookup layer: registry HTTP client and concurrent batch orchestration.

pub mod batch;
pub use batch::{BatchRunner, Lookup};

#[cfg(feature = "http")]
pub mod http;

#[cfg(feature = "http")]
pub use http::{LookupClient, LookupError};
