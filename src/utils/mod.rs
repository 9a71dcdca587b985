//! The `utils` module provides definitions shared across the `swarm_manager`
//! crate.
//!
//! It holds the error types surfaced by the manager and the provider, and the
//! logging bootstrap used by the binary and by tests.

pub mod error;
pub mod logging;

pub use error::{MembershipError, ProviderError, TopicParseError};

#[cfg(test)]
mod tests;
