//! Topic identifiers and per-topic intent counters.
//!
//! A `TopicId` is the canonical map key for a swarm topic: whichever form the
//! caller holds (raw 32 bytes or a 64-character hex string), it is converted
//! to a `TopicId` before it reaches any map. `Counters` holds the two
//! independent intent counts the manager keeps per topic.

pub mod counters;
pub mod id;

pub use counters::{Counters, Role};
pub use id::{TOPIC_LEN, TopicId};

#[cfg(test)]
mod tests;
