//! # swarm-manager
//!
//! `swarm_manager` keeps reference-counted track of which topics an
//! application wants to serve (announce and look up) or merely request (look
//! up only) in a peer-to-peer swarm, and turns changes in those intents into
//! the minimal set of join and leave calls on the swarm.
//!
//! ## Core Modules
//!
//! - `manager`: the `Manager`, which owns the per-topic counters and sequences
//!   joins and leaves so a topic is not dropped while still needed.
//! - `provider`: the `SwarmProvider` trait the manager drives, plus the
//!   in-memory `MemorySwarm`.
//! - `topic`: topic identifiers, counters and derived roles.
//! - `config`: loading settings from file and environment.
//! - `utils`: error types and logging setup.

pub mod config;
pub mod manager;
pub mod provider;
pub mod topic;
pub mod utils;

pub use manager::{Manager, Pending, Sequencing};
pub use provider::{JoinOptions, MemorySwarm, SwarmProvider, TopicStatus};
pub use topic::{Role, TopicId};
pub use utils::error::{MembershipError, ProviderError, TopicParseError};
