//! The `provider` module defines the swarm membership capability the manager
//! drives, and an in-memory implementation of it.
//!
//! The real swarm (peer discovery, connections, hole punching) lives outside
//! this crate. All the manager needs from it is the `SwarmProvider` trait:
//! issue a join or leave, list the live topics, and tear everything down.

pub mod memory;

use futures::future::BoxFuture;
use serde::Serialize;

use crate::topic::TopicId;
use crate::utils::error::ProviderError;

pub use memory::{MemorySwarm, SwarmCall};

/// A join/leave/destroy that has been issued and not yet observed to finish.
pub type PendingOp = BoxFuture<'static, Result<(), ProviderError>>;

/// Roles to join a topic with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct JoinOptions {
    /// Announce ourselves as a host of the topic.
    pub server: bool,
    /// Look up and connect to hosts of the topic.
    pub client: bool,
}

impl JoinOptions {
    pub const SERVER_AND_CLIENT: Self = Self {
        server: true,
        client: true,
    };

    pub const CLIENT_ONLY: Self = Self {
        server: false,
        client: true,
    };
}

/// One entry of the provider's live topic set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TopicStatus {
    pub topic: TopicId,
    pub is_server: bool,
    pub is_client: bool,
}

/// Swarm membership capability consumed by the `Manager`.
///
/// Calling `join` or `leave` issues the operation right away: a provider may
/// update its topic set before returning. The returned future resolves once
/// the operation has finished on the network side.
pub trait SwarmProvider: Send + Sync + 'static {
    /// Join `topic` with the given roles. Joining an already-joined topic
    /// upgrades its roles or is a no-op.
    fn join(&self, topic: TopicId, options: JoinOptions) -> PendingOp;

    /// Drop every role for `topic`. Leaving a topic that is not joined is a
    /// no-op.
    fn leave(&self, topic: TopicId) -> PendingOp;

    /// Live snapshot of joined topics.
    fn topics(&self) -> Vec<TopicStatus>;

    /// Unconditionally tear down all memberships and resources.
    fn destroy(&self) -> PendingOp;
}

#[cfg(test)]
mod tests;
