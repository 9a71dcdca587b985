//! In-process swarm provider
//!
//! `MemorySwarm` keeps its topic set in a `BTreeMap` and applies joins and
//! leaves to it at issue time, the way a real swarm updates its topic table
//! before any network round trip finishes. Completion of each operation is
//! delayed by a configurable latency on the Tokio timer.
//!
//! It also keeps two logs for tests and the CLI:
//! - `calls()`: operations in the order they were issued
//! - `completions()`: operations in the order their futures resolved

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use futures::FutureExt;
use tracing::trace;

use super::{JoinOptions, PendingOp, SwarmProvider, TopicStatus};
use crate::topic::TopicId;
use crate::utils::error::ProviderError;

/// An operation issued against a `MemorySwarm`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwarmCall {
    Join { topic: TopicId, options: JoinOptions },
    Leave { topic: TopicId },
    Destroy,
}

#[derive(Debug, Default)]
struct SwarmState {
    topics: BTreeMap<TopicId, JoinOptions>,
    calls: Vec<SwarmCall>,
    completions: Vec<SwarmCall>,
    destroyed: bool,
    fail_leaves: bool,
}

#[derive(Debug, Default)]
pub struct MemorySwarm {
    state: Arc<Mutex<SwarmState>>,
    join_latency: Duration,
    leave_latency: Duration,
}

impl MemorySwarm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Delay completion of every join and leave by `latency`.
    pub fn with_latency(latency: Duration) -> Self {
        Self {
            join_latency: latency,
            leave_latency: latency,
            ..Self::default()
        }
    }

    /// Override the completion delay for leaves only.
    pub fn leave_latency(mut self, latency: Duration) -> Self {
        self.leave_latency = latency;
        self
    }

    /// Issued operations, oldest first.
    pub fn calls(&self) -> Vec<SwarmCall> {
        self.lock().calls.clone()
    }

    /// Completed operations, in completion order.
    pub fn completions(&self) -> Vec<SwarmCall> {
        self.lock().completions.clone()
    }

    pub fn clear_calls(&self) {
        let mut state = self.lock();
        state.calls.clear();
        state.completions.clear();
    }

    pub fn is_destroyed(&self) -> bool {
        self.lock().destroyed
    }

    /// When set, leaves still drop the topic but their futures resolve with
    /// `ProviderError::Rejected`.
    pub fn fail_leaves(&self, fail: bool) {
        self.lock().fail_leaves = fail;
    }

    fn lock(&self) -> MutexGuard<'_, SwarmState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn settle(
        &self,
        call: SwarmCall,
        latency: Duration,
        result: Result<(), ProviderError>,
    ) -> PendingOp {
        let state = self.state.clone();
        async move {
            if !latency.is_zero() {
                tokio::time::sleep(latency).await;
            }
            state
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .completions
                .push(call);
            result
        }
        .boxed()
    }
}

impl SwarmProvider for MemorySwarm {
    fn join(&self, topic: TopicId, options: JoinOptions) -> PendingOp {
        let call = SwarmCall::Join { topic, options };
        {
            let mut state = self.lock();
            state.calls.push(call);
            if !state.destroyed {
                let entry = state.topics.entry(topic).or_insert(JoinOptions {
                    server: false,
                    client: false,
                });
                entry.server |= options.server;
                entry.client |= options.client;
            }
        }
        trace!(%topic, ?options, "memory swarm join");
        self.settle(call, self.join_latency, Ok(()))
    }

    fn leave(&self, topic: TopicId) -> PendingOp {
        let call = SwarmCall::Leave { topic };
        let result = {
            let mut state = self.lock();
            state.calls.push(call);
            state.topics.remove(&topic);
            if state.fail_leaves && !state.destroyed {
                Err(ProviderError::Rejected(format!("leave {topic}")))
            } else {
                Ok(())
            }
        };
        trace!(%topic, "memory swarm leave");
        self.settle(call, self.leave_latency, result)
    }

    fn topics(&self) -> Vec<TopicStatus> {
        self.lock()
            .topics
            .iter()
            .map(|(topic, options)| TopicStatus {
                topic: *topic,
                is_server: options.server,
                is_client: options.client,
            })
            .collect()
    }

    fn destroy(&self) -> PendingOp {
        {
            let mut state = self.lock();
            state.calls.push(SwarmCall::Destroy);
            state.topics.clear();
            state.destroyed = true;
        }
        self.settle(SwarmCall::Destroy, Duration::ZERO, Ok(()))
    }
}
