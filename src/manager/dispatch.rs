//! Per-topic dispatch of provider operations
//!
//! Every join and leave the manager wants goes through a `Dispatcher`, which
//! hands it to the provider according to the configured `Sequencing`:
//!
//! - `Serialized`: one in-flight operation per topic. An operation on an idle
//!   topic is issued to the provider immediately; otherwise it is chained
//!   behind the topic's tail and issued once its predecessor has completed.
//!   Completions therefore happen in issuance order. The leave and
//!   client-only join of a downgrade travel as one unit: both are issued back
//!   to back and the next operation waits for the pair.
//! - `Unordered`: every operation is issued immediately and completions may
//!   interleave in any order.
//!
//! Completion is always observed on a spawned Tokio task, so the dispatcher
//! must be used from inside a runtime. A `Ticket` lets the caller wait for
//! issuance, wait for completion, or walk away.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use futures::FutureExt;
use futures::future::{BoxFuture, Shared, join_all};
use serde::{Deserialize, Serialize};
use tokio::sync::oneshot;
use tracing::{debug, warn};

use crate::provider::{JoinOptions, PendingOp, SwarmProvider};
use crate::topic::TopicId;
use crate::utils::error::{MembershipError, ProviderError};

/// How join/leave operations on the same topic are ordered.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Sequencing {
    /// Queue operations per topic so they complete in issuance order.
    #[default]
    Serialized,
    /// Issue every operation immediately; completions may reorder.
    Unordered,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Op {
    Join(JoinOptions),
    Leave,
}

/// Handle on one dispatched operation.
#[derive(Debug)]
pub(crate) struct Ticket {
    topic: TopicId,
    issued: Option<oneshot::Receiver<()>>,
    done: oneshot::Receiver<Result<(), ProviderError>>,
}

impl Ticket {
    /// Resolves once the operation has been handed to the provider.
    pub(crate) async fn issued(&mut self) {
        if let Some(issued) = self.issued.take() {
            // a dropped sender means the chain was torn down; nothing to wait for
            let _ = issued.await;
        }
    }

    /// Resolves with the provider's result for this operation.
    pub(crate) async fn completed(self) -> Result<(), MembershipError> {
        match self.done.await {
            Ok(result) => result.map_err(MembershipError::from),
            Err(_) => Err(MembershipError::Aborted(self.topic)),
        }
    }

    /// Let the operation finish in the background. Failures are logged.
    pub(crate) fn detach(self) {}
}

/// Sending half of a `Ticket`, carried until the operation is issued.
struct Slot {
    op: Op,
    issued: oneshot::Sender<()>,
    done: oneshot::Sender<Result<(), ProviderError>>,
}

/// An operation the provider has accepted and not yet completed.
struct InFlight {
    op: Op,
    pending: PendingOp,
    done: oneshot::Sender<Result<(), ProviderError>>,
}

fn slot(topic: TopicId, op: Op) -> (Slot, Ticket) {
    let (issued_tx, issued_rx) = oneshot::channel();
    let (done_tx, done_rx) = oneshot::channel();
    let slot = Slot {
        op,
        issued: issued_tx,
        done: done_tx,
    };
    let ticket = Ticket {
        topic,
        issued: Some(issued_rx),
        done: done_rx,
    };
    (slot, ticket)
}

type Tail = Shared<BoxFuture<'static, ()>>;

#[derive(Default)]
struct Queues {
    tails: HashMap<TopicId, (u64, Tail)>,
    next_seq: u64,
}

pub(crate) struct Dispatcher<P> {
    provider: Arc<P>,
    sequencing: Sequencing,
    queues: Arc<Mutex<Queues>>,
}

impl<P: SwarmProvider> Dispatcher<P> {
    pub(crate) fn new(provider: Arc<P>, sequencing: Sequencing) -> Self {
        Self {
            provider,
            sequencing,
            queues: Arc::new(Mutex::new(Queues::default())),
        }
    }

    pub(crate) fn sequencing(&self) -> Sequencing {
        self.sequencing
    }

    /// Dispatch `op` for `topic`.
    pub(crate) fn submit(&self, topic: TopicId, op: Op) -> Ticket {
        let (slot, ticket) = slot(topic, op);
        self.dispatch(topic, vec![slot]);
        ticket
    }

    /// Dispatch a leave immediately followed by a client-only join.
    ///
    /// The pair is one unit: both are issued back to back, so the provider
    /// never goes without the topic in between, and later operations on the
    /// topic wait until both have completed.
    pub(crate) fn submit_downgrade(&self, topic: TopicId) -> (Ticket, Ticket) {
        let (leave_slot, leave) = slot(topic, Op::Leave);
        let (join_slot, join) = slot(topic, Op::Join(JoinOptions::CLIENT_ONLY));
        self.dispatch(topic, vec![leave_slot, join_slot]);
        (leave, join)
    }

    fn dispatch(&self, topic: TopicId, slots: Vec<Slot>) {
        match self.sequencing {
            Sequencing::Unordered => {
                for in_flight in issue_all(&*self.provider, topic, slots) {
                    tokio::spawn(report(topic, in_flight));
                }
            }
            Sequencing::Serialized => self.enqueue(topic, slots),
        }
    }

    fn enqueue(&self, topic: TopicId, slots: Vec<Slot>) {
        // Held while issuing so a concurrent submit cannot slip between the
        // idle check and the tail insert.
        let mut queues = lock(&self.queues);
        let seq = queues.next_seq;
        queues.next_seq += 1;

        let previous = queues
            .tails
            .get(&topic)
            .map(|(_, tail)| tail.clone())
            .filter(|tail| tail.peek().is_none());

        let body = match previous {
            None => settle_all(topic, issue_all(&*self.provider, topic, slots)).boxed(),
            Some(previous) => {
                debug!(%topic, ops = slots.len(), "queued behind in-flight operation");
                let provider = self.provider.clone();
                async move {
                    previous.await;
                    settle_all(topic, issue_all(&*provider, topic, slots)).await;
                }
                .boxed()
            }
        };

        let queues_handle = self.queues.clone();
        let tail = async move {
            body.await;
            let mut queues = lock(&queues_handle);
            if queues.tails.get(&topic).is_some_and(|(s, _)| *s == seq) {
                queues.tails.remove(&topic);
            }
        }
        .boxed()
        .shared();

        queues.tails.insert(topic, (seq, tail.clone()));
        drop(queues);
        tokio::spawn(tail);
    }

    /// Number of topics with an operation still in flight.
    pub(crate) fn busy_topics(&self) -> usize {
        lock(&self.queues).tails.len()
    }
}

fn lock(queues: &Mutex<Queues>) -> MutexGuard<'_, Queues> {
    queues.lock().unwrap_or_else(PoisonError::into_inner)
}

fn issue<P: SwarmProvider>(provider: &P, topic: TopicId, op: Op) -> PendingOp {
    debug!(%topic, ?op, "issuing swarm operation");
    match op {
        Op::Join(options) => provider.join(topic, options),
        Op::Leave => provider.leave(topic),
    }
}

/// Issue every slot in order, without yielding in between.
fn issue_all<P: SwarmProvider>(
    provider: &P,
    topic: TopicId,
    slots: Vec<Slot>,
) -> Vec<InFlight> {
    slots
        .into_iter()
        .map(|slot| {
            let pending = issue(provider, topic, slot.op);
            let _ = slot.issued.send(());
            InFlight {
                op: slot.op,
                pending,
                done: slot.done,
            }
        })
        .collect()
}

async fn settle_all(topic: TopicId, in_flight: Vec<InFlight>) {
    join_all(in_flight.into_iter().map(|op| report(topic, op))).await;
}

async fn report(topic: TopicId, in_flight: InFlight) {
    let InFlight { op, pending, done } = in_flight;
    let result = pending.await;
    debug!(%topic, ?op, ok = result.is_ok(), "swarm operation settled");
    if let Err(Err(error)) = done.send(result) {
        warn!(%topic, ?op, %error, "background swarm operation failed");
    }
}
