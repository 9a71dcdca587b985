//! Manager engine
//!
//! This module contains the topic membership manager, responsible for:
//! - counting serve and request intents per topic
//! - turning counter zero-crossings into provider joins and leaves
//! - sequencing a serve-to-request downgrade so the topic is not dropped
//!   while a request is still outstanding
//! - answering key queries from the provider's live topic set
//!
//! Concurrency and usage notes:
//! - Intent changes are synchronous: the counter update and the issuing of
//!   any provider operation happen before the call returns. `unserve` and
//!   `unrequest` return a future that only waits for completion.
//! - The counter lock is never held across an `.await`.
//! - Provider operations complete on spawned Tokio tasks, so the manager must
//!   be used from inside a Tokio runtime.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use futures::FutureExt;
use futures::future::{self, BoxFuture};
use tokio::sync::OnceCell;
use tracing::{debug, info};

use super::dispatch::{Dispatcher, Op, Sequencing};
use crate::config::ManagerSettings;
use crate::provider::{JoinOptions, SwarmProvider, TopicStatus};
use crate::topic::{Counters, Role, TopicId};
use crate::utils::error::{MembershipError, ProviderError};

/// Completion of an `unserve` or `unrequest`.
///
/// The intent is released as soon as the method returns; dropping this future
/// only gives up on observing the provider's result.
pub type Pending = BoxFuture<'static, Result<(), MembershipError>>;

/// Reference-counted topic membership on top of a `SwarmProvider`.
pub struct Manager<P: SwarmProvider> {
    provider: Arc<P>,
    counters: Mutex<HashMap<TopicId, Counters>>,
    dispatcher: Dispatcher<P>,
    closed: OnceCell<Result<(), ProviderError>>,
}

impl<P: SwarmProvider> Manager<P> {
    pub fn new(provider: Arc<P>) -> Self {
        Self::with_settings(provider, &ManagerSettings::default())
    }

    pub fn with_settings(provider: Arc<P>, settings: &ManagerSettings) -> Self {
        Self {
            dispatcher: Dispatcher::new(provider.clone(), settings.sequencing),
            provider,
            counters: Mutex::new(HashMap::new()),
            closed: OnceCell::new(),
        }
    }

    pub fn provider(&self) -> &Arc<P> {
        &self.provider
    }

    pub fn sequencing(&self) -> Sequencing {
        self.dispatcher.sequencing()
    }

    /// Announce as a host of `topic`. The first outstanding serve joins the
    /// topic as server and client; the join completes in the background.
    pub fn serve(&self, topic: impl Into<TopicId>) {
        let topic = topic.into();
        let mut counters = self.counters();
        let entry = counters.entry(topic).or_default();
        entry.serve += 1;
        debug!(%topic, serve = entry.serve, request = entry.request, "serve");

        if entry.serve == 1 {
            self.dispatcher
                .submit(topic, Op::Join(JoinOptions::SERVER_AND_CLIENT))
                .detach();
        }
    }

    /// Release one serve intent on `topic`.
    ///
    /// Fails with `NotServed` if there is none. Releasing the last one leaves
    /// the topic and, if requests are still outstanding, rejoins it as a
    /// client before the leave is awaited, so the topic never drops out of
    /// the provider. The returned future waits for the leave and for the
    /// rejoin to be issued, not for the rejoin to complete.
    pub fn unserve(&self, topic: impl Into<TopicId>) -> Pending {
        let topic = topic.into();
        let (leave, downgrade) = {
            let mut counters = self.counters();
            let Some(entry) = counters.get_mut(&topic).filter(|c| c.serve > 0) else {
                return future::ready(Err(MembershipError::NotServed(topic))).boxed();
            };
            entry.serve -= 1;
            debug!(%topic, serve = entry.serve, request = entry.request, "unserve");

            if entry.serve > 0 {
                return future::ready(Ok(())).boxed();
            }

            if entry.request > 0 {
                let (leave, downgrade) = self.dispatcher.submit_downgrade(topic);
                (leave, Some(downgrade))
            } else {
                (self.dispatcher.submit(topic, Op::Leave), None)
            }
        };

        async move {
            let result = leave.completed().await;
            if let Some(mut downgrade) = downgrade {
                downgrade.issued().await;
                downgrade.detach();
            }
            result
        }
        .boxed()
    }

    /// Look for hosts of `topic` without announcing. Joins as a client only
    /// when this is the first request and the topic is not already served.
    pub fn request(&self, topic: impl Into<TopicId>) {
        let topic = topic.into();
        let mut counters = self.counters();
        let entry = counters.entry(topic).or_default();
        entry.request += 1;
        debug!(%topic, serve = entry.serve, request = entry.request, "request");

        // serving already implies client membership
        if entry.request == 1 && entry.serve == 0 {
            self.dispatcher
                .submit(topic, Op::Join(JoinOptions::CLIENT_ONLY))
                .detach();
        }
    }

    /// Release one request intent on `topic`.
    ///
    /// Fails with `NotRequested` if there is none. Releasing the last one on a
    /// topic that is not served leaves it; the returned future waits for the
    /// leave to complete.
    pub fn unrequest(&self, topic: impl Into<TopicId>) -> Pending {
        let topic = topic.into();
        let leave = {
            let mut counters = self.counters();
            let Some(entry) = counters.get_mut(&topic).filter(|c| c.request > 0) else {
                return future::ready(Err(MembershipError::NotRequested(topic))).boxed();
            };
            entry.request -= 1;
            debug!(%topic, serve = entry.serve, request = entry.request, "unrequest");

            if entry.request > 0 || entry.serve > 0 {
                return future::ready(Ok(())).boxed();
            }
            self.dispatcher.submit(topic, Op::Leave)
        };

        leave.completed().boxed()
    }

    /// Topics the provider currently announces as a server.
    pub fn served_keys(&self) -> Vec<TopicId> {
        self.live_keys(|status| status.is_server)
    }

    /// Topics the provider currently joins as a client only.
    pub fn requested_keys(&self) -> Vec<TopicId> {
        self.live_keys(|status| status.is_client && !status.is_server)
    }

    /// Every topic the provider currently knows, whatever its role.
    pub fn keys(&self) -> Vec<TopicId> {
        self.live_keys(|_| true)
    }

    /// Role called for by the counters. May run ahead of the provider while
    /// an operation is in flight.
    pub fn role(&self, topic: impl Into<TopicId>) -> Role {
        self.counts(topic.into()).role()
    }

    pub fn serve_count(&self, topic: impl Into<TopicId>) -> usize {
        self.counts(topic.into()).serve
    }

    pub fn request_count(&self, topic: impl Into<TopicId>) -> usize {
        self.counts(topic.into()).request
    }

    /// Number of topics with a provider operation still in flight under
    /// serialized sequencing. Always 0 when unordered.
    pub fn pending_topics(&self) -> usize {
        self.dispatcher.busy_topics()
    }

    /// Tear down the provider, whatever intents are outstanding.
    ///
    /// Only the first call destroys the provider; later and concurrent calls
    /// wait for and return that same result.
    pub async fn close(&self) -> Result<(), MembershipError> {
        let result = self
            .closed
            .get_or_init(|| async {
                info!(pending = self.pending_topics(), "closing swarm manager");
                self.provider.destroy().await
            })
            .await;
        result.clone().map_err(MembershipError::from)
    }

    pub fn is_closed(&self) -> bool {
        self.closed.initialized()
    }

    fn counters(&self) -> MutexGuard<'_, HashMap<TopicId, Counters>> {
        self.counters.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn counts(&self, topic: TopicId) -> Counters {
        self.counters().get(&topic).copied().unwrap_or_default()
    }

    fn live_keys(&self, keep: impl Fn(&TopicStatus) -> bool) -> Vec<TopicId> {
        self.provider
            .topics()
            .into_iter()
            .filter(|status| keep(status))
            .map(|status| status.topic)
            .collect()
    }
}

impl<P: SwarmProvider> std::fmt::Debug for Manager<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Manager")
            .field("sequencing", &self.sequencing())
            .field(
                "active_topics",
                &self.counters().values().filter(|c| !c.is_idle()).count(),
            )
            .field("closed", &self.is_closed())
            .finish()
    }
}
