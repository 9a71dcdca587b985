use std::time::Duration;

use super::{JoinOptions, MemorySwarm, SwarmCall, SwarmProvider, TopicStatus};
use crate::topic::TopicId;
use crate::utils::error::ProviderError;

fn topic(byte: u8) -> TopicId {
    TopicId::from([byte; 32])
}

#[tokio::test]
async fn test_join_is_visible_before_completion() {
    let swarm = MemorySwarm::with_latency(Duration::from_millis(20));

    let pending = swarm.join(topic(1), JoinOptions::CLIENT_ONLY);
    assert_eq!(
        swarm.topics(),
        vec![TopicStatus {
            topic: topic(1),
            is_server: false,
            is_client: true,
        }]
    );
    assert!(swarm.completions().is_empty());

    pending.await.unwrap();
    assert_eq!(swarm.completions().len(), 1);
}

#[tokio::test]
async fn test_join_upgrades_roles() {
    let swarm = MemorySwarm::new();
    swarm.join(topic(1), JoinOptions::CLIENT_ONLY).await.unwrap();
    swarm
        .join(topic(1), JoinOptions::SERVER_AND_CLIENT)
        .await
        .unwrap();
    // a subset join does not downgrade
    swarm.join(topic(1), JoinOptions::CLIENT_ONLY).await.unwrap();

    let topics = swarm.topics();
    assert_eq!(topics.len(), 1);
    assert!(topics[0].is_server);
    assert!(topics[0].is_client);
}

#[tokio::test]
async fn test_leave_unknown_topic_is_noop() {
    let swarm = MemorySwarm::new();
    swarm.leave(topic(9)).await.unwrap();
    assert!(swarm.topics().is_empty());
    assert_eq!(swarm.calls(), vec![SwarmCall::Leave { topic: topic(9) }]);
}

#[tokio::test]
async fn test_topics_are_listed_in_order() {
    let swarm = MemorySwarm::new();
    let _ = swarm.join(topic(3), JoinOptions::CLIENT_ONLY);
    let _ = swarm.join(topic(1), JoinOptions::SERVER_AND_CLIENT);
    let _ = swarm.join(topic(2), JoinOptions::CLIENT_ONLY);

    let listed: Vec<_> = swarm.topics().iter().map(|t| t.topic).collect();
    assert_eq!(listed, vec![topic(1), topic(2), topic(3)]);
}

#[tokio::test]
async fn test_failing_leave_still_removes_topic() {
    let swarm = MemorySwarm::new();
    let _ = swarm.join(topic(1), JoinOptions::CLIENT_ONLY);
    swarm.fail_leaves(true);

    let result = swarm.leave(topic(1)).await;
    assert!(matches!(result, Err(ProviderError::Rejected(_))));
    assert!(swarm.topics().is_empty());
}

#[tokio::test]
async fn test_destroy_clears_and_ignores_later_joins() {
    let swarm = MemorySwarm::new();
    let _ = swarm.join(topic(1), JoinOptions::SERVER_AND_CLIENT);

    swarm.destroy().await.unwrap();
    assert!(swarm.is_destroyed());
    assert!(swarm.topics().is_empty());

    swarm.join(topic(2), JoinOptions::CLIENT_ONLY).await.unwrap();
    assert!(swarm.topics().is_empty());
}

#[tokio::test]
async fn test_leave_latency_reorders_completions() {
    let swarm =
        MemorySwarm::with_latency(Duration::from_millis(5)).leave_latency(Duration::from_millis(40));

    let leave = swarm.leave(topic(1));
    let join = swarm.join(topic(1), JoinOptions::CLIENT_ONLY);
    let (left, joined) = futures::future::join(leave, join).await;
    left.unwrap();
    joined.unwrap();

    assert_eq!(
        swarm.completions(),
        vec![
            SwarmCall::Join {
                topic: topic(1),
                options: JoinOptions::CLIENT_ONLY,
            },
            SwarmCall::Leave { topic: topic(1) },
        ]
    );
}
