//! The `error` module defines the error types used within `swarm_manager`.
//!
//! `MembershipError` is what callers of the `Manager` see. The two precondition
//! failures (`NotServed`, `NotRequested`) are raised before any network effect.
//! Provider failures are passed through unchanged and never retried.

use thiserror::Error;

use crate::topic::TopicId;

/// Errors returned by `Manager` operations.
#[derive(Debug, Error)]
pub enum MembershipError {
    /// `unserve` was called on a topic with no outstanding serve intent.
    #[error("cannot unserve non-served key {0}")]
    NotServed(TopicId),

    /// `unrequest` was called on a topic with no outstanding request intent.
    #[error("cannot unrequest non-requested key {0}")]
    NotRequested(TopicId),

    /// The swarm provider failed an operation this call awaited.
    #[error("swarm provider error: {0}")]
    Provider(#[from] ProviderError),

    /// A queued operation was dropped before it reported completion.
    #[error("swarm operation for {0} was aborted before completing")]
    Aborted(TopicId),
}

/// Errors reported by a `SwarmProvider`.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProviderError {
    /// The provider refused or failed the operation.
    #[error("operation rejected: {0}")]
    Rejected(String),
}

/// Errors from parsing a topic identifier.
#[derive(Debug, Error, PartialEq)]
pub enum TopicParseError {
    #[error("topic must be 32 bytes, got {0}")]
    InvalidLength(usize),

    #[error("invalid hex topic: {0}")]
    InvalidHex(#[from] hex::FromHexError),
}
