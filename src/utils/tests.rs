use super::logging;
use super::{MembershipError, ProviderError, TopicParseError};
use crate::topic::TopicId;

#[test]
fn logging_init_accepts_levels() {
    // Should not panic
    logging::init("info");
    logging::init("debug");
    logging::init("warn");
    logging::init("verbose");
}

#[test]
fn test_parse_level_accepts_tracing_names() {
    assert_eq!(logging::parse_level("WARN"), Some(tracing::Level::WARN));
    assert_eq!(logging::parse_level(" trace "), Some(tracing::Level::TRACE));
    assert_eq!(logging::parse_level("verbose"), None);
}

#[test]
fn test_error_messages_name_the_topic() {
    let topic = TopicId::from([0xaa; 32]);

    let err = MembershipError::NotServed(topic);
    assert_eq!(
        err.to_string(),
        format!("cannot unserve non-served key {}", "a".repeat(64))
    );

    let err = MembershipError::NotRequested(topic);
    assert!(err.to_string().starts_with("cannot unrequest non-requested key"));
}

#[test]
fn test_provider_error_converts_into_membership_error() {
    let err: MembershipError = ProviderError::Rejected("leave".into()).into();
    assert!(matches!(err, MembershipError::Provider(ProviderError::Rejected(_))));
    assert_eq!(err.to_string(), "swarm provider error: operation rejected: leave");
}

#[test]
fn test_topic_parse_error_from_hex() {
    let err: TopicParseError = hex::FromHexError::OddLength.into();
    assert!(matches!(err, TopicParseError::InvalidHex(_)));
}
