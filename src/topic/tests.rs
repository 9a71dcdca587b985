use std::collections::HashMap;

use super::{Counters, Role, TopicId};
use crate::utils::error::TopicParseError;

#[test]
fn test_hex_and_bytes_are_the_same_key() {
    let from_hex: TopicId = "ab".repeat(32).parse().unwrap();
    let from_bytes = TopicId::from([0xab; 32]);
    assert_eq!(from_hex, from_bytes);

    let mut map = HashMap::new();
    map.insert(from_hex, 1);
    assert_eq!(map.get(&from_bytes), Some(&1));
}

#[test]
fn test_uppercase_hex_canonicalizes() {
    let upper: TopicId = "AB".repeat(32).parse().unwrap();
    assert_eq!(upper.to_string(), "ab".repeat(32));
}

#[test]
fn test_from_slice() {
    let bytes = vec![7u8; 32];
    let topic = TopicId::try_from(bytes.as_slice()).unwrap();
    assert_eq!(topic.as_bytes(), &[7u8; 32]);

    let err = TopicId::try_from(&bytes[..31]).unwrap_err();
    assert_eq!(err, TopicParseError::InvalidLength(31));
}

#[test]
fn test_parse_rejects_bad_input() {
    assert_eq!(
        "aa".parse::<TopicId>().unwrap_err(),
        TopicParseError::InvalidLength(1)
    );
    assert!(matches!(
        "zz".repeat(32).parse::<TopicId>(),
        Err(TopicParseError::InvalidHex(_))
    ));
}

#[test]
fn test_debug_shows_hex() {
    let topic = TopicId::from([0u8; 32]);
    assert_eq!(format!("{topic:?}"), format!("TopicId({})", "0".repeat(64)));
}

#[test]
fn test_serde_uses_hex_string() {
    let topic = TopicId::from([0xbb; 32]);
    let json = serde_json::to_string(&topic).unwrap();
    assert_eq!(json, format!("\"{}\"", "b".repeat(64)));

    let parsed: TopicId = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, topic);

    assert!(serde_json::from_str::<TopicId>("\"nope\"").is_err());
}

#[test]
fn test_counters_role() {
    assert_eq!(Counters::default().role(), Role::Absent);
    assert!(Counters::default().is_idle());

    let client = Counters { serve: 0, request: 2 };
    assert_eq!(client.role(), Role::ClientOnly);

    let server = Counters { serve: 1, request: 0 };
    assert_eq!(server.role(), Role::ServerAndClient);

    let both = Counters { serve: 1, request: 3 };
    assert_eq!(both.role(), Role::ServerAndClient);
    assert!(!both.is_idle());
}
