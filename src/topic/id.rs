use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::utils::error::TopicParseError;

/// Length in bytes of a topic identifier.
pub const TOPIC_LEN: usize = 32;

/// A fixed-length swarm topic, usually a discovery key.
///
/// Equality, hashing and ordering are over the raw bytes, so a topic built
/// from bytes and one parsed from hex compare equal.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TopicId([u8; TOPIC_LEN]);

impl TopicId {
    pub const fn new(bytes: [u8; TOPIC_LEN]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; TOPIC_LEN] {
        &self.0
    }

    /// Lowercase hex form, 64 characters.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl From<[u8; TOPIC_LEN]> for TopicId {
    fn from(bytes: [u8; TOPIC_LEN]) -> Self {
        Self(bytes)
    }
}

impl From<&[u8; TOPIC_LEN]> for TopicId {
    fn from(bytes: &[u8; TOPIC_LEN]) -> Self {
        Self(*bytes)
    }
}

impl From<&TopicId> for TopicId {
    fn from(topic: &TopicId) -> Self {
        *topic
    }
}

impl TryFrom<&[u8]> for TopicId {
    type Error = TopicParseError;

    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        let bytes: [u8; TOPIC_LEN] = bytes
            .try_into()
            .map_err(|_| TopicParseError::InvalidLength(bytes.len()))?;
        Ok(Self(bytes))
    }
}

impl FromStr for TopicId {
    type Err = TopicParseError;

    /// Parses a hex topic. Upper- and lowercase digits are both accepted.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = hex::decode(s)?;
        Self::try_from(bytes.as_slice())
    }
}

impl AsRef<[u8]> for TopicId {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Display for TopicId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for TopicId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TopicId({})", self.to_hex())
    }
}

impl Serialize for TopicId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for TopicId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
