use serde::Serialize;

/// Outstanding intents for one topic.
///
/// A topic with no entry in the manager's map behaves exactly like one whose
/// entry is `Counters::default()`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Counters {
    pub serve: usize,
    pub request: usize,
}

impl Counters {
    /// The network role these counts call for.
    pub fn role(&self) -> Role {
        if self.serve > 0 {
            Role::ServerAndClient
        } else if self.request > 0 {
            Role::ClientOnly
        } else {
            Role::Absent
        }
    }

    pub fn is_idle(&self) -> bool {
        self.serve == 0 && self.request == 0
    }
}

/// Network role derived from a topic's counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Not joined.
    Absent,
    /// Joined as a client only: look up hosts, do not announce.
    ClientOnly,
    /// Joined as server and client.
    ServerAndClient,
}
