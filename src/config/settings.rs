use serde::Deserialize;

use crate::manager::Sequencing;

/// Top-level configuration settings for the application.
///
/// Includes settings for the manager, logging and the demo swarm used by the CLI.
#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    pub manager: ManagerSettings,
    pub logging: LoggingSettings,
    pub demo: DemoSettings,
}

/// Configuration settings for the membership manager.
#[derive(Debug, Default, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct ManagerSettings {
    /// Ordering of join/leave operations on the same topic.
    pub sequencing: Sequencing,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingSettings {
    pub level: String,
}

/// Settings for the in-memory swarm the CLI runs against.
#[derive(Debug, Deserialize, Clone)]
pub struct DemoSettings {
    /// Simulated completion latency of each join/leave, in milliseconds.
    pub latency_ms: u64,
}

/// Partial configuration settings loaded from files or environment.
///
/// Allows partial specification of settings. Missing values can be filled using defaults.
#[derive(Debug, Deserialize)]
pub struct PartialSettings {
    pub manager: Option<PartialManagerSettings>,
    pub logging: Option<PartialLoggingSettings>,
    pub demo: Option<PartialDemoSettings>,
}

#[derive(Debug, Deserialize)]
pub struct PartialManagerSettings {
    pub sequencing: Option<Sequencing>,
}

#[derive(Debug, Deserialize)]
pub struct PartialLoggingSettings {
    pub level: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PartialDemoSettings {
    pub latency_ms: Option<u64>,
}

/// Provides default values for `Settings`.
impl Default for Settings {
    fn default() -> Self {
        Self {
            manager: ManagerSettings::default(),
            logging: LoggingSettings {
                level: "info".to_string(),
            },
            demo: DemoSettings { latency_ms: 10 },
        }
    }
}
