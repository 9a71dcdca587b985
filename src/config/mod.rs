//! The `config` module loads the application settings.
//!
//! Values come from an optional TOML/JSON/YAML file (`config/default` unless
//! another base path is given) and from `SWARM_`-prefixed environment
//! variables, with `__` separating nested keys, e.g.
//! `SWARM_MANAGER__SEQUENCING=unordered`. Anything left unset falls back to
//! `Settings::default()`.

mod settings;

use crate::config::settings::PartialSettings;
use config::{Config, ConfigError, Environment, File};

pub use settings::{DemoSettings, LoggingSettings, ManagerSettings, Settings};

/// Default base path of the configuration file, without extension.
pub const DEFAULT_CONFIG_PATH: &str = "config/default";

/// Loads the configuration from the file at `path` (extension optional) and
/// environment variables, merged over the defaults.
pub fn load_config_from(path: &str) -> Result<Settings, ConfigError> {
    let builder = Config::builder()
        .add_source(File::with_name(path).required(false))
        .add_source(
            Environment::with_prefix("SWARM")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

    let config = builder.build()?;

    // Try to deserialize what is available
    let partial: PartialSettings = config.try_deserialize()?;

    // Merge with defaults
    let default = Settings::default();

    Ok(Settings {
        manager: ManagerSettings {
            sequencing: partial
                .manager
                .as_ref()
                .and_then(|m| m.sequencing)
                .unwrap_or(default.manager.sequencing),
        },
        logging: LoggingSettings {
            level: partial
                .logging
                .as_ref()
                .and_then(|l| l.level.clone())
                .unwrap_or(default.logging.level),
        },
        demo: DemoSettings {
            latency_ms: partial
                .demo
                .as_ref()
                .and_then(|d| d.latency_ms)
                .unwrap_or(default.demo.latency_ms),
        },
    })
}
