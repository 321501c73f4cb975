//! Simulator errors

use sortarm_core::config::ConfigError;
use sortarm_core::motion::HomingError;

/// Errors that stop the simulator before or during a run
#[derive(Debug, thiserror::Error)]
pub enum SimError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid configuration: {0}")]
    Config(ConfigError),

    #[error("unknown object '{0}' (expected red, green, blue, yellow or none)")]
    Object(String),

    #[error("bad press '{0}' (expected button@ms or button@ms:hold_ms)")]
    Press(String),

    #[error("more than {0} {1} requested")]
    Capacity(usize, &'static str),

    #[error("homing failed: {0:?}")]
    Homing(HomingError),
}
