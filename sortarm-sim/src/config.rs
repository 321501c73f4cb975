//! Configuration loading
//!
//! Reads the session, calibration and simulation settings from a TOML file,
//! falling back to the embedded default configuration.

use std::path::Path;

use serde::Deserialize;
use sortarm_core::classify::Color;
use sortarm_core::config::{Calibration, SessionConfig};
use sortarm_core::traits::Buttons;
use sortarm_drivers::input::DEFAULT_HOLD_MS;
use sortarm_drivers::{ScriptedPress, SimObject};
use tracing::info;

use crate::error::SimError;

/// Built-in configuration
const DEFAULT_CONFIG: &str = include_str!("../sortarm.toml");

/// Simulated run length when neither the file nor the command line sets one
pub const DEFAULT_MAX_TIME_MS: u64 = 120_000;

/// Simulation settings
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SimSection {
    /// Blocks queued at the pickup station, by color name
    pub objects: Vec<String>,
    /// Scripted presses, `button@ms[:hold_ms]`
    pub presses: Vec<String>,
    pub max_time_ms: Option<u64>,
}

/// Contents of a configuration file
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub session: SessionConfig,
    pub calibration: Calibration,
    pub sim: SimSection,
}

impl SimConfig {
    /// Load `path`, or the built-in configuration
    pub fn load(path: Option<&Path>) -> Result<Self, SimError> {
        let config = match path {
            Some(path) => {
                info!("Loading configuration from {}", path.display());
                let text = std::fs::read_to_string(path).map_err(|source| SimError::Io {
                    path: path.display().to_string(),
                    source,
                })?;
                Self::parse(&text)?
            }
            None => {
                info!("Using built-in configuration");
                Self::parse(DEFAULT_CONFIG)?
            }
        };
        config
            .session
            .validate(&config.calibration)
            .map_err(SimError::Config)?;
        Ok(config)
    }

    pub fn parse(text: &str) -> Result<Self, SimError> {
        Ok(toml::from_str(text)?)
    }
}

/// Parse a block description: a color name, or `none` for an unreadable one
///
/// A trailing `~` makes the block slippery.
pub fn parse_object(spec: &str) -> Result<SimObject, SimError> {
    let (name, slippery) = match spec.trim().strip_suffix('~') {
        Some(name) => (name, true),
        None => (spec.trim(), false),
    };
    let object = match name.to_ascii_lowercase().as_str() {
        "red" => SimObject::typical(Color::Red),
        "green" => SimObject::typical(Color::Green),
        "blue" => SimObject::typical(Color::Blue),
        "yellow" => SimObject::typical(Color::Yellow),
        "none" | "unknown" => SimObject::unreadable(),
        _ => return Err(SimError::Object(spec.to_string())),
    };
    Ok(if slippery { object.slippery() } else { object })
}

/// Parse `button@ms` or `button@ms:hold_ms`
pub fn parse_press(spec: &str) -> Result<ScriptedPress, SimError> {
    let bad = || SimError::Press(spec.to_string());

    let (button, timing) = spec.trim().split_once('@').ok_or_else(bad)?;
    let buttons = match button.to_ascii_lowercase().as_str() {
        "up" => Buttons::UP,
        "down" => Buttons::DOWN,
        "left" => Buttons::LEFT,
        "right" => Buttons::RIGHT,
        "center" => Buttons::CENTER,
        _ => return Err(bad()),
    };
    let (at, hold) = match timing.split_once(':') {
        Some((at, hold)) => (at, hold.parse().map_err(|_| bad())?),
        None => (timing, DEFAULT_HOLD_MS),
    };
    let at_ms = at.parse().map_err(|_| bad())?;
    Ok(ScriptedPress::new(at_ms, buttons, hold))
}

#[cfg(test)]
mod tests {
    use super::*;
    use sortarm_core::config::HeightClass;

    #[test]
    fn test_default_config_is_valid() {
        let config = SimConfig::parse(DEFAULT_CONFIG).unwrap();
        assert_eq!(config.session.validate(&config.calibration), Ok(()));
        assert_eq!(config.session.zones.len(), 4);
        assert_eq!(config.session.zones.get(1).unwrap().color, Some(Color::Red));
        assert_eq!(config.sim.objects.len(), 4);
    }

    #[test]
    fn test_missing_sections_use_defaults() {
        let config = SimConfig::parse("[calibration]\nbase_speed = 40\n").unwrap();
        assert_eq!(config.calibration.base_speed, 40);
        assert_eq!(config.calibration.elbow_speed, Calibration::default().elbow_speed);
        assert_eq!(config.session, SessionConfig::default());
        assert!(config.sim.objects.is_empty());
    }

    #[test]
    fn test_elevated_zone() {
        let text = r#"
            [session.zones]
            pickup = 2

            [[session.zones.entries]]
            angle = 20
            height = "elevated"
            color = "yellow"

            [[session.zones.entries]]
            angle = 90

            [[session.zones.entries]]
            angle = 180
        "#;
        let config = SimConfig::parse(text).unwrap();
        let zone = config.session.zones.get(0).unwrap();
        assert_eq!(zone.height, HeightClass::Elevated);
        assert_eq!(zone.color, Some(Color::Yellow));
        assert_eq!(config.session.zones.pickup_index(), 2);
    }

    #[test]
    fn test_bad_toml() {
        assert!(matches!(SimConfig::parse("[session"), Err(SimError::Parse(_))));
    }

    #[test]
    fn test_parse_press() {
        assert_eq!(
            parse_press("center@5000").unwrap(),
            ScriptedPress::new(5000, Buttons::CENTER, DEFAULT_HOLD_MS)
        );
        assert_eq!(
            parse_press("Left@9000:2500").unwrap(),
            ScriptedPress::new(9000, Buttons::LEFT, 2500)
        );
        assert!(parse_press("center").is_err());
        assert!(parse_press("middle@10").is_err());
        assert!(parse_press("up@soon").is_err());
    }

    #[test]
    fn test_parse_object() {
        assert_eq!(parse_object("red").unwrap(), SimObject::typical(Color::Red));
        assert_eq!(parse_object("none").unwrap(), SimObject::unreadable());
        assert!(parse_object("blue~").unwrap().slippery);
        assert!(parse_object("purple").is_err());
    }
}
