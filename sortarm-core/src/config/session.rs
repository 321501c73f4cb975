//! Session configuration
//!
//! What the operator can change from the menu during a program run.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::calibration::Calibration;
use super::zone::{ZoneTable, MIN_ZONES};

/// Configuration validation errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Fewer than pickup plus two drop-off zones
    TooFewZones,
    /// More zones than the table holds
    TooManyZones,
    /// Pickup index does not name a zone
    PickupOutOfRange,
    /// Zone angle outside the base's safe range
    UnsafeZoneAngle(u8),
    /// A poll or debounce interval of zero, naming the calibration field
    ZeroInterval(&'static str),
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ConfigError::TooFewZones => write!(f, "at least {} zones are required", MIN_ZONES),
            ConfigError::TooManyZones => write!(f, "too many zones"),
            ConfigError::PickupOutOfRange => write!(f, "pickup index does not name a zone"),
            ConfigError::UnsafeZoneAngle(index) => {
                write!(f, "zone {} angle is outside the safe base range", index)
            }
            ConfigError::ZeroInterval(field) => write!(f, "{} must be greater than zero", field),
        }
    }
}

/// Robot variant features
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Capabilities {
    /// Zones can be set to ground or elevated height from the menu
    pub elevated_heights: bool,
    /// A long interrupt hold drops the object at the nearest zone
    pub emergency_recovery: bool,
    /// A countdown runs before the first cycle
    pub start_delay: bool,
}

impl Default for Capabilities {
    fn default() -> Self {
        Self {
            elevated_heights: true,
            emergency_recovery: true,
            start_delay: true,
        }
    }
}

/// Operator-editable session settings
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SessionConfig {
    /// Pause between sorting cycles
    pub wait_between_cycles_ms: u32,
    /// Countdown before the first cycle
    pub start_delay_ms: u32,
    pub zones: ZoneTable,
    pub capabilities: Capabilities,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            wait_between_cycles_ms: 3000,
            start_delay_ms: 0,
            zones: ZoneTable::default(),
            capabilities: Capabilities::default(),
        }
    }
}

impl SessionConfig {
    pub fn zone_count(&self) -> usize {
        self.zones.len()
    }

    /// Check the configuration against the arm's calibration
    pub fn validate(&self, calibration: &Calibration) -> Result<(), ConfigError> {
        calibration.validate()?;
        if self.zones.len() < MIN_ZONES {
            return Err(ConfigError::TooFewZones);
        }
        if self.zones.pickup_index() >= self.zones.len() {
            return Err(ConfigError::PickupOutOfRange);
        }
        for (index, zone) in self.zones.entries.iter().enumerate() {
            if !calibration.base_angle_safe(zone.angle) {
                return Err(ConfigError::UnsafeZoneAngle(index as u8));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Zone;

    #[test]
    fn test_default_is_valid() {
        let session = SessionConfig::default();
        assert_eq!(session.validate(&Calibration::default()), Ok(()));
        assert_eq!(session.zone_count(), 4);
    }

    #[test]
    fn test_two_zones_rejected() {
        let session = SessionConfig {
            zones: ZoneTable::new(0).with(Zone::ground(0)).with(Zone::ground(90)),
            ..SessionConfig::default()
        };
        assert_eq!(
            session.validate(&Calibration::default()),
            Err(ConfigError::TooFewZones)
        );
    }

    #[test]
    fn test_pickup_out_of_range_rejected() {
        let mut session = SessionConfig::default();
        session.zones.pickup = 4;
        assert_eq!(
            session.validate(&Calibration::default()),
            Err(ConfigError::PickupOutOfRange)
        );
    }

    #[test]
    fn test_zero_poll_interval_rejected() {
        let session = SessionConfig::default();
        let calibration = Calibration {
            motion_poll_ms: 0,
            ..Calibration::default()
        };
        assert_eq!(
            session.validate(&calibration),
            Err(ConfigError::ZeroInterval("motion_poll_ms"))
        );
    }

    #[test]
    fn test_unsafe_angle_reports_zone() {
        let mut session = SessionConfig::default();
        session.zones.get_mut(2).unwrap().angle = 300;
        assert_eq!(
            session.validate(&Calibration::default()),
            Err(ConfigError::UnsafeZoneAngle(2))
        );
    }
}
