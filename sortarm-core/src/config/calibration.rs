//! Arm calibration
//!
//! Every numeric constant of the arm in one place. Angles are degrees in
//! the reference frame established by homing; speeds are degrees per second.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::session::ConfigError;
use super::zone::HeightClass;
use crate::traits::Axis;

/// Numeric calibration of the arm
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Calibration {
    pub base_speed: i32,
    pub elbow_speed: i32,
    pub gripper_speed: i32,
    /// Base and elbow speed during emergency recovery
    pub emergency_speed: i32,

    /// Elbow angle that holds a gripped object in front of the sensor
    pub sensor_height: i32,
    /// Elbow angle for picking or dropping at ground level
    pub ground_height: i32,
    /// Elbow angle for picking or dropping on a raised platform
    pub elevated_height: i32,
    /// Elbow angle that clears every zone while the base rotates
    pub transit_height: i32,

    /// Largest base angle the cabling allows
    pub max_base_angle: i32,
    /// Distance from the limit switch to base angle zero
    pub base_switch_offset: i32,

    pub gripper_open: i32,
    /// A closed gripper below this angle is holding something
    pub grip_present_below: i32,
    /// A lifted gripper above this angle has lost its object
    pub slip_above: i32,

    /// Position error accepted as "reached"
    pub position_tolerance: i32,

    /// Poll interval while a motion is in progress
    pub motion_poll_ms: u32,
    /// Poll interval for menus and waits
    pub input_poll_ms: u32,
    /// Interrupt hold time that triggers emergency recovery
    pub emergency_hold_ms: u32,
    /// Input ignored for this long after an accepted press
    pub debounce_ms: u32,
    /// Resumes allowed for a single motion before giving up to the menu
    pub max_resumes: u8,

    /// Duty limit when homing the gripper, percent
    pub gripper_home_duty: u8,
    /// Duty limit when homing the elbow, percent
    pub elbow_home_duty: u8,
    /// Duty limit when closing on an object, percent
    pub grip_duty: u8,
}

impl Default for Calibration {
    fn default() -> Self {
        Self {
            base_speed: 60,
            elbow_speed: 60,
            gripper_speed: 200,
            emergency_speed: 30,
            sensor_height: 58,
            ground_height: 30,
            elevated_height: 55,
            transit_height: 58,
            max_base_angle: 260,
            base_switch_offset: 7,
            gripper_open: -90,
            grip_present_below: -5,
            slip_above: -10,
            position_tolerance: 5,
            motion_poll_ms: 50,
            input_poll_ms: 20,
            emergency_hold_ms: 2000,
            debounce_ms: 300,
            max_resumes: 16,
            gripper_home_duty: 50,
            elbow_home_duty: 20,
            grip_duty: 45,
        }
    }
}

impl Calibration {
    /// Normal speed of an axis
    pub const fn speed(&self, axis: Axis) -> i32 {
        match axis {
            Axis::Base => self.base_speed,
            Axis::Elbow => self.elbow_speed,
            Axis::Gripper => self.gripper_speed,
        }
    }

    /// Elbow angle for a height class
    pub const fn height(&self, class: HeightClass) -> i32 {
        match class {
            HeightClass::Ground => self.ground_height,
            HeightClass::Elevated => self.elevated_height,
        }
    }

    /// Whether the base may be commanded to `angle`
    pub const fn base_angle_safe(&self, angle: i32) -> bool {
        angle >= 0 && angle <= self.max_base_angle
    }

    /// Reject intervals that would keep a polling loop from advancing time
    pub fn validate(&self) -> Result<(), ConfigError> {
        let intervals = [
            ("motion_poll_ms", self.motion_poll_ms),
            ("input_poll_ms", self.input_poll_ms),
            ("debounce_ms", self.debounce_ms),
        ];
        match intervals.iter().find(|(_, ms)| *ms == 0) {
            Some((field, _)) => Err(ConfigError::ZeroInterval(*field)),
            None => Ok(()),
        }
    }

    /// Whether `position` is close enough to `target`
    pub const fn within_tolerance(&self, position: i32, target: i32) -> bool {
        (position - target).abs() <= self.position_tolerance
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_safe_base_range_is_inclusive() {
        let cal = Calibration::default();
        assert!(cal.base_angle_safe(0));
        assert!(cal.base_angle_safe(260));
        assert!(!cal.base_angle_safe(261));
        assert!(!cal.base_angle_safe(-1));
    }

    #[test]
    fn test_tolerance_window() {
        let cal = Calibration::default();
        assert!(cal.within_tolerance(95, 100));
        assert!(cal.within_tolerance(105, 100));
        assert!(!cal.within_tolerance(94, 100));
    }

    #[test]
    fn test_zero_intervals_rejected() {
        assert_eq!(Calibration::default().validate(), Ok(()));
        let cal = Calibration {
            input_poll_ms: 0,
            ..Calibration::default()
        };
        assert_eq!(cal.validate(), Err(ConfigError::ZeroInterval("input_poll_ms")));
        let cal = Calibration {
            debounce_ms: 0,
            ..Calibration::default()
        };
        assert_eq!(cal.validate(), Err(ConfigError::ZeroInterval("debounce_ms")));
    }

    #[test]
    fn test_height_classes() {
        let cal = Calibration::default();
        assert_eq!(cal.height(HeightClass::Ground), 30);
        assert_eq!(cal.height(HeightClass::Elevated), 55);
    }
}
