//! Actuator driver trait
//!
//! Each axis of the arm is a servo motor with a built-in encoder. Angles are
//! in degrees relative to the reference set during homing; speeds are in
//! degrees per second.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Arm axes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Axis {
    /// Rotating base
    Base,
    /// Vertical elbow lifting the gripper
    Elbow,
    /// Gripper jaws (closing is the positive direction)
    Gripper,
}

impl Axis {
    /// All axes, in homing order
    pub const ALL: [Axis; 3] = [Axis::Gripper, Axis::Elbow, Axis::Base];

    pub const fn name(self) -> &'static str {
        match self {
            Axis::Base => "base",
            Axis::Elbow => "elbow",
            Axis::Gripper => "gripper",
        }
    }

    pub const fn index(self) -> usize {
        match self {
            Axis::Base => 0,
            Axis::Elbow => 1,
            Axis::Gripper => 2,
        }
    }
}

/// What the motor does once a seek completes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StopMode {
    /// Let the motor spin freely
    Coast,
    /// Passive braking
    Brake,
    /// Actively hold the position
    #[default]
    Hold,
}

/// Servo motor driver
///
/// All commands return immediately; completion is observed by polling
/// `position()` and `is_stalled()`.
pub trait ActuatorDriver {
    /// Start moving towards `target` at `speed`
    fn seek_target(&mut self, speed: i32, target: i32, then: StopMode);

    /// Run continuously at `speed` (sign gives direction), limiting the
    /// motor duty cycle to `duty_limit` percent
    fn run(&mut self, speed: i32, duty_limit: u8);

    /// Current angle
    fn position(&self) -> i32;

    /// Whether the motor is being blocked
    fn is_stalled(&self) -> bool;

    /// Stop and actively hold the current angle
    fn hold(&mut self);

    /// Redefine the current angle as `value`
    fn reset_reference(&mut self, value: i32);
}
