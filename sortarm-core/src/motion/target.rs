//! Motion targets

use crate::config::{Calibration, ZoneTable};
use crate::traits::Axis;

/// Gripper angle at the closed stop, set during homing
pub const GRIPPER_CLOSED: i32 = 0;

/// Where an axis should go
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MotionTarget {
    /// Absolute angle
    Angle(i32),
    /// A zone: its base angle for the base, its height for the elbow
    Zone(usize),
}

impl MotionTarget {
    /// Resolve to an absolute angle for `axis`
    ///
    /// Returns `None` for an unknown zone or a zone target on the gripper.
    pub fn resolve(self, axis: Axis, zones: &ZoneTable, calibration: &Calibration) -> Option<i32> {
        match self {
            MotionTarget::Angle(angle) => Some(angle),
            MotionTarget::Zone(index) => {
                let zone = zones.get(index)?;
                match axis {
                    Axis::Base => Some(zone.angle),
                    Axis::Elbow => Some(calibration.height(zone.height)),
                    Axis::Gripper => None,
                }
            }
        }
    }
}

/// How a seek terminates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SeekKind {
    /// Done when the axis is within tolerance of the target
    Position,
    /// Gripper closing: done on stall or when the target is reached
    Grip,
}

/// A resolved motion command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SeekRequest {
    pub axis: Axis,
    pub target: i32,
    pub speed: i32,
    pub kind: SeekKind,
}

impl SeekRequest {
    pub const fn position(axis: Axis, target: i32, speed: i32) -> Self {
        Self {
            axis,
            target,
            speed,
            kind: SeekKind::Position,
        }
    }

    /// Close the gripper until it stalls on an object or shuts
    pub const fn grip(speed: i32) -> Self {
        Self {
            axis: Axis::Gripper,
            target: GRIPPER_CLOSED,
            speed,
            kind: SeekKind::Grip,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Zone;

    #[test]
    fn test_zone_resolves_per_axis() {
        let zones = ZoneTable::new(0)
            .with(Zone::ground(0))
            .with(Zone::elevated(120));
        let cal = Calibration::default();

        assert_eq!(MotionTarget::Zone(1).resolve(Axis::Base, &zones, &cal), Some(120));
        assert_eq!(MotionTarget::Zone(1).resolve(Axis::Elbow, &zones, &cal), Some(55));
        assert_eq!(MotionTarget::Zone(0).resolve(Axis::Elbow, &zones, &cal), Some(30));
        assert_eq!(MotionTarget::Zone(1).resolve(Axis::Gripper, &zones, &cal), None);
        assert_eq!(MotionTarget::Zone(7).resolve(Axis::Base, &zones, &cal), None);
    }

    #[test]
    fn test_angle_passes_through() {
        let zones = ZoneTable::default();
        let cal = Calibration::default();
        assert_eq!(MotionTarget::Angle(-90).resolve(Axis::Gripper, &zones, &cal), Some(-90));
    }
}
