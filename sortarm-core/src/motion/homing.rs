//! Homing
//!
//! Establishes the reference of each axis at program start, one axis at a
//! time: the gripper closes against its stop, the elbow lowers against its
//! stop, and the base turns back until the touch switch closes.

use embedded_hal::digital::InputPin;

use crate::traits::{ActuatorDriver, Axis, Platform};

use super::supervisor::Supervisor;
use super::target::{SeekRequest, GRIPPER_CLOSED};

/// Polls allowed for a seek to land exactly on its target
const FINISH_POLLS: u32 = 10;

/// Homing errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HomingError {
    /// The base limit switch could not be read
    LimitSwitch,
}

impl<P: Platform> Supervisor<P> {
    /// Home all axes
    ///
    /// Ends with the gripper open, the elbow at transit height and the base
    /// at angle zero.
    pub fn home(&mut self) -> Result<(), HomingError> {
        let cal = *self.calibration();

        self.show_homing(Axis::Gripper);
        self.run_until_stalled(Axis::Gripper, cal.gripper_speed, cal.gripper_home_duty);
        self.platform_mut()
            .actuator(Axis::Gripper)
            .reset_reference(GRIPPER_CLOSED);
        self.seek_direct(SeekRequest::position(
            Axis::Gripper,
            cal.gripper_open,
            cal.gripper_speed,
        ));

        self.show_homing(Axis::Elbow);
        self.run_until_stalled(Axis::Elbow, -cal.elbow_speed, cal.elbow_home_duty);
        self.platform_mut().actuator(Axis::Elbow).reset_reference(0);
        self.seek_direct(SeekRequest::position(
            Axis::Elbow,
            cal.transit_height,
            cal.elbow_speed,
        ));

        self.show_homing(Axis::Base);
        self.platform_mut()
            .actuator(Axis::Base)
            .run(-cal.base_speed, 100);
        loop {
            match self.platform_mut().limit_switch().is_high() {
                Ok(true) => break,
                Ok(false) => {}
                Err(_) => {
                    self.platform_mut().actuator(Axis::Base).hold();
                    log_error!("base limit switch read failed");
                    return Err(HomingError::LimitSwitch);
                }
            }
            self.pause_ms(cal.motion_poll_ms);
        }
        self.platform_mut().actuator(Axis::Base).hold();
        self.platform_mut().actuator(Axis::Base).reset_reference(0);
        self.seek_direct(SeekRequest::position(
            Axis::Base,
            cal.base_switch_offset,
            cal.base_speed,
        ));
        self.finish_seek(Axis::Base, cal.base_switch_offset);
        let base = self.platform_mut().actuator(Axis::Base);
        base.hold();
        base.reset_reference(0);

        log_info!("homing complete");
        Ok(())
    }

    fn run_until_stalled(&mut self, axis: Axis, speed: i32, duty_limit: u8) {
        let poll = self.calibration().motion_poll_ms;
        self.platform_mut().actuator(axis).run(speed, duty_limit);
        while !self.platform_mut().actuator(axis).is_stalled() {
            self.pause_ms(poll);
        }
        self.platform_mut().actuator(axis).hold();
        log_debug!("{} stalled at {}", axis.name(), self.position(axis));
    }

    /// Let a seek cover its last degrees inside the position tolerance
    fn finish_seek(&mut self, axis: Axis, target: i32) {
        let poll = self.calibration().motion_poll_ms;
        for _ in 0..FINISH_POLLS {
            if self.position(axis) == target {
                return;
            }
            self.pause_ms(poll);
        }
        log_debug!("{} settled at {} short of {}", axis.name(), self.position(axis), target);
    }

    fn show_homing(&mut self, axis: Axis) {
        log_info!("homing {}", axis.name());
        self.renderer().render_homing(axis);
        self.present();
    }
}
