//! Emergency recovery
//!
//! Runs when the interrupt button is held past the threshold. The arm
//! raises, swings to the nearest zone at reduced speed, sets down whatever
//! it holds, and raises again. None of these motions can be interrupted.

use crate::config::SessionConfig;
use crate::state::{Event, RunState};
use crate::traits::{Axis, Platform};

use super::supervisor::Supervisor;
use super::target::SeekRequest;

/// What emergency recovery did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EmergencyReport {
    /// Base angle when the emergency was triggered
    pub from_angle: i32,
    /// Zone the object was set down at
    pub zone: usize,
}

impl<P: Platform> Supervisor<P> {
    /// Drop the held object at the nearest zone and return to the menu
    ///
    /// Leaves the gripper open, the elbow at transit height and the run
    /// state in menu mode with `after_emergency` set.
    pub fn recover(&mut self, session: &SessionConfig, state: &mut RunState) -> EmergencyReport {
        state.apply(Event::EmergencyStop);
        state.emergencies += 1;

        let cal = *self.calibration();
        let from_angle = self.position(Axis::Base);
        let zone = session.zones.nearest(from_angle);
        log_warn!("emergency at base {}, dropping at zone {}", from_angle, zone);

        self.renderer().render_emergency(zone, &session.zones);
        self.present();

        let (angle, height) = match session.zones.get(zone) {
            Some(entry) => (entry.angle, cal.height(entry.height)),
            None => (from_angle, cal.ground_height),
        };
        let slow = cal.emergency_speed;

        self.seek_direct(SeekRequest::position(Axis::Elbow, cal.transit_height, slow));
        self.seek_direct(SeekRequest::position(Axis::Base, angle, slow));
        self.seek_direct(SeekRequest::position(Axis::Elbow, height, slow));
        self.seek_direct(SeekRequest::position(
            Axis::Gripper,
            cal.gripper_open,
            cal.gripper_speed,
        ));
        self.seek_direct(SeekRequest::position(Axis::Elbow, cal.transit_height, slow));

        state.discard_cycle();
        state.after_emergency = true;
        state.apply(Event::RecoveryComplete);
        log_info!("emergency recovery complete");

        EmergencyReport { from_angle, zone }
    }
}
