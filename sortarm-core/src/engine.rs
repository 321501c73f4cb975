//! Sorting engine
//!
//! One cycle picks whatever sits at the pickup station, lifts it in front
//! of the color sensor, classifies it and carries it to the zone assigned
//! that color. Objects no zone wants go back to the pickup station.
//!
//! ```text
//! Idle -> Picking -> Classifying -> Dispatching -> Idle
//! ```
//!
//! The session configuration is read at the start of every cycle, so menu
//! edits take effect on the next cycle.

use crate::classify::Classification;
use crate::config::{Dispatch, SessionConfig};
use crate::motion::{MotionTarget, Outcome, Supervisor};
use crate::state::{CyclePhase, RunState};
use crate::traits::{Axis, ColorSensorDriver, Platform};

/// How a sorting cycle ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CycleResult {
    /// Nothing was picked up, or the object slipped out while lifting
    NoObject,
    /// Object dropped at a drop-off zone
    Sorted {
        zone: usize,
        classification: Classification,
    },
    /// No zone matched; object set back down at the pickup station
    Returned { classification: Classification },
    /// Object fell out on the way to `zone`
    Lost {
        zone: usize,
        classification: Classification,
    },
    /// A motion was aborted by the operator
    Aborted(Outcome),
}

/// Running totals over a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EngineStats {
    pub cycles: u32,
    pub sorted: u32,
    pub returned: u32,
    pub empty: u32,
    pub lost: u32,
    pub aborted: u32,
}

impl EngineStats {
    fn record(&mut self, result: &CycleResult) {
        match result {
            CycleResult::Aborted(_) => {
                self.aborted += 1;
                return;
            }
            CycleResult::NoObject => self.empty += 1,
            CycleResult::Sorted { .. } => self.sorted += 1,
            CycleResult::Returned { .. } => self.returned += 1,
            CycleResult::Lost { .. } => self.lost += 1,
        }
        self.cycles += 1;
    }
}

/// Propagate aborted motions out of a cycle
fn step(outcome: Outcome) -> Result<Outcome, Outcome> {
    if outcome.is_aborted() {
        Err(outcome)
    } else {
        Ok(outcome)
    }
}

/// Executes sorting cycles
#[derive(Debug, Default)]
pub struct SortingEngine {
    stats: EngineStats,
}

impl SortingEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stats(&self) -> &EngineStats {
        &self.stats
    }

    /// Run one complete cycle
    pub fn run_cycle<P: Platform>(
        &mut self,
        sup: &mut Supervisor<P>,
        session: &SessionConfig,
        state: &mut RunState,
    ) -> CycleResult {
        if state.take_after_emergency() {
            log_info!("first cycle after emergency, starting from idle");
            state.discard_cycle();
        }

        let result = self
            .cycle(sup, session, state)
            .unwrap_or_else(CycleResult::Aborted);

        if !matches!(result, CycleResult::Aborted(_)) {
            state.phase = CyclePhase::Idle;
        }
        self.stats.record(&result);
        log_info!("cycle result: {:?}", result);
        result
    }

    fn cycle<P: Platform>(
        &mut self,
        sup: &mut Supervisor<P>,
        session: &SessionConfig,
        state: &mut RunState,
    ) -> Result<CycleResult, Outcome> {
        let cal = *sup.calibration();
        let pickup = session.zones.pickup_index();

        self.enter(sup, state, CyclePhase::Picking);
        step(sup.move_to(session, state, Axis::Elbow, MotionTarget::Angle(cal.transit_height)))?;
        step(sup.move_to(session, state, Axis::Base, MotionTarget::Zone(pickup)))?;
        step(sup.move_to(session, state, Axis::Gripper, MotionTarget::Angle(cal.gripper_open)))?;
        step(sup.move_to(session, state, Axis::Elbow, MotionTarget::Zone(pickup)))?;
        let grip = step(sup.close_gripper(session, state))?;
        step(sup.move_to(session, state, Axis::Elbow, MotionTarget::Angle(cal.sensor_height)))?;

        if grip != Outcome::StalledWithObject {
            log_info!("nothing at the pickup station");
            return Ok(CycleResult::NoObject);
        }

        self.enter(sup, state, CyclePhase::Classifying);
        let gripper = sup.position(Axis::Gripper);
        if gripper > cal.slip_above {
            log_warn!("object slipped while lifting (gripper at {})", gripper);
            return Ok(CycleResult::NoObject);
        }

        let sample = sup.platform_mut().sensor().sample();
        let classification = Classification::from(sample);
        state.last_classification = classification;
        log_info!(
            "classified {:?} (reflection {}) as {:?}",
            sample.color,
            sample.reflection,
            classification
        );

        self.enter(sup, state, CyclePhase::Dispatching);
        match session.zones.dispatch(classification.color) {
            Dispatch::Zone(zone) => {
                step(sup.move_to(session, state, Axis::Base, MotionTarget::Zone(zone)))?;

                if sup.platform_mut().sensor().color().is_none() {
                    log_warn!("object lost on the way to zone {}", zone);
                    step(sup.move_to(session, state, Axis::Base, MotionTarget::Zone(pickup)))?;
                    return Ok(CycleResult::Lost {
                        zone,
                        classification,
                    });
                }

                step(sup.move_to(session, state, Axis::Elbow, MotionTarget::Zone(zone)))?;
                step(sup.move_to(session, state, Axis::Gripper, MotionTarget::Angle(cal.gripper_open)))?;
                step(sup.move_to(session, state, Axis::Elbow, MotionTarget::Angle(cal.transit_height)))?;
                step(sup.move_to(session, state, Axis::Base, MotionTarget::Zone(pickup)))?;
                Ok(CycleResult::Sorted {
                    zone,
                    classification,
                })
            }
            Dispatch::Pickup => {
                step(sup.move_to(session, state, Axis::Elbow, MotionTarget::Zone(pickup)))?;
                step(sup.move_to(session, state, Axis::Gripper, MotionTarget::Angle(cal.gripper_open)))?;
                step(sup.move_to(session, state, Axis::Elbow, MotionTarget::Angle(cal.transit_height)))?;
                Ok(CycleResult::Returned { classification })
            }
        }
    }

    fn enter<P: Platform>(&self, sup: &mut Supervisor<P>, state: &mut RunState, phase: CyclePhase) {
        state.phase = phase;
        sup.renderer().render_running(state, &self.stats);
        sup.present();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_propagates_aborts() {
        assert_eq!(step(Outcome::Reached), Ok(Outcome::Reached));
        assert_eq!(step(Outcome::StalledEmpty), Ok(Outcome::StalledEmpty));
        assert_eq!(step(Outcome::AbortedToMenu), Err(Outcome::AbortedToMenu));
        assert_eq!(step(Outcome::AbortedEmergency), Err(Outcome::AbortedEmergency));
    }

    #[test]
    fn test_stats_skip_aborted_cycles() {
        let mut stats = EngineStats::default();
        stats.record(&CycleResult::NoObject);
        stats.record(&CycleResult::Returned {
            classification: Classification::UNKNOWN,
        });
        stats.record(&CycleResult::Aborted(Outcome::AbortedToMenu));
        assert_eq!(stats.cycles, 2);
        assert_eq!(stats.empty, 1);
        assert_eq!(stats.returned, 1);
        assert_eq!(stats.aborted, 1);
    }
}
