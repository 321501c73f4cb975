//! Operator interrupts: pause, resume, cancel and emergency recovery

use sortarm_core::classify::Color;
use sortarm_core::config::{Calibration, SessionConfig};
use sortarm_core::engine::{CycleResult, SortingEngine};
use sortarm_core::motion::{MotionTarget, Outcome, Supervisor};
use sortarm_core::state::{Event, Mode, RunState};
use sortarm_core::traits::{ActuatorDriver, Axis, Buttons};
use sortarm_drivers::{ScriptedPress, SimObject, SimPlatform};

fn running() -> (Supervisor<SimPlatform>, SessionConfig, RunState) {
    let sup = Supervisor::new(SimPlatform::homed(), Calibration::default());
    let mut state = RunState::new();
    state.apply(Event::Start);
    (sup, SessionConfig::default(), state)
}

fn near(actual: i32, expected: i32) -> bool {
    (actual - expected).abs() <= Calibration::default().position_tolerance
}

fn press_at(sup: &mut Supervisor<SimPlatform>, offset_ms: u64, buttons: Buttons, hold_ms: u32) {
    let at = sup.now_ms() + offset_ms;
    sup.platform_mut()
        .push_press(ScriptedPress::new(at, buttons, hold_ms))
        .unwrap();
}

/// Pick up an object and lift it to the sensor
fn pick(sup: &mut Supervisor<SimPlatform>, session: &SessionConfig, state: &mut RunState) {
    let cal = *sup.calibration();
    sup.platform_mut()
        .feed(SimObject::typical(Color::Green))
        .unwrap();
    sup.move_to(session, state, Axis::Elbow, MotionTarget::Zone(0));
    assert_eq!(sup.close_gripper(session, state), Outcome::StalledWithObject);
    sup.move_to(session, state, Axis::Elbow, MotionTarget::Angle(cal.sensor_height));
}

#[test]
fn test_short_press_pauses_and_resume_reissues_seek() {
    let (mut sup, session, mut state) = running();
    press_at(&mut sup, 500, Buttons::CENTER, 200);
    press_at(&mut sup, 1500, Buttons::CENTER, 100);

    let outcome = sup.move_to(&session, &mut state, Axis::Base, MotionTarget::Angle(150));

    assert_eq!(outcome, Outcome::Reached);
    assert!(near(sup.position(Axis::Base), 150));
    assert_eq!(state.mode(), Mode::Running);
    assert_eq!(state.interrupted, None);
    let base = sup.platform().axis(Axis::Base);
    assert_eq!(base.seek_history().filter(|t| **t == 150).count(), 2);
    assert!(sup.platform().screen().titles().any(|t| t == "Paused"));
}

#[test]
fn test_left_from_pause_returns_to_menu() {
    let (mut sup, session, mut state) = running();
    press_at(&mut sup, 500, Buttons::CENTER, 100);
    press_at(&mut sup, 1500, Buttons::LEFT, 100);

    let outcome = sup.move_to(&session, &mut state, Axis::Base, MotionTarget::Angle(150));

    assert_eq!(outcome, Outcome::AbortedToMenu);
    assert_eq!(state.mode(), Mode::Menu);
    let base = sup.platform().axis(Axis::Base);
    assert!(!base.is_moving());
    assert!(base.position() < 150);
    assert_eq!(base.seek_history().count(), 1);
}

#[test]
fn test_paused_axis_holds_position() {
    let (mut sup, session, mut state) = running();
    press_at(&mut sup, 500, Buttons::CENTER, 100);
    press_at(&mut sup, 5000, Buttons::LEFT, 100);

    sup.move_to(&session, &mut state, Axis::Base, MotionTarget::Angle(150));

    // interrupted around 30 degrees and never moved while paused
    assert!(near(sup.position(Axis::Base), 30));
}

#[test]
fn test_presses_ignored_outside_running() {
    let mut sup = Supervisor::new(SimPlatform::homed(), Calibration::default());
    let session = SessionConfig::default();
    let mut state = RunState::new();
    press_at(&mut sup, 500, Buttons::CENTER, 3000);

    let outcome = sup.move_to(&session, &mut state, Axis::Base, MotionTarget::Angle(150));

    assert_eq!(outcome, Outcome::Reached);
    assert_eq!(state.mode(), Mode::Menu);
    assert_eq!(state.emergencies, 0);
}

#[test]
fn test_unsafe_base_target_is_ignored() {
    let (mut sup, session, mut state) = running();

    let outcome = sup.move_to(&session, &mut state, Axis::Base, MotionTarget::Angle(300));

    assert_eq!(outcome, Outcome::Reached);
    assert_eq!(sup.platform().axis(Axis::Base).seek_history().count(), 0);
}

#[test]
fn test_long_press_drops_object_at_nearest_zone() {
    let (mut sup, session, mut state) = running();
    pick(&mut sup, &session, &mut state);
    press_at(&mut sup, 1500, Buttons::CENTER, 2500);

    let outcome = sup.move_to(&session, &mut state, Axis::Base, MotionTarget::Zone(2));

    assert_eq!(outcome, Outcome::AbortedEmergency);
    assert_eq!(state.mode(), Mode::Menu);
    assert!(state.after_emergency);
    assert_eq!(state.emergencies, 1);

    // interrupted near 90 degrees, closest zone is the one at 100
    let world = sup.platform().world();
    assert!(world.held().is_none());
    assert_eq!(world.placements().len(), 1);
    assert!(near(world.placements()[0].angle, 100));

    let cal = *sup.calibration();
    assert!(near(sup.position(Axis::Gripper), cal.gripper_open));
    assert!(near(sup.position(Axis::Elbow), cal.transit_height));
    assert!(sup.platform().screen().titles().any(|t| t == "EMERGENCY"));
}

#[test]
fn test_cycle_after_emergency_starts_from_pickup() {
    let (mut sup, session, mut state) = running();
    pick(&mut sup, &session, &mut state);
    press_at(&mut sup, 1500, Buttons::CENTER, 2500);
    sup.move_to(&session, &mut state, Axis::Base, MotionTarget::Zone(2));

    sup.platform_mut().axis_mut(Axis::Base).clear_history();
    let result = SortingEngine::new().run_cycle(&mut sup, &session, &mut state);

    assert_eq!(result, CycleResult::NoObject);
    assert!(!state.after_emergency);
    let base = sup.platform().axis(Axis::Base);
    assert!(base.seek_history().all(|t| *t != 150));
    assert!(base.seek_history().any(|t| *t == 0));
}

#[test]
fn test_long_press_without_recovery_pauses() {
    let (mut sup, mut session, mut state) = running();
    session.capabilities.emergency_recovery = false;
    press_at(&mut sup, 500, Buttons::CENTER, 2500);
    press_at(&mut sup, 4000, Buttons::CENTER, 100);

    let outcome = sup.move_to(&session, &mut state, Axis::Base, MotionTarget::Angle(150));

    assert_eq!(outcome, Outcome::Reached);
    assert_eq!(state.emergencies, 0);
    assert_eq!(state.mode(), Mode::Running);
}

#[test]
fn test_abort_propagates_out_of_cycle() {
    let (mut sup, session, mut state) = running();
    sup.platform_mut()
        .feed(SimObject::typical(Color::Blue))
        .unwrap();
    // lands while the base swings out to the blue zone
    press_at(&mut sup, 3000, Buttons::CENTER, 2500);

    let mut engine = SortingEngine::new();
    let result = engine.run_cycle(&mut sup, &session, &mut state);

    assert_eq!(result, CycleResult::Aborted(Outcome::AbortedEmergency));
    assert_eq!(engine.stats().aborted, 1);
    assert_eq!(engine.stats().cycles, 0);
    assert!(sup.platform().world().held().is_none());
}

#[test]
fn test_resume_limit_returns_to_menu() {
    let cal = Calibration {
        max_resumes: 1,
        ..Calibration::default()
    };
    let mut sup = Supervisor::new(SimPlatform::homed(), cal);
    let session = SessionConfig::default();
    let mut state = RunState::new();
    state.apply(Event::Start);
    for offset in [200, 800, 1400, 2000] {
        press_at(&mut sup, offset, Buttons::CENTER, 100);
    }

    let outcome = sup.move_to(&session, &mut state, Axis::Base, MotionTarget::Angle(250));

    assert_eq!(outcome, Outcome::AbortedToMenu);
    assert_eq!(state.mode(), Mode::Menu);
    assert_eq!(state.interrupted, None);
    let stopped_at = sup.position(Axis::Base);
    assert!(stopped_at < 250);
    assert!(!sup.platform().axis(Axis::Base).is_moving());
    sup.pause_ms(1000);
    assert_eq!(sup.position(Axis::Base), stopped_at);
}

#[test]
fn test_pause_during_grip_resumes_closing() {
    let (mut sup, session, mut state) = running();
    sup.platform_mut()
        .feed(SimObject::typical(Color::Red))
        .unwrap();
    sup.move_to(&session, &mut state, Axis::Elbow, MotionTarget::Zone(0));
    // the jaws need 250 ms to close on the block
    press_at(&mut sup, 100, Buttons::CENTER, 100);
    press_at(&mut sup, 600, Buttons::CENTER, 100);

    let outcome = sup.close_gripper(&session, &mut state);

    assert_eq!(outcome, Outcome::StalledWithObject);
    assert_eq!(state.mode(), Mode::Running);
    assert!(sup.platform().screen().titles().any(|t| t == "Paused"));
    assert!(near(sup.position(Axis::Gripper), -40));
    assert!(sup.platform().world().held().is_some());
}
