//! Simulated platform
//!
//! Every delay the controller makes advances the virtual clock and the
//! physics, in steps of at most [`PHYSICS_STEP_MS`]. Each step moves the
//! axes, lets the world react to the new pose, then refreshes what the
//! sensor sees and the limit switch state.

use embedded_hal::delay::DelayNs;
use sortarm_core::traits::{ActuatorDriver, Axis, Buttons, Platform};
use sortarm_display::DisplayBackend;

use super::clock::SimClock;
use super::world::{SimObject, World, WorldConfig};
use crate::display::TextDisplay;
use crate::input::{ButtonScript, ScriptedPress, SimLimitSwitch};
use crate::motor::{AxisLimits, SimAxis};
use crate::sensor::SimColorSensor;

/// Longest physics step
pub const PHYSICS_STEP_MS: u32 = 10;

/// Physical base angle at which the homing switch closes
const BASE_SWITCH_AT: i32 = 0;

const GRIPPER_LIMITS: AxisLimits = AxisLimits::new(-150, 0);
const ELBOW_LIMITS: AxisLimits = AxisLimits::new(0, 120);
const BASE_LIMITS: AxisLimits = AxisLimits::new(-20, 300);

/// Physical start angles
struct Pose {
    base: i32,
    elbow: i32,
    gripper: i32,
}

/// Virtual sorting arm
pub struct SimPlatform<D: DisplayBackend = TextDisplay> {
    axes: [SimAxis; 3],
    sensor: SimColorSensor,
    switch: SimLimitSwitch,
    display: D,
    buttons: ButtonScript,
    clock: SimClock,
    world: World,
    pending_ns: u64,
    deadline_ms: Option<u64>,
}

impl SimPlatform<TextDisplay> {
    /// Arm in an arbitrary pose, needing homing
    pub fn unhomed() -> Self {
        Self::new(TextDisplay::new(), WorldConfig::default())
    }

    /// Arm already homed: gripper open, elbow at transit height, base at
    /// the pickup station
    pub fn homed() -> Self {
        Self::homed_with(TextDisplay::new(), WorldConfig::default())
    }
}

impl<D: DisplayBackend> SimPlatform<D> {
    pub fn new(display: D, world: WorldConfig) -> Self {
        Self::with_pose(display, world, Pose { base: 90, elbow: 40, gripper: -30 })
    }

    pub fn homed_with(display: D, world: WorldConfig) -> Self {
        Self::with_pose(display, world, Pose { base: 0, elbow: 58, gripper: -90 })
    }

    fn with_pose(display: D, world: WorldConfig, pose: Pose) -> Self {
        // indexed by Axis::index
        let axes = [
            SimAxis::new(BASE_LIMITS, pose.base),
            SimAxis::new(ELBOW_LIMITS, pose.elbow),
            SimAxis::new(GRIPPER_LIMITS, pose.gripper),
        ];
        let mut platform = Self {
            axes,
            sensor: SimColorSensor::new(),
            switch: SimLimitSwitch::new(),
            display,
            buttons: ButtonScript::new(),
            clock: SimClock::new(),
            world: World::new(world),
            pending_ns: 0,
            deadline_ms: None,
        };
        platform.refresh_switch();
        platform
    }

    pub fn axis(&self, axis: Axis) -> &SimAxis {
        &self.axes[axis.index()]
    }

    pub fn axis_mut(&mut self, axis: Axis) -> &mut SimAxis {
        &mut self.axes[axis.index()]
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    /// The display, without going through the controller
    pub fn screen(&self) -> &D {
        &self.display
    }

    /// Queue an object at the pickup station
    pub fn feed(&mut self, object: SimObject) -> Result<(), SimObject> {
        self.world.feed(object)
    }

    /// Schedule a button press
    pub fn push_press(&mut self, press: ScriptedPress) -> Result<(), ScriptedPress> {
        self.buttons.push(press)
    }

    /// Whether scripted presses remain
    pub fn presses_pending(&self) -> bool {
        self.buttons.pending_after(self.clock.now_ms())
    }

    /// Virtual time after which `deadline_reached` reports true
    pub fn set_deadline(&mut self, deadline_ms: Option<u64>) {
        self.deadline_ms = deadline_ms;
    }

    pub fn deadline_reached(&self) -> bool {
        self.deadline_ms
            .is_some_and(|deadline| self.clock.now_ms() >= deadline)
    }

    /// Advance the simulation by `ms`
    pub fn advance(&mut self, ms: u32) {
        let mut left = ms;
        while left > 0 {
            let step = left.min(PHYSICS_STEP_MS);
            self.step(step);
            left -= step;
        }
    }

    fn step(&mut self, ms: u32) {
        let base = self.axis(Axis::Base).position();
        let elbow = self.axis(Axis::Elbow).position();
        let obstacle = self.world.grip_obstacle(base, elbow);
        self.axis_mut(Axis::Gripper).set_obstacle(obstacle);

        for axis in &mut self.axes {
            axis.update(ms);
        }
        self.clock.advance_ms(ms);

        let base = self.axis(Axis::Base).position();
        let elbow = self.axis(Axis::Elbow).position();
        let gripper = self.axis(Axis::Gripper);
        let (gripper_at, stalled) = (gripper.position(), gripper.is_stalled());
        let in_view = self.world.settle(base, elbow, gripper_at, stalled);
        self.sensor.set_in_view(in_view);
        self.refresh_switch();
    }

    fn refresh_switch(&mut self) {
        let pressed = self.axis(Axis::Base).physical() <= BASE_SWITCH_AT;
        self.switch.set_pressed(pressed);
    }
}

impl<D: DisplayBackend> DelayNs for SimPlatform<D> {
    fn delay_ns(&mut self, ns: u32) {
        self.pending_ns += u64::from(ns);
        let whole_ms = self.pending_ns / 1_000_000;
        if whole_ms > 0 {
            self.pending_ns -= whole_ms * 1_000_000;
            self.advance(whole_ms as u32);
        }
    }
}

impl<D: DisplayBackend> Platform for SimPlatform<D> {
    type Actuator = SimAxis;
    type Sensor = SimColorSensor;
    type Display = D;
    type LimitSwitch = SimLimitSwitch;

    fn actuator(&mut self, axis: Axis) -> &mut SimAxis {
        self.axis_mut(axis)
    }

    fn sensor(&mut self) -> &mut SimColorSensor {
        &mut self.sensor
    }

    fn display(&mut self) -> &mut D {
        &mut self.display
    }

    fn limit_switch(&mut self) -> &mut SimLimitSwitch {
        &mut self.switch
    }

    fn buttons(&mut self) -> Buttons {
        self.buttons.state_at(self.clock.now_ms())
    }

    fn now_ms(&self) -> u64 {
        self.clock.now_ms()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_hal::digital::InputPin;
    use sortarm_core::traits::StopMode;

    #[test]
    fn test_delay_advances_clock_and_axes() {
        let mut platform = SimPlatform::homed();
        platform
            .actuator(Axis::Base)
            .seek_target(60, 30, StopMode::Hold);
        platform.delay_ms(250);
        assert_eq!(platform.now_ms(), 250);
        assert_eq!(platform.axis(Axis::Base).position(), 15);
    }

    #[test]
    fn test_sub_millisecond_delays_accumulate() {
        let mut platform = SimPlatform::homed();
        for _ in 0..4 {
            platform.delay_us(500);
        }
        assert_eq!(platform.now_ms(), 2);
    }

    #[test]
    fn test_switch_follows_base() {
        let mut platform = SimPlatform::unhomed();
        assert_eq!(platform.limit_switch().is_high(), Ok(false));
        platform.actuator(Axis::Base).run(-60, 100);
        platform.delay_ms(1600);
        assert_eq!(platform.limit_switch().is_high(), Ok(true));
    }

    #[test]
    fn test_scripted_buttons() {
        let mut platform = SimPlatform::homed();
        platform
            .push_press(ScriptedPress::new(100, Buttons::CENTER, 200))
            .unwrap();
        assert!(platform.buttons().is_empty());
        platform.delay_ms(150);
        assert_eq!(platform.buttons(), Buttons::CENTER);
        platform.delay_ms(200);
        assert!(platform.buttons().is_empty());
        assert!(!platform.presses_pending());
    }

    #[test]
    fn test_deadline() {
        let mut platform = SimPlatform::homed();
        assert!(!platform.deadline_reached());
        platform.set_deadline(Some(100));
        platform.delay_ms(100);
        assert!(platform.deadline_reached());
    }
}
