//! Simulated servo motor
//!
//! Models one axis of the arm: a motor with an encoder that moves at the
//! commanded speed until it reaches its target, hits a mechanical stop, or
//! runs into an obstacle (the gripper jaws closing on an object).
//!
//! The axis is advanced by calling `update()` with the elapsed time.
//! Positions are tracked in millidegrees internally so slow speeds and
//! short steps do not lose motion to rounding.
//!
//! ```ignore
//! let mut axis = SimAxis::new(AxisLimits::new(-20, 300), 90);
//! axis.seek_target(60, 150, StopMode::Hold);
//! axis.update(50);
//! ```

use heapless::HistoryBuffer;
use sortarm_core::traits::{ActuatorDriver, StopMode};

/// Seek targets remembered for inspection
pub const SEEK_HISTORY: usize = 64;

/// Mechanical travel range in the physical frame, degrees
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AxisLimits {
    pub min: i32,
    pub max: i32,
}

impl AxisLimits {
    pub const fn new(min: i32, max: i32) -> Self {
        Self { min, max }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Idle,
    Seek { target_mdeg: i64, speed: i32 },
    Run { speed: i32 },
}

/// Simulated servo axis
pub struct SimAxis {
    limits: AxisLimits,
    /// Physical position, millidegrees
    position_mdeg: i64,
    /// Physical angle of the reported zero
    offset: i32,
    /// Physical angle the axis cannot pass moving in the positive direction
    obstacle: Option<i32>,
    command: Command,
    stalled: bool,
    duty_limit: u8,
    seeks: HistoryBuffer<i32, SEEK_HISTORY>,
}

impl SimAxis {
    /// Create an axis at physical angle `start` with reference zero at 0
    pub fn new(limits: AxisLimits, start: i32) -> Self {
        Self {
            limits,
            position_mdeg: i64::from(start) * 1000,
            offset: 0,
            obstacle: None,
            command: Command::Idle,
            stalled: false,
            duty_limit: 100,
            seeks: HistoryBuffer::new(),
        }
    }

    /// Physical angle in degrees
    pub fn physical(&self) -> i32 {
        (self.position_mdeg / 1000) as i32
    }

    /// Convert a reported angle to the physical frame
    pub fn to_physical(&self, reported: i32) -> i32 {
        reported + self.offset
    }

    /// Place (or remove) an obstacle at a reported angle
    pub fn set_obstacle(&mut self, reported: Option<i32>) {
        self.obstacle = reported.map(|angle| self.to_physical(angle));
    }

    /// Whether the axis is executing a command
    pub fn is_moving(&self) -> bool {
        self.command != Command::Idle
    }

    /// Duty limit of the last `run` command
    pub fn duty_limit(&self) -> u8 {
        self.duty_limit
    }

    /// Seek targets issued, oldest first
    pub fn seek_history(&self) -> impl Iterator<Item = &i32> {
        self.seeks.oldest_ordered()
    }

    pub fn clear_history(&mut self) {
        self.seeks.clear();
    }

    /// Advance the axis by `delta_ms`
    pub fn update(&mut self, delta_ms: u32) {
        let delta = i64::from(delta_ms);
        let (step, done_at) = match self.command {
            Command::Idle => return,
            Command::Seek { target_mdeg, speed } => {
                let remaining = target_mdeg - self.position_mdeg;
                let reach = i64::from(speed.unsigned_abs()) * delta;
                (remaining.clamp(-reach, reach), Some(target_mdeg))
            }
            Command::Run { speed } => (i64::from(speed) * delta, None),
        };

        let mut next = self.position_mdeg + step;
        let mut blocked = false;

        let min = i64::from(self.limits.min) * 1000;
        let mut max = i64::from(self.limits.max) * 1000;
        if let Some(obstacle) = self.obstacle {
            let obstacle = i64::from(obstacle) * 1000;
            if self.position_mdeg <= obstacle {
                max = max.min(obstacle);
            }
        }

        if step > 0 && next >= max {
            blocked = next > max || done_at.map_or(true, |target| target > max);
            next = max;
        } else if step < 0 && next <= min {
            blocked = next < min || done_at.map_or(true, |target| target < min);
            next = min;
        }

        self.position_mdeg = next;
        self.stalled = blocked;
    }
}

impl ActuatorDriver for SimAxis {
    fn seek_target(&mut self, speed: i32, target: i32, _then: StopMode) {
        self.seeks.write(target);
        self.command = Command::Seek {
            target_mdeg: i64::from(self.to_physical(target)) * 1000,
            speed,
        };
        self.stalled = false;
    }

    fn run(&mut self, speed: i32, duty_limit: u8) {
        self.command = Command::Run { speed };
        self.duty_limit = duty_limit;
        self.stalled = false;
    }

    fn position(&self) -> i32 {
        self.physical() - self.offset
    }

    fn is_stalled(&self) -> bool {
        self.stalled
    }

    fn hold(&mut self) {
        self.command = Command::Idle;
        self.stalled = false;
    }

    fn reset_reference(&mut self, value: i32) {
        self.offset = self.physical() - value;
    }
}
