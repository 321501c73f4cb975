//! Platform trait
//!
//! Aggregates every piece of hardware the controller touches. The delay
//! supertrait is the single suspension point used by all polling loops.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::InputPin;
use sortarm_display::DisplayBackend;

use super::{ActuatorDriver, Axis, Buttons, ColorSensorDriver};

/// Robot platform
///
/// Implemented by the brick runtime on hardware and by `SimPlatform` on the
/// host.
pub trait Platform: DelayNs {
    type Actuator: ActuatorDriver;
    type Sensor: ColorSensorDriver;
    type Display: DisplayBackend;
    type LimitSwitch: InputPin;

    /// Motor driving `axis`
    fn actuator(&mut self, axis: Axis) -> &mut Self::Actuator;

    /// Color sensor
    fn sensor(&mut self) -> &mut Self::Sensor;

    /// Text display
    fn display(&mut self) -> &mut Self::Display;

    /// Touch switch closed when the base is at its homing stop
    fn limit_switch(&mut self) -> &mut Self::LimitSwitch;

    /// Currently pressed buttons
    fn buttons(&mut self) -> Buttons;

    /// Monotonic milliseconds since start
    fn now_ms(&self) -> u64;
}
