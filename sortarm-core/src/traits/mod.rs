//! Hardware abstraction traits
//!
//! These traits define the interface between the supervisory logic and the
//! robot's motors, color sensor, buttons and screen.

pub mod actuator;
pub mod input;
pub mod platform;
pub mod sensor;

pub use actuator::{ActuatorDriver, Axis, StopMode};
pub use input::{Button, Buttons, Debouncer};
pub use platform::Platform;
pub use sensor::{ColorSensorDriver, Rgb};
