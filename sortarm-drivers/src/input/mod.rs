//! Input devices

pub mod buttons;
pub mod switch;

pub use buttons::{ButtonScript, ScriptedPress, DEFAULT_HOLD_MS, MAX_PRESSES};
pub use switch::SimLimitSwitch;
