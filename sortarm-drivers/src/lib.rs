//! Simulated hardware
//!
//! This crate provides host-side implementations of the traits defined in
//! sortarm-core, so the whole controller can run against a virtual arm:
//!
//! - Servo axis with seek, run and stall behavior
//! - Color sensor fed by the object in the gripper
//! - Scripted buttons and a base limit switch
//! - In-memory text display
//! - A world model of objects at the pickup station and drop zones
//!
//! Time is virtual: it advances only when the controller delays.

#![no_std]
#![deny(unsafe_code)]

pub mod display;
pub mod input;
pub mod motor;
pub mod sensor;
pub mod sim;

pub use display::TextDisplay;
pub use input::{ButtonScript, ScriptedPress, SimLimitSwitch};
pub use motor::{AxisLimits, SimAxis};
pub use sensor::SimColorSensor;
pub use sim::{Placement, SimClock, SimObject, SimPlatform, World, WorldConfig};
