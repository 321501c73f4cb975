//! Simulated robot
//!
//! `SimPlatform` wires the simulated devices to a world model and a virtual
//! clock and implements the controller's `Platform` trait.

pub mod clock;
pub mod platform;
pub mod world;

pub use clock::SimClock;
pub use platform::{SimPlatform, PHYSICS_STEP_MS};
pub use world::{Placement, SimObject, World, WorldConfig};
