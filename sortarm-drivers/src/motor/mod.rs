//! Motor drivers

pub mod servo;

pub use servo::{AxisLimits, SimAxis};
