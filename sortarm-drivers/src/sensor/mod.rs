//! Sensor drivers

pub mod color;

pub use color::SimColorSensor;
