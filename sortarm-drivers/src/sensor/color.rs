//! Simulated color sensor
//!
//! Reports whatever reading the world model places in front of it. With
//! nothing in view it reads no color and zero reflectance.

use sortarm_core::classify::{Color, SensorSample};
use sortarm_core::traits::{ColorSensorDriver, Rgb};

/// Simulated reflectance/color sensor
#[derive(Debug, Default)]
pub struct SimColorSensor {
    in_view: Option<SensorSample>,
    reads: u32,
}

impl SimColorSensor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the reading for whatever is in front of the sensor
    pub fn set_in_view(&mut self, sample: Option<SensorSample>) {
        self.in_view = sample;
    }

    /// Number of channel reads so far
    pub fn reads(&self) -> u32 {
        self.reads
    }
}

impl ColorSensorDriver for SimColorSensor {
    fn color(&mut self) -> Option<Color> {
        self.reads += 1;
        self.in_view.and_then(|sample| sample.color)
    }

    fn reflection(&mut self) -> u8 {
        self.reads += 1;
        self.in_view.map_or(0, |sample| sample.reflection)
    }

    fn rgb(&mut self) -> Rgb {
        self.reads += 1;
        self.in_view.map_or(Rgb::default(), |sample| sample.rgb)
    }
}
