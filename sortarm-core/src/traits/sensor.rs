//! Color sensor driver trait

use crate::classify::{Color, SensorSample};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Raw tri-channel reading, each channel 0..=100
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// Reflectance/color sensor mounted above the pickup path
pub trait ColorSensorDriver {
    /// Discrete color category, `None` when nothing is detected
    fn color(&mut self) -> Option<Color>;

    /// Reflected light intensity, 0..=100
    fn reflection(&mut self) -> u8;

    /// Raw red/green/blue reflection
    fn rgb(&mut self) -> Rgb;

    /// Take all three readings
    fn sample(&mut self) -> SensorSample {
        SensorSample {
            color: self.color(),
            reflection: self.reflection(),
            rgb: self.rgb(),
        }
    }
}
