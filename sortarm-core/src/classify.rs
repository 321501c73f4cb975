//! Object classification
//!
//! Maps a raw color sensor reading to a color and size class. The sensor's
//! discrete category is unreliable for dark objects, so green/blue/black are
//! separated by comparing raw channels, and reflectance tells big blocks
//! (closer to the sensor) from small ones.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::traits::Rgb;

/// Red objects reflecting more than this are big
pub const RED_BIG_ABOVE: u8 = 50;

/// Green/blue objects reflecting more than this are big
pub const COOL_BIG_ABOVE: u8 = 9;

/// Yellow objects reflecting more than this are big
pub const YELLOW_BIG_ABOVE: u8 = 50;

/// Object colors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Color {
    Red,
    Green,
    Blue,
    Yellow,
    Brown,
    Black,
    White,
    Orange,
    Purple,
    Unknown,
}

impl Color {
    /// Colors an operator can assign to a drop-off zone
    pub const ASSIGNABLE: [Color; 4] = [Color::Red, Color::Green, Color::Blue, Color::Yellow];

    pub const fn name(self) -> &'static str {
        match self {
            Color::Red => "Red",
            Color::Green => "Green",
            Color::Blue => "Blue",
            Color::Yellow => "Yellow",
            Color::Brown => "Brown",
            Color::Black => "Black",
            Color::White => "White",
            Color::Orange => "Orange",
            Color::Purple => "Purple",
            Color::Unknown => "Unknown",
        }
    }
}

/// Object size class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum SizeClass {
    Small,
    Big,
    Unknown,
}

impl SizeClass {
    pub const fn name(self) -> &'static str {
        match self {
            SizeClass::Small => "Small",
            SizeClass::Big => "Big",
            SizeClass::Unknown => "Unknown",
        }
    }

    fn from_reflection(reflection: u8, big_above: u8) -> Self {
        if reflection > big_above {
            SizeClass::Big
        } else {
            SizeClass::Small
        }
    }
}

/// One reading of all sensor channels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SensorSample {
    /// Discrete category reported by the sensor
    pub color: Option<Color>,
    /// Reflected light intensity, 0..=100
    pub reflection: u8,
    pub rgb: Rgb,
}

/// Result of classifying one object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Classification {
    pub color: Color,
    pub size: SizeClass,
}

impl Classification {
    pub const UNKNOWN: Self = Self {
        color: Color::Unknown,
        size: SizeClass::Unknown,
    };

    pub const fn new(color: Color, size: SizeClass) -> Self {
        Self { color, size }
    }
}

impl Default for Classification {
    fn default() -> Self {
        Self::UNKNOWN
    }
}

impl From<SensorSample> for Classification {
    fn from(sample: SensorSample) -> Self {
        classify(sample.color, sample.reflection, sample.rgb)
    }
}

/// Classify a raw reading
///
/// Rules are evaluated in order; the first that applies wins.
pub fn classify(raw: Option<Color>, reflection: u8, rgb: Rgb) -> Classification {
    let Some(raw) = raw else {
        return Classification::UNKNOWN;
    };

    match raw {
        Color::Red => Classification::new(
            Color::Red,
            SizeClass::from_reflection(reflection, RED_BIG_ABOVE),
        ),
        Color::Green | Color::Blue | Color::Black => {
            let color = if rgb.b > rgb.g {
                Color::Blue
            } else {
                Color::Green
            };
            Classification::new(color, SizeClass::from_reflection(reflection, COOL_BIG_ABOVE))
        }
        Color::Yellow | Color::Brown => Classification::new(
            Color::Yellow,
            SizeClass::from_reflection(reflection, YELLOW_BIG_ABOVE),
        ),
        other => Classification::new(other, SizeClass::Unknown),
    }
}
