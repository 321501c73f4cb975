//! Base limit switch
//!
//! Touch sensor closed by the base at its homing stop. Reads high while
//! pressed.

use core::convert::Infallible;

use embedded_hal::digital::{ErrorType, InputPin};

/// Simulated touch switch
#[derive(Debug, Default)]
pub struct SimLimitSwitch {
    pressed: bool,
}

impl SimLimitSwitch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_pressed(&mut self, pressed: bool) {
        self.pressed = pressed;
    }
}

impl ErrorType for SimLimitSwitch {
    type Error = Infallible;
}

impl InputPin for SimLimitSwitch {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        Ok(self.pressed)
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        Ok(!self.pressed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pressed_reads_high() {
        let mut switch = SimLimitSwitch::new();
        assert_eq!(switch.is_high(), Ok(false));
        switch.set_pressed(true);
        assert_eq!(switch.is_high(), Ok(true));
        assert_eq!(switch.is_low(), Ok(false));
    }
}
