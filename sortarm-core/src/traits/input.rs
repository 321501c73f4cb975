//! Brick buttons

bitflags::bitflags! {
    /// Set of currently pressed buttons
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Buttons: u8 {
        const UP = 1 << 0;
        const DOWN = 1 << 1;
        const LEFT = 1 << 2;
        const RIGHT = 1 << 3;
        const CENTER = 1 << 4;
    }
}

/// A single button
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Button {
    Up,
    Down,
    Left,
    Right,
    Center,
}

impl Buttons {
    /// The button a menu should react to when several are pressed
    ///
    /// Priority is Down, Up, Center, Left, Right.
    pub fn primary(self) -> Option<Button> {
        if self.contains(Buttons::DOWN) {
            Some(Button::Down)
        } else if self.contains(Buttons::UP) {
            Some(Button::Up)
        } else if self.contains(Buttons::CENTER) {
            Some(Button::Center)
        } else if self.contains(Buttons::LEFT) {
            Some(Button::Left)
        } else if self.contains(Buttons::RIGHT) {
            Some(Button::Right)
        } else {
            None
        }
    }
}

impl From<Button> for Buttons {
    fn from(button: Button) -> Self {
        match button {
            Button::Up => Buttons::UP,
            Button::Down => Buttons::DOWN,
            Button::Left => Buttons::LEFT,
            Button::Right => Buttons::RIGHT,
            Button::Center => Buttons::CENTER,
        }
    }
}

/// Press debouncer
///
/// After an accepted press, further presses are ignored for the window.
/// A button held longer than the window repeats once per window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Debouncer {
    window_ms: u32,
    last_accept: Option<u64>,
}

impl Debouncer {
    pub const fn new(window_ms: u32) -> Self {
        Self {
            window_ms,
            last_accept: None,
        }
    }

    /// Accept a press seen at `now_ms` unless it falls inside the window
    pub fn accept(&mut self, now_ms: u64) -> bool {
        if !self.ready(now_ms) {
            return false;
        }
        self.last_accept = Some(now_ms);
        true
    }

    /// Whether a press at `now_ms` would be accepted
    pub fn ready(&self, now_ms: u64) -> bool {
        match self.last_accept {
            Some(last) => now_ms.saturating_sub(last) >= u64::from(self.window_ms),
            None => true,
        }
    }

    /// Start a window at `now_ms` without a press
    pub fn arm(&mut self, now_ms: u64) {
        self.last_accept = Some(now_ms);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primary_priority() {
        assert_eq!(Buttons::empty().primary(), None);
        assert_eq!((Buttons::CENTER | Buttons::LEFT).primary(), Some(Button::Center));
        assert_eq!((Buttons::UP | Buttons::DOWN).primary(), Some(Button::Down));
        assert_eq!(Buttons::RIGHT.primary(), Some(Button::Right));
    }

    #[test]
    fn test_debounce_window() {
        let mut debouncer = Debouncer::new(300);
        assert!(debouncer.accept(1000));
        assert!(!debouncer.accept(1299));
        assert!(debouncer.accept(1300));
    }

    #[test]
    fn test_armed_window_blocks_first_press() {
        let mut debouncer = Debouncer::new(300);
        debouncer.arm(0);
        assert!(!debouncer.ready(100));
        assert!(debouncer.accept(300));
    }

    #[test]
    fn test_button_round_trip() {
        for button in [Button::Up, Button::Down, Button::Left, Button::Right, Button::Center] {
            assert_eq!(Buttons::from(button).primary(), Some(button));
        }
    }
}
