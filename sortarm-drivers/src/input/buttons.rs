//! Scripted buttons
//!
//! A timeline of button presses, each held for a fixed duration. The
//! buttons read as pressed while the virtual clock is inside a press.

use heapless::Vec;
use sortarm_core::traits::Buttons;

/// Presses a script can hold
pub const MAX_PRESSES: usize = 64;

/// Default hold for a scripted press, long enough to pass a 50 ms poll
pub const DEFAULT_HOLD_MS: u32 = 100;

/// One scripted press
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScriptedPress {
    /// Virtual time the press begins
    pub at_ms: u64,
    pub buttons: Buttons,
    pub hold_ms: u32,
}

impl ScriptedPress {
    pub const fn new(at_ms: u64, buttons: Buttons, hold_ms: u32) -> Self {
        Self {
            at_ms,
            buttons,
            hold_ms,
        }
    }

    /// A short tap
    pub const fn tap(at_ms: u64, buttons: Buttons) -> Self {
        Self::new(at_ms, buttons, DEFAULT_HOLD_MS)
    }

    fn active(&self, now_ms: u64) -> bool {
        now_ms >= self.at_ms && now_ms < self.at_ms + u64::from(self.hold_ms)
    }
}

/// Button timeline
#[derive(Debug, Clone, Default)]
pub struct ButtonScript {
    presses: Vec<ScriptedPress, MAX_PRESSES>,
}

impl ButtonScript {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a press; returns it back if the script is full
    pub fn push(&mut self, press: ScriptedPress) -> Result<(), ScriptedPress> {
        self.presses.push(press)
    }

    /// Buttons held at `now_ms`
    pub fn state_at(&self, now_ms: u64) -> Buttons {
        self.presses
            .iter()
            .filter(|press| press.active(now_ms))
            .fold(Buttons::empty(), |held, press| held | press.buttons)
    }

    /// Whether any press is still to come or in progress
    pub fn pending_after(&self, now_ms: u64) -> bool {
        self.presses
            .iter()
            .any(|press| press.at_ms + u64::from(press.hold_ms) > now_ms)
    }

    pub fn len(&self) -> usize {
        self.presses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.presses.is_empty()
    }
}
