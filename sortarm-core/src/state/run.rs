//! Mutable run status

use super::events::Event;
use super::machine::Mode;
use crate::classify::Classification;
use crate::motion::SeekRequest;

/// Where the current sorting cycle is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CyclePhase {
    #[default]
    Idle,
    Picking,
    Classifying,
    Dispatching,
}

impl CyclePhase {
    pub const fn name(self) -> &'static str {
        match self {
            CyclePhase::Idle => "Idle",
            CyclePhase::Picking => "Picking",
            CyclePhase::Classifying => "Classifying",
            CyclePhase::Dispatching => "Dispatching",
        }
    }
}

/// Everything that changes while the program runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RunState {
    mode: Mode,
    /// Phase of the cycle in progress
    pub phase: CyclePhase,
    /// Most recent classification, shown on the running screen
    pub last_classification: Classification,
    /// Set by emergency recovery, consumed by the next cycle
    pub after_emergency: bool,
    /// Motion held while paused, re-issued on resume
    pub interrupted: Option<SeekRequest>,
    /// Emergency recoveries performed
    pub emergencies: u32,
}

impl RunState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Apply an event and return the resulting mode
    pub fn apply(&mut self, event: Event) -> Mode {
        let next = self.mode.transition(event);
        if next != self.mode {
            log_debug!("mode {:?} -> {:?} on {:?}", self.mode, next, event);
        }
        self.mode = next;
        self.mode
    }

    /// Forget any partially completed cycle
    pub fn discard_cycle(&mut self) {
        self.phase = CyclePhase::Idle;
        self.interrupted = None;
    }

    /// Consume the after-emergency flag
    pub fn take_after_emergency(&mut self) -> bool {
        core::mem::take(&mut self.after_emergency)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_after_emergency_consumed_once() {
        let mut state = RunState::new();
        state.after_emergency = true;
        assert!(state.take_after_emergency());
        assert!(!state.take_after_emergency());
    }

    #[test]
    fn test_apply_follows_machine() {
        let mut state = RunState::new();
        assert_eq!(state.apply(Event::Resume), Mode::Menu);
        assert_eq!(state.apply(Event::Start), Mode::Running);
        assert_eq!(state.mode(), Mode::Running);
    }
}
