//! Mode state machine

use super::events::Event;

/// Operating modes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Mode {
    /// Menu visible, arm idle
    #[default]
    Menu,
    /// Sorting cycles executing
    Running,
    /// Motion held after a short interrupt press
    Paused,
    /// Emergency recovery in progress; not interruptible
    Emergency,
}

impl Mode {
    /// Whether operator interrupts are honored during motions
    pub fn interruptible(&self) -> bool {
        matches!(self, Mode::Running)
    }

    /// Process an event and return the next mode
    pub fn transition(self, event: Event) -> Self {
        use Event::*;
        use Mode::*;

        match (self, event) {
            (Menu, Start) => Running,

            (Running, Pause) => Paused,
            (Running, CancelToMenu) => Menu,
            (Running, EmergencyStop) => Emergency,

            (Paused, Resume) => Running,
            (Paused, CancelToMenu) => Menu,
            (Paused, EmergencyStop) => Emergency,

            (Emergency, RecoveryComplete) => Menu,

            _ => self,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_start_only_from_menu() {
        assert_eq!(Mode::Menu.transition(Event::Start), Mode::Running);
        assert_eq!(Mode::Paused.transition(Event::Start), Mode::Paused);
        assert_eq!(Mode::Emergency.transition(Event::Start), Mode::Emergency);
    }

    #[test]
    fn test_pause_resume_cycle() {
        let mode = Mode::Running.transition(Event::Pause);
        assert_eq!(mode, Mode::Paused);
        assert_eq!(mode.transition(Event::Resume), Mode::Running);
    }

    #[test]
    fn test_cancel_returns_to_menu() {
        for mode in [Mode::Running, Mode::Paused] {
            assert_eq!(mode.transition(Event::CancelToMenu), Mode::Menu);
        }
    }

    #[test]
    fn test_emergency_cannot_be_cancelled() {
        let mode = Mode::Running.transition(Event::EmergencyStop);
        assert_eq!(mode.transition(Event::CancelToMenu), Mode::Emergency);
        assert_eq!(mode.transition(Event::Resume), Mode::Emergency);
        assert_eq!(mode.transition(Event::RecoveryComplete), Mode::Menu);
    }

    #[test]
    fn test_only_running_is_interruptible() {
        assert!(Mode::Running.interruptible());
        assert!(!Mode::Menu.interruptible());
        assert!(!Mode::Paused.interruptible());
        assert!(!Mode::Emergency.interruptible());
    }
}
