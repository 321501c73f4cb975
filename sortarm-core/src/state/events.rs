//! Events that trigger mode transitions

/// Events that can change the operating mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Event {
    /// Operator chose "Start" in the main menu
    Start,
    /// Interrupt button released before the emergency threshold
    Pause,
    /// Operator resumed from the paused screen
    Resume,
    /// Operator asked to go back to the menu
    CancelToMenu,
    /// Interrupt button held past the emergency threshold
    EmergencyStop,
    /// Emergency recovery motions completed
    RecoveryComplete,
}
