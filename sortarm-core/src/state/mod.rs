//! Run state
//!
//! The operating mode is a small state machine driven by events; everything
//! else the controller needs to remember between calls lives in `RunState`,
//! which is threaded explicitly through the supervisor and engine.

pub mod events;
pub mod machine;
pub mod run;

pub use events::Event;
pub use machine::Mode;
pub use run::{CyclePhase, RunState};
