//! Supervised motion
//!
//! Every arm movement goes through the [`Supervisor`], which polls the
//! interrupt button while an axis is moving and turns a press into a pause
//! or, when held, into emergency recovery.

pub mod emergency;
pub mod homing;
pub mod supervisor;
pub mod target;

pub use emergency::EmergencyReport;
pub use homing::HomingError;
pub use supervisor::{Outcome, Supervisor};
pub use target::{MotionTarget, SeekKind, SeekRequest, GRIPPER_CLOSED};
