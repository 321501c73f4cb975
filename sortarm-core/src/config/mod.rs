//! Configuration types
//!
//! Board-agnostic configuration: the zone table and timing an operator
//! edits through the menu, capability flags for robot variants, and the
//! numeric calibration of the arm.

pub mod calibration;
pub mod session;
pub mod zone;

pub use calibration::Calibration;
pub use session::{Capabilities, ConfigError, SessionConfig};
pub use zone::{Dispatch, HeightClass, Zone, ZoneTable, MAX_ZONES, MIN_ZONES};
