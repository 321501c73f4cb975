//! Board-agnostic supervisory logic for the color sorting arm
//!
//! This crate contains all application logic that does not depend on
//! specific hardware implementations:
//!
//! - Hardware abstraction traits (actuator, color sensor, buttons, platform)
//! - Session configuration, zone table and calibration
//! - Classifier for raw color sensor readings
//! - Motion supervisor with pause, resume and emergency recovery
//! - Sorting engine (pick, classify, dispatch)
//! - Menu state machine and the top-level controller loop
//! - Screen rendering

#![no_std]
#![deny(unsafe_code)]

#[macro_use]
mod log;

pub mod classify;
pub mod config;
pub mod controller;
pub mod engine;
pub mod menu;
pub mod motion;
pub mod render;
pub mod state;
pub mod traits;
