//! Display abstraction for the SortArm controller
//!
//! This crate provides:
//! - `DisplayBackend` trait for the brick's text-capable screen
//! - `Screen` character buffer that the controller renders into
//!
//! # Architecture
//!
//! The controller never talks to display hardware directly. It builds a
//! `Screen` (title row, item rows with an optional inverted highlight, a
//! footer) and pushes it to whatever `DisplayBackend` the platform provides:
//! the LCD on the robot brick, an in-memory buffer in tests, or a terminal in
//! the host simulator.

#![no_std]
#![deny(unsafe_code)]

pub mod backend;
pub mod screen;

pub use backend::{DisplayBackend, DisplayError};
pub use screen::{Screen, LINE_LEN, SCREEN_COLS, SCREEN_ROWS};
