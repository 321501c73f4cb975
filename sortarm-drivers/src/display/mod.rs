//! Display backends

pub mod text;

pub use text::TextDisplay;
