//! Tuning constants shared by the walkthrough engine.

pub mod flight;
pub mod markers;
pub mod path;
pub mod render_settings;
