//! Interactive walkthrough of a single glTF scene with automatically
//! discovered points of interest and camera fly-to.

pub mod engine;
pub mod rpc;
pub mod tools;

pub use engine::core::app_setup::create_app;
