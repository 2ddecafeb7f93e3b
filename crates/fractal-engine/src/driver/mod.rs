//! Per-frame glue between input, camera and renderer.
//!
//! The driver owns the camera and simulation parameters. Each frame it
//! consumes pointer events, applies held-key rates scaled by the frame
//! delta, and snapshots toggles into typed pass inputs.

mod config;
mod frame_driver;

pub use config::{DriverConfig, KeyBindings};
pub use frame_driver::{Action, FrameDriver, SimulationParams};
