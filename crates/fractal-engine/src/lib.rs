//! Fractal engine crate.
//!
//! Platform runtime, GPU context, input tracking, camera model and the
//! multi-pass fractal renderer used by the viewer.

pub mod device;
pub mod window;
pub mod input;
pub mod time;
pub mod core;

pub mod logging;
pub mod view;
pub mod driver;
pub mod render;
