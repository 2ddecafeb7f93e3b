//! Camera model for the fractal view.
//!
//! World space is the plane the generation kernel samples. The camera is an
//! offset into that plane plus a zoom level; the zoom factor applied to
//! geometry is derived from the level and never stored on its own.

mod state;

pub use state::{ViewConfig, ViewState};
