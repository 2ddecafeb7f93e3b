//! GPU rendering subsystem.
//!
//! A frame is a fixed sequence of passes over resolution-sized surfaces:
//! generation (compute), an optional separable blur of the height field
//! (compute, ping-pong between primary and swap), then a full-screen
//! composite into the swapchain view.
//!
//! `FramePlan` describes that sequence as data and checks its surface
//! dependencies; `PassEncoder` is the backend seam that records it.

mod ctx;
mod encoder;
mod params;
mod passes;
mod pipeline;
mod plan;
mod surfaces;

#[cfg(test)]
mod reference;

pub use ctx::{RenderCtx, RenderTarget};
pub use encoder::{record, PassEncoder};
pub use params::{
    light_direction, BlurParams, CompositeParams, FrameInputs, FrameToggles, GenerateParams,
    BLUR_RADIUS,
};
pub use pipeline::RenderPipeline;
pub use plan::{BlurAxis, Dispatch, FramePlan, Pass, Surface, TILE_SIZE};
