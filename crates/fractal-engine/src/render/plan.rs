//! Per-frame pass schedule.
//!
//! A `FramePlan` is pure data: the ordered passes of one frame, the surfaces
//! each pass reads and writes, and the dispatch grid. It is validated before
//! any GPU work is recorded.

use anyhow::{Result, bail, ensure};

/// Edge length of one generation/blur workgroup tile, in texels.
///
/// Must match `@workgroup_size` in `fractal.wgsl` and `blur.wgsl`.
pub const TILE_SIZE: u32 = 32;

/// GPU surfaces touched by the pipeline within one frame.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Surface {
    /// Color written by generation.
    Albedo,
    /// Authoritative height field.
    Height,
    /// Ping-pong partner of `Height`; scratch within the blur pass only.
    HeightSwap,
    /// The swapchain image.
    Framebuffer,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum BlurAxis {
    Horizontal,
    Vertical,
}

impl BlurAxis {
    /// Value of the `axis` field in the blur kernel's parameter block.
    #[inline]
    pub fn index(self) -> u32 {
        match self {
            BlurAxis::Horizontal => 0,
            BlurAxis::Vertical => 1,
        }
    }
}

/// Workgroup counts for a compute dispatch.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct Dispatch {
    pub x: u32,
    pub y: u32,
}

impl Dispatch {
    /// Smallest grid of `TILE_SIZE` tiles covering `width × height`.
    ///
    /// The last row/column of tiles may overhang; kernels discard texels
    /// outside the surface.
    pub fn covering(width: u32, height: u32) -> Self {
        Self {
            x: width.div_ceil(TILE_SIZE),
            y: height.div_ceil(TILE_SIZE),
        }
    }

    /// Texel extent covered by the grid (including overhang).
    pub fn extent(self) -> (u32, u32) {
        (self.x * TILE_SIZE, self.y * TILE_SIZE)
    }
}

/// One pass of a frame.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Pass {
    Generate,
    Blur(BlurAxis),
    Composite,
}

impl Pass {
    /// Surfaces whose contents this pass consumes.
    pub fn reads(self) -> &'static [Surface] {
        match self {
            Pass::Generate => &[],
            Pass::Blur(BlurAxis::Horizontal) => &[Surface::Height],
            Pass::Blur(BlurAxis::Vertical) => &[Surface::HeightSwap],
            Pass::Composite => &[Surface::Albedo, Surface::Height],
        }
    }

    /// Surfaces this pass overwrites.
    pub fn writes(self) -> &'static [Surface] {
        match self {
            Pass::Generate => &[Surface::Albedo, Surface::Height],
            Pass::Blur(BlurAxis::Horizontal) => &[Surface::HeightSwap],
            Pass::Blur(BlurAxis::Vertical) => &[Surface::Height],
            Pass::Composite => &[Surface::Framebuffer],
        }
    }

    /// Blur source and destination, for passes that have them.
    pub fn blur_route(self) -> Option<(Surface, Surface)> {
        match self {
            Pass::Blur(_) => Some((self.reads()[0], self.writes()[0])),
            _ => None,
        }
    }
}

/// Ordered passes for one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct FramePlan {
    passes: Vec<Pass>,
    dispatch: Dispatch,
}

impl FramePlan {
    /// Builds the schedule: generate, optional two-axis blur, composite.
    pub fn build(blur: bool, width: u32, height: u32) -> Self {
        let mut passes = Vec::with_capacity(4);
        passes.push(Pass::Generate);
        if blur {
            passes.push(Pass::Blur(BlurAxis::Horizontal));
            passes.push(Pass::Blur(BlurAxis::Vertical));
        }
        passes.push(Pass::Composite);

        Self {
            passes,
            dispatch: Dispatch::covering(width, height),
        }
    }

    #[inline]
    pub fn passes(&self) -> &[Pass] {
        &self.passes
    }

    #[inline]
    pub fn dispatch(&self) -> Dispatch {
        self.dispatch
    }

    /// Checks ordering and aliasing rules:
    /// - generation first, composite last, each exactly once
    /// - every read is preceded by a write earlier in the same frame
    /// - no pass reads and writes the same surface
    /// - composite reads the height surface that was written last
    /// - the dispatch grid is non-empty
    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.dispatch.x > 0 && self.dispatch.y > 0,
            "empty dispatch grid {:?}",
            self.dispatch
        );
        ensure!(
            self.passes.first() == Some(&Pass::Generate),
            "generation must run first"
        );
        ensure!(
            self.passes.last() == Some(&Pass::Composite),
            "composite must run last"
        );
        ensure!(
            self.passes.iter().filter(|p| **p == Pass::Generate).count() == 1
                && self.passes.iter().filter(|p| **p == Pass::Composite).count() == 1,
            "generation and composite must each run once"
        );

        let mut written: Vec<Surface> = Vec::with_capacity(4);
        let mut latest_height: Option<Surface> = None;

        for (i, pass) in self.passes.iter().enumerate() {
            for s in pass.reads() {
                if pass.writes().contains(s) {
                    bail!("pass {i} ({pass:?}) reads and writes {s:?}");
                }
                if !written.contains(s) {
                    bail!("pass {i} ({pass:?}) reads {s:?} before it is written this frame");
                }
            }

            if *pass == Pass::Composite && latest_height != Some(Surface::Height) {
                bail!("composite would read {latest_height:?} instead of the primary height");
            }

            for s in pass.writes() {
                if matches!(s, Surface::Height | Surface::HeightSwap) {
                    latest_height = Some(*s);
                }
                if !written.contains(s) {
                    written.push(*s);
                }
            }
        }

        Ok(())
    }

    /// Whether `surface` is read by any pass of this plan.
    pub fn reads(&self, surface: Surface) -> bool {
        self.passes.iter().any(|p| p.reads().contains(&surface))
    }
}
