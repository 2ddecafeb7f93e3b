use super::encoder::record;
use super::params::FrameInputs;
use super::passes::GpuPasses;
use super::plan::FramePlan;
use super::surfaces::FieldSurfaces;
use super::{RenderCtx, RenderTarget};

/// Fractal landscape renderer.
///
/// Owns the three pass pipelines and the resolution-sized field surfaces.
/// Each frame runs generation, the optional two-axis blur, then composites
/// into the target view.
pub struct RenderPipeline {
    passes: GpuPasses,
    surfaces: FieldSurfaces,
}

impl RenderPipeline {
    /// Builds pipelines for `ctx.surface_format` and surfaces for `ctx.size`.
    pub fn new(ctx: &RenderCtx<'_>) -> anyhow::Result<Self> {
        let (w, h) = ctx.size;
        anyhow::ensure!(w > 0 && h > 0, "cannot render into an empty {w}x{h} target");

        for blur in [false, true] {
            FramePlan::build(blur, w, h).validate()?;
        }

        let mut passes = GpuPasses::new(ctx.device, ctx.surface_format);
        let surfaces = FieldSurfaces::new(ctx.device, ctx.size);
        passes.bind_surfaces(ctx.device, &surfaces);

        log::info!("fractal pipeline ready ({:?}, {w}x{h})", ctx.surface_format);

        Ok(Self {
            passes,
            surfaces,
        })
    }

    /// Records one frame into `target`.
    ///
    /// Surfaces follow `ctx.size`; `inputs.resolution` must match it.
    pub fn render(
        &mut self,
        ctx: &RenderCtx<'_>,
        target: &mut RenderTarget<'_>,
        inputs: &FrameInputs,
    ) {
        if ctx.size.0 == 0 || ctx.size.1 == 0 {
            return;
        }
        if self.surfaces.size() != ctx.size {
            self.surfaces = FieldSurfaces::new(ctx.device, ctx.size);
            self.passes.bind_surfaces(ctx.device, &self.surfaces);
        }
        assert_eq!(
            self.surfaces.size(),
            inputs.resolution,
            "frame inputs were built for a different resolution"
        );

        let (w, h) = inputs.resolution;
        let plan = FramePlan::build(inputs.toggles.blur, w, h);
        if cfg!(debug_assertions) {
            if let Err(err) = plan.validate() {
                panic!("invalid frame plan: {err:#}");
            }
        }

        let mut encoder =
            self.passes
                .encoder(ctx.queue, target.encoder, target.color_view, ctx.size);
        record(&plan, inputs, &mut encoder);
    }
}
