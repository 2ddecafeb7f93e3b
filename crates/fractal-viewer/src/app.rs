use fractal_engine::core::{App, AppControl, FrameCtx};
use fractal_engine::driver::{Action, FrameDriver};
use fractal_engine::render::RenderPipeline;

use crate::config::ViewerConfig;

/// Viewer state driven once per redraw by the runtime.
pub struct FractalApp {
    driver: FrameDriver,
    /// Created on the first frame, once a device and surface format exist.
    pipeline: Option<RenderPipeline>,
}

impl FractalApp {
    pub fn new(config: &ViewerConfig) -> Self {
        Self {
            driver: FrameDriver::new(config.driver.clone(), config.view),
            pipeline: None,
        }
    }
}

impl App for FractalApp {
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        let time = ctx.time;
        log::trace!(
            "frame {} took {:.2} ms",
            time.frame_index,
            time.dt as f64 * 1000.0
        );

        for action in self.driver.actions(ctx.input_frame) {
            match action {
                Action::Exit => return AppControl::Exit,
                Action::ToggleFullscreen => ctx.runtime.toggle_fullscreen(ctx.window.id),
            }
        }

        let resolution = ctx.surface_size();
        if resolution.0 == 0 || resolution.1 == 0 {
            return AppControl::Continue;
        }

        // Drag deltas arrive in logical pixels.
        let (_, logical_height) = ctx.window.logical_size();
        let inputs = self.driver.step(
            ctx.input,
            ctx.input_frame,
            logical_height as f64,
            time.dt as f64,
            resolution,
            time.total,
        );

        let pipeline = &mut self.pipeline;
        let mut init_error = None;

        let control = ctx.render(|rctx, target| {
            if pipeline.is_none() {
                match RenderPipeline::new(rctx) {
                    Ok(p) => *pipeline = Some(p),
                    Err(e) => {
                        init_error = Some(e);
                        return;
                    }
                }
            }
            if let Some(p) = pipeline.as_mut() {
                p.render(rctx, target, &inputs);
            }
        });

        if let Some(e) = init_error {
            log::error!("failed to create render pipeline: {e:#}");
            return AppControl::Exit;
        }
        control
    }
}
