use crate::input::{InputEvent, InputFrame, InputState, MouseWheelDelta, PointerDragEvent};
use crate::render::{FrameInputs, FrameToggles};
use crate::view::{ViewConfig, ViewState};

use super::config::DriverConfig;

/// Scalar parameters fed to the generation kernel.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SimulationParams {
    /// Unbounded; may go negative.
    pub dot_mass: f64,
}

/// One-shot requests raised by key presses.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Action {
    ToggleFullscreen,
    Exit,
}

#[derive(Debug, Clone)]
pub struct FrameDriver {
    config: DriverConfig,
    view: ViewState,
    params: SimulationParams,
}

impl FrameDriver {
    pub fn new(config: DriverConfig, view: ViewConfig) -> Self {
        let params = SimulationParams {
            dot_mass: config.initial_dot_mass,
        };
        Self {
            config,
            view: ViewState::new(view),
            params,
        }
    }

    #[inline]
    pub fn view(&self) -> &ViewState {
        &self.view
    }

    #[inline]
    pub fn params(&self) -> SimulationParams {
        self.params
    }

    /// Applies drags and wheel scrolls from `frame` in arrival order.
    ///
    /// `viewport_height` must be in the same units as the drag deltas.
    pub fn apply_pointer_events(&mut self, frame: &InputFrame, viewport_height: f64) {
        for ev in &frame.events {
            match ev {
                InputEvent::PointerDrag(PointerDragEvent { dx, dy, .. }) => {
                    if viewport_height > 0.0 {
                        self.view.pan(*dx as f64, *dy as f64, viewport_height);
                    }
                }
                InputEvent::MouseWheel { delta, .. } => {
                    let steps = match *delta {
                        MouseWheelDelta::Line { y, .. } => y as f64,
                        MouseWheelDelta::Pixel { y, .. } => {
                            y as f64 / self.config.pixels_per_scroll_step
                        }
                    };
                    self.view.zoom_by(steps);
                }
                _ => {}
            }
        }
    }

    /// One-shot actions pressed this frame. Exit comes first.
    pub fn actions(&self, frame: &InputFrame) -> Vec<Action> {
        let b = &self.config.bindings;
        let mut out = Vec::new();
        if frame.key_pressed(b.exit) {
            out.push(Action::Exit);
        }
        if frame.key_pressed(b.fullscreen) {
            out.push(Action::ToggleFullscreen);
        }
        out
    }

    /// Applies held-key rates for `dt` seconds and snapshots the toggles.
    ///
    /// Rates scale with `dt` as given. With the runtime's clock that is the
    /// clamped frame delta, so a stall longer than the clamp advances zoom
    /// and mass by the clamp's worth only.
    pub fn advance(&mut self, input: &InputState, dt: f64) -> FrameToggles {
        let b = self.config.bindings;

        if input.is_held(b.zoom_in) {
            let level = self.view.zoom_level() + dt * self.config.zoom_hold_rate;
            self.view.set_zoom_level(level);
        }

        let mut nudge = 0.0;
        if input.is_held(b.mass_up) {
            nudge += dt * self.config.mass_rate;
        }
        if input.is_held(b.mass_down) {
            nudge -= dt * self.config.mass_rate;
        }
        if nudge != 0.0 {
            self.params.dot_mass += nudge;
            log::debug!("dot_mass = {:.4}", self.params.dot_mass);
        }

        FrameToggles {
            grid_lines: input.is_toggled(b.grid),
            blur: input.is_toggled(b.blur),
            shaded_3d: input.is_toggled(b.shaded_3d),
            monochrome: input.is_toggled(b.monochrome),
        }
    }

    pub fn frame_inputs(
        &self,
        toggles: FrameToggles,
        resolution: (u32, u32),
        total_time: f64,
    ) -> FrameInputs {
        FrameInputs {
            camera_offset: self.view.camera_offset(),
            zoom_factor: self.view.zoom_factor(),
            dot_mass: self.params.dot_mass,
            resolution,
            toggles,
            total_time,
        }
    }

    /// Runs a whole frame update: pointer events, held keys, pass inputs.
    pub fn step(
        &mut self,
        input: &InputState,
        frame: &InputFrame,
        viewport_height: f64,
        dt: f64,
        resolution: (u32, u32),
        total_time: f64,
    ) -> FrameInputs {
        self.apply_pointer_events(frame, viewport_height);
        let toggles = self.advance(input, dt);
        self.frame_inputs(toggles, resolution, total_time)
    }
}

impl Default for FrameDriver {
    fn default() -> Self {
        Self::new(DriverConfig::default(), ViewConfig::default())
    }
}
