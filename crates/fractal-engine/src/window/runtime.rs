use anyhow::{Context, Result};
use ouroboros::self_referencing;
use std::collections::HashMap;

use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Fullscreen, Window, WindowId};

use crate::core::{App as CoreApp, AppControl, FrameCtx, WindowCtx};
use crate::device::{Gpu, GpuInit};
use crate::input::platform::winit::translate_window_event;
use crate::input::{InputFrame, InputState};
use crate::time::{FrameClock, FrameTime};

/// Window/runtime configuration.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub title: String,
    /// Windowed size; also restored when leaving fullscreen.
    pub initial_size: LogicalSize<f64>,
    pub resizable: bool,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            title: "Fractal".to_string(),
            initial_size: LogicalSize::new(1280.0, 720.0),
            resizable: false,
        }
    }
}

/// Presentation mode of a window.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub enum WindowMode {
    #[default]
    Windowed,
    /// Borderless fullscreen on the window's current monitor.
    Fullscreen,
}

impl WindowMode {
    #[inline]
    pub fn toggled(self) -> Self {
        match self {
            WindowMode::Windowed => WindowMode::Fullscreen,
            WindowMode::Fullscreen => WindowMode::Windowed,
        }
    }

    /// What to ask the window for when leaving `self`.
    ///
    /// Windowed mode always comes back at `windowed_size`, whatever size
    /// the fullscreen monitor had.
    pub(crate) fn toggle_change(self, windowed_size: LogicalSize<f64>) -> ModeChange {
        match self.toggled() {
            WindowMode::Fullscreen => ModeChange::EnterFullscreen,
            WindowMode::Windowed => ModeChange::LeaveFullscreen {
                restore_size: windowed_size,
            },
        }
    }
}

/// Window operation that realizes a mode switch.
#[derive(Debug, Copy, Clone, PartialEq)]
pub(crate) enum ModeChange {
    EnterFullscreen,
    LeaveFullscreen { restore_size: LogicalSize<f64> },
}

impl ModeChange {
    #[inline]
    pub(crate) fn mode(self) -> WindowMode {
        match self {
            ModeChange::EnterFullscreen => WindowMode::Fullscreen,
            ModeChange::LeaveFullscreen { .. } => WindowMode::Windowed,
        }
    }
}

/// Runtime context passed to the application.
///
/// Commands are buffered and applied after the current callback returns.
#[derive(Default)]
pub struct RuntimeCtx {
    commands: Vec<Command>,
}

impl RuntimeCtx {
    pub fn toggle_fullscreen(&mut self, id: WindowId) {
        self.commands.push(Command::ToggleFullscreen(id));
    }

    pub fn exit(&mut self) {
        self.commands.push(Command::Exit);
    }
}

enum Command {
    ToggleFullscreen(WindowId),
    Exit,
}

/// Entry point for the runtime.
pub struct Runtime;

impl Runtime {
    /// Runs the event loop until the last window closes or the app exits.
    ///
    /// Fails if the event loop, the first window, or its GPU context cannot
    /// be created.
    pub fn run<A>(initial: RuntimeConfig, gpu_init: GpuInit, app: A) -> Result<()>
    where
        A: 'static + CoreApp,
    {
        let event_loop = EventLoop::new().context("failed to create winit EventLoop")?;
        let mut state = AppState::new(initial, gpu_init, app);

        event_loop
            .run_app(&mut state)
            .context("winit event loop terminated with error")?;

        match state.startup_error.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

#[self_referencing]
struct WindowEntry {
    input_state: InputState,
    input_frame: InputFrame,
    clock: FrameClock,

    mode: WindowMode,
    windowed_size: LogicalSize<f64>,

    window: Window,

    #[borrows(window)]
    #[covariant]
    gpu: Gpu<'this>,
}

struct AppState<A>
where
    A: CoreApp + 'static,
{
    initial: RuntimeConfig,
    gpu_init: GpuInit,
    app: A,

    windows: HashMap<WindowId, WindowEntry>,
    exit_requested: bool,
    startup_error: Option<anyhow::Error>,
}

impl<A> AppState<A>
where
    A: CoreApp + 'static,
{
    fn new(initial: RuntimeConfig, gpu_init: GpuInit, app: A) -> Self {
        Self {
            initial,
            gpu_init,
            app,
            windows: HashMap::new(),
            exit_requested: false,
            startup_error: None,
        }
    }

    fn request_exit(&mut self) {
        self.exit_requested = true;
    }

    fn create_window_entry(
        &mut self,
        event_loop: &ActiveEventLoop,
        config: RuntimeConfig,
    ) -> Result<WindowId> {
        let attrs = Window::default_attributes()
            .with_title(config.title)
            .with_inner_size(config.initial_size)
            .with_resizable(config.resizable);

        let window = event_loop
            .create_window(attrs)
            .context("failed to create window")?;

        let id = window.id();
        let gpu_init = self.gpu_init.clone();

        let entry = WindowEntryTryBuilder {
            input_state: InputState::default(),
            input_frame: InputFrame::default(),
            clock: FrameClock::default(),
            mode: WindowMode::Windowed,
            windowed_size: config.initial_size,
            window,
            gpu_builder: |w| {
                pollster::block_on(Gpu::new(w, gpu_init))
                    .context("GPU initialization failed for window")
            },
        }
        .try_build()?;

        log::info!("window {id:?} created");
        self.windows.insert(id, entry);
        Ok(id)
    }

    fn destroy_window_entry(&mut self, id: WindowId) {
        self.windows.remove(&id);
    }

    fn toggle_fullscreen(&mut self, id: WindowId) {
        let Some(entry) = self.windows.get_mut(&id) else {
            return;
        };

        entry.with_mut(|fields| {
            let change = fields.mode.toggle_change(*fields.windowed_size);

            match change {
                ModeChange::EnterFullscreen => {
                    let monitor = fields.window.current_monitor();
                    fields.window.set_fullscreen(Some(Fullscreen::Borderless(monitor)));
                }
                ModeChange::LeaveFullscreen { restore_size } => {
                    fields.window.set_fullscreen(None);
                    // The new size arrives later as `Resized` when not applied immediately.
                    let _ = fields.window.request_inner_size(restore_size);
                }
            }

            log::debug!("window {id:?} mode {:?} -> {:?}", fields.mode, change.mode());
            *fields.mode = change.mode();
        });
    }

    fn apply_commands(&mut self, event_loop: &ActiveEventLoop, mut ctx: RuntimeCtx) {
        for cmd in ctx.commands.drain(..) {
            match cmd {
                Command::ToggleFullscreen(id) => self.toggle_fullscreen(id),
                Command::Exit => self.request_exit(),
            }
        }

        if self.windows.is_empty() {
            self.request_exit();
        }

        if self.exit_requested {
            event_loop.exit();
        }
    }
}

impl<A> ApplicationHandler for AppState<A>
where
    A: CoreApp + 'static,
{
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if !self.windows.is_empty() {
            return;
        }

        if let Err(e) = self.create_window_entry(event_loop, self.initial.clone()) {
            log::error!("failed to create initial window: {e:#}");
            self.startup_error = Some(e);
            self.request_exit();
            event_loop.exit();
            return;
        }

        for entry in self.windows.values() {
            entry.with_window(|w| w.request_redraw());
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if self.exit_requested {
            event_loop.exit();
            return;
        }

        event_loop.set_control_flow(ControlFlow::Wait);

        // Continuous redraw.
        for entry in self.windows.values() {
            entry.with_window(|w| w.request_redraw());
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        window_id: WindowId,
        event: WindowEvent,
    ) {
        if self.exit_requested {
            event_loop.exit();
            return;
        }

        let (app, windows) = (&mut self.app, &mut self.windows);

        let Some(entry) = windows.get_mut(&window_id) else {
            return;
        };

        let mut exit_from_app_event = false;

        entry.with_mut(|fields| {
            if let Some(ev) = translate_window_event(fields.window, fields.input_state, &event) {
                fields.input_state.apply_event(fields.input_frame, ev);
            }

            if app.on_window_event(window_id, &event) == AppControl::Exit {
                exit_from_app_event = true;
            }
        });

        if exit_from_app_event {
            self.request_exit();
            event_loop.exit();
            return;
        }

        // Runtime-managed window lifecycle / resize / redraw handling.
        match &event {
            WindowEvent::CloseRequested => {
                self.destroy_window_entry(window_id);
                if self.windows.is_empty() {
                    self.request_exit();
                    event_loop.exit();
                }
            }

            WindowEvent::Resized(new_size) => {
                if let Some(entry) = self.windows.get_mut(&window_id) {
                    log::debug!("window {window_id:?} resized to {}x{}", new_size.width, new_size.height);
                    entry.with_gpu_mut(|gpu| gpu.resize(*new_size));
                    entry.with_window(|w| w.request_redraw());
                }
            }

            WindowEvent::ScaleFactorChanged { .. } => {
                if let Some(entry) = self.windows.get_mut(&window_id) {
                    let new_size = entry.with_window(|w| w.inner_size());
                    entry.with_gpu_mut(|gpu| gpu.resize(new_size));
                    entry.with_window(|w| w.request_redraw());
                }
            }

            WindowEvent::RedrawRequested => {
                let mut runtime_ctx = RuntimeCtx::default();
                let mut app_control = AppControl::Continue;

                // Drive one frame for this window.
                if let Some(entry) = self.windows.get_mut(&window_id) {
                    entry.with_mut(|fields| {
                        let ft: FrameTime = fields.clock.tick();

                        // Scope to ensure `ctx` is dropped before mutating frame state.
                        {
                            let mut ctx = FrameCtx {
                                window: WindowCtx {
                                    id: window_id,
                                    window: fields.window,
                                    mode: *fields.mode,
                                },
                                gpu: fields.gpu,
                                input: fields.input_state,
                                input_frame: fields.input_frame,
                                time: ft,
                                runtime: &mut runtime_ctx,
                            };

                            app_control = self.app.on_frame(&mut ctx);
                        }

                        // Clear per-frame deltas after the frame is consumed.
                        fields.input_frame.clear();
                    });
                }

                if app_control == AppControl::Exit {
                    runtime_ctx.exit();
                }

                self.apply_commands(event_loop, runtime_ctx);
            }

            _ => {}
        }

        if self.exit_requested {
            event_loop.exit();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_viewer_window() {
        let cfg = RuntimeConfig::default();
        assert_eq!(cfg.title, "Fractal");
        assert_eq!(cfg.initial_size, LogicalSize::new(1280.0, 720.0));
        assert!(!cfg.resizable);
    }

    #[test]
    fn window_mode_toggles_back_and_forth() {
        let m = WindowMode::default();
        assert_eq!(m, WindowMode::Windowed);
        assert_eq!(m.toggled(), WindowMode::Fullscreen);
        assert_eq!(m.toggled().toggled(), m);
    }

    #[test]
    fn leaving_fullscreen_restores_configured_size() {
        let cfg = RuntimeConfig::default();

        let enter = WindowMode::Windowed.toggle_change(cfg.initial_size);
        assert_eq!(enter, ModeChange::EnterFullscreen);
        assert_eq!(enter.mode(), WindowMode::Fullscreen);

        let leave = enter.mode().toggle_change(cfg.initial_size);
        assert_eq!(
            leave,
            ModeChange::LeaveFullscreen {
                restore_size: LogicalSize::new(1280.0, 720.0)
            }
        );
        assert_eq!(leave.mode(), WindowMode::Windowed);
    }

    #[test]
    fn repeated_toggles_alternate_modes() {
        let size = LogicalSize::new(800.0, 600.0);
        let mut mode = WindowMode::default();
        let mut seen = Vec::new();
        for _ in 0..4 {
            mode = mode.toggle_change(size).mode();
            seen.push(mode);
        }
        assert_eq!(
            seen,
            vec![
                WindowMode::Fullscreen,
                WindowMode::Windowed,
                WindowMode::Fullscreen,
                WindowMode::Windowed,
            ]
        );
    }
}
