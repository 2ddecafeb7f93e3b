use crate::input::Key;

/// Keys the viewer reacts to.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct KeyBindings {
    /// Held: zoom in continuously.
    pub zoom_in: Key,
    /// Held: increase `dot_mass`.
    pub mass_up: Key,
    /// Held: decrease `dot_mass`.
    pub mass_down: Key,

    /// Toggle: coordinate grid overlay.
    pub grid: Key,
    /// Toggle: height blur.
    pub blur: Key,
    /// Toggle: lit relief shading.
    pub shaded_3d: Key,
    /// Toggle: monochrome composite.
    pub monochrome: Key,

    /// Press: switch between windowed and fullscreen.
    pub fullscreen: Key,
    /// Press: quit.
    pub exit: Key,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            zoom_in: Key::Space,
            mass_up: Key::ArrowUp,
            mass_down: Key::ArrowDown,
            grid: Key::G,
            blur: Key::B,
            shaded_3d: Key::Digit3,
            monochrome: Key::W,
            fullscreen: Key::F11,
            exit: Key::Escape,
        }
    }
}

/// Rates and initial values for the frame driver.
#[derive(Debug, Clone, PartialEq)]
pub struct DriverConfig {
    /// Zoom levels per second while `zoom_in` is held.
    pub zoom_hold_rate: f64,

    /// `dot_mass` units per second while a mass key is held.
    pub mass_rate: f64,

    pub initial_dot_mass: f64,

    /// Pixel-precise wheel deltas are divided by this to get zoom steps.
    pub pixels_per_scroll_step: f64,

    pub bindings: KeyBindings,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            zoom_hold_rate: 5.0,
            mass_rate: 0.2,
            initial_dot_mass: 0.1,
            pixels_per_scroll_step: 50.0,
            bindings: KeyBindings::default(),
        }
    }
}
