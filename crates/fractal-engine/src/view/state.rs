/// Immutable camera configuration.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ViewConfig {
    /// Base of the zoom curve, `zoom_factor = zoom_base^zoom_level`.
    ///
    /// Must lie in `(0, 1)` so that positive levels magnify.
    pub zoom_base: f64,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self { zoom_base: 0.8 }
    }
}

/// Camera offset and zoom.
///
/// `zoom_level` is an unbounded step count. The zoom factor is a scale
/// divisor applied to world coordinates: it shrinks as the level grows.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewState {
    config: ViewConfig,
    camera_offset: (f64, f64),
    zoom_level: f64,
}

impl ViewState {
    pub fn new(config: ViewConfig) -> Self {
        debug_assert!(
            config.zoom_base > 0.0 && config.zoom_base < 1.0,
            "zoom base must lie in (0, 1)"
        );
        Self {
            config,
            camera_offset: (0.0, 0.0),
            zoom_level: 0.0,
        }
    }

    #[inline]
    pub fn camera_offset(&self) -> (f64, f64) {
        self.camera_offset
    }

    #[inline]
    pub fn zoom_level(&self) -> f64 {
        self.zoom_level
    }

    /// Derived scale, `zoom_base^zoom_level`.
    #[inline]
    pub fn zoom_factor(&self) -> f64 {
        self.config.zoom_base.powf(self.zoom_level)
    }

    /// Sets the zoom level. Any finite or infinite value is accepted.
    pub fn set_zoom_level(&mut self, level: f64) {
        self.zoom_level = level;
    }

    /// Adds `steps` to the zoom level.
    pub fn zoom_by(&mut self, steps: f64) {
        self.set_zoom_level(self.zoom_level + steps);
    }

    /// Pans by a screen-space pixel delta.
    ///
    /// The horizontal axis is negated (dragging right moves the camera left,
    /// so the world follows the pointer) and the vertical axis is inverted
    /// (screen +Y is down, world +Y is up).
    pub fn pan(&mut self, delta_x_px: f64, delta_y_px: f64, viewport_height_px: f64) {
        let speed = 2.0 * self.zoom_factor() / viewport_height_px;
        self.camera_offset.0 -= delta_x_px * speed;
        self.camera_offset.1 += delta_y_px * speed;
    }
}

impl Default for ViewState {
    fn default() -> Self {
        Self::new(ViewConfig::default())
    }
}
