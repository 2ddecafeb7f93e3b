//! Typed per-pass parameter blocks.
//!
//! Each block mirrors a WGSL uniform struct field for field. Sizes are
//! asserted at compile time.

use bytemuck::{Pod, Zeroable};

use super::plan::BlurAxis;

/// Radius of the separable blur, in texels.
pub const BLUR_RADIUS: u32 = 4;

/// Period divisor of the orbiting light, `t / 5`.
const LIGHT_PERIOD_DIVISOR: f64 = 5.0;

/// Per-frame switches read from key toggles.
///
/// Passed by value into one frame's pipeline invocation; they never mutate
/// pipeline state.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct FrameToggles {
    pub grid_lines: bool,
    pub blur: bool,
    pub shaded_3d: bool,
    pub monochrome: bool,
}

/// Everything one frame of the pipeline depends on.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct FrameInputs {
    pub camera_offset: (f64, f64),
    pub zoom_factor: f64,
    pub dot_mass: f64,
    /// Surface size in physical pixels.
    pub resolution: (u32, u32),
    pub toggles: FrameToggles,
    /// Seconds since startup.
    pub total_time: f64,
}

/// Light direction orbiting the vertical axis, `(cos(t/5), sin(t/5), 1)`.
///
/// Unnormalized; the composite shader normalizes.
pub fn light_direction(total_time: f64) -> [f32; 3] {
    let a = total_time / LIGHT_PERIOD_DIVISOR;
    [a.cos() as f32, a.sin() as f32, 1.0]
}

// ── generation ────────────────────────────────────────────────────────────

/// Mirrors `GenerateParams` in `fractal.wgsl`.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct GenerateParams {
    pub cam_offset: [f32; 2],
    pub resolution: [u32; 2],
    pub zoom: f32,
    pub dot_mass: f32,
    pub grid_lines: u32,
    pub _pad: u32,
}

const _: () = assert!(std::mem::size_of::<GenerateParams>() == 32);

impl GenerateParams {
    pub fn new(inputs: &FrameInputs) -> Self {
        Self {
            cam_offset: [inputs.camera_offset.0 as f32, inputs.camera_offset.1 as f32],
            resolution: [inputs.resolution.0, inputs.resolution.1],
            zoom: inputs.zoom_factor as f32,
            dot_mass: inputs.dot_mass as f32,
            grid_lines: inputs.toggles.grid_lines as u32,
            _pad: 0,
        }
    }
}

// ── blur ──────────────────────────────────────────────────────────────────

/// Mirrors `BlurParams` in `blur.wgsl`.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct BlurParams {
    pub resolution: [u32; 2],
    pub axis: u32,
    pub radius: u32,
}

const _: () = assert!(std::mem::size_of::<BlurParams>() == 16);

impl BlurParams {
    pub fn new(axis: BlurAxis, resolution: (u32, u32)) -> Self {
        Self {
            resolution: [resolution.0, resolution.1],
            axis: axis.index(),
            radius: BLUR_RADIUS,
        }
    }
}

// ── composite ─────────────────────────────────────────────────────────────

/// Mirrors `CompositeParams` in `composite.wgsl`.
///
/// `sun_dir` is a WGSL `vec3<f32>` (16-byte aligned); `shaded_3d` fills its
/// trailing four bytes.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct CompositeParams {
    pub sun_dir: [f32; 3],
    pub shaded_3d: u32,
    pub resolution: [u32; 2],
    pub monochrome: u32,
    pub _pad: u32,
}

const _: () = assert!(std::mem::size_of::<CompositeParams>() == 32);

impl CompositeParams {
    pub fn new(inputs: &FrameInputs) -> Self {
        Self {
            sun_dir: light_direction(inputs.total_time),
            shaded_3d: inputs.toggles.shaded_3d as u32,
            resolution: [inputs.resolution.0, inputs.resolution.1],
            monochrome: inputs.toggles.monochrome as u32,
            _pad: 0,
        }
    }
}

// ── composite geometry ────────────────────────────────────────────────────

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub(crate) struct TriangleVertex {
    pub pos: [f32; 2],
}

impl TriangleVertex {
    const ATTRS: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![0 => Float32x2];

    pub(crate) fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<TriangleVertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}

/// One oversized triangle whose interior contains the whole NDC square.
pub(crate) const FULLSCREEN_TRIANGLE: [TriangleVertex; 3] = [
    TriangleVertex { pos: [0.0, 20.0] },
    TriangleVertex { pos: [-10.0, -10.0] },
    TriangleVertex { pos: [10.0, -10.0] },
];

#[cfg(test)]
mod tests {
    use super::*;

    fn inputs() -> FrameInputs {
        FrameInputs {
            camera_offset: (1.5, -2.25),
            zoom_factor: 0.512,
            dot_mass: 0.1,
            resolution: (1280, 720),
            toggles: FrameToggles { grid_lines: true, blur: false, shaded_3d: true, monochrome: false },
            total_time: 0.0,
        }
    }

    #[test]
    fn light_orbits_with_fixed_period() {
        assert_eq!(light_direction(0.0), [1.0, 0.0, 1.0]);

        let quarter = light_direction(5.0 * std::f64::consts::FRAC_PI_2);
        assert!(quarter[0].abs() < 1e-6);
        assert!((quarter[1] - 1.0).abs() < 1e-6);
        assert_eq!(quarter[2], 1.0);

        let period = 10.0 * std::f64::consts::PI;
        let a = light_direction(3.0);
        let b = light_direction(3.0 + period);
        assert!((a[0] - b[0]).abs() < 1e-5 && (a[1] - b[1]).abs() < 1e-5);
    }

    #[test]
    fn generate_params_carry_view_and_flags() {
        let p = GenerateParams::new(&inputs());
        assert_eq!(p.cam_offset, [1.5, -2.25]);
        assert_eq!(p.resolution, [1280, 720]);
        assert_eq!(p.zoom, 0.512);
        assert_eq!(p.grid_lines, 1);
    }

    #[test]
    fn blur_params_select_axis() {
        assert_eq!(BlurParams::new(BlurAxis::Horizontal, (8, 4)).axis, 0);
        assert_eq!(BlurParams::new(BlurAxis::Vertical, (8, 4)).axis, 1);
    }

    #[test]
    fn composite_params_carry_shading_modes() {
        let p = CompositeParams::new(&inputs());
        assert_eq!(p.shaded_3d, 1);
        assert_eq!(p.monochrome, 0);
        assert_eq!(p.sun_dir, [1.0, 0.0, 1.0]);
    }

    #[test]
    fn triangle_covers_clip_square() {
        // Barycentric containment of the four NDC corners.
        let [a, b, c] = FULLSCREEN_TRIANGLE.map(|v| v.pos);
        let inside = |p: [f32; 2]| {
            let d = (b[1] - c[1]) * (a[0] - c[0]) + (c[0] - b[0]) * (a[1] - c[1]);
            let l1 = ((b[1] - c[1]) * (p[0] - c[0]) + (c[0] - b[0]) * (p[1] - c[1])) / d;
            let l2 = ((c[1] - a[1]) * (p[0] - c[0]) + (a[0] - c[0]) * (p[1] - c[1])) / d;
            l1 >= 0.0 && l2 >= 0.0 && 1.0 - l1 - l2 >= 0.0
        };
        for p in [[-1.0, -1.0], [1.0, -1.0], [1.0, 1.0], [-1.0, 1.0]] {
            assert!(inside(p), "{p:?}");
        }
    }
}
