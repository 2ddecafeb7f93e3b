//! CPU pass backend used by the pipeline tests.
//!
//! Kernels here are simple stand-ins for the WGSL ones; what matters is that
//! they honor the same surface contract (tile dispatch with out-of-bounds
//! discard, blur route, composite reading primary height only).

use super::encoder::PassEncoder;
use super::params::{BlurParams, CompositeParams, GenerateParams};
use super::plan::{Dispatch, Surface, TILE_SIZE};

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct CpuSurfaces {
    pub width: u32,
    pub height: u32,
    pub albedo: Vec<[f32; 4]>,
    pub primary: Vec<f32>,
    pub swap: Vec<f32>,
    pub framebuffer: Vec<[f32; 4]>,
    /// How many times generation wrote each texel in the last frame.
    pub coverage: Vec<u32>,
    /// `(pass name, surfaces read)` in call order.
    pub log: Vec<(&'static str, Vec<Surface>)>,
}

impl CpuSurfaces {
    pub fn new(width: u32, height: u32) -> Self {
        let n = (width * height) as usize;
        Self {
            width,
            height,
            albedo: vec![[0.0; 4]; n],
            primary: vec![0.0; n],
            swap: vec![0.0; n],
            framebuffer: vec![[0.0; 4]; n],
            coverage: vec![0; n],
            log: Vec::new(),
        }
    }

    #[inline]
    fn idx(&self, x: u32, y: u32) -> usize {
        (y * self.width + x) as usize
    }

    fn height_surface(&self, s: Surface) -> &[f32] {
        match s {
            Surface::Height => &self.primary,
            Surface::HeightSwap => &self.swap,
            other => panic!("{other:?} is not a height surface"),
        }
    }

    fn height_surface_mut(&mut self, s: Surface) -> &mut Vec<f32> {
        match s {
            Surface::Height => &mut self.primary,
            Surface::HeightSwap => &mut self.swap,
            other => panic!("{other:?} is not a height surface"),
        }
    }
}

/// Separable box blur along one axis with clamp-to-edge sampling.
pub(crate) fn blur_axis(src: &[f32], width: u32, height: u32, axis: u32, radius: u32) -> Vec<f32> {
    let (w, h, r) = (width as i64, height as i64, radius as i64);
    let mut out = vec![0.0; src.len()];
    for y in 0..h {
        for x in 0..w {
            let mut sum = 0.0;
            for i in -r..=r {
                let (sx, sy) = if axis == 0 {
                    ((x + i).clamp(0, w - 1), y)
                } else {
                    (x, (y + i).clamp(0, h - 1))
                };
                sum += src[(sy * w + sx) as usize];
            }
            out[(y * w + x) as usize] = sum / (2 * r + 1) as f32;
        }
    }
    out
}

fn generate_texel(p: &GenerateParams, x: u32, y: u32) -> ([f32; 4], f32) {
    let (rw, rh) = (p.resolution[0] as f32, p.resolution[1] as f32);
    let (px, py) = (x as f32 + 0.5, y as f32 + 0.5);
    let wx = (2.0 * px - rw) / rh * p.zoom + p.cam_offset[0];
    let wy = (rh - 2.0 * py) / rh * p.zoom + p.cam_offset[1];
    let h = 0.5 + 0.25 * (wx * 3.0 + p.dot_mass).sin() + 0.25 * (wy * 5.0).cos();
    let mut albedo = [h, 1.0 - h, 0.5, 1.0];
    if p.grid_lines != 0 && (wx - wx.round()).abs() < p.zoom * 2.0 / rh {
        albedo = [1.0; 4];
    }
    (albedo, h)
}

impl PassEncoder for CpuSurfaces {
    fn generate(&mut self, params: &GenerateParams, dispatch: Dispatch) {
        assert_eq!(params.resolution, [self.width, self.height]);
        self.coverage.iter_mut().for_each(|c| *c = 0);
        for gy in 0..dispatch.y {
            for gx in 0..dispatch.x {
                for ly in 0..TILE_SIZE {
                    for lx in 0..TILE_SIZE {
                        let (x, y) = (gx * TILE_SIZE + lx, gy * TILE_SIZE + ly);
                        if x >= self.width || y >= self.height {
                            continue;
                        }
                        let (albedo, h) = generate_texel(params, x, y);
                        let i = self.idx(x, y);
                        self.albedo[i] = albedo;
                        self.primary[i] = h;
                        self.coverage[i] += 1;
                    }
                }
            }
        }
        self.log.push(("generate", Vec::new()));
    }

    fn blur(&mut self, params: &BlurParams, src: Surface, dst: Surface, _dispatch: Dispatch) {
        let out = blur_axis(
            self.height_surface(src),
            self.width,
            self.height,
            params.axis,
            params.radius,
        );
        *self.height_surface_mut(dst) = out;
        self.log.push(("blur", vec![src]));
    }

    fn composite(&mut self, params: &CompositeParams) {
        let l = params.sun_dir;
        let len = (l[0] * l[0] + l[1] * l[1] + l[2] * l[2]).sqrt();
        for y in 0..self.height {
            for x in 0..self.width {
                let i = self.idx(x, y);
                let h = self.primary[i];
                let base = if params.monochrome != 0 { [1.0; 3] } else {
                    let a = self.albedo[i];
                    [a[0], a[1], a[2]]
                };
                let shade = if params.shaded_3d != 0 { 0.15 + 0.85 * h * l[2] / len } else { 1.0 };
                self.framebuffer[i] = [base[0] * shade, base[1] * shade, base[2] * shade, h];
            }
        }
        self.log.push(("composite", vec![Surface::Albedo, Surface::Height]));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::encoder::record;
    use crate::render::params::{BLUR_RADIUS, FrameInputs, FrameToggles};
    use crate::render::plan::FramePlan;

    fn inputs(width: u32, height: u32, blur: bool) -> FrameInputs {
        FrameInputs {
            camera_offset: (0.25, -0.5),
            zoom_factor: 0.8,
            dot_mass: 0.1,
            resolution: (width, height),
            toggles: FrameToggles { grid_lines: true, blur, shaded_3d: true, monochrome: false },
            total_time: 1.25,
        }
    }

    fn run(s: &mut CpuSurfaces, i: &FrameInputs) {
        let plan = FramePlan::build(i.toggles.blur, i.resolution.0, i.resolution.1);
        plan.validate().unwrap();
        s.log.clear();
        record(&plan, i, s);
    }

    #[test]
    fn unblurred_composite_never_touches_swap() {
        let i = inputs(40, 24, false);

        let mut clean = CpuSurfaces::new(40, 24);
        run(&mut clean, &i);

        let mut poisoned = CpuSurfaces::new(40, 24);
        poisoned.swap.iter_mut().for_each(|v| *v = f32::NAN);
        run(&mut poisoned, &i);

        assert_eq!(clean.framebuffer, poisoned.framebuffer);
        assert!(poisoned.swap.iter().all(|v| v.is_nan()));
        assert!(poisoned.log.iter().all(|(_, reads)| !reads.contains(&Surface::HeightSwap)));
    }

    #[test]
    fn blurred_primary_is_vertical_of_horizontal() {
        let (w, h) = (45, 37);
        let mut s = CpuSurfaces::new(w, h);
        run(&mut s, &inputs(w, h, false));
        let generated = s.primary.clone();

        run(&mut s, &inputs(w, h, true));
        let expected = blur_axis(&blur_axis(&generated, w, h, 0, BLUR_RADIUS), w, h, 1, BLUR_RADIUS);
        assert_eq!(s.primary, expected);
        assert_eq!(
            s.log.iter().map(|(n, _)| *n).collect::<Vec<_>>(),
            vec!["generate", "blur", "blur", "composite"]
        );
    }

    #[test]
    fn swap_history_is_irrelevant_when_blurring() {
        let i = inputs(33, 65, true);

        let mut a = CpuSurfaces::new(33, 65);
        run(&mut a, &i);

        let mut b = CpuSurfaces::new(33, 65);
        b.swap.iter_mut().for_each(|v| *v = f32::NAN);
        run(&mut b, &i);

        assert_eq!(a.primary, b.primary);
        assert_eq!(a.framebuffer, b.framebuffer);
    }

    #[test]
    fn frames_are_idempotent() {
        for blur in [false, true] {
            let i = inputs(64, 48, blur);
            let mut s = CpuSurfaces::new(64, 48);
            run(&mut s, &i);
            let first = (s.albedo.clone(), s.primary.clone(), s.framebuffer.clone());
            run(&mut s, &i);
            assert_eq!(first, (s.albedo.clone(), s.primary.clone(), s.framebuffer.clone()));
        }
    }

    #[test]
    fn generation_covers_uneven_viewports_exactly_once() {
        for (w, h) in [(1, 1), (31, 33), (65, 40), (100, 7)] {
            let mut s = CpuSurfaces::new(w, h);
            run(&mut s, &inputs(w, h, false));
            assert!(s.coverage.iter().all(|c| *c == 1), "{w}x{h}");
        }
    }
}
