use super::plan::Surface;

pub(crate) const ALBEDO_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8Unorm;
pub(crate) const HEIGHT_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::R32Float;

pub(crate) struct Tex2D {
    _tex: wgpu::Texture,
    pub view: wgpu::TextureView,
}

fn make_tex2d(
    device: &wgpu::Device,
    label: &str,
    (width, height): (u32, u32),
    format: wgpu::TextureFormat,
) -> Tex2D {
    let tex = device.create_texture(&wgpu::TextureDescriptor {
        label: Some(label),
        size: wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format,
        // Written as storage by compute passes, read with textureLoad later.
        usage: wgpu::TextureUsages::STORAGE_BINDING | wgpu::TextureUsages::TEXTURE_BINDING,
        view_formats: &[],
    });

    let view = tex.create_view(&wgpu::TextureViewDescriptor::default());
    Tex2D { _tex: tex, view }
}

/// Resolution-sized GPU surfaces owned by the pipeline.
///
/// Between frames `height` is authoritative; `height_swap` is blur scratch.
pub(crate) struct FieldSurfaces {
    size: (u32, u32),
    albedo: Tex2D,
    height: Tex2D,
    height_swap: Tex2D,
}

impl FieldSurfaces {
    pub fn new(device: &wgpu::Device, size: (u32, u32)) -> Self {
        assert!(
            size.0 > 0 && size.1 > 0,
            "field surfaces need a non-empty size, got {size:?}"
        );
        log::debug!("creating field surfaces {}x{}", size.0, size.1);

        Self {
            size,
            albedo: make_tex2d(device, "fractal albedo", size, ALBEDO_FORMAT),
            height: make_tex2d(device, "fractal height", size, HEIGHT_FORMAT),
            height_swap: make_tex2d(device, "fractal height swap", size, HEIGHT_FORMAT),
        }
    }

    #[inline]
    pub fn size(&self) -> (u32, u32) {
        self.size
    }

    pub fn view(&self, surface: Surface) -> &wgpu::TextureView {
        match surface {
            Surface::Albedo => &self.albedo.view,
            Surface::Height => &self.height.view,
            Surface::HeightSwap => &self.height_swap.view,
            Surface::Framebuffer => panic!("the framebuffer is not a field surface"),
        }
    }
}
