//! wgpu backend for the three passes.
//!
//! Pipelines, layouts and parameter buffers live as long as the pipeline.
//! Bind groups reference the resolution-sized surfaces and are rebuilt with
//! them.
//!
//! Bind groups per pass (all group 0):
//!   generate : params ubo + albedo storage + height storage
//!   blur_h   : params ubo (axis 0) + height loaded + swap storage
//!   blur_v   : params ubo (axis 1) + swap loaded + height storage
//!   composite: params ubo + albedo loaded + height loaded
//!
//! Each compute dispatch gets its own compute pass; wgpu synchronizes
//! storage writes against later reads at pass boundaries.

use wgpu::util::DeviceExt;

use super::encoder::PassEncoder;
use super::params::{
    BlurParams, CompositeParams, FULLSCREEN_TRIANGLE, GenerateParams, TriangleVertex,
};
use super::plan::{Dispatch, Surface};
use super::surfaces::{ALBEDO_FORMAT, FieldSurfaces, HEIGHT_FORMAT};

// ── layout helpers ────────────────────────────────────────────────────────

fn uniform_entry<T>(binding: u32, visibility: wgpu::ShaderStages) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Uniform,
            has_dynamic_offset: false,
            min_binding_size: wgpu::BufferSize::new(std::mem::size_of::<T>() as u64),
        },
        count: None,
    }
}

fn storage_entry(binding: u32, format: wgpu::TextureFormat) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::COMPUTE,
        ty: wgpu::BindingType::StorageTexture {
            access: wgpu::StorageTextureAccess::WriteOnly,
            format,
            view_dimension: wgpu::TextureViewDimension::D2,
        },
        count: None,
    }
}

/// Texture read with `textureLoad` only; no sampler involved.
fn loaded_texture_entry(binding: u32, visibility: wgpu::ShaderStages) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility,
        ty: wgpu::BindingType::Texture {
            sample_type: wgpu::TextureSampleType::Float { filterable: false },
            view_dimension: wgpu::TextureViewDimension::D2,
            multisampled: false,
        },
        count: None,
    }
}

fn uniform_buffer<T>(device: &wgpu::Device, label: &str) -> wgpu::Buffer {
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some(label),
        size: std::mem::size_of::<T>() as u64,
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

fn compute_pipeline(
    device: &wgpu::Device,
    label: &str,
    source: &'static str,
    bgl: &wgpu::BindGroupLayout,
) -> wgpu::ComputePipeline {
    let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(label),
        source: wgpu::ShaderSource::Wgsl(source.into()),
    });

    let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some(label),
        bind_group_layouts: &[bgl],
        immediate_size: 0,
    });

    device.create_compute_pipeline(&wgpu::ComputePipelineDescriptor {
        label: Some(label),
        layout: Some(&layout),
        module: &shader,
        entry_point: Some("main"),
        compilation_options: Default::default(),
        cache: None,
    })
}

// ── bindings ──────────────────────────────────────────────────────────────

struct SurfaceBindings {
    size: (u32, u32),
    generate: wgpu::BindGroup,
    blur_h: wgpu::BindGroup,
    blur_v: wgpu::BindGroup,
    composite: wgpu::BindGroup,
}

/// Pipelines and persistent buffers for generation, blur and composite.
pub(crate) struct GpuPasses {
    generate_pipeline: wgpu::ComputePipeline,
    blur_pipeline: wgpu::ComputePipeline,
    composite_pipeline: wgpu::RenderPipeline,

    generate_bgl: wgpu::BindGroupLayout,
    blur_bgl: wgpu::BindGroupLayout,
    composite_bgl: wgpu::BindGroupLayout,

    generate_ubo: wgpu::Buffer,
    // One buffer per axis: queue writes land before the submission, so a
    // shared buffer would leave both sub-passes with the last axis.
    blur_h_ubo: wgpu::Buffer,
    blur_v_ubo: wgpu::Buffer,
    composite_ubo: wgpu::Buffer,

    triangle_vbo: wgpu::Buffer,

    bindings: Option<SurfaceBindings>,
}

impl GpuPasses {
    pub fn new(device: &wgpu::Device, surface_format: wgpu::TextureFormat) -> Self {
        let generate_bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("fractal generate bgl"),
            entries: &[
                uniform_entry::<GenerateParams>(0, wgpu::ShaderStages::COMPUTE),
                storage_entry(1, ALBEDO_FORMAT),
                storage_entry(2, HEIGHT_FORMAT),
            ],
        });

        let blur_bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("fractal blur bgl"),
            entries: &[
                uniform_entry::<BlurParams>(0, wgpu::ShaderStages::COMPUTE),
                loaded_texture_entry(1, wgpu::ShaderStages::COMPUTE),
                storage_entry(2, HEIGHT_FORMAT),
            ],
        });

        let composite_bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("fractal composite bgl"),
            entries: &[
                uniform_entry::<CompositeParams>(0, wgpu::ShaderStages::FRAGMENT),
                loaded_texture_entry(1, wgpu::ShaderStages::FRAGMENT),
                loaded_texture_entry(2, wgpu::ShaderStages::FRAGMENT),
            ],
        });

        let generate_pipeline = compute_pipeline(
            device,
            "fractal generate",
            include_str!("shaders/fractal.wgsl"),
            &generate_bgl,
        );
        let blur_pipeline = compute_pipeline(
            device,
            "fractal blur",
            include_str!("shaders/blur.wgsl"),
            &blur_bgl,
        );

        let composite_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("fractal composite shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/composite.wgsl").into()),
        });

        let composite_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("fractal composite pipeline layout"),
            bind_group_layouts: &[&composite_bgl],
            immediate_size: 0,
        });

        let composite_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("fractal composite pipeline"),
            layout: Some(&composite_layout),

            vertex: wgpu::VertexState {
                module: &composite_shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[TriangleVertex::layout()],
            },

            fragment: Some(wgpu::FragmentState {
                module: &composite_shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: None,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),

            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },

            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        let triangle_vbo = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("fractal composite triangle"),
            contents: bytemuck::cast_slice(&FULLSCREEN_TRIANGLE),
            usage: wgpu::BufferUsages::VERTEX,
        });

        Self {
            generate_pipeline,
            blur_pipeline,
            composite_pipeline,
            generate_ubo: uniform_buffer::<GenerateParams>(device, "fractal generate ubo"),
            blur_h_ubo: uniform_buffer::<BlurParams>(device, "fractal blur h ubo"),
            blur_v_ubo: uniform_buffer::<BlurParams>(device, "fractal blur v ubo"),
            composite_ubo: uniform_buffer::<CompositeParams>(device, "fractal composite ubo"),
            generate_bgl,
            blur_bgl,
            composite_bgl,
            triangle_vbo,
            bindings: None,
        }
    }

    /// Rebuilds bind groups against `surfaces`. Required after every
    /// surface recreation.
    pub fn bind_surfaces(&mut self, device: &wgpu::Device, surfaces: &FieldSurfaces) {
        let view = |s: Surface| wgpu::BindingResource::TextureView(surfaces.view(s));

        let generate = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("fractal generate bind group"),
            layout: &self.generate_bgl,
            entries: &[
                wgpu::BindGroupEntry { binding: 0, resource: self.generate_ubo.as_entire_binding() },
                wgpu::BindGroupEntry { binding: 1, resource: view(Surface::Albedo) },
                wgpu::BindGroupEntry { binding: 2, resource: view(Surface::Height) },
            ],
        });

        let blur = |label: &str, ubo: &wgpu::Buffer, src: Surface, dst: Surface| {
            device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some(label),
                layout: &self.blur_bgl,
                entries: &[
                    wgpu::BindGroupEntry { binding: 0, resource: ubo.as_entire_binding() },
                    wgpu::BindGroupEntry { binding: 1, resource: view(src) },
                    wgpu::BindGroupEntry { binding: 2, resource: view(dst) },
                ],
            })
        };
        let blur_h = blur(
            "fractal blur h bind group",
            &self.blur_h_ubo,
            Surface::Height,
            Surface::HeightSwap,
        );
        let blur_v = blur(
            "fractal blur v bind group",
            &self.blur_v_ubo,
            Surface::HeightSwap,
            Surface::Height,
        );

        let composite = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("fractal composite bind group"),
            layout: &self.composite_bgl,
            entries: &[
                wgpu::BindGroupEntry { binding: 0, resource: self.composite_ubo.as_entire_binding() },
                wgpu::BindGroupEntry { binding: 1, resource: view(Surface::Albedo) },
                wgpu::BindGroupEntry { binding: 2, resource: view(Surface::Height) },
            ],
        });

        self.bindings = Some(SurfaceBindings {
            size: surfaces.size(),
            generate,
            blur_h,
            blur_v,
            composite,
        });
    }

    /// Returns an encoder recording into `target`.
    ///
    /// Panics when no surfaces are bound or they are not `size`.
    pub fn encoder<'a>(
        &'a self,
        queue: &'a wgpu::Queue,
        encoder: &'a mut wgpu::CommandEncoder,
        target: &'a wgpu::TextureView,
        size: (u32, u32),
    ) -> GpuPassEncoder<'a> {
        let bindings = self
            .bindings
            .as_ref()
            .expect("field surfaces are bound before the first frame is recorded");
        assert_eq!(bindings.size, size, "pass bindings do not match the frame size");

        GpuPassEncoder {
            passes: self,
            bindings,
            queue,
            encoder,
            target,
        }
    }
}

/// Records planned passes into one command encoder.
pub(crate) struct GpuPassEncoder<'a> {
    passes: &'a GpuPasses,
    bindings: &'a SurfaceBindings,
    queue: &'a wgpu::Queue,
    encoder: &'a mut wgpu::CommandEncoder,
    target: &'a wgpu::TextureView,
}

impl GpuPassEncoder<'_> {
    fn dispatch(
        &mut self,
        label: &str,
        pipeline: &wgpu::ComputePipeline,
        bind_group: &wgpu::BindGroup,
        dispatch: Dispatch,
    ) {
        let mut cpass = self.encoder.begin_compute_pass(&wgpu::ComputePassDescriptor {
            label: Some(label),
            timestamp_writes: None,
        });
        cpass.set_pipeline(pipeline);
        cpass.set_bind_group(0, bind_group, &[]);
        cpass.dispatch_workgroups(dispatch.x, dispatch.y, 1);
    }
}

impl PassEncoder for GpuPassEncoder<'_> {
    fn generate(&mut self, params: &GenerateParams, dispatch: Dispatch) {
        let (passes, bindings) = (self.passes, self.bindings);
        self.queue
            .write_buffer(&passes.generate_ubo, 0, bytemuck::bytes_of(params));
        self.dispatch(
            "fractal generate pass",
            &passes.generate_pipeline,
            &bindings.generate,
            dispatch,
        );
    }

    fn blur(&mut self, params: &BlurParams, src: Surface, dst: Surface, dispatch: Dispatch) {
        let (passes, bindings) = (self.passes, self.bindings);
        let (ubo, bind_group, label) = match (src, dst) {
            (Surface::Height, Surface::HeightSwap) => {
                (&passes.blur_h_ubo, &bindings.blur_h, "fractal blur h pass")
            }
            (Surface::HeightSwap, Surface::Height) => {
                (&passes.blur_v_ubo, &bindings.blur_v, "fractal blur v pass")
            }
            route => panic!("no blur bindings for route {route:?}"),
        };

        self.queue.write_buffer(ubo, 0, bytemuck::bytes_of(params));
        self.dispatch(label, &passes.blur_pipeline, bind_group, dispatch);
    }

    fn composite(&mut self, params: &CompositeParams) {
        let (passes, bindings) = (self.passes, self.bindings);
        self.queue
            .write_buffer(&passes.composite_ubo, 0, bytemuck::bytes_of(params));

        let mut rpass = self.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("fractal composite pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: self.target,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        rpass.set_pipeline(&passes.composite_pipeline);
        rpass.set_bind_group(0, &bindings.composite, &[]);
        rpass.set_vertex_buffer(0, passes.triangle_vbo.slice(..));
        rpass.draw(0..3, 0..1);
    }
}
