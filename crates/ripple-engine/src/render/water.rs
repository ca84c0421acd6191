use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};
use wgpu::util::DeviceExt;

use crate::camera::Camera;
use crate::paint::Color;
use crate::render::{PlaneMesh, RenderCtx, RenderTarget};
use crate::sim::HeightTexture;

/// Surface appearance of the water mesh.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct WaterMaterial {
    /// Linear base color; alpha is the surface opacity.
    pub base_color: Color,
    /// Direction *towards* the light.
    pub light_dir: Vec3,
    /// Ambient term in `[0, 1]`.
    pub ambient: f32,
    /// Vertical displacement per unit of simulated height.
    pub height_scale: f32,
    /// Brightening per unit of simulated height.
    pub color_gain: f32,
}

impl Default for WaterMaterial {
    fn default() -> Self {
        Self {
            base_color: Color::linear(0.4, 0.7, 0.9, 0.9),
            light_dir: Vec3::new(2.0, 2.0, 3.0),
            ambient: 0.5,
            height_scale: 1.0,
            color_gain: 2.0,
        }
    }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct WaterUniform {
    view_proj: [[f32; 4]; 4],
    base_color: [f32; 4],
    light: [f32; 4],
    bounds: f32,
    height_scale: f32,
    resolution: u32,
    color_gain: f32,
}

/// Renders a height texture as a displaced, lit plane.
///
/// Read-only with respect to the simulation: it only samples the texture it is
/// handed. Bind groups are cached per texture id (a ping-pong pair needs two).
#[derive(Default)]
pub struct WaterRenderer {
    material: WaterMaterial,

    pipeline_format: Option<wgpu::TextureFormat>,
    pipeline: Option<wgpu::RenderPipeline>,
    bind_group_layout: Option<wgpu::BindGroupLayout>,
    ubo: Option<wgpu::Buffer>,

    mesh_side: u32,
    index_buffer: Option<wgpu::Buffer>,
    index_count: u32,

    bind_groups: Vec<(u64, wgpu::BindGroup)>,
}

/// Ping-pong pair plus one spare after a reconfigure.
const MAX_CACHED_BIND_GROUPS: usize = 3;

impl WaterRenderer {
    pub fn new(material: WaterMaterial) -> Self {
        Self { material, ..Default::default() }
    }

    pub fn material(&self) -> &WaterMaterial {
        &self.material
    }

    pub fn set_material(&mut self, material: WaterMaterial) {
        self.material = material;
    }

    /// Draws `heights` as a plane of side `bounds` into `target`.
    pub fn render(
        &mut self,
        ctx: &RenderCtx<'_>,
        target: &mut RenderTarget<'_>,
        camera: &Camera,
        bounds: f32,
        heights: &HeightTexture,
    ) {
        if !ctx.viewport.is_valid() || heights.side() < 2 {
            return;
        }

        self.ensure_pipeline(ctx);
        self.ensure_mesh(ctx, heights.side());
        self.ensure_bind_group(ctx, heights);
        self.write_uniform(ctx, camera.view_projection(ctx.viewport.aspect()), bounds, heights.side());

        let Some(pipeline) = self.pipeline.as_ref() else { return };
        let Some(index_buffer) = self.index_buffer.as_ref() else { return };
        let Some((_, bind_group)) = self.bind_groups.iter().find(|(id, _)| *id == heights.id()) else {
            return;
        };

        let mut rpass = target.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("ripple water pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target.color_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        rpass.set_pipeline(pipeline);
        rpass.set_bind_group(0, bind_group, &[]);
        rpass.set_index_buffer(index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        rpass.draw_indexed(0..self.index_count, 0, 0..1);
    }

    fn ensure_pipeline(&mut self, ctx: &RenderCtx<'_>) {
        if self.pipeline_format == Some(ctx.surface_format) && self.pipeline.is_some() {
            return;
        }

        let shader = ctx.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("ripple water shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/water.wgsl").into()),
        });

        let bind_group_layout =
            ctx.device
                .create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                    label: Some("ripple water bgl"),
                    entries: &[
                        wgpu::BindGroupLayoutEntry {
                            binding: 0,
                            visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                            ty: wgpu::BindingType::Buffer {
                                ty: wgpu::BufferBindingType::Uniform,
                                has_dynamic_offset: false,
                                min_binding_size: wgpu::BufferSize::new(
                                    std::mem::size_of::<WaterUniform>() as u64,
                                ),
                            },
                            count: None,
                        },
                        wgpu::BindGroupLayoutEntry {
                            binding: 1,
                            visibility: wgpu::ShaderStages::VERTEX,
                            ty: wgpu::BindingType::Texture {
                                sample_type: wgpu::TextureSampleType::Float { filterable: false },
                                view_dimension: wgpu::TextureViewDimension::D2,
                                multisampled: false,
                            },
                            count: None,
                        },
                    ],
                });

        let pipeline_layout =
            ctx.device
                .create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                    label: Some("ripple water pipeline layout"),
                    bind_group_layouts: &[&bind_group_layout],
                    immediate_size: 0,
                });

        let pipeline = ctx.device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("ripple water pipeline"),
            layout: Some(&pipeline_layout),

            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[],
            },

            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: ctx.surface_format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),

            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                // Visible from below when the camera dips under the surface.
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

        let ubo = ctx.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("ripple water ubo"),
            size: std::mem::size_of::<WaterUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        self.pipeline_format = Some(ctx.surface_format);
        self.pipeline = Some(pipeline);
        self.bind_group_layout = Some(bind_group_layout);
        self.ubo = Some(ubo);

        // Bind groups reference the old layout and buffer.
        self.bind_groups.clear();
    }

    fn ensure_mesh(&mut self, ctx: &RenderCtx<'_>, side: u32) {
        if self.mesh_side == side && self.index_buffer.is_some() {
            return;
        }

        let mesh = PlaneMesh::new(side);
        self.index_buffer = Some(ctx.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("ripple water ibo"),
            contents: bytemuck::cast_slice(mesh.indices()),
            usage: wgpu::BufferUsages::INDEX,
        }));
        self.index_count = mesh.index_count();
        self.mesh_side = side;

        log::debug!("water mesh rebuilt: {side}x{side} vertices, {} indices", self.index_count);
    }

    fn ensure_bind_group(&mut self, ctx: &RenderCtx<'_>, heights: &HeightTexture) {
        if self.bind_groups.iter().any(|(id, _)| *id == heights.id()) {
            return;
        }
        let (Some(bgl), Some(ubo)) = (self.bind_group_layout.as_ref(), self.ubo.as_ref()) else {
            return;
        };

        let bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("ripple water bind group"),
            layout: bgl,
            entries: &[
                wgpu::BindGroupEntry { binding: 0, resource: ubo.as_entire_binding() },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(heights.view()),
                },
            ],
        });

        if self.bind_groups.len() >= MAX_CACHED_BIND_GROUPS {
            self.bind_groups.remove(0);
        }
        self.bind_groups.push((heights.id(), bind_group));
    }

    fn write_uniform(&self, ctx: &RenderCtx<'_>, view_proj: Mat4, bounds: f32, side: u32) {
        let Some(ubo) = self.ubo.as_ref() else { return };
        let m = &self.material;
        let u = WaterUniform {
            view_proj: view_proj.to_cols_array_2d(),
            base_color: m.base_color.to_array(),
            light: m.light_dir.normalize_or_zero().extend(m.ambient.clamp(0.0, 1.0)).to_array(),
            bounds,
            height_scale: m.height_scale,
            resolution: side,
            color_gain: m.color_gain,
        };
        ctx.queue.write_buffer(ubo, 0, bytemuck::bytes_of(&u));
    }
}
