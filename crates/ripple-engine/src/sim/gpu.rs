use bytemuck::{Pod, Zeroable};
use glam::Vec2;

use crate::device::GpuCapabilities;

use super::schedule::{StepPlan, StepSchedule};
use super::{HeightField, HeightTexture, PingPong, SimError, SimulationParameters};

const WORKGROUP_SIZE: u32 = 8;

/// Uniform block of `shaders/heightmap.wgsl`.
#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct SimUniform {
    pointer: [f32; 2],
    mouse_size: f32,
    viscosity: f32,
    depth: f32,
    bounds: f32,
    stencil: u32,
    resolution: u32,
}

impl SimUniform {
    fn new(params: &SimulationParameters, pointer: Vec2) -> Self {
        Self {
            pointer: pointer.to_array(),
            mouse_size: params.mouse_size,
            viscosity: params.viscosity,
            depth: params.depth,
            bounds: params.bounds,
            stencil: params.stencil.as_u32(),
            resolution: params.resolution,
        }
    }
}

/// Height-field simulation in compute shaders.
///
/// Two storage textures form the ping-pong pair. Bind group `i` reads texture
/// `i` and writes texture `1 - i`, so the bind group for the current read
/// index always targets the other texture.
pub struct GpuSimulator {
    params: SimulationParameters,
    schedule: StepSchedule,

    textures: PingPong<HeightTexture>,
    bind_groups: [wgpu::BindGroup; 2],
    uniform: wgpu::Buffer,

    step_pipeline: wgpu::ComputePipeline,
    smooth_pipeline: wgpu::ComputePipeline,
}

impl GpuSimulator {
    /// Checks that the adapter can run the compute path at this resolution.
    pub fn check_support(
        caps: &GpuCapabilities,
        params: &SimulationParameters,
    ) -> Result<(), SimError> {
        if !caps.compute_shaders {
            return Err(SimError::Unsupported("compute shaders".into()));
        }
        if !caps.storage_rgba32float {
            return Err(SimError::Unsupported("rgba32float storage textures".into()));
        }
        if params.resolution > caps.max_texture_dimension_2d {
            return Err(SimError::Unsupported(format!(
                "{}x{} height texture (max {})",
                params.resolution, params.resolution, caps.max_texture_dimension_2d
            )));
        }
        Ok(())
    }

    /// Creates the textures and pipelines and uploads the initial field.
    pub fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        caps: &GpuCapabilities,
        params: SimulationParameters,
        seed: u64,
    ) -> Result<Self, SimError> {
        params.validate()?;
        Self::check_support(caps, &params)?;

        let side = params.resolution;
        let initial = HeightField::noise(side, params.noise_amplitude, seed);

        let textures = PingPong::new(
            HeightTexture::new(device, side, wgpu::TextureUsages::STORAGE_BINDING, "ripple height a"),
            HeightTexture::new(device, side, wgpu::TextureUsages::STORAGE_BINDING, "ripple height b"),
        );
        for t in textures.both() {
            t.upload(queue, &initial);
        }

        let uniform = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("ripple sim ubo"),
            size: std::mem::size_of::<SimUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        queue.write_buffer(&uniform, 0, bytemuck::bytes_of(&SimUniform::new(&params, super::POINTER_SENTINEL)));

        let layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("ripple sim bgl"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::COMPUTE,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: wgpu::BufferSize::new(
                            std::mem::size_of::<SimUniform>() as u64,
                        ),
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::COMPUTE,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: false },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 2,
                    visibility: wgpu::ShaderStages::COMPUTE,
                    ty: wgpu::BindingType::StorageTexture {
                        access: wgpu::StorageTextureAccess::WriteOnly,
                        format: HeightTexture::FORMAT,
                        view_dimension: wgpu::TextureViewDimension::D2,
                    },
                    count: None,
                },
            ],
        });

        let [a, b] = textures.both();
        let bind_groups = [
            Self::bind_group(device, &layout, &uniform, a, b),
            Self::bind_group(device, &layout, &uniform, b, a),
        ];

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("ripple heightmap shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/heightmap.wgsl").into()),
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("ripple sim pipeline layout"),
            bind_group_layouts: &[&layout],
            immediate_size: 0,
        });

        let pipeline = |entry: &str| {
            device.create_compute_pipeline(&wgpu::ComputePipelineDescriptor {
                label: Some(entry),
                layout: Some(&pipeline_layout),
                module: &shader,
                entry_point: Some(entry),
                compilation_options: Default::default(),
                cache: None,
            })
        };
        let step_pipeline = pipeline("step_heights");
        let smooth_pipeline = pipeline("smooth_heights");

        let schedule = StepSchedule::new(params.frame_skip, params.smoothing);

        Ok(Self {
            params,
            schedule,
            textures,
            bind_groups,
            uniform,
            step_pipeline,
            smooth_pipeline,
        })
    }

    fn bind_group(
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        uniform: &wgpu::Buffer,
        src: &HeightTexture,
        dst: &HeightTexture,
    ) -> wgpu::BindGroup {
        device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("ripple sim bind group"),
            layout,
            entries: &[
                wgpu::BindGroupEntry { binding: 0, resource: uniform.as_entire_binding() },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(src.view()),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::TextureView(dst.view()),
                },
            ],
        })
    }

    pub fn params(&self) -> &SimulationParameters {
        &self.params
    }

    /// Texture holding the most recently completed step.
    pub fn current(&self) -> &HeightTexture {
        self.textures.read()
    }

    /// Steps taken under the schedule.
    pub fn steps(&self) -> u64 {
        self.schedule.steps()
    }

    /// Consumes one rendered frame, recording compute passes into `encoder`.
    pub fn advance(
        &mut self,
        queue: &wgpu::Queue,
        encoder: &mut wgpu::CommandEncoder,
        pointer: Vec2,
    ) -> StepPlan {
        let plan = self.schedule.advance();
        if !plan.step {
            return plan;
        }

        queue.write_buffer(
            &self.uniform,
            0,
            bytemuck::bytes_of(&SimUniform::new(&self.params, pointer)),
        );

        self.dispatch(encoder, Pass::Step);
        if plan.smooth {
            self.dispatch(encoder, Pass::Smooth);
        }

        plan
    }

    fn dispatch(&mut self, encoder: &mut wgpu::CommandEncoder, pass: Pass) {
        let (label, pipeline) = match pass {
            Pass::Step => ("ripple sim step", &self.step_pipeline),
            Pass::Smooth => ("ripple sim smooth", &self.smooth_pipeline),
        };

        let groups = self.params.resolution.div_ceil(WORKGROUP_SIZE);
        {
            let mut cpass = encoder.begin_compute_pass(&wgpu::ComputePassDescriptor {
                label: Some(label),
                timestamp_writes: None,
            });
            cpass.set_pipeline(pipeline);
            cpass.set_bind_group(0, &self.bind_groups[self.textures.read_index()], &[]);
            cpass.dispatch_workgroups(groups, groups, 1);
        }

        self.textures.swap();
    }
}

#[derive(Debug, Copy, Clone)]
enum Pass {
    Step,
    Smooth,
}
