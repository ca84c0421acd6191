//! GPU simulator checks. Each test skips when no adapter is available.

use std::sync::mpsc;

use glam::Vec2;

use ripple_engine::camera::Camera;
use ripple_engine::device::GpuCapabilities;
use ripple_engine::sim::stencil::cell_position;
use ripple_engine::sim::{
    CpuSimulator, GpuSimulator, HeightTexture, SimulationParameters, Texel, MIN_RESOLUTION,
};
use ripple_engine::water::{ActiveBackend, BackendKind, WaterEffect};

/// Largest per-texel difference tolerated between CPU and GPU results.
const PARITY_EPS: f32 = 1e-5;

/// Returns None if no adapter is available.
fn init_gpu() -> Option<(wgpu::Device, wgpu::Queue, GpuCapabilities)> {
    let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
        backends: wgpu::Backends::all(),
        ..Default::default()
    });

    let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
        power_preference: wgpu::PowerPreference::HighPerformance,
        compatible_surface: None,
        force_fallback_adapter: false,
    }))
    .ok()?;

    let limits = adapter.limits();
    let (device, queue) = pollster::block_on(adapter.request_device(&wgpu::DeviceDescriptor {
        label: Some("ripple test device"),
        required_features: wgpu::Features::empty(),
        required_limits: limits.clone(),
        experimental_features: wgpu::ExperimentalFeatures::disabled(),
        memory_hints: wgpu::MemoryHints::Performance,
        trace: wgpu::Trace::Off,
    }))
    .ok()?;

    let caps = GpuCapabilities::from_adapter(&adapter, &limits);
    Some((device, queue, caps))
}

/// Like `init_gpu`, but also requires the compute path.
fn init_compute_gpu() -> Option<(wgpu::Device, wgpu::Queue, GpuCapabilities)> {
    let (device, queue, caps) = init_gpu()?;
    if let Err(e) = GpuSimulator::check_support(&caps, &SimulationParameters::default()) {
        eprintln!("adapter '{}' cannot run the compute simulator ({e}); skipping test.", caps.adapter_name);
        return None;
    }
    Some((device, queue, caps))
}

fn read_back(device: &wgpu::Device, queue: &wgpu::Queue, texture: &HeightTexture) -> Vec<Texel> {
    let side = texture.side();
    let bytes_per_row = side * std::mem::size_of::<Texel>() as u32;
    assert_eq!(bytes_per_row % wgpu::COPY_BYTES_PER_ROW_ALIGNMENT, 0, "pick a side of 16n");

    let buffer = device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("ripple readback"),
        size: (bytes_per_row * side) as u64,
        usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
        mapped_at_creation: false,
    });

    let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
        label: Some("ripple readback encoder"),
    });
    encoder.copy_texture_to_buffer(
        wgpu::TexelCopyTextureInfo {
            texture: texture.texture(),
            mip_level: 0,
            origin: wgpu::Origin3d::ZERO,
            aspect: wgpu::TextureAspect::All,
        },
        wgpu::TexelCopyBufferInfo {
            buffer: &buffer,
            layout: wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(bytes_per_row),
                rows_per_image: Some(side),
            },
        },
        wgpu::Extent3d {
            width: side,
            height: side,
            depth_or_array_layers: 1,
        },
    );
    queue.submit(std::iter::once(encoder.finish()));

    let slice = buffer.slice(..);
    let (tx, rx) = mpsc::channel();
    slice.map_async(wgpu::MapMode::Read, move |res| {
        let _ = tx.send(res);
    });
    device.poll(wgpu::PollType::wait_indefinitely()).unwrap();
    rx.recv().unwrap().unwrap();

    let data = slice.get_mapped_range();
    let texels = data
        .chunks_exact(std::mem::size_of::<Texel>())
        .map(bytemuck::pod_read_unaligned::<Texel>)
        .collect();
    drop(data);
    buffer.unmap();
    texels
}

/// Runs `frames` frames on both simulators and returns the largest difference.
fn max_divergence(params: SimulationParameters, pointer: Vec2, frames: u32) -> Option<f32> {
    let (device, queue, caps) = init_compute_gpu()?;
    let seed = 11;

    let mut gpu = GpuSimulator::new(&device, &queue, &caps, params.clone(), seed).unwrap();
    let mut cpu = CpuSimulator::new(params, seed).unwrap();

    for _ in 0..frames {
        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("ripple test frame"),
        });
        let gpu_plan = gpu.advance(&queue, &mut encoder, pointer);
        queue.submit(std::iter::once(encoder.finish()));

        let cpu_plan = cpu.advance(pointer);
        assert_eq!(gpu_plan, cpu_plan);
    }

    let gpu_texels = read_back(&device, &queue, gpu.current());
    let cpu_texels = cpu.current().texels();
    assert_eq!(gpu_texels.len(), cpu_texels.len());

    let diff = gpu_texels
        .iter()
        .zip(cpu_texels)
        .flat_map(|(g, c)| [(g[0] - c[0]).abs(), (g[1] - c[1]).abs()])
        .fold(0.0f32, f32::max);
    Some(diff)
}

#[test]
fn gpu_matches_cpu_with_pointer_and_smoothing() {
    let params = SimulationParameters {
        resolution: 32,
        smoothing: Some(2),
        depth: 0.01,
        ..Default::default()
    };
    let pointer = cell_position(16, 12, params.resolution, params.bounds);

    let Some(diff) = max_divergence(params, pointer, 6) else {
        return;
    };
    assert!(diff < PARITY_EPS, "max |gpu - cpu| = {diff}");
}

#[test]
fn gpu_matches_cpu_at_the_edges() {
    let params = SimulationParameters {
        resolution: 16,
        mouse_size: 0.8,
        ..Default::default()
    };
    // Pointer on the corner cell: the depression reaches across two edges.
    let pointer = cell_position(0, 0, params.resolution, params.bounds);

    let Some(diff) = max_divergence(params, pointer, 8) else {
        return;
    };
    assert!(diff < PARITY_EPS, "max |gpu - cpu| = {diff}");
}

#[test]
fn gpu_matches_cpu_with_diffuse_stencil_and_frame_skip() {
    let params = SimulationParameters {
        resolution: 16,
        stencil: ripple_engine::sim::StencilKind::Diffuse,
        frame_skip: 2,
        ..Default::default()
    };

    let Some(diff) = max_divergence(params, Vec2::ZERO, 7) else {
        return;
    };
    assert!(diff < PARITY_EPS, "max |gpu - cpu| = {diff}");
}

#[test]
fn oversized_resolution_degrades_to_static() {
    let Some((device, queue, caps)) = init_gpu() else {
        return;
    };
    let params = SimulationParameters {
        resolution: caps.max_texture_dimension_2d + 1,
        seed: Some(1),
        ..Default::default()
    };
    assert!(params.validate().is_ok());

    let effect =
        WaterEffect::with_device(device, queue, caps, params, Camera::default(), BackendKind::Auto)
            .unwrap();

    assert_eq!(effect.backend(), ActiveBackend::Static);
    assert_eq!(effect.current_texture().side(), MIN_RESOLUTION);
}

#[test]
fn cpu_request_runs_on_cpu_and_rejects_bad_reconfigure() {
    let Some((device, queue, caps)) = init_gpu() else {
        return;
    };
    let params = SimulationParameters {
        resolution: 24,
        seed: Some(5),
        ..Default::default()
    };

    let mut effect = WaterEffect::with_device(
        device,
        queue,
        caps,
        params.clone(),
        Camera::default(),
        BackendKind::Cpu,
    )
    .unwrap();
    assert_eq!(effect.backend(), ActiveBackend::Cpu);
    assert_eq!(effect.current_texture().side(), 24);

    let bad = SimulationParameters {
        viscosity: 0.0,
        ..params.clone()
    };
    assert!(effect.reconfigure(bad).is_err());
    assert_eq!(effect.params(), &params);

    let bigger = SimulationParameters {
        resolution: 40,
        ..params
    };
    effect.reconfigure(bigger).unwrap();
    assert_eq!(effect.current_texture().side(), 40);
    assert_eq!(effect.seed(), 5);
}
