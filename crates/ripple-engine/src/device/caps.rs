/// Adapter capabilities relevant to the effects built on this engine.
///
/// Captured once when the device is created. Effects consult it to pick a
/// simulation backend instead of discovering missing features through
/// validation errors.
#[derive(Debug, Clone)]
pub struct GpuCapabilities {
    /// Human-readable adapter name.
    pub adapter_name: String,

    /// Backend the adapter runs on (Vulkan, Metal, Dx12, Gl, ...).
    pub backend: wgpu::Backend,

    /// Compute shaders are available.
    pub compute_shaders: bool,

    /// `Rgba32Float` can be bound as a write-only storage texture.
    pub storage_rgba32float: bool,

    /// Largest supported 2D texture side.
    pub max_texture_dimension_2d: u32,
}

impl GpuCapabilities {
    /// Reads the capabilities of `adapter`; `limits` are the limits the device was created with.
    pub fn from_adapter(adapter: &wgpu::Adapter, limits: &wgpu::Limits) -> Self {
        let info = adapter.get_info();
        let downlevel = adapter.get_downlevel_capabilities();
        let rgba32f = adapter.get_texture_format_features(wgpu::TextureFormat::Rgba32Float);

        Self {
            adapter_name: info.name,
            backend: info.backend,
            compute_shaders: downlevel
                .flags
                .contains(wgpu::DownlevelFlags::COMPUTE_SHADERS),
            storage_rgba32float: rgba32f
                .allowed_usages
                .contains(wgpu::TextureUsages::STORAGE_BINDING),
            max_texture_dimension_2d: limits.max_texture_dimension_2d,
        }
    }

    /// Capabilities of a software-only context (no compute, small textures).
    ///
    /// Used by tests and as the conservative baseline.
    pub fn minimal() -> Self {
        Self {
            adapter_name: "none".to_string(),
            backend: wgpu::Backend::Noop,
            compute_shaders: false,
            storage_rgba32float: false,
            max_texture_dimension_2d: wgpu::Limits::downlevel_webgl2_defaults()
                .max_texture_dimension_2d,
        }
    }
}
