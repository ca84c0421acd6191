/// Initialization parameters for the GPU layer.
#[derive(Debug, Clone)]
pub struct GpuInit {
    /// Prefer an sRGB surface format when available.
    ///
    /// The water shader outputs linear color and relies on the surface for
    /// the sRGB encode.
    pub prefer_srgb: bool,

    /// Present mode (swap behavior).
    ///
    /// FIFO ties the simulation step rate to the display refresh.
    pub present_mode: wgpu::PresentMode,

    /// Optional alpha mode preference for the surface.
    ///
    /// If provided but unsupported on the current surface, a supported mode is selected.
    pub alpha_mode: Option<wgpu::CompositeAlphaMode>,

    /// Required wgpu features.
    ///
    /// The GPU simulator only needs core WebGPU features, so this stays empty.
    pub required_features: wgpu::Features,

    /// Limits requested from the device.
    ///
    /// `None` requests whatever the adapter offers, so large height fields are
    /// not rejected by the conservative defaults.
    pub required_limits: Option<wgpu::Limits>,

    /// Desired maximum frame latency for the surface.
    pub desired_maximum_frame_latency: u32,
}

impl Default for GpuInit {
    fn default() -> Self {
        Self {
            prefer_srgb: true,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: None,
            required_features: wgpu::Features::empty(),
            required_limits: None,
            desired_maximum_frame_latency: 2,
        }
    }
}
