use std::sync::atomic::{AtomicU64, Ordering};

use super::HeightField;

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

/// GPU copy of a height field (`Rgba32Float`, one texel per cell).
///
/// Each texture gets a process-unique `id` so consumers can cache bind groups
/// per texture.
pub struct HeightTexture {
    id: u64,
    side: u32,
    texture: wgpu::Texture,
    view: wgpu::TextureView,
}

impl HeightTexture {
    pub const FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba32Float;

    /// Creates a texture bindable for sampling, writable from the CPU and
    /// copyable out for readback.
    ///
    /// `extra_usage` adds e.g. `STORAGE_BINDING` for compute targets.
    pub fn new(
        device: &wgpu::Device,
        side: u32,
        extra_usage: wgpu::TextureUsages,
        label: &str,
    ) -> Self {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size: Self::extent(side),
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: Self::FORMAT,
            usage: wgpu::TextureUsages::TEXTURE_BINDING
                | wgpu::TextureUsages::COPY_DST
                | wgpu::TextureUsages::COPY_SRC
                | extra_usage,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        Self {
            id: NEXT_ID.fetch_add(1, Ordering::Relaxed),
            side,
            texture,
            view,
        }
    }

    #[inline]
    pub fn id(&self) -> u64 {
        self.id
    }

    #[inline]
    pub fn side(&self) -> u32 {
        self.side
    }

    #[inline]
    pub fn texture(&self) -> &wgpu::Texture {
        &self.texture
    }

    #[inline]
    pub fn view(&self) -> &wgpu::TextureView {
        &self.view
    }

    /// Copies a CPU field into the texture.
    pub fn upload(&self, queue: &wgpu::Queue, field: &HeightField) {
        debug_assert_eq!(field.side(), self.side);
        queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &self.texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            field.as_bytes(),
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(self.side * std::mem::size_of::<super::Texel>() as u32),
                rows_per_image: Some(self.side),
            },
            Self::extent(self.side),
        );
    }

    fn extent(side: u32) -> wgpu::Extent3d {
        wgpu::Extent3d {
            width: side,
            height: side,
            depth_or_array_layers: 1,
        }
    }
}
