//! GPU textures for compositor inputs (paper stock, noise).
//!
//! The compositor samples user-provided paper and noise textures every frame.
//! Both can be loaded from files or bytes; procedural fallbacks are generated
//! on the CPU so the pipeline renders before any asset resolves.

use crate::error::PipelineError;
use crate::gpu::GpuContext;

/// Wrap and filter behavior for a texture's sampler.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SamplerOptions {
    pub wrap: WrapMode,
    pub filter: FilterMode,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WrapMode {
    Clamp,
    Repeat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FilterMode {
    Nearest,
    Linear,
}

impl Default for SamplerOptions {
    fn default() -> Self {
        Self {
            wrap: WrapMode::Repeat,
            filter: FilterMode::Linear,
        }
    }
}

impl SamplerOptions {
    pub(crate) fn address_mode(&self) -> wgpu::AddressMode {
        match self.wrap {
            WrapMode::Clamp => wgpu::AddressMode::ClampToEdge,
            WrapMode::Repeat => wgpu::AddressMode::Repeat,
        }
    }

    pub(crate) fn filter_mode(&self) -> wgpu::FilterMode {
        match self.filter {
            FilterMode::Nearest => wgpu::FilterMode::Nearest,
            FilterMode::Linear => wgpu::FilterMode::Linear,
        }
    }
}

/// A GPU texture that can be bound to the compositor.
#[derive(Debug)]
pub struct Texture {
    #[allow(dead_code)]
    pub(crate) texture: wgpu::Texture,
    pub(crate) view: wgpu::TextureView,
    pub(crate) sampler: wgpu::Sampler,
    pub width: u32,
    pub height: u32,
}

impl Texture {
    /// Create a texture from raw RGBA data.
    pub fn from_rgba(
        gpu: &GpuContext,
        data: &[u8],
        width: u32,
        height: u32,
        options: SamplerOptions,
        label: &str,
    ) -> Self {
        use wgpu::util::DeviceExt;

        let texture = gpu.device.create_texture_with_data(
            &gpu.queue,
            &wgpu::TextureDescriptor {
                label: Some(label),
                size: wgpu::Extent3d {
                    width,
                    height,
                    depth_or_array_layers: 1,
                },
                mip_level_count: 1,
                sample_count: 1,
                dimension: wgpu::TextureDimension::D2,
                format: wgpu::TextureFormat::Rgba8Unorm,
                usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
                view_formats: &[],
            },
            wgpu::util::TextureDataOrder::LayerMajor,
            data,
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        let sampler = gpu.device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some(&format!("{} Sampler", label)),
            address_mode_u: options.address_mode(),
            address_mode_v: options.address_mode(),
            address_mode_w: options.address_mode(),
            mag_filter: options.filter_mode(),
            min_filter: options.filter_mode(),
            mipmap_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        Self {
            texture,
            view,
            sampler,
            width,
            height,
        }
    }

    /// Load a texture from an image file.
    pub fn from_file(
        gpu: &GpuContext,
        path: &str,
        options: SamplerOptions,
    ) -> Result<Self, PipelineError> {
        let img = image::open(path)?.to_rgba8();
        let (width, height) = img.dimensions();
        Ok(Self::from_rgba(gpu, &img, width, height, options, path))
    }

    /// Load a texture from embedded bytes.
    pub fn from_bytes(
        gpu: &GpuContext,
        bytes: &[u8],
        options: SamplerOptions,
        label: &str,
    ) -> Result<Self, PipelineError> {
        let img = image::load_from_memory(bytes)?.to_rgba8();
        let (width, height) = img.dimensions();
        Ok(Self::from_rgba(gpu, &img, width, height, options, label))
    }

    /// A 1x1 neutral texture, bound in place of assets that have not resolved
    /// yet.
    pub fn placeholder(gpu: &GpuContext) -> Self {
        Self::from_rgba(
            gpu,
            &[255, 255, 255, 255],
            1,
            1,
            SamplerOptions::default(),
            "Placeholder Texture",
        )
    }

    /// Generate a procedural paper-grain texture.
    ///
    /// A warm off-white base with hash-driven per-pixel grain and a few darker
    /// fiber streaks, close enough to a scanned craft paper for the compositor
    /// to darken ink into.
    pub fn paper(gpu: &GpuContext, size: u32, seed: u32) -> Self {
        let mut data = vec![0u8; (size * size * 4) as usize];

        let base = [242u8, 238, 228];

        for y in 0..size {
            for x in 0..size {
                let idx = ((y * size + x) * 4) as usize;

                let grain = ((Self::hash(x, y, seed) % 14) as i32) - 7;

                // Sparse horizontal fibers, a few pixels long
                let fiber_hash = Self::hash(x / 7, y, seed ^ 0x9e3779b9);
                let fiber = if fiber_hash % 97 == 0 { -10 } else { 0 };

                data[idx] = (base[0] as i32 + grain + fiber).clamp(0, 255) as u8;
                data[idx + 1] = (base[1] as i32 + grain + fiber).clamp(0, 255) as u8;
                data[idx + 2] = (base[2] as i32 + grain + fiber).clamp(0, 255) as u8;
                data[idx + 3] = 255;
            }
        }

        Self::from_rgba(gpu, &data, size, size, SamplerOptions::default(), "Paper Texture")
    }

    /// Generate a tileable grayscale value-noise texture.
    ///
    /// Bilinear interpolation of a hashed lattice, used by the fbm domain-warp
    /// in the stylization shaders. Wraps seamlessly at the edges.
    pub fn value_noise(gpu: &GpuContext, size: u32, cell: u32, seed: u32) -> Self {
        let mut data = vec![0u8; (size * size * 4) as usize];
        let cells = (size / cell).max(1);

        let lattice = |cx: u32, cy: u32| -> f32 {
            (Self::hash(cx % cells, cy % cells, seed) % 1024) as f32 / 1023.0
        };

        for y in 0..size {
            for x in 0..size {
                let idx = ((y * size + x) * 4) as usize;

                let fx = x as f32 / cell as f32;
                let fy = y as f32 / cell as f32;
                let (cx, cy) = (fx.floor() as u32, fy.floor() as u32);
                let (tx, ty) = (fx.fract(), fy.fract());
                // Smoothstep the lattice weights
                let (sx, sy) = (tx * tx * (3.0 - 2.0 * tx), ty * ty * (3.0 - 2.0 * ty));

                let top = lattice(cx, cy) * (1.0 - sx) + lattice(cx + 1, cy) * sx;
                let bottom = lattice(cx, cy + 1) * (1.0 - sx) + lattice(cx + 1, cy + 1) * sx;
                let v = (top * (1.0 - sy) + bottom * sy).clamp(0.0, 1.0);

                let g = (v * 255.0) as u8;
                data[idx] = g;
                data[idx + 1] = g;
                data[idx + 2] = g;
                data[idx + 3] = 255;
            }
        }

        Self::from_rgba(gpu, &data, size, size, SamplerOptions::default(), "Value Noise Texture")
    }

    /// Simple hash function for procedural generation.
    fn hash(x: u32, y: u32, seed: u32) -> u32 {
        let mut h = seed;
        h = h.wrapping_add(x.wrapping_mul(374761393));
        h = h.wrapping_add(y.wrapping_mul(668265263));
        h ^= h >> 13;
        h = h.wrapping_mul(1274126177);
        h ^= h >> 16;
        h
    }
}
