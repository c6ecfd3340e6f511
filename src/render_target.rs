//! Off-screen render targets for intermediate pass results.
//!
//! Render targets are GPU textures that can be both rendered to (as a color
//! attachment) and sampled from (as a texture binding). Every stage of the
//! pipeline writes into exactly one target per frame; the compositor samples
//! them all. Contents are overwritten each frame — there is no versioning.

use crate::gpu::GpuContext;
use crate::texture::{FilterMode, WrapMode};

/// Pixel storage and sampling options for a render target.
///
/// `Rgba8` suits color-like data; `Rgba16Float` is required when encoding
/// unbounded values such as world positions. `depth` attaches a depth buffer
/// for targets that receive depth-tested scene renders.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TargetOptions {
    pub format: TargetFormat,
    pub filter: FilterMode,
    pub wrap: WrapMode,
    pub depth: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TargetFormat {
    Rgba8,
    Rgba16Float,
}

impl TargetFormat {
    pub(crate) fn to_wgpu(self) -> wgpu::TextureFormat {
        match self {
            TargetFormat::Rgba8 => wgpu::TextureFormat::Rgba8Unorm,
            TargetFormat::Rgba16Float => wgpu::TextureFormat::Rgba16Float,
        }
    }
}

impl Default for TargetOptions {
    fn default() -> Self {
        Self {
            format: TargetFormat::Rgba8,
            filter: FilterMode::Linear,
            wrap: WrapMode::Clamp,
            depth: false,
        }
    }
}

impl TargetOptions {
    pub fn with_depth(mut self) -> Self {
        self.depth = true;
        self
    }

    pub fn half_float(mut self) -> Self {
        self.format = TargetFormat::Rgba16Float;
        self
    }
}

/// Zero extents are a programmer error; fail fast before wgpu validation does.
pub(crate) fn validate_extent(width: u32, height: u32) {
    assert!(
        width > 0 && height > 0,
        "render target dimensions must be positive, got {width}x{height}"
    );
}

/// An off-screen color (and optionally depth) buffer the GPU can render into
/// and later sample as a texture.
pub struct RenderTarget {
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
    pub(crate) sampler: wgpu::Sampler,
    depth: Option<wgpu::TextureView>,
    width: u32,
    height: u32,
    options: TargetOptions,
}

impl RenderTarget {
    /// Creates a render target of the given pixel dimensions.
    ///
    /// # Panics
    ///
    /// Panics if `width` or `height` is zero.
    pub fn new(gpu: &GpuContext, width: u32, height: u32, options: TargetOptions, label: &str) -> Self {
        validate_extent(width, height);

        let (texture, view, depth) = Self::allocate(gpu, width, height, options, label);

        let sampling = crate::texture::SamplerOptions {
            wrap: options.wrap,
            filter: options.filter,
        };
        let sampler = gpu.device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some(&format!("{} Sampler", label)),
            address_mode_u: sampling.address_mode(),
            address_mode_v: sampling.address_mode(),
            address_mode_w: sampling.address_mode(),
            mag_filter: sampling.filter_mode(),
            min_filter: sampling.filter_mode(),
            mipmap_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        Self {
            texture,
            view,
            sampler,
            depth,
            width,
            height,
            options,
        }
    }

    fn allocate(
        gpu: &GpuContext,
        width: u32,
        height: u32,
        options: TargetOptions,
        label: &str,
    ) -> (wgpu::Texture, wgpu::TextureView, Option<wgpu::TextureView>) {
        let texture = gpu.device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: options.format.to_wgpu(),
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        let depth = options.depth.then(|| {
            gpu.device
                .create_texture(&wgpu::TextureDescriptor {
                    label: Some(&format!("{} Depth", label)),
                    size: wgpu::Extent3d {
                        width,
                        height,
                        depth_or_array_layers: 1,
                    },
                    mip_level_count: 1,
                    sample_count: 1,
                    dimension: wgpu::TextureDimension::D2,
                    format: wgpu::TextureFormat::Depth32Float,
                    usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
                    view_formats: &[],
                })
                .create_view(&wgpu::TextureViewDescriptor::default())
        });

        (texture, view, depth)
    }

    /// Reallocates backing storage at the new dimensions, invalidating prior
    /// contents. Must run before the next frame's passes when the viewport
    /// changes.
    ///
    /// # Panics
    ///
    /// Panics if `width` or `height` is zero.
    pub fn resize(&mut self, gpu: &GpuContext, width: u32, height: u32, label: &str) {
        validate_extent(width, height);
        if self.width == width && self.height == height {
            return;
        }
        let (texture, view, depth) = Self::allocate(gpu, width, height, self.options, label);
        self.texture = texture;
        self.view = view;
        self.depth = depth;
        self.width = width;
        self.height = height;
    }

    /// The depth attachment view, present when the target was created with
    /// `depth: true`.
    pub fn depth_view(&self) -> Option<&wgpu::TextureView> {
        self.depth.as_ref()
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn options(&self) -> TargetOptions {
        self.options
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_map_to_wgpu() {
        assert_eq!(TargetFormat::Rgba8.to_wgpu(), wgpu::TextureFormat::Rgba8Unorm);
        assert_eq!(
            TargetFormat::Rgba16Float.to_wgpu(),
            wgpu::TextureFormat::Rgba16Float
        );
    }

    #[test]
    fn default_options_have_no_depth() {
        let options = TargetOptions::default();
        assert!(!options.depth);
        assert!(options.with_depth().depth);
    }

    #[test]
    #[should_panic(expected = "dimensions must be positive")]
    fn zero_width_is_rejected() {
        validate_extent(0, 100);
    }

    #[test]
    #[should_panic(expected = "dimensions must be positive")]
    fn zero_height_is_rejected() {
        validate_extent(100, 0);
    }

    #[test]
    fn positive_extents_are_accepted() {
        validate_extent(1, 1);
        validate_extent(4096, 4096);
    }
}
