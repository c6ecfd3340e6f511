//! The top-level stylization pipeline.
//!
//! One [`SketchPipeline::render`] call per displayed frame encodes, in
//! dependency order on a single command stream:
//!
//! ```text
//! Scene ──▶ [color, normal, position front/back] ──▶ optional blur ──▶ compositor ──▶ surface
//! ```
//!
//! Every target is written by exactly one stage per frame; the compositor
//! samples them all and is encoded last. Resizing is a barrier: all targets
//! reallocate between frames, never mid-frame.

use crate::assets::AssetLibrary;
use crate::blur::BlurPass;
use crate::camera::Camera;
use crate::compositor::Compositor;
use crate::error::PipelineError;
use crate::gbuffer::GBuffer;
use crate::gpu::GpuContext;
use crate::render_target::validate_extent;
use crate::scene::Scene;
use crate::scene_pass::ScenePass;
use crate::style::{Style, StyleParams};
use crate::texture::Texture;

/// Asset names the compositor samples every frame.
pub const PAPER_TEXTURE: &str = "paper";
pub const NOISE_TEXTURE: &str = "noise";

/// The full multi-pass pipeline: G-buffers, blur, compositor, and the paper
/// and noise inputs.
pub struct SketchPipeline {
    scene_pass: ScenePass,
    gbuffer: GBuffer,
    blur: BlurPass,
    compositor: Compositor,
    assets: AssetLibrary,
    width: u32,
    height: u32,
}

impl SketchPipeline {
    /// Build the pipeline at the given output size.
    ///
    /// Any shader failure is fatal here, before the frame loop starts.
    /// Procedural paper and noise textures are generated as defaults; swap
    /// them via [`set_paper`](Self::set_paper)/[`set_noise`](Self::set_noise)
    /// when assets resolve.
    pub fn new(
        gpu: &GpuContext,
        style: Style,
        width: u32,
        height: u32,
    ) -> Result<Self, PipelineError> {
        validate_extent(width, height);

        let scene_pass = ScenePass::new(gpu)?;
        let gbuffer = GBuffer::new(gpu, width, height);
        let blur = BlurPass::new(gpu, width, height)?;
        let compositor = Compositor::new(gpu, style)?;

        let mut assets = AssetLibrary::new(gpu);
        assets.insert(PAPER_TEXTURE, Texture::paper(gpu, 512, 7));
        assets.insert(NOISE_TEXTURE, Texture::value_noise(gpu, 256, 8, 11));

        log::info!(
            "pipeline ready: {}x{}, style {}",
            width,
            height,
            style.label()
        );

        Ok(Self {
            scene_pass,
            gbuffer,
            blur,
            compositor,
            assets,
            width,
            height,
        })
    }

    /// Resize every owned target before the next frame's passes run.
    ///
    /// # Panics
    ///
    /// Panics if either dimension is zero.
    pub fn set_size(&mut self, gpu: &GpuContext, width: u32, height: u32) {
        validate_extent(width, height);
        if self.width == width && self.height == height {
            return;
        }
        log::debug!("pipeline resize {}x{} -> {width}x{height}", self.width, self.height);
        self.gbuffer.resize(gpu, width, height);
        self.blur.resize(gpu, width, height);
        self.width = width;
        self.height = height;
    }

    /// The active stylization algorithm.
    pub fn style(&self) -> Style {
        self.compositor.style()
    }

    /// Swap the stylization algorithm; only the compositor pass recompiles.
    pub fn set_style(&mut self, gpu: &GpuContext, style: Style) -> Result<(), PipelineError> {
        self.compositor.set_style(gpu, style)
    }

    /// The compositor's live parameter record.
    pub fn params(&self) -> &StyleParams {
        &self.compositor.params
    }

    pub fn params_mut(&mut self) -> &mut StyleParams {
        &mut self.compositor.params
    }

    /// Replace the paper texture (e.g. when a named asset resolves).
    pub fn set_paper(&mut self, paper: Texture) {
        self.assets.insert(PAPER_TEXTURE, paper);
    }

    /// Replace the noise texture driving the fbm domain warp.
    pub fn set_noise(&mut self, noise: Texture) {
        self.assets.insert(NOISE_TEXTURE, noise);
    }

    /// The texture registry the compositor samples from.
    pub fn assets_mut(&mut self) -> &mut AssetLibrary {
        &mut self.assets
    }

    /// Render one frame into `surface_view` and submit it.
    ///
    /// All passes are recorded into one command encoder, so submission order
    /// equals dependency order: the compositor is guaranteed to see this
    /// frame's G-buffer and blur writes.
    pub fn render(
        &mut self,
        gpu: &GpuContext,
        scene: &Scene,
        camera: &Camera,
        surface_view: &wgpu::TextureView,
        time: f32,
    ) {
        self.scene_pass.prepare(gpu, scene, camera, time);

        let mut encoder = gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Sketch Pipeline Encoder"),
            });

        self.gbuffer.render(&mut encoder, &self.scene_pass, scene);

        let blur_passes = self.compositor.params.blur_passes;
        let color_input = self
            .blur
            .run(gpu, &mut encoder, &self.gbuffer.color, blur_passes);

        self.compositor.render(
            gpu,
            &mut encoder,
            surface_view,
            color_input,
            &self.gbuffer,
            self.assets.texture(PAPER_TEXTURE),
            self.assets.texture(NOISE_TEXTURE),
        );

        gpu.queue.submit(std::iter::once(encoder.finish()));
    }
}
