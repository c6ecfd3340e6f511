//! The G-buffer stage: the auxiliary per-pixel buffers the compositor needs
//! but the base color render does not expose.
//!
//! Per frame the scene is rasterized four times — shaded color, view-space
//! normal, front-face world position, back-face world position — each into
//! its own target. The relative order among the G-buffers is irrelevant;
//! each writes an independent target, and the compositor runs only after all
//! of them are encoded.

use crate::color::Color;
use crate::gpu::GpuContext;
use crate::render_target::{RenderTarget, TargetOptions};
use crate::scene::Scene;
use crate::scene_pass::{SceneEncoding, ScenePass};

/// The per-frame auxiliary buffers.
pub struct GBuffer {
    /// Lit color render; the compositor's tone source.
    pub color: RenderTarget,
    /// View-space normals, encoded 0..1; drives silhouette detection.
    pub normal: RenderTarget,
    /// Front-face world positions (half-float, unbounded values).
    pub position_front: RenderTarget,
    /// Back-face world positions.
    pub position_back: RenderTarget,
}

impl GBuffer {
    pub fn new(gpu: &GpuContext, width: u32, height: u32) -> Self {
        let color_options = TargetOptions::default().with_depth();
        let position_options = TargetOptions::default().with_depth().half_float();

        Self {
            color: RenderTarget::new(gpu, width, height, color_options, "GBuffer Color"),
            normal: RenderTarget::new(gpu, width, height, color_options, "GBuffer Normal"),
            position_front: RenderTarget::new(
                gpu,
                width,
                height,
                position_options,
                "GBuffer Position Front",
            ),
            position_back: RenderTarget::new(
                gpu,
                width,
                height,
                position_options,
                "GBuffer Position Back",
            ),
        }
    }

    /// Encode the four scene renders for this frame.
    pub fn render(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        scene_pass: &ScenePass,
        scene: &Scene,
    ) {
        scene_pass.render(
            encoder,
            &self.color,
            SceneEncoding::Shaded,
            scene,
            scene.background.to_wgpu(),
        );
        // Empty background encodes the +Z view normal so an object-free
        // frame stays edge-free under the Sobel pass.
        scene_pass.render(
            encoder,
            &self.normal,
            SceneEncoding::Normal,
            scene,
            Color::rgb(0.5, 0.5, 1.0).to_wgpu(),
        );
        // Zero alpha marks "no geometry" for the coverage masks.
        scene_pass.render(
            encoder,
            &self.position_front,
            SceneEncoding::PositionFront,
            scene,
            Color::TRANSPARENT.to_wgpu(),
        );
        scene_pass.render(
            encoder,
            &self.position_back,
            SceneEncoding::PositionBack,
            scene,
            Color::TRANSPARENT.to_wgpu(),
        );
    }

    /// Resize every target; must run between frames, before the next frame's
    /// passes.
    pub fn resize(&mut self, gpu: &GpuContext, width: u32, height: u32) {
        self.color.resize(gpu, width, height, "GBuffer Color");
        self.normal.resize(gpu, width, height, "GBuffer Normal");
        self.position_front
            .resize(gpu, width, height, "GBuffer Position Front");
        self.position_back
            .resize(gpu, width, height, "GBuffer Position Back");
    }
}
