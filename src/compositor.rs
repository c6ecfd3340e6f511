//! The compositor stage: the single fullscreen pass that reads every buffer
//! and writes the final stylized image.
//!
//! The pass samples the color render (blurred or not), the normal and
//! position G-buffers, and the paper/noise textures, then runs the fragment
//! body selected by the active [`Style`]. Switching styles recompiles only
//! this pass.

use crate::error::PipelineError;
use crate::fullscreen::FullscreenPass;
use crate::gbuffer::GBuffer;
use crate::gpu::GpuContext;
use crate::render_target::RenderTarget;
use crate::style::{ComposeUniforms, Style, StyleParams};
use crate::texture::Texture;

/// The final compositing pass and its parameter record.
pub struct Compositor {
    pass: FullscreenPass,
    style: Style,
    /// Live tunables, uploaded every frame.
    pub params: StyleParams,
}

impl Compositor {
    pub fn new(gpu: &GpuContext, style: Style) -> Result<Self, PipelineError> {
        let pass = Self::build_pass(gpu, style)?;
        Ok(Self {
            pass,
            style,
            params: style.default_params(),
        })
    }

    fn build_pass(gpu: &GpuContext, style: Style) -> Result<FullscreenPass, PipelineError> {
        FullscreenPass::new(
            gpu,
            &format!("Compositor ({})", style.label()),
            &style.compose_source(),
            6,
            std::mem::size_of::<ComposeUniforms>() as u64,
            gpu.config.format,
        )
    }

    pub fn style(&self) -> Style {
        self.style
    }

    /// Swap the stylization algorithm, recompiling the pass and resetting the
    /// parameters to the new style's defaults.
    pub fn set_style(&mut self, gpu: &GpuContext, style: Style) -> Result<(), PipelineError> {
        self.pass = Self::build_pass(gpu, style)?;
        self.style = style;
        self.params = style.default_params();
        log::info!("compositor style set to {}", style.label());
        Ok(())
    }

    /// Composite the frame to `target` (normally the surface view).
    ///
    /// `color_input` is whichever buffer the blur stage produced — the raw
    /// color target when filtering is off. Must run after all G-buffer and
    /// blur passes of the frame are encoded; it samples their outputs.
    pub fn render(
        &self,
        gpu: &GpuContext,
        encoder: &mut wgpu::CommandEncoder,
        target: &wgpu::TextureView,
        color_input: &RenderTarget,
        gbuffer: &GBuffer,
        paper: &Texture,
        noise: &Texture,
    ) {
        let uniforms = self
            .params
            .to_uniforms(gbuffer.color.width(), gbuffer.color.height());
        self.pass.write_uniforms(gpu, bytemuck::bytes_of(&uniforms));

        self.pass.render(
            gpu,
            encoder,
            target,
            &[
                (&color_input.view, &color_input.sampler),
                (&gbuffer.normal.view, &gbuffer.normal.sampler),
                (&gbuffer.position_front.view, &gbuffer.position_front.sampler),
                (&gbuffer.position_back.view, &gbuffer.position_back.sampler),
                (&paper.view, &paper.sampler),
                (&noise.view, &noise.sampler),
            ],
        );
    }
}
