//! Iterative separable Gaussian blur.
//!
//! A 5-tap separable kernel applied at increasing radii, horizontal then
//! vertical per iteration, through the ping-pong targets. The direction and
//! radius of every step are fixed per iteration index, so the uniform buffers
//! are baked once at construction and each encoded pass reads its own buffer.

use crate::error::PipelineError;
use crate::fullscreen::FullscreenPass;
use crate::gpu::GpuContext;
use crate::pingpong::PingPongPass;
use crate::render_target::{RenderTarget, TargetOptions};

const BLUR_SHADER: &str = include_str!("shaders/blur.wgsl");

/// Upper bound on blur iterations; matches the reach of the radius schedule.
pub const MAX_BLUR_ITERATIONS: u32 = 6;

/// Blur radius for iteration `i`: 2, 4, 6, ...
pub(crate) fn blur_radius(iteration: u32) -> f32 {
    ((iteration + 1) * 2) as f32
}

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct BlurUniforms {
    direction: [f32; 2],
    _pad: [f32; 2],
}

/// The blur stage: a fullscreen pass, its ping-pong targets, and the baked
/// per-step direction buffers.
pub struct BlurPass {
    pass: FullscreenPass,
    targets: PingPongPass,
    // Two buffers per iteration: horizontal then vertical.
    directions: Vec<wgpu::Buffer>,
}

impl BlurPass {
    pub fn new(gpu: &GpuContext, width: u32, height: u32) -> Result<Self, PipelineError> {
        use wgpu::util::DeviceExt;

        let pass = FullscreenPass::new(
            gpu,
            "Blur",
            BLUR_SHADER,
            1,
            std::mem::size_of::<BlurUniforms>() as u64,
            wgpu::TextureFormat::Rgba8Unorm,
        )?;

        let targets = PingPongPass::new(gpu, width, height, TargetOptions::default(), "Blur");

        let mut directions = Vec::with_capacity(2 * MAX_BLUR_ITERATIONS as usize);
        for i in 0..MAX_BLUR_ITERATIONS {
            let d = blur_radius(i);
            for direction in [[d, 0.0], [0.0, d]] {
                let uniforms = BlurUniforms {
                    direction,
                    _pad: [0.0; 2],
                };
                directions.push(gpu.device.create_buffer_init(
                    &wgpu::util::BufferInitDescriptor {
                        label: Some("Blur Direction"),
                        contents: bytemuck::bytes_of(&uniforms),
                        usage: wgpu::BufferUsages::UNIFORM,
                    },
                ));
            }
        }

        Ok(Self {
            pass,
            targets,
            directions,
        })
    }

    /// Blur `source` for `iterations` rounds and return the buffer the
    /// compositor should sample.
    ///
    /// An iteration count of 0 skips filtering entirely and hands back the
    /// unfiltered source; the compositor tolerates either by contract.
    pub fn run<'a>(
        &'a mut self,
        gpu: &GpuContext,
        encoder: &mut wgpu::CommandEncoder,
        source: &'a RenderTarget,
        iterations: u32,
    ) -> &'a RenderTarget {
        if iterations == 0 {
            return source;
        }

        let iterations = iterations.min(MAX_BLUR_ITERATIONS);
        for i in 0..iterations {
            let horizontal = &self.directions[(2 * i) as usize];
            let vertical = &self.directions[(2 * i + 1) as usize];
            if i == 0 {
                self.targets.render_external(
                    gpu,
                    encoder,
                    &self.pass,
                    (&source.view, &source.sampler),
                    horizontal,
                );
            } else {
                self.targets
                    .render_from_live(gpu, encoder, &self.pass, horizontal);
            }
            self.targets
                .render_from_live(gpu, encoder, &self.pass, vertical);
        }

        self.targets.readable()
    }

    pub fn resize(&mut self, gpu: &GpuContext, width: u32, height: u32) {
        self.targets.resize(gpu, width, height, "Blur");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::validate_wgsl;

    #[test]
    fn blur_shader_is_valid_wgsl() {
        validate_wgsl("blur", BLUR_SHADER).unwrap();
    }

    #[test]
    fn radius_schedule_doubles_the_step() {
        assert_eq!(blur_radius(0), 2.0);
        assert_eq!(blur_radius(1), 4.0);
        assert_eq!(blur_radius(5), 12.0);
    }
}
