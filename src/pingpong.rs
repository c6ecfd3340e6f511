//! Ping-pong double buffering for iterative fullscreen filters.
//!
//! A multi-step filter must never read the buffer it is writing. The
//! [`PingPongPass`] holds two same-format render targets and alternates their
//! roles each call: the pass samples the live target, writes the other, then
//! the roles flip. Callers observe the live side only through
//! [`readable`](PingPongPass::readable); the swap bookkeeping never leaks.

use crate::fullscreen::FullscreenPass;
use crate::gpu::GpuContext;
use crate::render_target::{RenderTarget, TargetOptions};

/// The swap bookkeeping, separated so it can be reasoned about (and tested)
/// without a device.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct PingPong {
    live: usize,
}

impl PingPong {
    /// Index of the last-written target.
    pub fn live(self) -> usize {
        self.live
    }

    /// Index the next render writes into.
    pub fn write_index(self) -> usize {
        1 - self.live
    }

    /// Mark the just-written target as live.
    pub fn flip(&mut self) {
        self.live = 1 - self.live;
    }
}

/// Two alternating render targets driven by a [`FullscreenPass`].
pub struct PingPongPass {
    targets: [RenderTarget; 2],
    state: PingPong,
}

impl PingPongPass {
    pub fn new(
        gpu: &GpuContext,
        width: u32,
        height: u32,
        options: TargetOptions,
        label: &str,
    ) -> Self {
        Self {
            targets: [
                RenderTarget::new(gpu, width, height, options, &format!("{label} A")),
                RenderTarget::new(gpu, width, height, options, &format!("{label} B")),
            ],
            state: PingPong::default(),
        }
    }

    /// The last-written target, valid input for the next iteration or for the
    /// compositor.
    pub fn readable(&self) -> &RenderTarget {
        &self.targets[self.state.live()]
    }

    /// Run one iteration reading from an external source (the first step of a
    /// filter chain), writing the non-live target, then flipping.
    pub fn render_external(
        &mut self,
        gpu: &GpuContext,
        encoder: &mut wgpu::CommandEncoder,
        pass: &FullscreenPass,
        source: (&wgpu::TextureView, &wgpu::Sampler),
        uniforms: &wgpu::Buffer,
    ) {
        let write = self.state.write_index();
        pass.render_with(gpu, encoder, &self.targets[write].view, &[source], uniforms);
        self.state.flip();
    }

    /// Run one iteration reading from the live target, writing the other,
    /// then flipping. The input rebind happens here on every call.
    pub fn render_from_live(
        &mut self,
        gpu: &GpuContext,
        encoder: &mut wgpu::CommandEncoder,
        pass: &FullscreenPass,
        uniforms: &wgpu::Buffer,
    ) {
        let live = self.state.live();
        let write = self.state.write_index();
        let source = (&self.targets[live].view, &self.targets[live].sampler);
        pass.render_with(gpu, encoder, &self.targets[write].view, &[source], uniforms);
        self.state.flip();
    }

    /// Resize both targets; contents are invalidated.
    pub fn resize(&mut self, gpu: &GpuContext, width: u32, height: u32, label: &str) {
        self.targets[0].resize(gpu, width, height, &format!("{label} A"));
        self.targets[1].resize(gpu, width, height, &format!("{label} B"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_with_target_zero_live() {
        let state = PingPong::default();
        assert_eq!(state.live(), 0);
        assert_eq!(state.write_index(), 1);
    }

    #[test]
    fn flip_makes_just_written_target_live() {
        let mut state = PingPong::default();
        let written = state.write_index();
        state.flip();
        assert_eq!(state.live(), written);
    }

    #[test]
    fn roles_alternate_every_flip() {
        let mut state = PingPong::default();
        for _ in 0..5 {
            let written = state.write_index();
            assert_ne!(written, state.live(), "a pass must never read its own write target");
            state.flip();
            assert_eq!(state.live(), written);
        }
    }
}
