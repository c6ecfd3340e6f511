//! # Linocut
//!
//! **Real-time hand-drawn and print-style rendering for wgpu.**
//!
//! Linocut turns a rendered 3D scene into cross-hatched, engraved, halftoned,
//! or cartoon-shaded imagery. Each frame the scene is rasterized several
//! times with different encodings — shaded color, view-space normals, and
//! front/back world positions — into offscreen render targets, optionally
//! filtered through an iterative separable blur, and composited by a single
//! fullscreen pass built from a library of stylization algorithms.
//!
//! ## Quick Start
//!
//! ```no_run
//! use linocut::*;
//! use std::sync::Arc;
//!
//! fn main() -> Result<(), PipelineError> {
//!     run(AppConfig::new().style(Style::Halftone), |ctx| {
//!         let torus = Arc::new(Mesh::torus(ctx.gpu, 2.0, 0.5, 128, 48));
//!         let id = ctx.scene.push(SceneObject::new(
//!             torus,
//!             Transform::new(),
//!             Color::rgb(0.6, 0.6, 0.6),
//!         ));
//!         *ctx.camera = Camera::new().at(0.0, 4.0, -8.0).looking_at(0.0, 0.0, 0.0);
//!
//!         move |frame| {
//!             frame.scene.objects[id].transform.rotation =
//!                 Quat::from_rotation_y(frame.time * 0.5);
//!         }
//!     })
//! }
//! ```
//!
//! ## Architecture
//!
//! - [`RenderTarget`] — resizable offscreen color (and depth) buffers
//! - [`ScenePass`] / [`GBuffer`] — the scene rendered once per encoding,
//!   selected explicitly per pass
//! - [`PingPongPass`] / [`BlurPass`] — read/write-hazard-free iterative
//!   filtering
//! - [`Compositor`] with a [`Style`] — one configurable pass instead of a
//!   shader copy per visual variant
//! - [`SketchPipeline`] — the per-frame orchestration of all of the above
//!
//! Shader sources are validated with naga at construction, so a malformed
//! effect fails setup with a readable diagnostic instead of a deferred
//! device error.

mod app;
mod assets;
mod blur;
mod camera;
mod color;
mod compositor;
mod error;
mod fullscreen;
mod gbuffer;
mod gpu;
mod mesh;
mod pingpong;
mod pipeline;
mod render_target;
mod scene;
mod scene_pass;
mod style;
pub mod stylize;
mod texture;

pub use app::{run, AppConfig, Frame, SetupContext};
pub use assets::AssetLibrary;
pub use blur::{BlurPass, MAX_BLUR_ITERATIONS};
pub use camera::Camera;
pub use color::Color;
pub use compositor::Compositor;
pub use error::PipelineError;
pub use fullscreen::{FullscreenPass, PassInput};
pub use gbuffer::GBuffer;
pub use gpu::GpuContext;
pub use mesh::{Mesh, Transform, Vertex3d};
pub use pingpong::PingPongPass;
pub use pipeline::{SketchPipeline, NOISE_TEXTURE, PAPER_TEXTURE};
pub use render_target::{RenderTarget, TargetFormat, TargetOptions};
pub use scene::{Scene, SceneObject};
pub use scene_pass::{SceneEncoding, ScenePass};
pub use style::{Style, StyleParams, UnknownParam};
pub use texture::{FilterMode, SamplerOptions, Texture, WrapMode};

// Re-export glam math types for convenience
pub use glam::{Mat4, Quat, Vec2, Vec3, Vec4};
