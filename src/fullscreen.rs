//! Fullscreen shader passes.
//!
//! A [`FullscreenPass`] executes one fragment shader over the whole output
//! area via a single oversized triangle; output pixels map 1:1 to input
//! texels, and the shader receives a normalized 0-1 coordinate. Sizes are
//! device pixels throughout, since the stylization effects compute spatial
//! derivatives and need true pixel-to-texel ratios for anti-aliasing.
//!
//! Composed WGSL is validated with naga before any GPU object exists, so a
//! malformed effect aborts construction with a readable diagnostic.

use crate::error::{validate_wgsl, PipelineError};
use crate::gpu::GpuContext;

/// One texture input of a fullscreen pass: the view to sample and the sampler
/// configured by its owner (clamped for screen buffers, repeating for paper
/// and noise tiles).
pub type PassInput<'a> = (&'a wgpu::TextureView, &'a wgpu::Sampler);

/// A fullscreen shader pass with a fixed vertex stage and a configurable
/// fragment stage.
///
/// The bind group layout is uniform buffer at binding 0, then a
/// texture/sampler pair per input (`1 + 2i`, `2 + 2i`). Bind groups are
/// rebuilt per render call so inputs can change every frame (ping-pong reads,
/// late-resolving assets) without extra bookkeeping.
pub struct FullscreenPass {
    pipeline: wgpu::RenderPipeline,
    bind_group_layout: wgpu::BindGroupLayout,
    uniform_buffer: wgpu::Buffer,
    input_count: u32,
    label: String,
}

impl FullscreenPass {
    /// Compile a fullscreen pass from composed WGSL source.
    ///
    /// The source must define `vs` and `fs` entry points and match the
    /// binding layout described above. Fails with
    /// [`PipelineError::ShaderCompile`] if the source does not parse or
    /// validate.
    pub fn new(
        gpu: &GpuContext,
        label: &str,
        source: &str,
        input_count: u32,
        uniform_size: u64,
        target_format: wgpu::TextureFormat,
    ) -> Result<Self, PipelineError> {
        validate_wgsl(label, source)?;

        let device = &gpu.device;

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(label),
            source: wgpu::ShaderSource::Wgsl(source.into()),
        });

        let uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(&format!("{label} Uniforms")),
            size: uniform_size,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let mut entries = vec![wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        }];
        for i in 0..input_count {
            entries.push(wgpu::BindGroupLayoutEntry {
                binding: 1 + 2 * i,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Texture {
                    sample_type: wgpu::TextureSampleType::Float { filterable: true },
                    view_dimension: wgpu::TextureViewDimension::D2,
                    multisampled: false,
                },
                count: None,
            });
            entries.push(wgpu::BindGroupLayoutEntry {
                binding: 2 + 2 * i,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                count: None,
            });
        }

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some(&format!("{label} Bind Group Layout")),
            entries: &entries,
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some(&format!("{label} Pipeline Layout")),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some(&format!("{label} Pipeline")),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs"),
                buffers: &[],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: target_format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                ..Default::default()
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        Ok(Self {
            pipeline,
            bind_group_layout,
            uniform_buffer,
            input_count,
            label: label.to_string(),
        })
    }

    /// Upload uniforms to the pass's internal buffer.
    ///
    /// Writes land before the frame's submission, so call this once per frame
    /// for passes that render once. Passes rendered several times per frame
    /// (blur iterations) use [`render_with`](Self::render_with) and their own
    /// pre-filled buffers instead.
    pub fn write_uniforms(&self, gpu: &GpuContext, bytes: &[u8]) {
        gpu.queue.write_buffer(&self.uniform_buffer, 0, bytes);
    }

    /// Execute the pass into `target`, sampling `inputs`.
    ///
    /// Overwrites the target's pixel contents; no other observable state
    /// changes.
    pub fn render(
        &self,
        gpu: &GpuContext,
        encoder: &mut wgpu::CommandEncoder,
        target: &wgpu::TextureView,
        inputs: &[PassInput],
    ) {
        self.render_with(gpu, encoder, target, inputs, &self.uniform_buffer);
    }

    /// Execute the pass with an explicit uniform buffer.
    pub fn render_with(
        &self,
        gpu: &GpuContext,
        encoder: &mut wgpu::CommandEncoder,
        target: &wgpu::TextureView,
        inputs: &[PassInput],
        uniforms: &wgpu::Buffer,
    ) {
        debug_assert_eq!(
            inputs.len() as u32,
            self.input_count,
            "{}: wrong number of inputs",
            self.label
        );

        let mut entries = vec![wgpu::BindGroupEntry {
            binding: 0,
            resource: uniforms.as_entire_binding(),
        }];
        for (i, (view, sampler)) in inputs.iter().copied().enumerate() {
            entries.push(wgpu::BindGroupEntry {
                binding: 1 + 2 * i as u32,
                resource: wgpu::BindingResource::TextureView(view),
            });
            entries.push(wgpu::BindGroupEntry {
                binding: 2 + 2 * i as u32,
                resource: wgpu::BindingResource::Sampler(sampler),
            });
        }

        let bind_group = gpu.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(&format!("{} Bind Group", self.label)),
            layout: &self.bind_group_layout,
            entries: &entries,
        });

        let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some(&self.label),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
        });

        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(0, &bind_group, &[]);
        pass.draw(0..3, 0..1);
    }
}
