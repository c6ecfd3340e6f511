//! Scene rendering with explicit override pipelines.
//!
//! The same scene is rasterized several times per frame, each time through a
//! different pipeline: the shaded color render, a view-space normal encoding,
//! and world-position encodings restricted to front or back faces. The
//! encoding is an explicit argument of [`ScenePass::render`] — per-object
//! state is never substituted, so there is nothing to reset afterwards.
//!
//! Bind groups follow the two-level split of camera (group 0, written once
//! per frame) and model (group 1, one 256-byte slot per object bound by
//! dynamic offset so a single upload covers every pass of the frame).

use crate::camera::Camera;
use crate::error::{validate_wgsl, PipelineError};
use crate::gpu::GpuContext;
use crate::mesh::Vertex3d;
use crate::render_target::RenderTarget;
use crate::scene::Scene;

const SCENE_SHADER: &str = include_str!("shaders/scene.wgsl");

/// Uniform buffer offset alignment required for the per-object slots.
const MODEL_STRIDE: u64 = 256;

/// Which encoding a scene render produces.
///
/// This is the explicit form of a scene-wide override material: the variant
/// selects the fragment entry point and face culling, and nothing else
/// changes between passes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SceneEncoding {
    /// Lit color render (the base buffer).
    Shaded,
    /// View-space normals packed into 0..1.
    Normal,
    /// World positions of front faces only.
    PositionFront,
    /// World positions of back faces only.
    PositionBack,
}

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct CameraUniforms {
    view_proj: [[f32; 4]; 4],
    view: [[f32; 4]; 4],
    camera_pos: [f32; 3],
    time: f32,
}

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct ModelUniforms {
    model: [[f32; 4]; 4],
    normal_matrix: [[f32; 4]; 4],
    color: [f32; 4],
}

/// The scene rasterizer and its four encoding pipelines.
pub struct ScenePass {
    shaded: wgpu::RenderPipeline,
    normal: wgpu::RenderPipeline,
    position_front: wgpu::RenderPipeline,
    position_back: wgpu::RenderPipeline,
    camera_buffer: wgpu::Buffer,
    camera_bind_group: wgpu::BindGroup,
    model_buffer: wgpu::Buffer,
    model_bind_group: wgpu::BindGroup,
    model_bind_group_layout: wgpu::BindGroupLayout,
    model_capacity: usize,
}

impl ScenePass {
    pub fn new(gpu: &GpuContext) -> Result<Self, PipelineError> {
        validate_wgsl("scene", SCENE_SHADER)?;

        let device = &gpu.device;

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Scene Shader"),
            source: wgpu::ShaderSource::Wgsl(SCENE_SHADER.into()),
        });

        let camera_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Camera Uniforms"),
            size: std::mem::size_of::<CameraUniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let camera_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Camera Bind Group Layout"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                }],
            });

        let camera_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Camera Bind Group"),
            layout: &camera_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: camera_buffer.as_entire_binding(),
            }],
        });

        let model_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Model Bind Group Layout"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: true,
                        min_binding_size: None,
                    },
                    count: None,
                }],
            });

        let model_capacity = 64;
        let (model_buffer, model_bind_group) =
            Self::create_model_buffer(gpu, &model_bind_group_layout, model_capacity);

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Scene Pipeline Layout"),
            bind_group_layouts: &[&camera_bind_group_layout, &model_bind_group_layout],
            push_constant_ranges: &[],
        });

        let build = |label: &str,
                     entry: &str,
                     cull: Option<wgpu::Face>,
                     format: wgpu::TextureFormat| {
            device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some(label),
                layout: Some(&pipeline_layout),
                vertex: wgpu::VertexState {
                    module: &shader,
                    entry_point: Some("vs"),
                    buffers: &[Vertex3d::LAYOUT],
                    compilation_options: Default::default(),
                },
                fragment: Some(wgpu::FragmentState {
                    module: &shader,
                    entry_point: Some(entry),
                    targets: &[Some(wgpu::ColorTargetState {
                        format,
                        blend: Some(wgpu::BlendState::REPLACE),
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                    compilation_options: Default::default(),
                }),
                primitive: wgpu::PrimitiveState {
                    topology: wgpu::PrimitiveTopology::TriangleList,
                    cull_mode: cull,
                    front_face: wgpu::FrontFace::Ccw,
                    ..Default::default()
                },
                depth_stencil: Some(wgpu::DepthStencilState {
                    format: wgpu::TextureFormat::Depth32Float,
                    depth_write_enabled: true,
                    depth_compare: wgpu::CompareFunction::Less,
                    stencil: wgpu::StencilState::default(),
                    bias: wgpu::DepthBiasState::default(),
                }),
                multisample: wgpu::MultisampleState::default(),
                multiview: None,
                cache: None,
            })
        };

        // The shaded and normal renders draw both faces so backdrop shells
        // stay visible from inside; the position encodings split by face
        // for the front/back separation.
        let shaded = build(
            "Scene Shaded Pipeline",
            "fs_shaded",
            None,
            wgpu::TextureFormat::Rgba8Unorm,
        );
        let normal = build(
            "Scene Normal Pipeline",
            "fs_normal",
            None,
            wgpu::TextureFormat::Rgba8Unorm,
        );
        let position_front = build(
            "Scene Position Front Pipeline",
            "fs_position",
            Some(wgpu::Face::Back),
            wgpu::TextureFormat::Rgba16Float,
        );
        let position_back = build(
            "Scene Position Back Pipeline",
            "fs_position",
            Some(wgpu::Face::Front),
            wgpu::TextureFormat::Rgba16Float,
        );

        Ok(Self {
            shaded,
            normal,
            position_front,
            position_back,
            camera_buffer,
            camera_bind_group,
            model_buffer,
            model_bind_group,
            model_bind_group_layout,
            model_capacity,
        })
    }

    fn create_model_buffer(
        gpu: &GpuContext,
        layout: &wgpu::BindGroupLayout,
        capacity: usize,
    ) -> (wgpu::Buffer, wgpu::BindGroup) {
        let buffer = gpu.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Model Uniforms"),
            size: MODEL_STRIDE * capacity as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let bind_group = gpu.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Model Bind Group"),
            layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                    buffer: &buffer,
                    offset: 0,
                    size: wgpu::BufferSize::new(std::mem::size_of::<ModelUniforms>() as u64),
                }),
            }],
        });
        (buffer, bind_group)
    }

    /// Upload camera and per-object uniforms for this frame.
    ///
    /// One upload serves every encoding pass of the frame, since the scene
    /// and camera do not change between them.
    pub fn prepare(&mut self, gpu: &GpuContext, scene: &Scene, camera: &Camera, time: f32) {
        if scene.objects.len() > self.model_capacity {
            self.model_capacity = scene.objects.len().next_power_of_two();
            log::debug!("growing model uniform buffer to {} slots", self.model_capacity);
            let (buffer, bind_group) =
                Self::create_model_buffer(gpu, &self.model_bind_group_layout, self.model_capacity);
            self.model_buffer = buffer;
            self.model_bind_group = bind_group;
        }

        let view = camera.view_matrix();
        let proj = camera.projection_matrix(gpu.aspect());
        let camera_uniforms = CameraUniforms {
            view_proj: (proj * view).to_cols_array_2d(),
            view: view.to_cols_array_2d(),
            camera_pos: camera.position.to_array(),
            time,
        };
        gpu.queue.write_buffer(
            &self.camera_buffer,
            0,
            bytemuck::cast_slice(&[camera_uniforms]),
        );

        let mut slots = vec![0u8; MODEL_STRIDE as usize * scene.objects.len().max(1)];
        for (i, object) in scene.objects.iter().enumerate() {
            let model_matrix = object.transform.matrix();
            let uniforms = ModelUniforms {
                model: model_matrix.to_cols_array_2d(),
                normal_matrix: model_matrix.inverse().transpose().to_cols_array_2d(),
                color: object.color.to_array(),
            };
            let offset = i * MODEL_STRIDE as usize;
            slots[offset..offset + std::mem::size_of::<ModelUniforms>()]
                .copy_from_slice(bytemuck::bytes_of(&uniforms));
        }
        gpu.queue.write_buffer(&self.model_buffer, 0, &slots);
    }

    /// Rasterize the scene into `target` with the given encoding.
    ///
    /// The target must carry a depth buffer. [`prepare`](Self::prepare) must
    /// have run earlier in the frame.
    pub fn render(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        target: &RenderTarget,
        encoding: SceneEncoding,
        scene: &Scene,
        clear: wgpu::Color,
    ) {
        let depth_view = target
            .depth_view()
            .expect("scene renders require a depth-buffered target");

        let pipeline = match encoding {
            SceneEncoding::Shaded => &self.shaded,
            SceneEncoding::Normal => &self.normal,
            SceneEncoding::PositionFront => &self.position_front,
            SceneEncoding::PositionBack => &self.position_back,
        };

        let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Scene Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: &target.view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(clear),
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: depth_view,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            timestamp_writes: None,
            occlusion_query_set: None,
        });

        pass.set_pipeline(pipeline);
        pass.set_bind_group(0, &self.camera_bind_group, &[]);

        for (i, object) in scene.objects.iter().enumerate() {
            let offset = (i as u64 * MODEL_STRIDE) as u32;
            pass.set_bind_group(1, &self.model_bind_group, &[offset]);
            pass.set_vertex_buffer(0, object.mesh.vertex_buffer.slice(..));
            pass.set_index_buffer(object.mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
            pass.draw_indexed(0..object.mesh.index_count, 0, 0..1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scene_shader_is_valid_wgsl() {
        validate_wgsl("scene", SCENE_SHADER).unwrap();
    }

    #[test]
    fn model_slots_fit_the_stride() {
        assert!(std::mem::size_of::<ModelUniforms>() as u64 <= MODEL_STRIDE);
    }
}
