//! Minimal winit application runner.
//!
//! The runner owns the frame-presentation loop: it builds the GPU context and
//! pipeline at resume, invokes the pipeline once per display refresh, and
//! plumbs window resizes through as a between-frames barrier. A fatal setup
//! error stops the loop from starting and is returned from [`run`].
//!
//! Scene construction and interactive parameter UI are the caller's concern:
//! the setup closure builds the scene, and the frame closure it returns is
//! called once per frame to animate objects and tweak parameters.

use std::sync::Arc;
use std::time::Instant;
use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowAttributes, WindowId};

use crate::camera::Camera;
use crate::error::PipelineError;
use crate::gpu::GpuContext;
use crate::pipeline::SketchPipeline;
use crate::scene::Scene;
use crate::style::{Style, StyleParams};

/// Window and pipeline configuration for [`run`].
pub struct AppConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub style: Style,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            title: "linocut".to_string(),
            width: 1280,
            height: 720,
            style: Style::CrossHatch,
        }
    }
}

impl AppConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }
}

/// Context handed to the setup closure once the GPU is up.
pub struct SetupContext<'a> {
    pub gpu: &'a GpuContext,
    pub scene: &'a mut Scene,
    pub camera: &'a mut Camera,
}

/// Per-frame context handed to the frame closure.
pub struct Frame<'a> {
    pub scene: &'a mut Scene,
    pub camera: &'a mut Camera,
    pub params: &'a mut StyleParams,
    /// Seconds since the loop started.
    pub time: f32,
    /// Seconds since the previous frame.
    pub dt: f32,
}

type FrameFn = Box<dyn FnMut(&mut Frame)>;
type SetupFn = Box<dyn FnOnce(&mut SetupContext) -> FrameFn>;

/// Run a stylized-rendering application.
///
/// The setup closure builds the scene and returns the per-frame closure:
///
/// ```no_run
/// use linocut::*;
///
/// fn main() -> Result<(), PipelineError> {
///     run(AppConfig::new().title("torus"), |ctx| {
///         let torus = std::sync::Arc::new(Mesh::torus(ctx.gpu, 2.0, 0.5, 96, 32));
///         let id = ctx.scene.push(SceneObject::new(
///             torus,
///             Transform::new(),
///             Color::rgb(0.5, 0.5, 0.5),
///         ));
///         move |frame| {
///             frame.scene.objects[id].transform.rotation =
///                 Quat::from_rotation_y(frame.time);
///         }
///     })
/// }
/// ```
pub fn run<S, F>(config: AppConfig, setup: S) -> Result<(), PipelineError>
where
    S: FnOnce(&mut SetupContext) -> F + 'static,
    F: FnMut(&mut Frame) + 'static,
{
    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::Pending {
        config,
        setup: Some(Box::new(move |ctx: &mut SetupContext| {
            Box::new(setup(ctx)) as FrameFn
        })),
        error: None,
    };

    event_loop.run_app(&mut app)?;

    if let App::Pending { error: Some(e), .. } = app {
        return Err(e);
    }
    Ok(())
}

enum App {
    Pending {
        config: AppConfig,
        setup: Option<SetupFn>,
        error: Option<PipelineError>,
    },
    Running {
        window: Arc<Window>,
        gpu: GpuContext,
        pipeline: SketchPipeline,
        scene: Scene,
        camera: Camera,
        frame_fn: FrameFn,
        start_time: Instant,
        last_frame: Instant,
    },
}

impl App {
    fn start(
        config: &AppConfig,
        setup: SetupFn,
        event_loop: &ActiveEventLoop,
    ) -> Result<App, PipelineError> {
        let window_attrs = WindowAttributes::default()
            .with_title(&config.title)
            .with_inner_size(winit::dpi::LogicalSize::new(config.width, config.height));

        let window = Arc::new(event_loop.create_window(window_attrs)?);
        let gpu = GpuContext::new(window.clone())?;

        let mut scene = Scene::new();
        let mut camera = Camera::new();
        let frame_fn = setup(&mut SetupContext {
            gpu: &gpu,
            scene: &mut scene,
            camera: &mut camera,
        });

        let pipeline = SketchPipeline::new(&gpu, config.style, gpu.width(), gpu.height())?;

        Ok(App::Running {
            window,
            gpu,
            pipeline,
            scene,
            camera,
            frame_fn,
            start_time: Instant::now(),
            last_frame: Instant::now(),
        })
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if let App::Pending { config, setup, error } = self {
            let Some(setup) = setup.take() else {
                return;
            };
            match App::start(config, setup, event_loop) {
                Ok(running) => *self = running,
                Err(e) => {
                    log::error!("pipeline setup failed: {e}");
                    *error = Some(e);
                    event_loop.exit();
                }
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        let App::Running {
            window,
            gpu,
            pipeline,
            scene,
            camera,
            frame_fn,
            start_time,
            last_frame,
        } = self
        else {
            return;
        };

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(size) => {
                gpu.resize(size.width, size.height);
                // The barrier: every target reallocates before the next
                // frame's passes run.
                pipeline.set_size(gpu, gpu.width(), gpu.height());
            }
            WindowEvent::RedrawRequested => {
                let now = Instant::now();
                let time = start_time.elapsed().as_secs_f32();
                let dt = now.duration_since(*last_frame).as_secs_f32();
                *last_frame = now;

                let mut frame = Frame {
                    scene: &mut *scene,
                    camera: &mut *camera,
                    params: pipeline.params_mut(),
                    time,
                    dt,
                };
                frame_fn(&mut frame);

                let output = match gpu.surface.get_current_texture() {
                    Ok(output) => output,
                    Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                        gpu.reconfigure();
                        window.request_redraw();
                        return;
                    }
                    Err(wgpu::SurfaceError::Timeout) => {
                        window.request_redraw();
                        return;
                    }
                    Err(e) => {
                        log::error!("surface error: {e}");
                        event_loop.exit();
                        return;
                    }
                };
                let surface_view = output
                    .texture
                    .create_view(&wgpu::TextureViewDescriptor::default());

                pipeline.render(gpu, scene, camera, &surface_view, time);
                output.present();

                window.request_redraw();
            }
            _ => {}
        }
    }
}
