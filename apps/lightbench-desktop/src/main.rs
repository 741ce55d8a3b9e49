use anyhow::{Context, Result};
use clap::Parser;
use egui::Context as EguiContext;
use lightbench_frame::{FrameDriver, OrbitControls, Viewport};
use lightbench_panel::Panel;
use lightbench_render_wgpu::WgpuRenderer;
use lightbench_scene::{DemoScene, SceneError, compose};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use winit::application::ApplicationHandler;
use winit::dpi::{LogicalSize, PhysicalSize};
use winit::event::{DeviceEvent, ElementState, MouseButton, MouseScrollDelta, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

#[derive(Parser)]
#[command(name = "lightbench-desktop", about = "Lights demo viewer")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Initial window width in logical pixels
    #[arg(long, default_value_t = 1280)]
    width: u32,

    /// Initial window height in logical pixels
    #[arg(long, default_value_t = 720)]
    height: u32,

    /// Window title
    #[arg(long, default_value = "Lights")]
    title: String,
}

/// Pixels of trackpad scroll that count as one wheel notch.
const PIXELS_PER_NOTCH: f64 = 100.0;

/// Application state.
struct AppState {
    demo: DemoScene,
    panel: Panel,
    controls: OrbitControls,
    driver: FrameDriver,
    // Input state
    dragging: Option<MouseButton>,
}

impl AppState {
    fn new(width: f64, height: f64) -> Self {
        let viewport = Viewport::new(width, height, 1.0);
        let demo = compose(viewport.aspect());
        let panel = lightbench_panel::bind(&demo.handles);
        Self {
            demo,
            panel,
            controls: OrbitControls::damped(),
            driver: FrameDriver::new(viewport),
            dragging: None,
        }
    }

    fn pointer_moved(&mut self, dx: f32, dy: f32) -> Result<(), SceneError> {
        let height = self.driver.viewport().height as f32;
        match self.dragging {
            Some(MouseButton::Left) => self.controls.rotate(dx, dy, height),
            Some(MouseButton::Right) => {
                let camera_id = self.demo.handles.camera;
                let fov = self.demo.scene.camera(camera_id)?.fov_degrees;
                let transform = self.demo.scene.node(camera_id)?.transform;
                self.controls.pan(dx, dy, height, &transform, fov);
            }
            _ => {}
        }
        Ok(())
    }

    /// Whether another frame should be requested. Only suspension stops the
    /// loop; a failed frame does not.
    fn wants_redraw(&self) -> bool {
        self.driver.wants_frames()
    }

    fn draw_ui(&mut self, ctx: &EguiContext) {
        egui::SidePanel::right("controls")
            .default_width(300.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    lightbench_panel::show(&self.panel, ui, &mut self.demo.scene);
                });
                ui.separator();
                ui.small("LMB: Orbit | RMB: Pan | Wheel: Zoom");
            });
    }
}

/// Window plus everything needed to draw into it.
struct GpuContext {
    window: Arc<Window>,
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    renderer: WgpuRenderer,
    egui_ctx: EguiContext,
    egui_winit: egui_winit::State,
    egui_renderer: egui_wgpu::Renderer,
}

impl GpuContext {
    fn new(event_loop: &ActiveEventLoop, cli: &Cli) -> Result<Self> {
        let attrs = Window::default_attributes()
            .with_title(cli.title.clone())
            .with_inner_size(LogicalSize::new(cli.width, cli.height));
        let window = Arc::new(
            event_loop
                .create_window(attrs)
                .context("create window")?,
        );

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = instance
            .create_surface(window.clone())
            .context("create surface")?;

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        }))
        .context("no compatible GPU adapter")?;

        let (device, queue) = pollster::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: Some("lightbench_device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: Default::default(),
            },
            None,
        ))
        .context("create device")?;

        let size = window.inner_size();
        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first())
            .copied()
            .context("surface reports no formats")?;
        let alpha_mode = surface_caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let renderer = WgpuRenderer::new(&device, surface_format, config.width, config.height);

        let egui_ctx = EguiContext::default();
        let egui_winit = egui_winit::State::new(
            egui_ctx.clone(),
            egui::ViewportId::ROOT,
            &window,
            Some(window.scale_factor() as f32),
            None,
            None,
        );
        let egui_renderer = egui_wgpu::Renderer::new(&device, surface_format, None, 1, false);

        tracing::info!(
            "GPU initialized with {} backend",
            adapter.get_info().backend.to_str()
        );

        Ok(Self {
            window,
            surface,
            device,
            queue,
            config,
            renderer,
            egui_ctx,
            egui_winit,
            egui_renderer,
        })
    }

    /// Reconfigure the surface for a new physical size and hand the logical
    /// size to the driver, which picks the drawing-buffer size.
    fn resize(&mut self, state: &mut AppState, size: PhysicalSize<u32>) {
        self.config.width = size.width.max(1);
        self.config.height = size.height.max(1);
        self.surface.configure(&self.device, &self.config);

        let scale_factor = self.window.scale_factor();
        let logical = size.to_logical::<f64>(scale_factor);
        match state
            .driver
            .resize(&mut state.demo, logical.width, logical.height, scale_factor)
        {
            Ok((width, height)) => self.renderer.resize(&self.device, width, height),
            Err(e) => tracing::error!("resize failed: {e}"),
        }
    }

    /// Produce one frame. A failed step skips the rest of the frame;
    /// scheduling the next one is left to the event loop.
    fn redraw(&mut self, state: &mut AppState) {
        if let Err(e) = state.driver.advance(&mut state.demo, &mut state.controls) {
            tracing::error!("frame update failed: {e}");
            return;
        }

        let output = match self.surface.get_current_texture() {
            Ok(t) => t,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                self.surface.configure(&self.device, &self.config);
                return;
            }
            Err(e) => {
                tracing::error!("surface error: {e}");
                return;
            }
        };

        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        self.renderer.prepare(&self.device, &state.demo.scene);
        if let Err(e) = self.renderer.render(
            &self.device,
            &self.queue,
            &view,
            &state.demo.scene,
            state.demo.handles.camera,
        ) {
            tracing::error!("render failed: {e}");
        }

        let raw_input = self.egui_winit.take_egui_input(&self.window);
        let full_output = self.egui_ctx.run(raw_input, |ctx| {
            state.draw_ui(ctx);
        });

        self.egui_winit
            .handle_platform_output(&self.window, full_output.platform_output);

        let paint_jobs = self
            .egui_ctx
            .tessellate(full_output.shapes, full_output.pixels_per_point);

        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [self.config.width, self.config.height],
            pixels_per_point: full_output.pixels_per_point,
        };

        for (id, image_delta) in &full_output.textures_delta.set {
            self.egui_renderer
                .update_texture(&self.device, &self.queue, *id, image_delta);
        }
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("egui_encoder"),
            });
        self.egui_renderer.update_buffers(
            &self.device,
            &self.queue,
            &mut encoder,
            &paint_jobs,
            &screen_descriptor,
        );
        {
            let mut pass = encoder
                .begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("egui_pass"),
                    color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                        view: &view,
                        resolve_target: None,
                        ops: wgpu::Operations {
                            load: wgpu::LoadOp::Load,
                            store: wgpu::StoreOp::Store,
                        },
                    })],
                    depth_stencil_attachment: None,
                    ..Default::default()
                })
                .forget_lifetime();
            self.egui_renderer
                .render(&mut pass, &paint_jobs, &screen_descriptor);
        }
        self.queue.submit(std::iter::once(encoder.finish()));
        for id in &full_output.textures_delta.free {
            self.egui_renderer.free_texture(id);
        }

        output.present();
    }
}

struct GpuApp {
    cli: Cli,
    state: AppState,
    gpu: Option<GpuContext>,
}

impl GpuApp {
    fn new(cli: Cli) -> Self {
        let state = AppState::new(f64::from(cli.width), f64::from(cli.height));
        Self {
            cli,
            state,
            gpu: None,
        }
    }
}

impl ApplicationHandler for GpuApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if let Some(gpu) = &self.gpu {
            self.state.driver.resume();
            gpu.window.request_redraw();
            return;
        }

        let mut gpu = match GpuContext::new(event_loop, &self.cli) {
            Ok(gpu) => gpu,
            Err(e) => {
                tracing::error!("GPU initialization failed: {e:#}");
                event_loop.exit();
                return;
            }
        };
        let size = gpu.window.inner_size();
        gpu.resize(&mut self.state, size);
        gpu.window.request_redraw();
        self.gpu = Some(gpu);
    }

    fn suspended(&mut self, _event_loop: &ActiveEventLoop) {
        self.state.driver.suspend();
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let Some(gpu) = &mut self.gpu else {
            return;
        };
        let response = gpu.egui_winit.on_window_event(&gpu.window, &event);
        if response.repaint && self.state.wants_redraw() {
            gpu.window.request_redraw();
        }
        let consumed = response.consumed;

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => {
                gpu.resize(&mut self.state, new_size);
                gpu.window.request_redraw();
            }
            WindowEvent::Occluded(occluded) => {
                if occluded {
                    self.state.driver.suspend();
                } else {
                    self.state.driver.resume();
                    if self.state.wants_redraw() {
                        gpu.window.request_redraw();
                    }
                }
            }
            // Releases always end a drag, even over the panel.
            WindowEvent::MouseInput {
                state: ElementState::Released,
                button,
                ..
            } => {
                if self.state.dragging == Some(button) {
                    self.state.dragging = None;
                }
            }
            WindowEvent::MouseInput {
                state: ElementState::Pressed,
                button: button @ (MouseButton::Left | MouseButton::Right),
                ..
            } if !consumed => {
                self.state.dragging = Some(button);
            }
            WindowEvent::MouseWheel { delta, .. } if !consumed => {
                let steps = match delta {
                    MouseScrollDelta::LineDelta(_, y) => y,
                    MouseScrollDelta::PixelDelta(p) => (p.y / PIXELS_PER_NOTCH) as f32,
                };
                self.state.controls.zoom(steps);
            }
            WindowEvent::RedrawRequested => {
                if self.state.wants_redraw() {
                    gpu.redraw(&mut self.state);
                    gpu.window.request_redraw();
                }
            }
            _ => {}
        }
    }

    fn device_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _device_id: winit::event::DeviceId,
        event: DeviceEvent,
    ) {
        if let DeviceEvent::MouseMotion { delta } = event {
            if self.state.dragging.is_some() {
                if let Err(e) = self.state.pointer_moved(delta.0 as f32, delta.1 as f32) {
                    tracing::warn!("camera input ignored: {e}");
                }
            }
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(gpu) = &self.gpu {
            if self.state.wants_redraw() {
                gpu.window.request_redraw();
            }
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    tracing::info!("lightbench-desktop starting");

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Wait);

    let mut app = GpuApp::new(cli);
    event_loop.run_app(&mut app)?;

    Ok(())
}
