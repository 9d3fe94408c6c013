use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use log::{debug, error, info, warn};
use winit::application::ApplicationHandler;
use winit::dpi::{LogicalPosition, LogicalSize, PhysicalSize};
use winit::event::{ElementState, KeyEvent, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{Key, NamedKey};
use winit::window::{Window, WindowAttributes, WindowId};

use super::context::Context;
use super::events::{
    RuntimeCommand, RuntimeCommandReceiver, RuntimeEvent, RuntimeEventSender,
    command_channel, event_channel,
};
use super::frame_clock::FrameClock;
use super::startup::{LaunchOptions, Prepared, prepare};
use crate::registry::{WindowRegistry, WindowShape};
use crate::render::camera::OrthographicCamera;
use crate::render::frame::Frame;
use crate::render::geometry::{SphereMesh, scene_vertices};
use crate::render::gpu::{Gpu, LineRenderer};

/// Cascade offset for extra windows opened from one process.
const CASCADE: i32 = 48;

pub fn run(options: LaunchOptions) -> Result<(), String> {
    let (_command_tx, command_rx) = command_channel();
    let (event_tx, _event_rx) = event_channel();
    run_with_channels(options, command_rx, event_tx)
}

/// Run the window loop until the last window closes or
/// `RuntimeCommand::Quit` arrives. With `clear` set the shared store is
/// wiped and no window is opened.
pub fn run_with_channels(
    options: LaunchOptions,
    commands: RuntimeCommandReceiver,
    events: RuntimeEventSender,
) -> Result<(), String> {
    let registry = match prepare(&options)? {
        Prepared::Cleared => {
            let _ = events.send(RuntimeEvent::Stopped);
            return Ok(());
        }
        Prepared::Ready(registry) => registry,
    };

    let event_loop = EventLoop::new().map_err(|err| err.to_string())?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new(options, registry, commands, events);
    event_loop.run_app(&mut app).map_err(|err| err.to_string())
}

struct App {
    options: LaunchOptions,
    registry: Arc<dyn WindowRegistry>,
    commands: RuntimeCommandReceiver,
    events: RuntimeEventSender,
    pending: Vec<RuntimeCommand>,
    frame_clock: FrameClock,
    mesh: SphereMesh,
    gpu: Option<Gpu>,
    windows: HashMap<WindowId, WindowRuntime>,
    opened: usize,
    started: bool,
}

struct WindowRuntime {
    window: Arc<Window>,
    surface: wgpu::Surface<'static>,
    surface_config: wgpu::SurfaceConfiguration,
    renderer: LineRenderer,
    camera: OrthographicCamera,
    created_at: Instant,
    occluded: bool,
    context: Option<Context>,
}

impl App {
    fn new(
        options: LaunchOptions,
        registry: Arc<dyn WindowRegistry>,
        commands: RuntimeCommandReceiver,
        events: RuntimeEventSender,
    ) -> Self {
        let segments = options.config.sphere_segments;
        let frame_clock = FrameClock::new(options.config.fps);

        Self {
            options,
            registry,
            commands,
            events,
            pending: vec![],
            frame_clock,
            mesh: SphereMesh::new(segments, segments),
            gpu: None,
            windows: HashMap::new(),
            opened: 0,
            started: false,
        }
    }

    fn open_window(
        &mut self,
        event_loop: &ActiveEventLoop,
    ) -> Result<(), String> {
        let [w, h] = self.options.config.window_size;
        let offset = self.opened as i32 * CASCADE;

        let attrs = WindowAttributes::default()
            .with_title(format!("Orrery ({})", self.options.session))
            .with_inner_size(LogicalSize::new(w, h))
            .with_position(LogicalPosition::new(offset, offset));

        let window = Arc::new(
            event_loop
                .create_window(attrs)
                .map_err(|err| err.to_string())?,
        );

        let instance = match &self.gpu {
            Some(gpu) => gpu.instance.clone(),
            None => wgpu::Instance::new(&wgpu::InstanceDescriptor::default()),
        };
        let surface = instance
            .create_surface(window.clone())
            .map_err(|err| err.to_string())?;

        if self.gpu.is_none() {
            self.gpu = Some(Gpu::new(instance, &surface)?);
        }
        let Some(gpu) = self.gpu.as_ref() else {
            return Err("gpu unavailable".to_string());
        };

        let size = window.inner_size();
        let surface_config =
            gpu.surface_config(&surface, [size.width, size.height])?;
        surface.configure(gpu.device.as_ref(), &surface_config);

        let renderer =
            LineRenderer::new(gpu.device.as_ref(), surface_config.format)?;

        let logical = size.to_logical::<f32>(window.scale_factor());
        let camera = OrthographicCamera::new(logical.width, logical.height);

        self.opened += 1;
        self.windows.insert(
            window.id(),
            WindowRuntime {
                window: window.clone(),
                surface,
                surface_config,
                renderer,
                camera,
                created_at: Instant::now(),
                occluded: false,
                context: None,
            },
        );

        debug!("opened window {:?}", window.id());
        window.request_redraw();

        Ok(())
    }

    fn close_window(&mut self, event_loop: &ActiveEventLoop, id: WindowId) {
        let Some(runtime) = self.windows.remove(&id) else {
            return;
        };

        if let Some(context) = runtime.context {
            if let Some(registry_id) = context.id() {
                let _ =
                    self.events.send(RuntimeEvent::WindowClosed(registry_id));
            }
            context.close();
        }

        if self.windows.is_empty() {
            info!("last window closed");
            event_loop.exit();
        }
    }

    fn close_all(&mut self, event_loop: &ActiveEventLoop) {
        let ids = self.windows.keys().copied().collect::<Vec<_>>();
        for id in ids {
            self.close_window(event_loop, id);
        }
        event_loop.exit();
    }

    fn apply(&mut self, event_loop: &ActiveEventLoop, command: RuntimeCommand) {
        debug!("runtime command: {:?}", command);

        match command {
            RuntimeCommand::AdvanceSingleFrame => {
                self.frame_clock.advance_single_frame();
            }
            RuntimeCommand::OpenWindow => {
                if let Err(err) = self.open_window(event_loop) {
                    error!("failed to open window: {}", err);
                }
            }
            RuntimeCommand::Pause(paused) => {
                if paused {
                    info!(
                        "paused at frame {} ({:.1} of {} fps)",
                        self.frame_clock.frame_count(),
                        self.frame_clock.average_fps(),
                        self.frame_clock.fps()
                    );
                } else {
                    info!("resumed");
                }
                self.frame_clock.set_paused(paused);
            }
            RuntimeCommand::Quit => {
                self.frame_clock.stop();
                self.close_all(event_loop);
            }
        }
    }

    fn drain_commands(&mut self, event_loop: &ActiveEventLoop) {
        let mut commands = std::mem::take(&mut self.pending);

        while let Ok(command) = self.commands.try_recv() {
            commands.push(command);
        }

        for command in commands {
            self.apply(event_loop, command);
        }
    }

    fn on_key(
        &mut self,
        event_loop: &ActiveEventLoop,
        id: WindowId,
        event: &KeyEvent,
    ) {
        if event.state != ElementState::Pressed || event.repeat {
            return;
        }

        let command = match &event.logical_key {
            Key::Named(NamedKey::Space) => {
                RuntimeCommand::Pause(!self.frame_clock.paused())
            }
            Key::Named(NamedKey::Escape) => {
                self.close_window(event_loop, id);
                return;
            }
            Key::Character(c) => match c.as_str() {
                "." => RuntimeCommand::AdvanceSingleFrame,
                "n" | "N" => RuntimeCommand::OpenWindow,
                "q" | "Q" => RuntimeCommand::Quit,
                _ => return,
            },
            _ => return,
        };

        self.pending.push(command);
    }

    fn resize(&mut self, id: WindowId, new_size: PhysicalSize<u32>) {
        if new_size.width == 0 || new_size.height == 0 {
            return;
        }
        let Some(gpu) = self.gpu.as_ref() else {
            return;
        };
        let Some(runtime) = self.windows.get_mut(&id) else {
            return;
        };

        runtime.surface_config.width = new_size.width;
        runtime.surface_config.height = new_size.height;
        runtime
            .surface
            .configure(gpu.device.as_ref(), &runtime.surface_config);

        let scale = runtime.window.scale_factor();
        let logical = new_size.to_logical::<f32>(scale);
        runtime.camera.resize(logical.width, logical.height);
    }

    fn render(&mut self, event_loop: &ActiveEventLoop, id: WindowId) {
        let Some(gpu) = self.gpu.as_ref() else {
            return;
        };
        let Some(runtime) = self.windows.get_mut(&id) else {
            return;
        };

        let now = Instant::now();

        if runtime.context.is_none() {
            let delay = self.options.config.init_delay();
            if runtime.occluded
                || now.saturating_duration_since(runtime.created_at) < delay
            {
                return;
            }

            let shape = window_shape(&runtime.window)
                .unwrap_or_else(|| size_only_shape(&runtime.window));

            match Context::start(
                self.registry.clone(),
                self.options.config.clone(),
                shape,
                self.options.metadata.clone(),
            ) {
                Ok(context) => {
                    if let Some(registry_id) = context.id() {
                        let _ = self
                            .events
                            .send(RuntimeEvent::WindowOpened(registry_id));
                    }
                    runtime.context = Some(context);
                }
                Err(err) => {
                    error!("failed to start window: {}", err);
                    event_loop.exit();
                    return;
                }
            }
        }

        let Some(context) = runtime.context.as_mut() else {
            return;
        };

        let update = context.frame(window_shape(&runtime.window), now);

        if update.windows_changed {
            if let Some(registry_id) = context.id() {
                let _ = self.events.send(RuntimeEvent::WindowsChanged {
                    window: registry_id,
                    count: context.manager().windows().len(),
                });
            }
        }

        let vertices = scene_vertices(context.scene(), &self.mesh);

        let output = match runtime.surface.get_current_texture() {
            Ok(output) => output,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                runtime
                    .surface
                    .configure(gpu.device.as_ref(), &runtime.surface_config);
                return;
            }
            Err(wgpu::SurfaceError::Timeout) => {
                warn!("surface timeout while acquiring frame");
                return;
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                error!("surface out of memory; exiting");
                event_loop.exit();
                return;
            }
            Err(wgpu::SurfaceError::Other) => {
                warn!("surface error while acquiring frame");
                return;
            }
        };

        let mut frame =
            Frame::new(gpu.device.as_ref(), gpu.queue.clone(), output);

        runtime.renderer.draw(
            gpu.device.as_ref(),
            gpu.queue.as_ref(),
            &mut frame,
            &runtime.camera,
            &vertices,
        );

        runtime.window.pre_present_notify();
        frame.submit();
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.started {
            return;
        }
        self.started = true;

        for _ in 0..self.options.windows.max(1) {
            if let Err(err) = self.open_window(event_loop) {
                error!("failed to open window: {}", err);
                event_loop.exit();
                return;
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        window_id: WindowId,
        event: WindowEvent,
    ) {
        if !self.windows.contains_key(&window_id) {
            return;
        }

        match event {
            WindowEvent::CloseRequested | WindowEvent::Destroyed => {
                self.close_window(event_loop, window_id);
            }
            WindowEvent::Resized(new_size) => self.resize(window_id, new_size),
            WindowEvent::Occluded(occluded) => {
                if let Some(runtime) = self.windows.get_mut(&window_id) {
                    runtime.occluded = occluded;
                }
            }
            WindowEvent::KeyboardInput { event, .. } => {
                self.on_key(event_loop, window_id, &event);
            }
            WindowEvent::RedrawRequested => self.render(event_loop, window_id),
            _ => {}
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        self.drain_commands(event_loop);

        if self.frame_clock.stopped() {
            return;
        }

        let tick = self.frame_clock.tick(Instant::now());
        if tick.should_render {
            let frame = self.frame_clock.frame_count();
            let _ = self.events.send(RuntimeEvent::FrameAdvanced(frame));

            for runtime in self.windows.values() {
                runtime.window.request_redraw();
            }
        }

        event_loop.set_control_flow(ControlFlow::WaitUntil(
            self.frame_clock.next_deadline(),
        ));
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        for (_, runtime) in self.windows.drain() {
            if let Some(context) = runtime.context {
                context.close();
            }
        }
        self.frame_clock.stop();
        let _ = self.events.send(RuntimeEvent::Stopped);
        info!("frame loop stopped");
    }
}

/// Content-area rectangle in logical screen pixels, `None` when the
/// platform will not report a window position.
fn window_shape(window: &Window) -> Option<WindowShape> {
    let scale = window.scale_factor();
    let position = window
        .inner_position()
        .or_else(|_| window.outer_position())
        .ok()?
        .to_logical::<f32>(scale);
    let size = window.inner_size().to_logical::<f32>(scale);

    Some(WindowShape::new(position.x, position.y, size.width, size.height))
}

fn size_only_shape(window: &Window) -> WindowShape {
    let size = window.inner_size().to_logical::<f32>(window.scale_factor());
    WindowShape::new(0.0, 0.0, size.width, size.height)
}
