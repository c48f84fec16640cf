//! Desktop backend: a winit window with a wgpu surface showing the canvas
//!
//! Events are pumped once per loop iteration instead of handing control to
//! winit, so the game loop keeps driving the frame order.

use std::sync::Arc;
use std::time::Duration;

use log::{debug, trace, warn};
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, MouseButton, WindowEvent};
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::keyboard::PhysicalKey;
use winit::platform::pump_events::{EventLoopExtPumpEvents, PumpStatus};
use winit::window::{Window, WindowId};

use super::Backend;
use crate::canvas::Canvas;
use crate::config::WindowConfig;
use crate::error::{EngineError, Result};
use crate::event::GameEvent;

/// How many pumps the platform gets to deliver `resumed` after startup
const STARTUP_PUMPS: usize = 16;

/// wgpu surface the canvas is copied into
struct Graphics {
    window: Arc<Window>,
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    /// Surface stores BGRA, canvas is RGBA
    swap_red_blue: bool,
    staging: Vec<u8>,
}

impl Graphics {
    async fn new(window: Arc<Window>) -> Result<Self> {
        let size = window.inner_size();

        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = instance
            .create_surface(window.clone())
            .map_err(|e| EngineError::RenderError(format!("Failed to create surface: {e}")))?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or_else(|| EngineError::RenderError("Failed to get adapter".to_string()))?;

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("Game Device"),
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::downlevel_defaults()
                        .using_resolution(adapter.limits()),
                    memory_hints: Default::default(),
                },
                None,
            )
            .await
            .map_err(|e| EngineError::RenderError(format!("Failed to create device: {e}")))?;

        let caps = surface.get_capabilities(&adapter);
        if !caps.usages.contains(wgpu::TextureUsages::COPY_DST) {
            return Err(EngineError::RenderError(
                "Surface does not accept texture uploads".to_string(),
            ));
        }
        let format = caps
            .formats
            .iter()
            .copied()
            .find(|format| {
                matches!(
                    format,
                    wgpu::TextureFormat::Rgba8UnormSrgb
                        | wgpu::TextureFormat::Bgra8UnormSrgb
                        | wgpu::TextureFormat::Rgba8Unorm
                        | wgpu::TextureFormat::Bgra8Unorm
                )
            })
            .ok_or_else(|| EngineError::RenderError("No 8-bit RGBA surface format".to_string()))?;

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::COPY_DST,
            format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);
        debug!("Surface configured: {}x{} {:?}", config.width, config.height, format);

        Ok(Self {
            window,
            surface,
            device,
            queue,
            config,
            swap_red_blue: matches!(
                format,
                wgpu::TextureFormat::Bgra8UnormSrgb | wgpu::TextureFormat::Bgra8Unorm
            ),
            staging: Vec::new(),
        })
    }

    fn resize(&mut self, size: PhysicalSize<u32>) {
        if size.width > 0 && size.height > 0 {
            self.config.width = size.width;
            self.config.height = size.height;
            self.surface.configure(&self.device, &self.config);
        }
    }

    fn present(&mut self, canvas: &Canvas) -> Result<()> {
        let width = (canvas.width() as u32).min(self.config.width);
        let height = (canvas.height() as u32).min(self.config.height);
        if width == 0 || height == 0 {
            return Ok(());
        }

        let frame = match self.surface.get_current_texture() {
            Ok(frame) => frame,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                self.surface.configure(&self.device, &self.config);
                return Ok(());
            }
            Err(wgpu::SurfaceError::Timeout) => {
                warn!("Surface timed out, dropping frame");
                return Ok(());
            }
            Err(e) => return Err(EngineError::RenderError(format!("Surface error: {e}"))),
        };

        let pixels: &[u8] = if self.swap_red_blue {
            self.staging.clear();
            self.staging.extend_from_slice(canvas.as_bytes());
            for pixel in self.staging.chunks_exact_mut(4) {
                pixel.swap(0, 2);
            }
            &self.staging
        } else {
            canvas.as_bytes()
        };

        self.queue.write_texture(
            wgpu::ImageCopyTexture {
                texture: &frame.texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            pixels,
            wgpu::ImageDataLayout {
                offset: 0,
                bytes_per_row: Some(4 * canvas.width() as u32),
                rows_per_image: Some(canvas.height() as u32),
            },
            wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
        );
        self.queue.submit(std::iter::empty());

        self.window.pre_present_notify();
        frame.present();
        Ok(())
    }
}

enum State {
    Pending,
    Ready(Graphics),
}

/// Collects window events between pumps
struct App {
    title: String,
    size: PhysicalSize<u32>,
    state: State,
    events: Vec<GameEvent>,
    error: Option<EngineError>,
}

impl App {
    fn new(config: &WindowConfig) -> Self {
        Self {
            title: config.title.clone(),
            size: PhysicalSize::new(config.width, config.height),
            state: State::Pending,
            events: Vec::new(),
            error: None,
        }
    }

    fn is_ready(&self) -> bool {
        matches!(self.state, State::Ready(_))
    }

    /// A surface is built on the first callback that finds none. `Resumed`
    /// only arrives once per event loop, so later runs rely on `about_to_wait`.
    fn needs_graphics(&self) -> bool {
        matches!(self.state, State::Pending) && self.error.is_none()
    }

    fn ensure_graphics(&mut self, event_loop: &ActiveEventLoop) {
        if !self.needs_graphics() {
            return;
        }
        match self.create_graphics(event_loop) {
            Ok(graphics) => self.state = State::Ready(graphics),
            Err(err) => self.error = Some(err),
        }
    }

    fn create_graphics(&self, event_loop: &ActiveEventLoop) -> Result<Graphics> {
        let attributes = Window::default_attributes()
            .with_title(self.title.as_str())
            .with_inner_size(self.size)
            .with_resizable(false);
        let window = Arc::new(event_loop.create_window(attributes)?);
        pollster::block_on(Graphics::new(window))
    }

    /// Show the window again for a new run
    fn reopen(&mut self, config: &WindowConfig) {
        self.title = config.title.clone();
        self.events.clear();
        if let State::Ready(graphics) = &self.state {
            graphics.window.set_title(&self.title);
            graphics.window.set_visible(true);
        }
    }

    /// Hide the window between runs. The surface is kept for the next one.
    fn hide(&mut self) {
        self.events.clear();
        if let State::Ready(graphics) = &self.state {
            graphics.window.set_visible(false);
        }
    }
}

fn mouse_button_index(button: MouseButton) -> u32 {
    match button {
        MouseButton::Left => 0,
        MouseButton::Right => 1,
        MouseButton::Middle => 2,
        MouseButton::Back => 3,
        MouseButton::Forward => 4,
        MouseButton::Other(n) => u32::from(n),
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        self.ensure_graphics(event_loop);
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        self.ensure_graphics(event_loop);
    }

    fn window_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => self.events.push(GameEvent::Quit),
            WindowEvent::Resized(size) => {
                if let State::Ready(graphics) = &mut self.state {
                    graphics.resize(size);
                }
                self.events.push(GameEvent::Resized {
                    width: size.width,
                    height: size.height,
                });
            }
            WindowEvent::Focused(focused) => self.events.push(GameEvent::Focused(focused)),
            WindowEvent::KeyboardInput { event, .. } => {
                if let PhysicalKey::Code(code) = event.physical_key {
                    match event.state {
                        ElementState::Pressed if !event.repeat => {
                            self.events.push(GameEvent::KeyDown(code))
                        }
                        ElementState::Released => self.events.push(GameEvent::KeyUp(code)),
                        _ => {}
                    }
                }
            }
            WindowEvent::CursorMoved { position, .. } => self.events.push(GameEvent::MouseMotion {
                x: position.x,
                y: position.y,
            }),
            WindowEvent::MouseInput { state, button, .. } => {
                let index = mouse_button_index(button);
                self.events.push(match state {
                    ElementState::Pressed => GameEvent::MouseButtonDown(index),
                    ElementState::Released => GameEvent::MouseButtonUp(index),
                });
            }
            _ => {}
        }
    }
}

/// Real window. The winit event loop and the window are created on the first
/// `init` and reused across runs, since a process may only build one loop.
/// Between runs the window is hidden.
#[derive(Default)]
pub struct WindowBackend {
    event_loop: Option<EventLoop<()>>,
    app: Option<App>,
}

impl WindowBackend {
    pub fn new() -> Self {
        Self::default()
    }

    fn pump(&mut self) -> Result<()> {
        let (Some(event_loop), Some(app)) = (self.event_loop.as_mut(), self.app.as_mut()) else {
            return Err(EngineError::WindowError(
                "Window backend used before init".to_string(),
            ));
        };

        if let PumpStatus::Exit(code) = event_loop.pump_app_events(Some(Duration::ZERO), app) {
            debug!("Event loop exited with code {code}");
            app.events.push(GameEvent::Quit);
        }
        match app.error.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

impl Backend for WindowBackend {
    fn init(&mut self, config: &WindowConfig) -> Result<()> {
        if self.event_loop.is_none() {
            trace!("Creating event loop");
            self.event_loop = Some(EventLoop::new()?);
        }
        match self.app.as_mut() {
            Some(app) => app.reopen(config),
            None => self.app = Some(App::new(config)),
        }

        for _ in 0..STARTUP_PUMPS {
            self.pump()?;
            if self.app.as_ref().is_some_and(App::is_ready) {
                debug!("Window opened: {}x{}", config.width, config.height);
                return Ok(());
            }
        }
        Err(EngineError::WindowError(
            "Window was not created by the platform".to_string(),
        ))
    }

    fn poll_events(&mut self) -> Result<Vec<GameEvent>> {
        self.pump()?;
        Ok(self
            .app
            .as_mut()
            .map(|app| std::mem::take(&mut app.events))
            .unwrap_or_default())
    }

    fn present(&mut self, canvas: &Canvas) -> Result<()> {
        match self.app.as_mut().map(|app| &mut app.state) {
            Some(State::Ready(graphics)) => graphics.present(canvas),
            _ => Err(EngineError::WindowError(
                "No window to present to".to_string(),
            )),
        }
    }

    fn shutdown(&mut self) -> Result<()> {
        if let Some(app) = self.app.as_mut() {
            app.hide();
            debug!("Window hidden");
        }
        Ok(())
    }
}
