//! Core application state and lifecycle.

use kurbo::{Point, Size};
use shapeboard_core::input::{KeyEvent, PointerEvent};
use shapeboard_core::selection::CursorKind;
use shapeboard_core::{
    FileStore, Interaction, RemoteStore, ShapeStore, StorageError, SyncAdapter, SyncConfig,
};
use shapeboard_render::{FrameKey, RedrawTracker, RenderContext, Renderer, VelloRenderer};
use std::cell::Cell;
use std::rc::Rc;
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;
use vello::util::RenderSurface;
use vello::wgpu::PresentMode;
use vello::{AaConfig, RenderParams, RendererOptions};
use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::{ElementState, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

use crate::config::AppConfig;
use crate::event_handler::{EventHandler, cursor_icon};
use crate::shortcuts::ShortcutRegistry;

/// Fatal application errors.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Event loop error: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),
    #[error("Failed to create window: {0}")]
    Window(#[from] winit::error::OsError),
    #[error("Failed to create surface: {0}")]
    Surface(String),
    #[error("Failed to create renderer: {0}")]
    Renderer(String),
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

/// Editor state independent of the window and GPU.
pub struct Editor<S: RemoteStore = FileStore> {
    store: ShapeStore,
    interaction: Interaction,
    sync: SyncAdapter<S>,
    events: EventHandler,
    /// Set by the store observer on every persisted change.
    dirty: Rc<Cell<bool>>,
}

impl Editor<FileStore> {
    /// Open the editor on the configured file store.
    pub fn open(config: &AppConfig) -> Result<Self, AppError> {
        let path = match &config.store_path {
            Some(path) => path.clone(),
            None => FileStore::default_path()?,
        };
        log::info!("Canvas stored at {}", path.display());
        let remote = FileStore::new(path)?;
        Ok(Self::with_remote(Arc::new(remote), config.sync))
    }
}

impl<S: RemoteStore> Editor<S> {
    /// Create the editor and run the initial load to completion.
    pub fn with_remote(remote: Arc<S>, config: SyncConfig) -> Self {
        let mut store = ShapeStore::new();
        let mut sync = SyncAdapter::with_config(remote, config);

        let outcome = pollster::block_on(sync.load(&mut store));
        log::debug!("Initial load: {:?}", outcome);

        // Subscribe after loading so the restored state isn't written back.
        let dirty = Rc::new(Cell::new(false));
        let flag = Rc::clone(&dirty);
        store.subscribe(move |event| {
            if event.is_persisted() {
                flag.set(true);
            }
        });

        Self {
            store,
            interaction: Interaction::new(),
            sync,
            events: EventHandler::new(),
            dirty,
        }
    }

    pub fn store(&self) -> &ShapeStore {
        &self.store
    }

    pub fn interaction(&self) -> &Interaction {
        &self.interaction
    }

    pub fn events_mut(&mut self) -> &mut EventHandler {
        &mut self.events
    }

    pub fn pointer(&mut self, event: PointerEvent) {
        self.interaction.handle_pointer(&mut self.store, &event);
    }

    pub fn key_down(&mut self, event: &KeyEvent) {
        self.interaction.key_down(&mut self.store, event);
    }

    pub fn key_up(&mut self, event: &KeyEvent) {
        self.interaction.key_up(event);
    }

    pub fn cursor(&self) -> CursorKind {
        self.interaction.cursor(&self.store)
    }

    pub fn frame_key(&self, viewport: Size) -> FrameKey {
        FrameKey::capture(&self.store, self.interaction.pending_shape(), viewport)
    }

    /// Schedule pending changes and write them once the debounce window has
    /// passed. Returns when the next write is due.
    pub fn tick(&mut self, now: Instant) -> Option<Instant> {
        if self.dirty.replace(false) {
            self.sync.note_change(now);
        }
        if let Err(e) = pollster::block_on(self.sync.flush_if_due(&self.store, now)) {
            log::error!("Failed to save canvas: {}", e);
        }
        self.sync.next_deadline()
    }

    /// Write any unsaved change immediately.
    pub fn flush_pending(&mut self) {
        if !self.dirty.replace(false) && !self.sync.has_pending_write() {
            return;
        }
        if let Err(e) = pollster::block_on(self.sync.flush(&self.store)) {
            log::error!("Failed to save canvas: {}", e);
        }
    }
}

/// Runtime state for the window and GPU.
struct AppState {
    // Windowing
    window: Arc<Window>,
    surface: RenderSurface<'static>,

    // Rendering
    vello_renderer: vello::Renderer,
    shape_renderer: VelloRenderer,
    /// Texture blitter for RGBA->surface format conversion
    texture_blitter: vello::wgpu::util::TextureBlitter,
    redraw: RedrawTracker,
    cursor: CursorKind,
    /// Zoom shown in the window title.
    zoom_percent: Option<i64>,
}

impl AppState {
    fn viewport(&self) -> Size {
        Size::new(
            self.surface.config.width as f64,
            self.surface.config.height as f64,
        )
    }
}

/// Main application struct.
pub struct App {
    config: AppConfig,
    editor: Editor,
    state: Option<AppState>,
    render_cx: Option<vello::util::RenderContext>,
    /// First fatal error raised inside the event loop.
    error: Option<AppError>,
}

impl App {
    /// Create the application and load the saved canvas.
    pub fn new(config: AppConfig) -> Result<Self, AppError> {
        let editor = Editor::open(&config)?;
        Ok(Self {
            config,
            editor,
            state: None,
            render_cx: None,
            error: None,
        })
    }

    /// Run the application until the window closes.
    pub fn run(config: AppConfig) -> Result<(), AppError> {
        let event_loop = EventLoop::new()?;
        let mut app = App::new(config)?;
        event_loop.run_app(&mut app)?;
        match app.error.take() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, error: AppError) {
        self.error.get_or_insert(error);
        event_loop.exit();
    }

    fn init(&mut self, event_loop: &ActiveEventLoop) -> Result<(), AppError> {
        log::info!("Creating window...");

        let window_attrs = Window::default_attributes()
            .with_title(&self.config.title)
            .with_inner_size(LogicalSize::new(self.config.width, self.config.height));
        let window = Arc::new(event_loop.create_window(window_attrs)?);

        let size = window.inner_size();
        let (width, height) = if size.width == 0 || size.height == 0 {
            (self.config.width, self.config.height)
        } else {
            (size.width, size.height)
        };

        let render_cx = self
            .render_cx
            .get_or_insert_with(vello::util::RenderContext::new);

        let surface = pollster::block_on(render_cx.create_surface(
            window.clone(),
            width,
            height,
            PresentMode::AutoVsync,
        ))
        .map_err(|e| AppError::Surface(e.to_string()))?;

        // SAFETY: the surface borrows the window, which AppState keeps alive
        // alongside it.
        let surface: RenderSurface<'static> = unsafe { std::mem::transmute(surface) };

        let device = &render_cx.devices[surface.dev_id].device;
        let vello_renderer = vello::Renderer::new(device, RendererOptions::default())
            .map_err(|e| AppError::Renderer(e.to_string()))?;

        // Vello renders to Rgba8Unorm; the surface may use another format.
        let texture_blitter =
            vello::wgpu::util::TextureBlitter::new(device, surface.config.format);

        log::info!(
            "Shapeboard initialized - {}x{}",
            surface.config.width,
            surface.config.height
        );
        ShortcutRegistry::log_all();

        self.state = Some(AppState {
            window: window.clone(),
            surface,
            vello_renderer,
            shape_renderer: VelloRenderer::new(),
            texture_blitter,
            redraw: RedrawTracker::new(),
            cursor: CursorKind::Default,
            zoom_percent: None,
        });

        window.request_redraw();
        Ok(())
    }

    fn render(&mut self) {
        let Some(state) = self.state.as_mut() else {
            return;
        };
        let Some(render_cx) = self.render_cx.as_ref() else {
            return;
        };

        let viewport = state.viewport();
        let key = self.editor.frame_key(viewport);
        let ctx = RenderContext::new(self.editor.store(), viewport)
            .with_pending(self.editor.interaction().pending_shape())
            .with_style(self.config.style);
        state.shape_renderer.build_scene(&ctx);
        let base_color = state.shape_renderer.background_color(&ctx);
        let scene = state.shape_renderer.take_scene();

        let device_handle = &render_cx.devices[state.surface.dev_id];
        let device = &device_handle.device;
        let queue = &device_handle.queue;

        let surface_texture = match state.surface.surface.get_current_texture() {
            Ok(t) => t,
            Err(e) => {
                log::warn!("Failed to get surface texture: {:?}", e);
                return;
            }
        };

        let width = state.surface.config.width;
        let height = state.surface.config.height;

        let params = RenderParams {
            base_color,
            width,
            height,
            antialiasing_method: AaConfig::Area,
        };

        // Vello's compute shaders need a StorageBinding target, which WebGPU
        // only allows for Rgba8Unorm. The result is blitted to the surface.
        let render_texture = device.create_texture(&vello::wgpu::TextureDescriptor {
            label: Some("vello render texture"),
            size: vello::wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: vello::wgpu::TextureDimension::D2,
            format: vello::wgpu::TextureFormat::Rgba8Unorm,
            usage: vello::wgpu::TextureUsages::STORAGE_BINDING
                | vello::wgpu::TextureUsages::COPY_SRC
                | vello::wgpu::TextureUsages::TEXTURE_BINDING,
            view_formats: &[],
        });

        let render_texture_view =
            render_texture.create_view(&vello::wgpu::TextureViewDescriptor::default());

        if let Err(e) = state.vello_renderer.render_to_texture(
            device,
            queue,
            &scene,
            &render_texture_view,
            &params,
        ) {
            log::error!("Failed to render: {:?}", e);
            return;
        }

        let surface_view = surface_texture
            .texture
            .create_view(&vello::wgpu::TextureViewDescriptor::default());

        let mut blit_encoder =
            device.create_command_encoder(&vello::wgpu::CommandEncoderDescriptor {
                label: Some("blit encoder"),
            });
        state.texture_blitter.copy(
            device,
            &mut blit_encoder,
            &render_texture_view,
            &surface_view,
        );
        queue.submit(std::iter::once(blit_encoder.finish()));

        surface_texture.present();
        state.redraw.mark_drawn(key);
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_some() {
            return;
        }
        if let Err(e) = self.init(event_loop) {
            self.fail(event_loop, e);
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        if self.state.is_none() {
            return;
        }

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }

            WindowEvent::Resized(size) => {
                if size.width == 0 || size.height == 0 {
                    return;
                }
                let (Some(state), Some(render_cx)) = (self.state.as_mut(), self.render_cx.as_ref())
                else {
                    return;
                };
                render_cx.resize_surface(&mut state.surface, size.width, size.height);
                state.redraw.invalidate();
                state.window.request_redraw();
            }

            WindowEvent::RedrawRequested => self.render(),

            WindowEvent::CursorMoved { position, .. } => {
                let event = self
                    .editor
                    .events_mut()
                    .cursor_moved(Point::new(position.x, position.y));
                self.editor.pointer(event);
            }

            WindowEvent::CursorLeft { .. } => self.editor.pointer(PointerEvent::Leave),

            WindowEvent::MouseInput { state, button, .. } => {
                if let Some(event) = self.editor.events_mut().mouse_input(state, button) {
                    self.editor.pointer(event);
                }
            }

            WindowEvent::MouseWheel { delta, .. } => {
                if let Some(event) = self.editor.events_mut().mouse_wheel(delta) {
                    self.editor.pointer(event);
                }
            }

            WindowEvent::ModifiersChanged(modifiers) => {
                self.editor.events_mut().modifiers_changed(modifiers.state());
            }

            WindowEvent::KeyboardInput { event, .. } => {
                let key = self
                    .editor
                    .events_mut()
                    .key_event(&event.logical_key, event.repeat);
                match event.state {
                    ElementState::Pressed => self.editor.key_down(&key),
                    ElementState::Released => self.editor.key_up(&key),
                }
            }

            _ => {}
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        let deadline = self.editor.tick(Instant::now());
        event_loop.set_control_flow(match deadline {
            Some(deadline) => ControlFlow::WaitUntil(deadline),
            None => ControlFlow::Wait,
        });

        let Some(state) = self.state.as_mut() else {
            return;
        };

        let cursor = self.editor.cursor();
        if cursor != state.cursor {
            state.window.set_cursor(cursor_icon(cursor));
            state.cursor = cursor;
        }

        let zoom_percent = self.editor.store().view().zoom_percent();
        if state.zoom_percent != Some(zoom_percent) {
            state
                .window
                .set_title(&format!("{} - {}%", self.config.title, zoom_percent));
            state.zoom_percent = Some(zoom_percent);
        }

        if state.redraw.needs_redraw(&self.editor.frame_key(state.viewport())) {
            state.window.request_redraw();
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        self.editor.flush_pending();
    }
}
