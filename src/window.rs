use std::num::NonZeroU32;

use anyhow::Context;
use glutin::{
    config::{Config, ConfigTemplateBuilder, GlConfig},
    context::{
        ContextApi, ContextAttributesBuilder, GlProfile, NotCurrentContext, PossiblyCurrentContext,
        Version,
    },
    display::GetGlDisplay,
    prelude::GlDisplay,
    surface::{GlSurface, Surface, SurfaceAttributesBuilder, SwapInterval, WindowSurface},
};
use glutin_winit::{DisplayBuilder, GlWindow};
use winit::{
    application::ApplicationHandler,
    dpi::{LogicalSize, PhysicalPosition, PhysicalSize},
    event::{ElementState, KeyEvent, WindowEvent},
    event_loop::{ActiveEventLoop, EventLoop},
    keyboard::PhysicalKey,
    raw_window_handle::HasWindowHandle,
    window::{Window, WindowAttributes, WindowId},
};

use crate::{
    config::Config as AppConfig,
    error::BringUpError,
    geometry::DrawMode,
    input::{action_for_key, Action},
    renderer::Renderer,
    shader::ShaderSource,
};

/// OpenGL major and minor version the context is created with.
pub const GL_VERSION: (u8, u8) = (4, 6);

// Fields drop in order, so GL objects go before the surface, context and window.
pub struct DemoWindow {
    pub renderer: Option<Renderer>,
    pub surface: Option<Surface<WindowSurface>>,
    pub context: Option<PossiblyCurrentContext>,
    window: Window,
    config: Config,
    exit_state: anyhow::Result<()>,
}

impl DemoWindow {
    pub fn new(event_loop: &EventLoop<()>, app_config: &AppConfig) -> anyhow::Result<Self> {
        let config_template_builder = ConfigTemplateBuilder::default().with_single_buffering(false);

        let config_picker = |configs: Box<dyn Iterator<Item = Config> + '_>| {
            configs
                .reduce(|acc, config| {
                    if config.num_samples() > acc.num_samples() {
                        config
                    } else {
                        acc
                    }
                })
                .expect("display offered no GL configs")
        };
        let window_attributes = WindowAttributes::default()
            .with_title(app_config.title.as_str())
            .with_inner_size(LogicalSize::new(app_config.width, app_config.height))
            .with_resizable(true);

        let (window, config) = DisplayBuilder::default()
            .with_window_attributes(Some(window_attributes))
            .build(event_loop, config_template_builder, config_picker)
            .map_err(|err| BringUpError::Display(err.to_string()))?;
        let window = window.ok_or(BringUpError::NoWindow)?;

        log::info!(
            "Created window {:?} with a config of {} samples",
            window.id(),
            config.num_samples()
        );
        center_on_monitor(&window);

        Ok(DemoWindow {
            renderer: None,
            surface: None,
            context: None,
            window,
            config,
            exit_state: Ok(()),
        })
    }

    pub fn run(mut self, event_loop: EventLoop<()>) -> anyhow::Result<()> {
        event_loop
            .run_app(&mut self)
            .context("event loop terminated abnormally")?;
        std::mem::replace(&mut self.exit_state, Ok(()))
    }

    pub fn create_context(&self) -> anyhow::Result<NotCurrentContext> {
        let window_handle = self.window.window_handle()?.as_raw();
        let context_attributes = ContextAttributesBuilder::new()
            .with_context_api(ContextApi::OpenGl(Some(Version::new(
                GL_VERSION.0,
                GL_VERSION.1,
            ))))
            .with_profile(GlProfile::Core)
            .build(Some(window_handle));
        let gl_display = self.config.display();
        unsafe {
            gl_display
                .create_context(&self.config, &context_attributes)
                .context("failed to create an OpenGL 4.6 core context")
        }
    }

    pub fn create_window_surface(&self) -> anyhow::Result<Surface<WindowSurface>> {
        let display = self.config.display();
        let surface_attributes_builder = SurfaceAttributesBuilder::new();
        let surface_attributes = self
            .window
            .build_surface_attributes(surface_attributes_builder)?;
        unsafe {
            display
                .create_window_surface(&self.config, &surface_attributes)
                .context("failed to create the window surface")
        }
    }

    /// Syncs buffer swaps with the monitor refresh. Not every platform
    /// allows it, which only costs tearing.
    pub fn enable_vsync(&self, surface: &Surface<WindowSurface>, context: &PossiblyCurrentContext) {
        let interval = SwapInterval::Wait(NonZeroU32::MIN);
        if let Err(err) = surface.set_swap_interval(context, interval) {
            log::warn!("Could not enable vsync: {err}");
        }
    }

    pub fn create_gl_renderer(
        &self,
        sources: &[ShaderSource],
        draw_mode: DrawMode,
    ) -> anyhow::Result<Renderer> {
        // Renderer can't be instantiated until context is current
        Renderer::new(&self.config.display(), sources, draw_mode)
            .context("failed to build the shader program")
    }

    fn handle_window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        event: WindowEvent,
    ) -> anyhow::Result<()> {
        match event {
            WindowEvent::CloseRequested => {
                log::info!("Close requested");
                event_loop.exit();
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key,
                        state,
                        repeat,
                        ..
                    },
                ..
            } => {
                if let Some(action) = key_action(physical_key, state, repeat) {
                    log::debug!("{physical_key:?} -> {action:?}");
                    self.apply(event_loop, action)?;
                }
            }
            WindowEvent::Resized(size) => {
                let Some((width, height)) = surface_extent(size) else {
                    return Ok(());
                };
                let surface = self.surface.as_ref().ok_or(BringUpError::NotReady("surface"))?;
                let context = self.context.as_ref().ok_or(BringUpError::NotReady("context"))?;
                surface.resize(context, width, height);
                self.renderer()?
                    .resize(size.width as i32, size.height as i32);
                self.window.request_redraw();
            }
            WindowEvent::RedrawRequested => {
                self.renderer()?.draw();
                let surface = self.surface.as_ref().ok_or(BringUpError::NotReady("surface"))?;
                let context = self.context.as_ref().ok_or(BringUpError::NotReady("context"))?;
                surface
                    .swap_buffers(context)
                    .context("failed to swap buffers")?;
            }
            _ => (),
        }
        Ok(())
    }

    fn apply(&mut self, event_loop: &ActiveEventLoop, action: Action) -> anyhow::Result<()> {
        match action {
            Action::Exit => event_loop.exit(),
            Action::SetClearColor(color) => {
                self.renderer_mut()?.set_clear_color(color);
                self.window.request_redraw();
            }
            Action::ToggleDrawMode => {
                self.renderer_mut()?.toggle_draw_mode();
                self.window.request_redraw();
            }
        }
        Ok(())
    }

    fn renderer(&self) -> Result<&Renderer, BringUpError> {
        self.renderer.as_ref().ok_or(BringUpError::NotReady("renderer"))
    }

    fn renderer_mut(&mut self) -> Result<&mut Renderer, BringUpError> {
        self.renderer.as_mut().ok_or(BringUpError::NotReady("renderer"))
    }
}

impl ApplicationHandler for DemoWindow {
    fn resumed(&mut self, _event_loop: &ActiveEventLoop) {
        self.window.request_redraw();
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        if let Err(err) = self.handle_window_event(event_loop, event) {
            log::error!("{err:#}");
            keep_first_error(&mut self.exit_state, err);
            event_loop.exit();
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        // The context is still current here; after this the GL calls in Drop
        // would hit a dead context.
        self.renderer.take();
        log::info!("Released GL resources");
    }
}

/// Only presses map to actions; releases and auto-repeat are dropped.
fn key_action(key: PhysicalKey, state: ElementState, repeat: bool) -> Option<Action> {
    match (key, state, repeat) {
        (PhysicalKey::Code(code), ElementState::Pressed, false) => action_for_key(code),
        _ => None,
    }
}

/// Minimising reports a zero extent, which a surface can't take.
fn surface_extent(size: PhysicalSize<u32>) -> Option<(NonZeroU32, NonZeroU32)> {
    Some((NonZeroU32::new(size.width)?, NonZeroU32::new(size.height)?))
}

// Errors raised after the first one, while the loop winds down, are only logged.
fn keep_first_error(state: &mut anyhow::Result<()>, err: anyhow::Error) {
    if state.is_ok() {
        *state = Err(err);
    }
}

fn center_on_monitor(window: &Window) {
    let Some(monitor) = window.current_monitor() else {
        log::debug!("No monitor to center the window on");
        return;
    };
    let origin = centered_origin(monitor.position(), monitor.size(), window.outer_size());
    window.set_outer_position(origin);
}

/// Top-left corner that puts `window` in the middle of a monitor. A window
/// larger than the monitor is pinned to the monitor's origin.
pub fn centered_origin(
    monitor_position: PhysicalPosition<i32>,
    monitor_size: PhysicalSize<u32>,
    window: PhysicalSize<u32>,
) -> PhysicalPosition<i32> {
    let offset = |monitor: u32, window: u32| (monitor.saturating_sub(window) / 2) as i32;
    PhysicalPosition::new(
        monitor_position.x + offset(monitor_size.width, window.width),
        monitor_position.y + offset(monitor_size.height, window.height),
    )
}
