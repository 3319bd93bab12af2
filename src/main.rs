use anyhow::Context;
use clap::Parser;
use env_logger::Env;
use glutin::prelude::NotCurrentGlContext;
use trive::{config::Config, window::DemoWindow, PROGRAM_NAME, PROGRAM_VERSION};
use winit::event_loop::EventLoop;

fn main() -> anyhow::Result<()> {
    let config = Config::parse();
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    log::info!("{PROGRAM_NAME} {PROGRAM_VERSION}");

    let shaders = config.shader_sources()?;

    let event_loop = EventLoop::builder().build()?;

    let mut window = DemoWindow::new(&event_loop, &config)?;

    let context = window.create_context()?;
    let surface = window.create_window_surface()?;
    let current_context = context
        .make_current(&surface)
        .context("failed to make the GL context current")?;
    if config.vsync {
        window.enable_vsync(&surface, &current_context);
    }
    let renderer = window.create_gl_renderer(&shaders, config.draw_mode)?;

    window.surface = Some(surface);
    window.context = Some(current_context);
    window.renderer = Some(renderer);

    window.run(event_loop)
}
