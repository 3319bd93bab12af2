use std::path::PathBuf;

use clap::Parser;

use crate::{
    error::ShaderError,
    geometry::DrawMode,
    shader::{ShaderSource, ShaderStage},
};

/// Opens a window and draws a colored square with OpenGL.
///
/// Keys: R, G and B change the background, Space switches between a filled
/// square and its outline, Escape quits.
#[derive(Debug, Clone, Parser)]
#[command(name = crate::PROGRAM_NAME, version)]
pub struct Config {
    /// Window title.
    #[arg(long, default_value = "trive: OpenGL square")]
    pub title: String,

    /// Initial inner width of the window, in logical pixels.
    #[arg(long, default_value_t = 800, value_parser = clap::value_parser!(u32).range(1..))]
    pub width: u32,

    /// Initial inner height of the window, in logical pixels.
    #[arg(long, default_value_t = 600, value_parser = clap::value_parser!(u32).range(1..))]
    pub height: u32,

    /// Present frames as soon as they are drawn instead of waiting for vblank.
    #[arg(long = "no-vsync", action = clap::ArgAction::SetFalse)]
    pub vsync: bool,

    #[arg(long, default_value = concat!(env!("CARGO_MANIFEST_DIR"), "/shaders/square.vert"))]
    pub vertex_shader: PathBuf,

    #[arg(long, default_value = concat!(env!("CARGO_MANIFEST_DIR"), "/shaders/square.frag"))]
    pub fragment_shader: PathBuf,

    /// Optional geometry stage. It consumes triangles, so outline mode is
    /// unavailable while one is linked.
    #[arg(long)]
    pub geometry_shader: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = DrawMode::Filled)]
    pub draw_mode: DrawMode,
}

impl Config {
    /// Reads every configured shader stage from disk.
    pub fn shader_sources(&self) -> Result<Vec<ShaderSource>, ShaderError> {
        let mut sources = vec![
            ShaderSource::load(ShaderStage::Vertex, &self.vertex_shader)?,
            ShaderSource::load(ShaderStage::Fragment, &self.fragment_shader)?,
        ];
        if let Some(path) = &self.geometry_shader {
            sources.push(ShaderSource::load(ShaderStage::Geometry, path)?);
        }
        Ok(sources)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Config, clap::Error> {
        Config::try_parse_from(std::iter::once("trive").chain(args.iter().copied()))
    }

    #[test]
    fn defaults() {
        let config = parse(&[]).unwrap();
        assert_eq!(config.title, "trive: OpenGL square");
        assert_eq!((config.width, config.height), (800, 600));
        assert!(config.vsync);
        assert!(config.vertex_shader.ends_with("shaders/square.vert"));
        assert!(config.fragment_shader.ends_with("shaders/square.frag"));
        assert_eq!(config.geometry_shader, None);
        assert_eq!(config.draw_mode, DrawMode::Filled);
    }

    #[test]
    fn overrides() {
        let config = parse(&[
            "--title",
            "square",
            "--width",
            "320",
            "--height",
            "240",
            "--no-vsync",
            "--geometry-shader",
            "extra.geom",
            "--draw-mode",
            "outline",
        ])
        .unwrap();
        assert_eq!(config.title, "square");
        assert_eq!((config.width, config.height), (320, 240));
        assert!(!config.vsync);
        assert_eq!(config.geometry_shader, Some(PathBuf::from("extra.geom")));
        assert_eq!(config.draw_mode, DrawMode::Outline);
    }

    #[test]
    fn zero_sized_window_is_rejected() {
        assert!(parse(&["--width", "0"]).is_err());
        assert!(parse(&["--height", "0"]).is_err());
    }

    #[test]
    fn unknown_draw_mode_is_rejected() {
        assert!(parse(&["--draw-mode", "wireframe"]).is_err());
    }

    #[test]
    fn default_sources_load_vertex_then_fragment() {
        let sources = parse(&[]).unwrap().shader_sources().unwrap();
        let stages: Vec<_> = sources.iter().map(|s| s.stage()).collect();
        assert_eq!(stages, [ShaderStage::Vertex, ShaderStage::Fragment]);
    }

    #[test]
    fn shipped_geometry_stage_loads() {
        let geom = concat!(env!("CARGO_MANIFEST_DIR"), "/shaders/passthrough.geom");
        let sources = parse(&["--geometry-shader", geom])
            .unwrap()
            .shader_sources()
            .unwrap();
        assert_eq!(sources.len(), 3);
        assert_eq!(sources[2].stage(), ShaderStage::Geometry);
    }

    #[test]
    fn missing_shader_file_fails_loading() {
        let err = parse(&["--fragment-shader", "/nonexistent/trive.frag"])
            .unwrap()
            .shader_sources()
            .unwrap_err();
        assert!(matches!(err, ShaderError::Read { .. }));
    }
}
