pub mod config;
pub mod error;
pub mod geometry;
pub mod gl;
pub mod input;
pub mod renderer;
pub mod shader;
pub mod window;

pub const PROGRAM_NAME: &str = "trive";
pub const PROGRAM_VERSION: &str = env!("CARGO_PKG_VERSION");
