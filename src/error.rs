use std::path::PathBuf;

use thiserror::Error;

use crate::shader::{ShaderStage, MAX_SHADER_LEN};

#[derive(Debug, Error)]
pub enum ShaderError {
    #[error("failed to read shader source {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("shader source {} is empty", path.display())]
    Empty { path: PathBuf },
    #[error("shader source {} is {len} bytes, the limit is {max}", path.display(), max = MAX_SHADER_LEN)]
    TooLong { path: PathBuf, len: usize },
    #[error("shader source {} contains a NUL byte", path.display())]
    InteriorNul { path: PathBuf },
    #[error("a shader program needs a {0} stage")]
    MissingStage(ShaderStage),
    #[error("more than one {0} stage was given")]
    DuplicateStage(ShaderStage),
    #[error("could not create a {0} shader object")]
    CreateShader(ShaderStage),
    #[error("could not create a shader program object")]
    CreateProgram,
    #[error("{stage} shader {} failed to compile:\n{log}", path.display())]
    Compile {
        stage: ShaderStage,
        path: PathBuf,
        log: String,
    },
    #[error("shader program failed to link:\n{log}")]
    Link { log: String },
}

#[derive(Debug, Error)]
pub enum BringUpError {
    #[error("failed to build the GL display: {0}")]
    Display(String),
    #[error("the display builder did not create a window")]
    NoWindow,
    #[error("{0} is not set up yet")]
    NotReady(&'static str),
}
