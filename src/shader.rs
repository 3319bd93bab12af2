use std::{
    ffi::{CStr, CString},
    fmt, fs,
    path::{Path, PathBuf},
    rc::Rc,
};

use crate::{
    error::ShaderError,
    gl::{
        self,
        types::{GLenum, GLint, GLsizei, GLuint},
    },
};

/// Largest shader source accepted from disk, in bytes.
pub const MAX_SHADER_LEN: usize = 64 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShaderStage {
    Vertex,
    Fragment,
    Geometry,
}

impl ShaderStage {
    pub fn gl_enum(self) -> GLenum {
        match self {
            ShaderStage::Vertex => gl::VERTEX_SHADER,
            ShaderStage::Fragment => gl::FRAGMENT_SHADER,
            ShaderStage::Geometry => gl::GEOMETRY_SHADER,
        }
    }
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ShaderStage::Vertex => "vertex",
            ShaderStage::Fragment => "fragment",
            ShaderStage::Geometry => "geometry",
        })
    }
}

/// GLSL code for one stage, NUL terminated and ready to hand to the driver.
#[derive(Debug, Clone)]
pub struct ShaderSource {
    stage: ShaderStage,
    origin: PathBuf,
    code: CString,
}

impl ShaderSource {
    pub fn load(stage: ShaderStage, path: impl AsRef<Path>) -> Result<Self, ShaderError> {
        let path = path.as_ref();
        log::info!("Loading {stage} shader from {}", path.display());

        let bytes = fs::read(path).map_err(|source| ShaderError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_bytes(stage, path, bytes)
    }

    pub fn from_bytes(
        stage: ShaderStage,
        origin: impl Into<PathBuf>,
        bytes: Vec<u8>,
    ) -> Result<Self, ShaderError> {
        let origin = origin.into();
        if bytes.is_empty() {
            return Err(ShaderError::Empty { path: origin });
        }
        if bytes.len() > MAX_SHADER_LEN {
            return Err(ShaderError::TooLong {
                path: origin,
                len: bytes.len(),
            });
        }
        match CString::new(bytes) {
            Ok(code) => Ok(Self {
                stage,
                origin,
                code,
            }),
            Err(_) => Err(ShaderError::InteriorNul { path: origin }),
        }
    }

    pub fn stage(&self) -> ShaderStage {
        self.stage
    }

    pub fn origin(&self) -> &Path {
        &self.origin
    }

    pub fn code(&self) -> &CStr {
        &self.code
    }
}

/// Checks that `sources` form a complete pipeline: one vertex stage, one
/// fragment stage and at most one geometry stage.
pub fn check_stages(sources: &[ShaderSource]) -> Result<(), ShaderError> {
    for stage in [
        ShaderStage::Vertex,
        ShaderStage::Fragment,
        ShaderStage::Geometry,
    ] {
        match sources.iter().filter(|s| s.stage == stage).count() {
            0 if stage != ShaderStage::Geometry => return Err(ShaderError::MissingStage(stage)),
            0 | 1 => {}
            _ => return Err(ShaderError::DuplicateStage(stage)),
        }
    }
    Ok(())
}

/// A vertex attribute pinned to a location before the program is linked.
#[derive(Debug, Clone, Copy)]
pub struct AttributeBinding {
    pub location: GLuint,
    pub name: &'static CStr,
}

pub struct ShaderProgram {
    gl: Rc<gl::Gl>,
    id: GLuint,
    shaders: Vec<GLuint>,
    has_geometry: bool,
}

impl ShaderProgram {
    /// Compiles every source, attaches it and links the program. Whatever was
    /// created is released again if any step fails.
    pub fn link(
        gl: Rc<gl::Gl>,
        sources: &[ShaderSource],
        bindings: &[AttributeBinding],
    ) -> Result<Self, ShaderError> {
        check_stages(sources)?;

        let id = unsafe { gl.CreateProgram() };
        if id == 0 {
            return Err(ShaderError::CreateProgram);
        }
        let mut program = Self {
            gl,
            id,
            shaders: Vec::with_capacity(sources.len()),
            has_geometry: false,
        };

        // Attribute locations only take effect on the next link.
        for binding in bindings {
            unsafe {
                program
                    .gl
                    .BindAttribLocation(program.id, binding.location, binding.name.as_ptr());
            }
        }

        for source in sources {
            let shader = program.compile(source)?;
            unsafe { program.gl.AttachShader(program.id, shader) };
            program.shaders.push(shader);
            program.has_geometry |= source.stage == ShaderStage::Geometry;
        }

        unsafe {
            program.gl.LinkProgram(program.id);

            let mut linked = 0;
            program.gl.GetProgramiv(program.id, gl::LINK_STATUS, &mut linked);
            if linked == gl::FALSE as GLint {
                let log = program_info_log(&program.gl, program.id);
                return Err(ShaderError::Link { log });
            }
        }

        log::info!("Linked shader program {} from {} stages", program.id, sources.len());
        Ok(program)
    }

    fn compile(&self, source: &ShaderSource) -> Result<GLuint, ShaderError> {
        unsafe {
            let shader = self.gl.CreateShader(source.stage.gl_enum());
            if shader == 0 {
                return Err(ShaderError::CreateShader(source.stage));
            }

            let len = source.code.as_bytes().len() as GLint;
            self.gl
                .ShaderSource(shader, 1, &source.code.as_ptr(), &len);
            self.gl.CompileShader(shader);

            let mut compiled = 0;
            self.gl
                .GetShaderiv(shader, gl::COMPILE_STATUS, &mut compiled);
            if compiled == gl::FALSE as GLint {
                let log = shader_info_log(&self.gl, shader);
                self.gl.DeleteShader(shader);
                return Err(ShaderError::Compile {
                    stage: source.stage,
                    path: source.origin.clone(),
                    log,
                });
            }

            log::debug!("Compiled {} shader {}", source.stage, source.origin.display());
            Ok(shader)
        }
    }

    pub fn use_program(&self) {
        unsafe { self.gl.UseProgram(self.id) }
    }

    pub fn has_geometry_stage(&self) -> bool {
        self.has_geometry
    }
}

impl Drop for ShaderProgram {
    fn drop(&mut self) {
        unsafe {
            self.gl.UseProgram(0);
            for &shader in &self.shaders {
                self.gl.DetachShader(self.id, shader);
                self.gl.DeleteShader(shader);
            }
            self.gl.DeleteProgram(self.id);
        }
    }
}

unsafe fn shader_info_log(gl: &gl::Gl, shader: GLuint) -> String {
    let mut len = 0;
    gl.GetShaderiv(shader, gl::INFO_LOG_LENGTH, &mut len);

    let mut buf = vec![0u8; len.max(1) as usize];
    let mut written: GLsizei = 0;
    gl.GetShaderInfoLog(shader, buf.len() as GLsizei, &mut written, buf.as_mut_ptr().cast());
    buf.truncate(written.max(0) as usize);
    info_log_text(&buf)
}

unsafe fn program_info_log(gl: &gl::Gl, program: GLuint) -> String {
    let mut len = 0;
    gl.GetProgramiv(program, gl::INFO_LOG_LENGTH, &mut len);

    let mut buf = vec![0u8; len.max(1) as usize];
    let mut written: GLsizei = 0;
    gl.GetProgramInfoLog(program, buf.len() as GLsizei, &mut written, buf.as_mut_ptr().cast());
    buf.truncate(written.max(0) as usize);
    info_log_text(&buf)
}

fn info_log_text(bytes: &[u8]) -> String {
    let text = String::from_utf8_lossy(bytes);
    let text = text.trim_end_matches(|c: char| c == '\0' || c.is_whitespace());
    if text.is_empty() {
        "(no info log)".to_owned()
    } else {
        text.to_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn source(stage: ShaderStage) -> ShaderSource {
        ShaderSource::from_bytes(stage, format!("{stage}.glsl"), b"void main() {}".to_vec())
            .unwrap()
    }


    #[test]
    fn loads_shipped_shaders() {
        let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("shaders");
        let vertex = ShaderSource::load(ShaderStage::Vertex, dir.join("square.vert")).unwrap();
        let fragment =
            ShaderSource::load(ShaderStage::Fragment, dir.join("square.frag")).unwrap();

        assert!(vertex.code().to_str().unwrap().contains("in_Position"));
        assert!(vertex.code().to_str().unwrap().contains("in_Color"));
        assert_eq!(fragment.stage(), ShaderStage::Fragment);
        assert!(check_stages(&[vertex, fragment]).is_ok());
    }

    #[test]
    fn load_reads_file_contents() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("load.vert");
        fs::write(&path, b"#version 460 core\nvoid main() {}\n").unwrap();
        let loaded = ShaderSource::load(ShaderStage::Vertex, &path).unwrap();
        assert_eq!(loaded.origin(), path.as_path());
        assert_eq!(
            loaded.code().to_bytes(),
            b"#version 460 core\nvoid main() {}\n"
        );
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing.frag");
        let err = ShaderSource::load(ShaderStage::Fragment, &path).unwrap_err();
        assert!(matches!(err, ShaderError::Read { path: p, .. } if p == path));
    }

    #[test]
    fn empty_file_is_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("empty.frag");
        fs::write(&path, b"").unwrap();
        let err = ShaderSource::load(ShaderStage::Fragment, &path).unwrap_err();
        assert!(matches!(err, ShaderError::Empty { path: p } if p == path));
    }

    #[test]
    fn oversized_source_is_rejected() {
        let err = ShaderSource::from_bytes(
            ShaderStage::Vertex,
            "big.vert",
            vec![b' '; MAX_SHADER_LEN + 1],
        )
        .unwrap_err();
        assert!(matches!(err, ShaderError::TooLong { len, .. } if len == MAX_SHADER_LEN + 1));

        assert!(
            ShaderSource::from_bytes(ShaderStage::Vertex, "max.vert", vec![b' '; MAX_SHADER_LEN])
                .is_ok()
        );
    }

    #[test]
    fn interior_nul_is_rejected() {
        let err = ShaderSource::from_bytes(ShaderStage::Vertex, "nul.vert", b"void\0main".to_vec())
            .unwrap_err();
        assert!(matches!(err, ShaderError::InteriorNul { .. }));
    }

    #[test]
    fn stage_check_requires_vertex_and_fragment() {
        let err = check_stages(&[source(ShaderStage::Fragment)]).unwrap_err();
        assert!(matches!(err, ShaderError::MissingStage(ShaderStage::Vertex)));

        let err = check_stages(&[source(ShaderStage::Vertex)]).unwrap_err();
        assert!(matches!(err, ShaderError::MissingStage(ShaderStage::Fragment)));
    }

    #[test]
    fn stage_check_allows_one_geometry_stage() {
        let mut sources = vec![
            source(ShaderStage::Vertex),
            source(ShaderStage::Fragment),
            source(ShaderStage::Geometry),
        ];
        assert!(check_stages(&sources).is_ok());

        sources.push(source(ShaderStage::Geometry));
        let err = check_stages(&sources).unwrap_err();
        assert!(matches!(err, ShaderError::DuplicateStage(ShaderStage::Geometry)));
    }

    #[test]
    fn stage_check_rejects_duplicate_vertex() {
        let sources = [
            source(ShaderStage::Vertex),
            source(ShaderStage::Vertex),
            source(ShaderStage::Fragment),
        ];
        let err = check_stages(&sources).unwrap_err();
        assert!(matches!(err, ShaderError::DuplicateStage(ShaderStage::Vertex)));
    }

    #[test]
    fn stage_maps_to_gl_enum() {
        assert_eq!(ShaderStage::Vertex.gl_enum(), gl::VERTEX_SHADER);
        assert_eq!(ShaderStage::Fragment.gl_enum(), gl::FRAGMENT_SHADER);
        assert_eq!(ShaderStage::Geometry.gl_enum(), gl::GEOMETRY_SHADER);
    }

    #[test]
    fn info_log_trims_terminator_and_newlines() {
        assert_eq!(
            info_log_text(b"0:1(10): error: unexpected token\n\0"),
            "0:1(10): error: unexpected token"
        );
        assert_eq!(info_log_text(b"\0"), "(no info log)");
        assert_eq!(info_log_text(b""), "(no info log)");
    }
}
