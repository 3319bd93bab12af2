use std::ffi::{CStr, CString};

use glutin::prelude::GlDisplay;

pub use bindings::*;

mod bindings {
    #![allow(clippy::all)]
    include!(concat!(env!("OUT_DIR"), "/gl_bindings.rs"));
}

/// Loads the GL function pointers through `gl_display` and logs what the
/// driver reports about the context. The context must already be current.
pub fn load<D: GlDisplay>(gl_display: &D) -> Gl {
    let gl = Gl::load_with(|symbol| match CString::new(symbol) {
        Ok(symbol) => gl_display.get_proc_address(symbol.as_c_str()).cast(),
        Err(_) => std::ptr::null(),
    });

    if let Some(renderer) = get_gl_string(&gl, RENDERER) {
        log::info!("Running on {}", renderer.to_string_lossy());
    }
    if let Some(version) = get_gl_string(&gl, VERSION) {
        log::info!("OpenGL version {}", version.to_string_lossy());
    }
    if let Some(shaders_version) = get_gl_string(&gl, SHADING_LANGUAGE_VERSION) {
        log::info!("Shading language version {}", shaders_version.to_string_lossy());
    }

    let (major, minor) = context_version(&gl);
    log::info!("Context version {major}.{minor}");

    gl
}

pub fn get_gl_string(gl: &Gl, variant: types::GLenum) -> Option<&'static CStr> {
    unsafe {
        let s = gl.GetString(variant);
        (!s.is_null()).then(|| CStr::from_ptr(s.cast()))
    }
}

pub fn context_version(gl: &Gl) -> (types::GLint, types::GLint) {
    let (mut major, mut minor) = (0, 0);
    unsafe {
        gl.GetIntegerv(MAJOR_VERSION, &mut major);
        gl.GetIntegerv(MINOR_VERSION, &mut minor);
    }
    (major, minor)
}
