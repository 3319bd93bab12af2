use std::rc::Rc;

use glam::{Vec3, Vec4};
use glutin::prelude::GlDisplay;

use crate::{
    error::ShaderError,
    geometry::{self, DrawMode, COLOR_DIMENSIONS, SPACE_DIMENSIONS, SQUARE_VERTICES},
    gl::{
        self,
        types::{GLint, GLsizei, GLsizeiptr, GLuint},
    },
    input::ClearColor,
    shader::{AttributeBinding, ShaderProgram, ShaderSource},
};

pub const POSITION_LOCATION: GLuint = 0;
pub const COLOR_LOCATION: GLuint = 1;

pub const SQUARE_ATTRIBUTES: [AttributeBinding; 2] = [
    AttributeBinding {
        location: POSITION_LOCATION,
        name: c"in_Position",
    },
    AttributeBinding {
        location: COLOR_LOCATION,
        name: c"in_Color",
    },
];

const POSITION_BINDING: GLuint = 0;
const COLOR_BINDING: GLuint = 1;

pub struct Renderer {
    program: ShaderProgram,
    vao: GLuint,
    vbos: [GLuint; 2],
    clear_color: ClearColor,
    draw_mode: DrawMode,
    gl: Rc<gl::Gl>,
}

impl Renderer {
    /// Needs the context behind `gl_display` to be current.
    pub fn new<D: GlDisplay>(
        gl_display: &D,
        sources: &[ShaderSource],
        draw_mode: DrawMode,
    ) -> Result<Self, ShaderError> {
        let gl = Rc::new(gl::load(gl_display));
        let program = ShaderProgram::link(gl.clone(), sources, &SQUARE_ATTRIBUTES)?;

        unsafe {
            let mut vao = 0;
            gl.CreateVertexArrays(1, &mut vao);
            assert_ne!(vao, 0);

            let mut vbos = [0; 2];
            gl.CreateBuffers(vbos.len() as GLsizei, vbos.as_mut_ptr());
            assert!(vbos.iter().all(|&vbo| vbo != 0));
            let [position_vbo, color_vbo] = vbos;

            for (vbo, bytes) in [
                (position_vbo, geometry::position_bytes()),
                (color_vbo, geometry::color_bytes()),
            ] {
                gl.NamedBufferStorage(vbo, bytes.len() as GLsizeiptr, bytes.as_ptr().cast(), 0);
            }

            gl.VertexArrayVertexBuffer(
                vao,
                POSITION_BINDING,
                position_vbo,
                0,
                std::mem::size_of::<Vec3>() as GLsizei,
            );
            gl.EnableVertexArrayAttrib(vao, POSITION_LOCATION);
            gl.VertexArrayAttribFormat(
                vao,
                POSITION_LOCATION,
                SPACE_DIMENSIONS as GLint,
                gl::FLOAT,
                gl::FALSE,
                0,
            );
            gl.VertexArrayAttribBinding(vao, POSITION_LOCATION, POSITION_BINDING);

            gl.VertexArrayVertexBuffer(
                vao,
                COLOR_BINDING,
                color_vbo,
                0,
                std::mem::size_of::<Vec4>() as GLsizei,
            );
            gl.VertexArrayAttribFormat(
                vao,
                COLOR_LOCATION,
                COLOR_DIMENSIONS as GLint,
                gl::FLOAT,
                gl::FALSE,
                0,
            );
            gl.VertexArrayAttribBinding(vao, COLOR_LOCATION, COLOR_BINDING);
            gl.EnableVertexArrayAttrib(vao, COLOR_LOCATION);

            let mut renderer = Self {
                program,
                vao,
                vbos,
                clear_color: ClearColor::default(),
                draw_mode: DrawMode::Filled,
                gl,
            };
            if draw_mode != DrawMode::Filled {
                renderer.apply_draw_mode(draw_mode);
            }
            Ok(renderer)
        }
    }

    pub fn draw(&self) {
        let ClearColor { r, g, b, a } = self.clear_color;
        unsafe {
            self.program.use_program();
            self.gl.BindVertexArray(self.vao);

            self.gl.ClearColor(r, g, b, a);
            self.gl.Clear(gl::COLOR_BUFFER_BIT);
            self.gl.DrawArrays(
                self.draw_mode.primitive(),
                0,
                SQUARE_VERTICES as GLsizei,
            );
        }
    }

    pub fn clear_color(&self) -> ClearColor {
        self.clear_color
    }

    pub fn set_clear_color(&mut self, color: ClearColor) {
        self.clear_color = color;
    }

    pub fn draw_mode(&self) -> DrawMode {
        self.draw_mode
    }

    pub fn toggle_draw_mode(&mut self) {
        self.apply_draw_mode(self.draw_mode.toggled());
    }

    fn apply_draw_mode(&mut self, mode: DrawMode) {
        if mode == DrawMode::Outline && self.program.has_geometry_stage() {
            log::warn!("Outline mode needs line input, keeping filled mode with a geometry stage");
            return;
        }
        // Without the color array every vertex reads the default (0, 0, 0, 1).
        unsafe {
            match mode {
                DrawMode::Filled => self.gl.EnableVertexArrayAttrib(self.vao, COLOR_LOCATION),
                DrawMode::Outline => self.gl.DisableVertexArrayAttrib(self.vao, COLOR_LOCATION),
            }
        }
        log::debug!("Draw mode {:?}", mode);
        self.draw_mode = mode;
    }

    pub fn resize(&self, width: i32, height: i32) {
        unsafe {
            self.gl.Viewport(0, 0, width, height);
        }
    }
}

impl Drop for Renderer {
    fn drop(&mut self) {
        unsafe {
            self.gl.BindVertexArray(0);
            self.gl
                .DeleteBuffers(self.vbos.len() as GLsizei, self.vbos.as_ptr());
            self.gl.DeleteVertexArrays(1, &self.vao);
        }
    }
}
