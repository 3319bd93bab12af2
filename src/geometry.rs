use glam::{vec3, vec4, Vec3, Vec4};

use crate::gl::{self, types::GLenum};

pub const SQUARE_VERTICES: usize = 4;
pub const SPACE_DIMENSIONS: usize = 3;
pub const COLOR_DIMENSIONS: usize = 4;

/// Corners in drawing order: top left, top right, bottom right, bottom left.
pub static SQUARE_POSITIONS: [Vec3; SQUARE_VERTICES] = [
    vec3(-0.5, 0.5, 0.5),
    vec3(0.5, 0.5, 0.5),
    vec3(0.5, -0.5, 0.5),
    vec3(-0.5, -0.5, 0.5),
];

pub static SQUARE_COLORS: [Vec4; SQUARE_VERTICES] = [
    vec4(0.0, 1.0, 0.0, 1.0),
    vec4(1.0, 1.0, 0.0, 1.0),
    vec4(1.0, 0.0, 0.0, 1.0),
    vec4(0.0, 0.0, 1.0, 1.0),
];

pub fn position_bytes() -> &'static [u8] {
    bytemuck::cast_slice(&SQUARE_POSITIONS)
}

pub fn color_bytes() -> &'static [u8] {
    bytemuck::cast_slice(&SQUARE_COLORS)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum DrawMode {
    /// Solid square, colored per vertex.
    #[default]
    Filled,
    /// Closed black outline with the color attribute switched off.
    Outline,
}

impl DrawMode {
    pub fn primitive(self) -> GLenum {
        match self {
            DrawMode::Filled => gl::TRIANGLE_FAN,
            DrawMode::Outline => gl::LINE_LOOP,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            DrawMode::Filled => DrawMode::Outline,
            DrawMode::Outline => DrawMode::Filled,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buffers_are_tightly_packed_floats() {
        let float = std::mem::size_of::<f32>();
        assert_eq!(position_bytes().len(), SQUARE_VERTICES * SPACE_DIMENSIONS * float);
        assert_eq!(color_bytes().len(), SQUARE_VERTICES * COLOR_DIMENSIONS * float);
        assert_eq!(std::mem::size_of::<Vec3>(), SPACE_DIMENSIONS * float);
        assert_eq!(std::mem::size_of::<Vec4>(), COLOR_DIMENSIONS * float);
    }

    #[test]
    fn corners_wind_around_the_square() {
        // Consecutive corners share exactly one coordinate so a fan or a loop
        // walks the edges without crossing the middle.
        for i in 0..SQUARE_VERTICES {
            let a = SQUARE_POSITIONS[i];
            let b = SQUARE_POSITIONS[(i + 1) % SQUARE_VERTICES];
            let shared = (a.x == b.x) as u8 + (a.y == b.y) as u8;
            assert_eq!(shared, 1, "corner {i} -> {}", (i + 1) % SQUARE_VERTICES);
            assert_eq!(a.z, 0.5);
        }
    }

    #[test]
    fn colors_are_opaque() {
        assert!(SQUARE_COLORS.iter().all(|c| c.w == 1.0));
        assert_eq!(SQUARE_COLORS[0], vec4(0.0, 1.0, 0.0, 1.0));
        assert_eq!(SQUARE_COLORS[3], vec4(0.0, 0.0, 1.0, 1.0));
    }

    #[test]
    fn draw_mode_toggles_and_picks_primitive() {
        assert_eq!(DrawMode::default(), DrawMode::Filled);
        assert_eq!(DrawMode::Filled.toggled(), DrawMode::Outline);
        assert_eq!(DrawMode::Outline.toggled(), DrawMode::Filled);
        assert_eq!(DrawMode::Filled.primitive(), gl::TRIANGLE_FAN);
        assert_eq!(DrawMode::Outline.primitive(), gl::LINE_LOOP);
    }
}
