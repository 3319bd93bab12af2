use winit::keyboard::KeyCode;

use crate::gl::types::GLfloat;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClearColor {
    pub r: GLfloat,
    pub g: GLfloat,
    pub b: GLfloat,
    pub a: GLfloat,
}

impl ClearColor {
    pub const BLACK: Self = Self::opaque(0.0, 0.0, 0.0);
    pub const GREY: Self = Self::opaque(0.5, 0.5, 0.5);
    pub const RED: Self = Self::opaque(1.0, 0.0, 0.0);
    pub const GREEN: Self = Self::opaque(0.0, 1.0, 0.0);
    pub const BLUE: Self = Self::opaque(0.0, 0.0, 1.0);

    pub const fn opaque(r: GLfloat, g: GLfloat, b: GLfloat) -> Self {
        Self { r, g, b, a: 1.0 }
    }
}

impl Default for ClearColor {
    fn default() -> Self {
        Self::GREY
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Action {
    Exit,
    SetClearColor(ClearColor),
    ToggleDrawMode,
}

pub fn action_for_key(key: KeyCode) -> Option<Action> {
    match key {
        KeyCode::Escape => Some(Action::Exit),
        KeyCode::KeyR => Some(Action::SetClearColor(ClearColor::RED)),
        KeyCode::KeyG => Some(Action::SetClearColor(ClearColor::GREEN)),
        KeyCode::KeyB => Some(Action::SetClearColor(ClearColor::BLUE)),
        KeyCode::Space => Some(Action::ToggleDrawMode),
        _ => None,
    }
}
