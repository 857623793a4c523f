//! Console pad sample produced by a [`crate::controller::Controller`].

use glam::Vec2;

pub const BTN_A: u16 = 0x8000;
pub const BTN_B: u16 = 0x4000;
pub const BTN_Z: u16 = 0x2000;
pub const BTN_START: u16 = 0x1000;
pub const BTN_DUP: u16 = 0x0800;
pub const BTN_DDOWN: u16 = 0x0400;
pub const BTN_DLEFT: u16 = 0x0200;
pub const BTN_DRIGHT: u16 = 0x0100;
pub const BTN_L: u16 = 0x0020;
pub const BTN_R: u16 = 0x0010;
pub const BTN_CUP: u16 = 0x0008;
pub const BTN_CDOWN: u16 = 0x0004;
pub const BTN_CLEFT: u16 = 0x0002;
pub const BTN_CRIGHT: u16 = 0x0001;

/// Full deflection of the console analog stick.
pub const MAX_STICK: f32 = 85.0;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PadState {
    pub button: u16,
    pub stick_x: i8,
    pub stick_y: i8,
    pub right_stick_x: i8,
    pub right_stick_y: i8,
    pub gyro: Vec2,
}

impl PadState {
    pub fn is_pressed(&self, bitmask: u16) -> bool {
        self.button & bitmask != 0
    }
}

/// Stick deflection from the four direction values (each 0..=1), limited to
/// the console's circular range.
pub fn stick_from_directions(left: f32, right: f32, up: f32, down: f32) -> (i8, i8) {
    let mut v = Vec2::new(right - left, up - down) * MAX_STICK;
    if v.length() > MAX_STICK {
        v = v.normalize() * MAX_STICK;
    }
    (v.x.round() as i8, v.y.round() as i8)
}
