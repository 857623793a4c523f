use crate::config::{self, ConfigStore};

pub const DEFAULT_WIDTH: u32 = 640;
pub const DEFAULT_HEIGHT: u32 = 480;
pub const DEFAULT_POSITION: i32 = 100;

/// Size, position and fullscreen state of the main window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowGeometry {
    pub width: u32,
    pub height: u32,
    pub pos_x: i32,
    pub pos_y: i32,
    pub fullscreen: bool,
    /// Exclusive (mode switching) rather than windowed fullscreen.
    pub exclusive: bool,
}

impl Default for WindowGeometry {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            pos_x: DEFAULT_POSITION,
            pos_y: DEFAULT_POSITION,
            fullscreen: false,
            exclusive: false,
        }
    }
}

impl WindowGeometry {
    /// Last saved windowed geometry. Missing keys, zero sizes and values out
    /// of range of the field fall back to the defaults.
    pub fn from_config(cfg: &dyn ConfigStore) -> Self {
        let size = |key: &str, default: u32| {
            u32::try_from(cfg.get_int(key, default as i64))
                .ok()
                .filter(|v| *v > 0)
                .unwrap_or(default)
        };
        let position =
            |key: &str| i32::try_from(cfg.get_int(key, DEFAULT_POSITION as i64)).unwrap_or(DEFAULT_POSITION);
        Self {
            width: size(config::WINDOW_WIDTH, DEFAULT_WIDTH),
            height: size(config::WINDOW_HEIGHT, DEFAULT_HEIGHT),
            pos_x: position(config::WINDOW_POSITION_X),
            pos_y: position(config::WINDOW_POSITION_Y),
            fullscreen: false,
            exclusive: cfg.get_int(config::WINDOWED_FULLSCREEN, 0) == 0,
        }
    }

    pub fn write_to_config(&self, cfg: &mut dyn ConfigStore) {
        cfg.set_int(config::WINDOW_WIDTH, self.width as i64);
        cfg.set_int(config::WINDOW_HEIGHT, self.height as i64);
        cfg.set_int(config::WINDOW_POSITION_X, self.pos_x as i64);
        cfg.set_int(config::WINDOW_POSITION_Y, self.pos_y as i64);
    }
}

/// Drawable size (backend pixels) and window position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WindowDimensions {
    pub width: u32,
    pub height: u32,
    pub pos_x: i32,
    pub pos_y: i32,
}

/// Video mode of a display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayMode {
    pub width: u32,
    pub height: u32,
    /// Zero when the platform does not report it.
    pub refresh_rate_hz: u32,
}
