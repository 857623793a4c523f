use crate::device::GamepadGuid;
use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};
use ship_window::scancode::LogicalScancode;
use std::collections::{BTreeMap, HashMap, HashSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum GamepadButton {
    South,
    East,
    West,
    North,
    LeftShoulder,
    RightShoulder,
    Start,
    Back,
    Guide,
    LeftStick,
    RightStick,
    DPadUp,
    DPadDown,
    DPadLeft,
    DPadRight,
}

impl GamepadButton {
    pub const ALL: [GamepadButton; 15] = [
        Self::South,
        Self::East,
        Self::West,
        Self::North,
        Self::LeftShoulder,
        Self::RightShoulder,
        Self::Start,
        Self::Back,
        Self::Guide,
        Self::LeftStick,
        Self::RightStick,
        Self::DPadUp,
        Self::DPadDown,
        Self::DPadLeft,
        Self::DPadRight,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::South => "A",
            Self::East => "B",
            Self::West => "X",
            Self::North => "Y",
            Self::LeftShoulder => "LB",
            Self::RightShoulder => "RB",
            Self::Start => "Start",
            Self::Back => "Back",
            Self::Guide => "Guide",
            Self::LeftStick => "LS",
            Self::RightStick => "RS",
            Self::DPadUp => "D-Pad Up",
            Self::DPadDown => "D-Pad Down",
            Self::DPadLeft => "D-Pad Left",
            Self::DPadRight => "D-Pad Right",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum GamepadAxis {
    LeftX,
    LeftY,
    RightX,
    RightY,
    LeftTrigger,
    RightTrigger,
}

impl GamepadAxis {
    pub const ALL: [GamepadAxis; 6] = [
        Self::LeftX,
        Self::LeftY,
        Self::RightX,
        Self::RightY,
        Self::LeftTrigger,
        Self::RightTrigger,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::LeftX => "Left Stick X",
            Self::LeftY => "Left Stick Y",
            Self::RightX => "Right Stick X",
            Self::RightY => "Right Stick Y",
            Self::LeftTrigger => "LT",
            Self::RightTrigger => "RT",
        }
    }
}

/// Last known state of one gamepad.
#[derive(Debug, Clone, Default)]
pub struct GamepadSnapshot {
    buttons: HashSet<GamepadButton>,
    axes: HashMap<GamepadAxis, f32>,
    /// Angular velocity (pitch, yaw, roll), when the pad has a gyro.
    gyro: Vec3,
}

impl GamepadSnapshot {
    pub fn set_button(&mut self, button: GamepadButton, down: bool) {
        if down {
            self.buttons.insert(button);
        } else {
            self.buttons.remove(&button);
        }
    }

    pub fn is_pressed(&self, button: GamepadButton) -> bool {
        self.buttons.contains(&button)
    }

    /// Stored clamped to -1..=1. Y axes are positive up.
    pub fn set_axis(&mut self, axis: GamepadAxis, value: f32) {
        self.axes.insert(axis, value.clamp(-1.0, 1.0));
    }

    pub fn axis(&self, axis: GamepadAxis) -> f32 {
        self.axes.get(&axis).copied().unwrap_or(0.0)
    }

    pub fn set_gyro(&mut self, gyro: Vec3) {
        self.gyro = gyro;
    }

    pub fn gyro(&self) -> Vec3 {
        self.gyro
    }

    pub fn pressed_buttons(&self) -> impl Iterator<Item = GamepadButton> + '_ {
        GamepadButton::ALL.into_iter().filter(|b| self.buttons.contains(b))
    }
}

/// Raw input of every physical device, fed by the window callbacks and the
/// gamepad poller and read by the mappings.
#[derive(Debug, Clone, Default)]
pub struct RawInputState {
    keys: HashSet<LogicalScancode>,
    mouse_buttons: u32,
    mouse_delta: Vec2,
    gamepads: BTreeMap<GamepadGuid, GamepadSnapshot>,
}

impl RawInputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_key(&mut self, key: LogicalScancode, down: bool) {
        if down {
            self.keys.insert(key);
        } else {
            self.keys.remove(&key);
        }
    }

    pub fn is_key_down(&self, key: LogicalScancode) -> bool {
        self.keys.contains(&key)
    }

    /// Lowest held key, for binding capture.
    pub fn first_key_down(&self) -> Option<LogicalScancode> {
        self.keys.iter().min().copied()
    }

    pub fn release_all_keys(&mut self) {
        self.keys.clear();
    }

    /// Out of range buttons are ignored.
    pub fn set_mouse_button(&mut self, button: i32, down: bool) {
        if !(0..32).contains(&button) {
            return;
        }
        if down {
            self.mouse_buttons |= 1 << button;
        } else {
            self.mouse_buttons &= !(1 << button);
        }
    }

    pub fn is_mouse_button_down(&self, button: i32) -> bool {
        (0..32).contains(&button) && self.mouse_buttons & (1 << button) != 0
    }

    pub fn first_mouse_button_down(&self) -> Option<i32> {
        (self.mouse_buttons != 0).then(|| self.mouse_buttons.trailing_zeros() as i32)
    }

    /// Mouse motion of the current frame.
    pub fn set_mouse_delta(&mut self, delta: Vec2) {
        self.mouse_delta = delta;
    }

    pub fn mouse_delta(&self) -> Vec2 {
        self.mouse_delta
    }

    pub fn gamepad(&self, guid: GamepadGuid) -> Option<&GamepadSnapshot> {
        self.gamepads.get(&guid)
    }

    /// Snapshot for `guid`, created on first use.
    pub fn gamepad_mut(&mut self, guid: GamepadGuid) -> &mut GamepadSnapshot {
        self.gamepads.entry(guid).or_default()
    }

    pub fn remove_gamepad(&mut self, guid: GamepadGuid) {
        self.gamepads.remove(&guid);
    }

    /// Connected gamepads ordered by GUID.
    pub fn gamepads(&self) -> impl Iterator<Item = (GamepadGuid, &GamepadSnapshot)> {
        self.gamepads.iter().map(|(guid, pad)| (*guid, pad))
    }
}
