use super::{clamp_percent, key_name, ControllerInputMapping, MappingIdentity, BUTTON_MAPPINGS};
use crate::device::{GamepadGuid, PhysicalDeviceType};
use crate::raw::{GamepadAxis, GamepadButton, RawInputState};
use serde::{Deserialize, Serialize};
use ship_window::config::SharedConfig;
use ship_window::scancode::LogicalScancode;

pub const AXIS_THRESHOLD_DEFAULT: u8 = 50;

/// Binding of one console button (`bitmask`) to a digital input.
pub trait ButtonMapping: ControllerInputMapping {
    fn bitmask(&self) -> u16;
    fn is_pressed(&self, raw: &RawInputState) -> bool;
}

/// Half of a gamepad axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AxisDirection {
    Negative,
    Positive,
}

impl AxisDirection {
    pub fn sign(self) -> f32 {
        match self {
            Self::Negative => -1.0,
            Self::Positive => 1.0,
        }
    }

    pub fn of(value: f32) -> Self {
        if value < 0.0 {
            Self::Negative
        } else {
            Self::Positive
        }
    }

    pub fn symbol(self) -> char {
        match self {
            Self::Negative => '-',
            Self::Positive => '+',
        }
    }
}

/// Persisted form of every button mapping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "Type")]
pub enum ButtonRecord {
    #[serde(rename = "KeyboardButtonMapping", rename_all = "PascalCase")]
    Keyboard { bitmask: u16, keyboard_scancode: LogicalScancode },
    #[serde(rename = "MouseButtonMapping", rename_all = "PascalCase")]
    Mouse { bitmask: u16, mouse_button: i32 },
    #[serde(rename = "GamepadButtonMapping", rename_all = "PascalCase")]
    GamepadButton {
        bitmask: u16,
        gamepad_guid: GamepadGuid,
        gamepad_button: GamepadButton,
    },
    #[serde(rename = "GamepadAxisButtonMapping", rename_all = "PascalCase")]
    GamepadAxis {
        bitmask: u16,
        gamepad_guid: GamepadGuid,
        gamepad_axis: GamepadAxis,
        axis_direction: AxisDirection,
        axis_threshold_percentage: u8,
    },
}

pub struct KeyboardButtonMapping {
    identity: MappingIdentity,
    bitmask: u16,
    key: LogicalScancode,
}

impl KeyboardButtonMapping {
    pub fn new(config: SharedConfig, port: u8, bitmask: u16, key: LogicalScancode) -> Self {
        let id = format!("P{}-B{}-KB{}", port, bitmask, key);
        Self::with_id(MappingIdentity::new(id, PhysicalDeviceType::Keyboard, port, config), bitmask, key)
    }

    pub fn with_id(identity: MappingIdentity, bitmask: u16, key: LogicalScancode) -> Self {
        Self { identity, bitmask, key }
    }

    pub fn key(&self) -> LogicalScancode {
        self.key
    }
}

impl ControllerInputMapping for KeyboardButtonMapping {
    fn identity(&self) -> &MappingIdentity {
        &self.identity
    }

    fn identity_mut(&mut self) -> &mut MappingIdentity {
        &mut self.identity
    }

    fn physical_input_name(&self) -> String {
        key_name(self.key).to_string()
    }

    fn save_to_config(&self) {
        let record = ButtonRecord::Keyboard { bitmask: self.bitmask, keyboard_scancode: self.key };
        self.identity.store(BUTTON_MAPPINGS, &record);
    }

    fn erase_from_config(&self) {
        self.identity.erase(BUTTON_MAPPINGS);
    }
}

impl ButtonMapping for KeyboardButtonMapping {
    fn bitmask(&self) -> u16 {
        self.bitmask
    }

    fn is_pressed(&self, raw: &RawInputState) -> bool {
        raw.is_key_down(self.key)
    }
}

pub struct MouseButtonMapping {
    identity: MappingIdentity,
    bitmask: u16,
    button: i32,
}

impl MouseButtonMapping {
    pub fn new(config: SharedConfig, port: u8, bitmask: u16, button: i32) -> Self {
        let id = format!("P{}-B{}-M{}", port, bitmask, button);
        Self::with_id(MappingIdentity::new(id, PhysicalDeviceType::Mouse, port, config), bitmask, button)
    }

    pub fn with_id(identity: MappingIdentity, bitmask: u16, button: i32) -> Self {
        Self { identity, bitmask, button }
    }
}

impl ControllerInputMapping for MouseButtonMapping {
    fn identity(&self) -> &MappingIdentity {
        &self.identity
    }

    fn identity_mut(&mut self) -> &mut MappingIdentity {
        &mut self.identity
    }

    fn physical_input_name(&self) -> String {
        match self.button {
            0 => "Left Click".to_string(),
            1 => "Middle Click".to_string(),
            2 => "Right Click".to_string(),
            n => format!("Mouse {}", n + 1),
        }
    }

    fn save_to_config(&self) {
        let record = ButtonRecord::Mouse { bitmask: self.bitmask, mouse_button: self.button };
        self.identity.store(BUTTON_MAPPINGS, &record);
    }

    fn erase_from_config(&self) {
        self.identity.erase(BUTTON_MAPPINGS);
    }
}

impl ButtonMapping for MouseButtonMapping {
    fn bitmask(&self) -> u16 {
        self.bitmask
    }

    fn is_pressed(&self, raw: &RawInputState) -> bool {
        raw.is_mouse_button_down(self.button)
    }
}

pub struct GamepadButtonMapping {
    identity: MappingIdentity,
    bitmask: u16,
    guid: GamepadGuid,
    button: GamepadButton,
}

impl GamepadButtonMapping {
    pub fn new(config: SharedConfig, port: u8, bitmask: u16, guid: GamepadGuid, button: GamepadButton) -> Self {
        let id = format!("P{}-B{}-{}-GB{:?}", port, bitmask, guid, button);
        let identity = MappingIdentity::new(id, PhysicalDeviceType::Gamepad(guid), port, config);
        Self::with_id(identity, bitmask, guid, button)
    }

    pub fn with_id(identity: MappingIdentity, bitmask: u16, guid: GamepadGuid, button: GamepadButton) -> Self {
        Self { identity, bitmask, guid, button }
    }
}

impl ControllerInputMapping for GamepadButtonMapping {
    fn identity(&self) -> &MappingIdentity {
        &self.identity
    }

    fn identity_mut(&mut self) -> &mut MappingIdentity {
        &mut self.identity
    }

    fn physical_input_name(&self) -> String {
        self.button.name().to_string()
    }

    fn save_to_config(&self) {
        let record = ButtonRecord::GamepadButton {
            bitmask: self.bitmask,
            gamepad_guid: self.guid,
            gamepad_button: self.button,
        };
        self.identity.store(BUTTON_MAPPINGS, &record);
    }

    fn erase_from_config(&self) {
        self.identity.erase(BUTTON_MAPPINGS);
    }
}

impl ButtonMapping for GamepadButtonMapping {
    fn bitmask(&self) -> u16 {
        self.bitmask
    }

    fn is_pressed(&self, raw: &RawInputState) -> bool {
        raw.gamepad(self.guid).is_some_and(|pad| pad.is_pressed(self.button))
    }
}

/// Console button driven by a gamepad axis crossing a threshold.
pub struct GamepadAxisButtonMapping {
    identity: MappingIdentity,
    bitmask: u16,
    guid: GamepadGuid,
    axis: GamepadAxis,
    direction: AxisDirection,
    threshold_percent: u8,
}

impl GamepadAxisButtonMapping {
    pub fn new(
        config: SharedConfig,
        port: u8,
        bitmask: u16,
        guid: GamepadGuid,
        axis: GamepadAxis,
        direction: AxisDirection,
    ) -> Self {
        let id = format!("P{}-B{}-{}-GA{:?}{}", port, bitmask, guid, axis, direction.symbol());
        let identity = MappingIdentity::new(id, PhysicalDeviceType::Gamepad(guid), port, config);
        Self::with_id(identity, bitmask, guid, axis, direction, AXIS_THRESHOLD_DEFAULT)
    }

    pub fn with_id(
        identity: MappingIdentity,
        bitmask: u16,
        guid: GamepadGuid,
        axis: GamepadAxis,
        direction: AxisDirection,
        threshold_percent: u8,
    ) -> Self {
        Self {
            identity,
            bitmask,
            guid,
            axis,
            direction,
            threshold_percent: clamp_percent(threshold_percent, 100),
        }
    }

    pub fn threshold_percent(&self) -> u8 {
        self.threshold_percent
    }

    pub fn set_threshold_percent(&mut self, percent: u8) {
        self.threshold_percent = clamp_percent(percent, 100);
        self.save_to_config();
    }

    pub fn reset_threshold_to_default(&mut self) {
        self.set_threshold_percent(AXIS_THRESHOLD_DEFAULT);
    }

    pub fn threshold_is_default(&self) -> bool {
        self.threshold_percent == AXIS_THRESHOLD_DEFAULT
    }
}

impl ControllerInputMapping for GamepadAxisButtonMapping {
    fn identity(&self) -> &MappingIdentity {
        &self.identity
    }

    fn identity_mut(&mut self) -> &mut MappingIdentity {
        &mut self.identity
    }

    fn physical_input_name(&self) -> String {
        format!("{} {}", self.axis.name(), self.direction.symbol())
    }

    fn save_to_config(&self) {
        let record = ButtonRecord::GamepadAxis {
            bitmask: self.bitmask,
            gamepad_guid: self.guid,
            gamepad_axis: self.axis,
            axis_direction: self.direction,
            axis_threshold_percentage: self.threshold_percent,
        };
        self.identity.store(BUTTON_MAPPINGS, &record);
    }

    fn erase_from_config(&self) {
        self.identity.erase(BUTTON_MAPPINGS);
    }
}

impl ButtonMapping for GamepadAxisButtonMapping {
    fn bitmask(&self) -> u16 {
        self.bitmask
    }

    fn is_pressed(&self, raw: &RawInputState) -> bool {
        let Some(pad) = raw.gamepad(self.guid) else {
            return false;
        };
        let value = pad.axis(self.axis) * self.direction.sign();
        value > 0.0 && value * 100.0 >= f32::from(self.threshold_percent)
    }
}
