use super::button::AxisDirection;
use super::{clamp_percent, key_name, ControllerInputMapping, MappingIdentity, AXIS_DIRECTION_MAPPINGS};
use crate::device::{GamepadGuid, PhysicalDeviceType};
use crate::raw::{GamepadAxis, RawInputState};
use serde::{Deserialize, Serialize};
use ship_window::config::SharedConfig;
use ship_window::scancode::LogicalScancode;

pub const DEADZONE_DEFAULT: u8 = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Stick {
    Left,
    Right,
}

impl Stick {
    pub const ALL: [Stick; 2] = [Stick::Left, Stick::Right];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Left => "LeftStick",
            Self::Right => "RightStick",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

impl Direction {
    pub const ALL: [Direction; 4] = [Direction::Left, Direction::Right, Direction::Up, Direction::Down];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Left => "Left",
            Self::Right => "Right",
            Self::Up => "Up",
            Self::Down => "Down",
        }
    }
}

/// One direction of a console stick, driven by a physical input.
pub trait AxisDirectionMapping: ControllerInputMapping {
    fn stick(&self) -> Stick;
    fn direction(&self) -> Direction;
    /// Deflection in 0..=1.
    fn value(&self, raw: &RawInputState) -> f32;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "Type")]
pub enum AxisDirectionRecord {
    #[serde(rename = "KeyboardAxisDirectionMapping", rename_all = "PascalCase")]
    Keyboard {
        stick: Stick,
        direction: Direction,
        keyboard_scancode: LogicalScancode,
    },
    #[serde(rename = "GamepadAxisDirectionMapping", rename_all = "PascalCase")]
    GamepadAxis {
        stick: Stick,
        direction: Direction,
        gamepad_guid: GamepadGuid,
        gamepad_axis: GamepadAxis,
        axis_direction: AxisDirection,
        deadzone_percentage: u8,
    },
}

pub struct KeyboardAxisDirectionMapping {
    identity: MappingIdentity,
    stick: Stick,
    direction: Direction,
    key: LogicalScancode,
}

impl KeyboardAxisDirectionMapping {
    pub fn new(config: SharedConfig, port: u8, stick: Stick, direction: Direction, key: LogicalScancode) -> Self {
        let id = format!("P{}-S{}-D{}-KB{}", port, stick.index(), direction.index(), key);
        let identity = MappingIdentity::new(id, PhysicalDeviceType::Keyboard, port, config);
        Self::with_id(identity, stick, direction, key)
    }

    pub fn with_id(identity: MappingIdentity, stick: Stick, direction: Direction, key: LogicalScancode) -> Self {
        Self { identity, stick, direction, key }
    }
}

impl ControllerInputMapping for KeyboardAxisDirectionMapping {
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
        let record = AxisDirectionRecord::Keyboard {
            stick: self.stick,
            direction: self.direction,
            keyboard_scancode: self.key,
        };
        self.identity.store(AXIS_DIRECTION_MAPPINGS, &record);
    }

    fn erase_from_config(&self) {
        self.identity.erase(AXIS_DIRECTION_MAPPINGS);
    }
}

impl AxisDirectionMapping for KeyboardAxisDirectionMapping {
    fn stick(&self) -> Stick {
        self.stick
    }

    fn direction(&self) -> Direction {
        self.direction
    }

    fn value(&self, raw: &RawInputState) -> f32 {
        if raw.is_key_down(self.key) {
            1.0
        } else {
            0.0
        }
    }
}

pub struct GamepadAxisDirectionMapping {
    identity: MappingIdentity,
    stick: Stick,
    direction: Direction,
    guid: GamepadGuid,
    axis: GamepadAxis,
    axis_direction: AxisDirection,
    deadzone_percent: u8,
}

impl GamepadAxisDirectionMapping {
    pub fn new(
        config: SharedConfig,
        port: u8,
        stick: Stick,
        direction: Direction,
        guid: GamepadGuid,
        axis: GamepadAxis,
        axis_direction: AxisDirection,
    ) -> Self {
        let id = format!(
            "P{}-S{}-D{}-{}-GA{:?}{}",
            port,
            stick.index(),
            direction.index(),
            guid,
            axis,
            axis_direction.symbol()
        );
        let identity = MappingIdentity::new(id, PhysicalDeviceType::Gamepad(guid), port, config);
        Self::with_id(identity, stick, direction, guid, axis, axis_direction, DEADZONE_DEFAULT)
    }

    pub fn with_id(
        identity: MappingIdentity,
        stick: Stick,
        direction: Direction,
        guid: GamepadGuid,
        axis: GamepadAxis,
        axis_direction: AxisDirection,
        deadzone_percent: u8,
    ) -> Self {
        Self {
            identity,
            stick,
            direction,
            guid,
            axis,
            axis_direction,
            deadzone_percent: clamp_percent(deadzone_percent, 100),
        }
    }

    pub fn deadzone_percent(&self) -> u8 {
        self.deadzone_percent
    }

    pub fn set_deadzone_percent(&mut self, percent: u8) {
        self.deadzone_percent = clamp_percent(percent, 100);
        self.save_to_config();
    }

    pub fn reset_deadzone_to_default(&mut self) {
        self.set_deadzone_percent(DEADZONE_DEFAULT);
    }

    pub fn deadzone_is_default(&self) -> bool {
        self.deadzone_percent == DEADZONE_DEFAULT
    }
}

impl ControllerInputMapping for GamepadAxisDirectionMapping {
    fn identity(&self) -> &MappingIdentity {
        &self.identity
    }

    fn identity_mut(&mut self) -> &mut MappingIdentity {
        &mut self.identity
    }

    fn physical_input_name(&self) -> String {
        format!("{} {}", self.axis.name(), self.axis_direction.symbol())
    }

    fn save_to_config(&self) {
        let record = AxisDirectionRecord::GamepadAxis {
            stick: self.stick,
            direction: self.direction,
            gamepad_guid: self.guid,
            gamepad_axis: self.axis,
            axis_direction: self.axis_direction,
            deadzone_percentage: self.deadzone_percent,
        };
        self.identity.store(AXIS_DIRECTION_MAPPINGS, &record);
    }

    fn erase_from_config(&self) {
        self.identity.erase(AXIS_DIRECTION_MAPPINGS);
    }
}

impl AxisDirectionMapping for GamepadAxisDirectionMapping {
    fn stick(&self) -> Stick {
        self.stick
    }

    fn direction(&self) -> Direction {
        self.direction
    }

    fn value(&self, raw: &RawInputState) -> f32 {
        let Some(pad) = raw.gamepad(self.guid) else {
            return 0.0;
        };
        let deflection = pad.axis(self.axis) * self.axis_direction.sign();
        let deadzone = f32::from(self.deadzone_percent) / 100.0;
        if deflection <= deadzone {
            return 0.0;
        }
        // Rescale so the edge of the deadzone reads as zero.
        ((deflection - deadzone) / (1.0 - deadzone)).min(1.0)
    }
}
