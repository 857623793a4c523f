use crate::controller::{parse_ids, port_key, Controller};
use crate::device::{GamepadGuid, PhysicalDeviceType};
use crate::mapping::axis::{
    AxisDirectionMapping, AxisDirectionRecord, Direction, GamepadAxisDirectionMapping,
    KeyboardAxisDirectionMapping, Stick,
};
use crate::mapping::button::{
    AxisDirection, ButtonMapping, ButtonRecord, GamepadAxisButtonMapping, GamepadButtonMapping,
    KeyboardButtonMapping, MouseButtonMapping,
};
use crate::mapping::gyro::{GamepadGyroMapping, GyroMapping, GyroRecord, MouseGyroMapping};
use crate::mapping::rumble::{GamepadRumbleMapping, RumbleMapping, RumbleRecord};
use crate::mapping::{
    MappingIdentity, AXIS_DIRECTION_MAPPINGS, BUTTON_MAPPINGS, GYRO_MAPPINGS, RUMBLE_MAPPINGS,
};
use crate::pad;
use crate::raw::{GamepadAxis, RawInputState};
use glam::Vec3;
use serde::de::DeserializeOwned;
use serde_json::Value;
use ship_window::config::SharedConfig;
use ship_window::scancode::LogicalScancode;

/// Axis deflection that counts as deliberate while capturing a binding.
const CAPTURE_AXIS_THRESHOLD: f32 = 0.7;
/// Gyro rate that counts as deliberate while capturing a binding.
const CAPTURE_GYRO_THRESHOLD: f32 = 0.5;

/// Default keyboard layout for the first port, in logical scancodes.
pub const DEFAULT_KEYBOARD_BUTTONS: [(u16, LogicalScancode); 14] = [
    (pad::BTN_A, 0x2D),      // X
    (pad::BTN_B, 0x2E),      // C
    (pad::BTN_Z, 0x2C),      // Z
    (pad::BTN_START, 0x1C),  // Return
    (pad::BTN_L, 0x12),      // E
    (pad::BTN_R, 0x13),      // R
    (pad::BTN_CUP, 0x17),    // I
    (pad::BTN_CDOWN, 0x25),  // K
    (pad::BTN_CLEFT, 0x24),  // J
    (pad::BTN_CRIGHT, 0x26), // L
    (pad::BTN_DUP, 0x14),    // T
    (pad::BTN_DDOWN, 0x22),  // G
    (pad::BTN_DLEFT, 0x21),  // F
    (pad::BTN_DRIGHT, 0x23), // H
];

pub const DEFAULT_KEYBOARD_STICK: [(Direction, LogicalScancode); 4] = [
    (Direction::Up, 0x11),    // W
    (Direction::Down, 0x1F),  // S
    (Direction::Left, 0x1E),  // A
    (Direction::Right, 0x20), // D
];

/// Builds mappings from config records and from live raw input.
pub struct MappingFactory {
    config: SharedConfig,
}

impl MappingFactory {
    pub fn new(config: SharedConfig) -> Self {
        Self { config }
    }

    fn record<R: DeserializeOwned>(&self, section: &str, id: &str) -> Option<R> {
        let key = format!("{}.{}", section, id);
        let value = self.config.borrow().get_value(&key).cloned();
        let Some(value) = value else {
            tracing::warn!("No config record for mapping {}", id);
            return None;
        };
        match serde_json::from_value(value) {
            Ok(record) => Some(record),
            Err(e) => {
                tracing::warn!("Ignoring malformed mapping {}: {}", id, e);
                None
            }
        }
    }

    fn identity(&self, id: &str, device: PhysicalDeviceType, port: u8) -> MappingIdentity {
        MappingIdentity::new(id.to_owned(), device, port, self.config.clone()).loaded()
    }

    pub fn button_from_config(&self, port: u8, id: &str) -> Option<Box<dyn ButtonMapping>> {
        let mapping: Box<dyn ButtonMapping> = match self.record(BUTTON_MAPPINGS, id)? {
            ButtonRecord::Keyboard { bitmask, keyboard_scancode } => Box::new(KeyboardButtonMapping::with_id(
                self.identity(id, PhysicalDeviceType::Keyboard, port),
                bitmask,
                keyboard_scancode,
            )),
            ButtonRecord::Mouse { bitmask, mouse_button } => Box::new(MouseButtonMapping::with_id(
                self.identity(id, PhysicalDeviceType::Mouse, port),
                bitmask,
                mouse_button,
            )),
            ButtonRecord::GamepadButton { bitmask, gamepad_guid, gamepad_button } => {
                Box::new(GamepadButtonMapping::with_id(
                    self.identity(id, PhysicalDeviceType::Gamepad(gamepad_guid), port),
                    bitmask,
                    gamepad_guid,
                    gamepad_button,
                ))
            }
            ButtonRecord::GamepadAxis {
                bitmask,
                gamepad_guid,
                gamepad_axis,
                axis_direction,
                axis_threshold_percentage,
            } => Box::new(GamepadAxisButtonMapping::with_id(
                self.identity(id, PhysicalDeviceType::Gamepad(gamepad_guid), port),
                bitmask,
                gamepad_guid,
                gamepad_axis,
                axis_direction,
                axis_threshold_percentage,
            )),
        };
        Some(mapping)
    }

    pub fn axis_direction_from_config(&self, port: u8, id: &str) -> Option<Box<dyn AxisDirectionMapping>> {
        let mapping: Box<dyn AxisDirectionMapping> = match self.record(AXIS_DIRECTION_MAPPINGS, id)? {
            AxisDirectionRecord::Keyboard { stick, direction, keyboard_scancode } => {
                Box::new(KeyboardAxisDirectionMapping::with_id(
                    self.identity(id, PhysicalDeviceType::Keyboard, port),
                    stick,
                    direction,
                    keyboard_scancode,
                ))
            }
            AxisDirectionRecord::GamepadAxis {
                stick,
                direction,
                gamepad_guid,
                gamepad_axis,
                axis_direction,
                deadzone_percentage,
            } => Box::new(GamepadAxisDirectionMapping::with_id(
                self.identity(id, PhysicalDeviceType::Gamepad(gamepad_guid), port),
                stick,
                direction,
                gamepad_guid,
                gamepad_axis,
                axis_direction,
                deadzone_percentage,
            )),
        };
        Some(mapping)
    }

    pub fn gyro_from_config(&self, port: u8, id: &str) -> Option<Box<dyn GyroMapping>> {
        let mapping: Box<dyn GyroMapping> = match self.record(GYRO_MAPPINGS, id)? {
            GyroRecord::Gamepad {
                gamepad_guid,
                sensitivity_percent,
                neutral_pitch,
                neutral_yaw,
                neutral_roll,
            } => Box::new(GamepadGyroMapping::with_id(
                self.identity(id, PhysicalDeviceType::Gamepad(gamepad_guid), port),
                gamepad_guid,
                sensitivity_percent,
                Vec3::new(neutral_pitch, neutral_yaw, neutral_roll),
            )),
            GyroRecord::Mouse { sensitivity_percent } => Box::new(MouseGyroMapping::with_id(
                self.identity(id, PhysicalDeviceType::Virtual, port),
                sensitivity_percent,
            )),
        };
        Some(mapping)
    }

    pub fn rumble_from_config(&self, port: u8, id: &str) -> Option<Box<dyn RumbleMapping>> {
        match self.record(RUMBLE_MAPPINGS, id)? {
            RumbleRecord::Gamepad {
                gamepad_guid,
                low_frequency_intensity_percent,
                high_frequency_intensity_percent,
            } => Some(Box::new(GamepadRumbleMapping::with_id(
                self.identity(id, PhysicalDeviceType::Gamepad(gamepad_guid), port),
                gamepad_guid,
                low_frequency_intensity_percent,
                high_frequency_intensity_percent,
            ))),
        }
    }

    /// Binding for `bitmask` from whatever is held right now: a key, then a
    /// mouse button, then a gamepad button, then a deflected gamepad axis.
    pub fn button_from_raw(&self, port: u8, bitmask: u16, raw: &RawInputState) -> Option<Box<dyn ButtonMapping>> {
        let config = self.config.clone();
        if let Some(key) = raw.first_key_down() {
            return Some(Box::new(KeyboardButtonMapping::new(config, port, bitmask, key)));
        }
        if let Some(button) = raw.first_mouse_button_down() {
            return Some(Box::new(MouseButtonMapping::new(config, port, bitmask, button)));
        }
        for (guid, snapshot) in raw.gamepads() {
            if let Some(button) = snapshot.pressed_buttons().next() {
                return Some(Box::new(GamepadButtonMapping::new(config, port, bitmask, guid, button)));
            }
        }
        let (guid, axis, value) = deflected_axis(raw)?;
        Some(Box::new(GamepadAxisButtonMapping::new(
            config,
            port,
            bitmask,
            guid,
            axis,
            AxisDirection::of(value),
        )))
    }

    pub fn axis_direction_from_raw(
        &self,
        port: u8,
        stick: Stick,
        direction: Direction,
        raw: &RawInputState,
    ) -> Option<Box<dyn AxisDirectionMapping>> {
        let config = self.config.clone();
        if let Some(key) = raw.first_key_down() {
            return Some(Box::new(KeyboardAxisDirectionMapping::new(config, port, stick, direction, key)));
        }
        let (guid, axis, value) = deflected_axis(raw)?;
        Some(Box::new(GamepadAxisDirectionMapping::new(
            config,
            port,
            stick,
            direction,
            guid,
            axis,
            AxisDirection::of(value),
        )))
    }

    /// A gamepad that is being rotated, else the mouse if it moved.
    pub fn gyro_from_raw(&self, port: u8, raw: &RawInputState) -> Option<Box<dyn GyroMapping>> {
        let config = self.config.clone();
        for (guid, snapshot) in raw.gamepads() {
            if snapshot.gyro().abs().max_element() > CAPTURE_GYRO_THRESHOLD {
                return Some(Box::new(GamepadGyroMapping::new(config, port, guid)));
            }
        }
        if raw.mouse_delta() != glam::Vec2::ZERO {
            return Some(Box::new(MouseGyroMapping::new(config, port)));
        }
        None
    }

    pub fn rumble_for_gamepad(&self, port: u8, guid: GamepadGuid) -> Box<dyn RumbleMapping> {
        Box::new(GamepadRumbleMapping::new(self.config.clone(), port, guid))
    }

    /// Bind the default keyboard layout to `controller`.
    pub fn add_default_keyboard_mappings(&self, controller: &mut Controller) {
        let port = controller.port();
        for (bitmask, key) in DEFAULT_KEYBOARD_BUTTONS {
            controller.add_button_mapping(Box::new(KeyboardButtonMapping::new(
                self.config.clone(),
                port,
                bitmask,
                key,
            )));
        }
        for (direction, key) in DEFAULT_KEYBOARD_STICK {
            controller.add_axis_direction_mapping(Box::new(KeyboardAxisDirectionMapping::new(
                self.config.clone(),
                port,
                Stick::Left,
                direction,
                key,
            )));
        }
        tracing::info!("Applied default keyboard mappings to port {}", port + 1);
    }

    /// Rebuild a port from config. The first port falls back to the default
    /// keyboard layout when nothing was saved for it.
    pub fn load_controller(&self, port: u8) -> Controller {
        let mut controller = Controller::new(port, self.config.clone());
        let saved = self.config.borrow().get_value(&port_key(port)).cloned();

        match saved {
            Some(saved) => self.load_port(&mut controller, &saved),
            None if port == 0 => self.add_default_keyboard_mappings(&mut controller),
            None => {}
        }
        tracing::debug!("Port {} loaded with {} mappings", port + 1, controller.mapping_count());
        controller
    }

    fn load_port(&self, controller: &mut Controller, saved: &Value) {
        let port = controller.port();

        if let Some(buttons) = saved.get("Buttons").and_then(Value::as_object) {
            for entry in buttons.values() {
                for id in parse_ids(entry.get("MappingIds")) {
                    if let Some(mapping) = self.button_from_config(port, &id) {
                        controller.attach_button(mapping);
                    }
                }
            }
        }

        for stick in Stick::ALL {
            for direction in Direction::ALL {
                let ids = saved
                    .get(stick.name())
                    .and_then(|s| s.get(direction.name()))
                    .and_then(|d| d.get("MappingIds"));
                for id in parse_ids(ids) {
                    if let Some(mapping) = self.axis_direction_from_config(port, &id) {
                        controller.attach_axis_direction(mapping);
                    }
                }
            }
        }

        let gyro_id = saved.get("Gyro").and_then(|g| g.get("MappingId"));
        if let Some(id) = gyro_id.and_then(Value::as_str) {
            if let Some(mapping) = self.gyro_from_config(port, id) {
                controller.attach_gyro(mapping);
            }
        }

        for id in parse_ids(saved.get("Rumble").and_then(|r| r.get("MappingIds"))) {
            if let Some(mapping) = self.rumble_from_config(port, &id) {
                controller.attach_rumble(mapping);
            }
        }
    }
}

fn deflected_axis(raw: &RawInputState) -> Option<(GamepadGuid, GamepadAxis, f32)> {
    raw.gamepads().find_map(|(guid, snapshot)| {
        GamepadAxis::ALL.into_iter().find_map(|axis| {
            let value = snapshot.axis(axis);
            (value.abs() >= CAPTURE_AXIS_THRESHOLD).then_some((guid, axis, value))
        })
    })
}
