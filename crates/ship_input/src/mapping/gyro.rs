use super::{ControllerInputMapping, MappingIdentity, GYRO_MAPPINGS};
use crate::device::{GamepadGuid, PhysicalDeviceType};
use crate::raw::RawInputState;
use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};
use ship_window::config::SharedConfig;

pub const GYRO_SENSITIVITY_DEFAULT: u8 = 100;
/// Gyro units produced per pixel of mouse motion at 100% sensitivity.
pub const MOUSE_GYRO_SCALE: f32 = 0.05;

/// Nearest percent for a float sensitivity (1.0 = 100%), clamped to 0..=255.
pub fn percent_from_sensitivity(sensitivity: f32) -> u8 {
    (sensitivity * 100.0).round().clamp(0.0, 255.0) as u8
}

/// Gyro binding. The percent is the stored value; the float sensitivity is
/// always derived from it, so integer percents round-trip exactly.
pub trait GyroMapping: ControllerInputMapping {
    fn sensitivity_percent(&self) -> u8;
    /// Store the percent and persist immediately.
    fn set_sensitivity(&mut self, percent: u8);
    /// Capture the current reading as the at-rest reference.
    fn recalibrate(&mut self, raw: &RawInputState);
    /// Pitch/yaw contribution to the pad for this frame.
    fn update_pad(&self, raw: &RawInputState) -> Vec2;

    fn sensitivity(&self) -> f32 {
        f32::from(self.sensitivity_percent()) / 100.0
    }

    fn reset_sensitivity_to_default(&mut self) {
        self.set_sensitivity(GYRO_SENSITIVITY_DEFAULT);
    }

    fn sensitivity_is_default(&self) -> bool {
        self.sensitivity_percent() == GYRO_SENSITIVITY_DEFAULT
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "Type")]
pub enum GyroRecord {
    #[serde(rename = "GamepadGyroMapping", rename_all = "PascalCase")]
    Gamepad {
        gamepad_guid: GamepadGuid,
        sensitivity_percent: u8,
        neutral_pitch: f32,
        neutral_yaw: f32,
        neutral_roll: f32,
    },
    #[serde(rename = "MouseGyroMapping", rename_all = "PascalCase")]
    Mouse { sensitivity_percent: u8 },
}

/// Gamepad motion sensor, minus the at-rest drift captured on calibration.
pub struct GamepadGyroMapping {
    identity: MappingIdentity,
    guid: GamepadGuid,
    sensitivity_percent: u8,
    neutral: Vec3,
}

impl GamepadGyroMapping {
    pub fn new(config: SharedConfig, port: u8, guid: GamepadGuid) -> Self {
        let id = format!("P{}-G-{}", port, guid);
        let identity = MappingIdentity::new(id, PhysicalDeviceType::Gamepad(guid), port, config);
        Self::with_id(identity, guid, GYRO_SENSITIVITY_DEFAULT, Vec3::ZERO)
    }

    pub fn with_id(identity: MappingIdentity, guid: GamepadGuid, sensitivity_percent: u8, neutral: Vec3) -> Self {
        Self { identity, guid, sensitivity_percent, neutral }
    }

    /// Build from a float sensitivity (1.0 = 100%), rounded to the nearest percent.
    pub fn with_sensitivity(identity: MappingIdentity, guid: GamepadGuid, sensitivity: f32, neutral: Vec3) -> Self {
        Self::with_id(identity, guid, percent_from_sensitivity(sensitivity), neutral)
    }

    pub fn neutral(&self) -> Vec3 {
        self.neutral
    }
}

impl ControllerInputMapping for GamepadGyroMapping {
    fn identity(&self) -> &MappingIdentity {
        &self.identity
    }

    fn identity_mut(&mut self) -> &mut MappingIdentity {
        &mut self.identity
    }

    fn physical_input_name(&self) -> String {
        "Gamepad Gyro".to_string()
    }

    fn save_to_config(&self) {
        let record = GyroRecord::Gamepad {
            gamepad_guid: self.guid,
            sensitivity_percent: self.sensitivity_percent,
            neutral_pitch: self.neutral.x,
            neutral_yaw: self.neutral.y,
            neutral_roll: self.neutral.z,
        };
        self.identity.store(GYRO_MAPPINGS, &record);
    }

    fn erase_from_config(&self) {
        self.identity.erase(GYRO_MAPPINGS);
    }
}

impl GyroMapping for GamepadGyroMapping {
    fn sensitivity_percent(&self) -> u8 {
        self.sensitivity_percent
    }

    fn set_sensitivity(&mut self, percent: u8) {
        self.sensitivity_percent = percent;
        self.save_to_config();
    }

    fn recalibrate(&mut self, raw: &RawInputState) {
        self.neutral = raw.gamepad(self.guid).map(|pad| pad.gyro()).unwrap_or(Vec3::ZERO);
        tracing::info!("Gyro {} recalibrated to {:?}", self.mapping_id(), self.neutral);
        self.save_to_config();
    }

    fn update_pad(&self, raw: &RawInputState) -> Vec2 {
        let Some(pad) = raw.gamepad(self.guid) else {
            return Vec2::ZERO;
        };
        let rate = pad.gyro() - self.neutral;
        Vec2::new(rate.x, rate.y) * self.sensitivity()
    }
}

/// Virtual gyro that turns mouse motion into pitch and yaw.
pub struct MouseGyroMapping {
    identity: MappingIdentity,
    sensitivity_percent: u8,
}

impl MouseGyroMapping {
    pub fn new(config: SharedConfig, port: u8) -> Self {
        let id = format!("P{}-G-Mouse", port);
        let identity = MappingIdentity::new(id, PhysicalDeviceType::Virtual, port, config);
        Self::with_id(identity, GYRO_SENSITIVITY_DEFAULT)
    }

    pub fn with_id(identity: MappingIdentity, sensitivity_percent: u8) -> Self {
        Self { identity, sensitivity_percent }
    }

    pub fn with_sensitivity(identity: MappingIdentity, sensitivity: f32) -> Self {
        Self::with_id(identity, percent_from_sensitivity(sensitivity))
    }
}

impl ControllerInputMapping for MouseGyroMapping {
    fn identity(&self) -> &MappingIdentity {
        &self.identity
    }

    fn identity_mut(&mut self) -> &mut MappingIdentity {
        &mut self.identity
    }

    fn physical_input_name(&self) -> String {
        "Mouse Motion".to_string()
    }

    fn save_to_config(&self) {
        let record = GyroRecord::Mouse { sensitivity_percent: self.sensitivity_percent };
        self.identity.store(GYRO_MAPPINGS, &record);
    }

    fn erase_from_config(&self) {
        self.identity.erase(GYRO_MAPPINGS);
    }
}

impl GyroMapping for MouseGyroMapping {
    fn sensitivity_percent(&self) -> u8 {
        self.sensitivity_percent
    }

    fn set_sensitivity(&mut self, percent: u8) {
        self.sensitivity_percent = percent;
        self.save_to_config();
    }

    // Mouse motion has no drift.
    fn recalibrate(&mut self, _raw: &RawInputState) {}

    fn update_pad(&self, raw: &RawInputState) -> Vec2 {
        let delta = raw.mouse_delta();
        Vec2::new(-delta.y, -delta.x) * MOUSE_GYRO_SCALE * self.sensitivity()
    }
}
