use super::{clamp_percent, ControllerInputMapping, MappingIdentity, RUMBLE_MAPPINGS};
use crate::device::{GamepadGuid, PhysicalDeviceType};
use serde::{Deserialize, Serialize};
use ship_window::config::SharedConfig;

pub const RUMBLE_INTENSITY_DEFAULT: u8 = 50;

/// Force feedback sink, implemented by the gamepad poller.
pub trait RumbleOutput {
    /// Start rumbling `device`. Strengths are in 0..=1.
    fn set_rumble(&mut self, device: GamepadGuid, low_frequency: f32, high_frequency: f32);
    fn stop_rumble(&mut self, device: GamepadGuid);
}

pub trait RumbleMapping: ControllerInputMapping {
    fn low_frequency_intensity_percent(&self) -> u8;
    fn high_frequency_intensity_percent(&self) -> u8;
    fn set_low_frequency_intensity(&mut self, percent: u8);
    fn set_high_frequency_intensity(&mut self, percent: u8);
    fn start_rumble(&self, out: &mut dyn RumbleOutput);
    fn stop_rumble(&self, out: &mut dyn RumbleOutput);

    fn reset_low_frequency_intensity_to_default(&mut self) {
        self.set_low_frequency_intensity(RUMBLE_INTENSITY_DEFAULT);
    }

    fn reset_high_frequency_intensity_to_default(&mut self) {
        self.set_high_frequency_intensity(RUMBLE_INTENSITY_DEFAULT);
    }

    fn low_frequency_intensity_is_default(&self) -> bool {
        self.low_frequency_intensity_percent() == RUMBLE_INTENSITY_DEFAULT
    }

    fn high_frequency_intensity_is_default(&self) -> bool {
        self.high_frequency_intensity_percent() == RUMBLE_INTENSITY_DEFAULT
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "Type")]
pub enum RumbleRecord {
    #[serde(rename = "GamepadRumbleMapping", rename_all = "PascalCase")]
    Gamepad {
        gamepad_guid: GamepadGuid,
        low_frequency_intensity_percent: u8,
        high_frequency_intensity_percent: u8,
    },
}

pub struct GamepadRumbleMapping {
    identity: MappingIdentity,
    guid: GamepadGuid,
    low_percent: u8,
    high_percent: u8,
}

impl GamepadRumbleMapping {
    pub fn new(config: SharedConfig, port: u8, guid: GamepadGuid) -> Self {
        let id = format!("P{}-R-{}", port, guid);
        let identity = MappingIdentity::new(id, PhysicalDeviceType::Gamepad(guid), port, config);
        Self::with_id(identity, guid, RUMBLE_INTENSITY_DEFAULT, RUMBLE_INTENSITY_DEFAULT)
    }

    pub fn with_id(identity: MappingIdentity, guid: GamepadGuid, low_percent: u8, high_percent: u8) -> Self {
        Self {
            identity,
            guid,
            low_percent: clamp_percent(low_percent, 100),
            high_percent: clamp_percent(high_percent, 100),
        }
    }
}

impl ControllerInputMapping for GamepadRumbleMapping {
    fn identity(&self) -> &MappingIdentity {
        &self.identity
    }

    fn identity_mut(&mut self) -> &mut MappingIdentity {
        &mut self.identity
    }

    fn physical_input_name(&self) -> String {
        "Rumble".to_string()
    }

    fn save_to_config(&self) {
        let record = RumbleRecord::Gamepad {
            gamepad_guid: self.guid,
            low_frequency_intensity_percent: self.low_percent,
            high_frequency_intensity_percent: self.high_percent,
        };
        self.identity.store(RUMBLE_MAPPINGS, &record);
    }

    fn erase_from_config(&self) {
        self.identity.erase(RUMBLE_MAPPINGS);
    }
}

impl RumbleMapping for GamepadRumbleMapping {
    fn low_frequency_intensity_percent(&self) -> u8 {
        self.low_percent
    }

    fn high_frequency_intensity_percent(&self) -> u8 {
        self.high_percent
    }

    fn set_low_frequency_intensity(&mut self, percent: u8) {
        self.low_percent = clamp_percent(percent, 100);
        self.save_to_config();
    }

    fn set_high_frequency_intensity(&mut self, percent: u8) {
        self.high_percent = clamp_percent(percent, 100);
        self.save_to_config();
    }

    fn start_rumble(&self, out: &mut dyn RumbleOutput) {
        out.set_rumble(
            self.guid,
            f32::from(self.low_percent) / 100.0,
            f32::from(self.high_percent) / 100.0,
        );
    }

    fn stop_rumble(&self, out: &mut dyn RumbleOutput) {
        out.stop_rumble(self.guid);
    }
}
