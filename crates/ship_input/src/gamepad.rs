use crate::device::GamepadGuid;
use crate::mapping::rumble::RumbleOutput;
use crate::raw::{GamepadAxis, GamepadButton, RawInputState};
use anyhow::{anyhow, Result};
use gilrs::ff::{BaseEffect, BaseEffectType, Effect, EffectBuilder, Replay, Ticks};
use gilrs::{Axis, Button, EventType, GamepadId, Gilrs};
use std::collections::HashMap;
use tracing::{debug, info, warn};

/// Length of one rumble pulse. Repeats until stopped.
const RUMBLE_PULSE_MS: u32 = 200;

/// Guid for a newly connected pad. Identical models report the same uuid, so
/// later ones get the last byte bumped until no connected pad uses it.
fn instance_guid(base: GamepadGuid, taken: &[GamepadGuid]) -> GamepadGuid {
    let mut guid = base;
    for _ in 0..=u8::MAX {
        if !taken.contains(&guid) {
            break;
        }
        guid.0[15] = guid.0[15].wrapping_add(1);
    }
    if guid != base {
        debug!("Gamepad {} already connected, using {}", base, guid);
    }
    guid
}

/// Feeds gamepad state into [`RawInputState`] and drives force feedback.
pub struct GamepadPoller {
    gilrs: Gilrs,
    guids: HashMap<GamepadId, GamepadGuid>,
    effects: HashMap<GamepadGuid, Effect>,
}

impl GamepadPoller {
    pub fn new() -> Result<Self> {
        let gilrs = Gilrs::new().map_err(|e| anyhow!("Failed to initialize gamepad support: {}", e))?;
        let mut poller = Self {
            gilrs,
            guids: HashMap::new(),
            effects: HashMap::new(),
        };
        let connected: Vec<GamepadId> = poller.gilrs.gamepads().map(|(id, _)| id).collect();
        for id in connected {
            poller.register(id);
        }
        Ok(poller)
    }

    fn register(&mut self, id: GamepadId) -> GamepadGuid {
        if let Some(guid) = self.guids.get(&id) {
            return *guid;
        }
        let gamepad = self.gilrs.gamepad(id);
        let taken: Vec<GamepadGuid> = self.guids.values().copied().collect();
        let guid = instance_guid(GamepadGuid(gamepad.uuid()), &taken);
        self.guids.insert(id, guid);
        info!(
            "Gamepad connected: {} ({}), force feedback: {}",
            gamepad.name(),
            guid,
            gamepad.is_ff_supported()
        );
        guid
    }

    pub fn connected(&self) -> impl Iterator<Item = GamepadGuid> + '_ {
        self.guids.values().copied()
    }

    /// Drain pending gamepad events into `raw`.
    pub fn poll(&mut self, raw: &mut RawInputState) {
        while let Some(event) = self.gilrs.next_event() {
            let guid = match self.guids.get(&event.id) {
                Some(guid) => *guid,
                None => self.register(event.id),
            };
            match event.event {
                EventType::Connected => {
                    raw.gamepad_mut(guid);
                }
                EventType::Disconnected => {
                    info!("Gamepad disconnected: {}", guid);
                    self.guids.remove(&event.id);
                    self.effects.remove(&guid);
                    raw.remove_gamepad(guid);
                }
                EventType::ButtonPressed(button, _) => {
                    if let Some(button) = map_button(button) {
                        raw.gamepad_mut(guid).set_button(button, true);
                    }
                }
                EventType::ButtonReleased(button, _) => {
                    if let Some(button) = map_button(button) {
                        raw.gamepad_mut(guid).set_button(button, false);
                    }
                }
                EventType::ButtonChanged(button, value, _) => {
                    // Analog triggers arrive as buttons.
                    let axis = match button {
                        Button::LeftTrigger2 => GamepadAxis::LeftTrigger,
                        Button::RightTrigger2 => GamepadAxis::RightTrigger,
                        _ => continue,
                    };
                    raw.gamepad_mut(guid).set_axis(axis, value);
                }
                EventType::AxisChanged(axis, value, _) => {
                    if let Some(axis) = map_axis(axis) {
                        raw.gamepad_mut(guid).set_axis(axis, value);
                    }
                }
                _ => {}
            }
        }
    }
}

fn map_button(button: Button) -> Option<GamepadButton> {
    Some(match button {
        Button::South => GamepadButton::South,
        Button::East => GamepadButton::East,
        Button::West => GamepadButton::West,
        Button::North => GamepadButton::North,
        Button::LeftTrigger => GamepadButton::LeftShoulder,
        Button::RightTrigger => GamepadButton::RightShoulder,
        Button::Start => GamepadButton::Start,
        Button::Select => GamepadButton::Back,
        Button::Mode => GamepadButton::Guide,
        Button::LeftThumb => GamepadButton::LeftStick,
        Button::RightThumb => GamepadButton::RightStick,
        Button::DPadUp => GamepadButton::DPadUp,
        Button::DPadDown => GamepadButton::DPadDown,
        Button::DPadLeft => GamepadButton::DPadLeft,
        Button::DPadRight => GamepadButton::DPadRight,
        _ => return None,
    })
}

fn map_axis(axis: Axis) -> Option<GamepadAxis> {
    Some(match axis {
        Axis::LeftStickX => GamepadAxis::LeftX,
        Axis::LeftStickY => GamepadAxis::LeftY,
        Axis::RightStickX => GamepadAxis::RightX,
        Axis::RightStickY => GamepadAxis::RightY,
        Axis::LeftZ => GamepadAxis::LeftTrigger,
        Axis::RightZ => GamepadAxis::RightTrigger,
        _ => return None,
    })
}

fn magnitude(strength: f32) -> u16 {
    (strength.clamp(0.0, 1.0) * f32::from(u16::MAX)) as u16
}

impl RumbleOutput for GamepadPoller {
    fn set_rumble(&mut self, device: GamepadGuid, low_frequency: f32, high_frequency: f32) {
        let Some(id) = self.guids.iter().find(|(_, guid)| **guid == device).map(|(id, _)| *id) else {
            debug!("Rumble for absent gamepad {}", device);
            return;
        };
        if !self.gilrs.gamepad(id).is_ff_supported() {
            return;
        }

        let scheduling = Replay {
            play_for: Ticks::from_ms(RUMBLE_PULSE_MS),
            ..Default::default()
        };
        let effect = EffectBuilder::new()
            .add_effect(BaseEffect {
                kind: BaseEffectType::Strong { magnitude: magnitude(low_frequency) },
                scheduling,
                ..Default::default()
            })
            .add_effect(BaseEffect {
                kind: BaseEffectType::Weak { magnitude: magnitude(high_frequency) },
                scheduling,
                ..Default::default()
            })
            .gamepads(&[id])
            .finish(&mut self.gilrs);

        match effect.and_then(|effect| effect.play().map(|_| effect)) {
            Ok(effect) => {
                self.effects.insert(device, effect);
            }
            Err(e) => warn!("Failed to start rumble on {}: {}", device, e),
        }
    }

    fn stop_rumble(&mut self, device: GamepadGuid) {
        if let Some(effect) = self.effects.remove(&device) {
            if let Err(e) = effect.stop() {
                warn!("Failed to stop rumble on {}: {}", device, e);
            }
        }
    }
}
