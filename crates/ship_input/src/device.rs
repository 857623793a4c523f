use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// SDL-style 128-bit gamepad GUID, written as 32 lowercase hex digits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct GamepadGuid(pub [u8; 16]);

impl fmt::Display for GamepadGuid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in self.0 {
            write!(f, "{:02x}", byte)?;
        }
        Ok(())
    }
}

impl FromStr for GamepadGuid {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        if s.len() != 32 || !s.is_ascii() {
            return Err(anyhow!("gamepad guid must be 32 hex digits, got {:?}", s));
        }
        let mut bytes = [0u8; 16];
        for (i, byte) in bytes.iter_mut().enumerate() {
            let pair = &s[i * 2..i * 2 + 2];
            *byte = u8::from_str_radix(pair, 16)
                .with_context(|| format!("invalid hex {:?} in gamepad guid", pair))?;
        }
        Ok(Self(bytes))
    }
}

impl From<GamepadGuid> for String {
    fn from(guid: GamepadGuid) -> Self {
        guid.to_string()
    }
}

impl TryFrom<String> for GamepadGuid {
    type Error = anyhow::Error;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

/// Which driver produced a raw input sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum PhysicalDeviceType {
    Keyboard,
    Mouse,
    Gamepad(GamepadGuid),
    /// Input synthesised from another device (mouse driven gyro).
    Virtual,
}

impl fmt::Display for PhysicalDeviceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Keyboard => f.write_str("Keyboard"),
            Self::Mouse => f.write_str("Mouse"),
            Self::Gamepad(guid) => write!(f, "Gamepad:{}", guid),
            Self::Virtual => f.write_str("Virtual"),
        }
    }
}

impl FromStr for PhysicalDeviceType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "Keyboard" => Ok(Self::Keyboard),
            "Mouse" => Ok(Self::Mouse),
            "Virtual" => Ok(Self::Virtual),
            _ => match s.strip_prefix("Gamepad:") {
                Some(guid) => Ok(Self::Gamepad(guid.parse()?)),
                None => Err(anyhow!("unknown physical device type {:?}", s)),
            },
        }
    }
}

impl From<PhysicalDeviceType> for String {
    fn from(device: PhysicalDeviceType) -> Self {
        device.to_string()
    }
}

impl TryFrom<String> for PhysicalDeviceType {
    type Error = anyhow::Error;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}
