use crate::hid::{self, NativeScancode};

/// Backend independent key id used by the rest of the input pipeline.
///
/// Slots follow the PC set-1 layout (1 = Escape, 28 = Return, ...). Keys that
/// share a slot with another key in a different keypad state live in the
/// extended range at `slot + EXTENDED_OFFSET`.
pub type LogicalScancode = u16;

pub const EXTENDED_OFFSET: LogicalScancode = 0x100;

/// Size of the native code space covered by the table.
pub const NATIVE_TABLE_SIZE: usize = 512;

/// Logical slot -> native code. Slots without a key hold `hid::UNKNOWN`.
const LOGICAL_TO_NATIVE: [NativeScancode; 128] = [
    // 0x00
    hid::UNKNOWN,
    hid::ESCAPE,
    hid::DIGIT_1,
    hid::DIGIT_2,
    hid::DIGIT_3,
    hid::DIGIT_4,
    hid::DIGIT_5,
    hid::DIGIT_6,
    hid::DIGIT_7,
    hid::DIGIT_8,
    hid::DIGIT_9,
    hid::DIGIT_0,
    hid::MINUS,
    hid::EQUALS,
    hid::BACKSPACE,
    hid::TAB,
    // 0x10
    hid::Q,
    hid::W,
    hid::E,
    hid::R,
    hid::T,
    hid::Y,
    hid::U,
    hid::I,
    hid::O,
    hid::P,
    hid::LEFT_BRACKET,
    hid::RIGHT_BRACKET,
    hid::RETURN,
    hid::LEFT_CTRL,
    hid::A,
    hid::S,
    // 0x20
    hid::D,
    hid::F,
    hid::G,
    hid::H,
    hid::J,
    hid::K,
    hid::L,
    hid::SEMICOLON,
    hid::APOSTROPHE,
    hid::GRAVE,
    hid::LEFT_SHIFT,
    hid::BACKSLASH,
    hid::Z,
    hid::X,
    hid::C,
    hid::V,
    // 0x30
    hid::B,
    hid::N,
    hid::M,
    hid::COMMA,
    hid::PERIOD,
    hid::SLASH,
    hid::RIGHT_SHIFT,
    hid::PRINT_SCREEN,
    hid::LEFT_ALT,
    hid::SPACE,
    hid::CAPS_LOCK,
    hid::F1,
    hid::F2,
    hid::F3,
    hid::F4,
    hid::F5,
    // 0x40
    hid::F6,
    hid::F7,
    hid::F8,
    hid::F9,
    hid::F10,
    hid::NUM_LOCK,
    hid::SCROLL_LOCK,
    hid::HOME,
    hid::UP,
    hid::PAGE_UP,
    hid::KP_MINUS,
    hid::LEFT,
    hid::KP_5,
    hid::RIGHT,
    hid::KP_PLUS,
    hid::END,
    // 0x50
    hid::DOWN,
    hid::PAGE_DOWN,
    hid::INSERT,
    hid::DELETE,
    hid::UNKNOWN,
    hid::UNKNOWN,
    hid::NON_US_BACKSLASH,
    hid::F11,
    hid::F12,
    hid::PAUSE,
    hid::UNKNOWN,
    hid::LEFT_GUI,
    hid::RIGHT_GUI,
    hid::APPLICATION,
    hid::UNKNOWN,
    hid::UNKNOWN,
    // 0x60
    hid::UNKNOWN,
    hid::UNKNOWN,
    hid::UNKNOWN,
    hid::UNKNOWN,
    hid::F13,
    hid::F14,
    hid::F15,
    hid::F16,
    hid::F17,
    hid::F18,
    hid::F19,
    hid::UNKNOWN,
    hid::UNKNOWN,
    hid::UNKNOWN,
    hid::UNKNOWN,
    hid::UNKNOWN,
    // 0x70
    hid::INTERNATIONAL_2,
    hid::UNKNOWN,
    hid::UNKNOWN,
    hid::INTERNATIONAL_1,
    hid::UNKNOWN,
    hid::UNKNOWN,
    hid::UNKNOWN,
    hid::UNKNOWN,
    hid::UNKNOWN,
    hid::INTERNATIONAL_4,
    hid::UNKNOWN,
    hid::INTERNATIONAL_5,
    hid::UNKNOWN,
    hid::INTERNATIONAL_3,
    hid::UNKNOWN,
    hid::UNKNOWN,
];

/// (alias, target): the alias gets the target's slot moved into the extended range.
const EXTENDED_ALIASES: [(NativeScancode, NativeScancode); 4] = [
    (hid::KP_ENTER, hid::RETURN),
    (hid::RIGHT_ALT, hid::LEFT_ALT),
    (hid::RIGHT_CTRL, hid::LEFT_CTRL),
    (hid::KP_DIVIDE, hid::SLASH),
];

/// (keypad key, target): the keypad key takes the target's slot and the
/// target moves into the extended range.
const NON_EXTENDED_ALIASES: [(NativeScancode, NativeScancode); 11] = [
    (hid::KP_7, hid::HOME),
    (hid::KP_8, hid::UP),
    (hid::KP_9, hid::PAGE_UP),
    (hid::KP_4, hid::LEFT),
    (hid::KP_6, hid::RIGHT),
    (hid::KP_1, hid::END),
    (hid::KP_2, hid::DOWN),
    (hid::KP_3, hid::PAGE_DOWN),
    (hid::KP_0, hid::INSERT),
    (hid::KP_PERIOD, hid::DELETE),
    (hid::KP_MULTIPLY, hid::PRINT_SCREEN),
];

/// Native -> logical lookup table shared by every backend.
#[derive(Debug, Clone)]
pub struct ScancodeTable {
    native_to_logical: [LogicalScancode; NATIVE_TABLE_SIZE],
}

impl ScancodeTable {
    pub fn new() -> Self {
        let mut native_to_logical = [0; NATIVE_TABLE_SIZE];

        for (logical, &native) in LOGICAL_TO_NATIVE.iter().enumerate() {
            // Unknown slots would otherwise all claim native code 0.
            if native != hid::UNKNOWN {
                native_to_logical[native as usize] = logical as LogicalScancode;
            }
        }

        for &(alias, target) in EXTENDED_ALIASES.iter() {
            native_to_logical[alias as usize] =
                native_to_logical[target as usize] + EXTENDED_OFFSET;
        }

        for &(keypad, target) in NON_EXTENDED_ALIASES.iter() {
            native_to_logical[keypad as usize] = native_to_logical[target as usize];
            native_to_logical[target as usize] += EXTENDED_OFFSET;
        }

        Self { native_to_logical }
    }

    /// Native code -> logical code. Out of range or unmapped codes give 0.
    pub fn translate(&self, native: NativeScancode) -> LogicalScancode {
        self.native_to_logical
            .get(native as usize)
            .copied()
            .unwrap_or(0)
    }

    /// Logical code -> first native code mapping to it, 0 when none does.
    ///
    /// Linear search: only display-name lookups need this direction.
    pub fn untranslate(&self, logical: LogicalScancode) -> NativeScancode {
        self.native_to_logical
            .iter()
            .position(|&l| l == logical)
            .map(|native| native as NativeScancode)
            .unwrap_or(hid::UNKNOWN)
    }

    pub fn key_name(&self, logical: LogicalScancode) -> &'static str {
        hid::name(self.untranslate(logical))
    }
}

impl Default for ScancodeTable {
    fn default() -> Self {
        Self::new()
    }
}
