// Native key codes: USB-HID keyboard usage ids.
//
// Every native layer reports keys in this space so the scancode table can be
// shared across backends. The values match the HID usage tables (and SDL's
// scancode numbering), which keeps saved bindings valid across winit updates.

pub type NativeScancode = u16;

pub const UNKNOWN: NativeScancode = 0;

// Letters (0x04 - 0x1D)
pub const A: NativeScancode = 4;
pub const B: NativeScancode = 5;
pub const C: NativeScancode = 6;
pub const D: NativeScancode = 7;
pub const E: NativeScancode = 8;
pub const F: NativeScancode = 9;
pub const G: NativeScancode = 10;
pub const H: NativeScancode = 11;
pub const I: NativeScancode = 12;
pub const J: NativeScancode = 13;
pub const K: NativeScancode = 14;
pub const L: NativeScancode = 15;
pub const M: NativeScancode = 16;
pub const N: NativeScancode = 17;
pub const O: NativeScancode = 18;
pub const P: NativeScancode = 19;
pub const Q: NativeScancode = 20;
pub const R: NativeScancode = 21;
pub const S: NativeScancode = 22;
pub const T: NativeScancode = 23;
pub const U: NativeScancode = 24;
pub const V: NativeScancode = 25;
pub const W: NativeScancode = 26;
pub const X: NativeScancode = 27;
pub const Y: NativeScancode = 28;
pub const Z: NativeScancode = 29;

// Digits (0x1E - 0x27, 1 through 9 then 0)
pub const DIGIT_1: NativeScancode = 30;
pub const DIGIT_2: NativeScancode = 31;
pub const DIGIT_3: NativeScancode = 32;
pub const DIGIT_4: NativeScancode = 33;
pub const DIGIT_5: NativeScancode = 34;
pub const DIGIT_6: NativeScancode = 35;
pub const DIGIT_7: NativeScancode = 36;
pub const DIGIT_8: NativeScancode = 37;
pub const DIGIT_9: NativeScancode = 38;
pub const DIGIT_0: NativeScancode = 39;

pub const RETURN: NativeScancode = 40;
pub const ESCAPE: NativeScancode = 41;
pub const BACKSPACE: NativeScancode = 42;
pub const TAB: NativeScancode = 43;
pub const SPACE: NativeScancode = 44;

// Symbols/Punctuation
pub const MINUS: NativeScancode = 45;
pub const EQUALS: NativeScancode = 46;
pub const LEFT_BRACKET: NativeScancode = 47;
pub const RIGHT_BRACKET: NativeScancode = 48;
pub const BACKSLASH: NativeScancode = 49;
pub const NON_US_HASH: NativeScancode = 50;
pub const SEMICOLON: NativeScancode = 51;
pub const APOSTROPHE: NativeScancode = 52;
pub const GRAVE: NativeScancode = 53;
pub const COMMA: NativeScancode = 54;
pub const PERIOD: NativeScancode = 55;
pub const SLASH: NativeScancode = 56;
pub const CAPS_LOCK: NativeScancode = 57;

// Function keys F1 - F12
pub const F1: NativeScancode = 58;
pub const F2: NativeScancode = 59;
pub const F3: NativeScancode = 60;
pub const F4: NativeScancode = 61;
pub const F5: NativeScancode = 62;
pub const F6: NativeScancode = 63;
pub const F7: NativeScancode = 64;
pub const F8: NativeScancode = 65;
pub const F9: NativeScancode = 66;
pub const F10: NativeScancode = 67;
pub const F11: NativeScancode = 68;
pub const F12: NativeScancode = 69;

// Navigation block
pub const PRINT_SCREEN: NativeScancode = 70;
pub const SCROLL_LOCK: NativeScancode = 71;
pub const PAUSE: NativeScancode = 72;
pub const INSERT: NativeScancode = 73;
pub const HOME: NativeScancode = 74;
pub const PAGE_UP: NativeScancode = 75;
pub const DELETE: NativeScancode = 76;
pub const END: NativeScancode = 77;
pub const PAGE_DOWN: NativeScancode = 78;
pub const RIGHT: NativeScancode = 79;
pub const LEFT: NativeScancode = 80;
pub const DOWN: NativeScancode = 81;
pub const UP: NativeScancode = 82;

// Keypad
pub const NUM_LOCK: NativeScancode = 83;
pub const KP_DIVIDE: NativeScancode = 84;
pub const KP_MULTIPLY: NativeScancode = 85;
pub const KP_MINUS: NativeScancode = 86;
pub const KP_PLUS: NativeScancode = 87;
pub const KP_ENTER: NativeScancode = 88;
pub const KP_1: NativeScancode = 89;
pub const KP_2: NativeScancode = 90;
pub const KP_3: NativeScancode = 91;
pub const KP_4: NativeScancode = 92;
pub const KP_5: NativeScancode = 93;
pub const KP_6: NativeScancode = 94;
pub const KP_7: NativeScancode = 95;
pub const KP_8: NativeScancode = 96;
pub const KP_9: NativeScancode = 97;
pub const KP_0: NativeScancode = 98;
pub const KP_PERIOD: NativeScancode = 99;

pub const NON_US_BACKSLASH: NativeScancode = 100;
pub const APPLICATION: NativeScancode = 101;
pub const KP_EQUALS: NativeScancode = 103;

// Function keys F13 - F24
pub const F13: NativeScancode = 104;
pub const F14: NativeScancode = 105;
pub const F15: NativeScancode = 106;
pub const F16: NativeScancode = 107;
pub const F17: NativeScancode = 108;
pub const F18: NativeScancode = 109;
pub const F19: NativeScancode = 110;
pub const F20: NativeScancode = 111;
pub const F21: NativeScancode = 112;
pub const F22: NativeScancode = 113;
pub const F23: NativeScancode = 114;
pub const F24: NativeScancode = 115;

// International
pub const INTERNATIONAL_1: NativeScancode = 135;
pub const INTERNATIONAL_2: NativeScancode = 136;
pub const INTERNATIONAL_3: NativeScancode = 137;
pub const INTERNATIONAL_4: NativeScancode = 138;
pub const INTERNATIONAL_5: NativeScancode = 139;

// Modifiers (0xE0 - 0xE7)
pub const LEFT_CTRL: NativeScancode = 224;
pub const LEFT_SHIFT: NativeScancode = 225;
pub const LEFT_ALT: NativeScancode = 226;
pub const LEFT_GUI: NativeScancode = 227;
pub const RIGHT_CTRL: NativeScancode = 228;
pub const RIGHT_SHIFT: NativeScancode = 229;
pub const RIGHT_ALT: NativeScancode = 230;
pub const RIGHT_GUI: NativeScancode = 231;

/// Convert a winit physical key code to its HID usage id.
/// Returns None for keys without a HID usage.
pub fn from_winit(key: winit::keyboard::KeyCode) -> Option<NativeScancode> {
    use winit::keyboard::KeyCode;

    let code = match key {
        // Letters
        KeyCode::KeyA => A,
        KeyCode::KeyB => B,
        KeyCode::KeyC => C,
        KeyCode::KeyD => D,
        KeyCode::KeyE => E,
        KeyCode::KeyF => F,
        KeyCode::KeyG => G,
        KeyCode::KeyH => H,
        KeyCode::KeyI => I,
        KeyCode::KeyJ => J,
        KeyCode::KeyK => K,
        KeyCode::KeyL => L,
        KeyCode::KeyM => M,
        KeyCode::KeyN => N,
        KeyCode::KeyO => O,
        KeyCode::KeyP => P,
        KeyCode::KeyQ => Q,
        KeyCode::KeyR => R,
        KeyCode::KeyS => S,
        KeyCode::KeyT => T,
        KeyCode::KeyU => U,
        KeyCode::KeyV => V,
        KeyCode::KeyW => W,
        KeyCode::KeyX => X,
        KeyCode::KeyY => Y,
        KeyCode::KeyZ => Z,

        // Digits
        KeyCode::Digit1 => DIGIT_1,
        KeyCode::Digit2 => DIGIT_2,
        KeyCode::Digit3 => DIGIT_3,
        KeyCode::Digit4 => DIGIT_4,
        KeyCode::Digit5 => DIGIT_5,
        KeyCode::Digit6 => DIGIT_6,
        KeyCode::Digit7 => DIGIT_7,
        KeyCode::Digit8 => DIGIT_8,
        KeyCode::Digit9 => DIGIT_9,
        KeyCode::Digit0 => DIGIT_0,

        KeyCode::Enter => RETURN,
        KeyCode::Escape => ESCAPE,
        KeyCode::Backspace => BACKSPACE,
        KeyCode::Tab => TAB,
        KeyCode::Space => SPACE,

        // Symbols
        KeyCode::Minus => MINUS,
        KeyCode::Equal => EQUALS,
        KeyCode::BracketLeft => LEFT_BRACKET,
        KeyCode::BracketRight => RIGHT_BRACKET,
        KeyCode::Backslash => BACKSLASH,
        KeyCode::Semicolon => SEMICOLON,
        KeyCode::Quote => APOSTROPHE,
        KeyCode::Backquote => GRAVE,
        KeyCode::Comma => COMMA,
        KeyCode::Period => PERIOD,
        KeyCode::Slash => SLASH,
        KeyCode::CapsLock => CAPS_LOCK,

        // Function keys
        KeyCode::F1 => F1,
        KeyCode::F2 => F2,
        KeyCode::F3 => F3,
        KeyCode::F4 => F4,
        KeyCode::F5 => F5,
        KeyCode::F6 => F6,
        KeyCode::F7 => F7,
        KeyCode::F8 => F8,
        KeyCode::F9 => F9,
        KeyCode::F10 => F10,
        KeyCode::F11 => F11,
        KeyCode::F12 => F12,
        KeyCode::F13 => F13,
        KeyCode::F14 => F14,
        KeyCode::F15 => F15,
        KeyCode::F16 => F16,
        KeyCode::F17 => F17,
        KeyCode::F18 => F18,
        KeyCode::F19 => F19,
        KeyCode::F20 => F20,
        KeyCode::F21 => F21,
        KeyCode::F22 => F22,
        KeyCode::F23 => F23,
        KeyCode::F24 => F24,

        // Navigation
        KeyCode::PrintScreen => PRINT_SCREEN,
        KeyCode::ScrollLock => SCROLL_LOCK,
        KeyCode::Pause => PAUSE,
        KeyCode::Insert => INSERT,
        KeyCode::Home => HOME,
        KeyCode::PageUp => PAGE_UP,
        KeyCode::Delete => DELETE,
        KeyCode::End => END,
        KeyCode::PageDown => PAGE_DOWN,
        KeyCode::ArrowRight => RIGHT,
        KeyCode::ArrowLeft => LEFT,
        KeyCode::ArrowDown => DOWN,
        KeyCode::ArrowUp => UP,

        // Keypad
        KeyCode::NumLock => NUM_LOCK,
        KeyCode::NumpadDivide => KP_DIVIDE,
        KeyCode::NumpadMultiply => KP_MULTIPLY,
        KeyCode::NumpadSubtract => KP_MINUS,
        KeyCode::NumpadAdd => KP_PLUS,
        KeyCode::NumpadEnter => KP_ENTER,
        KeyCode::Numpad1 => KP_1,
        KeyCode::Numpad2 => KP_2,
        KeyCode::Numpad3 => KP_3,
        KeyCode::Numpad4 => KP_4,
        KeyCode::Numpad5 => KP_5,
        KeyCode::Numpad6 => KP_6,
        KeyCode::Numpad7 => KP_7,
        KeyCode::Numpad8 => KP_8,
        KeyCode::Numpad9 => KP_9,
        KeyCode::Numpad0 => KP_0,
        KeyCode::NumpadDecimal => KP_PERIOD,
        KeyCode::NumpadEqual => KP_EQUALS,

        KeyCode::IntlBackslash => NON_US_BACKSLASH,
        KeyCode::ContextMenu => APPLICATION,

        // International
        KeyCode::IntlRo => INTERNATIONAL_1,
        KeyCode::KanaMode => INTERNATIONAL_2,
        KeyCode::IntlYen => INTERNATIONAL_3,
        KeyCode::Convert => INTERNATIONAL_4,
        KeyCode::NonConvert => INTERNATIONAL_5,

        // Modifiers
        KeyCode::ControlLeft => LEFT_CTRL,
        KeyCode::ShiftLeft => LEFT_SHIFT,
        KeyCode::AltLeft => LEFT_ALT,
        KeyCode::SuperLeft => LEFT_GUI,
        KeyCode::ControlRight => RIGHT_CTRL,
        KeyCode::ShiftRight => RIGHT_SHIFT,
        KeyCode::AltRight => RIGHT_ALT,
        KeyCode::SuperRight => RIGHT_GUI,

        _ => return None,
    };
    Some(code)
}

/// Human readable name of a HID usage id, empty for unnamed codes.
pub fn name(code: NativeScancode) -> &'static str {
    match code {
        A => "A",
        B => "B",
        C => "C",
        D => "D",
        E => "E",
        F => "F",
        G => "G",
        H => "H",
        I => "I",
        J => "J",
        K => "K",
        L => "L",
        M => "M",
        N => "N",
        O => "O",
        P => "P",
        Q => "Q",
        R => "R",
        S => "S",
        T => "T",
        U => "U",
        V => "V",
        W => "W",
        X => "X",
        Y => "Y",
        Z => "Z",

        DIGIT_1 => "1",
        DIGIT_2 => "2",
        DIGIT_3 => "3",
        DIGIT_4 => "4",
        DIGIT_5 => "5",
        DIGIT_6 => "6",
        DIGIT_7 => "7",
        DIGIT_8 => "8",
        DIGIT_9 => "9",
        DIGIT_0 => "0",

        RETURN => "Return",
        ESCAPE => "Escape",
        BACKSPACE => "Backspace",
        TAB => "Tab",
        SPACE => "Space",

        MINUS => "-",
        EQUALS => "=",
        LEFT_BRACKET => "[",
        RIGHT_BRACKET => "]",
        BACKSLASH => "\\",
        NON_US_HASH => "#",
        SEMICOLON => ";",
        APOSTROPHE => "'",
        GRAVE => "`",
        COMMA => ",",
        PERIOD => ".",
        SLASH => "/",
        CAPS_LOCK => "CapsLock",

        F1 => "F1",
        F2 => "F2",
        F3 => "F3",
        F4 => "F4",
        F5 => "F5",
        F6 => "F6",
        F7 => "F7",
        F8 => "F8",
        F9 => "F9",
        F10 => "F10",
        F11 => "F11",
        F12 => "F12",
        F13 => "F13",
        F14 => "F14",
        F15 => "F15",
        F16 => "F16",
        F17 => "F17",
        F18 => "F18",
        F19 => "F19",
        F20 => "F20",
        F21 => "F21",
        F22 => "F22",
        F23 => "F23",
        F24 => "F24",

        PRINT_SCREEN => "PrintScreen",
        SCROLL_LOCK => "ScrollLock",
        PAUSE => "Pause",
        INSERT => "Insert",
        HOME => "Home",
        PAGE_UP => "PageUp",
        DELETE => "Delete",
        END => "End",
        PAGE_DOWN => "PageDown",
        RIGHT => "Right",
        LEFT => "Left",
        DOWN => "Down",
        UP => "Up",

        NUM_LOCK => "Numlock",
        KP_DIVIDE => "Keypad /",
        KP_MULTIPLY => "Keypad *",
        KP_MINUS => "Keypad -",
        KP_PLUS => "Keypad +",
        KP_ENTER => "Keypad Enter",
        KP_1 => "Keypad 1",
        KP_2 => "Keypad 2",
        KP_3 => "Keypad 3",
        KP_4 => "Keypad 4",
        KP_5 => "Keypad 5",
        KP_6 => "Keypad 6",
        KP_7 => "Keypad 7",
        KP_8 => "Keypad 8",
        KP_9 => "Keypad 9",
        KP_0 => "Keypad 0",
        KP_PERIOD => "Keypad .",
        KP_EQUALS => "Keypad =",

        NON_US_BACKSLASH => "\\",
        APPLICATION => "Application",

        INTERNATIONAL_1 => "International 1",
        INTERNATIONAL_2 => "International 2",
        INTERNATIONAL_3 => "International 3",
        INTERNATIONAL_4 => "International 4",
        INTERNATIONAL_5 => "International 5",

        LEFT_CTRL => "Left Ctrl",
        LEFT_SHIFT => "Left Shift",
        LEFT_ALT => "Left Alt",
        LEFT_GUI => "Left GUI",
        RIGHT_CTRL => "Right Ctrl",
        RIGHT_SHIFT => "Right Shift",
        RIGHT_ALT => "Right Alt",
        RIGHT_GUI => "Right GUI",

        _ => "",
    }
}
