use proptest::prelude::*;
use ship_window::hid;
use ship_window::scancode::{ScancodeTable, EXTENDED_OFFSET, NATIVE_TABLE_SIZE};

#[test]
fn set1_layout_for_plain_keys() {
    let table = ScancodeTable::new();
    assert_eq!(table.translate(hid::ESCAPE), 0x01);
    assert_eq!(table.translate(hid::RETURN), 0x1C);
    assert_eq!(table.translate(hid::A), 0x1E);
    assert_eq!(table.translate(hid::SPACE), 0x39);
    assert_eq!(table.translate(hid::F12), 0x58);
}

#[test]
fn extended_aliases_sit_above_their_target() {
    let table = ScancodeTable::new();
    assert_eq!(table.translate(hid::KP_ENTER), table.translate(hid::RETURN) + EXTENDED_OFFSET);
    assert_eq!(table.translate(hid::RIGHT_CTRL), 0x1D + EXTENDED_OFFSET);
    assert_eq!(table.translate(hid::RIGHT_ALT), 0x38 + EXTENDED_OFFSET);
    assert_eq!(table.translate(hid::KP_DIVIDE), 0x35 + EXTENDED_OFFSET);
}

#[test]
fn keypad_takes_navigation_slots() {
    let table = ScancodeTable::new();
    // Keypad 7 owns the Home slot, Home moves to the extended range.
    assert_eq!(table.translate(hid::KP_7), 0x47);
    assert_eq!(table.translate(hid::HOME), 0x47 + EXTENDED_OFFSET);
    assert_eq!(table.translate(hid::KP_0), 0x52);
    assert_eq!(table.translate(hid::INSERT), 0x52 + EXTENDED_OFFSET);
    assert_eq!(table.translate(hid::KP_MULTIPLY), 0x37);
    assert_eq!(table.translate(hid::PRINT_SCREEN), 0x37 + EXTENDED_OFFSET);
}

#[test]
fn unknown_and_out_of_range_translate_to_zero() {
    let table = ScancodeTable::new();
    assert_eq!(table.translate(hid::UNKNOWN), 0);
    assert_eq!(table.translate(NATIVE_TABLE_SIZE as u16), 0);
    assert_eq!(table.translate(u16::MAX), 0);
    assert_eq!(table.untranslate(0x7FF), hid::UNKNOWN);
}

#[test]
fn key_names_come_from_the_native_code() {
    let table = ScancodeTable::new();
    assert_eq!(table.key_name(0x1C), "Return");
    assert_eq!(table.key_name(0x1C + EXTENDED_OFFSET), "Keypad Enter");
    assert_eq!(table.key_name(0x47), "Keypad 7");
    assert_eq!(table.key_name(0x47 + EXTENDED_OFFSET), "Home");
    assert_eq!(table.key_name(0x7FF), "");
}

proptest! {
    #[test]
    fn untranslate_inverts_translate(native in 0u16..NATIVE_TABLE_SIZE as u16) {
        let table = ScancodeTable::new();
        let logical = table.translate(native);
        prop_assume!(logical != 0);
        prop_assert_eq!(table.translate(table.untranslate(logical)), logical);
    }

    #[test]
    fn translate_never_panics(native in any::<u16>()) {
        let table = ScancodeTable::new();
        let logical = table.translate(native);
        prop_assert!(logical < 2 * EXTENDED_OFFSET);
    }
}
