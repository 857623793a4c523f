use glam::{Vec2, Vec3};
use serde_json::json;
use ship_input::controller::Controller;
use ship_input::device::{GamepadGuid, PhysicalDeviceType};
use ship_input::factory::{MappingFactory, DEFAULT_KEYBOARD_BUTTONS};
use ship_input::mapping::axis::{
    AxisDirectionMapping, Direction, GamepadAxisDirectionMapping, KeyboardAxisDirectionMapping, Stick,
};
use ship_input::mapping::button::{AxisDirection, GamepadAxisButtonMapping, KeyboardButtonMapping, MouseButtonMapping};
use ship_input::mapping::gyro::{GamepadGyroMapping, GyroMapping, MouseGyroMapping};
use ship_input::mapping::rumble::{GamepadRumbleMapping, RumbleMapping, RumbleOutput};
use ship_input::mapping::ControllerInputMapping;
use ship_input::pad::{BTN_A, BTN_B, BTN_START, BTN_Z, MAX_STICK};
use ship_input::raw::{GamepadAxis, GamepadButton, RawInputState};
use ship_window::config::{JsonConfig, SharedConfig};

const GUID: GamepadGuid = GamepadGuid([0xab; 16]);

fn config() -> SharedConfig {
    JsonConfig::in_memory().into_shared()
}

fn stored(config: &SharedConfig, key: &str) -> Option<serde_json::Value> {
    config.borrow().get_value(key).cloned()
}

fn keyboard_stick(config: &SharedConfig, controller: &mut Controller) {
    for (direction, key) in [
        (Direction::Up, 0x11),
        (Direction::Down, 0x1F),
        (Direction::Left, 0x1E),
        (Direction::Right, 0x20),
    ] {
        controller.add_axis_direction_mapping(Box::new(KeyboardAxisDirectionMapping::new(
            config.clone(),
            0,
            Stick::Left,
            direction,
            key,
        )));
    }
}

#[test]
fn buttons_with_shared_bitmask_are_ored() {
    let config = config();
    let mut controller = Controller::new(0, config.clone());
    controller.add_button_mapping(Box::new(KeyboardButtonMapping::new(config.clone(), 0, BTN_A, 0x2D)));
    controller.add_button_mapping(Box::new(MouseButtonMapping::new(config.clone(), 0, BTN_A, 0)));
    controller.add_button_mapping(Box::new(KeyboardButtonMapping::new(config.clone(), 0, BTN_B, 0x2E)));

    let mut raw = RawInputState::new();
    assert_eq!(controller.read_pad(&raw).button, 0);

    raw.set_mouse_button(0, true);
    let pad = controller.read_pad(&raw);
    assert!(pad.is_pressed(BTN_A));
    assert!(!pad.is_pressed(BTN_B));

    raw.set_key(0x2E, true);
    assert_eq!(controller.read_pad(&raw).button, BTN_A | BTN_B);
    assert_eq!(controller.button_mappings(BTN_A).count(), 2);
}

#[test]
fn stick_directions_combine_with_radial_limit() {
    let config = config();
    let mut controller = Controller::new(0, config.clone());
    keyboard_stick(&config, &mut controller);

    let mut raw = RawInputState::new();
    raw.set_key(0x11, true);
    let pad = controller.read_pad(&raw);
    assert_eq!((pad.stick_x, pad.stick_y), (0, MAX_STICK as i8));

    raw.set_key(0x20, true);
    let pad = controller.read_pad(&raw);
    assert_eq!((pad.stick_x, pad.stick_y), (60, 60));

    // Opposite directions cancel.
    raw.set_key(0x1F, true);
    let pad = controller.read_pad(&raw);
    assert_eq!((pad.stick_x, pad.stick_y), (85, 0));
    assert_eq!((pad.right_stick_x, pad.right_stick_y), (0, 0));
}

#[test]
fn direction_sum_saturates() {
    let config = config();
    let mut controller = Controller::new(0, config.clone());
    controller.add_axis_direction_mapping(Box::new(KeyboardAxisDirectionMapping::new(
        config.clone(),
        0,
        Stick::Right,
        Direction::Left,
        0x1E,
    )));
    let mut stick = GamepadAxisDirectionMapping::new(
        config.clone(),
        0,
        Stick::Right,
        Direction::Left,
        GUID,
        GamepadAxis::RightX,
        AxisDirection::Negative,
    );
    stick.set_deadzone_percent(0);
    controller.add_axis_direction_mapping(Box::new(stick));

    let mut raw = RawInputState::new();
    raw.set_key(0x1E, true);
    raw.gamepad_mut(GUID).set_axis(GamepadAxis::RightX, -1.0);
    let pad = controller.read_pad(&raw);
    assert_eq!((pad.right_stick_x, pad.right_stick_y), (-85, 0));
}

#[test]
fn add_persists_record_and_port_lists() {
    let config = config();
    let mut controller = Controller::new(1, config.clone());
    controller.add_button_mapping(Box::new(KeyboardButtonMapping::new(config.clone(), 1, BTN_START, 0x1C)));
    controller.add_button_mapping(Box::new(KeyboardButtonMapping::new(config.clone(), 1, BTN_START, 0x39)));

    assert_eq!(
        stored(&config, "Controllers.Port2.Buttons.4096.MappingIds"),
        Some(json!("P1-B4096-KB28,P1-B4096-KB57"))
    );
    assert!(config.borrow().contains("Controllers.ButtonMappings.P1-B4096-KB28"));
    assert_eq!(stored(&config, "Controllers.Port2.LeftStick.Up.MappingIds"), Some(json!("")));
}

#[test]
fn remove_erases_but_take_keeps_record() {
    let config = config();
    let mut controller = Controller::new(0, config.clone());
    controller.add_button_mapping(Box::new(KeyboardButtonMapping::new(config.clone(), 0, BTN_A, 0x2D)));
    controller.add_button_mapping(Box::new(KeyboardButtonMapping::new(config.clone(), 0, BTN_B, 0x2E)));

    assert!(controller.remove_button_mapping("P0-B32768-KB45"));
    assert!(!controller.remove_button_mapping("P0-B32768-KB45"));
    assert!(!config.borrow().contains("Controllers.ButtonMappings.P0-B32768-KB45"));
    assert_eq!(stored(&config, "Controllers.Port1.Buttons.32768"), None);

    let taken = controller.take_button_mapping("P0-B16384-KB46");
    assert!(taken.is_some());
    assert!(config.borrow().contains("Controllers.ButtonMappings.P0-B16384-KB46"));
    assert!(controller.is_empty());
}

#[test]
fn mapping_moves_between_ports_with_calibration() {
    let config = config();
    let mut first = Controller::new(0, config.clone());
    let mut second = Controller::new(1, config.clone());

    let mut mapping =
        GamepadAxisButtonMapping::new(config.clone(), 0, BTN_Z, GUID, GamepadAxis::LeftTrigger, AxisDirection::Positive);
    mapping.set_threshold_percent(20);
    let id = mapping.mapping_id().to_string();
    first.add_button_mapping(Box::new(mapping));

    let moved = first.take_button_mapping(&id).unwrap();
    second.add_button_mapping(moved);

    let new_id = format!("P1-B8192-{}-GALeftTrigger+", GUID);
    let bound = second.button_mappings(BTN_Z).next().unwrap();
    assert_eq!(bound.port_index(), 1);
    assert_eq!(bound.mapping_id(), new_id);
    assert_eq!(stored(&config, "Controllers.Port1.Buttons.8192"), None);
    assert_eq!(stored(&config, "Controllers.Port2.Buttons.8192.MappingIds"), Some(json!(new_id)));
    assert!(!config.borrow().contains(&format!("Controllers.ButtonMappings.{}", id)));

    let reloaded = MappingFactory::new(config.clone()).load_controller(1);
    let mut raw = RawInputState::new();
    raw.gamepad_mut(GUID).set_axis(GamepadAxis::LeftTrigger, 0.25);
    assert!(reloaded.read_pad(&raw).is_pressed(BTN_Z));
}

#[test]
fn old_port_rebinding_leaves_moved_mapping_alone() {
    let config = config();
    let mut first = Controller::new(0, config.clone());
    let mut second = Controller::new(1, config.clone());

    let mut gyro = MouseGyroMapping::new(config.clone(), 0);
    gyro.set_sensitivity(175);
    first.set_gyro_mapping(Some(Box::new(gyro)));
    second.set_gyro_mapping(first.take_gyro_mapping());

    let mut replacement = MouseGyroMapping::new(config.clone(), 0);
    replacement.set_sensitivity(50);
    first.set_gyro_mapping(Some(Box::new(replacement)));

    let moved_id = second.gyro_mapping().unwrap().mapping_id().to_string();
    assert_eq!(moved_id, "P1-G-Mouse");
    assert_eq!(first.gyro_mapping().unwrap().mapping_id(), "P0-G-Mouse");

    let factory = MappingFactory::new(config.clone());
    let reloaded = factory.load_controller(1);
    assert_eq!(reloaded.gyro_mapping().map(|g| g.sensitivity_percent()), Some(175));

    first.clear();
    let reloaded = factory.load_controller(1);
    assert_eq!(reloaded.gyro_mapping().map(|g| g.sensitivity_percent()), Some(175));
    assert_eq!(stored(&config, "Controllers.Port2.Gyro.MappingId"), Some(json!(moved_id)));
}

#[test]
fn fresh_mapping_added_elsewhere_keeps_other_port_record() {
    let config = config();
    let mut first = Controller::new(0, config.clone());
    let mut second = Controller::new(1, config.clone());
    first.add_button_mapping(Box::new(KeyboardButtonMapping::new(config.clone(), 0, BTN_A, 0x2D)));
    second.add_button_mapping(Box::new(KeyboardButtonMapping::new(config.clone(), 0, BTN_A, 0x2D)));

    assert!(config.borrow().contains("Controllers.ButtonMappings.P0-B32768-KB45"));
    assert!(config.borrow().contains("Controllers.ButtonMappings.P1-B32768-KB45"));
    assert_eq!(MappingFactory::new(config.clone()).load_controller(0).mapping_count(), 1);
}

#[test]
fn adding_same_binding_twice_keeps_one() {
    let config = config();
    let mut controller = Controller::new(0, config.clone());
    controller.add_button_mapping(Box::new(KeyboardButtonMapping::new(config.clone(), 0, BTN_A, 0x2D)));
    controller.add_button_mapping(Box::new(KeyboardButtonMapping::new(config.clone(), 0, BTN_A, 0x2D)));
    keyboard_stick(&config, &mut controller);
    keyboard_stick(&config, &mut controller);
    controller.add_rumble_mapping(Box::new(GamepadRumbleMapping::new(config.clone(), 0, GUID)));
    controller.add_rumble_mapping(Box::new(GamepadRumbleMapping::new(config.clone(), 0, GUID)));

    assert_eq!(controller.button_mappings(BTN_A).count(), 1);
    assert_eq!(controller.mapping_count(), 6);
    assert_eq!(
        stored(&config, "Controllers.Port1.Buttons.32768.MappingIds"),
        Some(json!("P0-B32768-KB45"))
    );
    assert_eq!(stored(&config, "Controllers.Port1.LeftStick.Up.MappingIds"), Some(json!("P0-S0-D2-KB17")));

    assert!(controller.remove_button_mapping("P0-B32768-KB45"));
    assert_eq!(controller.button_mappings(BTN_A).count(), 0);
    let reloaded = MappingFactory::new(config.clone()).load_controller(0);
    assert_eq!(reloaded.button_mappings(BTN_A).count(), 0);
}

#[test]
fn duplicate_saved_ids_load_once() {
    let config = config();
    let mut controller = Controller::new(1, config.clone());
    controller.add_button_mapping(Box::new(KeyboardButtonMapping::new(config.clone(), 1, BTN_B, 0x2E)));
    config
        .borrow_mut()
        .set_value("Controllers.Port2.Buttons.16384.MappingIds", json!("P1-B16384-KB46,P1-B16384-KB46"));

    let reloaded = MappingFactory::new(config.clone()).load_controller(1);
    assert_eq!(reloaded.button_mappings(BTN_B).count(), 1);
}

#[test]
fn clear_erases_every_record() {
    let config = config();
    let mut controller = Controller::new(0, config.clone());
    keyboard_stick(&config, &mut controller);
    controller.add_button_mapping(Box::new(KeyboardButtonMapping::new(config.clone(), 0, BTN_A, 0x2D)));
    controller.set_gyro_mapping(Some(Box::new(MouseGyroMapping::new(config.clone(), 0))));
    controller.add_rumble_mapping(Box::new(GamepadRumbleMapping::new(config.clone(), 0, GUID)));
    assert_eq!(controller.mapping_count(), 7);

    controller.clear();
    assert!(controller.is_empty());
    for section in ["ButtonMappings", "AxisDirectionMappings", "GyroMappings", "RumbleMappings"] {
        assert_eq!(stored(&config, &format!("Controllers.{}", section)), Some(json!({})), "{}", section);
    }
    assert_eq!(stored(&config, "Controllers.Port1.Gyro"), Some(json!({})));
}

#[test]
fn replacing_gyro_erases_previous() {
    let config = config();
    let mut controller = Controller::new(0, config.clone());
    controller.set_gyro_mapping(Some(Box::new(MouseGyroMapping::new(config.clone(), 0))));
    controller.set_gyro_mapping(Some(Box::new(GamepadGyroMapping::new(config.clone(), 0, GUID))));

    assert!(!config.borrow().contains("Controllers.GyroMappings.P0-G-Mouse"));
    let gyro_id = format!("P0-G-{}", GUID);
    assert_eq!(stored(&config, "Controllers.Port1.Gyro.MappingId"), Some(json!(gyro_id)));

    let mut raw = RawInputState::new();
    raw.gamepad_mut(GUID).set_gyro(Vec3::new(0.5, 0.25, 0.0));
    controller.gyro_mapping_mut().unwrap().set_sensitivity(200);
    assert_eq!(controller.read_pad(&raw).gyro, Vec2::new(1.0, 0.5));
}

#[test]
fn factory_rebuilds_saved_port() {
    let config = config();
    let mut controller = Controller::new(2, config.clone());
    controller.add_button_mapping(Box::new(MouseButtonMapping::new(config.clone(), 2, BTN_B, 1)));
    let mut stick = GamepadAxisDirectionMapping::new(
        config.clone(),
        2,
        Stick::Left,
        Direction::Down,
        GUID,
        GamepadAxis::LeftY,
        AxisDirection::Negative,
    );
    stick.set_deadzone_percent(50);
    controller.add_axis_direction_mapping(Box::new(stick));
    let mut gyro = MouseGyroMapping::new(config.clone(), 2);
    gyro.set_sensitivity(75);
    controller.set_gyro_mapping(Some(Box::new(gyro)));
    let mut rumble = GamepadRumbleMapping::new(config.clone(), 2, GUID);
    rumble.set_high_frequency_intensity(90);
    controller.add_rumble_mapping(Box::new(rumble));

    let reloaded = MappingFactory::new(config.clone()).load_controller(2);
    assert_eq!(reloaded.mapping_count(), 4);
    assert_eq!(reloaded.gyro_mapping().unwrap().sensitivity_percent(), 75);
    assert_eq!(
        reloaded.rumble_mappings().next().unwrap().high_frequency_intensity_percent(),
        90
    );
    let axis = reloaded.axis_direction_mappings(Stick::Left, Direction::Down).next().unwrap();
    assert_eq!(axis.physical_device_type(), PhysicalDeviceType::Gamepad(GUID));

    let mut raw = RawInputState::new();
    raw.set_mouse_button(1, true);
    raw.gamepad_mut(GUID).set_axis(GamepadAxis::LeftY, -1.0);
    let pad = reloaded.read_pad(&raw);
    assert!(pad.is_pressed(BTN_B));
    assert_eq!(pad.stick_y, -85);
}

#[test]
fn malformed_records_are_skipped() {
    let config = config();
    {
        let mut cfg = config.borrow_mut();
        cfg.set_string("Controllers.Port2.Buttons.32768.MappingIds", "good,broken,missing");
        cfg.set_value(
            "Controllers.ButtonMappings.good",
            json!({ "Type": "KeyboardButtonMapping", "Bitmask": 32768, "KeyboardScancode": 45 }),
        );
        cfg.set_value("Controllers.ButtonMappings.broken", json!({ "Type": "TeleportMapping" }));
    }

    let factory = MappingFactory::new(config.clone());
    assert!(factory.button_from_config(1, "broken").is_none());
    assert!(factory.button_from_config(1, "missing").is_none());

    let controller = factory.load_controller(1);
    assert_eq!(controller.mapping_count(), 1);
    assert_eq!(controller.button_mappings(BTN_A).next().unwrap().mapping_id(), "good");
}

#[test]
fn first_port_falls_back_to_keyboard_defaults() {
    let config = config();
    let factory = MappingFactory::new(config.clone());

    let controller = factory.load_controller(0);
    assert_eq!(controller.mapping_count(), DEFAULT_KEYBOARD_BUTTONS.len() + 4);
    assert!(config.borrow().contains("Controllers.Port1.Buttons.32768.MappingIds"));

    let mut raw = RawInputState::new();
    raw.set_key(0x1C, true);
    raw.set_key(0x1E, true);
    let pad = controller.read_pad(&raw);
    assert!(pad.is_pressed(BTN_START));
    assert_eq!(pad.stick_x, -85);

    // Other ports start empty.
    assert!(factory.load_controller(3).is_empty());
}

#[test]
fn cleared_first_port_stays_empty() {
    let config = config();
    let factory = MappingFactory::new(config.clone());
    factory.load_controller(0).clear();
    assert!(factory.load_controller(0).is_empty());
}

#[test]
fn capture_prefers_keys_then_mouse_then_gamepad() {
    let factory = MappingFactory::new(config());
    let mut raw = RawInputState::new();
    assert!(factory.button_from_raw(0, BTN_A, &raw).is_none());

    raw.gamepad_mut(GUID).set_axis(GamepadAxis::RightTrigger, 0.9);
    let mapping = factory.button_from_raw(0, BTN_A, &raw).unwrap();
    assert_eq!(mapping.mapping_id(), format!("P0-B32768-{}-GARightTrigger+", GUID));

    raw.gamepad_mut(GUID).set_button(GamepadButton::North, true);
    let mapping = factory.button_from_raw(0, BTN_A, &raw).unwrap();
    assert_eq!(mapping.mapping_id(), format!("P0-B32768-{}-GBNorth", GUID));

    raw.set_mouse_button(2, true);
    let mapping = factory.button_from_raw(0, BTN_A, &raw).unwrap();
    assert_eq!(mapping.physical_device_type(), PhysicalDeviceType::Mouse);

    raw.set_key(0x39, true);
    let mapping = factory.button_from_raw(0, BTN_A, &raw).unwrap();
    assert_eq!(mapping.mapping_id(), "P0-B32768-KB57");
}

#[test]
fn capture_axis_direction_and_gyro() {
    let factory = MappingFactory::new(config());
    let mut raw = RawInputState::new();
    raw.gamepad_mut(GUID).set_axis(GamepadAxis::LeftX, -0.8);

    let axis = factory
        .axis_direction_from_raw(0, Stick::Left, Direction::Left, &raw)
        .unwrap();
    assert_eq!(axis.mapping_id(), format!("P0-S0-D0-{}-GALeftX-", GUID));
    assert!(axis.value(&raw) > 0.7);

    assert!(factory.gyro_from_raw(0, &raw).is_none());
    raw.set_mouse_delta(Vec2::new(3.0, 0.0));
    assert_eq!(factory.gyro_from_raw(0, &raw).unwrap().mapping_id(), "P0-G-Mouse");
    raw.gamepad_mut(GUID).set_gyro(Vec3::new(0.0, 2.0, 0.0));
    assert_eq!(
        factory.gyro_from_raw(0, &raw).unwrap().physical_device_type(),
        PhysicalDeviceType::Gamepad(GUID)
    );
}

#[derive(Default)]
struct RecordingRumble {
    started: Vec<(GamepadGuid, f32, f32)>,
    stopped: Vec<GamepadGuid>,
}

impl RumbleOutput for RecordingRumble {
    fn set_rumble(&mut self, device: GamepadGuid, low_frequency: f32, high_frequency: f32) {
        self.started.push((device, low_frequency, high_frequency));
    }

    fn stop_rumble(&mut self, device: GamepadGuid) {
        self.stopped.push(device);
    }
}

#[test]
fn controller_rumble_reaches_every_mapping() {
    let config = config();
    let factory = MappingFactory::new(config.clone());
    let other = GamepadGuid([1; 16]);
    let mut controller = Controller::new(0, config);
    controller.add_rumble_mapping(factory.rumble_for_gamepad(0, GUID));
    controller.add_rumble_mapping(factory.rumble_for_gamepad(0, other));

    let mut out = RecordingRumble::default();
    controller.start_rumble(&mut out);
    controller.stop_rumble(&mut out);
    assert_eq!(out.started, vec![(GUID, 0.5, 0.5), (other, 0.5, 0.5)]);
    assert_eq!(out.stopped, vec![GUID, other]);

    assert!(controller.remove_rumble_mapping(&format!("P0-R-{}", other)));
    assert_eq!(controller.rumble_mappings().count(), 1);
}
