use crate::mapping::axis::{AxisDirectionMapping, Direction, Stick};
use crate::mapping::button::ButtonMapping;
use crate::mapping::gyro::GyroMapping;
use crate::mapping::rumble::{RumbleMapping, RumbleOutput};
use crate::mapping::ControllerInputMapping;
use crate::pad::{stick_from_directions, PadState};
use crate::raw::RawInputState;
use serde_json::{Map, Value};
use ship_window::config::{save_logged, SharedConfig};
use std::collections::BTreeMap;

const MAPPING_IDS: &str = "MappingIds";

pub(crate) fn port_key(port: u8) -> String {
    format!("Controllers.Port{}", port + 1)
}

/// Split a persisted id list.
pub(crate) fn parse_ids(value: Option<&Value>) -> Vec<String> {
    value
        .and_then(Value::as_str)
        .map(|ids| ids.split(',').filter(|id| !id.is_empty()).map(str::to_owned).collect())
        .unwrap_or_default()
}

/// Persist `mapping` as bound to `port`. A mapping coming from another port
/// has its old record erased first, so the old port's id is free again.
fn rebind<M: ControllerInputMapping + ?Sized>(mapping: &mut M, port: u8) {
    if mapping.port_index() != port {
        if mapping.identity().is_stored() {
            mapping.erase_from_config();
        }
        mapping.set_port_index(port);
    }
    mapping.save_to_config();
}

/// Remove the entry with `id` from `list`.
fn detach<T: ControllerInputMapping + ?Sized>(list: &mut Vec<Box<T>>, id: &str) -> Option<Box<T>> {
    let index = list.iter().position(|m| m.mapping_id() == id)?;
    Some(list.remove(index))
}

/// All mappings of one console port.
pub struct Controller {
    port: u8,
    config: SharedConfig,
    buttons: BTreeMap<u16, Vec<Box<dyn ButtonMapping>>>,
    sticks: [[Vec<Box<dyn AxisDirectionMapping>>; 4]; 2],
    gyro: Option<Box<dyn GyroMapping>>,
    rumble: Vec<Box<dyn RumbleMapping>>,
}

impl Controller {
    pub fn new(port: u8, config: SharedConfig) -> Self {
        Self {
            port,
            config,
            buttons: BTreeMap::new(),
            sticks: Default::default(),
            gyro: None,
            rumble: Vec::new(),
        }
    }

    pub fn port(&self) -> u8 {
        self.port
    }

    pub fn config(&self) -> &SharedConfig {
        &self.config
    }

    pub fn is_empty(&self) -> bool {
        self.mapping_count() == 0
    }

    pub fn mapping_count(&self) -> usize {
        self.buttons.values().map(Vec::len).sum::<usize>()
            + self.sticks.iter().flatten().map(Vec::len).sum::<usize>()
            + usize::from(self.gyro.is_some())
            + self.rumble.len()
    }

    pub fn button_mappings(&self, bitmask: u16) -> impl Iterator<Item = &dyn ButtonMapping> {
        self.buttons.get(&bitmask).into_iter().flatten().map(|m| m.as_ref())
    }

    pub fn axis_direction_mappings(
        &self,
        stick: Stick,
        direction: Direction,
    ) -> impl Iterator<Item = &dyn AxisDirectionMapping> {
        self.sticks[stick.index()][direction.index()].iter().map(|m| m.as_ref())
    }

    pub fn gyro_mapping(&self) -> Option<&dyn GyroMapping> {
        self.gyro.as_deref()
    }

    pub fn gyro_mapping_mut(&mut self) -> Option<&mut (dyn GyroMapping + 'static)> {
        self.gyro.as_deref_mut()
    }

    pub fn rumble_mappings(&self) -> impl Iterator<Item = &dyn RumbleMapping> {
        self.rumble.iter().map(|m| m.as_ref())
    }

    /// Bind, persisting the mapping record and the port's id lists. A
    /// binding with the same id replaces the existing one.
    pub fn add_button_mapping(&mut self, mut mapping: Box<dyn ButtonMapping>) {
        rebind(mapping.as_mut(), self.port);
        self.attach_button(mapping);
        self.save_port();
    }

    /// Unbind and erase the mapping record.
    pub fn remove_button_mapping(&mut self, id: &str) -> bool {
        match self.take_button_mapping(id) {
            Some(mapping) => {
                mapping.erase_from_config();
                true
            }
            None => false,
        }
    }

    /// Detach without erasing the record, for moving to another port.
    pub fn take_button_mapping(&mut self, id: &str) -> Option<Box<dyn ButtonMapping>> {
        let taken = self.detach_button(id)?;
        self.save_port();
        Some(taken)
    }

    pub fn add_axis_direction_mapping(&mut self, mut mapping: Box<dyn AxisDirectionMapping>) {
        rebind(mapping.as_mut(), self.port);
        self.attach_axis_direction(mapping);
        self.save_port();
    }

    pub fn remove_axis_direction_mapping(&mut self, id: &str) -> bool {
        match self.take_axis_direction_mapping(id) {
            Some(mapping) => {
                mapping.erase_from_config();
                true
            }
            None => false,
        }
    }

    pub fn take_axis_direction_mapping(&mut self, id: &str) -> Option<Box<dyn AxisDirectionMapping>> {
        let taken = self.sticks.iter_mut().flatten().find_map(|list| detach(list, id))?;
        self.save_port();
        Some(taken)
    }

    /// Replace the gyro binding; the previous one is erased.
    pub fn set_gyro_mapping(&mut self, mapping: Option<Box<dyn GyroMapping>>) {
        if let Some(previous) = self.gyro.take() {
            previous.erase_from_config();
        }
        if let Some(mut mapping) = mapping {
            rebind(mapping.as_mut(), self.port);
            self.gyro = Some(mapping);
        }
        self.save_port();
    }

    pub fn take_gyro_mapping(&mut self) -> Option<Box<dyn GyroMapping>> {
        let taken = self.gyro.take()?;
        self.save_port();
        Some(taken)
    }

    pub fn add_rumble_mapping(&mut self, mut mapping: Box<dyn RumbleMapping>) {
        rebind(mapping.as_mut(), self.port);
        self.attach_rumble(mapping);
        self.save_port();
    }

    pub fn remove_rumble_mapping(&mut self, id: &str) -> bool {
        match self.take_rumble_mapping(id) {
            Some(mapping) => {
                mapping.erase_from_config();
                true
            }
            None => false,
        }
    }

    pub fn take_rumble_mapping(&mut self, id: &str) -> Option<Box<dyn RumbleMapping>> {
        let taken = detach(&mut self.rumble, id)?;
        self.save_port();
        Some(taken)
    }

    /// Unbind everything, erasing every record of this port.
    pub fn clear(&mut self) {
        for mapping in std::mem::take(&mut self.buttons).into_values().flatten() {
            mapping.erase_from_config();
        }
        for list in self.sticks.iter_mut().flatten() {
            for mapping in list.drain(..) {
                mapping.erase_from_config();
            }
        }
        if let Some(gyro) = self.gyro.take() {
            gyro.erase_from_config();
        }
        for mapping in self.rumble.drain(..) {
            mapping.erase_from_config();
        }
        self.save_port();
        tracing::info!("Cleared every mapping of port {}", self.port + 1);
    }

    /// Sample the console pad from the current raw input.
    pub fn read_pad(&self, raw: &RawInputState) -> PadState {
        let mut pad = PadState::default();

        for (bitmask, list) in &self.buttons {
            if list.iter().any(|m| m.is_pressed(raw)) {
                pad.button |= bitmask;
            }
        }

        let (x, y) = self.stick(Stick::Left, raw);
        pad.stick_x = x;
        pad.stick_y = y;
        let (x, y) = self.stick(Stick::Right, raw);
        pad.right_stick_x = x;
        pad.right_stick_y = y;

        if let Some(gyro) = &self.gyro {
            pad.gyro = gyro.update_pad(raw);
        }
        pad
    }

    pub fn start_rumble(&self, out: &mut dyn RumbleOutput) {
        for mapping in &self.rumble {
            mapping.start_rumble(out);
        }
    }

    pub fn stop_rumble(&self, out: &mut dyn RumbleOutput) {
        for mapping in &self.rumble {
            mapping.stop_rumble(out);
        }
    }

    fn stick(&self, stick: Stick, raw: &RawInputState) -> (i8, i8) {
        let lists = &self.sticks[stick.index()];
        let direction = |d: Direction| -> f32 {
            lists[d.index()]
                .iter()
                .map(|m| m.value(raw))
                .sum::<f32>()
                .min(1.0)
        };
        stick_from_directions(
            direction(Direction::Left),
            direction(Direction::Right),
            direction(Direction::Up),
            direction(Direction::Down),
        )
    }

    // The attach_* helpers keep ids unique per port: an entry with the same
    // id is dropped without touching its record, which the new one shares.

    pub(crate) fn attach_button(&mut self, mapping: Box<dyn ButtonMapping>) {
        if self.detach_button(mapping.mapping_id()).is_some() {
            tracing::debug!("Replacing button mapping {} on port {}", mapping.mapping_id(), self.port + 1);
        }
        self.buttons.entry(mapping.bitmask()).or_default().push(mapping);
    }

    fn detach_button(&mut self, id: &str) -> Option<Box<dyn ButtonMapping>> {
        let taken = self.buttons.values_mut().find_map(|list| detach(list, id))?;
        self.buttons.retain(|_, list| !list.is_empty());
        Some(taken)
    }

    pub(crate) fn attach_axis_direction(&mut self, mapping: Box<dyn AxisDirectionMapping>) {
        let id = mapping.mapping_id();
        if self.sticks.iter_mut().flatten().find_map(|list| detach(list, id)).is_some() {
            tracing::debug!("Replacing axis direction mapping {} on port {}", id, self.port + 1);
        }
        self.sticks[mapping.stick().index()][mapping.direction().index()].push(mapping);
    }

    pub(crate) fn attach_gyro(&mut self, mapping: Box<dyn GyroMapping>) {
        self.gyro = Some(mapping);
    }

    pub(crate) fn attach_rumble(&mut self, mapping: Box<dyn RumbleMapping>) {
        if detach(&mut self.rumble, mapping.mapping_id()).is_some() {
            tracing::debug!("Replacing rumble mapping {} on port {}", mapping.mapping_id(), self.port + 1);
        }
        self.rumble.push(mapping);
    }

    /// Rewrite `Controllers.Port{n}` from the current bindings.
    pub fn save_port(&self) {
        let mut buttons = Map::new();
        for (bitmask, list) in &self.buttons {
            buttons.insert(bitmask.to_string(), id_list(list.iter().map(|m| m.mapping_id())));
        }

        let mut port = Map::new();
        port.insert("Buttons".to_string(), Value::Object(buttons));
        for stick in Stick::ALL {
            let mut directions = Map::new();
            for direction in Direction::ALL {
                let list = &self.sticks[stick.index()][direction.index()];
                directions.insert(
                    direction.name().to_string(),
                    id_list(list.iter().map(|m| m.mapping_id())),
                );
            }
            port.insert(stick.name().to_string(), Value::Object(directions));
        }
        let mut gyro = Map::new();
        if let Some(mapping) = &self.gyro {
            gyro.insert("MappingId".to_string(), Value::from(mapping.mapping_id()));
        }
        port.insert("Gyro".to_string(), Value::Object(gyro));
        port.insert("Rumble".to_string(), id_list(self.rumble.iter().map(|m| m.mapping_id())));

        let mut cfg = self.config.borrow_mut();
        cfg.set_value(&port_key(self.port), Value::Object(port));
        save_logged(&mut *cfg);
    }
}

fn id_list<'a>(ids: impl Iterator<Item = &'a str>) -> Value {
    let mut entry = Map::new();
    entry.insert(MAPPING_IDS.to_string(), Value::from(ids.collect::<Vec<_>>().join(",")));
    Value::Object(entry)
}
