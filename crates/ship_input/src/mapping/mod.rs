//! Bindings from physical inputs to console inputs.
//!
//! Every mapping persists itself as one record under
//! `Controllers.<Kind>Mappings.<id>` each time it changes. Ids start with the
//! owning port (`P0-...`), so each port keys its own records. Which port uses
//! a mapping is stored separately by [`crate::controller::Controller`], which
//! re-keys the record when a mapping moves so its calibration goes along.

pub mod axis;
pub mod button;
pub mod gyro;
pub mod rumble;

use crate::device::PhysicalDeviceType;
use serde::Serialize;
use ship_window::config::{save_logged, SharedConfig};
use ship_window::scancode::{LogicalScancode, ScancodeTable};
use std::cell::Cell;
use std::sync::OnceLock;

pub const BUTTON_MAPPINGS: &str = "Controllers.ButtonMappings";
pub const AXIS_DIRECTION_MAPPINGS: &str = "Controllers.AxisDirectionMappings";
pub const GYRO_MAPPINGS: &str = "Controllers.GyroMappings";
pub const RUMBLE_MAPPINGS: &str = "Controllers.RumbleMappings";

/// Number of console controller ports.
pub const MAX_PORTS: u8 = 4;

/// Identity every mapping carries: id, source device, owning port and the
/// store it persists to.
#[derive(Clone)]
pub struct MappingIdentity {
    id: String,
    device: PhysicalDeviceType,
    port: u8,
    config: SharedConfig,
    /// Whether a record under `id` belongs to this mapping.
    stored: Cell<bool>,
}

impl MappingIdentity {
    pub fn new(id: String, device: PhysicalDeviceType, port: u8, config: SharedConfig) -> Self {
        Self { id, device, port, config, stored: Cell::new(false) }
    }

    /// Identity of a mapping read back from its own record.
    pub(crate) fn loaded(self) -> Self {
        self.stored.set(true);
        self
    }

    pub(crate) fn is_stored(&self) -> bool {
        self.stored.get()
    }

    pub fn config(&self) -> &SharedConfig {
        &self.config
    }

    /// Write `record` as this mapping's entry in `section` and save.
    pub(crate) fn store<R: Serialize>(&self, section: &str, record: &R) {
        let value = match serde_json::to_value(record) {
            Ok(value) => value,
            Err(e) => {
                tracing::error!("Failed to serialize mapping {}: {}", self.id, e);
                return;
            }
        };
        let mut cfg = self.config.borrow_mut();
        cfg.set_value(&format!("{}.{}", section, self.id), value);
        save_logged(&mut *cfg);
        self.stored.set(true);
    }

    /// Move to `port`, rewriting the `P{old}-` prefix of the id. Ids without
    /// that prefix are kept as they are.
    pub(crate) fn set_port(&mut self, port: u8) {
        let prefix = format!("P{}-", self.port);
        if let Some(rest) = self.id.strip_prefix(&prefix) {
            self.id = format!("P{}-{}", port, rest);
        }
        self.port = port;
    }

    pub(crate) fn erase(&self, section: &str) {
        self.stored.set(false);
        let mut cfg = self.config.borrow_mut();
        if cfg.erase(&format!("{}.{}", section, self.id)) {
            save_logged(&mut *cfg);
        }
    }
}

pub trait ControllerInputMapping {
    fn identity(&self) -> &MappingIdentity;
    fn identity_mut(&mut self) -> &mut MappingIdentity;

    /// Human readable source, e.g. "Keypad Enter" or "B (Gamepad)".
    fn physical_input_name(&self) -> String;
    fn save_to_config(&self);
    fn erase_from_config(&self);

    /// Id of the mapping on its current port, also the key of the config
    /// record.
    fn mapping_id(&self) -> &str {
        &self.identity().id
    }

    fn physical_device_type(&self) -> PhysicalDeviceType {
        self.identity().device
    }

    fn port_index(&self) -> u8 {
        self.identity().port
    }

    /// Reassign the owning port and the id with it. Calibration is
    /// untouched and nothing is written; the controllers own port membership
    /// and re-key the record.
    fn set_port_index(&mut self, port: u8) {
        self.identity_mut().set_port(port);
    }
}

pub(crate) fn key_name(key: LogicalScancode) -> &'static str {
    static TABLE: OnceLock<ScancodeTable> = OnceLock::new();
    TABLE.get_or_init(ScancodeTable::new).key_name(key)
}

/// Clamp a percent setting to `max`.
pub(crate) fn clamp_percent(percent: u8, max: u8) -> u8 {
    if percent > max {
        tracing::debug!("Clamping percent {} to {}", percent, max);
        max
    } else {
        percent
    }
}
