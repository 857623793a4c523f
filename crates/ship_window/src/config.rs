use anyhow::{Context, Result};
use serde_json::{Map, Value};
use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::Rc;

pub const WINDOW_WIDTH: &str = "Window.Width";
pub const WINDOW_HEIGHT: &str = "Window.Height";
pub const WINDOW_POSITION_X: &str = "Window.PositionX";
pub const WINDOW_POSITION_Y: &str = "Window.PositionY";
pub const VSYNC_ENABLED: &str = "CVars.gVsyncEnabled";
pub const WINDOWED_FULLSCREEN: &str = "CVars.gWindowedFullscreen";
pub const DROPPED_FILE: &str = "CVars.gDroppedFile";
pub const NEW_FILE_DROPPED: &str = "CVars.gNewFileDropped";

/// String keyed settings store. Keys are dotted paths ("Window.Width").
pub trait ConfigStore {
    fn get_value(&self, key: &str) -> Option<&Value>;
    fn set_value(&mut self, key: &str, value: Value);
    /// Remove a key (and everything below it). Returns whether it existed.
    fn erase(&mut self, key: &str) -> bool;
    fn save(&mut self) -> Result<()>;

    fn get_int(&self, key: &str, default: i64) -> i64 {
        self.get_value(key).and_then(Value::as_i64).unwrap_or(default)
    }

    fn set_int(&mut self, key: &str, value: i64) {
        self.set_value(key, Value::from(value));
    }

    fn get_float(&self, key: &str, default: f64) -> f64 {
        self.get_value(key).and_then(Value::as_f64).unwrap_or(default)
    }

    fn set_float(&mut self, key: &str, value: f64) {
        self.set_value(key, Value::from(value));
    }

    fn get_string(&self, key: &str) -> Option<String> {
        self.get_value(key).and_then(Value::as_str).map(str::to_owned)
    }

    fn set_string(&mut self, key: &str, value: &str) {
        self.set_value(key, Value::from(value));
    }

    fn contains(&self, key: &str) -> bool {
        self.get_value(key).is_some()
    }
}

/// Config handle shared between the window layer and the input mappings.
pub type SharedConfig = Rc<RefCell<dyn ConfigStore>>;

/// Save, logging instead of propagating: mutation paths never fail on disk errors.
pub fn save_logged(cfg: &mut dyn ConfigStore) {
    if let Err(e) = cfg.save() {
        tracing::error!("Failed to save configuration: {:#}", e);
    }
}

/// JSON document addressed by dotted keys.
#[derive(Debug, Default)]
pub struct JsonConfig {
    root: Map<String, Value>,
    path: Option<PathBuf>,
}

impl JsonConfig {
    /// Store that never touches the disk.
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Load `path` if it exists; saves go back to the same file.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let root = if path.exists() {
            let text = std::fs::read_to_string(&path)
                .with_context(|| format!("reading config {}", path.display()))?;
            match serde_json::from_str::<Value>(&text)
                .with_context(|| format!("parsing config {}", path.display()))?
            {
                Value::Object(map) => map,
                _ => anyhow::bail!("config {} is not a JSON object", path.display()),
            }
        } else {
            tracing::info!("No config at {}, starting from defaults", path.display());
            Map::new()
        };
        Ok(Self { root, path: Some(path) })
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn into_shared(self) -> SharedConfig {
        Rc::new(RefCell::new(self))
    }

    pub fn as_json(&self) -> &Map<String, Value> {
        &self.root
    }
}

impl ConfigStore for JsonConfig {
    fn get_value(&self, key: &str) -> Option<&Value> {
        let mut parts = key.split('.');
        let mut current = self.root.get(parts.next()?)?;
        for part in parts {
            current = current.as_object()?.get(part)?;
        }
        Some(current)
    }

    fn set_value(&mut self, key: &str, value: Value) {
        let mut parts: Vec<&str> = key.split('.').collect();
        let Some(leaf) = parts.pop() else { return };
        let mut map = &mut self.root;
        for part in parts {
            let entry = map
                .entry(part.to_owned())
                .or_insert_with(|| Value::Object(Map::new()));
            if !entry.is_object() {
                *entry = Value::Object(Map::new());
            }
            map = match entry {
                Value::Object(m) => m,
                _ => return,
            };
        }
        map.insert(leaf.to_owned(), value);
    }

    fn erase(&mut self, key: &str) -> bool {
        let mut parts: Vec<&str> = key.split('.').collect();
        let Some(leaf) = parts.pop() else { return false };
        let mut map = &mut self.root;
        for part in parts {
            map = match map.get_mut(part) {
                Some(Value::Object(m)) => m,
                _ => return false,
            };
        }
        map.remove(leaf).is_some()
    }

    fn save(&mut self) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("creating {}", parent.display()))?;
            }
        }
        let text = serde_json::to_string_pretty(&self.root)?;
        std::fs::write(path, text).with_context(|| format!("writing config {}", path.display()))?;
        tracing::debug!("Saved config to {}", path.display());
        Ok(())
    }
}
