pub mod audio_bridge;
pub mod backend;
pub mod config;
pub mod geometry;
pub mod hid;
pub mod manager;
pub mod metrics;
pub mod native;
pub mod pacer;
pub mod scancode;

pub use backend::{WindowBackend, WindowDescriptor};
pub use config::{ConfigStore, JsonConfig, SharedConfig};
pub use manager::WindowManager;
pub use scancode::{LogicalScancode, ScancodeTable};
