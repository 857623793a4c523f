pub mod controller;
pub mod device;
pub mod factory;
pub mod gamepad;
pub mod mapping;
pub mod pad;
pub mod raw;

pub use controller::Controller;
pub use device::{GamepadGuid, PhysicalDeviceType};
pub use factory::MappingFactory;
pub use gamepad::GamepadPoller;
pub use pad::PadState;
pub use raw::RawInputState;
