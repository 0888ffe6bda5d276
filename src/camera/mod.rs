//! Camera module - room camera switching and the eased main camera.

mod plugin;
mod rig;
mod switcher;

pub use plugin::{CameraPlugin, MainCamera};
pub use rig::{CameraRig, CameraShake, SHAKE_BASE_RATE};
pub use switcher::{fit_size, CameraZone, RoomCamera, RoomCameraSwitcher, SwitchOutcome};
