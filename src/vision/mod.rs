//! Vision module - global light, the player's circle of sight, the collapse
//! run and see-through walls.

mod collapse;
mod light;
mod player_vision;
mod plugin;
mod wall;

pub use collapse::{CollapseEnd, CollapseOutput, CollapsePhase, CollapseRun, CollapseRunConfig, CollapseTrigger};
pub use light::{GlobalLight, LightOverlay, FLASH_RANGE, MAX_DARKNESS};
pub use player_vision::{PlayerVision, VisionMask, MASK_HOLE_FRACTION};
pub use plugin::VisionPlugin;
pub use wall::SeeThroughWall;
