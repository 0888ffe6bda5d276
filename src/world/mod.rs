//! World module - scenes, zones, and named props.

mod data;
mod error;
mod plugin;
mod spawning;
mod zones;

pub use data::{
    load_scene_dir, load_scene_file, CameraZoneDef, CollapseDef, CurrentScene, DoorDef, InteractorDef, PickupDef,
    Placement, PlayerDef, PropDef, RepairDef, RoomDef, SceneDefinition, SceneRegistry, SpeakerDef, TelescopeDef, TeleporterDef,
    WallDef, SCENES_DIR,
};
pub use error::SceneError;
pub use plugin::WorldPlugin;
pub use spawning::{spawn_scene, SceneEntity, SpawnContext};
pub use zones::{emit_zone_events, zone_pair, Zone};
