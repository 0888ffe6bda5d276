//! Scene data structures and RON loading.

use bevy::prelude::*;
use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;

use super::error::SceneError;
use crate::cinematics::CinematicSequence;
use crate::core::read_ron;
use crate::interaction::{QuestInteractor, Telescope};
use crate::inventory::{ItemPickup, RepairSpot};
use crate::player::WallShadow;
use crate::vision::CollapseRunConfig;

pub const SCENES_DIR: &str = "assets/data/scenes";

fn default_size() -> (f32, f32) {
    (16.0, 16.0)
}

fn default_true() -> bool {
    true
}

fn default_faded_alpha() -> f32 {
    0.3
}

fn default_fade_time() -> f32 {
    0.5
}

fn default_player_sprites() -> String {
    "sprites/player".to_string()
}

// === Placement ===

/// Where something sits in a scene and how it looks.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Placement {
    /// Target for `Show` / `Hide` hooks
    #[serde(default)]
    pub name: Option<String>,
    pub position: (f32, f32),
    /// Full width and height of the collider
    #[serde(default = "default_size")]
    pub size: (f32, f32),
    #[serde(default)]
    pub sprite: Option<String>,
    /// Spawn hidden and inactive until a `Show` hook
    #[serde(default)]
    pub hidden: bool,
}

impl Placement {
    pub fn at(position: Vec2) -> Self {
        Self {
            name: None,
            position: (position.x, position.y),
            size: default_size(),
            sprite: None,
            hidden: false,
        }
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.position.0, self.position.1)
    }

    pub fn half_extents(&self) -> Vec2 {
        Vec2::new(self.size.0, self.size.1) / 2.0
    }
}

// === Scene entries ===

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PlayerDef {
    /// Directory holding `{front,back,left,right}_{0,1,2}.png`
    #[serde(default = "default_player_sprites")]
    pub sprites: String,
    /// Darkness image with a transparent hole for the vision circle
    #[serde(default)]
    pub vision_mask: Option<String>,
    /// Overrides the configured vision radius
    #[serde(default)]
    pub vision_radius: Option<f32>,
    /// Directory of shadow sprites named like the player's
    #[serde(default)]
    pub shadow: Option<String>,
    #[serde(default)]
    pub shadow_offset: (f32, f32),
    #[serde(default)]
    pub wall_shadow: Option<WallShadow>,
}

impl Default for PlayerDef {
    fn default() -> Self {
        Self {
            sprites: default_player_sprites(),
            vision_mask: None,
            vision_radius: None,
            shadow: None,
            shadow_offset: (0.0, 0.0),
            wall_shadow: None,
        }
    }
}

/// A room camera anchor.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RoomDef {
    pub name: String,
    pub position: (f32, f32),
    /// World-space area the camera must show
    pub size: (f32, f32),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CameraZoneDef {
    pub at: Placement,
    pub room: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SpeakerDef {
    pub at: Placement,
    /// Speaker name and dialogue file stem
    pub speaker: String,
    /// Overrides `remember_last_dialogue` from the config
    #[serde(default)]
    pub remember_last: Option<bool>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PickupDef {
    pub at: Placement,
    pub pickup: ItemPickup,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RepairDef {
    pub at: Placement,
    pub repair: RepairSpot,
}

#[derive(Debug, Clone, Deserialize)]
pub struct InteractorDef {
    pub at: Placement,
    pub interactor: QuestInteractor,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TelescopeDef {
    pub at: Placement,
    pub telescope: Telescope,
}

impl TelescopeDef {
    /// `Show` / `Hide` target of the scope overlay.
    pub fn overlay_name(&self) -> String {
        format!("{}_scope", self.at.name.as_deref().unwrap_or("telescope"))
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DoorDef {
    pub at: Placement,
    pub scene: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TeleporterDef {
    pub at: Placement,
    pub destination: (f32, f32),
}

/// Decoration, optionally solid.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PropDef {
    pub at: Placement,
    #[serde(default)]
    pub solid: bool,
    #[serde(default = "default_true")]
    pub y_sort: bool,
}

/// Wall sprite that fades while the player stands inside its area.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct WallDef {
    pub at: Placement,
    #[serde(default = "default_faded_alpha")]
    pub faded_alpha: f32,
    #[serde(default = "default_fade_time")]
    pub fade_time: f32,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CollapseDef {
    pub trigger: Placement,
    pub end: Placement,
    pub run: CollapseRunConfig,
}

/// A scene file, `assets/data/scenes/<name>.ron`.
#[derive(Debug, Clone, Deserialize)]
pub struct SceneDefinition {
    /// Filled from the file stem when left out
    #[serde(default)]
    pub name: String,
    pub spawn: (f32, f32),
    #[serde(default)]
    pub player: PlayerDef,
    #[serde(default)]
    pub music: Option<String>,
    #[serde(default)]
    pub ambience: Option<String>,
    /// Global light intensity on entry
    #[serde(default)]
    pub light: Option<f32>,
    #[serde(default)]
    pub rooms: Vec<RoomDef>,
    #[serde(default)]
    pub camera_zones: Vec<CameraZoneDef>,
    #[serde(default)]
    pub speakers: Vec<SpeakerDef>,
    #[serde(default)]
    pub pickups: Vec<PickupDef>,
    #[serde(default)]
    pub repairs: Vec<RepairDef>,
    #[serde(default)]
    pub interactors: Vec<InteractorDef>,
    #[serde(default)]
    pub telescopes: Vec<TelescopeDef>,
    #[serde(default)]
    pub doors: Vec<DoorDef>,
    #[serde(default)]
    pub teleporters: Vec<TeleporterDef>,
    #[serde(default)]
    pub props: Vec<PropDef>,
    #[serde(default)]
    pub walls: Vec<WallDef>,
    /// Invisible solid blockers
    #[serde(default)]
    pub colliders: Vec<Placement>,
    #[serde(default)]
    pub collapse: Option<CollapseDef>,
    #[serde(default)]
    pub sequences: Vec<CinematicSequence>,
}

impl SceneDefinition {
    pub fn spawn_point(&self) -> Vec2 {
        Vec2::new(self.spawn.0, self.spawn.1)
    }

    /// Every placement in the scene, in spawn order.
    pub fn placements(&self) -> Vec<&Placement> {
        let mut all: Vec<&Placement> = Vec::new();
        all.extend(self.camera_zones.iter().map(|d| &d.at));
        all.extend(self.speakers.iter().map(|d| &d.at));
        all.extend(self.pickups.iter().map(|d| &d.at));
        all.extend(self.repairs.iter().map(|d| &d.at));
        all.extend(self.interactors.iter().map(|d| &d.at));
        all.extend(self.telescopes.iter().map(|d| &d.at));
        all.extend(self.doors.iter().map(|d| &d.at));
        all.extend(self.teleporters.iter().map(|d| &d.at));
        all.extend(self.props.iter().map(|d| &d.at));
        all.extend(self.walls.iter().map(|d| &d.at));
        all.extend(self.colliders.iter());
        if let Some(collapse) = &self.collapse {
            all.push(&collapse.trigger);
            all.push(&collapse.end);
        }
        all
    }

    /// Names must be unique so `Show` / `Hide` hooks hit one entity.
    pub fn validate(&self) -> Result<(), SceneError> {
        let mut seen = HashSet::new();
        for name in self.placements().into_iter().filter_map(|p| p.name.as_deref()) {
            if !seen.insert(name) {
                return Err(SceneError::DuplicateName {
                    scene: self.name.clone(),
                    name: name.to_string(),
                });
            }
        }
        Ok(())
    }
}

/// Resource storing all loaded scene definitions.
#[derive(Resource, Default, Debug)]
pub struct SceneRegistry {
    pub scenes: HashMap<String, SceneDefinition>,
}

impl SceneRegistry {
    pub fn get(&self, name: &str) -> Result<&SceneDefinition, SceneError> {
        self.scenes
            .get(name)
            .ok_or_else(|| SceneError::UnknownScene(name.to_string()))
    }

    /// Register a scene. Invalid scenes are rejected.
    pub fn insert(&mut self, scene: SceneDefinition) -> Result<(), SceneError> {
        scene.validate()?;
        self.scenes.insert(scene.name.clone(), scene);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.scenes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scenes.is_empty()
    }
}

/// Which scene is live, and whether its entities exist.
#[derive(Resource, Debug, Clone)]
pub struct CurrentScene {
    pub name: String,
    pub spawned: bool,
}

impl CurrentScene {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            spawned: false,
        }
    }
}

pub fn load_scene_file(path: &Path) -> Result<SceneDefinition, SceneError> {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();
    let mut scene: SceneDefinition = read_ron(path).map_err(|source| SceneError::Load {
        name: stem.clone(),
        source,
    })?;
    if scene.name.is_empty() {
        scene.name = stem;
    }
    Ok(scene)
}

/// Load every `.ron` file in `dir`. Broken files are logged and skipped.
pub fn load_scene_dir(dir: &Path) -> Result<SceneRegistry, SceneError> {
    if !dir.exists() {
        return Err(SceneError::MissingDirectory(dir.display().to_string()));
    }
    let mut registry = SceneRegistry::default();
    let Ok(entries) = fs::read_dir(dir) else {
        return Err(SceneError::MissingDirectory(dir.display().to_string()));
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if !path.extension().is_some_and(|ext| ext == "ron") {
            continue;
        }
        match load_scene_file(&path).and_then(|scene| registry.insert(scene)) {
            Ok(()) => debug!("Loaded scene {:?}", path),
            Err(e) => error!("{}", e),
        }
    }
    Ok(registry)
}

pub fn load_scene_registry(mut commands: Commands) {
    let registry = load_scene_dir(Path::new(SCENES_DIR)).unwrap_or_else(|e| {
        warn!("{}", e);
        SceneRegistry::default()
    });
    info!("Loaded {} scene(s)", registry.len());
    commands.insert_resource(registry);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::GameCommand;
    use crate::interaction::InteractionMode;

    const HALL: &str = r#"(
        spawn: (0.0, -40.0),
        light: Some(0.6),
        rooms: [(name: "hall", position: (0.0, 0.0), size: (320.0, 180.0))],
        camera_zones: [(at: (position: (0.0, 0.0), size: (320.0, 180.0)), room: "hall")],
        speakers: [(at: (name: Some("mother"), position: (40.0, 10.0), sprite: Some("sprites/mother.png")), speaker: "mother")],
        pickups: [(at: (position: (-60.0, 20.0)), pickup: (item: "fuse"))],
        interactors: [(
            at: (name: Some("phone"), position: (80.0, 0.0)),
            interactor: (
                mode: OnInteract,
                actions: [(quest: "phone", kind: Complete)],
                on_success: [Show("basement_door")],
            ),
        )],
        doors: [(at: (name: Some("basement_door"), position: (0.0, 90.0), hidden: true), scene: "basement")],
        props: [(at: (name: Some("lamp"), position: (10.0, 10.0), sprite: Some("sprites/lamp.png")), solid: true)],
    )"#;

    #[test]
    fn test_parse_scene() {
        let scene: SceneDefinition = ron::from_str(HALL).unwrap();
        assert_eq!(scene.spawn_point(), Vec2::new(0.0, -40.0));
        assert_eq!(scene.light, Some(0.6));
        assert_eq!(scene.player, PlayerDef::default());
        assert_eq!(scene.pickups[0].pickup.amount, 1);
        assert_eq!(scene.interactors[0].interactor.mode, InteractionMode::OnInteract);
        assert_eq!(
            scene.interactors[0].interactor.on_success,
            vec![GameCommand::Show("basement_door".to_string())]
        );
        assert!(scene.doors[0].at.hidden);
        assert_eq!(scene.doors[0].at.size, (16.0, 16.0));
        assert!(scene.props[0].y_sort);
        assert!(scene.collapse.is_none());
        assert_eq!(scene.placements().len(), 6);
    }

    #[test]
    fn test_duplicate_names_are_rejected() {
        let mut scene: SceneDefinition = ron::from_str(HALL).unwrap();
        scene.name = "hall".to_string();
        scene.props[0].at.name = Some("phone".to_string());

        let mut registry = SceneRegistry::default();
        let err = registry.insert(scene).unwrap_err();
        assert!(matches!(err, SceneError::DuplicateName { name, .. } if name == "phone"));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_unknown_scene_is_an_error() {
        let registry = SceneRegistry::default();
        assert!(matches!(registry.get("attic"), Err(SceneError::UnknownScene(_))));
    }

    #[test]
    fn test_missing_directory() {
        let result = load_scene_dir(Path::new("assets/data/no_such_dir"));
        assert!(matches!(result, Err(SceneError::MissingDirectory(_))));
    }

    #[test]
    fn test_bundled_scenes_load() {
        let registry = load_scene_dir(Path::new(SCENES_DIR)).unwrap();
        let hall = registry.get("hall").unwrap();
        assert!(hall.doors.iter().any(|d| d.scene == "basement"));
        assert_eq!(hall.telescopes.len(), 1);
        assert_eq!(hall.telescopes[0].overlay_name(), "window_scope");
        assert!(hall.player.wall_shadow.is_some());
        let basement = registry.get("basement").unwrap();
        assert!(basement.collapse.is_some());
        assert_eq!(basement.sequences.len(), 2);
    }
}
