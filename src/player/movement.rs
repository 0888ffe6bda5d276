//! Top-down player movement and sprite-direction animation.

use bevy::prelude::*;
use bevy_rapier2d::prelude::*;
use rand::{thread_rng, Rng};

use super::components::*;
use super::shadow::{cast_wall_shadow, mirror_player_shadow};
use crate::audio::PlaySound;
use crate::core::{move_towards, GameState, PlayState};
use crate::vision::PlayerVision;

/// Set up player movement systems.
pub fn setup_movement_systems(app: &mut App) {
    app.add_systems(
        Update,
        (player_movement, animate_player, mirror_player_shadow, cast_wall_shadow)
            .chain()
            .run_if(in_state(GameState::InGame)),
    )
    .add_systems(PostUpdate, y_sort);
}

/// Raw WASD / arrow direction. Opposite keys cancel.
pub fn read_direction(keyboard: &ButtonInput<KeyCode>) -> Vec2 {
    let mut direction = Vec2::ZERO;
    if keyboard.any_pressed([KeyCode::KeyW, KeyCode::ArrowUp]) {
        direction.y += 1.0;
    }
    if keyboard.any_pressed([KeyCode::KeyS, KeyCode::ArrowDown]) {
        direction.y -= 1.0;
    }
    if keyboard.any_pressed([KeyCode::KeyA, KeyCode::ArrowLeft]) {
        direction.x -= 1.0;
    }
    if keyboard.any_pressed([KeyCode::KeyD, KeyCode::ArrowRight]) {
        direction.x += 1.0;
    }
    direction
}

/// Horizontal wins only when strictly greater than vertical.
pub fn facing_for(input: Vec2, last: Facing) -> Facing {
    if input == Vec2::ZERO {
        last
    } else if input.x.abs() > input.y.abs() {
        if input.x > 0.0 {
            Facing::Right
        } else {
            Facing::Left
        }
    } else if input.y > 0.0 {
        Facing::Back
    } else {
        Facing::Front
    }
}

impl PlayerMotion {
    /// Ease speed toward the walk or run speed, or toward 0 without control.
    pub fn update_speed(&mut self, settings: &PlayerSettings, running: bool, enabled: bool, dt: f32) {
        let target = match (enabled, running) {
            (false, _) => 0.0,
            (true, true) => settings.run_speed,
            (true, false) => settings.walk_speed,
        };
        let rate = if target > self.speed {
            settings.acceleration
        } else {
            settings.deceleration
        };
        self.speed = move_towards(self.speed, target, rate * dt);
    }

    /// Seconds per step at the current speed.
    pub fn step_interval(&self, settings: &PlayerSettings) -> f32 {
        let mut multiplier = if settings.walk_speed > 0.0 {
            self.speed / settings.walk_speed
        } else {
            1.0
        };
        if multiplier < 0.1 {
            multiplier = 1.0;
        }
        settings.base_step_interval / multiplier
    }

    /// Advance the walk cycle. Returns true when a footstep should play.
    pub fn advance_steps(&mut self, settings: &PlayerSettings, dt: f32) -> bool {
        if self.input == Vec2::ZERO {
            self.step_timer = 0.0;
            self.step_index = 0;
            return false;
        }
        self.facing = facing_for(self.input, self.facing);
        self.step_timer += dt;
        if self.step_timer < self.step_interval(settings) {
            return false;
        }
        self.step_timer = 0.0;
        self.step_index = (self.step_index + 1) % STEP_CYCLE;
        self.step_index == 1 || self.step_index == 3
    }

    pub fn frame(&self) -> Frame {
        match self.step_index {
            1 => Frame::Move1,
            3 => Frame::Move2,
            _ => Frame::Idle,
        }
    }
}

/// Random footstep pitch in 0.9..=1.1.
pub fn footstep_pitch(rng: &mut impl Rng) -> f32 {
    rng.gen_range(0.9..=1.1)
}

/// Handle WASD movement.
///
/// Uses Rapier's KinematicCharacterController for collision detection.
fn player_movement(
    keyboard: Res<ButtonInput<KeyCode>>,
    time: Res<Time>,
    settings: Res<PlayerSettings>,
    play_state: Option<Res<State<PlayState>>>,
    mut players: Query<(&mut PlayerMotion, Option<&mut KinematicCharacterController>), With<Player>>,
    mut sounds: EventWriter<PlaySound>,
) {
    let enabled = play_state.is_some_and(|s| *s.get() == PlayState::Exploring);
    let dt = time.delta_secs();
    let running = keyboard.any_pressed([KeyCode::ShiftLeft, KeyCode::ShiftRight]);

    for (mut motion, controller) in &mut players {
        motion.input = if enabled { read_direction(&keyboard) } else { Vec2::ZERO };
        motion.update_speed(&settings, running, enabled, dt);

        if motion.advance_steps(&settings, dt) {
            if let Some(path) = &settings.footstep_sound {
                sounds.send(PlaySound::new(path.clone()).with_pitch(footstep_pitch(&mut thread_rng())));
            }
        }

        if let Some(mut controller) = controller {
            let direction = motion.input.normalize_or_zero();
            controller.translation = (direction != Vec2::ZERO).then(|| direction * motion.speed * dt);
        }
    }
}

fn animate_player(mut players: Query<(&PlayerMotion, &DirectionSprites, &mut Sprite), With<Player>>) {
    for (motion, sprites, mut sprite) in &mut players {
        let image = sprites.get(motion.facing, motion.frame());
        if sprite.image != *image {
            sprite.image = image.clone();
        }
    }
}

fn y_sort(mut sorted: Query<(&YSort, &mut Transform)>) {
    for (sort, mut transform) in &mut sorted {
        let z = sort.z_for(transform.translation.y);
        if transform.translation.z != z {
            transform.translation.z = z;
        }
    }
}

/// Spawn the player entity.
pub fn spawn_player(
    commands: &mut Commands,
    position: Vec2,
    sprites: DirectionSprites,
    vision: PlayerVision,
    mask: Option<Handle<Image>>,
) -> Entity {
    let player = commands
        .spawn((
            Player,
            PlayerMotion::default(),
            Sprite::from_image(sprites.front[0].clone()),
            sprites,
            vision,
            YSort::default(),
            Transform::from_translation(position.extend(0.0)),
            Visibility::default(),
            // Rapier physics components
            RigidBody::KinematicPositionBased,
            Collider::cuboid(5.0, 3.0),
            ActiveEvents::COLLISION_EVENTS,
            ActiveCollisionTypes::default() | ActiveCollisionTypes::KINEMATIC_STATIC,
            KinematicCharacterController {
                offset: CharacterLength::Absolute(0.5),
                ..default()
            },
            Name::new("Player"),
        ))
        .id();

    if let Some(mask) = mask {
        commands.entity(player).with_children(|parent| {
            parent.spawn((
                Sprite::from_image(mask),
                // Above the world, below the UI overlays
                Transform::from_xyz(0.0, 0.0, 50.0),
                crate::vision::VisionMask,
            ));
        });
    }

    player
}
