//! Title card shown when play starts.
//!
//! The card freezes virtual time and audio and takes player control. After
//! `intro_continue_delay` real seconds a "continue" line appears and the
//! skip key dismisses the card.

use bevy::prelude::*;

use crate::core::{ControlLocks, GameConfig, GameState, SKIP_KEY};

pub const CONTINUE_LABEL: &str = "[Espacio] Continuar";

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum IntroPhase {
    #[default]
    Unseen,
    /// Up, counting real seconds until it may be dismissed
    Waiting { elapsed: f32 },
    /// Up, waiting for the skip key
    Ready,
    Dismissed,
}

/// Whether the card has been shown since the last trip to the menu.
#[derive(Resource, Debug, Clone, Default)]
pub struct IntroCard {
    pub phase: IntroPhase,
}

impl IntroCard {
    /// Put the card up. Only the first call after a reset does anything.
    pub fn open(&mut self) -> bool {
        if self.phase != IntroPhase::Unseen {
            return false;
        }
        self.phase = IntroPhase::Waiting { elapsed: 0.0 };
        true
    }

    /// Count `dt` real seconds. Returns true on the frame it becomes dismissable.
    pub fn tick(&mut self, dt: f32, delay: f32) -> bool {
        let IntroPhase::Waiting { elapsed } = self.phase else {
            return false;
        };
        let elapsed = elapsed + dt;
        if elapsed >= delay {
            self.phase = IntroPhase::Ready;
            true
        } else {
            self.phase = IntroPhase::Waiting { elapsed };
            false
        }
    }

    pub fn dismiss(&mut self) -> bool {
        if self.phase != IntroPhase::Ready {
            return false;
        }
        self.phase = IntroPhase::Dismissed;
        true
    }

    pub fn is_up(&self) -> bool {
        matches!(self.phase, IntroPhase::Waiting { .. } | IntroPhase::Ready)
    }
}

#[derive(Component)]
pub struct IntroCardUi;

#[derive(Component)]
pub struct IntroContinueText;

pub fn setup_intro_systems(app: &mut App) {
    app.init_resource::<IntroCard>()
        .add_systems(OnEnter(GameState::InGame), open_intro_card)
        .add_systems(Update, update_intro_card.run_if(in_state(GameState::InGame)))
        .add_systems(OnEnter(GameState::MainMenu), reset_intro_card);
}

/// Pausing re-enters `InGame`, so the card only opens once per run.
fn open_intro_card(
    mut commands: Commands,
    mut card: ResMut<IntroCard>,
    mut locks: ResMut<ControlLocks>,
    mut time: ResMut<Time<Virtual>>,
    config: Res<GameConfig>,
    assets: Option<Res<AssetServer>>,
) {
    let Some(text) = config.intro_text.as_deref() else {
        return;
    };
    if !card.open() {
        return;
    }
    info!("Showing intro card");
    locks.intro = true;
    time.pause();

    commands
        .spawn((
            Node {
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                flex_direction: FlexDirection::Column,
                justify_content: JustifyContent::Center,
                align_items: AlignItems::Center,
                row_gap: Val::Px(24.0),
                ..default()
            },
            BackgroundColor(Color::BLACK),
            GlobalZIndex(85),
            IntroCardUi,
        ))
        .with_children(|parent| {
            if let (Some(path), Some(assets)) = (&config.intro_image, assets.as_deref()) {
                parent.spawn((
                    ImageNode::new(assets.load(path.clone())),
                    Node {
                        width: Val::Px(320.0),
                        height: Val::Px(180.0),
                        ..default()
                    },
                ));
            }
            parent.spawn((
                Text::new(text),
                TextFont {
                    font_size: 22.0,
                    ..default()
                },
                TextColor(Color::srgb(0.85, 0.82, 0.75)),
                TextLayout::new_with_justify(JustifyText::Center),
            ));
            parent.spawn((
                Text::new(CONTINUE_LABEL),
                TextFont {
                    font_size: 16.0,
                    ..default()
                },
                TextColor(Color::srgb(0.6, 0.6, 0.6)),
                Visibility::Hidden,
                IntroContinueText,
            ));
        });
}

#[allow(clippy::too_many_arguments)]
fn update_intro_card(
    mut commands: Commands,
    mut card: ResMut<IntroCard>,
    mut locks: ResMut<ControlLocks>,
    mut keyboard: ResMut<ButtonInput<KeyCode>>,
    real: Res<Time<Real>>,
    mut time: ResMut<Time<Virtual>>,
    config: Res<GameConfig>,
    ui: Query<Entity, With<IntroCardUi>>,
    mut prompts: Query<&mut Visibility, With<IntroContinueText>>,
) {
    if !card.is_up() {
        return;
    }
    if !time.is_paused() {
        time.pause();
    }

    if card.tick(real.delta_secs(), config.intro_continue_delay) {
        for mut visibility in &mut prompts {
            *visibility = Visibility::Inherited;
        }
    }

    if !keyboard.just_pressed(SKIP_KEY) || !card.dismiss() {
        return;
    }
    keyboard.clear_just_pressed(SKIP_KEY);
    for entity in &ui {
        commands.entity(entity).despawn_recursive();
    }
    locks.intro = false;
    time.unpause();
    info!("Intro card dismissed");
}

fn reset_intro_card(
    mut commands: Commands,
    mut card: ResMut<IntroCard>,
    mut locks: ResMut<ControlLocks>,
    ui: Query<Entity, With<IntroCardUi>>,
) {
    for entity in &ui {
        commands.entity(entity).despawn_recursive();
    }
    *card = IntroCard::default();
    locks.intro = false;
}
