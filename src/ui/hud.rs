//! In-game HUD: item icons, the interact prompt and the dialogue box.

use bevy::prelude::*;

use crate::core::GameState;
use crate::dialogue::{ActiveConversation, DialogueSpeaker, SpeakerInRange};
use crate::interaction::{InteractionPrompt, PromptTone};
use crate::inventory::{ItemHud, ItemRegistry};
use crate::quests::QuestLedger;

/// Prompt label for talking to a speaker.
pub const TALK_LABEL: &str = "Hablar";

/// Marker for HUD root entity.
#[derive(Component)]
pub struct HudRoot;

#[derive(Component)]
pub struct PromptText;

#[derive(Component)]
pub struct DialogueBox;

#[derive(Component)]
pub struct DialoguePortrait;

#[derive(Component)]
pub struct DialogueSpeakerText;

#[derive(Component)]
pub struct DialogueBodyText;

/// Setup HUD systems.
pub fn setup_hud_systems(app: &mut App) {
    app.add_systems(OnEnter(GameState::InGame), spawn_hud)
        .add_systems(OnExit(GameState::InGame), cleanup_hud)
        .add_systems(
            Update,
            (update_prompt_text, update_dialogue_box).run_if(in_state(GameState::InGame)),
        );
}

/// What the prompt should say, if anything. Open conversations hide it and
/// a quest interactor wins over a speaker.
pub fn prompt_line(
    conversation_open: bool,
    interactor: Option<&(String, PromptTone)>,
    speaker_available: bool,
) -> Option<(String, PromptTone)> {
    if conversation_open {
        return None;
    }
    match interactor {
        Some((label, tone)) => Some((format!("[E] {}", label), *tone)),
        None if speaker_available => Some((format!("[E] {}", TALK_LABEL), PromptTone::Neutral)),
        None => None,
    }
}

pub fn tone_color(tone: PromptTone) -> Color {
    match tone {
        PromptTone::Neutral => Color::srgb(0.9, 0.9, 0.9),
        PromptTone::InProgress => Color::srgb(0.95, 0.8, 0.3),
        PromptTone::Completed => Color::srgb(0.4, 0.85, 0.4),
    }
}

fn image(assets: Option<&AssetServer>, path: &str) -> Handle<Image> {
    assets.map(|a| a.load(path.to_string())).unwrap_or_default()
}

/// Spawn the HUD UI.
fn spawn_hud(mut commands: Commands, registry: Option<Res<ItemRegistry>>, assets: Option<Res<AssetServer>>) {
    let assets = assets.as_deref();

    // Item icons (top-left corner)
    commands
        .spawn((
            Node {
                position_type: PositionType::Absolute,
                top: Val::Px(12.0),
                left: Val::Px(12.0),
                flex_direction: FlexDirection::Row,
                column_gap: Val::Px(6.0),
                ..default()
            },
            GlobalZIndex(80),
            HudRoot,
        ))
        .with_children(|parent| {
            let Some(registry) = registry.as_deref() else {
                return;
            };
            for item in registry.iter() {
                let Some(icon) = &item.icon else {
                    continue;
                };
                parent.spawn((
                    ImageNode::new(image(assets, icon)),
                    Node {
                        width: Val::Px(32.0),
                        height: Val::Px(32.0),
                        ..default()
                    },
                    Visibility::Hidden,
                    ItemHud { item: item.id.clone() },
                ));
            }
        });

    // Prompt and dialogue box (bottom of the screen)
    commands
        .spawn((
            Node {
                position_type: PositionType::Absolute,
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                flex_direction: FlexDirection::Column,
                justify_content: JustifyContent::End,
                align_items: AlignItems::Center,
                padding: UiRect::all(Val::Px(20.0)),
                row_gap: Val::Px(10.0),
                ..default()
            },
            GlobalZIndex(80),
            HudRoot,
        ))
        .with_children(|parent| {
            parent.spawn((
                Text::new(""),
                TextFont {
                    font_size: 18.0,
                    ..default()
                },
                TextColor(tone_color(PromptTone::Neutral)),
                Visibility::Hidden,
                PromptText,
            ));

            parent
                .spawn((
                    Node {
                        width: Val::Percent(80.0),
                        min_height: Val::Px(110.0),
                        flex_direction: FlexDirection::Row,
                        padding: UiRect::all(Val::Px(12.0)),
                        column_gap: Val::Px(12.0),
                        ..default()
                    },
                    BackgroundColor(Color::srgba(0.02, 0.02, 0.04, 0.9)),
                    BorderColor(Color::srgb(0.5, 0.5, 0.55)),
                    Visibility::Hidden,
                    DialogueBox,
                ))
                .with_children(|dialogue| {
                    dialogue.spawn((
                        ImageNode::default(),
                        Node {
                            width: Val::Px(86.0),
                            height: Val::Px(86.0),
                            ..default()
                        },
                        Visibility::Hidden,
                        DialoguePortrait,
                    ));
                    dialogue
                        .spawn(Node {
                            flex_direction: FlexDirection::Column,
                            row_gap: Val::Px(6.0),
                            ..default()
                        })
                        .with_children(|column| {
                            column.spawn((
                                Text::new(""),
                                TextFont {
                                    font_size: 20.0,
                                    ..default()
                                },
                                TextColor(Color::srgb(0.95, 0.8, 0.5)),
                                DialogueSpeakerText,
                            ));
                            column.spawn((
                                Text::new(""),
                                TextFont {
                                    font_size: 18.0,
                                    ..default()
                                },
                                TextColor(Color::srgb(0.9, 0.9, 0.9)),
                                DialogueBodyText,
                            ));
                        });
                });
        });
}

fn set_text(text: &mut Text, value: &str) {
    if text.0 != value {
        text.0 = value.to_string();
    }
}

fn update_prompt_text(
    active: Res<ActiveConversation>,
    prompt: Res<InteractionPrompt>,
    ledger: Res<QuestLedger>,
    speakers: Query<&DialogueSpeaker, With<SpeakerInRange>>,
    mut texts: Query<(&mut Text, &mut TextColor, &mut Visibility), With<PromptText>>,
) {
    let speaker_available = speakers.iter().any(|s| s.has_available(&ledger));
    let line = prompt_line(active.is_open(), prompt.current.as_ref(), speaker_available);

    for (mut text, mut color, mut visibility) in &mut texts {
        match &line {
            Some((label, tone)) => {
                set_text(&mut text, label);
                color.0 = tone_color(*tone);
                *visibility = Visibility::Inherited;
            }
            None => {
                if *visibility != Visibility::Hidden {
                    *visibility = Visibility::Hidden;
                }
            }
        }
    }
}

#[allow(clippy::type_complexity)]
fn update_dialogue_box(
    active: Res<ActiveConversation>,
    assets: Option<Res<AssetServer>>,
    mut boxes: Query<&mut Visibility, (With<DialogueBox>, Without<DialoguePortrait>)>,
    mut portraits: Query<(&mut ImageNode, &mut Visibility), (With<DialoguePortrait>, Without<DialogueBox>)>,
    mut speakers: Query<&mut Text, (With<DialogueSpeakerText>, Without<DialogueBodyText>)>,
    mut bodies: Query<&mut Text, (With<DialogueBodyText>, Without<DialogueSpeakerText>)>,
) {
    let conversation = active.conversation();
    let line = conversation.and_then(|c| c.line());

    let wanted = if line.is_some() { Visibility::Inherited } else { Visibility::Hidden };
    for mut visibility in &mut boxes {
        if *visibility != wanted {
            *visibility = wanted;
        }
    }
    for mut text in &mut speakers {
        set_text(&mut text, line.map_or("", |l| l.speaker.as_str()));
    }
    if let Some(conversation) = conversation {
        let visible = conversation.visible_text();
        for mut text in &mut bodies {
            set_text(&mut text, &visible);
        }
    }

    let portrait = line.and_then(|l| l.portrait.as_deref());
    for (mut image_node, mut visibility) in &mut portraits {
        let wanted = match portrait {
            Some(path) => {
                let handle = image(assets.as_deref(), path);
                if image_node.image != handle {
                    image_node.image = handle;
                }
                Visibility::Inherited
            }
            None => Visibility::Hidden,
        };
        if *visibility != wanted {
            *visibility = wanted;
        }
    }
}

/// Clean up HUD entities.
fn cleanup_hud(mut commands: Commands, query: Query<Entity, With<HudRoot>>) {
    for entity in query.iter() {
        commands.entity(entity).despawn_recursive();
    }
}
