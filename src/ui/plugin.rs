//! UI plugin - menus, HUD, and interface elements.

use bevy::prelude::*;

use super::hud;
use super::intro;
use crate::core::GameState;
use crate::persistence::Prefs;
use crate::quests::QuestLedger;

/// UI plugin - handles all user interface.
pub struct UiPlugin;

impl Plugin for UiPlugin {
    fn build(&self, app: &mut App) {
        // Setup HUD systems
        hud::setup_hud_systems(app);
        intro::setup_intro_systems(app);

        app
            // Main menu
            .add_systems(OnEnter(GameState::MainMenu), setup_main_menu)
            .add_systems(Update, main_menu_input.run_if(in_state(GameState::MainMenu)))
            .add_systems(OnExit(GameState::MainMenu), cleanup_main_menu)

            // Pause menu
            .add_systems(OnEnter(GameState::Paused), setup_pause_menu)
            .add_systems(Update, pause_menu_input.run_if(in_state(GameState::Paused)))
            .add_systems(OnExit(GameState::Paused), cleanup_pause_menu);
    }
}

/// Marker for main menu UI entities.
#[derive(Component)]
struct MainMenuUi;

/// Marker for pause menu UI entities.
#[derive(Component)]
struct PauseMenuUi;

/// Marker for menu buttons.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuButton {
    NewGame,
    Continue,
    Quit,
    Resume,
    MainMenu,
}

/// Whether saved quest progress exists to continue from.
pub fn has_progress(ledger: &QuestLedger) -> bool {
    ledger.iter().any(|q| q.is_active || q.is_completed)
}

/// Set up the main menu.
fn setup_main_menu(mut commands: Commands, ledger: Res<QuestLedger>) {
    let can_continue = has_progress(&ledger);

    // Root container
    commands
        .spawn((
            Node {
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                flex_direction: FlexDirection::Column,
                justify_content: JustifyContent::Center,
                align_items: AlignItems::Center,
                ..default()
            },
            BackgroundColor(Color::srgb(0.03, 0.03, 0.05)),
            GlobalZIndex(90),
            MainMenuUi,
        ))
        .with_children(|parent| {
            // Title
            parent.spawn((
                Text::new("VIGIL"),
                TextFont {
                    font_size: 80.0,
                    ..default()
                },
                TextColor(Color::srgb(0.8, 0.75, 0.65)),
                Node {
                    margin: UiRect::bottom(Val::Px(60.0)),
                    ..default()
                },
            ));

            spawn_menu_button(parent, "New Game", MenuButton::NewGame);
            if can_continue {
                spawn_menu_button(parent, "Continue", MenuButton::Continue);
            }
            spawn_menu_button(parent, "Quit", MenuButton::Quit);
        });
}

/// Helper to spawn a menu button.
fn spawn_menu_button(parent: &mut ChildBuilder, text: &str, button: MenuButton) {
    parent
        .spawn((
            Button,
            Node {
                width: Val::Px(200.0),
                height: Val::Px(50.0),
                margin: UiRect::all(Val::Px(10.0)),
                justify_content: JustifyContent::Center,
                align_items: AlignItems::Center,
                ..default()
            },
            BackgroundColor(Color::srgb(0.15, 0.15, 0.2)),
            button,
        ))
        .with_children(|button| {
            button.spawn((
                Text::new(text),
                TextFont {
                    font_size: 24.0,
                    ..default()
                },
                TextColor(Color::srgb(0.8, 0.8, 0.85)),
            ));
        });
}

fn button_color(interaction: &Interaction) -> Color {
    match interaction {
        Interaction::Pressed => Color::srgb(0.3, 0.3, 0.35),
        Interaction::Hovered => Color::srgb(0.25, 0.25, 0.3),
        Interaction::None => Color::srgb(0.15, 0.15, 0.2),
    }
}

/// Handle main menu button interactions.
#[allow(clippy::type_complexity)]
fn main_menu_input(
    mut interaction_query: Query<
        (&Interaction, &MenuButton, &mut BackgroundColor),
        (Changed<Interaction>, With<Button>),
    >,
    mut ledger: ResMut<QuestLedger>,
    mut prefs: ResMut<Prefs>,
    mut next_state: ResMut<NextState<GameState>>,
    mut exit: EventWriter<AppExit>,
) {
    for (interaction, button, mut bg_color) in interaction_query.iter_mut() {
        *bg_color = button_color(interaction).into();
        if *interaction != Interaction::Pressed {
            continue;
        }
        match button {
            MenuButton::NewGame => {
                info!("Starting a new game");
                ledger.reset_all(prefs.0.as_mut());
                next_state.set(GameState::InGame);
            }
            MenuButton::Continue => {
                info!("Continuing saved game");
                next_state.set(GameState::InGame);
            }
            MenuButton::Quit => {
                exit.send(AppExit::Success);
            }
            // Pause menu only
            MenuButton::Resume | MenuButton::MainMenu => {}
        }
    }
}

/// Clean up main menu entities.
fn cleanup_main_menu(mut commands: Commands, ui_query: Query<Entity, With<MainMenuUi>>) {
    for entity in ui_query.iter() {
        commands.entity(entity).despawn_recursive();
    }
}

/// Set up the pause menu.
fn setup_pause_menu(mut commands: Commands) {
    // Semi-transparent overlay
    commands
        .spawn((
            Node {
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                flex_direction: FlexDirection::Column,
                justify_content: JustifyContent::Center,
                align_items: AlignItems::Center,
                ..default()
            },
            BackgroundColor(Color::srgba(0.0, 0.0, 0.0, 0.7)),
            GlobalZIndex(90),
            PauseMenuUi,
        ))
        .with_children(|parent| {
            // Title
            parent.spawn((
                Text::new("PAUSED"),
                TextFont {
                    font_size: 48.0,
                    ..default()
                },
                TextColor(Color::srgb(0.8, 0.8, 0.85)),
                Node {
                    margin: UiRect::bottom(Val::Px(40.0)),
                    ..default()
                },
            ));

            spawn_menu_button(parent, "Resume", MenuButton::Resume);
            spawn_menu_button(parent, "Main Menu", MenuButton::MainMenu);
        });
}

/// Handle pause menu button interactions.
#[allow(clippy::type_complexity)]
fn pause_menu_input(
    mut interaction_query: Query<
        (&Interaction, &MenuButton, &mut BackgroundColor),
        (Changed<Interaction>, With<Button>),
    >,
    mut next_state: ResMut<NextState<GameState>>,
) {
    for (interaction, button, mut bg_color) in interaction_query.iter_mut() {
        *bg_color = button_color(interaction).into();
        if *interaction != Interaction::Pressed {
            continue;
        }
        match button {
            MenuButton::Resume => next_state.set(GameState::InGame),
            MenuButton::MainMenu => next_state.set(GameState::MainMenu),
            // Main menu only
            MenuButton::NewGame | MenuButton::Continue | MenuButton::Quit => {}
        }
    }
}

/// Clean up pause menu entities.
fn cleanup_pause_menu(mut commands: Commands, query: Query<Entity, With<PauseMenuUi>>) {
    for entity in query.iter() {
        commands.entity(entity).despawn_recursive();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{ControlLocks, CorePlugin, GameConfig, PlayState};
    use crate::dialogue::{ActiveConversation, Conversation, DialogueLine, DialogueSet};
    use crate::interaction::InteractionPrompt;
    use crate::quests::QuestRecord;
    use crate::ui::{DialogueBodyText, IntroCardUi, IntroContinueText};
    use bevy::state::app::StatesPlugin;

    fn test_app() -> App {
        test_app_with(GameConfig::default())
    }

    fn test_app_with(config: GameConfig) -> App {
        let mut app = App::new();
        app.add_plugins((MinimalPlugins, StatesPlugin))
            .insert_resource(config)
            .insert_resource(Prefs::memory())
            .insert_resource(QuestLedger::new([QuestRecord::new("phone", "Answer the phone")]))
            .init_resource::<ButtonInput<KeyCode>>()
            .init_resource::<ActiveConversation>()
            .init_resource::<InteractionPrompt>()
            .add_plugins((CorePlugin, UiPlugin));
        app.update();
        app.update();
        app
    }

    fn press(app: &mut App, wanted: MenuButton) {
        let mut query = app.world_mut().query::<(Entity, &MenuButton)>();
        let entity = query
            .iter(app.world())
            .find(|(_, b)| **b == wanted)
            .map(|(e, _)| e)
            .unwrap();
        app.world_mut().entity_mut(entity).insert(Interaction::Pressed);
        app.update();
        app.update();
    }

    fn buttons(app: &mut App) -> Vec<MenuButton> {
        let mut query = app.world_mut().query::<&MenuButton>();
        query.iter(app.world()).copied().collect()
    }

    #[test]
    fn test_continue_only_with_progress() {
        let mut app = test_app();
        assert_eq!(*app.world().resource::<State<GameState>>().get(), GameState::MainMenu);
        assert!(!buttons(&mut app).contains(&MenuButton::Continue));

        let mut ledger = QuestLedger::new([QuestRecord::new("phone", "Answer the phone")]);
        ledger.start("phone", Prefs::memory().0.as_mut());
        assert!(has_progress(&ledger));
    }

    #[test]
    fn test_new_game_resets_quests_and_starts() {
        let mut app = test_app();
        app.world_mut().resource_scope(|world, mut ledger: Mut<QuestLedger>| {
            let mut prefs = world.resource_mut::<Prefs>();
            ledger.complete("phone", prefs.0.as_mut());
        });

        press(&mut app, MenuButton::NewGame);

        assert_eq!(*app.world().resource::<State<GameState>>().get(), GameState::InGame);
        assert!(!app.world().resource::<QuestLedger>().is_completed("phone"));
        assert!(buttons(&mut app).is_empty());
    }

    #[test]
    fn test_pause_menu_buttons() {
        let mut app = test_app();
        press(&mut app, MenuButton::NewGame);
        app.world_mut().resource_mut::<NextState<GameState>>().set(GameState::Paused);
        app.update();

        let shown = buttons(&mut app);
        assert!(shown.contains(&MenuButton::Resume) && shown.contains(&MenuButton::MainMenu));
        assert!(!shown.contains(&MenuButton::NewGame));

        press(&mut app, MenuButton::Resume);
        assert_eq!(*app.world().resource::<State<GameState>>().get(), GameState::InGame);
    }

    #[test]
    fn test_intro_card_holds_play_until_dismissed() {
        let mut app = test_app_with(GameConfig {
            intro_text: Some("Marzo, 1998.".to_string()),
            intro_continue_delay: 0.0,
            ..Default::default()
        });
        press(&mut app, MenuButton::NewGame);
        app.update();

        assert!(app.world().resource::<ControlLocks>().intro);
        assert!(app.world().resource::<Time<Virtual>>().is_paused());
        assert_eq!(*app.world().resource::<State<PlayState>>().get(), PlayState::Intro);
        let mut prompt = app.world_mut().query_filtered::<&Visibility, With<IntroContinueText>>();
        assert_eq!(prompt.single(app.world()), &Visibility::Inherited);

        app.world_mut().resource_mut::<ButtonInput<KeyCode>>().press(KeyCode::Space);
        app.update();
        app.update();

        assert!(!app.world().resource::<ControlLocks>().intro);
        assert!(!app.world().resource::<Time<Virtual>>().is_paused());
        assert_eq!(*app.world().resource::<State<PlayState>>().get(), PlayState::Exploring);
        let mut cards = app.world_mut().query_filtered::<Entity, With<IntroCardUi>>();
        assert_eq!(cards.iter(app.world()).count(), 0);
    }

    #[test]
    fn test_dialogue_box_shows_current_line() {
        let mut app = test_app();
        press(&mut app, MenuButton::NewGame);

        let set = DialogueSet::new("intro", vec![DialogueLine::new("Madre", "Apaga la luz")]);
        app.world_mut().resource_mut::<ActiveConversation>().current =
            Some((Entity::PLACEHOLDER, Conversation::open(set, None)));
        app.update();

        let mut query = app.world_mut().query_filtered::<&Text, With<DialogueBodyText>>();
        assert_eq!(query.single(app.world()).0, "Apaga la luz");
    }
}
