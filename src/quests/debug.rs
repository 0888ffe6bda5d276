//! Quest debug overlay and shortcuts.
//!
//! - F1: toggle the quest status panel
//! - Shift+R: reset all quests
//! - Shift+C: complete every active quest
//! - Shift+L: log quest status

use bevy::prelude::*;

use super::ledger::QuestLedger;
use super::plugin::record_transition;
use crate::core::{GameConfig, HookQueue, QuestChanged};
use crate::persistence::Prefs;

/// Marker for the debug panel root.
#[derive(Component)]
pub struct QuestDebugPanel;

/// Marker for the panel's status text.
#[derive(Component)]
struct QuestDebugText;

pub fn setup_debug_systems(app: &mut App) {
    app.add_systems(
        Update,
        (quest_debug_shortcuts, toggle_debug_panel, update_debug_panel)
            .chain()
            .run_if(debug_enabled),
    );
}

fn debug_enabled(config: Res<GameConfig>) -> bool {
    config.quest_debug_overlay
}

/// One line per quest: `[x]` completed, `[>]` active, `[ ]` untouched.
pub fn status_lines(ledger: &QuestLedger) -> Vec<String> {
    ledger
        .iter()
        .map(|quest| {
            let mark = if quest.is_completed {
                "[x]"
            } else if quest.is_active {
                "[>]"
            } else {
                "[ ]"
            };
            format!("{} {} ({})", mark, quest.name, quest.id)
        })
        .collect()
}

fn quest_debug_shortcuts(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut ledger: ResMut<QuestLedger>,
    mut prefs: ResMut<Prefs>,
    mut changed: EventWriter<QuestChanged>,
    mut hooks: ResMut<HookQueue>,
) {
    if !keyboard.pressed(KeyCode::ShiftLeft) {
        return;
    }

    if keyboard.just_pressed(KeyCode::KeyR) {
        warn!("Debug: resetting all quests");
        ledger.reset_all(prefs.0.as_mut());
    }

    if keyboard.just_pressed(KeyCode::KeyC) {
        let active: Vec<String> = ledger.active_quests().iter().map(|q| q.id.clone()).collect();
        for id in active {
            let transition = ledger.complete(&id, prefs.0.as_mut());
            record_transition(&id, transition, &mut changed, &mut hooks);
        }
    }

    if keyboard.just_pressed(KeyCode::KeyL) {
        info!(
            "Quest status: {} active, {} completed, {} total",
            ledger.active_quests().len(),
            ledger.completed_quests().len(),
            ledger.len()
        );
        for line in status_lines(&ledger) {
            info!("  {}", line);
        }
    }
}

fn toggle_debug_panel(
    mut commands: Commands,
    keyboard: Res<ButtonInput<KeyCode>>,
    panel_query: Query<Entity, With<QuestDebugPanel>>,
) {
    if !keyboard.just_pressed(KeyCode::F1) {
        return;
    }

    if let Ok(panel) = panel_query.get_single() {
        commands.entity(panel).despawn_recursive();
        return;
    }

    commands
        .spawn((
            Node {
                position_type: PositionType::Absolute,
                top: Val::Px(10.0),
                right: Val::Px(10.0),
                padding: UiRect::all(Val::Px(8.0)),
                ..default()
            },
            BackgroundColor(Color::srgba(0.0, 0.0, 0.0, 0.75)),
            GlobalZIndex(100),
            QuestDebugPanel,
        ))
        .with_children(|parent| {
            parent.spawn((
                Text::new(""),
                TextFont {
                    font_size: 14.0,
                    ..default()
                },
                TextColor(Color::srgb(0.8, 0.9, 0.8)),
                QuestDebugText,
            ));
        });
}

fn update_debug_panel(ledger: Res<QuestLedger>, mut text_query: Query<&mut Text, With<QuestDebugText>>) {
    let Ok(mut text) = text_query.get_single_mut() else {
        return;
    };
    let mut lines = vec!["QUESTS".to_string()];
    lines.extend(status_lines(&ledger));
    text.0 = lines.join("\n");
}
