//! Quest plugin - loads the ledger, applies quest commands, persists.

use bevy::prelude::*;
use std::path::Path;

use super::data::{load_quest_file, QUESTS_PATH};
use super::debug;
use super::ledger::{QuestLedger, QuestRecord, QuestTransition};
use crate::core::{GameCommand, GameConfig, HookQueue, QuestChange, QuestChanged};
use crate::persistence::Prefs;

/// Quest plugin - owns the `QuestLedger` resource.
pub struct QuestPlugin;

impl Plugin for QuestPlugin {
    fn build(&self, app: &mut App) {
        if !app.world().contains_resource::<Prefs>() {
            let path = app
                .world()
                .get_resource::<GameConfig>()
                .map(|c| c.prefs_path.clone())
                .unwrap_or_else(|| GameConfig::default().prefs_path);
            app.insert_resource(Prefs::file(path));
        }

        app.init_resource::<QuestLedger>()
            .add_systems(Startup, load_quests)
            .add_systems(Update, apply_quest_commands);

        debug::setup_debug_systems(app);
    }
}

/// Load declarations from disk and saved progress from prefs.
///
/// A ledger that already holds quests (inserted by a test or a tool) is
/// kept and only has its progress reloaded.
pub fn load_quests(mut ledger: ResMut<QuestLedger>, mut prefs: ResMut<Prefs>, config: Res<GameConfig>) {
    if ledger.is_empty() {
        match load_quest_file(Path::new(QUESTS_PATH)) {
            Ok(file) => {
                *ledger = QuestLedger::new(file.quests.into_iter().map(QuestRecord::from));
            }
            Err(e) => {
                error!("{}", e);
            }
        }
    }
    ledger.verbose = config.debug_logs;
    ledger.load(prefs.0.as_ref());

    if config.reset_quests_on_start {
        info!("Resetting all quests (reset_quests_on_start)");
        ledger.reset_all(prefs.0.as_mut());
    }
}

/// Turn a ledger transition into events and queued hooks.
pub fn record_transition(
    id: &str,
    transition: QuestTransition,
    changed: &mut EventWriter<QuestChanged>,
    hooks: &mut HookQueue,
) {
    let change = match transition {
        QuestTransition::Started(on_start) => {
            hooks.extend(on_start);
            QuestChange::Started
        }
        QuestTransition::Completed(on_complete) => {
            hooks.extend(on_complete);
            QuestChange::Completed
        }
        QuestTransition::Reset => QuestChange::Reset,
        QuestTransition::Unchanged | QuestTransition::Unknown => return,
    };
    changed.send(QuestChanged { id: id.to_string(), change });
}

/// Apply `StartQuest` / `CompleteQuest` / `ResetQuest` commands.
fn apply_quest_commands(
    mut commands: EventReader<GameCommand>,
    mut ledger: ResMut<QuestLedger>,
    mut prefs: ResMut<Prefs>,
    mut changed: EventWriter<QuestChanged>,
    mut hooks: ResMut<HookQueue>,
) {
    for command in commands.read() {
        let (id, transition) = match command {
            GameCommand::StartQuest(id) => (id, ledger.start(id, prefs.0.as_mut())),
            GameCommand::CompleteQuest(id) => (id, ledger.complete(id, prefs.0.as_mut())),
            GameCommand::ResetQuest(id) => (id, ledger.reset(id, prefs.0.as_mut())),
            _ => continue,
        };
        record_transition(id, transition, &mut changed, &mut hooks);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::CorePlugin;
    use crate::persistence::{KeyValueStore, MemoryPrefs};
    use bevy::state::app::StatesPlugin;

    fn test_app() -> App {
        let mut app = App::new();
        app.add_plugins((MinimalPlugins, StatesPlugin))
            .insert_resource(GameConfig::default())
            .insert_resource(Prefs::memory())
            .init_resource::<ButtonInput<KeyCode>>()
            .insert_resource(QuestLedger::new([
                QuestRecord::new("phone", "Find the phone")
                    .on_complete(GameCommand::StartQuest("basement".to_string())),
                QuestRecord::new("basement", "Reach the basement"),
            ]))
            .add_plugins((CorePlugin, QuestPlugin));
        app
    }

    fn send(app: &mut App, command: GameCommand) {
        app.world_mut().send_event(command);
    }

    #[test]
    fn test_commands_mutate_ledger() {
        let mut app = test_app();
        app.update();
        send(&mut app, GameCommand::StartQuest("phone".to_string()));
        app.update();
        assert!(app.world().resource::<QuestLedger>().is_active("phone"));
    }

    #[test]
    fn test_completion_hooks_chain_into_next_quest() {
        let mut app = test_app();
        app.update();
        send(&mut app, GameCommand::CompleteQuest("phone".to_string()));
        // Frame 1 completes the quest and queues the hook, frame 2 applies it
        app.update();
        app.update();

        let ledger = app.world().resource::<QuestLedger>();
        assert!(ledger.is_completed("phone"));
        assert!(ledger.is_active("basement"));
    }

    #[test]
    fn test_only_effective_changes_are_reported() {
        let mut app = test_app();
        app.update();
        send(&mut app, GameCommand::StartQuest("basement".to_string()));
        send(&mut app, GameCommand::StartQuest("basement".to_string()));
        send(&mut app, GameCommand::StartQuest("ghost".to_string()));
        app.update();

        let events = app.world().resource::<Events<QuestChanged>>();
        let mut cursor = events.get_cursor();
        let changes: Vec<_> = cursor.read(events).collect();
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].change, QuestChange::Started);
    }

    #[test]
    fn test_startup_reloads_saved_progress() {
        let mut store = MemoryPrefs::new();
        store.set_int("Quest_phone_Completed", 1);

        let mut app = test_app();
        app.insert_resource(Prefs(Box::new(store)));
        app.update();

        assert!(app.world().resource::<QuestLedger>().is_completed("phone"));
    }
}
