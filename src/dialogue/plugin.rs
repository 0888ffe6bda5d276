//! Dialogue plugin - speaker zones, interact input, typewriter ticking.

use bevy::prelude::*;
use rand::thread_rng;

use super::conversation::{ActiveConversation, Advance, Conversation, DialogueSpeaker, SpeakerInRange};
use super::data::{load_dialogue_library, DialogueLibrary, DialogueSet};
use super::typewriter::BlipSettings;
use crate::audio::PlaySound;
use crate::core::{
    interact_pressed, ControlLocks, GameCommand, GameConfig, GameState, HookQueue, InteractSet, PlayState,
    ZoneEntered, ZoneExited,
};
use crate::quests::QuestLedger;

/// Dialogue plugin - owns the `ActiveConversation` resource.
pub struct DialoguePlugin;

impl Plugin for DialoguePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<DialogueLibrary>()
            .init_resource::<ActiveConversation>()
            .add_event::<PlaySound>()
            .add_systems(Startup, load_dialogue_library)
            .add_systems(
                Update,
                (
                    speaker_zone_events,
                    force_dialogue,
                    interact_with_speaker.in_set(InteractSet::Dialogue),
                    tick_conversation,
                    sync_dialogue_lock,
                )
                    .chain()
                    .run_if(in_state(GameState::InGame)),
            )
            .add_systems(OnEnter(GameState::MainMenu), close_conversation)
            .add_systems(OnEnter(GameState::Ending), close_conversation);
    }
}

fn seconds_per_char(config: &GameConfig) -> Option<f32> {
    config.use_typewriter.then_some(config.typewriter_speed)
}

fn start_conversation(
    active: &mut ActiveConversation,
    hooks: &mut HookQueue,
    config: &GameConfig,
    entity: Entity,
    speaker: &mut DialogueSpeaker,
    set: DialogueSet,
) {
    if let Some((_, previous)) = active.current.take() {
        hooks.extend(previous.set.on_end);
    }
    info!("{}: dialogue '{}'", speaker.name, set.name);
    speaker.mark_shown(&set.name);
    hooks.extend(set.on_start.iter().cloned());
    active.current = Some((entity, Conversation::open(set, seconds_per_char(config))));
}

fn end_conversation(active: &mut ActiveConversation, hooks: &mut HookQueue) {
    if let Some((_, conversation)) = active.current.take() {
        debug!("Dialogue '{}' ended", conversation.set.name);
        hooks.extend(conversation.set.on_end);
    }
}

fn speaker_zone_events(
    mut commands: Commands,
    mut entered: EventReader<ZoneEntered>,
    mut exited: EventReader<ZoneExited>,
    speakers: Query<(), With<DialogueSpeaker>>,
    mut active: ResMut<ActiveConversation>,
    mut hooks: ResMut<HookQueue>,
) {
    for event in entered.read() {
        if speakers.contains(event.zone) {
            commands.entity(event.zone).insert(SpeakerInRange);
        }
    }
    for event in exited.read() {
        if !speakers.contains(event.zone) {
            continue;
        }
        commands.entity(event.zone).remove::<SpeakerInRange>();
        if active.speaker() == Some(event.zone) {
            end_conversation(&mut active, &mut hooks);
        }
    }
}

/// Open a named set on a named speaker, bypassing gates.
fn force_dialogue(
    mut events: EventReader<GameCommand>,
    mut speakers: Query<(Entity, &mut DialogueSpeaker)>,
    mut active: ResMut<ActiveConversation>,
    mut hooks: ResMut<HookQueue>,
    config: Res<GameConfig>,
) {
    for event in events.read() {
        let GameCommand::ForceDialogue { speaker, set } = event else {
            continue;
        };
        let Some((entity, mut target)) = speakers.iter_mut().find(|(_, s)| &s.name == speaker) else {
            warn!("ForceDialogue: no speaker named '{}'", speaker);
            continue;
        };
        let Some(chosen) = target.find(set).cloned() else {
            warn!("ForceDialogue: '{}' has no set '{}'", speaker, set);
            continue;
        };
        start_conversation(&mut active, &mut hooks, &config, entity, &mut target, chosen);
    }
}

fn interact_with_speaker(
    keyboard: Res<ButtonInput<KeyCode>>,
    play_state: Res<State<PlayState>>,
    mut speakers: Query<(Entity, &mut DialogueSpeaker), With<SpeakerInRange>>,
    ledger: Res<QuestLedger>,
    mut active: ResMut<ActiveConversation>,
    mut hooks: ResMut<HookQueue>,
    config: Res<GameConfig>,
) {
    if !interact_pressed(&keyboard) {
        return;
    }

    if let Some((_, conversation)) = active.current.as_mut() {
        let ended = conversation.advance() == Advance::Ended;
        if ended {
            end_conversation(&mut active, &mut hooks);
        }
        return;
    }

    if *play_state.get() != PlayState::Exploring {
        return;
    }

    for (entity, mut speaker) in &mut speakers {
        let Some(set) = speaker.select(&ledger).cloned() else {
            continue;
        };
        start_conversation(&mut active, &mut hooks, &config, entity, &mut speaker, set);
        break;
    }
}

fn tick_conversation(
    time: Res<Time>,
    config: Res<GameConfig>,
    mut active: ResMut<ActiveConversation>,
    mut sounds: EventWriter<PlaySound>,
) {
    let Some((_, conversation)) = active.current.as_mut() else {
        return;
    };
    let revealed = conversation.tick(time.delta_secs());
    if revealed.is_empty() {
        return;
    }
    let Some(line) = conversation.line() else {
        return;
    };
    let Some(blip) = line.blip.as_ref().or(config.default_blip.as_ref()) else {
        return;
    };

    let settings = BlipSettings::from_config(&config);
    let mut rng = thread_rng();
    // One blip per frame at most, even if several characters landed
    if revealed.iter().any(|&(i, c)| settings.should_blip(i, c)) {
        sounds.send(
            PlaySound::new(blip.clone())
                .with_volume(settings.volume)
                .with_pitch(settings.pitch(line.pitch, &mut rng)),
        );
    }
}

fn sync_dialogue_lock(active: Res<ActiveConversation>, mut locks: ResMut<ControlLocks>) {
    let open = active.is_open();
    if locks.dialogue != open {
        locks.dialogue = open;
    }
}

fn close_conversation(mut active: ResMut<ActiveConversation>, mut locks: ResMut<ControlLocks>) {
    active.current = None;
    locks.dialogue = false;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::CorePlugin;
    use crate::dialogue::DialogueLine;
    use crate::persistence::Prefs;
    use crate::quests::{QuestPlugin, QuestRecord};
    use bevy::state::app::StatesPlugin;

    fn test_app() -> App {
        let mut app = App::new();
        app.add_plugins((MinimalPlugins, StatesPlugin))
            .insert_resource(GameConfig { use_typewriter: false, ..Default::default() })
            .insert_resource(Prefs::memory())
            .init_resource::<ButtonInput<KeyCode>>()
            .insert_resource(QuestLedger::new([QuestRecord::new("phone", "Phone")]))
            .add_plugins((CorePlugin, QuestPlugin, DialoguePlugin));
        app.update();
        app.world_mut().resource_mut::<NextState<GameState>>().set(GameState::InGame);
        app.update();
        app
    }

    fn spawn_speaker(app: &mut App) -> Entity {
        let set = DialogueSet {
            on_start: vec![GameCommand::Cue("talk".to_string())],
            on_end: vec![GameCommand::StartQuest("phone".to_string())],
            ..DialogueSet::new(
                "intro",
                vec![DialogueLine::new("Constancio", "Buenas"), DialogueLine::new("Quimi", "Hola")],
            )
        };
        app.world_mut().spawn(DialogueSpeaker::new("Constancio", vec![set])).id()
    }

    fn press_interact(app: &mut App) {
        let mut keyboard = app.world_mut().resource_mut::<ButtonInput<KeyCode>>();
        keyboard.release(KeyCode::KeyE);
        keyboard.clear();
        keyboard.press(KeyCode::KeyE);
        app.update();
        app.world_mut().resource_mut::<ButtonInput<KeyCode>>().clear();
    }

    fn enter_zone(app: &mut App, zone: Entity) {
        let player = app.world_mut().spawn_empty().id();
        app.world_mut().send_event(ZoneEntered { zone, player });
        app.update();
    }

    #[test]
    fn test_interact_in_range_opens_and_walks_conversation() {
        let mut app = test_app();
        let speaker = spawn_speaker(&mut app);
        enter_zone(&mut app, speaker);

        press_interact(&mut app);
        assert_eq!(app.world().resource::<ActiveConversation>().speaker(), Some(speaker));
        assert!(app.world().resource::<ControlLocks>().dialogue);

        press_interact(&mut app);
        let step = app.world().resource::<ActiveConversation>().conversation().map(|c| c.step());
        assert_eq!(step, Some(1));

        press_interact(&mut app);
        assert!(!app.world().resource::<ActiveConversation>().is_open());
        app.update();
        assert!(app.world().resource::<QuestLedger>().is_active("phone"));
    }

    #[test]
    fn test_out_of_range_interact_does_nothing() {
        let mut app = test_app();
        spawn_speaker(&mut app);
        press_interact(&mut app);
        assert!(!app.world().resource::<ActiveConversation>().is_open());
    }

    #[test]
    fn test_leaving_zone_closes_conversation() {
        let mut app = test_app();
        let speaker = spawn_speaker(&mut app);
        enter_zone(&mut app, speaker);
        press_interact(&mut app);

        let player = app.world_mut().spawn_empty().id();
        app.world_mut().send_event(ZoneExited { zone: speaker, player });
        app.update();
        assert!(!app.world().resource::<ActiveConversation>().is_open());
        assert!(app.world().get::<SpeakerInRange>(speaker).is_none());
    }

    #[test]
    fn test_force_dialogue_opens_named_set() {
        let mut app = test_app();
        let speaker = spawn_speaker(&mut app);
        app.world_mut().send_event(GameCommand::ForceDialogue {
            speaker: "Constancio".to_string(),
            set: "intro".to_string(),
        });
        app.update();
        let active = app.world().resource::<ActiveConversation>();
        assert_eq!(active.speaker(), Some(speaker));
        let last = app.world().get::<DialogueSpeaker>(speaker).and_then(|s| s.last_shown.clone());
        assert_eq!(last.as_deref(), Some("intro"));
    }
}
