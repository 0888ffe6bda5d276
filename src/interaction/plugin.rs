//! Interaction plugin - zone entry, interact key and the prompt resource.

use bevy::prelude::*;
use rand::seq::SliceRandom;
use rand::thread_rng;

use super::interactor::{InteractionOutcome, InteractionPrompt, InteractorInRange, PromptTone, QuestInteractor};
use super::telescope::Telescope;
use crate::audio::PlaySound;
use crate::cinematics::SequencePlayer;
use crate::core::{
    claim_interact, interact_pressed, ControlLocks, GameCommand, GameState, HookQueue, InteractSet, PlayState,
    QuestChanged, ZoneEntered, ZoneExited,
};
use crate::persistence::Prefs;
use crate::quests::{record_transition, QuestLedger};
use crate::world::Zone;

pub struct InteractionPlugin;

impl Plugin for InteractionPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<InteractionPrompt>()
            .init_resource::<SequencePlayer>()
            .add_event::<PlaySound>()
            .add_systems(
                Update,
                (
                    (interactor_zone_events, telescope_zone_events),
                    (interact_with_interactors, use_telescope).chain().in_set(InteractSet::World),
                    update_prompt,
                )
                    .chain()
                    .run_if(in_state(GameState::InGame)),
            )
            .add_systems(OnExit(GameState::InGame), clear_prompt);
    }
}

/// Ledger, store and outputs needed to run an interactor.
struct InteractionContext<'a, 'w, 's> {
    ledger: &'a mut QuestLedger,
    prefs: &'a mut Prefs,
    changed: &'a mut EventWriter<'w, QuestChanged>,
    hooks: &'a mut HookQueue,
    sounds: &'a mut EventWriter<'s, PlaySound>,
}

/// Returns whether the interactor fired.
fn run_interactor(commands: &mut Commands, entity: Entity, interactor: &mut QuestInteractor, ctx: &mut InteractionContext) -> bool {
    match interactor.attempt(ctx.ledger) {
        InteractionOutcome::AlreadyUsed => {
            debug!("Interactor {:?} already used", entity);
            false
        }
        InteractionOutcome::ConditionsNotMet => {
            debug!("Interactor {:?}: conditions not met", entity);
            false
        }
        InteractionOutcome::Success(actions) => {
            for action in &actions {
                let transition = action.execute(ctx.ledger, ctx.prefs.0.as_mut());
                record_transition(&action.quest, transition, ctx.changed, ctx.hooks);
            }
            ctx.hooks.extend(interactor.on_success.iter().cloned());
            if let Some(sound) = &interactor.sound {
                ctx.sounds.send(PlaySound::new(sound.clone()));
            }
            if let Some(name) = &interactor.reveal_on_complete {
                ctx.hooks.push(GameCommand::Show(name.clone()));
            }
            if interactor.hide_on_complete {
                commands
                    .entity(entity)
                    .insert(Visibility::Hidden)
                    .remove::<(Zone, InteractorInRange)>();
            }
            true
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn interactor_zone_events(
    mut commands: Commands,
    mut entered: EventReader<ZoneEntered>,
    mut exited: EventReader<ZoneExited>,
    mut interactors: Query<&mut QuestInteractor>,
    mut ledger: ResMut<QuestLedger>,
    mut prefs: ResMut<Prefs>,
    mut changed: EventWriter<QuestChanged>,
    mut hooks: ResMut<HookQueue>,
    mut sounds: EventWriter<PlaySound>,
) {
    let mut ctx = InteractionContext {
        ledger: &mut *ledger,
        prefs: &mut *prefs,
        changed: &mut changed,
        hooks: &mut *hooks,
        sounds: &mut sounds,
    };
    for event in entered.read() {
        let Ok(mut interactor) = interactors.get_mut(event.zone) else {
            continue;
        };
        commands.entity(event.zone).insert(InteractorInRange);
        if interactor.mode.fires_on_enter() {
            run_interactor(&mut commands, event.zone, &mut interactor, &mut ctx);
        }
    }
    for event in exited.read() {
        if interactors.contains(event.zone) {
            commands.entity(event.zone).remove::<InteractorInRange>();
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn interact_with_interactors(
    mut commands: Commands,
    mut keyboard: ResMut<ButtonInput<KeyCode>>,
    time: Res<Time>,
    play_state: Res<State<PlayState>>,
    locks: Res<ControlLocks>,
    mut interactors: Query<(Entity, &mut QuestInteractor), With<InteractorInRange>>,
    mut ledger: ResMut<QuestLedger>,
    mut prefs: ResMut<Prefs>,
    mut changed: EventWriter<QuestChanged>,
    mut hooks: ResMut<HookQueue>,
    mut sounds: EventWriter<PlaySound>,
) {
    // The state lags the locks by a frame
    if *play_state.get() != PlayState::Exploring || locks.play_state() != PlayState::Exploring {
        return;
    }
    if !interact_pressed(&keyboard) {
        return;
    }
    let now = time.elapsed_secs();
    let mut ctx = InteractionContext {
        ledger: &mut *ledger,
        prefs: &mut *prefs,
        changed: &mut changed,
        hooks: &mut *hooks,
        sounds: &mut sounds,
    };
    let mut fired = false;
    for (entity, mut interactor) in &mut interactors {
        if !interactor.mode.fires_on_interact() || !interactor.off_cooldown(now) {
            continue;
        }
        interactor.last_used_at = Some(now);
        fired |= run_interactor(&mut commands, entity, &mut interactor, &mut ctx);
    }
    if fired {
        claim_interact(&mut keyboard);
    }
}

fn telescope_zone_events(
    mut commands: Commands,
    mut entered: EventReader<ZoneEntered>,
    mut exited: EventReader<ZoneExited>,
    telescopes: Query<(), With<Telescope>>,
) {
    for event in entered.read() {
        if telescopes.contains(event.zone) {
            commands.entity(event.zone).insert(InteractorInRange);
        }
    }
    for event in exited.read() {
        if telescopes.contains(event.zone) {
            commands.entity(event.zone).remove::<InteractorInRange>();
        }
    }
}

/// Start a viewing on the telescope in range.
fn use_telescope(
    mut keyboard: ResMut<ButtonInput<KeyCode>>,
    play_state: Res<State<PlayState>>,
    locks: Res<ControlLocks>,
    telescopes: Query<&Telescope, With<InteractorInRange>>,
    mut player: ResMut<SequencePlayer>,
    mut hooks: ResMut<HookQueue>,
) {
    if *play_state.get() != PlayState::Exploring || locks.play_state() != PlayState::Exploring {
        return;
    }
    if player.is_playing() || !interact_pressed(&keyboard) {
        return;
    }
    let Some(telescope) = telescopes.iter().next() else {
        return;
    };
    info!("Looking through the telescope");
    let noise = telescope.eerie_noises.choose(&mut thread_rng()).map(String::as_str);
    let restore = player.defaults().clone();
    hooks.extend(player.play(telescope.sequence(&restore, noise)));
    claim_interact(&mut keyboard);
}

fn update_prompt(
    interactors: Query<&QuestInteractor, With<InteractorInRange>>,
    telescopes: Query<&Telescope, With<InteractorInRange>>,
    sequences: Res<SequencePlayer>,
    ledger: Res<QuestLedger>,
    mut prompt: ResMut<InteractionPrompt>,
) {
    let current = interactors
        .iter()
        .find(|i| i.should_show_prompt(&ledger))
        .map(|i| i.prompt_label(&ledger))
        .or_else(|| {
            telescopes
                .iter()
                .next()
                .filter(|_| !sequences.is_playing())
                .map(|t| (t.prompt.clone(), PromptTone::Neutral))
        });
    if prompt.current != current {
        prompt.current = current;
    }
}

fn clear_prompt(mut prompt: ResMut<InteractionPrompt>) {
    prompt.current = None;
}
