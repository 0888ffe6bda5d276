//! Audio plugin - sound events turned into kira playback.

use bevy::prelude::*;
use bevy_kira_audio::{Audio, AudioControl, AudioInstance, AudioSource as KiraSource, AudioTween};

use crate::core::{ControlLocks, GameState};

/// Play a one-shot sound.
#[derive(Event, Debug, Clone, PartialEq)]
pub struct PlaySound {
    /// Path relative to assets/
    pub path: String,
    pub volume: f32,
    /// Playback rate, 1.0 is unchanged
    pub pitch: f32,
}

impl PlaySound {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            volume: 1.0,
            pitch: 1.0,
        }
    }

    pub fn with_volume(mut self, volume: f32) -> Self {
        self.volume = volume;
        self
    }

    pub fn with_pitch(mut self, pitch: f32) -> Self {
        self.pitch = pitch;
        self
    }
}

/// Replace the looping music track. `None` stops the music.
#[derive(Event, Debug, Clone, PartialEq)]
pub struct PlayMusic {
    pub path: Option<String>,
}

/// Replace the looping ambience track (breathing, wind). `None` stops it.
#[derive(Event, Debug, Clone, PartialEq)]
pub struct PlayAmbience {
    pub path: Option<String>,
}

/// Volume of the ambience track, 0..=1.
#[derive(Resource, Debug, Clone, Copy, PartialEq)]
pub struct AmbienceVolume(pub f32);

impl Default for AmbienceVolume {
    fn default() -> Self {
        Self(1.0)
    }
}

/// Volume of the music track, 0..=1. Cinematics and the collapse run drive it.
#[derive(Resource, Debug, Clone, Copy, PartialEq)]
pub struct MusicVolume(pub f32);

impl Default for MusicVolume {
    fn default() -> Self {
        Self(1.0)
    }
}

/// A looping track and its playing instance.
#[derive(Debug, Default)]
pub struct LoopTrack {
    pub path: Option<String>,
    instance: Option<Handle<AudioInstance>>,
}

impl LoopTrack {
    fn switch(
        &mut self,
        path: &Option<String>,
        volume: f32,
        audio: &Audio,
        asset_server: &AssetServer,
        instances: &mut Assets<AudioInstance>,
    ) {
        if self.path == *path {
            return;
        }
        if let Some(handle) = self.instance.take() {
            if let Some(instance) = instances.get_mut(&handle) {
                instance.stop(AudioTween::default());
            }
        }
        self.path = path.clone();
        if let Some(path) = path {
            info!("Loop: {}", path);
            let source: Handle<KiraSource> = asset_server.load(path.clone());
            self.instance = Some(audio.play(source).looped().with_volume(f64::from(volume)).handle());
        }
    }

    fn set_volume(&self, volume: f32, instances: &mut Assets<AudioInstance>) {
        let Some(handle) = &self.instance else {
            return;
        };
        if let Some(instance) = instances.get_mut(handle) {
            instance.set_volume(f64::from(volume.clamp(0.0, 1.0)), AudioTween::default());
        }
    }
}

/// The music and ambience tracks currently playing.
#[derive(Resource, Debug, Default)]
pub struct MusicTrack {
    pub music: LoopTrack,
    pub ambience: LoopTrack,
}

/// Audio plugin - expects `bevy_kira_audio::AudioPlugin` to be added by the app.
pub struct GameAudioPlugin;

impl Plugin for GameAudioPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<PlaySound>()
            .add_event::<PlayMusic>()
            .add_event::<PlayAmbience>()
            .init_resource::<MusicVolume>()
            .init_resource::<AmbienceVolume>()
            .init_resource::<MusicTrack>()
            .add_systems(Update, (play_sounds, switch_tracks, apply_volumes).chain())
            .add_systems(Update, hold_for_intro.run_if(resource_changed::<ControlLocks>))
            .add_systems(OnEnter(GameState::Paused), pause_audio)
            .add_systems(OnExit(GameState::Paused), resume_audio);
    }
}

fn play_sounds(mut events: EventReader<PlaySound>, audio: Res<Audio>, asset_server: Res<AssetServer>) {
    for sound in events.read() {
        let source: Handle<KiraSource> = asset_server.load(sound.path.clone());
        audio
            .play(source)
            .with_volume(f64::from(sound.volume))
            .with_playback_rate(f64::from(sound.pitch));
    }
}

fn switch_tracks(
    mut music_events: EventReader<PlayMusic>,
    mut ambience_events: EventReader<PlayAmbience>,
    mut tracks: ResMut<MusicTrack>,
    music_volume: Res<MusicVolume>,
    ambience_volume: Res<AmbienceVolume>,
    audio: Res<Audio>,
    asset_server: Res<AssetServer>,
    mut instances: ResMut<Assets<AudioInstance>>,
) {
    for request in music_events.read() {
        tracks
            .music
            .switch(&request.path, music_volume.0, &audio, &asset_server, &mut instances);
    }
    for request in ambience_events.read() {
        tracks
            .ambience
            .switch(&request.path, ambience_volume.0, &audio, &asset_server, &mut instances);
    }
}

fn apply_volumes(
    music_volume: Res<MusicVolume>,
    ambience_volume: Res<AmbienceVolume>,
    tracks: Res<MusicTrack>,
    mut instances: ResMut<Assets<AudioInstance>>,
) {
    if music_volume.is_changed() {
        tracks.music.set_volume(music_volume.0, &mut instances);
    }
    if ambience_volume.is_changed() {
        tracks.ambience.set_volume(ambience_volume.0, &mut instances);
    }
}

fn pause_audio(audio: Res<Audio>) {
    audio.pause();
}

fn resume_audio(audio: Res<Audio>, locks: Res<ControlLocks>) {
    if !locks.intro {
        audio.resume();
    }
}

/// Silence everything while the intro card is up.
fn hold_for_intro(locks: Res<ControlLocks>, audio: Res<Audio>, mut held: Local<bool>) {
    if locks.intro == *held {
        return;
    }
    *held = locks.intro;
    if locks.intro {
        audio.pause();
    } else {
        audio.resume();
    }
}
