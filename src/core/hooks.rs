//! Deferred hook dispatch.
//!
//! Systems that read `GameCommand` cannot also write it in the same system,
//! so hooks fired while handling a command are queued here and sent as
//! events at the end of the frame.

use bevy::prelude::*;

use super::events::GameCommand;

/// Commands waiting to be sent as events.
#[derive(Resource, Default, Debug)]
pub struct HookQueue(pub Vec<GameCommand>);

impl HookQueue {
    pub fn push(&mut self, command: GameCommand) {
        self.0.push(command);
    }

    pub fn extend(&mut self, commands: impl IntoIterator<Item = GameCommand>) {
        self.0.extend(commands);
    }
}

/// Send every queued hook as a `GameCommand` event.
pub fn flush_hook_queue(mut queue: ResMut<HookQueue>, mut writer: EventWriter<GameCommand>) {
    if queue.0.is_empty() {
        return;
    }
    writer.send_batch(queue.0.drain(..));
}
