//! Room cameras and the trigger zones that switch between them.

use bevy::prelude::*;
use serde::Deserialize;

/// Camera anchor for one room. The anchor's translation is the view center;
/// `width` x `height` is the area that must stay visible.
#[derive(Component, Debug, Clone, Deserialize)]
pub struct RoomCamera {
    pub room: String,
    pub width: f32,
    pub height: f32,
}

impl RoomCamera {
    /// Orthographic half-height that fits the room at `aspect`.
    pub fn fit_size(&self, aspect: f32) -> f32 {
        fit_size(self.width, self.height, aspect)
    }
}

/// Half-height needed to show `width` x `height` at `aspect` (width / height).
pub fn fit_size(width: f32, height: f32, aspect: f32) -> f32 {
    let from_height = height / 2.0;
    if aspect <= 0.0 {
        return from_height;
    }
    from_height.max(width / (2.0 * aspect))
}

/// Zone that makes its room's camera active.
#[derive(Component, Debug, Clone, Deserialize)]
pub struct CameraZone {
    pub room: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwitchOutcome {
    /// Too soon after the previous request
    Debounced,
    AlreadyActive,
    MissingRoom,
    Switched,
}

/// Which room camera is live. Shared by every camera zone.
#[derive(Resource, Debug, Clone)]
pub struct RoomCameraSwitcher {
    pub active: Option<String>,
    pub debounce: f32,
    last_request: Option<f32>,
}

impl Default for RoomCameraSwitcher {
    fn default() -> Self {
        Self::new(0.15)
    }
}

impl RoomCameraSwitcher {
    pub fn new(debounce: f32) -> Self {
        Self {
            active: None,
            debounce,
            last_request: None,
        }
    }

    /// Ask to switch to `room` at time `now`. Any request that passes the
    /// debounce restarts it, even one that ends up changing nothing.
    pub fn request(&mut self, room: &str, now: f32, room_exists: bool) -> SwitchOutcome {
        if self.last_request.is_some_and(|last| now - last < self.debounce) {
            return SwitchOutcome::Debounced;
        }
        self.last_request = Some(now);

        if !room_exists {
            warn!("Camera zone points at missing room '{}'", room);
            return SwitchOutcome::MissingRoom;
        }
        if self.active.as_deref() == Some(room) {
            return SwitchOutcome::AlreadyActive;
        }
        debug!("Camera switched to room '{}'", room);
        self.active = Some(room.to_string());
        SwitchOutcome::Switched
    }

    pub fn reset(&mut self) {
        self.active = None;
        self.last_request = None;
    }
}
