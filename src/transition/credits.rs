//! Closing titles shown in `GameState::Ending`.

use bevy::prelude::*;

/// Seconds of black before the title appears.
pub const BLACK_HOLD: f32 = 1.0;
/// Seconds of title before the date appears.
pub const TITLE_HOLD: f32 = 2.0;
/// Seconds of title and date before returning to the menu.
pub const DATE_HOLD: f32 = 4.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum CreditsStage {
    Black,
    Title,
    Date,
    Done,
}

/// Timeline of the closing titles, on real time.
#[derive(Resource, Debug, Clone, Default)]
pub struct Credits {
    elapsed: f32,
    shown: Option<CreditsStage>,
}

impl Credits {
    pub fn stage_at(elapsed: f32) -> CreditsStage {
        if elapsed < BLACK_HOLD {
            CreditsStage::Black
        } else if elapsed < BLACK_HOLD + TITLE_HOLD {
            CreditsStage::Title
        } else if elapsed < BLACK_HOLD + TITLE_HOLD + DATE_HOLD {
            CreditsStage::Date
        } else {
            CreditsStage::Done
        }
    }

    /// Advance the timeline. Returns the stage when one starts this tick.
    pub fn tick(&mut self, dt: f32) -> Option<CreditsStage> {
        if self.shown.is_some() {
            self.elapsed += dt;
        }
        let stage = Self::stage_at(self.elapsed);
        if self.shown == Some(stage) {
            return None;
        }
        self.shown = Some(stage);
        Some(stage)
    }

    pub fn stage(&self) -> CreditsStage {
        Self::stage_at(self.elapsed)
    }
}

#[derive(Component)]
pub struct CreditsRoot;

#[derive(Component)]
pub struct CreditsTitle;

#[derive(Component)]
pub struct CreditsDate;
