//! Global light rendered as a full-screen overlay.

use bevy::prelude::*;

/// Darkest the overlay gets at zero intensity.
pub const MAX_DARKNESS: f32 = 0.95;

/// Intensity above 1 that turns the overlay fully into a flash.
pub const FLASH_RANGE: f32 = 4.0;

/// Scene-wide light level. 1.0 is neutral, 0.0 is black, above 1 flashes.
#[derive(Resource, Debug, Clone, Copy, PartialEq)]
pub struct GlobalLight {
    pub intensity: f32,
    pub color: Color,
}

impl Default for GlobalLight {
    fn default() -> Self {
        Self {
            intensity: 1.0,
            color: Color::WHITE,
        }
    }
}

impl GlobalLight {
    /// Overlay color for the current light: a tinted darkness below 1, a
    /// flash of `color` above it.
    pub fn overlay(&self) -> Color {
        let intensity = self.intensity.max(0.0);
        if intensity <= 1.0 {
            let tint = self.color.to_srgba();
            let shade = Color::srgb(
                (1.0 - tint.red) * 0.1,
                (1.0 - tint.green) * 0.1,
                (1.0 - tint.blue) * 0.1,
            );
            shade.with_alpha((1.0 - intensity) * MAX_DARKNESS)
        } else {
            self.color.with_alpha(((intensity - 1.0) / FLASH_RANGE).min(1.0))
        }
    }
}

/// Full-screen node driven by [`GlobalLight`].
#[derive(Component)]
pub struct LightOverlay;

pub fn spawn_light_overlay(mut commands: Commands) {
    commands.spawn((
        Node {
            position_type: PositionType::Absolute,
            width: Val::Percent(100.0),
            height: Val::Percent(100.0),
            ..default()
        },
        BackgroundColor(Color::NONE),
        GlobalZIndex(40),
        LightOverlay,
        Name::new("Light Overlay"),
    ));
}

pub fn update_light_overlay(light: Res<GlobalLight>, mut overlay: Query<&mut BackgroundColor, With<LightOverlay>>) {
    if !light.is_changed() {
        return;
    }
    for mut background in &mut overlay {
        background.0 = light.overlay();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_neutral_light_is_transparent() {
        assert_eq!(GlobalLight::default().overlay().alpha(), 0.0);
    }

    #[test]
    fn test_darkness_and_flash() {
        let dark = GlobalLight { intensity: 0.0, ..Default::default() };
        assert!((dark.overlay().alpha() - MAX_DARKNESS).abs() < 1e-6);

        let flash = GlobalLight { intensity: 300.0, ..Default::default() };
        assert_eq!(flash.overlay().alpha(), 1.0);
        let half = GlobalLight { intensity: 3.0, ..Default::default() };
        assert!((half.overlay().alpha() - 0.5).abs() < 1e-6);
    }
}
