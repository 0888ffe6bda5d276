//! Easing curves and interpolation helpers shared by fades, cinematics and
//! camera motion.

use bevy::prelude::*;
use serde::Deserialize;

/// Normalized easing curve mapping `t` in `[0, 1]` to a progress value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub enum Easing {
    Linear,
    EaseIn,
    EaseOut,
    /// Smoothstep: zero slope at both ends.
    #[default]
    EaseInOut,
    /// Jumps to the end value immediately.
    Constant,
}

impl Easing {
    /// Evaluate the curve. Input is clamped to `[0, 1]`.
    pub fn evaluate(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::EaseIn => t * t,
            Easing::EaseOut => t * (2.0 - t),
            Easing::EaseInOut => t * t * (3.0 - 2.0 * t),
            Easing::Constant => 1.0,
        }
    }
}

/// Linear interpolation between two scalars.
pub fn lerp(from: f32, to: f32, t: f32) -> f32 {
    from + (to - from) * t
}

/// Component-wise interpolation between two colors in linear space.
pub fn lerp_color(from: Color, to: Color, t: f32) -> Color {
    let a = from.to_linear();
    let b = to.to_linear();
    Color::linear_rgba(
        lerp(a.red, b.red, t),
        lerp(a.green, b.green, t),
        lerp(a.blue, b.blue, t),
        lerp(a.alpha, b.alpha, t),
    )
}

/// Move `current` toward `target` by at most `max_delta`.
pub fn move_towards(current: f32, target: f32, max_delta: f32) -> f32 {
    if (target - current).abs() <= max_delta {
        target
    } else {
        current + (target - current).signum() * max_delta
    }
}

/// Frame-rate independent exponential approach (`rate` per second).
pub fn approach(current: f32, target: f32, rate: f32, dt: f32) -> f32 {
    lerp(current, target, (rate * dt).min(1.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_easing_endpoints() {
        for easing in [Easing::Linear, Easing::EaseIn, Easing::EaseOut, Easing::EaseInOut] {
            assert_eq!(easing.evaluate(0.0), 0.0);
            assert_eq!(easing.evaluate(1.0), 1.0);
        }
        assert_eq!(Easing::Constant.evaluate(0.0), 1.0);
    }

    #[test]
    fn test_easing_clamps_input() {
        assert_eq!(Easing::Linear.evaluate(-2.0), 0.0);
        assert_eq!(Easing::EaseInOut.evaluate(3.0), 1.0);
    }

    #[test]
    fn test_ease_in_out_is_symmetric() {
        let a = Easing::EaseInOut.evaluate(0.25);
        let b = Easing::EaseInOut.evaluate(0.75);
        assert!((a + b - 1.0).abs() < 1e-6);
        assert!((Easing::EaseInOut.evaluate(0.5) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_move_towards_does_not_overshoot() {
        assert_eq!(move_towards(0.0, 5.0, 2.0), 2.0);
        assert_eq!(move_towards(4.5, 5.0, 2.0), 5.0);
        assert_eq!(move_towards(5.0, 0.0, 20.0), 0.0);
        assert_eq!(move_towards(3.0, 0.0, 1.0), 2.0);
    }

    #[test]
    fn test_lerp_color_midpoint() {
        let c = lerp_color(Color::linear_rgb(0.0, 0.0, 0.0), Color::linear_rgb(1.0, 0.5, 0.0), 0.5);
        let l = c.to_linear();
        assert!((l.red - 0.5).abs() < 1e-6);
        assert!((l.green - 0.25).abs() < 1e-6);
        assert_eq!(l.blue, 0.0);
    }
}
