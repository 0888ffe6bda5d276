use bevy::prelude::*;
use rand::Rng;

use crate::core::approach;

/// Shake offsets are resampled this many times per second at frequency 1.
pub const SHAKE_BASE_RATE: f32 = 20.0;

/// Eased view of the main camera before cinematic offsets.
#[derive(Component, Debug, Clone)]
pub struct CameraRig {
    pub center: Vec2,
    /// Orthographic half-height
    pub size: f32,
    /// Jump straight to the next target instead of easing
    pub snap: bool,
}

impl Default for CameraRig {
    fn default() -> Self {
        Self {
            center: Vec2::ZERO,
            size: 135.0,
            snap: true,
        }
    }
}

impl CameraRig {
    pub fn follow(&mut self, center: Vec2, size: f32, speed: f32, dt: f32) {
        if self.snap {
            self.center = center;
            self.size = size;
            self.snap = false;
            return;
        }
        self.center = self.center.lerp(center, (speed * dt).min(1.0));
        self.size = approach(self.size, size, speed, dt);
    }
}

/// Random camera jitter driven by the stage's shake parameters.
#[derive(Component, Debug, Clone, Default)]
pub struct CameraShake {
    pub offset: Vec2,
    since_sample: f32,
}

impl CameraShake {
    pub fn update(&mut self, amplitude: f32, frequency: f32, dt: f32, rng: &mut impl Rng) -> Vec2 {
        if amplitude <= 0.0 {
            self.offset = Vec2::ZERO;
            self.since_sample = 0.0;
            return self.offset;
        }
        self.since_sample += dt;
        let interval = 1.0 / (SHAKE_BASE_RATE * frequency.max(0.01));
        if self.offset == Vec2::ZERO || self.since_sample >= interval {
            self.since_sample = 0.0;
            self.offset = Vec2::new(rng.gen_range(-1.0..=1.0), rng.gen_range(-1.0..=1.0)) * amplitude;
        }
        self.offset
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_first_follow_snaps_then_eases() {
        let mut rig = CameraRig::default();
        rig.follow(Vec2::new(100.0, 0.0), 90.0, 8.0, 0.016);
        assert_eq!(rig.center, Vec2::new(100.0, 0.0));
        assert_eq!(rig.size, 90.0);

        rig.follow(Vec2::new(200.0, 0.0), 90.0, 4.0, 0.125);
        assert_eq!(rig.center, Vec2::new(150.0, 0.0));
    }

    #[test]
    fn test_shake_stays_in_amplitude_and_stops() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut shake = CameraShake::default();
        for _ in 0..50 {
            let offset = shake.update(3.0, 1.0, 0.02, &mut rng);
            assert!(offset.x.abs() <= 3.0 && offset.y.abs() <= 3.0);
        }
        assert_eq!(shake.update(0.0, 1.0, 0.02, &mut rng), Vec2::ZERO);
    }
}
